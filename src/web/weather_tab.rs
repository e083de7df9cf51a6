use std::time::Duration;

use tokio::time::Instant;

use super::driver::{Locator, PageDriver};
use crate::error::{AppError, Result};

pub const DEFAULT_WAIT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub const TEMPERATURE: Locator = Locator {
    name: "temperature",
    pattern: r#"(?s)<div[^>]*id="qlook"[^>]*>.*?<div[^>]*class="h2"[^>]*>(.*?)</div>"#,
};

/// First cell of the second body row of the 48-hour forecast table.
pub const FEELS_LIKE: Locator = Locator {
    name: "feels_like",
    pattern: r#"(?s)<table[^>]*id="wt-48"[^>]*>.*?<tbody[^>]*>.*?<tr[^>]*>.*?</tr>\s*<tr[^>]*>.*?<td[^>]*>(.*?)</td>"#,
};

/// Reads current conditions from a loaded city weather page.
pub struct WeatherTab<'a, D: PageDriver + ?Sized> {
    driver: &'a D,
    wait: Duration,
}

impl<'a, D: PageDriver + ?Sized> WeatherTab<'a, D> {
    pub fn new(driver: &'a D, wait: Duration) -> Self {
        Self { driver, wait }
    }

    /// Rendered temperature text, unit suffix included.
    pub async fn temperature(&self) -> Result<String> {
        self.wait_for_visible(&TEMPERATURE).await
    }

    pub async fn feels_like(&self) -> Result<String> {
        self.wait_for_visible(&FEELS_LIKE).await
    }

    async fn wait_for_visible(&self, locator: &Locator) -> Result<String> {
        let deadline = Instant::now() + self.wait;
        loop {
            if let Some(text) = self.driver.visible_text(locator).await? {
                return Ok(text);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(AppError::ElementNotFound {
                    locator: locator.name.to_string(),
                    waited: self.wait,
                });
            }
            tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }
}
