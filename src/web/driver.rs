use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;

use crate::error::{AppError, Result};

const USER_AGENT_STRING: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Finds one element on a loaded page. `pattern` is matched against the page
/// source and its first capture group is the element's inner HTML.
#[derive(Debug, Clone, Copy)]
pub struct Locator {
    pub name: &'static str,
    pub pattern: &'static str,
}

/// A handle bound to one loaded page at a time.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Rendered text of the element, or `None` while it is not visible.
    /// Drivers whose pages cannot change fail with `ElementNotFound` instead
    /// of returning `None` forever.
    async fn visible_text(&self, locator: &Locator) -> Result<Option<String>>;

    async fn quit(&mut self) -> Result<()>;
}

/// Loads pages over plain HTTP, without running scripts. A loaded page never
/// changes, so an element missing from it is reported at once.
pub struct StaticPageDriver {
    client: Client,
    page: Option<String>,
}

impl StaticPageDriver {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT_STRING)
            .build()?;
        Ok(Self { client, page: None })
    }
}

#[async_trait]
impl PageDriver for StaticPageDriver {
    async fn goto(&mut self, url: &str) -> Result<()> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            tracing::warn!("Loaded {} with HTTP {}", url, response.status());
        }
        self.page = Some(response.text().await?);
        Ok(())
    }

    async fn visible_text(&self, locator: &Locator) -> Result<Option<String>> {
        let Some(html) = self.page.as_deref() else {
            return Ok(None);
        };

        let re = Regex::new(locator.pattern)?;
        let inner = match re.captures(html).and_then(|cap| cap.get(1)) {
            Some(m) => m.as_str(),
            None => {
                return Err(AppError::ElementNotFound {
                    locator: locator.name.to_string(),
                    waited: Duration::ZERO,
                })
            }
        };

        let text = match html2text::from_read(inner.as_bytes(), 200) {
            Ok(t) => t,
            Err(e) => {
                tracing::debug!("Failed to render {}: {}", locator.name, e);
                return Ok(None);
            }
        };

        let text = text
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(if text.is_empty() { None } else { Some(text) })
    }

    async fn quit(&mut self) -> Result<()> {
        self.page = None;
        Ok(())
    }
}
