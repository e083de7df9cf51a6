use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::driver::{Locator, PageDriver};
use crate::error::Result;

/// In-memory driver: pages keyed by URL, each with a temperature and a
/// feels-like text. Elements stay hidden for the first `hidden_polls` reads.
#[derive(Default)]
pub struct FakeDriver {
    pages: HashMap<String, (String, String)>,
    current: Option<String>,
    hidden_polls: usize,
    polls: AtomicUsize,
    pub visited: Vec<String>,
    quit_called: Arc<AtomicBool>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, temperature: &str, feels_like: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            (temperature.to_string(), feels_like.to_string()),
        );
        self
    }

    /// Shared flag set by `quit`, readable after the driver has been moved.
    pub fn quit_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.quit_called)
    }

    pub fn hidden_for(mut self, polls: usize) -> Self {
        self.hidden_polls = polls;
        self
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.visited.push(url.to_string());
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn visible_text(&self, locator: &Locator) -> Result<Option<String>> {
        if self.polls.fetch_add(1, Ordering::SeqCst) < self.hidden_polls {
            return Ok(None);
        }
        let page = self.current.as_ref().and_then(|url| self.pages.get(url));
        Ok(page.and_then(|(temperature, feels_like)| match locator.name {
            "temperature" => Some(temperature.clone()),
            "feels_like" => Some(feels_like.clone()),
            _ => None,
        }))
    }

    async fn quit(&mut self) -> Result<()> {
        self.current = None;
        self.quit_called.store(true, Ordering::SeqCst);
        Ok(())
    }
}
