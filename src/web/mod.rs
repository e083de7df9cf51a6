mod driver;
mod weather_tab;

#[cfg(test)]
pub mod fake;

pub use driver::{PageDriver, StaticPageDriver};
pub use weather_tab::{WeatherTab, DEFAULT_WAIT};
