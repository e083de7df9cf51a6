mod client;

pub use client::{Lookup, WeatherClient, WeatherResponse};
