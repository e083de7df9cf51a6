use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::DiscrepancyRecord;

pub const REPORT_FILE: &str = "weather_discrepancy_report.txt";

const TITLE: &str = "Temperature and Feels Like Discrepancies Report";
const SEPARATOR: &str = "------------------------------------------------";

pub fn render(discrepancies: &[DiscrepancyRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", TITLE);
    let _ = writeln!(out, "{}", SEPARATOR);
    for item in discrepancies {
        let _ = writeln!(out, "City: {}", item.city);
        let _ = writeln!(
            out,
            "  TimeAndDate.com (Web) Temperature: {} | OpenWeatherMap (API/DB) Temperature: {}",
            item.web_temperature_text, item.store_temperature_text
        );
        let _ = writeln!(
            out,
            "  TimeAndDate.com (Web) Feels Like: {} | OpenWeatherMap (API/DB) Feels Like: {}",
            item.web_feels_like_text, item.store_feels_like_text
        );
        let _ = writeln!(out, "{}", SEPARATOR);
    }
    out
}

/// Overwrites `<dir>/weather_discrepancy_report.txt`, creating `dir` if needed.
pub fn write_report(dir: &Path, discrepancies: &[DiscrepancyRecord]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(REPORT_FILE);
    std::fs::write(&path, render(discrepancies))?;
    tracing::info!(
        "Wrote {} discrepancies to {}",
        discrepancies.len(),
        path.display()
    );
    Ok(path)
}
