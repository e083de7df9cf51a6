use std::path::{Path, PathBuf};

use toml::{Table, Value};

use crate::error::{AppError, Result};
use crate::paths::ProjectPaths;

pub const DEFAULT_CITIES: [&str; 5] = ["London", "New York", "Paris", "Tel Aviv", "Sao Paulo"];
pub const DEFAULT_SHEET: &str = "cities_list";

/// Section/option lookups over the TOML config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigReader {
    table: Table,
}

impl ConfigReader {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!("Config file {} not found, using empty config", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let table = content.parse::<Table>()?;
        Ok(Self { table })
    }

    /// Missing section or option is logged and yields `None`.
    pub fn get(&self, section: &str, option: &str) -> Option<String> {
        match self.lookup(section, option) {
            Ok(value) => Some(value_text(value)),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }

    pub fn get_list(&self, section: &str, option: &str) -> Option<Vec<String>> {
        match self.lookup(section, option).ok()? {
            Value::Array(items) => Some(items.iter().map(value_text).collect()),
            other => Some(vec![value_text(other)]),
        }
    }

    fn lookup(&self, section: &str, option: &str) -> Result<&Value> {
        let missing = || AppError::ConfigMissing {
            section: section.to_string(),
            option: option.to_string(),
        };
        self.table
            .get(section)
            .and_then(Value::as_table)
            .ok_or_else(missing)?
            .get(option)
            .ok_or_else(missing)
    }

    fn optional(&self, section: &str, option: &str) -> Option<String> {
        self.lookup(section, option).ok().map(value_text)
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Settings built once per run and handed to each component.
#[derive(Debug, Clone)]
pub struct Config {
    pub web_base_url: String,
    pub api_key: String,
    pub api_base_url: String,
    pub store_path: PathBuf,
    pub reports_dir: PathBuf,
    pub cities_file: PathBuf,
    pub sheet_name: String,
    pub cities: Vec<String>,
}

impl Config {
    pub fn config_path(paths: &ProjectPaths) -> PathBuf {
        paths.resolve(["config", "config.toml"])
    }

    pub fn load(paths: &ProjectPaths) -> Result<Self> {
        let reader = ConfigReader::load(&Self::config_path(paths))?;
        Ok(Self::from_reader(&reader, paths))
    }

    pub fn from_reader(reader: &ConfigReader, paths: &ProjectPaths) -> Self {
        let anchored = |section: &str, option: &str, default: &[&str]| {
            reader
                .optional(section, option)
                .map(|value| paths.anchor(&value))
                .unwrap_or_else(|| paths.resolve(default))
        };

        Self {
            web_base_url: reader.get("web", "BASE_URL").unwrap_or_default(),
            api_key: reader.get("api", "API_KEY").unwrap_or_default(),
            api_base_url: reader.get("api", "BASE_URL").unwrap_or_default(),
            store_path: anchored("store", "PATH", &["data.db"]),
            reports_dir: anchored("reports", "DIR", &["reports"]),
            cities_file: anchored("input", "CITIES_FILE", &["tests", "cities_list.xlsx"]),
            sheet_name: reader
                .optional("input", "SHEET")
                .unwrap_or_else(|| DEFAULT_SHEET.to_string()),
            cities: reader
                .get_list("run", "CITIES")
                .unwrap_or_else(|| DEFAULT_CITIES.iter().map(|c| c.to_string()).collect()),
        }
    }
}
