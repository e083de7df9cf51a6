pub const WEATHER_TABLE: &str = "weather_data";

pub const SCHEMA: &str = r#"
-- one row per city, last write wins
CREATE TABLE IF NOT EXISTS weather_data (
    city TEXT PRIMARY KEY,
    temperature REAL,
    feels_like REAL
);
"#;

/// Columns `get_field` is allowed to interpolate into a query.
pub const READABLE_COLUMNS: [&str; 2] = ["temperature", "feels_like"];
