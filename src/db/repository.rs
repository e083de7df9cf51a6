use std::fmt;
use std::path::Path;
use std::str::FromStr;

use rusqlite::{params, OptionalExtension};
use tokio_rusqlite::Connection;

use crate::error::{AppError, Result};

use super::schema::{READABLE_COLUMNS, SCHEMA};

/// Which end of a numeric column to aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Min,
    Max,
}

impl Boundary {
    pub fn as_sql(self) -> &'static str {
        match self {
            Boundary::Min => "MIN",
            Boundary::Max => "MAX",
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Boundary {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "MIN" => Ok(Boundary::Min),
            "MAX" => Ok(Boundary::Max),
            _ => Err(AppError::InvalidBoundary(s.to_string())),
        }
    }
}

/// Local weather store. Every failure is logged here before it is returned,
/// so callers only decide what a failed operation means for them.
///
/// Schema paths (`add_column_if_absent`, `remove_column_if_present`,
/// `set_field`, the aggregates) interpolate table and column names as given.
/// Only `get_field` checks its column against an allow-list.
pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &Path) -> Result<Self> {
        let conn = logged("open", Connection::open(db_path).await)?;
        let repository = Self { conn };
        repository.ensure_schema().await?;
        Ok(repository)
    }

    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let conn = logged("open", Connection::open_in_memory().await)?;
        let repository = Self { conn };
        repository.ensure_schema().await?;
        Ok(repository)
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        let result = self
            .conn
            .call(|conn| {
                conn.execute_batch(SCHEMA)?;
                Ok(())
            })
            .await;
        logged("ensure_schema", result)
    }

    // Schema operations

    /// Probes with a trivial select; a failing statement means the column is absent.
    pub async fn column_exists(&self, table: &str, column: &str) -> Result<bool> {
        let sql = format!("SELECT {} FROM {}", column, table);
        let result = self
            .conn
            .call(move |conn| Ok(conn.prepare(&sql).is_ok()))
            .await;
        logged("column_exists", result)
    }

    /// Returns whether the column was added.
    pub async fn add_column_if_absent(
        &self,
        table: &str,
        column: &str,
        column_type: &str,
    ) -> Result<bool> {
        if self.column_exists(table, column).await? {
            tracing::info!("Column '{}' already exists in the '{}' table.", column, table);
            return Ok(false);
        }

        let sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_type);
        let result = self
            .conn
            .call(move |conn| {
                conn.execute(&sql, [])?;
                Ok(())
            })
            .await;
        logged("add_column", result)?;

        tracing::info!("Column '{}' was successfully added to the '{}' table.", column, table);
        Ok(true)
    }

    /// Returns whether the column was dropped.
    #[allow(dead_code)]
    pub async fn remove_column_if_present(&self, table: &str, column: &str) -> Result<bool> {
        if !self.column_exists(table, column).await? {
            tracing::info!("Column '{}' does not exist in '{}' table.", column, table);
            return Ok(false);
        }

        let sql = format!("ALTER TABLE {} DROP COLUMN {}", table, column);
        let result = self
            .conn
            .call(move |conn| {
                conn.execute(&sql, [])?;
                Ok(())
            })
            .await;
        logged("remove_column", result)?;

        tracing::info!("Column '{}' removed from '{}' table.", column, table);
        Ok(true)
    }

    // Row operations

    pub async fn upsert_weather(&self, city: &str, temperature: f64, feels_like: f64) -> Result<()> {
        let city = city.to_string();
        let result = self
            .conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO weather_data (city, temperature, feels_like)
                       VALUES (?1, ?2, ?3)
                       ON CONFLICT(city) DO UPDATE SET
                           temperature = excluded.temperature,
                           feels_like = excluded.feels_like"#,
                    params![city, temperature, feels_like],
                )?;
                Ok(())
            })
            .await;
        logged("upsert_weather", result)
    }

    /// Updates one column of an existing row. A city with no row is a silent
    /// no-op; the affected row count is returned.
    pub async fn set_field(&self, city: &str, column: &str, value: f64) -> Result<usize> {
        let sql = format!("UPDATE weather_data SET {} = ?1 WHERE city = ?2", column);
        let owned_city = city.to_string();
        let result = self
            .conn
            .call(move |conn| Ok(conn.execute(&sql, params![value, owned_city])?))
            .await;
        let updated = logged("set_field", result)?;
        tracing::info!("{} updated for {} to {}.", column, city, value);
        Ok(updated)
    }

    pub async fn get_field(&self, city: &str, column: &str) -> Result<Option<f64>> {
        if !READABLE_COLUMNS.contains(&column) {
            return Err(AppError::InvalidColumn(column.to_string()));
        }

        let sql = format!("SELECT {} FROM weather_data WHERE city = ?1", column);
        let city = city.to_string();
        let result = self
            .conn
            .call(move |conn| {
                let value = conn
                    .query_row(&sql, params![city], |row| row.get::<_, Option<f64>>(0))
                    .optional()?;
                Ok(value.flatten())
            })
            .await;
        logged("get_field", result)
    }

    // Aggregates

    /// MIN or MAX of `column` across all rows; `None` on an empty table.
    pub async fn aggregate_boundary(&self, boundary: Boundary, column: &str) -> Result<Option<f64>> {
        let sql = format!("SELECT {}({}) FROM weather_data", boundary.as_sql(), column);
        let result = self
            .conn
            .call(move |conn| Ok(conn.query_row(&sql, [], |row| row.get::<_, Option<f64>>(0))?))
            .await;
        let value = logged("aggregate_boundary", result)?;
        if value.is_none() {
            tracing::info!("No {} data found in the database.", column);
        }
        Ok(value)
    }

    /// City holding the MIN or MAX of `column`. Among ties, whichever row
    /// SQLite returns first; the choice is not defined.
    pub async fn city_at_boundary(&self, boundary: Boundary, column: &str) -> Result<Option<String>> {
        let sql = format!(
            "SELECT city FROM weather_data WHERE {col} = (SELECT {agg}({col}) FROM weather_data)",
            col = column,
            agg = boundary.as_sql(),
        );
        let result = self
            .conn
            .call(move |conn| {
                let city = conn
                    .query_row(&sql, [], |row| row.get::<_, Option<String>>(0))
                    .optional()?;
                Ok(city.flatten())
            })
            .await;
        let city = logged("city_at_boundary", result)?;
        if city.is_none() {
            tracing::info!("No data found for the specified parameter: {}.", column);
        }
        Ok(city)
    }

    pub async fn row_count(&self) -> Result<i64> {
        let result = self
            .conn
            .call(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM weather_data", [], |row| row.get(0))?)
            })
            .await;
        logged("row_count", result)
    }

    pub async fn close(self) -> Result<()> {
        logged("close", self.conn.close().await)
    }
}

fn logged<T>(operation: &'static str, result: tokio_rusqlite::Result<T>) -> Result<T> {
    result.map_err(|source| {
        tracing::error!(operation, error = %source, "store operation failed");
        AppError::Store { operation, source }
    })
}
