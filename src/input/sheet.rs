use std::path::Path;

use calamine::{open_workbook_auto, Reader};

use crate::error::{AppError, Result};
use crate::models::CityCountry;

const CITY_COLUMN: &str = "name";
const COUNTRY_COLUMN: &str = "country";

/// One worksheet as text cells; the first row is the header.
#[derive(Debug, Clone, Default)]
pub struct CitySheet {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CitySheet {
    pub fn open(path: &Path, sheet: &str) -> Result<Self> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook.worksheet_range(sheet)?;
        let rows = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        let sheet = Self::from_rows(rows);
        tracing::info!("Loaded {} rows from {}", sheet.rows.len(), path.display());
        Ok(sheet)
    }

    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let header = rows
            .remove(0)
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();
        Self { header, rows }
    }

    /// (name, country) pairs in sheet order; rows missing either are skipped.
    pub fn city_country_pairs(&self) -> Result<Vec<CityCountry>> {
        let city_idx = self.column_index(CITY_COLUMN)?;
        let country_idx = self.column_index(COUNTRY_COLUMN)?;

        Ok(self
            .rows
            .iter()
            .filter_map(|row| {
                let city = cell(row, city_idx)?;
                let country = cell(row, country_idx)?;
                Some(CityCountry::new(city, country))
            })
            .collect())
    }

    #[allow(dead_code)]
    pub fn column(&self, name: &str) -> Result<Vec<String>> {
        let idx = self.column_index(name)?;
        Ok(self
            .rows
            .iter()
            .filter_map(|row| cell(row, idx))
            .map(str::to_string)
            .collect())
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AppError::KeyMissing(format!("column '{}'", name)))
    }
}

fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(|c| c.trim()).filter(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn pairs_follow_header_positions() {
        let sheet = CitySheet::from_rows(rows(&[
            &["country", "name"],
            &["United States", "New York"],
            &["Israel", "Tel Aviv"],
        ]));
        assert_eq!(
            sheet.city_country_pairs().unwrap(),
            vec![
                CityCountry::new("New York", "United States"),
                CityCountry::new("Tel Aviv", "Israel"),
            ]
        );
    }

    #[test]
    fn incomplete_rows_are_skipped() {
        let sheet = CitySheet::from_rows(rows(&[
            &["name", "country"],
            &["Paris", "France"],
            &["", "Nowhere"],
            &["Lonely"],
        ]));
        assert_eq!(sheet.city_country_pairs().unwrap().len(), 1);
        assert_eq!(sheet.column("name").unwrap(), vec!["Paris", "Lonely"]);
    }

    #[test]
    fn flat_columns() {
        let sheet = CitySheet::from_rows(rows(&[
            &["name", "country"],
            &["London", "UK"],
            &["Sao Paulo", "Brazil"],
        ]));
        assert_eq!(sheet.column("country").unwrap(), vec!["UK", "Brazil"]);
    }

    #[test]
    fn missing_header_is_key_missing() {
        let sheet = CitySheet::from_rows(rows(&[&["city", "nation"], &["Oslo", "Norway"]]));
        assert!(matches!(
            sheet.city_country_pairs(),
            Err(AppError::KeyMissing(_))
        ));
        assert!(CitySheet::from_rows(Vec::new()).column("name").is_err());
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities_list.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();
        assert!(CitySheet::open(&path, "cities_list").is_err());
    }
}
