// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use spesa::application::LedgerService;
use tempfile::TempDir;

/// Default catalog fixture shared by the integration tests
pub const DEFAULT_CATEGORIES: &str = r#"{
  "Food": ["Groceries", "Restaurants"],
  "Travel": ["Flights", "Hotels"],
  "Utilities": [],
  "Salary": []
}"#;

/// Helper to create a test service with a temporary database and
/// category file
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    test_service_with_categories(DEFAULT_CATEGORIES).await
}

pub async fn test_service_with_categories(
    categories_json: &str,
) -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let categories_path = temp_dir.path().join("categories.json");
    std::fs::write(&categories_path, categories_json)?;

    let service = LedgerService::init(db_path.to_str().unwrap(), &categories_path).await?;
    Ok((service, temp_dir))
}

/// Path of the category file inside a test tempdir
pub fn categories_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("categories.json")
}

/// Helper to parse a date string into NaiveDate
pub fn date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}
