// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use expenses::application::ExpenseService;
use expenses::storage::FileStore;
use tempfile::TempDir;

/// Storage path inside a fresh temporary directory
pub fn temp_db() -> Result<(PathBuf, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("budget.db");
    Ok((db_path, temp_dir))
}

/// Helper to create a test service over a file store in a temporary directory
pub fn test_service() -> Result<(ExpenseService<FileStore>, TempDir)> {
    let (db_path, temp_dir) = temp_db()?;
    let service = ExpenseService::new(FileStore::open(db_path)?);
    Ok((service, temp_dir))
}

/// Write a CSV fixture next to the database and return its path
pub fn write_csv(dir: &TempDir, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.path().join(name);
    std::fs::write(&path, contents)?;
    Ok(path)
}
