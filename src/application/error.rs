use thiserror::Error;

use crate::catalog::CatalogError;
use crate::domain::EntryId;

#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid amount, date, type, or category/subcategory pair.
    /// No partial write occurs.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),

    /// Category definition missing, unreadable, or malformed. Operations
    /// that need validation fail rather than silently skip it.
    #[error("Category catalog unavailable: {0}")]
    CatalogUnavailable(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
