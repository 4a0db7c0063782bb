use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::catalog::CategoryCatalog;
use crate::domain::{summarize_expenses, Cents, Entry, EntryId, EntryType};
use crate::storage::Repository;

use super::AppError;

/// Application service exposing the ledger's named operations.
/// This is the boundary any dispatch layer (CLI, RPC server, TUI, etc.)
/// calls into.
pub struct LedgerService {
    repo: Repository,
    categories_path: PathBuf,
}

/// Partial update for an entry. `None` leaves the field unchanged;
/// the id itself is immutable.
#[derive(Debug, Default, Clone)]
pub struct EntryUpdate {
    pub date: Option<NaiveDate>,
    pub amount_cents: Option<Cents>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub note: Option<String>,
    pub entry_type: Option<EntryType>,
}

impl EntryUpdate {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.amount_cents.is_none()
            && self.category.is_none()
            && self.subcategory.is_none()
            && self.note.is_none()
            && self.entry_type.is_none()
    }
}

impl LedgerService {
    /// Create a new ledger service over an existing repository.
    pub fn new(repo: Repository, categories_path: impl Into<PathBuf>) -> Self {
        Self {
            repo,
            categories_path: categories_path.into(),
        }
    }

    /// Initialize a new database at the given path.
    pub async fn init(
        database_path: &str,
        categories_path: impl Into<PathBuf>,
    ) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo, categories_path))
    }

    /// Connect to an existing database.
    pub async fn connect(
        database_path: &str,
        categories_path: impl Into<PathBuf>,
    ) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo, categories_path))
    }

    // ========================
    // Write operations
    // ========================

    /// Record an expense.
    pub async fn add_expense(
        &self,
        date: NaiveDate,
        amount_cents: Cents,
        category: String,
        subcategory: Option<String>,
        note: Option<String>,
    ) -> Result<Entry, AppError> {
        self.add_entry(date, amount_cents, category, subcategory, note, EntryType::Expense)
            .await
    }

    /// Record an income/credit (e.g., salary).
    pub async fn add_credit(
        &self,
        date: NaiveDate,
        amount_cents: Cents,
        category: String,
        subcategory: Option<String>,
        note: Option<String>,
    ) -> Result<Entry, AppError> {
        self.add_entry(date, amount_cents, category, subcategory, note, EntryType::Income)
            .await
    }

    async fn add_entry(
        &self,
        date: NaiveDate,
        amount_cents: Cents,
        category: String,
        subcategory: Option<String>,
        note: Option<String>,
        entry_type: EntryType,
    ) -> Result<Entry, AppError> {
        validate_amount(amount_cents)?;
        if category.trim().is_empty() {
            return Err(AppError::Validation("Category must not be empty".to_string()));
        }
        self.validate_against_catalog(&category, subcategory.as_deref())
            .await?;

        let mut entry = Entry::new(date, amount_cents, category, entry_type);
        if let Some(subcategory) = subcategory {
            entry = entry.with_subcategory(subcategory);
        }
        if let Some(note) = note {
            entry = entry.with_note(note);
        }

        entry.id = self.repo.insert_entry(&entry).await?;
        Ok(entry)
    }

    /// Apply a partial update to an entry and return the updated row.
    ///
    /// Changed amounts and the effective category/subcategory pair are
    /// re-validated exactly as on creation. Editing a soft-deleted entry
    /// is permitted and does not restore it.
    pub async fn edit_entry(&self, id: EntryId, update: EntryUpdate) -> Result<Entry, AppError> {
        if update.is_empty() {
            return Err(AppError::Validation(
                "No fields provided to update".to_string(),
            ));
        }

        let mut entry = self.get_entry(id).await?;

        if let Some(amount_cents) = update.amount_cents {
            validate_amount(amount_cents)?;
            entry.amount_cents = amount_cents;
        }
        if let Some(date) = update.date {
            entry.date = date;
        }
        if let Some(entry_type) = update.entry_type {
            entry.entry_type = entry_type;
        }

        let pair_changed = update.category.is_some() || update.subcategory.is_some();
        if let Some(category) = update.category {
            if category.trim().is_empty() {
                return Err(AppError::Validation("Category must not be empty".to_string()));
            }
            entry.category = category;
        }
        if let Some(subcategory) = update.subcategory {
            entry.subcategory = Some(subcategory);
        }
        if let Some(note) = update.note {
            entry.note = Some(note);
        }

        // Validate the pair as it will be stored, so a category change
        // cannot orphan a kept subcategory.
        if pair_changed {
            self.validate_against_catalog(&entry.category, entry.subcategory.as_deref())
                .await?;
        }

        self.repo.update_entry(&entry).await?;
        Ok(entry)
    }

    /// Soft-delete an entry. Idempotent: deleting an already-hidden
    /// entry succeeds without changing anything.
    pub async fn delete_entry(&self, id: EntryId) -> Result<(), AppError> {
        let entry = self.get_entry(id).await?;
        if entry.is_deleted {
            return Ok(());
        }
        self.repo.set_deleted(id, true).await?;
        Ok(())
    }

    /// Restore a previously soft-deleted entry. The one documented
    /// transition back from hidden to active.
    pub async fn restore_entry(&self, id: EntryId) -> Result<Entry, AppError> {
        let mut entry = self.get_entry(id).await?;
        if entry.is_deleted {
            self.repo.set_deleted(id, false).await?;
            entry.is_deleted = false;
        }
        Ok(entry)
    }

    // ========================
    // Read operations
    // ========================

    /// Get a single entry by id, soft-deleted or not.
    pub async fn get_entry(&self, id: EntryId) -> Result<Entry, AppError> {
        self.repo
            .get_entry(id)
            .await?
            .ok_or(AppError::EntryNotFound(id))
    }

    /// List non-deleted entries of both types within an inclusive date
    /// range, ordered by date then id. An inverted or empty range yields
    /// an empty vec, not an error.
    pub async fn list_entries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Entry>, AppError> {
        Ok(self.repo.list_entries(start, end).await?)
    }

    /// Sum non-deleted expense amounts per category over an inclusive
    /// date range. `category` optionally restricts the result to a
    /// single category.
    pub async fn summarize_expenses(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        category: Option<&str>,
    ) -> Result<BTreeMap<String, Cents>, AppError> {
        let expenses = self.repo.list_expenses(start, end).await?;
        let mut totals = summarize_expenses(&expenses);
        if let Some(category) = category {
            totals.retain(|name, _| name == category);
        }
        Ok(totals)
    }

    /// List every entry in the ledger, soft-deleted rows included.
    /// Used for export.
    pub async fn list_all_entries(&self) -> Result<Vec<Entry>, AppError> {
        Ok(self.repo.list_all_entries().await?)
    }

    /// Read the category taxonomy fresh from disk. Never cached: edits
    /// to the file are visible on the very next call.
    pub async fn get_categories(&self) -> Result<CategoryCatalog, AppError> {
        Ok(CategoryCatalog::load(&self.categories_path).await?)
    }

    async fn validate_against_catalog(
        &self,
        category: &str,
        subcategory: Option<&str>,
    ) -> Result<(), AppError> {
        let catalog = CategoryCatalog::load(&self.categories_path).await?;
        if !catalog.validate(category, subcategory) {
            return Err(AppError::Validation(match subcategory {
                Some(subcategory) => format!(
                    "Unknown category/subcategory pair: {}/{}",
                    category, subcategory
                ),
                None => format!("Unknown category: {}", category),
            }));
        }
        Ok(())
    }
}

fn validate_amount(amount_cents: Cents) -> Result<(), AppError> {
    if amount_cents < 0 {
        return Err(AppError::Validation(
            "Amount must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// Parse a strict `YYYY-MM-DD` date, reporting failures as validation
/// errors.
pub fn parse_entry_date(date_str: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", date_str)))
}
