use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Cents;

pub type EntryId = i64;

/// Direction of a ledger entry. The stored amount is always a
/// non-negative magnitude; the sign lives here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Expense,
    Income,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Expense => "expense",
            EntryType::Income => "income",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "expense" => Some(EntryType::Expense),
            "income" => Some(EntryType::Income),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single recorded expense or income event.
///
/// Rows are never physically removed: `delete` flips `is_deleted` and
/// reads filter on it. The category/subcategory pair is checked against
/// the catalog at write time only; later catalog edits do not invalidate
/// stored entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Assigned by the repository on insert, immutable thereafter
    pub id: EntryId,
    pub date: NaiveDate,
    /// Non-negative magnitude in cents
    pub amount_cents: Cents,
    pub category: String,
    pub subcategory: Option<String>,
    pub note: Option<String>,
    pub entry_type: EntryType,
    /// Soft-delete flag; hidden entries stay out of lists and summaries
    pub is_deleted: bool,
}

impl Entry {
    /// Create a new active entry. The id must be assigned by the repository.
    ///
    /// # Panics
    ///
    /// Panics if `amount_cents` is negative. Callers parse amounts with
    /// [`parse_cents`](super::parse_cents), which already rejects signs,
    /// or validate them in the service layer before constructing an
    /// `Entry`.
    pub fn new(
        date: NaiveDate,
        amount_cents: Cents,
        category: impl Into<String>,
        entry_type: EntryType,
    ) -> Self {
        assert!(amount_cents >= 0, "Entry amount must be non-negative");
        Self {
            id: 0, // Will be set by repository
            date,
            amount_cents,
            category: category.into(),
            subcategory: None,
            note: None,
            entry_type,
            is_deleted: false,
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Returns true if this entry counts toward expense summaries
    pub fn is_expense(&self) -> bool {
        self.entry_type == EntryType::Expense
    }
}
