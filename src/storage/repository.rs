use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

use crate::domain::{Entry, EntryId, EntryType};

use super::MIGRATION_001_INITIAL;

/// Repository for persisting and querying ledger entries.
///
/// Single-row inserts and updates are atomic (SQLite); no operation
/// spans more than one row.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Insert a new entry and return the id assigned by the store.
    pub async fn insert_entry(&self, entry: &Entry) -> Result<EntryId> {
        let result = sqlx::query(
            r#"
            INSERT INTO entries (date, amount_cents, category, subcategory, note, entry_type, is_deleted)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.date.to_string())
        .bind(entry.amount_cents)
        .bind(&entry.category)
        .bind(&entry.subcategory)
        .bind(&entry.note)
        .bind(entry.entry_type.as_str())
        .bind(entry.is_deleted)
        .execute(&self.pool)
        .await
        .context("Failed to insert entry")?;

        Ok(result.last_insert_rowid())
    }

    /// Get an entry by id, soft-deleted rows included.
    pub async fn get_entry(&self, id: EntryId) -> Result<Option<Entry>> {
        let row = sqlx::query(
            r#"
            SELECT id, date, amount_cents, category, subcategory, note, entry_type, is_deleted
            FROM entries
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch entry")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_entry(&row)?)),
            None => Ok(None),
        }
    }

    /// Write all mutable fields of an entry back to its row.
    pub async fn update_entry(&self, entry: &Entry) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE entries
            SET date = ?, amount_cents = ?, category = ?, subcategory = ?, note = ?, entry_type = ?
            WHERE id = ?
            "#,
        )
        .bind(entry.date.to_string())
        .bind(entry.amount_cents)
        .bind(&entry.category)
        .bind(&entry.subcategory)
        .bind(&entry.note)
        .bind(entry.entry_type.as_str())
        .bind(entry.id)
        .execute(&self.pool)
        .await
        .context("Failed to update entry")?;

        Ok(())
    }

    /// Set or clear the soft-delete flag. The row itself is never removed.
    pub async fn set_deleted(&self, id: EntryId, deleted: bool) -> Result<()> {
        sqlx::query("UPDATE entries SET is_deleted = ? WHERE id = ?")
            .bind(deleted)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update soft-delete flag")?;
        Ok(())
    }

    /// List non-deleted entries of both types within an inclusive date
    /// range, ordered by date then id. An inverted range yields no rows.
    pub async fn list_entries(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Entry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, amount_cents, category, subcategory, note, entry_type, is_deleted
            FROM entries
            WHERE date BETWEEN ? AND ? AND is_deleted = 0
            ORDER BY date ASC, id ASC
            "#,
        )
        .bind(start.to_string())
        .bind(end.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list entries")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    /// List non-deleted expense entries within an inclusive date range.
    pub async fn list_expenses(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Entry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, amount_cents, category, subcategory, note, entry_type, is_deleted
            FROM entries
            WHERE date BETWEEN ? AND ? AND entry_type = 'expense' AND is_deleted = 0
            ORDER BY date ASC, id ASC
            "#,
        )
        .bind(start.to_string())
        .bind(end.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list expenses")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    /// List every entry in the ledger, soft-deleted rows included.
    pub async fn list_all_entries(&self) -> Result<Vec<Entry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, amount_cents, category, subcategory, note, entry_type, is_deleted
            FROM entries
            ORDER BY date ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list all entries")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<Entry> {
        let date_str: String = row.get("date");
        let entry_type_str: String = row.get("entry_type");

        Ok(Entry {
            id: row.get("id"),
            date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").context("Invalid entry date")?,
            amount_cents: row.get("amount_cents"),
            category: row.get("category"),
            subcategory: row.get("subcategory"),
            note: row.get("note"),
            entry_type: EntryType::from_str(&entry_type_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid entry type: {}", entry_type_str))?,
            is_deleted: row.get::<i64, _>("is_deleted") != 0,
        })
    }
}
