use std::io::Write;

use anyhow::Result;

use crate::application::LedgerService;

/// Exporter for dumping the ledger to other formats.
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export every entry to CSV, soft-deleted rows included (the flag
    /// becomes a column). Returns the number of rows written.
    pub async fn export_entries_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let entries = self.service.list_all_entries().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record([
            "id",
            "date",
            "amount_cents",
            "category",
            "subcategory",
            "note",
            "type",
            "is_deleted",
        ])?;

        let mut count = 0;
        for entry in &entries {
            csv_writer.write_record(&[
                entry.id.to_string(),
                entry.date.to_string(),
                entry.amount_cents.to_string(),
                entry.category.clone(),
                entry.subcategory.clone().unwrap_or_default(),
                entry.note.clone().unwrap_or_default(),
                entry.entry_type.as_str().to_string(),
                (entry.is_deleted as u8).to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }
}
