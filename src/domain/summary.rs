use std::collections::BTreeMap;

use super::{Cents, Entry, EntryType};

/// Sum expense amounts grouped by category.
///
/// Income entries and soft-deleted entries never contribute, whatever
/// the caller hands in. Subcategories are not part of the grouping key.
/// Categories with no matching entries are simply absent from the map.
pub fn summarize_expenses(entries: &[Entry]) -> BTreeMap<String, Cents> {
    let mut totals: BTreeMap<String, Cents> = BTreeMap::new();

    for entry in entries {
        if entry.entry_type != EntryType::Expense || entry.is_deleted {
            continue;
        }
        *totals.entry(entry.category.clone()).or_insert(0) += entry.amount_cents;
    }

    totals
}
