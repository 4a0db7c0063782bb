use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::application::{parse_entry_date, EntryUpdate, LedgerService};
use crate::domain::{format_cents, parse_cents, Entry, EntryId, EntryType};

/// Spesa - Personal Expense Ledger
#[derive(Parser)]
#[command(name = "spesa")]
#[command(about = "A local-first personal expense and income ledger")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "spesa.db")]
    pub database: String,

    /// Category definition file (JSON, re-read on every operation)
    #[arg(short, long, default_value = "categories.json")]
    pub categories: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record an expense
    Add {
        /// Amount (e.g., "40.00" or "40")
        amount: String,

        /// Category name (must exist in the category file)
        category: String,

        /// Subcategory (must belong to the category)
        #[arg(short, long)]
        subcategory: Option<String>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Record an income/credit (e.g., salary)
    Credit {
        /// Amount (e.g., "1000.00" or "1000")
        amount: String,

        /// Category name (must exist in the category file)
        category: String,

        /// Subcategory (must belong to the category)
        #[arg(short, long)]
        subcategory: Option<String>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,

        /// Date of the credit (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List entries within an inclusive date range
    List {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: String,
    },

    /// Summarize expense totals by category over a date range
    Summary {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// Restrict the summary to a single category
        #[arg(long)]
        category: Option<String>,
    },

    /// Edit fields of an existing entry
    Edit {
        /// Entry id
        id: EntryId,

        /// New amount (e.g., "40.00")
        #[arg(long)]
        amount: Option<String>,

        /// New category (validated against the category file)
        #[arg(long)]
        category: Option<String>,

        /// New subcategory (validated against the category file)
        #[arg(long)]
        subcategory: Option<String>,

        /// New note
        #[arg(long)]
        note: Option<String>,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// New type: expense, income
        #[arg(long = "type")]
        entry_type: Option<String>,
    },

    /// Soft-delete an entry (hides it without removing the row)
    Delete {
        /// Entry id
        id: EntryId,
    },

    /// Restore a previously deleted entry
    Restore {
        /// Entry id
        id: EntryId,
    },

    /// Show a single entry, soft-deleted or not
    Show {
        /// Entry id
        id: EntryId,
    },

    /// Print the current category taxonomy
    Categories,

    /// Export the full ledger to CSV
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database, &self.categories).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Add {
                amount,
                category,
                subcategory,
                note,
                date,
            } => {
                let service = LedgerService::connect(&self.database, &self.categories).await?;
                let entry = run_add_command(
                    &service,
                    &amount,
                    category,
                    subcategory,
                    note,
                    date.as_deref(),
                    EntryType::Expense,
                )
                .await?;
                println!(
                    "Recorded expense #{}: {} {} ({})",
                    entry.id,
                    format_cents(entry.amount_cents),
                    entry.category,
                    entry.date
                );
            }

            Commands::Credit {
                amount,
                category,
                subcategory,
                note,
                date,
            } => {
                let service = LedgerService::connect(&self.database, &self.categories).await?;
                let entry = run_add_command(
                    &service,
                    &amount,
                    category,
                    subcategory,
                    note,
                    date.as_deref(),
                    EntryType::Income,
                )
                .await?;
                println!(
                    "Recorded credit #{}: {} {} ({})",
                    entry.id,
                    format_cents(entry.amount_cents),
                    entry.category,
                    entry.date
                );
            }

            Commands::List { from, to } => {
                let service = LedgerService::connect(&self.database, &self.categories).await?;
                run_list_command(&service, &from, &to).await?;
            }

            Commands::Summary { from, to, category } => {
                let service = LedgerService::connect(&self.database, &self.categories).await?;
                run_summary_command(&service, &from, &to, category.as_deref()).await?;
            }

            Commands::Edit {
                id,
                amount,
                category,
                subcategory,
                note,
                date,
                entry_type,
            } => {
                let service = LedgerService::connect(&self.database, &self.categories).await?;

                let amount_cents = amount
                    .map(|a| parse_cents(&a))
                    .transpose()
                    .context("Invalid amount format. Use '40.00' or '40'")?;
                let date = date.map(|d| parse_entry_date(&d)).transpose()?;
                let entry_type = entry_type
                    .map(|t| {
                        EntryType::from_str(&t).ok_or_else(|| {
                            anyhow::anyhow!(
                                "Invalid entry type '{}'. Valid types: expense, income",
                                t
                            )
                        })
                    })
                    .transpose()?;

                let update = EntryUpdate {
                    date,
                    amount_cents,
                    category,
                    subcategory,
                    note,
                    entry_type,
                };

                let entry = service.edit_entry(id, update).await?;
                println!(
                    "Updated entry #{}: {} {} ({})",
                    entry.id,
                    format_cents(entry.amount_cents),
                    entry.category,
                    entry.date
                );
            }

            Commands::Delete { id } => {
                let service = LedgerService::connect(&self.database, &self.categories).await?;
                service.delete_entry(id).await?;
                println!("Entry #{} hidden (soft deleted)", id);
            }

            Commands::Restore { id } => {
                let service = LedgerService::connect(&self.database, &self.categories).await?;
                let entry = service.restore_entry(id).await?;
                println!(
                    "Restored entry #{}: {} {}",
                    entry.id,
                    format_cents(entry.amount_cents),
                    entry.category
                );
            }

            Commands::Show { id } => {
                let service = LedgerService::connect(&self.database, &self.categories).await?;
                let entry = service.get_entry(id).await?;
                print_entry(&entry);
            }

            Commands::Categories => {
                let service = LedgerService::connect(&self.database, &self.categories).await?;
                run_categories_command(&service).await?;
            }

            Commands::Export { output } => {
                let service = LedgerService::connect(&self.database, &self.categories).await?;
                run_export_command(&service, output.as_deref()).await?;
            }
        }

        Ok(())
    }
}

async fn run_add_command(
    service: &LedgerService,
    amount: &str,
    category: String,
    subcategory: Option<String>,
    note: Option<String>,
    date: Option<&str>,
    entry_type: EntryType,
) -> Result<Entry> {
    let amount_cents = parse_cents(amount).context("Invalid amount format. Use '40.00' or '40'")?;

    let date = match date {
        Some(date_str) => parse_entry_date(date_str)?,
        None => Utc::now().date_naive(),
    };

    let entry = match entry_type {
        EntryType::Expense => {
            service
                .add_expense(date, amount_cents, category, subcategory, note)
                .await?
        }
        EntryType::Income => {
            service
                .add_credit(date, amount_cents, category, subcategory, note)
                .await?
        }
    };

    Ok(entry)
}

async fn run_list_command(service: &LedgerService, from: &str, to: &str) -> Result<()> {
    let start = parse_entry_date(from)?;
    let end = parse_entry_date(to)?;

    let entries = service.list_entries(start, end).await?;

    if entries.is_empty() {
        println!("No entries found.");
    } else {
        println!(
            "{:>6} {:<12} {:<8} {:>10} {:<24} NOTE",
            "ID", "DATE", "TYPE", "AMOUNT", "CATEGORY"
        );
        println!("{}", "-".repeat(80));

        for entry in &entries {
            let category = match &entry.subcategory {
                Some(subcategory) => format!("{}/{}", entry.category, subcategory),
                None => entry.category.clone(),
            };

            println!(
                "{:>6} {:<12} {:<8} {:>10} {:<24} {}",
                entry.id,
                entry.date.to_string(),
                entry.entry_type.as_str(),
                format_cents(entry.amount_cents),
                truncate(&category, 24),
                truncate(entry.note.as_deref().unwrap_or(""), 30)
            );
        }
    }
    Ok(())
}

async fn run_summary_command(
    service: &LedgerService,
    from: &str,
    to: &str,
    category: Option<&str>,
) -> Result<()> {
    let start = parse_entry_date(from)?;
    let end = parse_entry_date(to)?;

    let totals = service.summarize_expenses(start, end, category).await?;

    if totals.is_empty() {
        println!("No expenses found.");
    } else {
        println!("{:<24} {:>12}", "CATEGORY", "TOTAL");
        println!("{}", "-".repeat(37));

        let mut grand_total = 0;
        for (category, total) in &totals {
            println!("{:<24} {:>12}", truncate(category, 24), format_cents(*total));
            grand_total += total;
        }

        println!("{}", "-".repeat(37));
        println!("{:<24} {:>12}", "TOTAL", format_cents(grand_total));
    }
    Ok(())
}

async fn run_categories_command(service: &LedgerService) -> Result<()> {
    let catalog = service.get_categories().await?;

    if catalog.categories().is_empty() {
        println!("No categories defined.");
    } else {
        for (category, subcategories) in catalog.categories() {
            if subcategories.is_empty() {
                println!("{}", category);
            } else {
                println!("{}: {}", category, subcategories.join(", "));
            }
        }
    }
    Ok(())
}

async fn run_export_command(service: &LedgerService, output: Option<&str>) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = exporter.export_entries_csv(writer).await?;
    if output.is_some() {
        eprintln!("Exported {} entries", count);
    }
    Ok(())
}

fn print_entry(entry: &Entry) {
    println!("Entry #{}", entry.id);
    println!("  Date:        {}", entry.date);
    println!("  Type:        {}", entry.entry_type);
    println!("  Amount:      {}", format_cents(entry.amount_cents));
    println!("  Category:    {}", entry.category);
    if let Some(subcategory) = &entry.subcategory {
        println!("  Subcategory: {}", subcategory);
    }
    if let Some(note) = &entry.note {
        println!("  Note:        {}", note);
    }
    if entry.is_deleted {
        println!("  Status:      deleted");
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    // Count and cut by chars, not bytes: slicing a multibyte category
    // or note at a byte offset panics.
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
