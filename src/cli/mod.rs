use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::application::ExpenseService;
use crate::domain::Amount;
use crate::io::ImportResult;
use crate::storage::FileStore;

/// Default storage file, relative to the working directory.
pub const DEFAULT_DATABASE: &str = "budget.db";

/// Expenses - personal expense tracker
#[derive(Parser)]
#[command(name = "expenses")]
#[command(about = "Record expenses, list them with a total, and move them in and out of CSV")]
#[command(version)]
pub struct Cli {
    /// Storage file path
    #[arg(short, long, env = "EXPENSES_DB", default_value = DEFAULT_DATABASE, global = true)]
    pub database: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all expenses with their total
    Report,

    /// Record a new expense
    Add {
        /// Amount spent (e.g., "12.50" or "12"), must be positive
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// What the money was spent on
        description: String,
    },

    /// Import expenses from a CSV file with `amount` and `description` columns
    ImportCsv {
        /// CSV file to read
        path: PathBuf,
    },

    /// Export all expenses to a CSV file
    ExportCsv {
        /// CSV file to write (replaced if it exists)
        path: PathBuf,
    },

    /// Dump the raw stored records
    ExportDebug,
}

impl Cli {
    /// Install the stderr log subscriber. `RUST_LOG` wins unless `--verbose`
    /// is given.
    pub fn init_tracing(&self) {
        let filter = if self.verbose {
            EnvFilter::new("expenses=debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("expenses=warn"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    pub fn run(self) -> Result<()> {
        let store = FileStore::open(&self.database)
            .with_context(|| format!("Failed to open storage {}", self.database.display()))?;
        let service = ExpenseService::new(store);

        match self.command {
            Commands::Report => {
                let report = service.report()?;
                for line in report.lines() {
                    println!("{}", line);
                }
            }

            Commands::Add {
                amount,
                description,
            } => {
                let amount: Amount = amount
                    .parse()
                    .with_context(|| format!("Invalid amount '{}'. Use '12.50' or '12'", amount))?;

                let expense = service.add_expense(amount, description)?;
                println!(
                    "Added expense #{}: {} {}",
                    expense.id, expense.amount, expense.description
                );
            }

            Commands::ImportCsv { path } => {
                let result = service.import_csv(&path)?;
                print_import_summary(&result);
            }

            Commands::ExportCsv { path } => {
                let count = service.export_csv(&path)?;
                println!("Exported {} expenses to {}", count, path.display());
            }

            Commands::ExportDebug => {
                println!("{}", service.debug_dump()?);
            }
        }

        Ok(())
    }
}

fn print_import_summary(result: &ImportResult) {
    println!("Import complete");
    println!("  Imported: {}", result.imported);
    println!("  Errors:   {}", result.errors.len());

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in result.errors.iter().take(10) {
            println!("  {}", error);
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more errors", result.errors.len() - 10);
        }
    }
}
