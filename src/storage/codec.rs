//! On-disk encoding of a ledger.
//!
//! The storage file is a pretty-printed JSON document:
//!
//! ```json
//! {
//!   "format": "expenses-ledger",
//!   "version": 1,
//!   "expenses": [
//!     { "id": 1, "amount_cents": 1250, "description": "lunch" }
//!   ]
//! }
//! ```
//!
//! Field order is fixed by the structs below, so encoding the same ledger
//! always yields the same bytes.

use serde::{Deserialize, Serialize};

use crate::domain::{Amount, Expense, ExpenseId, Ledger};

pub const FORMAT_TAG: &str = "expenses-ledger";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    format: String,
    version: u32,
    expenses: Vec<Record>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Record {
    id: ExpenseId,
    amount_cents: Amount,
    description: String,
}

pub fn encode(ledger: &Ledger) -> serde_json::Result<Vec<u8>> {
    let document = Document {
        format: FORMAT_TAG.to_string(),
        version: FORMAT_VERSION,
        expenses: ledger
            .iter()
            .map(|e| Record {
                id: e.id,
                amount_cents: e.amount,
                description: e.description.clone(),
            })
            .collect(),
    };

    let mut bytes = serde_json::to_vec_pretty(&document)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Decode a stored ledger. The error string describes what is wrong with
/// the data; callers attach the location.
pub fn decode(bytes: &[u8]) -> Result<Ledger, String> {
    let document: Document =
        serde_json::from_slice(bytes).map_err(|e| format!("invalid JSON: {e}"))?;

    if document.format != FORMAT_TAG {
        return Err(format!(
            "unexpected format tag '{}' (expected '{}')",
            document.format, FORMAT_TAG
        ));
    }
    if document.version != FORMAT_VERSION {
        return Err(format!(
            "unsupported version {} (expected {})",
            document.version, FORMAT_VERSION
        ));
    }

    let mut expenses = Vec::with_capacity(document.expenses.len());
    for record in document.expenses {
        if record.id == 0 {
            return Err("expense id 0 is not allowed".to_string());
        }
        let expense = Expense::new(record.id, record.amount_cents, record.description)
            .map_err(|e| format!("expense {}: {e}", record.id))?;
        expenses.push(expense);
    }

    Ledger::from_expenses(expenses).map_err(|e| e.to_string())
}
