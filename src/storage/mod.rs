mod codec;
mod error;
mod file_store;
mod memory_store;

pub use codec::{decode, encode, FORMAT_TAG, FORMAT_VERSION};
pub use error::*;
pub use file_store::*;
pub use memory_store::*;

use crate::domain::Ledger;

/// Durable home of a ledger. A command loads once, mutates in memory and
/// saves the whole ledger back.
pub trait LedgerStore {
    /// Missing storage yields an empty ledger; damaged storage is an error.
    fn load(&self) -> Result<Ledger, StoreError>;

    /// Replace the stored ledger as a single step.
    fn save(&self, ledger: &Ledger) -> Result<(), StoreError>;
}
