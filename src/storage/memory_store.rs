use std::cell::{Cell, RefCell};
use std::path::PathBuf;

use crate::domain::Ledger;

use super::{codec, LedgerStore, StoreError};

/// Store that keeps the encoded ledger in memory. Goes through the same
/// codec as [`FileStore`](super::FileStore), so it behaves the same way
/// minus the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bytes: RefCell<Option<Vec<u8>>>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw stored bytes, e.g. to simulate a damaged file.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: RefCell::new(Some(bytes.into())),
            saves: Cell::new(0),
        }
    }

    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.bytes.borrow().clone()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> Result<Ledger, StoreError> {
        match self.bytes.borrow().as_deref() {
            None => Ok(Ledger::new()),
            Some(bytes) => codec::decode(bytes).map_err(|reason| StoreError::Corrupt {
                path: PathBuf::from(":memory:"),
                reason,
            }),
        }
    }

    fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        let bytes = codec::encode(ledger)
            .map_err(|e| StoreError::io("encode", ":memory:", e.into()))?;
        *self.bytes.borrow_mut() = Some(bytes);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
