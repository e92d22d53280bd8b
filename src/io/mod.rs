// CSV adapters between a ledger and external files.

pub mod export;
pub mod import;

pub use export::*;
pub use import::*;
