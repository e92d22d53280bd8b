// Application layer: use cases shared by every front end.

pub mod error;
pub mod report;
pub mod service;

pub use error::*;
pub use report::*;
pub use service::*;
