// Application layer - use cases over the storage units.
// Clients (the CLI, tests) only talk to `LedgerService`.

pub mod error;
pub mod reporting;
mod service;

pub use error::*;
pub use reporting::{CategoryTotal, MonthlySummary};
pub use service::*;
