pub mod application;
pub mod cli;
pub mod domain;
pub mod storage;

pub use application::{AppError, ErrorKind, LedgerService};
pub use domain::*;
pub use storage::{MemoryStore, SqliteStore, Store, UnitOfWork};
