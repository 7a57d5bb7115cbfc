use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Cents, format_cents};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Transfer not found: {0}")]
    TransferNotFound(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Source and destination wallet must differ")]
    SameWallet,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "Insufficient funds in wallet {wallet_name}: balance {}, required {}",
        money(.balance),
        money(.required)
    )]
    InsufficientFunds {
        wallet_name: String,
        balance: Cents,
        required: Cents,
    },

    #[error("Cannot delete {entity} {id}: still referenced by {count} ledger entries")]
    HasDependents {
        entity: &'static str,
        id: Uuid,
        count: i64,
    },

    #[error("Cannot delete the last remaining wallet")]
    LastWallet,

    #[error("Storage error, changes rolled back: {0:#}")]
    Storage(#[from] anyhow::Error),
}

fn money(cents: &Cents) -> String {
    format_cents(*cents)
}

/// Transport-independent classification of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    InsufficientFunds,
    HasDependents,
    LastWallet,
    AtomicUnitFailure,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::WalletNotFound(_)
            | AppError::CategoryNotFound(_)
            | AppError::TransactionNotFound(_)
            | AppError::TransferNotFound(_) => ErrorKind::NotFound,
            AppError::InvalidAmount(_) | AppError::SameWallet | AppError::InvalidInput(_) => {
                ErrorKind::InvalidInput
            }
            AppError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            AppError::HasDependents { .. } => ErrorKind::HasDependents,
            AppError::LastWallet => ErrorKind::LastWallet,
            AppError::Storage(_) => ErrorKind::AtomicUnitFailure,
        }
    }
}
