//! Persistence behind a narrow atomic-unit interface.
//!
//! Every service operation opens one [`UnitOfWork`] with [`Store::begin`],
//! runs its reads and writes through it and calls [`UnitOfWork::commit`].
//! Dropping a unit without committing rolls all of its writes back.

// Only used through generics, never as trait objects.
#![allow(async_fn_in_trait)]

mod memory;
mod sqlite;

pub use memory::*;
pub use sqlite::*;

use anyhow::Result;

use crate::domain::{
    Category, CategoryId, Cents, Transaction, TransactionFilter, TransactionId, Transfer,
    TransferId, Wallet, WalletId,
};

/// SQL migration for initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// A source of atomic units.
pub trait Store {
    type Unit<'a>: UnitOfWork
    where
        Self: 'a;

    /// Start an atomic unit. Writes made through it become visible to other
    /// units only after `commit`.
    async fn begin(&self) -> Result<Self::Unit<'_>>;
}

/// Reads and writes inside one atomic unit.
///
/// Updates and deletes of a row that does not exist are errors. Existence
/// checks that callers want to report as "not found" go through the `get_*`
/// methods first.
pub trait UnitOfWork {
    // Wallets

    async fn get_wallet(&mut self, id: WalletId) -> Result<Option<Wallet>>;

    /// All wallets, default first, then by name.
    async fn list_wallets(&mut self) -> Result<Vec<Wallet>>;

    async fn count_wallets(&mut self) -> Result<i64>;

    async fn insert_wallet(&mut self, wallet: &Wallet) -> Result<()>;

    /// Overwrite every stored field of the wallet, including the default flag.
    async fn update_wallet(&mut self, wallet: &Wallet) -> Result<()>;

    async fn delete_wallet(&mut self, id: WalletId) -> Result<()>;

    /// Clear the default flag on every wallet except `keep`.
    async fn clear_default(&mut self, keep: Option<WalletId>) -> Result<()>;

    /// The earliest created wallet other than `id` (ties broken by id).
    async fn oldest_wallet_except(&mut self, id: WalletId) -> Result<Option<Wallet>>;

    /// Add a signed delta to a wallet's stored amount.
    async fn adjust_wallet_amount(&mut self, id: WalletId, delta: Cents) -> Result<()>;

    // Categories

    async fn get_category(&mut self, id: CategoryId) -> Result<Option<Category>>;

    /// All categories, grouped by type, then by name.
    async fn list_categories(&mut self) -> Result<Vec<Category>>;

    async fn insert_category(&mut self, category: &Category) -> Result<()>;

    async fn update_category(&mut self, category: &Category) -> Result<()>;

    async fn delete_category(&mut self, id: CategoryId) -> Result<()>;

    // Transactions

    async fn get_transaction(&mut self, id: TransactionId) -> Result<Option<Transaction>>;

    /// Matching transactions, newest `transaction_date` first, then newest
    /// `created_at`.
    async fn list_transactions(&mut self, filter: &TransactionFilter) -> Result<Vec<Transaction>>;

    async fn count_transactions(&mut self, filter: &TransactionFilter) -> Result<i64>;

    async fn insert_transaction(&mut self, tx: &Transaction) -> Result<()>;

    async fn update_transaction(&mut self, tx: &Transaction) -> Result<()>;

    async fn delete_transaction(&mut self, id: TransactionId) -> Result<()>;

    // Transfers

    async fn get_transfer(&mut self, id: TransferId) -> Result<Option<Transfer>>;

    /// All transfers, newest `transfer_date` first, then newest `created_at`.
    async fn list_transfers(&mut self) -> Result<Vec<Transfer>>;

    /// Transfers with the wallet on either side.
    async fn count_transfers_for_wallet(&mut self, id: WalletId) -> Result<i64>;

    async fn insert_transfer(&mut self, transfer: &Transfer) -> Result<()>;

    async fn delete_transfer(&mut self, id: TransferId) -> Result<()>;

    /// Make every write of this unit durable.
    async fn commit(self) -> Result<()>;
}
