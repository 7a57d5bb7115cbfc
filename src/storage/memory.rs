use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Result, anyhow, bail};
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{
    Category, CategoryId, Cents, Transaction, TransactionFilter, TransactionId, Transfer,
    TransferId, Wallet, WalletId,
};

use super::{Store, UnitOfWork};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    wallets: BTreeMap<WalletId, Wallet>,
    categories: BTreeMap<CategoryId, Category>,
    transactions: BTreeMap<TransactionId, Transaction>,
    transfers: BTreeMap<TransferId, Transfer>,
}

/// In-process store.
///
/// A unit holds the store lock for its whole lifetime and works on a copy of
/// the state; `commit` swaps the copy in. Units are therefore serialized and
/// an uncommitted unit leaves no trace.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    fail_next_commit: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `commit` fail after all of the unit's writes were made.
    /// Used to exercise rollback paths.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }
}

impl Store for MemoryStore {
    type Unit<'a>
        = MemoryUnit<'a>
    where
        Self: 'a;

    async fn begin(&self) -> Result<Self::Unit<'_>> {
        let guard = self.state.lock().await;
        let working = guard.clone();
        Ok(MemoryUnit {
            guard,
            working,
            fail_commit: &self.fail_next_commit,
        })
    }
}

pub struct MemoryUnit<'a> {
    guard: MutexGuard<'a, MemoryState>,
    working: MemoryState,
    fail_commit: &'a AtomicBool,
}

impl UnitOfWork for MemoryUnit<'_> {
    async fn get_wallet(&mut self, id: WalletId) -> Result<Option<Wallet>> {
        Ok(self.working.wallets.get(&id).cloned())
    }

    async fn list_wallets(&mut self) -> Result<Vec<Wallet>> {
        let mut wallets: Vec<Wallet> = self.working.wallets.values().cloned().collect();
        wallets.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(wallets)
    }

    async fn count_wallets(&mut self) -> Result<i64> {
        Ok(self.working.wallets.len() as i64)
    }

    async fn insert_wallet(&mut self, wallet: &Wallet) -> Result<()> {
        if self.working.wallets.contains_key(&wallet.id) {
            bail!("Duplicate wallet id {}", wallet.id);
        }
        self.working.wallets.insert(wallet.id, wallet.clone());
        Ok(())
    }

    async fn update_wallet(&mut self, wallet: &Wallet) -> Result<()> {
        let stored = self
            .working
            .wallets
            .get_mut(&wallet.id)
            .ok_or_else(|| anyhow!("No wallet row to update for {}", wallet.id))?;
        *stored = wallet.clone();
        Ok(())
    }

    async fn delete_wallet(&mut self, id: WalletId) -> Result<()> {
        self.working
            .wallets
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("No wallet row to delete for {}", id))
    }

    async fn clear_default(&mut self, keep: Option<WalletId>) -> Result<()> {
        for wallet in self.working.wallets.values_mut() {
            if Some(wallet.id) != keep {
                wallet.is_default = false;
            }
        }
        Ok(())
    }

    async fn oldest_wallet_except(&mut self, id: WalletId) -> Result<Option<Wallet>> {
        Ok(self
            .working
            .wallets
            .values()
            .filter(|w| w.id != id)
            .min_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)))
            .cloned())
    }

    async fn adjust_wallet_amount(&mut self, id: WalletId, delta: Cents) -> Result<()> {
        let wallet = self
            .working
            .wallets
            .get_mut(&id)
            .ok_or_else(|| anyhow!("No wallet row to adjust for {}", id))?;
        wallet.amount_cents = wallet
            .amount_cents
            .checked_add(delta)
            .ok_or_else(|| anyhow!("Wallet amount overflow for {}", id))?;
        Ok(())
    }

    async fn get_category(&mut self, id: CategoryId) -> Result<Option<Category>> {
        Ok(self.working.categories.get(&id).cloned())
    }

    async fn list_categories(&mut self) -> Result<Vec<Category>> {
        let mut categories: Vec<Category> = self.working.categories.values().cloned().collect();
        // income before expense, matching the text ordering used by SQLite
        categories.sort_by(|a, b| {
            b.category_type
                .as_str()
                .cmp(a.category_type.as_str())
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(categories)
    }

    async fn insert_category(&mut self, category: &Category) -> Result<()> {
        if self.working.categories.contains_key(&category.id) {
            bail!("Duplicate category id {}", category.id);
        }
        self.working.categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn update_category(&mut self, category: &Category) -> Result<()> {
        let stored = self
            .working
            .categories
            .get_mut(&category.id)
            .ok_or_else(|| anyhow!("No category row to update for {}", category.id))?;
        *stored = category.clone();
        Ok(())
    }

    async fn delete_category(&mut self, id: CategoryId) -> Result<()> {
        self.working
            .categories
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("No category row to delete for {}", id))
    }

    async fn get_transaction(&mut self, id: TransactionId) -> Result<Option<Transaction>> {
        Ok(self.working.transactions.get(&id).cloned())
    }

    async fn list_transactions(&mut self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .working
            .transactions
            .values()
            .filter(|tx| filter.matches(tx))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| {
            b.transaction_date
                .cmp(&a.transaction_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(transactions)
    }

    async fn count_transactions(&mut self, filter: &TransactionFilter) -> Result<i64> {
        Ok(self
            .working
            .transactions
            .values()
            .filter(|tx| filter.matches(tx))
            .count() as i64)
    }

    async fn insert_transaction(&mut self, tx: &Transaction) -> Result<()> {
        if self.working.transactions.contains_key(&tx.id) {
            bail!("Duplicate transaction id {}", tx.id);
        }
        self.working.transactions.insert(tx.id, tx.clone());
        Ok(())
    }

    async fn update_transaction(&mut self, tx: &Transaction) -> Result<()> {
        let stored = self
            .working
            .transactions
            .get_mut(&tx.id)
            .ok_or_else(|| anyhow!("No transaction row to update for {}", tx.id))?;
        *stored = tx.clone();
        Ok(())
    }

    async fn delete_transaction(&mut self, id: TransactionId) -> Result<()> {
        self.working
            .transactions
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("No transaction row to delete for {}", id))
    }

    async fn get_transfer(&mut self, id: TransferId) -> Result<Option<Transfer>> {
        Ok(self.working.transfers.get(&id).cloned())
    }

    async fn list_transfers(&mut self) -> Result<Vec<Transfer>> {
        let mut transfers: Vec<Transfer> = self.working.transfers.values().cloned().collect();
        transfers.sort_by(|a, b| {
            b.transfer_date
                .cmp(&a.transfer_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(transfers)
    }

    async fn count_transfers_for_wallet(&mut self, id: WalletId) -> Result<i64> {
        Ok(self
            .working
            .transfers
            .values()
            .filter(|t| t.from_wallet == id || t.to_wallet == id)
            .count() as i64)
    }

    async fn insert_transfer(&mut self, transfer: &Transfer) -> Result<()> {
        if self.working.transfers.contains_key(&transfer.id) {
            bail!("Duplicate transfer id {}", transfer.id);
        }
        self.working.transfers.insert(transfer.id, transfer.clone());
        Ok(())
    }

    async fn delete_transfer(&mut self, id: TransferId) -> Result<()> {
        self.working
            .transfers
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("No transfer row to delete for {}", id))
    }

    async fn commit(mut self) -> Result<()> {
        if self.fail_commit.swap(false, Ordering::SeqCst) {
            bail!("Injected commit failure");
        }
        *self.guard = std::mem::take(&mut self.working);
        Ok(())
    }
}
