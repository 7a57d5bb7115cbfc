use crate::domain::{
    Category, CategoryDraft, CategoryId, Cents, DEFAULT_PAGE_SIZE, Effect, Page, Transaction,
    TransactionDraft, TransactionFilter, TransactionId, Transfer, TransferDraft, TransferId,
    Wallet, WalletDraft, WalletId, default_categories, default_wallets, edit_effects,
    net_by_wallet,
};
use crate::storage::{MemoryStore, SqliteStore, Store, UnitOfWork};

use super::reporting::{MonthlySummary, RECENT_TRANSACTIONS, month_bounds, summarize_month};
use super::AppError;

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI, web handler, tests).
///
/// Every mutating operation runs in exactly one atomic unit of the store, so
/// ledger records and wallet amounts always change together or not at all.
pub struct LedgerService<S> {
    store: S,
}

/// A wallet together with the number of transactions recorded against it.
#[derive(Debug, Clone)]
pub struct WalletEntry {
    pub wallet: Wallet,
    pub transaction_count: i64,
}

/// A category together with the number of transactions using it.
#[derive(Debug, Clone)]
pub struct CategoryEntry {
    pub category: Category,
    pub transaction_count: i64,
}

/// What `seed_defaults` inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedResult {
    pub wallets: usize,
    pub categories: usize,
}

impl LedgerService<SqliteStore> {
    /// Initialize a database at the given path, creating it if needed.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let store = SqliteStore::init(&db_url).await?;
        Ok(Self::new(store))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let store = SqliteStore::connect(&db_url).await?;
        Ok(Self::new(store))
    }
}

impl LedgerService<MemoryStore> {
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: Store> LedgerService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Insert the stock wallets and categories into an empty store.
    /// Each table is only seeded when it has no rows.
    pub async fn seed_defaults(&self) -> Result<SeedResult, AppError> {
        let mut unit = self.store.begin().await?;
        let mut result = SeedResult {
            wallets: 0,
            categories: 0,
        };

        if unit.count_wallets().await? == 0 {
            for draft in default_wallets() {
                unit.insert_wallet(&Wallet::from_draft(draft)).await?;
                result.wallets += 1;
            }
        }

        if unit.list_categories().await?.is_empty() {
            for draft in default_categories() {
                unit.insert_category(&Category::from_draft(draft)).await?;
                result.categories += 1;
            }
        }

        unit.commit().await?;
        tracing::info!(
            wallets = result.wallets,
            categories = result.categories,
            "seeded defaults"
        );
        Ok(result)
    }

    // ========================
    // Wallet operations
    // ========================

    /// Create a wallet. The first wallet in the store always becomes the
    /// default; requesting default on a later one takes it over.
    pub async fn create_wallet(&self, draft: WalletDraft) -> Result<Wallet, AppError> {
        validate_wallet_draft(&draft)?;

        let mut unit = self.store.begin().await?;
        let mut wallet = Wallet::from_draft(draft);

        if unit.count_wallets().await? == 0 {
            wallet.is_default = true;
        } else if wallet.is_default {
            unit.clear_default(None).await?;
        }
        unit.insert_wallet(&wallet).await?;
        unit.commit().await?;

        tracing::info!(
            wallet_id = %wallet.id,
            name = %wallet.name,
            is_default = wallet.is_default,
            "wallet created"
        );
        Ok(wallet)
    }

    /// Edit a wallet. Setting the amount overwrites the stored total.
    /// `is_default = false` never unsets the current default; the default
    /// only moves when another wallet claims it.
    pub async fn update_wallet(&self, id: WalletId, draft: WalletDraft) -> Result<Wallet, AppError> {
        validate_wallet_draft(&draft)?;

        let mut unit = self.store.begin().await?;
        let mut wallet = require_wallet(&mut unit, id).await?;

        wallet.apply_draft(&draft);
        if draft.is_default {
            unit.clear_default(Some(id)).await?;
            wallet.is_default = true;
        }
        unit.update_wallet(&wallet).await?;
        unit.commit().await?;

        tracing::info!(wallet_id = %id, is_default = wallet.is_default, "wallet updated");
        Ok(wallet)
    }

    /// Delete a wallet with no ledger entries. Never deletes the last wallet;
    /// deleting the default hands the flag to the oldest remaining wallet.
    pub async fn delete_wallet(&self, id: WalletId) -> Result<Wallet, AppError> {
        let mut unit = self.store.begin().await?;
        let wallet = require_wallet(&mut unit, id).await?;

        let by_wallet = TransactionFilter {
            wallet_id: Some(id),
            ..Default::default()
        };
        let dependents = unit.count_transactions(&by_wallet).await?
            + unit.count_transfers_for_wallet(id).await?;
        if dependents > 0 {
            tracing::debug!(wallet_id = %id, dependents, "wallet delete blocked");
            return Err(AppError::HasDependents {
                entity: "wallet",
                id,
                count: dependents,
            });
        }

        if unit.count_wallets().await? <= 1 {
            return Err(AppError::LastWallet);
        }

        if wallet.is_default {
            let mut successor = unit
                .oldest_wallet_except(id)
                .await?
                .ok_or(AppError::LastWallet)?;
            successor.is_default = true;
            unit.update_wallet(&successor).await?;
            tracing::info!(wallet_id = %successor.id, "default wallet promoted");
        }

        unit.delete_wallet(id).await?;
        unit.commit().await?;

        tracing::info!(wallet_id = %id, name = %wallet.name, "wallet deleted");
        Ok(wallet)
    }

    /// Make `id` the one default wallet.
    pub async fn set_default(&self, id: WalletId) -> Result<Wallet, AppError> {
        let mut unit = self.store.begin().await?;
        let mut wallet = require_wallet(&mut unit, id).await?;

        unit.clear_default(None).await?;
        wallet.is_default = true;
        unit.update_wallet(&wallet).await?;
        unit.commit().await?;

        tracing::info!(wallet_id = %id, "default wallet set");
        Ok(wallet)
    }

    pub async fn get_wallet(&self, id: WalletId) -> Result<Wallet, AppError> {
        let mut unit = self.store.begin().await?;
        require_wallet(&mut unit, id).await
    }

    /// The wallet pre-selected for new transactions, if any wallet exists.
    pub async fn default_wallet(&self) -> Result<Option<Wallet>, AppError> {
        let mut unit = self.store.begin().await?;
        let wallets = unit.list_wallets().await?;
        Ok(wallets.into_iter().find(|w| w.is_default))
    }

    /// All wallets, default first, then by name.
    pub async fn list_wallets(&self) -> Result<Vec<WalletEntry>, AppError> {
        let mut unit = self.store.begin().await?;
        let wallets = unit.list_wallets().await?;

        let mut entries = Vec::with_capacity(wallets.len());
        for wallet in wallets {
            let filter = TransactionFilter {
                wallet_id: Some(wallet.id),
                ..Default::default()
            };
            let transaction_count = unit.count_transactions(&filter).await?;
            entries.push(WalletEntry {
                wallet,
                transaction_count,
            });
        }
        Ok(entries)
    }

    /// Sum of all wallet amounts.
    pub async fn total_balance(&self) -> Result<Cents, AppError> {
        let mut unit = self.store.begin().await?;
        let wallets = unit.list_wallets().await?;
        Ok(wallets.iter().map(|w| w.amount_cents).sum())
    }

    // ========================
    // Category operations
    // ========================

    pub async fn create_category(&self, draft: CategoryDraft) -> Result<Category, AppError> {
        validate_name(&draft.name)?;

        let mut unit = self.store.begin().await?;
        let category = Category::from_draft(draft);
        unit.insert_category(&category).await?;
        unit.commit().await?;

        tracing::info!(category_id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    pub async fn update_category(
        &self,
        id: CategoryId,
        draft: CategoryDraft,
    ) -> Result<Category, AppError> {
        validate_name(&draft.name)?;

        let mut unit = self.store.begin().await?;
        let mut category = require_category(&mut unit, id).await?;
        category.apply_draft(&draft);
        unit.update_category(&category).await?;
        unit.commit().await?;

        tracing::info!(category_id = %id, "category updated");
        Ok(category)
    }

    /// Delete a category that no transaction references.
    pub async fn delete_category(&self, id: CategoryId) -> Result<Category, AppError> {
        let mut unit = self.store.begin().await?;
        let category = require_category(&mut unit, id).await?;

        let by_category = TransactionFilter {
            category_id: Some(id),
            ..Default::default()
        };
        let dependents = unit.count_transactions(&by_category).await?;
        if dependents > 0 {
            tracing::debug!(category_id = %id, dependents, "category delete blocked");
            return Err(AppError::HasDependents {
                entity: "category",
                id,
                count: dependents,
            });
        }

        unit.delete_category(id).await?;
        unit.commit().await?;

        tracing::info!(category_id = %id, name = %category.name, "category deleted");
        Ok(category)
    }

    pub async fn get_category(&self, id: CategoryId) -> Result<Category, AppError> {
        let mut unit = self.store.begin().await?;
        require_category(&mut unit, id).await
    }

    /// All categories, income first, then by name.
    pub async fn list_categories(&self) -> Result<Vec<CategoryEntry>, AppError> {
        let mut unit = self.store.begin().await?;
        let categories = unit.list_categories().await?;

        let mut entries = Vec::with_capacity(categories.len());
        for category in categories {
            let filter = TransactionFilter {
                category_id: Some(category.id),
                ..Default::default()
            };
            let transaction_count = unit.count_transactions(&filter).await?;
            entries.push(CategoryEntry {
                category,
                transaction_count,
            });
        }
        Ok(entries)
    }

    // ========================
    // Transaction operations
    // ========================

    /// Record a transaction and apply its effect to its wallet.
    pub async fn create_transaction(
        &self,
        draft: TransactionDraft,
    ) -> Result<Transaction, AppError> {
        validate_transaction_amount(draft.amount_cents)?;

        let mut unit = self.store.begin().await?;
        require_category(&mut unit, draft.category_id).await?;

        let tx = Transaction::from_draft(draft);
        apply_effect(&mut unit, tx.effect()).await?;
        unit.insert_transaction(&tx).await?;
        unit.commit().await?;

        tracing::info!(
            transaction_id = %tx.id,
            wallet_id = %tx.wallet_id,
            kind = %tx.transaction_type,
            amount_cents = tx.amount_cents,
            "transaction created"
        );
        Ok(tx)
    }

    /// Edit a transaction: undo its old effect on the old wallet, apply the
    /// new effect on the new wallet, then store the new fields.
    pub async fn update_transaction(
        &self,
        id: TransactionId,
        draft: TransactionDraft,
    ) -> Result<Transaction, AppError> {
        let mut unit = self.store.begin().await?;
        let mut tx = require_transaction(&mut unit, id).await?;

        validate_transaction_amount(draft.amount_cents)?;
        require_category(&mut unit, draft.category_id).await?;

        let effects = edit_effects(&tx, &draft);
        tracing::debug!(transaction_id = %id, net = ?net_by_wallet(&effects), "editing transaction");
        for effect in effects {
            apply_effect(&mut unit, effect).await?;
        }
        tx.apply_draft(draft);
        unit.update_transaction(&tx).await?;
        unit.commit().await?;

        tracing::info!(
            transaction_id = %id,
            wallet_id = %tx.wallet_id,
            kind = %tx.transaction_type,
            amount_cents = tx.amount_cents,
            "transaction updated"
        );
        Ok(tx)
    }

    /// Undo a transaction's effect on its wallet and remove it.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<Transaction, AppError> {
        let mut unit = self.store.begin().await?;
        let tx = require_transaction(&mut unit, id).await?;

        apply_effect(&mut unit, tx.effect().reversed()).await?;
        unit.delete_transaction(id).await?;
        unit.commit().await?;

        tracing::info!(transaction_id = %id, wallet_id = %tx.wallet_id, "transaction deleted");
        Ok(tx)
    }

    pub async fn get_transaction(&self, id: TransactionId) -> Result<Transaction, AppError> {
        let mut unit = self.store.begin().await?;
        require_transaction(&mut unit, id).await
    }

    /// One page of matching transactions, newest first.
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        page: usize,
    ) -> Result<Page<Transaction>, AppError> {
        let mut unit = self.store.begin().await?;
        let all = unit.list_transactions(filter).await?;
        Ok(Page::slice(all, page, DEFAULT_PAGE_SIZE))
    }

    // ========================
    // Transfer operations
    // ========================

    /// Move money between two wallets. The source must hold at least the
    /// amount when the transfer is made.
    pub async fn create_transfer(&self, draft: TransferDraft) -> Result<Transfer, AppError> {
        if draft.from_wallet == draft.to_wallet {
            return Err(AppError::SameWallet);
        }
        if draft.amount_cents <= 0 {
            return Err(AppError::InvalidAmount(
                "Transfer amount must be positive".to_string(),
            ));
        }

        let mut unit = self.store.begin().await?;
        let source = require_wallet(&mut unit, draft.from_wallet).await?;
        if source.amount_cents < draft.amount_cents {
            tracing::debug!(
                wallet_id = %source.id,
                balance = source.amount_cents,
                required = draft.amount_cents,
                "transfer rejected"
            );
            return Err(AppError::InsufficientFunds {
                wallet_name: source.name,
                balance: source.amount_cents,
                required: draft.amount_cents,
            });
        }

        let transfer = Transfer::from_draft(draft);
        // A missing destination surfaces here, after the debit, and the
        // whole unit is dropped.
        for effect in transfer.effects() {
            apply_effect(&mut unit, effect).await?;
        }
        unit.insert_transfer(&transfer).await?;
        unit.commit().await?;

        tracing::info!(
            transfer_id = %transfer.id,
            from = %transfer.from_wallet,
            to = %transfer.to_wallet,
            amount_cents = transfer.amount_cents,
            "transfer created"
        );
        Ok(transfer)
    }

    /// Cancel a transfer: credit the source, debit the destination, remove
    /// the record. The destination may go negative.
    pub async fn delete_transfer(&self, id: TransferId) -> Result<Transfer, AppError> {
        let mut unit = self.store.begin().await?;
        let transfer = unit
            .get_transfer(id)
            .await?
            .ok_or_else(|| AppError::TransferNotFound(id.to_string()))?;

        for effect in transfer.reversal_effects() {
            apply_effect(&mut unit, effect).await?;
        }
        unit.delete_transfer(id).await?;
        unit.commit().await?;

        tracing::info!(
            transfer_id = %id,
            amount_cents = transfer.amount_cents,
            "transfer deleted"
        );
        Ok(transfer)
    }

    pub async fn get_transfer(&self, id: TransferId) -> Result<Transfer, AppError> {
        let mut unit = self.store.begin().await?;
        unit.get_transfer(id)
            .await?
            .ok_or_else(|| AppError::TransferNotFound(id.to_string()))
    }

    /// One page of transfers, newest first.
    pub async fn list_transfers(&self, page: usize) -> Result<Page<Transfer>, AppError> {
        let mut unit = self.store.begin().await?;
        let all = unit.list_transfers().await?;
        Ok(Page::slice(all, page, DEFAULT_PAGE_SIZE))
    }

    // ========================
    // Reporting
    // ========================

    /// Income, expense and per-category totals for one calendar month.
    pub async fn monthly_summary(&self, year: i32, month: u32) -> Result<MonthlySummary, AppError> {
        let (start, end) = month_bounds(year, month)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid month {}-{}", year, month)))?;

        let mut unit = self.store.begin().await?;
        let in_month = unit
            .list_transactions(&TransactionFilter {
                start_date: Some(start),
                end_date: Some(end),
                ..Default::default()
            })
            .await?;
        let mut recent = unit
            .list_transactions(&TransactionFilter::default())
            .await?;
        recent.truncate(RECENT_TRANSACTIONS);
        let categories = unit.list_categories().await?;

        Ok(summarize_month(start, end, &in_month, recent, &categories))
    }
}

/// Apply one effect to its wallet. The wallet must exist.
async fn apply_effect<U: UnitOfWork>(unit: &mut U, effect: Effect) -> Result<(), AppError> {
    require_wallet(unit, effect.wallet).await?;
    unit.adjust_wallet_amount(effect.wallet, effect.delta).await?;
    Ok(())
}

async fn require_wallet<U: UnitOfWork>(unit: &mut U, id: WalletId) -> Result<Wallet, AppError> {
    unit.get_wallet(id)
        .await?
        .ok_or_else(|| AppError::WalletNotFound(id.to_string()))
}

async fn require_category<U: UnitOfWork>(
    unit: &mut U,
    id: CategoryId,
) -> Result<Category, AppError> {
    unit.get_category(id)
        .await?
        .ok_or_else(|| AppError::CategoryNotFound(id.to_string()))
}

async fn require_transaction<U: UnitOfWork>(
    unit: &mut U,
    id: TransactionId,
) -> Result<Transaction, AppError> {
    unit.get_transaction(id)
        .await?
        .ok_or_else(|| AppError::TransactionNotFound(id.to_string()))
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidInput("Name must not be empty".to_string()));
    }
    Ok(())
}

fn validate_wallet_draft(draft: &WalletDraft) -> Result<(), AppError> {
    validate_name(&draft.name)?;
    if draft.amount_cents < 0 {
        return Err(AppError::InvalidAmount(
            "Wallet amount must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_transaction_amount(amount_cents: Cents) -> Result<(), AppError> {
    if amount_cents < 0 {
        return Err(AppError::InvalidAmount(
            "Transaction amount must not be negative".to_string(),
        ));
    }
    Ok(())
}
