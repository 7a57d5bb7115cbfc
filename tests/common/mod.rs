// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use dompet::application::LedgerService;
use dompet::domain::{Category, CategoryDraft, Cents, TransactionType, Wallet, WalletDraft};
use dompet::storage::{MemoryStore, SqliteStore, Store};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService<SqliteStore>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to create a test service on the in-process store
pub fn memory_service() -> LedgerService<MemoryStore> {
    LedgerService::in_memory()
}

/// Helper to parse a date string into NaiveDate
pub fn date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: wallets A and B plus one category of each type
pub struct Fixture {
    pub a: Wallet,
    pub b: Wallet,
    pub salary: Category,
    pub food: Category,
}

impl Fixture {
    /// A holds 1,000.00 and is the default, B holds 500.00
    pub async fn create<S: Store>(service: &LedgerService<S>) -> Result<Self> {
        Self::with_amounts(service, 100_000, 50_000).await
    }

    pub async fn with_amounts<S: Store>(
        service: &LedgerService<S>,
        a: Cents,
        b: Cents,
    ) -> Result<Self> {
        let a = service.create_wallet(WalletDraft::new("A", a)).await?;
        let b = service.create_wallet(WalletDraft::new("B", b)).await?;
        let salary = service
            .create_category(CategoryDraft::new(
                "Salary",
                TransactionType::Income,
                "💼",
                "#10B981",
            ))
            .await?;
        let food = service
            .create_category(CategoryDraft::new(
                "Food",
                TransactionType::Expense,
                "🍔",
                "#EF4444",
            ))
            .await?;
        Ok(Self { a, b, salary, food })
    }
}

/// Current amount of a wallet
pub async fn amount<S: Store>(service: &LedgerService<S>, wallet: &Wallet) -> Result<Cents> {
    Ok(service.get_wallet(wallet.id).await?.amount_cents)
}

/// Number of wallets flagged as default
pub async fn default_count<S: Store>(service: &LedgerService<S>) -> Result<usize> {
    Ok(service
        .list_wallets()
        .await?
        .iter()
        .filter(|entry| entry.wallet.is_default)
        .count())
}
