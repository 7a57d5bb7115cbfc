use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::domain::{
    Category, CategoryId, Cents, Transaction, TransactionFilter, TransactionId, TransactionType,
    Transfer, TransferId, Wallet, WalletId,
};

use super::{MIGRATION_001_INITIAL, Store, UnitOfWork};

const WALLET_COLUMNS: &str = "id, name, icon, color, amount_cents, is_default, created_at";
const CATEGORY_COLUMNS: &str = "id, name, category_type, icon, color, created_at";
const TRANSACTION_COLUMNS: &str = "id, category_id, wallet_id, transaction_type, amount_cents, description, transaction_date, created_at, updated_at";
const TRANSFER_COLUMNS: &str =
    "id, from_wallet_id, to_wallet_id, amount_cents, description, transfer_date, created_at";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// How long a unit waits for another writer before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// SQLite-backed store. Each atomic unit is one `BEGIN IMMEDIATE`
/// transaction, so units that touch the database queue behind the current
/// writer instead of failing on a lock upgrade.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new store with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid database URL")?
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations. Safe to run more than once.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let store = Self::connect(database_url).await?;
        store.migrate().await?;
        Ok(store)
    }
}

impl Store for SqliteStore {
    type Unit<'a>
        = SqliteUnit
    where
        Self: 'a;

    async fn begin(&self) -> Result<Self::Unit<'_>> {
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .context("Failed to begin database transaction")?;
        Ok(SqliteUnit { tx })
    }
}

/// An open SQLite transaction. Dropping it without `commit` rolls back.
pub struct SqliteUnit {
    tx: sqlx::Transaction<'static, Sqlite>,
}

impl UnitOfWork for SqliteUnit {
    // ========================
    // Wallet operations
    // ========================

    async fn get_wallet(&mut self, id: WalletId) -> Result<Option<Wallet>> {
        let row = sqlx::query(&format!(
            "SELECT {WALLET_COLUMNS} FROM wallets WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&mut *self.tx)
        .await
        .context("Failed to fetch wallet")?;

        row.as_ref().map(row_to_wallet).transpose()
    }

    async fn list_wallets(&mut self) -> Result<Vec<Wallet>> {
        let rows = sqlx::query(&format!(
            "SELECT {WALLET_COLUMNS} FROM wallets ORDER BY is_default DESC, name, id"
        ))
        .fetch_all(&mut *self.tx)
        .await
        .context("Failed to list wallets")?;

        rows.iter().map(row_to_wallet).collect()
    }

    async fn count_wallets(&mut self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM wallets")
            .fetch_one(&mut *self.tx)
            .await
            .context("Failed to count wallets")?;
        Ok(row.get("count"))
    }

    async fn insert_wallet(&mut self, wallet: &Wallet) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO wallets (id, name, icon, color, amount_cents, is_default, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(wallet.id.to_string())
        .bind(&wallet.name)
        .bind(&wallet.icon)
        .bind(&wallet.color)
        .bind(wallet.amount_cents)
        .bind(wallet.is_default)
        .bind(timestamp(wallet.created_at))
        .execute(&mut *self.tx)
        .await
        .context("Failed to save wallet")?;
        Ok(())
    }

    async fn update_wallet(&mut self, wallet: &Wallet) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE wallets
            SET name = ?, icon = ?, color = ?, amount_cents = ?, is_default = ?
            WHERE id = ?
            "#,
        )
        .bind(&wallet.name)
        .bind(&wallet.icon)
        .bind(&wallet.color)
        .bind(wallet.amount_cents)
        .bind(wallet.is_default)
        .bind(wallet.id.to_string())
        .execute(&mut *self.tx)
        .await
        .context("Failed to update wallet")?;

        if result.rows_affected() == 0 {
            bail!("No wallet row to update for {}", wallet.id);
        }
        Ok(())
    }

    async fn delete_wallet(&mut self, id: WalletId) -> Result<()> {
        let result = sqlx::query("DELETE FROM wallets WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *self.tx)
            .await
            .context("Failed to delete wallet")?;

        if result.rows_affected() == 0 {
            bail!("No wallet row to delete for {}", id);
        }
        Ok(())
    }

    async fn clear_default(&mut self, keep: Option<WalletId>) -> Result<()> {
        let keep = keep.map(|id| id.to_string()).unwrap_or_default();
        sqlx::query("UPDATE wallets SET is_default = 0 WHERE is_default <> 0 AND id <> ?")
            .bind(keep)
            .execute(&mut *self.tx)
            .await
            .context("Failed to clear default wallet")?;
        Ok(())
    }

    async fn oldest_wallet_except(&mut self, id: WalletId) -> Result<Option<Wallet>> {
        let row = sqlx::query(&format!(
            "SELECT {WALLET_COLUMNS} FROM wallets WHERE id <> ? ORDER BY created_at, id LIMIT 1"
        ))
        .bind(id.to_string())
        .fetch_optional(&mut *self.tx)
        .await
        .context("Failed to find replacement wallet")?;

        row.as_ref().map(row_to_wallet).transpose()
    }

    async fn adjust_wallet_amount(&mut self, id: WalletId, delta: Cents) -> Result<()> {
        let current: Option<Cents> =
            sqlx::query_scalar("SELECT amount_cents FROM wallets WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&mut *self.tx)
                .await
                .context("Failed to read wallet amount")?;

        let Some(current) = current else {
            bail!("No wallet row to adjust for {}", id);
        };
        let amount = current
            .checked_add(delta)
            .ok_or_else(|| anyhow!("Wallet amount overflow for {}", id))?;

        sqlx::query("UPDATE wallets SET amount_cents = ? WHERE id = ?")
            .bind(amount)
            .bind(id.to_string())
            .execute(&mut *self.tx)
            .await
            .context("Failed to adjust wallet amount")?;
        Ok(())
    }

    // ========================
    // Category operations
    // ========================

    async fn get_category(&mut self, id: CategoryId) -> Result<Option<Category>> {
        let row = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&mut *self.tx)
        .await
        .context("Failed to fetch category")?;

        row.as_ref().map(row_to_category).transpose()
    }

    async fn list_categories(&mut self) -> Result<Vec<Category>> {
        let rows = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY category_type DESC, name, id"
        ))
        .fetch_all(&mut *self.tx)
        .await
        .context("Failed to list categories")?;

        rows.iter().map(row_to_category).collect()
    }

    async fn insert_category(&mut self, category: &Category) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, category_type, icon, color, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(category.id.to_string())
        .bind(&category.name)
        .bind(category.category_type.as_str())
        .bind(&category.icon)
        .bind(&category.color)
        .bind(timestamp(category.created_at))
        .execute(&mut *self.tx)
        .await
        .context("Failed to save category")?;
        Ok(())
    }

    async fn update_category(&mut self, category: &Category) -> Result<()> {
        let result = sqlx::query(
            "UPDATE categories SET name = ?, category_type = ?, icon = ?, color = ? WHERE id = ?",
        )
        .bind(&category.name)
        .bind(category.category_type.as_str())
        .bind(&category.icon)
        .bind(&category.color)
        .bind(category.id.to_string())
        .execute(&mut *self.tx)
        .await
        .context("Failed to update category")?;

        if result.rows_affected() == 0 {
            bail!("No category row to update for {}", category.id);
        }
        Ok(())
    }

    async fn delete_category(&mut self, id: CategoryId) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *self.tx)
            .await
            .context("Failed to delete category")?;

        if result.rows_affected() == 0 {
            bail!("No category row to delete for {}", id);
        }
        Ok(())
    }

    // ========================
    // Transaction operations
    // ========================

    async fn get_transaction(&mut self, id: TransactionId) -> Result<Option<Transaction>> {
        let row = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&mut *self.tx)
        .await
        .context("Failed to fetch transaction")?;

        row.as_ref().map(row_to_transaction).transpose()
    }

    async fn list_transactions(&mut self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let (where_clause, bindings) = filter_clause(filter);
        let query = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions {where_clause} \
             ORDER BY transaction_date DESC, created_at DESC, id"
        );

        let rows = bind_all(sqlx::query(&query), &bindings)
            .fetch_all(&mut *self.tx)
            .await
            .context("Failed to list transactions")?;

        rows.iter().map(row_to_transaction).collect()
    }

    async fn count_transactions(&mut self, filter: &TransactionFilter) -> Result<i64> {
        let (where_clause, bindings) = filter_clause(filter);
        let query = format!("SELECT COUNT(*) as count FROM transactions {where_clause}");

        let row = bind_all(sqlx::query(&query), &bindings)
            .fetch_one(&mut *self.tx)
            .await
            .context("Failed to count transactions")?;

        Ok(row.get("count"))
    }

    async fn insert_transaction(&mut self, tx: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, category_id, wallet_id, transaction_type, amount_cents, description, transaction_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(tx.id.to_string())
        .bind(tx.category_id.to_string())
        .bind(tx.wallet_id.to_string())
        .bind(tx.transaction_type.as_str())
        .bind(tx.amount_cents)
        .bind(&tx.description)
        .bind(tx.transaction_date.format(DATE_FORMAT).to_string())
        .bind(timestamp(tx.created_at))
        .bind(timestamp(tx.updated_at))
        .execute(&mut *self.tx)
        .await
        .context("Failed to save transaction")?;
        Ok(())
    }

    async fn update_transaction(&mut self, tx: &Transaction) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET category_id = ?, wallet_id = ?, transaction_type = ?, amount_cents = ?,
                description = ?, transaction_date = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(tx.category_id.to_string())
        .bind(tx.wallet_id.to_string())
        .bind(tx.transaction_type.as_str())
        .bind(tx.amount_cents)
        .bind(&tx.description)
        .bind(tx.transaction_date.format(DATE_FORMAT).to_string())
        .bind(timestamp(tx.updated_at))
        .bind(tx.id.to_string())
        .execute(&mut *self.tx)
        .await
        .context("Failed to update transaction")?;

        if result.rows_affected() == 0 {
            bail!("No transaction row to update for {}", tx.id);
        }
        Ok(())
    }

    async fn delete_transaction(&mut self, id: TransactionId) -> Result<()> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *self.tx)
            .await
            .context("Failed to delete transaction")?;

        if result.rows_affected() == 0 {
            bail!("No transaction row to delete for {}", id);
        }
        Ok(())
    }

    // ========================
    // Transfer operations
    // ========================

    async fn get_transfer(&mut self, id: TransferId) -> Result<Option<Transfer>> {
        let row = sqlx::query(&format!(
            "SELECT {TRANSFER_COLUMNS} FROM transfers WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&mut *self.tx)
        .await
        .context("Failed to fetch transfer")?;

        row.as_ref().map(row_to_transfer).transpose()
    }

    async fn list_transfers(&mut self) -> Result<Vec<Transfer>> {
        let rows = sqlx::query(&format!(
            "SELECT {TRANSFER_COLUMNS} FROM transfers ORDER BY transfer_date DESC, created_at DESC, id"
        ))
        .fetch_all(&mut *self.tx)
        .await
        .context("Failed to list transfers")?;

        rows.iter().map(row_to_transfer).collect()
    }

    async fn count_transfers_for_wallet(&mut self, id: WalletId) -> Result<i64> {
        let id_str = id.to_string();
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM transfers WHERE from_wallet_id = ? OR to_wallet_id = ?",
        )
        .bind(&id_str)
        .bind(&id_str)
        .fetch_one(&mut *self.tx)
        .await
        .context("Failed to count transfers")?;

        Ok(row.get("count"))
    }

    async fn insert_transfer(&mut self, transfer: &Transfer) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transfers (id, from_wallet_id, to_wallet_id, amount_cents, description, transfer_date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transfer.id.to_string())
        .bind(transfer.from_wallet.to_string())
        .bind(transfer.to_wallet.to_string())
        .bind(transfer.amount_cents)
        .bind(&transfer.description)
        .bind(transfer.transfer_date.format(DATE_FORMAT).to_string())
        .bind(timestamp(transfer.created_at))
        .execute(&mut *self.tx)
        .await
        .context("Failed to save transfer")?;
        Ok(())
    }

    async fn delete_transfer(&mut self, id: TransferId) -> Result<()> {
        let result = sqlx::query("DELETE FROM transfers WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *self.tx)
            .await
            .context("Failed to delete transfer")?;

        if result.rows_affected() == 0 {
            bail!("No transfer row to delete for {}", id);
        }
        Ok(())
    }

    async fn commit(self) -> Result<()> {
        self.tx
            .commit()
            .await
            .context("Failed to commit database transaction")
    }
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str, what: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("Invalid {} timestamp", what))?
        .with_timezone(&Utc))
}

fn parse_date(s: &str, what: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).with_context(|| format!("Invalid {} date", what))
}

fn parse_id(s: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(s).with_context(|| format!("Invalid {} ID", what))
}

fn parse_type(s: &str) -> Result<TransactionType> {
    TransactionType::from_str(s).ok_or_else(|| anyhow::anyhow!("Invalid transaction type: {}", s))
}

/// Build the WHERE clause for a transaction filter. Every binding is text.
fn filter_clause(filter: &TransactionFilter) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut bindings = Vec::new();

    if let Some(t) = filter.transaction_type {
        conditions.push("transaction_type = ?");
        bindings.push(t.as_str().to_string());
    }
    if let Some(date) = filter.start_date {
        conditions.push("transaction_date >= ?");
        bindings.push(date.format(DATE_FORMAT).to_string());
    }
    if let Some(date) = filter.end_date {
        conditions.push("transaction_date <= ?");
        bindings.push(date.format(DATE_FORMAT).to_string());
    }
    if let Some(id) = filter.category_id {
        conditions.push("category_id = ?");
        bindings.push(id.to_string());
    }
    if let Some(id) = filter.wallet_id {
        conditions.push("wallet_id = ?");
        bindings.push(id.to_string());
    }

    if conditions.is_empty() {
        (String::new(), bindings)
    } else {
        (format!("WHERE {}", conditions.join(" AND ")), bindings)
    }
}

fn bind_all<'q>(
    mut query: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
    bindings: &'q [String],
) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in bindings {
        query = query.bind(value.as_str());
    }
    query
}

fn row_to_wallet(row: &SqliteRow) -> Result<Wallet> {
    let id_str: String = row.get("id");
    let created_at_str: String = row.get("created_at");

    Ok(Wallet {
        id: parse_id(&id_str, "wallet")?,
        name: row.get("name"),
        icon: row.get("icon"),
        color: row.get("color"),
        amount_cents: row.get("amount_cents"),
        is_default: row.get::<i32, _>("is_default") != 0,
        created_at: parse_timestamp(&created_at_str, "created_at")?,
    })
}

fn row_to_category(row: &SqliteRow) -> Result<Category> {
    let id_str: String = row.get("id");
    let type_str: String = row.get("category_type");
    let created_at_str: String = row.get("created_at");

    Ok(Category {
        id: parse_id(&id_str, "category")?,
        name: row.get("name"),
        category_type: parse_type(&type_str)?,
        icon: row.get("icon"),
        color: row.get("color"),
        created_at: parse_timestamp(&created_at_str, "created_at")?,
    })
}

fn row_to_transaction(row: &SqliteRow) -> Result<Transaction> {
    let id_str: String = row.get("id");
    let category_str: String = row.get("category_id");
    let wallet_str: String = row.get("wallet_id");
    let type_str: String = row.get("transaction_type");
    let date_str: String = row.get("transaction_date");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    Ok(Transaction {
        id: parse_id(&id_str, "transaction")?,
        category_id: parse_id(&category_str, "category")?,
        wallet_id: parse_id(&wallet_str, "wallet")?,
        transaction_type: parse_type(&type_str)?,
        amount_cents: row.get("amount_cents"),
        description: row.get("description"),
        transaction_date: parse_date(&date_str, "transaction")?,
        created_at: parse_timestamp(&created_at_str, "created_at")?,
        updated_at: parse_timestamp(&updated_at_str, "updated_at")?,
    })
}

fn row_to_transfer(row: &SqliteRow) -> Result<Transfer> {
    let id_str: String = row.get("id");
    let from_str: String = row.get("from_wallet_id");
    let to_str: String = row.get("to_wallet_id");
    let date_str: String = row.get("transfer_date");
    let created_at_str: String = row.get("created_at");

    Ok(Transfer {
        id: parse_id(&id_str, "transfer")?,
        from_wallet: parse_id(&from_str, "from_wallet")?,
        to_wallet: parse_id(&to_str, "to_wallet")?,
        amount_cents: row.get("amount_cents"),
        description: row.get("description"),
        transfer_date: parse_date(&date_str, "transfer")?,
        created_at: parse_timestamp(&created_at_str, "created_at")?,
    })
}
