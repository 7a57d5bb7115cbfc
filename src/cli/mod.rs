use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::application::{AppError, LedgerService, MonthlySummary};
use crate::domain::{
    Category, CategoryDraft, DEFAULT_WALLET_COLOR, DEFAULT_WALLET_ICON, Page, Transaction,
    TransactionDraft, TransactionFilter, TransactionType, Transfer, TransferDraft, Wallet,
    WalletDraft, format_cents, parse_cents,
};
use crate::storage::SqliteStore;

type Service = LedgerService<SqliteStore>;

const DEFAULT_CATEGORY_ICON: &str = "🏷️";

/// Dompet - Personal Finance Tracker
#[derive(Parser)]
#[command(name = "dompet")]
#[command(about = "Track wallets, categorized income and expenses, and transfers")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "DOMPET_DATABASE", default_value = "dompet.db")]
    pub database: String,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init {
        /// Insert the stock wallets and categories
        #[arg(long)]
        seed: bool,
    },

    /// Wallet management commands
    #[command(subcommand)]
    Wallet(WalletCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Income and expense transactions
    #[command(subcommand)]
    Tx(TxCommands),

    /// Transfers between wallets
    #[command(subcommand)]
    Transfer(TransferCommands),

    /// Monthly income, expense and category breakdown
    Summary {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Month 1-12 (defaults to the current month)
        #[arg(long)]
        month: Option<u32>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum WalletCommands {
    /// Create a new wallet
    Create {
        /// Wallet name
        name: String,

        /// Opening amount (e.g., "1,250.50")
        #[arg(short, long, default_value = "0")]
        amount: String,

        /// Icon shown next to the wallet
        #[arg(long)]
        icon: Option<String>,

        /// Display color (e.g., "#10B981")
        #[arg(long)]
        color: Option<String>,

        /// Make this the default wallet
        #[arg(long)]
        default: bool,
    },

    /// Edit a wallet
    Update {
        /// Wallet name or ID
        wallet: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// Overwrite the stored amount
        #[arg(short, long)]
        amount: Option<String>,

        /// New icon
        #[arg(long)]
        icon: Option<String>,

        /// New color
        #[arg(long)]
        color: Option<String>,

        /// Make this the default wallet
        #[arg(long)]
        default: bool,
    },

    /// Delete a wallet with no transactions or transfers
    Delete {
        /// Wallet name or ID
        wallet: String,
    },

    /// Make a wallet the default
    Default {
        /// Wallet name or ID
        wallet: String,
    },

    /// List all wallets
    List,
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Create a new category
    Create {
        /// Category name
        name: String,

        /// Category type: income, expense
        #[arg(short = 't', long = "type")]
        category_type: String,

        /// Icon shown next to the category
        #[arg(long)]
        icon: Option<String>,

        /// Display color
        #[arg(long)]
        color: Option<String>,
    },

    /// Edit a category
    Update {
        /// Category name or ID
        category: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New type: income, expense
        #[arg(short = 't', long = "type")]
        category_type: Option<String>,

        /// New icon
        #[arg(long)]
        icon: Option<String>,

        /// New color
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a category no transaction uses
    Delete {
        /// Category name or ID
        category: String,
    },

    /// List all categories
    List,
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// Record an income or expense
    Add {
        /// Amount (e.g., "150" or "1,250.50")
        amount: String,

        /// Category name or ID
        #[arg(short, long)]
        category: String,

        /// Wallet name or ID (defaults to the default wallet)
        #[arg(short, long)]
        wallet: Option<String>,

        /// Type: income, expense (defaults to the category's type)
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Edit a transaction; omitted fields keep their value
    Edit {
        /// Transaction ID
        id: String,

        /// New amount
        #[arg(short, long)]
        amount: Option<String>,

        /// New category name or ID
        #[arg(short, long)]
        category: Option<String>,

        /// New wallet name or ID
        #[arg(short, long)]
        wallet: Option<String>,

        /// New type: income, expense
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a transaction and undo its effect
    Delete {
        /// Transaction ID
        id: String,
    },

    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },

    /// List transactions, newest first
    List {
        /// Filter by type: income, expense
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,

        /// From date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<String>,

        /// To date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,

        /// Filter by category name or ID
        #[arg(short, long)]
        category: Option<String>,

        /// Filter by wallet name or ID
        #[arg(short, long)]
        wallet: Option<String>,

        /// Page number
        #[arg(short, long, default_value = "1")]
        page: usize,
    },
}

#[derive(Subcommand)]
pub enum TransferCommands {
    /// Move money between wallets
    Create {
        /// Amount to transfer
        amount: String,

        /// Source wallet name or ID
        #[arg(long)]
        from: String,

        /// Destination wallet name or ID
        #[arg(long)]
        to: String,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a transfer and restore both wallets
    Delete {
        /// Transfer ID
        id: String,
    },

    /// List transfers, newest first
    List {
        /// Page number
        #[arg(short, long, default_value = "1")]
        page: usize,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init { seed } => {
                let service = LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
                if seed {
                    let seeded = service.seed_defaults().await?;
                    println!(
                        "Seeded {} wallet(s) and {} categor{}",
                        seeded.wallets,
                        seeded.categories,
                        if seeded.categories == 1 { "y" } else { "ies" }
                    );
                }
            }

            Commands::Wallet(cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_wallet_command(&service, cmd).await?;
            }

            Commands::Category(cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_category_command(&service, cmd).await?;
            }

            Commands::Tx(cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_tx_command(&service, cmd).await?;
            }

            Commands::Transfer(cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_transfer_command(&service, cmd).await?;
            }

            Commands::Summary { year, month, json } => {
                let service = LedgerService::connect(&self.database).await?;
                let today = Local::now().date_naive();
                let summary = service
                    .monthly_summary(
                        year.unwrap_or(today.year()),
                        month.unwrap_or(today.month()),
                    )
                    .await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                } else {
                    print_summary(&service, &summary).await?;
                }
            }
        }

        Ok(())
    }
}

async fn run_wallet_command(service: &Service, cmd: WalletCommands) -> Result<()> {
    match cmd {
        WalletCommands::Create {
            name,
            amount,
            icon,
            color,
            default,
        } => {
            let draft = WalletDraft::new(name, parse_amount(&amount)?)
                .with_icon(icon.unwrap_or_else(|| DEFAULT_WALLET_ICON.to_string()))
                .with_color(color.unwrap_or_else(|| DEFAULT_WALLET_COLOR.to_string()))
                .as_default(default);

            let wallet = service.create_wallet(draft).await?;
            println!(
                "Created wallet: {} {} ({}){}",
                wallet.icon,
                wallet.name,
                format_cents(wallet.amount_cents),
                if wallet.is_default { " [default]" } else { "" }
            );
        }

        WalletCommands::Update {
            wallet,
            name,
            amount,
            icon,
            color,
            default,
        } => {
            let current = resolve_wallet(service, &wallet).await?;
            let mut draft = WalletDraft::from(&current);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(amount) = amount {
                draft.amount_cents = parse_amount(&amount)?;
            }
            if let Some(icon) = icon {
                draft.icon = icon;
            }
            if let Some(color) = color {
                draft.color = color;
            }
            draft.is_default = default;

            let updated = service.update_wallet(current.id, draft).await?;
            println!(
                "Updated wallet: {} ({})",
                updated.name,
                format_cents(updated.amount_cents)
            );
        }

        WalletCommands::Delete { wallet } => {
            let target = resolve_wallet(service, &wallet).await?;
            let deleted = service.delete_wallet(target.id).await?;
            println!("Deleted wallet: {}", deleted.name);
            if deleted.is_default {
                if let Some(next) = service.default_wallet().await? {
                    println!("Default wallet is now: {}", next.name);
                }
            }
        }

        WalletCommands::Default { wallet } => {
            let target = resolve_wallet(service, &wallet).await?;
            let wallet = service.set_default(target.id).await?;
            println!("Default wallet: {}", wallet.name);
        }

        WalletCommands::List => {
            let entries = service.list_wallets().await?;
            if entries.is_empty() {
                println!("No wallets found.");
            } else {
                println!("{:<3} {:<20} {:>15} {:>6}", "", "WALLET", "AMOUNT", "TXS");
                println!("{}", "-".repeat(47));
                for entry in &entries {
                    println!(
                        "{:<3} {:<20} {:>15} {:>6}{}",
                        entry.wallet.icon,
                        truncate(&entry.wallet.name, 20),
                        format_cents(entry.wallet.amount_cents),
                        entry.transaction_count,
                        if entry.wallet.is_default { "  *" } else { "" }
                    );
                }
                println!("{}", "-".repeat(47));
                println!(
                    "{:<3} {:<20} {:>15}",
                    "",
                    "TOTAL",
                    format_cents(service.total_balance().await?)
                );
            }
        }
    }
    Ok(())
}

async fn run_category_command(service: &Service, cmd: CategoryCommands) -> Result<()> {
    match cmd {
        CategoryCommands::Create {
            name,
            category_type,
            icon,
            color,
        } => {
            let draft = CategoryDraft::new(
                name,
                parse_type(&category_type)?,
                icon.unwrap_or_else(|| DEFAULT_CATEGORY_ICON.to_string()),
                color.unwrap_or_else(|| DEFAULT_WALLET_COLOR.to_string()),
            );
            let category = service.create_category(draft).await?;
            println!(
                "Created category: {} {} ({})",
                category.icon, category.name, category.category_type
            );
        }

        CategoryCommands::Update {
            category,
            name,
            category_type,
            icon,
            color,
        } => {
            let current = resolve_category(service, &category).await?;
            let draft = CategoryDraft::new(
                name.unwrap_or_else(|| current.name.clone()),
                category_type
                    .as_deref()
                    .map(parse_type)
                    .transpose()?
                    .unwrap_or(current.category_type),
                icon.unwrap_or_else(|| current.icon.clone()),
                color.unwrap_or_else(|| current.color.clone()),
            );
            let updated = service.update_category(current.id, draft).await?;
            println!(
                "Updated category: {} ({})",
                updated.name, updated.category_type
            );
        }

        CategoryCommands::Delete { category } => {
            let target = resolve_category(service, &category).await?;
            let deleted = service.delete_category(target.id).await?;
            println!("Deleted category: {}", deleted.name);
        }

        CategoryCommands::List => {
            let entries = service.list_categories().await?;
            if entries.is_empty() {
                println!("No categories found.");
            } else {
                println!("{:<3} {:<20} {:<8} {:>6}", "", "CATEGORY", "TYPE", "TXS");
                println!("{}", "-".repeat(40));
                for entry in entries {
                    println!(
                        "{:<3} {:<20} {:<8} {:>6}",
                        entry.category.icon,
                        truncate(&entry.category.name, 20),
                        entry.category.category_type,
                        entry.transaction_count
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_tx_command(service: &Service, cmd: TxCommands) -> Result<()> {
    match cmd {
        TxCommands::Add {
            amount,
            category,
            wallet,
            transaction_type,
            description,
            date,
        } => {
            let category = resolve_category(service, &category).await?;
            let wallet = match wallet {
                Some(w) => resolve_wallet(service, &w).await?,
                None => service
                    .default_wallet()
                    .await?
                    .context("No default wallet; create a wallet first")?,
            };
            let transaction_type = transaction_type
                .as_deref()
                .map(parse_type)
                .transpose()?
                .unwrap_or(category.category_type);
            let date = date.as_deref().map(parse_date).transpose()?.unwrap_or_else(today);

            let mut draft = TransactionDraft::new(
                category.id,
                wallet.id,
                transaction_type,
                parse_amount(&amount)?,
                date,
            );
            if let Some(desc) = description {
                draft = draft.with_description(desc);
            }

            let tx = service.create_transaction(draft).await?;
            println!(
                "Recorded {}: {} {} in {} ({})",
                tx.transaction_type,
                format_cents(tx.amount_cents),
                category.name,
                wallet.name,
                tx.id
            );
        }

        TxCommands::Edit {
            id,
            amount,
            category,
            wallet,
            transaction_type,
            description,
            date,
        } => {
            let current = service.get_transaction(parse_id(&id, "transaction")?).await?;
            let mut draft = TransactionDraft::from(&current);
            if let Some(amount) = amount {
                draft.amount_cents = parse_amount(&amount)?;
            }
            if let Some(category) = category {
                draft.category_id = resolve_category(service, &category).await?.id;
            }
            if let Some(wallet) = wallet {
                draft.wallet_id = resolve_wallet(service, &wallet).await?.id;
            }
            if let Some(kind) = transaction_type {
                draft.transaction_type = parse_type(&kind)?;
            }
            if let Some(desc) = description {
                draft.description = Some(desc);
            }
            if let Some(date) = date {
                draft.transaction_date = parse_date(&date)?;
            }

            let tx = service.update_transaction(current.id, draft).await?;
            println!(
                "Updated transaction {}: {} {}",
                tx.id,
                tx.transaction_type,
                format_cents(tx.amount_cents)
            );
        }

        TxCommands::Delete { id } => {
            let tx = service
                .delete_transaction(parse_id(&id, "transaction")?)
                .await?;
            println!(
                "Deleted transaction {}: {} {}",
                tx.id,
                tx.transaction_type,
                format_cents(tx.amount_cents)
            );
        }

        TxCommands::Show { id } => {
            let tx = service.get_transaction(parse_id(&id, "transaction")?).await?;
            let category = service.get_category(tx.category_id).await?;
            let wallet = service.get_wallet(tx.wallet_id).await?;

            println!("Transaction: {}", tx.id);
            println!("  Date:        {}", tx.transaction_date);
            println!("  Type:        {}", tx.transaction_type);
            println!("  Amount:      {}", format_cents(tx.amount_cents));
            println!("  Category:    {} {}", category.icon, category.name);
            println!("  Wallet:      {} {}", wallet.icon, wallet.name);
            if let Some(desc) = &tx.description {
                println!("  Description: {}", desc);
            }
            println!(
                "  Created:     {}",
                tx.created_at.format("%Y-%m-%d %H:%M:%S")
            );
            println!(
                "  Updated:     {}",
                tx.updated_at.format("%Y-%m-%d %H:%M:%S")
            );
        }

        TxCommands::List {
            transaction_type,
            from,
            to,
            category,
            wallet,
            page,
        } => {
            let filter = TransactionFilter {
                transaction_type: transaction_type.as_deref().map(parse_type).transpose()?,
                start_date: from.as_deref().map(parse_date).transpose()?,
                end_date: to.as_deref().map(parse_date).transpose()?,
                category_id: match category {
                    Some(c) => Some(resolve_category(service, &c).await?.id),
                    None => None,
                },
                wallet_id: match wallet {
                    Some(w) => Some(resolve_wallet(service, &w).await?.id),
                    None => None,
                },
            };

            let listing = service.list_transactions(&filter, page).await?;
            print_transactions(service, &listing).await?;
        }
    }
    Ok(())
}

async fn run_transfer_command(service: &Service, cmd: TransferCommands) -> Result<()> {
    match cmd {
        TransferCommands::Create {
            amount,
            from,
            to,
            description,
            date,
        } => {
            let from = resolve_wallet(service, &from).await?;
            let to = resolve_wallet(service, &to).await?;
            let date = date.as_deref().map(parse_date).transpose()?.unwrap_or_else(today);

            let mut draft = TransferDraft::new(from.id, to.id, parse_amount(&amount)?, date);
            if let Some(desc) = description {
                draft = draft.with_description(desc);
            }

            let transfer = service.create_transfer(draft).await?;
            println!(
                "Recorded transfer: {} {} -> {} ({})",
                format_cents(transfer.amount_cents),
                from.name,
                to.name,
                transfer.id
            );
        }

        TransferCommands::Delete { id } => {
            let transfer = service.delete_transfer(parse_id(&id, "transfer")?).await?;
            println!(
                "Deleted transfer {}: {} returned to source",
                transfer.id,
                format_cents(transfer.amount_cents)
            );
        }

        TransferCommands::List { page } => {
            let listing = service.list_transfers(page).await?;
            print_transfers(service, &listing).await?;
        }
    }
    Ok(())
}

async fn print_transactions(service: &Service, listing: &Page<Transaction>) -> Result<()> {
    if listing.items.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let wallets = wallet_names(service).await?;
    let categories = service.list_categories().await?;

    println!(
        "{:<36} {:<10} {:<7} {:>12} {:<15} {:<15} {}",
        "ID", "DATE", "TYPE", "AMOUNT", "CATEGORY", "WALLET", "DESCRIPTION"
    );
    println!("{}", "-".repeat(110));
    for tx in &listing.items {
        let category = categories
            .iter()
            .find(|c| c.category.id == tx.category_id)
            .map(|c| c.category.name.as_str())
            .unwrap_or("?");
        println!(
            "{:<36} {:<10} {:<7} {:>12} {:<15} {:<15} {}",
            tx.id,
            tx.transaction_date,
            tx.transaction_type,
            format_cents(tx.amount_cents),
            truncate(category, 15),
            truncate(lookup(&wallets, &tx.wallet_id), 15),
            tx.description.as_deref().unwrap_or("")
        );
    }
    print_page_footer(listing);
    Ok(())
}

async fn print_transfers(service: &Service, listing: &Page<Transfer>) -> Result<()> {
    if listing.items.is_empty() {
        println!("No transfers found.");
        return Ok(());
    }

    let wallets = wallet_names(service).await?;

    println!(
        "{:<36} {:<10} {:>12} {:<15} {:<15} {}",
        "ID", "DATE", "AMOUNT", "FROM", "TO", "DESCRIPTION"
    );
    println!("{}", "-".repeat(100));
    for transfer in &listing.items {
        println!(
            "{:<36} {:<10} {:>12} {:<15} {:<15} {}",
            transfer.id,
            transfer.transfer_date,
            format_cents(transfer.amount_cents),
            truncate(lookup(&wallets, &transfer.from_wallet), 15),
            truncate(lookup(&wallets, &transfer.to_wallet), 15),
            transfer.description.as_deref().unwrap_or("")
        );
    }
    print_page_footer(listing);
    Ok(())
}

fn print_page_footer<T>(listing: &Page<T>) {
    println!(
        "Page {} of {} ({} total)",
        listing.page,
        listing.total_pages(),
        listing.total
    );
}

async fn print_summary(service: &Service, summary: &MonthlySummary) -> Result<()> {
    println!(
        "Summary for {}-{:02} ({} to {})",
        summary.year, summary.month, summary.period_start, summary.period_end
    );
    println!();
    println!("{:<20} {:>15}", "Income", format_cents(summary.total_income));
    println!("{:<20} {:>15}", "Expense", format_cents(summary.total_expense));
    println!("{}", "-".repeat(36));
    println!("{:<20} {:>15}", "Net", format_cents(summary.net));
    println!(
        "{:<20} {:>15}",
        "Total balance",
        format_cents(service.total_balance().await?)
    );

    for (title, totals) in [
        ("Expenses by category", &summary.expense_by_category),
        ("Income by category", &summary.income_by_category),
    ] {
        if totals.is_empty() {
            continue;
        }
        println!();
        println!("{}", title);
        for total in totals {
            println!(
                "  {:<3} {:<20} {:>15} ({})",
                total.icon,
                truncate(&total.name, 20),
                format_cents(total.total),
                total.count
            );
        }
    }

    if !summary.recent.is_empty() {
        println!();
        println!("Recent transactions");
        for tx in &summary.recent {
            println!(
                "  {} {:<7} {:>15} {}",
                tx.transaction_date,
                tx.transaction_type,
                format_cents(tx.amount_cents),
                tx.description.as_deref().unwrap_or("")
            );
        }
    }
    Ok(())
}

/// Find a wallet by ID or exact name.
async fn resolve_wallet(service: &Service, input: &str) -> Result<Wallet> {
    if let Ok(id) = Uuid::parse_str(input) {
        return Ok(service.get_wallet(id).await?);
    }
    service
        .list_wallets()
        .await?
        .into_iter()
        .map(|entry| entry.wallet)
        .find(|w| w.name == input)
        .ok_or_else(|| AppError::WalletNotFound(input.to_string()).into())
}

/// Find a category by ID or exact name.
async fn resolve_category(service: &Service, input: &str) -> Result<Category> {
    if let Ok(id) = Uuid::parse_str(input) {
        return Ok(service.get_category(id).await?);
    }
    service
        .list_categories()
        .await?
        .into_iter()
        .map(|entry| entry.category)
        .find(|c| c.name == input)
        .ok_or_else(|| AppError::CategoryNotFound(input.to_string()).into())
}

async fn wallet_names(service: &Service) -> Result<Vec<(Uuid, String)>> {
    Ok(service
        .list_wallets()
        .await?
        .into_iter()
        .map(|entry| (entry.wallet.id, entry.wallet.name))
        .collect())
}

fn lookup<'a>(names: &'a [(Uuid, String)], id: &Uuid) -> &'a str {
    names
        .iter()
        .find(|(wallet_id, _)| wallet_id == id)
        .map(|(_, name)| name.as_str())
        .unwrap_or("?")
}

fn parse_amount(input: &str) -> Result<i64> {
    parse_cents(input).context("Invalid amount format. Use '1,250.50' or '150'")
}

fn parse_type(input: &str) -> Result<TransactionType> {
    TransactionType::from_str(input)
        .with_context(|| format!("Invalid type '{}'. Valid types: income, expense", input))
}

fn parse_id(input: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(input).with_context(|| format!("Invalid {} ID format (expected UUID)", what))
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", input))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("Groceries", 15), "Groceries");
        assert_eq!(truncate("Très long libellé", 10), "Très lo...");
    }

    #[test]
    fn test_parse_type_is_case_insensitive() {
        assert_eq!(parse_type("Income").unwrap(), TransactionType::Income);
        assert_eq!(parse_type("expense").unwrap(), TransactionType::Expense);
        assert!(parse_type("transfer").is_err());
    }

    #[test]
    fn test_cli_parses_tx_add() {
        let cli = Cli::try_parse_from([
            "dompet", "-d", "x.db", "tx", "add", "150", "--category", "Food",
        ])
        .unwrap();
        assert_eq!(cli.database, "x.db");
        match cli.command {
            Commands::Tx(TxCommands::Add {
                amount,
                category,
                wallet,
                ..
            }) => {
                assert_eq!(amount, "150");
                assert_eq!(category, "Food");
                assert!(wallet.is_none());
            }
            _ => panic!("expected tx add"),
        }
    }
}
