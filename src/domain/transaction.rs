use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CategoryId, Cents, Effect, WalletId};

pub type TransactionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming into a wallet
    Income,
    /// Money leaving a wallet
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }

    /// Signed delta this type applies to a wallet for the given amount.
    pub fn signed(&self, amount_cents: Cents) -> Cents {
        match self {
            TransactionType::Income => amount_cents,
            TransactionType::Expense => -amount_cents,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An income or expense recorded against one wallet and one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub category_id: CategoryId,
    pub wallet_id: WalletId,
    pub transaction_type: TransactionType,
    /// Amount in cents (never negative)
    pub amount_cents: Cents,
    pub description: Option<String>,
    /// Calendar date the money moved
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn from_draft(draft: TransactionDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            category_id: draft.category_id,
            wallet_id: draft.wallet_id,
            transaction_type: draft.transaction_type,
            amount_cents: draft.amount_cents,
            description: draft.description,
            transaction_date: draft.transaction_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_draft(&mut self, draft: TransactionDraft) {
        self.category_id = draft.category_id;
        self.wallet_id = draft.wallet_id;
        self.transaction_type = draft.transaction_type;
        self.amount_cents = draft.amount_cents;
        self.description = draft.description;
        self.transaction_date = draft.transaction_date;
        self.updated_at = Utc::now();
    }

    /// The effect this transaction currently has on its wallet.
    pub fn effect(&self) -> Effect {
        Effect::new(
            self.wallet_id,
            self.transaction_type.signed(self.amount_cents),
        )
    }
}

/// Caller-supplied fields for creating or editing a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub category_id: CategoryId,
    pub wallet_id: WalletId,
    pub transaction_type: TransactionType,
    pub amount_cents: Cents,
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
}

impl TransactionDraft {
    pub fn new(
        category_id: CategoryId,
        wallet_id: WalletId,
        transaction_type: TransactionType,
        amount_cents: Cents,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            category_id,
            wallet_id,
            transaction_type,
            amount_cents,
            description: None,
            transaction_date,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn effect(&self) -> Effect {
        Effect::new(
            self.wallet_id,
            self.transaction_type.signed(self.amount_cents),
        )
    }
}

impl From<&Transaction> for TransactionDraft {
    fn from(tx: &Transaction) -> Self {
        Self {
            category_id: tx.category_id,
            wallet_id: tx.wallet_id,
            transaction_type: tx.transaction_type,
            amount_cents: tx.amount_cents,
            description: tx.description.clone(),
            transaction_date: tx.transaction_date,
        }
    }
}

/// Filter for listing transactions. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category_id: Option<CategoryId>,
    pub wallet_id: Option<WalletId>,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.transaction_type.is_none_or(|t| t == tx.transaction_type)
            && self.start_date.is_none_or(|d| tx.transaction_date >= d)
            && self.end_date.is_none_or(|d| tx.transaction_date <= d)
            && self.category_id.is_none_or(|id| id == tx.category_id)
            && self.wallet_id.is_none_or(|id| id == tx.wallet_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_transaction_type_parsing() {
        assert_eq!(
            TransactionType::from_str("Income"),
            Some(TransactionType::Income)
        );
        assert_eq!(
            TransactionType::from_str("expense"),
            Some(TransactionType::Expense)
        );
        assert_eq!(TransactionType::from_str("transfer"), None);
    }

    #[test]
    fn test_effect_sign_follows_type() {
        let wallet = Uuid::new_v4();
        let income = TransactionDraft::new(
            Uuid::new_v4(),
            wallet,
            TransactionType::Income,
            5000,
            date("2024-03-01"),
        );
        let expense = TransactionDraft {
            transaction_type: TransactionType::Expense,
            ..income.clone()
        };

        assert_eq!(income.effect(), Effect::new(wallet, 5000));
        assert_eq!(expense.effect(), Effect::new(wallet, -5000));
        assert_eq!(Transaction::from_draft(expense).effect().delta, -5000);
    }

    #[test]
    fn test_filter_date_bounds_are_inclusive() {
        let tx = Transaction::from_draft(TransactionDraft::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            TransactionType::Expense,
            100,
            date("2024-03-31"),
        ));

        let march = TransactionFilter {
            start_date: Some(date("2024-03-01")),
            end_date: Some(date("2024-03-31")),
            ..Default::default()
        };
        assert!(march.matches(&tx));

        let april = TransactionFilter {
            start_date: Some(date("2024-04-01")),
            ..Default::default()
        };
        assert!(!april.matches(&tx));

        let income_only = TransactionFilter {
            transaction_type: Some(TransactionType::Income),
            ..Default::default()
        };
        assert!(!income_only.matches(&tx));
    }
}
