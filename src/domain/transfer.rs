use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, Effect, WalletId};

pub type TransferId = Uuid;

/// A transfer moves money from one wallet to another.
/// Transfers are not edited in place; callers delete and re-create instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: TransferId,
    /// Source wallet (balance decreases)
    pub from_wallet: WalletId,
    /// Destination wallet (balance increases)
    pub to_wallet: WalletId,
    /// Amount in cents (always positive)
    pub amount_cents: Cents,
    pub description: Option<String>,
    pub transfer_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Transfer {
    pub fn from_draft(draft: TransferDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_wallet: draft.from_wallet,
            to_wallet: draft.to_wallet,
            amount_cents: draft.amount_cents,
            description: draft.description,
            transfer_date: draft.transfer_date,
            created_at: Utc::now(),
        }
    }

    /// Effects of recording this transfer: debit source, credit destination.
    pub fn effects(&self) -> [Effect; 2] {
        [
            Effect::new(self.from_wallet, -self.amount_cents),
            Effect::new(self.to_wallet, self.amount_cents),
        ]
    }

    /// Effects of cancelling this transfer: credit source, debit destination.
    pub fn reversal_effects(&self) -> [Effect; 2] {
        self.effects().map(Effect::reversed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDraft {
    pub from_wallet: WalletId,
    pub to_wallet: WalletId,
    pub amount_cents: Cents,
    pub description: Option<String>,
    pub transfer_date: NaiveDate,
}

impl TransferDraft {
    pub fn new(
        from_wallet: WalletId,
        to_wallet: WalletId,
        amount_cents: Cents,
        transfer_date: NaiveDate,
    ) -> Self {
        Self {
            from_wallet,
            to_wallet,
            amount_cents,
            description: None,
            transfer_date,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
