use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type WalletId = Uuid;

pub const DEFAULT_WALLET_ICON: &str = "💰";
pub const DEFAULT_WALLET_COLOR: &str = "#64748B";

/// A named store of money with a running amount.
///
/// `amount_cents` is a stored total kept in sync with every live transaction
/// and transfer touching the wallet; it is never recomputed from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub amount_cents: Cents,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl Wallet {
    /// Build a new wallet from a draft. The default flag is copied as
    /// requested; enforcing the single-default rule is the service's job.
    pub fn from_draft(draft: WalletDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            icon: draft.icon,
            color: draft.color,
            amount_cents: draft.amount_cents,
            is_default: draft.is_default,
            created_at: Utc::now(),
        }
    }

    /// Overwrite the editable fields, leaving the default flag alone.
    pub fn apply_draft(&mut self, draft: &WalletDraft) {
        self.name = draft.name.clone();
        self.icon = draft.icon.clone();
        self.color = draft.color.clone();
        self.amount_cents = draft.amount_cents;
    }
}

/// Caller-supplied fields for creating or editing a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletDraft {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub amount_cents: Cents,
    pub is_default: bool,
}

impl WalletDraft {
    pub fn new(name: impl Into<String>, amount_cents: Cents) -> Self {
        Self {
            name: name.into(),
            icon: DEFAULT_WALLET_ICON.to_string(),
            color: DEFAULT_WALLET_COLOR.to_string(),
            amount_cents,
            is_default: false,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn as_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }
}

impl From<&Wallet> for WalletDraft {
    fn from(wallet: &Wallet) -> Self {
        Self {
            name: wallet.name.clone(),
            icon: wallet.icon.clone(),
            color: wallet.color.clone(),
            amount_cents: wallet.amount_cents,
            is_default: wallet.is_default,
        }
    }
}

/// Wallets created by `seed_defaults` on an empty store. The first one is
/// the default.
pub fn default_wallets() -> Vec<WalletDraft> {
    vec![
        WalletDraft::new("Cash", 0)
            .with_icon("💵")
            .with_color("#22C55E")
            .as_default(true),
        WalletDraft::new("Bank", 0)
            .with_icon("🏦")
            .with_color("#3B82F6"),
        WalletDraft::new("E-Wallet", 0)
            .with_icon("📱")
            .with_color("#8B5CF6"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_draft_keeps_identity_and_default_flag() {
        let mut wallet = Wallet::from_draft(WalletDraft::new("Cash", 1000).as_default(true));
        let id = wallet.id;
        let created_at = wallet.created_at;

        wallet.apply_draft(&WalletDraft::new("Pocket", 250).with_icon("👛"));

        assert_eq!(wallet.id, id);
        assert_eq!(wallet.created_at, created_at);
        assert_eq!(wallet.name, "Pocket");
        assert_eq!(wallet.icon, "👛");
        assert_eq!(wallet.amount_cents, 250);
        assert!(wallet.is_default);
    }

    #[test]
    fn test_default_wallets_have_exactly_one_default() {
        let wallets = default_wallets();
        assert_eq!(wallets.len(), 3);
        assert_eq!(wallets.iter().filter(|w| w.is_default).count(), 1);
        assert!(wallets.iter().all(|w| w.amount_cents == 0));
    }
}
