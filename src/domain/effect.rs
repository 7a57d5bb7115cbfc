use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Cents, Transaction, TransactionDraft, WalletId};

/// The signed delta a ledger record applies to one wallet's amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub wallet: WalletId,
    pub delta: Cents,
}

impl Effect {
    pub fn new(wallet: WalletId, delta: Cents) -> Self {
        Self { wallet, delta }
    }

    /// The effect that exactly undoes this one.
    pub fn reversed(self) -> Self {
        Self {
            wallet: self.wallet,
            delta: -self.delta,
        }
    }
}

/// Effects of editing a transaction, in application order: undo the old
/// effect on the old wallet, then apply the new effect on the new wallet.
///
/// Both effects are always returned, even when the wallet is unchanged, so
/// the net change is `new - old` without any special-casing.
pub fn edit_effects(old: &Transaction, new: &TransactionDraft) -> [Effect; 2] {
    [old.effect().reversed(), new.effect()]
}

/// Sum effects per wallet.
pub fn net_by_wallet(effects: &[Effect]) -> HashMap<WalletId, Cents> {
    let mut net: HashMap<WalletId, Cents> = HashMap::new();

    for effect in effects {
        *net.entry(effect.wallet).or_insert(0) += effect.delta;
    }

    net
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::domain::TransactionType;

    fn expense(wallet: WalletId, amount: Cents) -> TransactionDraft {
        TransactionDraft::new(
            Uuid::new_v4(),
            wallet,
            TransactionType::Expense,
            amount,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        )
    }

    #[test]
    fn test_reversed_negates_delta() {
        let wallet = Uuid::new_v4();
        assert_eq!(Effect::new(wallet, 150).reversed(), Effect::new(wallet, -150));
        assert_eq!(Effect::new(wallet, -150).reversed().reversed(), Effect::new(wallet, -150));
    }

    #[test]
    fn test_edit_on_same_wallet_nets_new_minus_old() {
        let wallet = Uuid::new_v4();
        let old = Transaction::from_draft(expense(wallet, 15000));
        let new = expense(wallet, 20000);

        let effects = edit_effects(&old, &new);
        assert_eq!(effects[0], Effect::new(wallet, 15000));
        assert_eq!(effects[1], Effect::new(wallet, -20000));
        assert_eq!(net_by_wallet(&effects).get(&wallet), Some(&-5000));
    }

    #[test]
    fn test_edit_moving_wallet_and_type() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let old = Transaction::from_draft(expense(a, 15000));
        let new = TransactionDraft {
            transaction_type: TransactionType::Income,
            ..expense(b, 4000)
        };

        let net = net_by_wallet(&edit_effects(&old, &new));
        assert_eq!(net.get(&a), Some(&15000));
        assert_eq!(net.get(&b), Some(&4000));
    }

    #[test]
    fn test_net_by_wallet_empty() {
        assert!(net_by_wallet(&[]).is_empty());
    }
}
