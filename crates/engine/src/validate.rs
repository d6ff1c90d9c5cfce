//! Self-checks over a computed settlement.
//!
//! Both checks are advisory: they never stop the pipeline, callers decide
//! whether an invalid outcome is fatal.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Money, ParticipantId, SettlementBalance, SettlementTransfer};

/// Outcome of [`validate_settlement`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementCheck {
    pub is_valid: bool,
    /// Sum of every net balance; zero when money is conserved.
    pub total_balance: Money,
    pub message: String,
}

/// Outcome of [`validate_transfers`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCheck {
    pub is_valid: bool,
    pub message: String,
}

/// Checks that net balances sum to zero.
///
/// Amounts are integer minor units, so the sub-unit tolerance collapses to an
/// exact zero test.
pub fn validate_settlement(balances: &[SettlementBalance]) -> SettlementCheck {
    let total_balance: Money = balances.iter().map(|balance| balance.net_balance).sum();
    let is_valid = total_balance.is_zero();
    let message = if is_valid {
        "settlement balances sum to zero".to_string()
    } else {
        format!("settlement does not balance: net balances sum to {total_balance}")
    };
    SettlementCheck {
        is_valid,
        total_balance,
        message,
    }
}

/// Replays `transfers` over a copy of `balances` and checks that everybody
/// ends at zero.
///
/// Transfers may name participants missing from `balances`; they start at
/// zero.
pub fn validate_transfers(
    balances: &[SettlementBalance],
    transfers: &[SettlementTransfer],
) -> TransferCheck {
    let mut remaining: HashMap<&ParticipantId, Money> = HashMap::with_capacity(balances.len());
    for balance in balances {
        let entry = remaining.entry(&balance.participant_id).or_default();
        *entry = entry.saturating_add(balance.net_balance);
    }
    for transfer in transfers {
        let from = remaining.entry(&transfer.from.id).or_default();
        *from = from.saturating_add(transfer.amount);
        let to = remaining.entry(&transfer.to.id).or_default();
        *to = to.saturating_sub(transfer.amount);
    }

    let unsettled = remaining.values().filter(|balance| !balance.is_zero()).count();
    let is_valid = unsettled == 0;
    let message = if is_valid {
        format!("settled in {} transfer(s)", transfers.len())
    } else {
        format!("transfers leave {unsettled} participant(s) unsettled")
    };
    TransferCheck { is_valid, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Participant, minimize_transfers};

    fn balance(id: &str, net: i64) -> SettlementBalance {
        SettlementBalance {
            participant_id: id.into(),
            participant_name: id.to_string(),
            total_paid: Money::ZERO,
            total_owed: Money::ZERO,
            net_balance: Money::new(net),
        }
    }

    #[test]
    fn balanced_settlement_is_valid() {
        let check = validate_settlement(&[balance("a", 10), balance("b", -10)]);
        assert!(check.is_valid);
        assert_eq!(check.total_balance, Money::ZERO);
    }

    #[test]
    fn unbalanced_settlement_reports_sum() {
        let check = validate_settlement(&[balance("a", 10), balance("b", -7)]);
        assert!(!check.is_valid);
        assert_eq!(check.total_balance, Money::new(3));
        assert!(check.message.contains('3'));
    }

    #[test]
    fn greedy_plan_replays_to_zero() {
        let balances = vec![balance("a", 15_000), balance("b", -5_000), balance("c", -10_000)];
        let transfers = minimize_transfers(&balances);
        let check = validate_transfers(&balances, &transfers);
        assert!(check.is_valid);
        assert_eq!(check.message, "settled in 2 transfer(s)");
    }

    #[test]
    fn wrong_amount_is_detected() {
        let balances = vec![balance("a", 100), balance("b", -100)];
        let transfers = vec![SettlementTransfer {
            from: Participant::new("b", "b"),
            to: Participant::new("a", "a"),
            amount: Money::new(60),
        }];
        let check = validate_transfers(&balances, &transfers);
        assert!(!check.is_valid);
        assert_eq!(check.message, "transfers leave 2 participant(s) unsettled");
    }

    #[test]
    fn transfer_to_stranger_is_detected() {
        let balances = vec![balance("a", 100), balance("b", -100)];
        let transfers = vec![SettlementTransfer {
            from: Participant::new("b", "b"),
            to: Participant::new("zed", "zed"),
            amount: Money::new(100),
        }];
        assert!(!validate_transfers(&balances, &transfers).is_valid);
    }
}
