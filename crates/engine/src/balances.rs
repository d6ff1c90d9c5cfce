//! Net balances: what each participant paid against what they owe.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Expense, Money, ParticipantId, UserTotal};

/// Settlement position of one participant.
///
/// `net_balance = total_paid - total_owed`:
/// - positive = the participant should **receive** money
/// - negative = the participant **owes** money
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementBalance {
    pub participant_id: ParticipantId,
    pub participant_name: String,
    pub total_paid: Money,
    pub total_owed: Money,
    pub net_balance: Money,
}

/// Computes one [`SettlementBalance`] per entry of `totals`, in the same order.
///
/// Each expense credits its full amount to its payer, whatever the split. A
/// payer missing from `totals` is not credited.
pub fn compute_balances(expenses: &[Expense], totals: &[UserTotal]) -> Vec<SettlementBalance> {
    let mut balances: Vec<SettlementBalance> = totals
        .iter()
        .map(|total| SettlementBalance {
            participant_id: total.id.clone(),
            participant_name: total.name.clone(),
            total_paid: Money::ZERO,
            total_owed: total.total_amount,
            net_balance: Money::ZERO,
        })
        .collect();

    // Reversed so the first entry wins on duplicate ids.
    let index: HashMap<ParticipantId, usize> = balances
        .iter()
        .enumerate()
        .rev()
        .map(|(position, balance)| (balance.participant_id.clone(), position))
        .collect();

    for expense in expenses {
        match index.get(&expense.payer_id) {
            Some(&position) => {
                let balance = &mut balances[position];
                balance.total_paid = balance.total_paid.saturating_add(expense.amount);
            }
            None => tracing::warn!(
                expense = %expense.id,
                payer = %expense.payer_id,
                "payer outside the roster, amount not credited"
            ),
        }
    }

    for balance in &mut balances {
        balance.net_balance = balance.total_paid.saturating_sub(balance.total_owed);
    }
    balances
}
