//! Transfer minimization.
//!
//! Greedy largest-to-largest matching: the participant owed the most is paid
//! by the participant owing the most, for the smaller of the two amounts,
//! until everybody is at zero. Every step zeroes at least one side, so a
//! balanced input never needs more than `receivers + payers - 1` transfers.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{Money, Participant, ParticipantId, SettlementBalance};

/// A directed payment instruction. `amount` is always positive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementTransfer {
    pub from: Participant,
    pub to: Participant,
    pub amount: Money,
}

/// Working copy of one side of the matching.
struct Party {
    participant: Participant,
    balance: Money,
}

impl Party {
    fn from_balance(balance: &SettlementBalance) -> Self {
        Self {
            participant: Participant::new(
                balance.participant_id.clone(),
                balance.participant_name.clone(),
            ),
            balance: balance.net_balance,
        }
    }
}

/// Produces the transfers that bring every balance to zero.
///
/// `balances` is left untouched so it can still be shown as the
/// pre-settlement picture. Ties keep the input order (stable sort), so the
/// result is deterministic for a given input order. If the balances do not
/// sum to zero, the leftover stays on whichever side is not exhausted.
pub fn minimize_transfers(balances: &[SettlementBalance]) -> Vec<SettlementTransfer> {
    let mut receivers: Vec<Party> = balances
        .iter()
        .filter(|balance| balance.net_balance.is_positive())
        .map(Party::from_balance)
        .collect();
    let mut payers: Vec<Party> = balances
        .iter()
        .filter(|balance| balance.net_balance.is_negative())
        .map(Party::from_balance)
        .collect();

    receivers.sort_by(|a, b| b.balance.cmp(&a.balance));
    payers.sort_by(|a, b| a.balance.cmp(&b.balance));

    let mut receivers = VecDeque::from(receivers);
    let mut payers = VecDeque::from(payers);
    let mut transfers = Vec::with_capacity(receivers.len() + payers.len());

    while let (Some(receiver), Some(payer)) = (receivers.front_mut(), payers.front_mut()) {
        let amount = receiver.balance.min(Money::ZERO.saturating_sub(payer.balance));
        transfers.push(SettlementTransfer {
            from: payer.participant.clone(),
            to: receiver.participant.clone(),
            amount,
        });
        receiver.balance -= amount;
        payer.balance += amount;

        let receiver_done = receiver.balance.is_zero();
        let payer_done = payer.balance.is_zero();
        if receiver_done {
            receivers.pop_front();
        }
        if payer_done {
            payers.pop_front();
        }
    }

    tracing::debug!(transfers = transfers.len(), "transfer plan computed");
    transfers
}

/// The part of a transfer plan one participant takes part in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParticipantTransfers<'a> {
    pub to_send: Vec<&'a SettlementTransfer>,
    pub to_receive: Vec<&'a SettlementTransfer>,
}

impl ParticipantTransfers<'_> {
    pub fn total_to_send(&self) -> Money {
        self.to_send.iter().map(|transfer| transfer.amount).sum()
    }

    pub fn total_to_receive(&self) -> Money {
        self.to_receive.iter().map(|transfer| transfer.amount).sum()
    }
}

/// Picks the transfers `participant` sends and receives, in plan order.
pub fn transfers_of<'a>(
    transfers: &'a [SettlementTransfer],
    participant: &ParticipantId,
) -> ParticipantTransfers<'a> {
    ParticipantTransfers {
        to_send: transfers.iter().filter(|t| &t.from.id == participant).collect(),
        to_receive: transfers.iter().filter(|t| &t.to.id == participant).collect(),
    }
}
