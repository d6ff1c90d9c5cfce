//! Input audit.
//!
//! The computations tolerate malformed input: they skip what they cannot
//! attribute. [`audit`] lists every such case so the caller can decide how
//! to handle it. Each [`InputIssue`] is either:
//!
//! - [`Severity::Ignorable`]: optional data missing, the result is still
//!   balanced (empty day, zero custom share, empty split of a zero amount);
//! - [`Severity::Integrity`]: the input contradicts itself and the result may
//!   not balance or may charge the wrong people. An empty split of a non-zero
//!   amount belongs here: its payer is credited and nobody is charged.
//!
//! The [`Engine`](crate::Engine) turns the first integrity issue into an
//! [`EngineError`] under [`InputPolicy::Strict`]. [`InputIssue::AmountOverflow`]
//! is rejected under every policy: such totals cannot be represented.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    Currency, EngineError, Expense, Money, Participant, ParticipantId, Split,
    aggregate::expense_shares,
};

/// How the engine reacts to malformed input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputPolicy {
    /// Log every issue and compute anyway.
    #[default]
    Permissive,
    /// Reject input carrying an integrity issue.
    Strict,
}

impl TryFrom<&str> for InputPolicy {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            other => Err(EngineError::KeyNotFound(format!("input policy {other}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Ignorable,
    Integrity,
}

#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum InputIssue {
    #[error("expense {expense_id} of {amount} has nobody to split with")]
    EmptySplit { expense_id: Uuid, amount: Money },
    #[error("expense {expense_id} has nobody on {date}")]
    EmptyDay { expense_id: Uuid, date: NaiveDate },
    #[error("expense {expense_id} has a zero custom share for {participant_id}")]
    ZeroCustomShare {
        expense_id: Uuid,
        participant_id: ParticipantId,
    },
    #[error("expense {expense_id} is paid by {payer_id}, who is not a participant")]
    UnknownPayer {
        expense_id: Uuid,
        payer_id: ParticipantId,
    },
    #[error("expense {expense_id} is split with {participant_id}, who is not a participant")]
    UnknownParticipant {
        expense_id: Uuid,
        participant_id: ParticipantId,
    },
    #[error("expense {expense_id} lists {participant_id} more than once")]
    DuplicateParticipant {
        expense_id: Uuid,
        participant_id: ParticipantId,
        date: Option<NaiveDate>,
    },
    #[error("expense {expense_id} has a negative amount {amount}")]
    NegativeAmount { expense_id: Uuid, amount: Money },
    #[error("expense {expense_id} custom shares sum to {actual}, expected {expected}")]
    CustomSplitMismatch {
        expense_id: Uuid,
        expected: Money,
        actual: Money,
    },
    #[error("expense {expense_id} is in {actual}, settlement runs in {expected}")]
    CurrencyMismatch {
        expense_id: Uuid,
        expected: Currency,
        actual: Currency,
    },
    #[error("expense {expense_id} pushes the trip totals out of the supported range")]
    AmountOverflow { expense_id: Uuid },
}

impl InputIssue {
    pub fn severity(&self) -> Severity {
        match self {
            Self::EmptySplit { amount, .. } if amount.is_zero() => Severity::Ignorable,
            Self::EmptyDay { .. } | Self::ZeroCustomShare { .. } => Severity::Ignorable,
            Self::EmptySplit { .. }
            | Self::UnknownPayer { .. }
            | Self::UnknownParticipant { .. }
            | Self::DuplicateParticipant { .. }
            | Self::NegativeAmount { .. }
            | Self::CustomSplitMismatch { .. }
            | Self::CurrencyMismatch { .. }
            | Self::AmountOverflow { .. } => Severity::Integrity,
        }
    }

    pub fn expense_id(&self) -> Uuid {
        match self {
            Self::EmptySplit { expense_id, .. }
            | Self::EmptyDay { expense_id, .. }
            | Self::ZeroCustomShare { expense_id, .. }
            | Self::UnknownPayer { expense_id, .. }
            | Self::UnknownParticipant { expense_id, .. }
            | Self::DuplicateParticipant { expense_id, .. }
            | Self::NegativeAmount { expense_id, .. }
            | Self::CustomSplitMismatch { expense_id, .. }
            | Self::CurrencyMismatch { expense_id, .. }
            | Self::AmountOverflow { expense_id } => *expense_id,
        }
    }
}

impl From<InputIssue> for EngineError {
    fn from(issue: InputIssue) -> Self {
        let message = issue.to_string();
        match issue {
            InputIssue::EmptySplit { .. } | InputIssue::EmptyDay { .. } => {
                EngineError::EmptySplit(message)
            }
            InputIssue::ZeroCustomShare { .. }
            | InputIssue::NegativeAmount { .. }
            | InputIssue::AmountOverflow { .. } => EngineError::InvalidAmount(message),
            InputIssue::UnknownPayer { .. } => EngineError::UnknownPayer(message),
            InputIssue::UnknownParticipant { .. } => EngineError::UnknownParticipant(message),
            InputIssue::DuplicateParticipant { .. } => EngineError::DuplicateParticipant(message),
            InputIssue::CustomSplitMismatch { .. } => EngineError::CustomSplitMismatch(message),
            InputIssue::CurrencyMismatch { .. } => EngineError::CurrencyMismatch(message),
        }
    }
}

/// Reports duplicates within one list of people.
fn duplicates<'a>(
    expense_id: Uuid,
    people: impl IntoIterator<Item = &'a ParticipantId>,
    date: Option<NaiveDate>,
    issues: &mut Vec<InputIssue>,
) {
    let mut seen: HashSet<&ParticipantId> = HashSet::new();
    for participant_id in people {
        if !seen.insert(participant_id) {
            issues.push(InputIssue::DuplicateParticipant {
                expense_id,
                participant_id: participant_id.clone(),
                date,
            });
        }
    }
}

/// Adds the magnitude of the expense amount and of every share it charges.
///
/// Every paid, owed or net total of the trip is bounded by the running sum,
/// so totals fit in `i64` as long as this does.
fn add_magnitude(magnitude: Money, expense: &Expense) -> Option<Money> {
    std::iter::once(expense.amount)
        .chain(expense_shares(expense).into_iter().map(|share| share.amount))
        .try_fold(magnitude, |sum, amount| sum.checked_add(amount.checked_abs()?))
}

/// Lists every malformed input in `expenses`, in expense order.
///
/// `currency` is the currency the settlement runs in. Overflow is reported
/// once, on the first expense that leaves the `i64` range.
pub fn audit(
    expenses: &[Expense],
    participants: &[Participant],
    currency: Currency,
) -> Vec<InputIssue> {
    let roster: HashSet<&ParticipantId> = participants.iter().map(|p| &p.id).collect();
    let mut issues = Vec::new();
    let mut magnitude = Some(Money::ZERO);

    for expense in expenses {
        let expense_id = expense.id;

        if let Some(sum) = magnitude {
            magnitude = add_magnitude(sum, expense);
            if magnitude.is_none() {
                issues.push(InputIssue::AmountOverflow { expense_id });
            }
        }

        if expense.currency != currency {
            issues.push(InputIssue::CurrencyMismatch {
                expense_id,
                expected: currency,
                actual: expense.currency,
            });
        }
        if expense.amount.is_negative() {
            issues.push(InputIssue::NegativeAmount {
                expense_id,
                amount: expense.amount,
            });
        }
        if !roster.contains(&expense.payer_id) {
            issues.push(InputIssue::UnknownPayer {
                expense_id,
                payer_id: expense.payer_id.clone(),
            });
        }

        if expense.split.is_empty() {
            issues.push(InputIssue::EmptySplit {
                expense_id,
                amount: expense.amount,
            });
            continue;
        }

        let mut unknown: HashSet<&ParticipantId> = HashSet::new();
        for participant_id in expense.split.participant_ids() {
            if !roster.contains(participant_id) && unknown.insert(participant_id) {
                issues.push(InputIssue::UnknownParticipant {
                    expense_id,
                    participant_id: participant_id.clone(),
                });
            }
        }

        match &expense.split {
            Split::Equal {
                participants: people,
            } => duplicates(expense_id, people, None, &mut issues),
            Split::Custom { shares } => {
                duplicates(
                    expense_id,
                    shares.iter().map(|share| &share.participant_id),
                    None,
                    &mut issues,
                );
                for share in shares.iter().filter(|share| share.amount.is_zero()) {
                    issues.push(InputIssue::ZeroCustomShare {
                        expense_id,
                        participant_id: share.participant_id.clone(),
                    });
                }
                let actual: Money = shares.iter().map(|share| share.amount).sum();
                if actual != expense.amount {
                    issues.push(InputIssue::CustomSplitMismatch {
                        expense_id,
                        expected: expense.amount,
                        actual,
                    });
                }
            }
            Split::Daily { days } => {
                for (date, people) in days {
                    if people.is_empty() {
                        issues.push(InputIssue::EmptyDay {
                            expense_id,
                            date: *date,
                        });
                    }
                    duplicates(expense_id, people, Some(*date), &mut issues);
                }
            }
        }
    }

    issues
}
