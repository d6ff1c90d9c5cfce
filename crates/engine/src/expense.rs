//! Expense records.
//!
//! An [`Expense`] is a read-only snapshot handed over by the expense store.
//! How its amount is divided is described by its [`Split`]:
//!
//! - [`Split::Equal`]: evenly among an ordered list of participants, the
//!   remainder going to the first one;
//! - [`Split::Custom`]: explicit per-participant amounts, taken verbatim;
//! - [`Split::Daily`]: multi-day items (lodging, transport) divided first
//!   across the days, then across the people present each day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, Money, ParticipantId, ResultEngine};

/// One explicit amount of a custom split.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomShare {
    pub participant_id: ParticipantId,
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Split {
    Equal {
        participants: Vec<ParticipantId>,
    },
    Custom {
        shares: Vec<CustomShare>,
    },
    /// Dates iterate in ascending order; the people of each day keep their
    /// insertion order.
    Daily {
        days: BTreeMap<NaiveDate, Vec<ParticipantId>>,
    },
}

impl Split {
    pub fn equal<I, P>(participants: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        Self::Equal {
            participants: participants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn custom<I, P>(shares: I) -> Self
    where
        I: IntoIterator<Item = (P, Money)>,
        P: Into<ParticipantId>,
    {
        Self::Custom {
            shares: shares
                .into_iter()
                .map(|(participant_id, amount)| CustomShare {
                    participant_id: participant_id.into(),
                    amount,
                })
                .collect(),
        }
    }

    /// Builds a daily split. Repeating a date appends to that day.
    pub fn daily<I, D, P>(days: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, D)>,
        D: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        let mut by_date: BTreeMap<NaiveDate, Vec<ParticipantId>> = BTreeMap::new();
        for (date, people) in days {
            by_date
                .entry(date)
                .or_default()
                .extend(people.into_iter().map(Into::into));
        }
        Self::Daily { days: by_date }
    }

    /// Returns `true` when nobody can be charged for the expense.
    ///
    /// A daily split is empty when every one of its days is empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Equal { participants } => participants.is_empty(),
            Self::Custom { shares } => shares.is_empty(),
            Self::Daily { days } => days.values().all(Vec::is_empty),
        }
    }

    /// Every participant referenced by the split, repetitions included.
    pub fn participant_ids(&self) -> Box<dyn Iterator<Item = &ParticipantId> + '_> {
        match self {
            Self::Equal { participants } => Box::new(participants.iter()),
            Self::Custom { shares } => Box::new(shares.iter().map(|share| &share.participant_id)),
            Self::Daily { days } => Box::new(days.values().flatten()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub item_name: String,
    pub amount: Money,
    pub payer_id: ParticipantId,
    pub split: Split,
    pub currency: Currency,
    pub date: NaiveDate,
    pub category: Option<String>,
}

impl Expense {
    pub fn new(
        item_name: impl Into<String>,
        amount: Money,
        payer_id: impl Into<ParticipantId>,
        split: Split,
        currency: Currency,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_name: item_name.into(),
            amount,
            payer_id: payer_id.into(),
            split,
            currency,
            date,
            category: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Looks up an expense by id.
pub fn find_expense(expenses: &[Expense], id: Uuid) -> ResultEngine<&Expense> {
    expenses
        .iter()
        .find(|expense| expense.id == id)
        .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn daily_merges_repeated_dates_in_ascending_order() {
        let split = Split::daily([(day(3), vec!["c"]), (day(1), vec!["a"]), (day(3), vec!["d"])]);
        let Split::Daily { days } = split else {
            panic!("expected daily split");
        };
        let dates: Vec<_> = days.keys().copied().collect();
        assert_eq!(dates, vec![day(1), day(3)]);
        assert_eq!(
            days[&day(3)],
            vec![ParticipantId::from("c"), ParticipantId::from("d")]
        );
    }

    #[test]
    fn daily_split_with_only_empty_days_is_empty() {
        let split = Split::daily([(day(1), Vec::<&str>::new())]);
        assert!(split.is_empty());
        assert!(!Split::daily([(day(1), vec!["a"])]).is_empty());
    }

    #[test]
    fn find_expense_reports_missing_id() {
        let expense = Expense::new(
            "Dinner",
            Money::new(100),
            "a",
            Split::equal(["a"]),
            Currency::Krw,
            day(1),
        );
        let id = expense.id;
        let expenses = vec![expense];
        assert_eq!(find_expense(&expenses, id).unwrap().item_name, "Dinner");

        let missing = Uuid::new_v4();
        assert_eq!(
            find_expense(&expenses, missing),
            Err(EngineError::KeyNotFound(missing.to_string()))
        );
    }
}
