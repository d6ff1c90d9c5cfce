//! Owed totals: folds expenses into what each participant has to bear.
//!
//! Every expense is first turned into a list of [`Share`]s by
//! [`expense_shares`]; the totals and the per-expense detail view both build
//! on that list, so they always agree to the unit.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Expense, Money, Participant, ParticipantId, Split};

/// What one participant has to bear over the whole trip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTotal {
    pub id: ParticipantId,
    pub name: String,
    /// Owed from regular expenses.
    pub regular_amount: Money,
    /// Reserved for trip-wide shared costs; always zero for now.
    pub shared_amount: Money,
    pub total_amount: Money,
}

impl UserTotal {
    fn zero(participant: &Participant) -> Self {
        Self {
            id: participant.id.clone(),
            name: participant.name.clone(),
            regular_amount: Money::ZERO,
            shared_amount: Money::ZERO,
            total_amount: Money::ZERO,
        }
    }
}

/// A slice of one expense charged to one participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Share<'a> {
    pub participant: &'a ParticipantId,
    pub amount: Money,
    /// Day the share was charged for (daily splits only).
    pub date: Option<NaiveDate>,
}

/// Divides `amount` evenly among `people`, the remainder to the first one.
fn even_shares(amount: Money, people: &[ParticipantId], date: Option<NaiveDate>) -> Vec<Share<'_>> {
    let Some((each, remainder)) = amount.split(people.len()) else {
        return Vec::new();
    };
    people
        .iter()
        .enumerate()
        .map(|(index, participant)| Share {
            participant,
            amount: if index == 0 { each + remainder } else { each },
            date,
        })
        .collect()
}

/// Breaks one expense into per-participant shares.
///
/// Empty splits yield no shares. Days nobody attended do not count as days
/// of a daily split, so their allotment is never lost.
pub(crate) fn expense_shares(expense: &Expense) -> Vec<Share<'_>> {
    match &expense.split {
        Split::Equal { participants } => even_shares(expense.amount, participants, None),
        Split::Custom { shares } => shares
            .iter()
            .map(|share| Share {
                participant: &share.participant_id,
                amount: share.amount,
                date: None,
            })
            .collect(),
        Split::Daily { days } => {
            let present: Vec<_> = days.iter().filter(|(_, people)| !people.is_empty()).collect();
            let Some((daily, remainder)) = expense.amount.split(present.len()) else {
                return Vec::new();
            };
            present
                .into_iter()
                .enumerate()
                .flat_map(|(index, (date, people))| {
                    let allotted = if index == 0 { daily + remainder } else { daily };
                    even_shares(allotted, people, Some(*date))
                })
                .collect()
        }
    }
}

/// Computes one [`UserTotal`] per roster participant, in roster order.
///
/// Participants without activity get zero totals. Expenses with an empty
/// split are skipped and shares of participants outside the roster are
/// dropped. Totals saturate at the `i64` bounds. Use [`audit`](crate::audit)
/// to surface any of these cases.
pub fn compute_owed_totals(expenses: &[Expense], participants: &[Participant]) -> Vec<UserTotal> {
    let mut totals: Vec<UserTotal> = Vec::with_capacity(participants.len());
    let mut index: HashMap<&ParticipantId, usize> = HashMap::with_capacity(participants.len());
    for participant in participants {
        if index.contains_key(&participant.id) {
            continue;
        }
        index.insert(&participant.id, totals.len());
        totals.push(UserTotal::zero(participant));
    }

    for expense in expenses {
        if expense.split.is_empty() {
            tracing::warn!(expense = %expense.id, "skipping expense with an empty split");
            continue;
        }
        for share in expense_shares(expense) {
            match index.get(share.participant) {
                Some(&position) => {
                    let total = &mut totals[position];
                    total.regular_amount = total.regular_amount.saturating_add(share.amount);
                }
                None => tracing::warn!(
                    expense = %expense.id,
                    participant = %share.participant,
                    "dropping share of a participant outside the roster"
                ),
            }
        }
    }

    for total in &mut totals {
        total.total_amount = total.regular_amount.saturating_add(total.shared_amount);
    }
    totals
}

/// Share of a single expense borne by one participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitDetail {
    pub participant_id: ParticipantId,
    pub participant_name: String,
    pub amount: Money,
    /// Days charged for, ascending; empty unless the split is daily.
    pub dates: Vec<NaiveDate>,
}

/// Per-participant breakdown of one expense, in order of first share.
///
/// Uses the same arithmetic as [`compute_owed_totals`]; participants outside
/// the roster are left out.
pub fn split_details(expense: &Expense, participants: &[Participant]) -> Vec<SplitDetail> {
    let names: HashMap<&ParticipantId, &str> = participants
        .iter()
        .map(|participant| (&participant.id, participant.name.as_str()))
        .collect();

    let mut details: Vec<SplitDetail> = Vec::new();
    let mut position: HashMap<&ParticipantId, usize> = HashMap::new();
    for share in expense_shares(expense) {
        let Some(name) = names.get(share.participant) else {
            continue;
        };
        let at = *position.entry(share.participant).or_insert_with(|| {
            details.push(SplitDetail {
                participant_id: share.participant.clone(),
                participant_name: (*name).to_string(),
                amount: Money::ZERO,
                dates: Vec::new(),
            });
            details.len() - 1
        });
        let detail = &mut details[at];
        detail.amount = detail.amount.saturating_add(share.amount);
        if let Some(date) = share.date {
            detail.dates.push(date);
        }
    }
    details
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Currency;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn roster() -> Vec<Participant> {
        vec![
            Participant::new("a", "Ann"),
            Participant::new("b", "Ben"),
            Participant::new("c", "Cleo"),
        ]
    }

    fn expense(amount: i64, payer: &str, split: Split) -> Expense {
        Expense::new("item", Money::new(amount), payer, split, Currency::Krw, day(1))
    }

    fn owed(totals: &[UserTotal]) -> Vec<i64> {
        totals.iter().map(|total| total.total_amount.minor()).collect()
    }

    #[test]
    fn equal_split_gives_remainder_to_first_listed() {
        let item = expense(100, "a", Split::equal(["a", "b", "c"]));
        let totals = compute_owed_totals(&[item], &roster());
        assert_eq!(owed(&totals), vec![34, 33, 33]);
    }

    #[test]
    fn remainder_follows_split_order_not_roster_order() {
        let item = expense(100, "a", Split::equal(["c", "a", "b"]));
        let totals = compute_owed_totals(&[item], &roster());
        assert_eq!(owed(&totals), vec![33, 33, 34]);
    }

    #[test]
    fn custom_split_is_taken_verbatim() {
        let split = Split::custom([("a", Money::new(70)), ("c", Money::new(20))]);
        let totals = compute_owed_totals(&[expense(100, "a", split)], &roster());
        assert_eq!(owed(&totals), vec![70, 0, 20]);
    }

    #[test]
    fn daily_split_prorates_by_day_then_by_person() {
        let split = Split::daily([
            (day(1), vec!["a", "b"]),
            (day(2), vec!["a"]),
            (day(3), vec!["b", "c"]),
        ]);
        let totals = compute_owed_totals(&[expense(300, "a", split)], &roster());
        assert_eq!(owed(&totals), vec![150, 100, 50]);
    }

    #[test]
    fn daily_remainder_goes_to_earliest_date() {
        // 100 over 3 days: 34 / 33 / 33.
        let split = Split::daily([
            (day(3), vec!["c"]),
            (day(1), vec!["a"]),
            (day(2), vec!["b"]),
        ]);
        let totals = compute_owed_totals(&[expense(100, "a", split)], &roster());
        assert_eq!(owed(&totals), vec![34, 33, 33]);
    }

    #[test]
    fn empty_days_do_not_absorb_money() {
        let split = Split::daily([(day(1), vec!["a", "b"]), (day(2), vec![])]);
        let totals = compute_owed_totals(&[expense(100, "a", split)], &roster());
        assert_eq!(owed(&totals), vec![50, 50, 0]);
    }

    #[test]
    fn empty_split_is_skipped() {
        let totals = compute_owed_totals(
            &[expense(100, "a", Split::equal(Vec::<&str>::new()))],
            &roster(),
        );
        assert_eq!(owed(&totals), vec![0, 0, 0]);
    }

    #[test]
    fn totals_are_roster_complete_and_deduplicated() {
        let mut participants = roster();
        participants.push(Participant::new("a", "Ann again"));
        let totals = compute_owed_totals(&[], &participants);
        assert_eq!(totals.len(), 3);
        assert!(totals.iter().all(|total| total.total_amount.is_zero()
            && total.shared_amount.is_zero()
            && total.regular_amount.is_zero()));
        assert_eq!(totals[0].name, "Ann");
    }

    #[test]
    fn unknown_participant_share_is_dropped() {
        let item = expense(90, "a", Split::equal(["a", "zed", "b"]));
        let totals = compute_owed_totals(&[item], &roster());
        assert_eq!(owed(&totals), vec![30, 30, 0]);
    }

    #[test]
    fn huge_totals_saturate_instead_of_panicking() {
        let big = i64::MAX / 2 + 1;
        let expenses = vec![
            expense(big, "a", Split::equal(["a"])),
            expense(big, "a", Split::equal(["a"])),
        ];
        let totals = compute_owed_totals(&expenses, &roster());
        assert_eq!(owed(&totals), vec![i64::MAX, 0, 0]);
    }

    #[test]
    fn split_details_collect_dates_per_participant() {
        let split = Split::daily([
            (day(1), vec!["a", "b"]),
            (day(2), vec!["a"]),
            (day(3), vec!["b", "c"]),
        ]);
        let details = split_details(&expense(300, "a", split), &roster());
        assert_eq!(
            details,
            vec![
                SplitDetail {
                    participant_id: "a".into(),
                    participant_name: "Ann".into(),
                    amount: Money::new(150),
                    dates: vec![day(1), day(2)],
                },
                SplitDetail {
                    participant_id: "b".into(),
                    participant_name: "Ben".into(),
                    amount: Money::new(100),
                    dates: vec![day(1), day(3)],
                },
                SplitDetail {
                    participant_id: "c".into(),
                    participant_name: "Cleo".into(),
                    amount: Money::new(50),
                    dates: vec![day(3)],
                },
            ]
        );
    }

    #[test]
    fn split_details_match_owed_totals() {
        let item = expense(1_001, "b", Split::equal(["b", "c", "a"]));
        let details = split_details(&item, &roster());
        let detail_sum: Money = details.iter().map(|detail| detail.amount).sum();
        assert_eq!(detail_sum, Money::new(1_001));
        assert_eq!(details[0].participant_id, ParticipantId::from("b"));
        assert_eq!(details[0].amount, Money::new(335));
        assert!(details.iter().all(|detail| detail.dates.is_empty()));
    }
}
