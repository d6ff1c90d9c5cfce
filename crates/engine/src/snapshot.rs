//! Immutable settlement snapshots for read-only views.
//!
//! A snapshot freezes the owed totals at capture time. A viewer that no
//! longer has the expenses can rebuild the [`UserTotal`]s from it and display
//! them as they were.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Money, ParticipantId, UserTotal};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub participant_id: ParticipantId,
    pub participant_name: String,
    pub regular_amount: Money,
    pub shared_amount: Money,
    pub total_amount: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementSnapshot {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub rows: Vec<SnapshotRow>,
}

impl SettlementSnapshot {
    /// Captures `totals` as they are now.
    pub fn capture(title: impl Into<String>, totals: &[UserTotal]) -> Self {
        Self::capture_at(title, totals, Utc::now())
    }

    pub fn capture_at(
        title: impl Into<String>,
        totals: &[UserTotal],
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            created_at,
            rows: totals
                .iter()
                .map(|total| SnapshotRow {
                    participant_id: total.id.clone(),
                    participant_name: total.name.clone(),
                    regular_amount: total.regular_amount,
                    shared_amount: total.shared_amount,
                    total_amount: total.total_amount,
                })
                .collect(),
        }
    }

    /// Rebuilds the owed totals frozen in the snapshot.
    pub fn user_totals(&self) -> Vec<UserTotal> {
        self.rows
            .iter()
            .map(|row| UserTotal {
                id: row.participant_id.clone(),
                name: row.participant_name.clone(),
                regular_amount: row.regular_amount,
                shared_amount: row.shared_amount,
                total_amount: row.total_amount,
            })
            .collect()
    }

    /// Sum of every frozen owed total.
    pub fn total(&self) -> Money {
        self.rows.iter().map(|row| row.total_amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::{
        Currency, Expense, Participant, Split, compute_balances, compute_owed_totals,
        minimize_transfers,
    };

    #[test]
    fn snapshot_rebuilds_totals_for_a_read_only_view() {
        let roster = vec![Participant::new("a", "Ann"), Participant::new("b", "Ben")];
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let expenses = vec![Expense::new(
            "Taxi",
            Money::new(10_001),
            "a",
            Split::equal(["a", "b"]),
            Currency::Krw,
            date,
        )];
        let totals = compute_owed_totals(&expenses, &roster);
        let created_at = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();
        let snapshot = SettlementSnapshot::capture_at("Busan", &totals, created_at);

        assert_eq!(snapshot.created_at, created_at);
        assert_eq!(snapshot.total(), Money::new(10_001));
        assert_eq!(snapshot.user_totals(), totals);

        let balances = compute_balances(&expenses, &snapshot.user_totals());
        let transfers = minimize_transfers(&balances);
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].amount, Money::new(5_000));
    }

    #[test]
    fn snapshot_survives_json() {
        let totals = vec![UserTotal {
            id: "a".into(),
            name: "Ann".into(),
            regular_amount: Money::new(7),
            shared_amount: Money::ZERO,
            total_amount: Money::new(7),
        }];
        let snapshot = SettlementSnapshot::capture("Jeju", &totals);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"regular_amount\":7"));
        let back: SettlementSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
