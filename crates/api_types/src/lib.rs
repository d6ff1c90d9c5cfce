use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Krw,
    Jpy,
    Eur,
    Usd,
}

/// Ledger file exported by the expense store: the roster and every expense
/// of one trip, with the participant rows attached to each expense.
pub mod ledger {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct Ledger {
        /// Trip name, used as default snapshot title.
        pub trip: Option<String>,
        /// Currency of the whole ledger; expenses may override it.
        pub currency: Option<Currency>,
        pub participants: Vec<ParticipantRow>,
        #[serde(default)]
        pub expenses: Vec<ExpenseRow>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantRow {
        pub id: String,
        pub name: String,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SettlementType {
        #[default]
        Equal,
        Custom,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseRow {
        /// Generated when missing.
        pub id: Option<Uuid>,
        pub item_name: String,
        /// Amount in minor units.
        pub amount: i64,
        pub payer_id: String,
        pub currency: Option<Currency>,
        #[serde(default)]
        pub settlement_type: SettlementType,
        pub date: NaiveDate,
        pub category: Option<String>,
        #[serde(default)]
        pub expense_participants: Vec<ExpenseParticipantRow>,
        /// When present, the expense is prorated per day and
        /// `expense_participants` is ignored.
        #[serde(default)]
        pub daily_participants: Vec<DailyParticipantRow>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseParticipantRow {
        pub participant_id: String,
        /// Only meaningful for `custom` expenses, in minor units.
        pub custom_amount: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyParticipantRow {
        pub participant_id: String,
        pub date: NaiveDate,
    }
}

/// Flat rows written by the CSV export.
pub mod export {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferRow {
        pub from_id: String,
        pub from_name: String,
        pub to_id: String,
        pub to_name: String,
        pub amount_minor: i64,
        pub currency: Currency,
    }
}

#[cfg(test)]
mod tests {
    use super::ledger::*;
    use super::*;

    #[test]
    fn ledger_rows_use_store_defaults() {
        let json = r#"{
            "currency": "KRW",
            "participants": [{ "id": "a", "name": "Ann" }],
            "expenses": [{
                "item_name": "Hotel",
                "amount": 300000,
                "payer_id": "a",
                "date": "2024-07-01",
                "daily_participants": [{ "participant_id": "a", "date": "2024-07-01" }]
            }]
        }"#;
        let ledger: Ledger = serde_json::from_str(json).unwrap();
        assert_eq!(ledger.currency, Some(Currency::Krw));
        assert!(ledger.trip.is_none());

        let expense = &ledger.expenses[0];
        assert!(expense.id.is_none());
        assert_eq!(expense.settlement_type, SettlementType::Equal);
        assert!(expense.expense_participants.is_empty());
        assert_eq!(
            expense.daily_participants[0].date,
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
        );
    }
}
