//! Conversion of the store's ledger file into engine records.

use std::path::Path;

use api_types::ledger::{ExpenseRow, Ledger, SettlementType};
use engine::{Currency, Expense, Money, Participant, Split};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// A trip ready to be settled.
#[derive(Debug)]
pub struct Trip {
    pub name: Option<String>,
    pub currency: Currency,
    pub participants: Vec<Participant>,
    pub expenses: Vec<Expense>,
}

pub fn load(path: &Path, default_currency: Currency) -> Result<Trip> {
    let raw = std::fs::read_to_string(path)?;
    let ledger: Ledger = serde_json::from_str(&raw)?;
    let trip = convert(ledger, default_currency)?;
    tracing::info!(
        participants = trip.participants.len(),
        expenses = trip.expenses.len(),
        "loaded ledger {}",
        path.display()
    );
    Ok(trip)
}

pub fn convert(ledger: Ledger, default_currency: Currency) -> Result<Trip> {
    if ledger.participants.is_empty() {
        return Err(AppError::Ledger("ledger has no participants".to_string()));
    }
    let currency = ledger.currency.map_or(default_currency, engine_currency);

    let participants = ledger
        .participants
        .into_iter()
        .map(|row| Participant::new(row.id, row.name))
        .collect();
    let expenses = ledger
        .expenses
        .into_iter()
        .map(|row| expense(row, currency))
        .collect();

    Ok(Trip {
        name: ledger.trip,
        currency,
        participants,
        expenses,
    })
}

fn engine_currency(currency: api_types::Currency) -> Currency {
    match currency {
        api_types::Currency::Krw => Currency::Krw,
        api_types::Currency::Jpy => Currency::Jpy,
        api_types::Currency::Eur => Currency::Eur,
        api_types::Currency::Usd => Currency::Usd,
    }
}

/// Daily rows win over the settlement type; a missing custom amount counts
/// as zero.
fn split(row: &ExpenseRow) -> Split {
    if !row.daily_participants.is_empty() {
        return Split::daily(
            row.daily_participants
                .iter()
                .map(|daily| (daily.date, [daily.participant_id.as_str()])),
        );
    }
    match row.settlement_type {
        SettlementType::Equal => Split::equal(
            row.expense_participants
                .iter()
                .map(|participant| participant.participant_id.as_str()),
        ),
        SettlementType::Custom => Split::custom(row.expense_participants.iter().map(|participant| {
            (
                participant.participant_id.as_str(),
                Money::new(participant.custom_amount.unwrap_or_default()),
            )
        })),
    }
}

fn expense(row: ExpenseRow, ledger_currency: Currency) -> Expense {
    let split = split(&row);
    let currency = row.currency.map_or(ledger_currency, engine_currency);
    let mut expense = Expense::new(
        row.item_name,
        Money::new(row.amount),
        row.payer_id,
        split,
        currency,
        row.date,
    )
    .with_id(row.id.unwrap_or_else(Uuid::new_v4));
    expense.category = row.category;
    expense
}
