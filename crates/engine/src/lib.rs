//! Settlement engine for shared trip expenses.
//!
//! Turns expense records into what each participant owes, their net
//! balances and a short list of transfers that settles everybody:
//!
//! 1. [`compute_owed_totals`] folds expenses into per-participant owed totals;
//! 2. [`compute_balances`] nets them against what each participant paid;
//! 3. [`minimize_transfers`] matches creditors and debtors greedily;
//! 4. [`validate_settlement`] and [`validate_transfers`] check the outcome.
//!
//! [`Engine::settle`] runs the whole pipeline, auditing the input first.
//! Everything is pure and synchronous: no I/O, no shared state.

use serde::{Deserialize, Serialize};

pub use aggregate::{SplitDetail, UserTotal, compute_owed_totals, split_details};
pub use audit::{InputIssue, InputPolicy, Severity, audit};
pub use balances::{SettlementBalance, compute_balances};
pub use currency::Currency;
pub use error::EngineError;
pub use expense::{CustomShare, Expense, Split, find_expense};
pub use money::{Money, MoneyDisplay};
pub use participant::{Participant, ParticipantId};
pub use snapshot::{SettlementSnapshot, SnapshotRow};
pub use summary::{
    CategoryTotal, DailyTotal, UNCATEGORIZED, category_totals, daily_totals, expenses_on,
    trip_total,
};
pub use transfers::{ParticipantTransfers, SettlementTransfer, minimize_transfers, transfers_of};
pub use validate::{SettlementCheck, TransferCheck, validate_settlement, validate_transfers};

mod aggregate;
mod audit;
mod balances;
mod currency;
mod error;
mod expense;
mod money;
mod participant;
mod snapshot;
mod summary;
mod transfers;
mod validate;

type ResultEngine<T> = Result<T, EngineError>;

/// Everything a settlement run produces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    pub currency: Currency,
    /// Sum of every expense amount.
    pub trip_total: Money,
    pub totals: Vec<UserTotal>,
    /// Pre-transfer balances.
    pub balances: Vec<SettlementBalance>,
    pub transfers: Vec<SettlementTransfer>,
    pub settlement_check: SettlementCheck,
    pub transfer_check: TransferCheck,
    /// Malformed input tolerated by the run.
    pub issues: Vec<InputIssue>,
}

#[derive(Clone, Debug, Default)]
pub struct Engine {
    policy: InputPolicy,
    currency: Currency,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Runs the full pipeline over a snapshot of expenses and the roster.
    ///
    /// The input is audited first. With [`InputPolicy::Strict`] the first
    /// integrity issue aborts the run; otherwise every issue is logged,
    /// returned in the report, and the computation proceeds. Totals out of
    /// the `i64` range abort the run under either policy.
    pub fn settle(
        &self,
        expenses: &[Expense],
        participants: &[Participant],
    ) -> ResultEngine<SettlementReport> {
        let issues = audit(expenses, participants, self.currency);
        for issue in &issues {
            let fatal = matches!(issue, InputIssue::AmountOverflow { .. })
                || (self.policy == InputPolicy::Strict && issue.severity() == Severity::Integrity);
            if fatal {
                return Err(issue.clone().into());
            }
            match issue.severity() {
                Severity::Integrity => tracing::warn!(
                    expense = %issue.expense_id(),
                    "tolerating malformed input: {issue}"
                ),
                Severity::Ignorable => tracing::debug!(
                    expense = %issue.expense_id(),
                    "ignoring input: {issue}"
                ),
            }
        }

        let totals = compute_owed_totals(expenses, participants);
        let balances = compute_balances(expenses, &totals);
        let transfers = minimize_transfers(&balances);
        let settlement_check = validate_settlement(&balances);
        let transfer_check = validate_transfers(&balances, &transfers);
        if !settlement_check.is_valid {
            tracing::warn!("{}", settlement_check.message);
        }
        if !transfer_check.is_valid {
            tracing::warn!("{}", transfer_check.message);
        }
        tracing::debug!(
            expenses = expenses.len(),
            participants = totals.len(),
            transfers = transfers.len(),
            "settlement computed"
        );

        Ok(SettlementReport {
            currency: self.currency,
            trip_total: trip_total(expenses),
            totals,
            balances,
            transfers,
            settlement_check,
            transfer_check,
            issues,
        })
    }
}

#[derive(Debug, Default)]
pub struct EngineBuilder {
    policy: InputPolicy,
    currency: Currency,
}

impl EngineBuilder {
    /// Pass how malformed input is handled.
    pub fn policy(mut self, policy: InputPolicy) -> EngineBuilder {
        self.policy = policy;
        self
    }

    /// Pass the currency every expense is expected in.
    pub fn currency(mut self, currency: Currency) -> EngineBuilder {
        self.currency = currency;
        self
    }

    /// Build the Engine.
    pub fn build(self) -> Engine {
        Engine {
            policy: self.policy,
            currency: self.currency,
        }
    }
}
