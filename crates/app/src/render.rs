//! Output of the CLI commands.
//!
//! Text is for people; JSON mirrors the engine types; CSV carries the
//! transfer plan only.

use std::io::Write;

use api_types::export::TransferRow;
use engine::{
    CategoryTotal, Currency, DailyTotal, Expense, InputIssue, Money, SettlementBalance,
    SettlementReport, SettlementSnapshot, Severity, SplitDetail,
};
use serde::Serialize;

use crate::error::Result;

#[derive(Debug, Serialize)]
pub struct Summary {
    pub currency: Currency,
    pub trip_total: Money,
    pub categories: Vec<CategoryTotal>,
    pub days: Vec<DailyTotal>,
}

pub fn json<T: Serialize>(value: &T, out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn api_currency(currency: Currency) -> api_types::Currency {
    match currency {
        Currency::Krw => api_types::Currency::Krw,
        Currency::Jpy => api_types::Currency::Jpy,
        Currency::Eur => api_types::Currency::Eur,
        Currency::Usd => api_types::Currency::Usd,
    }
}

pub fn transfers_csv(report: &SettlementReport, out: &mut impl Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for transfer in &report.transfers {
        writer.serialize(TransferRow {
            from_id: transfer.from.id.to_string(),
            from_name: transfer.from.name.clone(),
            to_id: transfer.to.id.to_string(),
            to_name: transfer.to.name.clone(),
            amount_minor: transfer.amount.minor(),
            currency: api_currency(report.currency),
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn settlement_text(
    trip: Option<&str>,
    report: &SettlementReport,
    out: &mut impl Write,
) -> Result<()> {
    let currency = report.currency;
    if let Some(trip) = trip {
        writeln!(out, "{trip}")?;
    }
    writeln!(out, "Total spent: {}", report.trip_total.display(currency))?;
    writeln!(out)?;

    writeln!(out, "Balances")?;
    for balance in &report.balances {
        writeln!(
            out,
            "  {:<16} paid {:>14}  owes {:>14}  net {:>14}",
            balance.participant_name,
            balance.total_paid.display(currency).to_string(),
            balance.total_owed.display(currency).to_string(),
            balance.net_balance.display(currency).to_string(),
        )?;
    }
    writeln!(out)?;

    if report.transfers.is_empty() {
        writeln!(out, "Nothing to settle.")?;
    } else {
        writeln!(out, "Transfers")?;
        for transfer in &report.transfers {
            writeln!(
                out,
                "  {} -> {}: {}",
                transfer.from.name,
                transfer.to.name,
                transfer.amount.display(currency)
            )?;
        }
        writeln!(out)?;
        writeln!(out, "By participant")?;
        for balance in &report.balances {
            participant_transfers_text(report, balance, out)?;
        }
    }
    writeln!(out)?;

    writeln!(out, "{}", report.settlement_check.message)?;
    writeln!(out, "{}", report.transfer_check.message)?;
    if !report.issues.is_empty() {
        writeln!(
            out,
            "{} input issue(s), run `tripsplit audit` for details",
            report.issues.len()
        )?;
    }
    Ok(())
}

fn participant_transfers_text(
    report: &SettlementReport,
    balance: &SettlementBalance,
    out: &mut impl Write,
) -> Result<()> {
    let currency = report.currency;
    let plan = engine::transfers_of(&report.transfers, &balance.participant_id);
    writeln!(out, "  {}", balance.participant_name)?;
    if plan.to_send.is_empty() && plan.to_receive.is_empty() {
        writeln!(out, "    nothing to send or receive")?;
        return Ok(());
    }
    for transfer in &plan.to_send {
        writeln!(
            out,
            "    send {} to {}",
            transfer.amount.display(currency),
            transfer.to.name
        )?;
    }
    if plan.to_send.len() > 1 {
        writeln!(out, "    send {} in total", plan.total_to_send().display(currency))?;
    }
    for transfer in &plan.to_receive {
        writeln!(
            out,
            "    receive {} from {}",
            transfer.amount.display(currency),
            transfer.from.name
        )?;
    }
    if plan.to_receive.len() > 1 {
        writeln!(out, "    receive {} in total", plan.total_to_receive().display(currency))?;
    }
    Ok(())
}

pub fn details_text(
    expense: &Expense,
    details: &[SplitDetail],
    out: &mut impl Write,
) -> Result<()> {
    let currency = expense.currency;
    writeln!(
        out,
        "{} ({}) paid by {}: {}",
        expense.item_name,
        expense.date,
        expense.payer_id,
        expense.amount.display(currency)
    )?;
    for detail in details {
        write!(
            out,
            "  {:<16} {:>14}",
            detail.participant_name,
            detail.amount.display(currency).to_string()
        )?;
        if detail.dates.is_empty() {
            writeln!(out)?;
        } else {
            let dates: Vec<String> = detail.dates.iter().map(ToString::to_string).collect();
            writeln!(out, "  ({})", dates.join(", "))?;
        }
    }
    let charged: Money = details.iter().map(|detail| detail.amount).sum();
    writeln!(out, "  charged {}", charged.display(currency))?;
    Ok(())
}

pub fn summary_text(summary: &Summary, out: &mut impl Write) -> Result<()> {
    let currency = summary.currency;
    writeln!(out, "Total spent: {}", summary.trip_total.display(currency))?;
    writeln!(out)?;
    writeln!(out, "By category")?;
    for category in &summary.categories {
        writeln!(
            out,
            "  {:<16} {:>14}  ({} expense(s))",
            category.name,
            category.amount.display(currency).to_string(),
            category.expenses
        )?;
    }
    writeln!(out)?;
    writeln!(out, "By day")?;
    for day in &summary.days {
        writeln!(out, "  {}  {:>14}", day.date, day.amount.display(currency).to_string())?;
    }
    Ok(())
}

pub fn snapshot_text(
    snapshot: &SettlementSnapshot,
    currency: Currency,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(
        out,
        "{} ({}, {})",
        snapshot.title,
        snapshot.id,
        snapshot.created_at.to_rfc3339()
    )?;
    for row in &snapshot.rows {
        writeln!(
            out,
            "  {:<16} {:>14}",
            row.participant_name,
            row.total_amount.display(currency).to_string()
        )?;
    }
    Ok(())
}

pub fn issues_text(issues: &[InputIssue], out: &mut impl Write) -> Result<()> {
    if issues.is_empty() {
        writeln!(out, "No input issues.")?;
        return Ok(());
    }
    for issue in issues {
        let label = match issue.severity() {
            Severity::Ignorable => "ignorable",
            Severity::Integrity => "integrity",
        };
        writeln!(out, "[{label}] {issue}")?;
    }
    Ok(())
}
