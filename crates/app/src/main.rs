use std::{io::Write, path::PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::{Engine, InputPolicy, SettlementSnapshot};
use uuid::Uuid;

use error::Result;
use settings::{OutputFormat, Settings};

mod error;
mod ledger;
mod render;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "tripsplit")]
#[command(about = "Settle shared trip expenses with as few transfers as possible")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    config: Option<String>,

    /// Override the output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute balances and the transfer plan.
    Settle(SettleArgs),
    /// Show how one expense is split.
    Details(DetailsArgs),
    /// Spending per category and per day.
    Summary(LedgerArgs),
    /// Freeze the owed totals into a shareable snapshot.
    Snapshot(SnapshotArgs),
    /// List malformed input in the ledger.
    Audit(LedgerArgs),
}

#[derive(Args, Debug)]
struct LedgerArgs {
    /// Ledger file exported by the expense store (also read from `TRIPSPLIT_LEDGER`).
    #[arg(long, env = "TRIPSPLIT_LEDGER")]
    ledger: PathBuf,
}

#[derive(Args, Debug)]
struct SettleArgs {
    #[command(flatten)]
    source: LedgerArgs,
    /// Only settle expenses recorded on this date (YYYY-MM-DD).
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Reject ledgers with integrity issues.
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct DetailsArgs {
    #[command(flatten)]
    source: LedgerArgs,
    #[arg(long)]
    expense: Uuid,
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    #[command(flatten)]
    source: LedgerArgs,
    /// Defaults to the trip name.
    #[arg(long)]
    title: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tripsplit={level},engine={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let format = cli.format.unwrap_or(settings.format);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Settle(args) => settle(&settings, format, args, &mut out),
        Command::Details(args) => details(&settings, format, args, &mut out),
        Command::Summary(args) => summary(&settings, format, args, &mut out),
        Command::Snapshot(args) => snapshot(&settings, format, args, &mut out),
        Command::Audit(args) => audit(&settings, format, args, &mut out),
    }
}

fn settle(
    settings: &Settings,
    format: OutputFormat,
    args: SettleArgs,
    out: &mut impl Write,
) -> Result<()> {
    let trip = ledger::load(&args.source.ledger, settings.currency)?;
    let expenses = match args.date {
        Some(date) => engine::expenses_on(&trip.expenses, date),
        None => trip.expenses,
    };
    let policy = if args.strict {
        InputPolicy::Strict
    } else {
        settings.policy
    };

    let report = Engine::builder()
        .policy(policy)
        .currency(trip.currency)
        .build()
        .settle(&expenses, &trip.participants)?;

    match format {
        OutputFormat::Text => render::settlement_text(trip.name.as_deref(), &report, out),
        OutputFormat::Json => render::json(&report, out),
        OutputFormat::Csv => render::transfers_csv(&report, out),
    }
}

fn details(
    settings: &Settings,
    format: OutputFormat,
    args: DetailsArgs,
    out: &mut impl Write,
) -> Result<()> {
    let trip = ledger::load(&args.source.ledger, settings.currency)?;
    let expense = engine::find_expense(&trip.expenses, args.expense)?;
    let details = engine::split_details(expense, &trip.participants);
    match format {
        OutputFormat::Json => render::json(&details, out),
        _ => render::details_text(expense, &details, out),
    }
}

fn summary(
    settings: &Settings,
    format: OutputFormat,
    args: LedgerArgs,
    out: &mut impl Write,
) -> Result<()> {
    let trip = ledger::load(&args.ledger, settings.currency)?;
    let summary = render::Summary {
        currency: trip.currency,
        trip_total: engine::trip_total(&trip.expenses),
        categories: engine::category_totals(&trip.expenses),
        days: engine::daily_totals(&trip.expenses),
    };
    match format {
        OutputFormat::Json => render::json(&summary, out),
        _ => render::summary_text(&summary, out),
    }
}

fn snapshot(
    settings: &Settings,
    format: OutputFormat,
    args: SnapshotArgs,
    out: &mut impl Write,
) -> Result<()> {
    let trip = ledger::load(&args.source.ledger, settings.currency)?;
    let report = Engine::builder()
        .policy(settings.policy)
        .currency(trip.currency)
        .build()
        .settle(&trip.expenses, &trip.participants)?;
    let title = args
        .title
        .or(trip.name)
        .unwrap_or_else(|| "Settlement".to_string());
    let snapshot = SettlementSnapshot::capture(title, &report.totals);
    tracing::info!(snapshot = %snapshot.id, "snapshot captured");
    match format {
        OutputFormat::Text => render::snapshot_text(&snapshot, trip.currency, out),
        _ => render::json(&snapshot, out),
    }
}

fn audit(
    settings: &Settings,
    format: OutputFormat,
    args: LedgerArgs,
    out: &mut impl Write,
) -> Result<()> {
    let trip = ledger::load(&args.ledger, settings.currency)?;
    let issues = engine::audit(&trip.expenses, &trip.participants, trip.currency);
    match format {
        OutputFormat::Json => render::json(&issues, out),
        _ => render::issues_text(&issues, out),
    }
}
