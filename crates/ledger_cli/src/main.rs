use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use engine::{EngineError, ExpenseId, Ledger, MemberId, Money};
use thiserror::Error;

mod render;

#[derive(Debug, Error)]
enum AppError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Parser, Debug)]
#[command(name = "ledger_cli")]
#[command(about = "Offline settlement reports over a ledger snapshot")]
struct Cli {
    /// Snapshot JSON file (`{"members": [...], "expenses": [...]}`).
    #[arg(long, env = "SPLITLEDGER_SNAPSHOT", default_value = "ledger.json")]
    snapshot: PathBuf,

    /// Log engine warnings and debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print balances, the settlement plan and member summaries.
    Report(ReportArgs),
    /// Mark a member's share of an expense as paid.
    Pay(PaymentArgs),
    /// Reverse a previously recorded payment.
    Unpay(PaymentArgs),
    /// Pay a member back, oldest expenses first.
    Settle(SettleArgs),
    /// Fail on the first malformed expense.
    Validate,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Machine-readable output.
    #[arg(long)]
    json: bool,
    /// Ignore payment flags and show what everyone spent and consumed.
    #[arg(long)]
    gross: bool,
}

#[derive(Args, Debug)]
struct PaymentArgs {
    #[arg(long)]
    expense: String,
    #[arg(long)]
    member: String,
}

#[derive(Args, Debug)]
struct SettleArgs {
    /// Member paying back.
    #[arg(long)]
    from: String,
    /// Member being paid.
    #[arg(long)]
    to: String,
    /// Amount such as `12.50`; everything owed when omitted.
    #[arg(long)]
    amount: Option<Money>,
}

fn load(path: &Path) -> Result<Ledger, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let ledger: Ledger = serde_json::from_str(&raw)?;
    tracing::debug!(
        path = %path.display(),
        members = ledger.members.len(),
        expenses = ledger.expenses.len(),
        "snapshot loaded"
    );
    Ok(ledger)
}

fn save(path: &Path, ledger: &Ledger) -> Result<(), AppError> {
    std::fs::write(path, serde_json::to_string_pretty(ledger)?)?;
    tracing::debug!(path = %path.display(), "snapshot saved");
    Ok(())
}

fn toggle(path: &Path, args: PaymentArgs, paid: bool) -> Result<(), AppError> {
    let mut ledger = load(path)?;
    let expense = ExpenseId::from(args.expense);
    let member = MemberId::from(args.member);

    if ledger.set_paid(&expense, &member, paid, Utc::now())? {
        save(path, &ledger)?;
        println!(
            "{member} marked {} on {expense}",
            if paid { "paid" } else { "unpaid" }
        );
    } else {
        tracing::warn!(
            %expense,
            %member,
            paid,
            "payment already in that state, snapshot untouched"
        );
    }
    Ok(())
}

fn settle(path: &Path, args: SettleArgs) -> Result<(), AppError> {
    let mut ledger = load(path)?;
    let (from, to) = (MemberId::from(args.from), MemberId::from(args.to));

    let repayment = ledger.settle_with(&from, &to, args.amount, Utc::now())?;
    if repayment.expenses.is_empty() {
        tracing::warn!(%from, %to, "nothing owed, snapshot untouched");
        return Ok(());
    }
    save(path, &ledger)?;
    println!(
        "{from} paid {to} {} of {} owed ({} shares)",
        repayment.applied,
        repayment.owed,
        repayment.expenses.len()
    );
    if repayment.unapplied().is_positive() {
        println!("{} left over, too small for the next share", repayment.unapplied());
    }
    Ok(())
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!("ledger_cli={level},engine={level}"))
        .init();

    match cli.command {
        Command::Report(args) => {
            let ledger = load(&cli.snapshot)?;
            if args.gross {
                let balances = ledger.gross_balances();
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&balances)?);
                } else {
                    print!("{}", render::BalancesText(&balances));
                }
            } else {
                let report = ledger.report();
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print!("{}", render::ReportText(&report));
                }
            }
        }
        Command::Pay(args) => toggle(&cli.snapshot, args, true)?,
        Command::Unpay(args) => toggle(&cli.snapshot, args, false)?,
        Command::Settle(args) => settle(&cli.snapshot, args)?,
        Command::Validate => {
            load(&cli.snapshot)?.validate()?;
            println!("ok");
        }
    }

    Ok(())
}
