use std::process::exit;

use clap::{Parser, ValueEnum};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use tallyup::{
    JsonFileSource, ReportAggregator, TransactionSource,
    date_policy::retain_past_transactions,
    report::{CarryOver, bucket::PeriodKind},
    source::carry_over,
    timezone::DEFAULT_TIMEZONE,
};

/// Print a weekly, monthly or all-time report as JSON.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the JSON file holding the transaction records.
    #[arg(long)]
    transactions: String,

    /// The period to report on.
    #[arg(long, value_enum, default_value_t = Period::Weekly)]
    period: Period,

    /// The year of a monthly report. Defaults to the current year.
    #[arg(long)]
    year: Option<i32>,

    /// The canonical timezone that decides what "today" is, e.g. "Asia/Kolkata".
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    timezone: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Period {
    Weekly,
    Monthly,
    Total,
}

impl From<Period> for PeriodKind {
    fn from(period: Period) -> Self {
        match period {
            Period::Weekly => PeriodKind::Weekly,
            Period::Monthly => PeriodKind::Monthly,
            Period::Total => PeriodKind::Total,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(json) => println!("{json}"),
        Err(error) => {
            eprintln!("Error: {error}");
            exit(1);
        }
    }
}

fn run(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    let aggregator = ReportAggregator::at(&args.timezone, OffsetDateTime::now_utc())?;
    let today = aggregator.today();

    let mut transactions = JsonFileSource::new(&args.transactions).transactions()?;
    retain_past_transactions(&mut transactions, today);

    let period_kind = PeriodKind::from(args.period);
    let year = args.year.unwrap_or(today.year());
    let carry = match period_kind {
        PeriodKind::Monthly => carry_over(&transactions, year, today),
        PeriodKind::Weekly | PeriodKind::Total => CarryOver::default(),
    };

    let report = aggregator.report(period_kind, &transactions, Some(year), carry)?;

    Ok(serde_json::to_string_pretty(&report)?)
}
