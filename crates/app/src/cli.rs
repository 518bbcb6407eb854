use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Args, Parser, Subcommand};
use engine::{Category, validate};

#[derive(Parser, Debug)]
#[command(name = "spendbook")]
#[command(about = "Record expenses and follow your monthly budget")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    pub config: Option<String>,
    /// Override the sqlite database file.
    #[arg(long)]
    pub database: Option<String>,
    /// Use a throwaway in-memory database.
    #[arg(long)]
    pub memory: bool,
    /// Override the preferences file.
    #[arg(long)]
    pub preferences: Option<String>,
    /// Override the log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a new expense.
    Add(AddArgs),
    /// List expenses, newest first.
    List(ListArgs),
    /// Show a single expense.
    Show { id: i64 },
    /// Replace an expense; omitted fields keep their current value.
    Edit(EditArgs),
    /// Delete an expense.
    Delete { id: i64 },
    /// Delete every expense.
    Clear {
        /// Required confirmation.
        #[arg(long)]
        yes: bool,
    },
    /// Totals, daily and monthly series, categories and budget.
    Report(ReportArgs),
    /// Show or change the monthly budget.
    Budget(Budget),
    /// Show or change the theme preference.
    Theme {
        /// light, dark or system.
        mode: Option<String>,
    },
    /// Write every expense as CSV.
    Export {
        /// Output file; stdout when omitted.
        #[arg(long)]
        out: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    /// Amount, `.` or `,` as decimal separator.
    #[arg(long)]
    pub amount: String,
    /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM[:SS]`; defaults to now.
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDateTime>,
    #[arg(long, default_value = "other")]
    pub category: Category,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Inclusive lower bound.
    #[arg(long, value_parser = parse_date_arg, requires = "to")]
    pub from: Option<NaiveDateTime>,
    /// Inclusive upper bound; a bare date covers the whole day.
    #[arg(long, value_parser = parse_end_date_arg, requires = "from")]
    pub to: Option<NaiveDateTime>,
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub category: Option<Category>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: i64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub amount: Option<String>,
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDateTime>,
    #[arg(long)]
    pub category: Option<Category>,
}

pub const MAX_REPORT_DAYS: i64 = 366;
pub const MAX_REPORT_MONTHS: i64 = 120;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Days in the daily series.
    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=MAX_REPORT_DAYS))]
    pub days: u32,
    /// Months in the monthly series.
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(1..=MAX_REPORT_MONTHS))]
    pub months: u32,
}

#[derive(Args, Debug)]
pub struct Budget {
    #[command(subcommand)]
    pub command: Option<BudgetCommand>,
}

#[derive(Subcommand, Debug)]
pub enum BudgetCommand {
    /// Set the monthly budget.
    Set { amount: String },
    /// Remove the monthly budget.
    Clear,
}

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

fn parse_date_with(raw: &str, bare_date_time: NaiveTime) -> Result<NaiveDateTime, String> {
    let raw = raw.trim();
    let date = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(bare_date_time))
        })
        .ok_or_else(|| format!("invalid date '{raw}', expected YYYY-MM-DD[THH:MM[:SS]]"))?;
    validate::validate_date(date).map_err(|err| err.to_string())
}

/// Parses a date; a bare date means midnight.
pub fn parse_date_arg(raw: &str) -> Result<NaiveDateTime, String> {
    parse_date_with(raw, NaiveTime::MIN)
}

/// Parses an upper bound; a bare date means its last millisecond.
pub fn parse_end_date_arg(raw: &str) -> Result<NaiveDateTime, String> {
    let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    parse_date_with(raw, end_of_day)
}
