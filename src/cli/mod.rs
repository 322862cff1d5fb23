//! Command-line front end over a JSON dataset exported from the dashboard.

pub mod dataset;
pub mod output;
pub mod table;

use std::path::PathBuf;
use std::str::FromStr;

use chrono::Weekday;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::Config;
use crate::core::conflicts::{detect_conflicts, validate_new_interval};
use crate::core::services::PaymentBook;
use crate::core::validation::ValidationErrors;
use crate::domain::{time_format, Displayable, IntervalDraft};
use crate::errors::CoreError;

use dataset::Dataset;
use output::{format_message, MessageKind};
use table::{Table, TableColumn};

pub const USAGE: &str = "\
usage:
  tutordesk_cli allocate <dataset.json> <payer> <amount>
  tutordesk_cli conflicts <dataset.json>
  tutordesk_cli check-interval <dataset.json> <owner> <day> <HH:MM> <HH:MM>
  tutordesk_cli version";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}\n{USAGE}")]
    Usage(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("interval rejected: {0}")]
    Rejected(ValidationErrors),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            CliError::Core(_) => 1,
            CliError::Rejected(_) => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Allocate {
        dataset: PathBuf,
        payer: String,
        amount: String,
    },
    Conflicts {
        dataset: PathBuf,
    },
    CheckInterval {
        dataset: PathBuf,
        draft: IntervalDraft,
    },
    Version,
    Help,
}

pub fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let words: Vec<&str> = args.iter().map(String::as_str).collect();
    match words.as_slice() {
        [] | ["help"] | ["--help"] | ["-h"] => Ok(Command::Help),
        ["version"] | ["--version"] => Ok(Command::Version),
        ["allocate", dataset, payer, amount] => Ok(Command::Allocate {
            dataset: PathBuf::from(dataset),
            payer: payer.to_string(),
            amount: amount.to_string(),
        }),
        ["conflicts", dataset] => Ok(Command::Conflicts {
            dataset: PathBuf::from(dataset),
        }),
        ["check-interval", dataset, owner, day, start, end] => {
            let day = Weekday::from_str(day)
                .map_err(|_| CliError::Usage(format!("unknown day `{day}`")))?;
            let start = parse_clock(start)?;
            let end = parse_clock(end)?;
            Ok(Command::CheckInterval {
                dataset: PathBuf::from(dataset),
                draft: IntervalDraft::available(owner.to_string(), day, start, end),
            })
        }
        [command, ..] => Err(CliError::Usage(format!(
            "unknown command or wrong arguments: `{command}`"
        ))),
    }
}

fn parse_clock(raw: &str) -> Result<chrono::NaiveTime, CliError> {
    time_format::parse_time(raw)
        .ok_or_else(|| CliError::Usage(format!("invalid time `{raw}`, expected HH:MM")))
}

/// Executes `command` and returns the report to print.
pub fn run(command: Command, config: &Config) -> Result<String, CliError> {
    match command {
        Command::Help => Ok(USAGE.to_string()),
        Command::Version => Ok(version_line()),
        Command::Allocate {
            dataset,
            payer,
            amount,
        } => {
            let dataset = Dataset::load(&dataset)?;
            allocation_report(dataset, &payer, &amount, config)
        }
        Command::Conflicts { dataset } => Ok(conflict_report(Dataset::load(&dataset)?)),
        Command::CheckInterval { dataset, draft } => {
            let dataset = Dataset::load(&dataset)?;
            let existing = detect_conflicts(&dataset.availability);
            let interval = validate_new_interval(&draft, &existing).map_err(CliError::Rejected)?;
            Ok(format_message(
                MessageKind::Success,
                format!("interval accepted: {}", interval.display_label()),
            ))
        }
    }
}

fn allocation_report(
    dataset: Dataset,
    payer: &str,
    amount: &str,
    config: &Config,
) -> Result<String, CliError> {
    let precision = config.precision();
    let mut book = PaymentBook::from_config(config);
    book.replace_outstanding(dataset.line_items)?;
    let preview = book.preview(payer, amount)?;
    let allocation = &preview.allocation;

    let mut lines = vec![format_message(
        MessageKind::Section,
        format!("Coverage for {}", preview.payer_id),
    )];
    if let Some(issue) = &preview.amount_issue {
        lines.push(format_message(
            MessageKind::Warning,
            format!("{issue}; treated as 0"),
        ));
    }

    let mut outstanding = book.outstanding_for(&preview.payer_id);
    outstanding.sort_by_key(|item| item.date);
    let mut table = Table::new(vec![
        TableColumn::left("Item"),
        TableColumn::left("Date"),
        TableColumn::right("Price"),
        TableColumn::left("Status"),
    ]);
    for item in &outstanding {
        let status = if allocation.covers(&item.id) {
            "covered"
        } else if item.valid_price().is_none() {
            "invalid price"
        } else {
            "outstanding"
        };
        table.push_row(vec![
            item.id.clone(),
            item.date.to_string(),
            item.valid_price()
                .map(|price| money(price, precision))
                .unwrap_or_else(|| "-".into()),
            status.to_string(),
        ]);
    }
    lines.push(table.render());
    lines.push(format_message(
        MessageKind::Info,
        format!(
            "Covered {} item(s): {} applied, remaining credit {} {}",
            allocation.covered_count(),
            money(allocation.total_covered, precision),
            money(allocation.remaining_credit, precision),
            config.currency
        ),
    ));
    Ok(lines.join("\n"))
}

fn conflict_report(dataset: Dataset) -> String {
    let intervals = detect_conflicts(&dataset.availability);
    let flagged = intervals.iter().filter(|i| i.has_conflict).count();

    let mut table = Table::new(vec![
        TableColumn::left("Owner"),
        TableColumn::left("Day"),
        TableColumn::left("From"),
        TableColumn::left("To"),
        TableColumn::left("Available"),
        TableColumn::left("Conflict"),
    ]);
    let clock = |time: Option<chrono::NaiveTime>| {
        time.map(time_format::format_time)
            .unwrap_or_else(|| "-".into())
    };
    for interval in &intervals {
        table.push_row(vec![
            interval.owner_id.clone(),
            interval.day.to_string(),
            clock(interval.start),
            clock(interval.end),
            if interval.available { "yes" } else { "no" }.to_string(),
            if interval.has_conflict { "CONFLICT" } else { "" }.to_string(),
        ]);
    }

    let summary = format!("{flagged} of {} interval(s) in conflict", intervals.len());
    let summary = if flagged > 0 {
        format_message(MessageKind::Warning, summary)
    } else {
        format_message(MessageKind::Success, summary)
    };
    [table.render(), summary].join("\n")
}

fn money(value: Decimal, precision: u32) -> String {
    let mut value = value.round_dp(precision);
    value.rescale(precision);
    value.to_string()
}

fn version_line() -> String {
    format!(
        "tutordesk_cli {} ({} {}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("TUTORDESK_BUILD_HASH"),
        env!("TUTORDESK_BUILD_PROFILE"),
        env!("TUTORDESK_BUILD_TIMESTAMP"),
    )
}
