//! Command-line parsing.

use std::str::FromStr;

use anyhow::{Context, anyhow, bail};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use werkbank_core::DocumentId;

pub const USAGE: &str = "\
usage: werkbank [--today YYYY-MM-DD] <command>

commands:
  dashboard              company figures as of today
  receivables            aging, customer balances and dunning levels
  overdue                overdue invoices, longest overdue first
  refresh-overdue        flag past-due open invoices as ueberfaellig
  dun <document-id>      send the next dunning notice
  pay <document-id> <amount>
                         book a payment (negative amounts correct)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dashboard,
    Receivables,
    Overdue,
    RefreshOverdue,
    Dun { id: DocumentId },
    Pay { id: DocumentId, amount: Decimal },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Overrides the business date (defaults to the local calendar day).
    pub today: Option<NaiveDate>,
    pub command: Command,
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date {raw:?}, expected YYYY-MM-DD"))
}

fn parse_id(raw: Option<String>) -> anyhow::Result<DocumentId> {
    let raw = raw.ok_or_else(|| anyhow!("missing <document-id>"))?;
    Ok(DocumentId::from_str(&raw)?)
}

pub fn parse<I>(args: I) -> anyhow::Result<Invocation>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut today = None;

    let name = loop {
        match args.next() {
            Some(flag) if flag == "--today" => {
                let raw = args.next().ok_or_else(|| anyhow!("--today needs a date"))?;
                today = Some(parse_date(&raw)?);
            }
            Some(name) => break name,
            None => {
                return Ok(Invocation {
                    today,
                    command: Command::Help,
                });
            }
        }
    };

    let command = match name.as_str() {
        "dashboard" => Command::Dashboard,
        "receivables" => Command::Receivables,
        "overdue" => Command::Overdue,
        "refresh-overdue" => Command::RefreshOverdue,
        "dun" => Command::Dun {
            id: parse_id(args.next())?,
        },
        "pay" => {
            let id = parse_id(args.next())?;
            let raw = args.next().ok_or_else(|| anyhow!("missing <amount>"))?;
            let amount = Decimal::from_str(&raw)
                .with_context(|| format!("invalid amount {raw:?}"))?;
            Command::Pay { id, amount }
        }
        "help" | "-h" | "--help" => Command::Help,
        other => bail!("unknown command {other:?}\n\n{USAGE}"),
    };

    if let Some(extra) = args.next() {
        bail!("unexpected argument {extra:?}");
    }
    Ok(Invocation { today, command })
}
