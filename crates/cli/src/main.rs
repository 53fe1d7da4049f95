mod command;

use anyhow::Context;
use chrono::Local;
use serde_json::json;

use werkbank_billing::business_date;
use werkbank_infra::{AppConfig, BillingService, BillingSettings, JsonFileRecordStore};

use crate::command::{Command, USAGE};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    werkbank_observability::init(&config.log);

    let invocation = command::parse(std::env::args().skip(1))?;
    let today = invocation
        .today
        .unwrap_or_else(|| business_date(&Local::now()));

    if invocation.command == Command::Help {
        println!("{USAGE}");
        return Ok(());
    }

    let store = JsonFileRecordStore::open(&config.data_dir)
        .with_context(|| format!("opening data dir {}", config.data_dir.display()))?;
    tracing::debug!(data_dir = %config.data_dir.display(), %today, "store opened");
    let service = BillingService::new(store, BillingSettings::from(&config));

    let output = match invocation.command {
        Command::Dashboard => serde_json::to_value(service.dashboard(today)?)?,
        Command::Receivables => serde_json::to_value(service.receivables(today)?)?,
        Command::Overdue => serde_json::to_value(service.overdue_invoices(today)?)?,
        Command::RefreshOverdue => json!({ "flagged": service.refresh_overdue(today)? }),
        Command::Dun { id } => serde_json::to_value(service.send_dunning(id, today)?)?,
        Command::Pay { id, amount } => {
            serde_json::to_value(service.record_payment(id, amount, today)?)?
        }
        Command::Help => return Ok(()),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
