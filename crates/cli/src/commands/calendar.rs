use std::path::Path;

use betastay_core::domain::event::ExternalEvent;
use betastay_core::errors::ApplicationError;
use betastay_core::pricing::{DayKind, PricingEngine};
use betastay_core::signals::holiday_events;
use chrono::NaiveDate;
use serde::Serialize;

use crate::commands::{load_config, CommandResult};

#[derive(Debug, Serialize)]
struct CalendarReport {
    date: NaiveDate,
    day: DayKind,
    external_events: Vec<ExternalEvent>,
}

/// Classifies `date` against the configured holiday calendar and lists the
/// holiday events a collaborator would attach to a request for it.
pub fn run(date: NaiveDate, config_path: Option<&Path>) -> CommandResult {
    match execute(date, config_path) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::from_error("calendar", &error),
    }
}

fn execute(date: NaiveDate, config_path: Option<&Path>) -> Result<String, ApplicationError> {
    let config = load_config(config_path)?;
    let engine = PricingEngine::new(config.pricing);
    let holidays = engine.holidays();

    let report = CalendarReport {
        date,
        day: holidays.classify(date),
        external_events: holiday_events(holidays, date),
    };

    serde_json::to_string_pretty(&report).map_err(|error| {
        ApplicationError::InvalidRequest(format!("calendar report serialization failed: {error}"))
    })
}
