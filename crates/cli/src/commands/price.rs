use std::fs;
use std::path::Path;

use betastay_core::errors::ApplicationError;
use betastay_core::pricing::{report::render_breakdown, PricingEngine, PricingRequest};
use tracing::info;

use crate::commands::{load_config, CommandResult};

/// Prices one request file. Prints the result JSON, or the breakdown table
/// when `table` is set.
pub fn run(request_path: &Path, config_path: Option<&Path>, table: bool) -> CommandResult {
    match execute(request_path, config_path, table) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::from_error("price", &error),
    }
}

fn execute(
    request_path: &Path,
    config_path: Option<&Path>,
    table: bool,
) -> Result<String, ApplicationError> {
    let config = load_config(config_path)?;
    let request = read_request(request_path)?;

    let engine = PricingEngine::new(config.pricing);
    let result = engine.calculate(&request);

    info!(
        event_name = "cli.price.completed",
        request_path = %request_path.display(),
        target_date = %request.target_date,
        suggested_price = result.suggested_price,
        "pricing request evaluated"
    );

    if table {
        return Ok(render_breakdown(&result));
    }

    serde_json::to_string_pretty(&result).map_err(|error| {
        ApplicationError::InvalidRequest(format!("result could not be serialized: {error}"))
    })
}

fn read_request(path: &Path) -> Result<PricingRequest, ApplicationError> {
    let raw = fs::read_to_string(path)
        .map_err(|error| ApplicationError::Io(format!("{}: {error}", path.display())))?;
    let request: PricingRequest = serde_json::from_str(&raw).map_err(|error| {
        ApplicationError::InvalidRequest(format!("{}: {error}", path.display()))
    })?;

    if !request.base_price.is_finite() {
        return Err(ApplicationError::InvalidRequest(format!(
            "{}: base_price must be a finite number",
            path.display()
        )));
    }

    Ok(request)
}
