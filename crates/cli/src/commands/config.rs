use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use betastay_core::config::{weight_env_key, AppConfig, CONFIG_FILE_NAME, NESTED_CONFIG_FILE_PATH};
use betastay_core::pricing::{Factor, HolidayIndex};
use toml::Value;

use crate::commands::{load_config, CommandResult};

/// Attributes each effective value to env, file or default.
struct SourceResolver {
    file_doc: Option<Value>,
    file_path: Option<PathBuf>,
}

/// Effective configuration as text, one line per value. A config that fails
/// to load is reported as a JSON failure outcome.
pub fn run(config_path: Option<&Path>) -> CommandResult {
    match load_config(config_path) {
        Ok(config) => CommandResult { exit_code: 0, output: render(&config, config_path) },
        Err(error) => CommandResult::from_error("config", &error),
    }
}

fn render(config: &AppConfig, config_path: Option<&Path>) -> String {
    let file_path = detect_config_path(config_path);
    let resolver =
        SourceResolver { file_doc: load_config_file_doc(file_path.as_deref()), file_path };

    let mut lines =
        vec!["effective config (source precedence: env > file > default):".to_string()];

    for factor in Factor::ALL {
        let key_path = format!("pricing.weights.{}", factor.as_str());
        let env_key = weight_env_key(factor);
        lines.push(render_line(
            &key_path,
            &config.pricing.weights.weight(factor).to_string(),
            resolver.source(&[key_path.as_str()], &[env_key.as_str()]),
        ));
    }

    let time_factors = &config.pricing.time_factors;
    for (day, multiplier) in [
        ("holiday", time_factors.holiday),
        ("weekend", time_factors.weekend),
        ("weekday", time_factors.weekday),
    ] {
        let key_path = format!("pricing.time_factors.{day}");
        let alias_path = format!("{key_path}_multiplier");
        let env_key = format!("BETASTAY_PRICING_{}_MULTIPLIER", day.to_ascii_uppercase());
        lines.push(render_line(
            &key_path,
            &multiplier.to_string(),
            resolver.source(&[key_path.as_str(), alias_path.as_str()], &[env_key.as_str()]),
        ));
    }

    let price_tiers = &config.pricing.price_tiers;
    for (tier, offset) in [
        ("conservative", price_tiers.conservative_offset),
        ("aggressive", price_tiers.aggressive_offset),
    ] {
        let key_path = format!("pricing.price_tiers.{tier}_offset");
        let env_key = format!("BETASTAY_PRICING_{}_OFFSET", tier.to_ascii_uppercase());
        lines.push(render_line(
            &key_path,
            &offset.to_string(),
            resolver.source(&[key_path.as_str()], &[env_key.as_str()]),
        ));
    }

    let holidays = HolidayIndex::from_calendar(&config.pricing.holiday_calendar);
    lines.push(render_line(
        "pricing.holidays",
        &format!(
            "{} holidays covering {} dates",
            config.pricing.holiday_calendar.len(),
            holidays.len()
        ),
        resolver.source(&["pricing.holidays"], &[]),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        resolver.source(&["logging.level"], &["BETASTAY_LOGGING_LEVEL", "BETASTAY_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        resolver.source(&["logging.format"], &["BETASTAY_LOGGING_FORMAT", "BETASTAY_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then_some(path.to_path_buf());
    }

    [CONFIG_FILE_NAME, NESTED_CONFIG_FILE_PATH]
        .into_iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

impl SourceResolver {
    fn source(&self, file_keys: &[&str], env_keys: &[&str]) -> String {
        if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
            return format!("env ({env_key})");
        }

        if let Some(doc) = &self.file_doc {
            if file_keys.iter().any(|key_path| contains_path(doc, key_path)) {
                let file_path = self
                    .file_path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
