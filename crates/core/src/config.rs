use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::Factor;

pub const CONFIG_FILE_NAME: &str = "betastay.toml";
pub const NESTED_CONFIG_FILE_PATH: &str = "config/betastay.toml";

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub pricing: PricingConfig,
    pub logging: LoggingConfig,
}

/// Everything the pricing engine reads. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub weights: FactorWeights,
    pub time_factors: TimeFactors,
    pub price_tiers: PriceTiers,
    pub holiday_calendar: HolidayCalendar,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub owner_preference: f64,
    pub historical_performance: f64,
    pub time_factor: f64,
    pub market_factor: f64,
    pub property_base: f64,
    pub external_event: f64,
}

/// Multipliers applied as `multiplier - 1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeFactors {
    #[serde(alias = "holiday_multiplier")]
    pub holiday: f64,
    #[serde(alias = "weekend_multiplier")]
    pub weekend: f64,
    #[serde(alias = "weekday_multiplier")]
    pub weekday: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceTiers {
    pub conservative_offset: f64,
    pub aggressive_offset: f64,
}

/// Holiday name to the dates it covers.
pub type HolidayCalendar = BTreeMap<String, BTreeSet<NaiveDate>>;

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub conservative_offset: Option<f64>,
    pub aggressive_offset: Option<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            owner_preference: 0.25,
            historical_performance: 0.20,
            time_factor: 0.20,
            market_factor: 0.15,
            property_base: 0.10,
            external_event: 0.10,
        }
    }
}

impl FactorWeights {
    pub fn weight(&self, factor: Factor) -> f64 {
        match factor {
            Factor::OwnerPreference => self.owner_preference,
            Factor::HistoricalPerformance => self.historical_performance,
            Factor::TimeFactor => self.time_factor,
            Factor::MarketFactor => self.market_factor,
            Factor::PropertyBase => self.property_base,
            Factor::ExternalEvent => self.external_event,
        }
    }

    fn weight_mut(&mut self, factor: Factor) -> &mut f64 {
        match factor {
            Factor::OwnerPreference => &mut self.owner_preference,
            Factor::HistoricalPerformance => &mut self.historical_performance,
            Factor::TimeFactor => &mut self.time_factor,
            Factor::MarketFactor => &mut self.market_factor,
            Factor::PropertyBase => &mut self.property_base,
            Factor::ExternalEvent => &mut self.external_event,
        }
    }

    pub fn total(&self) -> f64 {
        Factor::ALL.iter().map(|factor| self.weight(*factor)).sum()
    }
}

impl Default for TimeFactors {
    fn default() -> Self {
        Self { holiday: 1.30, weekend: 1.15, weekday: 1.00 }
    }
}

impl Default for PriceTiers {
    fn default() -> Self {
        Self { conservative_offset: -0.10, aggressive_offset: 0.15 }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            time_factors: TimeFactors::default(),
            price_tiers: PriceTiers::default(),
            holiday_calendar: default_holiday_calendar(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

/// 2026 statutory holidays observed in mainland China.
pub fn default_holiday_calendar() -> HolidayCalendar {
    const HOLIDAYS_2026: [(&str, (u32, u32), (u32, u32)); 7] = [
        ("new_year", (1, 1), (1, 3)),
        ("spring_festival", (2, 15), (2, 23)),
        ("qingming", (4, 4), (4, 6)),
        ("labor_day", (5, 1), (5, 5)),
        ("dragon_boat", (6, 19), (6, 21)),
        ("mid_autumn", (9, 25), (9, 27)),
        ("national_day", (10, 1), (10, 7)),
    ];

    HOLIDAYS_2026
        .iter()
        .map(|(name, (start_month, start_day), (end_month, end_day))| {
            let start = NaiveDate::from_ymd_opt(2026, *start_month, *start_day);
            let end = NaiveDate::from_ymd_opt(2026, *end_month, *end_day);
            let dates = match (start, end) {
                (Some(start), Some(end)) => {
                    start.iter_days().take_while(|day| *day <= end).collect()
                }
                _ => BTreeSet::new(),
            };
            ((*name).to_string(), dates)
        })
        .collect()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(pricing) = patch.pricing {
            if let Some(weights) = pricing.weights {
                for (factor, value) in weights.entries() {
                    if let Some(value) = value {
                        *self.pricing.weights.weight_mut(factor) = value;
                    }
                }
            }

            if let Some(time_factors) = pricing.time_factors {
                if let Some(holiday) = time_factors.holiday {
                    self.pricing.time_factors.holiday = holiday;
                }
                if let Some(weekend) = time_factors.weekend {
                    self.pricing.time_factors.weekend = weekend;
                }
                if let Some(weekday) = time_factors.weekday {
                    self.pricing.time_factors.weekday = weekday;
                }
            }

            if let Some(price_tiers) = pricing.price_tiers {
                if let Some(conservative_offset) = price_tiers.conservative_offset {
                    self.pricing.price_tiers.conservative_offset = conservative_offset;
                }
                if let Some(aggressive_offset) = price_tiers.aggressive_offset {
                    self.pricing.price_tiers.aggressive_offset = aggressive_offset;
                }
            }

            // A configured calendar describes a whole year and replaces the built-in one.
            if let Some(holidays) = pricing.holidays {
                self.pricing.holiday_calendar = holidays;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        for factor in Factor::ALL {
            let key = weight_env_key(factor);
            if let Some(value) = read_env(&key) {
                *self.pricing.weights.weight_mut(factor) = parse_f64(&key, &value)?;
            }
        }

        if let Some(value) = read_env("BETASTAY_PRICING_HOLIDAY_MULTIPLIER") {
            self.pricing.time_factors.holiday =
                parse_f64("BETASTAY_PRICING_HOLIDAY_MULTIPLIER", &value)?;
        }
        if let Some(value) = read_env("BETASTAY_PRICING_WEEKEND_MULTIPLIER") {
            self.pricing.time_factors.weekend =
                parse_f64("BETASTAY_PRICING_WEEKEND_MULTIPLIER", &value)?;
        }
        if let Some(value) = read_env("BETASTAY_PRICING_WEEKDAY_MULTIPLIER") {
            self.pricing.time_factors.weekday =
                parse_f64("BETASTAY_PRICING_WEEKDAY_MULTIPLIER", &value)?;
        }

        if let Some(value) = read_env("BETASTAY_PRICING_CONSERVATIVE_OFFSET") {
            self.pricing.price_tiers.conservative_offset =
                parse_f64("BETASTAY_PRICING_CONSERVATIVE_OFFSET", &value)?;
        }
        if let Some(value) = read_env("BETASTAY_PRICING_AGGRESSIVE_OFFSET") {
            self.pricing.price_tiers.aggressive_offset =
                parse_f64("BETASTAY_PRICING_AGGRESSIVE_OFFSET", &value)?;
        }

        let log_level =
            read_env("BETASTAY_LOGGING_LEVEL").or_else(|| read_env("BETASTAY_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("BETASTAY_LOGGING_FORMAT").or_else(|| read_env("BETASTAY_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(conservative_offset) = overrides.conservative_offset {
            self.pricing.price_tiers.conservative_offset = conservative_offset;
        }
        if let Some(aggressive_offset) = overrides.aggressive_offset {
            self.pricing.price_tiers.aggressive_offset = aggressive_offset;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_weights(&self.pricing.weights)?;
        validate_time_factors(&self.pricing.time_factors)?;
        validate_price_tiers(&self.pricing.price_tiers)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// Environment key for a factor weight, e.g. `BETASTAY_PRICING_WEIGHT_MARKET_FACTOR`.
pub fn weight_env_key(factor: Factor) -> String {
    format!("BETASTAY_PRICING_WEIGHT_{}", factor.as_str().to_ascii_uppercase())
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(CONFIG_FILE_NAME), PathBuf::from(NESTED_CONFIG_FILE_PATH)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_weights(weights: &FactorWeights) -> Result<(), ConfigError> {
    for factor in Factor::ALL {
        let weight = weights.weight(factor);
        if !weight.is_finite() || weight < 0.0 {
            return Err(ConfigError::Validation(format!(
                "pricing.weights.{} must be a finite, non-negative number",
                factor.as_str()
            )));
        }
    }

    Ok(())
}

fn validate_time_factors(time_factors: &TimeFactors) -> Result<(), ConfigError> {
    let multipliers = [
        ("holiday", time_factors.holiday),
        ("weekend", time_factors.weekend),
        ("weekday", time_factors.weekday),
    ];
    for (name, multiplier) in multipliers {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(ConfigError::Validation(format!(
                "pricing.time_factors.{name} must be a finite, non-negative multiplier"
            )));
        }
    }

    Ok(())
}

fn validate_price_tiers(price_tiers: &PriceTiers) -> Result<(), ConfigError> {
    if !price_tiers.conservative_offset.is_finite() || !price_tiers.aggressive_offset.is_finite()
    {
        return Err(ConfigError::Validation(
            "pricing.price_tiers offsets must be finite numbers".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    pricing: Option<PricingPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct PricingPatch {
    weights: Option<WeightsPatch>,
    time_factors: Option<TimeFactorsPatch>,
    price_tiers: Option<PriceTiersPatch>,
    holidays: Option<HolidayCalendar>,
}

#[derive(Debug, Default, Deserialize)]
struct WeightsPatch {
    owner_preference: Option<f64>,
    historical_performance: Option<f64>,
    time_factor: Option<f64>,
    market_factor: Option<f64>,
    property_base: Option<f64>,
    external_event: Option<f64>,
}

impl WeightsPatch {
    fn entries(&self) -> [(Factor, Option<f64>); 6] {
        [
            (Factor::OwnerPreference, self.owner_preference),
            (Factor::HistoricalPerformance, self.historical_performance),
            (Factor::TimeFactor, self.time_factor),
            (Factor::MarketFactor, self.market_factor),
            (Factor::PropertyBase, self.property_base),
            (Factor::ExternalEvent, self.external_event),
        ]
    }
}

#[derive(Debug, Default, Deserialize)]
struct TimeFactorsPatch {
    #[serde(alias = "holiday_multiplier")]
    holiday: Option<f64>,
    #[serde(alias = "weekend_multiplier")]
    weekend: Option<f64>,
    #[serde(alias = "weekday_multiplier")]
    weekday: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct PriceTiersPatch {
    conservative_offset: Option<f64>,
    aggressive_offset: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
