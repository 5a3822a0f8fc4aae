use std::path::Path;

use betastay_core::config::{AppConfig, PricingConfig};
use betastay_core::pricing::HolidayIndex;
use serde::Serialize;

use crate::commands::{escape_json, load_config};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

const PRICING_CHECKS: [&str; 3] = ["weight_sum", "tier_offsets", "holiday_calendar"];

pub fn run(json_output: bool, config_path: Option<&Path>) -> String {
    let report = build_report(load_config(config_path).map_err(|error| error.to_string()));

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report(config: Result<AppConfig, String>) -> DoctorReport {
    let mut checks = Vec::new();

    match config {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_weight_sum(&config.pricing));
            checks.push(check_tier_offsets(&config.pricing));
            checks.push(check_holiday_calendar(&config.pricing));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error,
            });
            checks.extend(PRICING_CHECKS.into_iter().map(|name| DoctorCheck {
                name,
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            }));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_weight_sum(pricing: &PricingConfig) -> DoctorCheck {
    let total = pricing.weights.total();
    let status = if (total - 1.0).abs() <= WEIGHT_SUM_TOLERANCE {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    };
    DoctorCheck { name: "weight_sum", status, details: format!("factor weights sum to {total:.4}") }
}

fn check_tier_offsets(pricing: &PricingConfig) -> DoctorCheck {
    let tiers = &pricing.price_tiers;
    let ordered = tiers.conservative_offset <= 0.0 && tiers.aggressive_offset >= 0.0;
    DoctorCheck {
        name: "tier_offsets",
        status: if ordered { CheckStatus::Pass } else { CheckStatus::Fail },
        details: format!(
            "conservative {:+.2}, aggressive {:+.2}",
            tiers.conservative_offset, tiers.aggressive_offset
        ),
    }
}

fn check_holiday_calendar(pricing: &PricingConfig) -> DoctorCheck {
    let holidays = HolidayIndex::from_calendar(&pricing.holiday_calendar);
    if holidays.is_empty() {
        return DoctorCheck {
            name: "holiday_calendar",
            status: CheckStatus::Fail,
            details: "no holiday dates configured; only weekends will be recognised".to_string(),
        };
    }

    DoctorCheck {
        name: "holiday_calendar",
        status: CheckStatus::Pass,
        details: format!(
            "{} holidays covering {} dates",
            pricing.holiday_calendar.len(),
            holidays.len()
        ),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
