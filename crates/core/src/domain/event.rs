use serde::{Deserialize, Serialize};

/// Calendar and demand signals around the target date.
///
/// Day counts are plain numbers so that requests written as `2` or `2.0`
/// both parse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExternalEvent {
    /// The target date is itself a holiday.
    Holiday {
        #[serde(default)]
        distance_days: f64,
    },
    /// The target date is 1..=3 days away from a holiday.
    HolidayAdjacent {
        #[serde(default = "default_adjacent_distance")]
        distance_days: f64,
    },
    /// Lead time to the target date compared with the listing's usual lead time.
    BookingUrgency {
        #[serde(default = "default_avg_advance_days")]
        avg_advance_days: f64,
        #[serde(default = "default_days_until_target")]
        days_until_target: f64,
    },
}

fn default_adjacent_distance() -> f64 {
    3.0
}

fn default_avg_advance_days() -> f64 {
    14.0
}

fn default_days_until_target() -> f64 {
    30.0
}
