use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::preference::{OwnerPreference, DEFAULT_VACANCY_TOLERANCE};

/// Area assumed when a listing does not report one. Sits between the small
/// and large thresholds so it earns neither adjustment.
pub const DEFAULT_AREA_SQM: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    #[serde(alias = "whole-unit", alias = "整套")]
    WholeUnit,
    #[serde(alias = "private-room", alias = "单间")]
    PrivateRoom,
    #[serde(alias = "shared-room")]
    SharedRoom,
    #[serde(other)]
    Other,
}

impl RoomType {
    pub fn is_whole_unit(self) -> bool {
        matches!(self, Self::WholeUnit)
    }
}

/// Listing attributes the engine prices from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub room_type: RoomType,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub facilities: BTreeMap<String, Value>,
}

impl PropertyInfo {
    pub fn new(room_type: RoomType, area: f64) -> Self {
        Self { room_type, area: Some(area), facilities: BTreeMap::new() }
    }

    pub fn area_or_default(&self) -> f64 {
        self.area.unwrap_or(DEFAULT_AREA_SQM)
    }
}

/// A stored listing together with the owner's nullable preference columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    pub address: String,
    pub room_type: RoomType,
    pub area: f64,
    #[serde(default)]
    pub facilities: BTreeMap<String, Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub expected_return_rate: Option<f64>,
    #[serde(default)]
    pub vacancy_tolerance: Option<f64>,
}

impl Property {
    /// Owner preference with unset columns replaced by engine defaults.
    /// A stored zero counts as unset, so a zero ceiling means no ceiling and
    /// a zero vacancy tolerance falls back to the neutral default.
    pub fn owner_preference(&self) -> OwnerPreference {
        OwnerPreference {
            min_price: self.min_price.unwrap_or(0.0),
            max_price: set_value(self.max_price),
            expected_return_rate: self.expected_return_rate.unwrap_or(0.0),
            vacancy_tolerance: set_value(self.vacancy_tolerance)
                .unwrap_or(DEFAULT_VACANCY_TOLERANCE),
        }
    }

    pub fn property_info(&self) -> PropertyInfo {
        PropertyInfo {
            room_type: self.room_type,
            area: Some(self.area),
            facilities: self.facilities.clone(),
        }
    }
}

/// `None` for a missing or zero column.
pub(crate) fn set_value(column: Option<f64>) -> Option<f64> {
    column.filter(|value| *value != 0.0)
}
