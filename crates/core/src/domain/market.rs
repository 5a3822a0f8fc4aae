use serde::{Deserialize, Serialize};

/// Suggested-price statistics for comparable listings and for this listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub similar_avg: Option<f64>,
    #[serde(default)]
    pub similar_min: Option<f64>,
    #[serde(default)]
    pub similar_max: Option<f64>,
    #[serde(default)]
    pub own_avg: Option<f64>,
}

impl MarketData {
    pub fn new(similar_avg: f64, own_avg: f64) -> Self {
        Self { similar_avg: Some(similar_avg), own_avg: Some(own_avg), ..Self::default() }
    }
}
