use serde::{Deserialize, Serialize};

pub const DEFAULT_VACANCY_TOLERANCE: f64 = 0.5;

/// Owner-side pricing preferences.
///
/// `max_price` is `None` when the owner has not set a ceiling; the tiers are
/// then only bounded from below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OwnerPreference {
    #[serde(default)]
    pub min_price: f64,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub expected_return_rate: f64,
    #[serde(default = "default_vacancy_tolerance")]
    pub vacancy_tolerance: f64,
}

impl Default for OwnerPreference {
    fn default() -> Self {
        Self {
            min_price: 0.0,
            max_price: None,
            expected_return_rate: 0.0,
            vacancy_tolerance: DEFAULT_VACANCY_TOLERANCE,
        }
    }
}

impl OwnerPreference {
    pub fn bounded(min_price: f64, max_price: f64) -> Self {
        Self { min_price, max_price: Some(max_price), ..Self::default() }
    }

    /// Clamps `price` into the owner's bounds.
    ///
    /// The ceiling is applied first and the floor last, so an inverted range
    /// (`min_price > max_price`) resolves to `min_price`.
    pub fn clamp(&self, price: f64) -> f64 {
        let capped = match self.max_price {
            Some(max_price) => price.min(max_price),
            None => price,
        };
        capped.max(self.min_price)
    }
}

fn default_vacancy_tolerance() -> f64 {
    DEFAULT_VACANCY_TOLERANCE
}
