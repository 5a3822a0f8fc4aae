//! Three-tier nightly price recommendation.
//!
//! Six independent factors each produce a dimensionless adjustment
//! coefficient. Their weighted sum (the composite) scales the base price into
//! the suggested tier; the conservative and aggressive tiers are fixed offsets
//! from it. All tiers are then bounded by the owner's price range and kept in
//! order.

pub mod calendar;
pub mod factors;
pub mod report;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PricingConfig;
use crate::domain::{
    event::ExternalEvent, history::HistoricalData, market::MarketData,
    preference::OwnerPreference, property::PropertyInfo,
};

pub use calendar::{DayKind, HolidayIndex};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    OwnerPreference,
    HistoricalPerformance,
    TimeFactor,
    MarketFactor,
    PropertyBase,
    ExternalEvent,
}

impl Factor {
    pub const ALL: [Factor; 6] = [
        Factor::OwnerPreference,
        Factor::HistoricalPerformance,
        Factor::TimeFactor,
        Factor::MarketFactor,
        Factor::PropertyBase,
        Factor::ExternalEvent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OwnerPreference => "owner_preference",
            Self::HistoricalPerformance => "historical_performance",
            Self::TimeFactor => "time_factor",
            Self::MarketFactor => "market_factor",
            Self::PropertyBase => "property_base",
            Self::ExternalEvent => "external_event",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactorDetail {
    pub adjustment: f64,
    pub weight: f64,
}

impl FactorDetail {
    pub fn contribution(&self) -> f64 {
        self.adjustment * self.weight
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    pub base_price: f64,
    #[serde(default)]
    pub owner_preference: OwnerPreference,
    pub property_info: PropertyInfo,
    pub target_date: NaiveDate,
    #[serde(default)]
    pub historical_data: Option<HistoricalData>,
    #[serde(default)]
    pub market_data: Option<MarketData>,
    #[serde(default)]
    pub external_events: Option<Vec<ExternalEvent>>,
}

impl PricingRequest {
    pub fn new(
        base_price: f64,
        owner_preference: OwnerPreference,
        property_info: PropertyInfo,
        target_date: NaiveDate,
    ) -> Self {
        Self {
            base_price,
            owner_preference,
            property_info,
            target_date,
            historical_data: None,
            market_data: None,
            external_events: None,
        }
    }

    pub fn with_history(mut self, historical_data: HistoricalData) -> Self {
        self.historical_data = Some(historical_data);
        self
    }

    pub fn with_market(mut self, market_data: MarketData) -> Self {
        self.market_data = Some(market_data);
        self
    }

    pub fn with_events(mut self, external_events: Vec<ExternalEvent>) -> Self {
        self.external_events = Some(external_events);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub conservative_price: f64,
    pub suggested_price: f64,
    pub aggressive_price: f64,
    pub base_price: f64,
    pub composite_adjustment: f64,
    pub calculation_details: BTreeMap<Factor, FactorDetail>,
}

impl PricingResult {
    pub fn detail(&self, factor: Factor) -> Option<&FactorDetail> {
        self.calculation_details.get(&factor)
    }
}

/// Seam for collaborators that only need a recommendation, not the engine.
pub trait PricingAdvisor: Send + Sync {
    fn advise(&self, request: &PricingRequest) -> PricingResult;
}

/// Weighted six-factor engine. Holds no per-call state.
#[derive(Clone, Debug)]
pub struct PricingEngine {
    config: Arc<PricingConfig>,
    holidays: HolidayIndex,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}

impl PricingAdvisor for PricingEngine {
    fn advise(&self, request: &PricingRequest) -> PricingResult {
        self.calculate(request)
    }
}

impl PricingEngine {
    pub fn new(config: impl Into<Arc<PricingConfig>>) -> Self {
        let config = config.into();
        let holidays = HolidayIndex::from_calendar(&config.holiday_calendar);
        Self { config, holidays }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn holidays(&self) -> &HolidayIndex {
        &self.holidays
    }

    pub fn calculate(&self, request: &PricingRequest) -> PricingResult {
        let adjustments = [
            (Factor::OwnerPreference, factors::owner_preference(&request.owner_preference)),
            (
                Factor::HistoricalPerformance,
                factors::historical_performance(request.historical_data.as_ref()),
            ),
            (
                Factor::TimeFactor,
                factors::time_of_week(
                    &self.holidays.classify(request.target_date),
                    &self.config.time_factors,
                ),
            ),
            (Factor::MarketFactor, factors::market(request.market_data.as_ref())),
            (Factor::PropertyBase, factors::property_base(&request.property_info)),
            (
                Factor::ExternalEvent,
                factors::external_events(request.external_events.as_deref().unwrap_or_default()),
            ),
        ];

        let mut composite = 0.0;
        let mut calculation_details = BTreeMap::new();
        for (factor, adjustment) in adjustments {
            let detail = FactorDetail { adjustment, weight: self.config.weights.weight(factor) };
            composite += detail.contribution();
            calculation_details.insert(factor, detail);
        }

        let tiers = &self.config.price_tiers;
        let suggested = request.base_price * (1.0 + composite);
        let conservative = suggested * (1.0 + tiers.conservative_offset);
        let aggressive = suggested * (1.0 + tiers.aggressive_offset);

        let bounds = &request.owner_preference;
        let suggested = bounds.clamp(suggested);
        let conservative = bounds.clamp(conservative).min(suggested);
        let aggressive = bounds.clamp(aggressive).max(suggested);

        let result = PricingResult {
            conservative_price: round_price(conservative, bounds),
            suggested_price: round_price(suggested, bounds),
            aggressive_price: round_price(aggressive, bounds),
            base_price: request.base_price,
            composite_adjustment: round_to(composite, 4),
            calculation_details,
        };

        debug!(
            event_name = "pricing.calculate.completed",
            target_date = %request.target_date,
            base_price = request.base_price,
            composite_adjustment = result.composite_adjustment,
            conservative_price = result.conservative_price,
            suggested_price = result.suggested_price,
            aggressive_price = result.aggressive_price,
            "price tiers computed"
        );

        result
    }
}

/// Rounds half-to-even on the exact binary value of `value`. Non-finite
/// input is returned unchanged.
pub fn round_to(value: f64, places: u32) -> f64 {
    round_with(value, places, RoundingStrategy::MidpointNearestEven)
}

/// Rounds a clamped price to cents without leaving the owner's range.
///
/// A bound with sub-cent precision can make plain rounding step past it; the
/// price is then rounded towards the inside of the range instead. The floor
/// is checked last so it still wins for an inverted range.
pub fn round_price(price: f64, bounds: &OwnerPreference) -> f64 {
    let mut rounded = round_to(price, 2);
    if bounds.max_price.is_some_and(|max_price| rounded > max_price) {
        rounded = round_with(price, 2, RoundingStrategy::ToNegativeInfinity);
    }
    if rounded < bounds.min_price {
        rounded = round_with(price, 2, RoundingStrategy::ToPositiveInfinity);
    }
    rounded
}

fn round_with(value: f64, places: u32, strategy: RoundingStrategy) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|exact| exact.round_dp_with_strategy(places, strategy))
        .and_then(|rounded| rounded.to_f64())
        .unwrap_or(value)
}
