use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    event::ExternalEvent,
    history::HistoricalData,
    market::MarketData,
    property::{set_value, Property, PropertyId},
};
use crate::pricing::{PricingAdvisor, PricingRequest, PricingResult};

/// Base price used when neither the caller nor the owner supplied one.
pub const FALLBACK_BASE_PRICE: f64 = 300.0;

/// Optional supporting data gathered by the caller for one pricing run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingContext {
    #[serde(default)]
    pub historical_data: Option<HistoricalData>,
    #[serde(default)]
    pub market_data: Option<MarketData>,
    #[serde(default)]
    pub external_events: Option<Vec<ExternalEvent>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingRecommendation {
    pub property_id: PropertyId,
    pub target_date: NaiveDate,
    #[serde(flatten)]
    pub result: PricingResult,
}

/// Prices stored listings through any [`PricingAdvisor`].
pub struct PropertyPricingService<A> {
    advisor: A,
}

impl<A> PropertyPricingService<A> {
    pub fn new(advisor: A) -> Self {
        Self { advisor }
    }
}

impl<A> PropertyPricingService<A>
where
    A: PricingAdvisor,
{
    pub fn recommend(
        &self,
        property: &Property,
        target_date: NaiveDate,
        base_price: Option<f64>,
        context: PricingContext,
    ) -> PricingRecommendation {
        let request = build_request(property, target_date, base_price, context);
        let result = self.advisor.advise(&request);

        info!(
            event_name = "pricing.property.recommended",
            property_id = property.id.0,
            target_date = %target_date,
            base_price = request.base_price,
            suggested_price = result.suggested_price,
            "property price recommendation produced"
        );

        PricingRecommendation { property_id: property.id, target_date, result }
    }
}

/// Explicit base price, else the owner's minimum price, else
/// [`FALLBACK_BASE_PRICE`]. Only a missing or zero value counts as unset.
pub fn effective_base_price(property: &Property, explicit: Option<f64>) -> f64 {
    set_value(explicit).or_else(|| set_value(property.min_price)).unwrap_or(FALLBACK_BASE_PRICE)
}

pub fn build_request(
    property: &Property,
    target_date: NaiveDate,
    base_price: Option<f64>,
    context: PricingContext,
) -> PricingRequest {
    PricingRequest {
        base_price: effective_base_price(property, base_price),
        owner_preference: property.owner_preference(),
        property_info: property.property_info(),
        target_date,
        historical_data: context.historical_data,
        market_data: context.market_data,
        external_events: context.external_events,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use chrono::NaiveDate;

    use crate::domain::{
        event::ExternalEvent,
        property::{Property, PropertyId, RoomType},
    };
    use crate::pricing::{PricingAdvisor, PricingEngine, PricingRequest, PricingResult};

    use super::{build_request, effective_base_price, PricingContext, PropertyPricingService};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    fn property_fixture() -> Property {
        Property {
            id: PropertyId(42),
            name: "Riverside Studio".to_owned(),
            address: "12 Binjiang Ave".to_owned(),
            room_type: RoomType::PrivateRoom,
            area: 35.0,
            facilities: BTreeMap::new(),
            description: None,
            min_price: Some(150.0),
            max_price: Some(500.0),
            expected_return_rate: None,
            vacancy_tolerance: None,
        }
    }

    #[test]
    fn base_price_falls_back_through_owner_minimum() {
        let property = property_fixture();

        assert_eq!(effective_base_price(&property, Some(250.0)), 250.0);
        assert_eq!(effective_base_price(&property, None), 150.0);
        assert_eq!(effective_base_price(&property, Some(0.0)), 150.0);

        let unpriced = Property { min_price: None, ..property_fixture() };
        assert_eq!(effective_base_price(&unpriced, None), 300.0);
        let zero_floor = Property { min_price: Some(0.0), ..property_fixture() };
        assert_eq!(effective_base_price(&zero_floor, Some(0.0)), 300.0);
    }

    #[test]
    fn negative_explicit_base_price_is_passed_through() {
        assert_eq!(effective_base_price(&property_fixture(), Some(-50.0)), -50.0);
    }

    #[test]
    fn request_carries_property_preferences_and_context() {
        let context = PricingContext {
            external_events: Some(vec![ExternalEvent::Holiday { distance_days: 0.0 }]),
            ..PricingContext::default()
        };

        let request = build_request(&property_fixture(), date(2026, 6, 15), None, context);

        assert_eq!(request.base_price, 150.0);
        assert_eq!(request.owner_preference.min_price, 150.0);
        assert_eq!(request.owner_preference.max_price, Some(500.0));
        assert_eq!(request.owner_preference.vacancy_tolerance, 0.5);
        assert_eq!(request.property_info.area, Some(35.0));
        assert_eq!(request.external_events.as_ref().map(Vec::len), Some(1));
        assert!(request.historical_data.is_none());
    }

    #[test]
    fn recommendation_stays_within_owner_bounds() {
        let service = PropertyPricingService::new(PricingEngine::default());

        let recommendation = service.recommend(
            &property_fixture(),
            date(2026, 6, 15),
            Some(250.0),
            PricingContext::default(),
        );

        assert_eq!(recommendation.property_id, PropertyId(42));
        assert_eq!(recommendation.target_date, date(2026, 6, 15));
        assert!(recommendation.result.conservative_price >= 150.0);
        assert!(recommendation.result.aggressive_price <= 500.0);

        let json = serde_json::to_value(&recommendation).expect("recommendation serializes");
        assert_eq!(json["property_id"], 42);
        assert!(json["suggested_price"].is_number());
    }

    #[test]
    fn service_supports_alternative_advisors() {
        #[derive(Default)]
        struct RecordingAdvisor {
            seen: Mutex<Vec<f64>>,
        }

        impl PricingAdvisor for RecordingAdvisor {
            fn advise(&self, request: &PricingRequest) -> PricingResult {
                if let Ok(mut seen) = self.seen.lock() {
                    seen.push(request.base_price);
                }
                PricingResult {
                    conservative_price: request.base_price,
                    suggested_price: request.base_price,
                    aggressive_price: request.base_price,
                    base_price: request.base_price,
                    composite_adjustment: 0.0,
                    calculation_details: BTreeMap::new(),
                }
            }
        }

        let service = PropertyPricingService::new(RecordingAdvisor::default());
        let recommendation = service.recommend(
            &property_fixture(),
            date(2026, 6, 15),
            None,
            PricingContext::default(),
        );

        assert_eq!(recommendation.result.suggested_price, 150.0);
        let seen = service.advisor.seen.lock().expect("advisor lock");
        assert_eq!(seen.as_slice(), &[150.0]);
    }
}
