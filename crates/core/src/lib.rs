pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod service;
pub mod signals;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, PricingConfig};
pub use domain::event::ExternalEvent;
pub use domain::history::{Feedback, FeedbackType, HistoricalData, Transaction};
pub use domain::market::MarketData;
pub use domain::preference::OwnerPreference;
pub use domain::property::{Property, PropertyId, PropertyInfo, RoomType};
pub use errors::ApplicationError;
pub use pricing::{
    DayKind, Factor, FactorDetail, HolidayIndex, PricingAdvisor, PricingEngine, PricingRequest,
    PricingResult,
};
pub use service::{PricingContext, PricingRecommendation, PropertyPricingService};
