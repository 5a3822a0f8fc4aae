//! Per-factor adjustment coefficients. Each function is pure and returns a
//! dimensionless value, already clamped where the factor has a range.

use crate::config::TimeFactors;
use crate::domain::{
    event::ExternalEvent,
    history::{Feedback, FeedbackType, HistoricalData, Transaction},
    market::MarketData,
    preference::OwnerPreference,
    property::PropertyInfo,
};
use crate::pricing::calendar::DayKind;

pub const TRANSACTION_TREND_LIMIT: f64 = 0.3;
pub const MARKET_LIMIT: f64 = 0.2;
pub const EXTERNAL_EVENT_LIMIT: f64 = 0.15;

const RETURN_RATE_SHARE: f64 = 0.5;
const VACANCY_TOLERANCE_NEUTRAL: f64 = 0.5;
const VACANCY_TOLERANCE_SCALE: f64 = 0.2;

const ACCEPT_WEIGHT: f64 = 0.1;
const REJECT_WEIGHT: f64 = 0.15;
const ADJUSTED_STEP: f64 = 0.05;

const MARKET_DAMPING: f64 = 0.5;

const WHOLE_UNIT_BONUS: f64 = 0.05;
const LARGE_AREA_SQM: f64 = 100.0;
const SMALL_AREA_SQM: f64 = 30.0;
const AREA_STEP: f64 = 0.03;

const HOLIDAY_BOOST: f64 = 0.10;
const HOLIDAY_ADJACENT_BOOST: f64 = 0.06;
const HOLIDAY_ADJACENT_SPAN_DAYS: f64 = 3.0;
const URGENT_BOOKING_BOOST: f64 = 0.05;
const DISTANT_BOOKING_PENALTY: f64 = 0.03;

/// Higher expected return pushes up; vacancy tolerance above 0.5 pushes up,
/// below 0.5 pulls down.
pub fn owner_preference(preference: &OwnerPreference) -> f64 {
    let mut adjustment = 0.0;
    if preference.expected_return_rate > 0.0 {
        adjustment += preference.expected_return_rate * RETURN_RATE_SHARE;
    }
    adjustment +=
        (preference.vacancy_tolerance - VACANCY_TOLERANCE_NEUTRAL) * VACANCY_TOLERANCE_SCALE;
    adjustment
}

/// Mean of the transaction-trend and feedback signals, counting only the
/// signals whose source list is non-empty.
pub fn historical_performance(history: Option<&HistoricalData>) -> f64 {
    let Some(history) = history else {
        return 0.0;
    };

    let mut signals = Vec::with_capacity(2);
    if !history.transactions.is_empty() {
        signals.push(transaction_trend(&history.transactions));
    }
    if !history.feedbacks.is_empty() {
        signals.push(feedback_signal(&history.feedbacks));
    }

    if signals.is_empty() {
        0.0
    } else {
        signals.iter().sum::<f64>() / signals.len() as f64
    }
}

/// Relative change of the recent half's average price over the older half's.
/// With an odd count the extra transaction lands in the recent half.
pub fn transaction_trend(transactions: &[Transaction]) -> f64 {
    if transactions.len() < 2 {
        return 0.0;
    }

    let (older, recent) = transactions.split_at(transactions.len() / 2);
    let older_avg = average_price(older);
    let recent_avg = average_price(recent);
    if older_avg <= 0.0 {
        return 0.0;
    }

    ((recent_avg - older_avg) / older_avg).clamp(-TRANSACTION_TREND_LIMIT, TRANSACTION_TREND_LIMIT)
}

fn average_price(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|transaction| transaction.actual_price).sum::<f64>()
        / transactions.len() as f64
}

/// Acceptance nudges up, rejection pulls down harder. Each adjusted item with
/// both prices recorded moves the signal by `0.05 / total`, where `total`
/// counts every feedback item.
pub fn feedback_signal(feedbacks: &[Feedback]) -> f64 {
    if feedbacks.is_empty() {
        return 0.0;
    }

    let total = feedbacks.len() as f64;
    let count_of = |kind: FeedbackType| {
        feedbacks.iter().filter(|feedback| feedback.feedback_type == kind).count() as f64
    };
    let accept_rate = count_of(FeedbackType::Accepted) / total;
    let reject_rate = count_of(FeedbackType::Rejected) / total;

    let mut signal = accept_rate * ACCEPT_WEIGHT;
    signal -= reject_rate * REJECT_WEIGHT;

    let adjusted =
        feedbacks.iter().filter(|feedback| feedback.feedback_type == FeedbackType::Adjusted);
    for feedback in adjusted {
        let recorded = |price: Option<f64>| price.filter(|value| *value != 0.0);
        if let (Some(actual), Some(suggested)) =
            (recorded(feedback.actual_price), recorded(feedback.suggested_price))
        {
            if actual > suggested {
                signal += ADJUSTED_STEP / total;
            } else {
                signal -= ADJUSTED_STEP / total;
            }
        }
    }

    signal
}

pub fn time_of_week(day: &DayKind, factors: &TimeFactors) -> f64 {
    let multiplier = match day {
        DayKind::Holiday { .. } => factors.holiday,
        DayKind::Weekend => factors.weekend,
        DayKind::Weekday => factors.weekday,
    };
    multiplier - 1.0
}

/// Positive when comparables price above this listing, i.e. it is underpriced.
pub fn market(market: Option<&MarketData>) -> f64 {
    let Some(market) = market else {
        return 0.0;
    };

    let similar_avg = market.similar_avg.unwrap_or(0.0);
    let own_avg = market.own_avg.unwrap_or(0.0);
    if similar_avg <= 0.0 || own_avg <= 0.0 {
        return 0.0;
    }

    let deviation = (similar_avg - own_avg) / similar_avg;
    (deviation * MARKET_DAMPING).clamp(-MARKET_LIMIT, MARKET_LIMIT)
}

pub fn property_base(info: &PropertyInfo) -> f64 {
    let mut adjustment = 0.0;
    if info.room_type.is_whole_unit() {
        adjustment += WHOLE_UNIT_BONUS;
    }

    let area = info.area_or_default();
    if area > LARGE_AREA_SQM {
        adjustment += AREA_STEP;
    } else if area < SMALL_AREA_SQM {
        adjustment -= AREA_STEP;
    }
    adjustment
}

pub fn external_events(events: &[ExternalEvent]) -> f64 {
    let total: f64 = events.iter().map(external_event).sum();
    total.clamp(-EXTERNAL_EVENT_LIMIT, EXTERNAL_EVENT_LIMIT)
}

/// Unclamped contribution of a single event.
pub fn external_event(event: &ExternalEvent) -> f64 {
    match event {
        ExternalEvent::Holiday { .. } => HOLIDAY_BOOST,
        // Decays linearly from 0.06 at one day; three days still yields 0.02.
        ExternalEvent::HolidayAdjacent { distance_days } => {
            HOLIDAY_ADJACENT_BOOST * (1.0 - (distance_days - 1.0) / HOLIDAY_ADJACENT_SPAN_DAYS)
        }
        ExternalEvent::BookingUrgency { avg_advance_days, days_until_target } => {
            let days_until = *days_until_target;
            if *avg_advance_days > 0.0 && days_until < avg_advance_days * 0.5 {
                URGENT_BOOKING_BOOST
            } else if days_until > avg_advance_days * 2.0 {
                -DISTANT_BOOKING_PENALTY
            } else {
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::domain::property::RoomType;

    use super::*;

    fn approx(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    fn priced(prices: &[f64]) -> Vec<Transaction> {
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid start date");
        prices
            .iter()
            .zip(start.iter_days())
            .map(|(price, day)| Transaction::new(*price, day))
            .collect()
    }

    #[test]
    fn owner_preference_combines_return_and_tolerance() {
        let preference = OwnerPreference {
            expected_return_rate: 0.15,
            vacancy_tolerance: 0.2,
            ..OwnerPreference::default()
        };
        assert!(approx(owner_preference(&preference), 0.075 - 0.06));

        assert_eq!(owner_preference(&OwnerPreference::default()), 0.0);

        let risk_seeking = OwnerPreference { vacancy_tolerance: 1.0, ..OwnerPreference::default() };
        assert!(approx(owner_preference(&risk_seeking), 0.1));
    }

    #[test]
    fn negative_return_rate_is_ignored() {
        let preference =
            OwnerPreference { expected_return_rate: -0.4, ..OwnerPreference::default() };
        assert_eq!(owner_preference(&preference), 0.0);
    }

    #[test]
    fn transaction_trend_clamps_to_ceiling() {
        assert_eq!(transaction_trend(&priced(&[100.0, 200.0])), 0.3);
        assert_eq!(transaction_trend(&priced(&[200.0, 100.0])), -0.3);
    }

    #[test]
    fn transaction_trend_splits_odd_counts_toward_recent() {
        // older = [100], recent = [110, 120]
        let trend = transaction_trend(&priced(&[100.0, 110.0, 120.0]));
        assert!(approx(trend, 0.15));
    }

    #[test]
    fn transaction_trend_needs_two_priced_transactions() {
        assert_eq!(transaction_trend(&priced(&[300.0])), 0.0);
        assert_eq!(transaction_trend(&priced(&[0.0, 300.0])), 0.0);
    }

    #[test]
    fn feedback_signal_weighs_acceptance_and_rejection() {
        let feedbacks = vec![
            Feedback::new(FeedbackType::Accepted),
            Feedback::new(FeedbackType::Accepted),
            Feedback::new(FeedbackType::Rejected),
            Feedback::new(FeedbackType::Rejected),
        ];
        assert!(approx(feedback_signal(&feedbacks), 0.5 * 0.1 - 0.5 * 0.15));
    }

    #[test]
    fn adjusted_feedback_is_diluted_by_total_count() {
        let only_adjusted = vec![Feedback::adjusted(400.0, 450.0)];
        assert!(approx(feedback_signal(&only_adjusted), 0.05));

        let diluted = vec![
            Feedback::adjusted(400.0, 450.0),
            Feedback::new(FeedbackType::Accepted),
            Feedback::new(FeedbackType::Accepted),
            Feedback::new(FeedbackType::Accepted),
            Feedback::new(FeedbackType::Accepted),
        ];
        assert!(approx(feedback_signal(&diluted), 0.8 * 0.1 + 0.05 / 5.0));

        let lowered = vec![Feedback::adjusted(400.0, 380.0), Feedback::adjusted(400.0, 400.0)];
        assert!(approx(feedback_signal(&lowered), -0.05));
    }

    #[test]
    fn adjusted_feedback_without_both_prices_is_skipped() {
        let feedbacks = vec![
            Feedback { actual_price: Some(500.0), ..Feedback::new(FeedbackType::Adjusted) },
            Feedback {
                actual_price: Some(0.0),
                suggested_price: Some(300.0),
                ..Feedback::new(FeedbackType::Adjusted)
            },
        ];
        assert_eq!(feedback_signal(&feedbacks), 0.0);
    }

    #[test]
    fn historical_averages_available_signals() {
        let both = HistoricalData {
            transactions: priced(&[100.0, 200.0]),
            feedbacks: vec![Feedback::new(FeedbackType::Accepted)],
        };
        assert!(approx(historical_performance(Some(&both)), (0.3 + 0.1) / 2.0));

        let single_transaction =
            HistoricalData { transactions: priced(&[250.0]), feedbacks: Vec::new() };
        assert_eq!(historical_performance(Some(&single_transaction)), 0.0);

        assert_eq!(historical_performance(Some(&HistoricalData::default())), 0.0);
        assert_eq!(historical_performance(None), 0.0);
    }

    #[test]
    fn single_transaction_still_counts_as_a_signal() {
        // The zero trend from one transaction halves the feedback signal.
        let history = HistoricalData {
            transactions: priced(&[250.0]),
            feedbacks: vec![Feedback::new(FeedbackType::Accepted)],
        };
        assert!(approx(historical_performance(Some(&history)), 0.05));
    }

    #[test]
    fn time_of_week_uses_multiplier_excess() {
        let factors = TimeFactors::default();

        assert!(approx(time_of_week(&DayKind::Holiday { name: "x".to_owned() }, &factors), 0.3));
        assert!(approx(time_of_week(&DayKind::Weekend, &factors), 0.15));
        assert_eq!(time_of_week(&DayKind::Weekday, &factors), 0.0);
    }

    #[test]
    fn market_factor_is_damped_and_clamped() {
        assert!(approx(market(Some(&MarketData::new(500.0, 450.0))), 0.05));
        assert!(approx(market(Some(&MarketData::new(500.0, 550.0))), -0.05));
        assert_eq!(market(Some(&MarketData::new(1000.0, 200.0))), 0.2);
        assert_eq!(market(Some(&MarketData::new(100.0, 900.0))), -0.2);
    }

    #[test]
    fn market_factor_needs_positive_averages() {
        assert_eq!(market(None), 0.0);
        assert_eq!(market(Some(&MarketData::default())), 0.0);
        assert_eq!(market(Some(&MarketData::new(0.0, 300.0))), 0.0);
        assert_eq!(market(Some(&MarketData::new(300.0, -1.0))), 0.0);
    }

    #[test]
    fn property_base_adds_room_and_area_bonuses() {
        assert!(approx(property_base(&PropertyInfo::new(RoomType::WholeUnit, 120.0)), 0.08));
        assert!(approx(property_base(&PropertyInfo::new(RoomType::WholeUnit, 80.0)), 0.05));
        assert!(approx(property_base(&PropertyInfo::new(RoomType::PrivateRoom, 20.0)), -0.03));
        assert_eq!(property_base(&PropertyInfo::new(RoomType::SharedRoom, 100.0)), 0.0);
        assert_eq!(property_base(&PropertyInfo::new(RoomType::Other, 30.0)), 0.0);

        let no_area = PropertyInfo { area: None, ..PropertyInfo::new(RoomType::PrivateRoom, 0.0) };
        assert_eq!(property_base(&no_area), 0.0);
    }

    #[test]
    fn holiday_adjacent_decays_with_distance() {
        let at = |distance_days| external_event(&ExternalEvent::HolidayAdjacent { distance_days });

        assert!(approx(at(1.0), 0.06));
        assert!(approx(at(2.0), 0.04));
        assert!(approx(at(3.0), 0.02));
    }

    #[test]
    fn booking_urgency_compares_lead_time() {
        let urgency = |avg_advance_days, days_until_target| {
            external_event(&ExternalEvent::BookingUrgency { avg_advance_days, days_until_target })
        };

        assert_eq!(urgency(14.0, 3.0), 0.05);
        assert_eq!(urgency(14.0, 29.0), -0.03);
        assert_eq!(urgency(14.0, 14.0), 0.0);
        assert_eq!(urgency(14.0, 7.0), 0.0);
        assert_eq!(urgency(0.0, 0.0), 0.0);
        assert_eq!(urgency(0.0, 5.0), -0.03);
    }

    #[test]
    fn holiday_with_urgency_lands_on_clamp_ceiling() {
        let events = vec![
            ExternalEvent::Holiday { distance_days: 0.0 },
            ExternalEvent::BookingUrgency { avg_advance_days: 14.0, days_until_target: 2.0 },
        ];
        assert_eq!(external_events(&events), 0.15);
    }

    #[test]
    fn external_events_clamp_both_directions() {
        let crowded = vec![
            ExternalEvent::Holiday { distance_days: 0.0 },
            ExternalEvent::Holiday { distance_days: 0.0 },
        ];
        assert_eq!(external_events(&crowded), 0.15);

        let distant = vec![
            ExternalEvent::BookingUrgency { avg_advance_days: 3.0, days_until_target: 60.0 };
            6
        ];
        assert_eq!(external_events(&distant), -0.15);
        assert_eq!(external_events(&[]), 0.0);
    }
}
