//! Helpers that shape stored records into engine inputs.
//!
//! These sit on the collaborator side of the engine: they read plain records
//! (holiday calendar, past transactions, comparable prices) and produce the
//! pre-shaped `HistoricalData`, `MarketData` and `ExternalEvent` values the
//! engine consumes.

use chrono::NaiveDate;

use crate::domain::{
    event::ExternalEvent,
    history::{Feedback, HistoricalData, Transaction},
    market::MarketData,
};
use crate::pricing::HolidayIndex;

/// Furthest distance, in days, at which a holiday still spills over.
pub const HOLIDAY_SPILLOVER_DAYS: u32 = 3;

/// `Holiday` when the target is a holiday, `HolidayAdjacent` when one lies
/// within three days on either side, nothing otherwise.
pub fn holiday_events(holidays: &HolidayIndex, target_date: NaiveDate) -> Vec<ExternalEvent> {
    match holidays.distance_to_nearest(target_date, HOLIDAY_SPILLOVER_DAYS) {
        Some(0) => vec![ExternalEvent::Holiday { distance_days: 0.0 }],
        Some(distance) => {
            vec![ExternalEvent::HolidayAdjacent { distance_days: f64::from(distance) }]
        }
        None => Vec::new(),
    }
}

/// Booking urgency from the listing's average recorded lead time. Returns
/// `None` when no transaction recorded `advance_days`.
pub fn booking_urgency(
    transactions: &[Transaction],
    today: NaiveDate,
    target_date: NaiveDate,
) -> Option<ExternalEvent> {
    let lead_times: Vec<f64> = transactions
        .iter()
        .filter_map(|transaction| transaction.advance_days)
        .map(f64::from)
        .collect();
    if lead_times.is_empty() {
        return None;
    }

    let avg_advance_days = lead_times.iter().sum::<f64>() / lead_times.len() as f64;
    let days_until_target = (target_date - today).num_days() as f64;
    Some(ExternalEvent::BookingUrgency { avg_advance_days, days_until_target })
}

/// Holiday and urgency events for one target date.
pub fn external_events(
    holidays: &HolidayIndex,
    transactions: &[Transaction],
    today: NaiveDate,
    target_date: NaiveDate,
) -> Vec<ExternalEvent> {
    let mut events = holiday_events(holidays, target_date);
    events.extend(booking_urgency(transactions, today, target_date));
    events
}

/// Market statistics from comparable listings' suggested prices and this
/// listing's own recent suggested prices. Non-positive prices are ignored.
pub fn market_snapshot(comparable_prices: &[f64], own_prices: &[f64]) -> MarketData {
    let comparables = positive(comparable_prices);

    MarketData {
        similar_avg: mean(&comparables),
        similar_min: comparables.iter().copied().reduce(f64::min),
        similar_max: comparables.iter().copied().reduce(f64::max),
        own_avg: mean(&positive(own_prices)),
    }
}

/// History with transactions in check-in order. Undated transactions keep
/// their relative order and sort before dated ones.
pub fn history_from_records(
    mut transactions: Vec<Transaction>,
    feedbacks: Vec<Feedback>,
) -> HistoricalData {
    transactions.sort_by_key(|transaction| transaction.check_in_date);
    HistoricalData { transactions, feedbacks }
}

fn positive(prices: &[f64]) -> Vec<f64> {
    prices.iter().copied().filter(|price| *price > 0.0).collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::config::default_holiday_calendar;
    use crate::domain::{
        event::ExternalEvent,
        history::{Feedback, FeedbackType, Transaction},
    };
    use crate::pricing::HolidayIndex;

    use super::{
        booking_urgency, external_events, history_from_records, holiday_events, market_snapshot,
    };

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    fn index() -> HolidayIndex {
        HolidayIndex::from_calendar(&default_holiday_calendar())
    }

    fn booked(price: f64, advance_days: Option<u32>) -> Transaction {
        Transaction { advance_days, ..Transaction::new(price, date(2026, 4, 1)) }
    }

    #[test]
    fn holiday_events_follow_calendar_distance() {
        let holidays = index();

        assert_eq!(
            holiday_events(&holidays, date(2026, 10, 2)),
            vec![ExternalEvent::Holiday { distance_days: 0.0 }]
        );
        assert_eq!(
            holiday_events(&holidays, date(2026, 9, 30)),
            vec![ExternalEvent::HolidayAdjacent { distance_days: 1.0 }]
        );
        assert!(holiday_events(&holidays, date(2026, 7, 15)).is_empty());
    }

    #[test]
    fn booking_urgency_averages_recorded_lead_times() {
        let transactions =
            vec![booked(300.0, Some(10)), booked(320.0, None), booked(310.0, Some(20))];

        let event = booking_urgency(&transactions, date(2026, 6, 1), date(2026, 6, 4));

        assert_eq!(
            event,
            Some(ExternalEvent::BookingUrgency { avg_advance_days: 15.0, days_until_target: 3.0 })
        );
        let unrecorded = [booked(300.0, None)];
        assert_eq!(booking_urgency(&unrecorded, date(2026, 6, 1), date(2026, 6, 4)), None);
    }

    #[test]
    fn external_events_combine_holiday_and_urgency() {
        let transactions = vec![booked(300.0, Some(30))];

        let events =
            external_events(&index(), &transactions, date(2026, 4, 25), date(2026, 5, 1));

        assert_eq!(
            events,
            vec![
                ExternalEvent::Holiday { distance_days: 0.0 },
                ExternalEvent::BookingUrgency { avg_advance_days: 30.0, days_until_target: 6.0 },
            ]
        );
    }

    #[test]
    fn market_snapshot_summarises_comparables() {
        let snapshot = market_snapshot(&[400.0, 0.0, 500.0, 600.0], &[450.0, 550.0]);

        assert_eq!(snapshot.similar_avg, Some(500.0));
        assert_eq!(snapshot.similar_min, Some(400.0));
        assert_eq!(snapshot.similar_max, Some(600.0));
        assert_eq!(snapshot.own_avg, Some(500.0));

        let empty = market_snapshot(&[], &[]);
        assert_eq!(empty.similar_avg, None);
        assert_eq!(empty.own_avg, None);
    }

    #[test]
    fn history_sorts_transactions_by_check_in() {
        let history = history_from_records(
            vec![
                Transaction::new(200.0, date(2026, 4, 10)),
                Transaction::new(100.0, date(2026, 3, 10)),
            ],
            vec![Feedback::new(FeedbackType::Accepted)],
        );

        assert_eq!(history.transactions[0].actual_price, 100.0);
        assert_eq!(history.transactions[1].actual_price, 200.0);
        assert_eq!(history.feedbacks.len(), 1);
    }
}
