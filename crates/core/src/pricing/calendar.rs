use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::config::HolidayCalendar;

/// How a calendar day is treated by the time-of-week factor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayKind {
    Holiday { name: String },
    Weekend,
    Weekday,
}

/// Flattened holiday calendar for constant-time date lookup.
#[derive(Clone, Debug, Default)]
pub struct HolidayIndex {
    dates: HashMap<NaiveDate, String>,
}

impl HolidayIndex {
    /// When two holidays share a date the first name in calendar order is kept.
    pub fn from_calendar(calendar: &HolidayCalendar) -> Self {
        let mut dates = HashMap::new();
        for (name, holiday_dates) in calendar {
            for date in holiday_dates {
                dates.entry(*date).or_insert_with(|| name.clone());
            }
        }
        Self { dates }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains_key(&date)
    }

    pub fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.dates.get(&date).map(String::as_str)
    }

    /// Holiday wins over weekend; Saturday and Sunday are weekend days.
    pub fn classify(&self, date: NaiveDate) -> DayKind {
        if let Some(name) = self.holiday_name(date) {
            return DayKind::Holiday { name: name.to_owned() };
        }

        if date.weekday().num_days_from_monday() >= 5 {
            DayKind::Weekend
        } else {
            DayKind::Weekday
        }
    }

    /// Days from `date` to the closest holiday within `max_days`, looking both
    /// backwards and forwards. Returns `Some(0)` when `date` is a holiday.
    pub fn distance_to_nearest(&self, date: NaiveDate, max_days: u32) -> Option<u32> {
        (0..=max_days).find(|distance| {
            let offset = chrono::Days::new(u64::from(*distance));
            let before = date.checked_sub_days(offset);
            let after = date.checked_add_days(offset);
            [before, after].into_iter().flatten().any(|candidate| self.is_holiday(candidate))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use chrono::NaiveDate;

    use crate::config::default_holiday_calendar;

    use super::{DayKind, HolidayIndex};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn builtin_calendar_is_flattened() {
        let index = HolidayIndex::from_calendar(&default_holiday_calendar());

        assert_eq!(index.len(), 3 + 9 + 3 + 5 + 3 + 3 + 7);
        assert!(index.is_holiday(date(2026, 10, 7)));
        assert!(!index.is_holiday(date(2026, 10, 8)));
        assert_eq!(index.holiday_name(date(2026, 5, 3)), Some("labor_day"));
    }

    #[test]
    fn classify_prefers_holiday_over_weekend() {
        let index = HolidayIndex::from_calendar(&default_holiday_calendar());

        assert_eq!(
            index.classify(date(2026, 5, 2)),
            DayKind::Holiday { name: "labor_day".to_owned() }
        );
        assert_eq!(index.classify(date(2026, 5, 9)), DayKind::Weekend);
        assert_eq!(index.classify(date(2026, 5, 10)), DayKind::Weekend);
        assert_eq!(index.classify(date(2026, 5, 11)), DayKind::Weekday);
    }

    #[test]
    fn empty_calendar_only_distinguishes_weekends() {
        let index = HolidayIndex::from_calendar(&BTreeMap::new());

        assert!(index.is_empty());
        assert_eq!(index.classify(date(2026, 5, 1)), DayKind::Weekday);
        assert_eq!(index.distance_to_nearest(date(2026, 5, 1), 3), None);
    }

    #[test]
    fn shared_dates_keep_first_holiday_name() {
        let mut calendar = BTreeMap::new();
        calendar.insert("alpha".to_owned(), BTreeSet::from([date(2026, 3, 1)]));
        calendar.insert("beta".to_owned(), BTreeSet::from([date(2026, 3, 1), date(2026, 3, 2)]));

        let index = HolidayIndex::from_calendar(&calendar);

        assert_eq!(index.len(), 2);
        assert_eq!(index.holiday_name(date(2026, 3, 1)), Some("alpha"));
        assert_eq!(index.holiday_name(date(2026, 3, 2)), Some("beta"));
    }

    #[test]
    fn distance_looks_both_directions() {
        let index = HolidayIndex::from_calendar(&default_holiday_calendar());

        assert_eq!(index.distance_to_nearest(date(2026, 5, 3), 3), Some(0));
        assert_eq!(index.distance_to_nearest(date(2026, 4, 30), 3), Some(1));
        assert_eq!(index.distance_to_nearest(date(2026, 5, 8), 3), Some(3));
        assert_eq!(index.distance_to_nearest(date(2026, 5, 9), 3), None);
        assert_eq!(index.distance_to_nearest(date(2026, 9, 29), 3), Some(2));
    }
}
