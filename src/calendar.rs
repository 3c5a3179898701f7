// src/calendar.rs
//
// Calendar exclusion oracle: answers whether a date is refused for hour
// registration because of the weekly cycle or a user holiday. Pure reads,
// no failure modes.
use chrono::{Datelike, NaiveDate, Weekday};

use crate::ledger_data::UserId;
use crate::store::LedgerStore;

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_holiday<S: LedgerStore>(store: &S, user: &UserId, date: NaiveDate) -> bool {
    store.is_holiday(user, date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn saturday_and_sunday_are_weekend() {
        assert!(is_weekend(d("2025-08-16")));
        assert!(is_weekend(d("2025-08-17")));
    }

    #[test]
    fn weekdays_are_not_weekend() {
        for day in ["2025-08-11", "2025-08-12", "2025-08-13", "2025-08-14", "2025-08-15"] {
            assert!(!is_weekend(d(day)), "{day} should be a workday");
        }
    }
}
