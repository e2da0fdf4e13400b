//! # Date Ranges
//!
//! Half-open date spans used for bookings, pricing rules and calendar
//! windows. `[from, to)`: `from` is included, `to` is excluded, so a
//! checkout day and the next check-in day can coincide without conflict.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, BookingResult};

/// A half-open date range `[from, to)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateSpan {
    /// Create a span, failing if `from >= to`
    pub fn new(from: NaiveDate, to: NaiveDate) -> BookingResult<Self> {
        if from >= to {
            return Err(BookingError::Validation(format!(
                "date_from ({}) must be before date_to ({})",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    /// Create a span without the ordering check (for rule ranges loaded
    /// from config, where an empty range is inert rather than an error)
    pub fn raw(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Number of nights covered (days in `[from, to)`)
    pub fn nights(&self) -> i64 {
        (self.to - self.from).num_days()
    }

    /// Whether `date` falls inside `[from, to)`
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date < self.to
    }

    /// Half-open overlap test: `[a.from, a.to)` and `[b.from, b.to)`
    /// conflict iff `a.from < b.to && a.to > b.from`
    pub fn overlaps(&self, other: &DateSpan) -> bool {
        self.from < other.to && self.to > other.from
    }

    /// Iterate every day in `[from, to)`
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let from = self.from;
        let count = self.nights().max(0) as usize;
        (0..count).map(move |i| from + Duration::days(i as i64))
    }

    /// Clamp this span to a window, returning `None` if they do not touch
    pub fn clamp_to(&self, window: &DateSpan) -> Option<DateSpan> {
        if !self.overlaps(window) {
            return None;
        }
        Some(DateSpan {
            from: self.from.max(window.from),
            to: self.to.min(window.to),
        })
    }
}

impl std::fmt::Display for DateSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_range() {
        assert!(DateSpan::new(d("2024-06-04"), d("2024-06-01")).is_err());
        assert!(DateSpan::new(d("2024-06-01"), d("2024-06-01")).is_err());
        assert!(DateSpan::new(d("2024-06-01"), d("2024-06-04")).is_ok());
    }

    #[test]
    fn test_nights_half_open() {
        let span = DateSpan::new(d("2024-06-01"), d("2024-06-04")).unwrap();
        assert_eq!(span.nights(), 3);
    }

    #[test]
    fn test_contains_excludes_end() {
        let span = DateSpan::new(d("2024-06-01"), d("2024-06-04")).unwrap();
        assert!(span.contains(d("2024-06-01")));
        assert!(span.contains(d("2024-06-03")));
        assert!(!span.contains(d("2024-06-04")));
    }

    #[test]
    fn test_overlap_back_to_back() {
        // checkout day == next check-in day: no conflict
        let a = DateSpan::new(d("2024-06-01"), d("2024-06-04")).unwrap();
        let b = DateSpan::new(d("2024-06-04"), d("2024-06-07")).unwrap();
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_overlap_partial() {
        let a = DateSpan::new(d("2024-06-01"), d("2024-06-04")).unwrap();
        let b = DateSpan::new(d("2024-06-03"), d("2024-06-07")).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_days_iterator() {
        let span = DateSpan::new(d("2024-06-01"), d("2024-06-04")).unwrap();
        let days: Vec<_> = span.days().collect();
        assert_eq!(days, vec![d("2024-06-01"), d("2024-06-02"), d("2024-06-03")]);
    }

    #[test]
    fn test_clamp_to_window() {
        let booking = DateSpan::new(d("2024-05-30"), d("2024-06-02")).unwrap();
        let window = DateSpan::new(d("2024-06-01"), d("2024-06-10")).unwrap();
        let clamped = booking.clamp_to(&window).unwrap();
        assert_eq!(clamped.from, d("2024-06-01"));
        assert_eq!(clamped.to, d("2024-06-02"));

        let outside = DateSpan::new(d("2024-07-01"), d("2024-07-05")).unwrap();
        assert!(outside.clamp_to(&window).is_none());
    }
}
