//! # Availability Checking
//!
//! Conflict detection between a candidate date range and existing bookings.
//!
//! Both candidate and stored ranges are half-open `[from, to)`, so a
//! checkout day and the next check-in day never collide. This check performs
//! no locking or reservation by itself: two concurrent callers can both see
//! a range as free before either inserts a booking. Closing that window is
//! the storage layer's job (overlap constraint or per-property lock held
//! across check + insert).

use chrono::NaiveDate;

use crate::booking::Booking;
use crate::dates::DateSpan;
use crate::error::BookingResult;

/// Check whether `[date_from, date_to)` is free of conflicting bookings.
///
/// Fails with a validation error if `date_from >= date_to`. Cancelled
/// bookings never block; every other status (pending, confirmed, paid,
/// completed) does.
pub fn is_available(
    bookings: &[Booking],
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> BookingResult<bool> {
    let candidate = DateSpan::new(date_from, date_to)?;
    Ok(!bookings.iter().any(|b| b.blocks(&candidate)))
}

/// Collect the bookings that conflict with a candidate span
pub fn conflicts<'a>(bookings: &'a [Booking], candidate: &DateSpan) -> Vec<&'a Booking> {
    bookings.iter().filter(|b| b.blocks(candidate)).collect()
}
