//! # Calendar Aggregation
//!
//! Merges base availability, seasonal pricing, explicit per-day overrides
//! and existing bookings into one per-day view for display and admin
//! editing.
//!
//! Layering, lowest to highest precedence:
//! 1. default (available, no price, min_nights 1)
//! 2. seasonal price fill (never changes status)
//! 3. explicit per-day override (full replacement of the day's fields)
//! 4. bookings (always win; annotate booking, flag check-in/check-out)
//!
//! The merge is date-indexed: overrides and booking days are put into maps
//! keyed by date first, then the window is walked once. Linear in the window
//! size plus the rules/overrides/bookings touching it.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::booking::{Booking, Customer};
use crate::dates::DateSpan;
use crate::pricing::resolve_daily_rate;
use crate::property::{AvailabilityOverride, OverrideStatus, Property};

/// Status of one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Available,
    Booked,
    Blocked,
    Maintenance,
}

impl From<OverrideStatus> for DayStatus {
    fn from(status: OverrideStatus) -> Self {
        match status {
            OverrideStatus::Available => DayStatus::Available,
            OverrideStatus::Booked => DayStatus::Booked,
            OverrideStatus::Blocked => DayStatus::Blocked,
            OverrideStatus::Maintenance => DayStatus::Maintenance,
        }
    }
}

/// Booking annotation carried by booked days
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRef {
    pub booking_id: String,
    pub customer_name: String,
    pub guests: u32,
}

/// One day in the aggregated calendar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub status: DayStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    pub min_nights: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_guests: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<BookingRef>,
    pub is_checkin: bool,
    pub is_checkout: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DayView {
    fn default_for(date: NaiveDate) -> Self {
        Self {
            date,
            status: DayStatus::Available,
            price: None,
            min_nights: 1,
            max_guests: None,
            booking: None,
            is_checkin: false,
            is_checkout: false,
            notes: None,
        }
    }
}

struct BookedDay {
    annotation: BookingRef,
    is_checkin: bool,
    is_checkout: bool,
}

/// Build the per-day calendar for `[window.from, window.to)`.
///
/// Returns exactly one `DayView` per day in the window, never omitting a
/// day. `customers` is used to annotate booked days with a display name;
/// bookings whose customer is unknown fall back to the customer id.
pub fn build_calendar(
    property: &Property,
    overrides: &[AvailabilityOverride],
    bookings: &[Booking],
    customers: &[Customer],
    window: DateSpan,
) -> Vec<DayView> {
    let override_by_date: HashMap<NaiveDate, &AvailabilityOverride> = overrides
        .iter()
        .filter(|o| o.property_id == property.id)
        .map(|o| (o.date, o))
        .collect();

    let customer_names: HashMap<&str, String> = customers
        .iter()
        .map(|c| (c.id.as_str(), c.display_name()))
        .collect();

    // Expand bookings into a per-day map, clamped to the window. Check-in
    // and check-out flags are computed against the booking's true span, so
    // a stay that starts before the window does not get a spurious flag.
    let mut booked_days: HashMap<NaiveDate, BookedDay> = HashMap::new();
    for booking in bookings {
        if !booking.status.blocks_availability() || booking.property_id != property.id {
            continue;
        }
        let Some(visible) = booking.span.clamp_to(&window) else {
            continue;
        };
        let name = customer_names
            .get(booking.customer_id.as_str())
            .cloned()
            .unwrap_or_else(|| booking.customer_id.clone());
        let checkout_day = booking.span.to - Duration::days(1);
        for day in visible.days() {
            booked_days.insert(
                day,
                BookedDay {
                    annotation: BookingRef {
                        booking_id: booking.id.clone(),
                        customer_name: name.clone(),
                        guests: booking.guests,
                    },
                    is_checkin: day == booking.span.from,
                    is_checkout: day == checkout_day,
                },
            );
        }
    }

    window
        .days()
        .map(|date| {
            let mut day = DayView::default_for(date);

            if let Some(ovr) = override_by_date.get(&date) {
                // Full replacement: every field comes from the override,
                // the seasonal layer is not consulted for this day.
                day.status = ovr.status.into();
                day.price = ovr.price;
                day.min_nights = ovr.min_nights;
                day.max_guests = ovr.max_guests;
                day.notes = ovr.notes.clone();
            } else if let Ok(rate) = resolve_daily_rate(property, date) {
                // Seasonal fill only sets the price, never the status.
                day.price = Some(rate);
            }

            if let Some(booked) = booked_days.get(&date) {
                day.status = DayStatus::Booked;
                day.booking = Some(booked.annotation.clone());
                day.is_checkin = booked.is_checkin;
                day.is_checkout = booked.is_checkout;
            }

            day
        })
        .collect()
}
