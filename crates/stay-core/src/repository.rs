//! # Repository Traits
//!
//! Seams to the persistence collaborators. The computation engines take
//! already-fetched data; these traits are what the thin call shims around
//! them consume. Implementations (SQL, in-memory) live outside the core.

use chrono::NaiveDate;

use crate::booking::{Booking, Customer};
use crate::dates::DateSpan;
use crate::error::BookingResult;
use crate::property::{AvailabilityOverride, ExtraService, Property};

/// Property base rates and ordered pricing rules, keyed by property id
pub trait PropertyRepo: Send + Sync {
    fn find_property(&self, property_id: &str) -> BookingResult<Option<Property>>;
    fn list_active(&self) -> BookingResult<Vec<Property>>;
}

/// Per-day availability overrides, keyed by (property id, date)
pub trait OverrideRepo: Send + Sync {
    fn find_override(
        &self,
        property_id: &str,
        date: NaiveDate,
    ) -> BookingResult<Option<AvailabilityOverride>>;

    /// All overrides for a property with a date in `[window.from, window.to)`
    fn overrides_in_window(
        &self,
        property_id: &str,
        window: DateSpan,
    ) -> BookingResult<Vec<AvailabilityOverride>>;

    fn upsert_override(&self, ovr: AvailabilityOverride) -> BookingResult<()>;
}

/// Booking create/update and range queries
pub trait BookingRepo: Send + Sync {
    fn find_booking(&self, booking_id: &str) -> BookingResult<Option<Booking>>;

    /// Bookings for a property touching `[window.from, window.to)`
    fn bookings_in_window(
        &self,
        property_id: &str,
        window: DateSpan,
    ) -> BookingResult<Vec<Booking>>;

    /// All bookings for a property (the availability conflict set)
    fn bookings_for_property(&self, property_id: &str) -> BookingResult<Vec<Booking>>;

    /// Lookup by the payment-gateway transaction id recorded at creation
    fn find_by_transaction(&self, transaction_id: &str) -> BookingResult<Option<Booking>>;

    fn insert_booking(&self, booking: Booking) -> BookingResult<()>;
    fn update_booking(&self, booking: &Booking) -> BookingResult<()>;

    /// Every non-terminal booking (sweep input)
    fn open_bookings(&self) -> BookingResult<Vec<Booking>>;
}

/// Customers, unique by email
pub trait CustomerRepo: Send + Sync {
    fn find_customer(&self, customer_id: &str) -> BookingResult<Option<Customer>>;
    fn find_by_email(&self, email: &str) -> BookingResult<Option<Customer>>;
    fn find_or_create(&self, customer: Customer) -> BookingResult<Customer>;
    fn list_customers(&self) -> BookingResult<Vec<Customer>>;
}

/// Extra services, flat price lookup by id list
pub trait ServiceRepo: Send + Sync {
    fn services_for_property(&self, property_id: &str) -> BookingResult<Vec<ExtraService>>;
}
