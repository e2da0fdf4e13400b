//! # Booking Types
//!
//! Bookings, their status/type enums, and customers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates::DateSpan;

/// Lifecycle status of a booking.
///
/// Transitions are owned exclusively by [`crate::lifecycle::BookingLifecycle`];
/// `Cancelled` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Paid,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }

    /// Every non-cancelled booking blocks its date range
    pub fn blocks_availability(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Paid => "paid",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why the booking exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    Rental,
    OwnerStay,
    Maintenance,
}

impl Default for BookingType {
    fn default() -> Self {
        BookingType::Rental
    }
}

/// A reservation for a property over a half-open date range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking ID (generated)
    pub id: String,

    /// Property being booked
    pub property_id: String,

    /// Customer who booked
    pub customer_id: String,

    /// Stay dates `[date_from, date_to)`
    pub span: DateSpan,

    /// Guest count
    pub guests: u32,

    /// Total price as quoted at creation
    pub total_price: Decimal,

    /// Current lifecycle status
    pub status: BookingStatus,

    /// Booking type
    #[serde(default)]
    pub booking_type: BookingType,

    /// Payment-gateway transaction id, recorded on capture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Create a new pending booking with a generated ID
    pub fn new(
        property_id: impl Into<String>,
        customer_id: impl Into<String>,
        span: DateSpan,
        guests: u32,
        total_price: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            property_id: property_id.into(),
            customer_id: customer_id.into(),
            span,
            guests,
            total_price,
            status: BookingStatus::Pending,
            booking_type: BookingType::Rental,
            transaction_id: None,
            created_at: Utc::now(),
        }
    }

    /// Builder: set booking type
    pub fn with_type(mut self, booking_type: BookingType) -> Self {
        self.booking_type = booking_type;
        self
    }

    /// Whether this booking blocks the given span on its property
    pub fn blocks(&self, span: &DateSpan) -> bool {
        self.status.blocks_availability() && self.span.overlaps(span)
    }
}

/// A customer, looked up or created by unique email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Customer {
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: None,
        }
    }

    /// Name as shown on calendars and notifications
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
