//! # Booking Lifecycle
//!
//! The state machine that owns every booking status transition.
//!
//! ```text
//!            ┌───────────┐
//!            │  pending  │──────────────┐
//!            └─────┬─────┘              │
//!        confirm   │         capture    │ cancel / expiry sweep
//!            ┌─────▼─────┐              │
//!            │ confirmed │──────────────┤
//!            └─────┬─────┘              │
//!        capture   │                    ▼
//!            ┌─────▼─────┐        ┌───────────┐
//!            │   paid    │───────▶│ cancelled │  (terminal)
//!            └─────┬─────┘ admin  └───────────┘
//!  checkout passed │
//!            ┌─────▼─────┐
//!            │ completed │  (terminal)
//!            └───────────┘
//! ```
//!
//! Capture callbacks are applied at-most-once per transaction id: a
//! duplicate capture for the transaction already recorded on a paid booking
//! is a no-op and fires no observer event.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::booking::{Booking, BookingStatus};
use crate::dates::DateSpan;
use crate::error::{BookingError, BookingResult};

/// Status reported by a payment-capture callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStatus {
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

/// A verified payment-capture callback from the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureNotice {
    pub transaction_id: String,
    pub captured_amount: Decimal,
    pub status: CaptureStatus,
}

impl CaptureNotice {
    pub fn is_success(&self) -> bool {
        self.status == CaptureStatus::Completed
    }
}

/// Outcome of applying a capture callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The booking transitioned to paid
    Applied,
    /// Duplicate delivery for the recorded transaction id; nothing changed
    AlreadyPaid,
    /// The callback did not report a successful capture; nothing changed
    Ignored,
}

/// Observer for lifecycle transitions.
///
/// An external mailer or log subscriber implements this; the core emits
/// events but never formats or sends notifications itself. All methods
/// default to structured logging.
#[allow(unused_variables)]
pub trait BookingObserver: Send + Sync {
    /// A booking was created (pending)
    fn on_created(&self, booking: &Booking) {
        info!(
            booking_id = %booking.id,
            property_id = %booking.property_id,
            "booking created"
        );
    }

    /// A booking was paid
    fn on_paid(&self, booking: &Booking) {
        info!(
            booking_id = %booking.id,
            transaction_id = ?booking.transaction_id,
            "booking paid"
        );
    }

    /// A booking was cancelled
    fn on_cancelled(&self, booking: &Booking) {
        info!(booking_id = %booking.id, "booking cancelled");
    }

    /// A stay finished and the booking completed
    fn on_completed(&self, booking: &Booking) {
        info!(booking_id = %booking.id, "booking completed");
    }
}

/// Default observer that only logs
pub struct LoggingObserver;

impl BookingObserver for LoggingObserver {}

/// Type alias for a shared observer (dynamic dispatch)
pub type BoxedObserver = Arc<dyn BookingObserver>;

/// Owns every booking status transition
#[derive(Clone)]
pub struct BookingLifecycle {
    observer: BoxedObserver,
    /// Hours a pending/confirmed booking may stay unpaid before the expiry
    /// sweep cancels it
    pub unpaid_ttl_hours: i64,
}

impl BookingLifecycle {
    pub fn new(observer: BoxedObserver, unpaid_ttl_hours: i64) -> Self {
        Self {
            observer,
            unpaid_ttl_hours,
        }
    }

    /// Create a booking. New bookings always start pending.
    ///
    /// The created event is not emitted here: a gateway or storage failure
    /// after construction would otherwise leave a notification for a booking
    /// that never exists. Callers announce the booking via
    /// [`announce_created`](Self::announce_created) once it is durably stored.
    pub fn create(
        &self,
        property_id: impl Into<String>,
        customer_id: impl Into<String>,
        span: DateSpan,
        guests: u32,
        total_price: Decimal,
    ) -> Booking {
        Booking::new(property_id, customer_id, span, guests, total_price)
    }

    /// Emit the created event for a persisted booking
    pub fn announce_created(&self, booking: &Booking) {
        self.observer.on_created(booking);
    }

    /// Administrative confirmation: pending -> confirmed
    pub fn confirm(&self, booking: &mut Booking) -> BookingResult<()> {
        match booking.status {
            BookingStatus::Pending => {
                booking.status = BookingStatus::Confirmed;
                Ok(())
            }
            other => Err(invalid(other, "confirm")),
        }
    }

    /// Apply a payment-capture callback: pending/confirmed -> paid.
    ///
    /// Idempotent per transaction id: re-delivery of the capture already
    /// recorded on a paid booking returns [`CaptureOutcome::AlreadyPaid`]
    /// without mutating anything or re-firing the paid event. A capture for
    /// a different transaction id than the recorded one, or for a terminal
    /// booking, is rejected.
    pub fn apply_capture(
        &self,
        booking: &mut Booking,
        notice: &CaptureNotice,
    ) -> BookingResult<CaptureOutcome> {
        if !notice.is_success() {
            warn!(
                booking_id = %booking.id,
                transaction_id = %notice.transaction_id,
                status = ?notice.status,
                "ignoring non-successful capture callback"
            );
            return Ok(CaptureOutcome::Ignored);
        }

        match booking.status {
            BookingStatus::Pending | BookingStatus::Confirmed => {
                booking.status = BookingStatus::Paid;
                booking.transaction_id = Some(notice.transaction_id.clone());
                self.observer.on_paid(booking);
                Ok(CaptureOutcome::Applied)
            }
            BookingStatus::Paid
                if booking.transaction_id.as_deref() == Some(&notice.transaction_id) =>
            {
                Ok(CaptureOutcome::AlreadyPaid)
            }
            other => Err(invalid(other, "capture")),
        }
    }

    /// Explicit cancel: pending/confirmed/paid -> cancelled.
    ///
    /// Cancelling a paid booking does not refund by itself; it only marks
    /// state for an external refund workflow to react to.
    pub fn cancel(&self, booking: &mut Booking) -> BookingResult<()> {
        match booking.status {
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::Paid => {
                booking.status = BookingStatus::Cancelled;
                self.observer.on_cancelled(booking);
                Ok(())
            }
            other => Err(invalid(other, "cancel")),
        }
    }

    /// Expiry-sweep entry point: cancel a pending/confirmed booking that has
    /// stayed unpaid past the TTL. Returns whether the booking was swept.
    pub fn expire_if_unpaid(&self, booking: &mut Booking, now: DateTime<Utc>) -> bool {
        let unpaid = matches!(
            booking.status,
            BookingStatus::Pending | BookingStatus::Confirmed
        );
        if unpaid && now - booking.created_at > Duration::hours(self.unpaid_ttl_hours) {
            booking.status = BookingStatus::Cancelled;
            self.observer.on_cancelled(booking);
            return true;
        }
        false
    }

    /// Completion-sweep entry point: paid -> completed once the checkout
    /// date has passed. Returns whether the booking was swept.
    pub fn complete_if_departed(&self, booking: &mut Booking, today: NaiveDate) -> bool {
        if booking.status == BookingStatus::Paid && booking.span.to <= today {
            booking.status = BookingStatus::Completed;
            self.observer.on_completed(booking);
            return true;
        }
        false
    }
}

impl Default for BookingLifecycle {
    fn default() -> Self {
        Self::new(Arc::new(LoggingObserver), 48)
    }
}

fn invalid(from: BookingStatus, action: &str) -> BookingError {
    BookingError::InvalidTransition {
        from: from.to_string(),
        action: action.to_string(),
    }
}
