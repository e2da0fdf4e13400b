//! # stay-core
//!
//! Core types and computation engines for the staybook booking engine.
//!
//! This crate provides:
//! - availability conflict detection over half-open date ranges
//! - day-by-day seasonal rate resolution and stay pricing
//! - calendar aggregation (defaults, seasonal fill, overrides, bookings)
//! - the booking lifecycle state machine driven by payment captures
//! - `PaymentGateway` and repository traits for the external collaborators
//! - `BookingError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use stay_core::{availability, pricing, BookingLifecycle, DateSpan};
//!
//! let span = DateSpan::new(date_from, date_to)?;
//!
//! // Check the range is free
//! let free = availability::is_available(&bookings, span.from, span.to)?;
//!
//! // Price the stay
//! let quote = pricing::calculate(&property, span, guests, &services, &selected)?;
//!
//! // Create a pending booking and drive it with gateway callbacks
//! let lifecycle = BookingLifecycle::default();
//! let mut booking = lifecycle.create(&property.id, &customer.id, span, guests, quote.total);
//! // ... persist the booking, then:
//! lifecycle.announce_created(&booking);
//! lifecycle.apply_capture(&mut booking, &notice)?;
//! ```

pub mod availability;
pub mod booking;
pub mod calendar;
pub mod dates;
pub mod error;
pub mod gateway;
pub mod lifecycle;
pub mod pricing;
pub mod property;
pub mod repository;

// Re-exports for convenience
pub use booking::{Booking, BookingStatus, BookingType, Customer};
pub use calendar::{build_calendar, BookingRef, DayStatus, DayView};
pub use dates::DateSpan;
pub use error::{BookingError, BookingResult};
pub use gateway::{BoxedGateway, GatewayTransaction, PaymentGateway};
pub use lifecycle::{
    BookingLifecycle, BookingObserver, BoxedObserver, CaptureNotice, CaptureOutcome,
    CaptureStatus, LoggingObserver,
};
pub use pricing::{calculate, resolve_daily_rate, Quote};
pub use property::{
    AvailabilityOverride, ExtraService, OverrideStatus, PricingRule, Property, PropertyCatalog,
    RuleEffect,
};
pub use repository::{BookingRepo, CustomerRepo, OverrideRepo, PropertyRepo, ServiceRepo};
