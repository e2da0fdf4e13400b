//! # Request Handlers
//!
//! Axum request handlers for the booking API: availability and quote reads,
//! the booking create flow, the payment capture webhook, and the scheduled
//! sweep entry points.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stay_core::{
    availability, build_calendar, pricing, BookingError, CaptureOutcome, Customer, DateSpan,
    DayView,
};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Date-window query (`?from=2024-06-01&to=2024-06-08`)
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Quote request
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    #[serde(default = "default_guests")]
    pub guests: u32,
    #[serde(default)]
    pub service_ids: Vec<String>,
}

fn default_guests() -> u32 {
    1
}

/// Quote response (price breakdown)
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub nights: i64,
    pub base_total: Decimal,
    pub services_total: Decimal,
    pub total: Decimal,
}

/// Guest identity in a booking request
#[derive(Debug, Deserialize)]
pub struct CustomerInfo {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Create booking request
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub property_id: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    #[serde(default = "default_guests")]
    pub guests: u32,
    pub customer: CustomerInfo,
    #[serde(default)]
    pub service_ids: Vec<String>,
}

/// Create booking response
#[derive(Debug, Serialize)]
pub struct CreateBookingResponse {
    pub booking_id: String,
    pub status: String,
    pub nights: i64,
    pub total: Decimal,
    pub transaction_id: String,
    /// URL the guest is redirected to for payment
    pub payment_url: String,
}

/// Availability response
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub property_id: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub available: bool,
}

/// Calendar response
#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub property_id: String,
    pub days: Vec<DayView>,
}

/// Sweep response
#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub swept: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn booking_error_to_response(err: BookingError) -> HandlerError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn not_found(what: &str, id: &str) -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(format!("{} not found: {}", what, id), 404)),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "staybook",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// List active properties
pub async fn list_properties(State(state): State<AppState>) -> Result<impl IntoResponse, HandlerError> {
    let properties = state
        .properties
        .list_active()
        .map_err(booking_error_to_response)?;
    Ok(Json(serde_json::json!({
        "properties": properties,
        "count": properties.len()
    })))
}

/// Get single property
pub async fn get_property(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let property = state
        .properties
        .find_property(&property_id)
        .map_err(booking_error_to_response)?
        .ok_or_else(|| not_found("Property", &property_id))?;
    Ok(Json(property))
}

/// Check whether a date range is free of conflicting bookings
#[instrument(skip(state), fields(property_id = %property_id))]
pub async fn check_availability(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
    Query(window): Query<WindowQuery>,
) -> Result<Json<AvailabilityResponse>, HandlerError> {
    state
        .properties
        .find_property(&property_id)
        .map_err(booking_error_to_response)?
        .ok_or_else(|| not_found("Property", &property_id))?;

    let bookings = state
        .bookings
        .bookings_for_property(&property_id)
        .map_err(booking_error_to_response)?;

    let available = availability::is_available(&bookings, window.from, window.to)
        .map_err(booking_error_to_response)?;

    Ok(Json(AvailabilityResponse {
        property_id,
        from: window.from,
        to: window.to,
        available,
    }))
}

/// Price a stay without creating anything
#[instrument(skip(state, request), fields(property_id = %property_id))]
pub async fn quote(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, HandlerError> {
    let property = state
        .properties
        .find_property(&property_id)
        .map_err(booking_error_to_response)?
        .ok_or_else(|| not_found("Property", &property_id))?;

    let span = DateSpan::new(request.date_from, request.date_to)
        .map_err(booking_error_to_response)?;

    let services = state
        .services
        .services_for_property(&property_id)
        .map_err(booking_error_to_response)?;

    let quote = pricing::calculate(
        &property,
        span,
        request.guests,
        &services,
        &request.service_ids,
    )
    .map_err(booking_error_to_response)?;

    Ok(Json(QuoteResponse {
        nights: quote.nights,
        base_total: quote.base_total,
        services_total: quote.services_total,
        total: quote.total,
    }))
}

/// Aggregated per-day calendar for a date window
#[instrument(skip(state), fields(property_id = %property_id))]
pub async fn get_calendar(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
    Query(window): Query<WindowQuery>,
) -> Result<Json<CalendarResponse>, HandlerError> {
    let property = state
        .properties
        .find_property(&property_id)
        .map_err(booking_error_to_response)?
        .ok_or_else(|| not_found("Property", &property_id))?;

    let span = DateSpan::new(window.from, window.to).map_err(booking_error_to_response)?;

    let overrides = state
        .overrides
        .overrides_in_window(&property_id, span)
        .map_err(booking_error_to_response)?;
    let bookings = state
        .bookings
        .bookings_in_window(&property_id, span)
        .map_err(booking_error_to_response)?;
    let customers = state
        .customers
        .list_customers()
        .map_err(booking_error_to_response)?;

    let days = build_calendar(&property, &overrides, &bookings, &customers, span);

    Ok(Json(CalendarResponse { property_id, days }))
}

/// Create a pending booking and a gateway transaction for it.
///
/// Flow: validate capacity, check availability, price the stay, look up or
/// create the customer, create the pending booking, ask the gateway for a
/// transaction, persist. The availability check and the insert are not
/// atomic: two concurrent callers can both pass the check before either
/// inserts. Closing that window belongs to the storage layer (overlap
/// constraint or per-property lock held across check + insert).
#[instrument(skip(state, request), fields(property_id = %request.property_id))]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<CreateBookingResponse>, HandlerError> {
    let property = state
        .properties
        .find_property(&request.property_id)
        .map_err(booking_error_to_response)?
        .ok_or_else(|| not_found("Property", &request.property_id))?;

    if !property.active {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                format!("Property is not bookable: {}", property.id),
                400,
            )),
        ));
    }

    if request.guests == 0 || request.guests > property.max_guests {
        return Err(booking_error_to_response(BookingError::Validation(format!(
            "guest count {} outside 1..={}",
            request.guests, property.max_guests
        ))));
    }

    let span = DateSpan::new(request.date_from, request.date_to)
        .map_err(booking_error_to_response)?;

    let existing = state
        .bookings
        .bookings_for_property(&property.id)
        .map_err(booking_error_to_response)?;

    if !availability::is_available(&existing, span.from, span.to)
        .map_err(booking_error_to_response)?
    {
        return Err(booking_error_to_response(BookingError::Unavailable {
            property_id: property.id.clone(),
        }));
    }

    let services = state
        .services
        .services_for_property(&property.id)
        .map_err(booking_error_to_response)?;

    let quote = pricing::calculate(
        &property,
        span,
        request.guests,
        &services,
        &request.service_ids,
    )
    .map_err(booking_error_to_response)?;

    let customer = state
        .customers
        .find_or_create(Customer {
            phone: request.customer.phone.clone(),
            ..Customer::new(
                request.customer.email.clone(),
                request.customer.first_name.clone(),
                request.customer.last_name.clone(),
            )
        })
        .map_err(booking_error_to_response)?;

    let mut booking = state.lifecycle.create(
        &property.id,
        &customer.id,
        span,
        request.guests,
        quote.total,
    );

    info!(
        "Creating booking: property={}, span={}, total={}",
        property.id, span, quote.total
    );

    // Gateway errors surface to the caller; nothing has been persisted yet,
    // so a failed transaction leaves no booking behind.
    let transaction = state
        .gateway
        .create_transaction(&booking.id, quote.total)
        .await
        .map_err(|e| {
            error!("Failed to create gateway transaction: {}", e);
            booking_error_to_response(e)
        })?;

    booking.transaction_id = Some(transaction.transaction_id.clone());

    state
        .bookings
        .insert_booking(booking.clone())
        .map_err(booking_error_to_response)?;

    // announced only now: a gateway or storage failure above must not leave
    // a created notification for a booking that was never stored
    state.lifecycle.announce_created(&booking);

    info!(
        "Created booking {} with transaction {}",
        booking.id, transaction.transaction_id
    );

    Ok(Json(CreateBookingResponse {
        booking_id: booking.id,
        status: booking.status.to_string(),
        nights: quote.nights,
        total: quote.total,
        transaction_id: transaction.transaction_id,
        payment_url: transaction.payment_url,
    }))
}

/// Get single booking
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let booking = state
        .bookings
        .find_booking(&booking_id)
        .map_err(booking_error_to_response)?
        .ok_or_else(|| not_found("Booking", &booking_id))?;
    Ok(Json(booking))
}

/// Administrative confirmation: pending -> confirmed
#[instrument(skip(state), fields(booking_id = %booking_id))]
pub async fn confirm_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let mut booking = state
        .bookings
        .find_booking(&booking_id)
        .map_err(booking_error_to_response)?
        .ok_or_else(|| not_found("Booking", &booking_id))?;

    state
        .lifecycle
        .confirm(&mut booking)
        .map_err(booking_error_to_response)?;
    state
        .bookings
        .update_booking(&booking)
        .map_err(booking_error_to_response)?;

    Ok(Json(booking))
}

/// Cancel a booking (user or administrative). Cancelling a paid booking
/// marks state only; refunds are an external workflow.
#[instrument(skip(state), fields(booking_id = %booking_id))]
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let mut booking = state
        .bookings
        .find_booking(&booking_id)
        .map_err(booking_error_to_response)?
        .ok_or_else(|| not_found("Booking", &booking_id))?;

    state
        .lifecycle
        .cancel(&mut booking)
        .map_err(booking_error_to_response)?;
    state
        .bookings
        .update_booking(&booking)
        .map_err(booking_error_to_response)?;

    Ok(Json(booking))
}

/// Handle a payment capture callback.
///
/// The signature is verified before anything else; a rejected callback
/// mutates nothing. Captures are applied at-most-once per transaction id,
/// so the gateway's at-least-once delivery is safe.
#[instrument(skip(state, headers, body))]
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, HandlerError> {
    let signature = headers
        .get("novapay-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Missing NovaPay-Signature header", 400)),
            )
        })?;

    let notice = state
        .gateway
        .verify_callback(&body, signature)
        .map_err(|e| {
            warn!("Callback verification failed: {}", e);
            booking_error_to_response(e)
        })?;

    info!(
        "Received capture callback: transaction={}, amount={}",
        notice.transaction_id, notice.captured_amount
    );

    let mut booking = state
        .bookings
        .find_by_transaction(&notice.transaction_id)
        .map_err(booking_error_to_response)?
        .ok_or_else(|| not_found("Booking for transaction", &notice.transaction_id))?;

    let outcome = state
        .lifecycle
        .apply_capture(&mut booking, &notice)
        .map_err(booking_error_to_response)?;

    if outcome == CaptureOutcome::Applied {
        state
            .bookings
            .update_booking(&booking)
            .map_err(booking_error_to_response)?;
    }

    let outcome_str = match outcome {
        CaptureOutcome::Applied => "applied",
        CaptureOutcome::AlreadyPaid => "already_paid",
        CaptureOutcome::Ignored => "ignored",
    };

    Ok(Json(serde_json::json!({
        "booking_id": booking.id,
        "status": booking.status.to_string(),
        "outcome": outcome_str
    })))
}

/// Expiry sweep: cancel pending/confirmed bookings unpaid past the TTL.
/// Called by an external scheduler, not evaluated in real time.
#[instrument(skip(state))]
pub async fn sweep_expire_unpaid(
    State(state): State<AppState>,
) -> Result<Json<SweepResponse>, HandlerError> {
    let now = Utc::now();
    let mut swept = 0;

    for mut booking in state
        .bookings
        .open_bookings()
        .map_err(booking_error_to_response)?
    {
        if state.lifecycle.expire_if_unpaid(&mut booking, now) {
            state
                .bookings
                .update_booking(&booking)
                .map_err(booking_error_to_response)?;
            swept += 1;
        }
    }

    info!("Expiry sweep cancelled {} unpaid bookings", swept);
    Ok(Json(SweepResponse { swept }))
}

/// Completion sweep: paid bookings whose checkout date has passed are
/// marked completed. Called by an external scheduler.
#[instrument(skip(state))]
pub async fn sweep_complete_departed(
    State(state): State<AppState>,
) -> Result<Json<SweepResponse>, HandlerError> {
    let today = Utc::now().date_naive();
    let mut swept = 0;

    for mut booking in state
        .bookings
        .open_bookings()
        .map_err(booking_error_to_response)?
    {
        if state.lifecycle.complete_if_departed(&mut booking, today) {
            state
                .bookings
                .update_booking(&booking)
                .map_err(booking_error_to_response)?;
            swept += 1;
        }
    }

    info!("Completion sweep closed {} departed stays", swept);
    Ok(Json(SweepResponse { swept }))
}
