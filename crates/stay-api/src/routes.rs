//! # Routes
//!
//! Axum router configuration for the booking API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Catalog and reads:
///   - GET  /api/v1/properties - List active properties
///   - GET  /api/v1/properties/{id} - Get property by ID
///   - GET  /api/v1/properties/{id}/availability?from&to - Conflict check
///   - POST /api/v1/properties/{id}/quote - Price a stay
///   - GET  /api/v1/properties/{id}/calendar?from&to - Per-day calendar
///
/// - Bookings:
///   - POST /api/v1/bookings - Create pending booking + gateway transaction
///   - GET  /api/v1/bookings/{id} - Get booking
///   - POST /api/v1/bookings/{id}/confirm - Administrative confirmation
///   - POST /api/v1/bookings/{id}/cancel - Cancel booking
///
/// - Webhooks:
///   - POST /webhook/payment - NovaPay capture callback
///
/// - Scheduled sweeps:
///   - POST /admin/sweeps/expire-unpaid - Cancel unpaid past the TTL
///   - POST /admin/sweeps/complete-departed - Close departed paid stays
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - allow all origins for now
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let property_routes = Router::new()
        .route("/properties", get(handlers::list_properties))
        .route("/properties/{property_id}", get(handlers::get_property))
        .route(
            "/properties/{property_id}/availability",
            get(handlers::check_availability),
        )
        .route("/properties/{property_id}/quote", post(handlers::quote))
        .route(
            "/properties/{property_id}/calendar",
            get(handlers::get_calendar),
        );

    let booking_routes = Router::new()
        .route("/bookings", post(handlers::create_booking))
        .route("/bookings/{booking_id}", get(handlers::get_booking))
        .route(
            "/bookings/{booking_id}/confirm",
            post(handlers::confirm_booking),
        )
        .route(
            "/bookings/{booking_id}/cancel",
            post(handlers::cancel_booking),
        );

    let api_routes = Router::new().merge(property_routes).merge(booking_routes);

    // Webhook routes (no CORS, must accept raw body)
    let webhook_routes = Router::new().route("/payment", post(handlers::payment_webhook));

    // Sweep endpoints for the external scheduler
    let sweep_routes = Router::new()
        .route("/expire-unpaid", post(handlers::sweep_expire_unpaid))
        .route(
            "/complete-departed",
            post(handlers::sweep_complete_departed),
        );

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Webhooks
        .nest("/webhook", webhook_routes)
        // Sweeps
        .nest("/admin/sweeps", sweep_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
