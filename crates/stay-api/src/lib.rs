//! # stay-api
//!
//! HTTP API layer for staybook-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for properties, quotes, calendars and bookings
//! - Webhook handler for payment capture callbacks
//! - Sweep endpoints driven by an external scheduler
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/properties` | List active properties |
//! | GET | `/api/v1/properties/:id/availability` | Conflict check |
//! | POST | `/api/v1/properties/:id/quote` | Price a stay |
//! | GET | `/api/v1/properties/:id/calendar` | Per-day calendar |
//! | POST | `/api/v1/bookings` | Create booking |
//! | POST | `/api/v1/bookings/:id/cancel` | Cancel booking |
//! | POST | `/webhook/payment` | NovaPay capture callback |
//! | POST | `/admin/sweeps/expire-unpaid` | Expiry sweep |
//! | POST | `/admin/sweeps/complete-departed` | Completion sweep |

pub mod handlers;
pub mod routes;
pub mod state;
pub mod store;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
pub use store::MemoryStore;
