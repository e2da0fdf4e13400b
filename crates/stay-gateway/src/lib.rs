//! # stay-gateway
//!
//! NovaPay payment-gateway collaborator for staybook-rs.
//!
//! The core asks the gateway to create a transaction for a pending booking
//! and later receives a signed capture callback that drives the booking to
//! paid. This crate provides:
//!
//! 1. **HttpGateway** — `PaymentGateway` implementation over the NovaPay
//!    transactions API
//! 2. **webhook** — HMAC-SHA256 callback verification and parsing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stay_gateway::HttpGateway;
//! use stay_core::PaymentGateway;
//!
//! // Create gateway from environment
//! let gateway = HttpGateway::from_env()?;
//!
//! // Create a transaction for a pending booking
//! let tx = gateway.create_transaction(&booking.id, quote.total).await?;
//!
//! // Redirect the guest to tx.payment_url; later, in the callback endpoint:
//! let notice = gateway.verify_callback(payload, signature)?;
//! ```

pub mod client;
pub mod config;
pub mod webhook;

// Re-exports
pub use client::HttpGateway;
pub use config::GatewayConfig;
pub use webhook::{parse_capture_payload, verify_and_parse, SIGNATURE_TOLERANCE_SECS};
