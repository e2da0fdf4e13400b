//! # Payment Gateway Trait
//!
//! Seam to the external payment provider. The core asks the gateway to
//! create a transaction for an amount and later receives a capture callback;
//! gateway errors are surfaced to the caller, never retried here. Timing out
//! and retrying the latent outbound call is the caller's responsibility.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::BookingResult;
use crate::lifecycle::CaptureNotice;

/// A transaction created at the gateway for a pending booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayTransaction {
    /// Gateway's transaction id (the capture callback carries this back)
    pub transaction_id: String,

    /// URL the guest is redirected to for payment
    pub payment_url: String,

    /// Gateway-side status at creation (informational)
    pub status: String,
}

/// Payment provider interface
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a transaction for `amount`, tagged with our booking id
    async fn create_transaction(
        &self,
        booking_id: &str,
        amount: Decimal,
    ) -> BookingResult<GatewayTransaction>;

    /// Verify a capture callback's signature and parse it.
    ///
    /// A signature or payload failure is an error; it must cause no state
    /// mutation and must not be treated as a silent success.
    fn verify_callback(&self, payload: &[u8], signature: &str) -> BookingResult<CaptureNotice>;

    /// Provider name (for logging and error messages)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedGateway = Arc<dyn PaymentGateway>;
