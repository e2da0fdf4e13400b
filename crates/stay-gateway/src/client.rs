//! # NovaPay Client
//!
//! HTTP implementation of the `PaymentGateway` trait against the NovaPay
//! transactions API. The client times out after 30 seconds and surfaces
//! gateway errors to the caller; it never retries on its own.

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stay_core::{
    BookingError, BookingResult, CaptureNotice, GatewayTransaction, PaymentGateway,
};
use tracing::{debug, error, info, instrument};

use crate::config::GatewayConfig;
use crate::webhook;

/// Payment gateway backed by the NovaPay hosted-payment API
pub struct HttpGateway {
    config: GatewayConfig,
    client: Client,
}

impl HttpGateway {
    /// Create a new gateway client
    pub fn new(config: GatewayConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> BookingResult<Self> {
        let config = GatewayConfig::from_env()?;
        Ok(Self::new(config))
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    #[instrument(skip(self), fields(booking_id = %booking_id, amount = %amount))]
    async fn create_transaction(
        &self,
        booking_id: &str,
        amount: Decimal,
    ) -> BookingResult<GatewayTransaction> {
        if amount <= Decimal::ZERO {
            return Err(BookingError::Validation(format!(
                "transaction amount must be positive, got {}",
                amount
            )));
        }

        let request = CreateTransactionRequest {
            amount: amount.to_string(),
            reference: booking_id.to_string(),
        };

        debug!("Creating NovaPay transaction");

        let url = format!("{}/v1/transactions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("NovaPay-Version", &self.config.api_version)
            // the booking id doubles as idempotency key: one transaction
            // per booking no matter how often the caller retries
            .header("Idempotency-Key", booking_id)
            .json(&request)
            .send()
            .await
            .map_err(|e| BookingError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BookingError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("NovaPay API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<GatewayErrorResponse>(&body) {
                return Err(BookingError::GatewayError {
                    provider: "novapay".to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(BookingError::GatewayError {
                provider: "novapay".to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let transaction: TransactionResponse = serde_json::from_str(&body).map_err(|e| {
            BookingError::Serialization(format!("Failed to parse NovaPay response: {}", e))
        })?;

        info!(
            "Created NovaPay transaction: id={}, status={}",
            transaction.id, transaction.status
        );

        Ok(GatewayTransaction {
            transaction_id: transaction.id,
            payment_url: transaction.payment_url,
            status: transaction.status,
        })
    }

    fn verify_callback(&self, payload: &[u8], signature: &str) -> BookingResult<CaptureNotice> {
        webhook::verify_and_parse(&self.config.webhook_secret, payload, signature)
    }

    fn provider_name(&self) -> &'static str {
        "novapay"
    }
}

// =============================================================================
// NovaPay API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CreateTransactionRequest {
    amount: String,
    reference: String,
}

#[derive(Debug, Deserialize)]
struct TransactionResponse {
    id: String,
    payment_url: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorResponse {
    error: GatewayErrorBody,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer) -> HttpGateway {
        let config = GatewayConfig::new("nvp_test_abc", "nwh_secret")
            .with_api_base_url(server.uri());
        HttpGateway::new(config)
    }

    #[tokio::test]
    async fn test_create_transaction_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/transactions"))
            .and(header("Authorization", "Bearer nvp_test_abc"))
            .and(header("Idempotency-Key", "bk-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "TX-42",
                "payment_url": "https://pay.novapay.example/TX-42",
                "status": "created"
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let tx = gateway.create_transaction("bk-1", dec!(300.00)).await.unwrap();
        assert_eq!(tx.transaction_id, "TX-42");
        assert_eq!(tx.payment_url, "https://pay.novapay.example/TX-42");
    }

    #[tokio::test]
    async fn test_create_transaction_gateway_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/transactions"))
            .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
                "error": { "message": "Account suspended" }
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let err = gateway.create_transaction("bk-1", dec!(300.00)).await;
        match err {
            Err(BookingError::GatewayError { provider, message }) => {
                assert_eq!(provider, "novapay");
                assert_eq!(message, "Account suspended");
            }
            other => panic!("expected GatewayError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_transaction_rejects_non_positive_amount() {
        let server = MockServer::start().await;
        let gateway = gateway_for(&server);
        assert!(gateway.create_transaction("bk-1", dec!(0)).await.is_err());
        assert!(gateway.create_transaction("bk-1", dec!(-10)).await.is_err());
    }
}
