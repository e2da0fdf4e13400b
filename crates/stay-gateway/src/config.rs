//! # Gateway Configuration
//!
//! Configuration management for the NovaPay integration.
//! All secrets are loaded from environment variables.

use stay_core::BookingError;
use std::env;

/// NovaPay API configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Secret API key (nvp_test_... or nvp_live_...)
    pub secret_key: String,

    /// Webhook signing secret (nwh_...)
    pub webhook_secret: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `NOVAPAY_SECRET_KEY`
    /// - `NOVAPAY_WEBHOOK_SECRET`
    pub fn from_env() -> Result<Self, BookingError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let secret_key = env::var("NOVAPAY_SECRET_KEY").map_err(|_| {
            BookingError::Configuration("NOVAPAY_SECRET_KEY not set".to_string())
        })?;

        let webhook_secret = env::var("NOVAPAY_WEBHOOK_SECRET").map_err(|_| {
            BookingError::Configuration("NOVAPAY_WEBHOOK_SECRET not set".to_string())
        })?;

        // Validate key formats
        if !secret_key.starts_with("nvp_test_") && !secret_key.starts_with("nvp_live_") {
            return Err(BookingError::Configuration(
                "NOVAPAY_SECRET_KEY must start with nvp_test_ or nvp_live_".to_string(),
            ));
        }

        if !webhook_secret.starts_with("nwh_") {
            return Err(BookingError::Configuration(
                "NOVAPAY_WEBHOOK_SECRET must start with nwh_".to_string(),
            ));
        }

        let api_base_url = env::var("NOVAPAY_API_BASE_URL")
            .unwrap_or_else(|_| "https://api.novapay.example".to_string());

        Ok(Self {
            secret_key,
            webhook_secret,
            api_base_url,
            api_version: "2024-11".to_string(),
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(secret_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            webhook_secret: webhook_secret.into(),
            api_base_url: "https://api.novapay.example".to_string(),
            api_version: "2024-11".to_string(),
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("nvp_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_modes() {
        let config = GatewayConfig::new("nvp_test_abc123", "nwh_secret");
        assert!(config.is_test_mode());

        let config = GatewayConfig::new("nvp_live_abc123", "nwh_secret");
        assert!(!config.is_test_mode());
    }

    #[test]
    fn test_auth_header() {
        let config = GatewayConfig::new("nvp_test_abc123", "nwh_secret");
        assert_eq!(config.auth_header(), "Bearer nvp_test_abc123");
    }

    #[test]
    fn test_base_url_override() {
        let config =
            GatewayConfig::new("nvp_test_abc123", "nwh_secret").with_api_base_url("http://localhost:9999");
        assert_eq!(config.api_base_url, "http://localhost:9999");
    }
}
