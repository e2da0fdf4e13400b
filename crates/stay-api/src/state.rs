//! # Application State
//!
//! Shared state for the Axum application: configuration, repositories,
//! the payment gateway and the booking lifecycle.

use std::sync::Arc;

use stay_core::{
    BookingLifecycle, BookingRepo, BoxedGateway, CustomerRepo, LoggingObserver, OverrideRepo,
    PropertyCatalog, PropertyRepo, ServiceRepo,
};
use stay_gateway::HttpGateway;

use crate::store::MemoryStore;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Base URL for callbacks
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Hours a pending booking may stay unpaid before the expiry sweep
    /// cancels it
    pub unpaid_ttl_hours: i64,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            unpaid_ttl_hours: std::env::var("UNPAID_TTL_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(48),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: AppConfig,
    /// Property repository
    pub properties: Arc<dyn PropertyRepo>,
    /// Per-day override repository
    pub overrides: Arc<dyn OverrideRepo>,
    /// Booking repository
    pub bookings: Arc<dyn BookingRepo>,
    /// Customer repository
    pub customers: Arc<dyn CustomerRepo>,
    /// Extra service repository
    pub services: Arc<dyn ServiceRepo>,
    /// Payment gateway
    pub gateway: BoxedGateway,
    /// Booking state machine
    pub lifecycle: BookingLifecycle,
}

impl AppState {
    /// Create a new AppState wired to the NovaPay gateway and the seeded
    /// in-memory store
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let catalog = load_property_catalog()?;

        let gateway = HttpGateway::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize NovaPay gateway: {}", e))?;

        Ok(Self::with_parts(config, catalog, Arc::new(gateway)))
    }

    /// Assemble state from explicit parts (used by tests)
    pub fn with_parts(config: AppConfig, catalog: PropertyCatalog, gateway: BoxedGateway) -> Self {
        let store = Arc::new(MemoryStore::new());
        store.seed_catalog(&catalog);

        let lifecycle =
            BookingLifecycle::new(Arc::new(LoggingObserver), config.unpaid_ttl_hours);

        Self {
            config,
            properties: store.clone(),
            overrides: store.clone(),
            bookings: store.clone(),
            customers: store.clone(),
            services: store,
            gateway,
            lifecycle,
        }
    }
}

/// Load the property catalog from a config file
fn load_property_catalog() -> anyhow::Result<PropertyCatalog> {
    let config_paths = [
        "config/properties.toml",
        "../config/properties.toml",
        "../../config/properties.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = PropertyCatalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!(
                "Loaded {} properties from {}",
                catalog.properties.len(),
                path
            );
            return Ok(catalog);
        }
    }

    tracing::warn!("No property catalog found, using empty catalog");
    Ok(PropertyCatalog::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");
        std::env::remove_var("UNPAID_TTL_HOURS");

        let config = AppConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.unpaid_ttl_hours, 48);
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            environment: "test".to_string(),
            unpaid_ttl_hours: 48,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }
}
