//! # Staybook RS
//!
//! Rental booking engine: availability, seasonal pricing, calendars and a
//! payment-driven booking lifecycle.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export NOVAPAY_SECRET_KEY=nvp_test_...
//! export NOVAPAY_WEBHOOK_SECRET=nwh_...
//!
//! # Run the server
//! staybook
//! ```

use stay_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!(
        "Properties loaded: {}",
        state.properties.list_active()?.len()
    );
    info!("Unpaid booking TTL: {}h", state.config.unpaid_ttl_hours);

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("🏠 Staybook starting on http://{}", addr);

    if !is_prod {
        info!("📝 Health: http://{}/health", addr);
        info!("📅 Calendar: GET http://{}/api/v1/properties/{{id}}/calendar", addr);
        info!("🛏  Bookings: POST http://{}/api/v1/bookings", addr);
        info!("🔔 Webhook: POST http://{}/webhook/payment", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  🏠 Staybook RS 🏠
  ━━━━━━━━━━━━━━━━━
  Rental booking engine
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
