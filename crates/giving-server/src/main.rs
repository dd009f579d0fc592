//! BGPNC online giving server
//!
//! Axum server for the giving page: renders the donation form, turns form
//! submissions into Stripe Checkout sessions, and shows the success and
//! cancel pages Stripe redirects back to.

mod config;
mod handlers;
mod pages;
mod routes;
mod session;
mod state;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use giving_payments::{
    CheckoutBuilder, MockProcessor, PaymentProcessor, RedirectUrls, StripeProcessor,
};

use crate::config::{ProcessorKind, ServerConfig};
use crate::session::SessionCookies;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env().context("Invalid server configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.default_log_filter().into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!(?config, "Loaded configuration");

    // Initialize payments
    let processor: Arc<dyn PaymentProcessor> = match config.processor {
        ProcessorKind::Stripe => Arc::new(StripeProcessor::new(&config.stripe_secret_key)),
        ProcessorKind::Mock => {
            tracing::warn!("⚠ Using the mock processor - no real checkouts will be created");
            Arc::new(MockProcessor::new())
        }
    };
    tracing::info!("✓ Payment processor: {}", processor.name());

    let checkout = CheckoutBuilder::new(processor, RedirectUrls::from_base(&config.app_url));
    tracing::info!(
        success_url = %checkout.urls().success_url,
        cancel_url = %checkout.urls().cancel_url,
        "Stripe redirects configured"
    );

    // Build application state
    let state = AppState {
        checkout: Arc::new(checkout),
        sessions: SessionCookies::new(&config.session_secret, config.production),
        stripe_publishable_key: Arc::from(config.stripe_publishable_key.as_str()),
    };

    let app = routes::router(state, &config.static_dir);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 giving server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /                        - Giving form");
    tracing::info!("  GET  /test                    - Liveness check");
    tracing::info!("  POST /create-checkout-session - Create Stripe checkout");
    tracing::info!("  GET  /success                 - Thank-you page");
    tracing::info!("  GET  /cancel                  - Cancelled page");
    if !config.production {
        tracing::info!("Development mode: set PRODUCTION to enable secure cookies");
    }

    axum::serve(listener, app).await?;

    Ok(())
}
