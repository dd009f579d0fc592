//! Router

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::handlers::{cancel, create_checkout_session, index, success, test};
use crate::state::AppState;

pub fn router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        // Pages
        .route("/", get(index))
        .route("/success", get(success))
        .route("/cancel", get(cancel))

        // Liveness
        .route("/test", get(test))

        // Payments
        .route("/create-checkout-session", post(create_checkout_session))

        // Form script and styles
        .nest_service("/static", ServeDir::new(static_dir))

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
