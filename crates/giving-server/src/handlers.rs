//! HTTP Handlers

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use tracing::Instrument;

use giving_payments::{DonationForm, PaymentError};

use crate::pages;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub id: String,
}

/// Giving form
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(pages::index(&state.stripe_publishable_key))
}

/// Liveness check
pub async fn test() -> &'static str {
    "Hello, World!"
}

/// Create a Stripe checkout session from the giving form
pub async fn create_checkout_session(
    State(state): State<AppState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Response, PaymentError> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("checkout", %request_id);

    async move {
        let Form(pairs) = form.map_err(|rejection| {
            tracing::warn!(error = %rejection, "Unreadable giving form");
            PaymentError::invalid("form", rejection.body_text())
        })?;
        tracing::debug!(fields = pairs.len(), "Form data received");

        let form = DonationForm::from_pairs(pairs).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected giving form");
        })?;

        let session = state.checkout.build_and_submit(form).await.inspect_err(|e| {
            if e.is_input_error() {
                tracing::warn!(error = %e, "Rejected giving form");
            } else {
                tracing::error!(error = %e, "Error creating checkout session");
            }
        })?;

        tracing::debug!(first_name = %session.first_name, "Stored first name in session");

        Ok::<_, PaymentError>((
            [(header::SET_COOKIE, state.sessions.set_cookie(&session.first_name))],
            Json(CheckoutResponse { id: session.id }),
        )
            .into_response())
    }
    .instrument(span)
    .await
}

/// Confirmation page
pub async fn success(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let first_name = state
        .sessions
        .first_name(&headers)
        .unwrap_or_else(|| pages::DEFAULT_FIRST_NAME.to_string());
    Html(pages::success(&first_name))
}

/// Cancellation page
pub async fn cancel() -> Html<String> {
    Html(pages::cancel())
}
