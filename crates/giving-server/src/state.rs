//! Application State

use std::sync::Arc;

use giving_payments::CheckoutBuilder;

use crate::session::SessionCookies;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Donation checkout builder (Stripe or mock processor)
    pub checkout: Arc<CheckoutBuilder>,

    /// Signed cookie carrying the donor's first name
    pub sessions: SessionCookies,

    /// Passed to Stripe.js on the giving page
    pub stripe_publishable_key: Arc<str>,
}
