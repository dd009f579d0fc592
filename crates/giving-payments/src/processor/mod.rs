//! Payment Processor Integration
//!
//! The calls the checkout builder needs from a hosted-checkout provider.
//! `StripeProcessor` talks to Stripe; `MockProcessor` records calls in memory.

mod mock;
mod stripe;

pub use self::mock::{MockProcessor, ProcessorCall, ProcessorStep};
pub use self::stripe::StripeProcessor;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;

/// Opaque tags attached to processor objects
pub type Metadata = BTreeMap<String, String>;

/// Where Stripe sends the donor after checkout
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl RedirectUrls {
    /// `{base}/success` and `{base}/cancel`
    pub fn from_base(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            success_url: format!("{base}/success"),
            cancel_url: format!("{base}/cancel"),
        }
    }
}

/// One-time payment session with a single inline line item
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentSessionRequest {
    pub product_name: String,
    pub description: String,
    pub unit_amount: i64,
    pub customer_email: String,
    pub urls: RedirectUrls,
    pub metadata: Metadata,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerRequest {
    pub email: String,
    pub name: String,
    pub metadata: Metadata,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductRequest {
    pub name: String,
    pub description: String,
    pub metadata: Metadata,
}

/// Monthly recurring price under an existing product
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceRequest {
    pub product_id: String,
    pub unit_amount: i64,
    pub metadata: Metadata,
}

/// Subscription session for an existing price and customer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionSessionRequest {
    pub price_id: String,
    pub customer_id: String,
    pub urls: RedirectUrls,
    pub metadata: Metadata,
}

/// Payment processor trait
///
/// Every create call returns the processor-side id of the new object.
/// All amounts are USD cents.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn create_payment_session(&self, request: PaymentSessionRequest) -> Result<String>;

    async fn create_customer(&self, request: CustomerRequest) -> Result<String>;

    async fn create_product(&self, request: ProductRequest) -> Result<String>;

    async fn create_monthly_price(&self, request: PriceRequest) -> Result<String>;

    async fn create_subscription_session(
        &self,
        request: SubscriptionSessionRequest,
    ) -> Result<String>;

    /// Remove a customer created by a checkout that did not complete
    async fn delete_customer(&self, customer_id: &str) -> Result<()>;

    /// Deactivate a product so it no longer shows up for new checkouts
    async fn archive_product(&self, product_id: &str) -> Result<()>;

    async fn archive_price(&self, price_id: &str) -> Result<()>;

    /// Processor name
    fn name(&self) -> &str;
}
