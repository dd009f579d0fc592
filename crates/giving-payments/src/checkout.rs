//! Donation Checkout
//!
//! Turns a validated giving form into Stripe Checkout sessions.
//!
//! One-time gifts are a single payment-mode session with an inline line item.
//! Monthly gifts need four dependent calls, in order:
//!
//! ```text
//! customer ──▶ product ──▶ monthly price ──▶ subscription session
//! ```
//!
//! If a later call fails, objects already created for that gift are deleted
//! or archived on a best-effort basis and the original error is returned.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::donation::{DonationForm, DonationIntent, Frequency};
use crate::error::Result;
use crate::processor::{
    CustomerRequest, PaymentProcessor, PaymentSessionRequest, PriceRequest, ProductRequest,
    RedirectUrls, SubscriptionSessionRequest,
};

/// Product name on one-time gifts
pub const ONE_TIME_PRODUCT: &str = "BGPNC Offering";

/// Product name on monthly gifts
pub const MONTHLY_PRODUCT: &str = "BGPNC Monthly Offering";

/// Result of creating a checkout session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Stripe session ID, handed to Stripe.js for the redirect
    pub id: String,

    /// First name to greet on the success page
    pub first_name: String,

    pub frequency: Frequency,
}

/// Builds and submits donation checkouts
#[derive(Clone)]
pub struct CheckoutBuilder {
    processor: Arc<dyn PaymentProcessor>,
    urls: RedirectUrls,
}

impl CheckoutBuilder {
    pub fn new(processor: Arc<dyn PaymentProcessor>, urls: RedirectUrls) -> Self {
        Self { processor, urls }
    }

    pub const fn urls(&self) -> &RedirectUrls {
        &self.urls
    }

    /// Validate the form, then create the matching Stripe checkout
    pub async fn build_and_submit(&self, form: DonationForm) -> Result<CheckoutSession> {
        self.build_and_submit_on(form, Local::now().date_naive()).await
    }

    /// Same as [`build_and_submit`](Self::build_and_submit) with an explicit gift date
    pub async fn build_and_submit_on(
        &self,
        form: DonationForm,
        date: NaiveDate,
    ) -> Result<CheckoutSession> {
        let intent = DonationIntent::from_form(form, date)?;
        let id = self.submit(&intent).await?;

        Ok(CheckoutSession {
            id,
            first_name: intent.first_name,
            frequency: intent.frequency,
        })
    }

    /// Create the checkout for an already validated intent
    pub async fn submit(&self, intent: &DonationIntent) -> Result<String> {
        let description = intent.description();
        tracing::debug!(description = %description, "Payment description");
        tracing::debug!(metadata = ?intent.metadata(), "Payment metadata");

        let id = match intent.frequency {
            Frequency::OneTime => self.submit_one_time(intent, description).await?,
            Frequency::Monthly => self.submit_monthly(intent, description).await?,
        };

        tracing::info!(
            session_id = %id,
            frequency = intent.frequency.as_str(),
            amount_cents = intent.amount_cents,
            "Checkout session created"
        );
        Ok(id)
    }

    async fn submit_one_time(&self, intent: &DonationIntent, description: String) -> Result<String> {
        self.processor
            .create_payment_session(PaymentSessionRequest {
                product_name: ONE_TIME_PRODUCT.to_string(),
                description,
                unit_amount: intent.amount_cents,
                customer_email: intent.donor_email.clone(),
                urls: self.urls.clone(),
                metadata: intent.metadata(),
            })
            .await
    }

    async fn submit_monthly(&self, intent: &DonationIntent, description: String) -> Result<String> {
        let metadata = intent.metadata();
        let mut created = CreatedObjects::default();

        let result = async {
            let customer_id = self
                .processor
                .create_customer(CustomerRequest {
                    email: intent.donor_email.clone(),
                    name: intent.donor_name.clone(),
                    metadata: metadata.clone(),
                })
                .await?;
            created.customer = Some(customer_id.clone());

            let product_id = self
                .processor
                .create_product(ProductRequest {
                    name: MONTHLY_PRODUCT.to_string(),
                    description,
                    metadata: metadata.clone(),
                })
                .await?;
            created.product = Some(product_id.clone());

            let price_id = self
                .processor
                .create_monthly_price(PriceRequest {
                    product_id,
                    unit_amount: intent.amount_cents,
                    metadata: metadata.clone(),
                })
                .await?;
            created.price = Some(price_id.clone());

            self.processor
                .create_subscription_session(SubscriptionSessionRequest {
                    price_id,
                    customer_id,
                    urls: self.urls.clone(),
                    metadata: metadata.clone(),
                })
                .await
        }
        .await;

        if let Err(err) = &result {
            tracing::error!(error = %err, "Monthly checkout failed, cleaning up");
            self.clean_up(created).await;
        }
        result
    }

    async fn clean_up(&self, created: CreatedObjects) {
        if let Some(price_id) = created.price {
            if let Err(e) = self.processor.archive_price(&price_id).await {
                tracing::warn!(price_id = %price_id, error = %e, "Failed to archive price");
            }
        }
        if let Some(product_id) = created.product {
            if let Err(e) = self.processor.archive_product(&product_id).await {
                tracing::warn!(product_id = %product_id, error = %e, "Failed to archive product");
            }
        }
        if let Some(customer_id) = created.customer {
            if let Err(e) = self.processor.delete_customer(&customer_id).await {
                tracing::warn!(customer_id = %customer_id, error = %e, "Failed to delete customer");
            }
        }
    }
}

/// Processor objects created so far for one monthly gift
#[derive(Default)]
struct CreatedObjects {
    customer: Option<String>,
    product: Option<String>,
    price: Option<String>,
}
