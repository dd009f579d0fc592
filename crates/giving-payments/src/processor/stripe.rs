//! Stripe Processor
//!
//! Hosted Checkout sessions plus the customer/product/price objects a
//! monthly gift needs.

use std::collections::HashMap;

use async_trait::async_trait;
use stripe::{
    CheckoutSession, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData, CreateCheckoutSessionPaymentMethodTypes,
    CreateCustomer, CreatePrice, CreatePriceRecurring, CreatePriceRecurringInterval,
    CreateProduct, Currency, Customer, CustomerId, IdOrCreate, Price, PriceId, Product,
    ProductId, UpdatePrice, UpdateProduct,
};

use super::{
    CustomerRequest, Metadata, PaymentProcessor, PaymentSessionRequest, PriceRequest,
    ProductRequest, SubscriptionSessionRequest,
};
use crate::error::{PaymentError, Result};

/// Stripe client wrapper
pub struct StripeProcessor {
    client: Client,
}

impl StripeProcessor {
    /// Create a new Stripe processor from a secret API key
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }
}

fn stripe_metadata(metadata: &Metadata) -> HashMap<String, String> {
    metadata.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

fn parse_id<T: std::str::FromStr>(kind: &str, id: &str) -> Result<T> {
    id.parse()
        .map_err(|_| PaymentError::processor("InvalidId", format!("'{id}' is not a {kind} id")))
}

#[async_trait]
impl PaymentProcessor for StripeProcessor {
    async fn create_payment_session(&self, request: PaymentSessionRequest) -> Result<String> {
        let mut params = CreateCheckoutSession::new();
        params.payment_method_types = Some(vec![CreateCheckoutSessionPaymentMethodTypes::Card]);
        params.mode = Some(CheckoutSessionMode::Payment);
        params.customer_email = Some(&request.customer_email);
        params.success_url = Some(&request.urls.success_url);
        params.cancel_url = Some(&request.urls.cancel_url);
        params.metadata = Some(stripe_metadata(&request.metadata));
        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            quantity: Some(1),
            price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                currency: Currency::USD,
                unit_amount: Some(request.unit_amount),
                product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                    name: request.product_name.clone(),
                    description: Some(request.description.clone()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]);

        let session = CheckoutSession::create(&self.client, params).await?;
        Ok(session.id.to_string())
    }

    async fn create_customer(&self, request: CustomerRequest) -> Result<String> {
        let mut params = CreateCustomer::new();
        params.email = Some(&request.email);
        params.name = Some(&request.name);
        params.metadata = Some(stripe_metadata(&request.metadata));

        let customer = Customer::create(&self.client, params).await?;
        Ok(customer.id.to_string())
    }

    async fn create_product(&self, request: ProductRequest) -> Result<String> {
        let mut params = CreateProduct::new(&request.name);
        params.description = Some(&request.description);
        params.metadata = Some(stripe_metadata(&request.metadata));

        let product = Product::create(&self.client, params).await?;
        Ok(product.id.to_string())
    }

    async fn create_monthly_price(&self, request: PriceRequest) -> Result<String> {
        let mut params = CreatePrice::new(Currency::USD);
        params.product = Some(IdOrCreate::Id(request.product_id.as_str()));
        params.unit_amount = Some(request.unit_amount);
        params.recurring = Some(CreatePriceRecurring {
            interval: CreatePriceRecurringInterval::Month,
            ..Default::default()
        });
        params.metadata = Some(stripe_metadata(&request.metadata));

        let price = Price::create(&self.client, params).await?;
        Ok(price.id.to_string())
    }

    async fn create_subscription_session(
        &self,
        request: SubscriptionSessionRequest,
    ) -> Result<String> {
        let mut params = CreateCheckoutSession::new();
        params.payment_method_types = Some(vec![CreateCheckoutSessionPaymentMethodTypes::Card]);
        params.mode = Some(CheckoutSessionMode::Subscription);
        params.customer = Some(parse_id::<CustomerId>("customer", &request.customer_id)?);
        params.success_url = Some(&request.urls.success_url);
        params.cancel_url = Some(&request.urls.cancel_url);
        params.metadata = Some(stripe_metadata(&request.metadata));
        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            price: Some(request.price_id.clone()),
            quantity: Some(1),
            ..Default::default()
        }]);

        let session = CheckoutSession::create(&self.client, params).await?;
        Ok(session.id.to_string())
    }

    async fn delete_customer(&self, customer_id: &str) -> Result<()> {
        let id = parse_id::<CustomerId>("customer", customer_id)?;
        Customer::delete(&self.client, &id).await?;
        Ok(())
    }

    async fn archive_product(&self, product_id: &str) -> Result<()> {
        let id = parse_id::<ProductId>("product", product_id)?;
        let mut params = UpdateProduct::new();
        params.active = Some(false);
        Product::update(&self.client, &id, params).await?;
        Ok(())
    }

    async fn archive_price(&self, price_id: &str) -> Result<()> {
        let id = parse_id::<PriceId>("price", price_id)?;
        let mut params = UpdatePrice::new();
        params.active = Some(false);
        Price::update(&self.client, &id, params).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "Stripe"
    }
}
