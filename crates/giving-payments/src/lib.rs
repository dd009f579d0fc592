//! # giving-payments
//!
//! Donation checkout for the BGPNC online giving page.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐  form   ┌──────────────────┐  session id  ┌─────────────────┐
//! │ Giving Page │────────▶│ CheckoutBuilder  │─────────────▶│  Stripe Hosted  │
//! │   (form)    │         │ (this crate)     │              │  Checkout Page  │
//! └─────────────┘         └──────────────────┘              └─────────────────┘
//!                                                                    │
//!                                            /success or /cancel ◀───┘
//! ```
//!
//! A gift is either one-time (a payment-mode session) or monthly (customer,
//! product, monthly price, then a subscription-mode session). Each gift can
//! be split across designated funds; the split is carried in the session
//! description and metadata so it shows up on receipts and in the dashboard.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use giving_payments::{CheckoutBuilder, DonationForm, RedirectUrls, StripeProcessor};
//!
//! let builder = CheckoutBuilder::new(
//!     Arc::new(StripeProcessor::new("sk_test_xxx")),
//!     RedirectUrls::from_base("https://give.example.org"),
//! );
//!
//! let form = DonationForm::from_pairs(pairs)?;
//! let session = builder.build_and_submit(form).await?;
//!
//! // Hand session.id to Stripe.js: stripe.redirectToCheckout({ sessionId })
//! ```

mod checkout;
mod donation;
mod error;
pub mod processor;

pub use checkout::{CheckoutBuilder, CheckoutSession, MONTHLY_PRODUCT, ONE_TIME_PRODUCT};
pub use donation::{Allocation, DonationForm, DonationIntent, Frequency, Fund, format_usd, to_cents};
pub use error::{PaymentError, Result};
pub use processor::{
    MockProcessor, PaymentProcessor, ProcessorCall, ProcessorStep, RedirectUrls, StripeProcessor,
};
