//! Mock Processor
//!
//! In-memory stand-in for Stripe, used by tests and local demo runs.
//! Hands out sequential test ids and records every call in order.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{
    CustomerRequest, PaymentProcessor, PaymentSessionRequest, PriceRequest, ProductRequest,
    SubscriptionSessionRequest,
};
use crate::error::{PaymentError, Result};

/// Processor operations, used to target failure injection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessorStep {
    PaymentSession,
    Customer,
    Product,
    Price,
    SubscriptionSession,
    DeleteCustomer,
    ArchiveProduct,
    ArchivePrice,
}

/// A recorded processor call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessorCall {
    PaymentSession(PaymentSessionRequest),
    Customer(CustomerRequest),
    Product(ProductRequest),
    Price(PriceRequest),
    SubscriptionSession(SubscriptionSessionRequest),
    DeleteCustomer(String),
    ArchiveProduct(String),
    ArchivePrice(String),
}

impl ProcessorCall {
    pub const fn step(&self) -> ProcessorStep {
        match self {
            Self::PaymentSession(_) => ProcessorStep::PaymentSession,
            Self::Customer(_) => ProcessorStep::Customer,
            Self::Product(_) => ProcessorStep::Product,
            Self::Price(_) => ProcessorStep::Price,
            Self::SubscriptionSession(_) => ProcessorStep::SubscriptionSession,
            Self::DeleteCustomer(_) => ProcessorStep::DeleteCustomer,
            Self::ArchiveProduct(_) => ProcessorStep::ArchiveProduct,
            Self::ArchivePrice(_) => ProcessorStep::ArchivePrice,
        }
    }
}

#[derive(Default)]
struct MockState {
    calls: Vec<ProcessorCall>,
    failures: Vec<ProcessorStep>,
    next_id: u32,
}

/// Mock processor with a call log
#[derive(Default)]
pub struct MockProcessor {
    state: Mutex<MockState>,
}

impl MockProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `step` fail with a processor error
    pub fn failing_at(step: ProcessorStep) -> Self {
        let mock = Self::new();
        mock.fail_at(step);
        mock
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn fail_at(&self, step: ProcessorStep) {
        self.state().failures.push(step);
    }

    /// Calls made so far, oldest first
    pub fn calls(&self) -> Vec<ProcessorCall> {
        self.state().calls.clone()
    }

    pub fn steps(&self) -> Vec<ProcessorStep> {
        self.calls().iter().map(ProcessorCall::step).collect()
    }

    fn record(&self, call: ProcessorCall, prefix: &str) -> Result<String> {
        let mut state = self.state();
        let step = call.step();
        state.calls.push(call);

        if state.failures.contains(&step) {
            return Err(PaymentError::processor(
                "InvalidRequest",
                format!("mock failure at {step:?}"),
            ));
        }

        state.next_id += 1;
        Ok(format!("{prefix}_test_{}", state.next_id))
    }
}

#[async_trait]
impl PaymentProcessor for MockProcessor {
    async fn create_payment_session(&self, request: PaymentSessionRequest) -> Result<String> {
        self.record(ProcessorCall::PaymentSession(request), "cs")
    }

    async fn create_customer(&self, request: CustomerRequest) -> Result<String> {
        self.record(ProcessorCall::Customer(request), "cus")
    }

    async fn create_product(&self, request: ProductRequest) -> Result<String> {
        self.record(ProcessorCall::Product(request), "prod")
    }

    async fn create_monthly_price(&self, request: PriceRequest) -> Result<String> {
        self.record(ProcessorCall::Price(request), "price")
    }

    async fn create_subscription_session(
        &self,
        request: SubscriptionSessionRequest,
    ) -> Result<String> {
        self.record(ProcessorCall::SubscriptionSession(request), "cs")
    }

    async fn delete_customer(&self, customer_id: &str) -> Result<()> {
        self.record(ProcessorCall::DeleteCustomer(customer_id.to_string()), "del")
            .map(|_| ())
    }

    async fn archive_product(&self, product_id: &str) -> Result<()> {
        self.record(ProcessorCall::ArchiveProduct(product_id.to_string()), "arch")
            .map(|_| ())
    }

    async fn archive_price(&self, price_id: &str) -> Result<()> {
        self.record(ProcessorCall::ArchivePrice(price_id.to_string()), "arch")
            .map(|_| ())
    }

    fn name(&self) -> &str {
        "MockProcessor"
    }
}
