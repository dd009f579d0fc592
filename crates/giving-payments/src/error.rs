//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Donation checkout errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// A form field was missing or malformed
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Stripe rejected the request or could not be reached
    #[error("Stripe error ({code}): {message}")]
    Processor { code: String, message: String },
}

impl PaymentError {
    /// Required field absent or blank
    pub fn missing(field: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: "field is required".into(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn processor(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Processor {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Whether the donor can fix this by editing the form
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Machine-readable code for API clients
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::Processor { .. } => "CHECKOUT_ERROR",
        }
    }

    /// Get user-friendly message
    ///
    /// Input errors name the offending field; processor details stay in the
    /// server log.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { field, reason } => format!("{field}: {reason}"),
            Self::Processor { .. } => "We couldn't start your payment. Please try again.".into(),
        }
    }
}

impl From<stripe::StripeError> for PaymentError {
    fn from(err: stripe::StripeError) -> Self {
        match err {
            stripe::StripeError::Stripe(req) => Self::Processor {
                code: format!("{:?}", req.error_type),
                message: req
                    .message
                    .unwrap_or_else(|| format!("request failed with status {}", req.http_status)),
            },
            stripe::StripeError::Timeout => Self::processor("Timeout", "request timed out"),
            other => Self::processor("ClientError", other.to_string()),
        }
    }
}

#[cfg(feature = "axum-handlers")]
mod http {
    use axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    };

    use super::PaymentError;

    impl PaymentError {
        pub const fn status(&self) -> StatusCode {
            match self {
                Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
                Self::Processor { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl IntoResponse for PaymentError {
        fn into_response(self) -> Response {
            let body = serde_json::json!({
                "error": self.user_message(),
                "code": self.code(),
            });
            (self.status(), Json(body)).into_response()
        }
    }
}
