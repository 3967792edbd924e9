//! 支付相关错误

use eats_errors::AppError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("Invalid payment request: {0}")]
    InvalidRequest(String),

    #[error("Payment declined")]
    Declined,
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InvalidRequest(msg) => AppError::validation(msg),
            PaymentError::Declined => AppError::payment_failed("payment failed"),
        }
    }
}
