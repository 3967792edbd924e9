//! 领域枚举

mod order_status;
mod payment_status;

pub use order_status::OrderStatus;
pub use payment_status::PaymentStatus;

use thiserror::Error;

/// 状态文本无法识别
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} status: {value}")]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
}
