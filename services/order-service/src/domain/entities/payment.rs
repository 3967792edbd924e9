//! 支付实体

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::enums::PaymentStatus;
use crate::error::PaymentError;

/// 已落库的支付记录，不含卡片信息
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub payment_method: String,
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
}

/// 测试卡默认有效期
pub const TEST_CARD_EXPIRY: &str = "12/24";
/// 测试卡默认 CVV
pub const TEST_CARD_CVV: &str = "123";

/// 卡片信息，只在请求处理期间存在，绝不持久化
#[derive(Clone, Default, PartialEq)]
pub struct CardDetails {
    pub number: String,
    pub expiry_date: String,
    pub cvv: String,
}

impl CardDetails {
    /// 缺失的有效期和 CVV 用测试卡默认值补齐
    pub fn new(
        number: impl Into<String>,
        expiry_date: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        let or_default = |value: String, default: &str| {
            if value.trim().is_empty() {
                default.to_string()
            } else {
                value
            }
        };
        Self {
            number: number.into(),
            expiry_date: or_default(expiry_date.into(), TEST_CARD_EXPIRY),
            cvv: or_default(cvv.into(), TEST_CARD_CVV),
        }
    }

    /// 卡号末四位
    pub fn last4(&self) -> &str {
        let start = self.number.len().saturating_sub(4);
        self.number.get(start..).unwrap_or_default()
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &format_args!("****{}", self.last4()))
            .field("expiry_date", &self.expiry_date)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

/// 支付请求
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub order_id: String,
    pub amount: f64,
    pub payment_method: String,
    pub card: CardDetails,
}

impl PaymentRequest {
    /// 调用网关前的本地校验
    pub fn validate(&self) -> Result<(), PaymentError> {
        if self.order_id.trim().is_empty() {
            return Err(PaymentError::InvalidRequest("order_id is required".to_string()));
        }
        if self.payment_method.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(
                "payment_method is required".to_string(),
            ));
        }
        Ok(())
    }
}
