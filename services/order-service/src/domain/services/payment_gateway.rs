//! 支付授权接口

use async_trait::async_trait;

use crate::domain::entities::PaymentRequest;
use crate::error::PaymentError;

/// 授权成功时返回外部交易号
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn authorize(&self, request: &PaymentRequest) -> Result<String, PaymentError>;
}
