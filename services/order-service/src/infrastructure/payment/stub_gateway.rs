//! 测试用支付网关，只接受固定的测试卡

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::entities::{PaymentRequest, TEST_CARD_CVV};
use crate::domain::services::PaymentGateway;
use crate::error::PaymentError;

pub const TEST_CARD_NUMBER: &str = "4111111111111111";
pub const TEST_TRANSACTION_ID: &str = "tx789";

#[derive(Debug, Clone, Copy, Default)]
pub struct StubPaymentGateway;

#[async_trait]
impl PaymentGateway for StubPaymentGateway {
    async fn authorize(&self, request: &PaymentRequest) -> Result<String, PaymentError> {
        let card = &request.card;
        if card.number == TEST_CARD_NUMBER && card.cvv == TEST_CARD_CVV {
            debug!(order_id = %request.order_id, "Payment authorized");
            Ok(TEST_TRANSACTION_ID.to_string())
        } else {
            warn!(
                order_id = %request.order_id,
                card_last4 = %card.last4(),
                "Payment declined"
            );
            Err(PaymentError::Declined)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CardDetails;

    fn request(number: &str, cvv: &str) -> PaymentRequest {
        PaymentRequest {
            order_id: "o1".to_string(),
            amount: 18.0,
            payment_method: "card".to_string(),
            card: CardDetails::new(number, "", cvv),
        }
    }

    #[tokio::test]
    async fn test_accepts_test_card() {
        let tx = StubPaymentGateway
            .authorize(&request(TEST_CARD_NUMBER, "123"))
            .await
            .unwrap();
        assert_eq!(tx, "tx789");
    }

    #[tokio::test]
    async fn test_missing_cvv_uses_test_default() {
        let tx = StubPaymentGateway.authorize(&request(TEST_CARD_NUMBER, "")).await;
        assert_eq!(tx, Ok(TEST_TRANSACTION_ID.to_string()));
    }

    #[tokio::test]
    async fn test_declines_other_cards() {
        let gateway = StubPaymentGateway;
        assert_eq!(
            gateway.authorize(&request("4000000000000002", "123")).await,
            Err(PaymentError::Declined)
        );
        assert_eq!(
            gateway.authorize(&request(TEST_CARD_NUMBER, "999")).await,
            Err(PaymentError::Declined)
        );
    }
}
