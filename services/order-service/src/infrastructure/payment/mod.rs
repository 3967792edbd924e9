//! 支付网关实现

mod stub_gateway;

pub use stub_gateway::{StubPaymentGateway, TEST_CARD_NUMBER, TEST_TRANSACTION_ID};
