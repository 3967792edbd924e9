//! 领域服务接口

mod payment_gateway;

pub use payment_gateway::PaymentGateway;
