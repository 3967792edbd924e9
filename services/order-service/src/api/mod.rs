//! gRPC API 层

pub mod conversions;
pub mod grpc_service;

pub use grpc_service::{OrderServiceImpl, SERVICE_NAME};
