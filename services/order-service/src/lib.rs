//! LocalEats 订单服务
//!
//! 菜品、订单、评价、支付以及厨房营业数据的 gRPC 服务。

pub mod api;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub mod order {
    pub mod v1 {
        tonic::include_proto!("order.v1");
    }
}

pub use order::v1 as proto;

/// gRPC 反射使用的文件描述符集
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("order_descriptor");
