//! 持久化实现

mod migrations;
mod postgres;
mod rows;

pub use migrations::migrations;
pub use postgres::PostgresOrderRepository;
