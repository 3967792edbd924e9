//! 订单实体

use chrono::{DateTime, Utc};

use crate::domain::enums::OrderStatus;

/// 订单
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub kitchen_id: String,
    pub delivery_address: String,
    pub delivery_time: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: String,
    pub kitchen_id: String,
    pub delivery_address: String,
    pub delivery_time: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub total_amount: f64,
}

/// 订单列表视图，用户名与厨房名来自关联查询，可能缺失
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub id: String,
    pub user_id: String,
    pub user_name: Option<String>,
    pub kitchen_id: String,
    pub kitchen_name: Option<String>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub delivery_time: Option<DateTime<Utc>>,
}

/// 订单列表过滤条件，空条件表示不过滤
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub user_id: Option<String>,
    pub kitchen_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderStatusChange {
    pub order_id: String,
    pub status: OrderStatus,
    pub updated_at: DateTime<Utc>,
}

/// 用户订单历史中的一条
#[derive(Debug, Clone, PartialEq)]
pub struct UserActivity {
    pub order_id: String,
    pub kitchen_name: String,
    pub amount: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}
