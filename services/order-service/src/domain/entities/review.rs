//! 评价实体

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: String,
    pub order_id: String,
    pub user_id: String,
    pub kitchen_id: String,
    pub rating: f64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub order_id: String,
    pub user_id: String,
    pub kitchen_id: String,
    pub rating: f64,
    pub comment: String,
}

/// 带评价人用户名的评价
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewView {
    pub review: Review,
    pub user_name: Option<String>,
}
