//! 数据库行结构及其到领域实体的转换

use chrono::{DateTime, Utc};
use eats_errors::{AppError, AppResult};
use sqlx::FromRow;
use sqlx::types::Json;

use crate::domain::entities::{
    Dish, Kitchen, KitchenStatistics, NutritionInfo, Order, OrderStatusChange, OrderSummary,
    Payment, Review, ReviewView, UserActivity, WorkingHours,
};
use crate::domain::enums::{OrderStatus, PaymentStatus};

fn order_status(value: &str) -> AppResult<OrderStatus> {
    value
        .parse()
        .map_err(|e| AppError::database(format!("corrupt order row: {}", e)))
}

#[derive(Debug, FromRow)]
pub struct DishRow {
    pub id: String,
    pub kitchen_id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub allergens: Vec<String>,
    pub nutrition_info: Json<NutritionInfo>,
    pub dietary_info: Vec<String>,
    pub ingredients: Vec<String>,
    pub available: bool,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<DishRow> for Dish {
    fn from(row: DishRow) -> Self {
        Self {
            id: row.id,
            kitchen_id: row.kitchen_id,
            name: row.name,
            description: row.description,
            price: row.price,
            category: row.category,
            allergens: row.allergens,
            nutrition_info: row.nutrition_info.0,
            dietary_info: row.dietary_info,
            ingredients: row.ingredients,
            available: row.available,
            rating: row.rating,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct OrderRow {
    pub id: String,
    pub user_id: String,
    pub kitchen_id: String,
    pub delivery_address: String,
    pub delivery_time: Option<DateTime<Utc>>,
    pub status: String,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = AppError;

    fn try_from(row: OrderRow) -> AppResult<Self> {
        Ok(Self {
            status: order_status(&row.status)?,
            id: row.id,
            user_id: row.user_id,
            kitchen_id: row.kitchen_id,
            delivery_address: row.delivery_address,
            delivery_time: row.delivery_time,
            total_amount: row.total_amount,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct OrderSummaryRow {
    pub id: String,
    pub user_id: String,
    pub user_name: Option<String>,
    pub kitchen_id: String,
    pub kitchen_name: Option<String>,
    pub total_amount: f64,
    pub status: String,
    pub delivery_time: Option<DateTime<Utc>>,
}

impl TryFrom<OrderSummaryRow> for OrderSummary {
    type Error = AppError;

    fn try_from(row: OrderSummaryRow) -> AppResult<Self> {
        Ok(Self {
            status: order_status(&row.status)?,
            id: row.id,
            user_id: row.user_id,
            user_name: row.user_name,
            kitchen_id: row.kitchen_id,
            kitchen_name: row.kitchen_name,
            total_amount: row.total_amount,
            delivery_time: row.delivery_time,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct OrderStatusRow {
    pub id: String,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderStatusRow> for OrderStatusChange {
    type Error = AppError;

    fn try_from(row: OrderStatusRow) -> AppResult<Self> {
        Ok(Self {
            status: order_status(&row.status)?,
            order_id: row.id,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct ReviewRow {
    pub id: String,
    pub order_id: String,
    pub user_id: String,
    pub kitchen_id: String,
    pub rating: f64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            user_id: row.user_id,
            kitchen_id: row.kitchen_id,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct ReviewViewRow {
    #[sqlx(flatten)]
    pub review: ReviewRow,
    pub user_name: Option<String>,
}

impl From<ReviewViewRow> for ReviewView {
    fn from(row: ReviewViewRow) -> Self {
        Self {
            review: row.review.into(),
            user_name: row.user_name,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct PaymentRow {
    pub id: String,
    pub order_id: String,
    pub amount: f64,
    pub status: String,
    pub payment_method: String,
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = AppError;

    fn try_from(row: PaymentRow) -> AppResult<Self> {
        let status: PaymentStatus = row
            .status
            .parse()
            .map_err(|e| AppError::database(format!("corrupt payment row: {}", e)))?;
        Ok(Self {
            id: row.id,
            order_id: row.order_id,
            amount: row.amount,
            status,
            payment_method: row.payment_method,
            transaction_id: row.transaction_id,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct KitchenRow {
    pub id: String,
    pub name: String,
    pub working_hours: Json<Vec<WorkingHours>>,
}

impl From<KitchenRow> for Kitchen {
    fn from(row: KitchenRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            working_hours: row.working_hours.0,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct KitchenStatisticsRow {
    pub total_orders: i64,
    pub average_order_value: f64,
    pub total_revenue: f64,
}

impl From<KitchenStatisticsRow> for KitchenStatistics {
    fn from(row: KitchenStatisticsRow) -> Self {
        Self {
            total_orders: row.total_orders,
            average_order_value: row.average_order_value,
            total_revenue: row.total_revenue,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct UserActivityRow {
    pub order_id: String,
    pub kitchen_name: String,
    pub amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserActivityRow> for UserActivity {
    type Error = AppError;

    fn try_from(row: UserActivityRow) -> AppResult<Self> {
        Ok(Self {
            status: order_status(&row.status)?,
            order_id: row.order_id,
            kitchen_name: row.kitchen_name,
            amount: row.amount,
            created_at: row.created_at,
        })
    }
}
