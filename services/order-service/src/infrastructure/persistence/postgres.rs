//! PostgreSQL 仓储实现

use std::sync::Arc;

use async_trait::async_trait;
use eats_common::{Pagination, new_id};
use eats_errors::{AppError, AppResult};
use metrics::counter;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::entities::{
    DateRange, Dish, DishUpdate, Kitchen, KitchenStatistics, NewDish, NewOrder, NewReview,
    NutritionUpdate, Order, OrderFilter, OrderStatusChange, OrderSummary, Payment,
    PaymentRequest, Review, ReviewView, UserActivity, WorkingHours,
};
use crate::domain::enums::{OrderStatus, PaymentStatus};
use crate::domain::repositories::OrderRepository;
use crate::domain::services::PaymentGateway;

use super::rows::{
    DishRow, KitchenRow, KitchenStatisticsRow, OrderRow, OrderStatusRow, OrderSummaryRow,
    PaymentRow, ReviewRow, ReviewViewRow, UserActivityRow,
};

pub const DISH_DELETED_MESSAGE: &str = "Dish successfully deleted";

macro_rules! dish_columns {
    () => {
        "id, kitchen_id, name, description, price, category, allergens, nutrition_info, \
         dietary_info, ingredients, available, rating, created_at, updated_at, deleted_at"
    };
}

/// 记录失败并转换为 `AppError::Database`，标识字段来自外层 span
fn db_error(operation: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        error!(operation, error = %e, "Database operation failed");
        AppError::database(format!("{} failed: {}", operation, e))
    }
}

fn mapping_error(operation: &'static str, e: AppError) -> AppError {
    error!(operation, error = %e, "Row mapping failed");
    e
}

/// 单行转换，失败时记录日志
fn convert<R, T>(operation: &'static str, row: R) -> AppResult<T>
where
    T: TryFrom<R, Error = AppError>,
{
    T::try_from(row).map_err(|e| mapping_error(operation, e))
}

fn collect<R, T>(operation: &'static str, rows: Vec<R>) -> AppResult<Vec<T>>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter()
        .map(T::try_from)
        .collect::<AppResult<Vec<T>>>()
        .map_err(|e| mapping_error(operation, e))
}

/// 按键写入未命中任何行
fn not_found(operation: &'static str, entity: &str, id: &str) -> AppError {
    warn!(operation, entity, id, "Target row not found");
    AppError::not_found(format!("{} {}", entity, id))
}

pub struct PostgresOrderRepository {
    pool: PgPool,
    payment_gateway: Arc<dyn PaymentGateway>,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool, payment_gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            pool,
            payment_gateway,
        }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    #[instrument(skip_all, fields(kitchen_id = %dish.kitchen_id))]
    async fn create_dish(&self, dish: NewDish) -> AppResult<Dish> {
        let row = sqlx::query_as::<_, DishRow>(concat!(
            "INSERT INTO dishes (id, kitchen_id, name, description, price, category, allergens, \
             nutrition_info, dietary_info, ingredients, available, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW(), NOW()) \
             RETURNING ",
            dish_columns!()
        ))
        .bind(new_id())
        .bind(&dish.kitchen_id)
        .bind(&dish.name)
        .bind(&dish.description)
        .bind(dish.price)
        .bind(&dish.category)
        .bind(&dish.allergens)
        .bind(Json(dish.nutrition_info))
        .bind(&dish.dietary_info)
        .bind(&dish.ingredients)
        .bind(dish.available)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("create_dish"))?;

        info!(dish_id = %row.id, "Dish created");
        Ok(row.into())
    }

    #[instrument(skip_all, fields(dish_id = %update.id))]
    async fn update_dish(&self, update: DishUpdate) -> AppResult<Dish> {
        let row = sqlx::query_as::<_, DishRow>(concat!(
            "UPDATE dishes SET name = $1, price = $2, available = $3, updated_at = NOW() \
             WHERE id = $4 AND deleted_at IS NULL \
             RETURNING ",
            dish_columns!()
        ))
        .bind(&update.name)
        .bind(update.price)
        .bind(update.available)
        .bind(&update.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("update_dish"))?;

        row.map(Dish::from)
            .ok_or_else(|| not_found("update_dish", "dish", &update.id))
    }

    #[instrument(skip(self))]
    async fn delete_dish(&self, dish_id: &str) -> AppResult<String> {
        let result = sqlx::query(
            "UPDATE dishes SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(dish_id)
        .execute(&self.pool)
        .await
        .map_err(db_error("delete_dish"))?;

        if result.rows_affected() == 0 {
            return Err(not_found("delete_dish", "dish", dish_id));
        }

        info!("Dish soft-deleted");
        Ok(DISH_DELETED_MESSAGE.to_string())
    }

    #[instrument(skip(self))]
    async fn list_dishes(
        &self,
        kitchen_id: Option<String>,
        pagination: Pagination,
    ) -> AppResult<Vec<Dish>> {
        let rows = sqlx::query_as::<_, DishRow>(concat!(
            "SELECT ",
            dish_columns!(),
            " FROM dishes \
             WHERE deleted_at IS NULL AND ($1::text IS NULL OR kitchen_id = $1) \
             ORDER BY id \
             LIMIT $2 OFFSET $3"
        ))
        .bind(kitchen_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list_dishes"))?;

        debug!(count = rows.len(), "Dishes listed");
        Ok(rows.into_iter().map(Dish::from).collect())
    }

    #[instrument(skip(self))]
    async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> AppResult<OrderStatusChange> {
        let row = sqlx::query_as::<_, OrderStatusRow>(
            "UPDATE orders SET status = $1 WHERE id = $2 \
             RETURNING id, status, NOW() AS updated_at",
        )
        .bind(status.as_str())
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("update_order_status"))?;

        match row {
            Some(row) => {
                info!("Order status updated");
                convert("update_order_status", row)
            }
            None => Err(not_found("update_order_status", "order", order_id)),
        }
    }

    #[instrument(skip_all, fields(user_id = %order.user_id, kitchen_id = %order.kitchen_id))]
    async fn create_order(&self, order: NewOrder) -> AppResult<Order> {
        let row = sqlx::query_as::<_, OrderRow>(
            "INSERT INTO orders (id, user_id, kitchen_id, delivery_address, delivery_time, \
             status, total_amount, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW()) \
             RETURNING id, user_id, kitchen_id, delivery_address, delivery_time, status, \
             total_amount, created_at",
        )
        .bind(new_id())
        .bind(&order.user_id)
        .bind(&order.kitchen_id)
        .bind(&order.delivery_address)
        .bind(order.delivery_time)
        .bind(order.status.as_str())
        .bind(order.total_amount)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("create_order"))?;

        info!(order_id = %row.id, "Order created");
        convert("create_order", row)
    }

    #[instrument(skip(self))]
    async fn get_order(
        &self,
        kitchen_id: &str,
        pagination: Pagination,
    ) -> AppResult<Vec<OrderSummary>> {
        let rows = sqlx::query_as::<_, OrderSummaryRow>(
            "SELECT o.id, o.user_id, u.username AS user_name, o.kitchen_id, \
             NULL::text AS kitchen_name, o.total_amount, o.status, o.delivery_time \
             FROM orders o \
             LEFT JOIN users u ON u.id = o.user_id \
             WHERE o.kitchen_id = $1 \
             ORDER BY o.created_at DESC, o.id \
             LIMIT $2 OFFSET $3",
        )
        .bind(kitchen_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("get_order"))?;

        collect("get_order", rows)
    }

    #[instrument(skip(self))]
    async fn list_orders(
        &self,
        filter: OrderFilter,
        pagination: Pagination,
    ) -> AppResult<Vec<OrderSummary>> {
        let rows = sqlx::query_as::<_, OrderSummaryRow>(
            "SELECT o.id, o.user_id, NULL::text AS user_name, o.kitchen_id, \
             k.name AS kitchen_name, o.total_amount, o.status, o.delivery_time \
             FROM orders o \
             LEFT JOIN kitchens k ON k.id = o.kitchen_id \
             WHERE ($1::text IS NULL OR o.user_id = $1) \
               AND ($2::text IS NULL OR o.kitchen_id = $2) \
             ORDER BY o.created_at DESC, o.id \
             LIMIT $3 OFFSET $4",
        )
        .bind(filter.user_id)
        .bind(filter.kitchen_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list_orders"))?;

        collect("list_orders", rows)
    }

    #[instrument(skip_all, fields(order_id = %review.order_id, kitchen_id = %review.kitchen_id))]
    async fn create_review(&self, review: NewReview) -> AppResult<Review> {
        let row = sqlx::query_as::<_, ReviewRow>(
            "INSERT INTO reviews (id, order_id, user_id, kitchen_id, rating, comment, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW()) \
             RETURNING id, order_id, user_id, kitchen_id, rating, comment, created_at",
        )
        .bind(new_id())
        .bind(&review.order_id)
        .bind(&review.user_id)
        .bind(&review.kitchen_id)
        .bind(review.rating)
        .bind(&review.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("create_review"))?;

        info!(review_id = %row.id, "Review created");
        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn list_reviews(
        &self,
        kitchen_id: &str,
        pagination: Pagination,
    ) -> AppResult<Vec<ReviewView>> {
        let rows = sqlx::query_as::<_, ReviewViewRow>(
            "SELECT r.id, r.order_id, r.user_id, r.kitchen_id, r.rating, r.comment, \
             r.created_at, u.username AS user_name \
             FROM reviews r \
             LEFT JOIN users u ON u.id = r.user_id \
             WHERE r.kitchen_id = $1 \
             ORDER BY r.created_at DESC, r.id \
             LIMIT $2 OFFSET $3",
        )
        .bind(kitchen_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list_reviews"))?;

        Ok(rows.into_iter().map(ReviewView::from).collect())
    }

    #[instrument(skip_all, fields(order_id = %request.order_id))]
    async fn create_payment(&self, request: PaymentRequest) -> AppResult<Payment> {
        if let Err(e) = request.validate() {
            warn!(error = %e, "Payment request rejected");
            return Err(e.into());
        }

        let transaction_id = match self.payment_gateway.authorize(&request).await {
            Ok(transaction_id) => transaction_id,
            Err(e) => {
                counter!("payments_total", "status" => "declined").increment(1);
                warn!(error = %e, "Payment authorization failed");
                return Err(e.into());
            }
        };

        let row = sqlx::query_as::<_, PaymentRow>(
            "INSERT INTO payments (id, order_id, amount, status, payment_method, \
             transaction_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW()) \
             RETURNING id, order_id, amount, status, payment_method, transaction_id, created_at",
        )
        .bind(new_id())
        .bind(&request.order_id)
        .bind(request.amount)
        .bind(PaymentStatus::Success.as_str())
        .bind(&request.payment_method)
        .bind(&transaction_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("create_payment"))?;

        counter!("payments_total", "status" => "success").increment(1);
        info!(payment_id = %row.id, %transaction_id, "Payment recorded");
        convert("create_payment", row)
    }

    #[instrument(skip(self))]
    async fn get_dish_recommendations(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> AppResult<Vec<Dish>> {
        let rows = sqlx::query_as::<_, DishRow>(concat!(
            "SELECT ",
            dish_columns!(),
            " FROM dishes \
             WHERE deleted_at IS NULL AND available \
               AND kitchen_id IN (SELECT kitchen_id FROM orders WHERE user_id = $1) \
             ORDER BY rating DESC, id \
             LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("get_dish_recommendations"))?;

        Ok(rows.into_iter().map(Dish::from).collect())
    }

    #[instrument(skip(self), fields(start = %range.start, end = %range.end))]
    async fn get_kitchen_statistics(
        &self,
        kitchen_id: &str,
        range: DateRange,
    ) -> AppResult<KitchenStatistics> {
        let row = sqlx::query_as::<_, KitchenStatisticsRow>(
            "SELECT COUNT(*) AS total_orders, \
             COALESCE(AVG(total_amount), 0)::float8 AS average_order_value, \
             COALESCE(SUM(total_amount), 0)::float8 AS total_revenue \
             FROM orders \
             WHERE kitchen_id = $1 AND created_at BETWEEN $2 AND $3",
        )
        .bind(kitchen_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("get_kitchen_statistics"))?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn get_user_activity(&self, user_id: &str) -> AppResult<Vec<UserActivity>> {
        let rows = sqlx::query_as::<_, UserActivityRow>(
            "SELECT o.id AS order_id, k.name AS kitchen_name, o.total_amount AS amount, \
             o.status, o.created_at \
             FROM orders o \
             JOIN kitchens k ON k.id = o.kitchen_id \
             WHERE o.user_id = $1 \
             ORDER BY o.created_at DESC, o.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("get_user_activity"))?;

        collect("get_user_activity", rows)
    }

    #[instrument(skip(self, working_hours), fields(days = working_hours.len()))]
    async fn update_working_hours(
        &self,
        kitchen_id: &str,
        working_hours: Vec<WorkingHours>,
    ) -> AppResult<Kitchen> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("update_working_hours"))?;

        let result = sqlx::query("UPDATE kitchens SET working_hours = $1 WHERE id = $2")
            .bind(Json(working_hours))
            .bind(kitchen_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("update_working_hours"))?;

        if result.rows_affected() == 0 {
            return Err(not_found("update_working_hours", "kitchen", kitchen_id));
        }

        let row = sqlx::query_as::<_, KitchenRow>(
            "SELECT id, name, working_hours FROM kitchens WHERE id = $1",
        )
        .bind(kitchen_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("update_working_hours"))?;

        tx.commit().await.map_err(db_error("update_working_hours"))?;

        info!("Working hours updated");
        Ok(row.into())
    }

    #[instrument(skip_all, fields(dish_id = %update.dish_id))]
    async fn update_dish_nutrition_info(&self, update: NutritionUpdate) -> AppResult<Dish> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("update_dish_nutrition_info"))?;

        let result = sqlx::query(
            "UPDATE dishes SET allergens = $1, nutrition_info = $2, dietary_info = $3, \
             updated_at = NOW() \
             WHERE id = $4 AND deleted_at IS NULL",
        )
        .bind(&update.allergens)
        .bind(Json(update.nutrition_info))
        .bind(&update.dietary_info)
        .bind(&update.dish_id)
        .execute(&mut *tx)
        .await
        .map_err(db_error("update_dish_nutrition_info"))?;

        if result.rows_affected() == 0 {
            return Err(not_found("update_dish_nutrition_info", "dish", &update.dish_id));
        }

        let row = sqlx::query_as::<_, DishRow>(concat!(
            "SELECT ",
            dish_columns!(),
            " FROM dishes WHERE id = $1"
        ))
        .bind(&update.dish_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("update_dish_nutrition_info"))?;

        tx.commit()
            .await
            .map_err(db_error("update_dish_nutrition_info"))?;

        info!("Dish nutrition info updated");
        Ok(row.into())
    }
}
