//! 订单服务仓储接口
//!
//! 每个 RPC 对应一个方法，实现方负责持久化和日志。

use async_trait::async_trait;
use eats_common::Pagination;
use eats_errors::AppResult;

use crate::domain::entities::{
    DateRange, Dish, DishUpdate, Kitchen, KitchenStatistics, NewDish, NewOrder, NewReview,
    NutritionUpdate, Order, OrderFilter, OrderStatusChange, OrderSummary, Payment,
    PaymentRequest, Review, ReviewView, UserActivity, WorkingHours,
};
use crate::domain::enums::OrderStatus;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 新建菜品
    async fn create_dish(&self, dish: NewDish) -> AppResult<Dish>;

    /// 更新菜品名称、价格和上架状态
    async fn update_dish(&self, update: DishUpdate) -> AppResult<Dish>;

    /// 软删除菜品，返回提示信息
    async fn delete_dish(&self, dish_id: &str) -> AppResult<String>;

    /// 未删除菜品列表，可按厨房过滤
    async fn list_dishes(
        &self,
        kitchen_id: Option<String>,
        pagination: Pagination,
    ) -> AppResult<Vec<Dish>>;

    async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> AppResult<OrderStatusChange>;

    async fn create_order(&self, order: NewOrder) -> AppResult<Order>;

    /// 某厨房的订单，附带下单用户名
    async fn get_order(
        &self,
        kitchen_id: &str,
        pagination: Pagination,
    ) -> AppResult<Vec<OrderSummary>>;

    /// 订单列表，附带厨房名
    async fn list_orders(
        &self,
        filter: OrderFilter,
        pagination: Pagination,
    ) -> AppResult<Vec<OrderSummary>>;

    async fn create_review(&self, review: NewReview) -> AppResult<Review>;

    async fn list_reviews(
        &self,
        kitchen_id: &str,
        pagination: Pagination,
    ) -> AppResult<Vec<ReviewView>>;

    /// 授权并记录支付，授权失败时不落库
    async fn create_payment(&self, request: PaymentRequest) -> AppResult<Payment>;

    /// 用户下过单的厨房中的可售菜品，按评分降序
    async fn get_dish_recommendations(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> AppResult<Vec<Dish>>;

    async fn get_kitchen_statistics(
        &self,
        kitchen_id: &str,
        range: DateRange,
    ) -> AppResult<KitchenStatistics>;

    async fn get_user_activity(&self, user_id: &str) -> AppResult<Vec<UserActivity>>;

    /// 覆盖营业时间并返回更新后的厨房
    async fn update_working_hours(
        &self,
        kitchen_id: &str,
        working_hours: Vec<WorkingHours>,
    ) -> AppResult<Kitchen>;

    /// 覆盖营养信息并返回更新后的菜品
    async fn update_dish_nutrition_info(&self, update: NutritionUpdate) -> AppResult<Dish>;
}
