//! proto 与领域类型之间的转换
//!
//! 结构性校验都在这里完成，失败时返回 `InvalidArgument`，不触达存储。

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use tonic::Status;

use crate::domain::entities::{
    CardDetails, DateRange, Dish, DishUpdate, Kitchen, KitchenStatistics, NewDish, NewOrder,
    NewReview, NutritionInfo, NutritionUpdate, Order, OrderStatusChange, OrderSummary, Payment,
    PaymentRequest, Review, ReviewView, UserActivity, WorkingHours,
};
use crate::domain::enums::{OrderStatus, PaymentStatus};
use crate::proto;

// ========== 通用 ==========

pub fn require(value: &str, field: &str) -> Result<String, Status> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Status::invalid_argument(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

pub fn missing(field: &str) -> Status {
    Status::invalid_argument(format!("{} is required", field))
}

/// 空字符串视为未提供
pub fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn format_optional_timestamp(value: Option<&DateTime<Utc>>) -> String {
    value.map(format_timestamp).unwrap_or_default()
}

pub fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>, Status> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            Status::invalid_argument(format!("{} must be an RFC 3339 timestamp", field))
        })
}

/// 统计区间端点：RFC 3339 时间戳，或 `YYYY-MM-DD` 表示整天
pub fn parse_date_bound(
    value: &str,
    field: &str,
    end_of_day: bool,
) -> Result<DateTime<Utc>, Status> {
    let value = require(value, field)?;
    if let Ok(date) = NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
        let time = if end_of_day {
            NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
        } else {
            NaiveTime::from_hms_opt(0, 0, 0)
        }
        .ok_or_else(|| Status::internal("invalid day boundary"))?;
        return Ok(date.and_time(time).and_utc());
    }
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            Status::invalid_argument(format!(
                "{} must be an RFC 3339 timestamp or YYYY-MM-DD",
                field
            ))
        })
}

pub fn date_range_from_proto(start: &str, end: &str) -> Result<DateRange, Status> {
    let start = parse_date_bound(start, "start_date", false)?;
    let end = parse_date_bound(end, "end_date", true)?;
    DateRange::new(start, end).map_err(Status::from)
}

// ========== 枚举 ==========

pub fn order_status_to_proto(status: OrderStatus) -> i32 {
    let value = match status {
        OrderStatus::Pending => proto::OrderStatus::Pending,
        OrderStatus::Confirmed => proto::OrderStatus::Confirmed,
        OrderStatus::Delivered => proto::OrderStatus::Delivered,
        OrderStatus::Cancelled => proto::OrderStatus::Cancelled,
    };
    value as i32
}

/// `UNSPECIFIED` 返回 `None`，未知数值是参数错误
pub fn order_status_from_proto(value: i32) -> Result<Option<OrderStatus>, Status> {
    let status = proto::OrderStatus::try_from(value)
        .map_err(|_| Status::invalid_argument(format!("unknown order status {}", value)))?;
    Ok(match status {
        proto::OrderStatus::Unspecified => None,
        proto::OrderStatus::Pending => Some(OrderStatus::Pending),
        proto::OrderStatus::Confirmed => Some(OrderStatus::Confirmed),
        proto::OrderStatus::Delivered => Some(OrderStatus::Delivered),
        proto::OrderStatus::Cancelled => Some(OrderStatus::Cancelled),
    })
}

pub fn payment_status_to_proto(status: PaymentStatus) -> i32 {
    let value = match status {
        PaymentStatus::Pending => proto::PaymentStatus::Pending,
        PaymentStatus::Success => proto::PaymentStatus::Success,
        PaymentStatus::Failed => proto::PaymentStatus::Failed,
    };
    value as i32
}

// ========== 菜品 ==========

fn nutrition_from_proto(info: Option<proto::NutritionInfo>) -> NutritionInfo {
    info.map(|n| NutritionInfo {
        calories: n.calories,
        protein: n.protein,
        carbohydrates: n.carbohydrates,
        fat: n.fat,
    })
    .unwrap_or_default()
}

fn nutrition_to_proto(info: &NutritionInfo) -> proto::NutritionInfo {
    proto::NutritionInfo {
        calories: info.calories,
        protein: info.protein,
        carbohydrates: info.carbohydrates,
        fat: info.fat,
    }
}

pub fn new_dish_from_proto(dish: proto::Dish) -> Result<NewDish, Status> {
    Ok(NewDish {
        kitchen_id: require(&dish.kitchen_id, "dish.kitchen_id")?,
        name: require(&dish.name, "dish.name")?,
        description: dish.description,
        price: dish.price,
        category: dish.category,
        allergens: dish.allergens,
        nutrition_info: nutrition_from_proto(dish.nutrition_info),
        dietary_info: dish.dietary_info,
        ingredients: dish.ingredients,
        available: dish.available,
    })
}

pub fn dish_update_from_proto(dish: proto::Dish) -> Result<DishUpdate, Status> {
    Ok(DishUpdate {
        id: require(&dish.id, "dish.id")?,
        name: require(&dish.name, "dish.name")?,
        price: dish.price,
        available: dish.available,
    })
}

pub fn nutrition_update_from_proto(
    req: proto::UpdateDishNutritionInfoRequest,
) -> Result<NutritionUpdate, Status> {
    Ok(NutritionUpdate {
        dish_id: require(&req.dish_id, "dish_id")?,
        allergens: req.allergens,
        nutrition_info: NutritionInfo {
            calories: req.calories,
            protein: req.protein,
            carbohydrates: req.carbohydrates,
            fat: req.fat,
        },
        dietary_info: req.dietary_info,
    })
}

pub fn dish_to_proto(dish: &Dish) -> proto::Dish {
    proto::Dish {
        id: dish.id.clone(),
        kitchen_id: dish.kitchen_id.clone(),
        name: dish.name.clone(),
        description: dish.description.clone(),
        price: dish.price,
        category: dish.category.clone(),
        allergens: dish.allergens.clone(),
        nutrition_info: Some(nutrition_to_proto(&dish.nutrition_info)),
        dietary_info: dish.dietary_info.clone(),
        ingredients: dish.ingredients.clone(),
        available: dish.available,
        rating: dish.rating,
        created_at: format_timestamp(&dish.created_at),
        updated_at: format_timestamp(&dish.updated_at),
    }
}

// ========== 订单 ==========

pub fn new_order_from_proto(order: proto::Order) -> Result<NewOrder, Status> {
    let delivery_time = match optional(order.delivery_time) {
        Some(value) => Some(parse_timestamp(&value, "order.delivery_time")?),
        None => None,
    };
    Ok(NewOrder {
        user_id: require(&order.user_id, "order.user_id")?,
        kitchen_id: require(&order.kitchen_id, "order.kitchen_id")?,
        delivery_address: order.delivery_address,
        delivery_time,
        status: order_status_from_proto(order.status)?.unwrap_or_default(),
        total_amount: order.total_amount,
    })
}

pub fn order_to_proto(order: &Order) -> proto::Order {
    proto::Order {
        id: order.id.clone(),
        user_id: order.user_id.clone(),
        kitchen_id: order.kitchen_id.clone(),
        delivery_address: order.delivery_address.clone(),
        delivery_time: format_optional_timestamp(order.delivery_time.as_ref()),
        status: order_status_to_proto(order.status),
        created_at: format_timestamp(&order.created_at),
        total_amount: order.total_amount,
    }
}

pub fn order_summary_to_proto(summary: &OrderSummary) -> proto::OrderSummary {
    proto::OrderSummary {
        id: summary.id.clone(),
        user_id: summary.user_id.clone(),
        user_name: summary.user_name.clone().unwrap_or_default(),
        kitchen_id: summary.kitchen_id.clone(),
        kitchen_name: summary.kitchen_name.clone().unwrap_or_default(),
        total_amount: summary.total_amount,
        status: order_status_to_proto(summary.status),
        delivery_time: format_optional_timestamp(summary.delivery_time.as_ref()),
    }
}

pub fn status_change_to_proto(change: &OrderStatusChange) -> proto::UpdateOrderStatusResponse {
    proto::UpdateOrderStatusResponse {
        order_id: change.order_id.clone(),
        status: order_status_to_proto(change.status),
        updated_at: format_timestamp(&change.updated_at),
    }
}

pub fn user_activity_to_proto(activity: &UserActivity) -> proto::UserActivity {
    proto::UserActivity {
        order_id: activity.order_id.clone(),
        kitchen_name: activity.kitchen_name.clone(),
        amount: activity.amount,
        status: order_status_to_proto(activity.status),
        created_at: format_timestamp(&activity.created_at),
    }
}

// ========== 评价 ==========

pub fn new_review_from_proto(review: proto::Review) -> Result<NewReview, Status> {
    Ok(NewReview {
        order_id: require(&review.order_id, "review.order_id")?,
        user_id: require(&review.user_id, "review.user_id")?,
        kitchen_id: require(&review.kitchen_id, "review.kitchen_id")?,
        rating: review.rating,
        comment: review.comment,
    })
}

pub fn review_to_proto(review: &Review) -> proto::Review {
    proto::Review {
        id: review.id.clone(),
        order_id: review.order_id.clone(),
        user_id: review.user_id.clone(),
        kitchen_id: review.kitchen_id.clone(),
        rating: review.rating,
        comment: review.comment.clone(),
        created_at: format_timestamp(&review.created_at),
        user_name: String::new(),
    }
}

pub fn review_view_to_proto(view: &ReviewView) -> proto::Review {
    proto::Review {
        user_name: view.user_name.clone().unwrap_or_default(),
        ..review_to_proto(&view.review)
    }
}

// ========== 支付 ==========

/// order_id 与 payment_method 由仓储层校验
pub fn payment_request_from_proto(
    req: proto::CreatePaymentRequest,
) -> Result<PaymentRequest, Status> {
    let payment = req.payment.ok_or_else(|| missing("payment"))?;
    Ok(PaymentRequest {
        order_id: payment.order_id,
        amount: payment.amount,
        payment_method: payment.payment_method,
        card: CardDetails::new(payment.card_number, req.expiry_date, req.cvv),
    })
}

/// 卡号不回传
pub fn payment_to_proto(payment: &Payment) -> proto::Payment {
    proto::Payment {
        id: payment.id.clone(),
        order_id: payment.order_id.clone(),
        amount: payment.amount,
        status: payment_status_to_proto(payment.status),
        payment_method: payment.payment_method.clone(),
        transaction_id: payment.transaction_id.clone(),
        created_at: format_timestamp(&payment.created_at),
        card_number: String::new(),
    }
}

// ========== 厨房 ==========

pub fn working_hours_from_proto(
    hours: Vec<proto::WorkingHours>,
) -> Result<Vec<WorkingHours>, Status> {
    hours
        .into_iter()
        .map(|h| {
            let hours = WorkingHours {
                day: h.day.trim().to_string(),
                open: h.open.trim().to_string(),
                close: h.close.trim().to_string(),
            };
            hours.validate().map_err(Status::from)?;
            Ok(hours)
        })
        .collect()
}

pub fn working_hours_to_proto(hours: &WorkingHours) -> proto::WorkingHours {
    proto::WorkingHours {
        day: hours.day.clone(),
        open: hours.open.clone(),
        close: hours.close.clone(),
    }
}

pub fn kitchen_to_proto(kitchen: &Kitchen) -> proto::Kitchen {
    proto::Kitchen {
        id: kitchen.id.clone(),
        name: kitchen.name.clone(),
        working_hours: kitchen.working_hours.iter().map(working_hours_to_proto).collect(),
    }
}

pub fn statistics_to_proto(stats: &KitchenStatistics) -> proto::GetKitchenStatisticsResponse {
    proto::GetKitchenStatisticsResponse {
        total_orders: stats.total_orders,
        average_order_value: stats.average_order_value,
        total_revenue: stats.total_revenue,
    }
}
