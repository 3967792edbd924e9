//! gRPC 服务实现
//!
//! 每个 RPC 直接委托给仓储，本层只负责转换与结构性校验。

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use eats_bootstrap::record_grpc_request;
use eats_common::Pagination;
use tonic::{Request, Response, Status};

use crate::domain::entities::OrderFilter;
use crate::domain::repositories::OrderRepository;
use crate::proto::order_service_server::OrderService;
use crate::proto::*;

use super::conversions::*;

pub const SERVICE_NAME: &str = "order.v1.OrderService";

pub struct OrderServiceImpl {
    repository: Arc<dyn OrderRepository>,
}

impl OrderServiceImpl {
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self { repository }
    }
}

/// 记录请求计数与耗时
async fn observed<T, F>(method: &'static str, handler: F) -> Result<Response<T>, Status>
where
    F: Future<Output = Result<T, Status>>,
{
    let started = Instant::now();
    let result = handler.await;
    let status = match &result {
        Ok(_) => "Ok".to_string(),
        Err(status) => format!("{:?}", status.code()),
    };
    record_grpc_request(
        SERVICE_NAME,
        method,
        &status,
        started.elapsed().as_secs_f64() * 1000.0,
    );
    result.map(Response::new)
}

#[tonic::async_trait]
impl OrderService for OrderServiceImpl {
    // ========== 菜品 ==========

    async fn create_dish(
        &self,
        request: Request<CreateDishRequest>,
    ) -> Result<Response<CreateDishResponse>, Status> {
        observed("CreateDish", async {
            let dish = request.into_inner().dish.ok_or_else(|| missing("dish"))?;
            let dish = self.repository.create_dish(new_dish_from_proto(dish)?).await?;
            Ok(CreateDishResponse {
                dish: Some(dish_to_proto(&dish)),
            })
        })
        .await
    }

    async fn update_dish(
        &self,
        request: Request<UpdateDishRequest>,
    ) -> Result<Response<UpdateDishResponse>, Status> {
        observed("UpdateDish", async {
            let dish = request.into_inner().dish.ok_or_else(|| missing("dish"))?;
            let dish = self.repository.update_dish(dish_update_from_proto(dish)?).await?;
            Ok(UpdateDishResponse {
                dish: Some(dish_to_proto(&dish)),
            })
        })
        .await
    }

    async fn delete_dish(
        &self,
        request: Request<DeleteDishRequest>,
    ) -> Result<Response<DeleteDishResponse>, Status> {
        observed("DeleteDish", async {
            let dish_id = require(&request.into_inner().dish_id, "dish_id")?;
            let message = self.repository.delete_dish(&dish_id).await?;
            Ok(DeleteDishResponse { message })
        })
        .await
    }

    async fn get_dishes(
        &self,
        request: Request<ListDishesRequest>,
    ) -> Result<Response<ListDishesResponse>, Status> {
        observed("GetDishes", async {
            let req = request.into_inner();
            let dishes = self
                .repository
                .list_dishes(optional(req.kitchen_id), Pagination::new(req.page, req.limit))
                .await?;
            Ok(ListDishesResponse {
                dishes: dishes.iter().map(dish_to_proto).collect(),
            })
        })
        .await
    }

    // ========== 订单 ==========

    async fn update_order_status(
        &self,
        request: Request<UpdateOrderStatusRequest>,
    ) -> Result<Response<UpdateOrderStatusResponse>, Status> {
        observed("UpdateOrderStatus", async {
            let req = request.into_inner();
            let order_id = require(&req.order_id, "order_id")?;
            let status = order_status_from_proto(req.status)?
                .ok_or_else(|| Status::invalid_argument("status must be specified"))?;
            let change = self.repository.update_order_status(&order_id, status).await?;
            Ok(status_change_to_proto(&change))
        })
        .await
    }

    async fn create_order(
        &self,
        request: Request<CreateOrderRequest>,
    ) -> Result<Response<CreateOrderResponse>, Status> {
        observed("CreateOrder", async {
            let order = request.into_inner().order.ok_or_else(|| missing("order"))?;
            let order = self.repository.create_order(new_order_from_proto(order)?).await?;
            Ok(CreateOrderResponse {
                order: Some(order_to_proto(&order)),
            })
        })
        .await
    }

    async fn get_order(
        &self,
        request: Request<GetOrderRequest>,
    ) -> Result<Response<GetOrderResponse>, Status> {
        observed("GetOrder", async {
            let req = request.into_inner();
            let kitchen_id = require(&req.kitchen_id, "kitchen_id")?;
            let orders = self
                .repository
                .get_order(&kitchen_id, Pagination::new(req.page, req.limit))
                .await?;
            Ok(GetOrderResponse {
                orders: orders.iter().map(order_summary_to_proto).collect(),
            })
        })
        .await
    }

    async fn list_orders(
        &self,
        request: Request<ListOrdersRequest>,
    ) -> Result<Response<ListOrdersResponse>, Status> {
        observed("ListOrders", async {
            let req = request.into_inner();
            let filter = OrderFilter {
                user_id: optional(req.user_id),
                kitchen_id: optional(req.kitchen_id),
            };
            let orders = self
                .repository
                .list_orders(filter, Pagination::new(req.page, req.limit))
                .await?;
            Ok(ListOrdersResponse {
                orders: orders.iter().map(order_summary_to_proto).collect(),
            })
        })
        .await
    }

    // ========== 评价 ==========

    async fn create_review(
        &self,
        request: Request<CreateReviewRequest>,
    ) -> Result<Response<CreateReviewResponse>, Status> {
        observed("CreateReview", async {
            let review = request.into_inner().review.ok_or_else(|| missing("review"))?;
            let review = self.repository.create_review(new_review_from_proto(review)?).await?;
            Ok(CreateReviewResponse {
                review: Some(review_to_proto(&review)),
            })
        })
        .await
    }

    async fn list_reviews(
        &self,
        request: Request<ListReviewsRequest>,
    ) -> Result<Response<ListReviewsResponse>, Status> {
        observed("ListReviews", async {
            let req = request.into_inner();
            let kitchen_id = require(&req.kitchen_id, "kitchen_id")?;
            let reviews = self
                .repository
                .list_reviews(&kitchen_id, Pagination::new(req.page, req.limit))
                .await?;
            Ok(ListReviewsResponse {
                reviews: reviews.iter().map(review_view_to_proto).collect(),
            })
        })
        .await
    }

    // ========== 支付 ==========

    async fn create_payment(
        &self,
        request: Request<CreatePaymentRequest>,
    ) -> Result<Response<CreatePaymentResponse>, Status> {
        observed("CreatePayment", async {
            let payment_request = payment_request_from_proto(request.into_inner())?;
            let payment = self.repository.create_payment(payment_request).await?;
            Ok(CreatePaymentResponse {
                payment: Some(payment_to_proto(&payment)),
            })
        })
        .await
    }

    // ========== 推荐与统计 ==========

    async fn get_dish_recommendations(
        &self,
        request: Request<GetDishRecommendationsRequest>,
    ) -> Result<Response<GetDishRecommendationsResponse>, Status> {
        observed("GetDishRecommendations", async {
            let req = request.into_inner();
            let user_id = require(&req.user_id, "user_id")?;
            let limit = Pagination::new(1, req.limit).limit();
            let dishes = self
                .repository
                .get_dish_recommendations(&user_id, limit)
                .await?;
            Ok(GetDishRecommendationsResponse {
                recommendations: dishes.iter().map(dish_to_proto).collect(),
            })
        })
        .await
    }

    async fn get_kitchen_statistics(
        &self,
        request: Request<GetKitchenStatisticsRequest>,
    ) -> Result<Response<GetKitchenStatisticsResponse>, Status> {
        observed("GetKitchenStatistics", async {
            let req = request.into_inner();
            let kitchen_id = require(&req.kitchen_id, "kitchen_id")?;
            let range = date_range_from_proto(&req.start_date, &req.end_date)?;
            let stats = self
                .repository
                .get_kitchen_statistics(&kitchen_id, range)
                .await?;
            Ok(statistics_to_proto(&stats))
        })
        .await
    }

    async fn get_user_activity(
        &self,
        request: Request<GetUserActivityRequest>,
    ) -> Result<Response<GetUserActivityResponse>, Status> {
        observed("GetUserActivity", async {
            let user_id = require(&request.into_inner().user_id, "user_id")?;
            let activity = self.repository.get_user_activity(&user_id).await?;
            Ok(GetUserActivityResponse {
                user_activity: activity.iter().map(user_activity_to_proto).collect(),
            })
        })
        .await
    }

    // ========== 厨房 ==========

    async fn update_working_hours(
        &self,
        request: Request<UpdateWorkingHoursRequest>,
    ) -> Result<Response<UpdateWorkingHoursResponse>, Status> {
        observed("UpdateWorkingHours", async {
            let req = request.into_inner();
            let kitchen_id = require(&req.kitchen_id, "kitchen_id")?;
            let hours = working_hours_from_proto(req.working_hours)?;
            let kitchen = self
                .repository
                .update_working_hours(&kitchen_id, hours)
                .await?;
            Ok(UpdateWorkingHoursResponse {
                working_hours: kitchen.working_hours.iter().map(working_hours_to_proto).collect(),
                kitchen: Some(kitchen_to_proto(&kitchen)),
            })
        })
        .await
    }

    async fn update_dish_nutrition_info(
        &self,
        request: Request<UpdateDishNutritionInfoRequest>,
    ) -> Result<Response<UpdateDishNutritionInfoResponse>, Status> {
        observed("UpdateDishNutritionInfo", async {
            let update = nutrition_update_from_proto(request.into_inner())?;
            let dish = self.repository.update_dish_nutrition_info(update).await?;
            Ok(UpdateDishNutritionInfoResponse {
                dish: Some(dish_to_proto(&dish)),
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        Dish, KitchenStatistics, NutritionInfo, OrderStatusChange, Payment,
    };
    use crate::domain::enums::{OrderStatus, PaymentStatus};
    use crate::domain::repositories::MockOrderRepository;
    use chrono::{TimeZone, Utc};
    use eats_errors::AppError;
    use mockall::predicate::eq;
    use tonic::Code;

    fn service(mock: MockOrderRepository) -> OrderServiceImpl {
        OrderServiceImpl::new(Arc::new(mock))
    }

    fn sample_dish(id: &str) -> Dish {
        let now = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
        Dish {
            id: id.to_string(),
            kitchen_id: "k1".to_string(),
            name: "Ramen".to_string(),
            description: String::new(),
            price: 14.0,
            category: "noodles".to_string(),
            allergens: vec![],
            nutrition_info: NutritionInfo::default(),
            dietary_info: vec![],
            ingredients: vec![],
            available: true,
            rating: 4.8,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_dish_missing_dish_is_rejected() {
        // 没有设置任何期望，触达仓储会直接 panic
        let svc = service(MockOrderRepository::new());
        let err = svc
            .create_dish(Request::new(CreateDishRequest { dish: None }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_create_dish_delegates_to_repository() {
        let mut mock = MockOrderRepository::new();
        mock.expect_create_dish()
            .withf(|dish| dish.kitchen_id == "k1" && dish.name == "Ramen")
            .times(1)
            .returning(|_| Ok(sample_dish("d1")));

        let response = service(mock)
            .create_dish(Request::new(CreateDishRequest {
                dish: Some(crate::proto::Dish {
                    kitchen_id: "k1".to_string(),
                    name: "Ramen".to_string(),
                    price: 14.0,
                    ..Default::default()
                }),
            }))
            .await
            .unwrap()
            .into_inner();

        let dish = response.dish.unwrap();
        assert_eq!(dish.id, "d1");
        assert_eq!(dish.created_at, "2024-04-01T12:00:00Z");
    }

    #[tokio::test]
    async fn test_get_dishes_passes_filter_and_pagination() {
        let mut mock = MockOrderRepository::new();
        mock.expect_list_dishes()
            .with(eq(Some("k1".to_string())), eq(Pagination::new(2, 10)))
            .times(1)
            .returning(|_, _| Ok(vec![sample_dish("d1"), sample_dish("d2")]));

        let response = service(mock)
            .get_dishes(Request::new(ListDishesRequest {
                kitchen_id: "k1".to_string(),
                page: 2,
                limit: 10,
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.dishes.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_unknown_dish_is_not_found() {
        let mut mock = MockOrderRepository::new();
        mock.expect_delete_dish()
            .returning(|id| Err(AppError::not_found(format!("dish {}", id))));

        let err = service(mock)
            .delete_dish(Request::new(DeleteDishRequest {
                dish_id: "missing".to_string(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::NotFound);
    }

    #[tokio::test]
    async fn test_update_order_status_requires_specified_status() {
        let svc = service(MockOrderRepository::new());
        let err = svc
            .update_order_status(Request::new(UpdateOrderStatusRequest {
                order_id: "o1".to_string(),
                status: crate::proto::OrderStatus::Unspecified as i32,
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_update_order_status_round_trip() {
        let mut mock = MockOrderRepository::new();
        mock.expect_update_order_status()
            .withf(|id, status| id == "o1" && *status == OrderStatus::Delivered)
            .returning(|id, status| {
                Ok(OrderStatusChange {
                    order_id: id.to_string(),
                    status,
                    updated_at: Utc.with_ymd_and_hms(2024, 4, 2, 8, 0, 0).unwrap(),
                })
            });

        let response = service(mock)
            .update_order_status(Request::new(UpdateOrderStatusRequest {
                order_id: "o1".to_string(),
                status: crate::proto::OrderStatus::Delivered as i32,
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.status, crate::proto::OrderStatus::Delivered as i32);
        assert_eq!(response.updated_at, "2024-04-02T08:00:00Z");
    }

    #[tokio::test]
    async fn test_create_payment_success_and_decline() {
        let mut mock = MockOrderRepository::new();
        mock.expect_create_payment()
            .withf(|req| req.card.number == "4111111111111111")
            .returning(|req| {
                Ok(Payment {
                    id: "p1".to_string(),
                    order_id: req.order_id,
                    amount: req.amount,
                    status: PaymentStatus::Success,
                    payment_method: req.payment_method,
                    transaction_id: "tx789".to_string(),
                    created_at: Utc::now(),
                })
            });
        mock.expect_create_payment()
            .withf(|req| req.card.number != "4111111111111111")
            .returning(|_| Err(AppError::payment_failed("payment failed")));
        let svc = service(mock);

        let request = |card: &str| {
            Request::new(CreatePaymentRequest {
                payment: Some(crate::proto::Payment {
                    order_id: "o1".to_string(),
                    amount: 20.0,
                    payment_method: "card".to_string(),
                    card_number: card.to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            })
        };

        let payment = svc
            .create_payment(request("4111111111111111"))
            .await
            .unwrap()
            .into_inner()
            .payment
            .unwrap();
        assert_eq!(payment.transaction_id, "tx789");
        assert_eq!(payment.status, crate::proto::PaymentStatus::Success as i32);

        let err = svc.create_payment(request("4000000000000002")).await.unwrap_err();
        assert_eq!(err.code(), Code::FailedPrecondition);
    }

    #[tokio::test]
    async fn test_create_payment_without_payment_is_rejected() {
        let svc = service(MockOrderRepository::new());
        let err = svc
            .create_payment(Request::new(CreatePaymentRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_kitchen_statistics_validates_dates() {
        let svc = service(MockOrderRepository::new());
        let err = svc
            .get_kitchen_statistics(Request::new(GetKitchenStatisticsRequest {
                kitchen_id: "k1".to_string(),
                start_date: "last week".to_string(),
                end_date: "2024-01-31".to_string(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_kitchen_statistics_zero_orders() {
        let mut mock = MockOrderRepository::new();
        mock.expect_get_kitchen_statistics()
            .returning(|_, _| Ok(KitchenStatistics::default()));

        let response = service(mock)
            .get_kitchen_statistics(Request::new(GetKitchenStatisticsRequest {
                kitchen_id: "k1".to_string(),
                start_date: "2024-01-01".to_string(),
                end_date: "2024-01-31".to_string(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.total_orders, 0);
        assert_eq!(response.total_revenue, 0.0);
    }

    #[tokio::test]
    async fn test_recommendations_zero_limit_means_unbounded() {
        let mut mock = MockOrderRepository::new();
        mock.expect_get_dish_recommendations()
            .withf(|user_id, limit| user_id == "u1" && limit.is_none())
            .returning(|_, _| Ok(vec![sample_dish("d1")]));

        let response = service(mock)
            .get_dish_recommendations(Request::new(GetDishRecommendationsRequest {
                user_id: "u1".to_string(),
                limit: 0,
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.recommendations.len(), 1);
    }

    #[tokio::test]
    async fn test_update_working_hours_rejects_bad_time() {
        let svc = service(MockOrderRepository::new());
        let err = svc
            .update_working_hours(Request::new(UpdateWorkingHoursRequest {
                kitchen_id: "k1".to_string(),
                working_hours: vec![crate::proto::WorkingHours {
                    day: "friday".to_string(),
                    open: "late".to_string(),
                    close: "23:00".to_string(),
                }],
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_database_error_is_internal() {
        let mut mock = MockOrderRepository::new();
        mock.expect_get_user_activity()
            .returning(|_| Err(AppError::database("connection reset")));

        let err = service(mock)
            .get_user_activity(Request::new(GetUserActivityRequest {
                user_id: "u1".to_string(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::Internal);
    }
}
