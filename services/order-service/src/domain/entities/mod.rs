//! 领域实体

mod dish;
mod kitchen;
mod order;
mod payment;
mod review;

pub use dish::{Dish, DishUpdate, NewDish, NutritionInfo, NutritionUpdate};
pub use kitchen::{DateRange, Kitchen, KitchenStatistics, WorkingHours};
pub use order::{NewOrder, Order, OrderFilter, OrderStatusChange, OrderSummary, UserActivity};
pub use payment::{CardDetails, Payment, PaymentRequest, TEST_CARD_CVV, TEST_CARD_EXPIRY};
pub use review::{NewReview, Review, ReviewView};
