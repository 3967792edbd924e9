//! 订单状态枚举

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::ParseStatusError;

/// 订单状态，数据库中以小写文本存储
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, Display)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// 待确认
    #[default]
    #[display("pending")]
    Pending,
    /// 厨房已接单
    #[display("confirmed")]
    Confirmed,
    /// 已送达
    #[display("delivered")]
    Delivered,
    /// 已取消
    #[display("cancelled")]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStatusError {
                kind: "order",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(status.to_string(), status.as_str());
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Delivered".parse::<OrderStatus>(), Ok(OrderStatus::Delivered));
        assert_eq!(" PENDING ".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
    }

    #[test]
    fn test_unknown_status_rejected() {
        let err = "shipped".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.kind, "order");
        assert_eq!(err.to_string(), "unknown order status: shipped");
    }

    #[test]
    fn test_default_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }
}
