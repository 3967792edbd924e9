//! 厨房实体与统计

use chrono::{DateTime, NaiveTime, Utc};
use eats_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// 某一天的营业时间，时间格式为 HH:MM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub day: String,
    pub open: String,
    pub close: String,
}

impl WorkingHours {
    pub fn validate(&self) -> AppResult<()> {
        if self.day.trim().is_empty() {
            return Err(AppError::validation("working hours day is required"));
        }
        let open = parse_clock(&self.open)?;
        let close = parse_clock(&self.close)?;
        if open == close {
            return Err(AppError::validation(format!(
                "working hours for {} open and close at the same time",
                self.day
            )));
        }
        Ok(())
    }
}

fn parse_clock(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| AppError::validation(format!("invalid time '{}', expected HH:MM", value)))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Kitchen {
    pub id: String,
    pub name: String,
    pub working_hours: Vec<WorkingHours>,
}

/// 统计时间窗口，两端都包含
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if start > end {
            return Err(AppError::validation("start_date must not be after end_date"));
        }
        Ok(Self { start, end })
    }
}

/// 厨房在时间窗口内的订单统计，无订单时各项为 0
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KitchenStatistics {
    pub total_orders: i64,
    pub average_order_value: f64,
    pub total_revenue: f64,
}
