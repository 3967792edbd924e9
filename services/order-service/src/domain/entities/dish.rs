//! 菜品实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 营养信息，以 JSONB 存储
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionInfo {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbohydrates: f64,
    #[serde(default)]
    pub fat: f64,
}

/// 菜品
#[derive(Debug, Clone, PartialEq)]
pub struct Dish {
    pub id: String,
    pub kitchen_id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub allergens: Vec<String>,
    pub nutrition_info: NutritionInfo,
    pub dietary_info: Vec<String>,
    pub ingredients: Vec<String>,
    pub available: bool,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 软删除时间
    pub deleted_at: Option<DateTime<Utc>>,
}

/// 新建菜品所需字段，id 和时间戳由存储层生成
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewDish {
    pub kitchen_id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub allergens: Vec<String>,
    pub nutrition_info: NutritionInfo,
    pub dietary_info: Vec<String>,
    pub ingredients: Vec<String>,
    pub available: bool,
}

/// 菜品可修改字段
#[derive(Debug, Clone, PartialEq)]
pub struct DishUpdate {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub available: bool,
}

/// 营养与过敏原信息更新
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionUpdate {
    pub dish_id: String,
    pub allergens: Vec<String>,
    pub nutrition_info: NutritionInfo,
    pub dietary_info: Vec<String>,
}
