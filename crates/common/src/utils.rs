//! 通用工具函数

use uuid::Uuid;

/// 生成新的实体 ID（UUID v4 字符串）
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
