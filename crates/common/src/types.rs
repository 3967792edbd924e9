//! 通用类型定义

use serde::{Deserialize, Serialize};

/// 分页参数
///
/// `page` 从 1 开始计数；`page <= 0` 时偏移量为 0。
/// `limit` 为 0 表示不限制条数，负数按 0 处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i32,
    pub limit: i32,
}

impl Pagination {
    pub fn new(page: i32, limit: i32) -> Self {
        Self {
            page,
            limit: limit.max(0),
        }
    }

    /// 偏移量：`page * limit - limit`（page > 0），否则为 0
    pub fn offset(&self) -> i64 {
        if self.page > 0 {
            let page = i64::from(self.page);
            let limit = i64::from(self.limit.max(0));
            page * limit - limit
        } else {
            0
        }
    }

    /// SQL `LIMIT` 绑定值，`None` 绑定为 NULL（不限制）
    ///
    /// `limit = 0` 有意返回全部行，而不是字面量 `LIMIT 0` 的空结果。
    pub fn limit(&self) -> Option<i64> {
        match self.limit {
            l if l > 0 => Some(i64::from(l)),
            _ => None,
        }
    }
}
