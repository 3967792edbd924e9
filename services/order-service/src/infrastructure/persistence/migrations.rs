//! 内嵌的数据库迁移

use eats_adapter_postgres::Migration;

/// 按版本号排列的全部迁移
pub fn migrations() -> Vec<Migration> {
    vec![Migration::new(
        1,
        "init",
        include_str!("../../../migrations/0001_init.sql"),
    )]
}
