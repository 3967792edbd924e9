//! 基础设施资源管理

use eats_adapter_postgres::{PostgresConfig, create_pool};
use eats_config::AppConfig;
use eats_errors::AppResult;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

/// 基础设施资源容器
///
/// `PgPool` 内部是 `Arc`，克隆只增加引用计数
#[derive(Clone)]
pub struct Infrastructure {
    config: AppConfig,
    postgres_pool: PgPool,
}

impl Infrastructure {
    /// 从配置创建基础设施资源
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let db = &config.database;
        let pg_config = PostgresConfig::from_components(
            db.host.clone(),
            db.port,
            db.user.clone(),
            db.password.expose_secret().clone(),
            db.name.clone(),
        )
        .with_max_connections(db.max_connections);

        let postgres_pool = create_pool(&pg_config).await?;
        info!(
            host = %db.host,
            database = %db.name,
            max_connections = db.max_connections,
            "PostgreSQL connection pool created"
        );

        Ok(Self {
            config,
            postgres_pool,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }
}
