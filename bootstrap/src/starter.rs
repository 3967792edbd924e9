//! 服务启动器
//!
//! 提供统一的服务启动模式

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use eats_config::{AppConfig, load_dotenv};
use eats_errors::{AppError, AppResult};
use tonic::transport::Server;
use tonic::transport::server::Router;
use tracing::{error, info};

use crate::health::{HealthChecker, HealthServer};
use crate::infrastructure::Infrastructure;
use crate::metrics::MetricsRecorder;
use crate::runtime::{init_runtime, shutdown_signal};

/// 健康检查端口相对 gRPC 端口的偏移
pub const HEALTH_PORT_OFFSET: u16 = 1000;

/// 运行 gRPC 服务
///
/// 负责：
/// 1. 加载 `.env` 与配置
/// 2. 初始化运行时（日志）与 Prometheus recorder
/// 3. 创建 PostgreSQL 连接池
/// 4. 启动健康检查 HTTP 服务器（gRPC 端口 + 1000）
/// 5. 调用闭包注册 gRPC 服务
/// 6. 启动服务器并处理 graceful shutdown
///
/// # 示例
///
/// ```ignore
/// run_server("config", |infra, mut server| async move {
///     let service = MyServiceImpl::new(infra.postgres_pool());
///     Ok(server.add_service(MyServiceServer::new(service)))
/// })
/// .await
/// ```
pub async fn run_server<F, Fut>(
    config_dir: &str,
    service_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure, Server) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    let dotenv = load_dotenv();
    let config = AppConfig::load(config_dir)?;

    init_runtime(&config);

    match dotenv {
        Some(path) => info!(path = %path.display(), "Loaded .env file"),
        None => info!("No .env file found"),
    }

    info!("Starting {} service", config.app_name);

    let metrics = Arc::new(MetricsRecorder::new()?);

    let infra = Infrastructure::from_config(config.clone()).await?;

    let health_port = config
        .server
        .port
        .checked_add(HEALTH_PORT_OFFSET)
        .ok_or_else(|| {
            AppError::internal(format!(
                "gRPC port {} leaves no room for the health port",
                config.server.port
            ))
        })?;
    let checker = Arc::new(HealthChecker::new(infra.postgres_pool()));
    let health_server = HealthServer::new(checker, metrics, health_port);

    let health_handle = tokio::spawn(async move {
        if let Err(e) = health_server.serve().await {
            error!("Health server error: {}", e);
        }
    });

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let router = service_builder(infra, Server::builder()).await?;

    info!(%addr, "gRPC server starting");

    router.serve_with_shutdown(addr, shutdown_signal()).await?;

    health_handle.abort();

    info!("Service stopped");

    Ok(())
}
