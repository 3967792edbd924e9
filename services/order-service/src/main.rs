use std::sync::Arc;

use eats_adapter_postgres::MigrationManager;
use eats_bootstrap::{Infrastructure, build_reflection, run_server};
use eats_errors::AppError;
use order_service::FILE_DESCRIPTOR_SET;
use order_service::api::OrderServiceImpl;
use order_service::domain::repositories::OrderRepository;
use order_service::domain::services::PaymentGateway;
use order_service::infrastructure::payment::StubPaymentGateway;
use order_service::infrastructure::persistence::{PostgresOrderRepository, migrations};
use order_service::proto::order_service_server::OrderServiceServer;
use tonic::transport::Server;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_server("config", |infra: Infrastructure, mut server: Server| async move {
        let pool = infra.postgres_pool();

        let result = MigrationManager::new(pool.clone())
            .migrate(&migrations())
            .await?
            .into_result()?;
        info!(
            applied = result.applied_count(),
            skipped = result.skipped.len(),
            "Database migrations complete"
        );

        let gateway: Arc<dyn PaymentGateway> = Arc::new(StubPaymentGateway);
        let repository: Arc<dyn OrderRepository> =
            Arc::new(PostgresOrderRepository::new(pool, gateway));
        let service = OrderServiceImpl::new(repository);

        let reflection = build_reflection(&[FILE_DESCRIPTOR_SET])
            .map_err(|e| AppError::internal(format!("Failed to build reflection service: {}", e)))?;

        info!(app_env = %infra.config().app_env, "Order service initialized");

        Ok(server
            .add_service(OrderServiceServer::new(service))
            .add_service(reflection))
    })
    .await
}
