//! Metrics 模块
//!
//! 提供 Prometheus metrics 导出

use eats_errors::{AppError, AppResult};
use eats_telemetry::init_metrics;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusHandle;

/// Metrics 记录器
pub struct MetricsRecorder {
    handle: PrometheusHandle,
}

impl MetricsRecorder {
    /// 安装全局 recorder，进程内只能调用一次
    pub fn new() -> AppResult<Self> {
        let handle = init_metrics().map_err(|e| {
            AppError::internal(format!("Failed to install Prometheus recorder: {}", e))
        })?;

        Ok(Self { handle })
    }

    /// 获取 Prometheus 格式的 metrics
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// 记录 gRPC 请求
pub fn record_grpc_request(service: &str, method: &str, status: &str, duration_ms: f64) {
    let labels = [
        ("service", service.to_string()),
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];

    counter!("grpc_requests_total", &labels).increment(1);
    histogram!("grpc_request_duration_ms", &labels).record(duration_ms);
}
