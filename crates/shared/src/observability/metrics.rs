//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过独立的 HTTP 端口暴露，供 Prometheus 抓取。

use anyhow::Result;
use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::ObservabilityConfig;

/// Metrics 资源守卫
pub struct MetricsHandle {
    _server_handle: tokio::task::JoinHandle<()>,
}

/// 初始化 Prometheus 指标导出
///
/// 启动一个独立的 HTTP 服务器在指定端口暴露 `/metrics` 端点。
pub async fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    register_common_metrics(&config.service_name);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let server_handle = start_metrics_server(addr, handle).await?;

    Ok(MetricsHandle {
        _server_handle: server_handle,
    })
}

/// 注册通用指标描述
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!("http_requests_total", "Total number of HTTP requests");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );

    metrics::describe_counter!(
        "battlepass_experience_additions_total",
        "Total number of experience additions"
    );
    metrics::describe_counter!(
        "battlepass_experience_points_total",
        "Total experience points granted"
    );
    metrics::describe_counter!(
        "battlepass_reward_claims_total",
        "Total number of battle pass reward claim attempts"
    );
    metrics::describe_counter!(
        "battlepass_enrollments_total",
        "Total number of battle pass enrollment attempts"
    );

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

/// 启动指标 HTTP 服务器
async fn start_metrics_server(
    addr: SocketAddr,
    handle: PrometheusHandle,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = Router::new()
        .route("/metrics", get(move || std::future::ready(handle.render())))
        .route("/health", get(|| async { "OK" }));

    let listener = TcpListener::bind(addr).await?;
    info!("Metrics server listening on {}", addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(server_handle)
}

// ============================================================================
// 便捷的指标记录函数
// ============================================================================

/// 记录 HTTP 请求
#[inline]
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status_str = status.to_string();
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str.clone()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str
    )
    .record(duration_secs);
}

/// 记录经验值增加
#[inline]
pub fn record_experience_added(battle_pass_id: i64, amount: i64, level_up: bool) {
    metrics::counter!(
        "battlepass_experience_additions_total",
        "battle_pass_id" => battle_pass_id.to_string(),
        "level_up" => level_up.to_string()
    )
    .increment(1);

    metrics::counter!(
        "battlepass_experience_points_total",
        "battle_pass_id" => battle_pass_id.to_string()
    )
    .increment(amount.max(0) as u64);
}

/// 记录奖励领取
#[inline]
pub fn record_reward_claim(battle_pass_id: i64, status: &str) {
    metrics::counter!(
        "battlepass_reward_claims_total",
        "battle_pass_id" => battle_pass_id.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// 记录报名
#[inline]
pub fn record_enrollment(battle_pass_id: i64, status: &str) {
    metrics::counter!(
        "battlepass_enrollments_total",
        "battle_pass_id" => battle_pass_id.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_functions_do_not_panic() {
        // 即使没有初始化 recorder，这些函数也不应该 panic
        record_http_request("GET", "/api/admin/seasons", 200, 0.1);
        record_experience_added(1, 500, false);
        record_experience_added(1, -5, false);
        record_reward_claim(1, "success");
        record_enrollment(1, "duplicate");
    }
}
