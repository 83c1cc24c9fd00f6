use super::types::{RelayMethod, RelayRequest, RelayResult};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::warn;

/// 下游服务的健康检查路径
pub const HEALTH_ENDPOINT: &str = "/health";

/// 下游服务客户端trait
///
/// `execute` 是唯一的必需操作，任何失败都以 `RelayResult` 返回而不是错误。
#[async_trait]
pub trait DownstreamClient: Send + Sync {
    /// 获取base URL
    fn base_url(&self) -> &str;

    /// 执行单个请求
    async fn execute(&self, request: RelayRequest) -> RelayResult;

    /// 健康检查：GET /health 是否成功
    async fn health_check(&self) -> bool {
        let result = self
            .execute(RelayRequest::new(RelayMethod::Get, HEALTH_ENDPOINT))
            .await;

        if !result.success {
            warn!(
                "Health check failed for {}: {}",
                self.base_url(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }

        result.success
    }

    async fn get(&self, endpoint: &str, query: Option<Map<String, Value>>) -> RelayResult {
        self.execute(RelayRequest::new(RelayMethod::Get, endpoint).with_query(query))
            .await
    }

    async fn post(&self, endpoint: &str, body: Option<Map<String, Value>>) -> RelayResult {
        self.execute(RelayRequest::new(RelayMethod::Post, endpoint).with_body(body))
            .await
    }

    async fn put(&self, endpoint: &str, body: Option<Map<String, Value>>) -> RelayResult {
        self.execute(RelayRequest::new(RelayMethod::Put, endpoint).with_body(body))
            .await
    }

    async fn delete(&self, endpoint: &str) -> RelayResult {
        self.execute(RelayRequest::new(RelayMethod::Delete, endpoint))
            .await
    }
}
