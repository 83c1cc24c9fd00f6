use super::traits::DownstreamClient;
use super::types::{RelayError, RelayRequest, RelayResult};
use crate::config::model::ClientConfig;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{error, info};

/// 基于reqwest的下游.NET API客户端
#[derive(Clone)]
pub struct DotNetClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl DotNetClient {
    /// 根据配置创建客户端，超时和TLS策略在实例生命周期内固定
    pub fn new(config: &ClientConfig) -> Result<Self, RelayError> {
        let timeout = config.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(RelayError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn build_url(&self, endpoint: &str) -> String {
        build_url(&self.base_url, endpoint)
    }

    async fn send(&self, request: &RelayRequest) -> Result<RelayResult, RelayError> {
        let url = self.build_url(&request.endpoint);
        info!("Making {} request to {}", request.method, url);

        let mut builder = self.client.request(request.method.into(), &url);

        if let Some(query) = &request.query {
            builder = builder.query(&encode_query(query)?);
        }

        if let Some(body) = &request.body {
            let payload = serde_json::to_vec(body)?;
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(payload);
        }

        // 4xx/5xx 与传输错误走同一条失败路径
        let response = builder.send().await?.error_for_status()?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RelayResult::from_body(status, &body))
    }
}

#[async_trait]
impl DownstreamClient for DotNetClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn execute(&self, request: RelayRequest) -> RelayResult {
        match self.send(&request).await {
            Ok(result) => result,
            Err(e) => {
                let result = RelayResult::from(e);
                error!(
                    "HTTP error occurred ({} {}): {}",
                    request.method,
                    request.endpoint,
                    result.error.as_deref().unwrap_or_default()
                );
                result
            }
        }
    }
}

/// 拼接目标地址，endpoint 有无前导斜杠结果相同
pub fn build_url(base_url: &str, endpoint: &str) -> String {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    let path = endpoint.strip_prefix('/').unwrap_or(endpoint);
    format!("{base}/{path}")
}

/// 将查询参数展开为键值对：null编码为空值，数组展开为重复的键，嵌套对象报错
pub fn encode_query(
    query: &Map<String, Value>,
) -> Result<Vec<(String, String)>, RelayError> {
    let mut pairs = Vec::with_capacity(query.len());

    for (key, value) in query {
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push((key.clone(), encode_scalar(key, item)?));
                }
            }
            other => pairs.push((key.clone(), encode_scalar(key, other)?)),
        }
    }

    Ok(pairs)
}

fn encode_scalar(key: &str, value: &Value) -> Result<String, RelayError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Array(_) | Value::Object(_) => Err(RelayError::InvalidQuery(key.to_string())),
    }
}
