use chrono::{DateTime, Utc};
use gateway_core::RelayResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 健康检查响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub details: Option<Map<String, Value>>,
}

impl HealthResponse {
    pub fn new(
        status: impl Into<String>,
        message: impl Into<String>,
        details: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            status: status.into(),
            message: message.into(),
            timestamp: Utc::now(),
            details,
        }
    }
}

/// 通用测试请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRequest {
    pub message: String,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

/// 通用测试响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResponse {
    pub success: bool,
    pub message: String,
    pub data: Option<Map<String, Value>>,
    pub timestamp: DateTime<Utc>,
}

impl TestResponse {
    pub fn success(message: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            timestamp: Utc::now(),
        }
    }
}

/// 调用下游任意端点的请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DotNetRequest {
    pub endpoint: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// 下游调用结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DotNetResponse {
    pub success: bool,
    pub status_code: u16,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl From<RelayResult> for DotNetResponse {
    fn from(result: RelayResult) -> Self {
        Self {
            success: result.success,
            status_code: result.status_code,
            data: result.data,
            error: result.error,
        }
    }
}

/// 首页信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub docs: String,
    pub health: String,
}
