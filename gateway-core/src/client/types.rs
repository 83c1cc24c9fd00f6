use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// 定义中继错误类型
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("Unsupported query value for '{0}': nested objects cannot be encoded")]
    InvalidQuery(String),
    #[error("JSON serialization failed")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}

impl RelayError {
    /// 失败响应的状态码，未收到响应时为500
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::Transport(e) => e.status().map(|s| s.as_u16()).unwrap_or(500),
            _ => 500,
        }
    }

    /// 包含完整错误链的可读信息
    pub fn message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }
        message
    }
}

/// 支持的HTTP方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RelayMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayMethod::Get => "GET",
            RelayMethod::Post => "POST",
            RelayMethod::Put => "PUT",
            RelayMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for RelayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelayMethod {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(RelayMethod::Get),
            "POST" => Ok(RelayMethod::Post),
            "PUT" => Ok(RelayMethod::Put),
            "DELETE" => Ok(RelayMethod::Delete),
            other => Err(RelayError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl From<RelayMethod> for reqwest::Method {
    fn from(method: RelayMethod) -> Self {
        match method {
            RelayMethod::Get => reqwest::Method::GET,
            RelayMethod::Post => reqwest::Method::POST,
            RelayMethod::Put => reqwest::Method::PUT,
            RelayMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// 发往下游服务的单个请求
#[derive(Debug, Clone, PartialEq)]
pub struct RelayRequest {
    pub method: RelayMethod,
    pub endpoint: String,
    pub body: Option<Map<String, Value>>,
    pub query: Option<Map<String, Value>>,
}

impl RelayRequest {
    pub fn new(method: RelayMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            query: None,
        }
    }

    pub fn with_body(mut self, body: Option<Map<String, Value>>) -> Self {
        self.body = body;
        self
    }

    pub fn with_query(mut self, query: Option<Map<String, Value>>) -> Self {
        self.query = query;
        self
    }
}

/// 归一化的中继结果：成功时只有data，失败时只有error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayResult {
    pub success: bool,
    pub status_code: u16,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl RelayResult {
    pub fn ok(status_code: u16, data: Option<Value>) -> Self {
        Self {
            success: true,
            status_code,
            data,
            error: None,
        }
    }

    pub fn failure(status_code: u16, error: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code,
            data: None,
            error: Some(error.into()),
        }
    }

    /// 响应体能解析为JSON时直接使用，否则包装为 {"text": ...}
    pub fn from_body(status_code: u16, body: &str) -> Self {
        let data = serde_json::from_str::<Value>(body).unwrap_or_else(|_| json!({ "text": body }));
        Self::ok(status_code, Some(data))
    }
}

impl From<RelayError> for RelayResult {
    fn from(error: RelayError) -> Self {
        Self::failure(error.status_code(), error.message())
    }
}
