use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub downstream: ClientConfig,
}

/// 本服务自身的监听与运行配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// 未设置RUST_LOG时决定默认日志级别
    #[serde(default = "default_true")]
    pub debug: bool,
}

/// 下游服务客户端配置，启动后不可变
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: f64,
    /// 跳过TLS证书校验。默认开启以兼容下游的自签名开发证书
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            app_name: default_app_name(),
            debug: true,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            accept_invalid_certs: true,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// 请求总超时，非法值回退到默认30秒
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds)
            .unwrap_or_else(|_| Duration::from_secs_f64(default_timeout_seconds()))
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_app_name() -> String {
    "FastAPI Multi-Agent System".to_string()
}

fn default_base_url() -> String {
    "https://localhost:5001".to_string()
}

fn default_timeout_seconds() -> f64 {
    30.0
}

fn default_true() -> bool {
    true
}

impl Config {
    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        self.validate_server_settings()?;
        self.validate_client_config()?;
        Ok(())
    }

    fn validate_server_settings(&self) -> Result<()> {
        let server = &self.server;

        if server.host.trim().is_empty() {
            anyhow::bail!("Server host cannot be empty");
        }

        if server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if server.app_name.trim().is_empty() {
            anyhow::bail!("Server app_name cannot be empty");
        }

        Ok(())
    }

    fn validate_client_config(&self) -> Result<()> {
        let downstream = &self.downstream;

        if downstream.base_url.is_empty() {
            anyhow::bail!("Downstream base_url cannot be empty");
        }

        // URL格式验证
        if !downstream.base_url.starts_with("http://")
            && !downstream.base_url.starts_with("https://")
        {
            anyhow::bail!(
                "Downstream has invalid base_url format: '{}'. Must start with http:// or https://",
                downstream.base_url
            );
        }

        // 超时值验证
        if !downstream.timeout_seconds.is_finite() || downstream.timeout_seconds <= 0.0 {
            anyhow::bail!(
                "Downstream has invalid timeout_seconds: {} (must be a positive number)",
                downstream.timeout_seconds
            );
        }

        Ok(())
    }

    /// 服务监听地址 host:port
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
