use crate::router::router::{create_app_router, ENDPOINTS};
use gateway_core::config::loader::{get_config_path, load_config, parse_bool};
use gateway_core::{Config, DotNetClient, DownstreamClient};

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

/// 应用状态，启动时创建，之后只读
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Arc<dyn DownstreamClient>,
}

impl AppState {
    /// 根据配置创建应用状态和下游客户端
    pub fn new(config: Config) -> Result<Self> {
        let client = DotNetClient::new(&config.downstream)?;

        if config.downstream.accept_invalid_certs {
            warn!(
                "TLS certificate verification is disabled for downstream {}",
                config.downstream.base_url
            );
        }

        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// 使用指定的下游客户端创建应用状态
    pub fn with_client(config: Config, client: Arc<dyn DownstreamClient>) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// 下游服务地址
    pub fn dotnet_api_url(&self) -> &str {
        self.client.base_url()
    }
}

/// 创建应用路由
pub fn create_app(state: AppState) -> Router {
    create_app_router(&state.config).with_state(state)
}

type LogFilterHandle = reload::Handle<EnvFilter, Registry>;

fn log_directive(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// 加载配置前的默认日志级别，由DEBUG环境变量决定（缺省为debug）
fn default_log_directive(debug: Option<&str>) -> &'static str {
    let debug = debug
        .and_then(|value| parse_bool("DEBUG", value).ok())
        .unwrap_or(true);
    log_directive(debug)
}

/// 初始化日志，需在加载配置之前完成
///
/// 设置了RUST_LOG时返回None，此时日志级别不再随配置调整。
fn init_tracing() -> Option<LogFilterHandle> {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => {
            let debug = std::env::var("DEBUG").ok();
            (EnvFilter::new(default_log_directive(debug.as_deref())), false)
        }
    };

    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_file(true).with_line_number(true))
        .init();

    (!from_env).then_some(handle)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// 启动应用服务器
pub async fn start_server() -> Result<()> {
    let log_handle = init_tracing();

    info!("Configuration file: {}", get_config_path());
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    // 配置文件中的debug开关覆盖启动时的默认级别
    if let Some(handle) = &log_handle {
        let directive = log_directive(config.server.debug);
        if let Err(e) = handle.reload(EnvFilter::new(directive)) {
            warn!("Failed to apply log level {}: {}", directive, e);
        }
    }

    let app_name = config.server.app_name.clone();
    info!("Starting {}", app_name);
    info!(".NET API URL: {}", config.downstream.base_url);

    let bind_addr = config.bind_address();

    let app_state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            return Err(e);
        }
    };

    let app = create_app(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API running on http://{}", addr);
    info!("Available endpoints:");
    for endpoint in ENDPOINTS {
        info!(
            "  {:<5} {:<28} - {}",
            endpoint.method, endpoint.path, endpoint.description
        );
    }

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Shutting down {}", app_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_directive_follows_debug_flag() {
        assert_eq!(default_log_directive(None), "debug");
        assert_eq!(default_log_directive(Some("true")), "debug");
        assert_eq!(default_log_directive(Some("1")), "debug");
        assert_eq!(default_log_directive(Some("false")), "info");
        assert_eq!(default_log_directive(Some("OFF")), "info");
        // 无法解析时保持默认
        assert_eq!(default_log_directive(Some("maybe")), "debug");
    }

    #[test]
    fn test_log_directive() {
        assert_eq!(log_directive(true), "debug");
        assert_eq!(log_directive(false), "info");
    }
}
