use crate::app::AppState;
use crate::error::handle_panic;
use crate::models::RootResponse;
use axum::{
    extract::State,
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use gateway_core::Config;
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::TraceLayer,
};

use super::{
    health::{circle_health_check, dotnet_health_check, health_check},
    testing::{call_dotnet, call_dotnet_custom, echo, process_with_dotnet},
};

/// 对外暴露的API版本
pub const API_VERSION: &str = "1.0.0";

/// 允许跨域访问的固定来源：前端和下游.NET API
const CORS_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "http://localhost:5001",
    "https://localhost:5001",
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

pub const ENDPOINTS: &[EndpointInfo] = &[
    EndpointInfo {
        method: "GET",
        path: "/",
        description: "API information",
    },
    EndpointInfo {
        method: "GET",
        path: "/docs",
        description: "Endpoint catalogue",
    },
    EndpointInfo {
        method: "GET",
        path: "/health",
        description: "Health check",
    },
    EndpointInfo {
        method: "GET",
        path: "/health/circle",
        description: "Downstream health (always 200)",
    },
    EndpointInfo {
        method: "GET",
        path: "/health/dotnet",
        description: "Downstream health (503 when unreachable)",
    },
    EndpointInfo {
        method: "POST",
        path: "/api/test/echo",
        description: "Echo the request",
    },
    EndpointInfo {
        method: "GET",
        path: "/api/test/call-dotnet",
        description: "Call downstream /health",
    },
    EndpointInfo {
        method: "POST",
        path: "/api/test/call-dotnet-custom",
        description: "Call any downstream endpoint",
    },
    EndpointInfo {
        method: "POST",
        path: "/api/test/process",
        description: "Process data, optionally calling downstream",
    },
];

/// 创建应用路由
pub fn create_app_router(config: &Config) -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/docs", get(docs))
        .route("/health", get(health_check))
        .route("/health/circle", get(circle_health_check))
        .route("/health/dotnet", get(dotnet_health_check))
        .nest("/api/test", create_test_routes())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

/// 创建测试 API 路由
fn create_test_routes() -> Router<AppState> {
    Router::new()
        .route("/echo", post(echo))
        .route("/call-dotnet", get(call_dotnet))
        .route("/call-dotnet-custom", post(call_dotnet_custom))
        .route("/process", post(process_with_dotnet))
}

fn cors_layer(config: &Config) -> CorsLayer {
    let downstream_origin = config.downstream.base_url.trim_end_matches('/');

    let mut allowed: Vec<&str> = CORS_ORIGINS.to_vec();
    if !allowed.contains(&downstream_origin) {
        allowed.push(downstream_origin);
    }

    let origins: Vec<HeaderValue> = allowed
        .into_iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// 首页处理器
pub async fn index(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: state.config.server.app_name.clone(),
        version: API_VERSION.to_string(),
        docs: "/docs".to_string(),
        health: "/health".to_string(),
    })
}

/// 端点目录
pub async fn docs() -> Json<Value> {
    Json(json!({
        "version": API_VERSION,
        "endpoints": ENDPOINTS,
    }))
}
