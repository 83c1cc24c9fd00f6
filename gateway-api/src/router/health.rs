use crate::app::AppState;
use crate::error::ApiError;
use crate::models::HealthResponse;
use crate::router::router::API_VERSION;
use axum::{extract::State, Json};
use serde_json::{json, Map, Value};
use tracing::warn;

const SERVICE_NAME: &str = "fastapi-multi-agent";

fn service_details() -> Map<String, Value> {
    let mut details = Map::new();
    details.insert("service".to_string(), json!(SERVICE_NAME));
    details.insert("version".to_string(), json!(API_VERSION));
    details
}

/// 本服务健康检查，不依赖下游
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::new(
        "healthy",
        "FastAPI service is running",
        Some(service_details()),
    ))
}

/// 下游健康检查 - 始终返回200，status字段反映下游是否可达
pub async fn circle_health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let response = if state.client.health_check().await {
        HealthResponse::new("healthy", "dotnet is healthy", Some(service_details()))
    } else {
        HealthResponse::new("unhealthy", "dotnet is unhealthy", Some(service_details()))
    };

    Json(response)
}

/// 下游健康检查 - 不可达时返回503和结构化detail
pub async fn dotnet_health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    let dotnet_api_url = state.dotnet_api_url().to_string();

    if state.client.health_check().await {
        let mut details = Map::new();
        details.insert("dotnet_api_url".to_string(), json!(dotnet_api_url));

        Ok(Json(HealthResponse::new(
            "healthy",
            ".NET API is reachable",
            Some(details),
        )))
    } else {
        warn!(".NET API is not reachable at {}", dotnet_api_url);
        Err(ApiError::ServiceUnavailable(json!({
            "status": "unhealthy",
            "message": ".NET API is not reachable",
            "dotnet_api_url": dotnet_api_url,
        })))
    }
}
