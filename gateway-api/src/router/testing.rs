//! 用于验证本服务与下游.NET API互通的测试端点

use crate::app::AppState;
use crate::error::ApiError;
use crate::models::{DotNetRequest, DotNetResponse, TestRequest, TestResponse};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::Utc;
use gateway_core::client::HEALTH_ENDPOINT;
use gateway_core::RelayMethod;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

/// 原样返回请求内容
pub async fn echo(
    payload: Result<Json<TestRequest>, JsonRejection>,
) -> Result<Json<TestResponse>, ApiError> {
    let Json(request) = payload?;
    info!("Echo endpoint called with message: {}", request.message);

    let mut data = Map::new();
    data.insert(
        "received".to_string(),
        json!({
            "message": request.message,
            "data": request.data,
        }),
    );
    data.insert("echo".to_string(), json!(request.message));

    Ok(Json(TestResponse::success(
        format!("Echo: {}", request.message),
        data,
    )))
}

/// 调用下游的 /health
pub async fn call_dotnet(State(state): State<AppState>) -> Json<DotNetResponse> {
    info!("Testing call to .NET API");

    let result = state.client.get(HEALTH_ENDPOINT, None).await;
    Json(result.into())
}

/// 调用下游任意端点，仅支持 GET/POST/PUT/DELETE
pub async fn call_dotnet_custom(
    State(state): State<AppState>,
    payload: Result<Json<DotNetRequest>, JsonRejection>,
) -> Result<Json<DotNetResponse>, ApiError> {
    let Json(request) = payload?;
    info!(
        "Calling .NET endpoint: {} {}",
        request.method, request.endpoint
    );

    let method: RelayMethod = request.method.parse()?;

    let client = &state.client;
    let result = match method {
        RelayMethod::Get => client.get(&request.endpoint, None).await,
        RelayMethod::Post => client.post(&request.endpoint, request.data).await,
        RelayMethod::Put => client.put(&request.endpoint, request.data).await,
        RelayMethod::Delete => client.delete(&request.endpoint).await,
    };

    Ok(Json(result.into()))
}

/// 本地处理数据，data.call_dotnet 为 true 时附带调用下游
pub async fn process_with_dotnet(
    State(state): State<AppState>,
    payload: Result<Json<TestRequest>, JsonRejection>,
) -> Result<Json<TestResponse>, ApiError> {
    let Json(request) = payload?;
    info!("Processing request: {}", request.message);

    let mut processed = Map::new();
    processed.insert("original_message".to_string(), json!(request.message));
    processed.insert("processed_at".to_string(), json!(Utc::now().to_rfc3339()));
    processed.insert(
        "processing_result".to_string(),
        json!("Data processed successfully"),
    );

    let call_dotnet = request
        .data
        .as_ref()
        .and_then(|data| data.get("call_dotnet"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if call_dotnet {
        let result = state.client.get(HEALTH_ENDPOINT, None).await;

        if result.success {
            let response = serde_json::to_value(&result)
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            processed.insert("dotnet_called".to_string(), json!(true));
            processed.insert("dotnet_response".to_string(), response);
        } else {
            // 下游失败不影响处理结果
            let error = result.error.unwrap_or_default();
            warn!("Failed to call .NET API during processing: {}", error);
            processed.insert("dotnet_called".to_string(), json!(false));
            processed.insert("dotnet_error".to_string(), json!(error));
        }
    }

    Ok(Json(TestResponse::success(
        "Data processed successfully",
        processed,
    )))
}
