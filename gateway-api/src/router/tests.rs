#[cfg(test)]
mod tests {
    use crate::app::{create_app, AppState};
    use async_trait::async_trait;
    use axum::http::{header, HeaderValue, Method, StatusCode};
    use axum_test::TestServer;
    use gateway_core::{Config, DownstreamClient, RelayMethod, RelayRequest, RelayResult};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    const DOTNET_URL: &str = "http://dotnet.test:5000";

    /// 返回固定结果并记录所有请求的下游客户端
    struct ScriptedClient {
        result: RelayResult,
        requests: Mutex<Vec<RelayRequest>>,
    }

    impl ScriptedClient {
        fn new(result: RelayResult) -> Arc<Self> {
            Arc::new(Self {
                result,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn healthy() -> Arc<Self> {
            Self::new(RelayResult::ok(200, Some(json!({"text": "Healthy From .NET"}))))
        }

        fn unreachable() -> Arc<Self> {
            Self::new(RelayResult::failure(500, "error sending request"))
        }

        fn requests(&self) -> Vec<RelayRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DownstreamClient for ScriptedClient {
        fn base_url(&self) -> &str {
            DOTNET_URL
        }

        async fn execute(&self, request: RelayRequest) -> RelayResult {
            self.requests.lock().unwrap().push(request);
            self.result.clone()
        }
    }

    struct PanickingClient;

    #[async_trait]
    impl DownstreamClient for PanickingClient {
        fn base_url(&self) -> &str {
            DOTNET_URL
        }

        async fn execute(&self, _request: RelayRequest) -> RelayResult {
            panic!("downstream exploded")
        }
    }

    fn create_test_server(client: Arc<dyn DownstreamClient>) -> TestServer {
        let state = AppState::with_client(Config::default(), client);
        TestServer::new(create_app(state)).unwrap()
    }

    #[tokio::test]
    async fn test_index_endpoint() {
        let server = create_test_server(ScriptedClient::healthy());

        let response = server.get("/").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["message"], "FastAPI Multi-Agent System");
        assert_eq!(body["version"], "1.0.0");
        assert_eq!(body["docs"], "/docs");
        assert_eq!(body["health"], "/health");
    }

    #[tokio::test]
    async fn test_docs_endpoint_lists_routes() {
        let server = create_test_server(ScriptedClient::healthy());

        let body: Value = server.get("/docs").await.json();
        let paths: Vec<&str> = body["endpoints"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["path"].as_str().unwrap())
            .collect();

        assert!(paths.contains(&"/health/dotnet"));
        assert!(paths.contains(&"/api/test/call-dotnet-custom"));
    }

    #[tokio::test]
    async fn test_self_health_has_no_downstream_dependency() {
        let client = ScriptedClient::unreachable();
        let server = create_test_server(client.clone());

        let response = server.get("/health").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["message"], "FastAPI service is running");
        assert_eq!(body["details"]["service"], "fastapi-multi-agent");
        assert_eq!(body["details"]["version"], "1.0.0");
        assert!(body["timestamp"].is_string());
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_circle_health_healthy() {
        let client = ScriptedClient::healthy();
        let server = create_test_server(client.clone());

        let response = server.get("/health/circle").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["message"], "dotnet is healthy");

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, RelayMethod::Get);
        assert_eq!(requests[0].endpoint, "/health");
    }

    #[tokio::test]
    async fn test_circle_health_unhealthy_is_still_ok() {
        let server = create_test_server(ScriptedClient::unreachable());

        let response = server.get("/health/circle").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["message"], "dotnet is unhealthy");
    }

    #[tokio::test]
    async fn test_dotnet_health_healthy() {
        let server = create_test_server(ScriptedClient::healthy());

        let response = server.get("/health/dotnet").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["message"], ".NET API is reachable");
        assert_eq!(body["details"]["dotnet_api_url"], DOTNET_URL);
    }

    #[tokio::test]
    async fn test_dotnet_health_unhealthy_returns_503() {
        let server = create_test_server(ScriptedClient::new(RelayResult::failure(
            503,
            "HTTP status server error (503 Service Unavailable)",
        )));

        let response = server.get("/health/dotnet").await;
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let body: Value = response.json();
        assert_eq!(body["detail"]["status"], "unhealthy");
        assert_eq!(body["detail"]["message"], ".NET API is not reachable");
        assert_eq!(body["detail"]["dotnet_api_url"], DOTNET_URL);
    }

    #[tokio::test]
    async fn test_echo() {
        let client = ScriptedClient::healthy();
        let server = create_test_server(client.clone());

        let response = server
            .post("/api/test/echo")
            .json(&json!({"message": "hi", "data": {"k": 1}}))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Echo: hi");
        assert_eq!(body["data"]["echo"], "hi");
        assert_eq!(
            body["data"]["received"],
            json!({"message": "hi", "data": {"k": 1}})
        );
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_echo_without_data() {
        let server = create_test_server(ScriptedClient::healthy());

        let body: Value = server
            .post("/api/test/echo")
            .json(&json!({"message": ""}))
            .await
            .json();
        assert_eq!(body["message"], "Echo: ");
        assert_eq!(body["data"]["received"]["data"], Value::Null);
    }

    #[tokio::test]
    async fn test_echo_rejects_invalid_body_as_json() {
        let server = create_test_server(ScriptedClient::healthy());

        let missing_field = server
            .post("/api/test/echo")
            .json(&json!({"data": {}}))
            .await;
        assert_eq!(
            missing_field.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        let body: Value = missing_field.json();
        assert!(body["detail"].as_str().unwrap().contains("message"));

        let wrong_content_type = server.post("/api/test/echo").text("hi").await;
        assert_eq!(
            wrong_content_type.status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        let body: Value = wrong_content_type.json();
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_call_dotnet_relays_health() {
        let client = ScriptedClient::healthy();
        let server = create_test_server(client.clone());

        let response = server.get("/api/test/call-dotnet").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(
            body,
            json!({
                "success": true,
                "status_code": 200,
                "data": {"text": "Healthy From .NET"},
                "error": null
            })
        );
        assert_eq!(client.requests()[0].endpoint, "/health");
    }

    #[tokio::test]
    async fn test_call_dotnet_failure_is_200_with_success_false() {
        let server = create_test_server(ScriptedClient::unreachable());

        let response = server.get("/api/test/call-dotnet").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["status_code"], 500);
        assert_eq!(body["data"], Value::Null);
        assert_eq!(body["error"], "error sending request");
    }

    #[tokio::test]
    async fn test_call_dotnet_custom_unsupported_method() {
        let client = ScriptedClient::healthy();
        let server = create_test_server(client.clone());

        let response = server
            .post("/api/test/call-dotnet-custom")
            .json(&json!({"endpoint": "/api/plans", "method": "PATCH"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["detail"], "Unsupported HTTP method: PATCH");
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_call_dotnet_custom_post_forwards_body() {
        let client = ScriptedClient::new(RelayResult::ok(201, Some(json!({"id": 9}))));
        let server = create_test_server(client.clone());

        let response = server
            .post("/api/test/call-dotnet-custom")
            .json(&json!({
                "endpoint": "api/plans",
                "method": "post",
                "data": {"name": "Tokyo"}
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["status_code"], 201);
        assert_eq!(body["data"], json!({"id": 9}));

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, RelayMethod::Post);
        assert_eq!(requests[0].endpoint, "api/plans");
        assert_eq!(
            requests[0].body.as_ref().unwrap().get("name"),
            Some(&json!("Tokyo"))
        );
    }

    #[tokio::test]
    async fn test_call_dotnet_custom_get_and_delete_drop_body() {
        let client = ScriptedClient::healthy();
        let server = create_test_server(client.clone());

        // method 缺省为 GET
        server
            .post("/api/test/call-dotnet-custom")
            .json(&json!({"endpoint": "/api/plans", "data": {"ignored": true}}))
            .await;
        server
            .post("/api/test/call-dotnet-custom")
            .json(&json!({"endpoint": "/api/plans/1", "method": "Delete", "data": {"x": 1}}))
            .await;

        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, RelayMethod::Get);
        assert!(requests[0].body.is_none());
        assert_eq!(requests[1].method, RelayMethod::Delete);
        assert!(requests[1].body.is_none());
    }

    #[tokio::test]
    async fn test_call_dotnet_custom_put() {
        let client = ScriptedClient::healthy();
        let server = create_test_server(client.clone());

        server
            .post("/api/test/call-dotnet-custom")
            .json(&json!({"endpoint": "/api/plans/1", "method": "PUT", "data": {"name": "Kyoto"}}))
            .await;

        let requests = client.requests();
        assert_eq!(requests[0].method, RelayMethod::Put);
        assert!(requests[0].body.is_some());
    }

    #[tokio::test]
    async fn test_process_without_flag_skips_downstream() {
        let client = ScriptedClient::healthy();
        let server = create_test_server(client.clone());

        let response = server
            .post("/api/test/process")
            .json(&json!({"message": "plan trip", "data": {"call_dotnet": "yes"}}))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Data processed successfully");
        assert_eq!(body["data"]["original_message"], "plan trip");
        assert_eq!(
            body["data"]["processing_result"],
            "Data processed successfully"
        );
        assert!(body["data"]["processed_at"].is_string());
        assert!(body["data"].get("dotnet_called").is_none());
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_process_with_downstream_success() {
        let client = ScriptedClient::healthy();
        let server = create_test_server(client.clone());

        let body: Value = server
            .post("/api/test/process")
            .json(&json!({"message": "plan trip", "data": {"call_dotnet": true}}))
            .await
            .json();

        assert_eq!(body["data"]["dotnet_called"], true);
        assert_eq!(body["data"]["dotnet_response"]["success"], true);
        assert_eq!(body["data"]["dotnet_response"]["status_code"], 200);
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_process_with_downstream_failure_degrades() {
        let server = create_test_server(ScriptedClient::unreachable());

        let response = server
            .post("/api/test/process")
            .json(&json!({"message": "plan trip", "data": {"call_dotnet": true}}))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["dotnet_called"], false);
        assert_eq!(body["data"]["dotnet_error"], "error sending request");
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_json_500() {
        let server = create_test_server(Arc::new(PanickingClient));

        let response = server.get("/api/test/call-dotnet").await;
        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = response.json();
        assert_eq!(body["detail"], "Internal server error: downstream exploded");
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_frontend_origin() {
        let server = create_test_server(ScriptedClient::healthy());

        let response = server
            .method(Method::OPTIONS, "/api/test/echo")
            .add_header(
                header::ORIGIN,
                HeaderValue::from_static("http://localhost:3000"),
            )
            .add_header(
                header::ACCESS_CONTROL_REQUEST_METHOD,
                HeaderValue::from_static("POST"),
            )
            .await;

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
    }
}
