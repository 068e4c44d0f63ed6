mod error;

use std::sync::Arc;

use anyhow::{Context, anyhow};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Value, json};

use crate::service::{WipReport, WipService};

pub use error::AppError;

pub const SERVICE_NAME: &str = "Dot WIP";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WipResponse {
    pub client_code: String,
    pub client_name: String,
    pub project_count: usize,
    pub active_count: usize,
    pub completed_count: usize,
    pub html: String,
}

impl From<WipReport> for WipResponse {
    fn from(report: WipReport) -> Self {
        Self {
            project_count: report.project_count(),
            client_code: report.client_code,
            client_name: report.client_name,
            active_count: report.active_count,
            completed_count: report.completed_count,
            html: report.html,
        }
    }
}

pub fn router(service: Arc<WipService>) -> Router {
    Router::new()
        .route("/wip", post(create_wip))
        .route("/wip/:client_code", get(preview_wip))
        .route("/health", get(health))
        .with_state(service)
}

/// `clientCode`, or `client` when `clientCode` is absent
fn client_code_from(body: &Value) -> Result<String, AppError> {
    let fields = body
        .as_object()
        .ok_or_else(|| anyhow!("request body must be a JSON object"))?;

    // Falsy values (null, false, 0, empty string/array/object) count as missing
    let code = match fields.get("clientCode").or_else(|| fields.get("client")) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        Some(Value::Array(items)) if items.is_empty() => String::new(),
        Some(Value::Object(obj)) if obj.is_empty() => String::new(),
        Some(Value::String(code)) => code.clone(),
        Some(Value::Number(code)) => code.to_string(),
        Some(other) => return Err(anyhow!("client code must be a string, got {other}").into()),
    };

    if code.is_empty() {
        return Err(AppError::MissingClientCode);
    }

    Ok(code)
}

async fn create_wip(
    State(service): State<Arc<WipService>>,
    body: Bytes,
) -> Result<Json<WipResponse>, AppError> {
    let body: Value = serde_json::from_slice(&body).context("invalid JSON body")?;
    let client_code = client_code_from(&body)?;

    let report = service.build_report(&client_code).await?;

    Ok(Json(report.into()))
}

async fn preview_wip(
    State(service): State<Arc<WipService>>,
    Path(client_code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let report = service.build_report(&client_code).await?;

    Ok(([(CONTENT_TYPE, mime::TEXT_HTML_UTF_8.to_string())], report.html))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "endpoints": ["/wip", "/wip/{clientCode}", "/health"],
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::Response;

    use super::*;
    use crate::config::test_config;
    use crate::store::testing::{FakeStore, project};

    fn service(store: FakeStore) -> State<Arc<WipService>> {
        State(Arc::new(WipService::new(&test_config(), Arc::new(store))))
    }

    async fn post_wip(store: FakeStore, body: &'static str) -> (StatusCode, Value) {
        let response = create_wip(service(store), Bytes::from_static(body.as_bytes()))
            .await
            .into_response();
        read_json(response).await
    }

    async fn read_json(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn renders_report_for_client_code() {
        let store = FakeStore::with_active(vec![
            project("ONE-1", "In Progress", false),
            project("ONE-2", "On Hold", false),
        ]);
        let (status, body) = post_wip(store, r#"{"clientCode": "ONE"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["clientCode"], "ONE");
        assert_eq!(body["clientName"], "One NZ");
        assert_eq!(body["activeCount"], 2);
        assert_eq!(body["completedCount"], 0);
        assert_eq!(body["projectCount"], 2);

        let html = body["html"].as_str().unwrap();
        assert_eq!(html.matches("WITH US").count(), 1);
        assert_eq!(html.matches("ON HOLD").count(), 1);
        assert!(!html.contains("WITH YOU"));
    }

    #[tokio::test]
    async fn accepts_client_fallback_key() {
        let store = FakeStore::with_active(vec![project("ACM-1", "In Progress", true)]);
        let (status, body) = post_wip(store, r#"{"client": "ACM"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["clientCode"], "ACM");
    }

    #[tokio::test]
    async fn missing_code_is_bad_request() {
        for payload in [
            r#"{}"#,
            r#"{"clientCode": ""}"#,
            r#"{"clientCode": null, "client": "ONE"}"#,
            r#"{"clientCode": 0}"#,
            r#"{"clientCode": false}"#,
            r#"{"client": []}"#,
        ] {
            let (status, body) = post_wip(FakeStore::default(), payload).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
            assert_eq!(body["error"], "No client code provided");
        }
    }

    #[tokio::test]
    async fn numeric_code_is_used_as_text() {
        let store = FakeStore::with_active(vec![project("42-1", "In Progress", false)]);
        let (status, body) = post_wip(store, r#"{"clientCode": 42}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["clientCode"], "42");
    }

    #[tokio::test]
    async fn no_projects_is_not_found() {
        let (status, body) =
            post_wip(FakeStore::with_active(Vec::new()), r#"{"clientCode": "ZZZ"}"#).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No active projects found");
        assert_eq!(body["clientCode"], "ZZZ");
    }

    #[tokio::test]
    async fn invalid_body_is_internal_error() {
        for payload in ["not json", "[1, 2]", r#"{"clientCode": ["ONE"]}"#] {
            let (status, body) = post_wip(FakeStore::default(), payload).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{payload}");
            assert_eq!(body["error"], "Internal server error");
            assert!(!body["details"].as_str().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn preview_serves_html() {
        let store = FakeStore::with_active(vec![project("ONE-1", "In Progress", false)]);
        let response = preview_wip(service(store), Path("ONE".to_string()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            mime::TEXT_HTML_UTF_8.as_ref()
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("WITH US"));
    }

    #[tokio::test]
    async fn preview_unknown_client_is_not_found() {
        let response = preview_wip(service(FakeStore::with_active(Vec::new())), Path("ZZZ".to_string()))
            .await
            .into_response();
        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["clientCode"], "ZZZ");
    }

    #[tokio::test]
    async fn health_reports_service() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "Dot WIP");
        assert!(body["endpoints"].as_array().unwrap().contains(&json!("/wip")));
    }

    #[test]
    fn router_builds() {
        let _ = router(service(FakeStore::default()).0);
    }
}
