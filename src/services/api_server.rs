// src/services/api_server.rs
//! API Server for the certificate verification demo
//!
//! This module is the presentation adapter: it exposes the verification
//! session and the read-only fixture registries as JSON over HTTP so a
//! browser front end can render them.
//!
//! The API is built using Axum and includes endpoints for:
//! - Reading the current session snapshot
//! - Uploading a certificate, proceeding, advancing and resetting
//! - Dashboard statistics, institutions, fraud alerts, certificates and charts

use crate::errors::{RejectionReason, WorkflowError};
use crate::models::upload::UploadedFile;
use crate::scheduler::driver::SessionDriver;
use crate::services::workflow_controller::SessionSnapshot;
use crate::storage::fixtures;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

// API request and response structures

/// Request payload for uploading a certificate
#[derive(Serialize, Deserialize)]
struct UploadRequest {
    name: String,
    mime_type: String,
    size_bytes: u64,
}

/// Error body returned by every failing endpoint
#[derive(Serialize, Deserialize, Debug)]
struct ErrorResponse {
    /// Error kind, e.g. "TooLarge"
    error: String,
    /// Human readable explanation
    message: String,
}

#[derive(Serialize, Deserialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn error_response(err: WorkflowError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        WorkflowError::Rejected(RejectionReason::UnsupportedType { .. }) => {
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        }
        WorkflowError::Rejected(RejectionReason::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
        WorkflowError::InvalidTransition { .. } => StatusCode::CONFLICT,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.kind().to_string(),
            message: err.to_string(),
        }),
    )
}

/// API server state: the shared session driver
#[derive(Clone)]
pub struct ApiServer {
    /// Owns the verification session and its timers
    driver: Arc<SessionDriver>,
}

impl ApiServer {
    /// Creates a new instance of the API server
    ///
    /// # Arguments
    /// * `driver` - Session driver whose timer loop is already running
    pub fn new(driver: SessionDriver) -> Self {
        ApiServer {
            driver: Arc::new(driver),
        }
    }

    /// Builds the router with all API routes
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(Self::health_handler))
            .route("/session", get(Self::session_handler))
            .route("/session/upload", post(Self::upload_handler))
            .route("/session/proceed", post(Self::proceed_handler))
            .route("/session/advance", post(Self::advance_handler))
            .route("/session/reset", post(Self::reset_handler))
            .route("/statistics", get(Self::statistics_handler))
            .route("/institutions", get(Self::institutions_handler))
            .route("/fraud-alerts", get(Self::fraud_alerts_handler))
            .route("/certificates", get(Self::certificates_handler))
            .route("/sample-certificates", get(Self::sample_certificates_handler))
            .route("/charts", get(Self::charts_handler))
            .layer(CorsLayer::permissive())
            .with_state(Arc::new(self.clone()))
    }

    /// Starts the API server and begins listening for requests
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to (e.g., "127.0.0.1:3000")
    ///
    /// # Errors
    /// Returns `Err` if the address cannot be bound or the server fails.
    pub async fn run(&self, addr: SocketAddr) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("API server listening on http://{}", listener.local_addr()?);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }

    // =====================
    // Session Handlers
    // =====================

    /// Liveness check
    ///
    /// # Endpoint
    /// GET /health
    async fn health_handler() -> impl IntoResponse {
        Json(HealthResponse {
            status: "ok".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Returns the current session snapshot
    ///
    /// # Endpoint
    /// GET /session
    async fn session_handler(State(state): State<Arc<ApiServer>>) -> Json<SessionSnapshot> {
        Json(state.driver.snapshot().await)
    }

    /// Validates and stages a certificate file
    ///
    /// # Endpoint
    /// POST /session/upload
    ///
    /// # Request Body
    /// JSON payload with file name, declared MIME type and size in bytes
    ///
    /// # Responses
    /// - 200 OK: Returns the session snapshot with the staged file
    /// - 409 Conflict: A verification is already running
    /// - 413 Payload Too Large: File exceeds the size limit
    /// - 415 Unsupported Media Type: Not a PDF, JPG or PNG
    async fn upload_handler(
        State(state): State<Arc<ApiServer>>,
        Json(payload): Json<UploadRequest>,
    ) -> ApiResult<SessionSnapshot> {
        let file = UploadedFile::new(payload.name, payload.mime_type, payload.size_bytes);
        state
            .driver
            .with_controller(|controller| -> Result<SessionSnapshot, WorkflowError> {
                controller.submit(&file)?;
                Ok(controller.snapshot())
            })
            .await
            .map(Json)
            .map_err(error_response)
    }

    /// Starts scanning the staged file
    ///
    /// # Endpoint
    /// POST /session/proceed
    ///
    /// # Responses
    /// - 200 OK: Returns the session snapshot, now at step 2
    /// - 409 Conflict: No staged file, or not at the upload step
    async fn proceed_handler(State(state): State<Arc<ApiServer>>) -> ApiResult<SessionSnapshot> {
        state
            .driver
            .with_controller(|controller| -> Result<SessionSnapshot, WorkflowError> {
                controller.proceed()?;
                Ok(controller.snapshot())
            })
            .await
            .map(Json)
            .map_err(error_response)
    }

    /// Moves the session to the next step manually
    ///
    /// # Endpoint
    /// POST /session/advance
    ///
    /// # Responses
    /// - 200 OK: Returns the session snapshot
    /// - 409 Conflict: The current step is not finished, or the session is
    ///   already at the result
    async fn advance_handler(State(state): State<Arc<ApiServer>>) -> ApiResult<SessionSnapshot> {
        state
            .driver
            .with_controller(|controller| -> Result<SessionSnapshot, WorkflowError> {
                controller.advance()?;
                Ok(controller.snapshot())
            })
            .await
            .map(Json)
            .map_err(error_response)
    }

    /// Abandons the session and returns to the upload step
    ///
    /// # Endpoint
    /// POST /session/reset
    async fn reset_handler(State(state): State<Arc<ApiServer>>) -> Json<SessionSnapshot> {
        let snapshot = state
            .driver
            .with_controller(|controller| {
                controller.reset();
                controller.snapshot()
            })
            .await;
        Json(snapshot)
    }

    // =====================
    // Dashboard Fixtures
    // =====================

    /// GET /statistics
    async fn statistics_handler() -> impl IntoResponse {
        Json(fixtures::statistics())
    }

    /// GET /institutions
    async fn institutions_handler() -> impl IntoResponse {
        Json(fixtures::institutions())
    }

    /// GET /fraud-alerts
    async fn fraud_alerts_handler() -> impl IntoResponse {
        Json(fixtures::fraud_alerts())
    }

    /// GET /certificates
    async fn certificates_handler() -> impl IntoResponse {
        Json(fixtures::issued_certificates())
    }

    /// GET /sample-certificates
    async fn sample_certificates_handler() -> impl IntoResponse {
        Json(fixtures::sample_certificates())
    }

    /// Chart datasets for the dashboard, institution and admin panels
    ///
    /// # Endpoint
    /// GET /charts
    async fn charts_handler() -> impl IntoResponse {
        Json(fixtures::charts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timings;
    use crate::services::upload_gate::UploadGate;
    use crate::services::workflow_controller::WorkflowController;
    use crate::utils::random::SystemRandom;
    use axum::body::Body;
    use axum::http::{header, Request, Response};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_router() -> Router {
        let controller = WorkflowController::new(
            UploadGate::default(),
            Timings::default(),
            Box::new(SystemRandom::seeded(8)),
        );
        ApiServer::new(SessionDriver::new(controller)).router()
    }

    async fn body_json(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_session_starts_at_upload() {
        let response = test_router()
            .oneshot(Request::builder().uri("/session").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["step_number"], 1);
        assert_eq!(body["state"]["status"], "Idle");
        assert_eq!(body["can_proceed"], false);
    }

    #[tokio::test]
    async fn test_upload_rejections_map_to_status_codes() {
        let router = test_router();

        let too_large = router
            .clone()
            .oneshot(post_json(
                "/session/upload",
                json!({ "name": "scan.png", "mime_type": "image/png", "size_bytes": 12_582_912u64 }),
            ))
            .await
            .unwrap();
        assert_eq!(too_large.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(too_large).await["error"], "TooLarge");

        let unsupported = router
            .clone()
            .oneshot(post_json(
                "/session/upload",
                json!({ "name": "cv.docx", "mime_type": "application/msword", "size_bytes": 1024 }),
            ))
            .await
            .unwrap();
        assert_eq!(unsupported.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body_json(unsupported).await["error"], "UnsupportedType");
    }

    #[tokio::test]
    async fn test_upload_then_proceed() {
        let router = test_router();

        let uploaded = router
            .clone()
            .oneshot(post_json(
                "/session/upload",
                json!({ "name": "degree.pdf", "mime_type": "application/pdf", "size_bytes": 5_242_880u64 }),
            ))
            .await
            .unwrap();
        assert_eq!(uploaded.status(), StatusCode::OK);
        let body = body_json(uploaded).await;
        assert_eq!(body["file"]["document_type"], "pdf");
        assert_eq!(body["can_proceed"], true);

        let proceeded = router.clone().oneshot(post_empty("/session/proceed")).await.unwrap();
        assert_eq!(proceeded.status(), StatusCode::OK);
        assert_eq!(body_json(proceeded).await["step_number"], 2);

        // scan has not finished
        let advanced = router.clone().oneshot(post_empty("/session/advance")).await.unwrap();
        assert_eq!(advanced.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(advanced).await["error"], "InvalidTransition");

        let reset = router.oneshot(post_empty("/session/reset")).await.unwrap();
        let body = body_json(reset).await;
        assert_eq!(body["step_number"], 1);
        assert_eq!(body["epoch"], 1);
        assert!(body["file"].is_null());
    }

    #[tokio::test]
    async fn test_proceed_without_file_conflicts() {
        let response = test_router().oneshot(post_empty("/session/proceed")).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_fixture_endpoints() {
        let router = test_router();

        let stats = router
            .clone()
            .oneshot(Request::builder().uri("/statistics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(stats).await["total_verifications"], 45678);

        let alerts = router
            .clone()
            .oneshot(Request::builder().uri("/fraud-alerts").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let alerts = body_json(alerts).await;
        assert_eq!(alerts[0]["id"], "FA001");
        assert_eq!(alerts[0]["type"], "Tampered Grade");
        assert_eq!(alerts[1]["severity"], "Critical");

        let institutions = router
            .oneshot(Request::builder().uri("/institutions").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(institutions).await.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_charts_endpoint() {
        let response = test_router()
            .oneshot(Request::builder().uri("/charts").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let charts = body_json(response).await;
        assert_eq!(charts.as_array().unwrap().len(), 5);
        assert_eq!(charts[0]["id"], "verification-trend");
        assert_eq!(charts[0]["kind"], "line");
        assert_eq!(charts[0]["series"][0]["data"][8], 4500);
        assert_eq!(charts[4]["series"][1]["label"], "Fraud Detected");
    }

    #[tokio::test]
    async fn test_sample_certificates_endpoint() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/sample-certificates")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let samples = body_json(response).await;
        assert_eq!(samples[0]["id"], "JH/2024/BCA/001234");
        assert_eq!(samples[1]["student_name"], "Priya Sharma");
    }
}
