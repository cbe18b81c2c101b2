use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection, rejection::QueryRejection, DefaultBodyLimit, Multipart,
        Query, State,
    },
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use sightmate_core::SightError;
use sightmate_logging::{AuditEvent, AuditLogger};
use sightmate_memory::{HistoryStore, DEFAULT_HISTORY_LIMIT};
use sightmate_understanding::{AnalysisTask, VisionDispatcher};

use crate::emergency::EmergencyNotifier;
use crate::error::ApiError;

/// Upload size accepted by the vision endpoints unless configured otherwise.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state for API handlers.
pub struct AppState {
    pub dispatcher: VisionDispatcher,
    pub history: Arc<dyn HistoryStore>,
    pub notifier: EmergencyNotifier,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// `history` receives analysis results, `emergencies` SOS requests.
    pub fn new(
        dispatcher: VisionDispatcher,
        history: Arc<dyn HistoryStore>,
        emergencies: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            dispatcher,
            history,
            notifier: EmergencyNotifier::new(emergencies),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Build the Axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/vision/objects", post(detect_objects))
        .route("/api/vision/currency", post(detect_currency))
        .route("/api/vision/text", post(read_text))
        .route("/api/vision/colors", post(detect_colors))
        .route("/api/history", get(get_history))
        .route("/api/emergency/sos", post(emergency_sos))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Liveness message.
async fn root() -> Json<Value> {
    Json(json!({ "message": "SightMate API is running" }))
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "sightmate",
        "version": env!("CARGO_PKG_VERSION"),
        "ai_configured": state.dispatcher.is_configured(),
    }))
}

async fn detect_objects(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    analyze_upload(&state, AnalysisTask::Objects, multipart).await
}

async fn detect_currency(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    analyze_upload(&state, AnalysisTask::Currency, multipart).await
}

async fn read_text(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    analyze_upload(&state, AnalysisTask::Text, multipart).await
}

async fn detect_colors(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    analyze_upload(&state, AnalysisTask::Colors, multipart).await
}

/// Upload -> analysis -> stored record -> response body.
async fn analyze_upload(
    state: &AppState,
    task: AnalysisTask,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let multipart = multipart
        .map_err(|rejection| failure(task, SightError::invalid_image(rejection.body_text())))?;
    let upload = read_upload(multipart).await.map_err(|e| failure(task, e))?;

    let analysis = state
        .dispatcher
        .analyze(task, upload)
        .await
        .map_err(|e| failure(task, e))?;

    let record = analysis.to_record();
    let mut body = json!({
        "success": true,
        "type": task.response_type(),
        "timestamp": record.timestamp,
    });
    body[task.result_field()] = Value::String(analysis.text);
    if let Some(amounts) = record.fields.get("detected_amounts") {
        body["detected_amounts"] = amounts.clone();
    }

    let record_id = record.id;
    state
        .history
        .append(record)
        .await
        .map_err(|e| failure(task, e))?;
    AuditLogger::log_event(AuditEvent::AnalysisStored {
        record_id: record_id.to_string(),
        kind: task.record_kind().to_string(),
    });

    Ok(Json(body))
}

/// The field named `file`, or the first field when none is.
async fn read_upload(mut multipart: Multipart) -> Result<Bytes, SightError> {
    let mut fallback = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| SightError::invalid_image(e.body_text()))?
    {
        let is_file = field.name() == Some("file");
        let data = field
            .bytes()
            .await
            .map_err(|e| SightError::invalid_image(e.body_text()))?;
        if is_file {
            return Ok(data);
        }
        fallback.get_or_insert(data);
    }
    fallback.ok_or_else(|| SightError::invalid_image("no file uploaded"))
}

fn failure(task: AnalysisTask, err: SightError) -> ApiError {
    error!(task = task.response_type(), error = %err, "{} failed", task.label());
    ApiError::internal(format!("{} failed: {err}", task.label()))
}

#[derive(Debug, Deserialize)]
struct HistoryParams {
    limit: Option<usize>,
}

/// Most recent analyses, newest first.
async fn get_history(
    State(state): State<Arc<AppState>>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        ApiError::internal(format!("Failed to get history: {}", rejection.body_text()))
    })?;
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    match state.history.recent(limit).await {
        Ok(history) => Ok(Json(json!({ "success": true, "history": history }))),
        Err(e) => {
            error!(error = %e, "Failed to fetch history");
            Err(ApiError::internal(format!("Failed to get history: {e}")))
        }
    }
}

/// Record an SOS request. No one is contacted.
async fn emergency_sos(
    State(state): State<Arc<AppState>>,
    Json(contact_info): Json<Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    match state.notifier.initiate(contact_info).await {
        Ok(emergency_id) => Ok(Json(json!({
            "success": true,
            "message": "Emergency SOS initiated",
            "emergency_id": emergency_id,
        }))),
        Err(e) => {
            error!(error = %e, "Failed to record emergency request");
            Err(ApiError::internal(format!("Emergency SOS failed: {e}")))
        }
    }
}
