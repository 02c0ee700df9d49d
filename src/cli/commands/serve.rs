//! HTTP API server for the browser client.
//!
//! Provides the transcription and study-material endpoints.

use crate::cli::{cache_summary, Output};
use crate::config::{ServerSettings, Settings};
use crate::error::VidlearnError;
use crate::generation::GenerationService;
use crate::provider::{ContentGenerator, GeminiClient};
use crate::schema::{CourseData, TranscriptData};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Shared application state.
pub struct AppState {
    pub service: GenerationService,
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    mut settings: Settings,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    // Missing credentials are fatal before anything binds.
    let api_key = settings.api_key()?;
    let generator: Arc<dyn ContentGenerator> = Arc::new(GeminiClient::new(&settings.gemini, api_key)?);
    let service = GenerationService::new(&settings, generator)?;

    let app_state = Arc::new(AppState { service });
    let app = router(app_state.clone(), &settings.server);

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let base = base_path(&settings.server);

    Output::header("Vidlearn API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    let generator = app_state.service.generator();
    Output::kv("Model", &format!("{} ({})", generator.model(), generator.name()));
    Output::kv("Cache", &cache_summary(app_state.service.cache()));
    Output::kv("Reference policy", &settings.generation.reference_policy.to_string());
    println!();
    println!("Endpoints:");
    Output::endpoint("GET", "/health", "liveness");
    Output::endpoint("POST", &format!("{}/transcribe", base), "transcript");
    Output::endpoint("POST", &format!("{}/study-materials", base), "study materials");
    Output::endpoint("POST", &format!("{}/extract", base), "deprecated alias of study-materials");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}

/// Build the application router.
pub fn router(state: Arc<AppState>, server: &ServerSettings) -> Router {
    let api = Router::new()
        .route("/transcribe", post(transcribe))
        .route("/study-materials", post(study_materials))
        .route("/extract", post(extract));

    let base = base_path(server);
    let app = if base.is_empty() {
        api
    } else {
        Router::new().nest(&base, api)
    };

    app.route("/health", get(health))
        .layer(cors_layer(&server.cors_origins))
        .with_state(state)
}

/// Normalized route prefix: empty, or starting with '/' and without a trailing one.
fn base_path(server: &ServerSettings) -> String {
    let trimmed = server.base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct VideoRequest {
    /// URL of the video to process
    #[serde(rename = "youtubeUrl", default)]
    youtube_url: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Error converted into a `{ "error": ... }` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<VidlearnError> for ApiError {
    fn from(err: VidlearnError) -> Self {
        if err.is_client_error() {
            warn!("Rejected request: {}", err);
            Self::bad_request(match err {
                VidlearnError::InvalidInput(message) => message,
                other => other.to_string(),
            })
        } else {
            error!("Generation failed: {}", err);
            Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: err.to_string(),
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

/// Pull the URL out of the body, rejecting malformed JSON and missing fields.
fn requested_url(body: Result<Json<VideoRequest>, JsonRejection>) -> Result<String, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    match request.youtube_url {
        Some(url) if !url.trim().is_empty() => Ok(url),
        _ => Err(ApiError::bad_request("youtubeUrl is required")),
    }
}

/// Run a handler body inside a span carrying a fresh request id.
async fn traced<T>(route: &'static str, fut: impl Future<Output = T>) -> T {
    let span = info_span!("request", id = %Uuid::new_v4(), route);
    fut.instrument(span).await
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn transcribe(
    State(state): State<Arc<AppState>>,
    body: Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Json<TranscriptData>, ApiError> {
    traced("/transcribe", async move {
        let url = requested_url(body)?;
        info!("Transcription requested for {}", url);
        let transcript = state.service.transcribe(&url).await?;
        Ok(Json(transcript))
    })
    .await
}

async fn study_materials(
    State(state): State<Arc<AppState>>,
    body: Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Json<CourseData>, ApiError> {
    traced("/study-materials", async move {
        let url = requested_url(body)?;
        info!("Study materials requested for {}", url);
        let course = state.service.study_materials(&url).await?;
        Ok(Json(course))
    })
    .await
}

async fn extract(
    State(state): State<Arc<AppState>>,
    body: Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    traced("/extract", async move {
        let url = requested_url(body)?;
        warn!("Deprecated /extract called; use /study-materials");
        let course = state.service.extract(&url).await?;
        Ok((
            [(HeaderName::from_static("deprecation"), HeaderValue::from_static("true"))],
            Json(course),
        )
            .into_response())
    })
    .await
}
