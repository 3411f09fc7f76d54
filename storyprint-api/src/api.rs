use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use storyprint::story::{portrait_prompt, story_prompt};
use storyprint::{
    export, paginate_with, ArtifactCache, ContextId, Document, ExportFormat, ExportOptions, Page,
    PageGeometry, PrintError, StoryContext, StoryRequest, WrapMode,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Request payload for the pagination endpoint
#[derive(Debug, Deserialize)]
pub struct PaginateRequest {
    /// Text to lay out, lines separated by `\n`
    pub text: String,
    /// Page geometry; the server default when absent
    #[serde(default)]
    pub geometry: Option<PageGeometry>,
    #[serde(default)]
    pub wrap_mode: WrapMode,
}

/// Response of the pagination endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginateResponse {
    pub page_count: usize,
    pub pages: Vec<Page>,
}

/// Request payload for the export endpoint
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub text: String,
    #[serde(default)]
    pub geometry: Option<PageGeometry>,
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default)]
    pub options: ExportOptions,
}

/// Request payload creating a story context
#[derive(Debug, Deserialize)]
pub struct CreateStoryRequest {
    #[serde(flatten)]
    pub request: StoryRequest,
    /// Generated story text
    pub story: String,
}

/// A story context as returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct StoryResponse {
    pub id: u64,
    pub title: String,
    pub request: StoryRequest,
    pub story: String,
    /// RFC 3339 timestamp
    pub created_at: String,
    pub download_file_name: String,
    pub story_prompt: String,
    pub portrait_prompt: String,
}

impl From<&StoryContext> for StoryResponse {
    fn from(context: &StoryContext) -> Self {
        Self {
            id: context.id().as_u64(),
            title: context.title(),
            request: context.request().clone(),
            story: context.story().to_string(),
            created_at: context.created_at().to_rfc3339(),
            download_file_name: context.request().download_file_name(),
            story_prompt: story_prompt(context.request()),
            portrait_prompt: portrait_prompt(context.request()),
        }
    }
}

/// Standard error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message describing what went wrong
    pub error: String,
}

/// Application-specific error types for the API
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Print(#[from] PrintError),
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("Internal state unavailable")]
    Poisoned,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Print(e) if e.is_caller_error() => StatusCode::BAD_REQUEST,
            AppError::Print(PrintError::UnknownContext(_)) => StatusCode::NOT_FOUND,
            AppError::Body(rejection) => rejection.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let error_response = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Shared server state: live story contexts and their exported PDFs
pub struct AppState {
    geometry: PageGeometry,
    contexts: RwLock<HashMap<ContextId, Arc<StoryContext>>>,
    pdfs: ArtifactCache<Vec<u8>>,
}

impl AppState {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            contexts: RwLock::new(HashMap::new()),
            pdfs: ArtifactCache::new(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Register a new story context
    pub fn insert_context(&self, context: StoryContext) -> Result<Arc<StoryContext>, AppError> {
        let context = Arc::new(context);
        self.contexts
            .write()
            .map_err(|_| AppError::Poisoned)?
            .insert(context.id(), Arc::clone(&context));
        Ok(context)
    }

    /// Number of story PDFs currently cached
    pub fn cached_pdf_count(&self) -> usize {
        self.pdfs.len()
    }

    fn context(&self, id: u64) -> Result<Arc<StoryContext>, AppError> {
        let contexts = self.contexts.read().map_err(|_| AppError::Poisoned)?;
        contexts
            .get(&ContextId::from_raw(id))
            .cloned()
            .ok_or(AppError::Print(PrintError::UnknownContext(id)))
    }

    /// The context of `id` with its PDF, exported on first use.
    fn context_pdf(&self, id: u64) -> Result<(Arc<StoryContext>, Arc<Vec<u8>>), AppError> {
        // held until the PDF is cached: a delete of `id` must not fall between
        // the lookup and the insert
        let contexts = self.contexts.read().map_err(|_| AppError::Poisoned)?;
        let context = contexts
            .get(&ContextId::from_raw(id))
            .cloned()
            .ok_or(AppError::Print(PrintError::UnknownContext(id)))?;

        let pdf = self.pdfs.get_or_try_insert_with(context.id(), || {
            debug!(context = %context.id(), "exporting story PDF");
            let options = ExportOptions {
                title: Some(context.title()),
                creation_date: Some(context.created_at()),
                ..ExportOptions::default()
            };
            export(context.story(), &self.geometry, ExportFormat::Pdf, options)
        })?;
        drop(contexts);

        Ok((context, pdf))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(PageGeometry::default())
    }
}

/// Build the application router with default state
pub fn app() -> Router {
    app_with_state(Arc::new(AppState::default()))
}

/// Build the application router around the given state
pub fn app_with_state(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/paginate", post(paginate_text))
        .route("/api/export", post(export_text))
        .route("/api/stories", post(create_story))
        .route("/api/stories/{id}", get(get_story).delete(delete_story))
        .route("/api/stories/{id}/pdf", get(story_pdf))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancing
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "storyprint API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Lay out text and return the pages with positioned fragments
pub async fn paginate_text(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PaginateRequest>, JsonRejection>,
) -> Result<Json<PaginateResponse>, AppError> {
    let Json(payload) = payload?;
    let geometry = payload.geometry.unwrap_or(state.geometry);
    let pages = paginate_with(&Document::from_text(&payload.text), &geometry, payload.wrap_mode)?;

    Ok(Json(PaginateResponse {
        page_count: pages.len(),
        pages,
    }))
}

/// Lay out text and return it as a PDF or HTML document
pub async fn export_text(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;
    let geometry = payload.geometry.unwrap_or(state.geometry);
    let bytes = export(&payload.text, &geometry, payload.format, payload.options)?;
    let disposition = format!(
        "attachment; filename=\"document.{}\"",
        payload.format.extension()
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, payload.format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Start a new trip: bind the request to its story under a fresh context
pub async fn create_story(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateStoryRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;
    let context = state.insert_context(StoryContext::new(payload.request, payload.story)?)?;
    let response = StoryResponse::from(context.as_ref());
    info!(context = %context.id(), title = %response.title, "story context created");

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

pub async fn get_story(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<StoryResponse>, AppError> {
    let context = state.context(id)?;
    Ok(Json(StoryResponse::from(context.as_ref())))
}

/// Export the story of a context as PDF. The document is built once per
/// context and served from the cache afterwards.
pub async fn story_pdf(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let (context, pdf) = state.context_pdf(id)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        ascii_file_name(&context.request().download_file_name())
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, ExportFormat::Pdf.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf.as_ref().clone(),
    )
        .into_response())
}

/// Start over: forget the context and its cached artifacts
pub async fn delete_story(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let removed = state
        .contexts
        .write()
        .map_err(|_| AppError::Poisoned)?
        .remove(&ContextId::from_raw(id));

    match removed {
        Some(context) => {
            state.pdfs.invalidate(context.id());
            info!(context = %context.id(), "story context deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(PrintError::UnknownContext(id).into()),
    }
}

// header values must be visible ASCII
fn ascii_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' { c } else { '_' })
        .collect()
}
