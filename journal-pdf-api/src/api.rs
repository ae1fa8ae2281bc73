use crate::cache::{CachedExport, MemoryExportStore};
use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Duration;
use journal_pdf::{format_entry, render_with_config, JournalEntry, LayoutConfig, PdfExport};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, warn};

const DEFAULT_FILENAME: &str = "journal-entry";

const X_PDF_PAGES: HeaderName = HeaderName::from_static("x-pdf-pages");
const X_PDF_TRUNCATED: HeaderName = HeaderName::from_static("x-pdf-truncated");
const X_PDF_WARNING: HeaderName = HeaderName::from_static("x-pdf-warning");
const X_PDF_CACHE: HeaderName = HeaderName::from_static("x-pdf-cache");

/// Request payload for the export endpoint
///
/// Exactly one of `text` and `entry` must be given.
#[derive(Debug, Default, Deserialize)]
pub struct ExportRequest {
    /// Marked-up text to render as-is
    pub text: Option<String>,
    /// Structured journal entry, formatted before rendering
    pub entry: Option<JournalEntry>,
    /// Owner of the entry; enables caching together with `entry_id`
    pub user_id: Option<String>,
    pub entry_id: Option<String>,
    /// Download name without extension
    pub filename: Option<String>,
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
    /// Malformed or incomplete request
    #[error("{0}")]
    BadRequest(String),
    /// No cached export under the requested key
    #[error("{0}")]
    NotFound(String),
    /// Errors from the export engine
    #[error(transparent)]
    Pdf(#[from] journal_pdf::PdfError),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Pdf(journal_pdf::PdfError::Io(_)) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Pdf(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_response = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Pdf(err.into())
    }
}

/// Shared handler state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub layout: LayoutConfig,
    pub store: MemoryExportStore,
}

impl AppState {
    pub fn new(layout: LayoutConfig, cache_ttl: Duration) -> journal_pdf::Result<Self> {
        layout.validate()?;
        Ok(Self {
            layout,
            store: MemoryExportStore::new(cache_ttl),
        })
    }
}

/// Build the application router with default state
pub fn app() -> Router {
    app_with_state(AppState::default())
}

/// Build the application router around an existing state
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/export", post(export_pdf))
        .route("/api/export/{user_id}/{entry_id}", get(cached_export))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancing
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "journal-pdf API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Render text or a journal entry to PDF, going through the cache when the
/// request names both a user and an entry.
pub async fn export_pdf(
    State(state): State<AppState>,
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;

    let text = match (request.text, request.entry) {
        (Some(text), None) => text,
        (None, Some(entry)) => format_entry(&entry),
        _ => {
            return Err(AppError::BadRequest(
                "Provide exactly one of `text` or `entry`".to_string(),
            ))
        }
    };

    let filename = download_name(request.filename.as_deref().or(request.entry_id.as_deref()));
    let cache_key = request.user_id.as_deref().zip(request.entry_id.as_deref());

    if let Some((user_id, entry_id)) = cache_key {
        match state.store.get(user_id, entry_id).await {
            Ok(Some(cached)) => {
                debug!(user_id, entry_id, "serving cached export");
                return pdf_response(&cached.export, &filename, &state.layout, Some("hit"));
            }
            Ok(None) => {}
            Err(err) => warn!(user_id, entry_id, error = %err, "export cache lookup failed"),
        }
    }

    let export = render_with_config(&text, &state.layout);
    debug!(
        pages = export.page_count,
        truncated = export.truncated,
        bytes = export.len(),
        "rendered export"
    );

    let cache_status = match cache_key {
        Some((user_id, entry_id)) => {
            if let Err(err) = state.store.put(user_id, entry_id, export.clone()).await {
                warn!(user_id, entry_id, error = %err, "failed to cache export");
            }
            Some("miss")
        }
        None => None,
    };

    pdf_response(&export, &filename, &state.layout, cache_status)
}

/// Serve a previously cached export
pub async fn cached_export(
    State(state): State<AppState>,
    Path((user_id, entry_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let cached: Option<CachedExport> = match state.store.get(&user_id, &entry_id).await {
        Ok(cached) => cached,
        Err(err) => {
            warn!(
                user_id = %user_id,
                entry_id = %entry_id,
                error = %err,
                "export cache lookup failed"
            );
            None
        }
    };

    let cached = cached.ok_or_else(|| {
        AppError::NotFound(format!("No cached export for entry {entry_id}"))
    })?;

    pdf_response(
        &cached.export,
        &download_name(Some(&entry_id)),
        &state.layout,
        Some("hit"),
    )
}

/// File name for `Content-Disposition`, always ending in `.pdf`.
fn download_name(requested: Option<&str>) -> String {
    let stem = requested
        .map(str::trim)
        .map(|name| name.strip_suffix(".pdf").unwrap_or(name))
        .unwrap_or_default();

    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c: char| c == '.' || c == ' ');

    if cleaned.is_empty() {
        format!("{DEFAULT_FILENAME}.pdf")
    } else {
        format!("{cleaned}.pdf")
    }
}

fn pdf_response(
    export: &PdfExport,
    filename: &str,
    layout: &LayoutConfig,
    cache_status: Option<&'static str>,
) -> Result<Response, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        header_value(format!("attachment; filename=\"{filename}\""))?,
    );
    headers.insert(X_PDF_PAGES, HeaderValue::from(export.page_count));

    if export.truncated {
        headers.insert(X_PDF_TRUNCATED, HeaderValue::from_static("true"));
        headers.insert(
            X_PDF_WARNING,
            header_value(format!(
                "Content exceeded {} pages and was truncated",
                layout.max_pages
            ))?,
        );
    }
    if let Some(status) = cache_status {
        headers.insert(X_PDF_CACHE, HeaderValue::from_static(status));
    }

    Ok((StatusCode::OK, headers, export.document.clone()).into_response())
}

fn header_value(value: String) -> Result<HeaderValue, AppError> {
    HeaderValue::try_from(value).map_err(|e| AppError::Internal(format!("Invalid header: {e}")))
}
