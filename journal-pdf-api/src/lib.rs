//! # journal-pdf-api
//!
//! HTTP export service for the journal-pdf engine, with a best-effort
//! in-process cache of finished exports.

mod api;
pub mod cache;
pub mod config;

pub use api::{
    app, app_with_state, cached_export, export_pdf, health_check, AppError, AppState,
    ErrorResponse, ExportRequest,
};
pub use crate::cache::{CachedExport, MemoryExportStore};
pub use crate::config::ServerConfig;
