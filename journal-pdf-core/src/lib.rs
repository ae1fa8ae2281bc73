//! # journal-pdf
//!
//! A small, deterministic PDF 1.4 export engine for journal entries, written
//! from scratch without any document-formatting library.
//!
//! ## Features
//!
//! - **Word wrapping**: greedy breaks at spaces, hard splits for unbroken runs
//! - **Pagination**: shared cursor geometry with a hard page ceiling and a
//!   truncation flag instead of an error
//! - **Light markup**: `# `, `## ` and `### ` prefixed lines render as headers
//! - **Valid output**: sequential object numbering, exact cross-reference
//!   offsets, ASCII-only bytes, identical output for identical input
//! - **Journal entries**: question, drawn cards, narrative and reflections
//!   flattened into the text the engine consumes
//!
//! ## Quick Start
//!
//! ```rust
//! use journal_pdf::render;
//!
//! let export = render("# Morning draw\nThe Fool appeared first.");
//! assert_eq!(export.page_count, 1);
//! assert!(!export.truncated);
//! assert!(export.document.starts_with("%PDF-1.4"));
//! assert!(export.document.ends_with("%%EOF"));
//! ```
//!
//! ## Pipeline
//!
//! Raw text is split into lines and wrapped ([`text::wrap_line`]), placed on
//! pages by the [`page::Paginator`], rendered per page by the
//! [`text::ContentStreamBuilder`], numbered by the [`writer::ObjectGraph`] and
//! assembled by the [`writer::PdfWriter`]. Every call builds fresh state, so
//! exports can run concurrently.

pub mod config;
pub mod document;
pub mod entry;
pub mod error;
pub mod objects;
pub mod page;
pub mod text;
pub mod writer;

pub use config::LayoutConfig;
pub use document::{Document, PdfExport};
pub use entry::{format_entry, DrawnCard, JournalEntry};
pub use error::{PdfError, Result};
pub use page::{paginate, Page, Pagination, Paginator};
pub use text::{escape_text, wrap_line, ContentStreamBuilder, LineKind};

/// Current version of journal-pdf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Renders a marked-up text block with the default layout.
pub fn render(text: &str) -> PdfExport {
    render_with_config(text, &LayoutConfig::default())
}

/// Renders a marked-up text block with a custom layout.
///
/// The layout is used as given. Run [`LayoutConfig::validate`] on configs
/// built from user input first; non-finite geometry is written as `0`.
pub fn render_with_config(text: &str, config: &LayoutConfig) -> PdfExport {
    Document::from_text(text, config.clone()).export()
}

/// Formats a journal entry and renders it.
pub fn render_entry(entry: &JournalEntry, config: &LayoutConfig) -> PdfExport {
    render_with_config(&format_entry(entry), config)
}
