use crate::config::LayoutConfig;
use crate::error::Result;
use crate::page::{paginate, Page};
use crate::text::ContentStreamBuilder;
use crate::writer::{ObjectGraph, PdfWriter};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// A paginated text block ready to be written out.
///
/// Built once per export and never mutated afterwards.
///
/// # Example
///
/// ```rust
/// use journal_pdf::{Document, LayoutConfig};
///
/// let document = Document::from_text("# Title\nBody line", LayoutConfig::default());
/// assert_eq!(document.page_count(), 1);
///
/// let export = document.export();
/// assert!(export.document.starts_with("%PDF-1.4"));
/// assert!(!export.truncated);
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    config: LayoutConfig,
    pages: Vec<Page>,
    truncated: bool,
}

impl Document {
    pub fn from_text(text: &str, config: LayoutConfig) -> Self {
        let pagination = paginate(text, &config);
        debug!(
            pages = pagination.pages.len(),
            truncated = pagination.truncated,
            "paginated text"
        );
        Self {
            config,
            pages: pagination.pages,
            truncated: pagination.truncated,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of pages in the output file; at least one even for empty input.
    pub fn page_count(&self) -> usize {
        self.pages.len().max(1)
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Renders every page, numbers the objects, and assembles the file.
    pub fn export(&self) -> PdfExport {
        let mut graph = ObjectGraph::new(&self.config);

        for page in &self.pages {
            let mut content = ContentStreamBuilder::new(&self.config);
            content.push_lines(page.lines());
            graph.add_page(content.finish());
        }
        if self.pages.is_empty() {
            graph.add_page(ContentStreamBuilder::new(&self.config).finish());
        }

        let root = graph.catalog_id();
        let page_count = graph.page_count();
        let objects = graph.finish();
        let object_count = objects.len();
        let document = PdfWriter::new().write_document(&objects, root);

        PdfExport {
            document,
            page_count,
            object_count,
            truncated: self.truncated,
        }
    }

    /// Writes the exported file to `writer`.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.export().write(writer)
    }

    /// Writes the exported file to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.export().save(path)
    }
}

/// A finished export: the file plus what callers need to surface about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfExport {
    /// The complete PDF 1.4 file. Always ASCII.
    pub document: String,
    pub page_count: usize,
    pub object_count: usize,
    /// Content was dropped at the page ceiling. This is a normal outcome;
    /// callers decide how to tell the user.
    pub truncated: bool,
}

impl PdfExport {
    pub fn as_bytes(&self) -> &[u8] {
        self.document.as_bytes()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.document.into_bytes()
    }

    pub fn len(&self) -> usize {
        self.document.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)
    }
}
