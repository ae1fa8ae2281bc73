//! Page geometry shared by pagination and content-stream generation.
//!
//! The paginator decides where a page ends by walking a vertical cursor, and
//! the content stream builder positions text with that same cursor. Both read
//! their numbers from one [`LayoutConfig`] and compute line advances through
//! [`LayoutConfig::line_space`], so page breaks and drawn coordinates cannot
//! drift apart.

use crate::error::{PdfError, Result};
use crate::text::LineKind;

/// A4 width in points.
pub const PAGE_WIDTH: f64 = 595.0;
/// A4 height in points.
pub const PAGE_HEIGHT: f64 = 842.0;
/// Left margin in points.
pub const MARGIN: f64 = 50.0;
/// Baseline-to-baseline distance for body lines, in points.
pub const LINE_HEIGHT: f64 = 14.0;
/// Cursor position at the top of each page.
pub const TOP_Y: f64 = 750.0;
/// Lowest position the cursor may reach.
pub const BOTTOM_Y: f64 = 50.0;
/// Body text size in points.
pub const BODY_FONT_SIZE: f64 = 11.0;
/// Header text size in points.
pub const HEADER_FONT_SIZE: f64 = 14.0;
/// Maximum characters per rendered line.
pub const WRAP_WIDTH: usize = 80;
/// Page ceiling for one export.
pub const MAX_PAGES: usize = 20;
/// Extra advance for blank lines and headers, as a fraction of the line height.
pub const PARAGRAPH_GAP: f64 = 0.5;

/// Geometry and limits for one export.
///
/// `Default` reproduces the constants existing exports were produced with;
/// changing any of them changes the rendered output.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    pub page_width: f64,
    pub page_height: f64,
    /// Left edge of every text line.
    pub margin: f64,
    pub line_height: f64,
    /// Cursor position at the start of each page.
    pub top_y: f64,
    /// Lowest position the cursor may reach.
    pub bottom_y: f64,
    pub body_font_size: f64,
    pub header_font_size: f64,
    /// Maximum characters per rendered line.
    pub wrap_width: usize,
    /// Page ceiling; content past it is dropped and the export flagged.
    pub max_pages: usize,
    pub paragraph_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: PAGE_WIDTH,
            page_height: PAGE_HEIGHT,
            margin: MARGIN,
            line_height: LINE_HEIGHT,
            top_y: TOP_Y,
            bottom_y: BOTTOM_Y,
            body_font_size: BODY_FONT_SIZE,
            header_font_size: HEADER_FONT_SIZE,
            wrap_width: WRAP_WIDTH,
            max_pages: MAX_PAGES,
            paragraph_gap: PARAGRAPH_GAP,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_wrap_width(mut self, wrap_width: usize) -> Self {
        self.wrap_width = wrap_width;
        self
    }

    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn with_vertical_bounds(mut self, top_y: f64, bottom_y: f64) -> Self {
        self.top_y = top_y;
        self.bottom_y = bottom_y;
        self
    }

    pub fn with_font_sizes(mut self, body: f64, header: f64) -> Self {
        self.body_font_size = body;
        self.header_font_size = header;
        self
    }

    /// Vertical advance consumed by a line of the given kind.
    ///
    /// Body lines advance by one line height. Blank lines and headers add the
    /// paragraph gap on top.
    pub fn line_space(&self, kind: LineKind) -> f64 {
        match kind {
            LineKind::Body => self.line_height,
            LineKind::Blank | LineKind::Header(_) => {
                self.line_height + self.line_height * self.paragraph_gap
            }
        }
    }

    /// Rejects configurations that cannot produce a sensible layout.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("line_height", self.line_height),
            ("body_font_size", self.body_font_size),
            ("header_font_size", self.header_font_size),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PdfError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if !(self.paragraph_gap.is_finite() && self.paragraph_gap >= 0.0) {
            return Err(PdfError::InvalidConfig(format!(
                "paragraph_gap must not be negative, got {}",
                self.paragraph_gap
            )));
        }
        if !(self.bottom_y.is_finite() && self.top_y.is_finite()) || self.bottom_y >= self.top_y {
            return Err(PdfError::InvalidConfig(format!(
                "bottom_y ({}) must lie below top_y ({})",
                self.bottom_y, self.top_y
            )));
        }
        if self.top_y > self.page_height {
            return Err(PdfError::InvalidConfig(format!(
                "top_y ({}) lies above the page height ({})",
                self.top_y, self.page_height
            )));
        }
        if self.wrap_width == 0 {
            return Err(PdfError::InvalidConfig(
                "wrap_width must be at least 1".to_string(),
            ));
        }
        if self.max_pages == 0 {
            return Err(PdfError::InvalidConfig(
                "max_pages must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
