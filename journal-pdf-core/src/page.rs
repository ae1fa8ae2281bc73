//! Pagination of wrapped lines under a hard page ceiling.

use crate::config::LayoutConfig;
use crate::text::{split_lines, wrap_line, LineKind};
use std::mem;
use tracing::{debug, trace};

/// A page's worth of wrapped lines, in drawing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    lines: Vec<String>,
}

impl Page {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

/// Outcome of paginating one text block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pagination {
    pub pages: Vec<Page>,
    pub truncated: bool,
}

/// Walks a vertical cursor over wrapped lines and cuts them into pages.
///
/// All state lives in the value itself; every export builds its own.
pub struct Paginator<'a> {
    config: &'a LayoutConfig,
    current_y: f64,
    current: Vec<String>,
    pages: Vec<Page>,
    truncated: bool,
}

impl<'a> Paginator<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self {
            config,
            current_y: config.top_y,
            current: Vec::new(),
            pages: Vec::new(),
            truncated: false,
        }
    }

    /// Places one wrapped line.
    ///
    /// Returns `false` once the page ceiling has been reached; the line that
    /// triggered it is dropped and callers must stop feeding input.
    pub fn push_line(&mut self, line: String) -> bool {
        if self.truncated {
            return false;
        }

        let line_space = self.config.line_space(LineKind::classify(&line));

        if self.current_y - line_space < self.config.bottom_y {
            if !self.current.is_empty() {
                self.pages.push(Page::new(mem::take(&mut self.current)));
            }
            if self.pages.len() >= self.config.max_pages {
                debug!(
                    max_pages = self.config.max_pages,
                    "page ceiling reached, dropping remaining content"
                );
                self.truncated = true;
                return false;
            }
            trace!(page = self.pages.len() + 1, "starting new page");
            self.current_y = self.config.top_y;
        }

        self.current.push(line);
        self.current_y -= line_space;
        true
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Cursor position after the last placed line.
    pub fn current_y(&self) -> f64 {
        self.current_y
    }

    pub fn finish(mut self) -> Pagination {
        if !self.truncated && !self.current.is_empty() {
            self.pages.push(Page::new(mem::take(&mut self.current)));
        }
        Pagination {
            pages: self.pages,
            truncated: self.truncated,
        }
    }
}

/// Splits `text` into logical lines, wraps each one, and paginates the
/// result.
///
/// If the ceiling is hit partway through the segments of one logical line,
/// the remaining segments of that line are dropped along with everything
/// after it.
pub fn paginate(text: &str, config: &LayoutConfig) -> Pagination {
    let mut paginator = Paginator::new(config);

    'input: for line in split_lines(text) {
        for segment in wrap_line(line, config.wrap_width) {
            if !paginator.push_line(segment) {
                break 'input;
            }
        }
    }

    paginator.finish()
}
