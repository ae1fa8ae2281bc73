use crate::config::LayoutConfig;
use crate::objects::format_real;
use crate::text::{display_text, escape_text, LineKind};

/// Resource name of the single shared font.
pub const FONT_RESOURCE: &str = "F1";

/// Renders one page of lines into PDF text operators.
///
/// The builder walks the same cursor the paginator walked: it starts at
/// `top_y` and moves down by [`LayoutConfig::line_space`] per line, drawing
/// each line at the cursor after the move. Inside a text object lines are
/// positioned with relative `Td` offsets; a freshly opened text object gets
/// an absolute position first.
///
/// Header lines are drawn one line height below the cursor in their own text
/// object at the header size. The paragraph gap is applied after the
/// body-sized text object is reopened.
pub struct ContentStreamBuilder<'a> {
    config: &'a LayoutConfig,
    operations: String,
    cursor_y: f64,
    /// Baseline of the last line drawn in the open text object.
    anchor_y: Option<f64>,
}

impl<'a> ContentStreamBuilder<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        let mut builder = Self {
            config,
            operations: String::new(),
            cursor_y: config.top_y,
            anchor_y: None,
        };
        builder.begin_text(config.body_font_size);
        builder
    }

    pub fn push_line(&mut self, line: &str) -> &mut Self {
        let kind = LineKind::classify(line);

        match kind {
            LineKind::Blank => self.cursor_y -= self.config.line_space(kind),
            LineKind::Body => {
                self.cursor_y -= self.config.line_space(kind);
                self.show(line);
            }
            LineKind::Header(_) => {
                self.cursor_y -= self.config.line_height;
                self.end_text();
                self.begin_text(self.config.header_font_size);
                self.show(display_text(line));
                self.end_text();
                self.begin_text(self.config.body_font_size);
                // Half-line gap below the header; the total matches line_space.
                self.cursor_y -= self.config.line_space(kind) - self.config.line_height;
            }
        }
        self
    }

    pub fn push_lines<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.push_line(line.as_ref());
        }
        self
    }

    /// Current cursor position, for checking it against the paginator.
    pub fn cursor_y(&self) -> f64 {
        self.cursor_y
    }

    /// Closes the open text object and returns the stream.
    pub fn finish(mut self) -> String {
        self.operations.push_str("ET");
        self.operations
    }

    fn begin_text(&mut self, font_size: f64) {
        self.operations.push_str("BT\n");
        self.operations.push_str(&format!(
            "/{} {} Tf\n",
            FONT_RESOURCE,
            format_real(font_size)
        ));
        self.anchor_y = None;
    }

    fn end_text(&mut self) {
        self.operations.push_str("ET\n");
    }

    fn show(&mut self, text: &str) {
        let y = self.cursor_y;
        let position = match self.anchor_y {
            None => format!("{} {} Td\n", format_real(self.config.margin), format_real(y)),
            Some(previous) => format!("0 {} Td\n", format_real(y - previous)),
        };
        self.operations.push_str(&position);
        self.anchor_y = Some(y);

        self.operations.push('(');
        self.operations.push_str(&escape_text(text));
        self.operations.push_str(") Tj\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(lines: &[&str]) -> String {
        let config = LayoutConfig::default();
        let mut builder = ContentStreamBuilder::new(&config);
        builder.push_lines(lines);
        builder.finish()
    }

    #[test]
    fn test_empty_page_stream() {
        assert_eq!(render(&[]), "BT\n/F1 11 Tf\nET");
    }

    #[test]
    fn test_blank_line_draws_nothing() {
        assert_eq!(render(&[""]), "BT\n/F1 11 Tf\nET");
    }

    #[test]
    fn test_body_lines_use_relative_offsets() {
        assert_eq!(
            render(&["First", "Second"]),
            "BT\n/F1 11 Tf\n50 736 Td\n(First) Tj\n0 -14 Td\n(Second) Tj\nET"
        );
    }

    #[test]
    fn test_blank_line_adds_paragraph_gap() {
        assert_eq!(
            render(&["First", "", "Second"]),
            "BT\n/F1 11 Tf\n50 736 Td\n(First) Tj\n0 -35 Td\n(Second) Tj\nET"
        );
    }

    #[test]
    fn test_header_switches_font_size() {
        assert_eq!(
            render(&["# Title", "Body line"]),
            "BT\n/F1 11 Tf\nET\n\
             BT\n/F1 14 Tf\n50 736 Td\n(Title) Tj\nET\n\
             BT\n/F1 11 Tf\n50 715 Td\n(Body line) Tj\nET"
        );
    }

    #[test]
    fn test_header_after_body_gap_follows_header() {
        assert_eq!(
            render(&["Intro", "## Section", "More"]),
            "BT\n/F1 11 Tf\n50 736 Td\n(Intro) Tj\nET\n\
             BT\n/F1 14 Tf\n50 722 Td\n(Section) Tj\nET\n\
             BT\n/F1 11 Tf\n50 701 Td\n(More) Tj\nET"
        );
    }

    #[test]
    fn test_header_levels_are_stripped() {
        let stream = render(&["### Notes"]);
        assert!(stream.contains("(Notes) Tj"));
        assert!(!stream.contains('#'));
    }

    #[test]
    fn test_text_is_escaped() {
        let stream = render(&["f(x) = \\y — ok"]);
        assert!(stream.contains("(f\\(x\\) = \\\\y ? ok) Tj"));
        assert!(stream.is_ascii());
    }

    #[test]
    fn test_cursor_follows_line_space() {
        let config = LayoutConfig::default();
        let mut builder = ContentStreamBuilder::new(&config);
        builder.push_lines(["# A", "b", "", "c"]);
        assert_eq!(builder.cursor_y(), 750.0 - 21.0 - 14.0 - 21.0 - 14.0);
    }

    #[test]
    fn test_custom_geometry() {
        let config = LayoutConfig {
            margin: 72.0,
            line_height: 10.0,
            top_y: 700.0,
            body_font_size: 9.5,
            ..LayoutConfig::default()
        };
        let mut builder = ContentStreamBuilder::new(&config);
        builder.push_lines(["a", "b"]);
        assert_eq!(
            builder.finish(),
            "BT\n/F1 9.5 Tf\n72 690 Td\n(a) Tj\n0 -10 Td\n(b) Tj\nET"
        );
    }
}
