/// How a rendered line is typeset.
///
/// Header detection is a literal, case-sensitive prefix match on `"# "`,
/// `"## "` and `"### "`. Anything else, including `"#NoSpace"` and
/// `"#### deeper"`, is body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Header with its level (1 to 3).
    Header(u8),
    /// Empty or whitespace-only line.
    Blank,
    Body,
}

const HEADER_PREFIXES: [(&str, u8); 3] = [("# ", 1), ("## ", 2), ("### ", 3)];

impl LineKind {
    pub fn classify(line: &str) -> Self {
        for (prefix, level) in HEADER_PREFIXES {
            if line.starts_with(prefix) {
                return LineKind::Header(level);
            }
        }
        if line.trim().is_empty() {
            LineKind::Blank
        } else {
            LineKind::Body
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, LineKind::Header(_))
    }
}

/// Text actually drawn for `line`: headers lose their `#` run and one
/// following space, everything else is returned unchanged.
pub fn display_text(line: &str) -> &str {
    if LineKind::classify(line).is_header() {
        let stripped = line.trim_start_matches('#');
        stripped.strip_prefix(' ').unwrap_or(stripped)
    } else {
        line
    }
}

/// Splits a text block into logical lines on `\n`, dropping a trailing `\r`
/// so CRLF input renders like LF input. An empty block is one empty line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}
