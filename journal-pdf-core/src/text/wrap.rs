/// Splits one logical line into segments of at most `width` characters.
///
/// Lines that already fit come back unchanged as a single segment. Longer
/// lines break greedily at the last space at or before the boundary; a run
/// without any space in range is hard-split exactly at `width`, so words are
/// split but never dropped. Whitespace around each break point is trimmed.
///
/// Widths are counted in characters, not bytes.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let mut segments = Vec::new();
    let mut remaining = line;

    while remaining.chars().count() > width {
        // Byte offset of the character sitting right on the boundary. The
        // search window includes it, so a space there still counts.
        let (boundary, boundary_char) = remaining
            .char_indices()
            .nth(width)
            .unwrap_or((remaining.len(), ' '));
        let window = &remaining[..boundary + boundary_char.len_utf8()];

        let soft_break = window
            .rfind(' ')
            .filter(|&idx| !remaining[..idx].trim_end().is_empty());

        match soft_break {
            Some(idx) => {
                segments.push(remaining[..idx].trim_end().to_string());
                remaining = remaining[idx..].trim_start();
            }
            None => {
                segments.push(remaining[..boundary].to_string());
                remaining = remaining[boundary..].trim_start();
            }
        }
    }

    if !remaining.is_empty() {
        segments.push(remaining.to_string());
    }

    segments
}
