/// Prepares a display line for embedding inside a PDF string literal.
///
/// Backslashes and parentheses are backslash-escaped and every code point
/// above U+007F becomes `?`, so the result is always plain ASCII. Characters
/// are replaced, never transliterated.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            c if c.is_ascii() => escaped.push(c),
            _ => escaped.push('?'),
        }
    }
    escaped
}
