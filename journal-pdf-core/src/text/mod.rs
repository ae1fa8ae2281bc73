//! Text handling: escaping, line classification, wrapping, and rendering
//! lines into content streams.

mod content;
mod encoding;
mod line;
mod wrap;

pub use content::{ContentStreamBuilder, FONT_RESOURCE};
pub use encoding::escape_text;
pub use line::{display_text, split_lines, LineKind};
pub use wrap::wrap_line;
