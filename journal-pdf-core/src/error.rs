use thiserror::Error;

/// Errors raised around the export engine.
///
/// Rendering itself never fails: every input yields a well-formed document.
/// These variants cover the edges where the engine touches the outside world
/// (writing output, decoding entries, validating a custom layout).
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid journal entry: {0}")]
    InvalidEntry(String),

    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;

#[cfg(feature = "serde")]
impl From<serde_json::Error> for PdfError {
    fn from(err: serde_json::Error) -> Self {
        PdfError::InvalidEntry(err.to_string())
    }
}
