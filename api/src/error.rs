use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network error for {url}: {source}")]
    Network {
        url: String,
        source: reqwest::Error,
    },

    #[error("store returned {status} for {url}: {message}")]
    Api {
        url: String,
        status: u16,
        message: String,
    },

    #[error("permission denied for {url}")]
    PermissionDenied { url: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("parse error for {url}: {message}")]
    Parsing { url: String, message: String },
}

impl StoreError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, StoreError::PermissionDenied { .. })
    }
}
