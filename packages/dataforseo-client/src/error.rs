use thiserror::Error;

/// Errors returned by the DataForSEO client.
#[derive(Debug, Error)]
pub enum DataForSeoError {
    /// Transport failure (connect, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx HTTP status or a non-20000 envelope status
    #[error("DataForSEO API error {status}: {message}")]
    Api { status: u16, message: String },

    /// A single task inside an otherwise successful envelope failed
    #[error("DataForSEO task error {status}: {message}")]
    Task { status: i64, message: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid date: {0}")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, DataForSeoError>;
