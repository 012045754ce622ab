use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store server error (status {status}): {body}")]
    Server { status: u16, body: String },

    #[error("invalid store URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid bill input: {0}")]
    Bill(#[from] parlamento_bills::BillError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PublishError {
    /// Failures worth another attempt: no response at all, or a 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            PublishError::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            PublishError::Server { .. } => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, PublishError>;
