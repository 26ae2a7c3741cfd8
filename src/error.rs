use thiserror::Error;

/// Main error type for a library audit
#[derive(Error, Debug)]
pub enum AuditError {
    /// Missing or inconsistent configuration (raised before any network call)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The Web API rejected the key
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Username or Steam ID did not resolve to a profile
    #[error("Could not resolve profile: {0}")]
    ProfileResolution(String),

    /// Non-success HTTP status from an endpoint
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// Endpoint answered but the payload was unusable
    #[error("{endpoint} error: {message}")]
    Api { endpoint: String, message: String },

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system errors (dump file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuditError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            AuditError::Status { status, .. } => Some(*status),
            AuditError::HttpRequest(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AuditError>;
