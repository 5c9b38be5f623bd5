//! Error types for the hospital dashboard

/// Errors that can occur in the hospital dashboard
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error(
        "API error ({status}): {}",
        .message.as_deref().unwrap_or("no message from server")
    )]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("Invalid state for operation: {0}")]
    InvalidState(String),
}

impl DashboardError {
    /// The message the server attached to a failed call, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            DashboardError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
