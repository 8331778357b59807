use thiserror::Error;

/// Failures that abort a relay request.
///
/// Schema-patch and per-field projection failures never show up here: they
/// are logged and absorbed where they happen.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing {0} environment variable")]
    Configuration(&'static str),

    #[error("Invalid JSON in request body: {0}")]
    MalformedRequest(String),

    #[error("Database access error ({status}): {body}")]
    SchemaRead { status: u16, body: String },

    #[error("No title property found in database schema")]
    MissingTitleColumn,

    #[error("Notion API error ({status}): {body}")]
    RowSubmission { status: u16, body: String },

    #[error("Relay error: {0}")]
    Unexpected(String),
}

impl RelayError {
    /// HTTP status the entry point should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Configuration(_) | Self::MalformedRequest(_) | Self::MissingTitleColumn => 400,
            Self::SchemaRead { status, .. } | Self::RowSubmission { status, .. } => *status,
            Self::Unexpected(_) => 500,
        }
    }
}

/// Failures reported by a [`TableClient`](crate::TableClient).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode response: {0}")]
    Decode(String),
}
