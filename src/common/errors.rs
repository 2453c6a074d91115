use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable {0} must be set")]
    Missing(&'static str),

    #[error("Environment variable {key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend responded {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },

    #[error("Backend rejected the request: {}", message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response carried no data")]
    MissingData,

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid path segment {0:?}")]
    InvalidSegment(String),
}

impl BackendError {
    /// The backend's own `message`, when it sent one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } | Self::Rejected { message } => message.as_deref(),
            _ => None,
        }
    }

    /// Toast text: the backend message, else the call-site fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        self.message()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum StagingError {
    #[error("Image {0} is not part of this listing")]
    UnknownImage(String),

    #[error("New image index {index} out of range (have {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Email delivery is not configured")]
    NotConfigured,

    #[error("Email request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Email provider responded {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Template error: {0}")]
    Template(String),
}

#[derive(Error, Debug)]
pub enum CommentsError {
    #[error("Comments API is not configured")]
    NotConfigured,

    #[error("Comments request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Comments API responded {status}")]
    Status { status: u16, body: serde_json::Value },
}

/// Failure of an admin form submit: blocked locally, or refused by the backend.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] FormError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl SubmitError {
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Invalid(e) => e.to_string(),
            Self::Backend(e) => e.user_message(fallback),
        }
    }
}
