use std::fmt;

/// Category of a rejected call to the generation service, derived from the HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// 401: credential rejected
    Unauthorized,
    /// 429: too many requests
    RateLimited,
    /// 403: credential lacks permission
    Forbidden,
    /// Any other non-success status
    Unknown,
}

impl ServiceErrorKind {
    /// Map an HTTP status code to a service error category
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            429 => Self::RateLimited,
            403 => Self::Forbidden,
            _ => Self::Unknown,
        }
    }

    /// Stable machine-readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::RateLimited => "rate_limited",
            Self::Forbidden => "forbidden",
            Self::Unknown => "unknown",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::Unauthorized => "invalid API key",
            Self::RateLimited => "rate limit exceeded, try again later",
            Self::Forbidden => "access forbidden, check API key permissions",
            Self::Unknown => "request failed",
        }
    }
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// StudyCards error types
#[derive(Debug, thiserror::Error)]
pub enum StudyCardsError {
    /// Configuration error (missing credential, bad settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generation service rejected the request
    #[error("Generation service error ({status}): {kind}")]
    Service {
        kind: ServiceErrorKind,
        status: u16,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// Service output could not be parsed by any extraction strategy
    #[error("Malformed response from generation service")]
    MalformedResponse {
        /// Original payload, kept for logging
        raw: String,
    },

    /// Parsed output is missing a required field
    #[error("Invalid response shape: missing or invalid `{field}`")]
    InvalidShape { field: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network/HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StudyCardsError {
    /// Create configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create service error from an HTTP status and its response body
    pub fn service<S: Into<String>>(status: u16, body: S) -> Self {
        Self::Service {
            kind: ServiceErrorKind::from_status(status),
            status,
            body: body.into(),
        }
    }

    /// Create malformed response error
    pub fn malformed<S: Into<String>>(raw: S) -> Self {
        Self::MalformedResponse { raw: raw.into() }
    }

    /// Create invalid shape error
    pub fn invalid_shape<S: Into<String>>(field: S) -> Self {
        Self::InvalidShape {
            field: field.into(),
        }
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Whether a caller may retry the same request after backing off.
    /// Only rate limiting qualifies; nothing is retried internally.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Service {
                kind: ServiceErrorKind::RateLimited,
                ..
            }
        )
    }

    /// Short machine-readable name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Service { kind, .. } => kind.as_str(),
            Self::MalformedResponse { .. } => "malformed_response",
            Self::InvalidShape { .. } => "invalid_shape",
            Self::InvalidInput(_) => "invalid_input",
            Self::Network(_) => "network",
            Self::NotFound(_) => "not_found",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Other(_) => "internal",
        }
    }
}

// HTTP response conversion
impl StudyCardsError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Configuration(_) => 500,
            Self::Service {
                kind: ServiceErrorKind::RateLimited,
                ..
            } => 429,
            Self::Service { .. } => 502,
            Self::MalformedResponse { .. } => 502,
            Self::InvalidShape { .. } => 502,
            Self::Network(_) => 503,
            Self::Io(_) => 500,
            Self::Json(_) => 400,
            Self::Other(_) => 500,
        }
    }
}
