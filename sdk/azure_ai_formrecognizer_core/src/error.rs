use thiserror::Error;

/// Errors that can occur when interacting with the Form Recognizer API.
#[derive(Error, Debug)]
pub enum FormRecognizerError {
    /// A required configuration value or argument was never supplied.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// A supplied argument failed format or grammar validation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The endpoint URL is invalid.
    #[error("Invalid endpoint URL: {message}")]
    InvalidEndpoint {
        message: String,
        #[source]
        source: Option<url::ParseError>,
    },

    /// The request failed due to an HTTP error.
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// The API returned an error response.
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A payload could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request failed at the transport level.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// A long-running operation reached the failed state.
    #[error("Operation failed ({code}): {message}")]
    OperationFailed { code: String, message: String },

    /// The blocking runtime or a custom transport failed.
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Broad classification of a [`FormRecognizerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A mandatory configuration value or argument was never supplied.
    MissingField,
    /// A supplied value failed format or grammar validation.
    InvalidArgument,
    /// The remote call could not complete.
    Runtime,
}

impl FormRecognizerError {
    /// Create an [`InvalidEndpoint`](Self::InvalidEndpoint) error without a parse source.
    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            message: message.into(),
            source: None,
        }
    }

    /// Create an [`InvalidEndpoint`](Self::InvalidEndpoint) error wrapping a URL parse error.
    pub fn invalid_endpoint_with_source(message: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidEndpoint {
            message: format!("{}: {source}", message.into()),
            source: Some(source),
        }
    }

    /// Create an [`Http`](Self::Http) error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingConfig(_) => ErrorKind::MissingField,
            Self::InvalidArgument(_) | Self::InvalidEndpoint { .. } => ErrorKind::InvalidArgument,
            _ => ErrorKind::Runtime,
        }
    }
}

/// Result type alias for Form Recognizer operations.
pub type FormRecognizerResult<T> = std::result::Result<T, FormRecognizerError>;
