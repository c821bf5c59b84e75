//! Construction error types

/// Errors that can occur while building a coordinator.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The validation endpoint is not a valid absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A caller-supplied header has an invalid name or value.
    #[error("Invalid header '{name}': {message}")]
    InvalidHeader {
        /// Header name as given.
        name: String,
        /// Why it was rejected.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl BuildError {
    /// Creates a new invalid header error.
    pub fn invalid_header(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.into(),
        }
    }
}
