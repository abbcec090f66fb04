//! Error types

/// Directory client errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connectivity or timeout failure before a response was received
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx status, or a 2xx body that could not be parsed
    #[error("Response error: {message}")]
    Response {
        /// HTTP status, when the server answered with a non-2xx code
        status: Option<u16>,
        /// Details
        message: String,
    },

    /// Query parameters rejected before any I/O
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl Error {
    /// HTTP status carried by a response error
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Response { status, .. } => *status,
            _ => None,
        }
    }

    /// True for connectivity / timeout failures
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return Error::Response {
                status: Some(status.as_u16()),
                message: e.to_string(),
            };
        }
        if e.is_decode() {
            return Error::Response {
                status: None,
                message: format!("Malformed payload: {}", e),
            };
        }
        Error::Transport(e.to_string())
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
