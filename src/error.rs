//! Error types for the search workspace and proxy

use thiserror::Error;

use crate::types::EngineKey;

/// Result type alias for workspace and proxy operations
pub type Result<T> = std::result::Result<T, PaneError>;

/// Error types for workspace and proxy operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaneError {
    /// The registry already holds the maximum number of engines
    #[error("Can only compare up to {limit} search engines at a time")]
    CapacityExceeded { limit: usize },

    /// Removing or hiding would leave no active engine
    #[error("At least one search engine must stay active")]
    LastEngine,

    /// No active engine carries this key
    #[error("No active search engine with key {0}")]
    EngineNotFound(EngineKey),

    /// Engine name outside the supported set
    #[error("Unknown search engine: {0}")]
    UnknownEngine(String),

    /// URL could not be parsed or resolved
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Upstream HTTP request failed
    #[error("HTTP request failed: {message}")]
    HttpError {
        message: String,
        status_code: Option<u16>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl From<url::ParseError> for PaneError {
    fn from(error: url::ParseError) -> Self {
        PaneError::InvalidUrl(error.to_string())
    }
}

impl From<reqwest::Error> for PaneError {
    fn from(error: reqwest::Error) -> Self {
        PaneError::HttpError {
            message: error.to_string(),
            status_code: error.status().map(|s| s.as_u16()),
        }
    }
}

impl From<std::io::Error> for PaneError {
    fn from(error: std::io::Error) -> Self {
        PaneError::Io(error.to_string())
    }
}

/// A user-facing informational message for rejected actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

impl PaneError {
    /// Turn a recoverable rejection into the message shown to the user.
    ///
    /// Returns `None` for errors that are not meant to reach the user.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            PaneError::CapacityExceeded { .. } => Some(Notice {
                title: self.to_string(),
                description:
                    "You can remove one of the existing search engines to add a new one."
                        .to_string(),
            }),
            PaneError::LastEngine => Some(Notice {
                title: self.to_string(),
                description: "Add another search engine before removing this one.".to_string(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_notice_mentions_limit() {
        let notice = PaneError::CapacityExceeded { limit: 4 }.notice().unwrap();
        assert!(notice.title.contains("up to 4"));
        assert!(notice.description.contains("remove one"));
    }

    #[test]
    fn test_internal_errors_have_no_notice() {
        assert!(PaneError::InvalidUrl("x".to_string()).notice().is_none());
        assert!(PaneError::EngineNotFound(EngineKey(3)).notice().is_none());
    }

    #[test]
    fn test_url_parse_error_conversion() {
        let err: PaneError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, PaneError::InvalidUrl(_)));
    }
}
