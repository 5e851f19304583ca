//! Error types for the file view.
//!
//! - [`ServiceError`] - failures reported by the backend service or transport
//! - [`ColumnError`] - invalid column registrations
//! - [`NavigationError`] - folder ids that cannot be resolved
//! - [`ConfigError`] - malformed session or localization data

use thiserror::Error;

/// Backend error codes the view reacts to.
pub mod codes {
    /// Requested folder does not exist.
    pub const FOLDER_NOT_FOUND: u32 = 203;
    /// Remote resource for "retrieve from URL" was not found.
    pub const RESOURCE_NOT_FOUND: u32 = 301;
}

/// Failure of a backend call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// Backend answered with an error envelope.
    #[error("backend error {code}: {message}")]
    Backend { code: u32, message: String },
    /// Request could not be sent or was aborted.
    #[error("network error: {0}")]
    Network(String),
    /// Request timed out.
    #[error("request timed out")]
    Timeout,
    /// Non-2xx response without a readable error envelope.
    #[error("HTTP error: {0}")]
    Http(u16),
    /// Response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Backend error code, if the backend reported one.
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::Backend { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Shorthand for a backend error with the given code.
    pub fn backend(code: u32, message: impl Into<String>) -> Self {
        Self::Backend {
            code,
            message: message.into(),
        }
    }
}

/// Invalid column registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
    #[error("column id must not be empty")]
    EmptyId,
    #[error("column `{0}` is already registered")]
    Duplicate(String),
    #[error("column `{0}` has a minimum width larger than its width")]
    InvalidWidth(String),
}

/// Folder id that cannot be navigated to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// Multi-segment id whose prefix is not a registered folder type.
    #[error("unknown folder id `{0}`")]
    InvalidFolderId(String),
}

/// Malformed configuration data.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid session data: {0}")]
    Session(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_code() {
        let err = ServiceError::backend(codes::FOLDER_NOT_FOUND, "not found");
        assert_eq!(err.code(), Some(203));
        assert_eq!(err.to_string(), "backend error 203: not found");
        assert_eq!(ServiceError::Http(500).code(), None);
    }
}
