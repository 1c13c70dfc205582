use thiserror::Error;

/// Failure of a high-level `SessionClient` operation.
///
/// The `Display` text is the message shown to the user. Server-supplied
/// messages are passed through verbatim in `Rejected`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("{0}")]
    Rejected(String),

    #[error("Unknown error.")]
    Unknown,

    #[error("File upload cancelled.")]
    UploadCancelled,
}

impl ApiError {
    /// Use the server's message when it sent one, otherwise a generic error.
    pub fn from_message(message: Option<&str>) -> Self {
        match message {
            Some(message) => ApiError::Rejected(message.to_string()),
            None => ApiError::Unknown,
        }
    }

    /// Whether this failure means the stored token can no longer be trusted.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_message() {
        assert_eq!(
            ApiError::from_message(Some("Wrong password")),
            ApiError::Rejected("Wrong password".to_string())
        );
        assert_eq!(ApiError::from_message(None), ApiError::Unknown);
        assert_eq!(ApiError::Unknown.to_string(), "Unknown error.");
    }

    #[test]
    fn test_auth_failure() {
        assert!(ApiError::InvalidCredentials.is_auth_failure());
        assert!(!ApiError::UploadCancelled.is_auth_failure());
        assert!(!ApiError::Rejected("nope".into()).is_auth_failure());
    }
}
