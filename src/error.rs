//! Scan error taxonomy
//!
//! Every failure of a scan attempt is expressed as a [`ScanError`]. The
//! session keeps only the [`ErrorKind`] in its state; the full error goes to
//! the log.

use thiserror::Error;

/// Why a scan attempt ended in `Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The image payload could not be read
    EncodingError,
    /// No response was received from the service
    NetworkError,
    /// A response was received but it indicates failure
    ServiceError,
    /// The service answered but had no suggestion for the image
    NoMatchFound,
}

impl ErrorKind {
    /// Short label for display and logs
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::EncodingError => "encoding error",
            ErrorKind::NetworkError => "network error",
            ErrorKind::ServiceError => "service error",
            ErrorKind::NoMatchFound => "no match found",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure of one stage of the identification pipeline
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read image: {0}")]
    Encoding(#[source] std::io::Error),

    #[error("request to classification service failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("classification service error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Service {
        /// HTTP status, when the failure came with one
        status: Option<u16>,
        message: String,
    },

    #[error("no plant matched the image")]
    NoMatch,
}

impl ScanError {
    /// Map to the reason retained in the session state
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScanError::Encoding(_) => ErrorKind::EncodingError,
            ScanError::Network(_) => ErrorKind::NetworkError,
            ScanError::Service { .. } => ErrorKind::ServiceError,
            ScanError::NoMatch => ErrorKind::NoMatchFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        assert_eq!(ScanError::Encoding(io).kind(), ErrorKind::EncodingError);
        assert_eq!(ScanError::NoMatch.kind(), ErrorKind::NoMatchFound);
        assert_eq!(
            ScanError::Service { status: Some(401), message: "unauthorized".into() }.kind(),
            ErrorKind::ServiceError
        );
    }

    #[test]
    fn test_service_error_display() {
        let with_status = ScanError::Service { status: Some(503), message: "busy".into() };
        assert_eq!(with_status.to_string(), "classification service error (503): busy");

        let without_status = ScanError::Service { status: None, message: "malformed body".into() };
        assert_eq!(without_status.to_string(), "classification service error: malformed body");
    }
}
