//! Closed error kinds for the portal API boundary. Transport failures are
//! mapped into these variants as soon as a call resolves; nothing deeper in
//! the flows branches on raw reqwest errors or response bodies.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiError {
    /// The server could not be reached at all.
    Network(String),
    /// The server answered with a non-success status.
    Http { status: u16, message: String },
    /// The response body could not be decoded.
    Parse(String),
}

impl ApiError {
    /// HTTP status of the failure, when the server produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 4xx responses, the statuses the flows treat as the server
    /// rejecting the submitted values rather than failing.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|status| (400..500).contains(&status))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(message) => write!(formatter, "Network error: {message}"),
            ApiError::Http { status, message } => {
                write!(formatter, "Request failed ({status}): {message}")
            }
            ApiError::Parse(message) => write!(formatter, "Response error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}
