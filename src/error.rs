//! Error types shared by the label sync task and its gateways.

use std::fmt;

use thiserror::Error;

/// Remote service a request was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// The Shortcut project-management API.
    Shortcut,
    /// The GitHub REST API.
    GitHub,
}

impl fmt::Display for Service {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shortcut => formatter.write_str("Shortcut"),
            Self::GitHub => formatter.write_str("GitHub"),
        }
    }
}

/// Errors surfaced while configuring or running a label sync.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// A required API credential was not supplied by any source.
    #[error("no credential configured: set '{name}'")]
    MissingCredential {
        /// Environment variable the credential is usually read from.
        name: &'static str,
    },

    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The CI event payload could not be read or lacks pull request data.
    #[error("invalid event payload: {message}")]
    InvalidEvent {
        /// Details about what is missing or malformed.
        message: String,
    },

    /// The repository owner, name, or issue number is unusable.
    #[error("invalid issue target: {message}")]
    InvalidIssueTarget {
        /// Which part of the target was rejected.
        message: String,
    },

    /// The remote service rejected the credential.
    #[error("{service} rejected the credential: {message}")]
    Authentication {
        /// Service that returned the 401/403 response.
        service: Service,
        /// Error message returned with the response.
        message: String,
    },

    /// The remote service returned an error or an unreadable response.
    #[error("{service} API error: {message}")]
    Api {
        /// Service that produced the error.
        service: Service,
        /// Status and body detail describing the failure.
        message: String,
    },

    /// Networking failed before a response was received.
    #[error("network error talking to {service}: {message}")]
    Network {
        /// Service the request was addressed to.
        service: Service,
        /// Transport-level error detail.
        message: String,
    },

    /// GitHub refused the request because the rate limit is exhausted.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Error message from GitHub.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}
