//! GitHub issue labelling.
//!
//! Pull requests share their label set with the issue of the same number,
//! so labels are applied through the issues API.

mod client;
mod error_mapping;

pub use client::{DEFAULT_GITHUB_API_URL, OctocrabLabelGateway};

use async_trait::async_trait;

use crate::context::IssueTarget;
use crate::error::SyncError;

/// Environment variable conventionally holding the GitHub credential.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Gateway that can add labels to an issue or pull request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueLabelGateway: Send + Sync {
    /// Adds `labels` to the issue and returns the issue's full label set
    /// afterwards.
    async fn add_labels(
        &self,
        issue: &IssueTarget,
        labels: &[String],
    ) -> Result<Vec<String>, SyncError>;
}

/// GitHub token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct GitHubToken(String);

impl GitHubToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingCredential`] when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, SyncError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SyncError::MissingCredential {
                name: GITHUB_TOKEN_ENV,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for GitHubToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl std::fmt::Debug for GitHubToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("GitHubToken(<redacted>)")
    }
}
