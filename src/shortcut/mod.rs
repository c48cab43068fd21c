//! Shortcut story and epic lookup.
//!
//! The [`StoryGateway`] trait keeps the sync task independent of HTTP so it
//! can be exercised with mocks; [`ReqwestStoryGateway`] is the production
//! implementation talking to the Shortcut REST API v3.

mod client;
mod models;

pub use client::{DEFAULT_SHORTCUT_API_URL, ReqwestStoryGateway};
pub use models::{Epic, Story};

use async_trait::async_trait;

use crate::branch::StoryId;
use crate::error::SyncError;

/// Environment variable conventionally holding the Shortcut credential.
pub const SHORTCUT_TOKEN_ENV: &str = "SHORTCUT_API_TOKEN";

/// Gateway that can load Shortcut stories and epics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryGateway: Send + Sync {
    /// Fetch a story by identifier.
    async fn story(&self, story_id: &StoryId) -> Result<Story, SyncError>;

    /// Fetch an epic by identifier.
    async fn epic(&self, epic_id: u64) -> Result<Epic, SyncError>;
}

/// Shortcut API token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct ShortcutToken(String);

impl ShortcutToken {
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
                name: SHORTCUT_TOKEN_ENV,
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

impl std::fmt::Debug for ShortcutToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("ShortcutToken(<redacted>)")
    }
}
