//! Octocrab implementation of the issue label gateway.

use async_trait::async_trait;
use http::Uri;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

use crate::context::IssueTarget;
use crate::error::SyncError;

use super::error_mapping::map_octocrab_error;
use super::{GitHubToken, IssueLabelGateway};

/// Public GitHub REST API endpoint.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Octocrab-backed gateway.
pub struct OctocrabLabelGateway {
    client: Octocrab,
}

impl OctocrabLabelGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an authenticated Octocrab client for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`] when the base URI cannot be
    /// parsed, or an API error when Octocrab fails to construct a client.
    pub fn for_token(token: &GitHubToken, api_base: &str) -> Result<Self, SyncError> {
        build_octocrab_client(token, api_base).map(Self::new)
    }
}

fn build_octocrab_client(token: &GitHubToken, api_base: &str) -> Result<Octocrab, SyncError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| SyncError::Configuration {
            message: format!("GitHub API URL '{api_base}' is invalid: {error}"),
        })?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| SyncError::Configuration {
            message: format!("GitHub API URL '{api_base}' is unusable: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}

#[derive(Debug, Serialize)]
struct AddLabelsBody<'a> {
    labels: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ApiLabel {
    name: String,
}

#[async_trait]
impl IssueLabelGateway for OctocrabLabelGateway {
    async fn add_labels(
        &self,
        issue: &IssueTarget,
        labels: &[String],
    ) -> Result<Vec<String>, SyncError> {
        let body = AddLabelsBody { labels };
        let applied = self
            .client
            .post::<_, Vec<ApiLabel>>(issue.labels_path(), Some(&body))
            .await
            .map_err(|error| map_octocrab_error("add labels", &error))?;

        Ok(applied.into_iter().map(|label| label.name).collect())
    }
}
