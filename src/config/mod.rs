//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.label-sync.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `LABEL_SYNC_*`, then the conventional CI
//!    variables (`SHORTCUT_API_TOKEN`, `GITHUB_TOKEN`, `GITHUB_EVENT_PATH`,
//!    `GITHUB_REPOSITORY`, `GITHUB_API_URL`) as fallbacks
//! 4. **Command-line arguments** – `--allowed-labels`/`-l`,
//!    `--head-ref`/`-b`, `--repository`/`-r`, `--issue-number`/`-n`, ...
//!
//! # Configuration File
//!
//! ```toml
//! allowed_labels = "bug,needs-review"
//! shortcut_api_url = "https://api.app.shortcut.com"
//! github_api_url = "https://api.github.com"
//! ```

use std::env;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::context::{IssueTarget, LabelSyncRequest, PullRequestEvent};
use crate::error::SyncError;
use crate::github::{DEFAULT_GITHUB_API_URL, GITHUB_TOKEN_ENV, GitHubToken};
use crate::labels::AllowList;
use crate::shortcut::{DEFAULT_SHORTCUT_API_URL, SHORTCUT_TOKEN_ENV, ShortcutToken};

/// Event payload path set by the GitHub Actions runner.
pub const GITHUB_EVENT_PATH_ENV: &str = "GITHUB_EVENT_PATH";
/// `owner/repo` slug set by the GitHub Actions runner.
pub const GITHUB_REPOSITORY_ENV: &str = "GITHUB_REPOSITORY";
/// API endpoint set by the GitHub Actions runner (differs on GHES).
pub const GITHUB_API_URL_ENV: &str = "GITHUB_API_URL";

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `LABEL_SYNC_SHORTCUT_TOKEN` or `SHORTCUT_API_TOKEN`: Shortcut credential
/// - `LABEL_SYNC_GITHUB_TOKEN` or `GITHUB_TOKEN`: GitHub credential
/// - `LABEL_SYNC_ALLOWED_LABELS`: comma-separated allow-list
/// - `LABEL_SYNC_EVENT_PATH` or `GITHUB_EVENT_PATH`: event payload file
/// - `LABEL_SYNC_REPOSITORY` or `GITHUB_REPOSITORY`: `owner/repo`
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "LABEL_SYNC",
    discovery(
        dotfile_name = ".label-sync.toml",
        config_file_name = "label-sync.toml",
        app_name = "label-sync"
    )
)]
pub struct LabelSyncConfig {
    /// Shortcut API token.
    ///
    /// Can be provided via:
    /// - CLI: `--shortcut-token <TOKEN>`
    /// - Environment: `LABEL_SYNC_SHORTCUT_TOKEN` or `SHORTCUT_API_TOKEN`
    /// - Config file: `shortcut_token = "..."`
    #[ortho_config(cli_short = 's')]
    pub shortcut_token: Option<String>,

    /// GitHub token used to label the pull request.
    ///
    /// Can be provided via:
    /// - CLI: `--github-token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `LABEL_SYNC_GITHUB_TOKEN` or `GITHUB_TOKEN`
    /// - Config file: `github_token = "..."`
    #[ortho_config(cli_short = 't')]
    pub github_token: Option<String>,

    /// Comma-separated label names that may be copied to the pull request.
    ///
    /// Omitted means an empty allow-list, so nothing is ever added. Entries
    /// are split on every comma, so a label whose name contains a comma
    /// cannot be allowed through this setting.
    #[ortho_config(cli_short = 'l')]
    pub allowed_labels: Option<String>,

    /// Path to the GitHub Actions event payload.
    #[ortho_config(cli_short = 'e')]
    pub event_path: Option<String>,

    /// Head branch name, overriding the event payload.
    #[ortho_config(cli_short = 'b')]
    pub head_ref: Option<String>,

    /// Repository as `owner/repo`, overriding the event payload.
    #[ortho_config(cli_short = 'r')]
    pub repository: Option<String>,

    /// Pull request number, overriding the event payload.
    #[ortho_config(cli_short = 'n')]
    pub issue_number: Option<u64>,

    /// Shortcut API host, without the `/api/v3` suffix.
    #[ortho_config(cli_short = 'S')]
    pub shortcut_api_url: Option<String>,

    /// GitHub REST API endpoint.
    #[ortho_config(cli_short = 'G')]
    pub github_api_url: Option<String>,
}

impl LabelSyncConfig {
    /// Resolves the Shortcut token from configuration or the conventional
    /// `SHORTCUT_API_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingCredential`] when no source provides a
    /// non-blank value.
    pub fn resolve_shortcut_token(&self) -> Result<ShortcutToken, SyncError> {
        let value = self
            .shortcut_token
            .clone()
            .or_else(|| env::var(SHORTCUT_TOKEN_ENV).ok())
            .ok_or(SyncError::MissingCredential {
                name: SHORTCUT_TOKEN_ENV,
            })?;
        ShortcutToken::new(value)
    }

    /// Resolves the GitHub token from configuration or `GITHUB_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingCredential`] when no source provides a
    /// non-blank value.
    pub fn resolve_github_token(&self) -> Result<GitHubToken, SyncError> {
        let value = self
            .github_token
            .clone()
            .or_else(|| env::var(GITHUB_TOKEN_ENV).ok())
            .ok_or(SyncError::MissingCredential {
                name: GITHUB_TOKEN_ENV,
            })?;
        GitHubToken::new(value)
    }

    /// The configured allow-list, empty when none is set.
    #[must_use]
    pub fn allow_list(&self) -> AllowList {
        self.allowed_labels
            .as_deref()
            .map(AllowList::parse_comma_separated)
            .unwrap_or_default()
    }

    /// Shortcut API host.
    #[must_use]
    pub fn shortcut_api_url(&self) -> &str {
        self.shortcut_api_url
            .as_deref()
            .unwrap_or(DEFAULT_SHORTCUT_API_URL)
    }

    /// GitHub API endpoint from configuration, `GITHUB_API_URL`, or the
    /// public default.
    #[must_use]
    pub fn github_api_url(&self) -> String {
        self.github_api_url
            .clone()
            .or_else(|| env::var(GITHUB_API_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_owned())
    }

    /// Event payload path from configuration or `GITHUB_EVENT_PATH`.
    #[must_use]
    pub fn resolve_event_path(&self) -> Option<Utf8PathBuf> {
        self.event_path
            .clone()
            .or_else(|| env::var(GITHUB_EVENT_PATH_ENV).ok())
            .filter(|path| !path.trim().is_empty())
            .map(Utf8PathBuf::from)
    }

    /// Reads the event payload, if any, and builds the sync request.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] or [`SyncError::InvalidEvent`] when the
    /// payload cannot be used, and the errors of [`Self::build_request`].
    pub fn load_request(&self) -> Result<LabelSyncRequest, SyncError> {
        let event = self
            .resolve_event_path()
            .map(|path| PullRequestEvent::from_path(&path))
            .transpose()?;
        self.build_request(event.as_ref())
    }

    /// Merges explicit overrides with the event payload into a request.
    ///
    /// Overrides win over the payload. The repository falls back to
    /// `GITHUB_REPOSITORY` when neither source names it.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`] when the head ref, issue number,
    /// or repository has no source, and [`SyncError::InvalidIssueTarget`]
    /// when the resolved target is malformed.
    pub fn build_request(
        &self,
        event: Option<&PullRequestEvent>,
    ) -> Result<LabelSyncRequest, SyncError> {
        let head_ref = self
            .head_ref
            .clone()
            .or_else(|| event.map(|payload| payload.head_ref.clone()))
            .ok_or_else(|| missing_source("head ref", "--head-ref"))?;

        let number = self
            .issue_number
            .or_else(|| event.map(|payload| payload.number))
            .ok_or_else(|| missing_source("pull request number", "--issue-number"))?;

        let issue = self.resolve_issue_target(event, number)?;

        Ok(LabelSyncRequest::new(head_ref, issue).with_allow_list(self.allow_list()))
    }

    fn resolve_issue_target(
        &self,
        event: Option<&PullRequestEvent>,
        number: u64,
    ) -> Result<IssueTarget, SyncError> {
        if let Some(slug) = self.repository.as_deref() {
            return IssueTarget::from_repository_slug(slug, number);
        }

        let from_event = event.and_then(|payload| {
            payload
                .owner
                .as_deref()
                .zip(payload.repository.as_deref())
        });
        if let Some((owner, repository)) = from_event {
            return IssueTarget::new(owner, repository, number);
        }

        let slug = env::var(GITHUB_REPOSITORY_ENV)
            .map_err(|_| missing_source("repository", "--repository"))?;
        IssueTarget::from_repository_slug(&slug, number)
    }
}

fn missing_source(what: &str, flag: &str) -> SyncError {
    SyncError::Configuration {
        message: format!("{what} is required (use {flag} or provide a pull request event payload)"),
    }
}

#[cfg(test)]
mod tests;
