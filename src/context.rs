//! Pull request context passed explicitly into the label sync task.
//!
//! A [`LabelSyncRequest`] carries everything the task needs to know about
//! the triggering pull request. It is usually assembled from the GitHub
//! Actions event payload ([`PullRequestEvent`]) merged with configuration
//! overrides, but tests and other callers can build one directly.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Deserialize;

use crate::error::SyncError;
use crate::labels::AllowList;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidIssueTarget`] for a blank owner.
    pub fn new(value: &str) -> Result<Self, SyncError> {
        if value.trim().is_empty() {
            return Err(SyncError::InvalidIssueTarget {
                message: "repository owner must not be empty".to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the repository name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidIssueTarget`] for a blank name.
    pub fn new(value: &str) -> Result<Self, SyncError> {
        if value.trim().is_empty() {
            return Err(SyncError::InvalidIssueTarget {
                message: "repository name must not be empty".to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Issue (or pull request) number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueNumber(u64);

impl IssueNumber {
    /// Validates that the number is positive.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidIssueTarget`] for zero.
    pub fn new(value: u64) -> Result<Self, SyncError> {
        if value == 0 {
            return Err(SyncError::InvalidIssueTarget {
                message: "issue number must be a positive integer".to_owned(),
            });
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// The issue that labels are applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTarget {
    owner: RepositoryOwner,
    repository: RepositoryName,
    number: IssueNumber,
}

impl IssueTarget {
    /// Builds a target from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidIssueTarget`] when the owner or repository
    /// is blank or the number is zero.
    pub fn new(owner: &str, repository: &str, number: u64) -> Result<Self, SyncError> {
        Ok(Self {
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repository)?,
            number: IssueNumber::new(number)?,
        })
    }

    /// Builds a target from an `owner/repo` slug, as found in
    /// `GITHUB_REPOSITORY`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidIssueTarget`] when the slug is not exactly
    /// two non-empty segments or the number is zero.
    pub fn from_repository_slug(slug: &str, number: u64) -> Result<Self, SyncError> {
        let mut segments = slug.split('/');
        let (Some(owner), Some(repository), None) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(SyncError::InvalidIssueTarget {
                message: format!("repository must look like owner/repo, got '{slug}'"),
            });
        };
        Self::new(owner, repository, number)
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Issue number.
    #[must_use]
    pub const fn number(&self) -> IssueNumber {
        self.number
    }

    pub(crate) fn labels_path(&self) -> String {
        format!(
            "/repos/{}/{}/issues/{}/labels",
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }
}

/// Everything the label sync task needs about the triggering pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSyncRequest {
    head_ref: String,
    issue: IssueTarget,
    allow_list: AllowList,
}

impl LabelSyncRequest {
    /// Creates a request with an empty allow-list.
    #[must_use]
    pub fn new(head_ref: impl Into<String>, issue: IssueTarget) -> Self {
        Self {
            head_ref: head_ref.into(),
            issue,
            allow_list: AllowList::default(),
        }
    }

    /// Replaces the allow-list.
    #[must_use]
    pub fn with_allow_list(mut self, allow_list: AllowList) -> Self {
        self.allow_list = allow_list;
        self
    }

    /// Head branch name of the pull request.
    #[must_use]
    pub const fn head_ref(&self) -> &str {
        self.head_ref.as_str()
    }

    /// Issue receiving the labels.
    #[must_use]
    pub const fn issue(&self) -> &IssueTarget {
        &self.issue
    }

    /// Labels permitted to be copied.
    #[must_use]
    pub const fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }
}

/// The fields of a GitHub Actions `pull_request` event payload that the
/// sync consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    /// Head branch name.
    pub head_ref: String,
    /// Pull request number.
    pub number: u64,
    /// Repository owner login, when the payload includes it.
    pub owner: Option<String>,
    /// Repository name, when the payload includes it.
    pub repository: Option<String>,
}

impl PullRequestEvent {
    /// Reads and parses the event payload file written by the runner.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] when the file cannot be read, or
    /// [`SyncError::InvalidEvent`] when its content is not a pull request
    /// event.
    pub fn from_path(path: &Utf8Path) -> Result<Self, SyncError> {
        let parent = path
            .parent()
            .filter(|dir| !dir.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let file_name = path.file_name().ok_or_else(|| SyncError::Io {
            message: format!("invalid event payload path '{path}': no file name"),
        })?;

        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
            SyncError::Io {
                message: format!("failed to open event payload directory '{parent}': {error}"),
            }
        })?;
        let raw = dir
            .read_to_string(file_name)
            .map_err(|error| SyncError::Io {
                message: format!("failed to read event payload '{path}': {error}"),
            })?;
        Self::from_json(&raw)
    }

    /// Parses an event payload.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidEvent`] when the JSON is malformed or has
    /// no `pull_request` object.
    pub fn from_json(raw: &str) -> Result<Self, SyncError> {
        let payload: ApiEventPayload =
            serde_json::from_str(raw).map_err(|error| SyncError::InvalidEvent {
                message: error.to_string(),
            })?;
        let pull_request = payload
            .pull_request
            .ok_or_else(|| SyncError::InvalidEvent {
                message: "payload has no pull_request object".to_owned(),
            })?;
        let number = pull_request
            .number
            .or(payload.number)
            .ok_or_else(|| SyncError::InvalidEvent {
                message: "payload has no pull request number".to_owned(),
            })?;

        let (owner, repository) = payload.repository.map_or((None, None), |repo| {
            (repo.owner.and_then(|owner| owner.login), repo.name)
        });

        Ok(Self {
            head_ref: pull_request.head.git_ref,
            number,
            owner,
            repository,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ApiEventPayload {
    number: Option<u64>,
    pull_request: Option<ApiPullRequest>,
    repository: Option<ApiRepository>,
}

#[derive(Debug, Deserialize)]
struct ApiPullRequest {
    number: Option<u64>,
    head: ApiHead,
}

#[derive(Debug, Deserialize)]
struct ApiHead {
    #[serde(rename = "ref")]
    git_ref: String,
}

#[derive(Debug, Deserialize)]
struct ApiRepository {
    name: Option<String>,
    owner: Option<ApiOwner>,
}

#[derive(Debug, Deserialize)]
struct ApiOwner {
    login: Option<String>,
}
