//! Copies Shortcut story labels onto GitHub pull requests.
//!
//! The library reads a story identifier (`sc-<digits>`) from a pull
//! request's head branch, looks up the story's labels and those of its epic
//! in Shortcut, keeps the ones on an allow-list, and adds them to the pull
//! request through the GitHub issues API.

pub mod branch;
pub mod config;
pub mod context;
pub mod error;
pub mod github;
pub mod labels;
pub mod shortcut;
pub mod sync;
pub mod telemetry;

pub use branch::StoryId;
pub use config::LabelSyncConfig;
pub use context::{IssueTarget, LabelSyncRequest, PullRequestEvent};
pub use error::{Service, SyncError};
pub use github::{GitHubToken, IssueLabelGateway, OctocrabLabelGateway};
pub use labels::{AllowList, select_labels};
pub use shortcut::{Epic, ReqwestStoryGateway, ShortcutToken, Story, StoryGateway};
pub use sync::{LabelSync, SyncOutcome, sync_pull_request};
