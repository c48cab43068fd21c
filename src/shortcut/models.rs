//! Data models for Shortcut stories and epics.

use serde::Deserialize;

/// Story fields consumed by the sync.
///
/// Other payload fields, including the story's own `id`, are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    /// Names of the labels attached to the story.
    pub labels: Vec<String>,
    /// Parent epic, if the story belongs to one.
    pub epic_id: Option<u64>,
}

/// Epic fields consumed by the sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Epic {
    /// Names of the labels attached to the epic.
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiStory {
    #[serde(default)]
    pub(super) labels: Vec<ApiLabel>,
    pub(super) epic_id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiEpic {
    #[serde(default)]
    pub(super) labels: Vec<ApiLabel>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiLabel {
    pub(super) name: String,
}

fn label_names(labels: Vec<ApiLabel>) -> Vec<String> {
    labels.into_iter().map(|label| label.name).collect()
}

impl From<ApiStory> for Story {
    fn from(value: ApiStory) -> Self {
        Self {
            labels: label_names(value.labels),
            epic_id: value.epic_id,
        }
    }
}

impl From<ApiEpic> for Epic {
    fn from(value: ApiEpic) -> Self {
        Self {
            labels: label_names(value.labels),
        }
    }
}
