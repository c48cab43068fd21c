//! The label sync task: branch name to story labels to pull request labels.

use crate::branch::StoryId;
use crate::config::LabelSyncConfig;
use crate::context::LabelSyncRequest;
use crate::error::SyncError;
use crate::github::{IssueLabelGateway, OctocrabLabelGateway};
use crate::labels::select_labels;
use crate::shortcut::{ReqwestStoryGateway, StoryGateway};

/// What a completed sync did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The head ref names no story; nothing was fetched.
    NoStoryId,
    /// The story was inspected but none of its labels are allowed.
    NothingToAdd {
        /// Story named by the head ref.
        story: StoryId,
        /// Story labels followed by epic labels.
        collected: Vec<String>,
    },
    /// Labels were added to the pull request.
    LabelsAdded {
        /// Story named by the head ref.
        story: StoryId,
        /// Labels sent to GitHub, in collection order.
        labels: Vec<String>,
    },
}

/// Copies allowed Shortcut labels onto a pull request using two gateways.
pub struct LabelSync<'client, Stories, Issues>
where
    Stories: StoryGateway,
    Issues: IssueLabelGateway,
{
    stories: &'client Stories,
    issues: &'client Issues,
}

impl<'client, Stories, Issues> LabelSync<'client, Stories, Issues>
where
    Stories: StoryGateway,
    Issues: IssueLabelGateway,
{
    /// Create a new task using the provided gateways.
    #[must_use]
    pub const fn new(stories: &'client Stories, issues: &'client Issues) -> Self {
        Self { stories, issues }
    }

    /// Run the sync for one pull request.
    ///
    /// A head ref without a story marker is not an error: the task logs a
    /// warning and returns [`SyncOutcome::NoStoryId`] without any request.
    ///
    /// # Errors
    ///
    /// Propagates any failure from either gateway unchanged.
    pub async fn run(&self, request: &LabelSyncRequest) -> Result<SyncOutcome, SyncError> {
        let Some(story) = StoryId::from_head_ref(request.head_ref()) else {
            tracing::warn!("Unable to find story ID in '{}'", request.head_ref());
            return Ok(SyncOutcome::NoStoryId);
        };
        tracing::info!("Determined story ID: {story}");

        let collected = self.collect_labels(&story).await?;
        tracing::info!("Story labels: {}", collected.join(","));

        let labels = select_labels(&collected, request.allow_list());
        tracing::info!("Labels to add: {}", labels.join(","));

        if labels.is_empty() {
            tracing::info!("No labels to add. Skipping.");
            return Ok(SyncOutcome::NothingToAdd { story, collected });
        }

        let issue = request.issue();
        let applied = self.issues.add_labels(issue, &labels).await?;
        tracing::info!(
            "Successfully added labels to {}/{}#{}; issue now has: {}",
            issue.owner().as_str(),
            issue.repository().as_str(),
            issue.number().get(),
            applied.join(",")
        );

        Ok(SyncOutcome::LabelsAdded { story, labels })
    }

    async fn collect_labels(&self, story_id: &StoryId) -> Result<Vec<String>, SyncError> {
        let story = self.stories.story(story_id).await?;
        let mut labels = story.labels;

        if let Some(epic_id) = story.epic_id {
            let epic = self.stories.epic(epic_id).await?;
            tracing::debug!("Epic {epic_id} labels: {}", epic.labels.join(","));
            labels.extend(epic.labels);
        }

        Ok(labels)
    }
}

/// Resolves credentials, builds both production gateways, and runs the sync.
///
/// The Shortcut token is resolved before anything else, so a missing token
/// fails the run without any network request, whatever the head ref. The
/// GitHub token is only required once the head ref names a story.
///
/// # Errors
///
/// Returns [`SyncError::MissingCredential`] when a required token is absent,
/// [`SyncError::Configuration`] when a client cannot be built, and any error
/// from [`LabelSync::run`].
pub async fn sync_pull_request(
    config: &LabelSyncConfig,
    request: &LabelSyncRequest,
) -> Result<SyncOutcome, SyncError> {
    let shortcut_token = config.resolve_shortcut_token()?;

    if StoryId::from_head_ref(request.head_ref()).is_none() {
        tracing::warn!("Unable to find story ID in '{}'", request.head_ref());
        return Ok(SyncOutcome::NoStoryId);
    }

    let github_token = config.resolve_github_token()?;

    let stories = ReqwestStoryGateway::for_token(&shortcut_token, config.shortcut_api_url())?;
    let issues = OctocrabLabelGateway::for_token(&github_token, &config.github_api_url())?;

    LabelSync::new(&stories, &issues).run(request).await
}
