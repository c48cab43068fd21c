//! Story identifier extraction from pull request head refs.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

#[expect(
    clippy::expect_used,
    reason = "the pattern is a literal and is covered by unit tests"
)]
static STORY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("sc-([0-9]*)").expect("story pattern should compile"));

/// Shortcut story identifier as written in the branch name.
///
/// The digits are kept verbatim so the API path matches what the branch
/// author typed, leading zeros included.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoryId(String);

impl StoryId {
    /// Extracts the story identifier from a head ref such as
    /// `feature/sc-42-login`.
    ///
    /// Only the first `sc-` occurrence is considered. Returns `None` when the
    /// ref has no `sc-` marker or when the first marker is not followed by a
    /// digit.
    ///
    /// # Example
    ///
    /// ```
    /// use story_label_sync::StoryId;
    ///
    /// let story = StoryId::from_head_ref("feature/sc-42-login");
    /// assert_eq!(story.as_ref().map(StoryId::as_str), Some("42"));
    /// ```
    #[must_use]
    pub fn from_head_ref(head_ref: &str) -> Option<Self> {
        STORY_PATTERN
            .captures(head_ref)
            .and_then(|captures| captures.get(1))
            .map(|digits| digits.as_str())
            .filter(|digits| !digits.is_empty())
            .map(|digits| Self(digits.to_owned()))
    }

    /// Borrow the identifier digits.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
