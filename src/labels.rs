//! Allow-list handling and label selection.

/// Label names a sync is permitted to copy onto a pull request.
///
/// An empty allow-list is valid and selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList(Vec<String>);

impl AllowList {
    /// Creates an allow-list from label names.
    #[must_use]
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// Parses a comma-separated list such as `bug, needs-review`.
    ///
    /// Entries are trimmed and blank entries are dropped. Every comma
    /// separates entries, so a name containing a comma cannot be expressed
    /// here; use [`AllowList::new`] for such names.
    #[must_use]
    pub fn parse_comma_separated(raw: &str) -> Self {
        Self::new(
            raw.split(',')
                .map(str::trim)
                .filter(|label| !label.is_empty()),
        )
    }

    /// Whether the allow-list permits the given label name.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|allowed| allowed == label)
    }

    /// Whether the allow-list has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the label names.
    #[must_use]
    pub const fn as_slice(&self) -> &[String] {
        self.0.as_slice()
    }
}

/// Keeps the collected label names that the allow-list permits.
///
/// Order follows the collected sequence and repeated names are kept, so a
/// label present on both the story and its epic appears twice.
#[must_use]
pub fn select_labels(collected: &[String], allow_list: &AllowList) -> Vec<String> {
    collected
        .iter()
        .filter(|label| allow_list.contains(label))
        .cloned()
        .collect()
}
