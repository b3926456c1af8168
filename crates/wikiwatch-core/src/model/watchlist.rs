// ── Watchlist domain types ──

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::project::Project;
use crate::error::CoreError;

/// One recorded change to a page the user watches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchlistItem {
    pub title: String,
    pub revision_id: u64,
    pub old_revision_id: u64,
    pub username: String,
    pub is_anon: bool,
    pub is_bot: bool,
    pub timestamp: DateTime<Utc>,
    /// Edit summary as wikitext; empty when the wire omitted it.
    pub comment_wikitext: String,
    /// Edit summary rendered to HTML; empty when the wire omitted it.
    pub comment_html: String,
    pub byte_length: u64,
    pub old_byte_length: u64,
    pub project: Project,
}

impl WatchlistItem {
    /// Signed size change of the edit in bytes.
    pub fn byte_delta(&self) -> i128 {
        i128::from(self.byte_length) - i128::from(self.old_byte_length)
    }
}

/// A project that was queried but contributed nothing, and why.
#[derive(Debug)]
pub struct ProjectFailure {
    pub project: Project,
    pub error: CoreError,
}

/// The merged watchlist across every queried project.
///
/// Items are grouped by project in dispatch order (user languages, then
/// Commons, then Wikidata), each group in the order its API returned them.
/// There is no global sort.
#[derive(Debug, Default)]
pub struct Watchlist {
    items: Vec<WatchlistItem>,
    failures: Vec<ProjectFailure>,
}

impl Watchlist {
    pub(crate) fn new(items: Vec<WatchlistItem>, failures: Vec<ProjectFailure>) -> Self {
        Self { items, failures }
    }

    pub fn items(&self) -> &[WatchlistItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<WatchlistItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items belonging to one project, in their original order.
    pub fn items_for<'a>(
        &'a self,
        project: &'a Project,
    ) -> impl Iterator<Item = &'a WatchlistItem> + 'a {
        self.items.iter().filter(move |item| item.project == *project)
    }

    /// Projects that failed while others succeeded.
    pub fn failures(&self) -> &[ProjectFailure] {
        &self.failures
    }

    /// `true` when at least one project contributed nothing.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}
