// ── Watch, rollback and undo value types ──

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Whether the current user watches a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WatchStatus {
    pub watched: bool,
    /// Only present when rollback rights were explicitly requested.
    pub user_has_rollback_rights: Option<bool>,
}

/// Revision ids produced by a rollback or undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UndoOrRollbackResult {
    pub new_revision_id: u64,
    pub old_revision_id: u64,
}

impl UndoOrRollbackResult {
    pub fn new(new_revision_id: u64, old_revision_id: u64) -> Self {
        Self {
            new_revision_id,
            old_revision_id,
        }
    }
}

/// How long a watch lasts. Strings are the literal `expiry=` values.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum ExpiryType {
    #[default]
    #[strum(serialize = "never")]
    #[serde(rename = "never")]
    Never,
    #[strum(serialize = "1 week")]
    #[serde(rename = "1 week")]
    OneWeek,
    #[strum(serialize = "1 month")]
    #[serde(rename = "1 month")]
    OneMonth,
    #[strum(serialize = "3 months")]
    #[serde(rename = "3 months")]
    ThreeMonths,
    #[strum(serialize = "6 months")]
    #[serde(rename = "6 months")]
    SixMonths,
    #[strum(serialize = "1 year")]
    #[serde(rename = "1 year")]
    OneYear,
}
