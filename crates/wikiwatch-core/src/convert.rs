// ── API-to-domain type conversions ──
//
// Maps one project's decoded `list=watchlist` payload into domain items.
// Pure: no I/O.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

use wikiwatch_api::types::{WatchlistEntry, WatchlistResponse};

use crate::error::CoreError;
use crate::model::{Project, WatchlistItem};

/// MediaWiki API timestamp format (always UTC, second precision).
const API_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse a MediaWiki API timestamp such as `2023-05-30T11:37:31Z`.
pub fn parse_api_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, API_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Map a full watchlist response for `project`.
///
/// Server-reported errors win over any partial `query` payload; a
/// response with neither is an unexpected shape.
pub fn watchlist_from_response(
    response: WatchlistResponse,
    project: &Project,
) -> Result<Vec<WatchlistItem>, CoreError> {
    if let Some(err) = CoreError::from_api_errors(project, response.errors) {
        return Err(err);
    }

    let query = response.query.ok_or(CoreError::UnexpectedResponse {
        operation: "watchlist query",
    })?;

    Ok(watchlist_items(query.watchlist, project))
}

/// Map raw entries to items, preserving order.
///
/// Entries without a title or with a timestamp that does not parse are
/// dropped, not reported: one malformed row must not cost the user the
/// rest of the project.
pub fn watchlist_items(entries: Vec<WatchlistEntry>, project: &Project) -> Vec<WatchlistItem> {
    entries
        .into_iter()
        .filter_map(|entry| watchlist_item(entry, project))
        .collect()
}

fn watchlist_item(entry: WatchlistEntry, project: &Project) -> Option<WatchlistItem> {
    let Some(title) = entry.title else {
        debug!(
            %project,
            logtype = entry.logtype.as_deref().unwrap_or_default(),
            "dropping watchlist entry without a title"
        );
        return None;
    };
    let Some(timestamp) = parse_api_timestamp(&entry.timestamp) else {
        debug!(
            %project,
            %title,
            timestamp = %entry.timestamp,
            "dropping watchlist entry with unparsable timestamp"
        );
        return None;
    };

    Some(WatchlistItem {
        title,
        revision_id: entry.revid,
        old_revision_id: entry.old_revid,
        username: entry.user,
        is_anon: entry.anon,
        is_bot: entry.bot,
        timestamp,
        comment_wikitext: entry.comment.unwrap_or_default(),
        comment_html: entry.parsedcomment.unwrap_or_default(),
        byte_length: entry.newlen,
        old_byte_length: entry.oldlen,
        project: project.clone(),
    })
}
