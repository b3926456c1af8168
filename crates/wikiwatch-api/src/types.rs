// MediaWiki Action API response types
//
// One schema per operation, all requested with `formatversion=2` and
// `errorformat=html`. Fields use `#[serde(default)]` / `Option` liberally:
// the API omits keys rather than nulling them, and the success contract
// for each operation is enforced in `wikiwatch-core`, not at decode time.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ── Errors ───────────────────────────────────────────────────────────

/// One entry of the top-level `errors` array.
///
/// ```json
/// { "code": "badtoken", "html": "Invalid CSRF token.", "module": "main" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub module: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.html.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{}: {}", self.code, self.html)
        }
    }
}

// ── Watchlist ────────────────────────────────────────────────────────

/// `action=query&list=watchlist`
#[derive(Debug, Clone, Deserialize)]
pub struct WatchlistResponse {
    #[serde(default)]
    pub query: Option<WatchlistQuery>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchlistQuery {
    #[serde(default)]
    pub watchlist: Vec<WatchlistEntry>,
}

/// A single change row. Log entries (`wlprop=loginfo`) arrive with
/// zero revision ids and a `logtype`; hidden log actions carry no `title`.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchlistEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub revid: u64,
    #[serde(default)]
    pub old_revid: u64,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub anon: bool,
    #[serde(default)]
    pub bot: bool,
    /// `2023-05-30T11:37:31Z`; parsed (or rejected) by the mapper.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub parsedcomment: Option<String>,
    #[serde(default)]
    pub newlen: u64,
    #[serde(default)]
    pub oldlen: u64,
    #[serde(default)]
    pub logtype: Option<String>,
}

// ── Watch / unwatch ──────────────────────────────────────────────────

/// `action=watch` (with or without `unwatch=1`).
#[derive(Debug, Clone, Deserialize)]
pub struct WatchActionResponse {
    #[serde(default)]
    pub watch: Vec<WatchActionResult>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchActionResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub watched: Option<bool>,
    #[serde(default)]
    pub unwatched: Option<bool>,
    #[serde(default)]
    pub expiry: Option<String>,
}

// ── Page info / user rights ──────────────────────────────────────────

/// `action=query&prop=info&inprop=watched`, optionally with
/// `meta=userinfo&uiprop=rights`.
#[derive(Debug, Clone, Deserialize)]
pub struct PageInfoResponse {
    #[serde(default)]
    pub query: Option<PageInfoQuery>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageInfoQuery {
    #[serde(default)]
    pub pages: Vec<PageInfo>,
    #[serde(default)]
    pub userinfo: Option<UserInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    pub title: String,
    #[serde(default)]
    pub watched: Option<bool>,
    #[serde(default)]
    pub missing: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rights: Vec<String>,
}

// ── Messages ─────────────────────────────────────────────────────────

/// `action=query&meta=allmessages`
#[derive(Debug, Clone, Deserialize)]
pub struct AllMessagesResponse {
    #[serde(default)]
    pub query: Option<AllMessagesQuery>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllMessagesQuery {
    #[serde(default)]
    pub allmessages: Vec<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub name: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub missing: bool,
}

// ── Rollback ─────────────────────────────────────────────────────────

/// `action=rollback`
#[derive(Debug, Clone, Deserialize)]
pub struct RollbackResponse {
    #[serde(default)]
    pub rollback: Option<RollbackResult>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RollbackResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub revid: Option<u64>,
    #[serde(default)]
    pub old_revid: Option<u64>,
    #[serde(default)]
    pub last_revid: Option<u64>,
}

// ── Edit ─────────────────────────────────────────────────────────────

/// `action=edit`
#[derive(Debug, Clone, Deserialize)]
pub struct EditResponse {
    #[serde(default)]
    pub edit: Option<EditResult>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditResult {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub newrevid: Option<u64>,
    #[serde(default)]
    pub oldrevid: Option<u64>,
    #[serde(default)]
    pub nochange: bool,
}

// ── Tokens / login ───────────────────────────────────────────────────

/// `action=query&meta=tokens&type=...`
#[derive(Debug, Clone, Deserialize)]
pub struct TokensResponse {
    #[serde(default)]
    pub query: Option<TokensQuery>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokensQuery {
    #[serde(default)]
    pub tokens: HashMap<String, String>,
}

/// `action=login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub login: Option<LoginResult>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResult {
    pub result: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub lgusername: Option<String>,
}
