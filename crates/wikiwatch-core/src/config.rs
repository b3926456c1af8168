// ── Runtime configuration ──
//
// Describes *what* to watch and *how* to reach the wikis. Carries
// credential data and transport tuning, but never touches disk.
// `wikiwatch-config` builds one of these from a TOML profile.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use wikiwatch_api::transport::DEFAULT_USER_AGENT;

use crate::model::Language;

/// Bot-password credentials (`User@BotName` + generated password).
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// Configuration for one watchlist session.
#[derive(Debug, Clone)]
pub struct WatchlistConfig {
    /// The user's content languages, in preference order.
    pub languages: Vec<Language>,
    /// Login credentials. `None` means anonymous: reads of public data
    /// work, watchlist and mutations will be refused by the wikis.
    pub credentials: Option<Credentials>,
    /// Per-request timeout.
    pub timeout: Duration,
    pub user_agent: String,
    /// Extra PEM root certificate to trust, for wikis behind a private CA.
    pub ca_cert: Option<PathBuf>,
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            languages: vec![Language::new("en")],
            credentials: None,
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.into(),
            ca_cert: None,
        }
    }
}
