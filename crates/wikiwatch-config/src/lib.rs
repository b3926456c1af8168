//! Shared configuration for wikiwatch consumers.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `wikiwatch_core::WatchlistConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wikiwatch_core::{Credentials, Language, WatchlistConfig};

/// Keyring service name; entries are keyed `{profile}/password`.
const KEYRING_SERVICE: &str = "wikiwatch";
const PASSWORD_ENV: &str = "WIKIWATCH_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' is not defined")]
    UnknownProfile { profile: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named explicitly.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    pub user_agent: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named watchlist profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Content languages, in preference order.
    #[serde(default)]
    pub languages: Vec<Language>,

    /// Bot-password user (`User@BotName`). Absent means anonymous.
    pub username: Option<String>,

    /// Bot password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// PEM file with an extra root certificate to trust.
    pub ca_cert: Option<PathBuf>,
}

impl Config {
    /// Look up a profile, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .ok_or_else(|| ConfigError::Validation {
                field: "default_profile".into(),
                reason: "no profile named and no default set".into(),
            })?;

        self.profiles
            .get_key_value(name)
            .map(|(name, profile)| (name.as_str(), profile))
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }

    /// Build the runtime config for a profile (or the default one).
    pub fn watchlist_config(&self, name: Option<&str>) -> Result<WatchlistConfig, ConfigError> {
        let (name, profile) = self.profile(name)?;
        profile_to_watchlist_config(profile, name, &self.defaults)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "wikiwatch", "wikiwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("wikiwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit path. A missing file yields the defaults.
///
/// `WIKIWATCH_` variables override file values; nested keys use a double
/// underscore (`WIKIWATCH_DEFAULTS__TIMEOUT=10`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WIKIWATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve login credentials for a profile.
///
/// `Ok(None)` for anonymous profiles (no username). Otherwise the
/// password comes from, in order: the profile's `password_env` variable,
/// `WIKIWATCH_PASSWORD`, the system keyring, the plaintext `password`.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<Credentials>, ConfigError> {
    resolve_credentials_with(profile, profile_name, || keyring_password(profile_name))
}

fn resolve_credentials_with(
    profile: &Profile,
    profile_name: &str,
    keyring: impl FnOnce() -> Option<String>,
) -> Result<Option<Credentials>, ConfigError> {
    let Some(username) = profile.username.clone() else {
        return Ok(None);
    };

    let password = profile
        .password_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
        .or_else(|| std::env::var(PASSWORD_ENV).ok())
        .or_else(keyring)
        .or_else(|| profile.password.clone())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    Ok(Some(Credentials {
        username,
        password: SecretString::from(password),
    }))
}

fn keyring_password(profile_name: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .and_then(|entry| entry.get_password())
        .ok()
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .and_then(|entry| entry.set_password(password))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

/// Build a `WatchlistConfig` from a profile and the global defaults.
pub fn profile_to_watchlist_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<WatchlistConfig, ConfigError> {
    let timeout = profile.timeout.unwrap_or(defaults.timeout);
    if timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least one second".into(),
        });
    }

    let credentials = resolve_credentials(profile, profile_name)?;
    let fallback = WatchlistConfig::default();

    Ok(WatchlistConfig {
        languages: if profile.languages.is_empty() {
            fallback.languages
        } else {
            profile.languages.clone()
        },
        credentials,
        timeout: Duration::from_secs(timeout),
        user_agent: defaults.user_agent.clone().unwrap_or(fallback.user_agent),
        ca_cert: profile.ca_cert.clone(),
    })
}
