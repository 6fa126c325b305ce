//! Shared configuration for the EstateList CLI and TUI.
//!
//! TOML profiles, key resolution (env + keyring + plaintext), and
//! translation to `estatelist_core::PortalConfig`. Both binaries
//! depend on this crate.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use estatelist_core::PortalConfig;

const KEYRING_SERVICE: &str = "estatelist";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no anon key configured for profile '{profile}'")]
    NoAnonKey { profile: String },

    #[error("unknown profile '{profile}'")]
    UnknownProfile { profile: String },

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

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend project profiles.
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
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named backend project profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Project root URL (e.g. "https://abcdefgh.supabase.co").
    pub project_url: String,

    /// Anon key (plaintext — prefer keyring or env var).
    pub anon_key: Option<String>,

    /// Environment variable name containing the anon key.
    pub anon_key_env: Option<String>,

    /// Image bucket override.
    pub bucket: Option<String>,

    /// Override timeout in seconds.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "estatelist", "estatelist").map_or_else(
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
    p.push("estatelist");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("ESTATELIST_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

/// Look up a profile by name, falling back to the configured default.
pub fn select_profile<'a>(
    config: &'a Config,
    name: Option<&str>,
) -> Result<(&'a str, &'a Profile), ConfigError> {
    let name = name
        .map(str::to_owned)
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    config
        .profiles
        .get_key_value(name.as_str())
        .map(|(k, v)| (k.as_str(), v))
        .ok_or(ConfigError::UnknownProfile { profile: name })
}

// ── Key resolution ──────────────────────────────────────────────────

/// Resolve the anon key from the credential chain.
pub fn resolve_anon_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's anon_key_env → env var lookup
    if let Some(ref env_name) = profile.anon_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Shared env var
    if let Ok(val) = std::env::var("ESTATELIST_ANON_KEY") {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/anon-key")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref key) = profile.anon_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoAnonKey {
        profile: profile_name.into(),
    })
}

// ── Persisted session (refresh token) ───────────────────────────────

/// Store the refresh token after a successful sign-in so later
/// invocations restore the session.
pub fn store_refresh_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    let entry = keyring_entry(profile_name)?;
    entry
        .set_password(token)
        .map_err(|e| ConfigError::Validation {
            field: "refresh_token".into(),
            reason: e.to_string(),
        })
}

/// Load the persisted refresh token, if any.
pub fn load_refresh_token(profile_name: &str) -> Option<SecretString> {
    keyring_entry(profile_name)
        .ok()
        .and_then(|e| e.get_password().ok())
        .map(SecretString::from)
}

/// Forget the persisted refresh token (sign-out).
pub fn clear_refresh_token(profile_name: &str) {
    if let Ok(entry) = keyring_entry(profile_name) {
        let _ = entry.delete_credential();
    }
}

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/refresh-token")).map_err(|e| {
        ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        }
    })
}

// ── Translation to the core runtime config ──────────────────────────

/// Build a `PortalConfig` from a profile.
///
/// Restores the persisted session when a refresh token is present in
/// the keyring.
pub fn profile_to_portal_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<PortalConfig, ConfigError> {
    let url: url::Url = profile
        .project_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "project_url".into(),
            reason: format!("invalid URL: {}", profile.project_url),
        })?;

    let anon_key = resolve_anon_key(profile, profile_name)?;

    let mut config = PortalConfig::new(url, anon_key)
        .with_restore_token(load_refresh_token(profile_name))
        .with_timeout(Duration::from_secs(profile.timeout.unwrap_or(30)));
    if let Some(ref bucket) = profile.bucket {
        config.bucket = bucket.clone();
    }
    Ok(config)
}
