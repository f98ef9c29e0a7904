//! Shared configuration for fbgraph tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `fbgraph_api::GraphConfig`. The CLI layers its flag
//! overrides on top.

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
use tracing::debug;

use fbgraph_api::{ApiVersion, GraphConfig, TlsMode, TransportConfig};

/// Keyring service name all secrets are stored under.
pub const KEYRING_SERVICE: &str = "fbgraph";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{0}' not found")]
    UnknownProfile(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named app/token profiles.
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

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            api_version: default_api_version(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "json".into()
}
fn default_api_version() -> String {
    ApiVersion::DEFAULT.to_string()
}
fn default_timeout() -> u64 {
    30
}

/// A named app + token profile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Facebook app id (informational; shown by `config show`).
    pub app_id: Option<String>,

    /// Graph API version, e.g. "v19.0". Falls back to `defaults.api_version`.
    pub api_version: Option<String>,

    /// Override the Graph host, e.g. for a recording proxy.
    pub base_url: Option<String>,

    /// Access token (plaintext; prefer keyring or env var).
    pub access_token: Option<String>,

    /// Environment variable name containing the access token.
    pub access_token_env: Option<String>,

    /// App secret (plaintext; prefer keyring or env var).
    pub app_secret: Option<String>,

    /// Environment variable name containing the app secret.
    pub app_secret_env: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,

    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "fbgraph", "fbgraph").map_or_else(
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
    p.push("fbgraph");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. `FBGRAPH_` variables override file values;
/// nested keys use a double underscore (`FBGRAPH_DEFAULTS__TIMEOUT=60`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FBGRAPH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
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

// ── Credential resolution (without CLI flags) ───────────────────────

/// Which secret a keyring entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    AccessToken,
    AppSecret,
}

impl SecretKind {
    fn keyring_key(self, profile_name: &str) -> String {
        match self {
            Self::AccessToken => format!("{profile_name}/access-token"),
            Self::AppSecret => format!("{profile_name}/app-secret"),
        }
    }
}

fn keyring_entry(profile_name: &str, kind: SecretKind) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &kind.keyring_key(profile_name))
}

/// Store a secret in the system keyring.
pub fn store_secret(profile_name: &str, kind: SecretKind, value: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name, kind)?.set_password(value)?;
    Ok(())
}

fn resolve_secret(
    env_name: Option<&str>,
    plaintext: Option<&str>,
    profile_name: &str,
    kind: SecretKind,
) -> Option<SecretString> {
    // 1. Profile's *_env → env var lookup
    if let Some(val) = env_name.and_then(|name| std::env::var(name).ok()) {
        return Some(SecretString::from(val));
    }

    // 2. System keyring
    if let Ok(secret) = keyring_entry(profile_name, kind).and_then(|e| e.get_password()) {
        return Some(SecretString::from(secret));
    }

    // 3. Plaintext in config
    plaintext.map(SecretString::from)
}

/// Resolve the access token. `None` means anonymous access.
pub fn resolve_access_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    resolve_secret(
        profile.access_token_env.as_deref(),
        profile.access_token.as_deref(),
        profile_name,
        SecretKind::AccessToken,
    )
}

/// Resolve the app secret used for `appsecret_proof`.
pub fn resolve_app_secret(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    resolve_secret(
        profile.app_secret_env.as_deref(),
        profile.app_secret.as_deref(),
        profile_name,
        SecretKind::AppSecret,
    )
}

// ── Translation ─────────────────────────────────────────────────────

pub fn parse_api_version(raw: &str) -> Result<ApiVersion, ConfigError> {
    raw.parse().map_err(|e: fbgraph_api::Error| ConfigError::Validation {
        field: "api_version".into(),
        reason: e.to_string(),
    })
}

pub fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    url::Url::parse(raw).map_err(|e| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL {raw}: {e}"),
    })?;
    Ok(raw.to_owned())
}

/// Build a `GraphConfig` from a profile, with no CLI flag overrides.
pub fn profile_to_graph_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<GraphConfig, ConfigError> {
    let version = parse_api_version(
        profile
            .api_version
            .as_deref()
            .unwrap_or(&defaults.api_version),
    )?;

    let base_url = match profile.base_url.as_deref() {
        Some(raw) => parse_base_url(raw)?,
        None => fbgraph_api::DEFAULT_BASE_URL.to_owned(),
    };

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(GraphConfig {
        base_url,
        version: Some(version),
        access_token: resolve_access_token(profile, profile_name),
        app_secret: resolve_app_secret(profile, profile_name),
        transport: TransportConfig::default().with_tls(tls).with_timeout(timeout),
    })
}

/// Look up a profile by name.
pub fn find_profile<'a>(cfg: &'a Config, name: &str) -> Result<&'a Profile, ConfigError> {
    cfg.profiles
        .get(name)
        .ok_or_else(|| ConfigError::UnknownProfile(name.to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn sample() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                app_id: Some("1234".into()),
                api_version: Some("v18.0".into()),
                access_token: Some("plain-token".into()),
                timeout: Some(5),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = sample();
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles["default"], cfg.profiles["default"]);
        assert_eq!(loaded.default_profile.as_deref(), Some("default"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert!(loaded.profiles.is_empty());
        assert_eq!(loaded.defaults.timeout, 30);
    }

    #[test]
    fn profile_translates_to_graph_config() {
        let cfg = sample();
        let profile = &cfg.profiles["default"];
        let graph = profile_to_graph_config(profile, "fbgraph-test-profile", &cfg.defaults).unwrap();

        assert_eq!(graph.version, Some(ApiVersion::new(18, 0)));
        assert_eq!(graph.base_url, fbgraph_api::DEFAULT_BASE_URL);
        assert_eq!(graph.transport.timeout, Duration::from_secs(5));
        assert!(matches!(graph.transport.tls, TlsMode::System));
        assert!(graph.app_secret.is_none());
    }

    #[test]
    fn env_named_token_wins_over_plaintext() {
        let Ok(expected) = std::env::var("PATH") else {
            return;
        };
        let profile = Profile {
            access_token_env: Some("PATH".into()),
            access_token: Some("plain".into()),
            ..Profile::default()
        };
        let token = resolve_access_token(&profile, "fbgraph-test-profile").unwrap();
        assert_eq!(token.expose_secret(), expected);
    }

    #[test]
    fn unset_env_falls_back_to_plaintext() {
        let profile = Profile {
            access_token_env: Some("FBGRAPH_TEST_SURELY_UNSET_VARIABLE".into()),
            access_token: Some("plain".into()),
            ..Profile::default()
        };
        let token = resolve_access_token(&profile, "fbgraph-test-profile").unwrap();
        assert_eq!(token.expose_secret(), "plain");
    }

    #[test]
    fn invalid_version_is_a_validation_error() {
        let profile = Profile {
            api_version: Some("latest".into()),
            ..Profile::default()
        };
        let err = profile_to_graph_config(&profile, "x", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api_version"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("http://127.0.0.1:8080/").is_ok());
    }

    #[test]
    fn unknown_profile() {
        let cfg = sample();
        assert!(matches!(
            find_profile(&cfg, "work"),
            Err(ConfigError::UnknownProfile(name)) if name == "work"
        ));
    }
}
