//! CLI configuration: a thin layer over `fbgraph_config` that applies
//! `GlobalOpts` flag overrides (--access-token, --api-version, etc.).

use std::time::Duration;

use secrecy::SecretString;

use fbgraph_api::{GraphConfig, TlsMode, TransportConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use fbgraph_config::{
    Config, Profile, config_path, load_config_or_default, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `GraphConfig` from the config file, the active profile, and
/// flag overrides. Flags win over profile values.
///
/// A missing default profile is fine (anonymous reads, or everything via
/// flags); a profile named with `--profile` must exist.
pub fn resolve_graph_config(global: &GlobalOpts) -> Result<GraphConfig, CliError> {
    let cfg = load_config_or_default();
    resolve_with(global, &cfg)
}

pub fn resolve_with(global: &GlobalOpts, cfg: &Config) -> Result<GraphConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut graph = match cfg.profiles.get(&profile_name) {
        Some(profile) => {
            fbgraph_config::profile_to_graph_config(profile, &profile_name, &cfg.defaults)?
        }
        None if global.profile.is_some() => {
            let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            names.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        None => GraphConfig {
            version: Some(fbgraph_config::parse_api_version(&cfg.defaults.api_version)?),
            transport: TransportConfig::default()
                .with_timeout(Duration::from_secs(cfg.defaults.timeout)),
            ..GraphConfig::default()
        },
    };

    if let Some(ref token) = global.access_token {
        graph.access_token = Some(SecretString::from(token.clone()));
    }
    if let Some(ref secret) = global.app_secret {
        graph.app_secret = Some(SecretString::from(secret.clone()));
    }
    if let Some(ref raw) = global.api_version {
        graph.version = Some(fbgraph_config::parse_api_version(raw)?);
    }
    if let Some(ref raw) = global.base_url {
        graph.base_url = fbgraph_config::parse_base_url(raw)?;
    }
    if global.insecure {
        graph.transport = graph.transport.with_tls(TlsMode::DangerAcceptInvalid);
    }
    if let Some(secs) = global.timeout {
        graph.transport = graph.transport.with_timeout(Duration::from_secs(secs));
    }

    tracing::debug!(
        profile = %profile_name,
        base_url = %graph.base_url,
        has_token = graph.access_token.is_some(),
        "resolved graph config"
    );
    Ok(graph)
}
