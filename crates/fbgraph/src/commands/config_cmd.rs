//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};

use fbgraph_config::SecretKind;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking secrets.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "api_version = \"{}\"", cfg.defaults.api_version);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let strings = [
            ("app_id", p.app_id.as_deref()),
            ("api_version", p.api_version.as_deref()),
            ("base_url", p.base_url.as_deref()),
            ("access_token", p.access_token.as_ref().map(|_| "****")),
            ("access_token_env", p.access_token_env.as_deref()),
            ("app_secret", p.app_secret.as_ref().map(|_| "****")),
            ("app_secret_env", p.app_secret_env.as_deref()),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                let _ = writeln!(out, "{key} = \"{value}\"");
            }
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Secrets never leave the process through structured output either.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.access_token.is_some() {
            profile.access_token = Some("****".into());
        }
        if profile.app_secret.is_some() {
            profile.app_secret = Some("****".into());
        }
    }
    cfg
}

fn prompt_secret(prompt: &str, label: &str) -> Result<String, CliError> {
    let secret = rpassword::prompt_password(prompt)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: label.into(),
            reason: format!("{label} cannot be empty"),
        });
    }
    Ok(secret)
}

/// Offer to store a secret in the system keyring or return it for plaintext config.
///
/// Returns `Some(secret)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_keyring_storage(
    secret: &str,
    profile_name: &str,
    kind: SecretKind,
    label: &str,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {label}?"))
        .items(choices)
        .default(0)
        .interact()?;

    if selection == 0 {
        fbgraph_config::store_secret(profile_name, kind, secret)?;
        eprintln!("   ✓ {label} stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret.to_owned()))
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: "must be 'true' or 'false'".into(),
    })
}

/// Apply `key = value` to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "app_id" | "app-id" => profile.app_id = Some(value),
        "api_version" | "api-version" => {
            fbgraph_config::parse_api_version(&value)?;
            profile.api_version = Some(value);
        }
        "base_url" | "base-url" => profile.base_url = Some(fbgraph_config::parse_base_url(&value)?),
        "access_token" | "access-token" => profile.access_token = Some(value),
        "access_token_env" | "access-token-env" => profile.access_token_env = Some(value),
        "app_secret" | "app-secret" => profile.app_secret = Some(value),
        "app_secret_env" | "app-secret-env" => profile.app_secret_env = Some(value),
        "insecure" => profile.insecure = Some(parse_bool("insecure", &value)?),
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: app_id, api_version, base_url, \
                     access_token, access_token_env, app_secret, app_secret_env, insecure, \
                     timeout, ca_cert"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(global.output, &cfg, format_config_redacted, |_| {
                config::config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_key(profile, &key, value)?;
            config::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: fbgraph config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
                available.sort();
                return Err(CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        ConfigCommand::SetToken {
            profile,
            app_secret,
        } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            let (kind, label) = if app_secret {
                (SecretKind::AppSecret, "app secret")
            } else {
                (SecretKind::AccessToken, "access token")
            };
            let secret = prompt_secret(&format!("{label} for '{profile_name}': "), label)?;
            fbgraph_config::store_secret(&profile_name, kind, &secret)?;
            eprintln!("✓ {label} stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("fbgraph configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()?;

    let app_id: String = Input::new()
        .with_prompt("App id (optional)")
        .allow_empty(true)
        .interact_text()?;

    let api_version: String = Input::new()
        .with_prompt("Graph API version")
        .default(fbgraph_api::ApiVersion::DEFAULT.to_string())
        .validate_with(|raw: &String| {
            fbgraph_config::parse_api_version(raw)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;

    let token = prompt_secret("Access token: ", "access token")?;
    let access_token =
        prompt_keyring_storage(&token, &profile_name, SecretKind::AccessToken, "access token")?;

    let with_secret = dialoguer::Confirm::new()
        .with_prompt("Sign requests with an app secret (appsecret_proof)?")
        .default(false)
        .interact()?;
    let app_secret = if with_secret {
        let secret = prompt_secret("App secret: ", "app secret")?;
        prompt_keyring_storage(&secret, &profile_name, SecretKind::AppSecret, "app secret")?
    } else {
        None
    };

    let profile = Profile {
        app_id: (!app_id.is_empty()).then_some(app_id),
        api_version: Some(api_version),
        access_token,
        app_secret,
        ..Profile::default()
    };

    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());
    config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: fbgraph object me -f id,name");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn redaction_masks_secrets_in_every_format() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "work".into(),
            Profile {
                access_token: Some("EAAB-real".into()),
                app_secret: Some("shh".into()),
                access_token_env: Some("FB_TOKEN".into()),
                ..Profile::default()
            },
        );
        let text = format_config_redacted(&cfg);
        assert!(!text.contains("EAAB-real"));
        assert!(!text.contains("shh"));
        assert!(text.contains("access_token_env = \"FB_TOKEN\""));

        let structured = redacted(&cfg);
        assert_eq!(structured.profiles["work"].access_token.as_deref(), Some("****"));
        assert_eq!(structured.profiles["work"].app_secret.as_deref(), Some("****"));
    }

    #[test]
    fn set_validates_typed_keys() {
        let mut profile = Profile::default();
        set_profile_key(&mut profile, "api-version", "v20.0".into()).unwrap();
        set_profile_key(&mut profile, "timeout", "12".into()).unwrap();
        assert_eq!(profile.api_version.as_deref(), Some("v20.0"));
        assert_eq!(profile.timeout, Some(12));

        assert!(set_profile_key(&mut profile, "api_version", "latest".into()).is_err());
        assert!(set_profile_key(&mut profile, "insecure", "yes".into()).is_err());
        assert!(set_profile_key(&mut profile, "controller", "x".into()).is_err());
    }
}
