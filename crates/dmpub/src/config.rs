//! Flag-aware resolution of the active profile.
//!
//! `dmpub_config` owns the TOML file and the credential chain; this module
//! layers `--site`, `--username`, `--flavor` and `--timeout` on top and
//! falls back to interactive prompts when a terminal is attached.

use std::io::IsTerminal;

use clap::ValueEnum;
use secrecy::SecretString;

use dmpub_config::{Config, ConfigError, Profile};
use dmpub_core::{Credentials, PublisherConfig};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Everything `publish` needs before it can talk to the site.
pub struct Target {
    pub profile_name: String,
    pub config: PublisherConfig,
    pub credentials: Credentials,
    pub output: OutputFormat,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// `--output` if given, else `defaults.output` from config, else table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if let Some(ref format) = global.output {
        return format.clone();
    }
    OutputFormat::from_str(&config.defaults.output, true).unwrap_or_else(|_| {
        tracing::warn!(
            value = %config.defaults.output,
            "unknown defaults.output in config, using table"
        );
        OutputFormat::Table
    })
}

/// The named profile with CLI overrides applied.
///
/// Without a stored profile, `--site` alone is enough to build one.
pub fn effective_profile(
    global: &GlobalOpts,
    config: &Config,
    profile_name: &str,
) -> Result<Profile, CliError> {
    let mut profile = match config.profiles.get(profile_name) {
        Some(profile) => profile.clone(),
        None if global.site.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name.into(),
                available: config.profile_names(),
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: dmpub_config::config_path().display().to_string(),
            });
        }
    };

    if let Some(ref site) = global.site {
        profile.site.clone_from(site);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if let Some(flavor) = global.flavor {
        profile.flavor = flavor.into();
    }
    if let Some(timeout) = global.timeout {
        profile.timeout_ms = Some(timeout);
    }

    Ok(profile)
}

/// Load config, apply overrides, and resolve credentials.
pub fn resolve_target(global: &GlobalOpts) -> Result<Target, CliError> {
    let cfg = dmpub_config::load_config()?;
    let profile_name = active_profile_name(global, &cfg);
    let profile = effective_profile(global, &cfg, &profile_name)?;

    let config = dmpub_config::profile_to_publisher_config(&profile, &cfg.defaults)?;

    let credentials = match dmpub_config::resolve_credentials(&profile, &profile_name) {
        Ok(credentials) => credentials,
        Err(ConfigError::NoCredentials { .. }) if std::io::stdin().is_terminal() => {
            prompt_credentials(&profile)?
        }
        Err(e) => return Err(e.into()),
    };

    tracing::debug!(
        profile = %profile_name,
        site = %config.site,
        flavor = %config.flavor,
        "resolved target"
    );

    Ok(Target {
        profile_name,
        config,
        credentials,
        output: output_format(global, &cfg),
    })
}

fn prompt_credentials(profile: &Profile) -> Result<Credentials, CliError> {
    let username = match profile.username {
        Some(ref username) => username.clone(),
        None => dialoguer::Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err)?,
    };
    let password = rpassword::prompt_password(format!("Password for {username}: "))
        .map_err(prompt_err)?;

    Ok(Credentials::new(username, SecretString::from(password)))
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Prompt(e.to_string())
}
