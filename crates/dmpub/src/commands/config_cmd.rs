//! Config subcommand handlers.

use dialoguer::{Input, Select};

use dmpub_config::{self as cfgfile, Config, Profile};
use dmpub_core::{ApiFlavor, SiteUrl};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, prompt_err};
use crate::error::CliError;
use crate::output::{self, DetailRow};

const REDACTED: &str = "********";

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => show(global),
        ConfigCommand::SetPassword => set_password(global),
        ConfigCommand::Path => {
            output::print_output(&cfgfile::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = cfgfile::config_path();
    eprintln!("dmpub configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let mut cfg = cfgfile::load_config()?;

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(config::active_profile_name(global, &cfg))
        .interact_text()
        .map_err(prompt_err)?;

    let site: String = Input::new()
        .with_prompt("Site URL")
        .default("https://example.com".into())
        .validate_with(|input: &String| SiteUrl::parse(input).map(|_| ()).map_err(|e| e.to_string()))
        .interact_text()
        .map_err(prompt_err)?;

    let flavors = [ApiFlavor::DownloadMonitor, ApiFlavor::DokuMate];
    let flavor_choice = Select::new()
        .with_prompt("REST plugin")
        .items(&["Download Monitor", "DokuMate"])
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let username: String = Input::new()
        .with_prompt("Username")
        .interact_text()
        .map_err(prompt_err)?;

    let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    if username.trim().is_empty() || password.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "username and password cannot be empty".into(),
        });
    }

    let store_choice = Select::new()
        .with_prompt("Where to store the password?")
        .items(&[
            "Store in system keyring (recommended)",
            "Save to config file (plaintext)",
        ])
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let password_field = if store_choice == 0 {
        cfgfile::store_password(&profile_name, &password)?;
        eprintln!("   ✓ Password stored in system keyring");
        None
    } else {
        Some(password)
    };

    let profile = Profile {
        site,
        flavor: flavors.get(flavor_choice).copied().unwrap_or_default(),
        username: Some(username),
        password: password_field,
        ..Profile::default()
    };

    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());
    cfgfile::save_config(&cfg)?;

    output::status(
        &global.color,
        global.quiet,
        &format!("Configuration written to {}", config_path.display()),
    );
    eprintln!("  Active profile: {profile_name}");
    Ok(())
}

// ── Show ────────────────────────────────────────────────────────────

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = cfgfile::load_config()?;
    let format = config::output_format(global, &cfg);
    let cfg = redacted(cfg);
    let out = output::render_single(&format, &cfg, config_rows, |c| {
        c.profiles.keys().cloned().collect::<Vec<_>>().join("\n")
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Mask plaintext passwords before anything is printed.
fn redacted(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(REDACTED.into());
        }
    }
    cfg
}

fn config_rows(cfg: &Config) -> Vec<DetailRow> {
    let mut rows = vec![
        DetailRow::new(
            "default_profile",
            cfg.default_profile.clone().unwrap_or_default(),
        ),
        DetailRow::new("defaults.output", cfg.defaults.output.clone()),
        DetailRow::new("defaults.timeout_ms", cfg.defaults.timeout_ms.to_string()),
        DetailRow::new("defaults.retries", cfg.defaults.retries.to_string()),
        DetailRow::new(
            "defaults.retry_delay_ms",
            cfg.defaults.retry_delay_ms.to_string(),
        ),
    ];

    for (name, profile) in &cfg.profiles {
        rows.push(DetailRow::new("profile", name.clone()));
        rows.push(DetailRow::new("  site", profile.site.clone()));
        rows.push(DetailRow::new("  flavor", profile.flavor.to_string()));
        rows.push(DetailRow::new(
            "  username",
            profile.username.clone().unwrap_or_default(),
        ));
        let password = match (&profile.password_env, &profile.password) {
            (Some(env), _) => format!("${env}"),
            (None, Some(_)) => REDACTED.into(),
            (None, None) => "(keyring / DMPUB_PASSWORD)".into(),
        };
        rows.push(DetailRow::new("  password", password));
    }
    rows
}

// ── SetPassword ─────────────────────────────────────────────────────

fn set_password(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = cfgfile::load_config()?;
    let profile_name = config::active_profile_name(global, &cfg);
    cfg.profile(&profile_name)?;

    let secret = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "value cannot be empty".into(),
        });
    }

    cfgfile::store_password(&profile_name, &secret)?;
    output::status(
        &global.color,
        global.quiet,
        &format!("Password stored in system keyring for profile '{profile_name}'"),
    );
    Ok(())
}
