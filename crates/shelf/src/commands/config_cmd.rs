//! Config subcommand handlers.

use dialoguer::{Input, Select};

use shelf_config::{BackendChoice, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let backend = match p.backend {
            BackendChoice::Rest => "rest",
            BackendChoice::Memory => "memory",
        };
        let _ = writeln!(out, "backend = \"{backend}\"");
        if let Some(ref url) = p.url {
            let _ = writeln!(out, "url = \"{url}\"");
        }
        if p.api_key.is_some() {
            let _ = writeln!(out, "api_key = \"****\"");
        }
        if let Some(ref env) = p.api_key_env {
            let _ = writeln!(out, "api_key_env = \"{env}\"");
        }
        if let Some(ref table) = p.movies_table {
            let _ = writeln!(out, "movies_table = \"{table}\"");
        }
        if let Some(ref table) = p.products_table {
            let _ = writeln!(out, "products_table = \"{table}\"");
        }
        if let Some(ref order) = p.order_by {
            let _ = writeln!(out, "order_by = \"{order}\"");
        }
        if let Some(echo) = p.return_representation {
            let _ = writeln!(out, "return_representation = {echo}");
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
        if let Some(ttl) = p.error_ttl {
            let _ = writeln!(out, "error_ttl = {ttl}");
        }
    }

    out
}

/// The same config with plaintext keys masked, for structured output.
fn redacted(cfg: &Config) -> Config {
    let profiles = cfg
        .profiles
        .iter()
        .map(|(name, p)| {
            let profile = Profile {
                api_key: p.api_key.as_ref().map(|_| "****".into()),
                url: p.url.clone(),
                backend: p.backend,
                api_key_env: p.api_key_env.clone(),
                movies_table: p.movies_table.clone(),
                products_table: p.products_table.clone(),
                order_by: p.order_by.clone(),
                return_representation: p.return_representation,
                ca_cert: p.ca_cert.clone(),
                insecure: p.insecure,
                timeout: p.timeout,
                error_ttl: p.error_ttl,
            };
            (name.clone(), profile)
        })
        .collect();
    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: shelf_config::Defaults {
            output: cfg.defaults.output.clone(),
            color: cfg.defaults.color.clone(),
            insecure: cfg.defaults.insecure,
            timeout: cfg.defaults.timeout,
        },
        profiles,
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn invalid(field: &str, reason: &str) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Prompt for an API key, rejecting an empty one.
fn prompt_api_key() -> Result<String, CliError> {
    let key = rpassword::prompt_password("API key: ").map_err(prompt_err)?;
    if key.is_empty() {
        return Err(invalid("api_key", "API key cannot be empty"));
    }
    Ok(key)
}

/// Offer to store the key in the system keyring or return it for plaintext config.
///
/// Returns `Some(key)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_keyring_storage(key: &str, profile_name: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the API key?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        shelf_config::store_api_key(profile_name, key)?;
        eprintln!("   ✓ API key stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(key.to_owned()))
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, CliError> {
    value
        .parse()
        .map_err(|_| invalid(field, "must be 'true' or 'false'"))
}

fn parse_secs(field: &str, value: &str) -> Result<u64, CliError> {
    value
        .parse()
        .map_err(|_| invalid(field, "must be a number (seconds)"))
}

/// Apply `key = value` to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "url" => {
            shelf_config::parse_url(&value, "url")?;
            profile.url = Some(value);
        }
        "backend" => {
            profile.backend = match value.as_str() {
                "rest" => BackendChoice::Rest,
                "memory" => BackendChoice::Memory,
                _ => return Err(invalid("backend", "must be 'rest' or 'memory'")),
            };
        }
        "api_key" | "api-key" => profile.api_key = Some(value),
        "api_key_env" | "api-key-env" => profile.api_key_env = Some(value),
        "movies_table" | "movies-table" => profile.movies_table = Some(value),
        "products_table" | "products-table" => profile.products_table = Some(value),
        "order_by" | "order-by" => profile.order_by = Some(value),
        "return_representation" | "return-representation" => {
            profile.return_representation = Some(parse_bool("return_representation", &value)?);
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => profile.insecure = Some(parse_bool("insecure", &value)?),
        "timeout" => profile.timeout = Some(parse_secs("timeout", &value)?),
        "error_ttl" | "error-ttl" => profile.error_ttl = Some(parse_secs("error_ttl", &value)?),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: url, backend, api_key, \
                     api_key_env, movies_table, products_table, order_by, \
                     return_representation, ca_cert, insecure, timeout, error_ttl"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = shelf_config::config_path();
            eprintln!("shelf configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let backend_choices = &["Hosted REST table service", "In-memory demo catalog"];
            let backend_selection = Select::new()
                .with_prompt("Backend")
                .items(backend_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let mut profile = Profile::default();
            if backend_selection == 0 {
                let url: String = Input::new()
                    .with_prompt("REST base URL")
                    .default("https://xyz.supabase.co/rest/v1".into())
                    .interact_text()
                    .map_err(prompt_err)?;
                shelf_config::parse_url(&url, "url")?;
                profile.url = Some(url);

                let key = prompt_api_key()?;
                profile.api_key = prompt_keyring_storage(&key, &profile_name)?;
            } else {
                profile.backend = BackendChoice::Memory;
            }

            let mut cfg = shelf_config::load_config_file()?;
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            shelf_config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: shelf movies list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&shelf_config::load_config_file()?);
            let out = output::render_single(&global.output(), &cfg, format_config_redacted, |_| {
                "config".into()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = shelf_config::load_config_file()?;
            let profile_name = cfg.active_profile_name(global.profile.as_deref());
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            set_profile_key(profile, &key, value)?;

            shelf_config::save_config(&cfg)?;
            output::success(global, &format!("Set {key} on profile '{profile_name}'"));
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = shelf_config::load_config_file()?;
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: shelf config init");
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

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = shelf_config::load_config_file()?;
            cfg.profile(&name)?;

            cfg.default_profile = Some(name.clone());
            shelf_config::save_config(&cfg)?;
            output::success(global, &format!("Default profile set to '{name}'"));
            Ok(())
        }

        // ── SetKey ──────────────────────────────────────────────────
        ConfigCommand::SetKey => {
            let cfg = shelf_config::load_config_file()?;
            let profile_name = cfg.active_profile_name(global.profile.as_deref());
            cfg.profile(&profile_name)?;

            let key = prompt_api_key()?;
            shelf_config::store_api_key(&profile_name, &key)?;
            output::success(
                global,
                &format!("API key stored in system keyring for profile '{profile_name}'"),
            );
            Ok(())
        }
    }
}
