//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use diary_core::Config;

use crate::output::{Output, OutputFormat};

const VALID_KEYS: &str = "data_dir, entries_key, profile_key, line_width, lines_per_page, log_file";

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "entries_key": config.entries_key,
                    "profile_key": config.profile_key,
                    "line_width": config.line_width,
                    "lines_per_page": config.lines_per_page,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:       {}", config.data_dir.display());
            println!("  entries_key:    {}", config.entries_key);
            println!("  profile_key:    {}", config.profile_key);
            println!("  line_width:     {}", config.line_width);
            println!("  lines_per_page: {}", config.lines_per_page);
            println!(
                "  log_file:       {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Entries file: {}", config.entries_path().display());
            println!("Profile file: {}", config.profile_path().display());
            println!("Config file:  {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
///
/// Edits the file as written; `DIARY_*` overrides in the environment are not
/// saved into it.
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    let mut config = Config::load_file(&save_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "entries_key" | "profile_key" => {
            if value.trim().is_empty() {
                bail!("{} cannot be empty", key);
            }
            if key == "entries_key" {
                config.entries_key = value.trim().to_string();
            } else {
                config.profile_key = value.trim().to_string();
            }
        }
        "line_width" => {
            config.line_width = positive(key, value)?;
        }
        "lines_per_page" => {
            config.lines_per_page = positive(key, value)?;
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\nValid keys: {}",
                key,
                VALID_KEYS
            );
        }
    }
    Ok(())
}

fn positive(key: &str, value: &str) -> Result<usize> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => bail!("Invalid value for {}. Use a whole number above zero.", key),
    }
}
