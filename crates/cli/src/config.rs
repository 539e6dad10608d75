//! Configuration commands.
//!
//! Configuration is loaded from TOML files and merged with environment variables
//! prefixed with `AD_DISPATCH__`. For example, `AD_DISPATCH__DISPATCH__CUSTOM_AD_INTERVAL`
//! will override `dispatch.custom_ad_interval` in the TOML file.

use std::fs;
use std::path::Path;

use ad_dispatch_common::settings::Settings;

use crate::error::CliError;

/// Load, merge with environment variables and validate a settings file.
///
/// Returns the settings together with their effective TOML rendering.
pub(crate) fn load_and_merge_config(
    file: &Path,
    verbose: bool,
) -> Result<(Settings, String), CliError> {
    let content = fs::read_to_string(file)?;

    if verbose {
        println!("Loading config from: {}", file.display());
        println!("Environment variables with AD_DISPATCH__ prefix will be merged");
    }

    let settings = Settings::load(&content)
        .map_err(|e| CliError::Config(format!("Failed to load config: {:?}", e)))?;

    let merged_toml = settings
        .to_toml_string()
        .map_err(|e| CliError::Config(format!("Failed to serialize merged config: {e:?}")))?;

    Ok((settings, merged_toml))
}

/// Validate a configuration file and print a summary.
pub fn validate(file: &Path, print: bool, verbose: bool) -> Result<(), CliError> {
    let (settings, merged_toml) = load_and_merge_config(file, verbose)?;

    println!("Configuration is valid");
    println!("  File: {}", file.display());
    println!("  Network provider: {}", settings.network.provider.as_str());
    println!(
        "  Custom ads: every {} slots, at most {} per session",
        settings.dispatch.custom_ad_interval, settings.dispatch.max_custom_ads_per_session
    );
    println!("  Custom ad inventory: {}", settings.custom_ads.len());

    if verbose {
        let value: toml::Value = toml::from_str(&merged_toml)?;
        if let Some(table) = value.as_table() {
            println!("\nSections found:");
            for key in table.keys() {
                println!("  - [{}]", key);
            }
        }
    }

    if print {
        println!("\n{}", merged_toml);
    }

    Ok(())
}
