//! Config command implementation.
//!
//! Edits operate on the config file alone so environment values are never
//! written back to disk.

use anyhow::Result;

use crate::config::Config;

const VALID_KEYS: &str = "api-key, base-url, model, system-prompt";

/// Show current configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("Meihua CLI Configuration");
    println!("{:-<40}", "");
    println!("API Key:        {}", config.masked_api_key());
    println!("Base URL:       {}", config.base_url);
    println!("Model:          {}", config.model);
    println!(
        "System Prompt:  {}",
        config.system_prompt.as_deref().unwrap_or("(default)")
    );

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }

    Ok(())
}

/// Set a configuration value and persist it.
pub fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_file()?;
    match key {
        "api-key" | "key" => {
            config.api_key = Some(value.to_string());
            println!("✅ Set api-key");
            println!("⚠️  Key stored in config file. For better security, use DEEPSEEK_API_KEY env var.");
        }
        "base-url" | "url" => {
            config.base_url = value.to_string();
            println!("Set base-url to: {}", value);
        }
        "model" => {
            config.model = value.to_string();
            println!("Set model to: {}", value);
        }
        "system-prompt" | "prompt" => {
            config.system_prompt = Some(value.to_string());
            println!("Set system-prompt");
        }
        _ => {
            anyhow::bail!("Unknown config key: {}. Valid keys: {}", key, VALID_KEYS);
        }
    }

    config.save()?;
    Ok(())
}

/// Print a single configuration value.
pub fn get(config: &Config, key: &str) -> Result<()> {
    let value = match key {
        "api-key" | "key" => config.masked_api_key(),
        "base-url" | "url" => config.base_url.clone(),
        "model" => config.model.clone(),
        "system-prompt" | "prompt" => config
            .system_prompt
            .clone()
            .unwrap_or_else(|| "(default)".to_string()),
        _ => {
            anyhow::bail!("Unknown config key: {}. Valid keys: {}", key, VALID_KEYS);
        }
    };

    println!("{}", value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn reset() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults");
    Ok(())
}
