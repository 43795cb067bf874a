//! CLI configuration management.
//!
//! Values come from, in rising precedence: built-in defaults, the config
//! file, environment variables (a `.env` file is honored), command-line flags.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use meihua_oracle::{LlmResolver, DEFAULT_API_URL, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};

/// Environment variable that points at an alternative config file.
pub const CONFIG_FILE_ENV: &str = "MH_CONFIG_FILE";

/// Application-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// API key for the chat-completions endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for interpretations.
    #[serde(default = "default_model")]
    pub model: String,

    /// Replacement for the built-in system prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            system_prompt: None,
        }
    }
}

impl Config {
    /// Effective configuration: file values overridden by the environment.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        Ok(Self::load_file()?.with_env_overrides())
    }

    /// Overlay `DEEPSEEK_API_KEY`, `DEEPSEEK_BASE_URL` and `MEIHUA_MODEL`.
    pub fn with_env_overrides(self) -> Self {
        let resolver = self.resolver().with_env_overrides();
        Self {
            api_key: Some(resolver.api_key).filter(|key| !key.trim().is_empty()),
            base_url: resolver.api_url,
            model: resolver.model_name,
            ..self
        }
    }

    /// Defaults overlaid with the config file only; used when editing the file.
    pub fn load_file() -> Result<Self> {
        match Self::config_file_path() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config from {}", path.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))
            }
            _ => Ok(Self::default()),
        }
    }

    /// Save current configuration to the config file.
    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_file_path() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
            let contents = serde_json::to_string_pretty(self)?;
            std::fs::write(&config_path, contents)
                .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
        }
        Ok(())
    }

    /// Get the path to the config file.
    pub fn config_file_path() -> Option<PathBuf> {
        if let Some(path) = non_empty_env(CONFIG_FILE_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("dev", "meihua", "mh").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Endpoint settings for the interpretation client.
    pub fn resolver(&self) -> LlmResolver {
        LlmResolver::new(
            self.base_url.clone(),
            self.api_key.clone().unwrap_or_default(),
            self.model.clone(),
        )
    }

    /// The API key with everything past the first few characters hidden.
    pub fn masked_api_key(&self) -> String {
        self.api_key
            .as_deref()
            .map(mask)
            .unwrap_or_else(|| "(not set)".to_string())
    }
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(6).collect();
    format!("{visible}...")
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
