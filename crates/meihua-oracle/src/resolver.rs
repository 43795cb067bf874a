//! Endpoint configuration for OpenAI-compatible chat APIs.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OracleError, OracleResult};

pub const DEFAULT_API_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";

pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";
pub const BASE_URL_ENV: &str = "DEEPSEEK_BASE_URL";
pub const MODEL_ENV: &str = "MEIHUA_MODEL";

/// Where and how to reach a chat-completions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmResolver {
    /// Base URL; `/chat/completions` is appended.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model_name: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for LlmResolver {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            model_name: default_model(),
        }
    }
}

impl LlmResolver {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            model_name: model_name.into(),
        }
    }

    /// Defaults overlaid with `DEEPSEEK_API_KEY`, `DEEPSEEK_BASE_URL` and `MEIHUA_MODEL`.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Replace fields whose environment variable is set. Blank values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(key) = non_empty_env(API_KEY_ENV) {
            self.api_key = key;
        }
        if let Some(url) = non_empty_env(BASE_URL_ENV) {
            self.api_url = url;
        }
        if let Some(model) = non_empty_env(MODEL_ENV) {
            self.model_name = model;
        }
        self
    }

    /// Load a resolver from the `[resolver]` table of a TOML file.
    pub fn load_from_toml<P: AsRef<Path>>(path: P) -> OracleResult<Self> {
        #[derive(Deserialize)]
        struct ResolverFile {
            resolver: LlmResolver,
        }

        let raw = fs::read_to_string(path.as_ref()).map_err(|e| {
            OracleError::Config(format!(
                "unable to read resolver file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        let file: ResolverFile = toml::from_str(&raw)
            .map_err(|e| OracleError::Config(format!("invalid resolver toml: {e}")))?;
        Ok(file.resolver)
    }

    pub fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
