//! Configuration management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sslctx::Credentials;
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Server base URL.
    pub url: Option<String>,

    /// Username for basic authentication.
    pub username: Option<String>,

    /// Password for basic authentication.
    pub password: Option<String>,

    /// Bearer token.
    pub token: Option<String>,

    /// Default output format.
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// Default config file path.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("io", "sslctx", "sslctx")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Config file path, honoring an explicit override (`~` is expanded).
    pub fn path(custom: Option<&Path>) -> Result<PathBuf> {
        match custom {
            Some(path) => {
                let raw = path.to_string_lossy();
                Ok(PathBuf::from(shellexpand::tilde(&raw).as_ref()))
            }
            None => Self::default_path(),
        }
    }

    /// Load configuration from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Set a value by key name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.to_string();
        match key {
            "url" => self.url = Some(value),
            "username" | "user" => self.username = Some(value),
            "password" => self.password = Some(value),
            "token" => self.token = Some(value),
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            _ => anyhow::bail!(
                "Unknown config key: {}\n\n\
                 Available keys:\n  \
                 url            - Server base URL\n  \
                 username       - Username for basic authentication\n  \
                 password       - Password for basic authentication\n  \
                 token          - Bearer token (overrides username/password)\n  \
                 output_format  - Default output format (pretty/json/csv/yaml)",
                key
            ),
        }
        Ok(())
    }

    /// Credentials from this configuration; a token wins over a username.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        if let Some(token) = &self.token {
            Credentials::bearer(token.clone())
        } else if let Some(username) = &self.username {
            Credentials::Basic {
                username: username.clone(),
                password: self.password.clone(),
            }
        } else {
            Credentials::None
        }
    }

    /// Overlay values given on the command line or through the environment.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            url: overrides.url.or(self.url),
            username: overrides.username.or(self.username),
            password: overrides.password.or(self.password),
            token: overrides.token.or(self.token),
            output_format: overrides.output_format.or(self.output_format),
        }
    }
}

/// Mask a secret for display.
#[must_use]
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..2].iter().collect();
        let tail: String = chars[chars.len() - 2..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}
