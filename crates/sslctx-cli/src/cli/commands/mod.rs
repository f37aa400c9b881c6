//! Command implementations.

pub mod action;
pub mod config;
pub mod list;
pub mod show;
pub mod upload;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use sslctx::{SslContextClient, TrustStore};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective configuration: file values overlaid with flags and env
    pub config: Config,

    /// Path of the configuration file in use
    pub config_path: PathBuf,

    /// Output format
    pub output_format: OutputFormat,

    /// Verbose output
    pub verbose: bool,

    /// Disable colors
    pub no_color: bool,
}

impl Context {
    /// Get the server URL, returning an error if not set.
    pub fn require_url(&self) -> Result<&str> {
        self.config.url.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "Server URL required.\n\n\
                 Set it with one of:\n  \
                 1. --url <URL>\n  \
                 2. SSLCTX_URL environment variable\n  \
                 3. sslctx config set url <URL>"
            )
        })
    }

    /// Create a client for the configured server.
    pub fn client(&self) -> Result<SslContextClient> {
        let url = self.require_url()?;
        let client = SslContextClient::builder(url)
            .credentials(self.config.credentials())
            .build()?;
        Ok(client)
    }

    /// Discover the feature and load both collections.
    pub async fn open_store(&self) -> Result<TrustStore> {
        let client = self.client()?;
        let spinner = self.spinner("Loading certificates...");
        let store = TrustStore::open(client).await;
        spinner.finish_and_clear();

        let store = match store {
            Ok(store) => store,
            Err(e) if e.is_auth_error() => {
                return Err(anyhow::Error::new(e).context(
                    "Access denied.\n\n\
                     Check --username/--password or --token, or store them with:\n  \
                     sslctx config set username <USER>",
                ));
            }
            Err(e) => return Err(e.into()),
        };

        store.ok_or_else(|| {
            anyhow::anyhow!(
                "The server does not offer SSL context management.\n\
                 Check the URL and that your account may read the trust store."
            )
        })
    }

    /// Spinner on stderr; hidden for machine-readable output.
    pub fn spinner(&self, message: &'static str) -> ProgressBar {
        if self.output_format != OutputFormat::Pretty {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}
