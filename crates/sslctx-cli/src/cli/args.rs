//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use sslctx_core::CertificateStatus;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Review and decide on TLS certificates a server refused to trust
///
/// Every chain the server failed to validate on an outbound connection is
/// recorded as rejected. Approve it to trust it from then on, reject it
/// again later, or delete the record.
#[derive(Parser, Debug)]
#[command(name = "sslctx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Server base URL, e.g. https://scm.example.com/scm
    #[arg(short = 'u', long, env = "SSLCTX_URL", global = true)]
    pub url: Option<String>,

    /// Username for basic authentication
    #[arg(long, env = "SSLCTX_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password for basic authentication
    #[arg(long, env = "SSLCTX_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Bearer token, used instead of username and password
    #[arg(long, env = "SSLCTX_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Configuration file to use instead of the default location
    #[arg(short, long, env = "SSLCTX_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List approved and rejected certificates
    List(ListArgs),

    /// Show a certificate with its issuer chain
    Show(ShowArgs),

    /// Trust a rejected certificate
    Approve(ActionArgs),

    /// Stop trusting an approved certificate
    Reject(ActionArgs),

    /// Delete a rejected certificate record
    Remove(ActionArgs),

    /// Upload a certificate file to trust
    Upload(UploadArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// List command
// ============================================================================

/// Which collections to list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Collection {
    /// Approved certificates only
    Approved,
    /// Rejected certificates only
    Rejected,
    /// Both collections
    #[default]
    All,
}

impl Collection {
    /// Statuses covered by this selection
    #[must_use]
    pub fn statuses(self) -> &'static [CertificateStatus] {
        match self {
            Self::Approved => &[CertificateStatus::Approved],
            Self::Rejected => &[CertificateStatus::Rejected],
            Self::All => &[CertificateStatus::Rejected, CertificateStatus::Approved],
        }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Collection to list
    #[arg(value_enum, default_value_t = Collection::All)]
    pub collection: Collection,
}

// ============================================================================
// Show command
// ============================================================================

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Fingerprint of the certificate
    pub fingerprint: String,

    /// Show details of this chain entry instead of the leaf
    #[arg(short, long, value_name = "FINGERPRINT")]
    pub select: Option<String>,
}

// ============================================================================
// Approve / reject / remove commands
// ============================================================================

#[derive(Args, Debug)]
pub struct ActionArgs {
    /// Fingerprint of the certificate
    pub fingerprint: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

// ============================================================================
// Upload command
// ============================================================================

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Certificate file (PEM or DER), below 50000 bytes
    pub file: PathBuf,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key to set (url, username, password, token, output_format)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_defaults_to_all() {
        let cli = Cli::parse_from(["sslctx", "list"]);
        match cli.command {
            Commands::List(args) => assert_eq!(args.collection, Collection::All),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["sslctx", "approve", "ab:cd", "--yes", "-o", "json"]);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        match cli.command {
            Commands::Approve(args) => {
                assert_eq!(args.fingerprint, "ab:cd");
                assert!(args.yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn all_lists_rejected_first() {
        assert_eq!(
            Collection::All.statuses(),
            &[CertificateStatus::Rejected, CertificateStatus::Approved]
        );
    }
}
