//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration, then overlay flags and environment
    let config_path = Config::path(cli.config.as_deref())?;
    debug!(path = %config_path.display(), "loading configuration");
    let config = Config::load(&config_path)?.merge(Config {
        url: cli.url,
        username: cli.username,
        password: cli.password,
        token: cli.token,
        output_format: cli.output,
    });

    // Create context for commands
    let ctx = commands::Context {
        output_format: config.output_format.unwrap_or_default(),
        config,
        config_path,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };

    // Dispatch to appropriate command
    match cli.command {
        Commands::List(args) => commands::list::execute(ctx, args).await,
        Commands::Show(args) => commands::show::execute(ctx, args).await,
        Commands::Approve(args) => {
            commands::action::execute(ctx, args, sslctx::TrustAction::Approve).await
        }
        Commands::Reject(args) => {
            commands::action::execute(ctx, args, sslctx::TrustAction::Reject).await
        }
        Commands::Remove(args) => {
            commands::action::execute(ctx, args, sslctx::TrustAction::Remove).await
        }
        Commands::Upload(args) => commands::upload::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(ctx, args).await,
    }
}

/// Log to stderr: warnings by default, debug with `--verbose`, `RUST_LOG` wins.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
