//! `sslctx config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::{mask, Config};
use crate::output::OutputFormat;

pub async fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Set { key, value } => set_config(&ctx, &key, &value),
        ConfigCommands::Path => {
            println!("{}", ctx.config_path.display());
            Ok(())
        }
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    // Show the file contents, not the flag overlay
    let mut config = Config::load(&ctx.config_path)?;
    config.password = config.password.as_deref().map(mask);
    config.token = config.token.as_deref().map(mask);

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&config)?);
        }
        _ => {
            let unset = || "(not set)".dimmed().to_string();

            println!("{}", "Current Configuration:".bold());
            println!();
            println!("  {} {}", "url:".bold(), config.url.clone().unwrap_or_else(unset));
            println!("  {} {}", "username:".bold(), config.username.clone().unwrap_or_else(unset));
            println!("  {} {}", "password:".bold(), config.password.clone().unwrap_or_else(unset));
            println!("  {} {}", "token:".bold(), config.token.clone().unwrap_or_else(unset));
            println!(
                "  {} {}",
                "output_format:".bold(),
                config.output_format.unwrap_or_default()
            );
        }
    }

    Ok(())
}

fn set_config(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config = Config::load(&ctx.config_path)?;
    config.set(key, value)?;
    config.save(&ctx.config_path)?;

    let shown = if matches!(key, "password" | "token") {
        mask(value)
    } else {
        value.to_string()
    };
    println!("{} {} set to {}.", "Success:".green().bold(), key, shown.cyan());

    Ok(())
}
