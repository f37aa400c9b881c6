//! `sslctx approve|reject|remove` - Trust decisions on one certificate.

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use serde::Serialize;
use sslctx::{ActionOutcome, TrustAction};

use super::Context;
use crate::cli::args::ActionArgs;
use crate::output::{actions_label, to_csv, OutputFormat};

/// Result of one trust action, for machine-readable output.
#[derive(Debug, Serialize)]
struct ActionRecord<'a> {
    fingerprint: &'a str,
    action: TrustAction,
    message: &'a str,
}

pub async fn execute(ctx: Context, args: ActionArgs, action: TrustAction) -> Result<()> {
    let store = ctx.open_store().await?;
    let snapshot = store.snapshot();

    let Some(cert) = snapshot.find(&args.fingerprint).cloned() else {
        anyhow::bail!(
            "No certificate with fingerprint {}\n\n\
             List fingerprints with: sslctx list",
            args.fingerprint
        );
    };

    if !cert.capabilities().allows(action) {
        anyhow::bail!(
            "Cannot {} {}: the server does not allow it.\n\
             Allowed actions: {}",
            action,
            cert.common_name(),
            actions_label(&cert)
        );
    }

    if needs_confirmation(action) && !args.yes {
        let prompt = format!("{} certificate {}?", verb(action), cert.common_name());
        let confirmed = Confirm::new().with_prompt(prompt).default(false).interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let executor = store.executor();
    let spinner = ctx.spinner("Sending request...");
    let outcome = executor.execute(&cert, action).await;
    spinner.finish_and_clear();

    let message = match outcome {
        ActionOutcome::Success { message } => message.unwrap_or_default(),
        ActionOutcome::Failure { error } => return Err(anyhow::Error::new(error)),
    };

    let record = ActionRecord {
        fingerprint: &cert.fingerprint,
        action,
        message: &message,
    };

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&record)?);
        }
        OutputFormat::Csv => {
            print!("{}", to_csv([&record])?);
        }
        OutputFormat::Pretty => {
            println!("{} {}", "Success:".green().bold(), capitalize(&message));
            println!("  {} {}", "Certificate:".bold(), cert.common_name().cyan());
            println!("  {} {}", "Fingerprint:".bold(), cert.fingerprint);
        }
    }

    Ok(())
}

/// Reject and remove take trust away or discard a record; approve does not.
const fn needs_confirmation(action: TrustAction) -> bool {
    matches!(action, TrustAction::Reject | TrustAction::Remove)
}

const fn verb(action: TrustAction) -> &'static str {
    match action {
        TrustAction::Approve => "Approve",
        TrustAction::Reject => "Reject",
        TrustAction::Remove => "Delete",
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
