//! `sslctx show` - Certificate details with the issuer chain.

use anyhow::Result;
use colored::Colorize;
use sslctx::{format_local_timestamp, Certificate, ChainNavigator};

use super::Context;
use crate::cli::args::ShowArgs;
use crate::output::{actions_label, certificate_csv, status_label, OutputFormat};

pub async fn execute(ctx: Context, args: ShowArgs) -> Result<()> {
    let store = ctx.open_store().await?;
    let snapshot = store.snapshot();

    let Some(cert) = snapshot.find(&args.fingerprint) else {
        anyhow::bail!(
            "No certificate with fingerprint {}\n\n\
             List fingerprints with: sslctx list",
            args.fingerprint
        );
    };

    let mut navigator = ChainNavigator::new(cert);
    if let Some(selected) = &args.select {
        if !navigator.select_fingerprint(selected) {
            anyhow::bail!("{} is not part of the chain of {}", selected, args.fingerprint);
        }
    }

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(navigator.selected())?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(navigator.selected())?);
        }
        OutputFormat::Csv => {
            let chain = navigator.entries().map(|entry| entry.certificate);
            print!("{}", certificate_csv(chain)?);
        }
        OutputFormat::Pretty => {
            print_details(navigator.selected());
            if navigator.len() > 1 {
                println!();
                print_chain(&navigator);
            }
        }
    }

    Ok(())
}

fn print_details(cert: &Certificate) {
    println!("{} {}", "Certificate:".bold(), cert.common_name().cyan().bold());
    println!();
    println!("  {} {}", "Subject:".bold(), cert.subject_dn);
    println!("  {} {}", "Issuer:".bold(), cert.issuer_dn);
    println!("  {} {}", "Valid from:".bold(), format_local_timestamp(&cert.not_before));
    println!("  {} {}", "Valid until:".bold(), format_local_timestamp(&cert.not_after));
    if !cert.sign_alg.is_empty() {
        println!("  {} {}", "Signature:".bold(), cert.sign_alg);
    }
    println!("  {} {}", "Fingerprint:".bold(), cert.fingerprint);
    println!();
    println!("  {} {}", "Status:".bold(), status_label(cert.status));
    if let Some(error) = cert.error {
        println!("  {} {}", "Error:".bold(), error.to_string().red());
    }
    println!("  {} {}", "Seen:".bold(), format_local_timestamp(&cert.timestamp));
    if cert.uploaded {
        println!("  {} {}", "Source:".bold(), "uploaded");
    }
    println!("  {} {}", "Actions:".bold(), actions_label(cert));
}

fn print_chain(navigator: &ChainNavigator) {
    println!("{}", "Chain:".bold().underline());
    for entry in navigator.entries() {
        let indent = "  ".repeat(entry.depth);
        let branch = if entry.depth == 0 { "" } else { "└─ " };
        let name = entry.certificate.common_name();
        let line = format!("{indent}{branch}{name}");
        if entry.selected {
            println!("  {} {}", line.cyan().bold(), "◀".cyan());
        } else {
            println!("  {line}");
        }
        println!("  {indent}{}", entry.certificate.fingerprint.dimmed());
    }
}
