//! `sslctx list` - List approved and rejected certificates.

use anyhow::Result;
use colored::Colorize;
use sslctx::{Certificate, CertificateStatus, TrustSnapshot};
use std::collections::BTreeMap;

use super::Context;
use crate::cli::args::ListArgs;
use crate::output::{certificate_csv, certificate_table, OutputFormat};

pub async fn execute(ctx: Context, args: ListArgs) -> Result<()> {
    let store = ctx.open_store().await?;
    let snapshot = store.snapshot();
    let statuses = args.collection.statuses();

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&by_status(&snapshot, statuses))?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&by_status(&snapshot, statuses))?);
        }
        OutputFormat::Csv => {
            let certs = statuses
                .iter()
                .flat_map(|status| newest_first(&snapshot, *status));
            print!("{}", certificate_csv(certs)?);
        }
        OutputFormat::Pretty => print_pretty(&snapshot, statuses),
    }

    // Each collection loads on its own; report what failed after showing the rest
    let failures: Vec<String> = statuses
        .iter()
        .filter_map(|status| {
            snapshot
                .collection(*status)
                .error
                .as_ref()
                .map(|e| format!("{status}: {e}"))
        })
        .collect();
    if !failures.is_empty() {
        anyhow::bail!("Could not load certificates\n  {}", failures.join("\n  "));
    }

    Ok(())
}

fn newest_first(snapshot: &TrustSnapshot, status: CertificateStatus) -> Vec<&Certificate> {
    snapshot
        .collection(status)
        .data
        .as_ref()
        .map(|collection| collection.newest_first())
        .unwrap_or_default()
}

fn by_status<'a>(
    snapshot: &'a TrustSnapshot,
    statuses: &[CertificateStatus],
) -> BTreeMap<&'static str, Vec<&'a Certificate>> {
    statuses
        .iter()
        .filter(|status| snapshot.collection(**status).data.is_some())
        .map(|status| (status.as_str(), newest_first(snapshot, *status)))
        .collect()
}

fn print_pretty(snapshot: &TrustSnapshot, statuses: &[CertificateStatus]) {
    for (i, status) in statuses.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let state = snapshot.collection(*status);
        let certs = newest_first(snapshot, *status);

        let heading = match status {
            CertificateStatus::Approved => "Approved certificates",
            CertificateStatus::Rejected => "Rejected certificates",
        };
        println!("{} ({})", heading.bold(), certs.len());

        if let Some(error) = &state.error {
            println!("  {} {}", "Error:".red().bold(), error);
        } else if certs.is_empty() {
            println!("  {}", "None.".dimmed());
        } else {
            println!("{}", certificate_table(certs));
        }
    }
}
