//! `sslctx upload` - Upload a certificate file to trust.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use sslctx::{ActionOutcome, CertificateFile};

use super::Context;
use crate::cli::args::UploadArgs;
use crate::output::{to_csv, OutputFormat};

/// Result of an upload, for machine-readable output.
#[derive(Debug, Serialize)]
struct UploadRecord<'a> {
    file: &'a str,
    size: usize,
    message: &'a str,
}

pub async fn execute(ctx: Context, args: UploadArgs) -> Result<()> {
    let file = CertificateFile::read(&args.file).await?;

    let store = ctx.open_store().await?;
    let Some(uploader) = store.uploader() else {
        anyhow::bail!("The server does not allow certificate uploads for this account.");
    };

    let name = file.name.clone();
    let size = file.size();
    uploader.select(file);

    let spinner = ctx.spinner("Uploading certificate...");
    let outcome = uploader.submit().await;
    spinner.finish_and_clear();

    let message = match outcome {
        ActionOutcome::Success { message } => message.unwrap_or_default(),
        ActionOutcome::Failure { error } => return Err(anyhow::Error::new(error)),
    };

    let record = UploadRecord {
        file: &name,
        size,
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
            println!("{} Uploaded {} ({} bytes).", "Success:".green().bold(), name.cyan(), size);
            println!();
            println!("List approved certificates with: {} list approved", "sslctx".cyan());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_quotes_file_names_with_commas() {
        let record = UploadRecord {
            file: "my,cert.pem",
            size: 1_234,
            message: "certificate uploaded",
        };
        let csv = to_csv([&record]).unwrap();
        assert_eq!(
            csv,
            "file,size,message\n\"my,cert.pem\",1234,certificate uploaded\n"
        );
    }
}
