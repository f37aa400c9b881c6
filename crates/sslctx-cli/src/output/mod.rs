//! Output formatting for different formats.

use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use sslctx_core::{format_local_timestamp, Certificate, CertificateStatus};
use std::str::FromStr;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed tables with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// YAML output
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "table" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => anyhow::bail!(
                "Unknown output format: {}\n\
                 Valid formats: pretty, json, csv, yaml",
                s
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// One table row per certificate.
#[derive(Tabled)]
struct CertificateRow {
    #[tabled(rename = "Common Name")]
    common_name: String,
    #[tabled(rename = "Issuer")]
    issuer: String,
    #[tabled(rename = "Error")]
    error: String,
    #[tabled(rename = "Seen")]
    timestamp: String,
    #[tabled(rename = "Actions")]
    actions: String,
    #[tabled(rename = "Fingerprint")]
    fingerprint: String,
}

impl From<&Certificate> for CertificateRow {
    fn from(cert: &Certificate) -> Self {
        Self {
            common_name: cert.common_name().to_string(),
            issuer: cert.issuer_common_name().to_string(),
            error: cert.error.map(|e| e.to_string()).unwrap_or_default(),
            timestamp: format_local_timestamp(&cert.timestamp),
            actions: actions_label(cert),
            fingerprint: cert.fingerprint.clone(),
        }
    }
}

/// Flat record for CSV output.
#[derive(Debug, Serialize)]
pub struct CertificateRecord<'a> {
    pub status: CertificateStatus,
    pub common_name: &'a str,
    pub subject_dn: &'a str,
    pub issuer_dn: &'a str,
    pub not_before: String,
    pub not_after: String,
    pub sign_alg: &'a str,
    pub error: Option<&'static str>,
    pub timestamp: String,
    pub uploaded: bool,
    pub fingerprint: &'a str,
}

impl<'a> From<&'a Certificate> for CertificateRecord<'a> {
    fn from(cert: &'a Certificate) -> Self {
        Self {
            status: cert.status,
            common_name: cert.common_name(),
            subject_dn: &cert.subject_dn,
            issuer_dn: &cert.issuer_dn,
            not_before: cert.not_before.to_rfc3339(),
            not_after: cert.not_after.to_rfc3339(),
            sign_alg: &cert.sign_alg,
            error: cert.error.map(|e| e.code()),
            timestamp: cert.timestamp.to_rfc3339(),
            uploaded: cert.uploaded,
            fingerprint: &cert.fingerprint,
        }
    }
}

/// Comma-separated actions the server allows on `cert`.
#[must_use]
pub fn actions_label(cert: &Certificate) -> String {
    let caps = cert.capabilities();
    if caps.is_read_only() {
        return "-".to_string();
    }
    caps.actions()
        .map(|action| action.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Colored status label.
#[must_use]
pub fn status_label(status: CertificateStatus) -> ColoredString {
    match status {
        CertificateStatus::Approved => status.as_str().green().bold(),
        CertificateStatus::Rejected => status.as_str().red().bold(),
    }
}

/// Render certificates as a rounded table.
#[must_use]
pub fn certificate_table<'a>(certs: impl IntoIterator<Item = &'a Certificate>) -> String {
    let rows: Vec<CertificateRow> = certs.into_iter().map(CertificateRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Render certificates as CSV with a header row.
pub fn certificate_csv<'a>(certs: impl IntoIterator<Item = &'a Certificate>) -> anyhow::Result<String> {
    to_csv(certs.into_iter().map(CertificateRecord::from))
}

/// Render serializable records as CSV with a header row.
pub fn to_csv<T: Serialize>(records: impl IntoIterator<Item = T>) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("{}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cert() -> Certificate {
        serde_json::from_value(serde_json::json!({
            "fingerprint": "ab:cd",
            "subjectDN": "CN=git.example.com,O=Example",
            "issuerDN": "CN=Example CA,O=Example",
            "notBefore": "2024-01-01T00:00:00Z",
            "notAfter": "2025-01-01T00:00:00Z",
            "signAlg": "SHA256withRSA",
            "timestamp": "2024-06-01T12:00:00Z",
            "status": "REJECTED",
            "error": "EXPIRED",
            "_links": {
                "approve": {"href": "/approve"},
                "remove": {"href": "/remove"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Pretty);
        assert_eq!("YML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn lists_allowed_actions() {
        assert_eq!(actions_label(&cert()), "approve, remove");
    }

    #[test]
    fn csv_has_header_and_error_code() {
        let csv = certificate_csv([&cert()]).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("status,common_name,subject_dn"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("REJECTED,git.example.com,"));
        assert!(row.contains("CERTIFICATE_EXPIRED"));
    }

    #[test]
    fn table_shows_common_names() {
        let table = certificate_table([&cert()]);
        assert!(table.contains("git.example.com"));
        assert!(table.contains("Example CA"));
    }
}
