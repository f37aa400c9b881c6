//! # sslctx-cli
//!
//! Command-line console for the SSL context certificate store.
//!
//! ## Features
//!
//! - **Review**: list approved and rejected certificates, newest first
//! - **Inspect**: certificate details with the issuer chain as a tree
//! - **Decide**: approve, reject, or delete through the server's own links
//! - **Upload**: trust a certificate file up front
//! - **Multiple output formats**: Pretty tables, JSON, CSV, YAML

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
