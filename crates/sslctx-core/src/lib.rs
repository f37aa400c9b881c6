//! Core types for reviewing TLS certificates and deciding their trust.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - **Types**: the HAL wire model of certificates, collections, and the
//!   index resource, plus the link resolver that decides which trust
//!   actions are offered
//! - **Chain**: root-first navigation through an embedded issuer chain
//! - **Errors**: [`SslContextError`] and the crate-wide [`Result`]
//!
//! # Example
//!
//! ```rust,ignore
//! use sslctx_core::{Certificate, TrustAction};
//!
//! fn describe(cert: &Certificate) {
//!     println!("{} ({})", cert.common_name(), cert.status);
//!     if cert.capabilities().allows(TrustAction::Approve) {
//!         println!("  can be approved");
//!     }
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/sslctx-core/0.1.0")]

pub mod chain;
mod error;
pub mod types;

pub use chain::{ChainEntry, ChainNavigator};
pub use error::{Result, SslContextError};
pub use types::*;
