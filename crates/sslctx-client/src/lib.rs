//! HTTP client and trust-decision workflow for the SSL context API.
//!
//! [`SslContextClient`] speaks HAL over HTTP. The [`trust`] module builds the
//! stateful workflow on top of it: two collection fetchers refreshed
//! together by a [`TrustStore`], a [`TrustActionExecutor`] for approve,
//! reject, and remove, and an [`UploadSubmitter`] for new certificates.

#![doc(html_root_url = "https://docs.rs/sslctx-client/0.1.0")]

mod client;
mod config;
pub mod api;
pub mod trust;

pub use client::{SslContextClient, SslContextClientBuilder};
pub use config::*;
pub use sslctx_core::{Result, SslContextError};
pub use trust::{
    ActionState, CertificateFile, CollectionFetcher, CollectionState, Refresh,
    TrustActionExecutor, TrustSnapshot, TrustStore, UploadState, UploadSubmitter,
};
