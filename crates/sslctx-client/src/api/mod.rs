//! API endpoint modules.

mod certificates;
mod index;

pub use certificates::{CertificateApi, OCTET_STREAM, UPLOAD_LIMIT_BYTES};
pub use index::IndexApi;
