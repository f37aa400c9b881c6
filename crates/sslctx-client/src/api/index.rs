//! Index resource endpoints.

use crate::client::INDEX_PATH;
use crate::SslContextClient;
use sslctx_core::{IndexResource, Result, SslContextLinks};
use tracing::debug;

/// Index resource endpoints
pub struct IndexApi<'a> {
    client: &'a SslContextClient,
}

impl<'a> IndexApi<'a> {
    pub(crate) fn new(client: &'a SslContextClient) -> Self {
        Self { client }
    }

    /// Fetch the API root resource
    pub async fn get(&self) -> Result<IndexResource> {
        self.client.get(INDEX_PATH).await
    }

    /// Fetch the SSL context links, `None` if the feature is not offered
    pub async fn ssl_context(&self) -> Result<Option<SslContextLinks>> {
        let index = self.get().await?;
        let links = index.ssl_context();
        if links.is_none() {
            debug!("index carries no sslContext link");
        }
        Ok(links)
    }
}
