//! sslctx - review and decide on TLS certificates a server refused to trust.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    sslctx_cli::run().await
}
