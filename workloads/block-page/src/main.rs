//! Serve the latest-block page.

use anyhow::Result;
use clap::Parser;
use weft_sdk::prelude::*;

use block_page::pages;

/// Serve a page showing the latest block of an upstream node.
#[derive(Debug, Parser)]
#[command(name = "block-page")]
struct Args {
    /// Base URL of the upstream node's REST endpoint.
    #[arg(long, env = UPSTREAM_ADDR_VAR, default_value = DEFAULT_UPSTREAM_ADDR)]
    upstream_addr: String,

    /// Address to bind the HTTP server on.
    #[arg(long, env = LISTEN_ADDR_VAR, default_value = DEFAULT_LISTEN_ADDR)]
    listen_addr: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = AppConfig::new(args.upstream_addr, args.listen_addr);
    let client = FetchClient::new(config.upstream_addr.clone());

    App::new(config)
        .page("/", pages::index_page(client), pages::render_index)
        .serve()
        .await?;

    Ok(())
}
