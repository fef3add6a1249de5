//! The `block` component: latest block header from the upstream node.

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use weft_sdk::prelude::*;

/// Upstream route for the latest block.
pub const LATEST_BLOCK_ROUTE: &str = "/cosmos/base/tendermint/v1beta1/blocks/latest";

/// Action name refreshing the block component in place.
pub const RELOAD_ACTION: &str = "reload-block";

/// Latest-block payload, shaped like the upstream response.
///
/// Only the header subset is consumed; unknown upstream fields are
/// ignored and missing ones default to empty, so a degraded state is the
/// zero value throughout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockInfo {
    pub block: Block,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Block {
    pub header: BlockHeader,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockHeader {
    pub chain_id: String,
    pub height: String,
    pub proposer_address: String,
    pub time: String,
}

/// Fetch and decode the latest block, absorbing failures.
///
/// Transport and decode failures are logged and surface as the zero
/// value; the page renders degraded content instead of an error.
pub async fn fetch_block_info(client: &FetchClient) -> BlockInfo {
    let body = match client.get_raw(LATEST_BLOCK_ROUTE).await {
        Ok(body) => body,
        Err(err) => {
            warn!(%err, "Failed to query HTTP");
            return BlockInfo::default();
        }
    };

    match decode_json::<BlockInfo>(&body) {
        Ok(state) => state,
        Err(err) => {
            warn!(%err, "Failed to unmarshal response");
            BlockInfo::default()
        }
    }
}

/// Build the `block` component over the given fetch client.
///
/// The default path and the `reload-block` action run the same fetch;
/// the action exists so the client can refresh the fragment on demand.
pub fn block_component(client: FetchClient) -> Component<BlockInfo> {
    let fetch_client = client.clone();
    Component::new("block", move |_ctx| {
        let client = fetch_client.clone();
        async move { fetch_block_info(&client).await }.boxed()
    })
    .action(RELOAD_ACTION, move |_ctx, _args| {
        let client = client.clone();
        async move {
            let state = fetch_block_info(&client).await;
            info!(height = %state.block.header.height, "new block info fetched");
            state
        }
        .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    const VALID_PAYLOAD: &str = r#"{
        "block_id": { "hash": "ignored" },
        "block": {
            "header": {
                "chain_id": "weft-test-1",
                "height": "12345",
                "proposer_address": "A1B2C3",
                "time": "2024-01-15T10:00:00Z",
                "app_hash": "ignored"
            }
        }
    }"#;

    /// Serve the same canned HTTP response for every connection.
    async fn canned_upstream(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        format!("http://{}", addr)
    }

    async fn refused_upstream() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_parses_documented_payload() {
        let client = FetchClient::new(canned_upstream(VALID_PAYLOAD).await);

        let state = fetch_block_info(&client).await;

        assert_eq!(state.block.header.height, "12345");
        assert_eq!(state.block.header.chain_id, "weft-test-1");
        assert_eq!(state.block.header.proposer_address, "A1B2C3");
        assert_eq!(state.block.header.time, "2024-01-15T10:00:00Z");
    }

    #[tokio::test]
    async fn test_transport_failure_yields_empty_state() {
        let client = FetchClient::new(refused_upstream().await);

        let state = fetch_block_info(&client).await;

        assert_eq!(state.block.header.height, "");
        assert_eq!(state, BlockInfo::default());
    }

    #[tokio::test]
    async fn test_malformed_body_yields_empty_state() {
        let client = FetchClient::new(canned_upstream("not json").await);

        let state = fetch_block_info(&client).await;

        assert_eq!(state, BlockInfo::default());
    }

    #[tokio::test]
    async fn test_reload_action_refreshes_state() {
        let client = FetchClient::new(canned_upstream(VALID_PAYLOAD).await);
        let component = block_component(client);
        let ctx = Arc::new(
            RequestContext::new(Method::Post, "/actions/block/reload-block")
                .with_action(ActionInvocation::new(RELOAD_ACTION, vec![])),
        );

        let state = runner::run(&ctx, &component).await;

        assert_eq!(state.block.header.height, "12345");
    }

    #[test]
    fn test_reencode_preserves_height() {
        let state: BlockInfo = serde_json::from_str(VALID_PAYLOAD).unwrap();
        let reencoded = serde_json::to_string(&state).unwrap();
        let round_tripped: BlockInfo = serde_json::from_str(&reencoded).unwrap();

        assert_eq!(round_tripped.block.header.height, "12345");
        assert_eq!(round_tripped, state);
    }
}
