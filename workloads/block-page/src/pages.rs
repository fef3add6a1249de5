//! Index page: shell, block fragment and client-side reload wiring.

use std::sync::Arc;

use serde_json::Value;
use weft_sdk::prelude::*;

use crate::block::block_component;

/// Template identifier of the index page.
pub const INDEX_TEMPLATE: &str = "page.index";

/// Build the index page over the given fetch client.
pub fn index_page(client: FetchClient) -> Page {
    Page::new("index", INDEX_TEMPLATE).component("block", Arc::new(block_component(client)))
}

/// Render the index page around its resolved component states.
pub fn render_index(resolved: &ResolvedPage) -> String {
    let empty = Value::Null;
    let block = resolved.get("block").unwrap_or(&empty);

    let shell = Shell::new(
        HeadContent::new("Latest Block")
            .with_meta("viewport", "width=device-width, initial-scale=1")
            .with_style(INDEX_STYLES)
            .with_script(RELOAD_SCRIPT),
    )
    .with_body_start(
        "<body>\n<main class=\"block-page\">\n<h1>Latest Block</h1>\n".to_string(),
    )
    .with_body_end("</main>\n</body>\n</html>".to_string());

    shell.render_page(&[render_block(block)])
}

/// Render the block component's fragment.
///
/// Degraded states render with empty fields; the page itself never
/// fails on upstream trouble.
pub fn render_block(state: &Value) -> String {
    let header = &state["block"]["header"];
    let field = |key: &str| escape_html(header[key].as_str().unwrap_or(""));

    format!(
        r#"<section id="block" class="block-card">
<dl>
<dt>Chain</dt><dd id="block-chain-id">{chain_id}</dd>
<dt>Height</dt><dd id="block-height">{height}</dd>
<dt>Proposer</dt><dd id="block-proposer">{proposer}</dd>
<dt>Time</dt><dd id="block-time">{time}</dd>
</dl>
<button class="block-reload" onclick="reloadBlock()">Reload</button>
</section>"#,
        chain_id = field("chain_id"),
        height = field("height"),
        proposer = field("proposer_address"),
        time = field("time"),
    )
}

/// Client-side wiring for the reload action: POST to the action
/// endpoint, then patch the fragment from the returned state.
const RELOAD_SCRIPT: &str = r#"
async function reloadBlock() {
    const response = await fetch('/actions/block/reload-block', { method: 'POST', body: '[]' });
    const state = await response.json();
    const header = ((state || {}).block || {}).header || {};
    const fields = [
        ['block-chain-id', 'chain_id'],
        ['block-height', 'height'],
        ['block-proposer', 'proposer_address'],
        ['block-time', 'time'],
    ];
    for (const [id, key] of fields) {
        document.getElementById(id).textContent = header[key] || '';
    }
}
"#;

/// CSS styles for the index page.
const INDEX_STYLES: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; background: #f5f5f5; }
.block-page { max-width: 640px; margin: 0 auto; padding: 2rem; }
.block-card { background: white; padding: 1.5rem 2rem; border-radius: 8px; }
.block-card dl { display: grid; grid-template-columns: auto 1fr; gap: 0.5rem 1.5rem; }
.block-card dt { color: #666; }
.block-card dd { margin: 0; font-variant-numeric: tabular-nums; }
.block-reload { background: #2196f3; color: white; border: none; padding: 0.75rem 1.5rem; font-size: 1rem; border-radius: 8px; cursor: pointer; margin-top: 1rem; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_block_shows_header_fields() {
        let state = json!({
            "block": {
                "header": {
                    "chain_id": "weft-test-1",
                    "height": "12345",
                    "proposer_address": "A1B2C3",
                    "time": "2024-01-15T10:00:00Z"
                }
            }
        });

        let html = render_block(&state);

        assert!(html.contains(r#"<dd id="block-height">12345</dd>"#));
        assert!(html.contains("weft-test-1"));
        assert!(html.contains("A1B2C3"));
    }

    #[test]
    fn test_render_block_degraded_state_is_empty() {
        let html = render_block(&Value::Null);

        assert!(html.contains(r#"<dd id="block-height"></dd>"#));
        assert!(html.contains("reloadBlock()"));
    }

    #[test]
    fn test_render_block_escapes_header_text() {
        let state = json!({
            "block": { "header": { "chain_id": "<script>alert(1)</script>" } }
        });

        let html = render_block(&state);

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn test_render_index_wraps_fragment_in_shell() {
        // A resolved page with no fields renders the degraded fragment.
        let page = Page::new("index", INDEX_TEMPLATE);
        let ctx = Arc::new(RequestContext::new(Method::Get, "/"));
        let resolved = page.compose(&ctx).resolve().await;

        let html = render_index(&resolved);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Latest Block</title>"));
        assert!(html.contains(r#"<section id="block""#));
        assert!(html.ends_with("</html>"));
    }
}
