//! Standalone Slack MCP server binary.
//!
//! ## Usage
//!
//! ```bash
//! # Token from the environment
//! SLACK_TOKEN=xoxb-... slackcli-mcp
//!
//! # Active workspace saved by `slackcli auth login`, writes disabled
//! SLACKCLI_READ_ONLY=true slackcli-mcp
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use slackcli_core::{init_logging, AppConfig, LoadOptions, TokenResolver, WorkspaceStore};
use slackcli_mcp::SlackMcpServer;
use slackcli_slack::{ClientOptions, SlackClient};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config.logging);

    let store = WorkspaceStore::load_default()?;
    let Some((token, source)) = TokenResolver::from_env(None, None).resolve_with_source(&store) else {
        bail!("no token found. Set SLACK_TOKEN or run 'slackcli auth login'");
    };
    info!(%source, "resolved Slack token");

    let client = SlackClient::with_options(
        token,
        ClientOptions {
            api_base_url: config.slack.api_base_url.clone(),
            timeout: Duration::from_secs(config.slack.timeout_secs),
            ..ClientOptions::default()
        },
    )?;

    SlackMcpServer::new(Arc::new(client), config.output.read_only).serve_stdio().await
}
