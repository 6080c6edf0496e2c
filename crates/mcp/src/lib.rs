//! Slack MCP (Model Context Protocol) server.
//!
//! Exposes every [`slackcli_slack::SlackService`] operation as an agent tool
//! over stdio.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use secrecy::SecretString;
//! use slackcli_mcp::SlackMcpServer;
//! use slackcli_slack::SlackClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = SlackClient::new(SecretString::from("xoxb-..."))?;
//!     SlackMcpServer::new(Arc::new(client), true).serve_stdio().await
//! }
//! ```

mod server;
pub mod tools;

pub use server::SlackMcpServer;
pub use tools::{is_write_tool, ALL_TOOL_NAMES, TOTAL_TOOLS, WRITE_TOOL_NAMES};
