use clap::Subcommand;
use slackcli_mcp::SlackMcpServer;
use tracing::info;

use super::CommandResult;
use crate::context::RunContext;
use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum McpCommand {
    #[command(about = "Serve the Slack tools to an agent over stdio")]
    Serve,
}

pub async fn run(command: McpCommand, ctx: &RunContext) -> Result<CommandResult, CliError> {
    match command {
        McpCommand::Serve => {
            let service = ctx.service()?;
            info!(read_only = ctx.read_only, "starting slackcli MCP surface");
            SlackMcpServer::new(service, ctx.read_only)
                .serve_stdio()
                .await
                .map_err(|error| CliError::Mcp(format!("{error:#}")))?;
            Ok(CommandResult::success(String::new()))
        }
    }
}
