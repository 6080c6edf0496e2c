use std::io;

use slackcli_core::{ConfigError, WorkspaceError};
use slackcli_slack::{ApiFailure, ClassifiedError, ErrorCategory};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error(transparent)]
    Slack(#[from] ClassifiedError),
    #[error("no token found. Run 'slackcli auth login' or set SLACK_TOKEN")]
    MissingToken,
    #[error("command \"{0}\" is a write operation and cannot be used in read-only mode")]
    ReadOnly(String),
    #[error("{0}")]
    Usage(String),
    #[error("{context}: {source}")]
    Io { context: String, source: io::Error },
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
    #[error("MCP server failed: {0}")]
    Mcp(String),
}

impl CliError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Authentication failures exit 2, missing resources 3, everything else 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MissingToken => 2,
            Self::Slack(error) => match error.category {
                ErrorCategory::Auth => 2,
                ErrorCategory::NotFound => 3,
                _ => 1,
            },
            _ => 1,
        }
    }
}

impl From<ApiFailure> for CliError {
    fn from(failure: ApiFailure) -> Self {
        Self::Slack(ClassifiedError::from(failure))
    }
}
