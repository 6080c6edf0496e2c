pub mod auth;
pub mod channels;
pub mod config;
pub mod doctor;
pub mod files;
pub mod mcp;
pub mod messages;
pub mod reactions;
pub mod users;
pub mod version;

use clap::Args;
use serde::Serialize;
use slackcli_core::OutputFormat;
use slackcli_slack::PaginationRequest;

use crate::error::CliError;
use crate::output;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    pub fn render<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<Self, CliError> {
        Ok(Self::success(output::render(value, format)?))
    }
}

/// Shared `--cursor/--limit/--all` flags for list commands.
#[derive(Debug, Clone, Args)]
pub struct PageFlags {
    #[arg(long, default_value = "", help = "Pagination cursor from a previous page")]
    pub cursor: String,
    #[arg(long, default_value_t = 100, help = "Number of items per page")]
    pub limit: i64,
    #[arg(long, help = "Fetch every page (auto-paginate)")]
    pub all: bool,
}

impl PageFlags {
    pub fn to_request(&self) -> PaginationRequest {
        PaginationRequest { cursor: self.cursor.clone(), limit: self.limit, fetch_all: self.all }
    }
}
