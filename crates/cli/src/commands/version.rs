use serde::Serialize;
use slackcli_core::OutputFormat;

use super::CommandResult;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
}

pub fn run(format: OutputFormat) -> Result<CommandResult, CliError> {
    CommandResult::render(
        &VersionInfo { name: "slackcli", version: env!("CARGO_PKG_VERSION") },
        format,
    )
}
