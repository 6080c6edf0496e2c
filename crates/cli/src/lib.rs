//! `slackcli`: Slack Web API access from the terminal.
//!
//! [`execute`] runs one parsed invocation against injectable [`RunOptions`]
//! so tests can swap the store location, the environment token and the
//! service factory.

pub mod commands;
pub mod context;
pub mod error;
pub mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use slackcli_core::{init_logging, AppConfig, ConfigOverrides, LoadOptions, OutputFormat};
use tracing::debug;

use crate::commands::auth::AuthCommand;
use crate::commands::channels::ChannelsCommand;
use crate::commands::files::FilesCommand;
use crate::commands::mcp::McpCommand;
use crate::commands::messages::MessagesCommand;
use crate::commands::reactions::ReactionsCommand;
use crate::commands::users::UsersCommand;
use crate::commands::CommandResult;
pub use crate::context::{HttpServiceFactory, RunContext, RunOptions, ServiceFactory};
pub use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(
    name = "slackcli",
    version,
    about = "Slack Web API from the command line",
    long_about = "Read and write Slack channels, messages, users, reactions and files, or serve them to an agent over MCP.",
    after_help = "Examples:\n  slackcli auth login --token xoxb-...\n  slackcli channels list --all\n  slackcli --read-only mcp serve"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Slack token (overrides SLACK_TOKEN and saved workspaces)")]
    pub token: Option<String>,
    #[arg(short = 'w', long, global = true, help = "Saved workspace to use")]
    pub workspace: Option<String>,
    #[arg(short = 'o', long, global = true, help = "Output format (json|table)")]
    pub output: Option<OutputFormat>,
    #[arg(long, global = true, help = "Reject write operations")]
    pub read_only: bool,
    #[arg(long, global = true, value_name = "PATH", help = "Config file path")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(subcommand, about = "Manage saved workspaces and tokens")]
    Auth(AuthCommand),
    #[command(subcommand, about = "Channel operations")]
    Channels(ChannelsCommand),
    #[command(subcommand, about = "Message operations")]
    Messages(MessagesCommand),
    #[command(subcommand, about = "User operations")]
    Users(UsersCommand),
    #[command(subcommand, about = "Reaction operations")]
    Reactions(ReactionsCommand),
    #[command(subcommand, about = "File operations")]
    Files(FilesCommand),
    #[command(subcommand, about = "Agent tool server")]
    Mcp(McpCommand),
    #[command(about = "Inspect effective configuration values with source attribution and redaction")]
    Config,
    #[command(about = "Validate config, token resolution and Slack authentication")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Print the slackcli version")]
    Version,
}

impl Command {
    /// Full command path for write operations, `None` for reads.
    pub fn write_command_path(&self) -> Option<String> {
        let (group, name) = match self {
            Self::Channels(command) => ("channels", command.write_name()?),
            Self::Messages(command) => ("messages", command.write_name()?),
            Self::Reactions(command) => ("reactions", command.write_name()?),
            Self::Files(command) => ("files", command.write_name()?),
            _ => return None,
        };
        Some(format!("slackcli {group} {name}"))
    }
}

/// Runs one parsed invocation.
///
/// Write commands are rejected in read-only mode before any token is
/// resolved or service constructed.
pub async fn execute(cli: Cli, options: &RunOptions) -> Result<CommandResult, CliError> {
    let overrides = ConfigOverrides {
        output_format: cli.output,
        read_only: cli.read_only.then_some(true),
        ..ConfigOverrides::default()
    };
    let loaded = AppConfig::load(LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        overrides: overrides.clone(),
    });

    let logging = match &loaded {
        Ok(config) => config.logging.clone(),
        Err(_) => AppConfig::default().logging,
    };
    init_logging(&logging);

    let Cli { token, workspace, config: config_path, command, .. } = cli;

    let ctx = match loaded {
        Ok(config) => RunContext::new(config, options, token, workspace),
        Err(error) => {
            if let Command::Doctor { json } = command {
                return commands::doctor::run(json, Err(error)).await;
            }
            return Err(error.into());
        }
    };

    if ctx.read_only {
        if let Some(path) = command.write_command_path() {
            debug!(command = %path, "rejected write command in read-only mode");
            return Err(CliError::ReadOnly(path));
        }
    }

    match command {
        Command::Auth(command) => commands::auth::run(command, &ctx).await,
        Command::Channels(command) => commands::channels::run(command, &ctx).await,
        Command::Messages(command) => commands::messages::run(command, &ctx).await,
        Command::Users(command) => commands::users::run(command, &ctx).await,
        Command::Reactions(command) => commands::reactions::run(command, &ctx).await,
        Command::Files(command) => commands::files::run(command, &ctx).await,
        Command::Mcp(command) => commands::mcp::run(command, &ctx).await,
        Command::Config => commands::config::run(&ctx, config_path.as_deref(), &overrides),
        Command::Doctor { json } => commands::doctor::run(json, Ok(&ctx)).await,
        Command::Version => commands::version::run(ctx.format),
    }
}

/// Exit status for an argument error. Help and version requests succeed;
/// every other parse failure is a usage error and exits 1, keeping 2 for
/// authentication failures.
pub fn usage_exit_code(error: &clap::Error) -> u8 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return ExitCode::from(usage_exit_code(&error));
        }
    };
    let options = RunOptions::from_process();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("Error: failed to start async runtime: {error}");
            return ExitCode::from(1);
        }
    };

    match runtime.block_on(execute(cli, &options)) {
        Ok(result) => {
            if !result.output.is_empty() {
                println!("{}", result.output);
            }
            ExitCode::from(result.exit_code)
        }
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}
