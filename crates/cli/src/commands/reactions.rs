use clap::{Args, Subcommand};
use serde_json::json;

use super::{CommandResult, PageFlags};
use crate::context::RunContext;
use crate::error::CliError;

#[derive(Debug, Clone, Args)]
pub struct ReactionTarget {
    #[arg(long = "channel", help = "Channel ID")]
    pub channel_id: String,
    #[arg(long, help = "Message timestamp")]
    pub timestamp: String,
    #[arg(long, help = "Emoji name (without colons)")]
    pub name: String,
}

#[derive(Debug, Subcommand)]
pub enum ReactionsCommand {
    #[command(about = "Add a reaction to a message")]
    Add(ReactionTarget),
    #[command(about = "Remove a reaction from a message")]
    Remove(ReactionTarget),
    #[command(about = "List items a user has reacted to")]
    List {
        #[arg(long = "user", help = "User ID (defaults to the authenticated user)")]
        user_id: Option<String>,
        #[command(flatten)]
        page: PageFlags,
    },
}

impl ReactionsCommand {
    pub fn write_name(&self) -> Option<&'static str> {
        match self {
            Self::Add(_) => Some("add"),
            Self::Remove(_) => Some("remove"),
            Self::List { .. } => None,
        }
    }
}

pub async fn run(command: ReactionsCommand, ctx: &RunContext) -> Result<CommandResult, CliError> {
    let service = ctx.service()?;

    match command {
        ReactionsCommand::Add(target) => {
            service.add_reaction(&target.channel_id, &target.timestamp, &target.name).await?;
            CommandResult::render(&json!({ "status": "added", "reaction": target.name }), ctx.format)
        }
        ReactionsCommand::Remove(target) => {
            service.remove_reaction(&target.channel_id, &target.timestamp, &target.name).await?;
            CommandResult::render(&json!({ "status": "removed", "reaction": target.name }), ctx.format)
        }
        ReactionsCommand::List { user_id, page } => {
            let result = service.list_reactions(user_id.as_deref(), &page.to_request()).await?;
            CommandResult::render(&result, ctx.format)
        }
    }
}
