use clap::Subcommand;
use serde_json::json;

use super::{CommandResult, PageFlags};
use crate::context::RunContext;
use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum ChannelsCommand {
    #[command(about = "List channels")]
    List {
        #[command(flatten)]
        page: PageFlags,
    },
    #[command(about = "Get channel info")]
    Info {
        #[arg(value_name = "CHANNEL_ID")]
        channel_id: String,
    },
    #[command(about = "Create a channel")]
    Create {
        name: String,
        #[arg(long, help = "Create as private channel")]
        private: bool,
    },
    #[command(about = "Archive a channel")]
    Archive {
        #[arg(value_name = "CHANNEL_ID")]
        channel_id: String,
    },
    #[command(about = "Invite users to a channel")]
    Invite {
        #[arg(value_name = "CHANNEL_ID")]
        channel_id: String,
        #[arg(value_name = "USER_ID", required = true)]
        user_ids: Vec<String>,
    },
    #[command(about = "Remove a user from a channel")]
    Kick {
        #[arg(value_name = "CHANNEL_ID")]
        channel_id: String,
        #[arg(value_name = "USER_ID")]
        user_id: String,
    },
    #[command(about = "Set channel topic")]
    Topic {
        #[arg(value_name = "CHANNEL_ID")]
        channel_id: String,
        topic: String,
    },
    #[command(about = "Set channel purpose")]
    Purpose {
        #[arg(value_name = "CHANNEL_ID")]
        channel_id: String,
        purpose: String,
    },
}

impl ChannelsCommand {
    pub fn write_name(&self) -> Option<&'static str> {
        match self {
            Self::List { .. } | Self::Info { .. } => None,
            Self::Create { .. } => Some("create"),
            Self::Archive { .. } => Some("archive"),
            Self::Invite { .. } => Some("invite"),
            Self::Kick { .. } => Some("kick"),
            Self::Topic { .. } => Some("topic"),
            Self::Purpose { .. } => Some("purpose"),
        }
    }
}

pub async fn run(command: ChannelsCommand, ctx: &RunContext) -> Result<CommandResult, CliError> {
    let service = ctx.service()?;

    match command {
        ChannelsCommand::List { page } => {
            let result = service.list_channels(&page.to_request()).await?;
            CommandResult::render(&result, ctx.format)
        }
        ChannelsCommand::Info { channel_id } => {
            let channel = service.get_channel_info(&channel_id).await?;
            CommandResult::render(&channel, ctx.format)
        }
        ChannelsCommand::Create { name, private } => {
            let channel = service.create_channel(&name, private).await?;
            CommandResult::render(&channel, ctx.format)
        }
        ChannelsCommand::Archive { channel_id } => {
            service.archive_channel(&channel_id).await?;
            CommandResult::render(&json!({ "status": "archived", "channel_id": channel_id }), ctx.format)
        }
        ChannelsCommand::Invite { channel_id, user_ids } => {
            service.invite_to_channel(&channel_id, &user_ids).await?;
            CommandResult::render(
                &json!({ "status": "invited", "channel_id": channel_id, "user_ids": user_ids }),
                ctx.format,
            )
        }
        ChannelsCommand::Kick { channel_id, user_id } => {
            service.kick_from_channel(&channel_id, &user_id).await?;
            CommandResult::render(
                &json!({ "status": "removed", "channel_id": channel_id, "user_id": user_id }),
                ctx.format,
            )
        }
        ChannelsCommand::Topic { channel_id, topic } => {
            service.set_channel_topic(&channel_id, &topic).await?;
            CommandResult::render(
                &json!({ "status": "updated", "channel_id": channel_id, "topic": topic }),
                ctx.format,
            )
        }
        ChannelsCommand::Purpose { channel_id, purpose } => {
            service.set_channel_purpose(&channel_id, &purpose).await?;
            CommandResult::render(
                &json!({ "status": "updated", "channel_id": channel_id, "purpose": purpose }),
                ctx.format,
            )
        }
    }
}
