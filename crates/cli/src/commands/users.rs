use clap::Subcommand;

use super::{CommandResult, PageFlags};
use crate::context::RunContext;
use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    #[command(about = "List users")]
    List {
        #[command(flatten)]
        page: PageFlags,
    },
    #[command(about = "Get user info")]
    Info {
        #[arg(value_name = "USER_ID")]
        user_id: String,
    },
    #[command(about = "Get user presence")]
    Presence {
        #[arg(value_name = "USER_ID")]
        user_id: String,
    },
}

pub async fn run(command: UsersCommand, ctx: &RunContext) -> Result<CommandResult, CliError> {
    let service = ctx.service()?;

    match command {
        UsersCommand::List { page } => {
            CommandResult::render(&service.list_users(&page.to_request()).await?, ctx.format)
        }
        UsersCommand::Info { user_id } => {
            CommandResult::render(&service.get_user_info(&user_id).await?, ctx.format)
        }
        UsersCommand::Presence { user_id } => {
            CommandResult::render(&service.get_user_presence(&user_id).await?, ctx.format)
        }
    }
}
