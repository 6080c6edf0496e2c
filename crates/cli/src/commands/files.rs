use std::path::PathBuf;

use clap::Subcommand;
use serde_json::json;
use slackcli_slack::{FileFilter, UploadFileParams};

use super::{CommandResult, PageFlags};
use crate::context::RunContext;
use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum FilesCommand {
    #[command(about = "List files")]
    List {
        #[arg(long = "channel", help = "Filter by channel ID")]
        channel_id: Option<String>,
        #[arg(long = "user", help = "Filter by user ID")]
        user_id: Option<String>,
        #[command(flatten)]
        page: PageFlags,
    },
    #[command(about = "Get file info")]
    Info {
        #[arg(value_name = "FILE_ID")]
        file_id: String,
    },
    #[command(about = "Upload a file")]
    Upload {
        #[arg(long = "channel", help = "Channel ID")]
        channel_id: String,
        #[arg(long = "file", help = "Path of the file to upload")]
        path: PathBuf,
        #[arg(long, help = "File title")]
        title: Option<String>,
        #[arg(help = "File name shown in Slack (defaults to the path's file name)")]
        name: Option<String>,
    },
    #[command(about = "Download a file")]
    Download {
        #[arg(value_name = "FILE_ID")]
        file_id: String,
        #[arg(short = 'd', long = "dest", help = "Destination path")]
        dest: Option<PathBuf>,
    },
    #[command(about = "Delete a file")]
    Delete {
        #[arg(value_name = "FILE_ID")]
        file_id: String,
    },
}

impl FilesCommand {
    pub fn write_name(&self) -> Option<&'static str> {
        match self {
            Self::List { .. } | Self::Info { .. } | Self::Download { .. } => None,
            Self::Upload { .. } => Some("upload"),
            Self::Delete { .. } => Some("delete"),
        }
    }
}

pub async fn run(command: FilesCommand, ctx: &RunContext) -> Result<CommandResult, CliError> {
    let service = ctx.service()?;

    match command {
        FilesCommand::List { channel_id, user_id, page } => {
            let filter = FileFilter { channel_id, user_id };
            CommandResult::render(&service.list_files(&filter, &page.to_request()).await?, ctx.format)
        }
        FilesCommand::Info { file_id } => {
            CommandResult::render(&service.get_file_info(&file_id).await?, ctx.format)
        }
        FilesCommand::Upload { channel_id, path, title, name } => {
            let content = tokio::fs::read(&path)
                .await
                .map_err(|error| CliError::io(format!("failed to open file `{}`", path.display()), error))?;
            let filename = name.unwrap_or_else(|| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string())
            });
            let params = UploadFileParams { channel_id, filename, title, content };
            CommandResult::render(&service.upload_file(&params).await?, ctx.format)
        }
        FilesCommand::Download { file_id, dest } => {
            let file = service.get_file_info(&file_id).await?;
            let dest = dest.unwrap_or_else(|| file.local_name());
            let bytes = service.download_file(&file.url_private, &dest).await?;
            CommandResult::render(
                &json!({
                    "status": "downloaded",
                    "file": file_id,
                    "path": dest.display().to_string(),
                    "bytes": bytes,
                }),
                ctx.format,
            )
        }
        FilesCommand::Delete { file_id } => {
            service.delete_file(&file_id).await?;
            CommandResult::render(&json!({ "status": "deleted", "file": file_id }), ctx.format)
        }
    }
}
