//! MCP server exposing the Slack service as agent tools.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};
use serde::Serialize;
use serde_json::json;
use slackcli_slack::{
    ClassifiedError, FileFilter, ListMessagesParams, SearchParams, SendMessageParams, ServiceResult,
    SlackService, UploadFileParams,
};
use tracing::{debug, info};

use crate::tools::{
    is_write_tool, ChannelArgs, CreateChannelArgs, DownloadFileArgs, EditMessageArgs, FileArgs,
    InviteArgs, KickArgs, ListFilesArgs, ListMessagesArgs, ListReactionsArgs, MessageRefArgs,
    PageArgs, PurposeArgs, ReactionArgs, SearchArgs, SendMessageArgs, TopicArgs, UploadFileArgs,
    UserArgs,
};

/// Agent tool surface over any [`SlackService`].
///
/// Read-only mode is fixed at construction. Write tools stay listed but
/// answer with a tool-level error instead of calling the service.
#[derive(Clone)]
pub struct SlackMcpServer {
    service: Arc<dyn SlackService>,
    read_only: bool,
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for SlackMcpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackMcpServer").field("read_only", &self.read_only).finish_non_exhaustive()
    }
}

impl SlackMcpServer {
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Names of every registered tool.
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_router.list_all().into_iter().map(|tool| tool.name.to_string()).collect()
    }

    /// Serves the tools over stdin/stdout until the client disconnects.
    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        info!(read_only = self.read_only, "starting MCP server on stdio");

        let running = self.serve(rmcp::transport::stdio()).await?;
        let reason = running.waiting().await?;

        info!(?reason, "MCP server stopped");
        Ok(())
    }

    fn reject_write(&self, tool: &str) -> Option<CallToolResult> {
        if self.read_only && is_write_tool(tool) {
            debug!(tool, "rejected write tool in read-only mode");
            return Some(CallToolResult::error(vec![Content::text(format!(
                "{tool} is a write operation and cannot be used in read-only mode"
            ))]));
        }
        None
    }
}

fn respond<T: Serialize>(tool: &str, result: ServiceResult<T>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => {
            let body = serde_json::to_string_pretty(&value)
                .map_err(|error| McpError::internal_error(error.to_string(), None))?;
            Ok(CallToolResult::success(vec![Content::text(body)]))
        }
        Err(error) => Ok(failure(tool, &error)),
    }
}

/// Download targets chosen by an agent may not climb out with `..` and
/// never replace an existing file.
fn check_download_dest(dest: &Path) -> Result<(), ClassifiedError> {
    if dest.components().any(|component| matches!(component, Component::ParentDir)) {
        return Err(ClassifiedError::invalid_input(
            "invalid_destination",
            format!("{} must not contain `..`", dest.display()),
        ));
    }
    if dest.exists() {
        return Err(ClassifiedError::invalid_input(
            "destination_exists",
            format!("{} already exists", dest.display()),
        ));
    }
    Ok(())
}

fn failure(tool: &str, error: &ClassifiedError) -> CallToolResult {
    debug!(tool, category = %error.category, "tool call failed");
    CallToolResult::error(vec![Content::text(error.to_string())])
}

#[tool_router]
impl SlackMcpServer {
    pub fn new(service: Arc<dyn SlackService>, read_only: bool) -> Self {
        Self { service, read_only, tool_router: Self::tool_router() }
    }

    #[tool(description = "Test authentication and get current user info")]
    pub async fn auth_test(&self) -> Result<CallToolResult, McpError> {
        respond("auth_test", self.service.auth_test().await)
    }

    #[tool(description = "List Slack channels")]
    pub async fn list_channels(
        &self,
        Parameters(args): Parameters<PageArgs>,
    ) -> Result<CallToolResult, McpError> {
        respond("list_channels", self.service.list_channels(&args.to_request()).await)
    }

    #[tool(description = "Get information about a Slack channel")]
    pub async fn get_channel_info(
        &self,
        Parameters(args): Parameters<ChannelArgs>,
    ) -> Result<CallToolResult, McpError> {
        respond("get_channel_info", self.service.get_channel_info(&args.channel_id).await)
    }

    #[tool(description = "Create a new Slack channel")]
    pub async fn create_channel(
        &self,
        Parameters(args): Parameters<CreateChannelArgs>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(rejected) = self.reject_write("create_channel") {
            return Ok(rejected);
        }
        respond("create_channel", self.service.create_channel(&args.name, args.is_private).await)
    }

    #[tool(description = "Archive a Slack channel")]
    pub async fn archive_channel(
        &self,
        Parameters(args): Parameters<ChannelArgs>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(rejected) = self.reject_write("archive_channel") {
            return Ok(rejected);
        }
        let result = self.service.archive_channel(&args.channel_id).await;
        respond(
            "archive_channel",
            result.map(|()| json!({ "status": "archived", "channel_id": args.channel_id })),
        )
    }

    #[tool(description = "Invite users to a channel")]
    pub async fn invite_to_channel(
        &self,
        Parameters(args): Parameters<InviteArgs>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(rejected) = self.reject_write("invite_to_channel") {
            return Ok(rejected);
        }
        if args.user_ids.is_empty() {
            return Ok(failure(
                "invite_to_channel",
                &ClassifiedError::invalid_input("invalid_arguments", "user_ids is required"),
            ));
        }
        let result = self.service.invite_to_channel(&args.channel_id, &args.user_ids).await;
        respond(
            "invite_to_channel",
            result.map(|()| {
                json!({ "status": "invited", "channel_id": args.channel_id, "user_ids": args.user_ids })
            }),
        )
    }

    #[tool(description = "Remove a user from a channel")]
    pub async fn kick_from_channel(
        &self,
        Parameters(args): Parameters<KickArgs>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(rejected) = self.reject_write("kick_from_channel") {
            return Ok(rejected);
        }
        let result = self.service.kick_from_channel(&args.channel_id, &args.user_id).await;
        respond(
            "kick_from_channel",
            result.map(|()| {
                json!({ "status": "removed", "channel_id": args.channel_id, "user_id": args.user_id })
            }),
        )
    }

    #[tool(description = "Set a channel's topic")]
    pub async fn set_channel_topic(
        &self,
        Parameters(args): Parameters<TopicArgs>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(rejected) = self.reject_write("set_channel_topic") {
            return Ok(rejected);
        }
        let result = self.service.set_channel_topic(&args.channel_id, &args.topic).await;
        respond(
            "set_channel_topic",
            result.map(|()| json!({ "status": "updated", "channel_id": args.channel_id, "topic": args.topic })),
        )
    }

    #[tool(description = "Set a channel's purpose")]
    pub async fn set_channel_purpose(
        &self,
        Parameters(args): Parameters<PurposeArgs>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(rejected) = self.reject_write("set_channel_purpose") {
            return Ok(rejected);
        }
        let result = self.service.set_channel_purpose(&args.channel_id, &args.purpose).await;
        respond(
            "set_channel_purpose",
            result.map(|()| {
                json!({ "status": "updated", "channel_id": args.channel_id, "purpose": args.purpose })
            }),
        )
    }

    #[tool(description = "List messages in a Slack channel")]
    pub async fn list_messages(
        &self,
        Parameters(args): Parameters<ListMessagesArgs>,
    ) -> Result<CallToolResult, McpError> {
        let params = ListMessagesParams {
            channel_id: args.channel_id,
            pagination: args.page.to_request(),
            oldest: None,
            latest: None,
        };
        respond("list_messages", self.service.list_messages(&params).await)
    }

    #[tool(description = "Send a message to a Slack channel")]
    pub async fn send_message(
        &self,
        Parameters(args): Parameters<SendMessageArgs>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(rejected) = self.reject_write("send_message") {
            return Ok(rejected);
        }
        let params = SendMessageParams {
            channel_id: args.channel_id,
            text: args.text,
            thread_ts: args.thread_ts.filter(|ts| !ts.is_empty()),
        };
        respond("send_message", self.service.send_message(&params).await)
    }

    #[tool(description = "Edit an existing message")]
    pub async fn edit_message(
        &self,
        Parameters(args): Parameters<EditMessageArgs>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(rejected) = self.reject_write("edit_message") {
            return Ok(rejected);
        }
        respond(
            "edit_message",
            self.service.edit_message(&args.channel_id, &args.timestamp, &args.text).await,
        )
    }

    #[tool(description = "Delete a message")]
    pub async fn delete_message(
        &self,
        Parameters(args): Parameters<MessageRefArgs>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(rejected) = self.reject_write("delete_message") {
            return Ok(rejected);
        }
        let result = self.service.delete_message(&args.channel_id, &args.timestamp).await;
        respond(
            "delete_message",
            result.map(|()| {
                json!({ "status": "deleted", "channel_id": args.channel_id, "timestamp": args.timestamp })
            }),
        )
    }

    #[tool(description = "Search for messages in Slack")]
    pub async fn search_messages(
        &self,
        Parameters(args): Parameters<SearchArgs>,
    ) -> Result<CallToolResult, McpError> {
        let params =
            SearchParams { query: args.query, sort: args.sort, sort_dir: args.sort_dir, limit: args.limit };
        respond("search_messages", self.service.search_messages(&params).await)
    }

    #[tool(description = "List Slack users")]
    pub async fn list_users(
        &self,
        Parameters(args): Parameters<PageArgs>,
    ) -> Result<CallToolResult, McpError> {
        respond("list_users", self.service.list_users(&args.to_request()).await)
    }

    #[tool(description = "Get information about a Slack user")]
    pub async fn get_user_info(
        &self,
        Parameters(args): Parameters<UserArgs>,
    ) -> Result<CallToolResult, McpError> {
        respond("get_user_info", self.service.get_user_info(&args.user_id).await)
    }

    #[tool(description = "Get a user's presence status")]
    pub async fn get_user_presence(
        &self,
        Parameters(args): Parameters<UserArgs>,
    ) -> Result<CallToolResult, McpError> {
        respond("get_user_presence", self.service.get_user_presence(&args.user_id).await)
    }

    #[tool(description = "Add an emoji reaction to a message")]
    pub async fn add_reaction(
        &self,
        Parameters(args): Parameters<ReactionArgs>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(rejected) = self.reject_write("add_reaction") {
            return Ok(rejected);
        }
        let result = self.service.add_reaction(&args.channel_id, &args.timestamp, &args.name).await;
        respond("add_reaction", result.map(|()| json!({ "status": "added", "reaction": args.name })))
    }

    #[tool(description = "Remove an emoji reaction from a message")]
    pub async fn remove_reaction(
        &self,
        Parameters(args): Parameters<ReactionArgs>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(rejected) = self.reject_write("remove_reaction") {
            return Ok(rejected);
        }
        let result = self.service.remove_reaction(&args.channel_id, &args.timestamp, &args.name).await;
        respond("remove_reaction", result.map(|()| json!({ "status": "removed", "reaction": args.name })))
    }

    #[tool(description = "List items a user has reacted to")]
    pub async fn list_reactions(
        &self,
        Parameters(args): Parameters<ListReactionsArgs>,
    ) -> Result<CallToolResult, McpError> {
        let user = args.user_id.as_deref().filter(|id| !id.is_empty());
        respond("list_reactions", self.service.list_reactions(user, &args.page.to_request()).await)
    }

    #[tool(description = "List files in Slack")]
    pub async fn list_files(
        &self,
        Parameters(args): Parameters<ListFilesArgs>,
    ) -> Result<CallToolResult, McpError> {
        let filter = FileFilter { channel_id: args.channel_id, user_id: args.user_id };
        respond("list_files", self.service.list_files(&filter, &args.page.to_request()).await)
    }

    #[tool(description = "Get information about a file")]
    pub async fn get_file_info(
        &self,
        Parameters(args): Parameters<FileArgs>,
    ) -> Result<CallToolResult, McpError> {
        respond("get_file_info", self.service.get_file_info(&args.file_id).await)
    }

    #[tool(description = "Upload a file to a channel from inline text or a local path")]
    pub async fn upload_file(
        &self,
        Parameters(args): Parameters<UploadFileArgs>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(rejected) = self.reject_write("upload_file") {
            return Ok(rejected);
        }
        let content = match (args.content, args.path) {
            (Some(text), None) => text.into_bytes(),
            (None, Some(path)) => match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(error) => {
                    return Ok(failure(
                        "upload_file",
                        &ClassifiedError::invalid_input("file_unreadable", format!("{path}: {error}")),
                    ));
                }
            },
            _ => {
                return Ok(failure(
                    "upload_file",
                    &ClassifiedError::invalid_input(
                        "invalid_arguments",
                        "exactly one of content or path is required",
                    ),
                ));
            }
        };
        let params = UploadFileParams {
            channel_id: args.channel_id,
            filename: args.filename,
            title: args.title.filter(|title| !title.is_empty()),
            content,
        };
        respond("upload_file", self.service.upload_file(&params).await)
    }

    #[tool(description = "Download a file to a local path")]
    pub async fn download_file(
        &self,
        Parameters(args): Parameters<DownloadFileArgs>,
    ) -> Result<CallToolResult, McpError> {
        let explicit = args.dest.filter(|dest| !dest.is_empty()).map(PathBuf::from);
        if let Some(dest) = &explicit {
            if let Err(error) = check_download_dest(dest) {
                return Ok(failure("download_file", &error));
            }
        }
        let file = match self.service.get_file_info(&args.file_id).await {
            Ok(file) => file,
            Err(error) => return Ok(failure("download_file", &error)),
        };
        let dest = match explicit {
            Some(dest) => dest,
            None => {
                let dest = file.local_name();
                if let Err(error) = check_download_dest(&dest) {
                    return Ok(failure("download_file", &error));
                }
                dest
            }
        };
        let result = self.service.download_file(&file.url_private, &dest).await;
        respond(
            "download_file",
            result.map(|bytes| {
                json!({
                    "status": "downloaded",
                    "file_id": args.file_id,
                    "path": dest.display().to_string(),
                    "bytes": bytes,
                })
            }),
        )
    }

    #[tool(description = "Delete a file")]
    pub async fn delete_file(
        &self,
        Parameters(args): Parameters<FileArgs>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(rejected) = self.reject_write("delete_file") {
            return Ok(rejected);
        }
        let result = self.service.delete_file(&args.file_id).await;
        respond("delete_file", result.map(|()| json!({ "status": "deleted", "file_id": args.file_id })))
    }
}

#[tool_handler]
impl ServerHandler for SlackMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mode = if self.read_only { "read-only" } else { "read-write" };
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(format!(
                "Slack workspace access for agents ({mode}). Channels, messages, users, \
                 reactions and files. List tools accept limit, cursor and all."
            )),
            ..Default::default()
        }
    }
}
