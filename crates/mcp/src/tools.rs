//! Tool catalogue and argument types for the Slack MCP server.

use rmcp::schemars;
use serde::Deserialize;
use slackcli_slack::{PaginationRequest, DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_LIMIT};

/// All tool names, in registration order.
pub const ALL_TOOL_NAMES: &[&str] = &[
    "auth_test",
    "list_channels",
    "get_channel_info",
    "create_channel",
    "archive_channel",
    "invite_to_channel",
    "kick_from_channel",
    "set_channel_topic",
    "set_channel_purpose",
    "list_messages",
    "send_message",
    "edit_message",
    "delete_message",
    "search_messages",
    "list_users",
    "get_user_info",
    "get_user_presence",
    "add_reaction",
    "remove_reaction",
    "list_reactions",
    "list_files",
    "get_file_info",
    "upload_file",
    "download_file",
    "delete_file",
];

/// Tools that change workspace state. Rejected in read-only mode.
pub const WRITE_TOOL_NAMES: &[&str] = &[
    "create_channel",
    "archive_channel",
    "invite_to_channel",
    "kick_from_channel",
    "set_channel_topic",
    "set_channel_purpose",
    "send_message",
    "edit_message",
    "delete_message",
    "add_reaction",
    "remove_reaction",
    "upload_file",
    "delete_file",
];

pub const TOTAL_TOOLS: usize = ALL_TOOL_NAMES.len();

pub fn is_write_tool(name: &str) -> bool {
    WRITE_TOOL_NAMES.contains(&name)
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE as i64
}

fn default_search_limit() -> i64 {
    DEFAULT_SEARCH_LIMIT
}

fn default_sort() -> String {
    "timestamp".to_string()
}

fn default_sort_dir() -> String {
    "desc".to_string()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PageArgs {
    /// Max items to return per page
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Fetch every page (auto-paginate)
    #[serde(default)]
    pub all: bool,
    /// Pagination cursor from a previous call
    #[serde(default)]
    pub cursor: String,
}

impl PageArgs {
    pub fn to_request(&self) -> PaginationRequest {
        PaginationRequest { cursor: self.cursor.clone(), limit: self.limit, fetch_all: self.all }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ChannelArgs {
    /// Channel ID
    pub channel_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateChannelArgs {
    /// Channel name
    pub name: String,
    /// Create as a private channel
    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct InviteArgs {
    /// Channel ID
    pub channel_id: String,
    /// User IDs to invite
    pub user_ids: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct KickArgs {
    /// Channel ID
    pub channel_id: String,
    /// User ID to remove
    pub user_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TopicArgs {
    /// Channel ID
    pub channel_id: String,
    /// New topic
    pub topic: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PurposeArgs {
    /// Channel ID
    pub channel_id: String,
    /// New purpose
    pub purpose: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMessagesArgs {
    /// Channel ID
    pub channel_id: String,
    #[serde(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SendMessageArgs {
    /// Channel ID
    pub channel_id: String,
    /// Message text
    pub text: String,
    /// Thread timestamp for replies
    #[serde(default)]
    pub thread_ts: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EditMessageArgs {
    /// Channel ID
    pub channel_id: String,
    /// Message timestamp
    pub timestamp: String,
    /// New message text
    pub text: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MessageRefArgs {
    /// Channel ID
    pub channel_id: String,
    /// Message timestamp
    pub timestamp: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchArgs {
    /// Search query
    pub query: String,
    /// Sort field: timestamp or score
    #[serde(default = "default_sort")]
    pub sort: String,
    /// Sort direction: asc or desc
    #[serde(default = "default_sort_dir")]
    pub sort_dir: String,
    /// Max results to return
    #[serde(default = "default_search_limit")]
    pub limit: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserArgs {
    /// User ID
    pub user_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReactionArgs {
    /// Channel ID
    pub channel_id: String,
    /// Message timestamp
    pub timestamp: String,
    /// Emoji name (without colons)
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListReactionsArgs {
    /// User ID (defaults to the authenticated user)
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFilesArgs {
    /// Filter by channel ID
    #[serde(default)]
    pub channel_id: Option<String>,
    /// Filter by user ID
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FileArgs {
    /// File ID
    pub file_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UploadFileArgs {
    /// Channel ID to share the file in
    pub channel_id: String,
    /// File name shown in Slack
    pub filename: String,
    /// File title
    #[serde(default)]
    pub title: Option<String>,
    /// Inline text content; mutually exclusive with `path`
    #[serde(default)]
    pub content: Option<String>,
    /// Local file to upload; mutually exclusive with `content`
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DownloadFileArgs {
    /// File ID
    pub file_id: String,
    /// Destination path; must not exist yet or contain `..` (defaults to the file name in the working directory)
    #[serde(default)]
    pub dest: Option<String>,
}
