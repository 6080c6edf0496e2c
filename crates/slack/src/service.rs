use std::path::Path;

use async_trait::async_trait;

use crate::auth::{self, AuthResult};
use crate::channels::{self, Channel};
use crate::client::SlackClient;
use crate::errors::ServiceResult;
use crate::files::{self, File, FileFilter, UploadFileParams};
use crate::messages::{self, ListMessagesParams, Message, SearchParams, SearchResult, SendMessageParams};
use crate::pagination::{PaginatedResult, PaginationRequest};
use crate::reactions::{self, ReactedItem};
use crate::users::{self, Presence, User};

/// Every Slack action the surfaces can perform.
///
/// Implementations retry rate limits, classify failures and apply the
/// pagination contract to list operations. There is no read-only notion
/// here; surfaces gate write operations before calling in.
#[async_trait]
pub trait SlackService: Send + Sync {
    async fn auth_test(&self) -> ServiceResult<AuthResult>;

    async fn list_channels(&self, request: &PaginationRequest) -> ServiceResult<PaginatedResult<Channel>>;
    async fn get_channel_info(&self, channel_id: &str) -> ServiceResult<Channel>;
    async fn create_channel(&self, name: &str, is_private: bool) -> ServiceResult<Channel>;
    async fn archive_channel(&self, channel_id: &str) -> ServiceResult<()>;
    async fn invite_to_channel(&self, channel_id: &str, user_ids: &[String]) -> ServiceResult<()>;
    async fn kick_from_channel(&self, channel_id: &str, user_id: &str) -> ServiceResult<()>;
    async fn set_channel_topic(&self, channel_id: &str, topic: &str) -> ServiceResult<()>;
    async fn set_channel_purpose(&self, channel_id: &str, purpose: &str) -> ServiceResult<()>;

    async fn list_messages(&self, params: &ListMessagesParams) -> ServiceResult<PaginatedResult<Message>>;
    async fn send_message(&self, params: &SendMessageParams) -> ServiceResult<Message>;
    async fn edit_message(&self, channel_id: &str, timestamp: &str, text: &str) -> ServiceResult<Message>;
    async fn delete_message(&self, channel_id: &str, timestamp: &str) -> ServiceResult<()>;
    async fn search_messages(&self, params: &SearchParams) -> ServiceResult<SearchResult>;

    async fn list_users(&self, request: &PaginationRequest) -> ServiceResult<PaginatedResult<User>>;
    async fn get_user_info(&self, user_id: &str) -> ServiceResult<User>;
    async fn get_user_presence(&self, user_id: &str) -> ServiceResult<Presence>;

    async fn add_reaction(&self, channel_id: &str, timestamp: &str, name: &str) -> ServiceResult<()>;
    async fn remove_reaction(&self, channel_id: &str, timestamp: &str, name: &str) -> ServiceResult<()>;
    async fn list_reactions(
        &self,
        user_id: Option<&str>,
        request: &PaginationRequest,
    ) -> ServiceResult<PaginatedResult<ReactedItem>>;

    async fn list_files(
        &self,
        filter: &FileFilter,
        request: &PaginationRequest,
    ) -> ServiceResult<PaginatedResult<File>>;
    async fn get_file_info(&self, file_id: &str) -> ServiceResult<File>;
    async fn upload_file(&self, params: &UploadFileParams) -> ServiceResult<File>;
    async fn download_file(&self, url: &str, dest: &Path) -> ServiceResult<u64>;
    async fn delete_file(&self, file_id: &str) -> ServiceResult<()>;
}

#[async_trait]
impl SlackService for SlackClient {
    async fn auth_test(&self) -> ServiceResult<AuthResult> {
        auth::test(self).await
    }

    async fn list_channels(&self, request: &PaginationRequest) -> ServiceResult<PaginatedResult<Channel>> {
        channels::list(self, request).await
    }

    async fn get_channel_info(&self, channel_id: &str) -> ServiceResult<Channel> {
        channels::info(self, channel_id).await
    }

    async fn create_channel(&self, name: &str, is_private: bool) -> ServiceResult<Channel> {
        channels::create(self, name, is_private).await
    }

    async fn archive_channel(&self, channel_id: &str) -> ServiceResult<()> {
        channels::archive(self, channel_id).await
    }

    async fn invite_to_channel(&self, channel_id: &str, user_ids: &[String]) -> ServiceResult<()> {
        channels::invite(self, channel_id, user_ids).await
    }

    async fn kick_from_channel(&self, channel_id: &str, user_id: &str) -> ServiceResult<()> {
        channels::kick(self, channel_id, user_id).await
    }

    async fn set_channel_topic(&self, channel_id: &str, topic: &str) -> ServiceResult<()> {
        channels::set_topic(self, channel_id, topic).await
    }

    async fn set_channel_purpose(&self, channel_id: &str, purpose: &str) -> ServiceResult<()> {
        channels::set_purpose(self, channel_id, purpose).await
    }

    async fn list_messages(&self, params: &ListMessagesParams) -> ServiceResult<PaginatedResult<Message>> {
        messages::list(self, params).await
    }

    async fn send_message(&self, params: &SendMessageParams) -> ServiceResult<Message> {
        messages::send(self, params).await
    }

    async fn edit_message(&self, channel_id: &str, timestamp: &str, text: &str) -> ServiceResult<Message> {
        messages::edit(self, channel_id, timestamp, text).await
    }

    async fn delete_message(&self, channel_id: &str, timestamp: &str) -> ServiceResult<()> {
        messages::delete(self, channel_id, timestamp).await
    }

    async fn search_messages(&self, params: &SearchParams) -> ServiceResult<SearchResult> {
        messages::search(self, params).await
    }

    async fn list_users(&self, request: &PaginationRequest) -> ServiceResult<PaginatedResult<User>> {
        users::list(self, request).await
    }

    async fn get_user_info(&self, user_id: &str) -> ServiceResult<User> {
        users::info(self, user_id).await
    }

    async fn get_user_presence(&self, user_id: &str) -> ServiceResult<Presence> {
        users::presence(self, user_id).await
    }

    async fn add_reaction(&self, channel_id: &str, timestamp: &str, name: &str) -> ServiceResult<()> {
        reactions::add(self, channel_id, timestamp, name).await
    }

    async fn remove_reaction(&self, channel_id: &str, timestamp: &str, name: &str) -> ServiceResult<()> {
        reactions::remove(self, channel_id, timestamp, name).await
    }

    async fn list_reactions(
        &self,
        user_id: Option<&str>,
        request: &PaginationRequest,
    ) -> ServiceResult<PaginatedResult<ReactedItem>> {
        reactions::list(self, user_id, request).await
    }

    async fn list_files(
        &self,
        filter: &FileFilter,
        request: &PaginationRequest,
    ) -> ServiceResult<PaginatedResult<File>> {
        files::list(self, filter, request).await
    }

    async fn get_file_info(&self, file_id: &str) -> ServiceResult<File> {
        files::info(self, file_id).await
    }

    async fn upload_file(&self, params: &UploadFileParams) -> ServiceResult<File> {
        files::upload(self, params).await
    }

    async fn download_file(&self, url: &str, dest: &Path) -> ServiceResult<u64> {
        files::download(self, url, dest).await
    }

    async fn delete_file(&self, file_id: &str) -> ServiceResult<()> {
        files::delete(self, file_id).await
    }
}
