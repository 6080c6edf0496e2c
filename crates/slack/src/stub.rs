//! In-memory [`SlackService`] for exercising surfaces without the network.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::auth::AuthResult;
use crate::channels::Channel;
use crate::errors::{ApiFailure, ClassifiedError, ServiceResult};
use crate::files::{File, FileFilter, UploadFileParams};
use crate::messages::{ListMessagesParams, Message, SearchParams, SearchResult, SendMessageParams};
use crate::pagination::{
    normalize_limit, paginate, CursorPage, CursorPaging, CursorSource, PaginatedResult,
    PaginationRequest,
};
use crate::reactions::{ReactedItem, Reaction};
use crate::service::SlackService;
use crate::users::{Presence, User};

/// Records the stub starts with. Anything left empty behaves like an empty workspace.
#[derive(Clone, Debug, Default)]
pub struct StubFixtures {
    pub auth: AuthResult,
    pub channels: Vec<Channel>,
    pub messages: Vec<Message>,
    pub users: Vec<User>,
    pub reactions: Vec<ReactedItem>,
    pub files: Vec<File>,
}

#[derive(Debug, Default)]
struct StubState {
    fixtures: StubFixtures,
    file_channels: HashMap<String, String>,
    file_contents: HashMap<String, Vec<u8>>,
    calls: Vec<String>,
    failure: Option<ClassifiedError>,
    sequence: u64,
}

impl StubState {
    fn next_id(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }
}

/// Test double with fixtures, a call log and injectable failures. List
/// operations page through the fixtures with offset cursors.
#[derive(Debug, Default)]
pub struct StubSlackService {
    state: Mutex<StubState>,
}

fn not_found(code: &str, id: &str) -> ClassifiedError {
    ClassifiedError::from(ApiFailure::api(code)).with_detail(id.to_owned())
}

impl StubSlackService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixtures(fixtures: StubFixtures) -> Self {
        Self { state: Mutex::new(StubState { fixtures, ..StubState::default() }) }
    }

    /// Makes every following call fail with `error` until [`clear_failure`](Self::clear_failure).
    pub fn fail_with(&self, error: ClassifiedError) {
        self.lock().failure = Some(error);
    }

    pub fn clear_failure(&self) {
        self.lock().failure = None;
    }

    /// Names of the operations called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn fixtures(&self) -> StubFixtures {
        self.lock().fixtures.clone()
    }

    fn lock(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn enter(&self, operation: &str) -> ServiceResult<MutexGuard<'_, StubState>> {
        let mut state = self.lock();
        state.calls.push(operation.to_owned());
        if let Some(error) = state.failure.clone() {
            return Err(error);
        }
        Ok(state)
    }
}

struct InMemoryPages<T> {
    items: Vec<T>,
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> CursorSource for InMemoryPages<T> {
    type Item = T;

    async fn fetch_cursor_page(&self, cursor: &str, limit: u32) -> ServiceResult<CursorPage<T>> {
        let offset = if cursor.is_empty() {
            0
        } else {
            cursor.parse::<usize>().map_err(|_| {
                ClassifiedError::invalid_input("invalid_cursor", format!("cursor `{cursor}` is not an offset"))
            })?
        };
        let start = offset.min(self.items.len());
        let end = start.saturating_add(limit as usize).min(self.items.len());
        let next_cursor = if end < self.items.len() { end.to_string() } else { String::new() };
        Ok(CursorPage { items: self.items[start..end].to_vec(), next_cursor, has_more: None })
    }
}

async fn page_through<T: Clone + Send + Sync + 'static>(
    items: Vec<T>,
    request: &PaginationRequest,
) -> ServiceResult<PaginatedResult<T>> {
    paginate(&CursorPaging(InMemoryPages { items }), request).await
}

fn react(items: &mut Vec<ReactedItem>, channel_id: &str, timestamp: &str, name: &str, user: &str) {
    let position = items
        .iter()
        .position(|item| item.channel == channel_id && item.timestamp == timestamp);
    let index = match position {
        Some(index) => index,
        None => {
            items.push(ReactedItem {
                kind: "message".to_owned(),
                channel: channel_id.to_owned(),
                timestamp: timestamp.to_owned(),
                reactions: Vec::new(),
            });
            items.len() - 1
        }
    };
    let reactions = &mut items[index].reactions;
    match reactions.iter_mut().find(|reaction| reaction.name == name) {
        Some(reaction) => {
            reaction.count += 1;
            reaction.users.push(user.to_owned());
        }
        None => reactions.push(Reaction { name: name.to_owned(), count: 1, users: vec![user.to_owned()] }),
    }
}

#[async_trait]
impl SlackService for StubSlackService {
    async fn auth_test(&self) -> ServiceResult<AuthResult> {
        Ok(self.enter("auth_test")?.fixtures.auth.clone())
    }

    async fn list_channels(&self, request: &PaginationRequest) -> ServiceResult<PaginatedResult<Channel>> {
        let channels = self.enter("list_channels")?.fixtures.channels.clone();
        page_through(channels, request).await
    }

    async fn get_channel_info(&self, channel_id: &str) -> ServiceResult<Channel> {
        let state = self.enter("get_channel_info")?;
        state
            .fixtures
            .channels
            .iter()
            .find(|channel| channel.id == channel_id)
            .cloned()
            .ok_or_else(|| not_found("channel_not_found", channel_id))
    }

    async fn create_channel(&self, name: &str, is_private: bool) -> ServiceResult<Channel> {
        let mut state = self.enter("create_channel")?;
        if state.fixtures.channels.iter().any(|channel| channel.name == name) {
            return Err(ClassifiedError::from(ApiFailure::api("name_taken")).with_detail(name.to_owned()));
        }
        let channel = Channel {
            id: format!("C{:08}", state.next_id()),
            name: name.to_owned(),
            num_members: 1,
            is_private,
            is_member: true,
            ..Channel::default()
        };
        state.fixtures.channels.push(channel.clone());
        Ok(channel)
    }

    async fn archive_channel(&self, channel_id: &str) -> ServiceResult<()> {
        let mut state = self.enter("archive_channel")?;
        let channel = state
            .fixtures
            .channels
            .iter_mut()
            .find(|channel| channel.id == channel_id)
            .ok_or_else(|| not_found("channel_not_found", channel_id))?;
        channel.is_archived = true;
        Ok(())
    }

    async fn invite_to_channel(&self, channel_id: &str, user_ids: &[String]) -> ServiceResult<()> {
        let mut state = self.enter("invite_to_channel")?;
        if let Some(missing) =
            user_ids.iter().find(|id| !state.fixtures.users.iter().any(|user| &user.id == *id))
        {
            return Err(not_found("user_not_found", missing));
        }
        let channel = state
            .fixtures
            .channels
            .iter_mut()
            .find(|channel| channel.id == channel_id)
            .ok_or_else(|| not_found("channel_not_found", channel_id))?;
        channel.num_members += user_ids.len() as i64;
        Ok(())
    }

    async fn kick_from_channel(&self, channel_id: &str, user_id: &str) -> ServiceResult<()> {
        let mut state = self.enter("kick_from_channel")?;
        let channel = state
            .fixtures
            .channels
            .iter_mut()
            .find(|channel| channel.id == channel_id)
            .ok_or_else(|| not_found("channel_not_found", channel_id))?;
        if channel.num_members == 0 {
            return Err(not_found("not_in_channel", user_id));
        }
        channel.num_members -= 1;
        Ok(())
    }

    async fn set_channel_topic(&self, channel_id: &str, topic: &str) -> ServiceResult<()> {
        let mut state = self.enter("set_channel_topic")?;
        let channel = state
            .fixtures
            .channels
            .iter_mut()
            .find(|channel| channel.id == channel_id)
            .ok_or_else(|| not_found("channel_not_found", channel_id))?;
        channel.topic = topic.to_owned();
        Ok(())
    }

    async fn set_channel_purpose(&self, channel_id: &str, purpose: &str) -> ServiceResult<()> {
        let mut state = self.enter("set_channel_purpose")?;
        let channel = state
            .fixtures
            .channels
            .iter_mut()
            .find(|channel| channel.id == channel_id)
            .ok_or_else(|| not_found("channel_not_found", channel_id))?;
        channel.purpose = purpose.to_owned();
        Ok(())
    }

    async fn list_messages(&self, params: &ListMessagesParams) -> ServiceResult<PaginatedResult<Message>> {
        let messages: Vec<Message> = {
            let state = self.enter("list_messages")?;
            if !state.fixtures.channels.is_empty()
                && !state.fixtures.channels.iter().any(|channel| channel.id == params.channel_id)
            {
                return Err(not_found("channel_not_found", &params.channel_id));
            }
            state
                .fixtures
                .messages
                .iter()
                .filter(|message| message.channel == params.channel_id)
                .cloned()
                .collect()
        };
        page_through(messages, &params.pagination).await
    }

    async fn send_message(&self, params: &SendMessageParams) -> ServiceResult<Message> {
        let mut state = self.enter("send_message")?;
        if params.text.is_empty() {
            return Err(ClassifiedError::from(ApiFailure::api("no_text")));
        }
        let message = Message {
            timestamp: format!("1700000000.{:06}", state.next_id()),
            user: state.fixtures.auth.user_id.clone(),
            text: params.text.clone(),
            thread_ts: params.thread_ts.clone().unwrap_or_default(),
            channel: params.channel_id.clone(),
            kind: "message".to_owned(),
        };
        state.fixtures.messages.push(message.clone());
        Ok(message)
    }

    async fn edit_message(&self, channel_id: &str, timestamp: &str, text: &str) -> ServiceResult<Message> {
        let mut state = self.enter("edit_message")?;
        let message = state
            .fixtures
            .messages
            .iter_mut()
            .find(|message| message.channel == channel_id && message.timestamp == timestamp)
            .ok_or_else(|| not_found("message_not_found", timestamp))?;
        message.text = text.to_owned();
        Ok(message.clone())
    }

    async fn delete_message(&self, channel_id: &str, timestamp: &str) -> ServiceResult<()> {
        let mut state = self.enter("delete_message")?;
        let before = state.fixtures.messages.len();
        state
            .fixtures
            .messages
            .retain(|message| !(message.channel == channel_id && message.timestamp == timestamp));
        if state.fixtures.messages.len() == before {
            return Err(not_found("message_not_found", timestamp));
        }
        Ok(())
    }

    async fn search_messages(&self, params: &SearchParams) -> ServiceResult<SearchResult> {
        let state = self.enter("search_messages")?;
        let needle = params.query.to_lowercase();
        let mut matches: Vec<Message> = state
            .fixtures
            .messages
            .iter()
            .filter(|message| message.text.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        let total = matches.len() as i64;
        matches.truncate(normalize_limit(params.limit) as usize);
        Ok(SearchResult { matches, total })
    }

    async fn list_users(&self, request: &PaginationRequest) -> ServiceResult<PaginatedResult<User>> {
        let users = self.enter("list_users")?.fixtures.users.clone();
        page_through(users, request).await
    }

    async fn get_user_info(&self, user_id: &str) -> ServiceResult<User> {
        let state = self.enter("get_user_info")?;
        state
            .fixtures
            .users
            .iter()
            .find(|user| user.id == user_id)
            .cloned()
            .ok_or_else(|| not_found("user_not_found", user_id))
    }

    async fn get_user_presence(&self, user_id: &str) -> ServiceResult<Presence> {
        let state = self.enter("get_user_presence")?;
        let user = state
            .fixtures
            .users
            .iter()
            .find(|user| user.id == user_id)
            .ok_or_else(|| not_found("user_not_found", user_id))?;
        let presence = if user.presence.is_empty() { "active".to_owned() } else { user.presence.clone() };
        Ok(Presence { user_id: user_id.to_owned(), presence })
    }

    async fn add_reaction(&self, channel_id: &str, timestamp: &str, name: &str) -> ServiceResult<()> {
        let mut state = self.enter("add_reaction")?;
        let exists = state
            .fixtures
            .messages
            .iter()
            .any(|message| message.channel == channel_id && message.timestamp == timestamp);
        if !exists {
            return Err(not_found("message_not_found", timestamp));
        }
        let user = state.fixtures.auth.user_id.clone();
        react(&mut state.fixtures.reactions, channel_id, timestamp, name, &user);
        Ok(())
    }

    async fn remove_reaction(&self, channel_id: &str, timestamp: &str, name: &str) -> ServiceResult<()> {
        let mut state = self.enter("remove_reaction")?;
        let user = state.fixtures.auth.user_id.clone();
        let item = state
            .fixtures
            .reactions
            .iter_mut()
            .find(|item| item.channel == channel_id && item.timestamp == timestamp);
        let Some(item) = item else {
            return Err(ClassifiedError::from(ApiFailure::api("no_reaction")));
        };
        let Some(position) = item.reactions.iter().position(|reaction| reaction.name == name) else {
            return Err(ClassifiedError::from(ApiFailure::api("no_reaction")));
        };
        let reaction = &mut item.reactions[position];
        reaction.count -= 1;
        reaction.users.retain(|id| id != &user);
        if reaction.count <= 0 {
            item.reactions.remove(position);
        }
        Ok(())
    }

    async fn list_reactions(
        &self,
        user_id: Option<&str>,
        request: &PaginationRequest,
    ) -> ServiceResult<PaginatedResult<ReactedItem>> {
        let items: Vec<ReactedItem> = {
            let state = self.enter("list_reactions")?;
            state
                .fixtures
                .reactions
                .iter()
                .filter(|item| match user_id {
                    Some(user) => item.reactions.iter().any(|reaction| reaction.users.iter().any(|id| id == user)),
                    None => true,
                })
                .cloned()
                .collect()
        };
        page_through(items, request).await
    }

    async fn list_files(
        &self,
        filter: &FileFilter,
        request: &PaginationRequest,
    ) -> ServiceResult<PaginatedResult<File>> {
        let files: Vec<File> = {
            let state = self.enter("list_files")?;
            state
                .fixtures
                .files
                .iter()
                .filter(|file| filter.user_id.as_deref().is_none_or(|user| file.user == user))
                .filter(|file| {
                    filter.channel_id.as_deref().is_none_or(|channel| {
                        state.file_channels.get(&file.id).is_some_and(|shared| shared == channel)
                    })
                })
                .cloned()
                .collect()
        };
        page_through(files, request).await
    }

    async fn get_file_info(&self, file_id: &str) -> ServiceResult<File> {
        let state = self.enter("get_file_info")?;
        state
            .fixtures
            .files
            .iter()
            .find(|file| file.id == file_id)
            .cloned()
            .ok_or_else(|| not_found("file_not_found", file_id))
    }

    async fn upload_file(&self, params: &UploadFileParams) -> ServiceResult<File> {
        let mut state = self.enter("upload_file")?;
        let id = format!("F{:08}", state.next_id());
        let file = File {
            id: id.clone(),
            name: params.filename.clone(),
            title: params.title.clone().unwrap_or_else(|| params.filename.clone()),
            size: params.content.len() as i64,
            user: state.fixtures.auth.user_id.clone(),
            url_private: format!("stub://files/{id}/{}", params.filename),
            ..File::default()
        };
        state.file_channels.insert(id.clone(), params.channel_id.clone());
        state.file_contents.insert(id, params.content.clone());
        state.fixtures.files.push(file.clone());
        Ok(file)
    }

    async fn download_file(&self, url: &str, dest: &Path) -> ServiceResult<u64> {
        let content = {
            let state = self.enter("download_file")?;
            let file = state
                .fixtures
                .files
                .iter()
                .find(|file| file.url_private == url)
                .ok_or_else(|| not_found("file_not_found", url))?;
            state.file_contents.get(&file.id).cloned().unwrap_or_default()
        };
        tokio::fs::write(dest, &content)
            .await
            .map_err(|error| ClassifiedError::from(ApiFailure::from(error)))?;
        Ok(content.len() as u64)
    }

    async fn delete_file(&self, file_id: &str) -> ServiceResult<()> {
        let mut state = self.enter("delete_file")?;
        let before = state.fixtures.files.len();
        state.fixtures.files.retain(|file| file.id != file_id);
        if state.fixtures.files.len() == before {
            return Err(not_found("file_not_found", file_id));
        }
        state.file_channels.remove(file_id);
        state.file_contents.remove(file_id);
        Ok(())
    }
}
