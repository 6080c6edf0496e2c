use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::{Form, ResponseMetadata, SlackClient};
use crate::errors::ServiceResult;
use crate::pagination::{
    paginate, CursorPage, CursorPaging, CursorSource, PaginatedResult, PaginationRequest,
};

const CONVERSATION_TYPES: &str = "public_channel,private_channel";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub topic: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub purpose: String,
    pub num_members: i64,
    pub is_archived: bool,
    pub is_private: bool,
    pub is_member: bool,
    pub created: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireChannel {
    id: String,
    name: String,
    topic: WireText,
    purpose: WireText,
    num_members: i64,
    is_archived: bool,
    is_private: bool,
    is_member: bool,
    created: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireText {
    value: String,
}

impl From<WireChannel> for Channel {
    fn from(wire: WireChannel) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            topic: wire.topic.value,
            purpose: wire.purpose.value,
            num_members: wire.num_members,
            is_archived: wire.is_archived,
            is_private: wire.is_private,
            is_member: wire.is_member,
            created: wire.created,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    channels: Vec<WireChannel>,
    #[serde(default)]
    response_metadata: ResponseMetadata,
}

#[derive(Debug, Deserialize)]
struct ChannelResponse {
    channel: WireChannel,
}

struct ConversationsList<'a> {
    client: &'a SlackClient,
}

#[async_trait]
impl CursorSource for ConversationsList<'_> {
    type Item = Channel;

    async fn fetch_cursor_page(&self, cursor: &str, limit: u32) -> ServiceResult<CursorPage<Channel>> {
        let form = Form::new()
            .with("types", CONVERSATION_TYPES)
            .with("exclude_archived", "false")
            .with("limit", limit.to_string())
            .with_optional("cursor", Some(cursor));
        let response: ListResponse = self.client.call("conversations.list", &form).await?;
        Ok(CursorPage {
            items: response.channels.into_iter().map(Channel::from).collect(),
            next_cursor: response.response_metadata.next_cursor,
            has_more: None,
        })
    }
}

pub(crate) async fn list(
    client: &SlackClient,
    request: &PaginationRequest,
) -> ServiceResult<PaginatedResult<Channel>> {
    paginate(&CursorPaging(ConversationsList { client }), request).await
}

pub(crate) async fn info(client: &SlackClient, channel_id: &str) -> ServiceResult<Channel> {
    let form = Form::new().with("channel", channel_id);
    let response: ChannelResponse = client.call("conversations.info", &form).await?;
    Ok(response.channel.into())
}

pub(crate) async fn create(client: &SlackClient, name: &str, is_private: bool) -> ServiceResult<Channel> {
    let form = Form::new().with("name", name).with("is_private", is_private.to_string());
    let response: ChannelResponse = client.call("conversations.create", &form).await?;
    Ok(response.channel.into())
}

pub(crate) async fn archive(client: &SlackClient, channel_id: &str) -> ServiceResult<()> {
    client.call_unit("conversations.archive", &Form::new().with("channel", channel_id)).await
}

pub(crate) async fn invite(client: &SlackClient, channel_id: &str, user_ids: &[String]) -> ServiceResult<()> {
    let form = Form::new().with("channel", channel_id).with("users", user_ids.join(","));
    client.call_unit("conversations.invite", &form).await
}

pub(crate) async fn kick(client: &SlackClient, channel_id: &str, user_id: &str) -> ServiceResult<()> {
    let form = Form::new().with("channel", channel_id).with("user", user_id);
    client.call_unit("conversations.kick", &form).await
}

pub(crate) async fn set_topic(client: &SlackClient, channel_id: &str, topic: &str) -> ServiceResult<()> {
    let form = Form::new().with("channel", channel_id).with("topic", topic);
    client.call_unit("conversations.setTopic", &form).await
}

pub(crate) async fn set_purpose(
    client: &SlackClient,
    channel_id: &str,
    purpose: &str,
) -> ServiceResult<()> {
    let form = Form::new().with("channel", channel_id).with("purpose", purpose);
    client.call_unit("conversations.setPurpose", &form).await
}
