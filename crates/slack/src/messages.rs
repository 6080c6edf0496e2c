use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Form, ResponseMetadata, SlackClient};
use crate::errors::ServiceResult;
use crate::pagination::{
    normalize_limit, paginate, CursorPage, CursorPaging, CursorSource, PaginatedResult,
    PaginationRequest,
};

pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub timestamp: String,
    pub user: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub thread_ts: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListMessagesParams {
    pub channel_id: String,
    pub pagination: PaginationRequest,
    pub oldest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SendMessageParams {
    pub channel_id: String,
    pub text: String,
    pub thread_ts: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub sort: String,
    pub sort_dir: String,
    pub limit: i64,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            sort: "timestamp".to_owned(),
            sort_dir: "desc".to_owned(),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub matches: Vec<Message>,
    pub total: i64,
}

/// Slack's history bounds: whole seconds with a zero microsecond suffix.
fn format_timestamp(at: &DateTime<Utc>) -> String {
    format!("{}.000000", at.timestamp())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireMessage {
    ts: String,
    user: String,
    text: String,
    thread_ts: String,
    #[serde(rename = "type")]
    kind: String,
}

impl WireMessage {
    fn into_message(self, channel: &str) -> Message {
        Message {
            timestamp: self.ts,
            user: self.user,
            text: self.text,
            thread_ts: self.thread_ts,
            channel: channel.to_owned(),
            kind: self.kind,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    messages: Vec<WireMessage>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    response_metadata: ResponseMetadata,
}

#[derive(Debug, Deserialize)]
struct PostResponse {
    #[serde(default)]
    channel: String,
    #[serde(default)]
    ts: String,
    #[serde(default)]
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    #[serde(default)]
    channel: String,
    #[serde(default)]
    ts: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    messages: WireSearchMessages,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireSearchMessages {
    matches: Vec<WireSearchMatch>,
    total: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireSearchMatch {
    ts: String,
    user: String,
    text: String,
    channel: WireChannelRef,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireChannelRef {
    id: String,
}

struct ConversationHistory<'a> {
    client: &'a SlackClient,
    params: &'a ListMessagesParams,
}

#[async_trait]
impl CursorSource for ConversationHistory<'_> {
    type Item = Message;

    async fn fetch_cursor_page(&self, cursor: &str, limit: u32) -> ServiceResult<CursorPage<Message>> {
        let oldest = self.params.oldest.as_ref().map(format_timestamp);
        let latest = self.params.latest.as_ref().map(format_timestamp);
        let form = Form::new()
            .with("channel", self.params.channel_id.as_str())
            .with("limit", limit.to_string())
            .with_optional("cursor", Some(cursor))
            .with_optional("oldest", oldest.as_deref())
            .with_optional("latest", latest.as_deref());

        let response: HistoryResponse = self.client.call("conversations.history", &form).await?;
        let channel = self.params.channel_id.as_str();
        Ok(CursorPage {
            items: response.messages.into_iter().map(|message| message.into_message(channel)).collect(),
            next_cursor: response.response_metadata.next_cursor,
            has_more: Some(response.has_more),
        })
    }
}

pub(crate) async fn list(
    client: &SlackClient,
    params: &ListMessagesParams,
) -> ServiceResult<PaginatedResult<Message>> {
    paginate(&CursorPaging(ConversationHistory { client, params }), &params.pagination).await
}

pub(crate) async fn send(client: &SlackClient, params: &SendMessageParams) -> ServiceResult<Message> {
    let form = Form::new()
        .with("channel", params.channel_id.as_str())
        .with("text", params.text.as_str())
        .with_optional("thread_ts", params.thread_ts.as_deref());
    let response: PostResponse = client.call("chat.postMessage", &form).await?;

    let text = if response.message.text.is_empty() { params.text.clone() } else { response.message.text };
    Ok(Message {
        timestamp: response.ts,
        user: response.message.user,
        text,
        thread_ts: params.thread_ts.clone().unwrap_or_default(),
        channel: response.channel,
        kind: "message".to_owned(),
    })
}

pub(crate) async fn edit(
    client: &SlackClient,
    channel_id: &str,
    timestamp: &str,
    text: &str,
) -> ServiceResult<Message> {
    let form = Form::new().with("channel", channel_id).with("ts", timestamp).with("text", text);
    let response: UpdateResponse = client.call("chat.update", &form).await?;
    Ok(Message {
        timestamp: response.ts,
        text: response.text,
        channel: response.channel,
        kind: "message".to_owned(),
        ..Message::default()
    })
}

pub(crate) async fn delete(client: &SlackClient, channel_id: &str, timestamp: &str) -> ServiceResult<()> {
    let form = Form::new().with("channel", channel_id).with("ts", timestamp);
    client.call_unit("chat.delete", &form).await
}

/// Returns the first page of matches only, together with Slack's total count.
pub(crate) async fn search(client: &SlackClient, params: &SearchParams) -> ServiceResult<SearchResult> {
    let form = Form::new()
        .with("query", params.query.as_str())
        .with_optional("sort", Some(params.sort.as_str()))
        .with_optional("sort_dir", Some(params.sort_dir.as_str()))
        .with("count", normalize_limit(params.limit).to_string())
        .with("page", "1");
    let response: SearchResponse = client.call("search.messages", &form).await?;

    let matches = response
        .messages
        .matches
        .into_iter()
        .map(|found| Message {
            timestamp: found.ts,
            user: found.user,
            text: found.text,
            channel: found.channel.id,
            kind: "message".to_owned(),
            ..Message::default()
        })
        .collect();
    Ok(SearchResult { matches, total: response.messages.total })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::{format_timestamp, Message, SearchParams, WireMessage};

    #[test]
    fn history_bounds_use_whole_seconds() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single().expect("valid time");
        assert_eq!(format_timestamp(&at), "1704164645.000000");
    }

    #[test]
    fn wire_message_takes_channel_from_request() {
        let wire: WireMessage = serde_json::from_value(json!({
            "type": "message",
            "user": "U1",
            "text": "hello",
            "ts": "1700000000.000100",
            "thread_ts": "1700000000.000001"
        }))
        .expect("wire message");

        let message = wire.into_message("C42");
        assert_eq!(message.channel, "C42");
        assert_eq!(message.timestamp, "1700000000.000100");
        assert_eq!(message.thread_ts, "1700000000.000001");
        assert_eq!(message.kind, "message");
    }

    #[test]
    fn message_serializes_kind_as_type() {
        let message = Message { kind: "message".into(), text: "hi".into(), ..Message::default() };
        let value = serde_json::to_value(&message).expect("serialize");
        assert_eq!(value["type"], "message");
        assert!(value.get("thread_ts").is_none());
    }

    #[test]
    fn search_defaults_match_the_surfaces() {
        let params = SearchParams::new("deploy");
        assert_eq!(params.sort, "timestamp");
        assert_eq!(params.sort_dir, "desc");
        assert_eq!(params.limit, 20);
    }
}
