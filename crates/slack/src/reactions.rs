use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::{Form, SlackClient};
use crate::errors::ServiceResult;
use crate::pagination::{
    paginate, NumberedPage, NumberedSource, PageNumberPaging, PaginatedResult, PaginationRequest,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reaction {
    pub name: String,
    pub count: i64,
    pub users: Vec<String>,
}

/// Something the user reacted to, with every reaction on it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactedItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timestamp: String,
    pub reactions: Vec<Reaction>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireReactedItem {
    #[serde(rename = "type")]
    kind: String,
    channel: String,
    message: Option<WireReactedMessage>,
    file: Option<WireReactedFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireReactedMessage {
    ts: String,
    channel: String,
    reactions: Vec<Reaction>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireReactedFile {
    reactions: Vec<Reaction>,
}

impl From<WireReactedItem> for ReactedItem {
    fn from(wire: WireReactedItem) -> Self {
        let mut item = Self { kind: wire.kind, channel: wire.channel, ..Self::default() };
        if let Some(message) = wire.message {
            if item.channel.is_empty() {
                item.channel = message.channel;
            }
            item.timestamp = message.ts;
            item.reactions = message.reactions;
        } else if let Some(file) = wire.file {
            item.reactions = file.reactions;
        }
        item
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListResponse {
    items: Vec<WireReactedItem>,
    paging: WirePaging,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WirePaging {
    page: u32,
    pages: u32,
}

struct ReactionsList<'a> {
    client: &'a SlackClient,
    user_id: Option<&'a str>,
}

#[async_trait]
impl NumberedSource for ReactionsList<'_> {
    type Item = ReactedItem;

    async fn fetch_numbered_page(
        &self,
        page: u32,
        limit: u32,
    ) -> ServiceResult<NumberedPage<ReactedItem>> {
        let form = Form::new()
            .with_optional("user", self.user_id)
            .with("count", limit.to_string())
            .with("page", page.to_string())
            .with("full", "true");
        let response: ListResponse = self.client.call("reactions.list", &form).await?;
        Ok(NumberedPage {
            items: response.items.into_iter().map(ReactedItem::from).collect(),
            page: response.paging.page,
            pages: response.paging.pages,
        })
    }
}

pub(crate) async fn list(
    client: &SlackClient,
    user_id: Option<&str>,
    request: &PaginationRequest,
) -> ServiceResult<PaginatedResult<ReactedItem>> {
    paginate(&PageNumberPaging(ReactionsList { client, user_id }), request).await
}

pub(crate) async fn add(client: &SlackClient, channel_id: &str, timestamp: &str, name: &str) -> ServiceResult<()> {
    let form = Form::new().with("channel", channel_id).with("timestamp", timestamp).with("name", name);
    client.call_unit("reactions.add", &form).await
}

pub(crate) async fn remove(
    client: &SlackClient,
    channel_id: &str,
    timestamp: &str,
    name: &str,
) -> ServiceResult<()> {
    let form = Form::new().with("channel", channel_id).with("timestamp", timestamp).with("name", name);
    client.call_unit("reactions.remove", &form).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ReactedItem, WireReactedItem};

    #[test]
    fn message_item_carries_channel_timestamp_and_reactions() {
        let wire: WireReactedItem = serde_json::from_value(json!({
            "type": "message",
            "channel": "C123",
            "message": {
                "ts": "1700000000.000100",
                "reactions": [
                    { "name": "thumbsup", "count": 3, "users": ["U1", "U2", "U3"] },
                    { "name": "heart", "count": 1, "users": ["U4"] }
                ]
            }
        }))
        .expect("wire item");

        let item = ReactedItem::from(wire);
        assert_eq!(item.kind, "message");
        assert_eq!(item.channel, "C123");
        assert_eq!(item.timestamp, "1700000000.000100");
        assert_eq!(item.reactions.len(), 2);
        assert_eq!(item.reactions[0].name, "thumbsup");
        assert_eq!(item.reactions[0].users, vec!["U1", "U2", "U3"]);
    }

    #[test]
    fn file_item_has_no_timestamp() {
        let wire: WireReactedItem = serde_json::from_value(json!({
            "type": "file",
            "file": { "id": "F1", "reactions": [{ "name": "eyes", "count": 1, "users": ["U1"] }] }
        }))
        .expect("wire item");

        let item = ReactedItem::from(wire);
        assert_eq!(item.kind, "file");
        assert!(item.timestamp.is_empty());
        assert_eq!(item.reactions[0].name, "eyes");
    }
}
