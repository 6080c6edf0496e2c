use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::{Form, ResponseMetadata, SlackClient};
use crate::errors::ServiceResult;
use crate::pagination::{
    paginate, CursorPage, CursorPaging, CursorSource, PaginatedResult, PaginationRequest,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub real_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    pub is_admin: bool,
    pub is_bot: bool,
    pub deleted: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tz: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub presence: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    pub user_id: String,
    pub presence: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireUser {
    id: String,
    name: String,
    real_name: String,
    is_admin: bool,
    is_bot: bool,
    deleted: bool,
    tz: String,
    profile: WireProfile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireProfile {
    email: String,
    real_name: String,
}

impl From<WireUser> for User {
    fn from(wire: WireUser) -> Self {
        let real_name = if wire.real_name.is_empty() { wire.profile.real_name } else { wire.real_name };
        Self {
            id: wire.id,
            name: wire.name,
            real_name,
            email: wire.profile.email,
            is_admin: wire.is_admin,
            is_bot: wire.is_bot,
            deleted: wire.deleted,
            tz: wire.tz,
            presence: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    members: Vec<WireUser>,
    #[serde(default)]
    response_metadata: ResponseMetadata,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    user: WireUser,
}

#[derive(Debug, Deserialize)]
struct PresenceResponse {
    #[serde(default)]
    presence: String,
}

struct UsersList<'a> {
    client: &'a SlackClient,
}

#[async_trait]
impl CursorSource for UsersList<'_> {
    type Item = User;

    async fn fetch_cursor_page(&self, cursor: &str, limit: u32) -> ServiceResult<CursorPage<User>> {
        let form = Form::new().with("limit", limit.to_string()).with_optional("cursor", Some(cursor));
        let response: ListResponse = self.client.call("users.list", &form).await?;
        Ok(CursorPage {
            items: response.members.into_iter().map(User::from).collect(),
            next_cursor: response.response_metadata.next_cursor,
            has_more: None,
        })
    }
}

/// Single pages carry Slack's real continuation cursor so callers can resume.
pub(crate) async fn list(
    client: &SlackClient,
    request: &PaginationRequest,
) -> ServiceResult<PaginatedResult<User>> {
    paginate(&CursorPaging(UsersList { client }), request).await
}

pub(crate) async fn info(client: &SlackClient, user_id: &str) -> ServiceResult<User> {
    let response: UserResponse = client.call("users.info", &Form::new().with("user", user_id)).await?;
    Ok(response.user.into())
}

pub(crate) async fn presence(client: &SlackClient, user_id: &str) -> ServiceResult<Presence> {
    let response: PresenceResponse =
        client.call("users.getPresence", &Form::new().with("user", user_id)).await?;
    Ok(Presence { user_id: user_id.to_owned(), presence: response.presence })
}
