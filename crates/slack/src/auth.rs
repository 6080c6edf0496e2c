use serde::{Deserialize, Serialize};

use crate::client::{Form, SlackClient};
use crate::errors::ServiceResult;

/// Identity behind the token, as reported by `auth.test`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthResult {
    pub user_id: String,
    pub user: String,
    pub team_id: String,
    pub team: String,
    pub url: String,
}

pub(crate) async fn test(client: &SlackClient) -> ServiceResult<AuthResult> {
    client.call("auth.test", &Form::new()).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::AuthResult;

    #[test]
    fn auth_test_payload_ignores_envelope_fields() {
        let result: AuthResult = serde_json::from_value(json!({
            "ok": true,
            "url": "https://acme.slack.com/",
            "team": "Acme",
            "user": "deploy-bot",
            "team_id": "T123",
            "user_id": "U456",
            "bot_id": "B789"
        }))
        .expect("auth result");

        assert_eq!(result.team, "Acme");
        assert_eq!(result.user_id, "U456");
        assert_eq!(result.url, "https://acme.slack.com/");
    }
}
