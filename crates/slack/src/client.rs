use std::fmt;
use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::errors::{ApiFailure, ClassifiedError, ServiceResult};
use crate::retry::RetryPolicy;

pub const DEFAULT_API_BASE_URL: &str = "https://slack.com/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientOptions {
    pub api_base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// Production Slack Web API client. Immutable after construction.
#[derive(Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    token: SecretString,
    base_url: String,
    retry: RetryPolicy,
}

impl fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackClient")
            .field("token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

/// Form parameters for one Web API call. Empty optional values are left out.
#[derive(Debug, Default)]
pub(crate) struct Form(Vec<(&'static str, String)>);

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.0.push((key, value.into()));
        self
    }

    pub fn with_optional(self, key: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(value) if !value.is_empty() => self.with(key, value),
            _ => self,
        }
    }

    pub fn as_slice(&self) -> &[(&'static str, String)] {
        &self.0
    }
}

impl SlackClient {
    pub fn new(token: SecretString) -> Result<Self, ApiFailure> {
        Self::with_options(token, ClientOptions::default())
    }

    pub fn with_options(token: SecretString, options: ClientOptions) -> Result<Self, ApiFailure> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!("slackcli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| ApiFailure::Network(format!("failed to build http client: {error}")))?;

        Ok(Self {
            http,
            token,
            base_url: options.api_base_url.trim_end_matches('/').to_owned(),
            retry: options.retry,
        })
    }

    /// Calls a Web API method with form parameters, retrying rate limits and
    /// classifying whatever failure remains.
    pub(crate) async fn call<T: DeserializeOwned>(&self, method: &str, form: &Form) -> ServiceResult<T> {
        let form = form.as_slice();
        self.retry
            .execute(move || self.call_once(method, form))
            .await
            .map_err(|failure| ClassifiedError::from(failure).with_detail(method))
    }

    /// Like [`call`](Self::call) for methods whose success payload is irrelevant.
    pub(crate) async fn call_unit(&self, method: &str, form: &Form) -> ServiceResult<()> {
        self.call::<serde_json::Value>(method, form).await.map(|_| ())
    }

    async fn call_once<T: DeserializeOwned>(
        &self,
        method: &str,
        form: &[(&str, String)],
    ) -> Result<T, ApiFailure> {
        debug!(method, "calling slack api");
        let response = self
            .http
            .post(format!("{}/{}", self.base_url, method))
            .bearer_auth(self.token.expose_secret())
            .form(form)
            .send()
            .await?;
        let response = check_status(response)?;
        let body = response.text().await?;
        decode_envelope(method, &body)
    }

    /// Sends raw bytes to a pre-signed upload URL.
    pub(crate) async fn upload_bytes(&self, upload_url: &str, bytes: &[u8]) -> ServiceResult<()> {
        self.retry
            .execute(move || async move {
                let response = self.http.post(upload_url).body(bytes.to_vec()).send().await?;
                check_status(response).map(|_| ())
            })
            .await
            .map_err(|failure| ClassifiedError::from(failure).with_detail("file upload"))
    }

    /// Authenticated GET of a private file URL.
    pub(crate) async fn fetch_private(&self, url: &str) -> ServiceResult<Vec<u8>> {
        self.retry
            .execute(move || async move {
                debug!(url, "downloading slack file");
                let response =
                    self.http.get(url).bearer_auth(self.token.expose_secret()).send().await?;
                let response = check_status(response)?;
                Ok::<_, ApiFailure>(response.bytes().await?.to_vec())
            })
            .await
            .map_err(|failure| ClassifiedError::from(failure).with_detail("file download"))
    }
}

fn check_status(response: Response) -> Result<Response, ApiFailure> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        return Err(ApiFailure::rate_limited(retry_after));
    }
    if !status.is_success() {
        return Err(ApiFailure::api(format!("http_{}", status.as_u16())));
    }
    Ok(response)
}

/// Decodes the `{ "ok": bool, "error": "...", ... }` envelope every Web API
/// method returns.
pub(crate) fn decode_envelope<T: DeserializeOwned>(method: &str, body: &str) -> Result<T, ApiFailure> {
    let decode_error = |reason: String| ApiFailure::Decode { method: method.to_owned(), reason };

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|error| decode_error(error.to_string()))?;
    let ok = value.get("ok").and_then(serde_json::Value::as_bool).unwrap_or(false);
    if !ok {
        let code = value
            .get("error")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown_error")
            .to_owned();
        if code == "ratelimited" {
            return Err(ApiFailure::rate_limited(None));
        }
        return Err(ApiFailure::Api { code });
    }

    serde_json::from_value(value).map_err(|error| decode_error(error.to_string()))
}
