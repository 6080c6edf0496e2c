use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

const AUTH_CODES: &[&str] =
    &["invalid_auth", "not_authed", "token_revoked", "token_expired", "account_inactive"];
const NOT_FOUND_CODES: &[&str] =
    &["channel_not_found", "user_not_found", "file_not_found", "message_not_found"];
const PERMISSION_CODES: &[&str] =
    &["not_in_channel", "missing_scope", "cannot_dm_bot", "restricted_action"];
const VALIDATION_CODES: &[&str] =
    &["too_many_attachments", "msg_too_long", "no_text", "invalid_blocks"];

/// Advisory wait attached to a 429 response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitSignal {
    pub retry_after: Option<Duration>,
}

/// Raw failure observed while talking to the Slack Web API, before classification.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiFailure {
    #[error("{code}")]
    Api { code: String },
    #[error("rate limited")]
    RateLimited(RateLimitSignal),
    #[error("rate limited after {retries} retries")]
    RetriesExhausted {
        retries: u32,
        #[source]
        last: Box<ApiFailure>,
    },
    #[error("network failure: {0}")]
    Network(String),
    #[error("unexpected response from `{method}`: {reason}")]
    Decode { method: String, reason: String },
    #[error("local file failure: {0}")]
    Io(String),
}

impl ApiFailure {
    pub fn api(code: impl Into<String>) -> Self {
        Self::Api { code: code.into() }
    }

    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        Self::RateLimited(RateLimitSignal { retry_after })
    }

    pub fn rate_limit_signal(&self) -> Option<&RateLimitSignal> {
        match self {
            Self::RateLimited(signal) => Some(signal),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiFailure {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::Decode { method: "response".to_owned(), reason: error.to_string() };
        }
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for ApiFailure {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Auth,
    RateLimit,
    NotFound,
    Permission,
    Validation,
    ApiError,
    Network,
}

impl ErrorCategory {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Auth => "auth_error",
            Self::RateLimit => "rate_limited",
            Self::NotFound => "not_found",
            Self::Permission => "permission_denied",
            Self::Validation => "validation_error",
            Self::ApiError => "api_error",
            Self::Network => "network_error",
        }
    }

    fn from_provider_code(code: &str) -> Self {
        if AUTH_CODES.contains(&code) {
            Self::Auth
        } else if NOT_FOUND_CODES.contains(&code) {
            Self::NotFound
        } else if PERMISSION_CODES.contains(&code) {
            Self::Permission
        } else if VALIDATION_CODES.contains(&code) {
            Self::Validation
        } else {
            Self::ApiError
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// A failure normalized into the fixed category taxonomy. The raw failure
/// stays reachable through `cause` and `Error::source`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{}: {}{}", .category, .message, detail_suffix(.detail))]
pub struct ClassifiedError {
    pub category: ErrorCategory,
    pub message: String,
    pub detail: Option<String>,
    #[source]
    pub cause: ApiFailure,
}

impl ClassifiedError {
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Builds a validation failure for input rejected before any request is made.
    pub fn invalid_input(code: &str, detail: impl Into<String>) -> Self {
        Self::from(ApiFailure::api(code)).with_detail(detail).recategorize(ErrorCategory::Validation)
    }

    fn recategorize(mut self, category: ErrorCategory) -> Self {
        self.category = category;
        self
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) if !detail.is_empty() => format!(" ({detail})"),
        _ => String::new(),
    }
}

impl From<ApiFailure> for ClassifiedError {
    fn from(cause: ApiFailure) -> Self {
        let category = match &cause {
            ApiFailure::Api { code } => ErrorCategory::from_provider_code(code),
            ApiFailure::RateLimited(_) | ApiFailure::RetriesExhausted { .. } => {
                ErrorCategory::RateLimit
            }
            ApiFailure::Network(_) => ErrorCategory::Network,
            ApiFailure::Decode { .. } | ApiFailure::Io(_) => ErrorCategory::ApiError,
        };
        Self { category, message: cause.to_string(), detail: None, cause }
    }
}

/// Maps an optional raw failure into the category taxonomy. `None` passes through.
pub fn classify(error: Option<ApiFailure>) -> Option<ClassifiedError> {
    error.map(ClassifiedError::from)
}

pub type ServiceResult<T> = Result<T, ClassifiedError>;
