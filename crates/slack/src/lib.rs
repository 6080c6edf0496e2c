//! Resilient access to the Slack Web API.
//!
//! - **Errors** (`errors`) - raw [`ApiFailure`]s and their [`ClassifiedError`] taxonomy
//! - **Retry** (`retry`) - bounded backoff for rate-limited calls
//! - **Pagination** (`pagination`) - one page contract over cursor and page-number endpoints
//! - **Service** (`service`) - the [`SlackService`] capability trait
//!
//! [`SlackClient`] is the production implementation backed by `reqwest`;
//! [`StubSlackService`] serves fixtures for surface tests.

pub mod auth;
pub mod channels;
pub mod client;
pub mod errors;
pub mod files;
pub mod messages;
pub mod pagination;
pub mod reactions;
pub mod retry;
pub mod service;
pub mod stub;
pub mod users;

pub use auth::AuthResult;
pub use channels::Channel;
pub use client::{ClientOptions, SlackClient, DEFAULT_API_BASE_URL};
pub use errors::{classify, ApiFailure, ClassifiedError, ErrorCategory, ServiceResult};
pub use files::{File, FileFilter, UploadFileParams};
pub use messages::{
    ListMessagesParams, Message, SearchParams, SearchResult, SendMessageParams, DEFAULT_SEARCH_LIMIT,
};
pub use pagination::{PaginatedResult, PaginationRequest, DEFAULT_PAGE_SIZE};
pub use reactions::{ReactedItem, Reaction};
pub use retry::{RetryPolicy, MAX_RETRIES};
pub use service::SlackService;
pub use stub::{StubFixtures, StubSlackService};
pub use users::{Presence, User};
