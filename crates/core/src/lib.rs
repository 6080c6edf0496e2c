//! Local state shared by the slackcli surfaces: layered application
//! configuration, logging setup, the saved workspace store and token
//! resolution.

pub mod auth;
pub mod config;
pub mod logging;
pub mod workspace;

pub use auth::{TokenResolver, TokenSource, TOKEN_ENV};
pub use config::{
    AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig, OutputFormat,
    OutputSettings, SlackSettings,
};
pub use logging::init_logging;
pub use workspace::{default_store_path, Workspace, WorkspaceError, WorkspaceStore};
