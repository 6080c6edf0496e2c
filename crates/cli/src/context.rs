use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use slackcli_core::{
    default_store_path, AppConfig, OutputFormat, SlackSettings, TokenResolver, TokenSource,
    WorkspaceStore, TOKEN_ENV,
};
use slackcli_slack::{ClientOptions, SlackClient, SlackService};
use tracing::debug;

use crate::error::CliError;

/// Builds the service a command talks to once a token is known.
pub trait ServiceFactory: Send + Sync {
    fn connect(&self, token: SecretString, settings: &SlackSettings) -> Result<Arc<dyn SlackService>, CliError>;
}

/// Production factory backed by [`SlackClient`].
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpServiceFactory;

impl ServiceFactory for HttpServiceFactory {
    fn connect(&self, token: SecretString, settings: &SlackSettings) -> Result<Arc<dyn SlackService>, CliError> {
        let client = SlackClient::with_options(
            token,
            ClientOptions {
                api_base_url: settings.api_base_url.clone(),
                timeout: Duration::from_secs(settings.timeout_secs),
                ..ClientOptions::default()
            },
        )?;
        Ok(Arc::new(client))
    }
}

/// Process-level inputs that tests replace.
#[derive(Clone)]
pub struct RunOptions {
    pub store_path: PathBuf,
    pub env_token: Option<String>,
    pub stdout_is_tty: bool,
    pub factory: Arc<dyn ServiceFactory>,
}

impl RunOptions {
    pub fn from_process() -> Self {
        Self {
            store_path: default_store_path(),
            env_token: std::env::var(TOKEN_ENV).ok(),
            stdout_is_tty: std::io::stdout().is_terminal(),
            factory: Arc::new(HttpServiceFactory),
        }
    }
}

/// Everything a command needs after global flags and config are resolved.
pub struct RunContext {
    pub config: AppConfig,
    pub format: OutputFormat,
    pub read_only: bool,
    pub flag_token: Option<String>,
    pub store_path: PathBuf,
    resolver: TokenResolver,
    factory: Arc<dyn ServiceFactory>,
}

impl RunContext {
    pub fn new(
        config: AppConfig,
        options: &RunOptions,
        flag_token: Option<String>,
        workspace: Option<String>,
    ) -> Self {
        let format = config
            .output
            .format
            .unwrap_or(if options.stdout_is_tty { OutputFormat::Table } else { OutputFormat::Json });
        let read_only = config.output.read_only;
        let resolver = TokenResolver::new(flag_token.clone(), options.env_token.clone(), workspace);

        Self {
            config,
            format,
            read_only,
            flag_token,
            store_path: options.store_path.clone(),
            resolver,
            factory: Arc::clone(&options.factory),
        }
    }

    pub fn load_store(&self) -> Result<WorkspaceStore, CliError> {
        Ok(WorkspaceStore::load(&self.store_path)?)
    }

    pub fn resolve_token(&self) -> Result<Option<(SecretString, TokenSource)>, CliError> {
        let store = self.load_store()?;
        Ok(self.resolver.resolve_with_source(&store))
    }

    pub fn connect(&self, token: SecretString) -> Result<Arc<dyn SlackService>, CliError> {
        self.factory.connect(token, &self.config.slack)
    }

    /// Resolves the token and connects; a missing token is an auth failure.
    pub fn service(&self) -> Result<Arc<dyn SlackService>, CliError> {
        let (token, source) = self.resolve_token()?.ok_or(CliError::MissingToken)?;
        debug!(%source, "resolved Slack token");
        self.connect(token)
    }
}
