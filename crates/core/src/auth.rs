use std::env;
use std::fmt;

use secrecy::SecretString;

use crate::workspace::WorkspaceStore;

pub const TOKEN_ENV: &str = "SLACK_TOKEN";

/// Where a resolved token came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenSource {
    Flag,
    Env,
    Workspace(String),
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => f.write_str("--token flag"),
            Self::Env => write!(f, "{TOKEN_ENV} env"),
            Self::Workspace(name) => write!(f, "workspace `{name}`"),
        }
    }
}

/// Picks the token for one invocation.
///
/// Precedence: explicit flag, then `SLACK_TOKEN`, then the workspace named
/// with `--workspace`, then the active workspace in the store.
#[derive(Clone, Default)]
pub struct TokenResolver {
    flag_token: Option<String>,
    env_token: Option<String>,
    workspace: Option<String>,
}

impl fmt::Debug for TokenResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResolver")
            .field("flag_token", &self.flag_token.as_ref().map(|_| "[redacted]"))
            .field("env_token", &self.env_token.as_ref().map(|_| "[redacted]"))
            .field("workspace", &self.workspace)
            .finish()
    }
}

impl TokenResolver {
    pub fn new(flag_token: Option<String>, env_token: Option<String>, workspace: Option<String>) -> Self {
        Self {
            flag_token: non_empty(flag_token),
            env_token: non_empty(env_token),
            workspace: non_empty(workspace),
        }
    }

    /// Reads `SLACK_TOKEN` from the process environment.
    pub fn from_env(flag_token: Option<String>, workspace: Option<String>) -> Self {
        Self::new(flag_token, env::var(TOKEN_ENV).ok(), workspace)
    }

    pub fn resolve(&self, store: &WorkspaceStore) -> Option<SecretString> {
        self.resolve_with_source(store).map(|(token, _)| token)
    }

    pub fn resolve_with_source(&self, store: &WorkspaceStore) -> Option<(SecretString, TokenSource)> {
        if let Some(token) = &self.flag_token {
            return Some((SecretString::from(token.clone()), TokenSource::Flag));
        }
        if let Some(token) = &self.env_token {
            return Some((SecretString::from(token.clone()), TokenSource::Env));
        }
        if let Some(name) = &self.workspace {
            return store.token_for(name).map(|token| (token, TokenSource::Workspace(name.clone())));
        }
        store
            .active_token()
            .map(|token| (token, TokenSource::Workspace(store.active_workspace.clone())))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
