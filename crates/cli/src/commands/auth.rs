use clap::Subcommand;
use secrecy::SecretString;
use serde::Serialize;
use serde_json::json;
use slackcli_core::Workspace;

use super::CommandResult;
use crate::context::RunContext;
use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    #[command(about = "Verify a token and save it as a workspace (uses the global --token)")]
    Login {
        #[arg(long, help = "Workspace name (defaults to the team name)")]
        name: Option<String>,
    },
    #[command(about = "Remove a saved workspace (defaults to the active one)")]
    Logout { workspace: Option<String> },
    #[command(about = "Show current authentication status")]
    Status,
    #[command(about = "List saved workspaces")]
    List,
    #[command(about = "Switch the active workspace")]
    Switch { workspace: String },
}

#[derive(Debug, Serialize)]
struct WorkspaceRow {
    name: String,
    team_id: String,
    active: bool,
}

pub async fn run(command: AuthCommand, ctx: &RunContext) -> Result<CommandResult, CliError> {
    match command {
        AuthCommand::Login { name } => login(name, ctx).await,
        AuthCommand::Logout { workspace } => {
            let mut store = ctx.load_store()?;
            let name = workspace.unwrap_or_else(|| store.active_workspace.clone());
            store.remove_workspace(&name)?;
            store.save()?;
            CommandResult::render(&json!({ "status": "logged_out", "workspace": name }), ctx.format)
        }
        AuthCommand::Status => status(ctx).await,
        AuthCommand::List => {
            let store = ctx.load_store()?;
            let rows: Vec<WorkspaceRow> = store
                .workspaces
                .iter()
                .map(|(name, workspace)| WorkspaceRow {
                    name: name.clone(),
                    team_id: workspace.team_id.clone(),
                    active: *name == store.active_workspace,
                })
                .collect();
            CommandResult::render(&rows, ctx.format)
        }
        AuthCommand::Switch { workspace } => {
            let mut store = ctx.load_store()?;
            store.switch(&workspace)?;
            store.save()?;
            CommandResult::render(&json!({ "status": "switched", "workspace": workspace }), ctx.format)
        }
    }
}

async fn login(name: Option<String>, ctx: &RunContext) -> Result<CommandResult, CliError> {
    let token = ctx
        .flag_token
        .clone()
        .filter(|token| !token.trim().is_empty())
        .ok_or(CliError::MissingToken)?;

    let service = ctx.connect(SecretString::from(token.clone()))?;
    let identity = service.auth_test().await?;

    let workspace_name = name.filter(|name| !name.is_empty()).unwrap_or_else(|| identity.team.clone());
    let mut store = ctx.load_store()?;
    store.set_workspace(
        &workspace_name,
        Workspace { name: workspace_name.clone(), token, team_id: identity.team_id.clone() },
    );
    store.save()?;

    CommandResult::render(
        &json!({
            "status": "authenticated",
            "workspace": workspace_name,
            "team": identity.team,
            "team_id": identity.team_id,
            "user": identity.user,
        }),
        ctx.format,
    )
}

async fn status(ctx: &RunContext) -> Result<CommandResult, CliError> {
    let Some((token, source)) = ctx.resolve_token()? else {
        return CommandResult::render(&json!({ "status": "not_authenticated" }), ctx.format);
    };

    let identity = match ctx.connect(token) {
        Ok(service) => service.auth_test().await.map_err(CliError::from),
        Err(error) => Err(error),
    };

    match identity {
        Ok(identity) => CommandResult::render(
            &json!({
                "status": "authenticated",
                "source": source.to_string(),
                "team": identity.team,
                "team_id": identity.team_id,
                "user": identity.user,
            }),
            ctx.format,
        ),
        Err(error) => CommandResult::render(
            &json!({ "status": "error", "source": source.to_string(), "error": error.to_string() }),
            ctx.format,
        ),
    }
}
