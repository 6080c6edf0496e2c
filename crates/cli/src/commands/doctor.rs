use serde::Serialize;
use slackcli_core::ConfigError;

use super::CommandResult;
use crate::context::RunContext;
use crate::error::CliError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn pass(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Pass, details: details.into() }
    }

    fn fail(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Fail, details: details.into() }
    }

    fn skipped(name: &'static str, after: &str) -> Self {
        Self { name, status: CheckStatus::Skipped, details: format!("skipped because {after}") }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

/// Runs the readiness checks. Any failed check makes the command exit 1.
pub async fn run(
    json_output: bool,
    loaded: Result<&RunContext, ConfigError>,
) -> Result<CommandResult, CliError> {
    let report = build_report(loaded).await;
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output =
        if json_output { serde_json::to_string_pretty(&report)? } else { render_human(&report) };

    Ok(CommandResult { exit_code, output })
}

async fn build_report(loaded: Result<&RunContext, ConfigError>) -> DoctorReport {
    let mut checks = Vec::new();

    match loaded {
        Ok(ctx) => {
            checks.push(DoctorCheck::pass("config_validation", "configuration loaded and validated"));
            checks.extend(check_slack(ctx).await);
        }
        Err(error) => {
            checks.push(DoctorCheck::fail("config_validation", error.to_string()));
            checks.push(DoctorCheck::skipped("token_readiness", "configuration did not load"));
            checks.push(DoctorCheck::skipped("slack_auth", "configuration did not load"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

async fn check_slack(ctx: &RunContext) -> Vec<DoctorCheck> {
    let (token, source) = match ctx.resolve_token() {
        Ok(Some(resolved)) => resolved,
        Ok(None) => {
            return vec![
                DoctorCheck::fail("token_readiness", CliError::MissingToken.to_string()),
                DoctorCheck::skipped("slack_auth", "no token was resolved"),
            ];
        }
        Err(error) => {
            return vec![
                DoctorCheck::fail("token_readiness", error.to_string()),
                DoctorCheck::skipped("slack_auth", "no token was resolved"),
            ];
        }
    };

    let token_check = DoctorCheck::pass("token_readiness", format!("token resolved from {source}"));

    let identity = match ctx.connect(token) {
        Ok(service) => service.auth_test().await.map_err(CliError::from),
        Err(error) => Err(error),
    };
    let auth_check = match identity {
        Ok(identity) => DoctorCheck::pass(
            "slack_auth",
            format!("authenticated as {} in {} ({})", identity.user, identity.team, identity.team_id),
        ),
        Err(error) => DoctorCheck::fail("slack_auth", error.to_string()),
    };

    vec![token_check, auth_check]
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
