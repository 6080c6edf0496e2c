use chrono::{DateTime, TimeZone, Utc};
use clap::Subcommand;
use serde_json::json;
use slackcli_slack::{ListMessagesParams, SearchParams, SendMessageParams, DEFAULT_SEARCH_LIMIT};

use super::{CommandResult, PageFlags};
use crate::context::RunContext;
use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum MessagesCommand {
    #[command(about = "List messages in a channel")]
    List {
        #[arg(long = "channel", help = "Channel ID")]
        channel_id: String,
        #[command(flatten)]
        page: PageFlags,
        #[arg(long, value_parser = parse_time, help = "Only messages after this time (RFC 3339 or unix seconds)")]
        oldest: Option<DateTime<Utc>>,
        #[arg(long, value_parser = parse_time, help = "Only messages before this time (RFC 3339 or unix seconds)")]
        latest: Option<DateTime<Utc>>,
    },
    #[command(about = "Send a message")]
    Send {
        #[arg(long = "channel", help = "Channel ID")]
        channel_id: String,
        #[arg(long, help = "Message text")]
        text: String,
    },
    #[command(about = "Reply to a thread")]
    Reply {
        #[arg(long = "channel", help = "Channel ID")]
        channel_id: String,
        #[arg(long, help = "Parent message timestamp")]
        thread_ts: String,
        #[arg(long, help = "Reply text")]
        text: String,
    },
    #[command(about = "Edit a message")]
    Edit {
        #[arg(long = "channel", help = "Channel ID")]
        channel_id: String,
        #[arg(long, help = "Message timestamp")]
        timestamp: String,
        #[arg(long, help = "New message text")]
        text: String,
    },
    #[command(about = "Delete a message")]
    Delete {
        #[arg(long = "channel", help = "Channel ID")]
        channel_id: String,
        #[arg(long, help = "Message timestamp")]
        timestamp: String,
    },
    #[command(about = "Search messages")]
    Search {
        #[arg(long, help = "Search query")]
        query: String,
        #[arg(long, default_value = "timestamp", help = "Sort field (timestamp|score)")]
        sort: String,
        #[arg(long, default_value = "desc", help = "Sort direction (asc|desc)")]
        sort_dir: String,
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT, help = "Number of results")]
        limit: i64,
    },
}

impl MessagesCommand {
    pub fn write_name(&self) -> Option<&'static str> {
        match self {
            Self::List { .. } | Self::Search { .. } => None,
            Self::Send { .. } => Some("send"),
            Self::Reply { .. } => Some("reply"),
            Self::Edit { .. } => Some("edit"),
            Self::Delete { .. } => Some("delete"),
        }
    }
}

pub async fn run(command: MessagesCommand, ctx: &RunContext) -> Result<CommandResult, CliError> {
    let service = ctx.service()?;

    match command {
        MessagesCommand::List { channel_id, page, oldest, latest } => {
            let params =
                ListMessagesParams { channel_id, pagination: page.to_request(), oldest, latest };
            let result = service.list_messages(&params).await?;
            CommandResult::render(&result, ctx.format)
        }
        MessagesCommand::Send { channel_id, text } => {
            let message =
                service.send_message(&SendMessageParams { channel_id, text, thread_ts: None }).await?;
            CommandResult::render(&message, ctx.format)
        }
        MessagesCommand::Reply { channel_id, thread_ts, text } => {
            let params = SendMessageParams { channel_id, text, thread_ts: Some(thread_ts) };
            let message = service.send_message(&params).await?;
            CommandResult::render(&message, ctx.format)
        }
        MessagesCommand::Edit { channel_id, timestamp, text } => {
            let message = service.edit_message(&channel_id, &timestamp, &text).await?;
            CommandResult::render(&message, ctx.format)
        }
        MessagesCommand::Delete { channel_id, timestamp } => {
            service.delete_message(&channel_id, &timestamp).await?;
            CommandResult::render(
                &json!({ "status": "deleted", "channel_id": channel_id, "timestamp": timestamp }),
                ctx.format,
            )
        }
        MessagesCommand::Search { query, sort, sort_dir, limit } => {
            let result = service.search_messages(&SearchParams { query, sort, sort_dir, limit }).await?;
            CommandResult::render(&result, ctx.format)
        }
    }
}

fn parse_time(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(seconds) = value.trim().parse::<i64>() {
        return Utc
            .timestamp_opt(seconds, 0)
            .single()
            .ok_or_else(|| format!("`{value}` is out of range for a unix timestamp"));
    }
    DateTime::parse_from_rfc3339(value.trim())
        .map(|time| time.with_timezone(&Utc))
        .map_err(|error| format!("`{value}` is neither unix seconds nor RFC 3339: {error}"))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::parse_time;

    #[test]
    fn time_flags_accept_unix_seconds_and_rfc3339() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single().expect("time");
        assert_eq!(parse_time("1704164645"), Ok(expected));
        assert_eq!(parse_time("2024-01-02T03:04:05Z"), Ok(expected));
        assert_eq!(parse_time("2024-01-02T04:04:05+01:00"), Ok(expected));
        assert!(parse_time("yesterday").is_err());
    }
}
