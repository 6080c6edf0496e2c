//! Integration tests for the Slack MCP server.
//!
//! Tool handlers run against `StubSlackService` and cover:
//! - tool registration and server info
//! - successful JSON results
//! - read-only rejection of write tools
//! - classified failures surfacing as tool-level errors

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use rmcp::ServerHandler;
use serde_json::{json, Value};
use slackcli_mcp::tools::{
    ChannelArgs, CreateChannelArgs, DownloadFileArgs, ListMessagesArgs, PageArgs, SearchArgs, SendMessageArgs,
    UploadFileArgs,
};
use slackcli_mcp::{SlackMcpServer, ALL_TOOL_NAMES};
use slackcli_slack::{
    AuthResult, Channel, ClassifiedError, ErrorCategory, Message, StubFixtures, StubSlackService,
};

fn fixtures() -> StubFixtures {
    StubFixtures {
        auth: AuthResult {
            user_id: "U1".into(),
            user: "deploy-bot".into(),
            team: "Acme".into(),
            ..AuthResult::default()
        },
        channels: (1..=3)
            .map(|n| Channel { id: format!("C{n}"), name: format!("team-{n}"), ..Channel::default() })
            .collect(),
        messages: vec![
            Message {
                timestamp: "1700000000.000001".into(),
                user: "U1".into(),
                text: "Deploy finished".into(),
                channel: "C1".into(),
                kind: "message".into(),
                ..Message::default()
            },
            Message {
                timestamp: "1700000000.000002".into(),
                user: "U2".into(),
                text: "lunch?".into(),
                channel: "C1".into(),
                kind: "message".into(),
                ..Message::default()
            },
        ],
        ..StubFixtures::default()
    }
}

fn server(read_only: bool) -> (Arc<StubSlackService>, SlackMcpServer) {
    let stub = Arc::new(StubSlackService::with_fixtures(fixtures()));
    let server = SlackMcpServer::new(stub.clone(), read_only);
    (stub, server)
}

fn args<T: serde::de::DeserializeOwned>(value: Value) -> Parameters<T> {
    Parameters(serde_json::from_value(value).expect("tool arguments"))
}

fn text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|content| content.as_text().map(|text| text.text.clone()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_error(result: &CallToolResult) -> bool {
    result.is_error == Some(true)
}

#[test]
fn registers_every_tool() {
    let (_, server) = server(false);
    let mut registered = server.tool_names();
    registered.sort();
    let mut expected: Vec<String> = ALL_TOOL_NAMES.iter().map(|name| name.to_string()).collect();
    expected.sort();
    assert_eq!(registered, expected);
}

#[test]
fn server_info_advertises_tools() {
    let (_, server) = server(true);
    assert!(server.is_read_only());
    let info = server.get_info();
    assert!(info.capabilities.tools.is_some());
    assert!(info.instructions.unwrap_or_default().contains("read-only"));
}

#[tokio::test]
async fn auth_test_returns_pretty_json() {
    let (_, server) = server(false);
    let result = server.auth_test().await.expect("tool result");

    assert!(!is_error(&result));
    let body = text(&result);
    assert!(body.contains('\n'), "result should be pretty-printed");
    let payload: Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(payload["team"], "Acme");
}

#[tokio::test]
async fn list_channels_honours_limit_and_cursor() {
    let (_, server) = server(false);

    let first = server.list_channels(args::<PageArgs>(json!({ "limit": 2 }))).await.expect("page");
    let payload: Value = serde_json::from_str(&text(&first)).expect("json");
    assert_eq!(payload["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(payload["has_more"], true);

    let cursor = payload["next_cursor"].as_str().expect("cursor").to_string();
    let second = server
        .list_channels(args::<PageArgs>(json!({ "limit": 2, "cursor": cursor })))
        .await
        .expect("page");
    let payload: Value = serde_json::from_str(&text(&second)).expect("json");
    assert_eq!(payload["items"][0]["id"], "C3");
    assert_eq!(payload["has_more"], false);
    assert!(payload.get("next_cursor").is_none());
}

#[tokio::test]
async fn list_messages_fetch_all_collects_every_page() {
    let (_, server) = server(false);
    let result = server
        .list_messages(args::<ListMessagesArgs>(json!({ "channel_id": "C1", "limit": 1, "all": true })))
        .await
        .expect("messages");
    let payload: Value = serde_json::from_str(&text(&result)).expect("json");
    assert_eq!(payload["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(payload["has_more"], false);
}

#[tokio::test]
async fn read_only_rejects_writes_without_calling_the_service() {
    let (stub, server) = server(true);
    let result = server
        .send_message(args::<SendMessageArgs>(json!({ "channel_id": "C1", "text": "hi" })))
        .await
        .expect("tool result");

    assert!(is_error(&result));
    assert_eq!(text(&result), "send_message is a write operation and cannot be used in read-only mode");
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn read_only_still_serves_reads() {
    let (stub, server) = server(true);
    let result = server
        .search_messages(args::<SearchArgs>(json!({ "query": "deploy" })))
        .await
        .expect("search");

    assert!(!is_error(&result));
    let payload: Value = serde_json::from_str(&text(&result)).expect("json");
    assert_eq!(payload["total"], 1);
    assert_eq!(stub.calls(), vec!["search_messages"]);
}

#[tokio::test]
async fn service_failures_become_tool_errors() {
    let (_, server) = server(false);
    let result = server
        .get_channel_info(args::<ChannelArgs>(json!({ "channel_id": "C404" })))
        .await
        .expect("tool-level error, not a protocol fault");

    assert!(is_error(&result));
    assert_eq!(text(&result), "not_found: channel_not_found (C404)");
}

#[tokio::test]
async fn injected_rate_limit_is_reported_with_its_category() {
    let (stub, server) = server(false);
    stub.fail_with(ClassifiedError::from(slackcli_slack::ApiFailure::rate_limited(None)));

    let result = server.auth_test().await.expect("tool result");
    assert!(is_error(&result));
    assert!(text(&result).starts_with(ErrorCategory::RateLimit.as_code()));
}

#[tokio::test]
async fn upload_then_download_round_trips_content() {
    let (_, server) = server(false);
    let uploaded = server
        .upload_file(args::<UploadFileArgs>(json!({
            "channel_id": "C1",
            "filename": "notes.txt",
            "content": "release notes"
        })))
        .await
        .expect("upload");
    assert!(!is_error(&uploaded));
    let file: Value = serde_json::from_str(&text(&uploaded)).expect("json");
    let file_id = file["id"].as_str().expect("file id").to_string();

    let dir = tempfile::tempdir().expect("tempdir");
    let dest = dir.path().join("copy.txt");
    let downloaded = server
        .download_file(args::<DownloadFileArgs>(json!({
            "file_id": file_id,
            "dest": dest.display().to_string()
        })))
        .await
        .expect("download");

    assert!(!is_error(&downloaded));
    let payload: Value = serde_json::from_str(&text(&downloaded)).expect("json");
    assert_eq!(payload["status"], "downloaded");
    assert_eq!(payload["bytes"], 13);
    assert_eq!(std::fs::read_to_string(&dest).expect("read back"), "release notes");
}

#[tokio::test]
async fn upload_requires_exactly_one_source() {
    let (stub, server) = server(false);
    let result = server
        .upload_file(args::<UploadFileArgs>(json!({ "channel_id": "C1", "filename": "empty.txt" })))
        .await
        .expect("tool result");

    assert!(is_error(&result));
    assert!(text(&result).starts_with("validation_error: invalid_arguments"));
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn create_channel_adds_to_the_workspace() {
    let (stub, server) = server(false);
    let result = server
        .create_channel(args::<CreateChannelArgs>(json!({ "name": "incident-42" })))
        .await
        .expect("tool result");

    assert!(!is_error(&result));
    let channels = stub.fixtures().channels;
    assert_eq!(channels.len(), 4);
    assert!(channels.iter().any(|channel| channel.name == "incident-42"));
}

#[tokio::test]
async fn download_refuses_parent_directory_destinations() {
    let (stub, server) = server(false);
    let result = server
        .download_file(args::<DownloadFileArgs>(json!({ "file_id": "F1", "dest": "../escape.txt" })))
        .await
        .expect("tool result");

    assert!(is_error(&result));
    assert!(text(&result).starts_with("validation_error: invalid_destination"));
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn download_never_overwrites_an_existing_file() {
    let (stub, server) = server(false);
    let uploaded = server
        .upload_file(args::<UploadFileArgs>(json!({
            "channel_id": "C1",
            "filename": "../escape.txt",
            "content": "payload"
        })))
        .await
        .expect("upload");
    let file: Value = serde_json::from_str(&text(&uploaded)).expect("json");
    let file_id = file["id"].as_str().expect("file id").to_string();

    let dir = tempfile::tempdir().expect("tempdir");
    let dest = dir.path().join("keep.txt");
    std::fs::write(&dest, "original").expect("seed destination");

    let result = server
        .download_file(args::<DownloadFileArgs>(json!({
            "file_id": file_id,
            "dest": dest.display().to_string()
        })))
        .await
        .expect("tool result");

    assert!(is_error(&result));
    assert!(text(&result).starts_with("validation_error: destination_exists"));
    assert_eq!(std::fs::read_to_string(&dest).expect("read back"), "original");
    assert!(!stub.calls().contains(&"download_file".to_string()));
}
