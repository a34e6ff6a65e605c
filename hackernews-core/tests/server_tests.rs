//! End-to-end tool calls through the MCP server against a mocked upstream

use std::time::Duration;

use hackernews_core::config::HackerNewsConfig;
use hackernews_core::mcp::{JsonRpcRequest, LineTransport, McpServer};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn server_for(upstream: &MockServer) -> McpServer {
    let mut config = HackerNewsConfig::default();
    config.client.base_url = format!("{}/v0", upstream.uri());
    config.client.timeout = Duration::from_secs(5);
    config.batch.max_concurrency = 3;
    hackernews_core::build_server(&config).unwrap()
}

async fn mount_item(upstream: &MockServer, id: u64, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v0/item/{}.json", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(upstream)
        .await;
}

async fn call_tool(server: &McpServer, name: &str, arguments: Value) -> Value {
    let request = JsonRpcRequest::new(1i64, "tools/call")
        .with_params(json!({ "name": name, "arguments": arguments }));
    let response = server.handle_request(request).await.unwrap();
    assert!(response.error.is_none(), "{:?}", response.error);
    response.result.unwrap()
}

fn result_text(result: &Value) -> &str {
    result["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn test_story_list_skips_missing_items_and_keeps_order() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/topstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([30, 10, 20, 40, 50])))
        .expect(1)
        .mount(&upstream)
        .await;
    mount_item(&upstream, 30, json!({"id": 30, "type": "story", "title": "thirty"})).await;
    mount_item(&upstream, 10, Value::Null).await;
    mount_item(&upstream, 20, json!({"id": 20, "type": "story", "title": "twenty"})).await;
    Mock::given(method("GET"))
        .and(path("/v0/item/40.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&upstream)
        .await;

    let server = server_for(&upstream);
    let result = call_tool(&server, "hn_get_top_stories", json!({"limit": 4})).await;
    assert!(result.get("isError").is_none());

    let stories: Vec<Value> = serde_json::from_str(result_text(&result)).unwrap();
    let ids: Vec<u64> = stories.iter().map(|s| s["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![30, 20]);

    // Item 50 is past the limit and never requested
    let requests = upstream.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/v0/item/50.json"));
    assert_eq!(requests.len(), 5);
}

#[tokio::test]
async fn test_invalid_limit_never_reaches_upstream() {
    let upstream = MockServer::start().await;
    let server = server_for(&upstream);

    let result = call_tool(&server, "hn_get_ask_stories", json!({"limit": 0})).await;
    assert_eq!(result["isError"], true);
    assert!(result_text(&result).starts_with("Validation failed: limit"));

    let result = call_tool(&server, "hn_get_ask_stories", json!({"limit": 201})).await;
    assert_eq!(result["isError"], true);

    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_failure_is_a_tool_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/jobstories.json"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&upstream)
        .await;

    let server = server_for(&upstream);
    let result = call_tool(&server, "hn_get_job_stories", json!({})).await;
    assert_eq!(result["isError"], true);
    assert!(result_text(&result).starts_with("Error: HTTP 502"));
}

#[tokio::test]
async fn test_get_item_found_and_missing() {
    let upstream = MockServer::start().await;
    mount_item(&upstream, 8863, json!({"id": 8863, "type": "story", "by": "dhouston"})).await;
    mount_item(&upstream, 99, Value::Null).await;

    let server = server_for(&upstream);

    let found = call_tool(&server, "hn_get_item", json!({"id": 8863})).await;
    let item: Value = serde_json::from_str(result_text(&found)).unwrap();
    assert_eq!(item["by"], "dhouston");
    assert_eq!(item["type"], "story");

    let missing = call_tool(&server, "hn_get_item", json!({"id": 99})).await;
    assert!(missing.get("isError").is_none());
    assert_eq!(result_text(&missing), "null");

    let invalid = call_tool(&server, "hn_get_item", json!({"id": "abc"})).await;
    assert_eq!(invalid["isError"], true);
}

#[tokio::test]
async fn test_items_pass_through_unchanged() {
    let upstream = MockServer::start().await;
    let odd = json!({"id": 11, "type": "hologram", "descendants": -1, "flair": {"color": "red"}});
    let plain = json!({"id": 12, "type": "story", "title": "plain"});
    Mock::given(method("GET"))
        .and(path("/v0/newstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([11, 12])))
        .mount(&upstream)
        .await;
    mount_item(&upstream, 11, odd.clone()).await;
    mount_item(&upstream, 12, plain.clone()).await;

    let server = server_for(&upstream);

    let single = call_tool(&server, "hn_get_item", json!({"id": 11})).await;
    assert!(single.get("isError").is_none());
    let item: Value = serde_json::from_str(result_text(&single)).unwrap();
    assert_eq!(item, odd);

    let batch = call_tool(&server, "hn_get_new_stories", json!({"limit": 2})).await;
    let stories: Value = serde_json::from_str(result_text(&batch)).unwrap();
    assert_eq!(stories, json!([odd, plain]));
}

#[tokio::test]
async fn test_get_item_upstream_failure_is_a_tool_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/item/5.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&upstream)
        .await;

    let server = server_for(&upstream);
    let result = call_tool(&server, "hn_get_item", json!({"id": 5})).await;
    assert_eq!(result["isError"], true);
    assert!(result_text(&result).starts_with("Error: Malformed response"));
}

#[tokio::test]
async fn test_tools_list_advertises_seven_tools() {
    let upstream = MockServer::start().await;
    let server = server_for(&upstream);

    let response = server
        .handle_request(JsonRpcRequest::new(1i64, "tools/list"))
        .await
        .unwrap();
    let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
    assert_eq!(tools.len(), 7);
    assert_eq!(tools[0]["name"], "hn_get_item");
    assert_eq!(tools[0]["inputSchema"]["required"], json!(["id"]));
    assert_eq!(tools[6]["name"], "hn_get_job_stories");
}

#[tokio::test]
async fn test_line_session() {
    let upstream = MockServer::start().await;
    let server = server_for(&upstream);

    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"0.0.1"}}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        "garbage\n",
        r#"{"jsonrpc":"2.0","id":"two","method":"ping"}"#,
        "\n",
    );
    let mut transport = LineTransport::new(input.as_bytes(), Vec::new());
    server.run(&mut transport).await.unwrap();

    let output = String::from_utf8(transport.into_writer()).unwrap();
    let lines: Vec<Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["result"]["serverInfo"]["name"], "hacker-news");
    assert_eq!(lines[1]["error"]["code"], -32700);
    assert_eq!(lines[1]["id"], Value::Null);
    assert_eq!(lines[2]["id"], "two");
    assert_eq!(lines[2]["result"], json!({}));
    assert!(server.is_initialized());
}
