//! End-to-end tests for the Workers AI generator against a mock server

use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use workersai_core::http::{HttpClient, RequestOptions, TransportError};
use workersai_core::protocol::{
    FinishReason, Message, ModelRequest, Part, Role, ToolDefinition, Usage,
};
use workersai_core::providers::workersai::models::LLAMA_3_3_70B_INSTRUCT_FP8_FAST;
use workersai_core::{AdapterError, GeneratorConfig, WorkersAiGenerator};
use wiremock::matchers::{header, method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn generator_for(server: &MockServer) -> WorkersAiGenerator {
    init_tracing();
    let config = GeneratorConfig::new(LLAMA_3_3_70B_INSTRUCT_FP8_FAST, "acct-123", "token-abc")
        .with_base_url(format!("{}/client/v4", server.uri()));
    let client = HttpClient::new().expect("client builds");
    WorkersAiGenerator::new(config, Arc::new(client))
}

fn input(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("object")
}

async fn mount_reply(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path_regex(r"/client/v4/accounts/acct-123/ai/run/"))
        .and(header("authorization", "Bearer token-abc"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

async fn last_request_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.expect("recording enabled");
    let last = requests.last().expect("at least one request");
    serde_json::from_slice(&last.body).expect("json body")
}

#[tokio::test]
async fn test_hello_scenario() {
    let server = MockServer::start().await;
    mount_reply(&server, 200, json!({"success": true, "result": {"response": "Hello"}})).await;

    let generator = generator_for(&server);
    let request = ModelRequest::new(vec![Message::user("Hi")]);
    let response = generator.generate(&request, None).await.unwrap();

    assert_eq!(response.message.role, Role::Model);
    assert_eq!(response.message.content, vec![Part::text("Hello")]);
    assert_eq!(response.finish_reason, FinishReason::Stop);
    assert_eq!(response.usage, Usage::default());
    assert_eq!(response.request, request);

    let body = last_request_body(&server).await;
    assert_eq!(body, json!({"messages": [{"role": "user", "content": "Hi"}]}));
    assert!(body.get("tools").is_none());
}

#[tokio::test]
async fn test_tool_round_trip() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        200,
        json!({
            "success": true,
            "result": {
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": "",
                        "tool_calls": [
                            {"id": "a", "type": "function", "function": {"name": "get_weather", "arguments": "{\"city\":{\"type\":\"string\",\"value\":\"Lisbon\"}}"}},
                            {"id": "b", "type": "function", "function": {"name": "get_time", "arguments": "{\"tz\":\"UTC\"}"}}
                        ]
                    }
                }],
                "usage": {"prompt_tokens": 40, "completion_tokens": 12, "total_tokens": 52}
            }
        }),
    )
    .await;

    let generator = generator_for(&server);
    let tools = vec![
        ToolDefinition::new("get_weather", "weather for a city").with_input_schema(json!({
            "type": "object",
            "properties": {"city": {"type": "string"}},
            "required": ["city"]
        })),
        ToolDefinition::new("get_time", "time in a zone"),
    ];

    // First turn: the model asks for both tools.
    let first = ModelRequest::new(vec![Message::user("Weather and time in Lisbon?")])
        .with_tools(tools.clone());
    let response = generator.generate(&first, None).await.unwrap();

    let requests = response.tool_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].reference, "a");
    assert_eq!(requests[0].input, input(json!({"city": "Lisbon"})));
    assert_eq!(requests[1].reference, "b");
    assert_eq!(response.usage.input_tokens, 40);
    assert_eq!(response.usage.output_tokens, 12);

    let body = last_request_body(&server).await;
    assert_eq!(body["tools"][0]["function"]["name"], "get_weather");
    assert_eq!(body["tools"][0]["function"]["parameters"]["type"], "object");
    assert!(body["tools"][1]["function"].get("parameters").is_none());

    // Second turn: history carries the calls and their results.
    let mut history = first.messages.clone();
    history.push(response.message.clone());
    history.push(Message::tool(vec![
        Part::tool_response("a", "get_weather", json!({"temp": 21})),
        Part::tool_response("b", "get_time", json!("14:05")),
    ]));
    let second = ModelRequest::new(history).with_tools(tools);
    generator.generate(&second, None).await.unwrap();

    let body = last_request_body(&server).await;
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["content"], "");
    assert_eq!(messages[1]["tool_calls"][0]["id"], "a");
    assert_eq!(messages[1]["tool_calls"][1]["id"], "b");
    assert_eq!(messages[1]["tool_calls"][0]["function"]["arguments"], r#"{"city":"Lisbon"}"#);
    assert_eq!(
        messages[2],
        json!({"role": "tool", "content": "{\"temp\":21}", "tool_call_id": "a"})
    );
    assert_eq!(messages[3], json!({"role": "tool", "content": "\"14:05\"", "tool_call_id": "b"}));
}

#[tokio::test]
async fn test_provider_error_is_surfaced() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        200,
        json!({
            "success": false,
            "errors": [{"code": 5007, "message": "No such model"}],
            "result": null
        }),
    )
    .await;

    let err = generator_for(&server)
        .generate(&ModelRequest::new(vec![Message::user("Hi")]), None)
        .await
        .unwrap_err();

    match err {
        AdapterError::Provider { code, message } => {
            assert_eq!(code, "5007");
            assert_eq!(message, "No such model");
        }
        other => panic!("Expected Provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_success_status_carries_body() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        403,
        json!({"success": false, "errors": [{"code": 10000, "message": "Authentication error"}]}),
    )
    .await;

    let err = generator_for(&server)
        .generate(&ModelRequest::new(vec![Message::user("Hi")]), None)
        .await
        .unwrap_err();

    match err {
        AdapterError::Transport(TransportError::Status { status, body }) => {
            assert_eq!(status, 403);
            assert!(body.contains("Authentication error"));
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"success\": tru"))
        .mount(&server)
        .await;

    let err = generator_for(&server)
        .generate(&ModelRequest::new(vec![Message::user("Hi")]), None)
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::Decode { .. }));
}

#[tokio::test]
async fn test_deadline_surfaces_as_transport_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "result": {"response": "late"}}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let options = RequestOptions::new().with_timeout(Duration::from_millis(50));
    let err = generator_for(&server)
        .generate_with_options(&ModelRequest::new(vec![Message::user("Hi")]), None, options)
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::Transport(TransportError::Timeout(_))));
}

#[tokio::test]
async fn test_concurrent_turns_are_independent() {
    let server = MockServer::start().await;
    mount_reply(&server, 200, json!({"success": true, "result": {"response": "ok"}})).await;

    let generator = Arc::new(generator_for(&server));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let generator = Arc::clone(&generator);
            tokio::spawn(async move {
                let request = ModelRequest::new(vec![Message::user(format!("turn {}", i))]);
                generator.generate(&request, None).await
            })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.text(), "ok");
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 8);
}
