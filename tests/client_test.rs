//! Integration tests for the async client
//!
//! Every test runs the real client against a local mockito server and checks
//! both the request that went out and the result that came back.

use artificial_agency::{
    API_VERSION, AddMessagesRequest, Client, ClientOptions, CloneSessionRequest, ContentMessage,
    CreateAgentRequest, CreateSessionRequest, Error, FunctionDescription, GameMessage,
    GenerateFunctionCallRequest, GenerateJsonRequest, GenerateTextRequest, KVMessage,
    LimitedListConfig, PresentationConfig, RoleConfig, ServiceConfig, SimpleParameter, UIConfig,
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::time::Duration;

const SESSION_BODY: &str = r#"{
    "id": "sess_1234",
    "created_at": "1680318000",
    "project_id": "proj_1234",
    "metadata": {},
    "expires_at": null,
    "max_requests": 1000
}"#;

fn client_for(server: &ServerGuard) -> Client {
    let _ = env_logger::builder().is_test(true).try_init();
    let options = ClientOptions::builder()
        .api_key("test-api-key")
        .base_url(server.url())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    Client::with_options(options).unwrap()
}

#[tokio::test]
async fn test_fixed_headers_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/services")
        .match_header("authorization", "Bearer test-api-key")
        .match_header("aa-api-version", API_VERSION)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": []}"#)
        .create_async()
        .await;

    let services = client_for(&server).list_services().await.unwrap();
    assert!(services.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_services() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/services")
        .with_status(200)
        .with_body(
            r#"{"data": [
                {"service_name": "agency/torque-prime", "description": "Default model"},
                {"service_name": "openai/gpt_4o_mini"}
            ]}"#,
        )
        .create_async()
        .await;

    let services = client_for(&server).list_services().await.unwrap();
    assert_eq!(services.len(), 2);
    assert_eq!(services[0].service_name, "agency/torque-prime");
    assert_eq!(services[0].description.as_deref(), Some("Default model"));
    assert_eq!(services[1].description, None);
}

#[tokio::test]
async fn test_create_session() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/sessions")
        .match_header("content-type", "application/json")
        // Fields left unset are omitted from the body.
        .match_body(Matcher::Json(json!({
            "project_id": "proj_1234",
            "metadata": {"client": "testing"},
        })))
        .with_status(200)
        .with_body(SESSION_BODY)
        .create_async()
        .await;

    let session = client_for(&server)
        .create_session(&CreateSessionRequest::new("proj_1234").metadata([("client", "testing")]))
        .await
        .unwrap();

    assert_eq!(session.id, "sess_1234");
    assert_eq!(session.created_at, 1680318000);
    assert_eq!(session.project_id.as_deref(), Some("proj_1234"));
    assert!(session.metadata.is_empty());
    assert_eq!(session.expires_at, None);
    assert_eq!(session.max_requests, Some(1000));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_session_explicit_null() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/sessions")
        .match_body(Matcher::Json(json!({
            "project_id": "proj_1234",
            "metadata": {"client": "testing"},
            "expires_in": 60,
            "max_requests": null,
        })))
        .with_status(200)
        .with_body(SESSION_BODY)
        .create_async()
        .await;

    let request = CreateSessionRequest::new("proj_1234")
        .metadata([("client", "testing")])
        .expires_in(Some(60))
        .max_requests(None);
    client_for(&server).create_session(&request).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_clone_session() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/sessions/sess_1234/clone")
        .match_body(Matcher::Json(json!({
            "moment_id": "moment_1234",
            "origin_moments": {"agent_1234": 3},
        })))
        .with_status(200)
        .with_body(SESSION_BODY)
        .create_async()
        .await;

    let request = CloneSessionRequest::new()
        .moment_id(Some("moment_1234".to_string()))
        .origin_moments(Some([("agent_1234", 3)]));
    let session = client_for(&server)
        .clone_session("sess_1234", &request)
        .await
        .unwrap();
    assert_eq!(session.id, "sess_1234");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_agent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/advanced/sessions/sess_1234/agents")
        .match_body(Matcher::Json(json!({
            "role_config": {
                "core": "bios content",
                "characterization": "characterization content",
            },
            "presentation_config": {"presentation_order": [["history", "items"]]},
            "component_configs": [{"id": "history", "type": "limited_list"}],
            "service_configs": [
                {"id": "default_llm", "service_name": "openai/gpt_4o_mini"}
            ],
            "agent_llm": "default_llm",
            "ui_config": {"metadata": {"client": "testing"}},
        })))
        .with_status(200)
        .with_body(
            json!({
                "id": "agent_1234",
                "session_id": "sess_1234",
                "moment_id": 1,
                "moment_uuid": "moment_1234",
                "ui_config": {
                    "friendly_name": null,
                    "emoji": null,
                    "metadata": {"client": "testing"},
                },
            })
            .to_string(),
        )
        .create_async()
        .await;

    let request = CreateAgentRequest::new(
        RoleConfig::new("bios content").characterization("characterization content"),
        PresentationConfig::default().item("history", "items"),
        "default_llm",
    )
    .component(LimitedListConfig::new("history"))
    .service(ServiceConfig::new("default_llm", "openai/gpt_4o_mini"))
    .ui_config(UIConfig::new().metadata("client", "testing"));

    let agent = client_for(&server)
        .create_agent("sess_1234", &request)
        .await
        .unwrap();

    assert_eq!(agent.session_id, "sess_1234");
    assert_eq!(agent.agent_id, "agent_1234");
    assert_eq!(agent.moment_id, 1);
    assert_eq!(agent.moment_uuid, "moment_1234");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_add_messages() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/sessions/sess_1234/agents/agent_1234/messages")
        .match_body(Matcher::Json(json!({
            "messages": [
                {"message_type": "ContentMessage", "content": "The door creaks open."},
                {"message_type": "KVMessage", "component_id": "state", "key": "hp", "value": 7},
            ]
        })))
        .with_status(200)
        .with_body(r#"{"moment_id": "2"}"#)
        .create_async()
        .await;

    let request = AddMessagesRequest::new([
        GameMessage::from(ContentMessage::new("The door creaks open.")),
        GameMessage::from(KVMessage::new("state", "hp", 7)),
    ]);
    let added = client_for(&server)
        .add_messages("sess_1234", "agent_1234", &request)
        .await
        .unwrap();
    assert_eq!(added.moment_id, "2");
    mock.assert_async().await;
}

#[tokio::test]
#[allow(deprecated)]
async fn test_update_history_uses_messages_endpoint() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/sessions/sess_1234/agents/agent_1234/messages")
        .match_body(Matcher::Json(json!({
            "messages": [{"message_type": "ContentMessage", "content": "Hi"}]
        })))
        .with_status(200)
        .with_body(r#"{"moment_id": "3"}"#)
        .create_async()
        .await;

    let updated = client_for(&server)
        .update_history(
            "sess_1234",
            "agent_1234",
            &AddMessagesRequest::new([ContentMessage::new("Hi")]),
        )
        .await
        .unwrap();
    assert_eq!(updated.moment_id, "3");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_generate_text() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/sessions/sess_1234/agents/agent_1234/generate_text")
        .match_body(Matcher::Json(json!({
            "messages": [{"message_type": "ContentMessage", "content": "Hello!"}],
            "cue": null,
        })))
        .with_status(200)
        .with_body(r#"{"moment_id": "4", "text": "Well met, traveller."}"#)
        .create_async()
        .await;

    let request = GenerateTextRequest::new()
        .messages([ContentMessage::new("Hello!")])
        .cue(None);
    let reply = client_for(&server)
        .generate_text("sess_1234", "agent_1234", &request)
        .await
        .unwrap();
    assert_eq!(reply.moment_id, "4");
    assert_eq!(reply.text, "Well met, traveller.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_generate_function_call() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock(
            "POST",
            "/v1/sessions/sess_1234/agents/agent_1234/generate_function_call",
        )
        .match_body(Matcher::Json(json!({
            "functions": [{
                "name": "speak",
                "docs": "Say something out loud.",
                "parameters": {
                    "utterance": {"type": "simple", "value_type": "string", "docs": "What to say."}
                },
                "required": ["utterance"],
            }],
            "service_id": "fast_llm",
        })))
        .with_status(200)
        .with_body(
            r#"{
                "moment_id": "5",
                "function_call": {"id": "call_1", "name": "speak", "args": {"utterance": "Hi!"}}
            }"#,
        )
        .create_async()
        .await;

    let speak = FunctionDescription::new("speak", "Say something out loud.")
        .required_parameter("utterance", SimpleParameter::new("string", "What to say."));
    let request =
        GenerateFunctionCallRequest::new(vec![speak]).service_id(Some("fast_llm".to_string()));

    let generated = client_for(&server)
        .generate_function_call("sess_1234", "agent_1234", &request)
        .await
        .unwrap();
    assert_eq!(generated.moment_id, "5");
    assert_eq!(generated.function_call.name, "speak");
    assert_eq!(generated.function_call.args["utterance"], "Hi!");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_generate_json() {
    let schema = json!({
        "type": "object",
        "properties": {
            "species": {"type": "string"},
            "hp": {"type": "integer"},
        },
        "required": ["species", "hp"],
        "additionalProperties": false,
    });

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/sessions/sess_1234/agents/agent_1234/generate_json")
        .match_body(Matcher::Json(json!({ "schema": schema.clone() })))
        .with_status(200)
        .with_body(r#"{"moment_id": "1", "json": {"species": "Felis catus", "hp": 1}}"#)
        .create_async()
        .await;

    let response = client_for(&server)
        .generate_json("sess_1234", "agent_1234", &GenerateJsonRequest::new(schema))
        .await
        .unwrap();
    assert_eq!(response.moment_id, "1");
    assert_eq!(response.json, json!({"species": "Felis catus", "hp": 1}));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_envelope() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/sessions")
        .with_status(400)
        .with_body(
            r#"{"error": {"type": "invalid_request", "message": "An example failure.", "trace": "1234567890abcdef"}}"#,
        )
        .create_async()
        .await;

    let err = client_for(&server)
        .create_session(&CreateSessionRequest::new("proj_1234"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api(_)), "got {err:?}");
    assert_eq!(err.status_code(), Some(400));
    assert_eq!(err.error_type(), Some("invalid_request"));
    assert_eq!(err.message(), "An example failure.");
}

#[tokio::test]
async fn test_unparseable_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/sessions")
        .with_status(500)
        .with_body("Server Error")
        .create_async()
        .await;

    let err = client_for(&server)
        .create_session(&CreateSessionRequest::new("proj_1234"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api(_)), "got {err:?}");
    assert_eq!(err.status_code(), Some(500));
    assert_eq!(err.error_type(), Some("server_error"));
    assert_eq!(err.message(), "The server returned an unexpected response.");
}

#[tokio::test]
async fn test_unparseable_success_reports_500() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/sessions")
        .with_status(200)
        .with_body(r#"{"this-is": "not-the-expected-response"}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .create_session(&CreateSessionRequest::new("proj_1234"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ResponseValidation(_)), "got {err:?}");
    assert_eq!(err.status_code(), Some(500));
    assert_eq!(err.error_type(), Some("server_error"));
    assert_eq!(err.message(), "Server returned data in an unexpected format.");
}

#[tokio::test]
async fn test_missing_nullable_field_is_validation_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/sessions")
        .with_status(200)
        .with_body(r#"{"id": "sess_1234", "created_at": 1, "project_id": null, "metadata": {}, "max_requests": null}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .create_session(&CreateSessionRequest::new("proj_1234"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ResponseValidation(_)), "got {err:?}");
}

#[tokio::test]
async fn test_timeout() {
    // Accepts connections at the OS level but never answers.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let options = ClientOptions::builder()
        .api_key("test-api-key")
        .base_url(format!("http://{addr}"))
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let client = Client::with_options(options).unwrap();

    let err = client
        .create_session(&CreateSessionRequest::new("proj_1234"))
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "got {err:?}");
    assert_eq!(err.status_code(), Some(500));
    assert_eq!(err.error_type(), Some("server_error"));
    assert_eq!(err.message(), "Request timed out.");
    drop(listener);
}

#[tokio::test]
async fn test_injected_http_client_keeps_per_request_timeout() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let options = ClientOptions::builder()
        .api_key("test-api-key")
        .base_url(format!("http://{addr}"))
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let client = Client::with_http_client(options, reqwest::Client::new());

    let err = client.list_services().await.unwrap_err();
    assert!(matches!(err, Error::Timeout(_)), "got {err:?}");
    drop(listener);
}

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/sessions/sess_1234/agents/agent_1234/generate_text")
        .with_status(200)
        .with_body(r#"{"moment_id": "9", "text": "ok"}"#)
        .expect(8)
        .create_async()
        .await;

    let client = client_for(&server);
    let request = GenerateTextRequest::new();
    let calls = (0..8).map(|_| {
        let client = client.clone();
        let request = request.clone();
        async move {
            client
                .generate_text("sess_1234", "agent_1234", &request)
                .await
        }
    });

    let results = futures::future::join_all(calls).await;
    assert!(results.iter().all(|r| r.as_ref().is_ok_and(|t| t.text == "ok")));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_dropped_call_closes_connection() {
    use tokio::io::AsyncReadExt;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let options = ClientOptions::builder()
        .api_key("test-api-key")
        .base_url(format!("http://{addr}"))
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap();
    let client = Client::with_options(options).unwrap();

    // The caller gives up long before the client timeout would fire.
    let request = CreateSessionRequest::new("proj_1234");
    let outcome =
        tokio::time::timeout(Duration::from_millis(300), client.create_session(&request)).await;
    assert!(outcome.is_err(), "call should still be pending");

    let (mut socket, _) = tokio::time::timeout(Duration::from_secs(5), listener.accept())
        .await
        .expect("client never connected")
        .unwrap();

    // Drain the request that was written, then expect EOF: dropping the
    // future must tear the connection down rather than leave it waiting.
    let mut received = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let read = tokio::time::timeout(Duration::from_secs(5), socket.read(&mut buf))
            .await
            .expect("connection left open after the call was dropped");
        match read {
            Ok(0) | Err(_) => break,
            Ok(n) => received.extend_from_slice(&buf[..n]),
        }
    }
    assert!(String::from_utf8_lossy(&received).starts_with("POST /v1/sessions"));
}

#[tokio::test]
async fn test_wire_body_keeps_field_order() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/sessions")
        .match_body(r#"{"project_id":"proj_1234","metadata":{"client":"testing"}}"#)
        .with_status(200)
        .with_body(SESSION_BODY)
        .create_async()
        .await;

    client_for(&server)
        .create_session(&CreateSessionRequest::new("proj_1234").metadata([("client", "testing")]))
        .await
        .unwrap();
    mock.assert_async().await;
}
