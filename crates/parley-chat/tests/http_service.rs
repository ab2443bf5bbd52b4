//! HTTP client tests against a real axum server on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use parley_chat::{ChatError, ChatService, ChatSession, HttpChatService, SendOptions, SendOutcome};
use parley_core::config::ServiceConfig;
use parley_core::ParleyConfig;

// =============================================================================
// Helpers
// =============================================================================

/// Mimics the intent-classification backend closely enough for the client.
async fn chat(Json(body): Json<Value>) -> Json<Value> {
    let message = body["message"].as_str().unwrap_or_default().to_string();
    if message.starts_with("search on youtube") {
        let query = message.trim_start_matches("search on youtube").trim();
        return Json(json!({
            "intent": "youtube_search",
            "response": format!("Searching YouTube for '{}'…", query),
            "url": format!("https://www.youtube.com/results?search_query={}", query),
            "lang": "english",
            "confidence": 0.8,
            "suggestions": [format!("Search on Google {}", query), format!("Wikipedia {}", query)],
        }));
    }
    Json(json!({
        "intent": "echo",
        "response": format!("you said: {}", message),
        "lang": "english",
        "confidence": 0.85,
    }))
}

async fn broken() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "boom" })),
    )
}

async fn not_json() -> &'static str {
    "<html>gateway page</html>"
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({ "response": "late" }))
}

/// Start the test backend and return its address.
async fn spawn_backend() -> SocketAddr {
    let app = Router::new()
        .route("/api/chat/", post(chat))
        .route("/broken/", post(broken))
        .route("/html/", post(not_json))
        .route("/slow/", post(slow));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn service_config(addr: SocketAddr, path: &str) -> ServiceConfig {
    ServiceConfig {
        endpoint: format!("http://{}{}", addr, path),
        ..ServiceConfig::default()
    }
}

// =============================================================================
// HttpChatService
// =============================================================================

#[tokio::test]
async fn test_posts_message_and_returns_body() {
    let addr = spawn_backend().await;
    let service = HttpChatService::new(&service_config(addr, "/api/chat/")).unwrap();

    let body = service.send_message("hello").await.unwrap();

    assert_eq!(body["response"], "you said: hello");
    assert_eq!(body["intent"], "echo");
}

#[tokio::test]
async fn test_server_error_status_is_reported() {
    let addr = spawn_backend().await;
    let service = HttpChatService::new(&service_config(addr, "/broken/")).unwrap();

    let err = service.send_message("hello").await.unwrap_err();

    assert!(matches!(err, ChatError::Status(500)));
}

#[tokio::test]
async fn test_non_json_body_is_returned_as_null() {
    let addr = spawn_backend().await;
    let service = HttpChatService::new(&service_config(addr, "/html/")).unwrap();

    let body = service.send_message("hello").await.unwrap();

    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_slow_server_hits_client_timeout() {
    let addr = spawn_backend().await;
    let config = ServiceConfig {
        timeout_ms: 100,
        ..service_config(addr, "/slow/")
    };
    let service = HttpChatService::new(&config).unwrap();

    let err = service.send_message("hello").await.unwrap_err();

    assert!(matches!(err, ChatError::Timeout(d) if d == Duration::from_millis(100)));
}

#[tokio::test]
async fn test_refused_connection_is_a_transport_error() {
    // Grab a free port, then close it again.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let service = HttpChatService::new(&service_config(addr, "/api/chat/")).unwrap();
    let err = service.send_message("hello").await.unwrap_err();

    assert!(matches!(err, ChatError::Transport(_)));
}

// =============================================================================
// ChatSession over HTTP
// =============================================================================

#[tokio::test]
async fn test_session_round_trip_with_chip_click() {
    let addr = spawn_backend().await;
    let mut config = ParleyConfig::default();
    config.service = service_config(addr, "/api/chat/");
    let service = Arc::new(HttpChatService::new(&config.service).unwrap());
    let session = ChatSession::new(service, &config);

    let outcome = session
        .send(
            Some("sach"),
            SendOptions {
                intent_override: Some(parley_core::PlatformIntent::Youtube),
                ..SendOptions::default()
            },
        )
        .await;
    assert_eq!(outcome, SendOutcome::Replied);

    let bot = session.last_bot_turn().unwrap();
    assert_eq!(bot.text, "Searching YouTube for 'sach'…");
    assert_eq!(bot.confidence, Some(0.8));
    assert_eq!(bot.suggestions, vec!["Search on Google sach", "Wikipedia sach"]);

    // "Search on Google sach" chip: quoted 'sach' wins over the label text
    assert_eq!(session.pick_suggestion(0).await, Some(SendOutcome::Replied));
    let history = session.history();
    assert_eq!(history[2].text, "search on google sach");
    assert_eq!(history[3].text, "you said: search on google sach");
}

#[tokio::test]
async fn test_session_survives_server_errors() {
    let addr = spawn_backend().await;
    let mut config = ParleyConfig::default();
    config.service = service_config(addr, "/broken/");
    let service = Arc::new(HttpChatService::new(&config.service).unwrap());
    let session = ChatSession::new(service, &config);

    let outcome = session.send(Some("hello"), SendOptions::default()).await;

    assert_eq!(outcome, SendOutcome::Failed);
    assert_eq!(
        session.last_bot_turn().unwrap().text,
        "Network error: Could not connect to server."
    );
    assert!(!session.is_awaiting_reply());
}
