//! End-to-end tests for the console and bot HTTP clients.
//!
//! Each test starts a real Axum server on an ephemeral port that mimics the
//! console or bot backend, then drives `ConsoleClient` / `BotClient` against
//! it over HTTP.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use chatdesk_gtk::api::models::{Message, SendRequest, Sender};
use chatdesk_gtk::api::{ApiError, BotClient, ConsoleClient};
use chatdesk_gtk::bot_chat::{BotTranscript, CONNECTIVITY_ERROR, Direction};
use chatdesk_gtk::console::{ChatContent, ClockZone, ListContent, chat_content, list_content};
use chatdesk_gtk::echo::EchoPolicy;

const TIMEOUT: Duration = Duration::from_secs(5);

// ── helpers ──────────────────────────────────────────────────────────────────

type Sent = Arc<Mutex<Vec<SendRequest>>>;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind to port 0");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{addr}")
}

async fn list_conversations() -> Json<Value> {
    Json(json!([
        {"phone_number": "123", "is_human_intervening": false, "last_message_content": "hi"},
        {"phone_number": "456", "name": "Lucía", "is_human_intervening": true, "last_message_content": null}
    ]))
}

async fn list_messages(Path(phone): Path<String>) -> Json<Value> {
    Json(json!([
        {"sender": "client", "content": format!("from {phone}"), "timestamp": "2024-01-01T14:05:00Z"},
        {"sender": "bot", "content": "respuesta", "timestamp": "2024-01-01T14:06:00Z"}
    ]))
}

async fn accept_send(State(sent): State<Sent>, Json(body): Json<SendRequest>) -> StatusCode {
    let failing = body.phone_number == "fail";
    sent.lock().unwrap().push(body);
    if failing {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

async fn start_console() -> (String, Sent) {
    let sent: Sent = Arc::default();
    let app = Router::new()
        .route("/api/conversations", get(list_conversations))
        .route("/api/messages/:phone", get(list_messages))
        .route("/api/send", post(accept_send))
        .with_state(sent.clone());
    (serve(app).await, sent)
}

async fn start_bot() -> String {
    let app = Router::new().route(
        "/api/message",
        post(|Json(body): Json<Value>| async move {
            let text = body["message"].as_str().unwrap_or_default().to_lowercase();
            let reply = if text.contains("hola") {
                "¡Hola! Gracias por contactarme."
            } else {
                "He recibido tu mensaje."
            };
            Json(json!({ "reply": reply }))
        }),
    );
    serve(app).await
}

/// An address nothing is listening on.
async fn dead_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

// ── console ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn conversations_render_one_row_each() {
    let (base, _) = start_console().await;
    let client = ConsoleClient::new(&base, TIMEOUT).unwrap();

    let result = client.conversations().await;
    let ListContent::Rows(rows) = list_content(&result) else {
        panic!("expected rows, got {result:?}");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].title, "123");
    assert_eq!(rows[0].preview, "hi");
    assert_eq!(rows[0].mode.label(), "BOT");
    assert_eq!(rows[1].title, "Lucía");
    assert_eq!(rows[1].preview, "No hay mensajes.");
    assert_eq!(rows[1].mode.label(), "HUMANO");
}

#[tokio::test]
async fn messages_use_encoded_phone_and_keep_order() {
    let (base, _) = start_console().await;
    let client = ConsoleClient::new(&base, TIMEOUT).unwrap();

    let msgs: Vec<Message> = client.messages("+34 600").await.unwrap();
    assert_eq!(msgs.len(), 2);
    assert_eq!(msgs[0].content, "from +34 600");
    assert_eq!(msgs[0].sender, Sender::Client);
    assert_eq!(msgs[1].sender, Sender::Bot);

    let ChatContent::Bubbles(bubbles) = chat_content(&Ok(msgs), ClockZone::utc()) else {
        panic!("expected bubbles");
    };
    assert_eq!(bubbles[0].time.as_deref(), Some("14:05"));
    assert_eq!(bubbles[1].label, Some("Bot"));
}

#[tokio::test]
async fn send_posts_phone_and_message() {
    let (base, sent) = start_console().await;
    let client = ConsoleClient::new(&base, TIMEOUT).unwrap();

    let request = SendRequest {
        phone_number: "123".into(),
        message: "te atiendo yo".into(),
    };
    client.send(&request).await.unwrap();
    assert_eq!(sent.lock().unwrap().as_slice(), &[request]);
}

#[tokio::test]
async fn send_failure_reports_status() {
    let (base, _) = start_console().await;
    let client = ConsoleClient::new(&base, TIMEOUT).unwrap();

    let err = client
        .send(&SendRequest {
            phone_number: "fail".into(),
            message: "hola".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.to_string(), "Error del servidor: 500");
}

#[tokio::test]
async fn server_error_becomes_list_placeholder() {
    let app = Router::new().route(
        "/api/conversations",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let base = serve(app).await;
    let client = ConsoleClient::new(&base, TIMEOUT).unwrap();

    let result = client.conversations().await;
    assert_eq!(
        list_content(&result),
        ListContent::Placeholder("Error al cargar chats. Error del servidor: 503".into())
    );
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let app = Router::new().route("/api/conversations", get(|| async { "not json" }));
    let base = serve(app).await;
    let client = ConsoleClient::new(&base, TIMEOUT).unwrap();

    let err = client.conversations().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn ping_reports_status_without_failing() {
    let app = Router::new().route("/api/conversations", get(|| async { StatusCode::UNAUTHORIZED }));
    let base = serve(app).await;
    let client = ConsoleClient::new(&base, TIMEOUT).unwrap();
    assert_eq!(client.ping().await.unwrap(), 401);

    let dead = ConsoleClient::new(&dead_address().await, TIMEOUT).unwrap();
    assert!(matches!(dead.ping().await, Err(ApiError::Transport(_))));
}

// ── bot ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn bot_reply_is_appended_after_echo() {
    let base = start_bot().await;
    let client = BotClient::new(&base, TIMEOUT).unwrap();
    let mut transcript = BotTranscript::new(EchoPolicy::Optimistic);

    let (ask, _) = transcript.submit("Hola bot").unwrap();
    let outcome = client.ask(&ask.text).await;
    transcript.resolve(ask, outcome);

    let entries = transcript.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].direction, Direction::Sent);
    assert_eq!(entries[0].text, "Hola bot");
    assert_eq!(entries[1].direction, Direction::Received);
    assert_eq!(entries[1].text, "¡Hola! Gracias por contactarme.");
}

#[tokio::test]
async fn bot_network_error_appends_one_apology() {
    let client = BotClient::new(&dead_address().await, TIMEOUT).unwrap();
    let mut transcript = BotTranscript::new(EchoPolicy::Optimistic);

    let (ask, _) = transcript.submit("precio").unwrap();
    let outcome = client.ask(&ask.text).await;
    assert!(matches!(outcome, Err(ApiError::Transport(_))));
    transcript.resolve(ask, outcome);

    let received: Vec<&str> = transcript
        .entries()
        .iter()
        .filter(|e| e.direction == Direction::Received)
        .map(|e| e.text.as_str())
        .collect();
    assert_eq!(received, vec![CONNECTIVITY_ERROR]);
}
