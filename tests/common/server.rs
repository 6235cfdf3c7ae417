//! Minimal helpdesk backend served by axum on an ephemeral port.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One request as the server saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub authorization: Option<String>,
}

#[derive(Default)]
pub struct ServerState {
    pub requests: Mutex<Vec<Recorded>>,
    pub settings: Mutex<Vec<Value>>,
    pub fail_update: AtomicBool,
}

impl ServerState {
    pub fn with_greeting_enabled(self) -> Self {
        self.settings.lock().push(json!({
            "key": "sendGreetingAccepted",
            "value": "enabled",
        }));
        self
    }

    pub fn failing_update(self) -> Self {
        self.fail_update.store(true, Ordering::SeqCst);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    fn record(
        &self,
        method: &'static str,
        path: String,
        query: Vec<(String, String)>,
        body: Option<Value>,
        headers: &HeaderMap,
    ) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().push(Recorded {
            method,
            path,
            query,
            body,
            authorization,
        });
    }
}

type Shared = Arc<ServerState>;

/// JSON for a ticket as the backend serialises it
pub fn ticket_json(id: u64, status: &str) -> Value {
    json!({
        "id": id,
        "uuid": format!("uuid-{id}"),
        "status": status,
        "userId": null,
        "queueId": 2,
        "whatsappId": 1,
        "user": null,
        "queue": {"id": 2, "name": "Sales", "color": "#ff0000"},
        "whatsapp": {"id": 1, "name": "Main line"},
        "contact": {"id": 9, "name": "Maria", "number": "5511999990000", "profilePicUrl": null},
        "tags": [{"id": 1, "name": "vip", "color": null}],
        "unreadMessages": 2,
        "lastMessage": "hello",
        "updatedAt": "2024-05-01T09:05:00.000Z",
        "isGroup": false,
        "chatbot": false,
    })
}

async fn list_tickets(
    State(state): State<Shared>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Json<Value> {
    state.record("GET", "/tickets".to_string(), query, None, &headers);
    Json(json!({
        "tickets": [ticket_json(1, "pending"), ticket_json(2, "open")],
        "count": 2,
        "hasMore": false,
    }))
}

async fn get_ticket(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    state.record("GET", format!("/tickets/{id}"), Vec::new(), None, &headers);
    match id {
        404 => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "ERR_NO_TICKET_FOUND"})),
        )
            .into_response(),
        3 => Json(ticket_json(id, "closed")).into_response(),
        2 => Json(ticket_json(id, "open")).into_response(),
        _ => Json(ticket_json(id, "pending")).into_response(),
    }
}

async fn update_ticket(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record(
        "PUT",
        format!("/tickets/{id}"),
        Vec::new(),
        Some(body.clone()),
        &headers,
    );
    if state.fail_update.load(Ordering::SeqCst) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "ERR_OTHER_OPEN_TICKET"})),
        )
            .into_response();
    }

    let status = body
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("pending");
    let mut ticket = ticket_json(id, status);
    ticket["userId"] = body.get("userId").cloned().unwrap_or(Value::Null);
    Json(ticket).into_response()
}

async fn list_settings(State(state): State<Shared>, headers: HeaderMap) -> Json<Value> {
    state.record("GET", "/settings".to_string(), Vec::new(), None, &headers);
    Json(Value::Array(state.settings.lock().clone()))
}

async fn list_messages(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Json<Value> {
    state.record("GET", format!("/messages/{id}"), Vec::new(), None, &headers);
    Json(json!({
        "messages": [
            {"id": "m1", "body": "hi, I need help", "fromMe": false, "createdAt": "2024-05-01T09:00:00Z"},
            {"id": "m2", "body": "on it", "fromMe": true, "createdAt": "2024-05-01T09:01:00Z"},
        ],
        "count": 2,
        "hasMore": false,
    }))
}

async fn send_message(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.record(
        "POST",
        format!("/messages/{id}"),
        Vec::new(),
        Some(body),
        &headers,
    );
    Json(json!({}))
}

pub struct TestServer {
    pub base_url: String,
    pub state: Shared,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start(state: ServerState) -> Self {
        let state = Arc::new(state);
        let app = Router::new()
            .route("/tickets", get(list_tickets))
            .route("/tickets/{id}", get(get_ticket).put(update_ticket))
            .route("/settings", get(list_settings))
            .route("/messages/{id}", get(list_messages).post(send_message))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
