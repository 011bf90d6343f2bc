use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use qanun_tui::context::HistoryRow;
use qanun_tui::{ApiClient, ChatController, SendOutcome};
use qanun_types::{Mode, Role};

/// In-memory stand-in for the legal chat backend, keyed by the `user_id` cookie.
#[derive(Default)]
struct FakeServer {
    next_user: u32,
    next_session: u32,
    /// user -> ordered (session id, title, messages)
    sessions: HashMap<String, Vec<(String, String, Vec<Value>)>>,
    current: HashMap<String, String>,
    clears: u32,
}

type Shared = Arc<Mutex<FakeServer>>;

fn user_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == "user_id")
        .map(|(_, value)| value.to_string())
}

/// Resolves the caller, issuing a cookie on first contact.
fn identify(state: &mut FakeServer, headers: &HeaderMap) -> (String, Option<HeaderValue>) {
    if let Some(user) = user_from(headers) {
        return (user, None);
    }
    state.next_user += 1;
    let user = format!("u{}", state.next_user);
    let cookie = HeaderValue::from_str(&format!("user_id={}; Path=/", user)).unwrap();
    (user, Some(cookie))
}

fn with_cookie(cookie: Option<HeaderValue>, body: impl IntoResponse) -> Response {
    let mut response = body.into_response();
    if let Some(cookie) = cookie {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

async fn chat(State(shared): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut guard = shared.lock();
    let state = &mut *guard;
    let (user, cookie) = identify(state, &headers);
    let message = body["message"].as_str().unwrap_or_default().to_string();
    let mode = body["mode"].as_str().unwrap_or_default().to_string();
    if message == "boom" {
        return with_cookie(cookie, (StatusCode::INTERNAL_SERVER_ERROR, "model offline"));
    }

    let answer = format!("[{}] {}", mode, message);
    let session_id = match state.current.get(&user) {
        Some(id) => id.clone(),
        None => {
            state.next_session += 1;
            let id = format!("s{}", state.next_session);
            state
                .sessions
                .entry(user.clone())
                .or_default()
                .push((id.clone(), message.clone(), Vec::new()));
            state.current.insert(user.clone(), id.clone());
            id
        }
    };
    if let Some(session) = state
        .sessions
        .get_mut(&user)
        .and_then(|list| list.iter_mut().find(|(id, _, _)| *id == session_id))
    {
        session.2.push(json!({"role": "user", "text": message, "time": "2024-05-01T10:00:00"}));
        session.2.push(json!({"role": "assistant", "text": answer, "time": "2024-05-01T10:00:05"}));
    }
    with_cookie(cookie, Json(json!({ "answer": answer })))
}

async fn clear(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock();
    let (user, cookie) = identify(&mut state, &headers);
    state.clears += 1;
    state.current.remove(&user);
    with_cookie(cookie, Json(json!({ "status": "cleared" })))
}

async fn new_session(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock();
    let (user, cookie) = identify(&mut state, &headers);
    state.current.remove(&user);
    with_cookie(cookie, Json(json!({ "status": "ok" })))
}

async fn history(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock();
    let (user, cookie) = identify(&mut state, &headers);
    let rows: Vec<Value> = state
        .sessions
        .get(&user)
        .map(|list| {
            list.iter()
                .map(|(id, title, _)| json!({"id": id, "title": title, "timestamp": "2024-05-01T10:00:00"}))
                .collect()
        })
        .unwrap_or_default();
    with_cookie(cookie, Json(Value::Array(rows)))
}

async fn session(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = state.lock();
    let (user, cookie) = identify(&mut state, &headers);
    let found = state
        .sessions
        .get(&user)
        .and_then(|list| list.iter().find(|(sid, _, _)| *sid == id))
        .map(|(sid, _, messages)| json!({"id": sid, "user_id": user, "messages": messages}));
    match found {
        Some(body) => with_cookie(cookie, Json(body)),
        None => with_cookie(cookie, (StatusCode::NOT_FOUND, "no such session")),
    }
}

fn spawn_server() -> (String, Shared) {
    let state: Shared = Arc::default();
    let router = Router::new()
        .route("/chat", post(chat))
        .route("/api/clear", post(clear))
        .route("/api/new_session", post(new_session))
        .route("/api/history", get(history))
        .route("/api/session/{id}", get(session))
        .with_state(state.clone());

    let (tx, rx) = std::sync::mpsc::channel::<SocketAddr>();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, router).await.unwrap();
        });
    });

    let addr = rx.recv().unwrap();
    (format!("http://{}", addr), state)
}

#[test]
fn chat_round_trip_sends_mode_and_keeps_cookie() {
    let (url, _state) = spawn_server();
    let client = ApiClient::new(&url).unwrap();

    assert_eq!(client.cookie_header(), None);
    let answer = client.send_chat("ما هي مدة الإشعار؟", Mode::Labor).unwrap();
    assert_eq!(answer, "[labor] ما هي مدة الإشعار؟");
    assert_eq!(client.cookie_header().as_deref(), Some("user_id=u1"));

    client.send_chat("وماذا عن التعويض؟", Mode::Labor).unwrap();
    let sessions = client.list_history().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].title, "ما هي مدة الإشعار؟");

    let detail = client.get_session(&sessions[0].id).unwrap();
    let roles: Vec<Role> = detail.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Bot, Role::User, Role::Bot]);
}

#[test]
fn error_statuses_surface_as_status_errors() {
    let (url, _state) = spawn_server();
    let client = ApiClient::new(&url).unwrap();

    let err = client.send_chat("boom", Mode::General).unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));

    let err = client.get_session("missing").unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let client = ApiClient::new("http://127.0.0.1:1").unwrap();
    let err = client.list_history().unwrap_err();
    assert!(err.status().is_none());
}

#[test]
fn seeded_user_sees_own_history() {
    let (url, state) = spawn_server();
    let first = ApiClient::new(&url).unwrap();
    first.send_chat("سؤال عقاري", Mode::RealEstate).unwrap();

    let other = ApiClient::new(&url).unwrap();
    assert!(other.list_history().unwrap().is_empty());

    let returning =
        ApiClient::with_options(&url, std::time::Duration::from_secs(5), Some("u1")).unwrap();
    assert_eq!(returning.list_history().unwrap().len(), 1);
    assert_eq!(state.lock().next_user, 2);
}

#[test]
fn controller_drives_a_full_conversation() {
    let (url, state) = spawn_server();
    let client = ApiClient::new(&url).unwrap();
    let mut chat = ChatController::new();

    assert_eq!(chat.transcript().message_count(), 1);
    assert!(matches!(chat.history().rows()[0], HistoryRow::Placeholder(_)));

    assert_eq!(
        chat.send_message("   ", Mode::General, &client),
        SendOutcome::Skipped
    );
    assert_eq!(
        chat.send_message("عقد الكراء", Mode::RealEstate, &client),
        SendOutcome::Answered
    );
    assert_eq!(chat.transcript().message_count(), 3);
    assert!(!chat.transcript().has_typing());
    assert_eq!(chat.history().sessions().len(), 1);
    let first_id = chat.history().sessions()[0].id.clone();
    assert_eq!(chat.history().active_id(), Some(first_id.as_str()));

    assert_eq!(
        chat.send_message("boom", Mode::General, &client),
        SendOutcome::Failed
    );
    let last = chat.transcript().messages().last().unwrap().clone();
    assert_eq!(last.role, Role::Bot);
    assert_eq!(last.text, qanun_tui::branding::CONNECTION_ERROR);

    chat.new_session(&client);
    assert_eq!(chat.transcript().message_count(), 1);
    chat.send_message("نفقة الأطفال", Mode::Family, &client);
    assert_eq!(chat.history().sessions().len(), 2);

    assert!(chat.select_session(&first_id, &client));
    let texts: Vec<&str> = chat.transcript().messages().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["عقد الكراء", "[real_estate] عقد الكراء"]);
    assert_eq!(chat.history().active_id(), Some(first_id.as_str()));

    assert!(!chat.select_session("missing", &client));
    assert_eq!(chat.transcript().message_count(), 2);

    chat.clear_chat(&client);
    assert_eq!(chat.transcript().message_count(), 1);
    assert_eq!(state.lock().clears, 1);
}
