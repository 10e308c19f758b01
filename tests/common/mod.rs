//! Shared test fixtures: an in-process mock of the Spotify endpoints and the
//! environment wiring that points the relay at it.

#![allow(dead_code)] // not every test binary uses every fixture

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};

use axum::{
    Form, Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    routing::post,
};
use serde_json::json;

/// Requests seen by the mock token endpoint.
pub static TOKEN_HITS: AtomicUsize = AtomicUsize::new(0);
/// Requests seen by the mock playlist tracks endpoint.
pub static TRACKS_HITS: AtomicUsize = AtomicUsize::new(0);

static MOCK_ADDR: OnceLock<SocketAddr> = OnceLock::new();
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serializes a test against the shared mock server and process environment.
/// Hold the returned guard for the whole test body.
pub fn setup() -> MutexGuard<'static, ()> {
    let guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let addr = *MOCK_ADDR.get_or_init(spawn_mock);

    // Safety: all tests in this binary synchronize on ENV_LOCK before
    // touching or reading the environment.
    unsafe {
        std::env::set_var("SPOTIFY_API_URL", format!("http://{}", addr));
        std::env::set_var("SPOTIFY_TOKEN_URL", format!("http://{}/api/token", addr));
        std::env::set_var("SPOTIFY_AUTH_URL", format!("http://{}/authorize", addr));
        std::env::set_var("SPOTIFY_CLIENT_ID", "test-client-id");
        std::env::set_var("SPOTIFY_CLIENT_SECRET", "test-client-secret");
        std::env::set_var(
            "SPOTIFY_REDIRECT_URI",
            "http://localhost:8000/auth/callback",
        );
    }

    guard
}

/// Number of token endpoint requests seen so far.
pub fn token_hits() -> usize {
    TOKEN_HITS.load(Ordering::SeqCst)
}

/// Number of playlist tracks requests seen so far.
pub fn tracks_hits() -> usize {
    TRACKS_HITS.load(Ordering::SeqCst)
}

/// A unique token-file path under the OS temp directory.
pub fn temp_token_file(tag: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!(
        "sporelay-test-{}-{}-{}.json",
        std::process::id(),
        tag,
        n
    ))
}

fn spawn_mock() -> SocketAddr {
    let (tx, rx) = std::sync::mpsc::channel();

    // The server outlives any single test runtime, so it gets its own thread
    // and runtime.
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let app = mock_router();
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    rx.recv().unwrap()
}

fn mock_router() -> Router {
    Router::new()
        .route("/api/token", post(token))
        .route("/me", get(me))
        .route(
            "/playlists/{id}/tracks",
            post(add_tracks).delete(remove_tracks),
        )
}

async fn token(Form(params): Form<HashMap<String, String>>) -> Response {
    TOKEN_HITS.fetch_add(1, Ordering::SeqCst);

    match params.get("grant_type").map(String::as_str) {
        Some("authorization_code") => {
            if params.get("code").map(String::as_str) == Some("good-code") {
                Json(json!({
                    "access_token": "code-access",
                    "refresh_token": "code-refresh",
                    "token_type": "Bearer",
                    "expires_in": 3600,
                }))
                .into_response()
            } else {
                (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_grant"}))).into_response()
            }
        }
        Some("refresh_token") => match params.get("refresh_token").map(String::as_str) {
            Some("refresh-ok") => Json(json!({
                "access_token": "new-access",
                "token_type": "Bearer",
                "expires_in": 3600,
            }))
            .into_response(),
            Some("refresh-rotate") => Json(json!({
                "access_token": "new-access",
                "refresh_token": "rotated-refresh",
                "token_type": "Bearer",
                "expires_in": 3600,
            }))
            .into_response(),
            _ => {
                (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_grant"}))).into_response()
            }
        },
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "unsupported_grant_type"})),
        )
            .into_response(),
    }
}

async fn me(headers: HeaderMap) -> Response {
    match bearer(&headers).as_deref() {
        Some("good") | Some("code-access") | Some("new-access") => Json(json!({
            "id": "user-1",
            "display_name": "Test User",
            "email": "test@example.com",
        }))
        .into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"status": 401, "message": "The access token expired"}})),
        )
            .into_response(),
    }
}

async fn add_tracks(Path(id): Path<String>, headers: HeaderMap) -> Response {
    tracks(&id, &headers, StatusCode::CREATED)
}

async fn remove_tracks(Path(id): Path<String>, headers: HeaderMap) -> Response {
    tracks(&id, &headers, StatusCode::OK)
}

fn tracks(id: &str, headers: &HeaderMap, success: StatusCode) -> Response {
    TRACKS_HITS.fetch_add(1, Ordering::SeqCst);

    if id == "pl-forbidden" {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": {"status": 403, "message": "Insufficient client scope"}})),
        )
            .into_response();
    }

    match bearer(headers).as_deref() {
        Some("good") => (success, Json(json!({"snapshot_id": "snap-initial"}))).into_response(),
        // a freshly refreshed token works everywhere except on pl-stale,
        // which keeps answering 401
        Some("new-access") if id != "pl-stale" => {
            (success, Json(json!({"snapshot_id": "snap-refreshed"}))).into_response()
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"status": 401, "message": "The access token expired"}})),
        )
            .into_response(),
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}
