use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{api, config, error, info, management::FileTokenStore};

/// Shared state for the relay server.
///
/// `store` owns the persisted token record; `pending_state` holds the CSRF
/// nonce of the one in-flight login attempt, if any. Issuing a new login
/// replaces the nonce, the callback consumes it.
pub struct AppState {
    pub store: FileTokenStore,
    pub pending_state: Mutex<Option<String>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            store: FileTokenStore::new(),
            pending_state: Mutex::new(None),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn start_api_server() {
    let state = Arc::new(AppState::new());

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/auth/login", get(api::login))
        .route("/auth/callback", get(api::callback))
        .route("/auth/status", get(api::status))
        .route("/api/playlist/add", post(api::add_song))
        .route("/api/playlist/remove", post(api::remove_song))
        .layer(Extension(state));

    let addr = match SocketAddr::from_str(&config::server_addr()) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
