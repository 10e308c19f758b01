use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension, Json,
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::{Value, json};

use crate::{
    error::ApiError,
    management::TokenStore,
    server::AppState,
    spotify, success, utils, warning,
};

/// `GET /auth/login` - initiates the Spotify OAuth flow.
///
/// Discards any pending login attempt, issues a fresh CSRF state nonce and
/// redirects the user to Spotify's authorization page.
pub async fn login(Extension(state): Extension<Arc<AppState>>) -> Redirect {
    let nonce = utils::generate_state();

    // a new login replaces whatever attempt was pending
    {
        let mut pending = state.pending_state.lock().await;
        *pending = Some(nonce.clone());
    }

    Redirect::temporary(&spotify::auth::authorize_url(&nonce))
}

/// `GET /auth/callback` - completes the OAuth flow.
///
/// Verifies the CSRF state against the pending login attempt, exchanges the
/// authorization code for tokens and persists them in the token store. The
/// pending state is consumed either way; a failed callback requires a new
/// `/auth/login` round trip.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    let pending = state.pending_state.lock().await.take();

    if let Some(error) = params.get("error") {
        return ApiError::OAuth(error.clone()).into_response();
    }

    let presented = params.get("state");
    let matches = matches!((presented, &pending), (Some(p), Some(s)) if p == s);
    if !matches {
        return ApiError::CsrfMismatch.into_response();
    }

    let Some(code) = params.get("code") else {
        return ApiError::InvalidRequest("Missing authorization code".to_string()).into_response();
    };

    match spotify::auth::exchange_code(code).await {
        Ok(record) => {
            let expires_in = record.expires_in;
            if let Err(e) = state.store.save(record).await {
                warning!("Failed to persist tokens: {}", e);
                return ApiError::Storage(e).into_response();
            }

            success!("Authentication successful");
            Json(json!({
                "success": true,
                "message": "Successfully authenticated with Spotify",
                "expires_in": expires_in,
            }))
            .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// `GET /auth/status` - reports whether a usable token exists.
///
/// A stored token is validated against Spotify's `/me` endpoint; any failure
/// there is reported as "not authenticated", never as an error response.
pub async fn status(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    let Some(access_token) = state.store.get_access_token().await else {
        return Json(json!({
            "authenticated": false,
            "message": "No access token found. Please authenticate first.",
        }));
    };

    match spotify::auth::current_user(&access_token).await {
        Some(user) => Json(json!({
            "authenticated": true,
            "user": user,
        })),
        None => Json(json!({
            "authenticated": false,
            "message": "Token is invalid or expired",
        })),
    }
}
