use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::{
    config,
    error::ApiError,
    management::TokenStore,
    types::{TokenRecord, UserProfile},
};

/// Scopes required for playlist modification.
const SCOPE: &str = "playlist-modify-public playlist-modify-private";

/// Builds the Spotify authorization redirect URL for a login attempt.
///
/// The URL carries `response_type=code`, the configured client id and
/// redirect URI, the playlist-modify scopes, and the caller-supplied CSRF
/// `state` nonce. The user is sent here to grant permissions; Spotify
/// redirects back to `/auth/callback` with a one-time code and the same
/// state.
///
/// # Arguments
///
/// * `state` - Random CSRF nonce issued for this login attempt
///
/// # Panics
///
/// Panics if the configured authorization URL cannot be parsed. The URL is
/// operator-supplied configuration, so this is treated like a missing
/// environment variable.
///
/// # Example
///
/// ```
/// let url = authorize_url("a-random-state");
/// assert!(url.contains("response_type=code"));
/// ```
pub fn authorize_url(state: &str) -> String {
    Url::parse_with_params(
        &config::spotify_apiauth_url(),
        &[
            ("response_type", "code"),
            ("client_id", &config::spotify_client_id()),
            ("scope", SCOPE),
            ("redirect_uri", &config::spotify_redirect_uri()),
            ("state", state),
        ],
    )
    .expect("SPOTIFY_AUTH_URL must be a valid URL")
    .to_string()
}

/// Exchanges an authorization code for an access/refresh token pair.
///
/// Completes the OAuth 2.0 authorization-code grant by POSTing the code to
/// the token endpoint with `client_id:client_secret` Basic-auth credentials
/// and the registered redirect URI.
///
/// # Arguments
///
/// * `code` - Authorization code received from the OAuth callback
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(TokenRecord)` - The complete token set to persist
/// - `Err(ApiError::Upstream)` - Non-success HTTP status from the token
///   endpoint, with status and body preserved
/// - `Err(ApiError::Network)` - Transport-level failure
///
/// # Security Note
///
/// The authorization code is single-use and expires quickly (typically 10
/// minutes). The exchange should happen immediately after receiving the code.
pub async fn exchange_code(code: &str) -> Result<TokenRecord, ApiError> {
    let client = Client::new();
    let res = client
        .post(config::spotify_apitoken_url())
        .basic_auth(
            config::spotify_client_id(),
            Some(config::spotify_client_secret()),
        )
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &config::spotify_redirect_uri()),
        ])
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let message = res.text().await.unwrap_or_default();
        return Err(ApiError::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    let json: Value = res.json().await?;

    Ok(TokenRecord {
        access_token: json["access_token"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        refresh_token: json["refresh_token"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        token_type: json["token_type"].as_str().unwrap_or("Bearer").to_string(),
        expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
    })
}

/// Refreshes the access token using the stored refresh token.
///
/// Exchanges the refresh token held by the store via the `refresh_token`
/// grant. On success the new access token is overlaid onto the stored
/// record; if Spotify rotated the refresh token, the whole record is
/// re-saved so the rotated token survives (an overlay alone would lose it).
///
/// # Arguments
///
/// * `store` - Token store holding the current record
///
/// # Returns
///
/// The fresh access token, or `None` when no refresh token is stored, the
/// exchange fails, or the store cannot be written. Refresh failures are
/// never fatal to the caller; they degrade to "please re-authenticate".
/// Returning the token directly lets the caller retry immediately without
/// a second read from the store.
///
/// # Concurrency
///
/// Nothing serializes concurrent refreshes. Two requests that both observe
/// a 401 may both exchange the same refresh token; with rotation enabled the
/// second exchange can fail and simply reports `None`.
pub async fn refresh_access_token<S: TokenStore>(store: &S) -> Option<String> {
    let refresh_token = store.get_refresh_token().await?;

    let client = Client::new();
    let res = client
        .post(config::spotify_apitoken_url())
        .basic_auth(
            config::spotify_client_id(),
            Some(config::spotify_client_secret()),
        )
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", &refresh_token),
        ])
        .send()
        .await
        .ok()?;

    if !res.status().is_success() {
        return None;
    }

    let json: Value = res.json().await.ok()?;

    let access_token = json["access_token"].as_str()?.to_string();
    let expires_in = json["expires_in"].as_i64().unwrap_or(3600) as u64;

    store
        .update_access_token(&access_token, expires_in)
        .await
        .ok()?;

    // rotated refresh token: re-save the full record
    if let Some(rotated) = json["refresh_token"].as_str() {
        store
            .save(TokenRecord {
                access_token: access_token.clone(),
                refresh_token: rotated.to_string(),
                token_type: json["token_type"].as_str().unwrap_or("Bearer").to_string(),
                expires_in,
            })
            .await
            .ok()?;
    }

    Some(access_token)
}

/// Looks up the authenticated user's profile to validate a token.
///
/// Issues `GET /me` with the candidate access token. HTTP 200 yields the
/// profile projection; any other status or a network failure yields `None`
/// without surfacing an error to the caller.
pub async fn current_user(access_token: &str) -> Option<UserProfile> {
    let client = Client::new();
    let res = client
        .get(format!("{}/me", config::spotify_apiurl()))
        .bearer_auth(access_token)
        .send()
        .await
        .ok()?;

    if res.status() != StatusCode::OK {
        return None;
    }

    res.json::<UserProfile>().await.ok()
}
