//! Configuration management for the Spotify Playlist Relay.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify API credentials, server settings, and the
//! upstream endpoint URLs.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the working directory

use dotenv;
use std::{env, path::PathBuf};

/// Loads environment variables from a `.env` file.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `sporelay/.env`. If no file exists there, a
/// `.env` in the working directory is used instead. Variables already present
/// in the process environment always win.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/sporelay/.env`
/// - macOS: `~/Library/Application Support/sporelay/.env`
/// - Windows: `%LOCALAPPDATA%/sporelay/.env`
///
/// # Example
///
/// ```
/// use sporelay::config;
///
/// #[tokio::main]
/// async fn main() {
///     config::load_env().await;
/// }
/// ```
pub async fn load_env() {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporelay/.env");
    if let Some(parent) = path.parent() {
        let _ = async_fs::create_dir_all(parent).await;
    }

    if dotenv::from_path(&path).is_err() {
        // fall back to a .env next to the binary / in the cwd
        let _ = dotenv::dotenv();
    }
}

/// Returns the server address for the relay HTTP server.
///
/// Retrieves the `SERVER_ADDRESS` environment variable which specifies
/// the address and port where the HTTP server should bind, e.g.
/// `0.0.0.0:8000`.
///
/// # Panics
///
/// Panics if the `SERVER_ADDRESS` environment variable is not set.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").expect("SERVER_ADDRESS must be set")
}

/// Returns the Spotify API client ID for authentication.
///
/// Retrieves the `SPOTIFY_CLIENT_ID` environment variable which contains
/// the client ID obtained when registering the application with Spotify's
/// developer platform.
///
/// # Panics
///
/// Panics if the `SPOTIFY_CLIENT_ID` environment variable is not set.
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_CLIENT_ID").expect("SPOTIFY_CLIENT_ID must be set")
}

/// Returns the Spotify API client secret for authentication.
///
/// Retrieves the `SPOTIFY_CLIENT_SECRET` environment variable. Together with
/// the client ID it forms the Basic-auth credentials sent to the token
/// endpoint during code exchange and refresh.
///
/// # Panics
///
/// Panics if the `SPOTIFY_CLIENT_SECRET` environment variable is not set.
///
/// # Security Note
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
pub fn spotify_client_secret() -> String {
    env::var("SPOTIFY_CLIENT_SECRET").expect("SPOTIFY_CLIENT_SECRET must be set")
}

/// Returns the Spotify OAuth redirect URI.
///
/// Retrieves the `SPOTIFY_REDIRECT_URI` environment variable which specifies
/// the callback URL that Spotify should redirect to after user authorization.
/// This must match the redirect URI registered in the Spotify application
/// settings and should point at this server's `/auth/callback` route.
///
/// # Panics
///
/// Panics if the `SPOTIFY_REDIRECT_URI` environment variable is not set.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_REDIRECT_URI").expect("SPOTIFY_REDIRECT_URI must be set")
}

/// Returns the Spotify OAuth authorization URL.
///
/// Retrieves the `SPOTIFY_AUTH_URL` environment variable, defaulting to the
/// production endpoint `https://accounts.spotify.com/authorize`. This is
/// where users are redirected to grant permissions to the application.
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_AUTH_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/authorize".to_string())
}

/// Returns the Spotify OAuth token exchange URL.
///
/// Retrieves the `SPOTIFY_TOKEN_URL` environment variable, defaulting to the
/// production endpoint `https://accounts.spotify.com/api/token`. Used for
/// both the authorization-code and the refresh-token grant.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_TOKEN_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string())
}

/// Returns the Spotify Web API base URL.
///
/// Retrieves the `SPOTIFY_API_URL` environment variable, defaulting to the
/// production endpoint `https://api.spotify.com/v1`. This is used for all
/// API operations after authentication.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| "https://api.spotify.com/v1".to_string())
}

/// Returns the path of the persisted token file.
///
/// Honors the `TOKEN_FILE` environment variable when set; otherwise the file
/// lives in the platform-specific local data directory under
/// `sporelay/tokens.json`. The file must be readable by every process that
/// makes Spotify calls, not just the one that performed the OAuth exchange.
pub fn token_file() -> PathBuf {
    if let Ok(path) = env::var("TOKEN_FILE") {
        return PathBuf::from(path);
    }
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporelay/tokens.json");
    path
}
