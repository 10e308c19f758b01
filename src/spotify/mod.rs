//! # Spotify Integration Module
//!
//! This module is the outbound half of the relay: every HTTP call to Spotify
//! lives here. It implements the OAuth 2.0 authorization-code flow, the
//! refresh-token exchange, and the playlist mutation gateway with its
//! refresh-and-retry policy.
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - Implements the authorization-code grant:
//! - **Authorization URL**: Builds the redirect to Spotify's consent page,
//!   carrying the CSRF state nonce
//! - **Code Exchange**: Trades the one-time authorization code for an
//!   access/refresh token pair (Basic-auth client credentials)
//! - **Token Refresh**: Exchanges the stored refresh token for a fresh access
//!   token, persisting rotated refresh tokens when Spotify returns one
//! - **Profile Lookup**: Validates a token against `GET /me`
//!
//! ### Playlist Module
//!
//! [`playlist`] - The mutation gateway:
//! - **Add/Remove**: POST and DELETE against the playlist tracks endpoint
//! - **Retry-on-401**: A single refresh-and-replay when the access token is
//!   rejected; a second 401 degrades to a re-authenticate error, never a loop
//!
//! ## Authentication Strategy
//!
//! The relay is a confidential server-side client, so it uses the plain
//! authorization-code grant with `client_id:client_secret` Basic-auth
//! credentials on the token endpoint. Token expiry is detected reactively:
//! a 401 from the API triggers the refresh protocol; `expires_in` is stored
//! but never used to proactively expire anything.
//!
//! ## Error Handling
//!
//! Functions here return [`crate::error::ApiError`] for calls that must
//! surface a failure class to the boundary, and `Option` for the refresh
//! protocol and profile lookup, whose failures degrade to
//! "re-authenticate" / "not authenticated" rather than faults.
//!
//! ## API Coverage
//!
//! - `POST {token_url}` - authorization_code and refresh_token grants
//! - `GET {api_url}/me` - token validation / profile lookup
//! - `POST|DELETE {api_url}/playlists/{playlist_id}/tracks` - mutations

pub mod auth;
pub mod playlist;
