//! # API Module
//!
//! HTTP handlers for the relay server. This is the inbound half of the
//! relay: a small set of endpoints the client application calls, each
//! delegating to the token store and the Spotify integration layer.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - `GET /auth/login`; starts a login attempt and redirects to
//!   Spotify's authorization page with a fresh CSRF state
//! - [`callback`] - `GET /auth/callback`; verifies the state, exchanges the
//!   authorization code for tokens and persists them
//! - [`status`] - `GET /auth/status`; reports whether a usable token exists,
//!   with the user's profile when it does
//!
//! ### Playlist
//!
//! - [`add_song`] - `POST /api/playlist/add`; adds a track to a playlist
//! - [`remove_song`] - `POST /api/playlist/remove`; removes a track
//!
//! ### Monitoring
//!
//! - [`health`] - `GET /health`; liveness probe with application version
//!
//! ## Response Shape
//!
//! Every failure is rendered by [`crate::error::ApiError`] as
//! `{"success": false, "error": ..., "status_code"?: ...}` with a mirroring
//! HTTP status. Handlers never crash a request on an upstream or network
//! error.

mod auth;
mod health;
mod playlist;

pub use auth::callback;
pub use auth::login;
pub use auth::status;
pub use health::health;
pub use playlist::add_song;
pub use playlist::remove_song;
