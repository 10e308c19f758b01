//! # Management Module
//!
//! Persistent state management for the relay. The only state the relay owns
//! is the current Spotify token set, held by a [`TokenStore`]. The store is
//! the single source of truth for every API call; the OAuth callback writes
//! it, the refresh protocol overlays it, and the playlist gateway reads it.
//!
//! Two implementations exist:
//!
//! - [`FileTokenStore`] - durable JSON file in the local data directory,
//!   readable by every process that needs to make Spotify calls
//! - [`MemoryTokenStore`] - in-memory fake for tests

mod tokens;

pub use tokens::FileTokenStore;
pub use tokens::MemoryTokenStore;
pub use tokens::TokenStore;
