use serde::{Deserialize, Serialize};

/// The persisted token set. Exactly one record exists at a time; every write
/// replaces or overlays the previous one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Projection of the Spotify `/me` profile returned by the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// JSON body of the playlist mutation endpoints. Missing fields deserialize
/// to empty strings and are rejected by the gateway's input validation.
#[derive(Debug, Clone, Deserialize)]
pub struct MutationRequest {
    #[serde(default)]
    pub playlist_id: String,
    #[serde(default)]
    pub song_id: String,
}

/// The kind of playlist mutation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistOp {
    Add,
    Remove,
}

/// Successful result of a playlist mutation.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    /// Spotify's version identifier for the playlist after the mutation.
    pub snapshot_id: Option<String>,
    /// True when the mutation succeeded only after a token refresh and retry.
    pub refreshed: bool,
}

/// Response body of the playlist tracks endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: Option<String>,
}
