use rand::{Rng, distr::Alphanumeric};

/// Generates a cryptographically random CSRF state nonce.
///
/// Creates a 32-character alphanumeric string used to correlate an OAuth
/// login redirect with its callback. The alphabet is URL-safe so the value
/// can be embedded in the authorization URL without escaping.
///
/// # Returns
///
/// A randomly generated state string of exactly 32 characters.
///
/// # Example
///
/// ```
/// let state = generate_state();
/// assert_eq!(state.len(), 32);
/// ```
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Normalizes a song identifier into a Spotify track URI.
///
/// Clients may send either a bare track id (`"4uLU6hMCjMI75M1A2tKUQC"`) or a
/// fully qualified URI (`"spotify:track:4uLU6hMCjMI75M1A2tKUQC"`). Bare ids
/// are prefixed with `spotify:track:`; qualified URIs pass through verbatim,
/// so normalizing twice yields the same value.
///
/// # Example
///
/// ```
/// assert_eq!(normalize_track_uri("abc123"), "spotify:track:abc123");
/// assert_eq!(normalize_track_uri("spotify:track:abc123"), "spotify:track:abc123");
/// ```
pub fn normalize_track_uri(song_id: &str) -> String {
    if song_id.starts_with("spotify:track:") {
        song_id.to_string()
    } else {
        format!("spotify:track:{}", song_id)
    }
}
