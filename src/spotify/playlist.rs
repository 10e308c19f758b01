use reqwest::{Client, Method, StatusCode};
use serde_json::{Value, json};

use crate::{
    config,
    error::ApiError,
    management::TokenStore,
    spotify,
    types::{MutationOutcome, PlaylistOp, SnapshotResponse},
    utils,
};

impl PlaylistOp {
    fn method(&self) -> Method {
        match self {
            PlaylistOp::Add => Method::POST,
            PlaylistOp::Remove => Method::DELETE,
        }
    }

    fn success_status(&self) -> StatusCode {
        match self {
            PlaylistOp::Add => StatusCode::CREATED,
            PlaylistOp::Remove => StatusCode::OK,
        }
    }

    fn payload(&self, track_uri: &str) -> Value {
        match self {
            PlaylistOp::Add => json!({ "uris": [track_uri] }),
            PlaylistOp::Remove => json!({ "tracks": [{ "uri": track_uri }] }),
        }
    }
}

/// Performs an authenticated add/remove mutation against a playlist.
///
/// This is the gateway every playlist endpoint goes through. The flow is:
///
/// 1. **Precondition**: an access token must exist in the store; absence
///    fails with [`ApiError::NotAuthenticated`] before any network call.
/// 2. **Validation**: `playlist_id` and `song_id` must be non-empty;
///    otherwise [`ApiError::InvalidRequest`], again without a network call.
/// 3. **Normalization**: a bare track id is qualified as
///    `spotify:track:<id>`; an already qualified URI passes through.
/// 4. **Request**: POST (add, expects 201) or DELETE (remove, expects 200)
///    against the playlist tracks endpoint.
/// 5. **Retry-on-401**: a 401 on the first attempt triggers exactly one
///    token refresh. If the refresh yields a token, the identical request
///    is replayed once with the new Authorization header; the retry's
///    failure, not the first attempt's, is what propagates. A second 401,
///    like a refresh that yields nothing, reports
///    [`ApiError::RefreshFailed`]. There is never more than one refresh per
///    mutation.
///
/// Any other non-2xx status fails with [`ApiError::Upstream`], forwarding
/// Spotify's error message and status code verbatim. Transport failures at
/// any stage fail with [`ApiError::Network`] and are never retried.
///
/// # Arguments
///
/// * `store` - Token store providing the access token and refresh token
/// * `op` - Whether to add or remove the track
/// * `playlist_id` - Target playlist
/// * `song_id` - Bare track id or full `spotify:track:` URI
///
/// # Returns
///
/// A [`MutationOutcome`] carrying Spotify's `snapshot_id` and whether the
/// mutation only succeeded after a token refresh.
pub async fn mutate<S: TokenStore>(
    store: &S,
    op: PlaylistOp,
    playlist_id: &str,
    song_id: &str,
) -> Result<MutationOutcome, ApiError> {
    let access_token = store
        .get_access_token()
        .await
        .ok_or(ApiError::NotAuthenticated)?;

    if playlist_id.is_empty() || song_id.is_empty() {
        return Err(ApiError::InvalidRequest(
            "Missing required fields: playlist_id and song_id".to_string(),
        ));
    }

    let track_uri = utils::normalize_track_uri(song_id);
    let url = format!(
        "{uri}/playlists/{playlist_id}/tracks",
        uri = &config::spotify_apiurl(),
        playlist_id = playlist_id
    );
    let payload = op.payload(&track_uri);

    let client = Client::new();
    let response = send(&client, &op, &url, &access_token, &payload).await?;

    if response.status() == op.success_status() {
        return Ok(MutationOutcome {
            snapshot_id: snapshot_id(response).await,
            refreshed: false,
        });
    }

    if response.status() != StatusCode::UNAUTHORIZED {
        return Err(upstream_error(response).await);
    }

    // 401: refresh once and replay the identical request with the new token
    let Some(new_token) = spotify::auth::refresh_access_token(store).await else {
        return Err(ApiError::RefreshFailed);
    };

    let retry = send(&client, &op, &url, &new_token, &payload).await?;

    if retry.status() == op.success_status() {
        Ok(MutationOutcome {
            snapshot_id: snapshot_id(retry).await,
            refreshed: true,
        })
    } else if retry.status() == StatusCode::UNAUTHORIZED {
        Err(ApiError::RefreshFailed)
    } else {
        Err(upstream_error(retry).await)
    }
}

async fn send(
    client: &Client,
    op: &PlaylistOp,
    url: &str,
    token: &str,
    payload: &Value,
) -> Result<reqwest::Response, reqwest::Error> {
    client
        .request(op.method(), url)
        .bearer_auth(token)
        .json(payload)
        .send()
        .await
}

async fn snapshot_id(response: reqwest::Response) -> Option<String> {
    response
        .json::<SnapshotResponse>()
        .await
        .ok()
        .and_then(|r| r.snapshot_id)
}

/// Forwards Spotify's error message and status code verbatim.
async fn upstream_error(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| "Spotify API request failed".to_string());

    ApiError::Upstream { status, message }
}
