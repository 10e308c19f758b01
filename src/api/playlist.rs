use std::sync::Arc;

use axum::{
    Extension, Json,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    error::ApiError,
    server::AppState,
    spotify,
    types::{MutationRequest, PlaylistOp},
};

/// `POST /api/playlist/add` - adds a track to a playlist.
pub async fn add_song(Extension(state): Extension<Arc<AppState>>, body: String) -> Response {
    mutate(&state, PlaylistOp::Add, &body).await
}

/// `POST /api/playlist/remove` - removes a track from a playlist.
pub async fn remove_song(Extension(state): Extension<Arc<AppState>>, body: String) -> Response {
    mutate(&state, PlaylistOp::Remove, &body).await
}

async fn mutate(state: &AppState, op: PlaylistOp, body: &str) -> Response {
    let request: MutationRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(_) => {
            return ApiError::InvalidRequest("Invalid JSON in request body".to_string())
                .into_response();
        }
    };

    match spotify::playlist::mutate(&state.store, op, &request.playlist_id, &request.song_id).await
    {
        Ok(outcome) => {
            let mut message = match op {
                PlaylistOp::Add => "Song added to playlist successfully".to_string(),
                PlaylistOp::Remove => "Song removed from playlist successfully".to_string(),
            };
            if outcome.refreshed {
                message.push_str(" (token refreshed)");
            }

            Json(json!({
                "success": true,
                "message": message,
                "snapshot_id": outcome.snapshot_id,
                "playlist_id": request.playlist_id,
                "song_id": request.song_id,
            }))
            .into_response()
        }
        Err(e) => e.into_response(),
    }
}
