mod common;

use sporelay::error::ApiError;
use sporelay::management::{MemoryTokenStore, TokenStore};
use sporelay::spotify::playlist::mutate;
use sporelay::types::{PlaylistOp, TokenRecord};

fn record(access: &str, refresh: &str) -> TokenRecord {
    TokenRecord {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        token_type: "Bearer".to_string(),
        expires_in: 3600,
    }
}

#[tokio::test]
async fn mutation_without_token_returns_not_authenticated() {
    let _guard = common::setup();
    let store = MemoryTokenStore::new();

    let before = common::tracks_hits();
    let result = mutate(&store, PlaylistOp::Add, "pl-1", "track-1").await;

    assert!(matches!(result, Err(ApiError::NotAuthenticated)));
    // no outbound call was made
    assert_eq!(common::tracks_hits(), before);
}

#[tokio::test]
async fn mutation_with_empty_fields_returns_invalid_request() {
    let _guard = common::setup();
    let store = MemoryTokenStore::new();
    store.save(record("good", "refresh-ok")).await.unwrap();

    let before = common::tracks_hits();

    let result = mutate(&store, PlaylistOp::Add, "", "track-1").await;
    assert!(matches!(result, Err(ApiError::InvalidRequest(_))));

    let result = mutate(&store, PlaylistOp::Remove, "pl-1", "").await;
    assert!(matches!(result, Err(ApiError::InvalidRequest(_))));

    assert_eq!(common::tracks_hits(), before);
}

#[tokio::test]
async fn add_song_succeeds() {
    let _guard = common::setup();
    let store = MemoryTokenStore::new();
    store.save(record("good", "refresh-ok")).await.unwrap();

    let outcome = mutate(&store, PlaylistOp::Add, "pl-1", "track-1")
        .await
        .unwrap();

    assert_eq!(outcome.snapshot_id.as_deref(), Some("snap-initial"));
    assert!(!outcome.refreshed);
}

#[tokio::test]
async fn remove_song_succeeds() {
    let _guard = common::setup();
    let store = MemoryTokenStore::new();
    store.save(record("good", "refresh-ok")).await.unwrap();

    let outcome = mutate(&store, PlaylistOp::Remove, "pl-1", "spotify:track:track-1")
        .await
        .unwrap();

    assert_eq!(outcome.snapshot_id.as_deref(), Some("snap-initial"));
    assert!(!outcome.refreshed);
}

#[tokio::test]
async fn expired_token_refreshes_and_retries_once() {
    let _guard = common::setup();
    let store = MemoryTokenStore::new();
    store.save(record("expired", "refresh-ok")).await.unwrap();

    let outcome = mutate(&store, PlaylistOp::Add, "pl-1", "track-1")
        .await
        .unwrap();

    // success is annotated as refreshed and comes from the replayed request
    assert!(outcome.refreshed);
    assert_eq!(outcome.snapshot_id.as_deref(), Some("snap-refreshed"));

    // the store reflects the new access token, refresh token untouched
    let stored = store.get().await.unwrap();
    assert_eq!(stored.access_token, "new-access");
    assert_eq!(stored.refresh_token, "refresh-ok");
}

#[tokio::test]
async fn rotated_refresh_token_is_persisted() {
    let _guard = common::setup();
    let store = MemoryTokenStore::new();
    store.save(record("expired", "refresh-rotate")).await.unwrap();

    let outcome = mutate(&store, PlaylistOp::Add, "pl-1", "track-1")
        .await
        .unwrap();
    assert!(outcome.refreshed);

    let stored = store.get().await.unwrap();
    assert_eq!(stored.access_token, "new-access");
    assert_eq!(stored.refresh_token, "rotated-refresh");
}

#[tokio::test]
async fn second_unauthorized_reports_refresh_failed() {
    let _guard = common::setup();
    let store = MemoryTokenStore::new();
    store.save(record("expired", "refresh-ok")).await.unwrap();

    let tracks_before = common::tracks_hits();
    let tokens_before = common::token_hits();

    // pl-stale rejects even the refreshed token
    let result = mutate(&store, PlaylistOp::Add, "pl-stale", "track-1").await;

    assert!(matches!(result, Err(ApiError::RefreshFailed)));
    // exactly one original attempt, one refresh, one retry - no loop
    assert_eq!(common::tracks_hits(), tracks_before + 2);
    assert_eq!(common::token_hits(), tokens_before + 1);
}

#[tokio::test]
async fn missing_refresh_token_fails_without_retry() {
    let _guard = common::setup();
    let store = MemoryTokenStore::new();
    store.save(record("expired", "")).await.unwrap();

    let tracks_before = common::tracks_hits();
    let tokens_before = common::token_hits();

    let result = mutate(&store, PlaylistOp::Add, "pl-1", "track-1").await;

    assert!(matches!(result, Err(ApiError::RefreshFailed)));
    // no refresh exchange, no retry
    assert_eq!(common::token_hits(), tokens_before);
    assert_eq!(common::tracks_hits(), tracks_before + 1);
}

#[tokio::test]
async fn rejected_refresh_reports_refresh_failed() {
    let _guard = common::setup();
    let store = MemoryTokenStore::new();
    store.save(record("expired", "refresh-bad")).await.unwrap();

    let tracks_before = common::tracks_hits();

    let result = mutate(&store, PlaylistOp::Add, "pl-1", "track-1").await;

    assert!(matches!(result, Err(ApiError::RefreshFailed)));
    assert_eq!(common::tracks_hits(), tracks_before + 1);
}

#[tokio::test]
async fn upstream_error_is_forwarded_verbatim() {
    let _guard = common::setup();
    let store = MemoryTokenStore::new();
    store.save(record("good", "refresh-ok")).await.unwrap();

    let tokens_before = common::token_hits();

    let result = mutate(&store, PlaylistOp::Add, "pl-forbidden", "track-1").await;

    match result {
        Err(ApiError::Upstream { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "Insufficient client scope");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
    // non-401 failures never trigger a refresh
    assert_eq!(common::token_hits(), tokens_before);
}
