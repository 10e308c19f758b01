use std::path::PathBuf;

use tokio::sync::Mutex;

use crate::{config, types::TokenRecord};

/// Storage abstraction for the process-wide Spotify token set.
///
/// At most one [`TokenRecord`] exists at a time. `save` replaces the whole
/// record, `update_access_token` overlays only the access token and expiry
/// onto the last persisted record, and `get` treats a missing or corrupt
/// record as absence rather than an error. Callers depend on this trait, not
/// on the storage medium, so tests can substitute an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait TokenStore {
    /// Replaces the token record. Readers never observe a half-written record.
    async fn save(&self, record: TokenRecord) -> Result<(), String>;

    /// Returns the current record, or `None` if nothing was persisted yet or
    /// the persisted representation is malformed.
    async fn get(&self) -> Option<TokenRecord>;

    /// Overlays a fresh access token and expiry onto the existing record,
    /// preserving the refresh token and token type. A no-op when no record
    /// exists.
    async fn update_access_token(&self, access_token: &str, expires_in: u64)
    -> Result<(), String>;

    /// Convenience projection of `get` onto the access token.
    async fn get_access_token(&self) -> Option<String> {
        self.get().await.map(|t| t.access_token)
    }

    /// Convenience projection of `get` onto the refresh token. An empty
    /// refresh token (rotated away and not yet re-saved) counts as absent.
    async fn get_refresh_token(&self) -> Option<String> {
        self.get()
            .await
            .map(|t| t.refresh_token)
            .filter(|t| !t.is_empty())
    }
}

/// File-backed token store.
///
/// Persists the record as pretty-printed JSON of shape
/// `{access_token, refresh_token, token_type, expires_in}`. Writes go through
/// a temp file followed by a rename so concurrent readers see either the old
/// or the new record, never a partial one. Concurrent writers race; the last
/// writer wins.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store at the configured token file location
    /// (see [`config::token_file`]).
    pub fn new() -> Self {
        Self {
            path: config::token_file(),
        }
    }

    /// Creates a store backed by an explicit path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for FileTokenStore {
    async fn save(&self, record: TokenRecord) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&record).map_err(|e| e.to_string())?;
        let tmp = self.path.with_extension("json.tmp");
        async_fs::write(&tmp, json).await.map_err(|e| e.to_string())?;
        async_fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| e.to_string())
    }

    async fn get(&self) -> Option<TokenRecord> {
        let content = async_fs::read_to_string(&self.path).await.ok()?;
        serde_json::from_str(&content).ok()
    }

    async fn update_access_token(
        &self,
        access_token: &str,
        expires_in: u64,
    ) -> Result<(), String> {
        let Some(mut record) = self.get().await else {
            return Ok(());
        };
        record.access_token = access_token.to_string();
        record.expires_in = expires_in;
        self.save(record).await
    }
}

/// In-memory token store used as a test double.
pub struct MemoryTokenStore {
    record: Mutex<Option<TokenRecord>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self {
            record: Mutex::new(None),
        }
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for MemoryTokenStore {
    async fn save(&self, record: TokenRecord) -> Result<(), String> {
        *self.record.lock().await = Some(record);
        Ok(())
    }

    async fn get(&self) -> Option<TokenRecord> {
        self.record.lock().await.clone()
    }

    async fn update_access_token(
        &self,
        access_token: &str,
        expires_in: u64,
    ) -> Result<(), String> {
        let mut guard = self.record.lock().await;
        if let Some(record) = guard.as_mut() {
            record.access_token = access_token.to_string();
            record.expires_in = expires_in;
        }
        Ok(())
    }
}
