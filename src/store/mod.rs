use std::sync::Arc;

use crate::{
    config::Config,
    error::AppResult,
    models::{MediaKind, MediaRecord},
};

pub mod json;
pub mod supabase;

pub use json::JsonStore;
pub use supabase::SupabaseStore;

/// Library persistence abstraction
///
/// Two backends implement this: local JSON documents (one per kind) and a
/// remote Supabase table. Records are keyed by `(external_id, kind)`; insert
/// collisions resolve by upsert.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LibraryStore: Send + Sync {
    /// Insert or replace a record, returning the stored row
    async fn upsert(&self, record: &MediaRecord) -> AppResult<MediaRecord>;

    /// Fetch a record by its catalog id
    async fn get(&self, external_id: &str, kind: MediaKind) -> AppResult<Option<MediaRecord>>;

    /// All records of one kind, most recently added first
    async fn list_all(&self, kind: MediaKind) -> AppResult<Vec<MediaRecord>>;

    /// Remove a record; `NotFound` when the id is absent
    async fn delete(&self, external_id: &str, kind: MediaKind) -> AppResult<()>;
}

/// Selects the store backend from configuration
///
/// Supabase credentials switch persistence to the remote table; otherwise
/// records live in JSON files under the local data directory.
pub async fn create_store(config: &Config) -> AppResult<Arc<dyn LibraryStore>> {
    match (&config.supabase_url, &config.supabase_key) {
        (Some(url), Some(key)) => {
            tracing::info!(url = %url, "Using Supabase library store");
            Ok(Arc::new(SupabaseStore::new(url.clone(), key.clone())))
        }
        _ => {
            let data_dir = config.data_dir();
            tracing::info!(path = %data_dir.display(), "Using local JSON library store");
            Ok(Arc::new(JsonStore::new(data_dir).await?))
        }
    }
}
