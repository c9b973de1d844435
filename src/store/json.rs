use std::path::PathBuf;

use tokio::fs;

use crate::{
    error::{AppError, AppResult},
    models::{MediaKind, MediaRecord},
};

use super::LibraryStore;

/// Local JSON file store
///
/// One pretty-printed document per kind (`movies.json`, `books.json`) under
/// the data directory. A missing or unreadable file reads as an empty
/// library; every write rewrites the whole document. Single-user,
/// single-process access is assumed.
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    /// Creates the store, making the data directory if needed
    pub async fn new(data_dir: impl Into<PathBuf>) -> AppResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).await?;
        Ok(Self { data_dir })
    }

    fn path_for(&self, kind: MediaKind) -> PathBuf {
        self.data_dir.join(format!("{}.json", kind.collection()))
    }

    async fn load(&self, kind: MediaKind) -> AppResult<Vec<MediaRecord>> {
        let path = self.path_for(kind);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Unparseable library file, reading as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, kind: MediaKind, records: &[MediaRecord]) -> AppResult<()> {
        let json = serde_json::to_vec_pretty(records)?;
        fs::write(self.path_for(kind), json).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl LibraryStore for JsonStore {
    async fn upsert(&self, record: &MediaRecord) -> AppResult<MediaRecord> {
        let mut records = self.load(record.kind).await?;

        match records
            .iter_mut()
            .find(|r| r.external_id == record.external_id)
        {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }

        self.save(record.kind, &records).await?;

        tracing::debug!(
            external_id = %record.external_id,
            kind = %record.kind,
            "Record upserted"
        );

        Ok(record.clone())
    }

    async fn get(&self, external_id: &str, kind: MediaKind) -> AppResult<Option<MediaRecord>> {
        let records = self.load(kind).await?;
        Ok(records.into_iter().find(|r| r.external_id == external_id))
    }

    async fn list_all(&self, kind: MediaKind) -> AppResult<Vec<MediaRecord>> {
        let mut records = self.load(kind).await?;
        records.sort_by(|a, b| {
            b.date_added
                .cmp(&a.date_added)
                .then_with(|| a.external_id.cmp(&b.external_id))
        });
        Ok(records)
    }

    async fn delete(&self, external_id: &str, kind: MediaKind) -> AppResult<()> {
        let mut records = self.load(kind).await?;
        let before = records.len();
        records.retain(|r| r.external_id != external_id);

        if records.len() == before {
            return Err(AppError::NotFound(format!(
                "No {} with id {}",
                kind, external_id
            )));
        }

        self.save(kind, &records).await?;

        tracing::debug!(external_id = %external_id, kind = %kind, "Record deleted");
        Ok(())
    }
}
