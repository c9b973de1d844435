use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{Candidate, MediaKind, MediaRecord, Status},
    store::LibraryStore,
};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

/// User-facing library operations
///
/// Sits between the presentation layer and the store seam, centralizing the
/// validation and date bookkeeping both backends share. Rating bounds are
/// checked before any store access so a rejected edit never mutates state.
pub struct Library {
    store: Arc<dyn LibraryStore>,
}

impl Library {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    /// Saves a catalog candidate into the library
    pub async fn add(&self, candidate: Candidate, status: Status) -> AppResult<MediaRecord> {
        let mut record = candidate.into_record(status);
        if status == Status::Completed {
            record.date_completed = Some(Utc::now());
        }

        let stored = self.store.upsert(&record).await?;
        tracing::info!(
            external_id = %stored.external_id,
            kind = %stored.kind,
            title = %stored.title,
            "Added to library"
        );
        Ok(stored)
    }

    /// Changes a record's status, optionally rating it in the same edit
    ///
    /// Entering `Completed` stamps `date_completed`; leaving it clears the
    /// stamp.
    pub async fn set_status(
        &self,
        external_id: &str,
        kind: MediaKind,
        status: Status,
        rating: Option<u8>,
    ) -> AppResult<MediaRecord> {
        if let Some(rating) = rating {
            validate_rating(rating)?;
        }

        let mut record = self.require(external_id, kind).await?;
        record.status = status;
        record.date_completed = match status {
            Status::Completed => Some(Utc::now()),
            _ => None,
        };
        if let Some(rating) = rating {
            record.user_rating = Some(rating);
        }

        self.store.upsert(&record).await
    }

    /// Sets the user rating, rejecting values outside [1,10]
    pub async fn rate(
        &self,
        external_id: &str,
        kind: MediaKind,
        rating: u8,
    ) -> AppResult<MediaRecord> {
        validate_rating(rating)?;

        let mut record = self.require(external_id, kind).await?;
        record.user_rating = Some(rating);
        self.store.upsert(&record).await
    }

    pub async fn toggle_favorite(
        &self,
        external_id: &str,
        kind: MediaKind,
    ) -> AppResult<MediaRecord> {
        let mut record = self.require(external_id, kind).await?;
        record.is_favorite = !record.is_favorite;
        self.store.upsert(&record).await
    }

    pub async fn set_notes(
        &self,
        external_id: &str,
        kind: MediaKind,
        notes: Option<String>,
    ) -> AppResult<MediaRecord> {
        let mut record = self.require(external_id, kind).await?;
        record.notes = notes.filter(|n| !n.trim().is_empty());
        self.store.upsert(&record).await
    }

    /// Deletes a record; `NotFound` when the id is absent
    pub async fn remove(&self, external_id: &str, kind: MediaKind) -> AppResult<()> {
        self.store.delete(external_id, kind).await
    }

    pub async fn records(&self, kind: MediaKind) -> AppResult<Vec<MediaRecord>> {
        self.store.list_all(kind).await
    }

    pub async fn records_by_status(
        &self,
        kind: MediaKind,
        status: Status,
    ) -> AppResult<Vec<MediaRecord>> {
        let mut records = self.store.list_all(kind).await?;
        records.retain(|r| r.status == status);
        Ok(records)
    }

    pub async fn favorites(&self, kind: MediaKind) -> AppResult<Vec<MediaRecord>> {
        let mut records = self.store.list_all(kind).await?;
        records.retain(|r| r.is_favorite);
        Ok(records)
    }

    async fn require(&self, external_id: &str, kind: MediaKind) -> AppResult<MediaRecord> {
        self.store
            .get(external_id, kind)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No {} with id {}", kind, external_id)))
    }
}

fn validate_rating(rating: u8) -> AppResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::InvalidInput(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }
    Ok(())
}
