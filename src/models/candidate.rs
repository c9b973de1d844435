use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{MediaKind, MediaRecord, Status};

/// A catalog search result carrying enough fields to construct a MediaRecord
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub external_id: String,
    pub kind: MediaKind,
    pub title: String,
    pub year: Option<String>,
    /// Director for movies, first author for books
    pub creator: Option<String>,
    pub synopsis: Option<String>,
    pub artwork_url: Option<String>,
    pub catalog_rating: Option<String>,
    pub tags: BTreeSet<String>,
}

impl Candidate {
    /// Turns the candidate into a library record, stamping `date_added`
    pub fn into_record(self, status: Status) -> MediaRecord {
        MediaRecord {
            external_id: self.external_id,
            title: self.title,
            kind: self.kind,
            status,
            user_rating: None,
            tags: self.tags,
            date_added: Utc::now(),
            date_completed: None,
            is_favorite: false,
            year: self.year,
            creator: self.creator,
            synopsis: self.synopsis,
            artwork_url: self.artwork_url,
            catalog_rating: self.catalog_rating,
            notes: None,
        }
    }
}
