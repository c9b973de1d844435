use std::collections::BTreeSet;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of tracked media
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    Book,
}

impl MediaKind {
    /// Collection name used for both JSON file names and remote table names
    pub fn collection(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movies",
            MediaKind::Book => "books",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::Book => write!(f, "book"),
        }
    }
}

/// Consumption status of a record
///
/// The progression is ordered, but users may set any status directly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    WantToConsume,
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::WantToConsume, Status::InProgress, Status::Completed];

    /// Kind-specific label for display ("want to watch" vs "want to read")
    pub fn label(&self, kind: MediaKind) -> &'static str {
        match (self, kind) {
            (Status::WantToConsume, MediaKind::Movie) => "Want to watch",
            (Status::InProgress, MediaKind::Movie) => "Watching",
            (Status::Completed, MediaKind::Movie) => "Watched",
            (Status::WantToConsume, MediaKind::Book) => "Want to read",
            (Status::InProgress, MediaKind::Book) => "Reading",
            (Status::Completed, MediaKind::Book) => "Read",
        }
    }
}

/// A single tracked movie or book
///
/// `external_id` is the natural key: the IMDB id for movies, the Open Library
/// work id for books. It is unique within a `kind`; the store upserts on
/// conflict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaRecord {
    pub external_id: String,
    pub title: String,
    pub kind: MediaKind,
    pub status: Status,
    /// User rating in [1,10]; undefined until explicitly set
    pub user_rating: Option<u8>,
    /// Genres (movies) or subjects (books)
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub date_added: DateTime<Utc>,
    pub date_completed: Option<DateTime<Utc>>,
    /// Optional across both store backends: a missing column or field reads
    /// as false
    #[serde(default)]
    pub is_favorite: bool,

    // Catalog-sourced display metadata
    #[serde(default)]
    pub year: Option<String>,
    /// Director for movies, first author for books
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub artwork_url: Option<String>,
    /// Rating string from the source catalog (e.g. the IMDB rating)
    #[serde(default)]
    pub catalog_rating: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MediaRecord {
    /// Whether this record contributes to rating-weighted tag scoring
    pub fn is_scorable(&self) -> bool {
        self.status == Status::Completed || self.user_rating.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(external_id: &str, kind: MediaKind) -> MediaRecord {
        MediaRecord {
            external_id: external_id.to_string(),
            title: "The Matrix".to_string(),
            kind,
            status: Status::WantToConsume,
            user_rating: None,
            tags: BTreeSet::new(),
            date_added: Utc::now(),
            date_completed: None,
            is_favorite: false,
            year: None,
            creator: None,
            synopsis: None,
            artwork_url: None,
            catalog_rating: None,
            notes: None,
        }
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&Status::WantToConsume).unwrap(),
            "\"want_to_consume\""
        );
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&Status::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn test_kind_collection_names() {
        assert_eq!(MediaKind::Movie.collection(), "movies");
        assert_eq!(MediaKind::Book.collection(), "books");
    }

    #[test]
    fn test_missing_optional_fields_deserialize() {
        // Rows written by the older schema carry neither favorites nor tags
        let json = r#"{
            "external_id": "tt0133093",
            "title": "The Matrix",
            "kind": "movie",
            "status": "completed",
            "user_rating": 9,
            "date_added": "2024-01-15T10:00:00Z",
            "date_completed": "2024-02-01T20:30:00Z"
        }"#;

        let record: MediaRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.external_id, "tt0133093");
        assert!(!record.is_favorite);
        assert!(record.tags.is_empty());
        assert_eq!(record.user_rating, Some(9));
    }

    #[test]
    fn test_scorable_records() {
        let mut r = record("tt0133093", MediaKind::Movie);
        assert!(!r.is_scorable());

        r.status = Status::Completed;
        assert!(r.is_scorable());

        r.status = Status::InProgress;
        r.user_rating = Some(7);
        assert!(r.is_scorable());
    }

    #[test]
    fn test_status_labels_follow_kind() {
        assert_eq!(Status::Completed.label(MediaKind::Movie), "Watched");
        assert_eq!(Status::Completed.label(MediaKind::Book), "Read");
        assert_eq!(
            Status::WantToConsume.label(MediaKind::Book),
            "Want to read"
        );
    }
}
