//! Genre-based recommendation engine
//!
//! A pure function of the supplied library slice: no store access, no
//! catalog calls, no side effects. Preference weights come from completed
//! and rated records; candidates are the not-yet-completed records whose
//! tags match those weights. All ranking is deterministic.

use std::collections::BTreeMap;

use crate::models::{MediaRecord, Status};

/// Weight contributed by an unrated record
pub const DEFAULT_RATING_WEIGHT: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TagScore {
    pub tag: String,
    pub score: f64,
}

/// A library record suggested for consumption next
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub external_id: String,
    pub title: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Recommendations {
    /// Preferred tags, highest weighted score first
    pub top_tags: Vec<TagScore>,
    /// Unconsumed records ranked by how well their tags match
    pub candidates: Vec<Suggestion>,
}

/// Per-tag preference weights
///
/// A record participates when it is completed or carries a rating; it adds
/// its rating (or the neutral default) to each of its tags.
pub fn tag_weights(library: &[MediaRecord]) -> BTreeMap<String, f64> {
    let mut weights = BTreeMap::new();

    for record in library.iter().filter(|r| r.is_scorable()) {
        let weight = record
            .user_rating
            .map(f64::from)
            .unwrap_or(DEFAULT_RATING_WEIGHT);
        for tag in &record.tags {
            *weights.entry(tag.clone()).or_insert(0.0) += weight;
        }
    }

    weights
}

/// Ranked tag suggestions and candidate titles for a library
///
/// An empty or signal-free library yields an empty result, never an error.
/// Ties break ascending by tag name (and by title, then id, for candidates)
/// so repeated calls return identical order.
pub fn recommend(library: &[MediaRecord]) -> Recommendations {
    let weights = tag_weights(library);
    if weights.is_empty() {
        return Recommendations::default();
    }

    let mut top_tags: Vec<TagScore> = weights
        .iter()
        .map(|(tag, score)| TagScore {
            tag: tag.clone(),
            score: *score,
        })
        .collect();
    top_tags.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.tag.cmp(&b.tag))
    });

    let mut candidates: Vec<Suggestion> = library
        .iter()
        .filter(|r| r.status != Status::Completed)
        .filter_map(|record| {
            let score: f64 = record.tags.iter().filter_map(|t| weights.get(t)).sum();
            (score > 0.0).then(|| Suggestion {
                external_id: record.external_id.clone(),
                title: record.title.clone(),
                score,
            })
        })
        .collect();
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.external_id.cmp(&b.external_id))
    });

    Recommendations {
        top_tags,
        candidates,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;

    use super::*;
    use crate::models::MediaKind;

    fn record(id: &str, tags: &[&str], status: Status, rating: Option<u8>) -> MediaRecord {
        MediaRecord {
            external_id: id.to_string(),
            title: format!("Title {}", id),
            kind: MediaKind::Movie,
            status,
            user_rating: rating,
            tags: tags.iter().map(|t| t.to_string()).collect(),
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
    fn test_empty_library_yields_empty_recommendations() {
        let result = recommend(&[]);
        assert!(result.top_tags.is_empty());
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn test_rating_weights_order_tags() {
        // Drama: 9 + 5 = 14, Comedy: 5
        let library = vec![
            record("tt1", &["Drama"], Status::Completed, Some(9)),
            record("tt2", &["Drama", "Comedy"], Status::Completed, Some(5)),
        ];

        let result = recommend(&library);
        assert_eq!(result.top_tags[0].tag, "Drama");
        assert_eq!(result.top_tags[0].score, 14.0);
        assert_eq!(result.top_tags[1].tag, "Comedy");
        assert_eq!(result.top_tags[1].score, 5.0);
    }

    #[test]
    fn test_unrated_completed_record_uses_default_weight() {
        let library = vec![record("tt1", &["Horror"], Status::Completed, None)];

        let weights = tag_weights(&library);
        assert_eq!(weights.get("Horror"), Some(&DEFAULT_RATING_WEIGHT));
    }

    #[test]
    fn test_rated_unfinished_record_contributes() {
        let library = vec![record("tt1", &["Horror"], Status::InProgress, Some(8))];

        let weights = tag_weights(&library);
        assert_eq!(weights.get("Horror"), Some(&8.0));
    }

    #[test]
    fn test_unrated_unfinished_record_is_ignored() {
        let library = vec![record("tt1", &["Horror"], Status::WantToConsume, None)];
        assert!(tag_weights(&library).is_empty());
    }

    #[test]
    fn test_tag_ties_break_by_name() {
        let library = vec![record("tt1", &["Zebra", "Alpha"], Status::Completed, Some(7))];

        let result = recommend(&library);
        assert_eq!(result.top_tags[0].tag, "Alpha");
        assert_eq!(result.top_tags[1].tag, "Zebra");
    }

    #[test]
    fn test_candidates_are_unconsumed_tag_matches() {
        let library = vec![
            record("tt1", &["Drama"], Status::Completed, Some(9)),
            record("tt2", &["Drama"], Status::WantToConsume, None),
            record("tt3", &["Western"], Status::WantToConsume, None),
        ];

        let result = recommend(&library);
        let ids: Vec<&str> = result
            .candidates
            .iter()
            .map(|c| c.external_id.as_str())
            .collect();
        // tt3 shares no preferred tag, tt1 is already watched
        assert_eq!(ids, vec!["tt2"]);
    }

    #[test]
    fn test_recommendation_is_deterministic() {
        let library = vec![
            record("tt1", &["Drama", "Crime"], Status::Completed, Some(8)),
            record("tt2", &["Crime"], Status::Completed, Some(8)),
            record("tt3", &["Drama"], Status::WantToConsume, None),
            record("tt4", &["Crime"], Status::InProgress, None),
        ];

        let first = recommend(&library);
        for _ in 0..10 {
            assert_eq!(recommend(&library), first);
        }
    }
}
