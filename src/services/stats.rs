//! Library statistics
//!
//! Pure aggregation over a library slice. Tag ranking here is plain
//! frequency, independent of the rating-weighted scoring the recommender
//! uses.

use std::collections::BTreeMap;

use crate::models::{MediaRecord, Status};

/// How many tags a summary reports
pub const TOP_TAG_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LibrarySummary {
    /// Every status is present, zero counts included
    pub counts_by_status: BTreeMap<Status, usize>,
    /// Mean of defined ratings; None when nothing is rated
    pub average_rating: Option<f64>,
    /// Most frequent tags, descending, ties by name ascending
    pub top_tags: Vec<TagCount>,
}

pub fn summarize(library: &[MediaRecord]) -> LibrarySummary {
    let mut counts_by_status: BTreeMap<Status, usize> =
        Status::ALL.iter().map(|s| (*s, 0)).collect();
    for record in library {
        *counts_by_status.entry(record.status).or_insert(0) += 1;
    }

    let ratings: Vec<f64> = library
        .iter()
        .filter_map(|r| r.user_rating)
        .map(f64::from)
        .collect();
    let average_rating = if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    };

    let mut tag_counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in library {
        for tag in &record.tags {
            *tag_counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    let mut top_tags: Vec<TagCount> = tag_counts
        .into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect();
    top_tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    top_tags.truncate(TOP_TAG_COUNT);

    LibrarySummary {
        counts_by_status,
        average_rating,
        top_tags,
    }
}

#[cfg(test)]
mod tests {
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
    fn test_empty_library_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary.average_rating, None);
        assert!(summary.top_tags.is_empty());
        assert_eq!(summary.counts_by_status.len(), Status::ALL.len());
        assert!(summary.counts_by_status.values().all(|c| *c == 0));
    }

    #[test]
    fn test_counts_include_zero_statuses() {
        let library = vec![record("tt1", &[], Status::Completed, None)];

        let summary = summarize(&library);
        assert_eq!(summary.counts_by_status[&Status::Completed], 1);
        assert_eq!(summary.counts_by_status[&Status::InProgress], 0);
        assert_eq!(summary.counts_by_status[&Status::WantToConsume], 0);
    }

    #[test]
    fn test_average_rating_is_mean_of_defined_ratings() {
        let library = vec![
            record("tt1", &[], Status::Completed, Some(9)),
            record("tt2", &[], Status::Completed, Some(6)),
            record("tt3", &[], Status::WantToConsume, None),
        ];

        let summary = summarize(&library);
        assert_eq!(summary.average_rating, Some(7.5));
    }

    #[test]
    fn test_top_tags_use_plain_frequency() {
        // Comedy appears twice with low ratings, Drama once with a high one;
        // frequency ranking ignores the ratings entirely
        let library = vec![
            record("tt1", &["Comedy"], Status::Completed, Some(1)),
            record("tt2", &["Comedy"], Status::Completed, Some(2)),
            record("tt3", &["Drama"], Status::Completed, Some(10)),
        ];

        let summary = summarize(&library);
        assert_eq!(summary.top_tags[0].tag, "Comedy");
        assert_eq!(summary.top_tags[0].count, 2);
        assert_eq!(summary.top_tags[1].tag, "Drama");
    }

    #[test]
    fn test_top_tags_truncated() {
        let library: Vec<MediaRecord> = (0..8)
            .map(|i| {
                record(
                    &format!("tt{}", i),
                    &[&format!("Tag{}", i)],
                    Status::Completed,
                    None,
                )
            })
            .collect();

        let summary = summarize(&library);
        assert_eq!(summary.top_tags.len(), TOP_TAG_COUNT);
    }

    #[test]
    fn test_tag_ties_break_alphabetically() {
        let library = vec![
            record("tt1", &["Western"], Status::Completed, None),
            record("tt2", &["Drama"], Status::Completed, None),
        ];

        let summary = summarize(&library);
        assert_eq!(summary.top_tags[0].tag, "Drama");
        assert_eq!(summary.top_tags[1].tag, "Western");
    }
}
