/// Open Library book catalog
///
/// A single `search.json` request carries everything a record needs, so no
/// enrichment step is required. No credential either; the endpoint is public.
use std::collections::BTreeSet;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Candidate, MediaKind},
};

use super::Catalog;

const COVERS_URL: &str = "https://covers.openlibrary.org/b/olid";
const SEARCH_LIMIT: usize = 10;
const MAX_SUBJECTS: usize = 5;

#[derive(Clone)]
pub struct OpenLibraryClient {
    http_client: HttpClient,
    api_url: String,
}

impl OpenLibraryClient {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl Catalog for OpenLibraryClient {
    fn name(&self) -> &'static str {
        "Open Library"
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Candidate>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/search.json", self.api_url.trim_end_matches('/'));
        let limit = SEARCH_LIMIT.to_string();
        let response = self
            .http_client
            .get(&url)
            .query(&[("q", query), ("limit", limit.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Open Library returned status {}: {}",
                status, body
            )));
        }

        let search_response: OpenLibrarySearchResponse = response.json().await?;
        let candidates: Vec<Candidate> = search_response
            .docs
            .into_iter()
            .filter_map(doc_to_candidate)
            .collect();

        tracing::info!(
            query = %query,
            results = candidates.len(),
            catalog = "open_library",
            "Book search completed"
        );

        Ok(candidates)
    }
}

#[derive(Debug, Deserialize)]
struct OpenLibrarySearchResponse {
    #[serde(default)]
    docs: Vec<OpenLibraryDoc>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenLibraryDoc {
    /// Work key, e.g. "/works/OL27448W"; docs without one are skipped
    key: Option<String>,
    title: Option<String>,
    #[serde(default)]
    author_name: Vec<String>,
    first_publish_year: Option<i64>,
    #[serde(default)]
    subject: Vec<String>,
}

fn doc_to_candidate(doc: OpenLibraryDoc) -> Option<Candidate> {
    let olid = doc.key?.trim_start_matches("/works/").to_string();

    let tags: BTreeSet<String> = doc
        .subject
        .into_iter()
        .take(MAX_SUBJECTS)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    Some(Candidate {
        artwork_url: Some(format!("{}/{}-M.jpg", COVERS_URL, olid)),
        external_id: olid,
        kind: MediaKind::Book,
        title: doc.title.unwrap_or_else(|| "Unknown Title".to_string()),
        year: doc.first_publish_year.map(|y| y.to_string()),
        creator: doc.author_name.into_iter().next(),
        synopsis: None,
        catalog_rating: None,
        tags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> OpenLibraryDoc {
        OpenLibraryDoc {
            key: Some("/works/OL27448W".to_string()),
            title: Some("The Lord of the Rings".to_string()),
            author_name: vec!["J.R.R. Tolkien".to_string(), "Someone Else".to_string()],
            first_publish_year: Some(1954),
            subject: vec!["Fantasy".to_string(), "Adventure".to_string()],
        }
    }

    #[test]
    fn test_doc_deserialization() {
        let json = r#"{
            "key": "/works/OL27448W",
            "title": "The Lord of the Rings",
            "author_name": ["J.R.R. Tolkien"],
            "first_publish_year": 1954,
            "subject": ["Fantasy", "Fiction"]
        }"#;

        let doc: OpenLibraryDoc = serde_json::from_str(json).unwrap();
        assert_eq!(doc.key, Some("/works/OL27448W".to_string()));
        assert_eq!(doc.first_publish_year, Some(1954));
    }

    #[test]
    fn test_doc_to_candidate_strips_work_prefix() {
        let candidate = doc_to_candidate(doc()).unwrap();
        assert_eq!(candidate.external_id, "OL27448W");
        assert_eq!(candidate.kind, MediaKind::Book);
        assert_eq!(candidate.creator, Some("J.R.R. Tolkien".to_string()));
        assert_eq!(candidate.year, Some("1954".to_string()));
        assert_eq!(
            candidate.artwork_url,
            Some("https://covers.openlibrary.org/b/olid/OL27448W-M.jpg".to_string())
        );
    }

    #[test]
    fn test_doc_without_work_key_is_skipped() {
        let mut d = doc();
        d.key = None;
        assert!(doc_to_candidate(d).is_none());
    }

    #[test]
    fn test_subjects_are_capped() {
        let mut d = doc();
        d.subject = (0..10).map(|i| format!("Subject {}", i)).collect();

        let candidate = doc_to_candidate(d).unwrap();
        assert_eq!(candidate.tags.len(), MAX_SUBJECTS);
    }

    #[test]
    fn test_missing_title_gets_placeholder() {
        let mut d = doc();
        d.title = None;
        let candidate = doc_to_candidate(d).unwrap();
        assert_eq!(candidate.title, "Unknown Title");
    }
}
