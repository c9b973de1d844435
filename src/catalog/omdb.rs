/// OMDB movie catalog
///
/// Search is a two-step flow: `?s=` returns thin results (title, year,
/// poster), and `?i=` fetches the full record for the picked title, which is
/// where genre, director, plot and the IMDB rating come from. OMDB signals
/// application errors in the body (`Response: "False"`) with a 200 status,
/// and uses the literal string "N/A" for absent fields.
use std::collections::BTreeSet;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Candidate, MediaKind},
};

use super::Catalog;

#[derive(Clone)]
pub struct OmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    /// Builds the client from configuration
    ///
    /// An absent key is a configuration error the caller reports inline, not
    /// a crash.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let api_key = config.omdb_api_key.clone().ok_or_else(|| {
            AppError::MissingConfig(
                "OMDB_API_KEY is not set; movie search is unavailable. \
                 Get a free key at https://www.omdbapi.com/apikey.aspx"
                    .to_string(),
            )
        })?;

        Ok(Self::new(api_key, config.omdb_api_url.clone()))
    }

    async fn fetch_details(&self, imdb_id: &str) -> AppResult<OmdbDetails> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("i", imdb_id),
                ("plot", "short"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDB returned status {}: {}",
                status, body
            )));
        }

        let details: OmdbDetails = response.json().await?;
        if details.response != "True" {
            return Err(AppError::ExternalApi(
                details.error.unwrap_or_else(|| "Unknown OMDB error".to_string()),
            ));
        }

        Ok(details)
    }
}

#[async_trait::async_trait]
impl Catalog for OmdbClient {
    fn name(&self) -> &'static str {
        "OMDB"
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Candidate>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("s", query),
                ("type", "movie"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDB returned status {}: {}",
                status, body
            )));
        }

        let search_response: OmdbSearchResponse = response.json().await?;
        let items = search_results(search_response)?;
        let candidates: Vec<Candidate> = items.into_iter().map(Candidate::from).collect();

        tracing::info!(
            query = %query,
            results = candidates.len(),
            catalog = "omdb",
            "Movie search completed"
        );

        Ok(candidates)
    }

    async fn enrich(&self, candidate: Candidate) -> AppResult<Candidate> {
        let details = self.fetch_details(&candidate.external_id).await?;
        candidate_from_details(details)
    }
}

/// OMDB `?s=` response envelope
#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct OmdbSearchItem {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

/// OMDB `?i=` detail response
#[derive(Debug, Deserialize)]
struct OmdbDetails {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
}

/// Unwraps the search envelope; "Movie not found!" is an empty result
fn search_results(response: OmdbSearchResponse) -> AppResult<Vec<OmdbSearchItem>> {
    if response.response == "False" {
        let error = response.error.unwrap_or_else(|| "Unknown OMDB error".to_string());
        if error == "Movie not found!" {
            return Ok(Vec::new());
        }
        return Err(AppError::ExternalApi(error));
    }

    Ok(response.search)
}

/// Maps OMDB's "N/A" placeholder (and empty strings) to None
fn clean(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "N/A")
}

impl From<OmdbSearchItem> for Candidate {
    fn from(item: OmdbSearchItem) -> Self {
        Candidate {
            external_id: item.imdb_id,
            kind: MediaKind::Movie,
            title: item.title,
            year: clean(item.year),
            creator: None,
            synopsis: None,
            artwork_url: clean(item.poster),
            catalog_rating: None,
            tags: BTreeSet::new(),
        }
    }
}

fn candidate_from_details(details: OmdbDetails) -> AppResult<Candidate> {
    let external_id = details
        .imdb_id
        .ok_or_else(|| AppError::ExternalApi("OMDB detail response missing imdbID".to_string()))?;
    let title = details
        .title
        .ok_or_else(|| AppError::ExternalApi("OMDB detail response missing Title".to_string()))?;

    let tags: BTreeSet<String> = clean(details.genre)
        .map(|genre| {
            genre
                .split(',')
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(Candidate {
        external_id,
        kind: MediaKind::Movie,
        title,
        year: clean(details.year),
        creator: clean(details.director),
        synopsis: clean(details.plot),
        artwork_url: clean(details.poster),
        catalog_rating: clean(details.imdb_rating),
        tags,
    })
}
