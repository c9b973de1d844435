use reqwest::{Client as HttpClient, Method, RequestBuilder, Response};

use crate::{
    error::{AppError, AppResult},
    models::{MediaKind, MediaRecord},
};

use super::LibraryStore;

/// Remote Supabase store
///
/// Talks to the project's PostgREST endpoint (`rest/v1/movies`,
/// `rest/v1/books`); the table columns match the record fields exactly, so
/// rows serialize straight from `MediaRecord`. Rating bounds are also
/// enforced server-side by a table constraint.
pub struct SupabaseStore {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl SupabaseStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client: HttpClient::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, kind: MediaKind) -> String {
        format!("{}/rest/v1/{}", self.base_url, kind.collection())
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn check_status(response: Response) -> AppResult<Response> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Supabase returned status {}: {}",
                status, body
            )));
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl LibraryStore for SupabaseStore {
    async fn upsert(&self, record: &MediaRecord) -> AppResult<MediaRecord> {
        let response = self
            .request(Method::POST, &self.endpoint(record.kind))
            .query(&[("on_conflict", "external_id")])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&[record])
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let mut rows: Vec<MediaRecord> = response.json().await?;

        tracing::info!(
            external_id = %record.external_id,
            kind = %record.kind,
            "Record upserted to Supabase"
        );

        rows.pop()
            .ok_or_else(|| AppError::ExternalApi("Upsert returned no rows".to_string()))
    }

    async fn get(&self, external_id: &str, kind: MediaKind) -> AppResult<Option<MediaRecord>> {
        let filter = format!("eq.{}", external_id);
        let response = self
            .request(Method::GET, &self.endpoint(kind))
            .query(&[("select", "*"), ("external_id", filter.as_str())])
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let rows: Vec<MediaRecord> = response.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn list_all(&self, kind: MediaKind) -> AppResult<Vec<MediaRecord>> {
        let response = self
            .request(Method::GET, &self.endpoint(kind))
            .query(&[("select", "*"), ("order", "date_added.desc")])
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let rows: Vec<MediaRecord> = response.json().await?;

        tracing::debug!(kind = %kind, rows = rows.len(), "Listed records from Supabase");
        Ok(rows)
    }

    async fn delete(&self, external_id: &str, kind: MediaKind) -> AppResult<()> {
        // return=representation exposes whether anything matched; PostgREST
        // otherwise reports success for deletes that touched zero rows
        let filter = format!("eq.{}", external_id);
        let response = self
            .request(Method::DELETE, &self.endpoint(kind))
            .query(&[("external_id", filter.as_str())])
            .header("Prefer", "return=representation")
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let rows: Vec<MediaRecord> = response.json().await?;

        if rows.is_empty() {
            return Err(AppError::NotFound(format!(
                "No {} with id {}",
                kind, external_id
            )));
        }

        tracing::info!(external_id = %external_id, kind = %kind, "Record deleted from Supabase");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_per_kind() {
        let store = SupabaseStore::new("https://example.supabase.co", "key");
        assert_eq!(
            store.endpoint(MediaKind::Movie),
            "https://example.supabase.co/rest/v1/movies"
        );
        assert_eq!(
            store.endpoint(MediaKind::Book),
            "https://example.supabase.co/rest/v1/books"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let store = SupabaseStore::new("https://example.supabase.co/", "key");
        assert_eq!(
            store.endpoint(MediaKind::Movie),
            "https://example.supabase.co/rest/v1/movies"
        );
    }
}
