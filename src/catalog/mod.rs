/// External catalog abstraction
///
/// Each catalog turns a free-text query into candidate records: OMDB for
/// movies, Open Library for books. Candidates carry enough fields to
/// construct a library record; catalogs that need a second request for the
/// full metadata implement `enrich`.
use crate::{error::AppResult, models::Candidate};

pub mod omdb;
pub mod open_library;

pub use omdb::OmdbClient;
pub use open_library::OpenLibraryClient;

#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Catalog name for logging and prompts
    fn name(&self) -> &'static str;

    /// Search for candidates by title
    ///
    /// An empty library of matches is a valid result; only transport and
    /// remote-API failures are errors.
    async fn search(&self, query: &str) -> AppResult<Vec<Candidate>>;

    /// Fill in fields the search endpoint does not return
    ///
    /// Called once for the candidate the user picked. The default is a
    /// no-op for catalogs whose search results are already complete.
    async fn enrich(&self, candidate: Candidate) -> AppResult<Candidate> {
        Ok(candidate)
    }
}
