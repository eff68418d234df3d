use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

mod client;
pub mod raw;

pub use client::TmdbClient;

/// The TMDb resources this application reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    SearchMulti,
    MovieDetails,
    MovieImages,
    PersonDetails,
    PersonMovieCredits,
    TvDetails,
    TvImages,
}

impl Endpoint {
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::SearchMulti => "search/multi",
            Endpoint::MovieDetails => "movie details",
            Endpoint::MovieImages => "movie images",
            Endpoint::PersonDetails => "person details",
            Endpoint::PersonMovieCredits => "person movie credits",
            Endpoint::TvDetails => "tv details",
            Endpoint::TvImages => "tv images",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fetch-level failures. Transport errors and non-2xx statuses are not told apart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TmdbError {
    #[error("TMDb {0} request failed")]
    RequestFailed(Endpoint),
    #[error("TMDb {0} returned a body that is not JSON")]
    Decode(Endpoint),
}

impl TmdbError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            TmdbError::RequestFailed(e) | TmdbError::Decode(e) => *e,
        }
    }
}

/// One call per resource; each returns the response body verbatim.
#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn search_multi(&self, query: &str) -> Result<Value, TmdbError>;
    async fn movie_details(&self, movie_id: u64) -> Result<Value, TmdbError>;
    async fn movie_images(&self, movie_id: u64) -> Result<Value, TmdbError>;
    async fn person_details(&self, person_id: u64) -> Result<Value, TmdbError>;
    async fn person_movie_credits(&self, person_id: u64) -> Result<Value, TmdbError>;
    async fn tv_details(&self, tv_id: u64) -> Result<Value, TmdbError>;
    async fn tv_images(&self, tv_id: u64) -> Result<Value, TmdbError>;
}
