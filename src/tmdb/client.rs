use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::{Endpoint, TmdbApi, TmdbError};
use crate::config::TmdbConfig;

const LANGUAGE: &str = "en-US";
const IMAGE_LANGUAGES: &str = "en,null";

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Result<Self> {
        let user_agent = format!("cineview/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDb HTTP client")?;
        Ok(Self { client, config })
    }

    /// Percent-encodes `params` onto `path` and appends the API key last.
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>();
        query.push(format!("api_key={}", urlencoding::encode(&self.config.api_key)));
        format!("{}{}?{}", self.config.api_base, path, query.join("&"))
    }

    /// One GET against the API base. Non-2xx and transport errors both become
    /// `RequestFailed`; the body is returned as parsed, without any shape check.
    pub async fn get_json(
        &self,
        endpoint: Endpoint,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, TmdbError> {
        debug!(endpoint = %endpoint, path, "TMDb request");
        let url = self.build_url(path, params);
        let res = self.client.get(&url).send().await.map_err(|e| {
            warn!(endpoint = %endpoint, error = %e.without_url(), "TMDb request failed");
            TmdbError::RequestFailed(endpoint)
        })?;
        let status = res.status();
        if !status.is_success() {
            warn!(endpoint = %endpoint, status = %status, "TMDb returned an error status");
            return Err(TmdbError::RequestFailed(endpoint));
        }
        let text = res.text().await.map_err(|e| {
            warn!(endpoint = %endpoint, error = %e.without_url(), "Reading TMDb body failed");
            TmdbError::RequestFailed(endpoint)
        })?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(endpoint = %endpoint, error = %e, "TMDb body is not JSON");
            TmdbError::Decode(endpoint)
        })
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn search_multi(&self, query: &str) -> Result<Value, TmdbError> {
        self.get_json(
            Endpoint::SearchMulti,
            "/search/multi",
            &[
                ("query", query),
                ("include_adult", "false"),
                ("language", LANGUAGE),
                ("page", "1"),
            ],
        )
        .await
    }

    async fn movie_details(&self, movie_id: u64) -> Result<Value, TmdbError> {
        self.get_json(
            Endpoint::MovieDetails,
            &format!("/movie/{movie_id}"),
            &[
                ("language", LANGUAGE),
                ("append_to_response", "credits,release_dates"),
            ],
        )
        .await
    }

    async fn movie_images(&self, movie_id: u64) -> Result<Value, TmdbError> {
        self.get_json(
            Endpoint::MovieImages,
            &format!("/movie/{movie_id}/images"),
            &[("include_image_language", IMAGE_LANGUAGES)],
        )
        .await
    }

    async fn person_details(&self, person_id: u64) -> Result<Value, TmdbError> {
        self.get_json(
            Endpoint::PersonDetails,
            &format!("/person/{person_id}"),
            &[("language", LANGUAGE)],
        )
        .await
    }

    async fn person_movie_credits(&self, person_id: u64) -> Result<Value, TmdbError> {
        self.get_json(
            Endpoint::PersonMovieCredits,
            &format!("/person/{person_id}/movie_credits"),
            &[("language", LANGUAGE)],
        )
        .await
    }

    async fn tv_details(&self, tv_id: u64) -> Result<Value, TmdbError> {
        self.get_json(
            Endpoint::TvDetails,
            &format!("/tv/{tv_id}"),
            &[
                ("language", LANGUAGE),
                ("append_to_response", "content_ratings"),
            ],
        )
        .await
    }

    async fn tv_images(&self, tv_id: u64) -> Result<Value, TmdbError> {
        self.get_json(
            Endpoint::TvImages,
            &format!("/tv/{tv_id}/images"),
            &[("include_image_language", IMAGE_LANGUAGES)],
        )
        .await
    }
}
