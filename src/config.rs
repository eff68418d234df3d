use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use tracing::{info, warn};

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/original";
const DEFAULT_ADDR: &str = "0.0.0.0:3146";

/// Everything an outbound TMDb request needs. Passed to the client at construction.
#[derive(Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub api_base: String,
    pub image_base: String,
}

impl std::fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("image_base", &self.image_base)
            .finish()
    }
}

impl TmdbConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_image_base(mut self, base: impl Into<String>) -> Self {
        self.image_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Reads `TMDB_API_KEY` plus the optional base overrides.
    ///
    /// A missing key is not fatal: requests will be rejected upstream and
    /// surface as ordinary request failures.
    pub fn from_env() -> Self {
        let api_key = env::var("TMDB_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            warn!("TMDB_API_KEY is not set; every TMDb request will fail");
        }
        let mut config = Self::new(api_key.trim());
        if let Some(base) = non_empty_var("TMDB_API_BASE") {
            config = config.with_api_base(base);
        }
        if let Some(base) = non_empty_var("TMDB_IMAGE_BASE") {
            config = config.with_image_base(base);
        }
        config
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tmdb: TmdbConfig,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let raw_addr = non_empty_var("CINEVIEW_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let bind_addr = raw_addr
            .parse()
            .with_context(|| format!("CINEVIEW_ADDR is not a socket address: {raw_addr}"))?;
        let tmdb = TmdbConfig::from_env();
        info!(api_base = %tmdb.api_base, "Configuration loaded");
        Ok(Self { tmdb, bind_addr })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_overrides_drop_trailing_slash() {
        let config = TmdbConfig::new("key")
            .with_api_base("http://localhost:9000/3/")
            .with_image_base("http://img.local/t/p/w500/");
        assert_eq!(config.api_base, "http://localhost:9000/3");
        assert_eq!(config.image_base, "http://img.local/t/p/w500");
    }

    #[test]
    fn debug_output_hides_the_key() {
        let rendered = format!("{:?}", TmdbConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
