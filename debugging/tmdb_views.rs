//! Fetch one TMDb resource and print the normalized view model as JSON.
//! Usage:
//!   cargo run --bin tmdb_views -- search <query...>
//!   cargo run --bin tmdb_views -- movie <tmdb_id>
//!   cargo run --bin tmdb_views -- tv <tmdb_id>
//!   cargo run --bin tmdb_views -- person <tmdb_id>
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use cineview::config::TmdbConfig;
use cineview::credits::group_movie_credits;
use cineview::tmdb::{TmdbApi, TmdbClient};
use cineview::views::{normalize_movie, normalize_person, normalize_search, normalize_tv, ImageUrls};
use dotenvy::dotenv;
use serde_json::{json, Value};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Resource {
    Search,
    Movie,
    Tv,
    Person,
}

impl FromStr for Resource {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "search" => Ok(Resource::Search),
            "movie" => Ok(Resource::Movie),
            "tv" => Ok(Resource::Tv),
            "person" => Ok(Resource::Person),
            _ => Err(anyhow::anyhow!(
                "resource must be 'search', 'movie', 'tv' or 'person'"
            )),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args: Vec<String> = env::args().skip(1).collect();
    let Some((kind, rest)) = args.split_first() else {
        anyhow::bail!("usage: tmdb_views <search|movie|tv|person> <query or tmdb_id>");
    };
    let kind = Resource::from_str(kind)?;
    if rest.is_empty() {
        anyhow::bail!("missing query or tmdb_id");
    }

    let config = TmdbConfig::from_env();
    let images = ImageUrls::new(config.image_base.clone());
    let client = TmdbClient::new(config)?;

    let view = match kind {
        Resource::Search => {
            let query = rest.join(" ");
            let body = client.search_multi(query.trim()).await?;
            serde_json::to_value(normalize_search(&body, &images))?
        }
        Resource::Movie => {
            let id = parse_id(rest)?;
            let body = client.movie_details(id).await?;
            serde_json::to_value(normalize_movie(&body, &images))?
        }
        Resource::Tv => {
            let id = parse_id(rest)?;
            let body = client.tv_details(id).await?;
            serde_json::to_value(normalize_tv(&body, &images))?
        }
        Resource::Person => {
            let id = parse_id(rest)?;
            let details = client.person_details(id).await?;
            let credits = group_movie_credits(&client.person_movie_credits(id).await?, &images);
            let person = normalize_person(&details, credits.known_credit_count, &images);
            json!({ "person": person, "credits": credits })
        }
    };

    print_json(&view)
}

fn parse_id(rest: &[String]) -> Result<u64> {
    rest.first()
        .context("missing tmdb_id")?
        .parse()
        .context("tmdb_id must be an integer")
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
