//! Raw TMDb response shapes.
//!
//! Every field is optional and lenient: a missing key, a `null`, or a value
//! of an unexpected JSON type all deserialize to `None`, so the normalizers
//! can treat "absent" as an ordinary case instead of a parse failure.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Like [`lenient`] but for lists: bad elements are dropped, not the whole list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Decodes a raw shape from a response body; never fails.
pub fn from_json<T: DeserializeOwned + Default>(value: &Value) -> T {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub results: Vec<SearchItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchItem {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub media_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub first_air_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub poster_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Genre {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MovieDetails {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "lenient")]
    pub tagline: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub credits: Option<Credits>,
    #[serde(default, deserialize_with = "lenient")]
    pub release_dates: Option<ReleaseDates>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Credits {
    #[serde(default, deserialize_with = "lenient_list")]
    pub cast: Vec<CastMember>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CastMember {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub character: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CrewMember {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub job: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReleaseDates {
    #[serde(default, deserialize_with = "lenient_list")]
    pub results: Vec<ReleaseCountry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReleaseCountry {
    #[serde(default, deserialize_with = "lenient")]
    pub iso_3166_1: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub release_dates: Vec<ReleaseCert>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReleaseCert {
    #[serde(default, deserialize_with = "lenient")]
    pub certification: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Images {
    #[serde(default, deserialize_with = "lenient_list")]
    pub posters: Vec<Image>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub backdrops: Vec<Image>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Image {
    #[serde(default, deserialize_with = "lenient")]
    pub file_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TvDetails {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub first_air_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub number_of_seasons: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub number_of_episodes: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub content_ratings: Option<ContentRatings>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContentRatings {
    #[serde(default, deserialize_with = "lenient_list")]
    pub results: Vec<RatingEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RatingEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub iso_3166_1: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rating: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PersonDetails {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub biography: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub profile_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub known_for_department: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PersonCredits {
    #[serde(default, deserialize_with = "lenient_list")]
    pub cast: Vec<PersonCredit>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub crew: Vec<PersonCredit>,
}

/// One movie credit of a person; `job` is only present on crew entries.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PersonCredit {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub popularity: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub job: Option<String>,
}
