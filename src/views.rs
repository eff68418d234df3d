use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::tmdb::raw::{self, from_json};

pub const YEAR_UNAVAILABLE: &str = "Release Date Unavailable";
pub const RUNTIME_UNAVAILABLE: &str = "Runtime Not Available";
pub const SUMMARY_UNAVAILABLE: &str = "No Summary Available";

const CAST_LIMIT: usize = 20;
const NOTABLE_CREW_JOBS: &[&str] = &[
    "Director",
    "Producer",
    "Writer",
    "Casting",
    "Editor",
    "Screenplay",
    "Original Writer",
    "Cinematography",
    "Novel",
    "Executive Producer",
    "Original Music Composer",
    "Costume Design",
    "Sound Designer",
    "Visual Effects Supervisor",
    "Visual Effects Producer",
    "Lighting",
    "Production Design",
];

/// Turns relative TMDb image paths into absolute CDN URLs.
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base: String,
}

impl ImageUrls {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: Option<&str>) -> Option<String> {
        let path = path.map(str::trim).filter(|p| !p.is_empty())?;
        if path.starts_with('/') {
            Some(format!("{}{}", self.base, path))
        } else {
            Some(format!("{}/{}", self.base, path))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
    Person,
}

impl MediaType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(MediaType::Movie),
            "tv" => Some(MediaType::Tv),
            "person" => Some(MediaType::Person),
            _ => None,
        }
    }

    /// Only movies and shows get a row in the results list.
    pub fn is_listable(self) -> bool {
        matches!(self, MediaType::Movie | MediaType::Tv)
    }

    pub fn route(self, id: u64) -> String {
        match self {
            MediaType::Movie => format!("/movie/{id}"),
            MediaType::Tv => format!("/tv/{id}"),
            MediaType::Person => format!("/person/{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub id: u64,
    pub media_type: MediaType,
    pub title: Option<String>,
    /// Four-digit year, or empty when the result carries no date.
    pub year: String,
    pub poster_url: Option<String>,
    pub route: String,
}

pub fn retain_listable(items: Vec<SearchResultItem>) -> Vec<SearchResultItem> {
    items
        .into_iter()
        .filter(|item| item.media_type.is_listable())
        .collect()
}

pub fn normalize_search(body: &Value, images: &ImageUrls) -> Vec<SearchResultItem> {
    let response: raw::SearchResponse = from_json(body);
    let items = response
        .results
        .into_iter()
        .filter_map(|item| {
            let id = item.id?;
            let media_type = item.media_type.as_deref().and_then(MediaType::parse)?;
            let year = non_empty(item.release_date.as_deref())
                .or_else(|| non_empty(item.first_air_date.as_deref()))
                .map(year_prefix)
                .unwrap_or_default();
            Some(SearchResultItem {
                id,
                media_type,
                title: item.title.or(item.name),
                year,
                poster_url: images.url(item.poster_path.as_deref()),
                route: media_type.route(id),
            })
        })
        .collect();
    retain_listable(items)
}

/// Runtime in minutes as "2h 49m" / "45m". Zero is a real runtime.
pub fn format_runtime(minutes: Option<u32>) -> String {
    let Some(minutes) = minutes else {
        return RUNTIME_UNAVAILABLE.to_string();
    };
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

/// Poster and backdrop currently on display, plus how many of each can be cycled through.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub poster_choices: usize,
    pub backdrop_choices: usize,
}

/// Page-local image index chosen by the viewer. A hint that is not a
/// non-negative integer reads as 0.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ArtworkSelection {
    #[serde(default, deserialize_with = "index_hint")]
    pub poster: usize,
    #[serde(default, deserialize_with = "index_hint")]
    pub backdrop: usize,
}

fn index_hint<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.trim().parse().ok()).unwrap_or(0))
}

/// Picks the selected poster/backdrop out of an images response. Indexes wrap
/// around; an empty or missing list keeps whatever `fallback` already holds.
pub fn select_artwork(
    images_body: Option<&Value>,
    selection: ArtworkSelection,
    fallback: Artwork,
    images: &ImageUrls,
) -> Artwork {
    let Some(body) = images_body else {
        return fallback;
    };
    let parsed: raw::Images = from_json(body);
    let posters = image_paths(&parsed.posters);
    let backdrops = image_paths(&parsed.backdrops);
    Artwork {
        poster_url: pick(&posters, selection.poster)
            .and_then(|p| images.url(Some(p)))
            .or(fallback.poster_url),
        backdrop_url: pick(&backdrops, selection.backdrop)
            .and_then(|p| images.url(Some(p)))
            .or(fallback.backdrop_url),
        poster_choices: posters.len(),
        backdrop_choices: backdrops.len(),
    }
}

fn image_paths(list: &[raw::Image]) -> Vec<&str> {
    list.iter()
        .filter_map(|i| non_empty(i.file_path.as_deref()))
        .collect()
}

fn pick<'a>(paths: &[&'a str], index: usize) -> Option<&'a str> {
    if paths.is_empty() {
        return None;
    }
    paths.get(index % paths.len()).copied()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastEntry {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub character: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewEntry {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub job: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub year: String,
    #[serde(flatten)]
    pub artwork: Artwork,
    pub summary_text: String,
    pub runtime_formatted: String,
    pub genre_names: Vec<String>,
    pub director_name: Option<String>,
    pub tagline_text: Option<String>,
    pub certification: Option<String>,
    pub cast: Vec<CastEntry>,
    pub crew: Vec<CrewEntry>,
}

pub fn normalize_movie(body: &Value, images: &ImageUrls) -> MovieDetail {
    let movie: raw::MovieDetails = from_json(body);
    let credits = movie.credits.unwrap_or_default();

    let director_name = credits
        .crew
        .iter()
        .find(|c| c.job.as_deref() == Some("Director"))
        .and_then(|c| c.name.clone());
    let certification = movie
        .release_dates
        .as_ref()
        .and_then(us_release_certification);

    let cast = credits
        .cast
        .into_iter()
        .take(CAST_LIMIT)
        .map(|c| CastEntry {
            id: c.id,
            name: c.name,
            character: c.character.filter(|s| !s.trim().is_empty()),
        })
        .collect();
    let crew = credits
        .crew
        .into_iter()
        .filter_map(|c| {
            let job = c.job.filter(|j| NOTABLE_CREW_JOBS.contains(&j.as_str()))?;
            Some(CrewEntry {
                id: c.id,
                name: c.name,
                job,
            })
        })
        .collect();

    MovieDetail {
        id: movie.id,
        title: movie.title,
        year: details_year(movie.release_date.as_deref()),
        artwork: Artwork {
            poster_url: images.url(movie.poster_path.as_deref()),
            backdrop_url: images.url(movie.backdrop_path.as_deref()),
            ..Artwork::default()
        },
        summary_text: non_empty(movie.overview.as_deref())
            .unwrap_or(SUMMARY_UNAVAILABLE)
            .to_string(),
        runtime_formatted: format_runtime(movie.runtime),
        genre_names: genre_names(movie.genres),
        director_name,
        tagline_text: movie.tagline.filter(|t| !t.trim().is_empty()),
        certification,
        cast,
        crew,
    }
}

fn us_release_certification(dates: &raw::ReleaseDates) -> Option<String> {
    dates
        .results
        .iter()
        .find(|r| r.iso_3166_1.as_deref() == Some("US"))
        .and_then(|r| {
            r.release_dates
                .iter()
                .find_map(|rd| non_empty(rd.certification.as_deref()))
        })
        .map(str::to_string)
}

fn genre_names(genres: Vec<raw::Genre>) -> Vec<String> {
    genres
        .into_iter()
        .filter_map(|g| g.name)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TvDetail {
    pub id: Option<u64>,
    pub title: Option<String>,
    #[serde(flatten)]
    pub artwork: Artwork,
    pub year: String,
    pub certification: Option<String>,
    pub season_count: Option<u32>,
    pub episode_count: Option<u32>,
    pub status: Option<String>,
}

pub fn normalize_tv(body: &Value, images: &ImageUrls) -> TvDetail {
    let tv: raw::TvDetails = from_json(body);
    let certification = tv.content_ratings.as_ref().and_then(|ratings| {
        ratings
            .results
            .iter()
            .find(|r| r.iso_3166_1.as_deref() == Some("US"))
            .and_then(|r| non_empty(r.rating.as_deref()))
            .map(str::to_string)
    });
    TvDetail {
        id: tv.id,
        title: tv.name,
        artwork: Artwork {
            poster_url: images.url(tv.poster_path.as_deref()),
            backdrop_url: images.url(tv.backdrop_path.as_deref()),
            ..Artwork::default()
        },
        year: details_year(tv.first_air_date.as_deref()),
        certification,
        season_count: tv.number_of_seasons,
        episode_count: tv.number_of_episodes,
        status: tv.status,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetail {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profile_url: Option<String>,
    pub known_for_department: Option<String>,
    pub known_credit_count: usize,
}

/// `known_credit_count` comes from the grouped movie credits of the same person.
pub fn normalize_person(body: &Value, known_credit_count: usize, images: &ImageUrls) -> PersonDetail {
    let person: raw::PersonDetails = from_json(body);
    PersonDetail {
        id: person.id,
        name: person.name,
        bio: person.biography.filter(|b| !b.trim().is_empty()),
        profile_url: images.url(person.profile_path.as_deref()),
        known_for_department: person.known_for_department,
        known_credit_count,
    }
}

fn details_year(date: Option<&str>) -> String {
    non_empty(date)
        .map(year_prefix)
        .unwrap_or_else(|| YEAR_UNAVAILABLE.to_string())
}

fn year_prefix(date: &str) -> String {
    date.chars().take(4).collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn images() -> ImageUrls {
        ImageUrls::new("https://image.tmdb.org/t/p/original")
    }

    #[test]
    fn formats_runtime() {
        assert_eq!(format_runtime(Some(0)), "0m");
        assert_eq!(format_runtime(Some(45)), "45m");
        assert_eq!(format_runtime(Some(59)), "59m");
        assert_eq!(format_runtime(Some(60)), "1h 0m");
        assert_eq!(format_runtime(Some(169)), "2h 49m");
        assert_eq!(format_runtime(None), RUNTIME_UNAVAILABLE);
        for m in 0..400u32 {
            let expected = if m < 60 {
                format!("{m}m")
            } else {
                format!("{}h {}m", m / 60, m % 60)
            };
            assert_eq!(format_runtime(Some(m)), expected);
        }
    }

    #[test]
    fn search_item_for_batman() {
        let body = json!({
            "results": [{
                "id": 268,
                "title": "Batman",
                "media_type": "movie",
                "release_date": "1989-06-23",
                "poster_path": "/abc.jpg"
            }]
        });
        let items = normalize_search(&body, &images());
        assert_eq!(
            items,
            vec![SearchResultItem {
                id: 268,
                media_type: MediaType::Movie,
                title: Some("Batman".to_string()),
                year: "1989".to_string(),
                poster_url: Some("https://image.tmdb.org/t/p/original/abc.jpg".to_string()),
                route: "/movie/268".to_string(),
            }]
        );
    }

    #[test]
    fn search_keeps_movies_and_shows_only() {
        let body = json!({
            "results": [
                { "id": 1, "media_type": "movie", "title": "A" },
                { "id": 2, "media_type": "person", "name": "B" },
                { "id": 3, "media_type": "tv", "name": "C", "first_air_date": "2008-01-20" },
                { "id": 4, "media_type": "collection", "name": "D" },
                { "media_type": "movie", "title": "no id" }
            ]
        });
        let items = normalize_search(&body, &images());
        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(items.iter().all(|i| i.media_type.is_listable()));
        assert_eq!(items[1].title.as_deref(), Some("C"));
        assert_eq!(items[1].year, "2008");
        assert_eq!(items[1].route, "/tv/3");
        assert_eq!(items[0].year, "");
        assert_eq!(items[0].poster_url, None);

        let again = retain_listable(items.clone());
        assert_eq!(again, items);
    }

    #[test]
    fn search_tolerates_missing_results() {
        assert!(normalize_search(&json!({}), &images()).is_empty());
        assert!(normalize_search(&json!({ "results": null }), &images()).is_empty());
    }

    #[test]
    fn movie_details_scenario() {
        let body = json!({
            "runtime": 169,
            "genres": [{ "name": "Action" }],
            "credits": { "crew": [{ "job": "Director", "name": "C. Nolan" }] }
        });
        let movie = normalize_movie(&body, &images());
        assert_eq!(movie.runtime_formatted, "2h 49m");
        assert_eq!(movie.genre_names, vec!["Action".to_string()]);
        assert_eq!(movie.director_name.as_deref(), Some("C. Nolan"));
        assert_eq!(movie.title, None);
        assert_eq!(movie.year, YEAR_UNAVAILABLE);
        assert_eq!(movie.summary_text, SUMMARY_UNAVAILABLE);
        assert_eq!(movie.artwork.poster_url, None);
        assert_eq!(movie.certification, None);
    }

    #[test]
    fn movie_certification_uses_first_non_blank_us_entry() {
        let body = json!({
            "release_dates": { "results": [
                { "iso_3166_1": "GB", "release_dates": [{ "certification": "12A" }] },
                { "iso_3166_1": "US", "release_dates": [
                    { "certification": "" },
                    { "certification": "  " },
                    { "certification": "PG-13" },
                    { "certification": "R" }
                ]}
            ]}
        });
        assert_eq!(
            normalize_movie(&body, &images()).certification.as_deref(),
            Some("PG-13")
        );
    }

    #[test]
    fn movie_without_us_certification_is_absent() {
        let body = json!({
            "release_dates": { "results": [
                { "iso_3166_1": "US", "release_dates": [{ "certification": "" }] }
            ]}
        });
        assert_eq!(normalize_movie(&body, &images()).certification, None);
    }

    #[test]
    fn director_is_first_exact_match() {
        let body = json!({
            "credits": { "crew": [
                { "job": "Assistant Director", "name": "X" },
                { "job": "Director", "name": "Y" },
                { "job": "Director", "name": "Z" }
            ]}
        });
        assert_eq!(normalize_movie(&body, &images()).director_name.as_deref(), Some("Y"));
    }

    #[test]
    fn malformed_genres_are_skipped_individually() {
        let body = json!({ "genres": [{ "name": "Action" }, 7, { "name": "Drama" }, { "id": 3 }] });
        assert_eq!(
            normalize_movie(&body, &images()).genre_names,
            vec!["Action".to_string(), "Drama".to_string()]
        );
    }

    #[test]
    fn movie_cast_is_capped_and_crew_filtered() {
        let cast: Vec<Value> = (0..25)
            .map(|i| json!({ "id": i, "name": format!("Actor {i}"), "character": "" }))
            .collect();
        let body = json!({
            "credits": {
                "cast": cast,
                "crew": [
                    { "id": 1, "job": "Gaffer", "name": "G" },
                    { "id": 2, "job": "Editor", "name": "E" }
                ]
            }
        });
        let movie = normalize_movie(&body, &images());
        assert_eq!(movie.cast.len(), 20);
        assert_eq!(movie.cast[0].character, None);
        assert_eq!(movie.crew.len(), 1);
        assert_eq!(movie.crew[0].job, "Editor");
    }

    #[test]
    fn tv_details_use_us_rating() {
        let body = json!({
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20",
            "number_of_seasons": 5,
            "number_of_episodes": 62,
            "status": "Ended",
            "poster_path": "/bb.jpg",
            "content_ratings": { "results": [
                { "iso_3166_1": "DE", "rating": "16" },
                { "iso_3166_1": "US", "rating": "TV-MA" }
            ]}
        });
        let tv = normalize_tv(&body, &images());
        assert_eq!(tv.title.as_deref(), Some("Breaking Bad"));
        assert_eq!(tv.year, "2008");
        assert_eq!(tv.certification.as_deref(), Some("TV-MA"));
        assert_eq!(tv.season_count, Some(5));
        assert_eq!(tv.episode_count, Some(62));
        assert_eq!(tv.status.as_deref(), Some("Ended"));
        assert_eq!(
            tv.artwork.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/original/bb.jpg")
        );
        assert_eq!(tv.artwork.backdrop_url, None);
    }

    #[test]
    fn artwork_index_wraps_and_falls_back() {
        let fallback = Artwork {
            poster_url: Some("fallback-poster".to_string()),
            backdrop_url: Some("fallback-backdrop".to_string()),
            ..Artwork::default()
        };
        let body = json!({
            "posters": [{ "file_path": "/p0.jpg" }, { "file_path": "/p1.jpg" }],
            "backdrops": []
        });
        let art = select_artwork(
            Some(&body),
            ArtworkSelection { poster: 3, backdrop: 1 },
            fallback.clone(),
            &images(),
        );
        assert_eq!(
            art.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/original/p1.jpg")
        );
        assert_eq!(art.backdrop_url.as_deref(), Some("fallback-backdrop"));
        assert_eq!(art.poster_choices, 2);
        assert_eq!(art.backdrop_choices, 0);

        let untouched = select_artwork(None, ArtworkSelection::default(), fallback.clone(), &images());
        assert_eq!(untouched, fallback);
    }

    #[test]
    fn artwork_hints_parse_leniently() {
        let selection: ArtworkSelection =
            serde_json::from_value(json!({ "poster": "-1", "backdrop": " 2 " })).unwrap();
        assert_eq!(selection.poster, 0);
        assert_eq!(selection.backdrop, 2);
        let empty: ArtworkSelection = serde_json::from_value(json!({})).unwrap();
        assert_eq!((empty.poster, empty.backdrop), (0, 0));
    }

    #[test]
    fn person_details_drop_blank_bio() {
        let body = json!({
            "id": 525,
            "name": "Christopher Nolan",
            "biography": "",
            "profile_path": "/cn.jpg",
            "known_for_department": "Directing"
        });
        let person = normalize_person(&body, 14, &images());
        assert_eq!(person.name.as_deref(), Some("Christopher Nolan"));
        assert_eq!(person.bio, None);
        assert_eq!(
            person.profile_url.as_deref(),
            Some("https://image.tmdb.org/t/p/original/cn.jpg")
        );
        assert_eq!(person.known_for_department.as_deref(), Some("Directing"));
        assert_eq!(person.known_credit_count, 14);
    }

    #[test]
    fn image_urls_skip_blank_paths() {
        let urls = ImageUrls::new("https://cdn.test/t/p/original/");
        assert_eq!(urls.url(None), None);
        assert_eq!(urls.url(Some("  ")), None);
        assert_eq!(
            urls.url(Some("x.jpg")).as_deref(),
            Some("https://cdn.test/t/p/original/x.jpg")
        );
    }
}
