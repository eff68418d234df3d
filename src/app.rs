use crate::config::AppConfig;
use crate::credits::{group_movie_credits, CreditGroup, JobOption};
use crate::jobs::job_label;
use crate::page::{PageController, PageState, PageStatus};
use crate::tmdb::{TmdbApi, TmdbClient, TmdbError};
use crate::views::{
    normalize_movie, normalize_person, normalize_search, normalize_tv, select_artwork,
    ArtworkSelection, ImageUrls, MovieDetail, PersonDetail, SearchResultItem, TvDetail,
};
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

pub const SEARCH_FAILED: &str = "Search Failed. Try Again.";
pub const MOVIE_FAILED: &str = "Failed to load movie.";
pub const TV_FAILED: &str = "Failed to load TV show.";
pub const PERSON_FAILED: &str = "Failed to load person.";

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn TmdbApi>,
    pub images: ImageUrls,
}

type PageResponse = (StatusCode, Json<Value>);

pub async fn run_server(config: AppConfig) -> Result<()> {
    let images = ImageUrls::new(config.tmdb.image_base.clone());
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(config.tmdb)?);
    let app = build_router(AppState { tmdb, images });

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/search", get(search_page))
        .route("/movie/:id", get(movie_page))
        .route("/tv/:id", get(tv_page))
        .route("/person/:id", get(person_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn home() -> Json<Value> {
    Json(json!({
        "name": "cineview",
        "routes": ["/search?q=<term>", "/movie/:id", "/tv/:id", "/person/:id?job=<job>"],
    }))
}

fn respond<T: Serialize>(state: &PageState<T>, key: &str) -> PageResponse {
    let status = match state.status {
        PageStatus::Failed => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };
    (status, Json(state.to_body(key)))
}

fn bad_id(raw: &str, message: &str, key: &str) -> PageResponse {
    warn!("Rejecting non-numeric id '{}'", raw);
    let state = PageState::<()>::failed(message);
    (StatusCode::BAD_REQUEST, Json(state.to_body(key)))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> PageResponse {
    let query = params.q.unwrap_or_default().trim().to_string();
    let page = PageController::<Vec<SearchResultItem>>::new(SEARCH_FAILED);
    if query.is_empty() {
        debug!("Blank search query, nothing submitted");
    } else {
        page.load(async {
            let body = state.tmdb.search_multi(&query).await?;
            Ok::<_, TmdbError>(normalize_search(&body, &state.images))
        })
        .await;
    }

    let mut snapshot = page.snapshot();
    if snapshot.data.is_none() {
        snapshot.data = Some(Vec::new());
    }
    let (status, Json(mut body)) = respond(&snapshot, "results");
    if let Value::Object(map) = &mut body {
        map.insert("query".to_string(), Value::String(query));
    }
    (status, Json(body))
}

async fn movie_page(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(selection): Query<ArtworkSelection>,
) -> PageResponse {
    let Ok(movie_id) = raw_id.parse::<u64>() else {
        return bad_id(&raw_id, MOVIE_FAILED, "movie");
    };
    let page = PageController::<MovieDetail>::new(MOVIE_FAILED);
    page.load(load_movie(&state, movie_id, selection)).await;
    respond(&page.snapshot(), "movie")
}

async fn load_movie(
    state: &AppState,
    movie_id: u64,
    selection: ArtworkSelection,
) -> Result<MovieDetail, TmdbError> {
    info!("Loading movie {}", movie_id);
    let (details, images) = tokio::join!(
        state.tmdb.movie_details(movie_id),
        state.tmdb.movie_images(movie_id),
    );
    let mut movie = normalize_movie(&details?, &state.images);
    let images = images
        .map_err(|e| warn!("Movie {} artwork unavailable: {}", movie_id, e))
        .ok();
    movie.artwork = select_artwork(images.as_ref(), selection, movie.artwork, &state.images);
    Ok(movie)
}

async fn tv_page(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(selection): Query<ArtworkSelection>,
) -> PageResponse {
    let Ok(tv_id) = raw_id.parse::<u64>() else {
        return bad_id(&raw_id, TV_FAILED, "tv");
    };
    let page = PageController::<TvDetail>::new(TV_FAILED);
    page.load(load_tv(&state, tv_id, selection)).await;
    respond(&page.snapshot(), "tv")
}

async fn load_tv(
    state: &AppState,
    tv_id: u64,
    selection: ArtworkSelection,
) -> Result<TvDetail, TmdbError> {
    info!("Loading TV show {}", tv_id);
    let (details, images) = tokio::join!(
        state.tmdb.tv_details(tv_id),
        state.tmdb.tv_images(tv_id),
    );
    let mut tv = normalize_tv(&details?, &state.images);
    let images = images
        .map_err(|e| warn!("TV show {} artwork unavailable: {}", tv_id, e))
        .ok();
    tv.artwork = select_artwork(images.as_ref(), selection, tv.artwork, &state.images);
    Ok(tv)
}

#[derive(Debug, Deserialize)]
struct PersonParams {
    job: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonView {
    pub person: PersonDetail,
    pub credits: CreditGroup,
    pub job_options: Vec<JobOption>,
    pub selected_job: Option<String>,
    pub selected_label: Option<String>,
}

async fn person_page(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(params): Query<PersonParams>,
) -> PageResponse {
    let Ok(person_id) = raw_id.parse::<u64>() else {
        return bad_id(&raw_id, PERSON_FAILED, "person");
    };
    let page = PageController::<PersonView>::new(PERSON_FAILED);
    page.load(load_person(&state, person_id, params.job.as_deref()))
        .await;
    respond(&page.snapshot(), "person")
}

async fn load_person(
    state: &AppState,
    person_id: u64,
    requested_job: Option<&str>,
) -> Result<PersonView, TmdbError> {
    info!("Loading person {}", person_id);
    let (details, credits) = tokio::try_join!(
        state.tmdb.person_details(person_id),
        state.tmdb.person_movie_credits(person_id),
    )?;
    let credits = group_movie_credits(&credits, &state.images);
    let person = normalize_person(&details, credits.known_credit_count, &state.images);
    let selected_job = credits.select_job(requested_job).map(str::to_string);
    if let (Some(requested), Some(selected)) = (requested_job, selected_job.as_deref()) {
        if requested != selected {
            debug!("Job '{}' has no credits, showing '{}'", requested, selected);
        }
    }
    Ok(PersonView {
        person,
        job_options: credits.job_options(),
        selected_label: selected_job.as_deref().map(job_label),
        selected_job,
        credits,
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
