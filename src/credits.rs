use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

use crate::jobs::{job_label, ACTING};
use crate::tmdb::raw::{self, from_json, PersonCredit};
use crate::views::ImageUrls;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditedWork {
    pub id: u64,
    pub title: Option<String>,
    pub poster_url: Option<String>,
    pub popularity: f64,
}

/// A person's movie credits keyed by job, "Acting" included.
///
/// Within one job no work id repeats and entries run from most to least
/// popular. `jobs` lists "Acting" first, then crew jobs in lexicographic order;
/// a job is only present if it kept at least one credit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditGroup {
    pub jobs: Vec<String>,
    pub groups: BTreeMap<String, Vec<CreditedWork>>,
    pub known_credit_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobOption {
    pub job: String,
    pub label: String,
    pub count: usize,
}

impl CreditGroup {
    pub fn credits_for(&self, job: &str) -> &[CreditedWork] {
        self.groups.get(job).map(Vec::as_slice).unwrap_or_default()
    }

    /// Resolves the job to show. A requested job that has no credits for this
    /// person falls back to "Acting", or to the first job if there is no acting.
    pub fn select_job(&self, requested: Option<&str>) -> Option<&str> {
        let find = |job: &str| self.jobs.iter().find(|j| j.as_str() == job).map(String::as_str);
        requested
            .and_then(find)
            .or_else(|| find(ACTING))
            .or_else(|| self.jobs.first().map(String::as_str))
    }

    pub fn job_options(&self) -> Vec<JobOption> {
        self.jobs
            .iter()
            .map(|job| JobOption {
                job: job.clone(),
                label: job_label(job),
                count: self.credits_for(job).len(),
            })
            .collect()
    }
}

/// Groups the body of a person-movie-credits response.
pub fn group_movie_credits(body: &Value, images: &ImageUrls) -> CreditGroup {
    let credits: raw::PersonCredits = from_json(body);
    group_credits(&credits.cast, &credits.crew, images)
}

pub fn group_credits(
    acting: &[PersonCredit],
    crew: &[PersonCredit],
    images: &ImageUrls,
) -> CreditGroup {
    let known_credit_count = acting
        .iter()
        .chain(crew)
        .filter_map(|c| c.id)
        .collect::<HashSet<_>>()
        .len();

    let mut groups: BTreeMap<String, Vec<CreditedWork>> = BTreeMap::new();
    let mut seen: BTreeMap<String, HashSet<u64>> = BTreeMap::new();

    let acting_entries = acting.iter().map(|c| (ACTING, c));
    let crew_entries = crew.iter().filter_map(|c| {
        let job = c.job.as_deref().filter(|j| !j.is_empty())?;
        Some((job, c))
    });
    for (job, credit) in acting_entries.chain(crew_entries) {
        let Some(id) = credit.id else {
            continue;
        };
        if !seen.entry(job.to_string()).or_default().insert(id) {
            continue;
        }
        groups.entry(job.to_string()).or_default().push(CreditedWork {
            id,
            title: credit.title.clone(),
            poster_url: images.url(credit.poster_path.as_deref()),
            popularity: credit.popularity.unwrap_or(0.0),
        });
    }

    for list in groups.values_mut() {
        // stable: equal popularity keeps source order
        list.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
    }

    let mut jobs = Vec::with_capacity(groups.len());
    if groups.contains_key(ACTING) {
        jobs.push(ACTING.to_string());
    }
    jobs.extend(groups.keys().filter(|k| k.as_str() != ACTING).cloned());

    CreditGroup {
        jobs,
        groups,
        known_credit_count,
    }
}
