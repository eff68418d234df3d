use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const ACTING: &str = "Acting";

static JOB_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (ACTING, "Films starring"),
        ("Director", "Films directed by"),
        ("Co-Director", "Films co-directed by"),
        ("Producer", "Films produced by"),
        ("Executive Producer", "Films executive produced by"),
        ("Co-Producer", "Films co-produced by"),
        ("Associate Producer", "Films associate produced by"),
        ("Writer", "Films written by"),
        ("Screenplay", "Films with screenplay by"),
        ("Story", "Films with story by"),
        ("Original Story", "Films based on a story by"),
        ("Novel", "Films based on a novel by"),
        ("Characters", "Films with characters by"),
        ("Original Writer", "Films originally written by"),
        ("Editor", "Films edited by"),
        ("Director of Photography", "Films shot by"),
        ("Cinematography", "Films shot by"),
        ("Original Music Composer", "Films scored by"),
        ("Music", "Films with music by"),
        ("Casting", "Films cast by"),
        ("Production Design", "Films designed by"),
        ("Art Direction", "Films art directed by"),
        ("Costume Design", "Films with costumes by"),
        ("Makeup Artist", "Films with makeup by"),
        ("Sound Designer", "Films with sound design by"),
        ("Visual Effects Supervisor", "Films with visual effects supervised by"),
        ("Visual Effects Producer", "Films with visual effects produced by"),
        ("Stunt Coordinator", "Films with stunts coordinated by"),
        ("Lighting", "Films lit by"),
        ("Thanks", "Films thanking"),
    ])
});

/// Display phrase for a job option, e.g. "Director" -> "Films directed by".
pub fn job_label(job: &str) -> String {
    JOB_LABELS
        .get(job)
        .map(|label| label.to_string())
        .unwrap_or_else(|| default_job_label(job))
}

fn default_job_label(job: &str) -> String {
    format!("Films {job} by")
}
