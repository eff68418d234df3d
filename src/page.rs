//! Per-page view state: `idle -> loading -> ready | failed`.
//!
//! Every load is tagged with a generation; only the newest load may write
//! its result, so a slow response for an earlier id can never overwrite the
//! page after the viewer has moved on.

use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Display;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageState<T> {
    pub status: PageStatus,
    pub loading: bool,
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self {
            status: PageStatus::Idle,
            loading: false,
            error: None,
            data: None,
        }
    }
}

impl<T> PageState<T> {
    /// A page that refused to start, e.g. a malformed route id.
    pub fn failed(message: &str) -> Self {
        Self {
            status: PageStatus::Failed,
            loading: false,
            error: Some(message.to_string()),
            data: None,
        }
    }
}

impl<T: Serialize> PageState<T> {
    /// JSON body with the entity under `key`, e.g. `{"loading":false,"error":null,"movie":{..}}`.
    pub fn to_body(&self, key: &str) -> Value {
        let data = self
            .data
            .as_ref()
            .and_then(|d| serde_json::to_value(d).ok())
            .unwrap_or(Value::Null);
        let mut body = json!({
            "status": self.status,
            "loading": self.loading,
            "error": self.error,
        });
        if let Value::Object(map) = &mut body {
            map.insert(key.to_string(), data);
        }
        body
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

#[derive(Debug)]
struct Inner<T> {
    generation: u64,
    state: PageState<T>,
}

#[derive(Debug)]
pub struct PageController<T> {
    failure_message: &'static str,
    inner: Mutex<Inner<T>>,
}

impl<T> PageController<T> {
    pub fn new(failure_message: &'static str) -> Self {
        Self {
            failure_message,
            inner: Mutex::new(Inner {
                generation: 0,
                state: PageState::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Enters `loading` and hands out the token the result must present.
    /// The previous entity stays visible until the new result lands.
    pub fn begin(&self) -> Generation {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state.status = PageStatus::Loading;
        inner.state.loading = true;
        inner.state.error = None;
        Generation(inner.generation)
    }

    /// Applies `result` if `token` is still the newest generation.
    /// Returns false when the result was stale and dropped.
    pub fn finish<E: Display>(&self, token: Generation, result: Result<T, E>) -> bool {
        let mut inner = self.lock();
        if inner.generation != token.0 {
            debug!(
                token = token.0,
                current = inner.generation,
                "Discarding stale page result"
            );
            return false;
        }
        match result {
            Ok(data) => {
                inner.state = PageState {
                    status: PageStatus::Ready,
                    loading: false,
                    error: None,
                    data: Some(data),
                };
            }
            Err(e) => {
                warn!(error = %e, "{}", self.failure_message);
                inner.state = PageState::failed(self.failure_message);
            }
        }
        true
    }

    pub async fn load<F, E>(&self, fetch: F) -> bool
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let token = self.begin();
        let result = fetch.await;
        self.finish(token, result)
    }

    pub fn generation(&self) -> Generation {
        Generation(self.lock().generation)
    }
}

impl<T: Clone> PageController<T> {
    pub fn snapshot(&self) -> PageState<T> {
        self.lock().state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    const MESSAGE: &str = "Failed to load movie.";

    #[test]
    fn starts_idle() {
        let page: PageController<String> = PageController::new(MESSAGE);
        let state = page.snapshot();
        assert_eq!(state.status, PageStatus::Idle);
        assert!(!state.loading);
        assert!(state.error.is_none() && state.data.is_none());
    }

    #[test]
    fn success_then_failure_clears_entity() {
        let page = PageController::new(MESSAGE);
        let token = page.begin();
        assert!(page.snapshot().loading);
        assert!(page.finish(token, Ok::<_, String>("Heat".to_string())));
        assert_eq!(page.snapshot().data.as_deref(), Some("Heat"));

        let token = page.begin();
        let during = page.snapshot();
        assert_eq!(during.status, PageStatus::Loading);
        assert!(during.error.is_none());
        assert!(page.finish(token, Err::<String, _>("404")));
        let state = page.snapshot();
        assert_eq!(state.status, PageStatus::Failed);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some(MESSAGE));
        assert_eq!(state.data, None);
    }

    #[test]
    fn stale_result_is_discarded() {
        let page = PageController::new(MESSAGE);
        let first = page.begin();
        let second = page.begin();
        assert!(page.finish(second, Ok::<_, String>(2u64)));
        assert!(!page.finish(first, Ok::<_, String>(1u64)));
        assert_eq!(page.snapshot().data, Some(2));
        assert!(!page.finish(first, Err::<u64, _>("late failure")));
        assert_eq!(page.snapshot().status, PageStatus::Ready);
    }

    #[tokio::test]
    async fn overlapping_loads_keep_the_latest() {
        let page = std::sync::Arc::new(PageController::<u64>::new(MESSAGE));
        let (release_first, first_rx) = oneshot::channel::<()>();

        let slow = {
            let page = page.clone();
            tokio::spawn(async move {
                page.load(async move {
                    let _ = first_rx.await;
                    Ok::<_, String>(1)
                })
                .await
            })
        };
        // let the first load register its generation
        while page.generation() == Generation(0) {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        assert!(page.load(async { Ok::<_, String>(2) }).await);
        let _ = release_first.send(());
        let applied = slow.await.expect("task joins");

        assert!(!applied);
        let state = page.snapshot();
        assert_eq!(state.data, Some(2));
        assert!(!state.loading);
    }

    #[test]
    fn body_uses_entity_key() {
        let state = PageState::<u32>::failed(MESSAGE);
        assert_eq!(
            state.to_body("movie"),
            json!({ "status": "failed", "loading": false, "error": MESSAGE, "movie": null })
        );
    }
}
