//! One-shot feed loading for the opportunities page.
//!
//! The bundled document is tried first and the HTTP endpoint second. There
//! is no retry past that single fallback. Results are applied to the page
//! only while it is still mounted.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use reqwest::Client;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::FeedError;
use crate::feed::FeedBoard;
use crate::models::FeedData;

pub const FEED_FILE: &str = "ict_internships_jobs_2025.json";

pub fn parse_document(text: &str, origin: &str) -> Result<FeedData, FeedError> {
    serde_json::from_str(text).map_err(|source| FeedError::Malformed {
        origin: origin.to_string(),
        source,
    })
}

pub struct FeedLoader {
    bundled: PathBuf,
    base_url: String,
    client: Client,
}

impl FeedLoader {
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the HTTP client cannot be built.
    pub fn new(bundled: PathBuf, base_url: &str, timeout_secs: u64) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            bundled,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn fallback_url(&self) -> String {
        format!("{}/feed/{FEED_FILE}", self.base_url)
    }

    pub async fn load_bundled(&self) -> Result<FeedData, FeedError> {
        let text = tokio::fs::read_to_string(&self.bundled)
            .await
            .map_err(|source| FeedError::Read {
                path: self.bundled.clone(),
                source,
            })?;
        parse_document(&text, &self.bundled.display().to_string())
    }

    pub async fn fetch_remote(&self) -> Result<FeedData, FeedError> {
        let url = self.fallback_url();
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(%url, status = status.as_u16(), "feed endpoint returned non-success");
            return Err(FeedError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_document(&body, &url)
    }

    /// Bundled document first, then the HTTP endpoint. The error returned
    /// when both fail is the fallback's.
    pub async fn load(&self) -> Result<FeedData, FeedError> {
        match self.load_bundled().await {
            Ok(data) => {
                info!(path = %self.bundled.display(), "loaded bundled feed");
                Ok(data)
            }
            Err(err) => {
                warn!(error = %err, url = %self.fallback_url(), "bundled feed unavailable, fetching");
                let data = self.fetch_remote().await?;
                info!("loaded feed over HTTP");
                Ok(data)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedState {
    pub data: Option<FeedData>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Cleared when the page goes away; pending loads check it before applying.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn revoke(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

fn lock(state: &Mutex<FeedState>) -> MutexGuard<'_, FeedState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn apply(state: &Mutex<FeedState>, alive: &Liveness, result: Result<FeedData, FeedError>) {
    if !alive.is_alive() {
        debug!("page unmounted before feed load finished, discarding result");
        return;
    }
    let mut guard = lock(state);
    match result {
        Ok(data) => guard.data = Some(data),
        Err(err) => {
            warn!(error = %err, "feed load failed");
            guard.error = Some(err.to_string());
        }
    }
    guard.loading = false;
}

pub struct FeedPage {
    state: Arc<Mutex<FeedState>>,
    alive: Liveness,
}

impl FeedPage {
    pub fn mount() -> Self {
        Self {
            state: Arc::new(Mutex::new(FeedState {
                loading: true,
                ..FeedState::default()
            })),
            alive: Liveness::new(),
        }
    }

    #[cfg(test)]
    pub async fn load(&self, loader: &FeedLoader) {
        let result = loader.load().await;
        apply(&self.state, &self.alive, result);
    }

    pub fn spawn_load(&self, loader: Arc<FeedLoader>) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let alive = self.alive.clone();
        tokio::spawn(async move {
            let result = loader.load().await;
            apply(&state, &alive, result);
        })
    }

    pub fn unmount(&self) {
        self.alive.revoke();
    }

    pub fn snapshot(&self) -> FeedState {
        lock(&self.state).clone()
    }

    pub fn board(&self) -> FeedBoard {
        FeedBoard::new(lock(&self.state).data.as_ref())
    }
}
