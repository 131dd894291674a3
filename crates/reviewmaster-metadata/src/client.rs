// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{LookupError, Result};
use crate::models::{CastCredit, SearchHit, ShowCandidate};
use crate::throttle::RequestThrottle;
use moka::sync::Cache;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace, warn};
use url::Url;

const TVMAZE_API_BASE: &str = "https://api.tvmaze.com";
const USER_AGENT: &str = concat!("ReviewMaster/", env!("CARGO_PKG_VERSION"));
const DEFAULT_MAX_CANDIDATES: usize = 5;
const CACHE_CAPACITY: u64 = 1_000;
const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Lookup-by-title client for a TVmaze-compatible show catalog.
#[derive(Clone)]
pub struct ShowLookupClient {
    client: Client,
    base_url: String,
    throttle: RequestThrottle,
    max_candidates: usize,
    cache: Cache<String, Vec<ShowCandidate>>,
}

impl std::fmt::Debug for ShowLookupClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShowLookupClient")
            .field("base_url", &self.base_url)
            .field("max_candidates", &self.max_candidates)
            .finish()
    }
}

impl ShowLookupClient {
    /// Create a new client with default settings.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a client builder for custom configuration.
    pub fn builder() -> ShowLookupClientBuilder {
        ShowLookupClientBuilder::default()
    }

    /// Look up candidate shows for `title`, best match first, each with its cast.
    ///
    /// Results are cached per normalized title for the lifetime of the client.
    ///
    /// # Example
    /// ```no_run
    /// # use reviewmaster_metadata::ShowLookupClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = ShowLookupClient::new()?;
    /// let candidates = client.lookup("Breaking Bad").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn lookup(&self, title: &str) -> Result<Vec<ShowCandidate>> {
        let key = title.trim().to_lowercase();
        if let Some(cached) = self.cache.get(&key) {
            trace!(target: "metadata", title, "lookup served from cache");
            return Ok(cached);
        }

        let mut hits = self.search_shows(title).await?;
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(self.max_candidates);

        let mut candidates = Vec::with_capacity(hits.len());
        for hit in hits {
            let cast = match self.fetch_cast(hit.show.id).await {
                Ok(cast) => cast,
                Err(LookupError::NotFound(_)) => Vec::new(),
                Err(e) => return Err(e),
            };
            candidates.push(ShowCandidate::from_record(hit.show, cast));
        }

        debug!(target: "metadata", title, count = candidates.len(), "show lookup complete");
        self.cache.insert(key, candidates.clone());
        Ok(candidates)
    }

    /// Raw title search.
    pub async fn search_shows(&self, title: &str) -> Result<Vec<SearchHit>> {
        let mut url = Url::parse(&format!("{}/search/shows", self.base_url))
            .map_err(|e| LookupError::Malformed(e.to_string()))?;
        url.query_pairs_mut().append_pair("q", title);
        self.get(url.as_str()).await
    }

    /// Names of the credited cast of a show, in billing order.
    pub async fn fetch_cast(&self, show_id: u64) -> Result<Vec<String>> {
        let url = format!("{}/shows/{}/cast", self.base_url, show_id);
        let credits: Vec<CastCredit> = self.get(&url).await?;
        Ok(credits.into_iter().map(|c| c.person.name).collect())
    }

    /// Throttled GET, decoding the JSON body.
    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.throttle.wait_turn().await;

        trace!(target: "metadata", "GET {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        debug!(target: "metadata", "response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(url.to_string()));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(target: "metadata", "show catalog answered 429");
            return Err(LookupError::Throttled);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        trace!(target: "metadata", "response body: {}", body);

        serde_json::from_str(&body).map_err(|e| LookupError::Malformed(e.to_string()))
    }
}

/// Builder for configuring a show lookup client.
#[derive(Debug)]
pub struct ShowLookupClientBuilder {
    base_url: String,
    timeout: Duration,
    request_interval: Duration,
    max_candidates: usize,
}

impl Default for ShowLookupClientBuilder {
    fn default() -> Self {
        Self {
            base_url: TVMAZE_API_BASE.to_string(),
            timeout: Duration::from_secs(10),
            request_interval: Duration::from_millis(500),
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

impl ShowLookupClientBuilder {
    /// Set a custom base URL (useful for testing with mock servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Minimum spacing between two requests to the show catalog.
    pub fn request_interval(mut self, interval: Duration) -> Self {
        self.request_interval = interval;
        self
    }

    /// Cap the number of candidates (and cast requests) per lookup.
    pub fn max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }

    /// Build the lookup client.
    pub fn build(self) -> Result<ShowLookupClient> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(ShowLookupClient {
            client,
            base_url: self.base_url,
            throttle: RequestThrottle::new(self.request_interval),
            max_candidates: self.max_candidates,
            cache,
        })
    }
}
