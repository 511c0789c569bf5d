// src/github/client.rs
// =============================================================================
// This module talks to the GitHub REST API.
//
// Endpoint:
//   GET {api_base}/repos/{owner}/{repo}/contributors?per_page=N&page=P
//
// Strategy:
// - Walk the pages in order until GitHub hands us a short (or empty) page,
//   or until max_pages pages were read
// - Send a bearer token when one is configured (5000 req/h instead of 60)
// - Turn 404 / 403 / 401 / other statuses into distinct HubError variants
//   so the caller can show the right message
// - No retries: a failed request fails the whole query
//
// Rust concepts:
// - async functions: For network I/O
// - Result + ?: For error propagation
// - Builder pattern: reqwest::Client::builder()
// =============================================================================

use std::time::Duration;

use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use tracing::{debug, info};
use url::Url;

use super::cache::ContributorCache;
use super::repo::RepoSlug;
use super::types::Contributor;
use crate::error::{HubError, HubResult};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const MAX_PER_PAGE: u32 = 100;
pub const DEFAULT_MAX_PAGES: u32 = 10;

const API_VERSION: &str = "2022-11-28";
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

// Settings for a GithubClient
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the API (overridable for GitHub Enterprise or tests)
    pub api_base: String,
    /// Personal access token, sent as "Authorization: Bearer <token>"
    pub token: Option<String>,
    /// Entries per page, clamped to 1..=100
    pub per_page: u32,
    /// Hard stop on the number of pages read
    pub max_pages: u32,
    /// Timeout per request
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            per_page: MAX_PER_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
            timeout: Duration::from_secs(15),
        }
    }
}

pub struct GithubClient {
    http: Client,
    api_base: Url,
    token: Option<String>,
    per_page: u32,
    max_pages: u32,
}

impl GithubClient {
    pub fn new(options: ClientOptions) -> HubResult<Self> {
        // Url::join drops the last path segment unless the base ends in '/'
        let mut base = options.api_base.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let api_base =
            Url::parse(&base).map_err(|e| HubError::InvalidApiBase(format!("{base}: {e}")))?;

        let http = Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!("hub-io/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_base,
            token: options.token.filter(|t| !t.trim().is_empty()),
            per_page: options.per_page.clamp(1, MAX_PER_PAGE),
            max_pages: options.max_pages.max(1),
        })
    }

    // The underlying HTTP client, shared with the avatar downloader
    pub fn http(&self) -> &Client {
        &self.http
    }

    // Fetches every contributor of a repository, page by page
    //
    // Returns: contributors in the order GitHub ranks them
    //          (most contributions first). An empty repository yields
    //          an empty Vec rather than an error.
    pub async fn fetch_contributors(&self, slug: &RepoSlug) -> HubResult<Vec<Contributor>> {
        let mut contributors = Vec::new();

        for page in 1..=self.max_pages {
            let batch = self.fetch_page(slug, page).await?;
            let batch_len = batch.len();
            contributors.extend(batch);

            // A short page is the last page
            if batch_len < self.per_page as usize {
                break;
            }
            if page == self.max_pages {
                info!(repo = %slug, pages = page, "stopped at page limit");
            }
        }

        debug!(repo = %slug, count = contributors.len(), "fetched contributors");
        Ok(contributors)
    }

    // Same as fetch_contributors, but answers from the cache while an
    // entry is fresh. Only non-empty successful results are cached.
    pub async fn fetch_contributors_cached(
        &self,
        slug: &RepoSlug,
        cache: &mut ContributorCache,
    ) -> HubResult<Vec<Contributor>> {
        let key = slug.cache_key();

        if let Some(hit) = cache.get(&key) {
            debug!(repo = %slug, "cache hit");
            return Ok(hit);
        }

        let contributors = self.fetch_contributors(slug).await?;
        if !contributors.is_empty() {
            cache.insert(&key, contributors.clone());
        }
        Ok(contributors)
    }

    async fn fetch_page(&self, slug: &RepoSlug, page: u32) -> HubResult<Vec<Contributor>> {
        let url = self.contributors_url(slug)?;
        debug!(%url, page, "requesting contributors page");

        let mut request = self
            .http
            .get(url)
            .query(&[("per_page", self.per_page), ("page", page)])
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);

        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status();

        // 204 No Content: the repository exists but has no commits
        if status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        check_status(status, response.headers(), slug)?;

        let body = response.bytes().await?;
        let contributors: Vec<Contributor> = serde_json::from_slice(&body)?;
        Ok(contributors)
    }

    fn contributors_url(&self, slug: &RepoSlug) -> HubResult<Url> {
        self.api_base
            .join(&format!("repos/{}/{}/contributors", slug.owner, slug.name))
            .map_err(|e| HubError::InvalidApiBase(e.to_string()))
    }
}

// Maps an HTTP status to Ok(()) or the matching HubError
fn check_status(status: StatusCode, headers: &HeaderMap, slug: &RepoSlug) -> HubResult<()> {
    if status.is_success() {
        return Ok(());
    }

    match status {
        StatusCode::NOT_FOUND => Err(HubError::NotFound(slug.to_string())),
        StatusCode::UNAUTHORIZED => Err(HubError::Unauthorized),
        StatusCode::FORBIDDEN => {
            let rate_limited = headers
                .get(RATE_LIMIT_REMAINING)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim() == "0")
                .unwrap_or(false);
            Err(HubError::Forbidden { rate_limited })
        }
        other => Err(HubError::Http(other)),
    }
}
