// src/github/mod.rs
// =============================================================================
// This module handles everything GitHub-specific:
//
// - repo:   validating "owner/repo" or https://github.com/owner/repo input
// - types:  the contributor record we keep from the API
// - client: paginated, authenticated requests to the contributors endpoint
// - cache:  a short-lived TTL cache of successful answers
// =============================================================================

mod cache;
mod client;
mod repo;
mod types;

pub use cache::{ContributorCache, DEFAULT_TTL};
pub use client::{ClientOptions, GithubClient, DEFAULT_API_BASE, DEFAULT_MAX_PAGES, MAX_PER_PAGE};
pub use repo::RepoSlug;
pub use types::Contributor;
