// src/github/repo.rs
// =============================================================================
// This module turns what the user typed into a repository slug.
//
// Accepted formats:
//   - owner/repo
//   - https://github.com/owner/repo
//   - http://github.com/owner/repo
//
// Owner and repo may contain ASCII letters, digits, '_', '.' and '-'.
// Anything else (trailing slashes, extra path segments, other hosts) is
// rejected before we spend an API request on it.
//
// Rust concepts:
// - impl Display: lets us print a RepoSlug with {} and call .to_string()
// - Iterators: .all() to check every character of a segment
// =============================================================================

use std::fmt;

use crate::error::{HubError, HubResult};

const URL_PREFIXES: [&str; 2] = ["https://github.com/", "http://github.com/"];

// An owner/repo pair, e.g. ("minorcell", "hub-io")
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    // Parses user input into a slug
    //
    // Returns:
    //   Err(EmptyInput) for blank input
    //   Err(InvalidRepo) when the input doesn't match an accepted format
    //
    // Example:
    //   "https://github.com/rust-lang/rust" -> RepoSlug { owner: "rust-lang", name: "rust" }
    pub fn parse(input: &str) -> HubResult<Self> {
        if input.trim().is_empty() {
            return Err(HubError::EmptyInput);
        }

        if !validate_input(input) {
            return Err(HubError::InvalidRepo(input.to_string()));
        }

        let normalized = normalize_input(input);
        let (owner, name) = normalized
            .split_once('/')
            .ok_or_else(|| HubError::InvalidRepo(input.to_string()))?;

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    // GitHub treats owner and repo names case-insensitively,
    // so "Rust-Lang/Rust" and "rust-lang/rust" share a cache entry
    pub fn cache_key(&self) -> String {
        self.to_string().to_ascii_lowercase()
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// Checks the input against ^(https?://github\.com/)?[\w.-]+/[\w.-]+$
//
// The input is trimmed first, so surrounding whitespace is fine but
// whitespace inside the slug is not.
pub fn validate_input(input: &str) -> bool {
    let input = input.trim();
    if input.is_empty() {
        return false;
    }

    let path = strip_url_prefix(input);
    let mut segments = path.split('/');

    match (segments.next(), segments.next(), segments.next()) {
        (Some(owner), Some(repo), None) => is_slug_segment(owner) && is_slug_segment(repo),
        _ => false,
    }
}

// Removes surrounding whitespace and the github.com URL prefix
pub fn normalize_input(input: &str) -> String {
    strip_url_prefix(input.trim()).trim().to_string()
}

fn strip_url_prefix(input: &str) -> &str {
    URL_PREFIXES
        .iter()
        .find_map(|prefix| input.strip_prefix(prefix))
        .unwrap_or(input)
}

// One path segment: [A-Za-z0-9_.-]+
fn is_slug_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}
