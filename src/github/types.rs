// src/github/types.rs
// =============================================================================
// The contributor record returned per entry by
// GET /repos/{owner}/{repo}/contributors
//
// GitHub sends ~20 fields per contributor; we keep only the four we render.
// serde ignores unknown fields by default, so the rest is simply dropped.
// =============================================================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    /// GitHub username
    pub login: String,
    /// Avatar image URL (avatars.githubusercontent.com)
    pub avatar_url: String,
    /// Profile page URL
    pub html_url: String,
    /// Number of commits to the default branch
    pub contributions: u64,
}
