// src/error.rs
// =============================================================================
// Typed errors shared by the GitHub client, the cache and the renderers.
//
// The binary glue (main.rs) still uses anyhow for "something unexpected
// went wrong", but everything the user can cause (bad input, unknown repo,
// rate limits) is a HubError so it can be turned into a localized message.
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HubError {
    /// Nothing was typed
    #[error("no repository given")]
    EmptyInput,

    /// Input is not `owner/repo` or `https://github.com/owner/repo`
    #[error("invalid repository: {0}")]
    InvalidRepo(String),

    /// GitHub answered 404
    #[error("repository not found: {0}")]
    NotFound(String),

    /// GitHub answered 403; `rate_limited` is set when the remaining quota is 0
    #[error("access forbidden (rate limited: {rate_limited})")]
    Forbidden { rate_limited: bool },

    /// GitHub answered 401, usually a bad or expired token
    #[error("bad credentials")]
    Unauthorized,

    /// Any other non-success status
    #[error("GitHub API request failed: {0}")]
    Http(StatusCode),

    /// The configured API base URL does not parse
    #[error("invalid API base URL: {0}")]
    InvalidApiBase(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("could not decode GitHub response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("clipboard error: {0}")]
    Clipboard(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl HubError {
    /// True for errors caused by the user's input or GitHub's answer,
    /// as opposed to local failures.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            HubError::EmptyInput
                | HubError::InvalidRepo(_)
                | HubError::NotFound(_)
                | HubError::Forbidden { .. }
                | HubError::Unauthorized
                | HubError::Http(_)
                | HubError::Network(_)
                | HubError::Decode(_)
        )
    }
}

pub type HubResult<T> = std::result::Result<T, HubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message_includes_status() {
        let err = HubError::Http(StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "GitHub API request failed: 502 Bad Gateway");
    }

    #[test]
    fn test_user_facing_classification() {
        assert!(HubError::NotFound("a/b".into()).is_user_facing());
        assert!(HubError::Forbidden { rate_limited: true }.is_user_facing());
        assert!(!HubError::Clipboard("no display".into()).is_user_facing());
    }
}
