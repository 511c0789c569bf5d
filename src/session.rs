// src/session.rs
// =============================================================================
// The "search box": takes raw input, validates it, fetches contributors and
// reports what happened as localized notices.
//
// Flow for one search:
//   1. Blank input          -> "Please enter the repository URL"
//   2. Not owner/repo       -> "Please enter a valid GitHub repository URL ..."
//   3. Loading notice, then fetch (through the TTL cache)
//   4. Found N              -> "Success! Found N contributors."
//      Found nothing        -> "No data available"
//      API / network error  -> a message matching the failure
//
// A Session lives for the whole process, so in the interactive shell the
// cache and the language survive between searches.
// =============================================================================

use std::fmt;

use tracing::{info, warn};

use crate::error::HubError;
use crate::github::{Contributor, ContributorCache, GithubClient, RepoSlug};
use crate::i18n::messages::*;
use crate::i18n::{I18n, Language};

// A message for the user, the CLI equivalent of a toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(t) | Notice::Success(t) | Notice::Warning(t) | Notice::Error(t) => t,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Info(t) => write!(f, "⏳ {t}"),
            Notice::Success(t) => write!(f, "✅ {t}"),
            Notice::Warning(t) => write!(f, "⚠️  {t}"),
            Notice::Error(t) => write!(f, "❌ {t}"),
        }
    }
}

// What a search ended with
#[derive(Debug)]
pub enum Outcome {
    /// At least one contributor
    Found(Vec<Contributor>),
    /// The repository exists but lists no contributors
    NoData,
    /// The input never reached the API
    Rejected,
    /// The API call failed
    Failed(HubError),
}

pub struct Session {
    client: GithubClient,
    cache: ContributorCache,
    use_cache: bool,
    i18n: I18n,
    notices: Vec<Notice>,
    // Print notices to stderr as they happen
    echo: bool,
}

impl Session {
    pub fn new(client: GithubClient, cache: ContributorCache, i18n: I18n, use_cache: bool) -> Self {
        Self {
            client,
            cache,
            use_cache,
            i18n,
            notices: Vec::new(),
            echo: true,
        }
    }

    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn client(&self) -> &GithubClient {
        &self.client
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    pub fn set_language(&mut self, language: Language) {
        self.i18n.set_language(language);
    }

    pub fn toggle_language(&mut self) -> Language {
        self.i18n.toggle()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
        let msg = self.i18n.tr(&CACHE_CLEARED);
        self.notify(Notice::Success(msg));
    }

    // Records a notice (and prints it unless the session is quiet)
    pub fn notify(&mut self, notice: Notice) {
        if self.echo {
            eprintln!("{notice}");
        }
        self.notices.push(notice);
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // Runs one search
    pub async fn search(&mut self, input: &str) -> Outcome {
        let slug = match RepoSlug::parse(input) {
            Ok(slug) => slug,
            Err(HubError::EmptyInput) => {
                let msg = self.i18n.tr(&ENTER_REPO);
                self.notify(Notice::Error(msg));
                return Outcome::Rejected;
            }
            Err(_) => {
                let msg = self.i18n.tr(&INVALID_REPO);
                self.notify(Notice::Error(msg));
                return Outcome::Rejected;
            }
        };

        let loading = format!("{} {slug}", self.i18n.tr(&LOADING));
        self.notify(Notice::Info(loading));

        let result = if self.use_cache {
            self.client
                .fetch_contributors_cached(&slug, &mut self.cache)
                .await
        } else {
            self.client.fetch_contributors(&slug).await
        };

        match result {
            Ok(contributors) if contributors.is_empty() => {
                let msg = self.i18n.tr(&NO_DATA);
                self.notify(Notice::Warning(msg));
                Outcome::NoData
            }
            Ok(contributors) => {
                info!(repo = %slug, count = contributors.len(), "search succeeded");
                let msg = self
                    .i18n
                    .t(&SUCCESS_FOUND, &[("count", contributors.len().to_string())]);
                self.notify(Notice::Success(msg));
                Outcome::Found(contributors)
            }
            Err(e) => {
                warn!(repo = %slug, error = %e, "search failed");
                let msg = error_message(&self.i18n, &e);
                self.notify(Notice::Error(msg));
                Outcome::Failed(e)
            }
        }
    }
}

// The localized text for a failed search
pub fn error_message(i18n: &I18n, error: &HubError) -> String {
    match error {
        HubError::EmptyInput => i18n.tr(&ENTER_REPO),
        HubError::InvalidRepo(_) => i18n.tr(&INVALID_REPO),
        HubError::NotFound(repo) => i18n.t(&REPO_NOT_FOUND, &[("repo", repo.clone())]),
        HubError::Forbidden { rate_limited: true } => i18n.tr(&RATE_LIMITED),
        HubError::Forbidden { rate_limited: false } => i18n.tr(&FORBIDDEN),
        HubError::Unauthorized => i18n.tr(&UNAUTHORIZED),
        HubError::Http(status) => i18n.t(&REQUEST_FAILED, &[("status", status.as_u16().to_string())]),
        _ => i18n.tr(&SEARCH_FAILED),
    }
}

// One line typed into the interactive shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Search(String),
    /// None toggles, Some sets
    Lang(Option<Language>),
    ClearCache,
    Help,
    Quit,
    Unknown(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if !line.starts_with(':') {
            return ShellCommand::Search(line.to_string());
        }

        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        let arg = words.next();

        match (command, arg) {
            (":q" | ":quit" | ":exit", None) => ShellCommand::Quit,
            (":clear", None) => ShellCommand::ClearCache,
            (":help", None) => ShellCommand::Help,
            (":lang", None) => ShellCommand::Lang(None),
            (":lang", Some(code)) => match Language::from_code(code) {
                Some(language) if words.next().is_none() => ShellCommand::Lang(Some(language)),
                _ => ShellCommand::Unknown(line.to_string()),
            },
            _ => ShellCommand::Unknown(line.to_string()),
        }
    }
}
