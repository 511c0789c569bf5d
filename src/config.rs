// src/config.rs
// =============================================================================
// Settings, merged from (lowest to highest precedence):
//
//   1. built-in defaults
//   2. ~/.config/hub-io/config.toml   (or $HUB_IO_CONFIG_DIR/config.toml)
//   3. environment variables
//   4. command-line flags (applied by main.rs)
//
// Example config.toml:
//
//   token = "ghp_..."
//   cache_ttl_secs = 600
//   language = "zh"
//   persist_cache = true
// =============================================================================

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::github::{ClientOptions, DEFAULT_API_BASE, DEFAULT_MAX_PAGES, DEFAULT_TTL, MAX_PER_PAGE};
use crate::i18n::Language;

const APP_DIR: &str = "hub-io";
const CONFIG_FILE: &str = "config.toml";
const LANGUAGE_FILE: &str = "language";
const CACHE_FILE: &str = "contributors.json";

// Shape of config.toml; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    token: Option<String>,
    api_base: Option<String>,
    cache_ttl_secs: Option<u64>,
    per_page: Option<u32>,
    max_pages: Option<u32>,
    language: Option<Language>,
    persist_cache: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub token: Option<String>,
    pub api_base: String,
    pub cache_ttl: Duration,
    pub per_page: u32,
    pub max_pages: u32,
    /// Forced language; None means "use the remembered one"
    pub language: Option<Language>,
    /// Mirror the contributor cache to disk between runs
    pub persist_cache: bool,
    pub config_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            cache_ttl: DEFAULT_TTL,
            per_page: MAX_PER_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
            language: None,
            persist_cache: true,
            config_dir: None,
            cache_dir: None,
        }
    }
}

impl Settings {
    // Reads config.toml and the real environment
    pub fn load() -> Result<Self> {
        Self::from_env(|key| std::env::var(key).ok())
    }

    // Same as load(), with an injectable environment for tests
    pub fn from_env(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config_dir = env("HUB_IO_CONFIG_DIR")
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|d| d.join(APP_DIR)));
        let cache_dir = env("HUB_IO_CACHE_DIR")
            .map(PathBuf::from)
            .or_else(|| dirs::cache_dir().map(|d| d.join(APP_DIR)));

        let mut settings = Settings {
            config_dir,
            cache_dir,
            ..Settings::default()
        };

        if let Some(path) = settings.config_file() {
            if path.exists() {
                let raw = fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                settings.apply_file(&raw, &path)?;
            }
        }

        settings.apply_env(env)?;
        Ok(settings)
    }

    fn apply_file(&mut self, raw: &str, path: &Path) -> Result<()> {
        let file: FileConfig =
            toml::from_str(raw).with_context(|| format!("parsing {}", path.display()))?;

        if let Some(v) = file.token {
            self.token = Some(v);
        }
        if let Some(v) = file.api_base {
            self.api_base = v;
        }
        if let Some(v) = file.cache_ttl_secs {
            self.cache_ttl = Duration::from_secs(v);
        }
        if let Some(v) = file.per_page {
            self.per_page = v;
        }
        if let Some(v) = file.max_pages {
            self.max_pages = v;
        }
        if let Some(v) = file.language {
            self.language = Some(v);
        }
        if let Some(v) = file.persist_cache {
            self.persist_cache = v;
        }
        Ok(())
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        // HUB_IO_TOKEN wins over the generic GITHUB_TOKEN
        if let Some(v) = env("GITHUB_TOKEN") {
            self.token = Some(v);
        }
        if let Some(v) = env("HUB_IO_TOKEN") {
            self.token = Some(v);
        }
        if let Some(v) = env("HUB_IO_API_BASE") {
            self.api_base = v;
        }
        if let Some(v) = env("HUB_IO_CACHE_TTL_SECS") {
            let secs: u64 = v
                .trim()
                .parse()
                .with_context(|| format!("HUB_IO_CACHE_TTL_SECS must be a number, got {v:?}"))?;
            self.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(v) = env("HUB_IO_LANG") {
            self.language = Some(
                Language::from_code(&v)
                    .with_context(|| format!("HUB_IO_LANG must be \"en\" or \"zh\", got {v:?}"))?,
            );
        }
        Ok(())
    }

    pub fn config_file(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|d| d.join(CONFIG_FILE))
    }

    pub fn language_file(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|d| d.join(LANGUAGE_FILE))
    }

    // Where the contributor cache lives, if it should be persisted
    pub fn cache_file(&self) -> Option<PathBuf> {
        if !self.persist_cache {
            return None;
        }
        self.cache_dir.as_ref().map(|d| d.join(CACHE_FILE))
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            api_base: self.api_base.clone(),
            token: self.token.clone(),
            per_page: self.per_page,
            max_pages: self.max_pages,
            ..ClientOptions::default()
        }
    }
}
