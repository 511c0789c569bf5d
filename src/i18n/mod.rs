// src/i18n/mod.rs
// =============================================================================
// A tiny English / Chinese translation layer.
//
// Every user-facing string is a `Text { en, zh }` pair (see messages.rs).
// `I18n::t` picks the half matching the current language and fills in
// {{placeholders}} from a list of values.
//
// The chosen language is remembered in a one-line file ("en" or "zh")
// under the config directory. Without a saved choice we look at the
// locale environment (LC_ALL, LC_MESSAGES, LANG).
// =============================================================================

pub mod messages;

use std::fmt;
use std::fs;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zh,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "en" => Some(Language::En),
            "zh" => Some(Language::Zh),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Zh,
            Language::Zh => Language::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => f.write_str("English"),
            Language::Zh => f.write_str("中文"),
        }
    }
}

// One message in both languages
#[derive(Debug, Clone, Copy)]
pub struct Text {
    pub en: &'static str,
    pub zh: &'static str,
}

impl Text {
    pub fn get(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.en,
            Language::Zh => self.zh,
        }
    }
}

// The current language plus where to remember it
#[derive(Debug)]
pub struct I18n {
    language: Language,
    path: Option<PathBuf>,
}

impl I18n {
    // Fixed language, nothing persisted
    pub fn new(language: Language) -> Self {
        Self {
            language,
            path: None,
        }
    }

    // Restores the saved language from `path`, falling back to the locale
    pub fn load(path: Option<PathBuf>) -> Self {
        let saved = path
            .as_ref()
            .and_then(|p| fs::read_to_string(p).ok());
        let locale = LOCALE_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty());

        let language = detect_language(saved.as_deref(), locale.as_deref());
        debug!(language = language.code(), "initial language");

        Self { language, path }
    }

    // Uses `language` for this process only; the saved choice is untouched
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    // Switches language and remembers the choice
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.persist();
    }

    // English <-> Chinese
    pub fn toggle(&mut self) -> Language {
        self.set_language(self.language.toggled());
        self.language
    }

    // Translates without placeholders
    pub fn tr(&self, text: &Text) -> String {
        text.get(self.language).to_string()
    }

    // Translates and fills {{key}} placeholders
    //
    // Example:
    //   t(&SUCCESS_FOUND, &[("count", "3".into())]) -> "Success! Found 3 contributors."
    pub fn t(&self, text: &Text, values: &[(&str, String)]) -> String {
        interpolate(text.get(self.language), values)
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        let result = path
            .parent()
            .map(fs::create_dir_all)
            .unwrap_or(Ok(()))
            .and_then(|_| fs::write(path, self.language.code()));
        if let Err(e) = result {
            warn!(path = %path.display(), error = %e, "could not save language");
        }
    }
}

// Saved choice wins; otherwise "zh*" locales get Chinese, everyone else English
pub fn detect_language(saved: Option<&str>, locale: Option<&str>) -> Language {
    if let Some(language) = saved.and_then(Language::from_code) {
        return language;
    }
    match locale {
        Some(l) if l.to_ascii_lowercase().starts_with("zh") => Language::Zh,
        _ => Language::En,
    }
}

// Replaces every {{key}} whose key is in `values`.
// Keys are ASCII word characters; unknown keys stay in the output untouched.
pub fn interpolate(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let key_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let key = &after[..key_len];

        if key_len > 0 && after[key_len..].starts_with("}}") {
            match values.iter().find(|(k, _)| *k == key) {
                Some((_, value)) => out.push_str(value),
                None => out.push_str(&rest[start..start + 2 + key_len + 2]),
            }
            rest = &after[key_len + 2..];
        } else {
            // Not a placeholder here; a later brace may still start one
            out.push('{');
            rest = &rest[start + 1..];
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::messages::SUCCESS_FOUND;
    use super::*;

    #[test]
    fn test_translation_picks_language() {
        let text = Text { en: "Query", zh: "查询" };
        assert_eq!(I18n::new(Language::En).tr(&text), "Query");
        assert_eq!(I18n::new(Language::Zh).tr(&text), "查询");
    }

    #[test]
    fn test_interpolates_count() {
        let i18n = I18n::new(Language::En);
        let msg = i18n.t(&SUCCESS_FOUND, &[("count", 12.to_string())]);
        assert_eq!(msg, "Success! Found 12 contributors.");

        let i18n = I18n::new(Language::Zh);
        let msg = i18n.t(&SUCCESS_FOUND, &[("count", 12.to_string())]);
        assert_eq!(msg, "成功！找到 12 个贡献者。");
    }

    #[test]
    fn test_unknown_placeholder_left_verbatim() {
        assert_eq!(
            interpolate("{{a}} and {{b}}", &[("a", "1".into())]),
            "1 and {{b}}"
        );
        assert_eq!(interpolate("open {{ only", &[]), "open {{ only");
        assert_eq!(interpolate("{{not a key}}", &[("not a key", "x".into())]), "{{not a key}}");
    }

    #[test]
    fn test_interpolate_after_extra_braces() {
        let values = [("a", "1".to_string())];
        assert_eq!(interpolate("{{{{a}}", &values), "{{1");
        assert_eq!(interpolate("{{{a}}}", &values), "{1}");
        assert_eq!(interpolate("x {{", &values), "x {{");
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language(Some("zh"), Some("en_US.UTF-8")), Language::Zh);
        assert_eq!(detect_language(Some("fr"), Some("zh_CN.UTF-8")), Language::Zh);
        assert_eq!(detect_language(None, Some("en_GB.UTF-8")), Language::En);
        assert_eq!(detect_language(None, None), Language::En);
    }

    #[test]
    fn test_toggle_persists_choice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hub-io").join("language");

        let mut i18n = I18n {
            language: Language::En,
            path: Some(path.clone()),
        };
        assert_eq!(i18n.toggle(), Language::Zh);
        assert_eq!(fs::read_to_string(&path).unwrap(), "zh");

        let restored = I18n::load(Some(path));
        assert_eq!(restored.language(), Language::Zh);
    }
}
