// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Changelog translation with DeepL.
//!
//! ```text
//! crossposted message from "MINECRAFT #bedrock-changelogs"
//!        |
//!        v
//! ChangelogKind ---> first_line ---> thread_name (<= 100 chars)
//!        |
//!        v
//! LanguageMap::resolve(guild locale) --> DeeplClient::translate(EN -> target)
//!        |
//!        v
//! split_message (<= 2000 chars per message)
//! ```

pub mod changelog;
mod deepl;

pub use deepl::{DeeplClient, FREE_API_URL, Language, PRO_API_URL, is_free_key};

use std::collections::HashMap;

use crate::error::TranslateError;

/// Locales Discord lets a guild choose.
pub const DISCORD_LOCALES: [&str; 31] = [
    "id", "da", "de", "en-GB", "en-US", "es-ES", "fr", "hr", "it", "lt", "hu", "nl", "no", "pl",
    "pt-BR", "ro", "fi", "sv-SE", "vi", "tr", "cs", "el", "bg", "ru", "uk", "hi", "th", "zh-CN",
    "ja", "zh-TW", "ko",
];

/// Discord locale to DeepL target language.
#[derive(Debug, Clone, Default)]
pub struct LanguageMap {
    by_code: HashMap<String, String>,
}

impl LanguageMap {
    #[must_use]
    pub fn new(target_languages: &[Language]) -> Self {
        Self {
            by_code: target_languages
                .iter()
                .map(|l| (l.language.to_ascii_lowercase(), l.language.clone()))
                .collect(),
        }
    }

    /// Exact match first, then the language subtag alone.
    #[must_use]
    pub fn resolve(&self, locale: &str) -> Option<&str> {
        let locale = locale.to_ascii_lowercase();
        self.by_code
            .get(&locale)
            .or_else(|| self.by_code.get(language_subtag(&locale)))
            .map(String::as_str)
    }

    /// Like [`LanguageMap::resolve`] but an error when unsupported.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::UnsupportedLocale`] when no language matches.
    pub fn target(&self, locale: &str) -> Result<&str, TranslateError> {
        self.resolve(locale)
            .ok_or_else(|| TranslateError::UnsupportedLocale(locale.to_string()))
    }

    /// Discord locales with a DeepL target.
    #[must_use]
    pub fn supported_locales(&self) -> Vec<&'static str> {
        DISCORD_LOCALES
            .into_iter()
            .filter(|locale| self.resolve(locale).is_some())
            .collect()
    }
}

fn language_subtag(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

/// DeepL source languages carry no region: `en-US` becomes `EN`.
#[must_use]
pub fn source_language(locale: &str) -> String {
    language_subtag(locale).to_ascii_uppercase()
}
