// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::error::{BotResult, NetworkError, TranslateError};
use crate::logging::LogReason;
use crate::net::global_client;

pub const FREE_API_URL: &str = "https://api-free.deepl.com";
pub const PRO_API_URL: &str = "https://api.deepl.com";

const FREE_KEY_SUFFIX: &str = ":fx";

/// Free-plan keys end with `:fx` and must use the free host.
#[must_use]
pub fn is_free_key(auth_key: &str) -> bool {
    auth_key.ends_with(FREE_KEY_SUFFIX)
}

/// A DeepL target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Code such as `EN-US` or `JA`.
    pub language: String,
    pub name: String,
    #[serde(default)]
    pub supports_formality: bool,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<&'a str>,
    target_lang: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    text: String,
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

/// Minimal client for the DeepL v2 JSON API.
#[derive(Debug, Clone)]
pub struct DeeplClient {
    client: Client,
    api_url: String,
    auth_key: String,
}

impl DeeplClient {
    /// Client for the host matching the key's plan.
    #[must_use]
    pub fn new(auth_key: impl Into<String>) -> Self {
        let auth_key = auth_key.into();
        let api_url = if is_free_key(&auth_key) {
            FREE_API_URL
        } else {
            PRO_API_URL
        };
        Self {
            client: global_client().clone(),
            api_url: api_url.to_string(),
            auth_key,
        }
    }

    /// Use another API host, e.g. a mock server.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    #[must_use]
    pub fn is_free(&self) -> bool {
        is_free_key(&self.auth_key)
    }

    fn authorization(&self) -> String {
        format!("DeepL-Auth-Key {}", self.auth_key)
    }

    /// Translate `text` into `target`; DeepL detects the source when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, DeepL answers with an error
    /// status, or the answer holds no translation.
    pub async fn translate(&self, text: &str, source: Option<&str>, target: &str) -> BotResult<String> {
        let url = format!("{}/v2/translate", self.api_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.authorization())
            .json(&TranslateRequest {
                text: [text],
                source_lang: source,
                target_lang: target,
            })
            .send()
            .await
            .map_err(NetworkError::Reqwest)?;
        let body: TranslateResponse = check(response)
            .await?
            .json()
            .await
            .map_err(NetworkError::Reqwest)?;

        let translated = body
            .translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or(TranslateError::EmptyResponse)?;
        tracing::debug!(reason = %LogReason::Translate, source, target, chars = translated.len(), "Translated text");
        Ok(translated)
    }

    /// Languages DeepL can translate into.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or DeepL answers with an error
    /// status.
    pub async fn target_languages(&self) -> BotResult<Vec<Language>> {
        let url = format!("{}/v2/languages?type=target", self.api_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", self.authorization())
            .send()
            .await
            .map_err(NetworkError::Reqwest)?;
        let languages: Vec<Language> = check(response)
            .await?
            .json()
            .await
            .map_err(NetworkError::Reqwest)?;
        tracing::debug!(reason = %LogReason::Translate, count = languages.len(), "Fetched DeepL target languages");
        Ok(languages)
    }
}

async fn check(response: Response) -> BotResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiMessage>(&body)
        .map(|m| m.message)
        .unwrap_or(body);
    let message = if message.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        message
    };
    Err(TranslateError::Api {
        status: status.as_u16(),
        message,
    }
    .into())
}
