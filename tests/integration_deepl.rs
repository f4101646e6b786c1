// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Integration tests for the DeepL client using wiremock.

use erutcurts::error::{BotError, TranslateError};
use erutcurts::translate::{DeeplClient, LanguageMap, source_language};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> DeeplClient {
    DeeplClient::new("test-key:fx").with_api_url(server.uri())
}

#[tokio::test]
async fn test_translate_sends_auth_and_languages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/translate"))
        .and(header("Authorization", "DeepL-Auth-Key test-key:fx"))
        .and(body_json(json!({
            "text": ["Minecraft Beta & Preview - 1.19.80.20"],
            "source_lang": "EN",
            "target_lang": "JA",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translations": [
                {"detected_source_language": "EN", "text": "Minecraft ベータ & プレビュー - 1.19.80.20"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = source_language("en-US");
    let translated = client(&server)
        .translate("Minecraft Beta & Preview - 1.19.80.20", Some(&source), "JA")
        .await
        .unwrap();

    assert_eq!(translated, "Minecraft ベータ & プレビュー - 1.19.80.20");
}

#[tokio::test]
async fn test_target_languages_feed_language_map() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/languages"))
        .and(query_param("type", "target"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"language": "EN-US", "name": "English (American)", "supports_formality": false},
            {"language": "JA", "name": "Japanese", "supports_formality": false},
            {"language": "ZH", "name": "Chinese (simplified)"}
        ])))
        .mount(&server)
        .await;

    let languages = client(&server).target_languages().await.unwrap();
    assert_eq!(languages.len(), 3);

    let map = LanguageMap::new(&languages);
    assert_eq!(map.resolve("ja"), Some("JA"));
    assert_eq!(map.resolve("zh-TW"), Some("ZH"));
    assert_eq!(map.resolve("fr"), None);
}

#[tokio::test]
async fn test_api_error_carries_status_and_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/translate"))
        .respond_with(
            ResponseTemplate::new(456).set_body_json(json!({"message": "Quota exceeded"})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .translate("text", None, "JA")
        .await
        .unwrap_err();

    match err {
        BotError::Translate(boxed) => match *boxed {
            TranslateError::Api { status, message } => {
                assert_eq!(status, 456);
                assert_eq!(message, "Quota exceeded");
            }
            other => panic!("Expected TranslateError::Api, got {other:?}"),
        },
        other => panic!("Expected BotError::Translate, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_translation_list_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translations": []})))
        .mount(&server)
        .await;

    let err = client(&server).translate("text", None, "JA").await.unwrap_err();
    assert!(matches!(
        err,
        BotError::Translate(boxed) if matches!(*boxed, TranslateError::EmptyResponse)
    ));
}
