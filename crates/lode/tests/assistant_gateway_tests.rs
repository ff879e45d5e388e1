// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use lode::{AssistantConfig, AssistantError, AssistantGateway};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: &str, timeout_secs: u64) -> AssistantConfig {
    AssistantConfig {
        endpoint: format!("{base_url}/v1/chat/completions"),
        api_key: "sk-test".to_string(),
        model: "gpt-4o-mini".to_string(),
        timeout_secs,
    }
}

#[tokio::test]
async fn complete_returns_the_first_candidate_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o-mini"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "The North region sold 12 units." } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = AssistantGateway::new(test_config(&server.uri(), 5));
    let text = gateway
        .complete("How many units did the North region sell?")
        .await
        .unwrap();
    assert_eq!(text, "The North region sold 12 units.");
}

#[tokio::test]
async fn a_body_without_candidate_text_is_not_a_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": []
        })))
        .mount(&server)
        .await;

    let gateway = AssistantGateway::new(test_config(&server.uri(), 5));
    let err = gateway.complete("anything").await.unwrap_err();
    assert!(matches!(err, AssistantError::Unavailable(_)));
}

#[tokio::test]
async fn rate_limiting_is_reported_as_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limit exceeded"))
        .mount(&server)
        .await;

    let gateway = AssistantGateway::new(test_config(&server.uri(), 5));
    let err = gateway.complete("anything").await.unwrap_err();
    match err {
        AssistantError::Unavailable(msg) => assert!(msg.contains("429")),
    }
}

#[tokio::test]
async fn server_errors_are_reported_as_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let gateway = AssistantGateway::new(test_config(&server.uri(), 5));
    let err = gateway.complete("anything").await.unwrap_err();
    assert!(matches!(err, AssistantError::Unavailable(_)));
}

#[tokio::test]
async fn timeouts_are_reported_as_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(3))
                .set_body_json(serde_json::json!({
                    "choices": [ { "message": { "content": "too late" } } ]
                })),
        )
        .mount(&server)
        .await;

    let gateway = AssistantGateway::new(test_config(&server.uri(), 1));
    let err = gateway.complete("anything").await.unwrap_err();
    assert!(matches!(err, AssistantError::Unavailable(_)));
}
