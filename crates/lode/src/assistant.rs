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

use crate::config::AssistantConfig;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Assistant unavailable: {0}")]
    Unavailable(String),
}

pub type AssistantResult<T> = std::result::Result<T, AssistantError>;

const SYSTEM_INSTRUCTION: &str = "You are the analytics assistant embedded in a sales dashboard. \
Answer questions about the data concisely and in plain language.";

// Single-turn completion gateway. One request per user action, the full body
// awaited before returning; no retry and no streaming.
pub struct AssistantGateway {
    client: Client,
    config: AssistantConfig,
    timeout: Duration,
}

impl AssistantGateway {
    pub fn new(config: AssistantConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            config,
            timeout,
        }
    }

    fn build_payload(&self, prompt: &str) -> Value {
        json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_INSTRUCTION },
                { "role": "user", "content": prompt }
            ]
        })
    }

    fn parse_response(&self, response_data: &Value) -> AssistantResult<String> {
        response_data["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                AssistantError::Unavailable("response carried no candidate text".to_string())
            })
    }

    pub async fn complete(&self, prompt_text: &str) -> AssistantResult<String> {
        let request_id = Uuid::new_v4();
        debug!("Sending assistant request {request_id}");

        let result = tokio::time::timeout(
            self.timeout,
            self.client
                .post(&self.config.endpoint)
                .header("Authorization", format!("Bearer {}", self.config.api_key))
                .header("Content-Type", "application/json")
                .json(&self.build_payload(prompt_text))
                .send(),
        )
        .await;

        match result {
            Ok(Ok(response)) => {
                let status = response.status();
                if status.is_success() {
                    let body: Value = response.json().await.map_err(|e| {
                        AssistantError::Unavailable(format!("malformed response: {e}"))
                    })?;
                    let text = self.parse_response(&body)?;
                    info!("Assistant request {request_id} completed");
                    Ok(text)
                } else {
                    let detail = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "no detail".to_string());
                    Err(AssistantError::Unavailable(format!(
                        "api error {status}: {detail}"
                    )))
                }
            }
            Ok(Err(e)) => Err(AssistantError::Unavailable(format!("request failed: {e}"))),
            Err(_) => Err(AssistantError::Unavailable("request timed out".to_string())),
        }
    }
}
