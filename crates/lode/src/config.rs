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

use dotenvy::dotenv;
use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for {key}: {value}")]
    InvalidVar { key: String, value: String },
}

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// One instance of each config lives for the process and is handed to the
// gateway constructor; nothing reads the environment after start-up.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    pub base_url: String,
    pub account: String,
    pub user: String,
    pub password: String,
    pub warehouse: String,
    pub database: String,
    pub schema: String,
    pub timeout_secs: u64,
}

impl WarehouseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        let required = |key: &str| -> Result<String, ConfigError> {
            env::var(key).map_err(|_| ConfigError::MissingVar(key.to_string()))
        };
        Ok(Self {
            base_url: required("WAREHOUSE_URL")?,
            account: required("WAREHOUSE_ACCOUNT")?,
            user: required("WAREHOUSE_USER")?,
            password: required("WAREHOUSE_PASSWORD")?,
            warehouse: required("WAREHOUSE_NAME")?,
            database: required("WAREHOUSE_DATABASE")?,
            schema: required("WAREHOUSE_SCHEMA")?,
            timeout_secs: optional_secs("WAREHOUSE_TIMEOUT_SECS")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl AssistantConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        let api_key = env::var("ASSISTANT_API_KEY")
            .map_err(|_| ConfigError::MissingVar("ASSISTANT_API_KEY".to_string()))?;
        Ok(Self {
            endpoint: env::var("ASSISTANT_ENDPOINT")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string()),
            api_key,
            model: env::var("ASSISTANT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            timeout_secs: optional_secs("ASSISTANT_TIMEOUT_SECS")?,
        })
    }
}

fn optional_secs(key: &str) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidVar {
            key: key.to_string(),
            value,
        }),
        Err(_) => Ok(DEFAULT_TIMEOUT_SECS),
    }
}
