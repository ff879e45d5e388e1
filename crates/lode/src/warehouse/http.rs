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

use super::{SessionHandle, SqlTransport, WarehouseError, WarehouseResult};
use crate::config::WarehouseConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use vista::{ResultSet, Scalar};

// Session-per-call REST transport for the warehouse's SQL endpoint:
// login-request yields a token, query-request executes under it, and
// logout-request releases it. No pooling and no reuse across calls.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: WarehouseConfig,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<LoginData>,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    token: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<QueryData>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(default)]
    rowtype: Vec<RowType>,
    #[serde(default)]
    rowset: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct RowType {
    name: String,
}

impl HttpTransport {
    pub fn new(config: WarehouseConfig) -> Self {
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

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SqlTransport for HttpTransport {
    async fn open(&self) -> WarehouseResult<SessionHandle> {
        let payload = json!({
            "data": {
                "ACCOUNT_NAME": self.config.account,
                "LOGIN_NAME": self.config.user,
                "PASSWORD": self.config.password,
            }
        });
        let response = tokio::time::timeout(
            self.timeout,
            self.client
                .post(self.endpoint("/session/v1/login-request"))
                .header("Content-Type", "application/json")
                .json(&payload)
                .send(),
        )
        .await
        .map_err(|_| WarehouseError::ConnectionFailed("login request timed out".to_string()))?
        .map_err(|e| WarehouseError::ConnectionFailed(format!("login request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(WarehouseError::ConnectionFailed(format!(
                "login rejected with status {}",
                response.status()
            )));
        }
        let body: LoginResponse = response.json().await.map_err(|e| {
            WarehouseError::ConnectionFailed(format!("malformed login response: {e}"))
        })?;
        if !body.success {
            return Err(WarehouseError::ConnectionFailed(
                body.message
                    .unwrap_or_else(|| "authentication refused".to_string()),
            ));
        }
        let token = body.data.map(|d| d.token).ok_or_else(|| {
            WarehouseError::ConnectionFailed("login response carried no token".to_string())
        })?;
        debug!("Warehouse session opened");
        Ok(SessionHandle { token })
    }

    async fn execute(
        &self,
        session: &SessionHandle,
        statement: &str,
    ) -> WarehouseResult<ResultSet> {
        let payload = json!({
            "sqlText": statement,
            "warehouse": self.config.warehouse,
            "database": self.config.database,
            "schema": self.config.schema,
        });
        let response = tokio::time::timeout(
            self.timeout,
            self.client
                .post(self.endpoint("/queries/v1/query-request"))
                .header("Authorization", format!("Bearer {}", session.token))
                .header("Content-Type", "application/json")
                .json(&payload)
                .send(),
        )
        .await
        .map_err(|_| WarehouseError::ConnectionFailed("query request timed out".to_string()))?
        .map_err(|e| WarehouseError::ConnectionFailed(format!("query request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "no detail".to_string());
            return Err(WarehouseError::QueryFailed(format!(
                "status {status}: {detail}"
            )));
        }
        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| WarehouseError::QueryFailed(format!("malformed query response: {e}")))?;
        if !body.success {
            return Err(WarehouseError::QueryFailed(
                body.message.unwrap_or_else(|| "query rejected".to_string()),
            ));
        }
        let data = body.data.ok_or_else(|| {
            WarehouseError::QueryFailed("query response carried no result data".to_string())
        })?;
        let columns = data.rowtype.into_iter().map(|c| c.name).collect();
        let rows = data
            .rowset
            .into_iter()
            .map(|row| row.into_iter().map(Scalar::from).collect())
            .collect();
        Ok(ResultSet::from_parts(columns, rows))
    }

    async fn close(&self, session: SessionHandle) -> WarehouseResult<()> {
        let response = tokio::time::timeout(
            self.timeout,
            self.client
                .post(self.endpoint("/session/logout-request"))
                .header("Authorization", format!("Bearer {}", session.token))
                .send(),
        )
        .await
        .map_err(|_| WarehouseError::ConnectionFailed("logout request timed out".to_string()))?
        .map_err(|e| WarehouseError::ConnectionFailed(format!("logout request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(WarehouseError::ConnectionFailed(format!(
                "logout rejected with status {}",
                response.status()
            )));
        }
        debug!("Warehouse session released");
        Ok(())
    }
}
