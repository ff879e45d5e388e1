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

pub mod guard;
pub mod http;

use crate::config::WarehouseConfig;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use vista::ResultSet;

pub use http::HttpTransport;

#[derive(Error, Debug)]
pub enum WarehouseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

pub type WarehouseResult<T> = std::result::Result<T, WarehouseError>;

#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub token: String,
}

#[async_trait]
pub trait SqlTransport: Send + Sync {
    async fn open(&self) -> WarehouseResult<SessionHandle>;

    async fn execute(
        &self,
        session: &SessionHandle,
        statement: &str,
    ) -> WarehouseResult<ResultSet>;

    async fn close(&self, session: SessionHandle) -> WarehouseResult<()>;
}

pub struct WarehouseGateway {
    transport: Arc<dyn SqlTransport>,
}

impl WarehouseGateway {
    pub fn new(config: WarehouseConfig) -> Self {
        Self {
            transport: Arc::new(HttpTransport::new(config)),
        }
    }

    pub fn with_transport(transport: Arc<dyn SqlTransport>) -> Self {
        Self { transport }
    }

    // The session is scoped to this call and is released whether or not
    // execution succeeded. A failed release never masks the execution error.
    pub async fn run(&self, statement: &str) -> WarehouseResult<ResultSet> {
        guard::ensure_read_only(statement)?;
        let session = self.transport.open().await?;
        let result = self.transport.execute(&session, statement).await;
        if let Err(e) = self.transport.close(session).await {
            warn!("Failed to release warehouse session: {e}");
        }
        let rows = result?;
        info!("Query returned {} row(s)", rows.row_count());
        Ok(rows)
    }
}
