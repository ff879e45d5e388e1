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

use crate::chart::ChartKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("unknown column '{name}'")]
    UnknownColumn { name: String },
}

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("'{name}' is not a chart kind")]
    UnknownKind { name: String },
    #[error("{kind} requires a secondary column")]
    MissingSecondary { kind: ChartKind },
    #[error("{kind} takes a single column but secondary '{column}' was supplied")]
    UnexpectedSecondary { kind: ChartKind, column: String },
    #[error("{kind} requires two distinct columns, got '{column}' twice")]
    DuplicateColumn { kind: ChartKind, column: String },
    #[error("column '{column}' is not present in the result set")]
    ColumnMissingFromResult { column: String },
    #[error(transparent)]
    UnknownColumn(#[from] CatalogError),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
pub type ChartResult<T> = std::result::Result<T, ChartError>;

impl DashboardError {
    pub fn category(&self) -> &'static str {
        match self {
            DashboardError::Catalog(_) => "Catalog",
            DashboardError::Chart(_) => "Chart",
            DashboardError::Config { .. } => "Configuration",
        }
    }
}
