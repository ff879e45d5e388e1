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

pub mod catalog;
pub mod chart;
pub mod error;
pub mod resultset;

pub use catalog::{ColumnCatalog, ColumnEntry, DataType};
pub use chart::{build, ChartKind, ChartRequest, ChartSpec, PivotTable};
pub use error::{CatalogError, ChartError, DashboardError, Result};
pub use resultset::{ResultSet, Scalar};

// Front door for the presentation shell: owns the catalog and resolves the
// shell's label selections before delegating to the chart builder, so the
// label<->id lookups live in exactly one place.
pub struct ChartStudio {
    catalog: ColumnCatalog,
}

impl ChartStudio {
    pub fn new() -> Result<Self> {
        let catalog = ColumnCatalog::embedded().map_err(|e| DashboardError::Config {
            reason: format!("Failed to load column catalog: {e}"),
        })?;
        Ok(Self { catalog })
    }

    pub fn with_catalog(catalog: ColumnCatalog) -> Self {
        Self { catalog }
    }

    pub fn from_catalog_file(path: &str) -> Result<Self> {
        let catalog = ColumnCatalog::from_yaml_file(path).map_err(|e| DashboardError::Config {
            reason: format!("Failed to load column catalog from '{path}': {e}"),
        })?;
        Ok(Self { catalog })
    }

    pub fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    pub fn primary_labels(&self, kind: ChartKind) -> Vec<&str> {
        self.catalog.labels_of_types(kind.primary_types())
    }

    pub fn secondary_labels(&self, kind: ChartKind) -> Vec<&str> {
        self.catalog.labels_of_types(kind.secondary_types())
    }

    pub fn build_chart(&self, request: &ChartRequest, rows: &ResultSet) -> Result<ChartSpec> {
        chart::build(&self.catalog, request, rows).map_err(Into::into)
    }

    pub fn build_from_labels(
        &self,
        kind: ChartKind,
        primary_label: &str,
        secondary_label: Option<&str>,
        rows: &ResultSet,
    ) -> Result<ChartSpec> {
        let primary = self.catalog.id_of(primary_label)?.to_string();
        let secondary = match secondary_label {
            Some(label) => Some(self.catalog.id_of(label)?.to_string()),
            None => None,
        };
        self.build_chart(
            &ChartRequest {
                kind,
                primary,
                secondary,
            },
            rows,
        )
    }
}

impl Default for ChartStudio {
    fn default() -> Self {
        Self::new().expect("Failed to create default chart studio")
    }
}
