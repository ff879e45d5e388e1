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

use crate::catalog::{ColumnCatalog, DataType};
use crate::error::{ChartError, ChartResult};
use crate::resultset::ResultSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Scatter,
    Histogram,
    #[serde(rename = "boxplot")]
    BoxPlot,
    Bar,
    Pie,
    Heatmap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::Scatter,
        ChartKind::Histogram,
        ChartKind::BoxPlot,
        ChartKind::Bar,
        ChartKind::Pie,
        ChartKind::Heatmap,
    ];

    pub fn takes_secondary(&self) -> bool {
        matches!(self, ChartKind::Scatter | ChartKind::Bar | ChartKind::Heatmap)
    }

    // Advisory column types for the shell's pickers; build() itself only
    // checks arity and catalog membership.
    pub fn primary_types(&self) -> &'static [DataType] {
        match self {
            ChartKind::Scatter | ChartKind::Histogram | ChartKind::BoxPlot => &[DataType::Numeric],
            ChartKind::Bar | ChartKind::Heatmap => &[DataType::Categorical, DataType::Temporal],
            ChartKind::Pie => &[DataType::Categorical],
        }
    }

    pub fn secondary_types(&self) -> &'static [DataType] {
        match self {
            ChartKind::Scatter => &[DataType::Numeric],
            ChartKind::Bar => &[DataType::Numeric],
            ChartKind::Heatmap => &[DataType::Categorical, DataType::Temporal],
            ChartKind::Histogram | ChartKind::BoxPlot | ChartKind::Pie => &[],
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Scatter => "scatter",
            ChartKind::Histogram => "histogram",
            ChartKind::BoxPlot => "boxplot",
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Heatmap => "heatmap",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scatter" => Ok(ChartKind::Scatter),
            "histogram" => Ok(ChartKind::Histogram),
            "boxplot" | "box" => Ok(ChartKind::BoxPlot),
            "bar" => Ok(ChartKind::Bar),
            "pie" => Ok(ChartKind::Pie),
            "heatmap" => Ok(ChartKind::Heatmap),
            other => Err(ChartError::UnknownKind {
                name: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub primary: String,
    pub secondary: Option<String>,
}

impl ChartRequest {
    pub fn single(kind: ChartKind, primary: &str) -> Self {
        Self {
            kind,
            primary: primary.to_string(),
            secondary: None,
        }
    }

    pub fn paired(kind: ChartKind, primary: &str, secondary: &str) -> Self {
        Self {
            kind,
            primary: primary.to_string(),
            secondary: Some(secondary.to_string()),
        }
    }
}

// Renderer-agnostic description of what to draw. Titles come from catalog
// labels; bindings map channels to column ids. Everything else is the
// renderer's business.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub bindings: HashMap<String, String>,
    pub pivot: Option<PivotTable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotTable {
    pub columns: Vec<String>,
    pub rows: Vec<String>,
    pub cells: Vec<Vec<Option<u64>>>,
}

impl PivotTable {
    pub fn count(&self, row: &str, column: &str) -> Option<u64> {
        let r = self.rows.iter().position(|v| v == row)?;
        let c = self.columns.iter().position(|v| v == column)?;
        self.cells[r][c]
    }
}

pub fn build(
    catalog: &ColumnCatalog,
    request: &ChartRequest,
    rows: &ResultSet,
) -> ChartResult<ChartSpec> {
    let kind = request.kind;
    let primary_label = catalog.label_of(&request.primary)?.to_string();

    let secondary = if kind.takes_secondary() {
        let id = request
            .secondary
            .as_deref()
            .ok_or(ChartError::MissingSecondary { kind })?;
        if id == request.primary {
            return Err(ChartError::DuplicateColumn {
                kind,
                column: id.to_string(),
            });
        }
        Some((id.to_string(), catalog.label_of(id)?.to_string()))
    } else {
        if let Some(id) = &request.secondary {
            return Err(ChartError::UnexpectedSecondary {
                kind,
                column: id.clone(),
            });
        }
        None
    };

    let mut bindings = HashMap::new();
    let mut pivot = None;
    let title = match (kind, &secondary) {
        (ChartKind::Scatter, Some((secondary_id, secondary_label))) => {
            bindings.insert("x".to_string(), request.primary.clone());
            bindings.insert("y".to_string(), secondary_id.clone());
            format!("{primary_label} vs {secondary_label}")
        }
        (ChartKind::Histogram, None) => {
            bindings.insert("x".to_string(), request.primary.clone());
            format!("Distribution of {primary_label}")
        }
        (ChartKind::BoxPlot, None) => {
            bindings.insert("y".to_string(), request.primary.clone());
            format!("Spread of {primary_label}")
        }
        (ChartKind::Bar, Some((secondary_id, secondary_label))) => {
            // Pass-through: one bar per source row, no aggregation.
            bindings.insert("category".to_string(), request.primary.clone());
            bindings.insert("value".to_string(), secondary_id.clone());
            format!("{secondary_label} by {primary_label}")
        }
        (ChartKind::Pie, None) => {
            bindings.insert("names".to_string(), request.primary.clone());
            format!("Breakdown of {primary_label}")
        }
        (ChartKind::Heatmap, Some((secondary_id, secondary_label))) => {
            bindings.insert("x".to_string(), request.primary.clone());
            bindings.insert("y".to_string(), secondary_id.clone());
            pivot = Some(pivot_counts(rows, &request.primary, secondary_id)?);
            format!("{primary_label} vs {secondary_label} frequency")
        }
        // takes_secondary() and the arity checks above make the remaining
        // combinations unreachable.
        _ => unreachable!("chart arity already validated"),
    };

    Ok(ChartSpec {
        kind,
        title,
        bindings,
        pivot,
    })
}

// Group-count over (primary, secondary), pivoted secondary (rows) x primary
// (columns) in first-seen order. Combinations that never occur stay None
// rather than zero, and rows with a null in either column are skipped.
fn pivot_counts(rows: &ResultSet, primary: &str, secondary: &str) -> ChartResult<PivotTable> {
    let p_idx = rows
        .column_index(primary)
        .ok_or_else(|| ChartError::ColumnMissingFromResult {
            column: primary.to_string(),
        })?;
    let s_idx = rows
        .column_index(secondary)
        .ok_or_else(|| ChartError::ColumnMissingFromResult {
            column: secondary.to_string(),
        })?;

    let mut observed = Vec::new();
    let mut counts: HashMap<(String, String), u64> = HashMap::new();
    for row in rows.rows() {
        let p = row.get(p_idx).and_then(|v| v.as_key());
        let s = row.get(s_idx).and_then(|v| v.as_key());
        if let (Some(p), Some(s)) = (p, s) {
            *counts.entry((p.clone(), s.clone())).or_insert(0) += 1;
            observed.push((p, s));
        }
    }

    let columns: Vec<String> = observed.iter().map(|(p, _)| p.clone()).unique().collect();
    let row_labels: Vec<String> = observed.iter().map(|(_, s)| s.clone()).unique().collect();
    let cells = row_labels
        .iter()
        .map(|s| {
            columns
                .iter()
                .map(|p| counts.get(&(p.clone(), s.clone())).copied())
                .collect()
        })
        .collect();

    Ok(PivotTable {
        columns,
        rows: row_labels,
        cells,
    })
}
