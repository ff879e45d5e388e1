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

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Null,
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    // Grouping key for aggregation; Null carries no key so null cells drop
    // out of grouped counts.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Scalar::Null => None,
            Scalar::Text(s) => Some(s.clone()),
            Scalar::Number(n) => Some(format_number(*n)),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", format_number(*n)),
            Scalar::Text(s) => write!(f, "{s}"),
            Scalar::Null => write!(f, ""),
        }
    }
}

impl From<Value> for Scalar {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Scalar::Null,
            Value::Number(n) => n.as_f64().map_or(Scalar::Null, Scalar::Number),
            Value::String(s) => Scalar::Text(s),
            Value::Bool(b) => Scalar::Text(b.to_string()),
            other => Scalar::Text(other.to_string()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n as f64)
    }
}

// One materialised query result: a fixed column list and row-major cells.
// Owned by the caller and discarded after the render cycle; nothing here is
// cached or shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Scalar>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<Scalar>>) -> Self {
        Self { columns, rows }
    }

    pub fn push_row(&mut self, row: Vec<Scalar>) {
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Scalar>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == id)
    }

    pub fn column_values(&self, id: &str) -> Option<Vec<&Scalar>> {
        let idx = self.column_index(id)?;
        Some(self.rows.iter().filter_map(|row| row.get(idx)).collect())
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Scalar> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }
}
