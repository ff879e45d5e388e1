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

use crate::error::{CatalogError, CatalogResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "PascalCase")]
pub enum DataType {
    Numeric,
    Categorical,
    Temporal,
}

impl DataType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Numeric)
    }
    pub fn is_categorical(&self) -> bool {
        matches!(self, DataType::Categorical)
    }
    pub fn is_temporal(&self) -> bool {
        matches!(self, DataType::Temporal)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnEntry {
    pub id: String,
    pub label: String,
    pub data_type: DataType,
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogConfig {
    columns: Vec<ColumnEntry>,
}

// The id<->label mapping is a bijection: duplicates in either direction are
// rejected at construction and the catalog never changes afterwards.
#[derive(Debug, Clone)]
pub struct ColumnCatalog {
    entries: Vec<ColumnEntry>,
    by_id: HashMap<String, usize>,
    by_label: HashMap<String, usize>,
}

impl ColumnCatalog {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read column catalog file: {}",
                path.as_ref().display()
            )
        })?;
        Self::from_yaml_string(&content)
    }

    pub fn from_yaml_string(yaml_content: &str) -> Result<Self> {
        let config: CatalogConfig =
            serde_yaml::from_str(yaml_content).context("Failed to parse column catalog YAML")?;
        let mut by_id = HashMap::new();
        let mut by_label = HashMap::new();
        for (idx, entry) in config.columns.iter().enumerate() {
            if by_id.insert(entry.id.clone(), idx).is_some() {
                anyhow::bail!("Duplicate column id found: {}", entry.id);
            }
            if by_label.insert(entry.label.clone(), idx).is_some() {
                anyhow::bail!("Duplicate column label found: {}", entry.label);
            }
        }
        Ok(ColumnCatalog {
            entries: config.columns,
            by_id,
            by_label,
        })
    }

    pub fn embedded() -> Result<Self> {
        Self::from_yaml_string(include_str!("config/columns.yml"))
    }

    pub fn label_of(&self, id: &str) -> CatalogResult<&str> {
        self.by_id
            .get(id)
            .map(|&idx| self.entries[idx].label.as_str())
            .ok_or_else(|| CatalogError::UnknownColumn {
                name: id.to_string(),
            })
    }

    pub fn id_of(&self, label: &str) -> CatalogResult<&str> {
        self.by_label
            .get(label)
            .map(|&idx| self.entries[idx].id.as_str())
            .ok_or_else(|| CatalogError::UnknownColumn {
                name: label.to_string(),
            })
    }

    pub fn data_type_of(&self, id: &str) -> CatalogResult<&DataType> {
        self.by_id
            .get(id)
            .map(|&idx| &self.entries[idx].data_type)
            .ok_or_else(|| CatalogError::UnknownColumn {
                name: id.to_string(),
            })
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn entries(&self) -> &[ColumnEntry] {
        &self.entries
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn labels_of_types(&self, accepted: &[DataType]) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| accepted.contains(&e.data_type))
            .map(|e| e.label.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
