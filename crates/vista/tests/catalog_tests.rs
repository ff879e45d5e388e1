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

use vista::{CatalogError, ChartKind, ChartStudio, ColumnCatalog, DataType};

#[test]
fn embedded_catalog_loads() {
    let catalog = ColumnCatalog::embedded().expect("embedded catalog should parse");
    assert!(!catalog.is_empty());
    assert!(catalog.contains_id("SALES_AMOUNT"));
}

#[test]
fn lookups_round_trip_in_both_directions() {
    let catalog = ColumnCatalog::embedded().unwrap();
    for entry in catalog.entries() {
        let label = catalog.label_of(&entry.id).unwrap();
        assert_eq!(catalog.id_of(label).unwrap(), entry.id);
        let id = catalog.id_of(&entry.label).unwrap();
        assert_eq!(catalog.label_of(id).unwrap(), entry.label);
    }
}

#[test]
fn unknown_strings_fail_in_both_directions() {
    let catalog = ColumnCatalog::embedded().unwrap();
    assert!(matches!(
        catalog.label_of("NO_SUCH_COLUMN"),
        Err(CatalogError::UnknownColumn { .. })
    ));
    assert!(matches!(
        catalog.id_of("No Such Label"),
        Err(CatalogError::UnknownColumn { .. })
    ));
    // A label is not an id and vice versa.
    assert!(catalog.label_of("Sales Amount").is_err());
    assert!(catalog.id_of("SALES_AMOUNT").is_err());
}

#[test]
fn duplicate_ids_are_rejected() {
    let yaml = r#"
columns:
  - id: REGION
    label: Region
    data_type: Categorical
  - id: REGION
    label: Other Region
    data_type: Categorical
"#;
    let err = ColumnCatalog::from_yaml_string(yaml).unwrap_err();
    assert!(err.to_string().contains("Duplicate column id"));
}

#[test]
fn duplicate_labels_are_rejected() {
    let yaml = r#"
columns:
  - id: REGION
    label: Region
    data_type: Categorical
  - id: AREA
    label: Region
    data_type: Categorical
"#;
    let err = ColumnCatalog::from_yaml_string(yaml).unwrap_err();
    assert!(err.to_string().contains("Duplicate column label"));
}

#[test]
fn labels_filter_by_data_type() {
    let catalog = ColumnCatalog::embedded().unwrap();
    let numeric = catalog.labels_of_types(&[DataType::Numeric]);
    assert!(numeric.contains(&"Units Sold"));
    assert!(!numeric.contains(&"Region"));
}

#[test]
fn studio_exposes_selectable_labels_per_kind() {
    let studio = ChartStudio::new().unwrap();

    let histogram = studio.primary_labels(ChartKind::Histogram);
    assert!(histogram.contains(&"Unit Price"));
    assert!(!histogram.contains(&"Region"));
    assert!(studio.secondary_labels(ChartKind::Histogram).is_empty());

    let heatmap = studio.primary_labels(ChartKind::Heatmap);
    assert!(heatmap.contains(&"Region"));
    assert!(heatmap.contains(&"Order Date"));
    assert!(!heatmap.contains(&"Sales Amount"));
    assert!(!studio.secondary_labels(ChartKind::Heatmap).is_empty());
}
