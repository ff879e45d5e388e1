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

use proptest::prelude::*;
use std::collections::HashMap;
use vista::{build, ChartKind, ChartRequest, ColumnCatalog, ResultSet, Scalar};

const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const CHANNELS: [&str; 4] = ["Online", "Retail", "Partner", "Direct"];

proptest! {
    #[test]
    fn heatmap_counts_match_naive_grouping(
        pairs in proptest::collection::vec((0usize..4, 0usize..4), 0..60)
    ) {
        let catalog = ColumnCatalog::embedded().unwrap();
        let mut rows = ResultSet::new(vec![
            "REGION".to_string(),
            "SALES_CHANNEL".to_string(),
        ]);
        let mut naive: HashMap<(String, String), u64> = HashMap::new();
        for (r, c) in &pairs {
            rows.push_row(vec![Scalar::from(REGIONS[*r]), Scalar::from(CHANNELS[*c])]);
            *naive
                .entry((REGIONS[*r].to_string(), CHANNELS[*c].to_string()))
                .or_insert(0) += 1;
        }

        let spec = build(
            &catalog,
            &ChartRequest::paired(ChartKind::Heatmap, "REGION", "SALES_CHANNEL"),
            &rows,
        )
        .unwrap();
        let pivot = spec.pivot.unwrap();

        for ((primary, secondary), count) in &naive {
            prop_assert_eq!(pivot.count(secondary, primary), Some(*count));
        }
        let total: u64 = pivot.cells.iter().flatten().flatten().sum();
        prop_assert_eq!(total, pairs.len() as u64);
        // Every populated cell corresponds to an observed pair; gaps stay gaps.
        let populated = pivot
            .cells
            .iter()
            .flatten()
            .filter(|c| c.is_some())
            .count();
        prop_assert_eq!(populated, naive.len());
    }
}
