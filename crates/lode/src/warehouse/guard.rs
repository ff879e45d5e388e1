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

use super::{WarehouseError, WarehouseResult};

const READ_KEYWORDS: [&str; 5] = ["select", "with", "show", "describe", "explain"];

// Free-text statements reach the gateway from an input field; only read
// forms are allowed through, and a batch separator cannot smuggle a second
// statement past the keyword check.
pub fn ensure_read_only(statement: &str) -> WarehouseResult<()> {
    let trimmed = statement.trim();
    if trimmed.is_empty() {
        return Err(WarehouseError::QueryFailed("empty statement".to_string()));
    }
    let lowered = trimmed.to_lowercase();
    let first = lowered.split_whitespace().next().unwrap_or("");
    if !READ_KEYWORDS.contains(&first) {
        return Err(WarehouseError::QueryFailed(format!(
            "only read statements are accepted, got '{first}'"
        )));
    }
    let body = trimmed.trim_end_matches(|c: char| c.is_whitespace() || c == ';');
    if body.contains(';') {
        return Err(WarehouseError::QueryFailed(
            "multi-statement input is not accepted".to_string(),
        ));
    }
    Ok(())
}
