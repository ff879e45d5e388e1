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

use lode::{AssistantConfig, AssistantGateway, WarehouseConfig, WarehouseGateway};
use std::io::{self, Write};
use tracing::{info, warn};
use vista::{ChartKind, ChartSpec, ChartStudio, ResultSet};

const DEFAULT_QUERY: &str = "SELECT ORDER_DATE, REGION, PRODUCT_LINE, SALES_CHANNEL, \
UNITS_SOLD, UNIT_PRICE, SALES_AMOUNT, PROFIT_MARGIN FROM SALES LIMIT 200";

const TABLE_PREVIEW_ROWS: usize = 20;

// Last fetched result set. Held by the shell, not the core; every handler
// that needs rows either reuses it or fetches on demand, and only the
// explicit 'refresh' command re-runs the base query.
struct ShellState {
    rows: Option<ResultSet>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    info!("Starting Warehouse Dashboard Demo");

    dotenvy::dotenv().ok();
    info!("Environment variables loaded");

    let warehouse_config = WarehouseConfig::from_env()?;
    let warehouse = WarehouseGateway::new(warehouse_config);
    info!("Warehouse gateway initialised");

    let assistant = match AssistantConfig::from_env() {
        Ok(config) => {
            info!("Assistant gateway initialised");
            Some(AssistantGateway::new(config))
        }
        Err(e) => {
            warn!("Assistant not available: {e}");
            None
        }
    };

    let studio = ChartStudio::new()?;
    info!(
        "Chart studio initialised with {} catalogued column(s)",
        studio.catalog().len()
    );

    let mut state = ShellState { rows: None };

    println!("\nWarehouse Dashboard Demo");
    println!("═══════════════════════════════════════════════════════════════");
    println!("Each command drives exactly one component:");
    println!();
    println!("  table                          show the current result table");
    println!("  query <sql>                    run a read statement and show it");
    println!("  columns [kind]                 list selectable column labels");
    println!("  chart <kind> <label> [/ <label>]");
    println!("                                 build a chart spec from labels");
    println!("  ask <question>                 send a question to the assistant");
    println!("  refresh                        re-run the base query");
    println!("  help                           show this list");
    println!("  exit                           quit");
    println!();
    println!("Chart kinds: scatter, histogram, boxplot, bar, pie, heatmap.");
    println!("Two-column kinds separate labels with '/', e.g.");
    println!("  chart scatter Unit Price / Sales Amount");
    println!("═══════════════════════════════════════════════════════════════");

    loop {
        print!("\ndashboard> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") {
            println!("Goodbye!");
            break;
        }

        let (command, rest) = match input.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (input, ""),
        };

        match command.to_lowercase().as_str() {
            "help" => print_help(),
            "table" => handle_table(&warehouse, &mut state).await,
            "refresh" => handle_refresh(&warehouse, &mut state).await,
            "query" => handle_query(&warehouse, &mut state, rest).await,
            "columns" => handle_columns(&studio, rest),
            "chart" => handle_chart(&studio, &warehouse, &mut state, rest).await,
            "ask" => handle_ask(assistant.as_ref(), rest).await,
            other => {
                println!("Unknown command '{other}'. Type 'help' for the command list.");
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!("Commands: table, query <sql>, columns [kind], chart <kind> <label> [/ <label>],");
    println!("          ask <question>, refresh, help, exit");
}

async fn ensure_rows<'a>(
    warehouse: &WarehouseGateway,
    state: &'a mut ShellState,
) -> Option<&'a ResultSet> {
    if state.rows.is_none() {
        println!("Fetching base result set...");
        match warehouse.run(DEFAULT_QUERY).await {
            Ok(rows) => state.rows = Some(rows),
            Err(e) => {
                println!("Could not fetch data: {e}");
                return None;
            }
        }
    }
    state.rows.as_ref()
}

async fn handle_table(warehouse: &WarehouseGateway, state: &mut ShellState) {
    if let Some(rows) = ensure_rows(warehouse, state).await {
        print_result_table(rows);
    }
}

async fn handle_refresh(warehouse: &WarehouseGateway, state: &mut ShellState) {
    println!("Re-running the base query...");
    match warehouse.run(DEFAULT_QUERY).await {
        Ok(rows) => {
            println!("Fetched {} row(s)", rows.row_count());
            state.rows = Some(rows);
        }
        Err(e) => println!("Refresh failed: {e}"),
    }
}

async fn handle_query(warehouse: &WarehouseGateway, state: &mut ShellState, statement: &str) {
    if statement.is_empty() {
        println!("Usage: query <sql>");
        return;
    }
    match warehouse.run(statement).await {
        Ok(rows) => {
            print_result_table(&rows);
            state.rows = Some(rows);
        }
        Err(e) => println!("Query failed: {e}"),
    }
}

fn handle_columns(studio: &ChartStudio, kind_token: &str) {
    if kind_token.is_empty() {
        println!("Catalogued columns:");
        for entry in studio.catalog().entries() {
            println!("  {:<16} {:?}", entry.label, entry.data_type);
        }
        return;
    }
    match kind_token.parse::<ChartKind>() {
        Ok(kind) => {
            println!("Primary columns for {kind}:");
            for label in studio.primary_labels(kind) {
                println!("  {label}");
            }
            let secondary = studio.secondary_labels(kind);
            if !secondary.is_empty() {
                println!("Secondary columns for {kind}:");
                for label in secondary {
                    println!("  {label}");
                }
            }
        }
        Err(e) => println!("{e}"),
    }
}

async fn handle_chart(
    studio: &ChartStudio,
    warehouse: &WarehouseGateway,
    state: &mut ShellState,
    args: &str,
) {
    let (kind_token, selection) = match args.split_once(' ') {
        Some((k, s)) => (k, s.trim()),
        None => {
            println!("Usage: chart <kind> <label> [/ <label>]");
            return;
        }
    };
    let kind = match kind_token.parse::<ChartKind>() {
        Ok(kind) => kind,
        Err(e) => {
            println!("{e}");
            return;
        }
    };
    let (primary, secondary) = match selection.split_once('/') {
        Some((p, s)) => (p.trim(), Some(s.trim())),
        None => (selection, None),
    };

    let Some(rows) = ensure_rows(warehouse, state).await else {
        return;
    };
    match studio.build_from_labels(kind, primary, secondary, rows) {
        Ok(spec) => print_chart_spec(&spec),
        Err(e) => println!("Could not build chart: {e}"),
    }
}

async fn handle_ask(assistant: Option<&AssistantGateway>, question: &str) {
    let Some(assistant) = assistant else {
        println!("The assistant is not configured. Set ASSISTANT_API_KEY and restart.");
        return;
    };
    if question.is_empty() {
        println!("Usage: ask <question>");
        return;
    }
    match assistant.complete(question).await {
        Ok(reply) => println!("{reply}"),
        Err(e) => println!("{e}"),
    }
}

fn print_result_table(rows: &ResultSet) {
    if rows.is_empty() {
        println!("(no rows)");
        return;
    }

    let shown = rows.rows().iter().take(TABLE_PREVIEW_ROWS);
    let mut widths: Vec<usize> = rows.columns().iter().map(|c| c.len()).collect();
    for row in shown.clone() {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.to_string().len());
            }
        }
    }

    let header: Vec<String> = rows
        .columns()
        .iter()
        .zip(&widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect();
    println!("{}", header.join("  "));
    println!("{}", "─".repeat(widths.iter().sum::<usize>() + 2 * widths.len()));
    for row in shown {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<w$}", cell.to_string()))
            .collect();
        println!("{}", line.join("  "));
    }
    if rows.row_count() > TABLE_PREVIEW_ROWS {
        println!("... ({} more rows)", rows.row_count() - TABLE_PREVIEW_ROWS);
    }
}

fn print_chart_spec(spec: &ChartSpec) {
    println!("{}", spec.title);
    println!("kind: {}", spec.kind);
    let mut bindings: Vec<_> = spec.bindings.iter().collect();
    bindings.sort();
    for (channel, column) in bindings {
        println!("  {channel} -> {column}");
    }
    if let Some(pivot) = &spec.pivot {
        println!();
        let label_width = pivot
            .rows
            .iter()
            .map(|r| r.len())
            .max()
            .unwrap_or(0)
            .max(1);
        let cell_width = pivot.columns.iter().map(|c| c.len()).max().unwrap_or(1).max(3);
        let header: Vec<String> = pivot
            .columns
            .iter()
            .map(|c| format!("{c:>cell_width$}"))
            .collect();
        println!("{:<label_width$}  {}", "", header.join("  "));
        for (label, cells) in pivot.rows.iter().zip(&pivot.cells) {
            let line: Vec<String> = cells
                .iter()
                .map(|cell| match cell {
                    Some(count) => format!("{count:>cell_width$}"),
                    None => format!("{:>cell_width$}", "·"),
                })
                .collect();
            println!("{label:<label_width$}  {}", line.join("  "));
        }
    }
}
