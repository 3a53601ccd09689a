//! Check command implementation.

use ledger_core::{Config, DataSet, FieldId, ItemId, ItemType, StaticData, ValuesIn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// One row of a row file.
#[derive(Debug, Deserialize)]
struct RowIn {
    item_type: ItemType,
    #[serde(flatten)]
    values: ValuesIn,
}

/// A validation error of one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Problem {
    /// List of the item.
    pub item_type: ItemType,
    /// Id of the item.
    pub id: ItemId,
    /// Name of the item, if it has one.
    pub name: Option<String>,
    /// The field the error is recorded against.
    pub field: FieldId,
    /// Human-readable message.
    pub message: String,
}

/// Check result.
#[derive(Debug, Default, Serialize)]
pub struct CheckReport {
    /// Number of rows loaded.
    pub rows: usize,
    /// Number of live items validated.
    pub items_checked: usize,
    /// Every error found, in list order.
    pub problems: Vec<Problem>,
}

impl CheckReport {
    fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Runs the check command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let report = check_file(path)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_report(path, &report),
    }

    if report.is_ok() {
        Ok(())
    } else {
        Err(format!("{} validation errors", report.problems.len()).into())
    }
}

/// Loads, resolves and validates a row file.
///
/// Structural failures (unreadable JSON, duplicate ids, broken links) are
/// returned as errors; validation failures end up in the report.
pub fn check_file(path: &Path) -> Result<CheckReport, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let rows: Vec<RowIn> = serde_json::from_str(&text)?;

    let mut data = DataSet::new(Config::default(), StaticData::standard());
    for row in &rows {
        data.add_values_item(row.item_type, &row.values)?;
    }
    data.resolve_data_set_links()?;

    let failing = data.validate_all();
    debug!(rows = rows.len(), failing, "validated row file");

    let problems = data
        .items_with_errors()
        .flat_map(|item| {
            item.errors().iter().map(move |(field, failure)| Problem {
                item_type: item.item_type(),
                id: item.id(),
                name: item.name().map(str::to_string),
                field,
                message: failure.to_string(),
            })
        })
        .collect();

    Ok(CheckReport {
        rows: rows.len(),
        items_checked: data.lists().lists().map(|list| list.len()).sum(),
        problems,
    })
}

fn print_report(path: &Path, report: &CheckReport) {
    println!("Checking rows in {:?}", path);
    println!("  Rows loaded:   {}", report.rows);
    println!("  Items checked: {}", report.items_checked);
    println!();

    for problem in &report.problems {
        let name = problem.name.as_deref().unwrap_or("-");
        println!(
            "  {} {} ({}): {}: {}",
            problem.item_type, problem.id, name, problem.field, problem.message
        );
    }

    if report.is_ok() {
        println!("✓ No validation errors");
    } else {
        println!();
        println!("✗ {} validation errors", report.problems.len());
    }
}
