//! Multi-row INSERT statement assembly.
//!
//! [`assemble()`] renders a whole [`RecordBatch`] as a single statement:
//!
//! ```text
//! -- Generated SQL for customers
//! -- Source: customers.csv
//!
//! INSERT INTO customers (id, name)
//! VALUES
//!   (1, 'Alice'),
//!   (2, 'Bob')
//! ON CONFLICT (id) DO UPDATE SET
//!   name = EXCLUDED.name,
//!   updated_at = NOW();
//!
//! -- Total rows: 2
//! ```
//!
//! The `updated_at = NOW()` clause is always part of an upsert, whether or
//! not the target table has such a column.

use itertools::Itertools;
use log::{debug, warn};

use crate::{
    record::RecordBatch,
    schema::{ColumnSpec, parse_name_list},
    value::Literal,
};

pub const UPDATED_AT_CLAUSE: &str = "updated_at = NOW()";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    None,
    #[default]
    DoNothing,
    DoUpdate {
        keys: Vec<String>,
    },
}

impl ConflictPolicy {
    /// Resolves the policy from invocation options. Disabling conflict
    /// handling wins over any key list; a blank key list means do-nothing.
    pub fn from_options(no_conflict: bool, conflict_columns: Option<&str>) -> Self {
        if no_conflict {
            return ConflictPolicy::None;
        }
        let keys = conflict_columns.map(parse_name_list).unwrap_or_default();
        if keys.is_empty() {
            ConflictPolicy::DoNothing
        } else {
            ConflictPolicy::DoUpdate { keys }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ConflictPolicy::None => "none".to_string(),
            ConflictPolicy::DoNothing => "do-nothing".to_string(),
            ConflictPolicy::DoUpdate { keys } => format!("do-update ({})", keys.join(", ")),
        }
    }
}

pub fn assemble(
    batch: &RecordBatch,
    source: &str,
    table: &str,
    columns: &[ColumnSpec],
    conflict: &ConflictPolicy,
) -> String {
    let mut lines = vec![
        format!("-- Generated SQL for {table}"),
        format!("-- Source: {source}"),
        String::new(),
    ];

    if batch.is_empty() {
        warn!("No data rows found in {source}; INSERT statement omitted");
        lines.push("-- No rows to insert".to_string());
    } else {
        lines.push(format!(
            "INSERT INTO {table} ({})",
            columns.iter().map(|c| c.name.as_str()).join(", ")
        ));
        lines.push("VALUES".to_string());
        let tuples = render_tuples(batch, columns);
        match conflict {
            ConflictPolicy::None => lines.push(format!("{tuples};")),
            ConflictPolicy::DoNothing => {
                lines.push(tuples);
                lines.push("ON CONFLICT DO NOTHING;".to_string());
            }
            ConflictPolicy::DoUpdate { keys } => {
                lines.push(tuples);
                lines.push(format!("ON CONFLICT ({}) DO UPDATE SET", keys.join(", ")));
                lines.push(format!("{};", update_assignments(columns, keys)));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!("-- Total rows: {}", batch.len()));
    lines.join("\n")
}

fn render_tuples(batch: &RecordBatch, columns: &[ColumnSpec]) -> String {
    let positions = batch.index().resolve(columns);
    for (column, position) in columns.iter().zip(&positions) {
        if position.is_none() {
            debug!("Column '{}' is not present in the input; emitting NULL", column.name);
        }
    }

    let mut invalid_counts = vec![0usize; columns.len()];
    let tuples = batch
        .records()
        .map(|record| {
            let values = columns
                .iter()
                .zip(&positions)
                .enumerate()
                .map(|(idx, (column, position))| {
                    let literal =
                        Literal::classify(record.value_or_empty(*position), column.sql_type);
                    if literal.is_invalid() {
                        invalid_counts[idx] += 1;
                    }
                    literal.to_sql()
                })
                .join(", ");
            format!("  ({values})")
        })
        .join(",\n");

    for (column, count) in columns.iter().zip(invalid_counts) {
        if count > 0 {
            warn!(
                "{count} value(s) in column '{}' could not be parsed as {} and were written as NULL",
                column.name, column.sql_type
            );
        }
    }
    tuples
}

fn update_assignments(columns: &[ColumnSpec], keys: &[String]) -> String {
    columns
        .iter()
        .filter(|column| !keys.iter().any(|key| column.matches(key)))
        .map(|column| format!("  {0} = EXCLUDED.{0}", column.name))
        .chain(std::iter::once(format!("  {UPDATED_AT_CLAUSE}")))
        .join(",\n")
}
