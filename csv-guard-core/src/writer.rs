use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::table::Table;

/// Errors that can occur while writing a [`Table`] as CSV.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to write output file.
    #[error("failed to write CSV file: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize a [`Table`] into CSV text.
///
/// Fields are quoted only when they contain a comma, a quote, or
/// leading/trailing whitespace; embedded quotes are doubled.
pub fn write(table: &Table) -> String {
    let mut out = String::new();
    push_row(&mut out, &table.headers);
    for record in &table.records {
        push_row(&mut out, &record.fields);
    }
    out
}

/// Serialize a [`Table`] and write it to `path`.
pub fn write_file(table: &Table, path: &Path) -> Result<(), WriteError> {
    fs::write(path, write(table))?;
    Ok(())
}

fn push_row(out: &mut String, fields: &[String]) {
    for (idx, field) in fields.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field));
    }
    out.push('\n');
}

fn escape_field(field: &str) -> String {
    let needs_quoting = field.contains(',') || field.contains('"') || field.trim() != field;
    if !needs_quoting {
        return field.to_string();
    }
    format!("\"{}\"", field.replace('"', "\"\""))
}
