use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::guard::{scan_format, FormatIssue};
use crate::table::{Record, Table};

/// Errors that can occur while parsing CSV into a [`Table`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// Failed to read input file.
    #[error("failed to read CSV file: {0}")]
    Io(#[from] std::io::Error),
    /// The format guard found malformations; structural parsing was skipped.
    #[error("CSV format check failed with {} issue(s)", .0.len())]
    Format(Vec<FormatIssue>),
    /// Input contained no header row.
    #[error("CSV input has no header row")]
    Empty,
}

/// Parse CSV text into a [`Table`].
///
/// The [format guard](crate::guard) runs first; any issue it finds aborts
/// parsing so that misread field boundaries cannot produce misleading
/// secondary errors. Blank lines and lines starting with `#` are skipped.
/// The first surviving line is the header; every record keeps its 1-based
/// physical line number.
pub fn parse(text: &str) -> Result<Table, ParseError> {
    let issues = scan_format(text);
    if !issues.is_empty() {
        return Err(ParseError::Format(issues));
    }

    let mut headers: Option<(Vec<String>, usize)> = None;
    let mut records = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields = split_line(line);
        match headers {
            None => {
                headers = Some((
                    fields.iter().map(|f| f.trim().to_string()).collect(),
                    idx + 1,
                ));
            }
            Some(_) => records.push(Record {
                line: idx + 1,
                fields,
            }),
        }
    }

    let (headers, header_line) = headers.ok_or(ParseError::Empty)?;
    Ok(Table {
        headers,
        header_line,
        records,
    })
}

/// Parse a CSV file into a [`Table`].
pub fn parse_file(path: &Path) -> Result<Table, ParseError> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Split one physical line into fields, honoring quoting and `""` escapes.
/// The guard has already rejected unbalanced quoting.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut field)),
                _ => field.push(c),
            }
        }
    }
    fields.push(field);

    fields
}
