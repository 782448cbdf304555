//! Pre-parse CSV format lint.
//!
//! Catches quote/comma malformations that a structural parser would silently
//! misread into wrong field boundaries: unbalanced quotes, a missing comma
//! between two quoted fields, a quoted field that never closes, and a bare
//! token running into a quoted field. The scan is line-oriented and skips
//! blank lines and `#` comments, but reported line numbers always track the
//! physical 1-based position in the input.

use serde::Serialize;

/// A single malformation found by the format scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatIssue {
    /// 1-based physical line number.
    pub line: usize,
    pub message: String,
}

/// Scan raw CSV text for quote/comma malformations.
///
/// Returns one issue per offending line. An empty result means the input is
/// safe to hand to the structural parser.
pub fn scan_format(text: &str) -> Vec<FormatIssue> {
    let mut issues = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(message) = scan_line(line) {
            issues.push(FormatIssue {
                line: idx + 1,
                message,
            });
        }
    }

    issues
}

fn scan_line(line: &str) -> Option<String> {
    let quotes = line.matches('"').count();
    if quotes % 2 == 1 {
        return Some("unbalanced quotes".to_string());
    }

    // `word""word` with text on both sides reads as an escaped quote to a
    // parser, but in flat tabular data it is almost always two quoted fields
    // with the separating comma dropped.
    let chars: Vec<char> = line.chars().collect();
    for window in chars.windows(4) {
        if window[0].is_alphanumeric()
            && window[1] == '"'
            && window[2] == '"'
            && window[3].is_alphanumeric()
        {
            return Some("missing comma between quoted fields".to_string());
        }
    }

    // Mask well-formed quoted fields, then any quote left over is stray.
    let masked = mask_quoted_fields(&chars);
    for (pos, c) in masked.iter().enumerate() {
        if *c != '"' {
            continue;
        }
        if pos > 0 && masked[pos - 1] == ',' {
            return Some("quoted field is missing its closing quote".to_string());
        }
        if pos > 0 && masked[pos - 1] != ',' {
            return Some("missing comma before quoted field".to_string());
        }
    }

    None
}

/// Replace each well-formed quoted field (opening quote at a field boundary,
/// `""` escapes honored, closing quote followed by a comma or end of line)
/// with `~` placeholders, preserving positions of everything else.
fn mask_quoted_fields(chars: &[char]) -> Vec<char> {
    let mut out = chars.to_vec();
    let mut i = 0;
    let mut at_field_start = true;

    while i < chars.len() {
        let c = chars[i];
        if c == '"' && at_field_start {
            if let Some(end) = closing_quote(chars, i) {
                let field_ends = end + 1 == chars.len() || chars[end + 1] == ',';
                if field_ends {
                    for slot in out.iter_mut().take(end + 1).skip(i) {
                        *slot = '~';
                    }
                    i = end + 1;
                    at_field_start = false;
                    continue;
                }
            }
        }
        at_field_start = c == ',';
        i += 1;
    }

    out
}

/// Find the closing quote of a field opened at `start`, skipping `""` escapes.
fn closing_quote(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    while j < chars.len() {
        if chars[j] == '"' {
            if j + 1 < chars.len() && chars[j + 1] == '"' {
                j += 2;
                continue;
            }
            return Some(j);
        }
        j += 1;
    }
    None
}
