//! FQDN value checks for FQDN-typed destinations.

use std::str::FromStr;

use crate::row::RuleRow;
use crate::schema::DestinationType;
use crate::validate::{err, ValidateIssue};

pub fn fqdn_issues(rows: &[RuleRow]) -> Vec<ValidateIssue> {
    let mut out = Vec::new();
    for row in rows {
        let fqdn_typed = matches!(
            DestinationType::from_str(&row.destination_type),
            Ok(DestinationType::TargetFqdns) | Ok(DestinationType::Fqdns)
        );
        if !fqdn_typed {
            continue;
        }
        for value in row.destination_values() {
            if !is_valid_fqdn(&value) {
                out.push(err(
                    "invalid_fqdn",
                    Some(row.line),
                    format!("Destination value '{value}' is not a valid FQDN"),
                ));
            }
        }
    }
    out
}

/// DNS name check: an optional leading `*.` wildcard is stripped, then every
/// label must be 1-63 alphanumeric/hyphen characters. A bare `*` is allowed.
pub fn is_valid_fqdn(value: &str) -> bool {
    if value == "*" {
        return true;
    }
    let host = value.strip_prefix("*.").unwrap_or(value);
    if host.is_empty() {
        return false;
    }
    host.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
