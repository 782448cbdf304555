//! Per-row completeness checks.

use std::str::FromStr;

use crate::row::RuleRow;
use crate::schema::RuleType;
use crate::validate::{err, info, warn, ValidateIssue};

pub fn completeness_issues(rows: &[RuleRow]) -> Vec<ValidateIssue> {
    let mut out = Vec::new();
    for row in rows {
        if !row.is_rule() {
            out.push(info(
                "collection_shell",
                Some(row.line),
                format!(
                    "row has no RuleName; treated as a shell for collection '{}'",
                    row.collection
                ),
            ));
            continue;
        }

        if row.source.is_empty() {
            out.push(err(
                "missing_source",
                Some(row.line),
                format!("rule '{}' has no Source", row.rule_name),
            ));
        }

        let rule_type = RuleType::from_str(&row.rule_type).ok();
        if row.destination.is_empty() && rule_type != Some(RuleType::Nat) {
            out.push(warn(
                "missing_destination",
                Some(row.line),
                format!("rule '{}' has no Destination", row.rule_name),
            ));
        }

        match rule_type {
            Some(RuleType::Application) => {
                if row.protocols.is_empty() {
                    out.push(err(
                        "missing_protocols",
                        Some(row.line),
                        format!("application rule '{}' has no Protocols", row.rule_name),
                    ));
                }
            }
            Some(RuleType::Network) => {
                if row.protocols.is_empty() {
                    out.push(err(
                        "missing_protocols",
                        Some(row.line),
                        format!("network rule '{}' has no Protocols", row.rule_name),
                    ));
                }
                if row.destination_ports.is_empty() {
                    out.push(err(
                        "missing_destination_ports",
                        Some(row.line),
                        format!("network rule '{}' has no DestinationPorts", row.rule_name),
                    ));
                }
            }
            _ => {}
        }
    }
    out
}
