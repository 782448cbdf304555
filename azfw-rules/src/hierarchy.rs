//! Flat CSV rows to the group → collection → rule hierarchy.
//!
//! Grouping preserves first-appearance order; group and collection
//! attributes come from the first row naming them. Cross-row agreement
//! (priority consistency, uniqueness) is the validator's job and is not
//! re-verified here, but typed parsing is strict: a bad enum or a
//! non-integer priority fails the build with the offending line.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::row::RuleRow;
use crate::schema::{self, CollectionAction, CollectionType};

#[derive(Debug, Error)]
#[error("line {line}: {message}")]
pub struct BuildError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleGroup {
    pub name: String,
    pub priority: i64,
    pub collections: Vec<RuleCollection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleCollection {
    pub name: String,
    pub priority: i64,
    pub action: CollectionAction,
    pub collection_type: CollectionType,
    /// Rule rows in file order. Shell rows (no `RuleName`) are excluded.
    pub rules: Vec<RuleRow>,
}

/// Build the deployment hierarchy from projected rows.
pub fn build_hierarchy(rows: &[RuleRow]) -> Result<Vec<RuleGroup>, BuildError> {
    let mut groups: Vec<RuleGroup> = Vec::new();

    for row in rows {
        if row.group.is_empty() {
            return Err(BuildError {
                line: row.line,
                message: format!("row has no {}", schema::COL_GROUP),
            });
        }

        let group_idx = match groups.iter().position(|g| g.name == row.group) {
            Some(idx) => idx,
            None => {
                groups.push(RuleGroup {
                    name: row.group.clone(),
                    priority: parse_priority(row, &row.group_priority, schema::COL_GROUP_PRIORITY)?,
                    collections: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[group_idx];

        if row.collection.is_empty() {
            if row.is_rule() {
                return Err(BuildError {
                    line: row.line,
                    message: format!("rule '{}' has no {}", row.rule_name, schema::COL_COLLECTION),
                });
            }
            // Group-only carrier row.
            continue;
        }

        let collection_idx = match group
            .collections
            .iter()
            .position(|c| c.name == row.collection)
        {
            Some(idx) => idx,
            None => {
                group.collections.push(RuleCollection {
                    name: row.collection.clone(),
                    priority: parse_priority(
                        row,
                        &row.collection_priority,
                        schema::COL_COLLECTION_PRIORITY,
                    )?,
                    action: parse_field::<CollectionAction>(row, &row.action)?,
                    collection_type: parse_field::<CollectionType>(row, &row.collection_type)?,
                    rules: Vec::new(),
                });
                group.collections.len() - 1
            }
        };
        let collection = &mut group.collections[collection_idx];

        if row.is_rule() {
            collection.rules.push(row.clone());
        }
    }

    Ok(groups)
}

fn parse_priority(row: &RuleRow, raw: &str, field: &str) -> Result<i64, BuildError> {
    raw.parse::<i64>().map_err(|_| BuildError {
        line: row.line,
        message: format!("{field} '{raw}' is not an integer"),
    })
}

fn parse_field<T>(row: &RuleRow, raw: &str) -> Result<T, BuildError>
where
    T: FromStr<Err = schema::UnknownValue>,
{
    raw.parse::<T>().map_err(|err| BuildError {
        line: row.line,
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use crate::row::RuleRow;
    use crate::schema::{CollectionAction, CollectionType};

    use super::build_hierarchy;

    fn row(group: &str, coll: &str, rule: &str, line: usize) -> RuleRow {
        RuleRow {
            line,
            group: group.to_string(),
            group_priority: "300".to_string(),
            collection: coll.to_string(),
            collection_priority: "100".to_string(),
            action: "Allow".to_string(),
            collection_type: "FirewallPolicyFilterRuleCollection".to_string(),
            rule_type: "NetworkRule".to_string(),
            rule_name: rule.to_string(),
            ..RuleRow::default()
        }
    }

    #[test]
    fn groups_preserve_first_appearance_order() {
        let rows = vec![
            row("rcg-b", "rc-1", "r1", 2),
            row("rcg-a", "rc-2", "r2", 3),
            row("rcg-b", "rc-1", "r3", 4),
        ];
        let groups = build_hierarchy(&rows).expect("build");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "rcg-b");
        assert_eq!(groups[0].collections[0].rules.len(), 2);
        assert_eq!(groups[1].name, "rcg-a");
    }

    #[test]
    fn shell_rows_build_empty_collections() {
        let mut shell = row("rcg-a", "rc-quarantine", "", 2);
        shell.action = "Deny".to_string();
        let groups = build_hierarchy(&[shell]).expect("build");

        assert_eq!(groups[0].collections.len(), 1);
        let collection = &groups[0].collections[0];
        assert_eq!(collection.action, CollectionAction::Deny);
        assert_eq!(collection.collection_type, CollectionType::Filter);
        assert!(collection.rules.is_empty());
    }

    #[test]
    fn first_row_wins_on_group_priority() {
        let mut second = row("rcg-a", "rc-1", "r2", 3);
        second.group_priority = "999".to_string();
        let rows = vec![row("rcg-a", "rc-1", "r1", 2), second];
        let groups = build_hierarchy(&rows).expect("build");

        assert_eq!(groups[0].priority, 300);
    }

    #[test]
    fn bad_priority_fails_with_line_number() {
        let mut bad = row("rcg-a", "rc-1", "r1", 5);
        bad.group_priority = "high".to_string();
        let err = build_hierarchy(&[bad]).expect_err("must fail");

        assert_eq!(err.line, 5);
    }
}
