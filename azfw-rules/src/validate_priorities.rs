//! Priority consistency, conflict, uniqueness, and range checks.
//!
//! Grouping follows the deployment hierarchy: rows naming the same
//! `RuleCollectionGroup` must agree on its priority, collections inside a
//! group must not share a priority, and rule names inside a collection must
//! be unique. Raw cell text is compared here; whether a value is a valid
//! integer in range is the separate range check.

use std::collections::BTreeMap;

use crate::profile::ValidationProfile;
use crate::row::RuleRow;
use crate::schema;
use crate::validate::{err, ValidateIssue};

/// Group-priority consistency, collection-priority conflicts, and rule-name
/// uniqueness.
pub fn consistency_issues(rows: &[RuleRow]) -> Vec<ValidateIssue> {
    let mut out = Vec::new();
    out.extend(group_priority_issues(rows));
    out.extend(collection_conflict_issues(rows));
    out.extend(duplicate_rule_name_issues(rows));
    out
}

/// Both priority columns must hold integers inside the profile's bounds.
/// Reported once per group / per collection, not once per row.
pub fn range_issues(rows: &[RuleRow], profile: &ValidationProfile) -> Vec<ValidateIssue> {
    let mut out = Vec::new();
    let mut seen_groups = BTreeMap::new();
    let mut seen_collections = BTreeMap::new();

    for row in rows {
        if !row.group.is_empty() {
            seen_groups
                .entry(row.group.clone())
                .or_insert((row.line, row.group_priority.clone()));
        }
        if !row.collection.is_empty() {
            seen_collections
                .entry((row.group.clone(), row.collection.clone()))
                .or_insert((row.line, row.collection_priority.clone()));
        }
    }

    for (group, (line, priority)) in &seen_groups {
        if !in_range(priority, profile) {
            out.push(err(
                "priority_out_of_range",
                Some(*line),
                format!(
                    "{} '{priority}' for group '{group}' must be an integer between {} and {}",
                    schema::COL_GROUP_PRIORITY,
                    profile.priority_min,
                    profile.priority_max
                ),
            ));
        }
    }
    for ((_, collection), (line, priority)) in &seen_collections {
        if !in_range(priority, profile) {
            out.push(err(
                "priority_out_of_range",
                Some(*line),
                format!(
                    "{} '{priority}' for collection '{collection}' must be an integer between {} and {}",
                    schema::COL_COLLECTION_PRIORITY,
                    profile.priority_min,
                    profile.priority_max
                ),
            ));
        }
    }
    out
}

fn in_range(raw: &str, profile: &ValidationProfile) -> bool {
    raw.parse::<i64>()
        .map(|p| p >= profile.priority_min && p <= profile.priority_max)
        .unwrap_or(false)
}

/// Exactly one error per group whose rows disagree on the group priority.
fn group_priority_issues(rows: &[RuleRow]) -> Vec<ValidateIssue> {
    let mut priorities: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for row in rows {
        if row.group.is_empty() {
            continue;
        }
        let seen = priorities.entry(&row.group).or_default();
        if !seen.contains(&row.group_priority.as_str()) {
            seen.push(&row.group_priority);
        }
    }

    priorities
        .into_iter()
        .filter(|(_, values)| values.len() > 1)
        .map(|(group, values)| {
            err(
                "group_priority_inconsistent",
                None,
                format!(
                    "inconsistent priorities for rule collection group '{group}': {}",
                    values.join(", ")
                ),
            )
        })
        .collect()
}

/// One error per priority value shared by distinct collections in a group.
fn collection_conflict_issues(rows: &[RuleRow]) -> Vec<ValidateIssue> {
    let mut by_priority: BTreeMap<(&str, &str), Vec<&str>> = BTreeMap::new();
    for row in rows {
        if row.collection.is_empty() {
            continue;
        }
        let names = by_priority
            .entry((&row.group, &row.collection_priority))
            .or_default();
        if !names.contains(&row.collection.as_str()) {
            names.push(&row.collection);
        }
    }

    by_priority
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|((group, priority), names)| {
            err(
                "collection_priority_conflict",
                None,
                format!(
                    "Priority conflict in group '{group}': collections {} share priority {priority}",
                    join_names(&names)
                ),
            )
        })
        .collect()
}

/// One error per extra occurrence of a rule name inside one collection.
fn duplicate_rule_name_issues(rows: &[RuleRow]) -> Vec<ValidateIssue> {
    let mut seen: BTreeMap<(&str, &str), Vec<&str>> = BTreeMap::new();
    let mut out = Vec::new();

    for row in rows {
        if !row.is_rule() {
            continue;
        }
        let names = seen.entry((&row.group, &row.collection)).or_default();
        if names.contains(&row.rule_name.as_str()) {
            out.push(err(
                "duplicate_rule_name",
                Some(row.line),
                format!(
                    "duplicate rule name '{}' in collection '{}'",
                    row.rule_name, row.collection
                ),
            ));
        } else {
            names.push(&row.rule_name);
        }
    }
    out
}

fn join_names(names: &[&str]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
    match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {last}", rest.join(", ")),
        _ => quoted.join(", "),
    }
}

#[cfg(test)]
mod tests {
    use crate::profile::load_profile;
    use crate::row::RuleRow;

    use super::{consistency_issues, range_issues};

    fn row(group: &str, gp: &str, coll: &str, cp: &str, rule: &str, line: usize) -> RuleRow {
        RuleRow {
            line,
            group: group.to_string(),
            group_priority: gp.to_string(),
            collection: coll.to_string(),
            collection_priority: cp.to_string(),
            rule_name: rule.to_string(),
            ..RuleRow::default()
        }
    }

    #[test]
    fn inconsistent_group_priority_reports_once_per_group() {
        let rows = vec![
            row("rcg-a", "200", "rc-1", "100", "r1", 2),
            row("rcg-a", "300", "rc-1", "100", "r2", 3),
            row("rcg-a", "300", "rc-1", "100", "r3", 4),
        ];
        let issues = consistency_issues(&rows);
        let inconsistent: Vec<_> = issues
            .iter()
            .filter(|i| i.code == "group_priority_inconsistent")
            .collect();

        assert_eq!(inconsistent.len(), 1);
        assert!(inconsistent[0].message.contains("rcg-a"));
    }

    #[test]
    fn shared_collection_priority_names_both_collections() {
        let rows = vec![
            row("rcg-a", "200", "rc-web", "100", "r1", 2),
            row("rcg-a", "200", "rc-dns", "100", "r2", 3),
        ];
        let issues = consistency_issues(&rows);
        let conflicts: Vec<_> = issues
            .iter()
            .filter(|i| i.code == "collection_priority_conflict")
            .collect();

        assert_eq!(conflicts.len(), 1);
        assert!(conflicts[0].message.contains("'rc-web' and 'rc-dns'"));
    }

    #[test]
    fn duplicate_rule_names_flag_the_second_occurrence() {
        let rows = vec![
            row("rcg-a", "200", "rc-web", "100", "allow-web", 2),
            row("rcg-a", "200", "rc-web", "100", "allow-web", 3),
        ];
        let issues = consistency_issues(&rows);
        let dupes: Vec<_> = issues
            .iter()
            .filter(|i| i.code == "duplicate_rule_name")
            .collect();

        assert_eq!(dupes.len(), 1);
        assert_eq!(dupes[0].line, Some(3));
    }

    #[test]
    fn priorities_outside_bounds_or_non_integer_are_errors() {
        let (profile, _) = load_profile(None).expect("profile");
        let rows = vec![
            row("rcg-a", "99", "rc-1", "100", "r1", 2),
            row("rcg-b", "200", "rc-2", "70000", "r2", 3),
            row("rcg-c", "abc", "rc-3", "100", "r3", 4),
        ];
        let issues = range_issues(&rows, &profile);

        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| i.code == "priority_out_of_range"));
    }
}
