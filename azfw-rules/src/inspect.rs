//! Hierarchy visualization and summary counts.

use std::str::FromStr;

use serde::Serialize;

use crate::hierarchy::RuleGroup;
use crate::schema::RuleType;

/// Render the grouped hierarchy as an indented tree. `depth` limits the
/// levels shown: 1 = groups, 2 = collections, 3 = rules.
pub fn render_tree(groups: &[RuleGroup], depth: usize) -> String {
    let mut out = Vec::new();
    for group in groups {
        out.push(format!("group {} priority={}", group.name, group.priority));
        if depth < 2 {
            continue;
        }
        for collection in &group.collections {
            out.push(format!(
                "  collection {} priority={} action={} type={}",
                collection.name,
                collection.priority,
                collection.action.as_str(),
                collection.collection_type.as_str()
            ));
            if depth < 3 {
                continue;
            }
            for rule in &collection.rules {
                out.push(format!(
                    "    rule {} type={} source={} destination={}",
                    rule.rule_name, rule.rule_type, rule.source, rule.destination
                ));
            }
        }
    }
    if out.is_empty() {
        out.push("no rule collection groups".to_string());
    }
    out.join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InspectSummary {
    pub groups: usize,
    pub collections: usize,
    pub application_rules: usize,
    pub network_rules: usize,
    pub nat_rules: usize,
    pub other_rules: usize,
}

pub fn summarize(groups: &[RuleGroup]) -> InspectSummary {
    let mut summary = InspectSummary {
        groups: groups.len(),
        collections: 0,
        application_rules: 0,
        network_rules: 0,
        nat_rules: 0,
        other_rules: 0,
    };
    for group in groups {
        summary.collections += group.collections.len();
        for collection in &group.collections {
            for rule in &collection.rules {
                match RuleType::from_str(&rule.rule_type) {
                    Ok(RuleType::Application) => summary.application_rules += 1,
                    Ok(RuleType::Network) => summary.network_rules += 1,
                    Ok(RuleType::Nat) => summary.nat_rules += 1,
                    Err(_) => summary.other_rules += 1,
                }
            }
        }
    }
    summary
}

pub fn render_summary(summary: InspectSummary) -> String {
    format!(
        "inspect_summary groups={} collections={} application_rules={} network_rules={} \
nat_rules={} other_rules={}",
        summary.groups,
        summary.collections,
        summary.application_rules,
        summary.network_rules,
        summary.nat_rules,
        summary.other_rules
    )
}
