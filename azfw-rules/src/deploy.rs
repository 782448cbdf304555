//! Per-group deployment construction and dispatch.
//!
//! Each rule collection group becomes one ARM deployment against a fixed
//! template. Dispatch is strictly sequential with no retry; a failed group
//! surfaces once and later groups still run.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};

use crate::azcli;
use crate::hierarchy::{RuleCollection, RuleGroup};
use crate::rules::{map_rule, ResolveContext};

/// One ARM deployment covering one rule collection group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDeployment {
    pub deployment_name: String,
    pub group: String,
    pub resource_group: String,
    pub template_file: PathBuf,
    pub parameters: Value,
}

/// Build one deployment per group. `timestamp` is baked into each
/// deployment name so repeated runs stay distinguishable in the activity
/// log.
pub fn build_group_deployments(
    groups: &[RuleGroup],
    ctx: &ResolveContext,
    policy_name: &str,
    resource_group: &str,
    template_file: &Path,
    timestamp: &str,
) -> Result<Vec<GroupDeployment>> {
    groups
        .iter()
        .map(|group| {
            Ok(GroupDeployment {
                deployment_name: deployment_name(&group.name, timestamp),
                group: group.name.clone(),
                resource_group: resource_group.to_string(),
                template_file: template_file.to_path_buf(),
                parameters: group_parameters(group, ctx, policy_name)?,
            })
        })
        .collect()
}

/// ARM deployment names allow alphanumerics, dash, underscore, dot, and
/// parentheses; anything else in the group name is replaced with a dash.
pub fn deployment_name(group: &str, timestamp: &str) -> String {
    let sanitized: String = group
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '(' | ')') {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("{sanitized}-{timestamp}")
}

/// Execute one deployment through the Azure CLI. The parameter object is
/// written to a temporary file and passed by reference.
pub fn run_deployment(deployment: &GroupDeployment) -> Result<()> {
    let mut params_file = tempfile::NamedTempFile::new()
        .context("failed to create temporary parameter file")?;
    params_file
        .write_all(serde_json::to_string_pretty(&deployment.parameters)?.as_bytes())
        .context("failed to write temporary parameter file")?;

    let template = deployment.template_file.display().to_string();
    let params_ref = format!("@{}", params_file.path().display());
    azcli::run(&[
        "deployment",
        "group",
        "create",
        "--name",
        &deployment.deployment_name,
        "--resource-group",
        &deployment.resource_group,
        "--template-file",
        &template,
        "--parameters",
        &params_ref,
        "--output",
        "none",
    ])?;
    Ok(())
}

fn group_parameters(group: &RuleGroup, ctx: &ResolveContext, policy_name: &str) -> Result<Value> {
    let collections = group
        .collections
        .iter()
        .map(|collection| collection_value(group, collection, ctx))
        .collect::<Result<Vec<Value>>>()?;

    Ok(json!({
        "firewallPolicyName": { "value": policy_name },
        "ruleCollectionGroupName": { "value": group.name },
        "ruleCollectionGroupPriority": { "value": group.priority },
        "ruleCollections": { "value": collections },
    }))
}

fn collection_value(
    group: &RuleGroup,
    collection: &RuleCollection,
    ctx: &ResolveContext,
) -> Result<Value> {
    let rules = collection
        .rules
        .iter()
        .map(|row| map_rule(row, ctx))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| {
            format!(
                "failed to map rules for collection '{}' in group '{}'",
                collection.name, group.name
            )
        })?;

    Ok(json!({
        "ruleCollectionType": collection.collection_type.as_str(),
        "name": collection.name,
        "priority": collection.priority,
        "action": { "type": collection.action.as_str() },
        "rules": serde_json::to_value(rules)?,
    }))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::hierarchy::build_hierarchy;
    use crate::row::RuleRow;
    use crate::rules::ResolveContext;

    use super::{build_group_deployments, deployment_name};

    #[test]
    fn deployment_names_sanitize_and_append_timestamp() {
        assert_eq!(
            deployment_name("rcg workloads/web", "20260806120000"),
            "rcg-workloads-web-20260806120000"
        );
    }

    #[test]
    fn builds_one_deployment_per_group_with_arm_parameters() {
        let mut row = RuleRow {
            line: 2,
            group: "rcg-a".to_string(),
            group_priority: "300".to_string(),
            collection: "rc-net".to_string(),
            collection_priority: "100".to_string(),
            action: "Allow".to_string(),
            collection_type: "FirewallPolicyFilterRuleCollection".to_string(),
            rule_type: "NetworkRule".to_string(),
            rule_name: "allow-dns".to_string(),
            source_type: "SourceAddresses".to_string(),
            source: "10.0.0.0/24".to_string(),
            protocols: "UDP".to_string(),
            destination_ports: "53".to_string(),
            destination_type: "DestinationAddresses".to_string(),
            destination: "10.0.0.4".to_string(),
            ..RuleRow::default()
        };
        let mut other = row.clone();
        other.group = "rcg-b".to_string();
        other.group_priority = "400".to_string();
        other.line = 3;
        row.line = 2;

        let groups = build_hierarchy(&[row, other]).expect("hierarchy");
        let ctx = ResolveContext {
            subscription: "sub1".to_string(),
            default_ip_group_resource_group: "rg-ipg".to_string(),
        };
        let deployments = build_group_deployments(
            &groups,
            &ctx,
            "afwp-hub",
            "rg-hub",
            Path::new("templates/rulecollectiongroup.json"),
            "20260806120000",
        )
        .expect("build");

        assert_eq!(deployments.len(), 2);
        assert_eq!(deployments[0].deployment_name, "rcg-a-20260806120000");
        let params = &deployments[0].parameters;
        assert_eq!(params["firewallPolicyName"]["value"], "afwp-hub");
        assert_eq!(params["ruleCollectionGroupPriority"]["value"], 300);
        assert_eq!(
            params["ruleCollections"]["value"][0]["action"]["type"],
            "Allow"
        );
        assert_eq!(
            params["ruleCollections"]["value"][0]["rules"][0]["ruleType"],
            "NetworkRule"
        );
    }
}
