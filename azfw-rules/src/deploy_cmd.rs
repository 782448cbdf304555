use std::fs;

use anyhow::{bail, Context, Result};
use azfw_rules::deploy::{build_group_deployments, run_deployment};
use azfw_rules::hierarchy::build_hierarchy;
use azfw_rules::params::TemplateParameters;
use azfw_rules::row::rows_from_table;
use azfw_rules::rules::ResolveContext;
use chrono::Utc;
use csv_guard_core::parse_file;

use crate::cli::DeployArgs;

pub fn run_deploy(args: DeployArgs) -> Result<()> {
    let table = parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    let rows = rows_from_table(&table);
    let groups = build_hierarchy(&rows)
        .with_context(|| format!("failed to build hierarchy from {}", args.file.display()))?;
    if groups.is_empty() {
        bail!("no rule collection groups found in {}", args.file.display());
    }

    let params = match &args.parameters {
        Some(path) => TemplateParameters::load(path)
            .with_context(|| format!("failed to load parameter file {}", path.display()))?,
        None => TemplateParameters::default(),
    };
    let policy = args
        .policy
        .clone()
        .or_else(|| params.string_value("firewallPolicyName"))
        .context(
            "no firewall policy name; pass --policy or a --parameters file with firewallPolicyName",
        )?;
    let ipgroups_resource_group = args
        .ipgroups_resource_group
        .clone()
        .or_else(|| params.string_value("ipGroupsResourceGroup"))
        .unwrap_or_else(|| args.resource_group.clone());

    let ctx = ResolveContext {
        subscription: args.subscription.clone(),
        default_ip_group_resource_group: ipgroups_resource_group,
    };
    let timestamp = Utc::now().format("%Y%m%d%H%M%S").to_string();
    let deployments = build_group_deployments(
        &groups,
        &ctx,
        &policy,
        &args.resource_group,
        &args.template_file,
        &timestamp,
    )?;

    if let Some(plan_path) = &args.plan {
        let plan_json = serde_json::to_string_pretty(&deployments)?;
        fs::write(plan_path, plan_json)
            .with_context(|| format!("failed to write plan file {}", plan_path.display()))?;
    }

    let mut failed = 0usize;
    for deployment in &deployments {
        if args.dry_run {
            println!(
                "dry-run deployment={} group={} resource_group={} template={}",
                deployment.deployment_name,
                deployment.group,
                deployment.resource_group,
                deployment.template_file.display()
            );
            println!("{}", serde_json::to_string_pretty(&deployment.parameters)?);
            continue;
        }

        println!(
            "deploying group={} deployment={}",
            deployment.group, deployment.deployment_name
        );
        // No retry, no abort: remaining groups still get their attempt.
        if let Err(err) = run_deployment(deployment) {
            failed += 1;
            eprintln!(
                "error: deployment failed for group '{}': {err:#}",
                deployment.group
            );
        }
    }

    if failed > 0 {
        bail!(
            "deploy failed for {failed} of {} rule collection group(s)",
            deployments.len()
        );
    }
    Ok(())
}
