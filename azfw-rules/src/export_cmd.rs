use std::fs;

use anyhow::{Context, Result};
use azfw_rules::azcli;
use azfw_rules::export::table_from_policy_json;
use csv_guard_core::write_file;
use serde_json::Value;

use crate::cli::ExportArgs;

pub fn run_export(args: ExportArgs) -> Result<()> {
    let doc: Value = match &args.input {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => {
            let policy = args
                .policy
                .as_deref()
                .context("pass --input, or --policy with --resource-group")?;
            let resource_group = args
                .resource_group
                .as_deref()
                .context("pass --input, or --policy with --resource-group")?;

            let mut az_args = vec![
                "network",
                "firewall",
                "policy",
                "rule-collection-group",
                "list",
                "--policy-name",
                policy,
                "--resource-group",
                resource_group,
                "--output",
                "json",
            ];
            if let Some(subscription) = &args.subscription {
                az_args.push("--subscription");
                az_args.push(subscription);
            }
            let raw = azcli::run(&az_args)?;
            serde_json::from_str(&raw).context("failed to parse Azure CLI output")?
        }
    };

    let table = table_from_policy_json(&doc)?;
    write_file(&table, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!(
        "exported {} rule row(s) to {}",
        table.records.len(),
        args.output.display()
    );
    Ok(())
}
