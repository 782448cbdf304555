//! Reverse transform: deployed rule collection groups back to schema CSV.
//!
//! Input is the JSON produced by
//! `az network firewall policy rule-collection-group list`: an array of
//! groups, each with `properties.priority` and `properties.ruleCollections`.
//! Every rule flattens to one CSV row; an empty collection flattens to a
//! shell row so its priority and action survive a round trip.

use csv_guard_core::{Record, Table};
use serde_json::Value;
use thiserror::Error;

use crate::ip_groups::{owning_resource_group, short_name};
use crate::schema;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unexpected policy JSON shape: {0}")]
    Shape(String),
}

/// Column order for exported CSVs: the required schema columns plus the
/// override/TLS columns.
pub fn export_headers() -> Vec<String> {
    let mut headers: Vec<String> = schema::REQUIRED_COLUMNS
        .iter()
        .map(ToString::to_string)
        .collect();
    headers.push(schema::COL_SOURCE_IPG_RESOURCE_GROUPS.to_string());
    headers.push(schema::COL_DESTINATION_IPG_RESOURCE_GROUPS.to_string());
    headers.push(schema::COL_TERMINATE_TLS.to_string());
    headers
}

/// Flatten a policy's rule collection groups into a schema [`Table`].
pub fn table_from_policy_json(doc: &Value) -> Result<Table, ExportError> {
    let groups = doc.as_array().ok_or_else(|| {
        ExportError::Shape("expected a top-level array of rule collection groups".to_string())
    })?;

    let mut fields_rows: Vec<Vec<String>> = Vec::new();
    for group in groups {
        let group_name = required_str(group, "name", "rule collection group")?;
        let props = group.get("properties").unwrap_or(group);
        let group_priority = int_string(props, "priority");

        let collections = props
            .get("ruleCollections")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        for collection in &collections {
            let collection_name = required_str(collection, "name", "rule collection")?;
            let shared = SharedColumns {
                group: group_name.clone(),
                group_priority: group_priority.clone(),
                collection: collection_name,
                collection_priority: int_string(collection, "priority"),
                action: nested_str(collection, &["action", "type"]),
                collection_type: str_field(collection, "ruleCollectionType"),
            };

            let rules = collection
                .get("rules")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            if rules.is_empty() {
                fields_rows.push(shared.with_rule(RuleColumns::default()));
                continue;
            }
            for rule in &rules {
                fields_rows.push(shared.with_rule(rule_columns(rule)));
            }
        }
    }

    let records = fields_rows
        .into_iter()
        .enumerate()
        .map(|(idx, fields)| Record {
            line: idx + 2,
            fields,
        })
        .collect();
    Ok(Table {
        headers: export_headers(),
        header_line: 1,
        records,
    })
}

struct SharedColumns {
    group: String,
    group_priority: String,
    collection: String,
    collection_priority: String,
    action: String,
    collection_type: String,
}

#[derive(Default)]
struct RuleColumns {
    rule_type: String,
    rule_name: String,
    source_type: String,
    source: String,
    protocols: String,
    destination_ports: String,
    destination_type: String,
    destination: String,
    source_rgs: String,
    destination_rgs: String,
    terminate_tls: String,
}

impl SharedColumns {
    fn with_rule(&self, rule: RuleColumns) -> Vec<String> {
        vec![
            self.group.clone(),
            self.group_priority.clone(),
            self.collection.clone(),
            self.collection_priority.clone(),
            self.action.clone(),
            self.collection_type.clone(),
            rule.rule_type,
            rule.rule_name,
            rule.source_type,
            rule.source,
            rule.protocols,
            rule.destination_ports,
            rule.destination_type,
            rule.destination,
            rule.source_rgs,
            rule.destination_rgs,
            rule.terminate_tls,
        ]
    }
}

fn rule_columns(rule: &Value) -> RuleColumns {
    let mut columns = RuleColumns {
        rule_type: str_field(rule, "ruleType"),
        rule_name: str_field(rule, "name"),
        ..RuleColumns::default()
    };

    let ip_group_sources = str_array(rule, "sourceIpGroups");
    if ip_group_sources.is_empty() {
        columns.source_type = "SourceAddresses".to_string();
        columns.source = str_array(rule, "sourceAddresses").join(",");
    } else {
        columns.source_type = "SourceIpGroups".to_string();
        let (names, rgs) = split_ip_group_ids(&ip_group_sources);
        columns.source = names;
        columns.source_rgs = rgs;
    }

    if let Some(protocols) = rule.get("protocols").and_then(Value::as_array) {
        columns.protocols = protocols
            .iter()
            .map(|p| {
                format!(
                    "{}:{}",
                    p.get("protocolType").and_then(Value::as_str).unwrap_or(""),
                    p.get("port").and_then(Value::as_i64).unwrap_or(0)
                )
            })
            .collect::<Vec<_>>()
            .join(",");
    } else {
        columns.protocols = str_array(rule, "ipProtocols").join(",");
    }
    columns.destination_ports = str_array(rule, "destinationPorts").join(",");

    let ip_group_destinations = str_array(rule, "destinationIpGroups");
    let target_fqdns = str_array(rule, "targetFqdns");
    let destination_fqdns = str_array(rule, "destinationFqdns");
    let destination_addresses = str_array(rule, "destinationAddresses");
    if !ip_group_destinations.is_empty() {
        columns.destination_type = "DestinationIpGroups".to_string();
        let (names, rgs) = split_ip_group_ids(&ip_group_destinations);
        columns.destination = names;
        columns.destination_rgs = rgs;
    } else if !target_fqdns.is_empty() {
        columns.destination_type = "TargetFqdns".to_string();
        columns.destination = target_fqdns.join(",");
    } else if !destination_fqdns.is_empty() {
        columns.destination_type = "DestinationFqdns".to_string();
        columns.destination = destination_fqdns.join(",");
    } else if !destination_addresses.is_empty() {
        columns.destination_type = "DestinationAddresses".to_string();
        columns.destination = destination_addresses.join(",");
    }

    if rule
        .get("terminateTLS")
        .and_then(Value::as_bool)
        .unwrap_or(false)
    {
        columns.terminate_tls = "true".to_string();
    }

    columns
}

/// Full resource IDs become short name + owning-resource-group override
/// columns, so a re-deploy resolves them the same way.
fn split_ip_group_ids(ids: &[String]) -> (String, String) {
    let names: Vec<&str> = ids.iter().map(|id| short_name(id)).collect();
    let rgs: Vec<&str> = ids
        .iter()
        .map(|id| owning_resource_group(id).unwrap_or(""))
        .collect();
    let rgs_joined = if rgs.iter().all(|rg| rg.is_empty()) {
        String::new()
    } else {
        rgs.join(",")
    };
    (names.join(","), rgs_joined)
}

fn required_str(value: &Value, key: &str, what: &str) -> Result<String, ExportError> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| ExportError::Shape(format!("{what} is missing '{key}'")))
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn nested_str(value: &Value, path: &[&str]) -> String {
    let mut current = value;
    for key in path {
        match current.get(key) {
            Some(next) => current = next,
            None => return String::new(),
        }
    }
    current.as_str().unwrap_or_default().to_string()
}

fn int_string(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_i64)
        .map(|v| v.to_string())
        .unwrap_or_default()
}

fn str_array(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}
