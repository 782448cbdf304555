//! Deployment shapes for individual rules.
//!
//! One variant per rule type, discriminated by `RuleType`, serializing to
//! the ARM camelCase wire form. Exclusive fields (source addresses vs
//! source IP groups, the destination family) are populated one-of and the
//! empty ones are skipped on the wire.
//!
//! Rule types without a dedicated shape — `NatRule` included — map to a
//! passthrough object carrying only `name` and `ruleType`; that is explicit
//! behavior, not an error.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::ip_groups::resolve_ip_group_ids;
use crate::row::RuleRow;
use crate::schema::{self, DestinationType, RuleType, SourceType};

#[derive(Debug, Error)]
#[error("line {line}: {message}")]
pub struct MapError {
    pub line: usize,
    pub message: String,
}

/// Subscription and default IP-group resource group used to resolve
/// IP-group short names while mapping.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    pub subscription: String,
    pub default_ip_group_resource_group: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FirewallRule {
    Application(ApplicationRule),
    Network(NetworkRule),
    Passthrough(PassthroughRule),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRule {
    pub name: String,
    pub rule_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_addresses: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_ip_groups: Vec<String>,
    pub protocols: Vec<ApplicationProtocol>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target_fqdns: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub destination_addresses: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub destination_ip_groups: Vec<String>,
    #[serde(rename = "terminateTLS", skip_serializing_if = "is_false")]
    pub terminate_tls: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationProtocol {
    pub protocol_type: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRule {
    pub name: String,
    pub rule_type: String,
    pub ip_protocols: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_addresses: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_ip_groups: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub destination_addresses: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub destination_ip_groups: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub destination_fqdns: Vec<String>,
    pub destination_ports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassthroughRule {
    pub name: String,
    pub rule_type: String,
}

/// Map one rule row to its deployment shape.
pub fn map_rule(row: &RuleRow, ctx: &ResolveContext) -> Result<FirewallRule, MapError> {
    match RuleType::from_str(&row.rule_type) {
        Ok(RuleType::Application) => map_application(row, ctx).map(FirewallRule::Application),
        Ok(RuleType::Network) => map_network(row, ctx).map(FirewallRule::Network),
        _ => Ok(FirewallRule::Passthrough(PassthroughRule {
            name: row.rule_name.clone(),
            rule_type: row.rule_type.clone(),
        })),
    }
}

fn map_application(row: &RuleRow, ctx: &ResolveContext) -> Result<ApplicationRule, MapError> {
    let (source_addresses, source_ip_groups) = split_sources(row, ctx)?;

    let mut rule = ApplicationRule {
        name: row.rule_name.clone(),
        rule_type: RuleType::Application.as_str().to_string(),
        source_addresses,
        source_ip_groups,
        protocols: application_protocols(row)?,
        target_fqdns: Vec::new(),
        destination_addresses: Vec::new(),
        destination_ip_groups: Vec::new(),
        terminate_tls: row.terminate_tls_enabled(),
    };

    match destination_type(row)? {
        Some(DestinationType::IpGroups) => {
            rule.destination_ip_groups = resolve_destination_groups(row, ctx);
        }
        Some(DestinationType::TargetFqdns) | Some(DestinationType::Fqdns) => {
            rule.target_fqdns = row.destination_values();
        }
        Some(DestinationType::Addresses) => {
            rule.destination_addresses = row.destination_values();
        }
        None => {}
    }

    Ok(rule)
}

fn map_network(row: &RuleRow, ctx: &ResolveContext) -> Result<NetworkRule, MapError> {
    let (source_addresses, source_ip_groups) = split_sources(row, ctx)?;

    let mut rule = NetworkRule {
        name: row.rule_name.clone(),
        rule_type: RuleType::Network.as_str().to_string(),
        ip_protocols: row
            .protocol_values()
            .iter()
            .map(|p| canonical_network_protocol(p))
            .collect(),
        source_addresses,
        source_ip_groups,
        destination_addresses: Vec::new(),
        destination_ip_groups: Vec::new(),
        destination_fqdns: Vec::new(),
        destination_ports: row.destination_port_values(),
    };

    match destination_type(row)? {
        Some(DestinationType::IpGroups) => {
            rule.destination_ip_groups = resolve_destination_groups(row, ctx);
        }
        Some(DestinationType::Addresses) => {
            rule.destination_addresses = row.destination_values();
        }
        Some(DestinationType::Fqdns) | Some(DestinationType::TargetFqdns) => {
            rule.destination_fqdns = row.destination_values();
        }
        None => {}
    }

    Ok(rule)
}

/// Populate exactly one of the two source fields.
fn split_sources(
    row: &RuleRow,
    ctx: &ResolveContext,
) -> Result<(Vec<String>, Vec<String>), MapError> {
    match SourceType::from_str(&row.source_type) {
        Ok(SourceType::Addresses) => Ok((row.source_values(), Vec::new())),
        Ok(SourceType::IpGroups) => Ok((
            Vec::new(),
            resolve_ip_group_ids(
                &row.source_values(),
                &row.source_rg_overrides(),
                &ctx.default_ip_group_resource_group,
                &ctx.subscription,
            ),
        )),
        Err(err) => Err(MapError {
            line: row.line,
            message: err.to_string(),
        }),
    }
}

/// An empty `DestinationType` is only acceptable alongside an empty
/// `Destination` (the validator has already warned about that row).
fn destination_type(row: &RuleRow) -> Result<Option<DestinationType>, MapError> {
    if row.destination_type.is_empty() {
        if row.destination.is_empty() {
            return Ok(None);
        }
        return Err(MapError {
            line: row.line,
            message: format!(
                "rule '{}' has a Destination but no {}",
                row.rule_name,
                schema::COL_DESTINATION_TYPE
            ),
        });
    }
    DestinationType::from_str(&row.destination_type)
        .map(Some)
        .map_err(|err| MapError {
            line: row.line,
            message: err.to_string(),
        })
}

fn resolve_destination_groups(row: &RuleRow, ctx: &ResolveContext) -> Vec<String> {
    resolve_ip_group_ids(
        &row.destination_values(),
        &row.destination_rg_overrides(),
        &ctx.default_ip_group_resource_group,
        &ctx.subscription,
    )
}

/// Split `Type:Port` entries. The deployment shape needs a single integer
/// port, so ranges are rejected here even though the schema admits them.
fn application_protocols(row: &RuleRow) -> Result<Vec<ApplicationProtocol>, MapError> {
    row.protocol_values()
        .iter()
        .map(|entry| {
            let Some((protocol, port)) = entry.split_once(':') else {
                return Err(MapError {
                    line: row.line,
                    message: format!("Protocols entry '{entry}' is not Type:Port"),
                });
            };
            let port = port.trim().parse::<u16>().map_err(|_| MapError {
                line: row.line,
                message: format!(
                    "application protocol port '{}' must be a single port 1-65535",
                    port.trim()
                ),
            })?;
            Ok(ApplicationProtocol {
                protocol_type: canonical_app_protocol(protocol.trim()),
                port,
            })
        })
        .collect()
}

fn canonical_app_protocol(raw: &str) -> String {
    for canonical in ["Http", "Https", "Mssql"] {
        if raw.eq_ignore_ascii_case(canonical) {
            return canonical.to_string();
        }
    }
    raw.to_string()
}

fn canonical_network_protocol(raw: &str) -> String {
    for canonical in ["Any", "TCP", "UDP", "ICMP"] {
        if raw.eq_ignore_ascii_case(canonical) {
            return canonical.to_string();
        }
    }
    raw.to_string()
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use crate::row::RuleRow;

    use super::{map_rule, FirewallRule, ResolveContext};

    fn ctx() -> ResolveContext {
        ResolveContext {
            subscription: "sub1".to_string(),
            default_ip_group_resource_group: "rg-ipg".to_string(),
        }
    }

    fn base_row(rule_type: &str, name: &str) -> RuleRow {
        RuleRow {
            line: 2,
            rule_type: rule_type.to_string(),
            rule_name: name.to_string(),
            source_type: "SourceAddresses".to_string(),
            source: "10.0.0.0/24".to_string(),
            ..RuleRow::default()
        }
    }

    #[test]
    fn application_rule_maps_protocols_and_fqdns() {
        let mut row = base_row("ApplicationRule", "allow-web");
        row.protocols = "Https:443,Http:80".to_string();
        row.destination_type = "TargetFqdns".to_string();
        row.destination = "github.com,*.github.com".to_string();

        let FirewallRule::Application(rule) = map_rule(&row, &ctx()).expect("map") else {
            panic!("expected application rule");
        };
        assert_eq!(rule.protocols.len(), 2);
        assert_eq!(rule.protocols[0].protocol_type, "Https");
        assert_eq!(rule.protocols[0].port, 443);
        assert_eq!(rule.target_fqdns.len(), 2);
        assert!(rule.source_ip_groups.is_empty());
    }

    #[test]
    fn destination_ip_groups_take_precedence_and_resolve() {
        let mut row = base_row("ApplicationRule", "allow-app");
        row.protocols = "Https:443".to_string();
        row.destination_type = "DestinationIpGroups".to_string();
        row.destination = "ipg-app".to_string();

        let FirewallRule::Application(rule) = map_rule(&row, &ctx()).expect("map") else {
            panic!("expected application rule");
        };
        assert_eq!(
            rule.destination_ip_groups,
            vec![
                "/subscriptions/sub1/resourceGroups/rg-ipg/providers/Microsoft.Network/ipGroups/ipg-app"
                    .to_string()
            ]
        );
        assert!(rule.target_fqdns.is_empty());
    }

    #[test]
    fn network_rule_sets_exactly_one_destination_family() {
        let mut row = base_row("NetworkRule", "allow-dns");
        row.protocols = "UDP,tcp".to_string();
        row.destination_ports = "53".to_string();
        row.destination_type = "DestinationAddresses".to_string();
        row.destination = "10.0.0.4".to_string();

        let FirewallRule::Network(rule) = map_rule(&row, &ctx()).expect("map") else {
            panic!("expected network rule");
        };
        assert_eq!(rule.ip_protocols, vec!["UDP".to_string(), "TCP".to_string()]);
        assert_eq!(rule.destination_addresses, vec!["10.0.0.4".to_string()]);
        assert!(rule.destination_fqdns.is_empty());
        assert!(rule.destination_ip_groups.is_empty());
    }

    #[test]
    fn nat_rules_pass_through_with_name_and_type_only() {
        let row = base_row("NatRule", "dnat-web");
        let rule = map_rule(&row, &ctx()).expect("map");

        let json = serde_json::to_value(&rule).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"name": "dnat-web", "ruleType": "NatRule"})
        );
    }

    #[test]
    fn app_protocol_port_range_is_rejected_at_mapping_time() {
        let mut row = base_row("ApplicationRule", "allow-web");
        row.protocols = "Https:80-443".to_string();

        let err = map_rule(&row, &ctx()).expect_err("must fail");
        assert_eq!(err.line, 2);
    }

    #[test]
    fn terminate_tls_is_skipped_when_false() {
        let mut row = base_row("ApplicationRule", "allow-web");
        row.protocols = "Https:443".to_string();

        let json = serde_json::to_value(map_rule(&row, &ctx()).expect("map")).expect("serialize");
        assert!(json.get("terminateTLS").is_none());

        row.terminate_tls = "true".to_string();
        let json = serde_json::to_value(map_rule(&row, &ctx()).expect("map")).expect("serialize");
        assert_eq!(json.get("terminateTLS"), Some(&serde_json::json!(true)));
    }
}
