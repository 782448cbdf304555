//! Canonical CSV schema: column names and value sets.
//!
//! The CSV is the exchange format between export, human edit, validation,
//! and deployment; column names and the enumerated value sets here are the
//! contract. Header lookup is case-insensitive, canonical casing below.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

pub const COL_GROUP: &str = "RuleCollectionGroup";
pub const COL_GROUP_PRIORITY: &str = "RuleCollectionGroupPriority";
pub const COL_COLLECTION: &str = "RuleCollectionName";
pub const COL_COLLECTION_PRIORITY: &str = "RuleCollectionPriority";
pub const COL_ACTION: &str = "RuleCollectionAction";
pub const COL_COLLECTION_TYPE: &str = "RuleCollectionType";
pub const COL_RULE_TYPE: &str = "RuleType";
pub const COL_RULE_NAME: &str = "RuleName";
pub const COL_SOURCE_TYPE: &str = "SourceType";
pub const COL_SOURCE: &str = "Source";
pub const COL_PROTOCOLS: &str = "Protocols";
pub const COL_DESTINATION_PORTS: &str = "DestinationPorts";
pub const COL_DESTINATION_TYPE: &str = "DestinationType";
pub const COL_DESTINATION: &str = "Destination";
pub const COL_SOURCE_IPG_RESOURCE_GROUPS: &str = "SourceIpGroupResourceGroups";
pub const COL_DESTINATION_IPG_RESOURCE_GROUPS: &str = "DestinationIpGroupResourceGroups";
pub const COL_TERMINATE_TLS: &str = "TerminateTls";

/// Columns every rules CSV must carry. The three override/TLS columns are
/// optional.
pub const REQUIRED_COLUMNS: [&str; 14] = [
    COL_GROUP,
    COL_GROUP_PRIORITY,
    COL_COLLECTION,
    COL_COLLECTION_PRIORITY,
    COL_ACTION,
    COL_COLLECTION_TYPE,
    COL_RULE_TYPE,
    COL_RULE_NAME,
    COL_SOURCE_TYPE,
    COL_SOURCE,
    COL_PROTOCOLS,
    COL_DESTINATION_PORTS,
    COL_DESTINATION_TYPE,
    COL_DESTINATION,
];

/// A cell value that is not a member of its column's value set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {field}: '{value}'")]
pub struct UnknownValue {
    pub field: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CollectionAction {
    Allow,
    Deny,
}

impl CollectionAction {
    pub const VALUES: &'static [&'static str] = &["Allow", "Deny"];

    pub fn as_str(self) -> &'static str {
        match self {
            CollectionAction::Allow => "Allow",
            CollectionAction::Deny => "Deny",
        }
    }
}

impl FromStr for CollectionAction {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, UnknownValue> {
        match s.trim() {
            v if v.eq_ignore_ascii_case("allow") => Ok(CollectionAction::Allow),
            v if v.eq_ignore_ascii_case("deny") => Ok(CollectionAction::Deny),
            other => Err(UnknownValue {
                field: COL_ACTION,
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CollectionType {
    #[serde(rename = "FirewallPolicyFilterRuleCollection")]
    Filter,
    #[serde(rename = "FirewallPolicyNatRuleCollection")]
    Nat,
}

impl CollectionType {
    pub const VALUES: &'static [&'static str] = &[
        "FirewallPolicyFilterRuleCollection",
        "FirewallPolicyNatRuleCollection",
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CollectionType::Filter => "FirewallPolicyFilterRuleCollection",
            CollectionType::Nat => "FirewallPolicyNatRuleCollection",
        }
    }
}

impl FromStr for CollectionType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, UnknownValue> {
        match s.trim() {
            v if v.eq_ignore_ascii_case("FirewallPolicyFilterRuleCollection") => {
                Ok(CollectionType::Filter)
            }
            v if v.eq_ignore_ascii_case("FirewallPolicyNatRuleCollection") => {
                Ok(CollectionType::Nat)
            }
            other => Err(UnknownValue {
                field: COL_COLLECTION_TYPE,
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RuleType {
    #[serde(rename = "ApplicationRule")]
    Application,
    #[serde(rename = "NetworkRule")]
    Network,
    #[serde(rename = "NatRule")]
    Nat,
}

impl RuleType {
    pub const VALUES: &'static [&'static str] = &["ApplicationRule", "NetworkRule", "NatRule"];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleType::Application => "ApplicationRule",
            RuleType::Network => "NetworkRule",
            RuleType::Nat => "NatRule",
        }
    }
}

impl FromStr for RuleType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, UnknownValue> {
        match s.trim() {
            v if v.eq_ignore_ascii_case("ApplicationRule") => Ok(RuleType::Application),
            v if v.eq_ignore_ascii_case("NetworkRule") => Ok(RuleType::Network),
            v if v.eq_ignore_ascii_case("NatRule") => Ok(RuleType::Nat),
            other => Err(UnknownValue {
                field: COL_RULE_TYPE,
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceType {
    #[serde(rename = "SourceAddresses")]
    Addresses,
    #[serde(rename = "SourceIpGroups")]
    IpGroups,
}

impl SourceType {
    pub const VALUES: &'static [&'static str] = &["SourceAddresses", "SourceIpGroups"];
}

impl FromStr for SourceType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, UnknownValue> {
        match s.trim() {
            v if v.eq_ignore_ascii_case("SourceAddresses") => Ok(SourceType::Addresses),
            v if v.eq_ignore_ascii_case("SourceIpGroups") => Ok(SourceType::IpGroups),
            other => Err(UnknownValue {
                field: COL_SOURCE_TYPE,
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DestinationType {
    #[serde(rename = "TargetFqdns")]
    TargetFqdns,
    #[serde(rename = "DestinationAddresses")]
    Addresses,
    #[serde(rename = "DestinationFqdns")]
    Fqdns,
    #[serde(rename = "DestinationIpGroups")]
    IpGroups,
}

impl DestinationType {
    pub const VALUES: &'static [&'static str] = &[
        "TargetFqdns",
        "DestinationAddresses",
        "DestinationFqdns",
        "DestinationIpGroups",
    ];
}

impl FromStr for DestinationType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, UnknownValue> {
        match s.trim() {
            v if v.eq_ignore_ascii_case("TargetFqdns") => Ok(DestinationType::TargetFqdns),
            v if v.eq_ignore_ascii_case("DestinationAddresses") => Ok(DestinationType::Addresses),
            v if v.eq_ignore_ascii_case("DestinationFqdns") => Ok(DestinationType::Fqdns),
            v if v.eq_ignore_ascii_case("DestinationIpGroups") => Ok(DestinationType::IpGroups),
            other => Err(UnknownValue {
                field: COL_DESTINATION_TYPE,
                value: other.to_string(),
            }),
        }
    }
}

/// Split a comma-joined cell into trimmed, non-empty values.
pub fn split_values(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .collect()
}
