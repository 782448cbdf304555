//! IPv4/CIDR value checks for address-typed sources and destinations.

use std::str::FromStr;

use crate::row::RuleRow;
use crate::schema::{DestinationType, SourceType};
use crate::validate::{err, ValidateIssue};

pub fn address_issues(rows: &[RuleRow]) -> Vec<ValidateIssue> {
    let mut out = Vec::new();
    for row in rows {
        if SourceType::from_str(&row.source_type) == Ok(SourceType::Addresses) {
            for value in row.source_values() {
                if !is_valid_cidr(&value) {
                    out.push(err(
                        "invalid_cidr",
                        Some(row.line),
                        format!("Source value '{value}' is not a valid IPv4 address or CIDR range"),
                    ));
                }
            }
        }
        if DestinationType::from_str(&row.destination_type) == Ok(DestinationType::Addresses) {
            for value in row.destination_values() {
                if !is_valid_cidr(&value) {
                    out.push(err(
                        "invalid_cidr",
                        Some(row.line),
                        format!(
                            "Destination value '{value}' is not a valid IPv4 address or CIDR range"
                        ),
                    ));
                }
            }
        }
    }
    out
}

/// Dotted-quad IPv4 with an optional `/0`-`/32` prefix. `*` is always valid.
pub fn is_valid_cidr(value: &str) -> bool {
    if value == "*" {
        return true;
    }
    match value.split_once('/') {
        Some((addr, prefix)) => is_dotted_quad(addr) && is_valid_prefix(prefix),
        None => is_dotted_quad(value),
    }
}

fn is_dotted_quad(addr: &str) -> bool {
    let octets: Vec<&str> = addr.split('.').collect();
    octets.len() == 4 && octets.iter().all(|octet| is_octet(octet))
}

fn is_octet(octet: &str) -> bool {
    !octet.is_empty()
        && octet.len() <= 3
        && octet.chars().all(|c| c.is_ascii_digit())
        && octet.parse::<u16>().map(|n| n <= 255).unwrap_or(false)
}

fn is_valid_prefix(prefix: &str) -> bool {
    !prefix.is_empty()
        && prefix.chars().all(|c| c.is_ascii_digit())
        && prefix.parse::<u8>().map(|n| n <= 32).unwrap_or(false)
}
