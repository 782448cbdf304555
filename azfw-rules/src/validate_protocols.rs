//! Protocol and port checks.
//!
//! Application rules carry `Type:Port` entries; network and NAT rules carry
//! bare protocol names plus a separate `DestinationPorts` column. Ports are
//! 1-65535, singly or as a `start-end` range with start < end.

use std::str::FromStr;

use crate::profile::ValidationProfile;
use crate::row::RuleRow;
use crate::schema::RuleType;
use crate::validate::{err, ValidateIssue};

pub fn protocol_issues(rows: &[RuleRow], profile: &ValidationProfile) -> Vec<ValidateIssue> {
    let mut out = Vec::new();
    for row in rows {
        match RuleType::from_str(&row.rule_type) {
            Ok(RuleType::Application) => {
                for entry in row.protocol_values() {
                    if !is_valid_app_protocol(&entry, &profile.application_protocol_types) {
                        out.push(err(
                            "invalid_app_protocol",
                            Some(row.line),
                            format!(
                                "Protocols entry '{entry}' must be Type:Port with Type one of {} \
and Port 1-65535 or a start-end range",
                                profile.application_protocol_types.join(", ")
                            ),
                        ));
                    }
                }
            }
            Ok(RuleType::Network) | Ok(RuleType::Nat) => {
                for entry in row.protocol_values() {
                    if !is_network_protocol(&entry, &profile.network_protocols) {
                        out.push(err(
                            "invalid_network_protocol",
                            Some(row.line),
                            format!(
                                "Protocols entry '{entry}' is not one of {}",
                                profile.network_protocols.join(", ")
                            ),
                        ));
                    }
                }
                for entry in row.destination_port_values() {
                    if !is_valid_port_entry(&entry) {
                        out.push(err(
                            "invalid_destination_port",
                            Some(row.line),
                            format!(
                                "DestinationPorts entry '{entry}' must be *, a port 1-65535, \
or a start-end range"
                            ),
                        ));
                    }
                }
            }
            // Unknown rule types are already reported by the enum check.
            Err(_) => {}
        }
    }
    out
}

/// `Type:Port` where Type is a member of `allowed` and Port is a single port
/// or range.
pub fn is_valid_app_protocol(entry: &str, allowed: &[String]) -> bool {
    let Some((protocol, port)) = entry.split_once(':') else {
        return false;
    };
    let protocol = protocol.trim();
    let port = port.trim();
    allowed.iter().any(|a| a.eq_ignore_ascii_case(protocol))
        && (is_valid_port(port) || is_valid_port_range(port))
}

fn is_network_protocol(entry: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|a| a.eq_ignore_ascii_case(entry))
}

/// `*`, a single port, or a range.
pub fn is_valid_port_entry(value: &str) -> bool {
    value == "*" || is_valid_port(value) || is_valid_port_range(value)
}

pub fn is_valid_port(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 5
        && value.chars().all(|c| c.is_ascii_digit())
        && value.parse::<u32>().map(|n| (1..=65535).contains(&n)).unwrap_or(false)
}

/// `start-end` with both valid ports and start strictly below end.
pub fn is_valid_port_range(value: &str) -> bool {
    let Some((start, end)) = value.split_once('-') else {
        return false;
    };
    if !is_valid_port(start) || !is_valid_port(end) {
        return false;
    }
    let (start, end) = (start.parse::<u32>(), end.parse::<u32>());
    matches!((start, end), (Ok(s), Ok(e)) if s < e)
}

#[cfg(test)]
mod tests {
    use crate::profile::load_profile;

    use super::{is_valid_app_protocol, is_valid_port, is_valid_port_entry, is_valid_port_range};

    #[test]
    fn single_ports_respect_bounds() {
        assert!(is_valid_port("443"));
        assert!(is_valid_port("1"));
        assert!(is_valid_port("65535"));
        assert!(!is_valid_port("0"));
        assert!(!is_valid_port("70000"));
        assert!(!is_valid_port("+443"));
        assert!(!is_valid_port(""));
    }

    #[test]
    fn ranges_require_start_below_end() {
        assert!(is_valid_port_range("80-443"));
        assert!(!is_valid_port_range("443-80"));
        assert!(!is_valid_port_range("443-443"));
        assert!(!is_valid_port_range("80-70000"));
    }

    #[test]
    fn port_entries_accept_wildcard() {
        assert!(is_valid_port_entry("*"));
        assert!(is_valid_port_entry("53"));
        assert!(!is_valid_port_entry("**"));
    }

    #[test]
    fn app_protocols_require_type_and_colon() {
        let (profile, _) = load_profile(None).expect("profile");
        let allowed = &profile.application_protocol_types;

        assert!(is_valid_app_protocol("Https:443", allowed));
        assert!(is_valid_app_protocol("http:80", allowed));
        assert!(is_valid_app_protocol("Mssql:1433", allowed));
        assert!(!is_valid_app_protocol("Https444", allowed));
        assert!(!is_valid_app_protocol("Gopher:70", allowed));
        assert!(!is_valid_app_protocol("Https:70000", allowed));
    }
}
