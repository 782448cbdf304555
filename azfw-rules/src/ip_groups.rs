//! IP-group reference resolution.
//!
//! CSV cells may carry an IP group as a short name or as a full resource ID;
//! either way the deployed reference is rebuilt from the subscription, the
//! resolved owning resource group, and the short name. One function serves
//! all four call sites (application/network × source/destination).

const PROVIDER_SEGMENT: &str = "/ipgroups/";

/// Resolve each value to a full IP Group resource ID. The owning resource
/// group for position `i` is `overrides[i]` when present and non-empty,
/// else `default_resource_group`.
pub fn resolve_ip_group_ids(
    values: &[String],
    overrides: &[String],
    default_resource_group: &str,
    subscription: &str,
) -> Vec<String> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let name = short_name(value);
            let resource_group = overrides
                .get(i)
                .map(|rg| rg.trim())
                .filter(|rg| !rg.is_empty())
                .unwrap_or(default_resource_group);
            format!(
                "/subscriptions/{subscription}/resourceGroups/{resource_group}/providers/Microsoft.Network/ipGroups/{name}"
            )
        })
        .collect()
}

/// Extract the short name from a value that may be a full resource ID.
pub fn short_name(value: &str) -> &str {
    let trimmed = value.trim();
    let lower = trimmed.to_ascii_lowercase();
    match lower.rfind(PROVIDER_SEGMENT) {
        Some(pos) => &trimmed[pos + PROVIDER_SEGMENT.len()..],
        None => trimmed,
    }
}

/// Extract the owning resource group from a full resource ID, if present.
pub fn owning_resource_group(value: &str) -> Option<&str> {
    let lower = value.to_ascii_lowercase();
    let start = lower.find("/resourcegroups/")? + "/resourcegroups/".len();
    let rest = &value[start..];
    let end = rest.find('/').unwrap_or(rest.len());
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::{owning_resource_group, resolve_ip_group_ids, short_name};

    #[test]
    fn short_names_resolve_against_the_default_resource_group() {
        let ids = resolve_ip_group_ids(
            &["myGroup".to_string()],
            &[],
            "rg-ipg",
            "sub1",
        );
        assert_eq!(
            ids,
            vec![
                "/subscriptions/sub1/resourceGroups/rg-ipg/providers/Microsoft.Network/ipGroups/myGroup"
                    .to_string()
            ]
        );
    }

    #[test]
    fn full_ids_are_rebuilt_from_their_short_name() {
        let ids = resolve_ip_group_ids(
            &["/subscriptions/other/resourceGroups/rg-old/providers/Microsoft.Network/ipGroups/ipg-app".to_string()],
            &[],
            "rg-new",
            "sub1",
        );
        assert_eq!(
            ids,
            vec![
                "/subscriptions/sub1/resourceGroups/rg-new/providers/Microsoft.Network/ipGroups/ipg-app"
                    .to_string()
            ]
        );
    }

    #[test]
    fn overrides_apply_positionally() {
        let ids = resolve_ip_group_ids(
            &["a".to_string(), "b".to_string(), "c".to_string()],
            &["rg-x".to_string(), "".to_string()],
            "rg-default",
            "sub1",
        );
        assert!(ids[0].contains("/resourceGroups/rg-x/"));
        assert!(ids[1].contains("/resourceGroups/rg-default/"));
        assert!(ids[2].contains("/resourceGroups/rg-default/"));
    }

    #[test]
    fn short_name_matches_case_insensitively() {
        assert_eq!(
            short_name("/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/IpGroups/ipg-x"),
            "ipg-x"
        );
        assert_eq!(short_name(" plain-name "), "plain-name");
    }

    #[test]
    fn owning_resource_group_parses_ids() {
        assert_eq!(
            owning_resource_group(
                "/subscriptions/s/resourceGroups/rg-hub/providers/Microsoft.Network/ipGroups/x"
            ),
            Some("rg-hub")
        );
        assert_eq!(owning_resource_group("plain-name"), None);
    }
}
