//! Main validation orchestration.
//!
//! Runs the semantic checks in a fixed order over the projected rows,
//! accumulating diagnostics instead of stopping at the first failure. The
//! CSV format guard is the one fail-fast stage and runs earlier, inside the
//! parser; [`report_from_format_issues`] turns its findings into the same
//! report shape so both paths render identically.

use csv_guard_core::{FormatIssue, Table};
use serde::Serialize;

use crate::profile::ValidationProfile;
use crate::row::RuleRow;
use crate::{
    validate_addresses, validate_columns, validate_fqdns, validate_priorities,
    validate_protocols, validate_rows,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateIssue {
    pub severity: Severity,
    pub code: String,
    /// 1-based physical line number in the source file, when the issue is
    /// tied to one row.
    pub line: Option<usize>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateReport {
    pub file: String,
    pub profile_source: String,
    pub rows: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub issues: Vec<ValidateIssue>,
}

/// Run every semantic check over the parsed table.
pub fn build_validate_report(
    file: &str,
    profile_source: &str,
    table: &Table,
    rows: &[RuleRow],
    profile: &ValidationProfile,
) -> ValidateReport {
    let mut issues = Vec::new();
    issues.extend(validate_columns::missing_column_issues(table));
    issues.extend(validate_columns::enum_value_issues(rows));
    issues.extend(validate_priorities::consistency_issues(rows));
    issues.extend(validate_addresses::address_issues(rows));
    issues.extend(validate_fqdns::fqdn_issues(rows));
    issues.extend(validate_protocols::protocol_issues(rows, profile));
    issues.extend(validate_rows::completeness_issues(rows));
    issues.extend(validate_priorities::range_issues(rows, profile));

    finish_report(file, profile_source, rows.len(), issues)
}

/// Wrap format-guard findings in the report shape. The run aborts before
/// semantic validation, so the row count is zero.
pub fn report_from_format_issues(
    file: &str,
    profile_source: &str,
    format_issues: &[FormatIssue],
) -> ValidateReport {
    let issues = format_issues
        .iter()
        .map(|issue| err("csv_format", Some(issue.line), issue.message.clone()))
        .collect();
    finish_report(file, profile_source, 0, issues)
}

fn finish_report(
    file: &str,
    profile_source: &str,
    rows: usize,
    issues: Vec<ValidateIssue>,
) -> ValidateReport {
    let count = |severity: Severity| issues.iter().filter(|i| i.severity == severity).count();
    ValidateReport {
        file: file.to_string(),
        profile_source: profile_source.to_string(),
        rows,
        errors: count(Severity::Error),
        warnings: count(Severity::Warning),
        infos: count(Severity::Info),
        issues,
    }
}

/// Render the report for terminal output. `strict` only affects the final
/// pass/fail verdict, never the counts.
pub fn render_validate_text(report: &ValidateReport, strict: bool, verbose: bool) -> String {
    let mut out = Vec::new();
    out.push(format!("validate file={} rows={}", report.file, report.rows));
    if verbose {
        out.push(format!("Using profile: {}", report.profile_source));
    }
    out.push("issues".to_string());
    if report.issues.is_empty() {
        out.push("- none".to_string());
    }
    for issue in &report.issues {
        let sev = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        match issue.line {
            Some(line) => out.push(format!(
                "- [{sev}] line={line} {}: {}",
                issue.code, issue.message
            )),
            None => out.push(format!("- [{sev}] {}: {}", issue.code, issue.message)),
        }
    }
    let failed = report.errors > 0 || (strict && report.warnings > 0);
    out.push(format!(
        "result errors={} warnings={} infos={} status={}",
        report.errors,
        report.warnings,
        report.infos,
        if failed { "fail" } else { "pass" }
    ));
    out.join("\n")
}

pub(crate) fn err(code: &str, line: Option<usize>, message: String) -> ValidateIssue {
    issue(Severity::Error, code, line, message)
}

pub(crate) fn warn(code: &str, line: Option<usize>, message: String) -> ValidateIssue {
    issue(Severity::Warning, code, line, message)
}

pub(crate) fn info(code: &str, line: Option<usize>, message: String) -> ValidateIssue {
    issue(Severity::Info, code, line, message)
}

fn issue(severity: Severity, code: &str, line: Option<usize>, message: String) -> ValidateIssue {
    ValidateIssue {
        severity,
        code: code.to_string(),
        line,
        message,
    }
}

#[cfg(test)]
mod tests {
    use csv_guard_core::parse;

    use crate::profile::load_profile;
    use crate::row::rows_from_table;

    use super::{build_validate_report, render_validate_text};

    const HEADER: &str = "RuleCollectionGroup,RuleCollectionGroupPriority,RuleCollectionName,\
RuleCollectionPriority,RuleCollectionAction,RuleCollectionType,RuleType,RuleName,SourceType,\
Source,Protocols,DestinationPorts,DestinationType,Destination";

    #[test]
    fn clean_rows_produce_zero_errors() {
        let csv = format!(
            "{HEADER}\nrcg-a,300,rc-web,100,Allow,FirewallPolicyFilterRuleCollection,\
ApplicationRule,allow-web,SourceAddresses,10.0.0.0/24,Https:443,,TargetFqdns,github.com\n"
        );
        let table = parse(&csv).expect("parse");
        let rows = rows_from_table(&table);
        let (profile, source) = load_profile(None).expect("profile");

        let report = build_validate_report("rules.csv", &source, &table, &rows, &profile);
        assert_eq!(report.errors, 0, "issues: {:?}", report.issues);
        assert_eq!(report.warnings, 0);
    }

    #[test]
    fn strict_flips_status_without_changing_counts() {
        let csv = format!(
            "{HEADER}\nrcg-a,300,rc-net,100,Allow,FirewallPolicyFilterRuleCollection,\
NetworkRule,allow-dns,SourceAddresses,10.0.0.0/24,UDP,53,,\n"
        );
        let table = parse(&csv).expect("parse");
        let rows = rows_from_table(&table);
        let (profile, source) = load_profile(None).expect("profile");

        let report = build_validate_report("rules.csv", &source, &table, &rows, &profile);
        assert_eq!(report.errors, 0, "issues: {:?}", report.issues);
        assert_eq!(report.warnings, 1);
        assert!(render_validate_text(&report, false, false).contains("status=pass"));
        assert!(render_validate_text(&report, true, false).contains("status=fail"));
    }
}
