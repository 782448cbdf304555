//! Required-column and value-set checks.

use csv_guard_core::Table;

use crate::row::RuleRow;
use crate::schema::{
    self, CollectionAction, CollectionType, DestinationType, RuleType, SourceType,
};
use crate::validate::{err, ValidateIssue};

/// One error per required column missing from the header.
pub fn missing_column_issues(table: &Table) -> Vec<ValidateIssue> {
    schema::REQUIRED_COLUMNS
        .iter()
        .filter(|column| !table.has_header(column))
        .map(|column| {
            err(
                "missing_column",
                Some(table.header_line),
                format!("required column '{column}' is missing from the header"),
            )
        })
        .collect()
}

/// Check every non-empty enum cell against its value set. Empty cells are
/// left to the completeness check; cells of absent columns are empty by
/// projection, so a missing column yields one `missing_column` error rather
/// than an error per row.
pub fn enum_value_issues(rows: &[RuleRow]) -> Vec<ValidateIssue> {
    let mut out = Vec::new();
    for row in rows {
        check_value::<CollectionAction>(
            &mut out,
            row.line,
            &row.action,
            CollectionAction::VALUES,
            schema::COL_ACTION,
        );
        check_value::<CollectionType>(
            &mut out,
            row.line,
            &row.collection_type,
            CollectionType::VALUES,
            schema::COL_COLLECTION_TYPE,
        );
        check_value::<RuleType>(
            &mut out,
            row.line,
            &row.rule_type,
            RuleType::VALUES,
            schema::COL_RULE_TYPE,
        );
        check_value::<SourceType>(
            &mut out,
            row.line,
            &row.source_type,
            SourceType::VALUES,
            schema::COL_SOURCE_TYPE,
        );
        check_value::<DestinationType>(
            &mut out,
            row.line,
            &row.destination_type,
            DestinationType::VALUES,
            schema::COL_DESTINATION_TYPE,
        );

        if !row.terminate_tls.is_empty()
            && !row.terminate_tls.eq_ignore_ascii_case("true")
            && !row.terminate_tls.eq_ignore_ascii_case("false")
        {
            out.push(err(
                "invalid_value",
                Some(row.line),
                format!(
                    "{} '{}' is not one of true, false",
                    schema::COL_TERMINATE_TLS,
                    row.terminate_tls
                ),
            ));
        }
    }
    out
}

fn check_value<T: std::str::FromStr>(
    out: &mut Vec<ValidateIssue>,
    line: usize,
    value: &str,
    allowed: &[&str],
    column: &str,
) {
    if value.is_empty() || value.parse::<T>().is_ok() {
        return;
    }
    out.push(err(
        "invalid_value",
        Some(line),
        format!("{column} '{value}' is not one of {}", allowed.join(", ")),
    ));
}

#[cfg(test)]
mod tests {
    use csv_guard_core::parse;

    use crate::row::rows_from_table;

    use super::{enum_value_issues, missing_column_issues};

    #[test]
    fn reports_each_missing_required_column() {
        let table = parse("RuleCollectionGroup,RuleName\nrcg-a,allow\n").expect("parse");
        let issues = missing_column_issues(&table);

        assert_eq!(issues.len(), 12);
        assert!(issues
            .iter()
            .all(|i| i.code == "missing_column" && i.line == Some(1)));
    }

    #[test]
    fn flags_unknown_enum_values_only_when_non_empty() {
        let table = parse(
            "RuleCollectionAction,RuleType,SourceType\nAlow,NetworkRule,\nDeny,BogusRule,SourceAddresses\n",
        )
        .expect("parse");
        let rows = rows_from_table(&table);
        let issues = enum_value_issues(&rows);

        assert_eq!(issues.len(), 2);
        assert!(issues[0].message.contains("'Alow'"));
        assert_eq!(issues[0].line, Some(2));
        assert!(issues[1].message.contains("'BogusRule'"));
        assert_eq!(issues[1].line, Some(3));
    }
}
