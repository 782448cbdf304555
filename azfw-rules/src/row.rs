//! Projection of CSV records onto the rule schema.

use csv_guard_core::{Record, Table};
use serde::Serialize;

use crate::schema::{self, split_values};

/// One CSV record projected onto the rule schema.
///
/// Values are raw trimmed strings; missing columns project to empty strings.
/// The validator owns reporting on bad values, and the hierarchy builder
/// parses them strictly when a deployment shape is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleRow {
    /// 1-based physical line number in the source file.
    pub line: usize,
    pub group: String,
    pub group_priority: String,
    pub collection: String,
    pub collection_priority: String,
    pub action: String,
    pub collection_type: String,
    pub rule_type: String,
    pub rule_name: String,
    pub source_type: String,
    pub source: String,
    pub protocols: String,
    pub destination_ports: String,
    pub destination_type: String,
    pub destination: String,
    pub source_ipg_resource_groups: String,
    pub destination_ipg_resource_groups: String,
    pub terminate_tls: String,
}

impl RuleRow {
    /// Whether this row carries an actual rule. Rows without a `RuleName`
    /// only establish their collection/group shell.
    pub fn is_rule(&self) -> bool {
        !self.rule_name.is_empty()
    }

    pub fn source_values(&self) -> Vec<String> {
        split_values(&self.source)
    }

    pub fn destination_values(&self) -> Vec<String> {
        split_values(&self.destination)
    }

    pub fn protocol_values(&self) -> Vec<String> {
        split_values(&self.protocols)
    }

    pub fn destination_port_values(&self) -> Vec<String> {
        split_values(&self.destination_ports)
    }

    pub fn source_rg_overrides(&self) -> Vec<String> {
        split_values(&self.source_ipg_resource_groups)
    }

    pub fn destination_rg_overrides(&self) -> Vec<String> {
        split_values(&self.destination_ipg_resource_groups)
    }

    pub fn terminate_tls_enabled(&self) -> bool {
        self.terminate_tls.eq_ignore_ascii_case("true")
    }
}

/// Project every record of a parsed table onto [`RuleRow`]s.
pub fn rows_from_table(table: &Table) -> Vec<RuleRow> {
    table
        .records
        .iter()
        .map(|record| row_from_record(table, record))
        .collect()
}

fn row_from_record(table: &Table, record: &Record) -> RuleRow {
    let value = |name: &str| table.value(record, name).to_string();
    RuleRow {
        line: record.line,
        group: value(schema::COL_GROUP),
        group_priority: value(schema::COL_GROUP_PRIORITY),
        collection: value(schema::COL_COLLECTION),
        collection_priority: value(schema::COL_COLLECTION_PRIORITY),
        action: value(schema::COL_ACTION),
        collection_type: value(schema::COL_COLLECTION_TYPE),
        rule_type: value(schema::COL_RULE_TYPE),
        rule_name: value(schema::COL_RULE_NAME),
        source_type: value(schema::COL_SOURCE_TYPE),
        source: value(schema::COL_SOURCE),
        protocols: value(schema::COL_PROTOCOLS),
        destination_ports: value(schema::COL_DESTINATION_PORTS),
        destination_type: value(schema::COL_DESTINATION_TYPE),
        destination: value(schema::COL_DESTINATION),
        source_ipg_resource_groups: value(schema::COL_SOURCE_IPG_RESOURCE_GROUPS),
        destination_ipg_resource_groups: value(schema::COL_DESTINATION_IPG_RESOURCE_GROUPS),
        terminate_tls: value(schema::COL_TERMINATE_TLS),
    }
}

#[cfg(test)]
mod tests {
    use csv_guard_core::parse;

    use super::rows_from_table;

    #[test]
    fn projects_records_with_line_numbers() {
        let table = parse(
            "RuleCollectionGroup,RuleName,Source\n# comment\nrcg-a,allow-web,\"10.0.0.0/24,10.1.0.0/24\"\n",
        )
        .expect("parse");
        let rows = rows_from_table(&table);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, 3);
        assert_eq!(rows[0].group, "rcg-a");
        assert_eq!(
            rows[0].source_values(),
            vec!["10.0.0.0/24".to_string(), "10.1.0.0/24".to_string()]
        );
        assert_eq!(rows[0].destination, "");
    }
}
