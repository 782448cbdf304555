use std::path::PathBuf;

use csv_guard_core::{parse, parse_file, ParseError};
use pretty_assertions::assert_eq;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn parses_real_world_rules_fixture() {
    let table = parse_file(&fixture("fixtures/firewall-rules.csv")).expect("fixture parse");

    assert_eq!(table.headers.len(), 17);
    assert_eq!(table.headers[0], "RuleCollectionGroup");
    assert_eq!(table.records.len(), 6);
}

#[test]
fn line_numbers_track_the_original_file_across_skipped_lines() {
    let text = "# comment\n\nA,B\n1,2\n\n# another comment\n3,4\n";
    let table = parse(text).expect("parse");

    assert_eq!(table.header_line, 3);
    assert_eq!(table.records[0].line, 4);
    assert_eq!(table.records[1].line, 7);
}

#[test]
fn quoted_fields_keep_embedded_commas() {
    let table = parse("A,B\n\"10.0.0.0/24,10.1.0.0/24\",x\n").expect("parse");

    assert_eq!(table.records[0].fields[0], "10.0.0.0/24,10.1.0.0/24");
    assert_eq!(table.records[0].fields[1], "x");
}

#[test]
fn short_records_are_preserved_not_padded() {
    let table = parse("A,B,C\nonly-one\n").expect("parse");

    assert_eq!(table.records[0].fields.len(), 1);
    assert_eq!(table.value(&table.records[0], "C"), "");
}

#[test]
fn guard_failure_surfaces_all_issues() {
    let err = parse("A,B\n\"bad,row\nalso,\"bad\n").expect_err("must fail");

    match err {
        ParseError::Format(issues) => {
            assert_eq!(issues.len(), 2);
            assert_eq!(issues[0].line, 2);
            assert_eq!(issues[1].line, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let err = parse_file(&fixture("fixtures/no-such-file.csv")).expect_err("must fail");
    assert!(matches!(err, ParseError::Io(_)));
}
