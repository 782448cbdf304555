use csv_guard_core::scan_format;

#[test]
fn well_formed_file_passes_the_guard() {
    let text = "\
# comment lines are skipped even with an odd \" in them
A,B,C
plain,\"quoted, with comma\",\"escaped \"\"quote\"\" inside\"
";
    assert!(scan_format(text).is_empty());
}

#[test]
fn each_malformed_line_is_reported_once() {
    let text = "A,B\n\"open,1\n\"alpha\"\"beta\",2\nx,y\"z\",3\n";
    let issues = scan_format(text);

    assert_eq!(issues.len(), 3);
    assert_eq!(issues[0].line, 2);
    assert_eq!(issues[0].message, "unbalanced quotes");
    assert_eq!(issues[1].line, 3);
    assert_eq!(issues[1].message, "missing comma between quoted fields");
    assert_eq!(issues[2].line, 4);
    assert_eq!(issues[2].message, "missing comma before quoted field");
}

#[test]
fn quote_directly_after_comma_without_close_is_flagged() {
    let issues = scan_format("A,B\na,\"b\"c,\"d\"\n");

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].line, 2);
    assert_eq!(
        issues[0].message,
        "quoted field is missing its closing quote"
    );
}
