use serde::Serialize;

/// A parsed CSV table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    /// Header fields in file order, trimmed.
    pub headers: Vec<String>,
    /// 1-based physical line number of the header row.
    pub header_line: usize,
    /// Data records in file order.
    pub records: Vec<Record>,
}

/// One data record with its original file position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// 1-based physical line number in the source file.
    pub line: usize,
    /// Field values in header order. May be shorter than the header when
    /// trailing fields were omitted.
    pub fields: Vec<String>,
}

impl Table {
    /// Return the index of a header, compared case-insensitively.
    pub fn header_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Whether a header is present, compared case-insensitively.
    pub fn has_header(&self, name: &str) -> bool {
        self.header_index(name).is_some()
    }

    /// Return a record's trimmed value under `name`, or `""` when the column
    /// or the field is absent.
    pub fn value<'a>(&self, record: &'a Record, name: &str) -> &'a str {
        self.header_index(name)
            .and_then(|idx| record.fields.get(idx))
            .map(|field| field.trim())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::{Record, Table};

    #[test]
    fn value_looks_up_headers_case_insensitively() {
        let table = Table {
            headers: vec!["RuleName".to_string(), "Source".to_string()],
            header_line: 1,
            records: vec![Record {
                line: 2,
                fields: vec!["allow-web".to_string(), " 10.0.0.0/24 ".to_string()],
            }],
        };

        assert_eq!(table.value(&table.records[0], "rulename"), "allow-web");
        assert_eq!(table.value(&table.records[0], "SOURCE"), "10.0.0.0/24");
        assert_eq!(table.value(&table.records[0], "Destination"), "");
    }

    #[test]
    fn value_tolerates_short_records() {
        let table = Table {
            headers: vec!["A".to_string(), "B".to_string()],
            header_line: 1,
            records: vec![Record {
                line: 2,
                fields: vec!["only".to_string()],
            }],
        };

        assert_eq!(table.value(&table.records[0], "B"), "");
    }
}
