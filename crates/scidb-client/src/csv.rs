//! Parsing of the shim's CSV result stream.
//!
//! Every result line holds single-quoted fields separated by commas. Quotes
//! and backslashes inside a field are escaped with a backslash. The first
//! line is a header and carries no data.

use md_parser::MetadataRow;
use tracing::warn;

/// Split one line into its unquoted field values.
///
/// Unquoted fields are accepted and taken verbatim up to the next comma.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' if in_quotes => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '\'' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Turn a full result body into metadata rows.
///
/// Lines with fewer than six fields are logged and skipped; extra fields
/// are ignored.
pub fn parse_metadata_csv(body: &str) -> Vec<MetadataRow> {
    body.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut fields = split_line(line.trim_end_matches('\r'));
            if fields.len() < 6 {
                warn!(
                    fields = fields.len(),
                    line = %line,
                    "Skipping metadata line with too few fields"
                );
                return None;
            }
            fields.truncate(6);
            let mut it = fields.into_iter();
            Some(MetadataRow {
                name: it.next().unwrap_or_default(),
                dimensions: it.next().unwrap_or_default(),
                attributes: it.next().unwrap_or_default(),
                srs: it.next().unwrap_or_default(),
                trs: it.next().unwrap_or_default(),
                extent: it.next().unwrap_or_default(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{arrays, csv_line};

    #[test]
    fn test_split_quoted_fields() {
        assert_eq!(split_line("'a','b,c',''"), vec!["a", "b,c", ""]);
    }

    #[test]
    fn test_split_escapes() {
        assert_eq!(split_line(r"'it\'s','a\\b'"), vec!["it's", r"a\b"]);
    }

    #[test]
    fn test_split_unquoted() {
        assert_eq!(split_line("name,dimensions"), vec!["name", "dimensions"]);
    }

    #[test]
    fn test_header_is_skipped() {
        let body = format!(
            "name,dimensions,attributes,srs,trs,extent\n{}\n",
            csv_line(&arrays::PLAIN)
        );
        let rows = parse_metadata_csv(&body);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, arrays::PLAIN[0]);
        assert_eq!(rows[0].dimensions, arrays::PLAIN[1]);
    }

    #[test]
    fn test_short_lines_are_skipped() {
        let body = format!(
            "header\n'short','row'\n{}\n\n",
            csv_line(&arrays::CHIRPS_DAILY)
        );
        let rows = parse_metadata_csv(&body);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, arrays::CHIRPS_DAILY[0]);
        assert_eq!(rows[0].extent, arrays::CHIRPS_DAILY[5]);
    }

    #[test]
    fn test_header_only() {
        assert!(parse_metadata_csv("name,dimensions\n").is_empty());
        assert!(parse_metadata_csv("").is_empty());
    }
}
