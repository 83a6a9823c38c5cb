// ABOUTME: Table output of known_hosts records for the non-interactive commands
// ABOUTME: Lines that fail to parse are left out of the table and reported separately

use comfy_table::presets::NOTHING;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};

use crate::ssh::{HostRecord, ParseError};

pub struct HostTable {
    pub table: Table,
    pub skipped: Vec<(String, ParseError)>,
}

pub fn build(lines: &[String]) -> HostTable {
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            ["Name", "IP", "Type"]
                .into_iter()
                .map(|title| Cell::new(title).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );

    let mut skipped = Vec::new();
    for line in lines.iter().filter(|line| !line.is_empty()) {
        match HostRecord::parse(line) {
            Ok(record) => {
                table.add_row(vec![record.name, record.address, record.key_type]);
            }
            Err(e) => {
                tracing::warn!("Skipping line {line:?}: {e}");
                skipped.push((line.clone(), e));
            }
        }
    }

    HostTable { table, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_table_has_header_and_rows() {
        let output = build(&lines(&[
            "github.com ssh-rsa key1",
            "192.168.1.1 ssh-ed25519 key2",
            "myserver,10.0.0.1 ecdsa-sha2-nistp256 key3",
        ]));
        let rendered = output.table.to_string();

        let expected_cells = [
            "Name",
            "IP",
            "Type",
            "github.com",
            "ssh-rsa",
            "192.168.1.1",
            "ssh-ed25519",
        ];
        for expected in expected_cells {
            assert!(rendered.contains(expected), "missing {expected:?} in:\n{rendered}");
        }
        assert!(rendered.contains("myserver"));
        assert!(rendered.contains("10.0.0.1"));
        assert_eq!(output.table.row_iter().count(), 3);
        assert!(output.skipped.is_empty());
    }

    #[test]
    fn test_table_skips_invalid_and_empty_lines() {
        let output = build(&lines(&["", "invalid-host", "github.com ssh-rsa key", ""]));

        assert_eq!(output.table.row_iter().count(), 1);
        assert_eq!(output.skipped.len(), 1);
        assert_eq!(output.skipped[0].0, "invalid-host");
        assert_eq!(output.skipped[0].1, ParseError::InvalidFormat { fields: 1 });
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let output = build(&[]);
        assert!(output.table.to_string().contains("Name"));
    }
}
