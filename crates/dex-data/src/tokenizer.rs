//! Line tokenizer for DEX logs.
//!
//! Turns raw log text into a [`RawRecordGroup`]: one entry per `TAG*f1*f2*...`
//! line, grouped by tag in file order.

use dex_core::models::RawRecordGroup;
use tracing::debug;

/// Separates the tag and the fields of a DEX record.
pub const FIELD_DELIMITER: char = '*';

/// Tokenize a whole DEX document.
///
/// Lines are trimmed; blank lines and lines without a delimiter are dropped.
/// Tags and fields are kept verbatim (no case folding, no per-field trim).
/// Never fails.
pub fn tokenize(raw_text: &str) -> RawRecordGroup {
    let mut groups = RawRecordGroup::new();
    let mut dropped = 0usize;

    for line in raw_text.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match split_record(trimmed) {
            Some((tag, fields)) => groups.push(tag, fields),
            None => dropped += 1,
        }
    }

    debug!(
        "Tokenized {} records under {} tags ({} lines without delimiter)",
        groups.len(),
        groups.tags().len(),
        dropped
    );

    groups
}

/// Split one trimmed line into its tag and fields.
///
/// Returns `None` when the line holds no delimiter.
fn split_record(line: &str) -> Option<(&str, Vec<String>)> {
    let (tag, rest) = line.split_once(FIELD_DELIMITER)?;
    let fields = rest.split(FIELD_DELIMITER).map(str::to_string).collect();
    Some((tag, fields))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fields(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_groups_by_tag_in_file_order() {
        let groups = tokenize("PA1*A1*150\nPA2*1*150*0*0\nPA1*A2*200\n");

        assert_eq!(groups.get("PA1"), &[fields(&["A1", "150"]), fields(&["A2", "200"])]);
        assert_eq!(groups.get("PA2"), &[fields(&["1", "150", "0", "0"])]);
    }

    #[test]
    fn test_blank_and_whitespace_lines_dropped() {
        let groups = tokenize("\n   \nID1*M001\n\t\n");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.get("ID1"), &[fields(&["M001"])]);
    }

    #[test]
    fn test_line_without_delimiter_dropped() {
        let groups = tokenize("DXS\nID1*M001\nGARBAGE LINE\n");
        assert_eq!(groups.tags(), vec!["ID1"]);
    }

    #[test]
    fn test_crlf_line_endings_trimmed() {
        let groups = tokenize("ID1*M001\r\nVA1*5000*20*0*0\r\n");
        assert_eq!(groups.get("ID1"), &[fields(&["M001"])]);
        assert_eq!(groups.get("VA1")[0][3], "0");
    }

    #[test]
    fn test_empty_fields_preserved() {
        let groups = tokenize("PA5***\nID1*");
        assert_eq!(groups.get("PA5"), &[fields(&["", "", ""])]);
        assert_eq!(groups.get("ID1"), &[fields(&[""])]);
    }

    #[test]
    fn test_tags_and_inner_fields_verbatim() {
        let groups = tokenize("pa1* A1 *150");
        assert!(groups.get("PA1").is_empty());
        assert_eq!(groups.get("pa1"), &[fields(&[" A1 ", "150"])]);
    }

    #[test]
    fn test_unconsumed_tags_still_grouped() {
        let groups = tokenize("DXS*RST7654321*VA*V0/6*1\nEA2*EGS*0*0\nG85*A1B2");
        assert_eq!(groups.tags(), vec!["DXS", "EA2", "G85"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("\n\n  \r\n").is_empty());
    }

    #[test]
    fn test_tokenize_is_deterministic() {
        let text = "ID1*M001\nVA1*5000*20*0*0\nPA1*A1*150\nPA2*10*1500*5*500\nPA5*250101*0900";
        assert_eq!(tokenize(text), tokenize(text));
    }

    proptest! {
        #[test]
        fn prop_valid_lines_keep_field_and_occurrence_order(
            records in proptest::collection::vec(
                ("[A-Z]{2}[0-9]", proptest::collection::vec("[A-Za-z0-9]{0,6}", 1..6)),
                0..20,
            )
        ) {
            let text: String = records
                .iter()
                .map(|(tag, fs)| format!("{}*{}\n", tag, fs.join("*")))
                .collect();
            let groups = tokenize(&text);

            prop_assert_eq!(groups.len(), records.len());
            for (tag, _) in &records {
                let expected: Vec<Vec<String>> = records
                    .iter()
                    .filter(|(t, _)| t == tag)
                    .map(|(_, fs)| fs.clone())
                    .collect();
                prop_assert_eq!(groups.get(tag), expected.as_slice());
            }
        }
    }
}
