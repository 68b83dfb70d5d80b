//! Input list parsing
//!
//! The input list is a line-oriented text file of `collectionID,source`
//! records. Parsing a line never fails: short or empty lines yield empty
//! fields and the record fails later at the metadata fetch.

use crate::error::BatchError;
use std::path::Path;

const BOM: char = '\u{FEFF}';

/// One parsed input line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRecord {
    pub collection_id: String,
    pub source: String,
}

/// Parse one raw input line
pub fn parse_line(line: &str) -> InputRecord {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut fields = line.split(',');

    let collection_id = fields.next().unwrap_or_default();
    let source = fields.next().unwrap_or_default();

    InputRecord {
        collection_id: strip_bom(collection_id).to_string(),
        source: source.to_string(),
    }
}

/// Remove a leading byte-order mark
pub fn strip_bom(value: &str) -> &str {
    value.strip_prefix(BOM).unwrap_or(value)
}

/// Read the whole input list as raw lines
///
/// Bytes that are not valid UTF-8 become U+FFFD; only I/O failures are
/// errors. The empty tail after a final newline is not a record.
pub async fn read_input_lines(path: &Path) -> Result<Vec<String>, BatchError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| BatchError::BadInput(format!("{}: {}", path.display(), e)))?;
    let content = String::from_utf8_lossy(&bytes);

    let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();
    if lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bom_stripped_from_identifier() {
        let record = parse_line("\u{FEFF}12345,MuseumX");
        assert_eq!(record.collection_id, "12345");
        assert_eq!(record.source, "MuseumX");
    }

    #[test]
    fn test_extra_fields_ignored() {
        let record = parse_line("SK-A-1505,Rijksmuseum,extra,fields");
        assert_eq!(
            record,
            InputRecord {
                collection_id: "SK-A-1505".to_string(),
                source: "Rijksmuseum".to_string(),
            }
        );
    }

    #[test]
    fn test_short_and_empty_lines() {
        assert_eq!(parse_line(""), InputRecord::default());

        let record = parse_line("SK-A-1505");
        assert_eq!(record.collection_id, "SK-A-1505");
        assert_eq!(record.source, "");
    }

    #[test]
    fn test_crlf_line_ending() {
        let record = parse_line("SK-A-1505,Rijksmuseum\r");
        assert_eq!(record.source, "Rijksmuseum");
    }

    #[test]
    fn test_bom_only_stripped_at_start() {
        assert_eq!(strip_bom("12\u{FEFF}3"), "12\u{FEFF}3");
        assert_eq!(strip_bom("\u{FEFF}"), "");
    }

    #[tokio::test]
    async fn test_read_input_lines_drops_trailing_empty_line() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "A,src\n\nB,src\n").unwrap();

        let lines = read_input_lines(&path).await.unwrap();
        assert_eq!(lines, vec!["A,src", "", "B,src"]);
    }

    #[tokio::test]
    async fn test_read_input_lines_replaces_invalid_utf8() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, b"SK-A-1,Mus\xe9e\nSK-A-2,src\n").unwrap();

        let lines = read_input_lines(&path).await.unwrap();
        assert_eq!(lines, vec!["SK-A-1,Mus\u{FFFD}e", "SK-A-2,src"]);
        assert_eq!(parse_line(&lines[0]).collection_id, "SK-A-1");
    }

    #[tokio::test]
    async fn test_read_input_lines_missing_file_is_bad_input() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = read_input_lines(&dir.path().join("missing.csv")).await.unwrap_err();
        assert!(matches!(err, BatchError::BadInput(_)));
    }
}
