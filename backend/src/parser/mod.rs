//! Delimited text reader and writer with encoding and delimiter detection.
//!
//! Reading turns the first line into dotted-path headers and every other
//! line into a [`FlatRow`]. Blank cells are dropped here, so downstream code
//! never sees present-but-empty fields. No schema logic lives here.

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::FlatRow;

/// Delimiters considered by [`detect_delimiter`], in tie-break order.
const SEPARATORS: [char; 4] = [',', ';', '\t', '|'];

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Data rows, header excluded
    pub rows: Vec<FlatRow>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Column headers
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        "" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let content = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match String::from_utf8(bytes.to_vec()) {
            Ok(s) => s,
            // Spreadsheet exports mislabelled as UTF-8 are almost always cp1252
            Err(_) => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        },
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        label => {
            let decoder = encoding_rs::Encoding::for_label(label.as_bytes()).ok_or_else(|| {
                CsvError::Encoding {
                    encoding: label.to_string(),
                }
            })?;
            decoder.decode(bytes).0.into_owned()
        }
    };

    Ok(content.trim_start_matches('\u{feff}').to_string())
}

/// Detect the delimiter by counting occurrences in the header line.
///
/// Defaults to `,` when no candidate appears.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &SEPARATORS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse delimited text with an explicit delimiter.
///
/// # Example
/// ```ignore
/// use csvdata::parser::parse_str;
///
/// let result = parse_str("id,address.city\nplace1,Montréal\nplace2,", ',').unwrap();
///
/// assert_eq!(result.rows.len(), 2);
/// assert_eq!(result.rows[0][1], ("address.city".to_string(), "Montréal".to_string()));
/// assert_eq!(result.rows[1].len(), 1); // blank cell dropped
/// ```
pub fn parse_str(content: &str, delimiter: char) -> CsvResult<ParseResult> {
    parse_with_metadata(content, delimiter, "utf-8".to_string())
}

/// Read a file with encoding and delimiter auto-detection.
pub fn read_rows<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

/// Read a file with a fixed delimiter (encoding still detected).
pub fn read_rows_with_delimiter<P: AsRef<Path>>(path: P, delimiter: char) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    let encoding = detect_encoding(&bytes);
    let content = decode_content(&bytes, &encoding)?;
    parse_with_metadata(&content, delimiter, encoding)
}

/// Parse bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);
    parse_with_metadata(&content, delimiter, encoding)
}

fn parse_with_metadata(content: &str, delimiter: char, encoding: String) -> CsvResult<ParseResult> {
    // No header line: a readable source with zero rows
    if content.trim().is_empty() {
        return Ok(ParseResult {
            rows: Vec::new(),
            encoding,
            delimiter,
            headers: Vec::new(),
        });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter_byte(delimiter)?)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CsvError::Parse {
            line: 1,
            message: e.to_string(),
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();

    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| CsvError::Parse {
            line: e.position().map(|p| p.line() as usize).unwrap_or(idx + 2),
            message: e.to_string(),
        })?;

        let row: FlatRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();

        rows.push(row);
    }

    Ok(ParseResult {
        rows,
        encoding,
        delimiter,
        headers,
    })
}

/// Serialize a header line plus rows, `\r\n`-terminated. Missing cells are
/// written empty.
pub fn write_rows(
    headers: &[String],
    rows: &[HashMap<String, String>],
    delimiter: char,
) -> CsvResult<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter_byte(delimiter)?)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer
        .write_record(headers)
        .map_err(|e| CsvError::Write(e.to_string()))?;

    for row in rows {
        let record = headers
            .iter()
            .map(|h| row.get(h).map(String::as_str).unwrap_or(""));
        writer
            .write_record(record)
            .map_err(|e| CsvError::Write(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CsvError::Write(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CsvError::Write(e.to_string()))
}

/// Write rows to a file.
pub fn write_rows_to<P: AsRef<Path>>(
    path: P,
    headers: &[String],
    rows: &[HashMap<String, String>],
    delimiter: char,
) -> CsvResult<()> {
    let content = write_rows(headers, rows, delimiter)?;
    std::fs::write(path.as_ref(), content)?;
    Ok(())
}

fn delimiter_byte(delimiter: char) -> CsvResult<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(CsvError::Parse {
            line: 0,
            message: format!("Delimiter '{}' is not a single-byte character", delimiter),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell<'a>(row: &'a FlatRow, key: &str) -> Option<&'a str> {
        row.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_simple_csv() {
        let result = parse_str("col1,col2,col3\nvalue1,value2,value3\nvalue4,value5,value6\n", ',').unwrap();

        assert_eq!(result.rows.len(), 2);
        assert_eq!(cell(&result.rows[0], "col1"), Some("value1"));
        assert_eq!(cell(&result.rows[0], "col3"), Some("value3"));
        assert_eq!(cell(&result.rows[1], "col2"), Some("value5"));
    }

    #[test]
    fn test_quoted_values_keep_delimiter() {
        let csv = "id,categoryTags\nevent1,\"music,concert\"\n";
        let result = parse_str(csv, ',').unwrap();

        assert_eq!(cell(&result.rows[0], "categoryTags"), Some("music,concert"));
    }

    #[test]
    fn test_blank_cells_dropped() {
        let result = parse_str("a,b,c\n1,,3\n4,   ,6\n", ',').unwrap();

        assert_eq!(result.rows[0].len(), 2);
        assert_eq!(cell(&result.rows[0], "b"), None);
        assert_eq!(cell(&result.rows[1], "b"), None);
        assert_eq!(cell(&result.rows[1], "c"), Some("6"));
    }

    #[test]
    fn test_values_not_trimmed() {
        let result = parse_str("a,b\n x ,y\n", ',').unwrap();
        assert_eq!(cell(&result.rows[0], "a"), Some(" x "));
    }

    #[test]
    fn test_short_and_long_rows() {
        let result = parse_str("a,b\n1\n1,2,3,4\n", ',').unwrap();

        assert_eq!(result.rows[0], vec![("a".to_string(), "1".to_string())]);
        assert_eq!(result.rows[1].len(), 2);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let result = parse_str("a;b\n1;2\n\n3;4\n", ';').unwrap();
        assert_eq!(result.rows.len(), 2);
    }

    #[test]
    fn test_header_only() {
        let result = parse_str("sourceId,id\n", ',').unwrap();
        assert!(result.rows.is_empty());
        assert_eq!(result.headers, vec!["sourceId", "id"]);
    }

    #[test]
    fn test_empty_source_has_no_rows() {
        for content in ["", "  \n\n"] {
            let result = parse_str(content, ',').unwrap();
            assert!(result.headers.is_empty());
            assert!(result.rows.is_empty());
        }
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_auto_parse_strips_bom() {
        let csv = "\u{feff}id;nameFr\nplace1;Salle\n";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.headers, vec!["id", "nameFr"]);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_latin1_currency_and_fractions() {
        let decoded = decode_content(&[0xA4, 0xBC, 0xBD, 0xBE], "iso-8859-1").unwrap();
        assert_eq!(decoded, "¤¼½¾");
    }

    #[test]
    fn test_unknown_encoding_label() {
        let err = decode_content(b"abc", "no-such-charset").unwrap_err();
        assert!(matches!(err, CsvError::Encoding { .. }));
    }

    #[test]
    fn test_read_rows_missing_file() {
        let err = read_rows("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, CsvError::Io(_)));
    }

    #[test]
    fn test_write_rows_quotes_delimiter() {
        let headers = vec!["id".to_string(), "categoryTags".to_string(), "nameFr".to_string()];
        let mut row = HashMap::new();
        row.insert("id".to_string(), "event123".to_string());
        row.insert("categoryTags".to_string(), "music,concert".to_string());

        let out = write_rows(&headers, &[row], ',').unwrap();
        assert_eq!(out, "id,categoryTags,nameFr\r\nevent123,\"music,concert\",\r\n");
    }
}
