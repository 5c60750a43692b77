//! CSV reader with encoding and delimiter auto-detection.
//!
//! Turns a file's raw bytes into [`Row`]s keyed by the header line. Cells
//! and headers are trimmed, quoted fields may contain delimiters and
//! newlines, and blank lines are skipped. Nothing Strapi-specific here.

use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::error::{CsvError, CsvResult};
use crate::models::Row;

/// Parsed file with the settings that were used to read it.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub rows: Vec<Row>,
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is always UTF-8; chardet is only asked about other bytes.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string. Unknown encodings fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

/// Pick the delimiter that occurs most often in the header line.
///
/// Comma wins ties and is the answer for single-column files.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse delimited text with an explicit delimiter.
pub fn parse_str(content: &str, delimiter: char) -> CsvResult<Vec<Row>> {
    parse_with_headers(content, delimiter).map(|(_, rows)| rows)
}

fn parse_with_headers(content: &str, delimiter: char) -> CsvResult<(Vec<String>, Vec<Row>)> {
    let delimiter = u8::try_from(delimiter).map_err(|_| CsvError::ParseError {
        line: 0,
        message: format!("delimiter '{}' is not a single byte", delimiter),
    })?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(String::is_empty) {
        return Err(CsvError::NoHeaders);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;

        if record.len() <= 1 && record.get(0).map_or(true, str::is_empty) {
            continue;
        }

        // Short lines read as empty cells, extra cells are dropped.
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }

    Ok((headers, rows))
}

/// Parse raw bytes, detecting encoding and delimiter.
pub fn parse_bytes(bytes: &[u8]) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);

    if content.trim().is_empty() {
        return Ok(ParseResult {
            rows: Vec::new(),
            encoding,
            delimiter: ',',
            headers: Vec::new(),
        });
    }

    let delimiter = detect_delimiter(&content);
    let (headers, rows) = parse_with_headers(&content, delimiter)?;

    Ok(ParseResult {
        rows,
        encoding,
        delimiter,
        headers,
    })
}

/// Read and parse a file eagerly.
pub fn parse_file<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let rows = parse_str("Slug,Title\njane-doe,Jane Doe\njohn,John", ',').unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Slug"), Some("jane-doe"));
        assert_eq!(rows[0].get("Title"), Some("Jane Doe"));
        assert_eq!(rows[1].get("Slug"), Some("john"));
    }

    #[test]
    fn test_quoted_values_keep_delimiters_and_newlines() {
        let csv = "Slug,Content\nhello,\"<p>One, two</p>\n<p>three</p>\"";
        let rows = parse_str(csv, ',').unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Content"), Some("<p>One, two</p>\n<p>three</p>"));
    }

    #[test]
    fn test_cells_and_headers_trimmed() {
        let rows = parse_str(" Slug , Title \n  a  ,  b ", ',').unwrap();
        assert_eq!(rows[0].get("Slug"), Some("a"));
        assert_eq!(rows[0].get("Title"), Some("b"));
    }

    #[test]
    fn test_empty_lines_skipped() {
        let rows = parse_str("a,b\n1,2\n\n3,4\n", ',').unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_missing_values_are_empty_strings() {
        let rows = parse_str("a,b,c\n1,,3\n4", ',').unwrap();

        assert_eq!(rows[0].get("b"), Some(""));
        assert_eq!(rows[1].get("a"), Some("4"));
        assert_eq!(rows[1].get("c"), Some(""));
    }

    #[test]
    fn test_extra_columns_ignored() {
        let rows = parse_str("a,b\n1,2,3,4", ',').unwrap();
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0].get("b"), Some("2"));
    }

    #[test]
    fn test_header_typo_preserved() {
        let rows = parse_str("Slug,Categry\npost,News", ',').unwrap();
        assert_eq!(rows[0].get("Categry"), Some("News"));
        assert_eq!(rows[0].get("Category"), None);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("single\nvalue"), ',');
    }

    #[test]
    fn test_parse_bytes_strips_bom() {
        let bytes = "\u{feff}Slug,Title\nhello,Hello".as_bytes();
        let result = parse_bytes(bytes).unwrap();

        assert_eq!(result.headers, vec!["Slug", "Title"]);
        assert_eq!(result.rows[0].get("Slug"), Some("hello"));
    }

    #[test]
    fn test_parse_bytes_empty_file() {
        let result = parse_bytes(b"").unwrap();
        assert!(result.rows.is_empty());
    }

    #[test]
    fn test_header_only_file_has_no_rows() {
        let result = parse_bytes(b"Slug,Title\n").unwrap();
        assert!(result.rows.is_empty());
        assert_eq!(result.headers.len(), 2);
    }

    #[test]
    fn test_utf8_content_survives_detection() {
        let content = "<p>Hello world, this is a long ASCII paragraph about venture capital with one é</p>";
        let csv = format!("Slug,Content,Blurb\na,\"{}\",Europe — read more\n", content);

        let result = parse_bytes(csv.as_bytes()).unwrap();
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.rows[0].get("Content"), Some(content));
        assert_eq!(result.rows[0].get("Blurb"), Some("Europe — read more"));
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_detection() {
        // "Slug\nSociété" with Latin-1 accents
        let bytes: &[u8] = b"Slug\nSoci\xE9t\xE9\n";
        let result = parse_bytes(bytes).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert!(result.rows[0].get("Slug").unwrap().starts_with("Soci"));
    }

    #[test]
    fn test_quoted_cells_trimmed_at_edges() {
        let rows = parse_str("Slug,Content\na,\"  <p>x  y</p>  \"", ',').unwrap();
        assert_eq!(rows[0].get("Content"), Some("<p>x  y</p>"));
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Société");
    }
}
