//! CSV reading and writing with encoding and delimiter auto-detection.
//!
//! Census downloads are usually ISO-8859-1 or Windows-1252, rosters are
//! usually UTF-8. Input is decoded to a `String` first, then handed to
//! the `csv` crate. Output is always UTF-8, comma-delimited, `\n`
//! terminated, and written in one shot.

use serde::de::DeserializeOwned;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::Table;

/// Decoded file content plus what was detected about it
#[derive(Debug, Clone)]
pub struct DecodedCsv {
    /// UTF-8 content, BOM stripped
    pub content: String,
    /// Detected encoding
    pub encoding: String,
    /// Detected delimiter
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the given encoding
///
/// Valid UTF-8 is taken as is whatever chardet guessed. Otherwise the
/// detected single-byte encoding is used, defaulting to Windows-1252.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    if let Ok(s) = std::str::from_utf8(bytes) {
        return Ok(s.to_string());
    }

    let enc = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "utf-8-sig" | "ascii" | "iso-8859-1" | "latin-1" | "latin1"
        | "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252,
        other => encoding_rs::Encoding::for_label(other.as_bytes())
            .filter(|e| *e != encoding_rs::UTF_8)
            .unwrap_or(encoding_rs::WINDOWS_1252),
    };

    let (text, had_errors) = enc.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(CsvError::Encoding(enc.name().to_string()));
    }
    Ok(text.into_owned())
}

/// Detect the delimiter by counting occurrences in the header line
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

/// Read a file and decode it. A missing file is [`CsvError::NotFound`].
pub fn read_file(path: &Path) -> CsvResult<DecodedCsv> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CsvError::NotFound(path.to_path_buf()),
        _ => CsvError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    decode_bytes(&bytes)
}

/// Decode raw bytes with auto-detected encoding and delimiter.
pub fn decode_bytes(bytes: &[u8]) -> CsvResult<DecodedCsv> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }
    let delimiter = detect_delimiter(&content);

    Ok(DecodedCsv {
        content,
        encoding,
        delimiter,
    })
}

fn reader(content: &str, delimiter: char, trim: csv::Trim) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .trim(trim)
        .from_reader(content.as_bytes())
}

/// Parse CSV text into a string table. Cells are kept verbatim.
pub fn parse_table(content: &str, delimiter: char) -> CsvResult<Table> {
    let mut rdr = reader(content, delimiter, csv::Trim::Headers);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(CsvError::EmptyFile);
    }

    let mut table = Table::new(headers);
    for result in rdr.records() {
        let record = result?;
        table.rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(table)
}

/// Parse CSV text into typed records, matching fields by header name.
pub fn parse_records<T: DeserializeOwned>(content: &str, delimiter: char) -> CsvResult<Vec<T>> {
    let mut rdr = reader(content, delimiter, csv::Trim::All);
    rdr.deserialize().map(|r| r.map_err(CsvError::from)).collect()
}

/// Read a CSV file into a string table.
pub fn read_table(path: &Path) -> CsvResult<Table> {
    let decoded = read_file(path)?;
    parse_table(&decoded.content, decoded.delimiter)
}

/// Read a CSV file into typed records.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> CsvResult<Vec<T>> {
    let decoded = read_file(path)?;
    parse_records(&decoded.content, decoded.delimiter)
}

/// Serialize a table to UTF-8 CSV bytes.
pub fn table_to_bytes(table: &Table) -> CsvResult<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }

    wtr.into_inner().map_err(|e| CsvError::Parse {
        line: 0,
        message: e.into_error().to_string(),
    })
}

/// Write a table to `path`, replacing any existing file.
///
/// The whole file is rendered in memory before anything touches disk.
pub fn write_table(path: &Path, table: &Table) -> CsvResult<()> {
    let bytes = table_to_bytes(table)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CsvError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, bytes).map_err(|e| CsvError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_simple_table() {
        let table = parse_table("name,cd\nAlice,Texas - 1st\nBob,Ohio - 3rd", ',').unwrap();

        assert_eq!(table.headers, vec!["name", "cd"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1], vec!["Bob", "Ohio - 3rd"]);
    }

    #[test]
    fn test_quoted_values_with_commas() {
        let csv = "GEONAME,GEOID\n\"Congressional District 1, Alabama\",5001800US0101\n";
        let table = parse_table(csv, ',').unwrap();

        assert_eq!(table.rows[0][0], "Congressional District 1, Alabama");
    }

    #[test]
    fn test_headers_trimmed_cells_kept() {
        let table = parse_table(" a , b \n x ,y", ',').unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows[0][0], " x ");
    }

    #[test]
    fn test_ragged_row_is_an_error() {
        let result = parse_table("a,b\n1,2,3", ',');
        assert!(matches!(result, Err(CsvError::Parse { .. })));
    }

    #[test]
    fn test_typed_records_ignore_extra_columns() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(rename = "GEOID")]
            geoid: String,
            #[serde(rename = "TOT_EST")]
            total: Option<f64>,
        }

        let csv = "GEOID,LNTITLE,TOT_EST\nA,Total,10\nB,Total,\n";
        let rows: Vec<Row> = parse_records(csv, ',').unwrap();

        assert_eq!(rows[0].geoid, "A");
        assert_eq!(rows[0].total, Some(10.0));
        assert_eq!(rows[1].total, None);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
        assert_eq!(detect_delimiter("a|b|c"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_latin1_decoding() {
        // "Doña Ana" in ISO-8859-1
        let bytes: &[u8] = b"Do\xF1a Ana";
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Doña Ana");
    }

    #[test]
    fn test_invalid_utf8_falls_back() {
        let decoded = decode_content(b"Do\xF1a", "utf-8").unwrap();
        assert_eq!(decoded, "Doña");
    }

    #[test]
    fn test_bom_stripped() {
        let decoded = decode_bytes(b"\xEF\xBB\xBFGEOID,cd\nx,y\n").unwrap();
        assert!(decoded.content.starts_with("GEOID"));
    }

    #[test]
    fn test_empty_content() {
        assert!(matches!(decode_bytes(b"  \n"), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_table(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(CsvError::NotFound(_))));
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "stale,content,that,is,longer\n1,2,3,4,5\n").unwrap();

        let mut table = Table::new(vec!["a".into(), "b".into()]);
        table.rows.push(vec!["1".into(), "x, y".into()]);
        write_table(&path, &table).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n1,\"x, y\"\n");
        assert_eq!(read_table(&path).unwrap(), table);
    }

    #[test]
    fn test_write_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        write_table(&path, &Table::new(vec!["a".into()])).unwrap();
        assert!(path.exists());
    }
}
