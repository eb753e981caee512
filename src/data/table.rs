//! Keyed CSV tables
//!
//! Reads a delimited reference file with a header row into a table keyed by
//! its first column. Numeric columns are coerced to `f64`, everything else is
//! kept as text. Bytes are decoded as UTF-8 first and EUC-KR second, since the
//! regional tables are often exported from Korean spreadsheet tools.

use crate::error::SourceError;
use polars::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A single cell of a reference row
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    /// Numeric value, parsing text cells that hold a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Text(s) => s.trim().parse().ok(),
            CellValue::Missing => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

/// Column name → cell, for every column except the key
pub type Record = FxHashMap<String, CellValue>;

/// Encoding a source was successfully decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceEncoding {
    Utf8,
    EucKr,
}

/// Reference table keyed by its first column, rows kept in file order
#[derive(Debug, Clone, Default)]
pub struct KeyedTable {
    key_column: String,
    columns: Vec<String>,
    keys: Vec<String>,
    rows: FxHashMap<String, Record>,
}

impl KeyedTable {
    pub fn get(&self, key: &str) -> Option<&Record> {
        self.rows.get(key)
    }

    /// Rows in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.keys
            .iter()
            .filter_map(|k| self.rows.get(k).map(|r| (k.as_str(), r)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.as_str())
    }

    /// Header of the key column
    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    /// Non-key column headers
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn from_dataframe(df: &DataFrame) -> Result<Self, SourceError> {
        let parse_err = |e: PolarsError| SourceError::Parse(e.to_string());

        let Some((key_col, value_cols)) = df.get_columns().split_first() else {
            return Err(SourceError::Schema("<key>".to_string()));
        };

        let key_series = key_col.cast(&DataType::String).map_err(parse_err)?;
        let key_values = key_series.str().map_err(parse_err)?;

        let mut values = Vec::with_capacity(value_cols.len());
        for column in value_cols {
            values.push((column.name().as_str().trim().to_string(), ColumnValues::from_column(column)?));
        }

        let mut table = KeyedTable {
            key_column: key_col.name().as_str().trim().to_string(),
            columns: values.iter().map(|(name, _)| name.clone()).collect(),
            ..Default::default()
        };

        for idx in 0..df.height() {
            let Some(key) = key_values.get(idx).map(str::trim).filter(|k| !k.is_empty()) else {
                continue;
            };

            if table.rows.contains_key(key) {
                tracing::warn!("Duplicate reference key '{}' ignored (keeping first row)", key);
                continue;
            }

            let record: Record = values
                .iter()
                .map(|(name, column)| (name.clone(), column.cell(idx)))
                .collect();

            table.keys.push(key.to_string());
            table.rows.insert(key.to_string(), record);
        }

        Ok(table)
    }
}

/// Materialized column, numeric or text
enum ColumnValues {
    Numbers(Float64Chunked),
    Texts(StringChunked),
}

impl ColumnValues {
    fn from_column(column: &Column) -> Result<Self, SourceError> {
        let parse_err = |e: PolarsError| SourceError::Parse(e.to_string());

        if is_numeric(column.dtype()) {
            let cast = column.cast(&DataType::Float64).map_err(parse_err)?;
            Ok(ColumnValues::Numbers(cast.f64().map_err(parse_err)?.clone()))
        } else {
            let cast = column.cast(&DataType::String).map_err(parse_err)?;
            Ok(ColumnValues::Texts(cast.str().map_err(parse_err)?.clone()))
        }
    }

    fn cell(&self, idx: usize) -> CellValue {
        match self {
            ColumnValues::Numbers(c) => c.get(idx).map_or(CellValue::Missing, CellValue::Number),
            ColumnValues::Texts(c) => match c.get(idx).map(str::trim) {
                Some(s) if !s.is_empty() => CellValue::Text(s.to_string()),
                _ => CellValue::Missing,
            },
        }
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Decode raw bytes: UTF-8 (BOM stripped) first, EUC-KR second
pub fn decode_source(bytes: &[u8]) -> Result<(Cow<'_, str>, SourceEncoding), SourceError> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return Ok((Cow::Borrowed(text), SourceEncoding::Utf8));
    }

    encoding_rs::EUC_KR
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| (text, SourceEncoding::EucKr))
        .ok_or(SourceError::Decode)
}

/// Parse an in-memory reference table
pub fn parse_table_bytes(bytes: &[u8]) -> Result<(KeyedTable, SourceEncoding), SourceError> {
    let (text, encoding) = decode_source(bytes)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(text.into_owned().into_bytes()))
        .finish()
        .map_err(|e| SourceError::Parse(e.to_string()))?;

    Ok((KeyedTable::from_dataframe(&df)?, encoding))
}

/// Load a reference table, reporting why it failed
pub fn try_load_table(path: &Path) -> Result<(KeyedTable, SourceEncoding), SourceError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SourceError::Missing(path.to_path_buf()),
        _ => SourceError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    parse_table_bytes(&bytes)
}

/// Load a reference table keyed by its first column
///
/// Never fails: an absent or unparseable source is logged and yields an
/// empty table so callers can show a "no data" state.
pub fn load_reference_data(path: impl AsRef<Path>) -> KeyedTable {
    let path = path.as_ref();
    match try_load_table(path) {
        Ok((table, encoding)) => {
            tracing::debug!(
                "Loaded {} rows from {} ({:?})",
                table.len(),
                path.display(),
                encoding
            );
            table
        }
        Err(e) => {
            tracing::warn!("Reference source unavailable, using empty table: {}", e);
            KeyedTable::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const REGIONS_CSV: &str = "region,lat,lon,temp,soil_ph,rain\n\
        제주 서귀포,33.25,126.56,16.6,6.5,1800\n\
        전남 해남,34.57,126.59,14.2,,1400\n";

    #[test]
    fn test_keys_by_first_column_in_file_order() {
        let (table, encoding) = parse_table_bytes(REGIONS_CSV.as_bytes()).unwrap();

        assert_eq!(encoding, SourceEncoding::Utf8);
        assert_eq!(table.key_column(), "region");
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["제주 서귀포", "전남 해남"]);
        assert_eq!(table.columns(), &["lat", "lon", "temp", "soil_ph", "rain"]);
    }

    #[test]
    fn test_integer_columns_coerced_to_f64() {
        let (table, _) = parse_table_bytes(REGIONS_CSV.as_bytes()).unwrap();
        let row = table.get("제주 서귀포").unwrap();

        assert_eq!(row["rain"], CellValue::Number(1800.0));
        assert_relative_eq!(row["temp"].as_f64().unwrap(), 16.6, epsilon = 1e-9);
        assert!(table.get("전남 해남").unwrap()["soil_ph"].is_missing());
    }

    #[test]
    fn test_euc_kr_bytes_decode_to_same_table() {
        let (encoded, _, had_errors) = encoding_rs::EUC_KR.encode(REGIONS_CSV);
        assert!(!had_errors);
        assert!(std::str::from_utf8(&encoded).is_err());

        let (legacy, encoding) = parse_table_bytes(&encoded).unwrap();
        let (utf8, _) = parse_table_bytes(REGIONS_CSV.as_bytes()).unwrap();

        assert_eq!(encoding, SourceEncoding::EucKr);
        assert_eq!(legacy.keys().collect::<Vec<_>>(), utf8.keys().collect::<Vec<_>>());
        assert_eq!(legacy.get("전남 해남"), utf8.get("전남 해남"));
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(REGIONS_CSV.as_bytes());

        let (table, _) = parse_table_bytes(&bytes).unwrap();
        assert_eq!(table.key_column(), "region");
    }

    #[test]
    fn test_duplicate_keys_keep_first_row() {
        let csv = "crop,temp_min\nmango,20\nmango,99\n";
        let (table, _) = parse_table_bytes(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("mango").unwrap()["temp_min"], CellValue::Number(20.0));
    }

    #[test]
    fn test_missing_file_degrades_to_empty_table() {
        let path = Path::new("definitely/not/here.csv");
        assert!(matches!(try_load_table(path), Err(SourceError::Missing(_))));
        assert!(load_reference_data(path).is_empty());
    }

    #[test]
    fn test_undecodable_bytes_rejected() {
        // 0xFF is invalid as a lead byte in both encodings
        let bytes = [b'a', b',', b'b', b'\n', 0xFF, 0xFF, b',', b'1', b'\n'];
        assert!(matches!(parse_table_bytes(&bytes), Err(SourceError::Decode)));
    }
}
