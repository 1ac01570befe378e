//! Input loading for spreadsheets and delimited text.
//!
//! Files are dispatched on extension. Spreadsheets go through `calamine`,
//! delimited text through the `csv` crate. Both paths end in the same raw
//! grid so header repair, missing-value tokens and numeric inference behave
//! identically regardless of the source format.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use calamine::{Data, Reader, open_workbook_auto};
use csv::ReaderBuilder;

use crate::error::ProfileError;
use crate::models::{CellValue, Column, Table, format_number};
use crate::Result;

/// Delimiters tried, in order, when auto-detecting.
pub const AUTO_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Tokens read as missing values.
pub const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "NaN", "nan", "NULL", "null", "None", "#N/A", "-NaN", "<NA>",
];

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];
const DELIMITED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// How the field delimiter of a text file is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelimiterMode {
    /// Try [`AUTO_DELIMITERS`] in order
    #[default]
    Auto,
    /// Use this byte
    Fixed(u8),
}

impl FromStr for DelimiterMode {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(Self::Auto),
            "\\t" | "tab" | "\t" => Ok(Self::Fixed(b'\t')),
            other => match other.as_bytes() {
                [byte] if byte.is_ascii() => Ok(Self::Fixed(*byte)),
                _ => Err(ProfileError::configuration(format!(
                    "Invalid separator '{other}': use auto, a single character, or \\t"
                ))),
            },
        }
    }
}

impl fmt::Display for DelimiterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(b'\t') => f.write_str("\\t"),
            Self::Fixed(b) => write!(f, "{}", char::from(*b)),
        }
    }
}

/// Worksheet selection for spreadsheet inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    /// Zero-based sheet position
    Index(usize),
    /// Sheet name
    Name(String),
}

impl FromStr for SheetSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(s.parse::<usize>()
            .map_or_else(|_| Self::Name(s.to_string()), Self::Index))
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Input format, decided from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Excel or OpenDocument workbook
    Spreadsheet,
    /// Delimited text
    Delimited,
}

impl InputFormat {
    /// Classifies a path by its extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
            Ok(Self::Spreadsheet)
        } else if DELIMITED_EXTENSIONS.contains(&extension.as_str()) {
            Ok(Self::Delimited)
        } else {
            Err(ProfileError::unsupported_format(path))
        }
    }
}

/// Loads a table from a spreadsheet or delimited text file.
///
/// `delimiter` applies to text inputs and `sheet` to spreadsheets; each is
/// ignored for the other format.
pub fn load_table(
    path: &Path,
    delimiter: DelimiterMode,
    sheet: Option<&SheetSelector>,
) -> Result<Table> {
    if !path.exists() {
        return Err(ProfileError::input_not_found(path));
    }

    let grid = match InputFormat::from_path(path)? {
        InputFormat::Spreadsheet => read_spreadsheet(path, sheet)?,
        InputFormat::Delimited => {
            let bytes = std::fs::read(path)
                .map_err(|e| ProfileError::io(format!("reading {}", path.display()), e))?;
            read_delimited(&decode(&bytes), delimiter)?
        }
    };

    let table = grid.into_table()?;
    tracing::info!(
        "Loaded {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

/// Decodes bytes as UTF-8, replacing invalid sequences and dropping a BOM.
fn decode(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(text.as_ref()).to_string()
}

/// Parses delimited text held in memory.
pub fn parse_delimited(text: &str, delimiter: DelimiterMode) -> Result<Table> {
    read_delimited(text, delimiter)?.into_table()
}

fn read_delimited(text: &str, delimiter: DelimiterMode) -> Result<RawGrid> {
    match delimiter {
        DelimiterMode::Fixed(byte) => read_with_delimiter(text, byte),
        DelimiterMode::Auto => {
            for candidate in AUTO_DELIMITERS {
                match read_with_delimiter(text, candidate) {
                    Ok(grid) if grid.headers.len() > 1 => {
                        tracing::debug!(
                            "Detected delimiter {:?}",
                            char::from(candidate)
                        );
                        return Ok(grid);
                    }
                    Ok(_) => {
                        tracing::debug!(
                            "Delimiter {:?} yields a single column",
                            char::from(candidate)
                        );
                    }
                    Err(e) => {
                        tracing::debug!("Delimiter {:?} failed: {}", char::from(candidate), e);
                    }
                }
            }
            tracing::debug!("No delimiter split the header; falling back to ','");
            read_with_delimiter(text, b',')
        }
    }
}

/// Reads records with one delimiter.
///
/// Short records are padded with missing values; records longer than the
/// header are a parse error.
fn read_with_delimiter(text: &str, delimiter: u8) -> Result<RawGrid> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() > headers.len() {
            return Err(ProfileError::parse_failed(
                format!("record {}", index + 1),
                FieldCountError {
                    expected: headers.len(),
                    found: record.len(),
                },
            ));
        }
        rows.push(record.iter().map(RawCell::from_token).collect());
    }

    Ok(RawGrid { headers, rows })
}

/// A record with more fields than the header.
#[derive(Debug)]
struct FieldCountError {
    expected: usize,
    found: usize,
}

impl fmt::Display for FieldCountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {} fields, saw {}", self.expected, self.found)
    }
}

impl std::error::Error for FieldCountError {}

fn read_spreadsheet(path: &Path, sheet: Option<&SheetSelector>) -> Result<RawGrid> {
    let context = || format!("opening workbook {}", path.display());
    let mut workbook = open_workbook_auto(path).map_err(|e| ProfileError::parse_failed(context(), e))?;

    let names = workbook.sheet_names();
    let name = match sheet {
        None => names.first().cloned(),
        Some(SheetSelector::Index(i)) => names.get(*i).cloned(),
        Some(SheetSelector::Name(n)) => names.iter().find(|s| *s == n).cloned(),
    }
    .ok_or_else(|| {
        ProfileError::configuration(format!(
            "Sheet '{}' not found in {} (available: {})",
            sheet.map_or_else(|| "0".to_string(), ToString::to_string),
            path.display(),
            names.join(", ")
        ))
    })?;

    tracing::debug!("Reading sheet '{}'", name);
    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| ProfileError::parse_failed(format!("reading sheet '{name}'"), e))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|row| row.iter().map(header_text).collect())
        .unwrap_or_default();
    let rows = rows
        .map(|row| row.iter().map(RawCell::from_data).collect())
        .collect();

    Ok(RawGrid { headers, rows })
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format_number(*f),
        other => other.to_string(),
    }
}

/// A cell before per-column type inference.
#[derive(Debug, Clone, PartialEq)]
enum RawCell {
    Number(f64),
    /// Delimited-text token, read as a number when it parses as one
    Text(String),
    /// Typed spreadsheet text, never coerced
    Literal(String),
    Null,
}

impl RawCell {
    fn from_token(token: &str) -> Self {
        if NA_TOKENS.contains(&token) {
            Self::Null
        } else {
            Self::Text(token.to_string())
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn from_data(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => Self::Null,
            Data::Int(i) => Self::Number(*i as f64),
            Data::Float(f) if f.is_finite() => Self::Number(*f),
            Data::Float(_) => Self::Null,
            Data::Bool(b) => Self::Literal(if *b { "True" } else { "False" }.to_string()),
            Data::String(s) if NA_TOKENS.contains(&s.as_str()) => Self::Null,
            Data::String(s) => Self::Literal(s.clone()),
            other => Self::Literal(other.to_string()),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Self::Literal(_) | Self::Null => None,
        }
    }
}

/// Header row plus records, not yet typed.
struct RawGrid {
    headers: Vec<String>,
    rows: Vec<Vec<RawCell>>,
}

impl RawGrid {
    fn into_table(self) -> Result<Table> {
        let headers = repair_headers(&self.headers);
        let width = headers.len();

        let mut cells: Vec<Vec<RawCell>> = vec![Vec::with_capacity(self.rows.len()); width];
        for mut row in self.rows {
            row.resize(width, RawCell::Null);
            for (column, cell) in cells.iter_mut().zip(row) {
                column.push(cell);
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| build_column(name, raw))
            .collect();
        Table::new(columns)
    }
}

/// Types a column: numeric when every present cell reads as a number,
/// otherwise text with the original tokens.
fn build_column(name: String, raw: Vec<RawCell>) -> Column {
    let numbers: Option<Vec<CellValue>> = raw
        .iter()
        .map(|cell| match cell {
            RawCell::Null => Some(CellValue::Null),
            other => other.as_number().map(CellValue::Number),
        })
        .collect();

    let values = numbers.unwrap_or_else(|| {
        raw.into_iter()
            .map(|cell| match cell {
                RawCell::Number(n) => CellValue::Text(format_number(n)),
                RawCell::Text(s) | RawCell::Literal(s) => CellValue::Text(s),
                RawCell::Null => CellValue::Null,
            })
            .collect()
    });

    Column::new(name, values)
}

/// Names blank headers `Unnamed: i` and suffixes repeats with `.1`, `.2`.
fn repair_headers(raw: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(raw.len());
    raw.iter()
        .enumerate()
        .map(|(i, header)| {
            let base = if header.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                header.clone()
            };
            let mut name = base.clone();
            let mut suffix = 1_usize;
            while used.contains(&name) {
                name = format!("{base}.{suffix}");
                suffix += 1;
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnKind;

    #[test]
    fn test_delimiter_mode_parsing() {
        assert_eq!("auto".parse::<DelimiterMode>().unwrap(), DelimiterMode::Auto);
        assert_eq!(";".parse::<DelimiterMode>().unwrap(), DelimiterMode::Fixed(b';'));
        assert_eq!("\\t".parse::<DelimiterMode>().unwrap(), DelimiterMode::Fixed(b'\t'));
        assert_eq!("tab".parse::<DelimiterMode>().unwrap(), DelimiterMode::Fixed(b'\t'));
        assert!(";;".parse::<DelimiterMode>().is_err());
        assert!("ñ".parse::<DelimiterMode>().is_err());
        assert_eq!(DelimiterMode::Fixed(b'\t').to_string(), "\\t");
    }

    #[test]
    fn test_sheet_selector_parsing() {
        assert_eq!("2".parse::<SheetSelector>().unwrap(), SheetSelector::Index(2));
        assert_eq!(
            "BD".parse::<SheetSelector>().unwrap(),
            SheetSelector::Name("BD".to_string())
        );
    }

    #[test]
    fn test_input_format_from_extension() {
        assert_eq!(
            InputFormat::from_path(Path::new("a/BASE.XLSX")).unwrap(),
            InputFormat::Spreadsheet
        );
        assert_eq!(
            InputFormat::from_path(Path::new("base.csv")).unwrap(),
            InputFormat::Delimited
        );
        assert!(matches!(
            InputFormat::from_path(Path::new("base.parquet")),
            Err(ProfileError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_auto_detects_semicolon() {
        let table = parse_delimited("A;B\n1;x\n2;y\n", DelimiterMode::Auto).unwrap();
        assert_eq!(table.column_names(), vec!["A", "B"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_auto_prefers_comma_when_it_splits() {
        // comma is tried first and yields two columns
        let table = parse_delimited("A,B;C\n1,2;3\n", DelimiterMode::Auto).unwrap();
        assert_eq!(table.column_names(), vec!["A", "B;C"]);
    }

    #[test]
    fn test_auto_single_column_falls_back_to_comma() {
        let table = parse_delimited("SOLO\nuno\ndos\n", DelimiterMode::Auto).unwrap();
        assert_eq!(table.column_names(), vec!["SOLO"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_na_tokens_and_numeric_inference() {
        let table =
            parse_delimited("EDAD,ZONA\n10,rural\nNA,\n12.5,N/A\n", DelimiterMode::Auto).unwrap();

        let edad = table.column("EDAD").unwrap();
        assert_eq!(edad.kind(), ColumnKind::Float);
        assert_eq!(
            edad.values(),
            &[CellValue::Number(10.0), CellValue::Null, CellValue::Number(12.5)]
        );

        let zona = table.column("ZONA").unwrap();
        assert_eq!(zona.kind(), ColumnKind::Text);
        assert_eq!(zona.null_count(), 2);
    }

    #[test]
    fn test_mixed_column_keeps_original_tokens() {
        let table = parse_delimited("COD,X\n007,a\nabc,b\n", DelimiterMode::Auto).unwrap();
        let cod = table.column("COD").unwrap();
        assert_eq!(cod.kind(), ColumnKind::Text);
        assert_eq!(cod.values()[0], CellValue::Text("007".to_string()));
    }

    #[test]
    fn test_spreadsheet_text_is_not_coerced() {
        let raw = [
            Data::String("007".into()),
            Data::String("12".into()),
            Data::String("NA".into()),
        ]
        .iter()
        .map(RawCell::from_data)
        .collect();
        let cod = build_column("COD".to_string(), raw);
        assert_eq!(cod.kind(), ColumnKind::Text);
        assert_eq!(
            cod.values(),
            &[
                CellValue::Text("007".into()),
                CellValue::Text("12".into()),
                CellValue::Null
            ]
        );

        let raw = [Data::Int(7), Data::Float(1.5), Data::Empty]
            .iter()
            .map(RawCell::from_data)
            .collect();
        assert_eq!(build_column("N".to_string(), raw).kind(), ColumnKind::Float);
    }

    #[test]
    fn test_header_repair() {
        let table = parse_delimited("A,,A,A\n1,2,3,4\n", DelimiterMode::Auto).unwrap();
        assert_eq!(table.column_names(), vec!["A", "Unnamed: 1", "A.1", "A.2"]);
    }

    #[test]
    fn test_short_records_padded() {
        let table = parse_delimited("A,B,C\n1,2\n", DelimiterMode::Fixed(b',')).unwrap();
        assert!(table.column("C").unwrap().values()[0].is_null());
    }

    #[test]
    fn test_long_records_rejected() {
        let result = parse_delimited("A,B\n1,2,3\n", DelimiterMode::Fixed(b','));
        assert!(matches!(result, Err(ProfileError::Parse { .. })));
    }

    #[test]
    fn test_decode_strips_bom_and_replaces_invalid() {
        assert_eq!(decode(b"\xEF\xBB\xBFA,B"), "A,B");
        assert_eq!(decode(b"caf\xE9"), "caf\u{FFFD}");
    }

    #[test]
    fn test_missing_file() {
        let result = load_table(
            Path::new("/nonexistent/base.csv"),
            DelimiterMode::Auto,
            None,
        );
        assert!(matches!(result, Err(ProfileError::InputNotFound { .. })));
    }
}
