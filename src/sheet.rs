// 📊 Sheet Readers - workbook / CSV → header + rows of typed cells
// One trait, one implementation per input format, picked by file extension

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

// ============================================================================
// CORE TYPES
// ============================================================================

/// A single spreadsheet cell, reduced to what the fee pipeline needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text rendering used for names and PANs.
    ///
    /// Whole numbers print without a trailing `.0` so numeric IDs survive.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

/// One sheet: header names plus data rows
#[derive(Debug, Clone)]
pub struct SheetTable {
    pub source: String,
    pub sheet: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetTable {
    /// Index of the first header matching any candidate (trimmed, case-insensitive)
    pub fn column(&self, candidates: &[String]) -> Option<usize> {
        candidates.iter().find_map(|candidate| {
            let wanted = candidate.trim().to_lowercase();
            self.headers
                .iter()
                .position(|h| h.trim().to_lowercase() == wanted)
        })
    }

    /// Like `column`, but a missing column is an error naming the candidates
    pub fn require_column(&self, candidates: &[String]) -> Result<usize> {
        self.column(candidates).ok_or_else(|| {
            anyhow!(
                "Sheet '{}' in {} has no column named {} (found: {})",
                self.sheet,
                self.source,
                candidates.join(" / "),
                self.headers.join(", ")
            )
        })
    }

    /// Cell at (row, col); short rows read as empty
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&Cell::Empty)
    }
}

/// SheetFormat - which reader handles a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetFormat {
    Workbook,
    Csv,
}

impl SheetFormat {
    pub fn name(&self) -> &str {
        match self {
            SheetFormat::Workbook => "Workbook",
            SheetFormat::Csv => "CSV",
        }
    }
}

// ============================================================================
// READER TRAIT
// ============================================================================

/// SheetReader - read one named sheet into a `SheetTable`
///
/// Readers that have no notion of sheets (CSV) ignore `sheet`
/// and use it only as a label.
pub trait SheetReader {
    fn read(&self, path: &Path, sheet: &str) -> Result<SheetTable>;

    fn format(&self) -> SheetFormat;
}

/// Detect the reader for a file from its extension
pub fn detect_format(path: &Path) -> Result<SheetFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SheetFormat::Workbook),
        "csv" | "txt" => Ok(SheetFormat::Csv),
        _ => Err(anyhow!(
            "Unsupported spreadsheet type for {} (expected xlsx, xls, ods or csv)",
            path.display()
        )),
    }
}

/// Factory: reader for a format
pub fn get_reader(format: SheetFormat) -> Box<dyn SheetReader> {
    match format {
        SheetFormat::Workbook => Box::new(WorkbookReader),
        SheetFormat::Csv => Box::new(CsvSheetReader),
    }
}

/// Detect and read in one step
pub fn read_sheet(path: &Path, sheet: &str) -> Result<SheetTable> {
    let format = detect_format(path)?;
    let table = get_reader(format).read(path, sheet)?;
    debug!(
        source = %path.display(),
        sheet,
        format = format.name(),
        rows = table.rows.len(),
        "read sheet"
    );
    Ok(table)
}

// ============================================================================
// WORKBOOK READER (calamine)
// ============================================================================

pub struct WorkbookReader;

impl SheetReader for WorkbookReader {
    fn read(&self, path: &Path, sheet: &str) -> Result<SheetTable> {
        let mut workbook = open_workbook_auto(path)
            .map_err(|e| anyhow!("Failed to open workbook {}: {}", path.display(), e))?;

        let range = workbook.worksheet_range(sheet).map_err(|e| {
            anyhow!(
                "Failed to read sheet '{}' from {}: {}",
                sheet,
                path.display(),
                e
            )
        })?;

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .map(|r| r.iter().map(|c| convert_data(c).as_text()).collect())
            .unwrap_or_default();

        let rows = rows
            .map(|r| r.iter().map(convert_data).collect())
            .collect();

        Ok(SheetTable {
            source: path.display().to_string(),
            sheet: sheet.to_string(),
            headers,
            rows,
        })
    }

    fn format(&self) -> SheetFormat {
        SheetFormat::Workbook
    }
}

/// Map a calamine cell onto `Cell`
pub fn convert_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(Cell::Date)
            .unwrap_or(Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) => parse_date_text(s)
            .map(Cell::Date)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
    }
}

/// Excel 1900 date system serial → date (fractional time dropped)
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// Parse the date spellings seen in fee sheets
pub fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let date_part = s.split(['T', ' ']).next().unwrap_or(s);

    let formats = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%Y/%m/%d", "%d-%b-%Y", "%d %b %Y"];

    for fmt in &formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_part, fmt) {
            return Some(d);
        }
    }
    // "%d %b %Y" contains spaces, so try the untruncated string too
    for fmt in &formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

// ============================================================================
// CSV READER
// ============================================================================

pub struct CsvSheetReader;

impl SheetReader for CsvSheetReader {
    fn read(&self, path: &Path, sheet: &str) -> Result<SheetTable> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

        let headers = rdr
            .headers()
            .with_context(|| format!("Failed to read CSV header: {}", path.display()))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (i, record) in rdr.records().enumerate() {
            let record = record
                .with_context(|| format!("Failed to read CSV row {} of {}", i + 2, path.display()))?;
            rows.push(
                record
                    .iter()
                    .map(|field| {
                        if field.trim().is_empty() {
                            Cell::Empty
                        } else {
                            Cell::Text(field.to_string())
                        }
                    })
                    .collect(),
            );
        }

        Ok(SheetTable {
            source: path.display().to_string(),
            sheet: sheet.to_string(),
            headers,
            rows,
        })
    }

    fn format(&self) -> SheetFormat {
        SheetFormat::Csv
    }
}

// ============================================================================
// TESTS
// ============================================================================
