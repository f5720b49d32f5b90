// 💰 Fee Records - one row of a professional-fees sheet
//
// Column names drift between years ("PAYEE" vs "TEAM MEMBER", "Invoice Date"
// vs "Payment Date"), so each field is looked up from a list of candidates.

use crate::sheet::{excel_serial_to_date, parse_date_text, read_sheet, Cell, SheetTable};
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

// ============================================================================
// COLUMN NAMES
// ============================================================================

/// Header candidates for every fee-record field (first present one wins)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub advisor: Vec<String>,
    pub payee: Vec<String>,
    pub pan: Vec<String>,
    pub professional_fees: Vec<String>,
    pub out_of_pocket: Vec<String>,
    pub total_amount: Vec<String>,
    pub date: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            advisor: names(&["TRADING ADVISOR"]),
            payee: names(&["PAYEE", "TEAM MEMBER"]),
            pan: names(&["PAN"]),
            professional_fees: names(&["PROFESSIONAL FEES"]),
            out_of_pocket: names(&["OUT OF POCKET"]),
            total_amount: names(&["TOTAL AMOUNT"]),
            date: names(&["Invoice Date", "Payment Date"]),
        }
    }
}

// ============================================================================
// FEE RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeRecord {
    pub advisor: String,
    pub payee: String,
    pub pan: Option<String>,
    pub professional_fees: f64,
    pub out_of_pocket: f64,
    pub total_amount: f64,
    pub date: Option<NaiveDate>,

    // Provenance
    pub source_file: String,
    pub sheet: String,
    /// 1-based spreadsheet row (header is row 1)
    pub row_number: usize,
}

impl FeeRecord {
    /// Minimal record, used by tests and by callers building records by hand
    pub fn new(advisor: &str, payee: &str, total_amount: f64) -> Self {
        FeeRecord {
            advisor: advisor.to_string(),
            payee: payee.to_string(),
            pan: None,
            professional_fees: total_amount,
            out_of_pocket: 0.0,
            total_amount,
            date: None,
            source_file: String::new(),
            sheet: String::new(),
            row_number: 0,
        }
    }

    pub fn with_pan(mut self, pan: &str) -> Self {
        self.pan = Some(pan.to_string());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_amounts(mut self, fees: f64, out_of_pocket: f64, total: f64) -> Self {
        self.professional_fees = fees;
        self.out_of_pocket = out_of_pocket;
        self.total_amount = total;
        self
    }

    /// PAN for display, or the placeholder
    pub fn pan_or_placeholder(&self) -> &str {
        self.pan.as_deref().unwrap_or(crate::matching::PAN_NOT_FOUND)
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Read a sheet and convert it to fee records
pub fn load_fee_records(path: &Path, sheet: &str, columns: &ColumnNames) -> Result<Vec<FeeRecord>> {
    let table = read_sheet(path, sheet)?;
    records_from_table(&table, columns)
}

/// Convert an already-read sheet to fee records.
///
/// Rows with an empty advisor cell are skipped. Optional columns (payee,
/// PAN, out-of-pocket, date) may be absent from the sheet entirely.
pub fn records_from_table(table: &SheetTable, columns: &ColumnNames) -> Result<Vec<FeeRecord>> {
    let advisor_col = table.require_column(&columns.advisor)?;
    let total_col = table.require_column(&columns.total_amount)?;
    let payee_col = table.column(&columns.payee);
    let pan_col = table.column(&columns.pan);
    let fees_col = table.column(&columns.professional_fees);
    let oop_col = table.column(&columns.out_of_pocket);
    let date_col = table.column(&columns.date);

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in 0..table.rows.len() {
        let row_number = row + 2;
        let advisor = table.cell(row, advisor_col).as_text();
        if advisor.is_empty() {
            skipped += 1;
            continue;
        }

        let at = |field: &str| {
            format!(
                "{} '{}' row {}: bad {}",
                table.source, table.sheet, row_number, field
            )
        };

        let fees = match fees_col {
            Some(c) => parse_amount(table.cell(row, c)).with_context(|| at("PROFESSIONAL FEES"))?,
            None => None,
        };
        let out_of_pocket = match oop_col {
            Some(c) => parse_amount(table.cell(row, c)).with_context(|| at("OUT OF POCKET"))?,
            None => None,
        }
        .unwrap_or(0.0);
        let total = parse_amount(table.cell(row, total_col)).with_context(|| at("TOTAL AMOUNT"))?;

        // An empty total is derived; an empty fee is whatever the total leaves
        let (professional_fees, total_amount) = match (fees, total) {
            (Some(f), Some(t)) => (f, t),
            (Some(f), None) => (f, f + out_of_pocket),
            (None, Some(t)) => (t - out_of_pocket, t),
            (None, None) => (0.0, out_of_pocket),
        };

        let date = match date_col {
            Some(c) => parse_date(table.cell(row, c)).with_context(|| at("date"))?,
            None => None,
        };

        let pan = pan_col
            .map(|c| table.cell(row, c).as_text())
            .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case("nan"));

        records.push(FeeRecord {
            advisor,
            payee: payee_col.map(|c| table.cell(row, c).as_text()).unwrap_or_default(),
            pan,
            professional_fees,
            out_of_pocket,
            total_amount,
            date,
            source_file: table.source.clone(),
            sheet: table.sheet.clone(),
            row_number,
        });
    }

    debug!(
        sheet = %table.sheet,
        loaded = records.len(),
        skipped,
        "converted sheet rows to fee records"
    );

    Ok(records)
}

/// Amount cell → value. Empty → `None`; text must be numeric (commas,
/// `Rs.` and `₹` tolerated).
pub fn parse_amount(cell: &Cell) -> Result<Option<f64>> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Number(n) => Ok(Some(*n)),
        Cell::Text(s) => {
            let cleaned: String = s
                .trim()
                .trim_start_matches("Rs.")
                .trim_start_matches("Rs")
                .trim_start_matches('₹')
                .chars()
                .filter(|c| *c != ',' && !c.is_whitespace())
                .collect();
            if cleaned.is_empty() || cleaned == "-" {
                return Ok(None);
            }
            cleaned
                .parse::<f64>()
                .map(Some)
                .map_err(|_| anyhow!("'{}' is not an amount", s.trim()))
        }
        Cell::Date(d) => Err(anyhow!("expected an amount, found date {}", d)),
    }
}

/// Date cell → date. Empty → `None`; anything unparseable is an error.
pub fn parse_date(cell: &Cell) -> Result<Option<NaiveDate>> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Date(d) => Ok(Some(*d)),
        Cell::Number(n) => excel_serial_to_date(*n)
            .map(Some)
            .ok_or_else(|| anyhow!("{} is not a date serial", n)),
        Cell::Text(s) => parse_date_text(s)
            .map(Some)
            .ok_or_else(|| anyhow!("'{}' is not a date", s.trim())),
    }
}

/// Sum of `total_amount` over records
pub fn total_of<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a FeeRecord>,
{
    records.into_iter().map(|r| r.total_amount).sum()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn table(headers: &[&str], rows: Vec<Vec<Cell>>) -> SheetTable {
        SheetTable {
            source: "fees.xlsx".into(),
            sheet: "2019-20".into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_records_from_table() {
        let t = table(
            &["TRADING ADVISOR", "PAYEE", "PAN", "PROFESSIONAL FEES", "OUT OF POCKET", "TOTAL AMOUNT", "Invoice Date"],
            vec![
                vec![
                    text("DIPAN MEHTA "),
                    text("RAVI SHAH"),
                    text("ABCDE1234F"),
                    Cell::Number(9000.0),
                    Cell::Number(1000.0),
                    Cell::Number(10000.0),
                    Cell::Date(NaiveDate::from_ymd_opt(2019, 9, 30).unwrap()),
                ],
                vec![Cell::Empty, text("padding")],
            ],
        );

        let records = records_from_table(&t, &ColumnNames::default()).unwrap();
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(r.advisor, "DIPAN MEHTA");
        assert_eq!(r.payee, "RAVI SHAH");
        assert_eq!(r.pan.as_deref(), Some("ABCDE1234F"));
        assert_eq!(r.total_amount, 10000.0);
        assert_eq!(r.out_of_pocket, 1000.0);
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2019, 9, 30));
        assert_eq!(r.row_number, 2);
        assert_eq!(r.sheet, "2019-20");
    }

    #[test]
    fn test_team_member_column_alternative() {
        let t = table(
            &["TRADING ADVISOR", "TEAM MEMBER", "TOTAL AMOUNT"],
            vec![vec![text("A B"), text("C D"), text("1,500")]],
        );
        let records = records_from_table(&t, &ColumnNames::default()).unwrap();
        assert_eq!(records[0].payee, "C D");
        assert_eq!(records[0].total_amount, 1500.0);
        assert_eq!(records[0].professional_fees, 1500.0);
        assert_eq!(records[0].pan, None);
        assert_eq!(records[0].pan_or_placeholder(), "PAN not found");
    }

    #[test]
    fn test_empty_total_is_derived() {
        let t = table(
            &["TRADING ADVISOR", "PROFESSIONAL FEES", "OUT OF POCKET", "TOTAL AMOUNT"],
            vec![vec![text("A B"), Cell::Number(700.0), Cell::Number(300.0), Cell::Empty]],
        );
        let records = records_from_table(&t, &ColumnNames::default()).unwrap();
        assert_eq!(records[0].total_amount, 1000.0);
    }

    #[test]
    fn test_empty_fee_is_total_less_out_of_pocket() {
        let t = table(
            &["TRADING ADVISOR", "PROFESSIONAL FEES", "OUT OF POCKET", "TOTAL AMOUNT"],
            vec![
                vec![text("A B"), Cell::Empty, Cell::Number(300.0), Cell::Number(1000.0)],
                vec![text("A B"), Cell::Empty, Cell::Number(300.0), Cell::Empty],
                vec![text("A B"), Cell::Number(500.0), Cell::Empty, Cell::Number(500.0)],
            ],
        );
        let records = records_from_table(&t, &ColumnNames::default()).unwrap();

        assert_eq!(records[0].professional_fees, 700.0);
        assert_eq!(records[0].total_amount, 1000.0);
        assert_eq!(records[1].professional_fees, 0.0);
        assert_eq!(records[1].total_amount, 300.0);
        assert_eq!(records[2].out_of_pocket, 0.0);
    }

    #[test]
    fn test_missing_required_column_fails() {
        let t = table(&["NAME", "TOTAL AMOUNT"], vec![]);
        let err = records_from_table(&t, &ColumnNames::default()).unwrap_err();
        assert!(err.to_string().contains("TRADING ADVISOR"));
    }

    #[test]
    fn test_bad_amount_aborts_with_row() {
        let t = table(
            &["TRADING ADVISOR", "TOTAL AMOUNT"],
            vec![vec![text("A B"), text("ten thousand")]],
        );
        let err = records_from_table(&t, &ColumnNames::default()).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("row 2"), "{}", chain);
        assert!(chain.contains("TOTAL AMOUNT"), "{}", chain);
    }

    #[test]
    fn test_bad_date_aborts() {
        let t = table(
            &["TRADING ADVISOR", "TOTAL AMOUNT", "Payment Date"],
            vec![vec![text("A B"), Cell::Number(1.0), text("soon")]],
        );
        assert!(records_from_table(&t, &ColumnNames::default()).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(&Cell::Empty).unwrap(), None);
        assert_eq!(parse_amount(&text("Rs. 12,500")).unwrap(), Some(12500.0));
        assert_eq!(parse_amount(&text("₹ 99.5")).unwrap(), Some(99.5));
        assert_eq!(parse_amount(&text(" - ")).unwrap(), None);
        assert!(parse_amount(&text("abc")).is_err());
    }

    #[test]
    fn test_parse_date_serial() {
        assert_eq!(
            parse_date(&Cell::Number(45016.0)).unwrap(),
            NaiveDate::from_ymd_opt(2023, 3, 31)
        );
        assert_eq!(parse_date(&Cell::Empty).unwrap(), None);
    }

    #[test]
    fn test_total_of() {
        let records = vec![
            FeeRecord::new("A", "X", 100.0),
            FeeRecord::new("A", "Y", 250.5),
        ];
        assert_eq!(total_of(&records), 350.5);
    }

    #[test]
    fn test_load_fee_records_from_csv() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "TRADING ADVISOR,PAYEE,PAN,PROFESSIONAL FEES,OUT OF POCKET,TOTAL AMOUNT,Invoice Date").unwrap();
        writeln!(file, "DIPAN MEHTA,RAVI SHAH,ABCDE1234F,\"9,000\",0,\"9,000\",31-03-2023").unwrap();
        file.flush().unwrap();

        let records = load_fee_records(file.path(), "2022-23", &ColumnNames::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].professional_fees, 9000.0);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2023, 3, 31));
    }
}
