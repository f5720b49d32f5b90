// 📇 Advisor Directory - master table of names, addresses and PANs
//
// Loaded once per run from the master CSV and never mutated afterwards;
// lookups borrow entries from it.

use crate::fiscal::FiscalYear;
use crate::sheet::{read_sheet, SheetTable};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

// ============================================================================
// COLUMN NAMES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterColumns {
    pub name: Vec<String>,
    pub address: Vec<String>,
    pub pan: Vec<String>,
    pub year: Vec<String>,
}

impl Default for MasterColumns {
    fn default() -> Self {
        let v = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        MasterColumns {
            name: v(&["NAME", "TRADING ADVISOR"]),
            address: v(&["ADDRESS"]),
            pan: v(&["PAN"]),
            year: v(&["YEAR"]),
        }
    }
}

// ============================================================================
// MASTER ENTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterEntry {
    pub name: String,
    pub address: String,
    pub pan: Option<String>,

    /// Fiscal year label when the master is kept per year
    pub year: Option<String>,
}

impl MasterEntry {
    pub fn new(name: &str, address: &str, pan: Option<&str>) -> Self {
        MasterEntry {
            name: name.trim().to_string(),
            address: address.trim().to_string(),
            pan: pan.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
            year: None,
        }
    }

    pub fn with_year(mut self, year: &str) -> Self {
        self.year = Some(year.trim().replace('/', "-"));
        self
    }
}

// ============================================================================
// DIRECTORY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct AdvisorDirectory {
    entries: Vec<MasterEntry>,
}

impl AdvisorDirectory {
    pub fn new(entries: Vec<MasterEntry>) -> Self {
        AdvisorDirectory { entries }
    }

    /// Load the master CSV (or a workbook sheet named `Master`)
    pub fn load(path: &Path, columns: &MasterColumns) -> Result<Self> {
        let table = read_sheet(path, "Master")?;
        let directory = Self::from_table(&table, columns)?;
        info!(
            entries = directory.len(),
            source = %path.display(),
            "loaded advisor master"
        );
        Ok(directory)
    }

    /// Build from a read sheet. Name and address columns are required.
    pub fn from_table(table: &SheetTable, columns: &MasterColumns) -> Result<Self> {
        let name_col = table.require_column(&columns.name)?;
        let address_col = table.require_column(&columns.address)?;
        let pan_col = table.column(&columns.pan);
        let year_col = table.column(&columns.year);

        let mut entries = Vec::new();
        for row in 0..table.rows.len() {
            let name = table.cell(row, name_col).as_text();
            if name.is_empty() {
                continue;
            }
            let address = table.cell(row, address_col).as_text();
            let pan = pan_col.map(|c| table.cell(row, c).as_text());

            let mut entry = MasterEntry::new(&name, &address, pan.as_deref());
            if let Some(c) = year_col {
                let year = table.cell(row, c).as_text();
                if !year.is_empty() {
                    entry = entry.with_year(&year);
                }
            }
            entries.push(entry);
        }

        Ok(AdvisorDirectory { entries })
    }

    /// Entries valid for `year`: those without a year plus those matching it
    pub fn for_year(&self, year: &FiscalYear) -> AdvisorDirectory {
        AdvisorDirectory {
            entries: self
                .entries
                .iter()
                .filter(|e| e.year.as_deref().map_or(true, |y| y == year.label))
                .cloned()
                .collect(),
        }
    }

    pub fn entries(&self) -> &[MasterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_master_csv() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "Name,Address,PAN").unwrap();
        writeln!(file, "DIPAN MEHTA ,\"58 Mittal Chambers, Nariman Point, Mumbai 400021\",AAAPM1234A").unwrap();
        writeln!(file, ",orphan address,").unwrap();
        writeln!(file, "RAVI SHAH,\"Andheri, Mumbai\",").unwrap();
        file.flush().unwrap();

        let dir = AdvisorDirectory::load(file.path(), &MasterColumns::default()).unwrap();
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.entries()[0].name, "DIPAN MEHTA");
        assert_eq!(dir.entries()[0].pan.as_deref(), Some("AAAPM1234A"));
        assert_eq!(dir.entries()[1].pan, None);
    }

    #[test]
    fn test_missing_address_column_fails() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "NAME,PAN").unwrap();
        file.flush().unwrap();

        assert!(AdvisorDirectory::load(file.path(), &MasterColumns::default()).is_err());
    }

    #[test]
    fn test_for_year_filters() {
        let dir = AdvisorDirectory::new(vec![
            MasterEntry::new("A", "old", None).with_year("2017-18"),
            MasterEntry::new("A", "new", None).with_year("2018/19"),
            MasterEntry::new("B", "any", None),
        ]);

        let fy = FiscalYear::parse("2018-19").unwrap();
        let filtered = dir.for_year(&fy);
        let addresses: Vec<&str> = filtered.entries().iter().map(|e| e.address.as_str()).collect();
        assert_eq!(addresses, vec!["new", "any"]);
    }
}
