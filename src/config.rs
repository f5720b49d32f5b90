// ⚙️ Run Configuration - every file name, sheet, alias and company in one place
//
// Loaded from JSON like the classification rules used to be. Every field has
// a default, so a config file only needs the values that differ.

use crate::address::AddressPolicy;
use crate::directory::MasterColumns;
use crate::fiscal::FiscalYear;
use crate::fonts::FontChoice;
use crate::matching::AliasTable;
use crate::records::ColumnNames;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// COMPANY PROFILES
// ============================================================================

/// The contracting company printed on letters and invoices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub address_lines: Vec<String>,
    pub signatory: String,
    pub designation: String,

    /// Last fiscal start year this profile applies to; `None` = open-ended
    #[serde(default)]
    pub until_year: Option<i32>,
}

impl CompanyProfile {
    /// `To:` block of an invoice
    pub fn invoice_block(&self) -> String {
        let mut lines = vec!["To:".to_string(), self.name.clone()];
        lines.extend(self.address_lines.iter().cloned());
        lines.join("\n")
    }

    fn applies_to(&self, start_year: i32) -> bool {
        self.until_year.map_or(true, |until| start_year <= until)
    }
}

fn lines(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn default_companies() -> Vec<CompanyProfile> {
    vec![
        CompanyProfile {
            name: "ELIXIR WEALTH MANAGEMENT PVT. LTD.".to_string(),
            address_lines: lines(&[
                "OFFICE NO. 112, 1ST FLOOR,",
                "FORTUNE GEE BEE COMPLEX,",
                "VAPI DAMAN MAIN ROAD",
                "SOMNATH, DAMAN – 396210",
            ]),
            signatory: "Dipan Mehta".to_string(),
            designation: "Director".to_string(),
            until_year: Some(2020),
        },
        CompanyProfile {
            name: "ELIXIR EQUITIES PVT. LTD.".to_string(),
            address_lines: lines(&["58 MITTAL CHAMBERS,", "228, NARIMAN POINT", "MUMBAI 400 021"]),
            signatory: "Dipan Mehta".to_string(),
            designation: "Director".to_string(),
            until_year: None,
        },
    ]
}

// ============================================================================
// SHEETS & OPTIONS
// ============================================================================

/// One fee sheet to process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSpec {
    /// Sheet name inside the workbook
    pub sheet: String,

    /// Fiscal year label when the sheet name is not one (e.g. "REVISED PAYMENTS")
    #[serde(default)]
    pub fiscal_year: Option<String>,

    /// Workbook override for this sheet
    #[serde(default)]
    pub workbook: Option<PathBuf>,
}

impl SheetSpec {
    pub fn new(sheet: &str) -> Self {
        SheetSpec {
            sheet: sheet.to_string(),
            fiscal_year: None,
            workbook: None,
        }
    }

    pub fn fiscal_year(&self) -> Result<FiscalYear> {
        let raw = self.fiscal_year.as_deref().unwrap_or(&self.sheet);
        FiscalYear::parse(raw).with_context(|| format!("Sheet '{}' has no usable fiscal year", self.sheet))
    }

    pub fn workbook<'a>(&'a self, default: &'a Path) -> &'a Path {
        self.workbook.as_deref().unwrap_or(default)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterOptions {
    /// Output folder is `<folder_prefix>-<fiscal label>`
    pub folder_prefix: String,
    pub file_prefix: String,
    /// Overrides the run-wide address policy
    pub address: Option<AddressPolicy>,
    /// Overrides the run-wide font choice
    pub font: Option<FontChoice>,
}

impl Default for LetterOptions {
    fn default() -> Self {
        LetterOptions {
            folder_prefix: "EEPL".to_string(),
            file_prefix: "Engagement_Letter".to_string(),
            address: None,
            font: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceOptions {
    pub file_prefix: String,
    pub payment_days: u32,
    /// One file per invoice date instead of one per advisor
    pub split_by_date: bool,
    pub address: Option<AddressPolicy>,
    pub font: Option<FontChoice>,
}

impl Default for InvoiceOptions {
    fn default() -> Self {
        InvoiceOptions {
            file_prefix: "Combined_Invoice".to_string(),
            payment_days: 10,
            split_by_date: false,
            address: None,
            font: None,
        }
    }
}

// ============================================================================
// RUN CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub fee_workbook: PathBuf,
    pub master_file: PathBuf,
    pub sheets: Vec<SheetSpec>,
    pub output_dir: PathBuf,
    pub columns: ColumnNames,
    pub master_columns: MasterColumns,
    pub aliases: AliasTable,
    pub address: AddressPolicy,
    pub font: FontChoice,
    pub companies: Vec<CompanyProfile>,
    pub letters: LetterOptions,
    pub invoices: InvoiceOptions,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            fee_workbook: PathBuf::from("EW - Details of Professional Fees Paid for last 7 years 1.xlsx"),
            master_file: PathBuf::from("EW Master 1.csv"),
            sheets: ["2017-18", "2018-19", "2019-20", "2020-21", "2021-22", "2023-24"]
                .iter()
                .map(|s| SheetSpec::new(s))
                .collect(),
            output_dir: PathBuf::from("."),
            columns: ColumnNames::default(),
            master_columns: MasterColumns::default(),
            aliases: AliasTable::with_defaults(),
            address: AddressPolicy::default(),
            font: FontChoice::default(),
            companies: default_companies(),
            letters: LetterOptions::default(),
            invoices: InvoiceOptions::default(),
        }
    }
}

impl RunConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: RunConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        config.check()?;
        Ok(config)
    }

    /// Write as pretty JSON (the `init` command)
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Reject configurations that would fail halfway through a run
    pub fn check(&self) -> Result<()> {
        if self.sheets.is_empty() {
            return Err(anyhow!("No sheets configured"));
        }
        if self.companies.is_empty() {
            return Err(anyhow!("No company profiles configured"));
        }
        for spec in &self.sheets {
            spec.fiscal_year()?;
        }
        Ok(())
    }

    /// First profile whose `until_year` covers `start_year`
    pub fn company_for(&self, start_year: i32) -> Result<&CompanyProfile> {
        self.companies
            .iter()
            .find(|c| c.applies_to(start_year))
            .ok_or_else(|| anyhow!("No company profile covers fiscal year starting {}", start_year))
    }

    pub fn letter_address(&self) -> &AddressPolicy {
        self.letters.address.as_ref().unwrap_or(&self.address)
    }

    pub fn invoice_address(&self) -> &AddressPolicy {
        self.invoices.address.as_ref().unwrap_or(&self.address)
    }

    pub fn letter_font(&self) -> &FontChoice {
        self.letters.font.as_ref().unwrap_or(&self.font)
    }

    pub fn invoice_font(&self) -> &FontChoice {
        self.invoices.font.as_ref().unwrap_or(&self.font)
    }
}

// ============================================================================
// TESTS
// ============================================================================
