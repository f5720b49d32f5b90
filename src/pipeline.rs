// 🏭 Pipeline - config → sheets → advisor groups → .docx files
//
// Sequential on purpose: the master is loaded once, every sheet is read,
// validated, grouped and rendered in turn. The first hard error aborts.

use crate::address::format_address;
use crate::config::{RunConfig, SheetSpec};
use crate::directory::AdvisorDirectory;
use crate::docx::write_docx;
use crate::fiscal::FiscalYear;
use crate::fonts::FontPicker;
use crate::grouping::{group_by_advisor, AdvisorGroup};
use crate::invoice::{build_invoice, invoice_path, InvoiceContext};
use crate::letter::{build_engagement_letter, letter_path, LetterContext};
use crate::matching::{closest_name, resolve, resolve_pan, Resolution, PAN_NOT_FOUND};
use crate::records::{load_fee_records, FeeRecord};
use crate::validation::{validate_records, Severity};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetSummary {
    pub sheet: String,
    pub fiscal_year: String,
    pub records: usize,
    pub advisors: usize,
    pub documents: Vec<PathBuf>,
    /// Advisors printed with the address placeholder
    pub unresolved: Vec<String>,
    pub validation_issues: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub sheets: Vec<SheetSummary>,
}

impl RunSummary {
    pub fn documents(&self) -> usize {
        self.sheets.iter().map(|s| s.documents.len()).sum()
    }

    pub fn unresolved(&self) -> usize {
        self.sheets.iter().map(|s| s.unresolved.len()).sum()
    }

    pub fn validation_issues(&self) -> usize {
        self.sheets.iter().map(|s| s.validation_issues).sum()
    }
}

// ============================================================================
// COMMANDS
// ============================================================================

/// One engagement letter per advisor per configured sheet
pub fn run_letters(config: &RunConfig) -> Result<RunSummary> {
    let master = AdvisorDirectory::load(&config.master_file, &config.master_columns)?;
    let mut fonts = FontPicker::new(config.letter_font().clone());
    let mut summary = RunSummary::default();

    for spec in &config.sheets {
        let (year, records, mut sheet) = load_sheet(config, spec)?;
        let directory = master.for_year(&year);
        let company = config.company_for(year.start_year)?;
        let groups = group_by_advisor(&records, &config.aliases);
        sheet.advisors = groups.len();

        info!(sheet = %spec.sheet, advisors = groups.len(), "generating engagement letters");

        for group in &groups {
            let resolution = resolve(&group.advisor, &directory, &config.aliases);
            note_resolution(&resolution, group, &directory, &mut sheet);

            let address_lines = format_address(resolution.address(), config.letter_address());
            let team = group.team_members(&resolution.legal_name);
            let font = fonts.next_font();

            let doc = build_engagement_letter(&LetterContext {
                legal_name: &resolution.legal_name,
                address_lines: &address_lines,
                pan: resolution.pan().unwrap_or(PAN_NOT_FOUND),
                team: &team,
                fiscal_year: &year,
                company,
                font: &font,
            });

            let path = config.output_dir.join(letter_path(
                &config.letters.folder_prefix,
                &config.letters.file_prefix,
                &resolution.legal_name,
                &year,
            ));
            write_docx(&doc, &path)?;
            debug!(advisor = %resolution.legal_name, font = %font, path = %path.display(), "letter saved");
            sheet.documents.push(path);
        }

        info!(sheet = %spec.sheet, documents = sheet.documents.len(), "letters complete");
        summary.sheets.push(sheet);
    }

    Ok(summary)
}

/// One consolidated invoice per advisor per configured sheet
/// (or one per invoice date with `split_by_date`)
pub fn run_invoices(config: &RunConfig) -> Result<RunSummary> {
    let master = AdvisorDirectory::load(&config.master_file, &config.master_columns)?;
    let mut fonts = FontPicker::new(config.invoice_font().clone());
    let mut summary = RunSummary::default();

    for spec in &config.sheets {
        let (year, records, mut sheet) = load_sheet(config, spec)?;
        let directory = master.for_year(&year);
        let company = config.company_for(year.start_year)?;
        let groups = group_by_advisor(&records, &config.aliases);
        sheet.advisors = groups.len();

        info!(sheet = %spec.sheet, invoices = groups.len(), "generating consolidated invoices");

        for group in &groups {
            let dates = group.by_date()?;
            let resolution = resolve(&group.advisor, &directory, &config.aliases);
            note_resolution(&resolution, group, &directory, &mut sheet);

            let address_lines = format_address(resolution.address(), config.invoice_address());
            let pan = resolve_pan(&resolution, &group.advisor, &records);
            let font = fonts.next_font();

            let ctx = InvoiceContext {
                advisor: &group.advisor,
                address_lines: &address_lines,
                pan,
                fiscal_year: &year,
                company,
                font: &font,
                payment_days: config.invoices.payment_days,
            };

            if config.invoices.split_by_date {
                for date_group in &dates {
                    let doc = build_invoice(&ctx, std::slice::from_ref(date_group));
                    let path = config.output_dir.join(invoice_path(
                        &config.invoices.file_prefix,
                        &group.advisor,
                        &year,
                        Some(date_group.date),
                    ));
                    write_docx(&doc, &path)?;
                    sheet.documents.push(path);
                }
            } else {
                let doc = build_invoice(&ctx, &dates);
                let path = config.output_dir.join(invoice_path(
                    &config.invoices.file_prefix,
                    &group.advisor,
                    &year,
                    None,
                ));
                write_docx(&doc, &path)?;
                sheet.documents.push(path);
            }

            debug!(advisor = %group.advisor, dates = dates.len(), font = %font, "invoice saved");
        }

        info!(sheet = %spec.sheet, documents = sheet.documents.len(), "invoices complete");
        summary.sheets.push(sheet);
    }

    Ok(summary)
}

// ============================================================================
// SHARED STEPS
// ============================================================================

fn load_sheet(config: &RunConfig, spec: &SheetSpec) -> Result<(FiscalYear, Vec<FeeRecord>, SheetSummary)> {
    let year = spec.fiscal_year()?;
    let workbook = spec.workbook(&config.fee_workbook);

    let records = load_fee_records(workbook, &spec.sheet, &config.columns)
        .with_context(|| format!("Failed to load sheet '{}'", spec.sheet))?;
    info!(sheet = %spec.sheet, fiscal_year = %year, records = records.len(), "loaded fee records");

    let report = validate_records(&records)?;
    for issue in &report.issues {
        match issue.severity {
            Severity::Info => debug!(row = issue.row_number, advisor = %issue.advisor, rule = %issue.rule_name, "{}", issue.message),
            Severity::Warning | Severity::Critical => warn!(
                sheet = %spec.sheet,
                row = issue.row_number,
                advisor = %issue.advisor,
                rule = %issue.rule_name,
                severity = ?issue.severity,
                "{}",
                issue.message
            ),
        }
    }
    if !report.issues.is_empty() {
        info!(sheet = %spec.sheet, "{}", report.summary());
    }

    let summary = SheetSummary {
        sheet: spec.sheet.clone(),
        fiscal_year: year.label.clone(),
        records: records.len(),
        validation_issues: report.issues.len() - report.count(Severity::Info),
        ..SheetSummary::default()
    };

    Ok((year, records, summary))
}

/// Log how the advisor was matched; on a miss, suggest the closest master name
fn note_resolution(
    resolution: &Resolution<'_>,
    group: &AdvisorGroup,
    directory: &AdvisorDirectory,
    sheet: &mut SheetSummary,
) {
    if resolution.is_found() {
        debug!(advisor = %group.advisor, legal_name = %resolution.legal_name, method = ?resolution.method, "advisor resolved");
        return;
    }

    match closest_name(&resolution.legal_name, directory) {
        Some((name, distance)) => warn!(
            advisor = %resolution.legal_name,
            closest = %name,
            distance,
            "address not found in master"
        ),
        None => warn!(advisor = %resolution.legal_name, "address not found, master is empty"),
    }
    sheet.unresolved.push(resolution.legal_name.clone());
}

// ============================================================================
// TESTS
// ============================================================================
