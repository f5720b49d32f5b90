// ✅ Fee Record Validation - sanity checks before documents are built
//
// Nothing here aborts a run. Issues are collected per record and logged so
// the sheet owner can fix them for next time.

use crate::records::FeeRecord;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Totals may differ from fees + out-of-pocket by rounding in the sheet
const TOTAL_TOLERANCE: f64 = 1.0;

pub const PAN_PATTERN: &str = r"^[A-Z]{5}[0-9]{4}[A-Z]$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,     // Worth knowing, nothing wrong
    Warning,  // Document will be produced but may be wrong
    Critical, // Document will certainly be wrong
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub rule_name: String,
    pub field: String,
    pub message: String,
    pub advisor: String,
    pub row_number: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub checked: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn has_critical_issues(&self) -> bool {
        self.count(Severity::Critical) > 0
    }

    pub fn summary(&self) -> String {
        format!(
            "Checked {} records: {} issues ({} critical, {} warnings)",
            self.checked,
            self.issues.len(),
            self.count(Severity::Critical),
            self.count(Severity::Warning)
        )
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

pub struct RecordValidator {
    pan: Regex,
}

impl RecordValidator {
    pub fn new() -> Result<Self> {
        Ok(RecordValidator {
            pan: Regex::new(PAN_PATTERN).context("Invalid PAN pattern")?,
        })
    }

    pub fn is_valid_pan(&self, pan: &str) -> bool {
        self.pan.is_match(pan.trim())
    }

    pub fn validate(&self, record: &FeeRecord) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut fail = |severity, rule: &str, field: &str, message: String| {
            issues.push(ValidationIssue {
                severity,
                rule_name: rule.to_string(),
                field: field.to_string(),
                message,
                advisor: record.advisor.clone(),
                row_number: record.row_number,
            });
        };

        if record.payee.trim().is_empty() {
            fail(Severity::Critical, "payee_present", "payee", "payee name is empty".to_string());
        }

        match record.pan.as_deref() {
            None => fail(
                Severity::Warning,
                "pan_present",
                "pan",
                format!("no PAN for payee {}", record.payee),
            ),
            Some(pan) if !self.is_valid_pan(pan) => fail(
                Severity::Warning,
                "pan_format",
                "pan",
                format!("PAN '{}' of {} is not in AAAAA9999A form", pan, record.payee),
            ),
            Some(_) => {}
        }

        for (field, amount) in [
            ("professional_fees", record.professional_fees),
            ("out_of_pocket", record.out_of_pocket),
            ("total_amount", record.total_amount),
        ] {
            if amount < 0.0 {
                fail(Severity::Critical, "amount_non_negative", field, format!("negative amount {}", amount));
            }
        }

        let expected = record.professional_fees + record.out_of_pocket;
        if (record.total_amount - expected).abs() > TOTAL_TOLERANCE {
            fail(
                Severity::Warning,
                "total_consistent",
                "total_amount",
                format!(
                    "total {} differs from fees {} + out of pocket {}",
                    record.total_amount, record.professional_fees, record.out_of_pocket
                ),
            );
        }

        if record.total_amount == 0.0 {
            fail(Severity::Info, "total_non_zero", "total_amount", "zero total amount".to_string());
        }

        issues
    }
}

/// Validate every record of a sheet
pub fn validate_records(records: &[FeeRecord]) -> Result<ValidationReport> {
    let validator = RecordValidator::new()?;
    let mut report = ValidationReport {
        checked: records.len(),
        issues: Vec::new(),
    };
    for record in records {
        report.issues.extend(validator.validate(record));
    }
    Ok(report)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_record_has_no_issues() {
        let record = FeeRecord::new("DIPAN MEHTA", "RAVI SHAH", 0.0)
            .with_pan("RRRPS1111R")
            .with_amounts(1000.0, 250.0, 1250.0);
        let report = validate_records(&[record]).unwrap();
        assert!(report.issues.is_empty());
        assert_eq!(report.checked, 1);
    }

    #[test]
    fn test_pan_checks() {
        let validator = RecordValidator::new().unwrap();
        assert!(validator.is_valid_pan("ABCPM1234K"));
        assert!(validator.is_valid_pan(" ABCPM1234K "));
        assert!(!validator.is_valid_pan("abcpm1234k"));
        assert!(!validator.is_valid_pan("ABCPM12345"));

        let missing = FeeRecord::new("A B", "C D", 10.0);
        let issues = validator.validate(&missing);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule_name, "pan_present");

        let bad = FeeRecord::new("A B", "C D", 10.0).with_pan("XYZ");
        assert_eq!(validator.validate(&bad)[0].rule_name, "pan_format");
    }

    #[test]
    fn test_total_tolerance() {
        let validator = RecordValidator::new().unwrap();
        let rounded = FeeRecord::new("A B", "C D", 0.0)
            .with_pan("RRRPS1111R")
            .with_amounts(100.4, 0.0, 101.0);
        assert!(validator.validate(&rounded).is_empty());

        let off = FeeRecord::new("A B", "C D", 0.0)
            .with_pan("RRRPS1111R")
            .with_amounts(100.0, 50.0, 100.0);
        let issues = validator.validate(&off);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_negative_and_empty_payee_are_critical() {
        let record = FeeRecord::new("A B", " ", 0.0)
            .with_pan("RRRPS1111R")
            .with_amounts(-5.0, 0.0, -5.0);
        let report = validate_records(&[record]).unwrap();

        // payee, fees, total
        assert_eq!(report.count(Severity::Critical), 3);
        assert!(report.has_critical_issues());
        assert!(report.summary().contains("3 critical"));
    }
}
