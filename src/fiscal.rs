// 📅 Fiscal Year - April to March accounting years
// Sheet names like "2017-18" (or "2017/18") drive folder names and letter dates

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fiscal year such as `2017-18`, starting on 1 April of `start_year`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYear {
    /// Folder-safe label (`/` replaced by `-`)
    pub label: String,

    /// Calendar year in which the fiscal year begins
    pub start_year: i32,
}

impl FiscalYear {
    /// Parse a label like `2017-18`, `2017/18` or `2017-2018`.
    ///
    /// Only the leading year is significant; whatever follows the
    /// separator is kept verbatim in the label.
    pub fn parse(raw: &str) -> Result<Self> {
        let label = raw.trim().replace('/', "-");
        let head = label.split('-').next().unwrap_or_default().trim();

        let start_year: i32 = head
            .parse()
            .map_err(|_| anyhow!("Invalid fiscal year '{}': expected e.g. 2017-18", raw))?;

        if !(1900..=2999).contains(&start_year) {
            return Err(anyhow!("Fiscal year '{}' is out of range", raw));
        }

        Ok(FiscalYear { label, start_year })
    }

    /// 1 April of the start year
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.start_year, 4, 1).unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dash_label() {
        let fy = FiscalYear::parse("2017-18").unwrap();
        assert_eq!(fy.label, "2017-18");
        assert_eq!(fy.start_year, 2017);
        assert_eq!(fy.start_date(), NaiveDate::from_ymd_opt(2017, 4, 1).unwrap());
    }

    #[test]
    fn test_parse_slash_label_normalized() {
        let fy = FiscalYear::parse(" 2022/23 ").unwrap();
        assert_eq!(fy.label, "2022-23");
        assert_eq!(fy.start_year, 2022);
        assert_eq!(fy.to_string(), "2022-23");
    }

    #[test]
    fn test_parse_rejects_sheet_name() {
        assert!(FiscalYear::parse("REVISED PAYMENTS TO TRADERS").is_err());
        assert!(FiscalYear::parse("").is_err());
    }
}
