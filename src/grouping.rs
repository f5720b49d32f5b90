// 🗂️ Grouping - fee records → per-advisor, per-date bundles

use crate::matching::{normalize_key, AliasTable};
use crate::records::{total_of, FeeRecord};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// ============================================================================
// ADVISOR GROUP
// ============================================================================

/// All fee records of one advisor within one sheet
#[derive(Debug, Clone)]
pub struct AdvisorGroup {
    /// Advisor name as first spelled in the sheet (trimmed)
    pub advisor: String,
    pub records: Vec<FeeRecord>,
}

/// Records paid on one invoice date
#[derive(Debug, Clone)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub records: Vec<FeeRecord>,
}

impl DateGroup {
    pub fn total(&self) -> f64 {
        total_of(&self.records)
    }
}

/// A payee listed in the engagement letter annexure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub payee: String,
    pub pan: Option<String>,
}

impl AdvisorGroup {
    pub fn total(&self) -> f64 {
        total_of(&self.records)
    }

    /// Split by invoice date, ascending. Every record must carry a date.
    pub fn by_date(&self) -> Result<Vec<DateGroup>> {
        let mut dates: BTreeMap<NaiveDate, Vec<FeeRecord>> = BTreeMap::new();

        for record in &self.records {
            let date = record.date.ok_or_else(|| {
                anyhow!(
                    "{} '{}' row {}: no invoice date for advisor {}",
                    record.source_file,
                    record.sheet,
                    record.row_number,
                    self.advisor
                )
            })?;
            dates.entry(date).or_default().push(record.clone());
        }

        Ok(dates
            .into_iter()
            .map(|(date, records)| DateGroup { date, records })
            .collect())
    }

    /// Unique payees in first-seen order, excluding the advisor.
    ///
    /// `legal_name` is the alias-corrected advisor name; a payee equal to it
    /// or to any advisor spelling in the group is the advisor themself. The
    /// first PAN seen for a payee is kept.
    pub fn team_members(&self, legal_name: &str) -> Vec<TeamMember> {
        let mut own_names: HashSet<String> =
            self.records.iter().map(|r| normalize_key(&r.advisor)).collect();
        own_names.insert(normalize_key(legal_name));

        let mut seen = HashSet::new();
        let mut members = Vec::new();

        for record in &self.records {
            let key = normalize_key(&record.payee);
            if key.is_empty() || own_names.contains(&key) {
                continue;
            }
            if seen.insert(key) {
                members.push(TeamMember {
                    payee: record.payee.trim().to_string(),
                    pan: record.pan.clone(),
                });
            }
        }

        members
    }
}

/// Group records by advisor, ordered by alias-corrected name.
///
/// The key is the legal name after `aliases`, uppercased and single-spaced,
/// so an alias and its legal name, or two spellings differing in case or
/// spacing, share one group and never write the same file twice.
pub fn group_by_advisor(records: &[FeeRecord], aliases: &AliasTable) -> Vec<AdvisorGroup> {
    let mut groups: BTreeMap<String, AdvisorGroup> = BTreeMap::new();

    for record in records {
        let key = normalize_key(&aliases.apply(&record.advisor));
        if key.is_empty() {
            continue;
        }
        groups
            .entry(key)
            .or_insert_with(|| AdvisorGroup {
                advisor: crate::format::normalize_whitespace(&record.advisor),
                records: Vec::new(),
            })
            .records
            .push(record.clone());
    }

    groups.into_values().collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample() -> Vec<FeeRecord> {
        vec![
            FeeRecord::new("ZARA KHAN", "ZARA KHAN", 500.0).with_date(d(2023, 1, 31)),
            FeeRecord::new("DIPAN MEHTA", "RAVI SHAH", 1000.0)
                .with_pan("RRRPS1111R")
                .with_date(d(2023, 3, 31)),
            FeeRecord::new("dipan  mehta ", "ANU JOSHI", 2500.0)
                .with_pan("AAAPJ2222J")
                .with_date(d(2022, 9, 30)),
            FeeRecord::new("DIPAN MEHTA", "RAVI SHAH", 1500.0)
                .with_pan("RRRPS1111R")
                .with_date(d(2023, 3, 31)),
            FeeRecord::new("DIPAN MEHTA", "DIPAN MEHTA", 4000.0).with_date(d(2022, 9, 30)),
        ]
    }

    #[test]
    fn test_group_by_advisor_sorted_and_merged() {
        let groups = group_by_advisor(&sample(), &AliasTable::new());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].advisor, "DIPAN MEHTA");
        assert_eq!(groups[0].records.len(), 4);
        assert_eq!(groups[1].advisor, "ZARA KHAN");
    }

    #[test]
    fn test_group_total_is_sum_of_totals() {
        let groups = group_by_advisor(&sample(), &AliasTable::new());
        assert_eq!(groups[0].total(), 9000.0);
        assert_eq!(groups[1].total(), 500.0);
    }

    #[test]
    fn test_by_date_ascending() {
        let groups = group_by_advisor(&sample(), &AliasTable::new());
        let dates = groups[0].by_date().unwrap();

        assert_eq!(dates.len(), 2);
        assert_eq!(dates[0].date, d(2022, 9, 30));
        assert_eq!(dates[0].records.len(), 2);
        assert_eq!(dates[0].total(), 6500.0);
        assert_eq!(dates[1].date, d(2023, 3, 31));
        assert_eq!(dates[1].total(), 2500.0);
    }

    #[test]
    fn test_by_date_requires_dates() {
        let records = vec![FeeRecord::new("A B", "C D", 1.0)];
        let groups = group_by_advisor(&records, &AliasTable::new());
        let err = groups[0].by_date().unwrap_err();
        assert!(err.to_string().contains("no invoice date"));
    }

    #[test]
    fn test_team_members_unique_excluding_advisor() {
        let groups = group_by_advisor(&sample(), &AliasTable::new());
        let members = groups[0].team_members("DIPAN MEHTA");

        assert_eq!(
            members,
            vec![
                TeamMember { payee: "RAVI SHAH".into(), pan: Some("RRRPS1111R".into()) },
                TeamMember { payee: "ANU JOSHI".into(), pan: Some("AAAPJ2222J".into()) },
            ]
        );
    }

    #[test]
    fn test_team_members_excludes_legal_name() {
        let records = vec![
            FeeRecord::new("MITESH DOSHI", "MITESH JAYANTIBHAI DOSHI", 1.0),
            FeeRecord::new("MITESH DOSHI", "KIRAN DOSHI", 1.0),
        ];
        let groups = group_by_advisor(&records, &AliasTable::new());
        let members = groups[0].team_members("MITESH JAYANTIBHAI DOSHI");
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].payee, "KIRAN DOSHI");
    }

    #[test]
    fn test_alias_and_legal_name_share_a_group() {
        let records = vec![
            FeeRecord::new("MITESH DOSHI", "KIRAN DOSHI", 100.0),
            FeeRecord::new("MITESH JAYANTIBHAI DOSHI", "NEHA DOSHI", 200.0),
            FeeRecord::new("mitesh doshi", "MITESH DOSHI", 300.0),
        ];
        let groups = group_by_advisor(&records, &AliasTable::with_defaults());

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].advisor, "MITESH DOSHI");
        assert_eq!(groups[0].total(), 600.0);

        let members = groups[0].team_members("MITESH JAYANTIBHAI DOSHI");
        let names: Vec<&str> = members.iter().map(|m| m.payee.as_str()).collect();
        assert_eq!(names, vec!["KIRAN DOSHI", "NEHA DOSHI"]);

        // Without the alias they stay apart
        assert_eq!(group_by_advisor(&records, &AliasTable::new()).len(), 2);
    }

    #[test]
    fn test_solo_advisor_has_no_team() {
        let groups = group_by_advisor(&sample(), &AliasTable::new());
        assert!(groups[1].team_members("ZARA KHAN").is_empty());
    }
}
