// 🔎 Name Resolution - typed advisor name → master entry
//
// Names are typed by hand in the fee sheets and disagree with the master in
// case, spacing, middle names and spelling. Resolution order:
//   1. alias table (nickname → legal name)
//   2. exact match, case-insensitive, whitespace-normalised
//   3. first + last token both contained in the master name
//   4. not found → placeholder text, never an error

use crate::directory::{AdvisorDirectory, MasterEntry};
use crate::format::normalize_whitespace;
use crate::records::FeeRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ADDRESS_NOT_FOUND: &str = "Address not found";
pub const PAN_NOT_FOUND: &str = "PAN not found";

// ============================================================================
// ALIAS TABLE
// ============================================================================

/// Known spellings that must be corrected before lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
}

impl From<BTreeMap<String, String>> for AliasTable {
    fn from(map: BTreeMap<String, String>) -> Self {
        let mut table = AliasTable::new();
        for (alias, legal_name) in &map {
            table.insert(alias, legal_name);
        }
        table
    }
}

impl From<AliasTable> for BTreeMap<String, String> {
    fn from(table: AliasTable) -> Self {
        table.aliases
    }
}

impl AliasTable {
    pub fn new() -> Self {
        AliasTable::default()
    }

    /// The two corrections the fee sheets have always needed
    pub fn with_defaults() -> Self {
        let mut table = AliasTable::new();
        table.insert("MITESH DOSHI", "MITESH JAYANTIBHAI DOSHI");
        table.insert("MITUL MORABIA", "MITUL MOHANLAL MORABIYA");
        table
    }

    pub fn insert(&mut self, alias: &str, legal_name: &str) {
        self.aliases
            .insert(normalize_key(alias), legal_name.trim().to_string());
    }

    /// Legal name for `name`, or `name` itself (trimmed) when no alias applies
    pub fn apply(&self, name: &str) -> String {
        self.aliases
            .get(&normalize_key(name))
            .cloned()
            .unwrap_or_else(|| normalize_whitespace(name))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Comparison key: uppercase, single-spaced
pub fn normalize_key(name: &str) -> String {
    normalize_whitespace(name).to_uppercase()
}

// ============================================================================
// RESOLUTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMethod {
    /// Case-insensitive equality
    Exact,
    /// First and last token both found in the master name
    Tokens,
    /// Nothing matched
    NotFound,
}

#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    /// Name after alias correction (what the letter is addressed to)
    pub legal_name: String,
    pub entry: Option<&'a MasterEntry>,
    pub method: MatchMethod,
}

impl<'a> Resolution<'a> {
    pub fn is_found(&self) -> bool {
        self.entry.is_some()
    }

    /// Address text, or the placeholder
    pub fn address(&self) -> &str {
        self.entry
            .map(|e| e.address.as_str())
            .filter(|a| !a.is_empty())
            .unwrap_or(ADDRESS_NOT_FOUND)
    }

    /// Master PAN, if any
    pub fn pan(&self) -> Option<&str> {
        self.entry.and_then(|e| e.pan.as_deref())
    }
}

/// Resolve `name` against the directory. First match in table order wins.
pub fn resolve<'a>(
    name: &str,
    directory: &'a AdvisorDirectory,
    aliases: &AliasTable,
) -> Resolution<'a> {
    let legal_name = aliases.apply(name);
    let key = normalize_key(&legal_name);

    if let Some(entry) = directory
        .entries()
        .iter()
        .find(|e| normalize_key(&e.name) == key)
    {
        return Resolution {
            legal_name,
            entry: Some(entry),
            method: MatchMethod::Exact,
        };
    }

    let tokens: Vec<&str> = key.split(' ').filter(|t| !t.is_empty()).collect();
    if tokens.len() >= 2 {
        let first = tokens[0];
        let last = tokens[tokens.len() - 1];

        if let Some(entry) = directory.entries().iter().find(|e| {
            let candidate = normalize_key(&e.name);
            candidate.contains(first) && candidate.contains(last)
        }) {
            return Resolution {
                legal_name,
                entry: Some(entry),
                method: MatchMethod::Tokens,
            };
        }
    }

    Resolution {
        legal_name,
        entry: None,
        method: MatchMethod::NotFound,
    }
}

// ============================================================================
// PAN LOOKUP ACROSS FEE RECORDS
// ============================================================================

/// Find the advisor's own PAN among fee records where they appear as payee.
///
/// A payee matches when the names are equal after normalisation, or when
/// every token of the advisor name is contained in (or contains) some token
/// of the payee name. The first matching record with a PAN wins.
pub fn pan_from_records<'r>(advisor: &str, records: &'r [FeeRecord]) -> Option<&'r str> {
    let wanted = normalize_key(advisor);
    if wanted.is_empty() {
        return None;
    }
    let wanted_tokens: Vec<&str> = wanted.split(' ').collect();

    records
        .iter()
        .filter(|r| {
            let payee = normalize_key(&r.payee);
            if payee.is_empty() {
                return false;
            }
            if payee == wanted {
                return true;
            }
            let payee_tokens: Vec<&str> = payee.split(' ').collect();
            wanted_tokens.iter().all(|w| {
                payee_tokens
                    .iter()
                    .any(|p| p.contains(w) || w.contains(p))
            })
        })
        .find_map(|r| r.pan.as_deref().filter(|p| !p.trim().is_empty()))
}

/// Advisor PAN for an invoice: fee records first, then the master, then the placeholder
pub fn resolve_pan<'a>(resolution: &'a Resolution<'_>, advisor: &str, records: &'a [FeeRecord]) -> &'a str {
    pan_from_records(advisor, records)
        .or_else(|| pan_from_records(&resolution.legal_name, records))
        .or_else(|| resolution.pan())
        .unwrap_or(PAN_NOT_FOUND)
}

// ============================================================================
// SUGGESTIONS
// ============================================================================

/// Closest master name by edit distance, for "did you mean" log hints
pub fn closest_name<'a>(name: &str, directory: &'a AdvisorDirectory) -> Option<(&'a str, usize)> {
    let key = normalize_key(name);
    directory
        .entries()
        .iter()
        .map(|e| (e.name.as_str(), levenshtein_distance(&key, &normalize_key(&e.name))))
        .min_by_key(|(_, d)| *d)
}

/// Levenshtein distance = minimum number of single-character edits
/// (insertions, deletions, substitutions) to change one string into another
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two-row DP
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ============================================================================
// TESTS
// ============================================================================
