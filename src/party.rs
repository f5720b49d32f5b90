// 🪪 Party Details - split "NAME PAN ADDRESS" strings from TDS exports
//
// The TDS summary puts name, PAN and address in one "Party Name" cell. The
// PAN is the only reliable delimiter: text before it is the name, text after
// it is the address.

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_PARTY_COLUMN: &str = "Party Name";

const PAN_SEARCH: &str = r"[A-Z]{5}[0-9]{4}[A-Z]";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyDetails {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "PAN")]
    pub pan: String,
    #[serde(rename = "Address")]
    pub address: String,
}

pub struct PartyExtractor {
    pan: Regex,
}

impl PartyExtractor {
    pub fn new() -> Result<Self> {
        Ok(PartyExtractor {
            pan: Regex::new(PAN_SEARCH).context("Invalid PAN pattern")?,
        })
    }

    /// Split on the first PAN; `None` when the text has no PAN
    pub fn extract(&self, text: &str) -> Option<PartyDetails> {
        let found = self.pan.find(text)?;
        Some(PartyDetails {
            name: text[..found.start()].trim().to_string(),
            pan: found.as_str().to_string(),
            address: text[found.end()..].trim().to_string(),
        })
    }
}

/// One-off extraction; build a `PartyExtractor` when splitting many strings
pub fn extract_party_details(text: &str) -> Result<Option<PartyDetails>> {
    Ok(PartyExtractor::new()?.extract(text))
}

/// Read `column` from the input CSV and write `Name,PAN,Address` rows.
///
/// Rows without a PAN are dropped. Returns the number of rows written.
pub fn extract_file(input: &Path, output: &Path, column: &str) -> Result<usize> {
    let extractor = PartyExtractor::new()?;

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(input)
        .with_context(|| format!("Failed to open CSV file: {}", input.display()))?;

    let headers = rdr.headers().context("Failed to read CSV headers")?.clone();
    let col = headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim().eq_ignore_ascii_case(column))
        .ok_or_else(|| anyhow!("{}: no '{}' column", input.display(), column))?;

    let mut wtr = csv::Writer::from_path(output)
        .with_context(|| format!("Failed to create CSV file: {}", output.display()))?;

    let mut read = 0;
    let mut written = 0;
    for result in rdr.records() {
        let record = result.with_context(|| format!("Failed to read row {} of {}", read + 2, input.display()))?;
        read += 1;

        match record.get(col).and_then(|text| extractor.extract(text)) {
            Some(details) => {
                wtr.serialize(&details).context("Failed to write CSV row")?;
                written += 1;
            }
            None => debug!(row = read + 1, "no PAN in party name, skipped"),
        }
    }
    wtr.flush().context("Failed to flush CSV output")?;

    info!(read, written, output = %output.display(), "extracted party details");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_extract_party_details() {
        let details = extract_party_details("RAVI SHAH RRRPS1111R 12 MG Road, Mumbai")
            .unwrap()
            .unwrap();
        assert_eq!(details.name, "RAVI SHAH");
        assert_eq!(details.pan, "RRRPS1111R");
        assert_eq!(details.address, "12 MG Road, Mumbai");
    }

    #[test]
    fn test_first_pan_wins_and_missing_pan() {
        let extractor = PartyExtractor::new().unwrap();
        let details = extractor.extract("A B AAAPJ2222J BBBPK3333K").unwrap();
        assert_eq!(details.pan, "AAAPJ2222J");
        assert_eq!(details.address, "BBBPK3333K");

        assert!(extractor.extract("RAVI SHAH, Mumbai").is_none());
        assert!(extractor.extract("").is_none());
    }

    #[test]
    fn test_extract_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("tds.csv");
        let output = dir.path().join("parties.csv");
        fs::write(
            &input,
            "Sr,Party Name,Amount\n\
             1,RAVI SHAH RRRPS1111R 12 MG Road,100\n\
             2,NO PAN HERE,200\n\
             3,\"ANU JOSHI AAAPJ2222J Flat 4, Andheri\",300\n",
        )
        .unwrap();

        let written = extract_file(&input, &output, "party name").unwrap();
        assert_eq!(written, 2);

        let content = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Name,PAN,Address");
        assert_eq!(lines[1], "RAVI SHAH,RRRPS1111R,12 MG Road");
        assert_eq!(lines[2], "ANU JOSHI,AAAPJ2222J,\"Flat 4, Andheri\"");
    }

    #[test]
    fn test_extract_file_missing_column() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("tds.csv");
        fs::write(&input, "Sr,Amount\n1,100\n").unwrap();

        let err = extract_file(&input, &dir.path().join("out.csv"), DEFAULT_PARTY_COLUMN).unwrap_err();
        assert!(err.to_string().contains("Party Name"));
    }
}
