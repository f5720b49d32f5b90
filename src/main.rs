use anyhow::{anyhow, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

use engagement_letters::party::DEFAULT_PARTY_COLUMN;
use engagement_letters::{extract_file, run_invoices, run_letters, RunConfig, RunSummary, VERSION};

const DEFAULT_CONFIG: &str = "engagement-letters.json";

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("letters") => {
            let config = load_config(args.get(2))?;
            println!("✉️  Engagement Letters - {} sheet(s)", config.sheets.len());
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            let summary = run_letters(&config)?;
            print_summary(&summary, "letters");
        }
        Some("invoices") => {
            let config = load_config(args.get(2))?;
            println!("🧾 Consolidated Invoices - {} sheet(s)", config.sheets.len());
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            let summary = run_invoices(&config)?;
            print_summary(&summary, "invoices");
        }
        Some("extract") => {
            let input = args
                .get(2)
                .ok_or_else(|| anyhow!("usage: engagement-letters extract <input.csv> [output.csv]"))?;
            let output = args
                .get(3)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("extracted_details.csv"));

            let written = extract_file(Path::new(input), &output, DEFAULT_PARTY_COLUMN)?;
            println!("✓ Wrote {} parties to {}", written, output.display());
        }
        Some("init") => {
            let path = args.get(2).map(String::as_str).unwrap_or(DEFAULT_CONFIG);
            RunConfig::default().save(path)?;
            println!("✓ Default configuration written to {}", path);
        }
        _ => print_usage(),
    }

    Ok(())
}

/// Explicit path, else `engagement-letters.json` if present, else built-in defaults
fn load_config(arg: Option<&String>) -> Result<RunConfig> {
    match arg {
        Some(path) => RunConfig::from_file(path),
        None if Path::new(DEFAULT_CONFIG).exists() => RunConfig::from_file(DEFAULT_CONFIG),
        None => {
            let config = RunConfig::default();
            config.check()?;
            Ok(config)
        }
    }
}

fn print_summary(summary: &RunSummary, kind: &str) {
    println!();
    for sheet in &summary.sheets {
        println!(
            "📂 {} ({}): {} records, {} advisors → {} {}",
            sheet.sheet,
            sheet.fiscal_year,
            sheet.records,
            sheet.advisors,
            sheet.documents.len(),
            kind
        );
        for name in &sheet.unresolved {
            println!("   ⚠️  Address not found: {}", name);
        }
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ {} {} written", summary.documents(), kind);
    if summary.unresolved() > 0 {
        println!("⚠️  {} advisor(s) without a master address", summary.unresolved());
    }
    if summary.validation_issues() > 0 {
        println!("⚠️  {} validation issue(s), see log", summary.validation_issues());
    }
}

fn print_usage() {
    println!("engagement-letters {}", VERSION);
    println!();
    println!("Usage:");
    println!("  engagement-letters letters  [config.json]             Engagement letter per advisor");
    println!("  engagement-letters invoices [config.json]             Consolidated invoice per advisor");
    println!("  engagement-letters extract  <input.csv> [output.csv]  Split 'Party Name' into Name/PAN/Address");
    println!("  engagement-letters init     [config.json]             Write the default configuration");
}
