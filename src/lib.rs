// Engagement Letters - Core Library
// Fee sheets + advisor master → engagement letters and consolidated invoices (.docx)

pub mod fiscal;
pub mod format;
pub mod sheet;      // Spreadsheet input (calamine / csv)
pub mod records;    // Fee records
pub mod directory;  // Advisor master
pub mod matching;   // Name resolution
pub mod address;
pub mod grouping;
pub mod fonts;
pub mod validation;
pub mod document;   // Document model
pub mod docx;       // .docx writer
pub mod templates;
pub mod letter;
pub mod invoice;
pub mod party;      // TDS "Party Name" splitting
pub mod config;
pub mod pipeline;

// Re-export commonly used types
pub use address::{format_address, AddressPolicy};
pub use config::{CompanyProfile, InvoiceOptions, LetterOptions, RunConfig, SheetSpec};
pub use directory::{AdvisorDirectory, MasterColumns, MasterEntry};
pub use document::{Block, Document, Paragraph, Run, Table, TableCell};
pub use docx::{to_bytes, write_docx};
pub use fiscal::FiscalYear;
pub use fonts::{FontChoice, FontPicker};
pub use grouping::{group_by_advisor, AdvisorGroup, DateGroup, TeamMember};
pub use invoice::{build_invoice, InvoiceContext};
pub use letter::{build_engagement_letter, LetterContext};
pub use matching::{resolve, AliasTable, MatchMethod, Resolution, ADDRESS_NOT_FOUND, PAN_NOT_FOUND};
pub use party::{extract_file, extract_party_details, PartyDetails};
pub use pipeline::{run_invoices, run_letters, RunSummary, SheetSummary};
pub use records::{load_fee_records, ColumnNames, FeeRecord};
pub use sheet::{read_sheet, Cell, SheetFormat, SheetReader, SheetTable};
pub use validation::{validate_records, Severity, ValidationIssue, ValidationReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
