// 🧾 Consolidated Invoice - one instruction note + Annexure A per invoice date
//
// Sections follow the date order of `AdvisorGroup::by_date` (ascending).
// Every section after the first starts on a new page.

use crate::config::CompanyProfile;
use crate::document::{Alignment, Document, Paragraph, ParagraphStyle, Run, Table, TableCell};
use crate::fiscal::FiscalYear;
use crate::format::{file_stem, format_amount, format_date};
use crate::grouping::DateGroup;
use crate::templates;
use chrono::NaiveDate;

/// Column widths of the instruction-note table, in inches
const NOTE_WIDTHS: [f32; 3] = [0.5, 4.7, 1.3];

#[derive(Debug, Clone)]
pub struct InvoiceContext<'a> {
    pub advisor: &'a str,
    pub address_lines: &'a [String],
    pub pan: &'a str,
    pub fiscal_year: &'a FiscalYear,
    pub company: &'a CompanyProfile,
    pub font: &'a str,
    pub payment_days: u32,
}

/// Invoice for every date group, in the order given
pub fn build_invoice(ctx: &InvoiceContext<'_>, dates: &[DateGroup]) -> Document {
    let title = format!("Invoice - {} - {}", ctx.advisor, ctx.fiscal_year);
    let mut doc = Document::new(&title, ctx.font);

    for (i, group) in dates.iter().enumerate() {
        if i > 0 {
            doc.page_break();
        }
        push_instruction_note(&mut doc, ctx, group);
        push_annexure(&mut doc, ctx, group);
    }

    doc
}

fn push_instruction_note(doc: &mut Document, ctx: &InvoiceContext<'_>, group: &DateGroup) {
    let total = format_amount(group.total());

    let mut from = vec!["From:".to_string(), ctx.advisor.to_string()];
    from.extend(ctx.address_lines.iter().cloned());

    doc.paragraph(
        Paragraph::new()
            .run(Run::new(format!("Date: {}", format_date(group.date))).bold().font(ctx.font))
            .align(Alignment::Right),
    )
        .text(from.join("\n"))
        .text(ctx.company.invoice_block())
        .paragraph(
            Paragraph::new()
                .run(Run::new(templates::INSTRUCTION_NOTE).bold().font(ctx.font))
                .align(Alignment::Center),
        )
        .table(
            Table::new()
                .widths(&NOTE_WIDTHS)
                .header(&["Sr. No", "Particulars", "Amount"])
                .row(vec![
                    TableCell::text("1"),
                    TableCell::text(templates::particulars(ctx.fiscal_year.start_year)),
                    TableCell::text(total.clone()),
                ])
                .row(vec![TableCell::empty(), TableCell::bold("Total"), TableCell::bold(total)]),
        )
        .blank()
        .text(templates::invoice_terms(ctx.payment_days))
        .text("Regards,");

    for _ in 0..3 {
        doc.blank();
    }

    doc.text(format!("Name: {}", ctx.advisor))
        .text(format!("PAN: {}", ctx.pan));
}

fn push_annexure(doc: &mut Document, ctx: &InvoiceContext<'_>, group: &DateGroup) {
    let mut table = Table::new().header(&["NAME", "PAN", "Fees", "OUT OF POCKET", "TOTAL"]);

    for record in &group.records {
        table = table.row(vec![
            TableCell::text(record.payee.clone()),
            TableCell::text(record.pan_or_placeholder()),
            TableCell::text(format_amount(record.professional_fees)),
            TableCell::text(format_amount(record.out_of_pocket)),
            TableCell::text(format_amount(record.total_amount)),
        ]);
    }

    table = table.row(vec![
        TableCell::bold("Total"),
        TableCell::empty(),
        TableCell::empty(),
        TableCell::empty(),
        TableCell::bold(format_amount(group.total())),
    ]);

    doc.page_break()
        .paragraph(
            Paragraph::new()
                .run(Run::new(templates::ANNEXURE_TITLE).font(ctx.font))
                .style(ParagraphStyle::Heading1),
        )
        .text(templates::PAYEE_DETAILS_NOTE)
        .table(table);
}

/// `<label>/<prefix>_<Name>.docx`, or `..._<dd-mm-YYYY>.docx` for a single date
pub fn invoice_path(file_prefix: &str, advisor: &str, year: &FiscalYear, date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!(
            "{}/{}_{}_{}.docx",
            year.label,
            file_prefix,
            file_stem(advisor),
            format_date(date)
        ),
        None => format!("{}/{}_{}.docx", year.label, file_prefix, file_stem(advisor)),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::grouping::group_by_advisor;
    use crate::matching::AliasTable;
    use crate::records::FeeRecord;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn records() -> Vec<FeeRecord> {
        vec![
            FeeRecord::new("DIPAN MEHTA", "RAVI SHAH", 0.0)
                .with_pan("RRRPS1111R")
                .with_amounts(1000.0, 250.0, 1250.0)
                .with_date(d(2023, 3, 31)),
            FeeRecord::new("DIPAN MEHTA", "ANU JOSHI", 0.0)
                .with_amounts(120000.0, 0.0, 120000.0)
                .with_date(d(2022, 9, 30)),
            FeeRecord::new("DIPAN MEHTA", "DIPAN MEHTA", 0.0)
                .with_pan("ABCPM1234K")
                .with_amounts(4000.0, 500.0, 4500.0)
                .with_date(d(2022, 9, 30)),
        ]
    }

    fn build(dates: &[DateGroup]) -> Document {
        let config = RunConfig::default();
        let year = FiscalYear::parse("2022-23").unwrap();
        let address = vec!["12 MG Road".to_string(), "Andheri".to_string(), "Mumbai, 400069".to_string()];
        let ctx = InvoiceContext {
            advisor: "DIPAN MEHTA",
            address_lines: &address,
            pan: "ABCPM1234K",
            fiscal_year: &year,
            company: config.company_for(year.start_year).unwrap(),
            font: "Cambria",
            payment_days: 10,
        };
        build_invoice(&ctx, dates)
    }

    #[test]
    fn test_one_section_per_date_in_order() {
        let groups = group_by_advisor(&records(), &AliasTable::new());
        let dates = groups[0].by_date().unwrap();
        let doc = build(&dates);
        let text = doc.plain_text();

        assert_eq!(text.matches("INSTRUCTION NOTE").count(), 2);
        assert_eq!(text.matches("Annexure A").count(), 2);
        // invoice → annexure → invoice → annexure
        assert_eq!(doc.page_breaks(), 3);

        let first = text.find("Date: 30-09-2022").unwrap();
        let second = text.find("Date: 31-03-2023").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_totals_match_grouped_amounts() {
        let groups = group_by_advisor(&records(), &AliasTable::new());
        let dates = groups[0].by_date().unwrap();
        let doc = build(&dates);
        let tables: Vec<&Table> = doc.tables().collect();

        // note, annexure, note, annexure
        assert_eq!(tables.len(), 4);
        assert_eq!(tables[0].rows[1][2].plain_text(), "Rs. 124,500");
        assert_eq!(tables[0].rows[2][2].plain_text(), "Rs. 124,500");
        assert_eq!(tables[1].rows.len(), 4);
        assert_eq!(tables[1].rows[3][4].plain_text(), "Rs. 124,500");
        assert_eq!(tables[3].rows[1][3].plain_text(), "Rs. 250");
        assert_eq!(tables[3].rows[2][4].plain_text(), "Rs. 1,250");
    }

    #[test]
    fn test_instruction_note_content() {
        let groups = group_by_advisor(&records(), &AliasTable::new());
        let dates = groups[0].by_date().unwrap();
        let doc = build(&dates[..1]);
        let text = doc.plain_text();

        assert!(text.contains("From:\nDIPAN MEHTA\n12 MG Road\nAndheri\nMumbai, 400069"));
        assert!(text.contains("To:\nELIXIR EQUITIES PVT. LTD.\n58 MITTAL CHAMBERS,"));
        assert!(text.contains("engagement letter dated 1st April 2022"));
        assert!(text.contains("within 10 working days."));
        assert!(text.contains("Name: DIPAN MEHTA\nPAN: ABCPM1234K"));
        assert!(text.contains("ANU JOSHI | PAN not found | Rs. 120,000 | Rs. 0 | Rs. 120,000"));
        assert_eq!(doc.font, "Cambria");
    }

    #[test]
    fn test_note_table_widths() {
        let groups = group_by_advisor(&records(), &AliasTable::new());
        let doc = build(&groups[0].by_date().unwrap());
        let note = doc.tables().next().unwrap();
        assert_eq!(note.widths_in, vec![0.5, 4.7, 1.3]);
        assert!(note.rows[2][1].paragraphs[0].runs[0].bold);
    }

    #[test]
    fn test_date_right_aligned_and_fonts_pinned() {
        let groups = group_by_advisor(&records(), &AliasTable::new());
        let doc = build(&groups[0].by_date().unwrap()[..1]);
        let paragraphs: Vec<&Paragraph> = doc
            .blocks
            .iter()
            .filter_map(|b| match b {
                crate::document::Block::Paragraph(p) => Some(p),
                _ => None,
            })
            .collect();

        let date = paragraphs[0];
        assert_eq!(date.plain_text(), "Date: 30-09-2022");
        assert_eq!(date.alignment, Alignment::Right);
        assert_eq!(date.runs[0].font.as_deref(), Some("Cambria"));

        let annexure = paragraphs
            .iter()
            .find(|p| p.plain_text() == templates::ANNEXURE_TITLE)
            .unwrap();
        assert_eq!(annexure.style, ParagraphStyle::Heading1);
        assert_eq!(annexure.runs[0].font.as_deref(), Some("Cambria"));
    }

    #[test]
    fn test_invoice_path() {
        let year = FiscalYear::parse("2022-23").unwrap();
        assert_eq!(
            invoice_path("Combined_Invoice", "DIPAN MEHTA", &year, None),
            "2022-23/Combined_Invoice_DIPAN_MEHTA.docx"
        );
        assert_eq!(
            invoice_path("Combined_Invoice", "DIPAN MEHTA", &year, Some(d(2023, 3, 31))),
            "2022-23/Combined_Invoice_DIPAN_MEHTA_31-03-2023.docx"
        );
    }
}
