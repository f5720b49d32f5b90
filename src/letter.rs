// ✉️ Engagement Letter - one contract per advisor per fiscal year
//
// Letter body, 13 numbered terms and a signature table on the first pages;
// Annexure A (team members) after a page break.

use crate::config::CompanyProfile;
use crate::document::{Alignment, Document, Paragraph, ParagraphStyle, Run, Table, TableCell};
use crate::fiscal::FiscalYear;
use crate::format::{file_stem, letter_date};
use crate::grouping::TeamMember;
use crate::templates;

/// Everything a letter needs, already resolved
#[derive(Debug, Clone)]
pub struct LetterContext<'a> {
    /// Alias-corrected advisor name
    pub legal_name: &'a str,
    /// Output of `format_address`
    pub address_lines: &'a [String],
    pub pan: &'a str,
    pub team: &'a [TeamMember],
    pub fiscal_year: &'a FiscalYear,
    pub company: &'a CompanyProfile,
    pub font: &'a str,
}

pub fn build_engagement_letter(ctx: &LetterContext<'_>) -> Document {
    let start = letter_date(ctx.fiscal_year.start_date());
    let title = format!("Engagement Letter - {} - {}", ctx.legal_name, ctx.fiscal_year);
    let mut doc = Document::new(&title, ctx.font);

    doc.paragraph(
        Paragraph::text(templates::LETTER_TITLE)
            .style(ParagraphStyle::Title)
            .align(Alignment::Center),
    )
    .blank()
    .text(start.clone())
    .text(format!(
        "To,\n{},\n{}",
        ctx.legal_name,
        ctx.address_lines.join("\n")
    ))
    .text(templates::LETTER_SUBJECT)
    .text(templates::introduction(&ctx.company.name))
    .text(templates::APPOINTMENT)
    .paragraph(
        Paragraph::new()
            .run(Run::new(templates::TERMS_HEADING).size(12))
            .style(ParagraphStyle::Heading1),
    );

    for term in templates::contract_terms(&start) {
        doc.paragraph(Paragraph::text(term).style(ParagraphStyle::ListNumber));
    }

    doc.table(signature_table(ctx));

    doc.page_break()
        .paragraph(
            Paragraph::new()
                .run(Run::new(templates::ANNEXURE_TITLE).bold())
                .align(Alignment::Center),
        )
        .text(templates::TEAM_MEMBERS_NOTE)
        .table(team_table(ctx.team));

    doc
}

fn signature_table(ctx: &LetterContext<'_>) -> Table {
    let company = format!(
        "For {},\n\n\n\n{}\n{}",
        ctx.company.name, ctx.company.signatory, ctx.company.designation
    );
    let advisor = format!("I Accept\n\n\n\nName: {}\nPAN : {}", ctx.legal_name, ctx.pan);

    Table::new().row(vec![TableCell::text(company), TableCell::text(advisor)])
}

/// `PAYEE | PAN | SIGNATURE`; two blank rows to fill in by hand when empty
fn team_table(team: &[TeamMember]) -> Table {
    let mut table = Table::new().header(&["PAYEE", "PAN", "SIGNATURE"]);

    if team.is_empty() {
        for _ in 0..2 {
            table = table.row(vec![TableCell::empty(), TableCell::empty(), TableCell::empty()]);
        }
        return table;
    }

    for member in team {
        table = table.row(vec![
            TableCell::text(member.payee.clone()),
            TableCell::text(member.pan.clone().unwrap_or_default()),
            TableCell::empty(),
        ]);
    }
    table
}

/// `<folder_prefix>-<label>/<file_prefix>_<Name>_<label>.docx`, relative
pub fn letter_path(folder_prefix: &str, file_prefix: &str, legal_name: &str, year: &FiscalYear) -> String {
    format!(
        "{}-{}/{}_{}_{}.docx",
        folder_prefix,
        year.label,
        file_prefix,
        file_stem(legal_name),
        year.label
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::document::Block;

    fn build(team: &[TeamMember]) -> Document {
        let config = RunConfig::default();
        let year = FiscalYear::parse("2022-23").unwrap();
        let address = vec![
            "12 MG Road".to_string(),
            "Andheri".to_string(),
            "Mumbai".to_string(),
            "400069".to_string(),
        ];
        let ctx = LetterContext {
            legal_name: "DIPAN MEHTA",
            address_lines: &address,
            pan: "ABCPM1234K",
            team,
            fiscal_year: &year,
            company: config.company_for(year.start_year).unwrap(),
            font: "Roboto",
        };
        build_engagement_letter(&ctx)
    }

    #[test]
    fn test_letter_body() {
        let doc = build(&[]);
        let text = doc.plain_text();

        assert!(text.starts_with("ENGAGEMENT LETTER\n\nApril 01, 2022\n"));
        assert!(text.contains("To,\nDIPAN MEHTA,\n12 MG Road\nAndheri\nMumbai\n400069"));
        assert!(text.contains("ELIXIR EQUITIES PVT. LTD. (hereinafter referred to as “the Company”)"));
        assert!(text.contains("one year from April 01, 2022,"));
        assert_eq!(doc.font, "Roboto");
    }

    #[test]
    fn test_title_and_terms_heading_styles() {
        let doc = build(&[]);
        let styled: Vec<&Paragraph> = doc
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(p) if p.style != ParagraphStyle::Normal && p.style != ParagraphStyle::ListNumber => Some(p),
                _ => None,
            })
            .collect();

        assert_eq!(styled.len(), 2);
        assert_eq!(styled[0].style, ParagraphStyle::Title);
        assert_eq!(styled[0].alignment, Alignment::Center);
        assert_eq!(styled[0].plain_text(), "ENGAGEMENT LETTER");
        assert_eq!(styled[1].style, ParagraphStyle::Heading1);
        assert_eq!(styled[1].plain_text(), templates::TERMS_HEADING);
    }

    #[test]
    fn test_thirteen_numbered_terms() {
        let doc = build(&[]);
        let numbered = doc
            .blocks
            .iter()
            .filter(|b| matches!(b, Block::Paragraph(p) if p.style == ParagraphStyle::ListNumber))
            .count();
        assert_eq!(numbered, 13);
    }

    #[test]
    fn test_signature_table() {
        let doc = build(&[]);
        let sign = doc.tables().next().unwrap();

        assert_eq!(sign.rows.len(), 1);
        assert_eq!(
            sign.rows[0][0].plain_text(),
            "For ELIXIR EQUITIES PVT. LTD.,\n\n\n\nDipan Mehta\nDirector"
        );
        assert_eq!(
            sign.rows[0][1].plain_text(),
            "I Accept\n\n\n\nName: DIPAN MEHTA\nPAN : ABCPM1234K"
        );
    }

    #[test]
    fn test_annexure_after_page_break() {
        let team = vec![
            TeamMember { payee: "RAVI SHAH".into(), pan: Some("RRRPS1111R".into()) },
            TeamMember { payee: "ANU JOSHI".into(), pan: None },
        ];
        let doc = build(&team);

        assert_eq!(doc.page_breaks(), 1);
        let annexure = doc.tables().nth(1).unwrap();
        assert_eq!(annexure.rows.len(), 3);
        assert_eq!(annexure.rows[1][0].plain_text(), "RAVI SHAH");
        assert_eq!(annexure.rows[1][1].plain_text(), "RRRPS1111R");
        assert_eq!(annexure.rows[2][1].plain_text(), "");

        let text = doc.plain_text();
        let brk = text.find('\u{c}').unwrap();
        assert!(text[brk..].contains("Annexure A"));
    }

    #[test]
    fn test_empty_team_gets_blank_rows() {
        let doc = build(&[]);
        let annexure = doc.tables().nth(1).unwrap();
        assert_eq!(annexure.rows.len(), 3);
        assert!(annexure.rows[1].iter().all(|c| c.plain_text().is_empty()));
    }

    #[test]
    fn test_letter_path() {
        let year = FiscalYear::parse("2018/19").unwrap();
        assert_eq!(
            letter_path("EEPL", "Engagement_Letter", "DIPAN MEHTA", &year),
            "EEPL-2018-19/Engagement_Letter_DIPAN_MEHTA_2018-19.docx"
        );
    }
}
