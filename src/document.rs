// 📄 Document Model - paragraphs, runs, tables, page breaks
//
// Letters and invoices are assembled into this model first, then handed to
// the `.docx` writer. Keeping the model separate lets tests assert on
// content without unzipping anything.

use serde::{Deserialize, Serialize};

// ============================================================================
// RUNS & PARAGRAPHS
// ============================================================================

/// A span of text with uniform formatting. `\n` inside `text` is a line break.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    /// Half-points are a writer detail; this is points
    pub size_pt: Option<u32>,
    pub font: Option<String>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Run {
            text: text.into(),
            bold: false,
            size_pt: None,
            font: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn size(mut self, pt: u32) -> Self {
        self.size_pt = Some(pt);
        self
    }

    pub fn font(mut self, font: &str) -> Self {
        self.font = Some(font.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Named paragraph styles the writer defines in `styles.xml`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParagraphStyle {
    Normal,
    Title,
    Heading1,
    ListNumber,
}

impl ParagraphStyle {
    pub fn style_id(&self) -> &'static str {
        match self {
            ParagraphStyle::Normal => "Normal",
            ParagraphStyle::Title => "Title",
            ParagraphStyle::Heading1 => "Heading1",
            ParagraphStyle::ListNumber => "ListNumber",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub style: ParagraphStyle,
    pub alignment: Alignment,
}

impl Paragraph {
    pub fn new() -> Self {
        Paragraph {
            runs: Vec::new(),
            style: ParagraphStyle::Normal,
            alignment: Alignment::Left,
        }
    }

    /// Single plain run
    pub fn text(text: impl Into<String>) -> Self {
        Paragraph::new().run(Run::new(text))
    }

    pub fn run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn style(mut self, style: ParagraphStyle) -> Self {
        self.style = style;
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TABLES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
}

impl TableCell {
    pub fn text(text: impl Into<String>) -> Self {
        TableCell {
            paragraphs: vec![Paragraph::text(text)],
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        TableCell {
            paragraphs: vec![Paragraph::new().run(Run::new(text).bold())],
        }
    }

    pub fn empty() -> Self {
        TableCell {
            paragraphs: vec![Paragraph::new()],
        }
    }

    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column widths in inches; empty = split the text width evenly
    pub widths_in: Vec<f32>,
    pub rows: Vec<Vec<TableCell>>,
}

impl Table {
    pub fn new() -> Self {
        Table {
            widths_in: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn widths(mut self, widths_in: &[f32]) -> Self {
        self.widths_in = widths_in.to_vec();
        self
    }

    /// Bold header row
    pub fn header(mut self, headers: &[&str]) -> Self {
        self.rows
            .push(headers.iter().map(|h| TableCell::bold(*h)).collect());
        self
    }

    pub fn row(mut self, cells: Vec<TableCell>) -> Self {
        self.rows.push(cells);
        self
    }

    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.len())
            .max()
            .unwrap_or(0)
            .max(self.widths_in.len())
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// DOCUMENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    PageBreak,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    /// Default font for the whole document (styles.xml)
    pub font: String,
    /// Default size in points
    pub font_size_pt: u32,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(title: &str, font: &str) -> Self {
        Document {
            title: title.to_string(),
            font: font.to_string(),
            font_size_pt: 11,
            blocks: Vec::new(),
        }
    }

    pub fn paragraph(&mut self, paragraph: Paragraph) -> &mut Self {
        self.blocks.push(Block::Paragraph(paragraph));
        self
    }

    /// Plain paragraph shorthand
    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.paragraph(Paragraph::text(text))
    }

    /// Empty paragraph, used as vertical space
    pub fn blank(&mut self) -> &mut Self {
        self.paragraph(Paragraph::new())
    }

    pub fn table(&mut self, table: Table) -> &mut Self {
        self.blocks.push(Block::Table(table));
        self
    }

    pub fn page_break(&mut self) -> &mut Self {
        self.blocks.push(Block::PageBreak);
        self
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    pub fn page_breaks(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::PageBreak))
            .count()
    }

    /// Text of every paragraph and cell, one block per line, tables as `a | b`
    pub fn plain_text(&self) -> String {
        let mut out = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Paragraph(p) => out.push(p.plain_text()),
                Block::Table(t) => {
                    for row in &t.rows {
                        out.push(
                            row.iter()
                                .map(|c| c.plain_text())
                                .collect::<Vec<_>>()
                                .join(" | "),
                        );
                    }
                }
                Block::PageBreak => out.push("\u{c}".to_string()),
            }
        }
        out.join("\n")
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_builder() {
        let p = Paragraph::new()
            .run(Run::new("Date: ").bold())
            .run(Run::new("01-04-2023").font("Arial").size(12))
            .align(Alignment::Center)
            .style(ParagraphStyle::Heading1);

        assert_eq!(p.plain_text(), "Date: 01-04-2023");
        assert!(p.runs[0].bold);
        assert_eq!(p.runs[1].font.as_deref(), Some("Arial"));
        assert_eq!(p.runs[1].size_pt, Some(12));
        assert_eq!(p.style.style_id(), "Heading1");
    }

    #[test]
    fn test_table_column_count() {
        let t = Table::new()
            .header(&["NAME", "PAN"])
            .row(vec![TableCell::text("A"), TableCell::text("B"), TableCell::empty()]);
        assert_eq!(t.column_count(), 3);
        assert!(t.rows[0][0].paragraphs[0].runs[0].bold);

        let t = Table::new().widths(&[0.5, 4.7, 1.3]);
        assert_eq!(t.column_count(), 3);
    }

    #[test]
    fn test_document_plain_text() {
        let mut doc = Document::new("Invoice", "Calibri");
        doc.text("Hello")
            .table(Table::new().header(&["A", "B"]))
            .page_break()
            .blank();

        assert_eq!(doc.plain_text(), "Hello\nA | B\n\u{c}\n");
        assert_eq!(doc.page_breaks(), 1);
        assert_eq!(doc.tables().count(), 1);
    }
}
