// 📝 DOCX Writer - Document model → Office Open XML package
//
// A .docx is a zip of XML parts. The body is generated from the model;
// every other part comes from `template`.

pub mod template;

use crate::document::{Alignment, Block, Document, Paragraph, ParagraphStyle, Run, Table};
use anyhow::{Context, Result};
use quick_xml::escape::escape;
use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A4 width minus two 1" margins, in twentieths of a point
const TEXT_WIDTH_TWIPS: u32 = 11906 - 2 * 1440;
const TWIPS_PER_INCH: f32 = 1440.0;

// ============================================================================
// PACKAGE
// ============================================================================

/// Write `doc` to `path`, creating parent directories
pub fn write_docx(doc: &Document, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_package(doc, file).with_context(|| format!("Failed to write {}", path.display()))?;

    debug!(path = %path.display(), blocks = doc.blocks.len(), "wrote docx");
    Ok(())
}

/// Serialize `doc` to an in-memory .docx
pub fn to_bytes(doc: &Document) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_package(doc, Cursor::new(&mut buf))?;
    Ok(buf)
}

fn write_package<W: Write + Seek>(doc: &Document, sink: W) -> Result<()> {
    let mut zip = ZipWriter::new(sink);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, String); 7] = [
        ("[Content_Types].xml", template::content_types_xml().to_string()),
        ("_rels/.rels", template::package_rels_xml().to_string()),
        ("docProps/core.xml", template::core_props_xml(&doc.title)),
        ("word/_rels/document.xml.rels", template::document_rels_xml().to_string()),
        ("word/styles.xml", template::styles_xml(&doc.font, doc.font_size_pt)),
        ("word/numbering.xml", template::numbering_xml().to_string()),
        ("word/document.xml", document_xml(doc)),
    ];

    for (name, content) in &parts {
        zip.start_file(*name, options)
            .with_context(|| format!("Failed to add part {}", name))?;
        zip.write_all(content.as_bytes())?;
    }

    zip.finish().context("Failed to finish zip archive")?;
    Ok(())
}

// ============================================================================
// BODY
// ============================================================================

/// `word/document.xml`
pub fn document_xml(doc: &Document) -> String {
    let mut xml = String::with_capacity(16 * 1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(&format!(r#"<w:document xmlns:w="{}"><w:body>"#, template::W_NS));

    for block in &doc.blocks {
        match block {
            Block::Paragraph(p) => push_paragraph(&mut xml, p),
            Block::Table(t) => push_table(&mut xml, t),
            Block::PageBreak => xml.push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#),
        }
    }

    // Word wants a paragraph between a final table and the section properties
    if matches!(doc.blocks.last(), Some(Block::Table(_))) {
        xml.push_str("<w:p/>");
    }

    xml.push_str(concat!(
        r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/>"#,
        r#"<w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/>"#,
        r#"</w:sectPr></w:body></w:document>"#
    ));
    xml
}

fn push_paragraph(xml: &mut String, p: &Paragraph) {
    xml.push_str("<w:p>");

    let has_props = p.style != ParagraphStyle::Normal || p.alignment != Alignment::Left;
    if has_props {
        xml.push_str("<w:pPr>");
        if p.style != ParagraphStyle::Normal {
            xml.push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, p.style.style_id()));
        }
        match p.alignment {
            Alignment::Left => {}
            Alignment::Center => xml.push_str(r#"<w:jc w:val="center"/>"#),
            Alignment::Right => xml.push_str(r#"<w:jc w:val="right"/>"#),
        }
        xml.push_str("</w:pPr>");
    }

    for run in &p.runs {
        push_run(xml, run);
    }

    xml.push_str("</w:p>");
}

fn push_run(xml: &mut String, run: &Run) {
    xml.push_str("<w:r>");

    if run.bold || run.size_pt.is_some() || run.font.is_some() {
        xml.push_str("<w:rPr>");
        if let Some(font) = &run.font {
            let font = escape(font.as_str());
            xml.push_str(&format!(
                r#"<w:rFonts w:ascii="{f}" w:hAnsi="{f}" w:eastAsia="{f}" w:cs="{f}"/>"#,
                f = font
            ));
        }
        if run.bold {
            xml.push_str("<w:b/>");
        }
        if let Some(pt) = run.size_pt {
            xml.push_str(&format!(r#"<w:sz w:val="{hp}"/><w:szCs w:val="{hp}"/>"#, hp = pt * 2));
        }
        xml.push_str("</w:rPr>");
    }

    for (i, line) in run.text.split('\n').enumerate() {
        if i > 0 {
            xml.push_str("<w:br/>");
        }
        if !line.is_empty() {
            xml.push_str(r#"<w:t xml:space="preserve">"#);
            xml.push_str(&escape(line));
            xml.push_str("</w:t>");
        }
    }

    xml.push_str("</w:r>");
}

fn push_table(xml: &mut String, table: &Table) {
    let columns = table.column_count().max(1);
    let widths: Vec<u32> = (0..columns)
        .map(|i| match table.widths_in.get(i) {
            Some(w) => (w * TWIPS_PER_INCH).round() as u32,
            None => TEXT_WIDTH_TWIPS / columns as u32,
        })
        .collect();

    xml.push_str("<w:tbl><w:tblPr>");
    xml.push_str(r#"<w:tblStyle w:val="TableGrid"/>"#);
    xml.push_str(r#"<w:tblW w:w="0" w:type="auto"/>"#);
    xml.push_str(r#"<w:tblLook w:val="04A0" w:firstRow="1" w:lastRow="0" w:firstColumn="1" w:lastColumn="0" w:noHBand="0" w:noVBand="1"/>"#);
    xml.push_str("</w:tblPr><w:tblGrid>");
    for w in &widths {
        xml.push_str(&format!(r#"<w:gridCol w:w="{}"/>"#, w));
    }
    xml.push_str("</w:tblGrid>");

    for row in &table.rows {
        xml.push_str("<w:tr>");
        for col in 0..columns {
            xml.push_str(&format!(
                r#"<w:tc><w:tcPr><w:tcW w:w="{}" w:type="dxa"/></w:tcPr>"#,
                widths[col]
            ));
            match row.get(col) {
                Some(cell) if !cell.paragraphs.is_empty() => {
                    for p in &cell.paragraphs {
                        push_paragraph(xml, p);
                    }
                }
                // Every cell needs at least one paragraph
                _ => xml.push_str("<w:p/>"),
            }
            xml.push_str("</w:tc>");
        }
        xml.push_str("</w:tr>");
    }

    xml.push_str("</w:tbl>");
}

// ============================================================================
// TESTS
// ============================================================================
