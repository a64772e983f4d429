//! `word/document.xml` serialization
//!
//! Turns the document model into WordprocessingML. Only the features the
//! assembler produces are emitted: styled paragraphs, text runs, equation
//! objects, bordered full-width tables and section margins.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::docx::omml::write_omath;
use crate::docx::{DocBlock, DocParagraph, DocRun, DocTable, DocxDocument};
use crate::utils::error::GenerateResult;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_M: &str = "http://schemas.openxmlformats.org/officeDocument/2006/math";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Page margin in twips (1 inch), as in the original layout.
const PAGE_MARGIN: &str = "1440";

/// Usable page width in twips for table grid columns (US Letter minus
/// margins).
const CONTENT_WIDTH: u32 = 9360;

/// Serialize the document into the `word/document.xml` part.
pub fn document_xml(doc: &DocxDocument) -> GenerateResult<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut root = BytesStart::new("w:document");
    root.push_attribute(("xmlns:w", NS_W));
    root.push_attribute(("xmlns:m", NS_M));
    root.push_attribute(("xmlns:r", NS_R));
    writer.write_event(Event::Start(root))?;
    writer.write_event(Event::Start(BytesStart::new("w:body")))?;

    for block in &doc.blocks {
        match block {
            DocBlock::Paragraph(p) => write_paragraph(&mut writer, p)?,
            DocBlock::Table(t) => write_table(&mut writer, t)?,
        }
    }

    write_section_properties(&mut writer)?;

    writer.write_event(Event::End(BytesEnd::new("w:body")))?;
    writer.write_event(Event::End(BytesEnd::new("w:document")))?;
    Ok(writer.into_inner())
}

fn write_paragraph<W: Write>(writer: &mut Writer<W>, p: &DocParagraph) -> GenerateResult<()> {
    writer.write_event(Event::Start(BytesStart::new("w:p")))?;

    let props = &p.props;
    let has_props = props.heading.is_some()
        || props.justify.is_some()
        || props.indent_left.is_some()
        || props.spacing_before.is_some()
        || props.spacing_after.is_some()
        || props.bottom_border;

    if has_props {
        writer.write_event(Event::Start(BytesStart::new("w:pPr")))?;

        if let Some(depth) = props.heading {
            let style_id = format!("Heading{}", depth.clamp(1, 6));
            let mut style = BytesStart::new("w:pStyle");
            style.push_attribute(("w:val", style_id.as_str()));
            writer.write_event(Event::Empty(style))?;
        }
        if props.bottom_border {
            writer.write_event(Event::Start(BytesStart::new("w:pBdr")))?;
            let mut bottom = BytesStart::new("w:bottom");
            bottom.push_attribute(("w:val", "single"));
            bottom.push_attribute(("w:sz", "6"));
            bottom.push_attribute(("w:space", "1"));
            bottom.push_attribute(("w:color", "auto"));
            writer.write_event(Event::Empty(bottom))?;
            writer.write_event(Event::End(BytesEnd::new("w:pBdr")))?;
        }
        if props.spacing_before.is_some() || props.spacing_after.is_some() {
            let before = props.spacing_before.map(|v| v.to_string());
            let after = props.spacing_after.map(|v| v.to_string());
            let mut spacing = BytesStart::new("w:spacing");
            if let Some(ref before) = before {
                spacing.push_attribute(("w:before", before.as_str()));
            }
            if let Some(ref after) = after {
                spacing.push_attribute(("w:after", after.as_str()));
            }
            writer.write_event(Event::Empty(spacing))?;
        }
        if let Some(indent) = props.indent_left {
            let left = indent.to_string();
            let mut ind = BytesStart::new("w:ind");
            ind.push_attribute(("w:left", left.as_str()));
            writer.write_event(Event::Empty(ind))?;
        }
        if let Some(justify) = props.justify {
            let mut jc = BytesStart::new("w:jc");
            jc.push_attribute(("w:val", justify.as_str()));
            writer.write_event(Event::Empty(jc))?;
        }

        writer.write_event(Event::End(BytesEnd::new("w:pPr")))?;
    }

    for run in &p.children {
        match run {
            DocRun::Text(text_run) => {
                writer.write_event(Event::Start(BytesStart::new("w:r")))?;

                let has_formatting = text_run.bold
                    || text_run.italics
                    || text_run.font.is_some()
                    || text_run.size.is_some();
                if has_formatting {
                    writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;
                    if let Some(font) = text_run.font {
                        let mut fonts = BytesStart::new("w:rFonts");
                        fonts.push_attribute(("w:ascii", font));
                        fonts.push_attribute(("w:hAnsi", font));
                        writer.write_event(Event::Empty(fonts))?;
                    }
                    if text_run.bold {
                        writer.write_event(Event::Empty(BytesStart::new("w:b")))?;
                    }
                    if text_run.italics {
                        writer.write_event(Event::Empty(BytesStart::new("w:i")))?;
                    }
                    if let Some(size) = text_run.size {
                        let val = size.to_string();
                        let mut sz = BytesStart::new("w:sz");
                        sz.push_attribute(("w:val", val.as_str()));
                        writer.write_event(Event::Empty(sz))?;
                    }
                    writer.write_event(Event::End(BytesEnd::new("w:rPr")))?;
                }

                let mut t = BytesStart::new("w:t");
                t.push_attribute(("xml:space", "preserve"));
                writer.write_event(Event::Start(t))?;
                writer.write_event(Event::Text(BytesText::new(&text_run.text)))?;
                writer.write_event(Event::End(BytesEnd::new("w:t")))?;
                writer.write_event(Event::End(BytesEnd::new("w:r")))?;
            }
            DocRun::Math(nodes) => write_omath(writer, nodes)?,
        }
    }

    writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    Ok(())
}

fn write_table<W: Write>(writer: &mut Writer<W>, table: &DocTable) -> GenerateResult<()> {
    writer.write_event(Event::Start(BytesStart::new("w:tbl")))?;

    writer.write_event(Event::Start(BytesStart::new("w:tblPr")))?;
    let mut width = BytesStart::new("w:tblW");
    width.push_attribute(("w:w", "5000"));
    width.push_attribute(("w:type", "pct"));
    writer.write_event(Event::Empty(width))?;
    writer.write_event(Event::Start(BytesStart::new("w:tblBorders")))?;
    for side in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
        let mut border = BytesStart::new(side);
        border.push_attribute(("w:val", "single"));
        border.push_attribute(("w:sz", "4"));
        border.push_attribute(("w:space", "0"));
        border.push_attribute(("w:color", "auto"));
        writer.write_event(Event::Empty(border))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:tblBorders")))?;
    writer.write_event(Event::End(BytesEnd::new("w:tblPr")))?;

    writer.write_event(Event::Start(BytesStart::new("w:tblGrid")))?;
    let col_width = (CONTENT_WIDTH / table.columns.max(1) as u32).to_string();
    for _ in 0..table.columns {
        let mut col = BytesStart::new("w:gridCol");
        col.push_attribute(("w:w", col_width.as_str()));
        writer.write_event(Event::Empty(col))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:tblGrid")))?;

    let cell_pct = (5000 / table.columns.max(1) as u32).to_string();
    for row in &table.rows {
        writer.write_event(Event::Start(BytesStart::new("w:tr")))?;
        for cell in &row.cells {
            writer.write_event(Event::Start(BytesStart::new("w:tc")))?;
            writer.write_event(Event::Start(BytesStart::new("w:tcPr")))?;
            let mut tc_width = BytesStart::new("w:tcW");
            tc_width.push_attribute(("w:w", cell_pct.as_str()));
            tc_width.push_attribute(("w:type", "pct"));
            writer.write_event(Event::Empty(tc_width))?;
            writer.write_event(Event::End(BytesEnd::new("w:tcPr")))?;
            write_paragraph(writer, &cell.content)?;
            writer.write_event(Event::End(BytesEnd::new("w:tc")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("w:tr")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("w:tbl")))?;
    Ok(())
}

fn write_section_properties<W: Write>(writer: &mut Writer<W>) -> GenerateResult<()> {
    writer.write_event(Event::Start(BytesStart::new("w:sectPr")))?;
    let mut margins = BytesStart::new("w:pgMar");
    margins.push_attribute(("w:top", PAGE_MARGIN));
    margins.push_attribute(("w:right", PAGE_MARGIN));
    margins.push_attribute(("w:bottom", PAGE_MARGIN));
    margins.push_attribute(("w:left", PAGE_MARGIN));
    writer.write_event(Event::Empty(margins))?;
    writer.write_event(Event::End(BytesEnd::new("w:sectPr")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{DocCell, DocRow, Justify, ParagraphProps, TextRun};

    fn render(doc: &DocxDocument) -> String {
        String::from_utf8(document_xml(doc).unwrap()).unwrap()
    }

    #[test]
    fn test_empty_document_has_body_and_section() {
        let xml = render(&DocxDocument::default());
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
        assert!(xml.contains("<w:body>"));
        assert!(xml.contains("<w:pgMar"));
    }

    #[test]
    fn test_heading_paragraph_style() {
        let doc = DocxDocument {
            blocks: vec![DocBlock::Paragraph(DocParagraph {
                props: ParagraphProps {
                    heading: Some(2),
                    ..Default::default()
                },
                children: vec![DocRun::Text(TextRun::new("T"))],
            })],
        };
        let xml = render(&doc);
        assert!(xml.contains("<w:pStyle w:val=\"Heading2\"/>"));
        assert!(xml.contains("<w:t xml:space=\"preserve\">T</w:t>"));
    }

    #[test]
    fn test_centered_paragraph_and_spacing() {
        let doc = DocxDocument {
            blocks: vec![DocBlock::Paragraph(DocParagraph {
                props: ParagraphProps {
                    justify: Some(Justify::Center),
                    spacing_before: Some(200),
                    spacing_after: Some(200),
                    ..Default::default()
                },
                children: Vec::new(),
            })],
        };
        let xml = render(&doc);
        assert!(xml.contains("<w:jc w:val=\"center\"/>"));
        assert!(xml.contains("<w:spacing w:before=\"200\" w:after=\"200\"/>"));
    }

    #[test]
    fn test_bold_run_formatting() {
        let doc = DocxDocument {
            blocks: vec![DocBlock::Paragraph(DocParagraph::new(vec![DocRun::Text(
                TextRun {
                    text: "b".to_string(),
                    bold: true,
                    ..Default::default()
                },
            )]))],
        };
        let xml = render(&doc);
        assert!(xml.contains("<w:rPr><w:b/></w:rPr>"));
    }

    #[test]
    fn test_table_structure() {
        let cell = |text: &str| DocCell {
            content: DocParagraph::new(vec![DocRun::Text(TextRun::new(text))]),
        };
        let doc = DocxDocument {
            blocks: vec![DocBlock::Table(DocTable {
                columns: 2,
                rows: vec![
                    DocRow {
                        cells: vec![cell("a"), cell("b")],
                    },
                    DocRow {
                        cells: vec![cell("1"), cell("2")],
                    },
                ],
            })],
        };
        let xml = render(&doc);
        assert!(xml.contains("<w:tblW w:w=\"5000\" w:type=\"pct\"/>"));
        assert_eq!(xml.matches("<w:gridCol").count(), 2);
        assert_eq!(xml.matches("<w:tr>").count(), 2);
        assert_eq!(xml.matches("<w:tc>").count(), 4);
        assert!(xml.contains("<w:tcW w:w=\"2500\" w:type=\"pct\"/>"));
    }

    #[test]
    fn test_text_escaping() {
        let doc = DocxDocument {
            blocks: vec![DocBlock::Paragraph(DocParagraph::new(vec![DocRun::Text(
                TextRun::new("a < b & c"),
            )]))],
        };
        let xml = render(&doc);
        assert!(xml.contains("a &lt; b &amp; c"));
    }
}
