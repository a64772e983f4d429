//! Office Math Markup serialization
//!
//! Lowers a compiled [`MathNode`] tree into OMML (`m:` namespace) elements,
//! producing the native, editable equation objects Word expects. One
//! `m:oMath` element is written per math run; the paragraph decides inline
//! vs. display placement.

use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::core::node::{BarPosition, MathNode};
use crate::utils::error::GenerateResult;

/// Write a full `m:oMath` element wrapping the node sequence.
pub fn write_omath<W: Write>(writer: &mut Writer<W>, nodes: &[MathNode]) -> GenerateResult<()> {
    writer.write_event(Event::Start(BytesStart::new("m:oMath")))?;
    for node in nodes {
        write_node(writer, node)?;
    }
    writer.write_event(Event::End(BytesEnd::new("m:oMath")))?;
    Ok(())
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &MathNode) -> GenerateResult<()> {
    match node {
        MathNode::Run(text) => {
            writer.write_event(Event::Start(BytesStart::new("m:r")))?;
            let mut t = BytesStart::new("m:t");
            t.push_attribute(("xml:space", "preserve"));
            writer.write_event(Event::Start(t))?;
            writer.write_event(Event::Text(BytesText::new(text)))?;
            writer.write_event(Event::End(BytesEnd::new("m:t")))?;
            writer.write_event(Event::End(BytesEnd::new("m:r")))?;
        }

        MathNode::Fraction {
            numerator,
            denominator,
        } => {
            writer.write_event(Event::Start(BytesStart::new("m:f")))?;
            write_wrapped(writer, "m:num", numerator)?;
            write_wrapped(writer, "m:den", denominator)?;
            writer.write_event(Event::End(BytesEnd::new("m:f")))?;
        }

        MathNode::Radical { content, degree } => {
            writer.write_event(Event::Start(BytesStart::new("m:rad")))?;
            match degree {
                Some(deg) => {
                    write_wrapped(writer, "m:deg", deg)?;
                }
                None => {
                    writer.write_event(Event::Start(BytesStart::new("m:radPr")))?;
                    let mut hide = BytesStart::new("m:degHide");
                    hide.push_attribute(("m:val", "1"));
                    writer.write_event(Event::Empty(hide))?;
                    writer.write_event(Event::End(BytesEnd::new("m:radPr")))?;
                    writer.write_event(Event::Empty(BytesStart::new("m:deg")))?;
                }
            }
            write_wrapped(writer, "m:e", content)?;
            writer.write_event(Event::End(BytesEnd::new("m:rad")))?;
        }

        MathNode::SuperScript { base, superscript } => {
            writer.write_event(Event::Start(BytesStart::new("m:sSup")))?;
            write_wrapped(writer, "m:e", base)?;
            write_wrapped(writer, "m:sup", superscript)?;
            writer.write_event(Event::End(BytesEnd::new("m:sSup")))?;
        }

        MathNode::SubScript { base, subscript } => {
            writer.write_event(Event::Start(BytesStart::new("m:sSub")))?;
            write_wrapped(writer, "m:e", base)?;
            write_wrapped(writer, "m:sub", subscript)?;
            writer.write_event(Event::End(BytesEnd::new("m:sSub")))?;
        }

        MathNode::SubSuperScript {
            base,
            subscript,
            superscript,
        } => {
            writer.write_event(Event::Start(BytesStart::new("m:sSubSup")))?;
            write_wrapped(writer, "m:e", base)?;
            write_wrapped(writer, "m:sub", subscript)?;
            write_wrapped(writer, "m:sup", superscript)?;
            writer.write_event(Event::End(BytesEnd::new("m:sSubSup")))?;
        }

        MathNode::Bar { position, content } => {
            writer.write_event(Event::Start(BytesStart::new("m:bar")))?;
            writer.write_event(Event::Start(BytesStart::new("m:barPr")))?;
            let mut pos = BytesStart::new("m:pos");
            pos.push_attribute((
                "m:val",
                match position {
                    BarPosition::Top => "top",
                    BarPosition::Bottom => "bot",
                },
            ));
            writer.write_event(Event::Empty(pos))?;
            writer.write_event(Event::End(BytesEnd::new("m:barPr")))?;
            write_wrapped(writer, "m:e", content)?;
            writer.write_event(Event::End(BytesEnd::new("m:bar")))?;
        }
    }
    Ok(())
}

/// Write a node sequence wrapped in a container element (`m:num`, `m:e`, ...).
fn write_wrapped<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    nodes: &[MathNode],
) -> GenerateResult<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    for node in nodes {
        write_node(writer, node)?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::latex::compile;

    fn render(nodes: &[MathNode]) -> String {
        let mut writer = Writer::new(Vec::new());
        write_omath(&mut writer, nodes).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_run_serialization() {
        let xml = render(&[MathNode::run("x")]);
        assert_eq!(
            xml,
            "<m:oMath><m:r><m:t xml:space=\"preserve\">x</m:t></m:r></m:oMath>"
        );
    }

    #[test]
    fn test_fraction_structure() {
        let xml = render(&compile(r"\frac{a}{b}"));
        assert!(xml.contains("<m:f><m:num>"));
        assert!(xml.contains("</m:num><m:den>"));
        assert!(xml.contains("</m:den></m:f>"));
    }

    #[test]
    fn test_plain_sqrt_hides_degree() {
        let xml = render(&compile(r"\sqrt{x}"));
        assert!(xml.contains("<m:radPr><m:degHide m:val=\"1\"/></m:radPr>"));
        assert!(xml.contains("<m:deg/>"));
    }

    #[test]
    fn test_nth_root_writes_degree() {
        let xml = render(&compile(r"\sqrt[3]{x}"));
        assert!(!xml.contains("m:degHide"));
        assert!(xml.contains("<m:deg><m:r>"));
    }

    #[test]
    fn test_scripts() {
        let xml = render(&compile("x^2"));
        assert!(xml.contains("<m:sSup><m:e>"));

        let xml = render(&compile("x_i"));
        assert!(xml.contains("<m:sSub><m:e>"));

        let xml = render(&compile("x_{i}^{2}"));
        assert!(xml.contains("<m:sSubSup>"));
        assert!(xml.contains("</m:sub><m:sup>"));
    }

    #[test]
    fn test_bar_positions() {
        let xml = render(&compile(r"\overline{AB}"));
        assert!(xml.contains("<m:bar><m:barPr><m:pos m:val=\"top\"/>"));

        let xml = render(&compile(r"\underline{x}"));
        assert!(xml.contains("<m:pos m:val=\"bot\"/>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = render(&[MathNode::run("a<b")]);
        assert!(xml.contains("a&lt;b"));
    }
}
