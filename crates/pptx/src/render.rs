//! Slide rendering: turns laid-out boxes into slide XML.

use crate::package::{NS_A, NS_P, NS_R};
use deck_core::{Error, LayoutBox, Result};
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::Cursor;

/// Renders one slide's boxes as a `p:sld` part on the blank layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlideRenderer;

impl SlideRenderer {
    /// Create a new slide renderer.
    pub fn new() -> Self {
        Self
    }

    /// Render the boxes as slide XML, in the given order.
    pub fn render(&self, boxes: &[LayoutBox]) -> Result<String> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        self.write_slide(&mut writer, boxes)
            .map_err(|e| Error::XmlError(format!("Failed to render slide: {}", e)))?;

        String::from_utf8(writer.into_inner().into_inner())
            .map_err(|e| Error::XmlError(format!("Rendered slide is not UTF-8: {}", e)))
    }

    fn write_slide(
        &self,
        writer: &mut Writer<Cursor<Vec<u8>>>,
        boxes: &[LayoutBox],
    ) -> quick_xml::Result<()> {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

        writer
            .create_element("p:sld")
            .with_attribute(("xmlns:a", NS_A))
            .with_attribute(("xmlns:r", NS_R))
            .with_attribute(("xmlns:p", NS_P))
            .write_inner_content(|w| {
                w.create_element("p:cSld").write_inner_content(|w| {
                    w.create_element("p:spTree").write_inner_content(|w| {
                        write_group_header(w)?;
                        // Id 1 belongs to the shape tree itself
                        for (idx, text_box) in boxes.iter().enumerate() {
                            write_text_box(w, idx + 2, text_box)?;
                        }
                        Ok::<(), quick_xml::Error>(())
                    })?;
                    Ok::<(), quick_xml::Error>(())
                })?;
                w.create_element("p:clrMapOvr").write_inner_content(|w| {
                    w.create_element("a:masterClrMapping").write_empty()?;
                    Ok::<(), quick_xml::Error>(())
                })?;
                Ok::<(), quick_xml::Error>(())
            })?;

        Ok(())
    }
}

fn write_group_header<W: std::io::Write>(w: &mut Writer<W>) -> quick_xml::Result<()> {
    w.create_element("p:nvGrpSpPr").write_inner_content(|w| {
        w.create_element("p:cNvPr")
            .with_attribute(("id", "1"))
            .with_attribute(("name", ""))
            .write_empty()?;
        w.create_element("p:cNvGrpSpPr").write_empty()?;
        w.create_element("p:nvPr").write_empty()?;
        Ok::<(), quick_xml::Error>(())
    })?;
    w.create_element("p:grpSpPr").write_inner_content(|w| {
        w.create_element("a:xfrm").write_inner_content(|w| {
            for (name, a, b) in [
                ("a:off", "x", "y"),
                ("a:ext", "cx", "cy"),
                ("a:chOff", "x", "y"),
                ("a:chExt", "cx", "cy"),
            ] {
                w.create_element(name)
                    .with_attribute((a, "0"))
                    .with_attribute((b, "0"))
                    .write_empty()?;
            }
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

/// Write one word-wrapped text box. Boxes with a fill get a solid
/// background; the rest are transparent.
fn write_text_box<W: std::io::Write>(
    w: &mut Writer<W>,
    shape_id: usize,
    text_box: &LayoutBox,
) -> quick_xml::Result<()> {
    let id = shape_id.to_string();
    let name = format!("TextBox {}", shape_id - 1);
    let x = text_box.left.to_string();
    let y = text_box.top.to_string();
    let cx = text_box.width.to_string();
    let cy = text_box.height.to_string();
    let size = (text_box.font_size * 100).to_string();
    let bold = if text_box.bold { "1" } else { "0" };
    let color = text_box.color.hex();

    w.create_element("p:sp").write_inner_content(|w| {
        w.create_element("p:nvSpPr").write_inner_content(|w| {
            w.create_element("p:cNvPr")
                .with_attribute(("id", id.as_str()))
                .with_attribute(("name", name.as_str()))
                .write_empty()?;
            w.create_element("p:cNvSpPr")
                .with_attribute(("txBox", "1"))
                .write_empty()?;
            w.create_element("p:nvPr").write_empty()?;
            Ok::<(), quick_xml::Error>(())
        })?;

        w.create_element("p:spPr").write_inner_content(|w| {
            w.create_element("a:xfrm").write_inner_content(|w| {
                w.create_element("a:off")
                    .with_attribute(("x", x.as_str()))
                    .with_attribute(("y", y.as_str()))
                    .write_empty()?;
                w.create_element("a:ext")
                    .with_attribute(("cx", cx.as_str()))
                    .with_attribute(("cy", cy.as_str()))
                    .write_empty()?;
                Ok::<(), quick_xml::Error>(())
            })?;
            w.create_element("a:prstGeom")
                .with_attribute(("prst", "rect"))
                .write_inner_content(|w| {
                    w.create_element("a:avLst").write_empty()?;
                    Ok::<(), quick_xml::Error>(())
                })?;
            match text_box.fill {
                Some(fill) => write_solid_fill(w, &fill.hex())?,
                None => {
                    w.create_element("a:noFill").write_empty()?;
                }
            }
            Ok::<(), quick_xml::Error>(())
        })?;

        w.create_element("p:txBody").write_inner_content(|w| {
            w.create_element("a:bodyPr")
                .with_attribute(("wrap", "square"))
                .with_attribute(("rtlCol", "0"))
                .write_empty()?;
            w.create_element("a:lstStyle").write_empty()?;
            w.create_element("a:p").write_inner_content(|w| {
                w.create_element("a:r").write_inner_content(|w| {
                    w.create_element("a:rPr")
                        .with_attribute(("lang", "en-US"))
                        .with_attribute(("sz", size.as_str()))
                        .with_attribute(("b", bold))
                        .with_attribute(("dirty", "0"))
                        .write_inner_content(|w| write_solid_fill(w, &color))?;
                    let text = escape_control_chars(&text_box.text);
                    w.create_element("a:t")
                        .write_text_content(BytesText::new(&text))?;
                    Ok::<(), quick_xml::Error>(())
                })?;
                Ok::<(), quick_xml::Error>(())
            })?;
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

/// Replace characters XML 1.0 cannot carry with the `_xHHHH_` form
/// PowerPoint decodes back into the original character.
fn escape_control_chars(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_xml_illegal) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if is_xml_illegal(c) {
            out.push_str(&format!("_x{:04X}_", c as u32));
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

fn is_xml_illegal(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}')
}

fn write_solid_fill<W: std::io::Write>(w: &mut Writer<W>, hex: &str) -> quick_xml::Result<()> {
    w.create_element("a:solidFill").write_inner_content(|w| {
        w.create_element("a:srgbClr")
            .with_attribute(("val", hex))
            .write_empty()?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{BoxKind, Emu, Rgb};

    fn text_box(kind: BoxKind, text: &str, fill: Option<Rgb>) -> LayoutBox {
        LayoutBox {
            kind,
            text: text.to_string(),
            left: Emu(457_200),
            top: Emu(1_371_600),
            width: Emu(8_229_600),
            height: Emu(320_040),
            font_size: 14,
            bold: false,
            color: Rgb(100, 116, 139),
            fill,
        }
    }

    #[test]
    fn test_render_text_box() {
        let xml = SlideRenderer::new()
            .render(&[text_box(BoxKind::Paragraph, "Hello world.", None)])
            .unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
        assert!(xml.contains(r#"<p:cNvPr id="2" name="TextBox 1"/>"#));
        assert!(xml.contains(r#"<p:cNvSpPr txBox="1"/>"#));
        assert!(xml.contains(r#"<a:off x="457200" y="1371600"/>"#));
        assert!(xml.contains(r#"<a:ext cx="8229600" cy="320040"/>"#));
        assert!(xml.contains(r#"<a:bodyPr wrap="square" rtlCol="0"/>"#));
        assert!(xml.contains(r#"sz="1400" b="0""#));
        assert!(xml.contains(r#"<a:srgbClr val="64748B"/>"#));
        assert!(xml.contains("<a:t>Hello world.</a:t>"));
        assert!(xml.contains("<a:noFill/>"));
    }

    #[test]
    fn test_highlight_gets_background() {
        let mut highlight = text_box(BoxKind::Highlight, "Key insight", Some(Rgb(239, 246, 255)));
        highlight.bold = true;
        let xml = SlideRenderer::new().render(&[highlight]).unwrap();

        assert!(xml.contains(
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:solidFill><a:srgbClr val="EFF6FF"/></a:solidFill></p:spPr>"#
        ));
        assert!(xml.contains(r#"b="1""#));
        assert!(!xml.contains("<a:noFill/>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = SlideRenderer::new()
            .render(&[text_box(BoxKind::Paragraph, "a < b & c", None)])
            .unwrap();
        assert!(xml.contains("<a:t>a &lt; b &amp; c</a:t>"));
    }

    #[test]
    fn test_control_characters_are_encoded() {
        let xml = SlideRenderer::new()
            .render(&[text_box(BoxKind::Paragraph, "Bell\u{7} here \u{8} too\u{1f}", None)])
            .unwrap();

        assert!(xml.contains("<a:t>Bell_x0007_ here _x0008_ too_x001F_</a:t>"));
        assert!(!xml.chars().any(is_xml_illegal));
    }

    #[test]
    fn test_plain_text_is_not_reencoded() {
        assert!(matches!(escape_control_chars("tab\tand é"), Cow::Borrowed(_)));
        assert_eq!(escape_control_chars("a\u{0}b"), "a_x0000_b");
    }

    #[test]
    fn test_shape_ids_are_unique_and_ordered() {
        let boxes = vec![
            text_box(BoxKind::Title, "Title", None),
            text_box(BoxKind::Paragraph, "First", None),
            text_box(BoxKind::Paragraph, "Second", None),
        ];
        let xml = SlideRenderer::new().render(&boxes).unwrap();

        let first = xml.find(r#"id="3""#).unwrap();
        let second = xml.find(r#"id="4""#).unwrap();
        assert!(first < second);
        assert!(xml.find("First").unwrap() < xml.find("Second").unwrap());
    }

    #[test]
    fn test_empty_slide() {
        let xml = SlideRenderer::new().render(&[]).unwrap();
        assert!(xml.contains("<p:spTree><p:nvGrpSpPr>"));
        assert!(!xml.contains("<p:sp>"));
        assert!(xml.ends_with("</p:sld>"));
    }
}
