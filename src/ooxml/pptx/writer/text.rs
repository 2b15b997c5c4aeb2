//! Text bodies: `bodyPr`, paragraphs, runs and their properties.

use std::fmt::Write as FmtWrite;

use super::context::PartContext;
use super::drawing::write_solid_fill;
use crate::common::Result;
use crate::common::unit::{percent_to_st, pt_to_emu, pt_to_font_size};
use crate::common::xml::escape_xml;
use crate::presentation::rich_text::{
    Autofit, Bullet, Hyperlink, Paragraph, RichText, TextElement, TextWrap,
};
use crate::presentation::style::{Alignment, Font, HorizontalAlignment, Underline, VerticalAlignment};

/// Write `text` as a `tag` element (`p:txBody` on shapes, `a:txBody` in
/// table cells).
pub(crate) fn write_text_body(
    xml: &mut String,
    tag: &str,
    text: &RichText,
    ctx: &mut PartContext<'_>,
) -> Result<()> {
    write!(xml, "<{tag}>")?;
    write_body_pr(xml, text)?;
    xml.push_str("<a:lstStyle/>");
    if text.paragraphs.is_empty() {
        xml.push_str("<a:p/>");
    }
    for paragraph in &text.paragraphs {
        write_paragraph(xml, paragraph, ctx)?;
    }
    write!(xml, "</{tag}>")?;
    Ok(())
}

fn write_body_pr(xml: &mut String, text: &RichText) -> Result<()> {
    xml.push_str("<a:bodyPr");
    let insets = &text.insets;
    write!(
        xml,
        r#" lIns="{}" tIns="{}" rIns="{}" bIns="{}""#,
        pt_to_emu(insets.left),
        pt_to_emu(insets.top),
        pt_to_emu(insets.right),
        pt_to_emu(insets.bottom)
    )?;
    match text.wrap {
        TextWrap::Square => xml.push_str(r#" wrap="square""#),
        TextWrap::None => xml.push_str(r#" wrap="none""#),
    }
    if text.columns > 1 {
        write!(xml, r#" numCol="{}""#, text.columns)?;
    }
    if text.vertical {
        xml.push_str(r#" vert="vert""#);
    }
    let vertical = text
        .paragraphs
        .first()
        .map(|p| p.alignment.vertical)
        .unwrap_or_default();
    if vertical != VerticalAlignment::Top {
        write!(xml, r#" anchor="{}""#, vertical.xml_value())?;
    }
    xml.push_str(r#" rtlCol="0">"#);
    match text.autofit {
        Autofit::None => {},
        Autofit::Normal => xml.push_str("<a:normAutofit/>"),
        Autofit::Shape => xml.push_str("<a:spAutoFit/>"),
    }
    xml.push_str("</a:bodyPr>");
    Ok(())
}

pub(crate) fn write_paragraph(
    xml: &mut String,
    paragraph: &Paragraph,
    ctx: &mut PartContext<'_>,
) -> Result<()> {
    xml.push_str("<a:p>");
    write_paragraph_props(xml, paragraph)?;
    for element in &paragraph.elements {
        match element {
            TextElement::Run(run) => {
                xml.push_str("<a:r>");
                write_run_props(
                    xml,
                    "a:rPr",
                    &run.font,
                    run.language.as_deref(),
                    run.hyperlink.as_ref(),
                    ctx,
                )?;
                write!(xml, "<a:t>{}</a:t></a:r>", escape_xml(&run.text))?;
            },
            TextElement::Break(font) => {
                xml.push_str("<a:br>");
                write_run_props(xml, "a:rPr", font, None, None, ctx)?;
                xml.push_str("</a:br>");
            },
        }
    }
    write_run_props(xml, "a:endParaRPr", &paragraph.font, None, None, ctx)?;
    xml.push_str("</a:p>");
    Ok(())
}

fn write_paragraph_props(xml: &mut String, paragraph: &Paragraph) -> Result<()> {
    xml.push_str("<a:pPr");
    write_alignment_attrs(xml, &paragraph.alignment)?;
    xml.push('>');
    if let Some(spacing) = paragraph.line_spacing {
        write!(
            xml,
            r#"<a:lnSpc><a:spcPct val="{}"/></a:lnSpc>"#,
            percent_to_st(spacing)
        )?;
    }
    if let Some(before) = paragraph.space_before {
        write!(
            xml,
            r#"<a:spcBef><a:spcPts val="{}"/></a:spcBef>"#,
            pt_to_font_size(before)
        )?;
    }
    if let Some(after) = paragraph.space_after {
        write!(
            xml,
            r#"<a:spcAft><a:spcPts val="{}"/></a:spcAft>"#,
            pt_to_font_size(after)
        )?;
    }
    match &paragraph.bullet {
        Bullet::None => xml.push_str("<a:buNone/>"),
        Bullet::Character { char, font, color } => {
            if let Some(color) = color {
                xml.push_str("<a:buClr>");
                super::drawing::write_color(xml, *color)?;
                xml.push_str("</a:buClr>");
            }
            write!(
                xml,
                r#"<a:buFont typeface="{}"/><a:buChar char="{}"/>"#,
                escape_xml(font),
                escape_xml(char)
            )?;
        },
        Bullet::Numeric { style, start_at } => {
            write!(xml, r#"<a:buAutoNum type="{}""#, style.xml_value())?;
            if *start_at > 1 {
                write!(xml, r#" startAt="{start_at}""#)?;
            }
            xml.push_str("/>");
        },
    }
    xml.push_str("</a:pPr>");
    Ok(())
}

/// `algn`, `lvl`, margins and indent of a paragraph or list level.
pub(crate) fn write_alignment_attrs(xml: &mut String, alignment: &Alignment) -> Result<()> {
    if alignment.horizontal != HorizontalAlignment::Left {
        write!(xml, r#" algn="{}""#, alignment.horizontal.xml_value())?;
    }
    if alignment.level > 0 {
        write!(xml, r#" lvl="{}""#, alignment.level)?;
    }
    if alignment.margin_left != 0.0 {
        write!(xml, r#" marL="{}""#, pt_to_emu(alignment.margin_left))?;
    }
    if alignment.margin_right != 0.0 {
        write!(xml, r#" marR="{}""#, pt_to_emu(alignment.margin_right))?;
    }
    if alignment.indent != 0.0 {
        write!(xml, r#" indent="{}""#, pt_to_emu(alignment.indent))?;
    }
    if alignment.rtl {
        xml.push_str(r#" rtl="1""#);
    }
    Ok(())
}

/// Character properties as `tag` (`a:rPr`, `a:endParaRPr`, `a:defRPr`).
pub(crate) fn write_run_props(
    xml: &mut String,
    tag: &str,
    font: &Font,
    language: Option<&str>,
    hyperlink: Option<&Hyperlink>,
    ctx: &mut PartContext<'_>,
) -> Result<()> {
    write!(xml, "<{tag}")?;
    write_font_attrs(xml, font, language)?;
    xml.push('>');
    write_font_children(xml, font)?;
    if let Some(hyperlink) = hyperlink {
        write_hlink_click(xml, hyperlink, ctx)?;
    }
    write!(xml, "</{tag}>")?;
    Ok(())
}

/// Character properties that cannot carry a hyperlink (list styles).
pub(crate) fn write_font_props(xml: &mut String, tag: &str, font: &Font) -> Result<()> {
    write!(xml, "<{tag}")?;
    write_font_attrs(xml, font, None)?;
    xml.push('>');
    write_font_children(xml, font)?;
    write!(xml, "</{tag}>")?;
    Ok(())
}

fn write_font_attrs(xml: &mut String, font: &Font, language: Option<&str>) -> Result<()> {
    if let Some(lang) = language {
        write!(xml, r#" lang="{}""#, escape_xml(lang))?;
    }
    write!(xml, r#" sz="{}""#, pt_to_font_size(font.size))?;
    if font.bold {
        xml.push_str(r#" b="1""#);
    }
    if font.italic {
        xml.push_str(r#" i="1""#);
    }
    if font.underline != Underline::None {
        write!(xml, r#" u="{}""#, font.underline.xml_value())?;
    }
    if font.strikethrough {
        xml.push_str(r#" strike="sngStrike""#);
    }
    if let Some(baseline) = font.baseline.xml_value() {
        write!(xml, r#" baseline="{baseline}""#)?;
    }
    if font.character_spacing != 0.0 {
        write!(xml, r#" spc="{}""#, (font.character_spacing * 100.0).round() as i64)?;
    }
    xml.push_str(r#" dirty="0""#);
    Ok(())
}

fn write_font_children(xml: &mut String, font: &Font) -> Result<()> {
    write_solid_fill(xml, font.color)?;
    write!(
        xml,
        r#"<{} typeface="{}"/>"#,
        font.format.element(),
        escape_xml(&font.name)
    )?;
    Ok(())
}

/// `a:hlinkClick`, registering the relationship on the current part.
pub(crate) fn write_hlink_click(
    xml: &mut String,
    hyperlink: &Hyperlink,
    ctx: &mut PartContext<'_>,
) -> Result<()> {
    let (r_id, action) = ctx.hyperlink(hyperlink)?;
    write!(xml, r#"<a:hlinkClick r:id="{r_id}""#)?;
    if let Some(action) = action {
        write!(xml, r#" action="{action}""#)?;
    }
    if let Some(tooltip) = &hyperlink.tooltip {
        write!(xml, r#" tooltip="{}""#, escape_xml(tooltip))?;
    }
    xml.push_str("/>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::PackURI;
    use crate::ooxml::pptx::writer::context::WriteState;
    use crate::presentation::style::{Baseline, Color};

    fn body(text: &RichText) -> String {
        let mut state = WriteState::new();
        let mut ctx = PartContext::new(&mut state, PackURI::new("/ppt/slides/slide1.xml").unwrap());
        let mut xml = String::new();
        write_text_body(&mut xml, "p:txBody", text, &mut ctx).unwrap();
        xml
    }

    #[test]
    fn test_bold_colored_run() {
        let mut text = RichText::new();
        let run = text.create_text_run("Thank you");
        run.font = Font::new()
            .with_bold(true)
            .with_size(60.0)
            .with_color(Color::from_argb(0xFFE0_6B20));
        let xml = body(&text);
        assert!(xml.contains(r#"<a:rPr sz="6000" b="1" dirty="0">"#));
        assert!(xml.contains(r#"<a:srgbClr val="E06B20"/>"#));
        assert!(xml.contains("<a:t>Thank you</a:t>"));
    }

    #[test]
    fn test_subscript_and_escaping() {
        let mut text = RichText::new();
        text.create_text_run("H<2>O").font.baseline = Baseline::Subscript;
        let xml = body(&text);
        assert!(xml.contains(r#"baseline="-25000""#));
        assert!(xml.contains("<a:t>H&lt;2&gt;O</a:t>"));
    }

    #[test]
    fn test_run_hyperlink_registers_external_relationship() {
        let mut state = WriteState::new();
        let owner = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        let mut ctx = PartContext::new(&mut state, owner.clone());
        let mut text = RichText::new();
        text.create_text_run("site").hyperlink =
            Some(Hyperlink::url("https://example.com").with_tooltip("go"));
        let mut xml = String::new();
        write_text_body(&mut xml, "p:txBody", &text, &mut ctx).unwrap();
        assert!(xml.contains(r#"<a:hlinkClick r:id="rId1" tooltip="go"/>"#));
        let rels = state.package.rels().relationships_for(&owner).unwrap();
        assert!(rels.get("rId1").unwrap().is_external());
    }

    #[test]
    fn test_paragraph_properties_order() {
        let mut text = RichText::new();
        let paragraph = text.active_paragraph();
        paragraph.alignment.horizontal = HorizontalAlignment::Center;
        paragraph.line_spacing = Some(150.0);
        paragraph.space_after = Some(6.0);
        paragraph.bullet = Bullet::Character {
            char: "•".to_string(),
            font: "Arial".to_string(),
            color: None,
        };
        let xml = body(&text);
        assert!(xml.contains(
            r#"<a:pPr algn="ctr"><a:lnSpc><a:spcPct val="150000"/></a:lnSpc><a:spcAft><a:spcPts val="600"/></a:spcAft><a:buFont typeface="Arial"/><a:buChar char="•"/></a:pPr>"#
        ));
    }
}
