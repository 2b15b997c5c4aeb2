//! Text bodies: `bodyPr`, paragraphs, runs and their properties.

use super::context::ReadContext;
use super::drawing::read_color_choice;
use super::events::{Element, XmlReader, next_in};
use crate::common::Result;
use crate::common::unit::{emu_to_pt, font_size_to_pt, st_to_percent};
use crate::presentation::rich_text::{
    Autofit, Bullet, Hyperlink, Insets, NumberingStyle, Paragraph, RichText, Run, TextElement,
    TextWrap,
};
use crate::presentation::style::{
    Alignment, Baseline, Font, FontFormat, HorizontalAlignment, Underline, VerticalAlignment,
};

/// A `p:txBody` or `a:txBody`.
pub(crate) fn read_text_body<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    ctx: &ReadContext<'_, '_>,
) -> Result<RichText> {
    let mut text = RichText {
        paragraphs: Vec::new(),
        ..Default::default()
    };
    let mut anchor = VerticalAlignment::Top;
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"bodyPr" => anchor = read_body_pr(reader, &child, &mut text)?,
            b"p" => text.paragraphs.push(read_paragraph(reader, &child, ctx)?),
            _ => child.skip(reader)?,
        }
    }
    if text.paragraphs.is_empty() {
        text.paragraphs.push(Paragraph::default());
    }
    for paragraph in &mut text.paragraphs {
        paragraph.alignment.vertical = anchor;
    }
    Ok(text)
}

fn read_body_pr<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    text: &mut RichText,
) -> Result<VerticalAlignment> {
    let defaults = Insets::default();
    let inset = |name: &[u8], fallback: f64| -> Result<f64> {
        Ok(el.attr_parse::<i64>(name)?.map(emu_to_pt).unwrap_or(fallback))
    };
    text.insets = Insets {
        left: inset(b"lIns", defaults.left)?,
        top: inset(b"tIns", defaults.top)?,
        right: inset(b"rIns", defaults.right)?,
        bottom: inset(b"bIns", defaults.bottom)?,
    };
    text.wrap = match el.attr(b"wrap")?.as_deref() {
        Some("none") => TextWrap::None,
        _ => TextWrap::Square,
    };
    text.columns = el.attr_parse(b"numCol")?.unwrap_or(1).max(1);
    text.vertical = el
        .attr(b"vert")?
        .is_some_and(|v| v != "horz");
    let anchor = el
        .attr(b"anchor")?
        .map(|v| VerticalAlignment::from_xml_value(&v))
        .unwrap_or(VerticalAlignment::Top);

    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"normAutofit" => text.autofit = Autofit::Normal,
            b"spAutoFit" => text.autofit = Autofit::Shape,
            b"noAutofit" => text.autofit = Autofit::None,
            _ => {},
        }
        child.skip(reader)?;
    }
    Ok(anchor)
}

pub(crate) fn read_paragraph<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    ctx: &ReadContext<'_, '_>,
) -> Result<Paragraph> {
    let mut paragraph = Paragraph::default();
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"pPr" => read_paragraph_props(reader, &child, &mut paragraph)?,
            b"r" | b"fld" => {
                let run = read_run(reader, &child, ctx)?;
                paragraph.elements.push(TextElement::Run(run));
            },
            b"br" => {
                let mut font = Font::default();
                while let Some(props) = next_in(reader, &child)? {
                    if props.local_name() == b"rPr" {
                        font = read_run_props(reader, &props, ctx)?.font;
                    } else {
                        props.skip(reader)?;
                    }
                }
                paragraph.elements.push(TextElement::Break(font));
            },
            b"endParaRPr" => paragraph.font = read_run_props(reader, &child, ctx)?.font,
            _ => child.skip(reader)?,
        }
    }
    Ok(paragraph)
}

fn read_run<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>, ctx: &ReadContext<'_, '_>) -> Result<Run> {
    let mut run = Run::default();
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"rPr" => {
                let props = read_run_props(reader, &child, ctx)?;
                run.font = props.font;
                run.language = props.language;
                run.hyperlink = props.hyperlink;
            },
            b"t" => run.text.push_str(&child.text(reader)?),
            _ => child.skip(reader)?,
        }
    }
    Ok(run)
}

fn read_paragraph_props<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    paragraph: &mut Paragraph,
) -> Result<()> {
    paragraph.alignment = read_alignment_attrs(el)?;
    let mut bullet_font: Option<String> = None;
    let mut bullet_color = None;
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"lnSpc" => paragraph.line_spacing = read_spacing(reader, &child)?.map(|(pct, _)| pct),
            b"spcBef" => paragraph.space_before = read_spacing(reader, &child)?.map(|(_, pts)| pts),
            b"spcAft" => paragraph.space_after = read_spacing(reader, &child)?.map(|(_, pts)| pts),
            b"buNone" => {
                paragraph.bullet = Bullet::None;
                child.skip(reader)?;
            },
            b"buClr" => bullet_color = read_color_choice(reader, &child)?,
            b"buFont" => {
                bullet_font = child.attr(b"typeface")?;
                child.skip(reader)?;
            },
            b"buChar" => {
                paragraph.bullet = Bullet::Character {
                    char: child.attr(b"char")?.unwrap_or_default(),
                    font: String::new(),
                    color: None,
                };
                child.skip(reader)?;
            },
            b"buAutoNum" => {
                paragraph.bullet = Bullet::Numeric {
                    style: child
                        .attr(b"type")?
                        .map(|v| NumberingStyle::from_xml_value(&v))
                        .unwrap_or_default(),
                    start_at: child.attr_parse(b"startAt")?.unwrap_or(1),
                };
                child.skip(reader)?;
            },
            _ => child.skip(reader)?,
        }
    }
    if let Bullet::Character { font, color, .. } = &mut paragraph.bullet {
        *font = bullet_font.unwrap_or_else(|| "Arial".to_string());
        *color = bullet_color;
    }
    Ok(())
}

/// `a:spcPct` as a percentage or `a:spcPts` as points, whichever is given.
fn read_spacing<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Option<(f64, f64)>> {
    let mut spacing = None;
    while let Some(child) = next_in(reader, el)? {
        let value = child.attr_parse::<i64>(b"val")?;
        match (child.local_name(), value) {
            (b"spcPct", Some(st)) => spacing = Some((st_to_percent(st), 0.0)),
            (b"spcPts", Some(pts)) => spacing = Some((100.0, pts as f64 / 100.0)),
            _ => {},
        }
        child.skip(reader)?;
    }
    Ok(spacing)
}

/// `algn`, `lvl`, margins and indent of a paragraph or list level.
pub(crate) fn read_alignment_attrs(el: &Element<'_>) -> Result<Alignment> {
    Ok(Alignment {
        horizontal: el
            .attr(b"algn")?
            .map(|v| HorizontalAlignment::from_xml_value(&v))
            .unwrap_or_default(),
        level: el.attr_parse(b"lvl")?.unwrap_or(0),
        margin_left: el.attr_parse::<i64>(b"marL")?.map(emu_to_pt).unwrap_or(0.0),
        margin_right: el.attr_parse::<i64>(b"marR")?.map(emu_to_pt).unwrap_or(0.0),
        indent: el.attr_parse::<i64>(b"indent")?.map(emu_to_pt).unwrap_or(0.0),
        rtl: el.attr_bool(b"rtl")?.unwrap_or(false),
        ..Default::default()
    })
}

pub(crate) struct RunProps {
    pub font: Font,
    pub language: Option<String>,
    pub hyperlink: Option<Hyperlink>,
}

/// `a:rPr`, `a:endParaRPr` or `a:defRPr`.
pub(crate) fn read_run_props<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    ctx: &ReadContext<'_, '_>,
) -> Result<RunProps> {
    let mut font = read_font_attrs(el)?;
    let mut hyperlink = None;
    let mut typeface_seen = false;
    while let Some(child) = next_in(reader, el)? {
        let format = match child.local_name() {
            b"latin" => Some(FontFormat::Latin),
            b"ea" => Some(FontFormat::EastAsian),
            b"cs" => Some(FontFormat::ComplexScript),
            _ => None,
        };
        match child.local_name() {
            b"solidFill" => {
                if let Some(color) = read_color_choice(reader, &child)? {
                    font.color = color;
                }
                continue;
            },
            b"hlinkClick" => {
                hyperlink = ctx.hyperlink(
                    child.attr(b"id")?.as_deref(),
                    child.attr(b"action")?.as_deref(),
                    child.attr(b"tooltip")?,
                )?;
            },
            _ => {},
        }
        if let Some(format) = format
            && !typeface_seen
            && let Some(typeface) = child.attr(b"typeface")?.filter(|t| !t.is_empty())
        {
            font.name = typeface;
            font.format = format;
            typeface_seen = true;
        }
        child.skip(reader)?;
    }
    Ok(RunProps {
        font,
        language: el.attr(b"lang")?,
        hyperlink,
    })
}

/// Character attributes of a run property element; everything else is
/// left at the default font.
pub(crate) fn read_font_attrs(el: &Element<'_>) -> Result<Font> {
    let mut font = Font::default();
    if let Some(sz) = el.attr_parse::<u32>(b"sz")? {
        font.size = font_size_to_pt(sz);
    }
    font.bold = el.attr_bool(b"b")?.unwrap_or(false);
    font.italic = el.attr_bool(b"i")?.unwrap_or(false);
    if let Some(u) = el.attr(b"u")? {
        font.underline = Underline::from_xml_value(&u);
    }
    font.strikethrough = el
        .attr(b"strike")?
        .is_some_and(|s| s != "noStrike");
    if let Some(baseline) = el.attr_parse::<i32>(b"baseline")? {
        font.baseline = Baseline::from_xml_value(baseline);
    }
    if let Some(spc) = el.attr_parse::<i64>(b"spc")? {
        font.character_spacing = spc as f64 / 100.0;
    }
    Ok(font)
}

/// Font-only variant of [`read_run_props`] for list styles, where no
/// hyperlinks can occur.
pub(crate) fn read_font_props<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Font> {
    let mut font = read_font_attrs(el)?;
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"solidFill" => {
                if let Some(color) = read_color_choice(reader, &child)? {
                    font.color = color;
                }
            },
            b"latin" | b"ea" | b"cs" => {
                if let Some(typeface) = child.attr(b"typeface")?.filter(|t| !t.is_empty()) {
                    font.format = match child.local_name() {
                        b"ea" => FontFormat::EastAsian,
                        b"cs" => FontFormat::ComplexScript,
                        _ => FontFormat::Latin,
                    };
                    font.name = typeface;
                }
                child.skip(reader)?;
            },
            _ => child.skip(reader)?,
        }
    }
    Ok(font)
}
