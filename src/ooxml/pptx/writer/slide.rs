//! Slide, slide layout, slide master and notes part serialization.
//!
//! Every function here produces the XML of one part. Part names and the
//! relationships between sibling parts (slide to layout, layout to master)
//! are settled by the caller before the XML is built, so the only
//! relationships registered here are the ones the content itself needs:
//! images, media, hyperlinks and charts.

use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;

use super::context::PartContext;
use super::drawing::write_solid_fill;
use super::shape::write_shapes;
use super::text::{write_alignment_attrs, write_font_props};
use crate::common::Result;
use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::namespace;
use crate::presentation::slide::{
    Animation, Background, ColorMap, LevelStyle, Note, Slide, SlideLayout, SlideMaster,
};
use crate::presentation::style::Alignment;
use crate::presentation::{Shape, Transition};

/// First id of the `p:sldLayoutId` / `p:sldMasterId` space.
pub(crate) const FIRST_MASTER_ID: u32 = 2_147_483_648;

fn write_root_open(xml: &mut String, tag: &str) -> Result<()> {
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(
        xml,
        r#"<{tag} xmlns:a="{}" xmlns:r="{}" xmlns:p="{}""#,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML_MAIN
    )?;
    Ok(())
}

fn write_csld_open(xml: &mut String, name: Option<&str>) -> Result<()> {
    match name {
        Some(name) if !name.is_empty() => write!(xml, r#"<p:cSld name="{}">"#, escape_xml(name))?,
        _ => xml.push_str("<p:cSld>"),
    }
    Ok(())
}

fn write_background(
    xml: &mut String,
    background: &Background,
    ctx: &mut PartContext<'_>,
) -> Result<()> {
    xml.push_str("<p:bg><p:bgPr>");
    match background {
        Background::Color(color) => write_solid_fill(xml, *color)?,
        Background::Image(source) => {
            let r_id = ctx.embed_image(source)?;
            write!(
                xml,
                r#"<a:blipFill dpi="0" rotWithShape="1"><a:blip r:embed="{r_id}"/><a:srcRect/><a:stretch><a:fillRect/></a:stretch></a:blipFill>"#
            )?;
        },
    }
    xml.push_str("<a:effectLst/></p:bgPr></p:bg>");
    Ok(())
}

/// `p:spTree` holding `shapes`; returns the shape id of each shape.
fn write_shape_tree(
    xml: &mut String,
    shapes: &[Shape],
    ctx: &mut PartContext<'_>,
) -> Result<Vec<Option<u32>>> {
    xml.push_str(r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(
        r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
    );
    let ids = write_shapes(xml, shapes, ctx)?;
    xml.push_str("</p:spTree>");
    Ok(ids)
}

fn write_transition(xml: &mut String, transition: Option<&Transition>) -> Result<()> {
    if let Some(transition) = transition {
        xml.push_str(&transition.to_xml()?);
    }
    Ok(())
}

pub(crate) fn slide_xml(slide: &Slide, ctx: &mut PartContext<'_>) -> Result<String> {
    let mut xml = String::with_capacity(4096);
    write_root_open(&mut xml, "p:sld")?;
    if slide.hidden {
        xml.push_str(r#" show="0""#);
    }
    xml.push('>');
    write_csld_open(&mut xml, slide.name.as_deref())?;
    if let Some(background) = &slide.background {
        write_background(&mut xml, background, ctx)?;
    }
    let ids = write_shape_tree(&mut xml, &slide.shapes, ctx)?;
    xml.push_str("</p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    write_transition(&mut xml, slide.transition.as_ref())?;
    write_timing(&mut xml, &slide.animations, &ids)?;
    xml.push_str("</p:sld>");
    Ok(xml)
}

pub(crate) fn layout_xml(layout: &SlideLayout, ctx: &mut PartContext<'_>) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    write_root_open(&mut xml, "p:sldLayout")?;
    write!(
        xml,
        r#" type="{}" preserve="1">"#,
        layout.layout_type.xml_value()
    )?;
    write_csld_open(&mut xml, Some(&layout.name))?;
    if let Some(background) = &layout.background {
        write_background(&mut xml, background, ctx)?;
    }
    write_shape_tree(&mut xml, &layout.shapes, ctx)?;
    xml.push_str("</p:cSld>");
    match &layout.color_map {
        Some(map) => {
            xml.push_str("<p:clrMapOvr><a:overrideClrMapping");
            write_color_map_attrs(&mut xml, map)?;
            xml.push_str("/></p:clrMapOvr>");
        },
        None => xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"),
    }
    write_transition(&mut xml, layout.transition.as_ref())?;
    xml.push_str("</p:sldLayout>");
    Ok(xml)
}

/// Master XML. `layouts` pairs each layout's `p:sldLayoutId` id with the
/// master's relationship id for it, in layout order.
pub(crate) fn master_xml(
    master: &SlideMaster,
    layouts: &[(u32, String)],
    ctx: &mut PartContext<'_>,
) -> Result<String> {
    let mut xml = String::with_capacity(8192);
    write_root_open(&mut xml, "p:sldMaster")?;
    xml.push('>');
    write_csld_open(&mut xml, Some(&master.name))?;
    match &master.background {
        Some(background) => write_background(&mut xml, background, ctx)?,
        None => xml.push_str(r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#),
    }
    write_shape_tree(&mut xml, &master.shapes, ctx)?;
    xml.push_str("</p:cSld>");

    xml.push_str("<p:clrMap");
    write_color_map_attrs(&mut xml, &master.color_map)?;
    xml.push_str("/>");

    if !layouts.is_empty() {
        xml.push_str("<p:sldLayoutIdLst>");
        for (id, r_id) in layouts {
            write!(xml, r#"<p:sldLayoutId id="{id}" r:id="{r_id}"/>"#)?;
        }
        xml.push_str("</p:sldLayoutIdLst>");
    }
    write_transition(&mut xml, master.transition.as_ref())?;

    xml.push_str("<p:txStyles>");
    write_level_styles(&mut xml, "p:titleStyle", &master.text_styles.title)?;
    write_level_styles(&mut xml, "p:bodyStyle", &master.text_styles.body)?;
    write_level_styles(&mut xml, "p:otherStyle", &master.text_styles.other)?;
    xml.push_str("</p:txStyles>");
    xml.push_str("</p:sldMaster>");
    Ok(xml)
}

/// `p:clrMap` attributes in schema order. Names missing from the map fall
/// back to the default mapping.
fn write_color_map_attrs(xml: &mut String, map: &ColorMap) -> Result<()> {
    let defaults = ColorMap::default();
    for name in ColorMap::NAMES {
        let target = map
            .get(name)
            .or_else(|| defaults.get(name))
            .unwrap_or(name);
        write!(xml, r#" {name}="{}""#, escape_xml(target))?;
    }
    Ok(())
}

fn write_level_styles(xml: &mut String, tag: &str, levels: &BTreeMap<u8, LevelStyle>) -> Result<()> {
    write!(xml, "<{tag}>")?;
    for (level, style) in levels.iter().filter(|(level, _)| **level < 9) {
        let element = format!("a:lvl{}pPr", level + 1);
        write!(xml, "<{element}")?;
        // list levels are positional, so the paragraph `lvl` attribute is dropped
        let alignment = Alignment {
            level: 0,
            ..style.alignment.clone()
        };
        write_alignment_attrs(xml, &alignment)?;
        xml.push('>');
        write_font_props(xml, "a:defRPr", &style.font)?;
        write!(xml, "</{element}>")?;
    }
    write!(xml, "</{tag}>")?;
    Ok(())
}

/// Build order as a `p:timing` main sequence: each [`Animation`] is one
/// click that makes its shapes visible. Indices that point at comments or
/// past the end of the shape list are skipped.
fn write_timing(xml: &mut String, animations: &[Animation], ids: &[Option<u32>]) -> Result<()> {
    let steps: Vec<Vec<u32>> = animations
        .iter()
        .map(|animation| {
            animation
                .shapes
                .iter()
                .filter_map(|&index| {
                    let id = ids.get(index).copied().flatten();
                    if id.is_none() {
                        log::warn!("animation refers to shape {index} which has no shape id, skipped");
                    }
                    id
                })
                .collect::<Vec<_>>()
        })
        .filter(|shapes| !shapes.is_empty())
        .collect();
    if steps.is_empty() {
        return Ok(());
    }

    xml.push_str("<p:timing><p:tnLst>");
    xml.push_str(r#"<p:par><p:cTn id="1" dur="indefinite" restart="never" nodeType="tmRoot">"#);
    xml.push_str(r#"<p:childTnLst><p:seq concurrent="1" nextAc="seek">"#);
    xml.push_str(r#"<p:cTn id="2" dur="indefinite" nodeType="mainSeq"><p:childTnLst>"#);

    let mut tn_id = 3u32;
    for shapes in &steps {
        write!(
            xml,
            r#"<p:par><p:cTn id="{tn_id}" fill="hold"><p:stCondLst><p:cond delay="indefinite"/></p:stCondLst><p:childTnLst>"#
        )?;
        tn_id += 1;
        write!(
            xml,
            r#"<p:par><p:cTn id="{tn_id}" fill="hold"><p:stCondLst><p:cond delay="0"/></p:stCondLst><p:childTnLst>"#
        )?;
        tn_id += 1;
        for (position, spid) in shapes.iter().enumerate() {
            let node_type = if position == 0 { "clickEffect" } else { "withEffect" };
            write!(
                xml,
                r#"<p:par><p:cTn id="{tn_id}" presetID="1" presetClass="entr" presetSubtype="0" fill="hold" nodeType="{node_type}"><p:stCondLst><p:cond delay="0"/></p:stCondLst><p:childTnLst>"#
            )?;
            tn_id += 1;
            write!(
                xml,
                r#"<p:set><p:cBhvr><p:cTn id="{tn_id}" dur="1" fill="hold"><p:stCondLst><p:cond delay="0"/></p:stCondLst></p:cTn><p:tgtEl><p:spTgt spid="{spid}"/></p:tgtEl>"#
            )?;
            tn_id += 1;
            xml.push_str(r#"<p:attrNameLst><p:attrName>style.visibility</p:attrName></p:attrNameLst></p:cBhvr><p:to><p:strVal val="visible"/></p:to></p:set>"#);
            xml.push_str("</p:childTnLst></p:cTn></p:par>");
        }
        xml.push_str("</p:childTnLst></p:cTn></p:par></p:childTnLst></p:cTn></p:par>");
    }

    xml.push_str("</p:childTnLst></p:cTn>");
    xml.push_str(r#"<p:prevCondLst><p:cond evt="onPrev" delay="0"><p:tgtEl><p:sldTgt/></p:tgtEl></p:cond></p:prevCondLst>"#);
    xml.push_str(r#"<p:nextCondLst><p:cond evt="onNext" delay="0"><p:tgtEl><p:sldTgt/></p:tgtEl></p:cond></p:nextCondLst>"#);
    xml.push_str("</p:seq></p:childTnLst></p:cTn></p:par>");
    xml.push_str("</p:tnLst></p:timing>");
    Ok(())
}

/// Notes page of one slide: a slide image placeholder followed by the
/// note's own shapes.
pub(crate) fn notes_slide_xml(note: &Note, ctx: &mut PartContext<'_>) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    write_root_open(&mut xml, "p:notes")?;
    xml.push('>');
    xml.push_str("<p:cSld>");
    xml.push_str(r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(
        r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
    );
    let id = ctx.shape_id();
    write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Slide Image Placeholder {}"/><p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr><p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#,
        id - 1
    )?;
    write_shapes(&mut xml, &note.shapes, ctx)?;
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:notes>");
    Ok(xml)
}

/// The notes master every notes page links to. It only carries what the
/// notes pages need: a slide image and a body placeholder sized for a
/// portrait page of `cx` by `cy` EMU.
pub(crate) fn notes_master_xml(cx: i64, cy: i64) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    write_root_open(&mut xml, "p:notesMaster")?;
    xml.push('>');
    xml.push_str("<p:cSld>");
    xml.push_str(r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#);
    xml.push_str(r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(
        r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
    );
    write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/><p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr><p:nvPr><p:ph type="sldImg" idx="2"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:sp>"#,
        cx / 8,
        cy / 12,
        cx * 3 / 4,
        cy * 3 / 8
    )?;
    write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="body" sz="quarter" idx="3"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
        cx / 10,
        cy / 2,
        cx * 4 / 5,
        cy * 2 / 5
    )?;
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMap");
    write_color_map_attrs(&mut xml, &ColorMap::default())?;
    xml.push_str("/>");
    xml.push_str("</p:notesMaster>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::PackURI;
    use crate::ooxml::pptx::writer::context::WriteState;
    use crate::presentation::slide::{LayoutRef, LayoutType};
    use crate::presentation::style::Color;
    use crate::presentation::CommentAuthor;
    use crate::presentation::transition::{TransitionDirection, TransitionType};

    fn slide_ctx(state: &mut WriteState) -> PartContext<'_> {
        PartContext::new(state, PackURI::new("/ppt/slides/slide1.xml").unwrap())
    }

    #[test]
    fn test_hidden_slide_with_background_and_transition() {
        let mut slide = Slide::new(LayoutRef::default());
        slide.hidden = true;
        slide.background = Some(Background::Color(Color::DARK_BLUE));
        slide.transition = Some(Transition::new(TransitionType::Push(TransitionDirection::Up)));
        let mut state = WriteState::new();
        let xml = slide_xml(&slide, &mut slide_ctx(&mut state)).unwrap();
        assert!(xml.contains(r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" show="0">"#));
        let bg = xml.find("<p:bg>").unwrap();
        let tree = xml.find("<p:spTree>").unwrap();
        assert!(bg < tree);
        let clr = xml.find("<p:clrMapOvr>").unwrap();
        let transition = xml.find("<p:transition").unwrap();
        assert!(clr < transition);
        assert!(xml.ends_with("</p:sld>"));
    }

    #[test]
    fn test_animations_target_shape_ids() {
        let mut slide = Slide::new(LayoutRef::default());
        slide.add_shape(Shape::rich_text());
        slide.add_shape(Shape::comment(
            Some(CommentAuthor::new("Ann", "A")),
            "note",
            chrono::Utc::now(),
        ));
        slide.add_shape(Shape::rich_text());
        slide.add_animation(Animation::new([2]));
        slide.add_animation(Animation::new([0, 1]));
        let mut state = WriteState::new();
        let xml = slide_xml(&slide, &mut slide_ctx(&mut state)).unwrap();
        assert!(xml.contains(r#"<p:spTgt spid="3"/>"#));
        assert!(xml.contains(r#"<p:spTgt spid="2"/>"#));
        assert_eq!(xml.matches("nodeType=\"clickEffect\"").count(), 2);
        assert!(xml.contains(r#"nodeType="mainSeq""#));
    }

    #[test]
    fn test_no_timing_without_valid_steps() {
        let mut slide = Slide::new(LayoutRef::default());
        slide.add_animation(Animation::new([4]));
        let mut state = WriteState::new();
        let xml = slide_xml(&slide, &mut slide_ctx(&mut state)).unwrap();
        assert!(!xml.contains("<p:timing>"));
    }

    #[test]
    fn test_layout_color_map_override() {
        let mut layout = SlideLayout::new("Custom", LayoutType::Custom);
        let mut map = ColorMap::default();
        map.set("bg1", "dk1");
        layout.color_map = Some(map);
        let mut state = WriteState::new();
        let owner = PackURI::new("/ppt/slideLayouts/slideLayout1.xml").unwrap();
        let xml = layout_xml(&layout, &mut PartContext::new(&mut state, owner)).unwrap();
        assert!(xml.contains(r#"type="cust" preserve="1">"#));
        assert!(xml.contains(r#"<a:overrideClrMapping bg1="dk1" tx1="dk1""#));
    }

    #[test]
    fn test_master_lists_layouts_and_text_styles() {
        let master = SlideMaster::standard(9_144_000, 6_858_000);
        let mut state = WriteState::new();
        let owner = PackURI::new("/ppt/slideMasters/slideMaster1.xml").unwrap();
        let layouts = vec![
            (FIRST_MASTER_ID + 1, "rId1".to_string()),
            (FIRST_MASTER_ID + 2, "rId2".to_string()),
        ];
        let xml = master_xml(&master, &layouts, &mut PartContext::new(&mut state, owner)).unwrap();
        assert!(xml.contains(r#"<p:sldLayoutId id="2147483649" r:id="rId1"/>"#));
        assert!(xml.contains(r#"<p:bgRef idx="1001">"#));
        assert!(xml.contains(r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2""#));
        assert!(xml.contains(r#"<p:titleStyle><a:lvl1pPr algn="ctr"><a:defRPr sz="4400""#));
        assert!(xml.contains("<a:lvl5pPr"));
        assert!(!xml.contains("<a:lvl6pPr"));
        assert_eq!(xml.matches("<p:ph ").count(), 5);
    }

    #[test]
    fn test_notes_slide_starts_with_slide_image() {
        let note = Note::from_text("Remember the demo");
        let mut state = WriteState::new();
        let owner = PackURI::new("/ppt/notesSlides/notesSlide1.xml").unwrap();
        let xml = notes_slide_xml(&note, &mut PartContext::new(&mut state, owner)).unwrap();
        let image = xml.find(r#"<p:ph type="sldImg"/>"#).unwrap();
        let body = xml.find(r#"<p:ph type="body" idx="1"/>"#).unwrap();
        assert!(image < body);
        assert!(xml.contains("<a:t>Remember the demo</a:t>"));
    }
}
