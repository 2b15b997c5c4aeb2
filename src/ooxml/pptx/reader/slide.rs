//! Slide, slide layout, slide master and notes parts.

use std::collections::BTreeMap;

use super::context::ReadContext;
use super::drawing::read_color_choice;
use super::events::{Element, XmlReader, next_in, root, xml_reader};
use super::shape::{ShapeTree, read_shape_tree};
use super::text::{read_alignment_attrs, read_font_props};
use crate::common::{Error, Result};
use crate::ooxml::opc::PackURI;
use crate::presentation::shape::PlaceholderType;
use crate::presentation::slide::{
    Animation, Background, ColorMap, LayoutRef, LayoutType, LevelStyle, Note, Slide, SlideLayout,
    SlideMaster, TextStyles,
};
use crate::presentation::transition::{Transition, TransitionSpeed, TransitionType};

/// The common `p:cSld` content.
#[derive(Debug, Default)]
struct CommonSlide {
    name: Option<String>,
    background: Option<Background>,
    tree: ShapeTree,
}

fn read_common_slide<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    ctx: &mut ReadContext<'_, '_>,
) -> Result<CommonSlide> {
    let mut common = CommonSlide {
        name: el.attr(b"name")?,
        ..Default::default()
    };
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"bg" => common.background = read_background(reader, &child, ctx)?,
            b"spTree" => common.tree = read_shape_tree(reader, &child, ctx)?,
            _ => child.skip(reader)?,
        }
    }
    Ok(common)
}

/// `p:bg`. Theme references (`p:bgRef`) have no model counterpart.
fn read_background<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    ctx: &ReadContext<'_, '_>,
) -> Result<Option<Background>> {
    let mut background = None;
    while let Some(child) = next_in(reader, el)? {
        if child.local_name() != b"bgPr" {
            child.skip(reader)?;
            continue;
        }
        while let Some(fill) = next_in(reader, &child)? {
            match fill.local_name() {
                b"solidFill" => background = read_color_choice(reader, &fill)?.map(Background::Color),
                b"blipFill" => {
                    while let Some(blip) = next_in(reader, &fill)? {
                        if blip.local_name() == b"blip"
                            && let Some(r_id) = blip.attr(b"embed")?
                        {
                            background = Some(Background::Image(ctx.source(&r_id)?));
                        }
                        blip.skip(reader)?;
                    }
                },
                _ => fill.skip(reader)?,
            }
        }
    }
    Ok(background)
}

pub(crate) fn read_transition<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Transition> {
    let mut transition = Transition {
        speed: el
            .attr(b"spd")?
            .map(|s| TransitionSpeed::from_xml_value(&s))
            .unwrap_or(TransitionSpeed::Medium),
        advance_on_click: el.attr_bool(b"advClick")?.unwrap_or(true),
        advance_after_ms: el.attr_parse(b"advTm")?,
        transition_type: None,
    };
    while let Some(child) = next_in(reader, el)? {
        if transition.transition_type.is_none() {
            let name = std::str::from_utf8(child.local_name()).unwrap_or_default();
            transition.transition_type = TransitionType::from_element(
                name,
                child.attr(b"dir")?.as_deref(),
                child.attr(b"orient")?.as_deref(),
            );
        }
        child.skip(reader)?;
    }
    Ok(transition)
}

/// The fallback branch of an `mc:AlternateContent`, which holds the
/// transition in the base schema when newer effects are used.
fn read_alternate_transition<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Option<Transition>> {
    let mut transition = None;
    while let Some(branch) = next_in(reader, el)? {
        if branch.local_name() != b"Fallback" {
            branch.skip(reader)?;
            continue;
        }
        while let Some(child) = next_in(reader, &branch)? {
            if child.local_name() == b"transition" {
                transition = Some(read_transition(reader, &child)?);
            } else {
                child.skip(reader)?;
            }
        }
    }
    Ok(transition)
}

/// Build steps of the main sequence, each as the list of drawing ids it
/// shows.
fn read_timing<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Vec<Vec<u32>>> {
    let mut clicks = Vec::new();
    find_main_sequence(reader, el, &mut clicks)?;
    Ok(clicks)
}

fn find_main_sequence<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    clicks: &mut Vec<Vec<u32>>,
) -> Result<()> {
    while let Some(child) = next_in(reader, el)? {
        if child.local_name() == b"cTn" && child.attr(b"nodeType")?.as_deref() == Some("mainSeq") {
            while let Some(list) = next_in(reader, &child)? {
                if list.local_name() != b"childTnLst" {
                    list.skip(reader)?;
                    continue;
                }
                while let Some(step) = next_in(reader, &list)? {
                    let mut ids = Vec::new();
                    collect_shape_targets(reader, &step, &mut ids)?;
                    clicks.push(ids);
                }
            }
        } else {
            find_main_sequence(reader, &child, clicks)?;
        }
    }
    Ok(())
}

fn collect_shape_targets<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>, ids: &mut Vec<u32>) -> Result<()> {
    if el.local_name() == b"spTgt"
        && let Some(spid) = el.attr_parse::<u32>(b"spid")?
        && !ids.contains(&spid)
    {
        ids.push(spid);
    }
    while let Some(child) = next_in(reader, el)? {
        collect_shape_targets(reader, &child, ids)?;
    }
    Ok(())
}

/// Map drawing ids of build steps onto shape indices. Steps that name no
/// shape on the slide are dropped.
fn animations_from_clicks(clicks: Vec<Vec<u32>>, tree: &ShapeTree, partname: &PackURI) -> Vec<Animation> {
    clicks
        .into_iter()
        .filter_map(|ids| {
            let shapes: Vec<usize> = ids
                .into_iter()
                .filter_map(|id| {
                    let index = tree.index_of(id);
                    if index.is_none() {
                        log::warn!("{partname}: animation targets unknown shape id {id}, skipped");
                    }
                    index
                })
                .collect();
            (!shapes.is_empty()).then(|| Animation::new(shapes))
        })
        .collect()
}

/// A slide part. `layouts` maps layout part names to their position in the
/// master/layout tree.
pub(crate) fn read_slide(
    ctx: &mut ReadContext<'_, '_>,
    layouts: &BTreeMap<PackURI, LayoutRef>,
) -> Result<Slide> {
    let partname = ctx.partname().clone();
    let bytes = ctx.blob(&partname)?;
    let mut reader = xml_reader(&bytes);
    let sld = root(&mut reader, b"sld")?;

    let mut slide = Slide {
        hidden: !sld.attr_bool(b"show")?.unwrap_or(true),
        ..Default::default()
    };
    let mut clicks = Vec::new();
    let mut tree = ShapeTree::default();
    while let Some(child) = next_in(&mut reader, &sld)? {
        match child.local_name() {
            b"cSld" => {
                let common = read_common_slide(&mut reader, &child, ctx)?;
                slide.name = common.name.filter(|n| !n.is_empty());
                slide.background = common.background;
                tree = common.tree;
            },
            b"transition" => slide.transition = Some(read_transition(&mut reader, &child)?),
            b"AlternateContent" => {
                if let Some(transition) = read_alternate_transition(&mut reader, &child)? {
                    slide.transition = Some(transition);
                }
            },
            b"timing" => clicks = read_timing(&mut reader, &child)?,
            _ => child.skip(&mut reader)?,
        }
    }

    slide.animations = animations_from_clicks(clicks, &tree, &partname);
    slide.shapes = tree.shapes;
    let layout = ctx
        .target_of_type(crate::ooxml::opc::constants::relationship_type::SLIDE_LAYOUT)
        .ok_or_else(|| Error::invalid_package(format!("{partname} has no slide layout")))?;
    slide.layout = *layouts.get(&layout).ok_or_else(|| Error::UnresolvedRelationship {
        part: partname.to_string(),
        target: layout.to_string(),
    })?;
    Ok(slide)
}

pub(crate) fn read_layout(ctx: &mut ReadContext<'_, '_>) -> Result<SlideLayout> {
    let partname = ctx.partname().clone();
    let bytes = ctx.blob(&partname)?;
    let mut reader = xml_reader(&bytes);
    let el = root(&mut reader, b"sldLayout")?;

    let mut layout = SlideLayout::new(
        String::new(),
        LayoutType::from_xml_value(el.attr(b"type")?.as_deref()),
    );
    while let Some(child) = next_in(&mut reader, &el)? {
        match child.local_name() {
            b"cSld" => {
                let common = read_common_slide(&mut reader, &child, ctx)?;
                layout.name = common.name.unwrap_or_default();
                layout.background = common.background;
                layout.shapes = common.tree.shapes;
            },
            b"clrMapOvr" => {
                while let Some(mapping) = next_in(&mut reader, &child)? {
                    if mapping.local_name() == b"overrideClrMapping" {
                        layout.color_map = Some(read_color_map(&mapping)?);
                    }
                    mapping.skip(&mut reader)?;
                }
            },
            b"transition" => layout.transition = Some(read_transition(&mut reader, &child)?),
            b"AlternateContent" => {
                if let Some(transition) = read_alternate_transition(&mut reader, &child)? {
                    layout.transition = Some(transition);
                }
            },
            _ => child.skip(&mut reader)?,
        }
    }
    Ok(layout)
}

/// A master part plus the relationship ids of its layouts in
/// `p:sldLayoutIdLst` order. Layouts and theme are filled in by the caller.
pub(crate) fn read_master(ctx: &mut ReadContext<'_, '_>) -> Result<(SlideMaster, Vec<String>)> {
    let partname = ctx.partname().clone();
    let bytes = ctx.blob(&partname)?;
    let mut reader = xml_reader(&bytes);
    let el = root(&mut reader, b"sldMaster")?;

    let mut master = SlideMaster::new(String::new());
    let mut layout_ids = Vec::new();
    while let Some(child) = next_in(&mut reader, &el)? {
        match child.local_name() {
            b"cSld" => {
                let common = read_common_slide(&mut reader, &child, ctx)?;
                master.name = common.name.unwrap_or_default();
                master.background = common.background;
                master.shapes = common.tree.shapes;
            },
            b"clrMap" => {
                master.color_map = read_color_map(&child)?;
                child.skip(&mut reader)?;
            },
            b"sldLayoutIdLst" => {
                while let Some(id) = next_in(&mut reader, &child)? {
                    if id.local_name() == b"sldLayoutId"
                        && let Some(r_id) = id.rel_id()?
                    {
                        layout_ids.push(r_id);
                    }
                    id.skip(&mut reader)?;
                }
            },
            b"transition" => master.transition = Some(read_transition(&mut reader, &child)?),
            b"AlternateContent" => {
                if let Some(transition) = read_alternate_transition(&mut reader, &child)? {
                    master.transition = Some(transition);
                }
            },
            b"txStyles" => master.text_styles = read_text_styles(&mut reader, &child)?,
            _ => child.skip(&mut reader)?,
        }
    }
    Ok((master, layout_ids))
}

/// Colour map attributes; names missing from the element keep the
/// default mapping.
fn read_color_map(el: &Element<'_>) -> Result<ColorMap> {
    let mut map = ColorMap::default();
    for name in ColorMap::NAMES {
        if let Some(target) = el.attr(name.as_bytes())? {
            map.set(name, target);
        }
    }
    Ok(map)
}

fn read_text_styles<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<TextStyles> {
    let mut styles = TextStyles::default();
    while let Some(child) = next_in(reader, el)? {
        let target = match child.local_name() {
            b"titleStyle" => &mut styles.title,
            b"bodyStyle" => &mut styles.body,
            b"otherStyle" => &mut styles.other,
            _ => {
                child.skip(reader)?;
                continue;
            },
        };
        *target = read_level_styles(reader, &child)?;
    }
    Ok(styles)
}

/// `a:lvl1pPr` .. `a:lvl9pPr` keyed by zero-based level.
fn read_level_styles<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<BTreeMap<u8, LevelStyle>> {
    let mut levels = BTreeMap::new();
    while let Some(child) = next_in(reader, el)? {
        let level = match child.local_name() {
            [b'l', b'v', b'l', digit @ b'1'..=b'9', b'p', b'P', b'r'] => digit - b'1',
            _ => {
                child.skip(reader)?;
                continue;
            },
        };
        let mut style = LevelStyle {
            alignment: read_alignment_attrs(&child)?,
            ..Default::default()
        };
        style.alignment.level = level;
        while let Some(prop) = next_in(reader, &child)? {
            if prop.local_name() == b"defRPr" {
                style.font = read_font_props(reader, &prop)?;
            } else {
                prop.skip(reader)?;
            }
        }
        levels.insert(level, style);
    }
    Ok(levels)
}

/// A notes slide. The slide image placeholder is part of the notes page
/// template, not of the note.
pub(crate) fn read_notes(ctx: &mut ReadContext<'_, '_>) -> Result<Note> {
    let partname = ctx.partname().clone();
    let bytes = ctx.blob(&partname)?;
    let mut reader = xml_reader(&bytes);
    let el = root(&mut reader, b"notes")?;

    let mut note = Note::default();
    while let Some(child) = next_in(&mut reader, &el)? {
        if child.local_name() == b"cSld" {
            let common = read_common_slide(&mut reader, &child, ctx)?;
            note.shapes = common
                .tree
                .shapes
                .into_iter()
                .filter(|shape| {
                    shape
                        .placeholder
                        .as_ref()
                        .is_none_or(|ph| ph.kind != PlaceholderType::SlideImage)
                })
                .collect();
        } else {
            child.skip(&mut reader)?;
        }
    }
    Ok(note)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::transition::TransitionDirection;

    #[test]
    fn test_transition_attributes_and_type() {
        let xml = r#"<p:transition xmlns:p="urn:p" spd="fast" advClick="0" advTm="3000"><p:push dir="u"/></p:transition>"#;
        let mut reader = xml_reader(xml.as_bytes());
        let el = root(&mut reader, b"transition").unwrap();
        let transition = read_transition(&mut reader, &el).unwrap();
        assert_eq!(transition.speed, TransitionSpeed::Fast);
        assert!(!transition.advance_on_click);
        assert_eq!(transition.advance_after_ms, Some(3000));
        assert_eq!(
            transition.transition_type,
            Some(TransitionType::Push(TransitionDirection::Up))
        );
    }

    #[test]
    fn test_timing_steps_by_click() {
        let xml = r#"<p:timing xmlns:p="urn:p"><p:tnLst><p:par><p:cTn id="1" nodeType="tmRoot"><p:childTnLst><p:seq><p:cTn id="2" nodeType="mainSeq"><p:childTnLst>
            <p:par><p:cTn id="3"><p:childTnLst><p:par><p:cTn id="4"><p:childTnLst><p:set><p:cBhvr><p:tgtEl><p:spTgt spid="4"/></p:tgtEl></p:cBhvr></p:set><p:set><p:cBhvr><p:tgtEl><p:spTgt spid="2"/></p:tgtEl></p:cBhvr></p:set></p:childTnLst></p:cTn></p:par></p:childTnLst></p:cTn></p:par>
            <p:par><p:cTn id="5"><p:childTnLst><p:set><p:cBhvr><p:tgtEl><p:spTgt spid="3"/></p:tgtEl></p:cBhvr></p:set></p:childTnLst></p:cTn></p:par>
            </p:childTnLst></p:cTn><p:prevCondLst><p:cond evt="onPrev"><p:tgtEl><p:sldTgt/></p:tgtEl></p:cond></p:prevCondLst></p:seq></p:childTnLst></p:cTn></p:par></p:tnLst></p:timing>"#;
        let mut reader = xml_reader(xml.as_bytes());
        let el = root(&mut reader, b"timing").unwrap();
        let clicks = read_timing(&mut reader, &el).unwrap();
        assert_eq!(clicks, vec![vec![4, 2], vec![3]]);

        let tree = ShapeTree {
            shapes: Vec::new(),
            ids: vec![Some(2), None, Some(3)],
        };
        let partname = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        let animations = animations_from_clicks(clicks, &tree, &partname);
        assert_eq!(animations, vec![Animation::new([0]), Animation::new([2])]);
    }

    #[test]
    fn test_level_styles_keep_level_and_font() {
        let xml = r#"<p:bodyStyle xmlns:p="urn:p" xmlns:a="urn:a"><a:lvl1pPr algn="ctr"><a:defRPr sz="3200" b="1"/></a:lvl1pPr><a:lvl3pPr marL="685800"><a:defRPr sz="2400"/></a:lvl3pPr></p:bodyStyle>"#;
        let mut reader = xml_reader(xml.as_bytes());
        let el = root(&mut reader, b"bodyStyle").unwrap();
        let levels = read_level_styles(&mut reader, &el).unwrap();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[&0].font.size, 32.0);
        assert!(levels[&0].font.bold);
        assert_eq!(levels[&2].alignment.level, 2);
        assert_eq!(levels[&2].alignment.margin_left, 54.0);
    }

    #[test]
    fn test_color_map_attributes() {
        let xml = r#"<p:clrMap xmlns:p="urn:p" bg1="dk1" tx1="lt1"/>"#;
        let mut reader = xml_reader(xml.as_bytes());
        let el = root(&mut reader, b"clrMap").unwrap();
        let map = read_color_map(&el).unwrap();
        assert_eq!(map.get("bg1"), Some("dk1"));
        assert_eq!(map.get("tx1"), Some("lt1"));
        assert_eq!(map.get("accent1"), Some("accent1"));
    }
}
