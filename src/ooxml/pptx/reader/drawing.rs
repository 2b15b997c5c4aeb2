//! DrawingML fragments: colours, fills, lines, shadows and transforms.

use super::events::{Element, XmlReader, next_in};
use crate::common::Result;
use crate::common::unit::{angle_to_degrees, emu_to_pt, st_to_percent};
use crate::presentation::Shape;
use crate::presentation::style::{
    Border, Color, DashStyle, Fill, FillType, LineStyle, Outline, Shadow, ShadowAlignment,
};

/// Line width DrawingML assumes when `a:ln` has no `w`.
const DEFAULT_LINE_WIDTH_PT: f64 = 0.75;

/// An `a:srgbClr` or `a:sysClr`, with its `a:alpha` child applied.
/// Scheme colours need a theme to resolve and come back as `None`.
pub(crate) fn read_color_element<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
) -> Result<Option<Color>> {
    let rgb = match el.local_name() {
        b"srgbClr" => el.attr(b"val")?,
        b"sysClr" => el.attr(b"lastClr")?,
        b"schemeClr" | b"prstClr" | b"scrgbClr" | b"hslClr" => {
            log::trace!("unresolved {} colour", String::from_utf8_lossy(el.local_name()));
            el.skip(reader)?;
            return Ok(None);
        },
        _ => {
            el.skip(reader)?;
            return Ok(None);
        },
    };
    let mut alpha = None;
    while let Some(child) = next_in(reader, el)? {
        if child.local_name() == b"alpha" {
            alpha = child.attr_parse::<u32>(b"val")?;
        }
        child.skip(reader)?;
    }
    Ok(rgb.and_then(|rgb| Color::from_rgb_and_alpha_st(&rgb, alpha)))
}

/// First colour among the children of `el` (`a:solidFill`, `a:gs`,
/// `a:buClr`, ...), consuming `el`.
pub(crate) fn read_color_choice<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
) -> Result<Option<Color>> {
    let mut color = None;
    while let Some(child) = next_in(reader, el)? {
        let found = read_color_element(reader, &child)?;
        if color.is_none() {
            color = found;
        }
    }
    Ok(color)
}

/// Whether `name` is one of the fill choice elements.
pub(crate) fn is_fill(name: &[u8]) -> bool {
    matches!(name, b"noFill" | b"solidFill" | b"gradFill" | b"blipFill" | b"pattFill" | b"grpFill")
}

/// A fill choice element. Picture, pattern and group fills have no model
/// counterpart and read as no fill.
pub(crate) fn read_fill<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Fill> {
    match el.local_name() {
        b"solidFill" => Ok(read_color_choice(reader, el)?.map(Fill::solid).unwrap_or_default()),
        b"gradFill" => read_gradient(reader, el),
        _ => {
            el.skip(reader)?;
            Ok(Fill::default())
        },
    }
}

/// The first and last gradient stops become the start and end colours.
fn read_gradient<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Fill> {
    let mut stops: Vec<(u32, Color)> = Vec::new();
    let mut fill = Fill {
        fill_type: FillType::GradientLinear,
        ..Default::default()
    };
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"gsLst" => {
                while let Some(gs) = next_in(reader, &child)? {
                    if gs.local_name() != b"gs" {
                        gs.skip(reader)?;
                        continue;
                    }
                    let pos = gs.attr_parse::<u32>(b"pos")?.unwrap_or(0);
                    if let Some(color) = read_color_choice(reader, &gs)? {
                        stops.push((pos, color));
                    }
                }
            },
            b"lin" => {
                fill.rotation = angle_to_degrees(child.attr_parse(b"ang")?.unwrap_or(0));
                child.skip(reader)?;
            },
            b"path" => {
                fill.fill_type = FillType::GradientPath;
                child.skip(reader)?;
            },
            _ => child.skip(reader)?,
        }
    }
    stops.sort_by_key(|(pos, _)| *pos);
    if let (Some(first), Some(last)) = (stops.first(), stops.last()) {
        fill.start_color = first.1;
        fill.end_color = last.1;
    }
    Ok(fill)
}

/// `a:ln` (and the `a:lnL`/`a:lnR`/... cell borders) as a border.
pub(crate) fn read_line<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Border> {
    let width = el.attr_parse::<i64>(b"w")?;
    let mut border = Border {
        line_width: width.map(emu_to_pt).unwrap_or(DEFAULT_LINE_WIDTH_PT),
        line_style: el
            .attr(b"cmpd")?
            .map(|v| LineStyle::from_xml_value(&v))
            .unwrap_or_default(),
        ..Default::default()
    };
    let mut stroked = false;
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"noFill" => {
                border.line_width = 0.0;
                child.skip(reader)?;
            },
            b"solidFill" => {
                stroked = true;
                if let Some(color) = read_color_choice(reader, &child)? {
                    border.color = color;
                }
            },
            b"prstDash" => {
                if let Some(dash) = child.attr(b"val")? {
                    border.dash_style = DashStyle::from_xml_value(&dash);
                }
                child.skip(reader)?;
            },
            _ => child.skip(reader)?,
        }
    }
    // a bare `<a:ln/>` draws nothing we can describe
    if !stroked && width.is_none() {
        border.line_width = 0.0;
    }
    Ok(border)
}

/// Chart-side `a:ln`: any fill plus a width.
pub(crate) fn read_outline<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Outline> {
    let mut outline = Outline {
        width: el.attr_parse::<i64>(b"w")?.map(emu_to_pt).unwrap_or(0.0),
        ..Default::default()
    };
    while let Some(child) = next_in(reader, el)? {
        if is_fill(child.local_name()) {
            outline.fill = read_fill(reader, &child)?;
        } else {
            child.skip(reader)?;
        }
    }
    Ok(outline)
}

/// The outer shadow of an `a:effectLst`; other effects are ignored.
pub(crate) fn read_effects<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Shadow> {
    let mut shadow = Shadow::default();
    while let Some(child) = next_in(reader, el)? {
        if child.local_name() != b"outerShdw" {
            child.skip(reader)?;
            continue;
        }
        shadow.visible = true;
        if let Some(blur) = child.attr_parse::<i64>(b"blurRad")? {
            shadow.blur_radius = emu_to_pt(blur);
        }
        if let Some(dist) = child.attr_parse::<i64>(b"dist")? {
            shadow.distance = emu_to_pt(dist);
        }
        if let Some(dir) = child.attr_parse::<i64>(b"dir")? {
            shadow.direction = angle_to_degrees(dir);
        }
        if let Some(algn) = child.attr(b"algn")? {
            shadow.alignment = ShadowAlignment::from_xml_value(&algn);
        }
        while let Some(color) = next_in(reader, &child)? {
            if color.local_name() != b"srgbClr" {
                color.skip(reader)?;
                continue;
            }
            if let Some(rgb) = color.attr(b"val")?.and_then(|v| Color::from_rgb_hex(&v)) {
                shadow.color = rgb;
            }
            while let Some(modifier) = next_in(reader, &color)? {
                if modifier.local_name() == b"alpha"
                    && let Some(st) = modifier.attr_parse::<i64>(b"val")?
                {
                    shadow.alpha = st_to_percent(st);
                }
                modifier.skip(reader)?;
            }
        }
    }
    Ok(shadow)
}

/// Group transform: the frame plus the child coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct GroupTransform {
    pub child_x: i64,
    pub child_y: i64,
    pub child_cx: i64,
    pub child_cy: i64,
}

/// `a:xfrm` / `p:xfrm` into the geometry of `shape`. Returns the child
/// coordinate space when the transform carries one.
pub(crate) fn read_xfrm<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    shape: &mut Shape,
) -> Result<Option<GroupTransform>> {
    if let Some(rot) = el.attr_parse::<i64>(b"rot")? {
        shape.rotation = angle_to_degrees(rot);
    }
    shape.flip_horizontal = el.attr_bool(b"flipH")?.unwrap_or(false);
    shape.flip_vertical = el.attr_bool(b"flipV")?.unwrap_or(false);
    let mut group: Option<GroupTransform> = None;
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"off" => {
                shape.offset_x = child.attr_parse(b"x")?.unwrap_or(0);
                shape.offset_y = child.attr_parse(b"y")?.unwrap_or(0);
            },
            b"ext" => {
                shape.width = child.attr_parse(b"cx")?.unwrap_or(0);
                shape.height = child.attr_parse(b"cy")?.unwrap_or(0);
            },
            b"chOff" => {
                let t = group.get_or_insert_with(GroupTransform::default);
                t.child_x = child.attr_parse(b"x")?.unwrap_or(0);
                t.child_y = child.attr_parse(b"y")?.unwrap_or(0);
            },
            b"chExt" => {
                let t = group.get_or_insert_with(GroupTransform::default);
                t.child_cx = child.attr_parse(b"cx")?.unwrap_or(0);
                t.child_cy = child.attr_parse(b"cy")?.unwrap_or(0);
            },
            _ => {},
        }
        child.skip(reader)?;
    }
    Ok(group)
}

impl GroupTransform {
    /// Map `child` from the group's child space onto the slide.
    pub fn apply(&self, group: &Shape, child: &mut Shape) {
        let scale = |ext: i64, ch_ext: i64| {
            if ch_ext == 0 { 1.0 } else { ext as f64 / ch_ext as f64 }
        };
        let sx = scale(group.width, self.child_cx);
        let sy = scale(group.height, self.child_cy);
        child.offset_x = group.offset_x + ((child.offset_x - self.child_x) as f64 * sx).round() as i64;
        child.offset_y = group.offset_y + ((child.offset_y - self.child_y) as f64 * sy).round() as i64;
        child.width = (child.width as f64 * sx).round() as i64;
        child.height = (child.height as f64 * sy).round() as i64;
    }
}
