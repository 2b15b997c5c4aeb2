//! Shape tree parsing: `p:sp`, `p:pic`, `p:graphicFrame`, `p:cxnSp` and
//! `p:grpSp` back into [`Shape`]s.

use super::chart::read_chart_part;
use super::context::ReadContext;
use super::drawing::{is_fill, read_effects, read_fill, read_line, read_xfrm};
use super::events::{Element, XmlReader, next_in};
use super::text::read_text_body;
use crate::common::{Error, Result};
use crate::ooxml::opc::constants::namespace;
use crate::presentation::media::MediaKind;
use crate::presentation::rich_text::Hyperlink;
use crate::presentation::shape::{
    AutoShapeType, Media, Placeholder, PlaceholderType, Shape, ShapeKind,
};
use crate::presentation::table::{Cell, Row, Table};

/// Top-level shapes of a tree with the `cNvPr` id of each, in order.
#[derive(Debug, Default)]
pub(crate) struct ShapeTree {
    pub shapes: Vec<Shape>,
    pub ids: Vec<Option<u32>>,
}

impl ShapeTree {
    /// Index of the top-level shape with drawing id `id`.
    pub fn index_of(&self, id: u32) -> Option<usize> {
        self.ids.iter().position(|candidate| *candidate == Some(id))
    }
}

/// `p:spTree` or the body of a `p:grpSp`.
pub(crate) fn read_shape_tree<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    ctx: &mut ReadContext<'_, '_>,
) -> Result<ShapeTree> {
    let mut tree = ShapeTree::default();
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"sp" | b"pic" | b"graphicFrame" | b"cxnSp" | b"grpSp" => {
                if let Some((id, shape)) = read_shape(reader, &child, ctx)? {
                    tree.ids.push(id);
                    tree.shapes.push(shape);
                }
            },
            b"AlternateContent" => {
                log::debug!("{}: skipping alternate content in shape tree", ctx.partname());
                child.skip(reader)?;
            },
            _ => child.skip(reader)?,
        }
    }
    Ok(tree)
}

/// Non-visual properties common to every shape element.
#[derive(Debug, Default)]
struct NonVisual {
    id: Option<u32>,
    name: String,
    description: String,
    hyperlink: Option<Hyperlink>,
    text_box: bool,
    placeholder: Option<Placeholder>,
    media: Option<MediaRefs>,
}

#[derive(Debug)]
struct MediaRefs {
    kind: MediaKind,
    link: Option<String>,
    embed: Option<String>,
}

impl NonVisual {
    /// Copy onto `shape`. Names matching the generated `"<label> <id>"`
    /// pattern are dropped so they are regenerated on write.
    fn apply(self, shape: &mut Shape, label: &str) {
        let generated = self.id.map(|id| format!("{label} {id}"));
        if generated.as_deref() != Some(self.name.as_str()) {
            shape.name = self.name;
        }
        shape.description = self.description;
        shape.hyperlink = self.hyperlink;
        shape.placeholder = self.placeholder;
    }
}

fn read_shape<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    ctx: &mut ReadContext<'_, '_>,
) -> Result<Option<(Option<u32>, Shape)>> {
    let read = match el.local_name() {
        b"sp" => read_sp(reader, el, ctx)?,
        b"pic" => read_pic(reader, el, ctx)?,
        b"graphicFrame" => read_graphic_frame(reader, el, ctx)?,
        b"cxnSp" => read_connector(reader, el, ctx)?,
        b"grpSp" => read_group(reader, el, ctx)?,
        _ => {
            el.skip(reader)?;
            None
        },
    };
    Ok(read)
}

fn read_non_visual<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    ctx: &ReadContext<'_, '_>,
) -> Result<NonVisual> {
    let mut nv = NonVisual::default();
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"cNvPr" => {
                nv.id = child.attr_parse(b"id")?;
                nv.name = child.attr(b"name")?.unwrap_or_default();
                nv.description = child.attr(b"descr")?.unwrap_or_default();
                while let Some(link) = next_in(reader, &child)? {
                    if link.local_name() == b"hlinkClick" {
                        nv.hyperlink = ctx.hyperlink(
                            link.attr(b"id")?.as_deref(),
                            link.attr(b"action")?.as_deref(),
                            link.attr(b"tooltip")?,
                        )?;
                    }
                    link.skip(reader)?;
                }
            },
            b"cNvSpPr" => {
                nv.text_box = child.attr_bool(b"txBox")?.unwrap_or(false);
                child.skip(reader)?;
            },
            b"nvPr" => read_nv_pr(reader, &child, &mut nv)?,
            _ => child.skip(reader)?,
        }
    }
    Ok(nv)
}

fn read_nv_pr<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>, nv: &mut NonVisual) -> Result<()> {
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"ph" => {
                nv.placeholder = Some(Placeholder {
                    kind: PlaceholderType::from_xml_value(child.attr(b"type")?.as_deref()),
                    idx: child.attr_parse(b"idx")?,
                });
                child.skip(reader)?;
            },
            b"videoFile" | b"audioFile" => {
                let kind = if child.local_name() == b"audioFile" {
                    MediaKind::Audio
                } else {
                    MediaKind::Video
                };
                let link = child.attr(b"link")?;
                match &mut nv.media {
                    Some(media) => {
                        media.kind = kind;
                        media.link = link;
                    },
                    None => {
                        nv.media = Some(MediaRefs {
                            kind,
                            link,
                            embed: None,
                        })
                    },
                }
                child.skip(reader)?;
            },
            b"extLst" => {
                while let Some(ext) = next_in(reader, &child)? {
                    while let Some(item) = next_in(reader, &ext)? {
                        if item.local_name() == b"media" {
                            let embed = item.attr(b"embed")?;
                            match &mut nv.media {
                                Some(media) => media.embed = embed,
                                None => {
                                    nv.media = Some(MediaRefs {
                                        kind: MediaKind::Video,
                                        link: None,
                                        embed,
                                    })
                                },
                            }
                        }
                        item.skip(reader)?;
                    }
                }
            },
            _ => child.skip(reader)?,
        }
    }
    Ok(())
}

/// `p:spPr` into the geometry and styling of `shape`; returns the preset
/// geometry name if one is given.
fn read_sp_pr<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    shape: &mut Shape,
) -> Result<Option<String>> {
    let mut preset = None;
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"xfrm" => {
                read_xfrm(reader, &child, shape)?;
            },
            b"prstGeom" => {
                preset = child.attr(b"prst")?;
                child.skip(reader)?;
            },
            b"ln" => shape.border = read_line(reader, &child)?,
            b"effectLst" => shape.shadow = read_effects(reader, &child)?,
            name if is_fill(name) => shape.fill = read_fill(reader, &child)?,
            _ => child.skip(reader)?,
        }
    }
    Ok(preset)
}

fn read_sp<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    ctx: &mut ReadContext<'_, '_>,
) -> Result<Option<(Option<u32>, Shape)>> {
    let mut shape = Shape::new(ShapeKind::Line);
    let mut nv = NonVisual::default();
    let mut preset = None;
    let mut text = None;
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"nvSpPr" => nv = read_non_visual(reader, &child, ctx)?,
            b"spPr" => preset = read_sp_pr(reader, &child, &mut shape)?,
            b"txBody" => text = Some(read_text_body(reader, &child, ctx)?),
            _ => child.skip(reader)?,
        }
    }

    let plain_text = nv.text_box
        || (nv.placeholder.is_some() && preset.as_deref().is_none_or(|p| p == "rect"));
    let text = text.unwrap_or_default();
    let label = if plain_text {
        shape.kind = ShapeKind::RichText(text);
        "TextBox"
    } else {
        shape.kind = ShapeKind::AutoShape {
            geometry: AutoShapeType::from_xml_value(preset.as_deref().unwrap_or("rect")),
            text,
        };
        "Shape"
    };
    let id = nv.id;
    nv.apply(&mut shape, label);
    Ok(Some((id, shape)))
}

fn read_pic<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    ctx: &mut ReadContext<'_, '_>,
) -> Result<Option<(Option<u32>, Shape)>> {
    let mut shape = Shape::new(ShapeKind::Line);
    let mut nv = NonVisual::default();
    let mut blip = None;
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"nvPicPr" => nv = read_non_visual(reader, &child, ctx)?,
            b"blipFill" => {
                while let Some(fill) = next_in(reader, &child)? {
                    if fill.local_name() == b"blip" {
                        blip = fill.attr(b"embed")?;
                    }
                    fill.skip(reader)?;
                }
            },
            b"spPr" => {
                read_sp_pr(reader, &child, &mut shape)?;
            },
            _ => child.skip(reader)?,
        }
    }

    let picture = blip.as_deref().map(|r_id| ctx.source(r_id)).transpose()?;
    let label = match nv.media.take() {
        Some(media) => {
            let Some(r_id) = media.embed.as_deref().or(media.link.as_deref()) else {
                return Err(Error::invalid_package(format!(
                    "{}: media shape without a clip relationship",
                    ctx.partname()
                )));
            };
            let source = ctx.source(r_id)?;
            shape.kind = ShapeKind::Media(Media {
                kind: media.kind,
                source,
                poster: picture,
            });
            match media.kind {
                MediaKind::Video => "Video",
                MediaKind::Audio => "Audio",
            }
        },
        None => {
            let Some(source) = picture else {
                return Err(Error::invalid_package(format!(
                    "{}: picture without an image relationship",
                    ctx.partname()
                )));
            };
            shape.kind = ShapeKind::Drawing(source);
            "Picture"
        },
    };
    let id = nv.id;
    nv.apply(&mut shape, label);
    Ok(Some((id, shape)))
}

fn read_graphic_frame<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    ctx: &mut ReadContext<'_, '_>,
) -> Result<Option<(Option<u32>, Shape)>> {
    let mut shape = Shape::new(ShapeKind::Line);
    let mut nv = NonVisual::default();
    let mut kind = None;
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"nvGraphicFramePr" => nv = read_non_visual(reader, &child, ctx)?,
            b"xfrm" => {
                read_xfrm(reader, &child, &mut shape)?;
            },
            b"graphic" => {
                while let Some(data) = next_in(reader, &child)? {
                    if data.local_name() == b"graphicData" {
                        kind = read_graphic_data(reader, &data, ctx)?;
                    } else {
                        data.skip(reader)?;
                    }
                }
            },
            _ => child.skip(reader)?,
        }
    }

    let Some(kind) = kind else {
        return Ok(None);
    };
    let label = match kind {
        ShapeKind::Table(_) => "Table",
        _ => "Chart",
    };
    shape.kind = kind;
    let id = nv.id;
    nv.apply(&mut shape, label);
    Ok(Some((id, shape)))
}

fn read_graphic_data<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    ctx: &mut ReadContext<'_, '_>,
) -> Result<Option<ShapeKind>> {
    let uri = el.attr(b"uri")?.unwrap_or_default();
    let mut kind = None;
    while let Some(child) = next_in(reader, el)? {
        match (uri.as_str(), child.local_name()) {
            (namespace::DML_TABLE, b"tbl") => {
                kind = Some(ShapeKind::Table(read_table(reader, &child, ctx)?));
            },
            (namespace::DML_CHART, b"chart") => {
                let r_id = child.attr(b"id")?;
                child.skip(reader)?;
                let Some(r_id) = r_id else {
                    return Err(Error::invalid_package(format!(
                        "{}: chart frame without a relationship id",
                        ctx.partname()
                    )));
                };
                let partname = ctx.target(&r_id)?.clone();
                let mut chart_ctx = ctx.child(partname);
                kind = Some(ShapeKind::Chart(Box::new(read_chart_part(&mut chart_ctx)?)));
            },
            _ => {
                log::debug!("{}: unsupported graphic frame content {uri}", ctx.partname());
                child.skip(reader)?;
            },
        }
    }
    Ok(kind)
}

fn read_table<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    ctx: &ReadContext<'_, '_>,
) -> Result<Table> {
    let mut table = Table {
        columns: Vec::new(),
        rows: Vec::new(),
        first_row: false,
        band_row: false,
    };
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"tblPr" => {
                table.first_row = child.attr_bool(b"firstRow")?.unwrap_or(false);
                table.band_row = child.attr_bool(b"bandRow")?.unwrap_or(false);
                child.skip(reader)?;
            },
            b"tblGrid" => {
                while let Some(col) = next_in(reader, &child)? {
                    if col.local_name() == b"gridCol" {
                        table.columns.push(col.attr_parse(b"w")?.unwrap_or(0));
                    }
                    col.skip(reader)?;
                }
            },
            b"tr" => {
                let mut row = Row {
                    height: child.attr_parse(b"h")?.unwrap_or(0),
                    cells: Vec::new(),
                    fill: None,
                };
                while let Some(tc) = next_in(reader, &child)? {
                    if tc.local_name() == b"tc" {
                        row.cells.push(read_cell(reader, &tc, ctx)?);
                    } else {
                        tc.skip(reader)?;
                    }
                }
                table.rows.push(row);
            },
            _ => child.skip(reader)?,
        }
    }
    Ok(table)
}

fn read_cell<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>, ctx: &ReadContext<'_, '_>) -> Result<Cell> {
    let mut cell = Cell {
        col_span: el.attr_parse(b"gridSpan")?.unwrap_or(1),
        row_span: el.attr_parse(b"rowSpan")?.unwrap_or(1),
        ..Default::default()
    };
    if el.attr_bool(b"hMerge")?.unwrap_or(false) {
        cell.col_span = 0;
    }
    if el.attr_bool(b"vMerge")?.unwrap_or(false) {
        cell.row_span = 0;
    }
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"txBody" => cell.text = read_text_body(reader, &child, ctx)?,
            b"tcPr" => {
                while let Some(prop) = next_in(reader, &child)? {
                    match prop.local_name() {
                        b"lnL" => cell.borders.left = read_line(reader, &prop)?,
                        b"lnR" => cell.borders.right = read_line(reader, &prop)?,
                        b"lnT" => cell.borders.top = read_line(reader, &prop)?,
                        b"lnB" => cell.borders.bottom = read_line(reader, &prop)?,
                        name if is_fill(name) => cell.fill = read_fill(reader, &prop)?,
                        _ => prop.skip(reader)?,
                    }
                }
            },
            _ => child.skip(reader)?,
        }
    }
    Ok(cell)
}

fn read_connector<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    ctx: &mut ReadContext<'_, '_>,
) -> Result<Option<(Option<u32>, Shape)>> {
    let mut shape = Shape::new(ShapeKind::Line);
    let mut nv = NonVisual::default();
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"nvCxnSpPr" => nv = read_non_visual(reader, &child, ctx)?,
            b"spPr" => {
                read_sp_pr(reader, &child, &mut shape)?;
            },
            _ => child.skip(reader)?,
        }
    }
    let id = nv.id;
    nv.apply(&mut shape, "Line");
    Ok(Some((id, shape)))
}

/// Group members are mapped from the group's child space onto the
/// parent's coordinates.
fn read_group<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    ctx: &mut ReadContext<'_, '_>,
) -> Result<Option<(Option<u32>, Shape)>> {
    let mut shape = Shape::new(ShapeKind::Group(Vec::new()));
    let mut nv = NonVisual::default();
    let mut transform = None;
    let mut children = Vec::new();
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"nvGrpSpPr" => nv = read_non_visual(reader, &child, ctx)?,
            b"grpSpPr" => {
                while let Some(prop) = next_in(reader, &child)? {
                    match prop.local_name() {
                        b"xfrm" => transform = read_xfrm(reader, &prop, &mut shape)?,
                        name if is_fill(name) => shape.fill = read_fill(reader, &prop)?,
                        _ => prop.skip(reader)?,
                    }
                }
            },
            b"sp" | b"pic" | b"graphicFrame" | b"cxnSp" | b"grpSp" => {
                if let Some((_, member)) = read_shape(reader, &child, ctx)? {
                    children.push(member);
                }
            },
            _ => child.skip(reader)?,
        }
    }
    if let Some(transform) = transform {
        for member in &mut children {
            member.walk_mut(&mut |s| transform.apply(&shape, s));
        }
    }
    shape.kind = ShapeKind::Group(children);
    let id = nv.id;
    nv.apply(&mut shape, "Group");
    Ok(Some((id, shape)))
}

