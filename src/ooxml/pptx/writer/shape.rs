//! Shape tree serialization: `p:sp`, `p:pic`, `p:graphicFrame`, `p:cxnSp`
//! and `p:grpSp`.
//!
//! Shape ids are handed out by the [`PartContext`] in document order,
//! starting at 2 (id 1 is the shape tree). Comments live in their own part
//! and produce no element here.

use std::fmt::Write as FmtWrite;

use super::chart::write_chart_part;
use super::context::PartContext;
use super::drawing::{write_fill, write_line, write_shadow, write_xfrm};
use super::text::{write_hlink_click, write_text_body};
use crate::common::Result;
use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::namespace;
use crate::presentation::media::{DrawingSource, MediaKind};
use crate::presentation::shape::{Media, Shape, ShapeKind};
use crate::presentation::table::Table;

const MEDIA_EXT_URI: &str = "{DAA4B4D4-6D71-4841-9C94-3DE7FCFB9230}";
const P14_NS: &str = "http://schemas.microsoft.com/office/powerpoint/2010/main";
const MEDIA_CLICK_ACTION: &str = "ppaction://media";

/// 1x1 transparent PNG used as the poster frame of media without one.
const BLANK_POSTER: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Write `shapes` in order and return the id given to each one; comments get
/// `None`.
pub(crate) fn write_shapes(
    xml: &mut String,
    shapes: &[Shape],
    ctx: &mut PartContext<'_>,
) -> Result<Vec<Option<u32>>> {
    shapes.iter().map(|shape| write_shape(xml, shape, ctx)).collect()
}

pub(crate) fn write_shape(
    xml: &mut String,
    shape: &Shape,
    ctx: &mut PartContext<'_>,
) -> Result<Option<u32>> {
    if let ShapeKind::Comment(_) = shape.kind {
        return Ok(None);
    }
    let id = ctx.shape_id();
    match &shape.kind {
        ShapeKind::RichText(text) => {
            xml.push_str("<p:sp><p:nvSpPr>");
            write_cnvpr(xml, id, shape, "TextBox", ctx)?;
            if shape.placeholder.is_some() {
                xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
            } else {
                xml.push_str(r#"<p:cNvSpPr txBox="1"/>"#);
            }
            write_nvpr(xml, shape)?;
            xml.push_str("</p:nvSpPr>");
            write_sp_pr(xml, shape, "rect")?;
            write_text_body(xml, "p:txBody", text, ctx)?;
            xml.push_str("</p:sp>");
        },
        ShapeKind::AutoShape { geometry, text } => {
            xml.push_str("<p:sp><p:nvSpPr>");
            write_cnvpr(xml, id, shape, "Shape", ctx)?;
            if shape.placeholder.is_some() {
                xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
            } else {
                xml.push_str("<p:cNvSpPr/>");
            }
            write_nvpr(xml, shape)?;
            xml.push_str("</p:nvSpPr>");
            write_sp_pr(xml, shape, geometry.xml_value())?;
            write_text_body(xml, "p:txBody", text, ctx)?;
            xml.push_str("</p:sp>");
        },
        ShapeKind::Drawing(source) => {
            let r_id = ctx.embed_image(source)?;
            xml.push_str("<p:pic><p:nvPicPr>");
            write_cnvpr(xml, id, shape, "Picture", ctx)?;
            xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
            write_nvpr(xml, shape)?;
            xml.push_str("</p:nvPicPr>");
            write_blip_fill(xml, &r_id)?;
            write_sp_pr(xml, shape, "rect")?;
            xml.push_str("</p:pic>");
        },
        ShapeKind::Table(table) => {
            write_graphic_frame_open(xml, id, shape, "Table", ctx)?;
            write!(xml, r#"<a:graphic><a:graphicData uri="{}">"#, namespace::DML_TABLE)?;
            write_table(xml, table, ctx)?;
            xml.push_str("</a:graphicData></a:graphic></p:graphicFrame>");
        },
        ShapeKind::Chart(chart) => {
            let name = display_name(shape, "Chart", id);
            let r_id = write_chart_part(chart, &name, ctx)?;
            write_graphic_frame_open(xml, id, shape, "Chart", ctx)?;
            write!(
                xml,
                r#"<a:graphic><a:graphicData uri="{0}"><c:chart xmlns:c="{0}" r:id="{r_id}"/></a:graphicData></a:graphic>"#,
                namespace::DML_CHART
            )?;
            xml.push_str("</p:graphicFrame>");
        },
        ShapeKind::Line => {
            xml.push_str("<p:cxnSp><p:nvCxnSpPr>");
            write_cnvpr(xml, id, shape, "Line", ctx)?;
            xml.push_str("<p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr>");
            write_sp_pr(xml, shape, "line")?;
            xml.push_str("</p:cxnSp>");
        },
        ShapeKind::Group(children) => {
            xml.push_str("<p:grpSp><p:nvGrpSpPr>");
            write_cnvpr(xml, id, shape, "Group", ctx)?;
            xml.push_str("<p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>");
            write!(
                xml,
                r#"<p:grpSpPr><a:xfrm><a:off x="{0}" y="{1}"/><a:ext cx="{2}" cy="{3}"/><a:chOff x="{0}" y="{1}"/><a:chExt cx="{2}" cy="{3}"/></a:xfrm></p:grpSpPr>"#,
                shape.offset_x, shape.offset_y, shape.width, shape.height
            )?;
            write_shapes(xml, children, ctx)?;
            xml.push_str("</p:grpSp>");
        },
        ShapeKind::Media(media) => write_media(xml, id, shape, media, ctx)?,
        ShapeKind::Comment(_) => {},
    }
    Ok(Some(id))
}

fn display_name(shape: &Shape, kind: &str, id: u32) -> String {
    if shape.name.is_empty() {
        format!("{kind} {id}")
    } else {
        shape.name.clone()
    }
}

fn write_cnvpr(
    xml: &mut String,
    id: u32,
    shape: &Shape,
    kind: &str,
    ctx: &mut PartContext<'_>,
) -> Result<()> {
    write!(
        xml,
        r#"<p:cNvPr id="{id}" name="{}""#,
        escape_xml(&display_name(shape, kind, id))
    )?;
    if !shape.description.is_empty() {
        write!(xml, r#" descr="{}""#, escape_xml(&shape.description))?;
    }
    match &shape.hyperlink {
        Some(hyperlink) => {
            xml.push('>');
            write_hlink_click(xml, hyperlink, ctx)?;
            xml.push_str("</p:cNvPr>");
        },
        None => xml.push_str("/>"),
    }
    Ok(())
}

fn write_nvpr(xml: &mut String, shape: &Shape) -> Result<()> {
    match &shape.placeholder {
        Some(ph) => {
            write!(xml, r#"<p:nvPr><p:ph type="{}""#, ph.kind.xml_value())?;
            if let Some(idx) = ph.idx {
                write!(xml, r#" idx="{idx}""#)?;
            }
            xml.push_str("/></p:nvPr>");
        },
        None => xml.push_str("<p:nvPr/>"),
    }
    Ok(())
}

fn write_sp_pr(xml: &mut String, shape: &Shape, geometry: &str) -> Result<()> {
    xml.push_str("<p:spPr>");
    if !shape.inherits_geometry() {
        write_xfrm(xml, "a:xfrm", shape)?;
        write!(xml, r#"<a:prstGeom prst="{geometry}"><a:avLst/></a:prstGeom>"#)?;
    }
    write_fill(xml, &shape.fill)?;
    write_line(xml, "a:ln", &shape.border, false)?;
    write_shadow(xml, &shape.shadow)?;
    xml.push_str("</p:spPr>");
    Ok(())
}

fn write_blip_fill(xml: &mut String, r_id: &str) -> Result<()> {
    write!(
        xml,
        r#"<p:blipFill><a:blip r:embed="{r_id}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#
    )?;
    Ok(())
}

fn write_graphic_frame_open(
    xml: &mut String,
    id: u32,
    shape: &Shape,
    kind: &str,
    ctx: &mut PartContext<'_>,
) -> Result<()> {
    xml.push_str("<p:graphicFrame><p:nvGraphicFramePr>");
    write_cnvpr(xml, id, shape, kind, ctx)?;
    xml.push_str(r#"<p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr>"#);
    write_nvpr(xml, shape)?;
    xml.push_str("</p:nvGraphicFramePr>");
    write_xfrm(xml, "p:xfrm", shape)
}

fn write_table(xml: &mut String, table: &Table, ctx: &mut PartContext<'_>) -> Result<()> {
    write!(
        xml,
        r#"<a:tbl><a:tblPr firstRow="{}" bandRow="{}"/><a:tblGrid>"#,
        u8::from(table.first_row),
        u8::from(table.band_row)
    )?;
    for width in &table.columns {
        write!(xml, r#"<a:gridCol w="{width}"/>"#)?;
    }
    xml.push_str("</a:tblGrid>");

    for row in &table.rows {
        write!(xml, r#"<a:tr h="{}">"#, row.height)?;
        for cell in &row.cells {
            xml.push_str("<a:tc");
            if cell.col_span > 1 {
                write!(xml, r#" gridSpan="{}""#, cell.col_span)?;
            }
            if cell.row_span > 1 {
                write!(xml, r#" rowSpan="{}""#, cell.row_span)?;
            }
            if cell.col_span == 0 {
                xml.push_str(r#" hMerge="1""#);
            }
            if cell.row_span == 0 {
                xml.push_str(r#" vMerge="1""#);
            }
            xml.push('>');
            write_text_body(xml, "a:txBody", &cell.text, ctx)?;
            xml.push_str("<a:tcPr>");
            write_line(xml, "a:lnL", &cell.borders.left, true)?;
            write_line(xml, "a:lnR", &cell.borders.right, true)?;
            write_line(xml, "a:lnT", &cell.borders.top, true)?;
            write_line(xml, "a:lnB", &cell.borders.bottom, true)?;
            let fill = if cell.fill.is_none() {
                row.fill.as_ref().filter(|f| !f.is_none())
            } else {
                Some(&cell.fill)
            };
            if let Some(fill) = fill {
                write_fill(xml, fill)?;
            }
            xml.push_str("</a:tcPr></a:tc>");
        }
        xml.push_str("</a:tr>");
    }
    xml.push_str("</a:tbl>");
    Ok(())
}

/// Audio and video are pictures carrying a link to the clip, the PowerPoint
/// 2010 media extension and a poster frame.
fn write_media(
    xml: &mut String,
    id: u32,
    shape: &Shape,
    media: &Media,
    ctx: &mut PartContext<'_>,
) -> Result<()> {
    let (link_id, embed_id) = ctx.embed_media(&media.source, media.kind)?;
    let blank = DrawingSource::Base64(BLANK_POSTER.to_string());
    let poster_id = ctx.embed_image(media.poster.as_ref().unwrap_or(&blank))?;

    let (kind, file_element) = match media.kind {
        MediaKind::Video => ("Video", "a:videoFile"),
        MediaKind::Audio => ("Audio", "a:audioFile"),
    };
    write!(
        xml,
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="{}">"#,
        escape_xml(&display_name(shape, kind, id))
    )?;
    write!(xml, r#"<a:hlinkClick r:id="" action="{MEDIA_CLICK_ACTION}"/></p:cNvPr>"#)?;
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
    write!(xml, r#"<p:nvPr><{file_element} r:link="{link_id}"/>"#)?;
    write!(
        xml,
        r#"<p:extLst><p:ext uri="{MEDIA_EXT_URI}"><p14:media xmlns:p14="{P14_NS}" r:embed="{embed_id}"/></p:ext></p:extLst>"#
    )?;
    xml.push_str("</p:nvPr></p:nvPicPr>");
    write_blip_fill(xml, &poster_id)?;
    write_sp_pr(xml, shape, "rect")?;
    xml.push_str("</p:pic>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::PackURI;
    use crate::ooxml::opc::constants::relationship_type as rt;
    use crate::ooxml::pptx::writer::context::WriteState;
    use crate::presentation::chart::{Chart, ChartType, Series};
    use crate::presentation::rich_text::{Hyperlink, RichText};
    use crate::presentation::shape::{Placeholder, PlaceholderType};
    use crate::presentation::style::{Border, Color};
    use chrono::Utc;

    const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn render(shapes: &[Shape]) -> (String, Vec<Option<u32>>, WriteState) {
        let mut state = WriteState::new();
        let mut ctx = PartContext::new(&mut state, PackURI::new("/ppt/slides/slide1.xml").unwrap());
        let mut xml = String::new();
        let ids = write_shapes(&mut xml, shapes, &mut ctx).unwrap();
        (xml, ids, state)
    }

    #[test]
    fn test_text_box_and_comment_ids() {
        let mut text_shape = Shape::rich_text().with_offset(100, 200).with_size(300, 400);
        *text_shape.text_mut().unwrap() = RichText::from_text("Hello");
        let comment = Shape::comment(None, "note", Utc::now());
        let (xml, ids, _) = render(&[text_shape, comment, Shape::rich_text()]);
        assert_eq!(ids, vec![Some(2), None, Some(3)]);
        assert!(xml.contains(r#"<p:cNvPr id="2" name="TextBox 2"/><p:cNvSpPr txBox="1"/>"#));
        assert!(xml.contains(r#"<a:off x="100" y="200"/><a:ext cx="300" cy="400"/>"#));
        assert!(xml.contains("<a:t>Hello</a:t>"));
    }

    #[test]
    fn test_placeholder_without_geometry_inherits() {
        let shape = Shape::rich_text().with_placeholder(Placeholder::with_idx(PlaceholderType::Body, 1));
        let (xml, _, _) = render(&[shape]);
        assert!(xml.contains(r#"<p:ph type="body" idx="1"/>"#));
        assert!(xml.contains(r#"<a:spLocks noGrp="1"/>"#));
        assert!(!xml.contains("<a:xfrm"));
    }

    #[test]
    fn test_picture_and_shape_hyperlink() {
        let shape = Shape::drawing(DrawingSource::memory(PNG.to_vec(), "image/png"))
            .with_hyperlink(Hyperlink::url("https://example.com"));
        let (xml, _, state) = render(&[shape]);
        assert!(xml.contains(r#"<a:blip r:embed="rId1"/>"#));
        assert!(xml.contains(r#"<a:hlinkClick r:id="rId2"/></p:cNvPr>"#));
        assert!(state.package.contains(&PackURI::new("/ppt/media/image1.png").unwrap()));
    }

    #[test]
    fn test_table_merges_and_borders() {
        let mut table = Table::new(2, 2_000_000);
        table.create_row(370_840);
        table.create_row(370_840);
        assert!(table.merge(0, 0, 2, 2));
        if let Some(cell) = table.cell_mut(0, 0) {
            cell.borders.top = Border::new(1.0, Color::BLACK);
        }
        let (xml, _, _) = render(&[Shape::table(table)]);
        assert!(xml.contains(r#"<a:tc gridSpan="2" rowSpan="2">"#));
        assert!(xml.contains(r#"<a:tc hMerge="1">"#));
        assert!(xml.contains(r#"<a:tc hMerge="1" vMerge="1">"#));
        assert!(xml.contains(r#"<a:gridCol w="1000000"/>"#));
        assert!(xml.contains(r#"<a:lnT w="12700" cmpd="sng">"#));
        assert!(xml.contains("<a:lnL><a:noFill/></a:lnL>"));
    }

    #[test]
    fn test_chart_frame_and_group_children() {
        let chart = Chart::with_type(ChartType::bar().with_series(Series::new("S", [("a", 1.0)])));
        let child = Shape::line(0, 0, 100, 100);
        let (xml, ids, state) = render(&[Shape::chart(chart), Shape::group(vec![child])]);
        assert_eq!(ids, vec![Some(2), Some(3)]);
        assert!(xml.contains(r#"<c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="rId1"/>"#));
        assert!(xml.contains(r#"<p:cNvPr id="4" name="Line 4"/>"#));
        assert!(xml.contains(r#"<a:prstGeom prst="line">"#));
        let slide = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        let rels = state.package.rels().relationships_for(&slide).unwrap();
        assert_eq!(rels.get("rId1").unwrap().reltype(), rt::CHART);
    }

    #[test]
    fn test_media_writes_link_embed_and_poster() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        std::fs::write(&path, b"ID3\x03\x00").unwrap();
        let (xml, _, state) = render(&[Shape::media(MediaKind::Audio, DrawingSource::file(&path))]);
        assert!(xml.contains(r#"<a:audioFile r:link="rId1"/>"#));
        assert!(xml.contains(r#"<p14:media xmlns:p14="http://schemas.microsoft.com/office/powerpoint/2010/main" r:embed="rId2"/>"#));
        assert!(xml.contains(r#"<a:blip r:embed="rId3"/>"#));
        assert!(state.package.contains(&PackURI::new("/ppt/media/media1.mp3").unwrap()));
        assert!(state.package.contains(&PackURI::new("/ppt/media/image1.png").unwrap()));
    }
}
