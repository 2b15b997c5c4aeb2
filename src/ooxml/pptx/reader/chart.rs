//! Chart parts (`c:chartSpace`) back into [`Chart`].
//!
//! Series data comes from the string and number caches (or literals) in the
//! chart part itself; the embedded workbook is never opened. A plot area
//! with several type groups keeps the first one.

use std::collections::BTreeMap;

use super::context::ReadContext;
use super::drawing::{is_fill, read_fill, read_line, read_outline};
use super::events::{Element, XmlReader, next_in, root, val, val_bool, xml_reader};
use super::text::read_font_props;
use crate::common::{Error, Result};
use crate::common::unit::angle_to_degrees;
use crate::presentation::chart::{
    Axis, BarDirection, Chart, ChartType, DataLabelPosition, DataLabels, DisplayBlanks, Gridlines,
    Grouping, Legend, LegendPosition, Marker, MarkerSymbol, RadarStyle, ScatterStyle, Series,
    TickLabelPosition, TickMark, Title, View3D,
};
use crate::presentation::style::{Fill, Font, Outline};

/// Parse the chart part the context points at.
pub(crate) fn read_chart_part(ctx: &mut ReadContext<'_, '_>) -> Result<Chart> {
    let partname = ctx.partname().clone();
    let bytes = ctx.blob(&partname)?;
    let mut reader = xml_reader(&bytes);
    let space = root(&mut reader, b"chartSpace")?;

    let mut chart = Chart {
        include_spreadsheet: false,
        ..Default::default()
    };
    while let Some(child) = next_in(&mut reader, &space)? {
        match child.local_name() {
            b"roundedCorners" => chart.rounded_corners = val_bool(&mut reader, &child)?,
            b"chart" => read_chart(&mut reader, &child, &mut chart)?,
            b"externalData" => {
                chart.include_spreadsheet = true;
                child.skip(&mut reader)?;
            },
            _ => child.skip(&mut reader)?,
        }
    }
    if chart.chart_type().is_none() {
        log::debug!("{partname}: no supported chart type in plot area");
    }
    Ok(chart)
}

fn read_chart<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>, chart: &mut Chart) -> Result<()> {
    let mut title = None;
    let mut auto_title_deleted = false;
    chart.legend.visible = false;
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"title" => title = Some(read_title(reader, &child)?),
            b"autoTitleDeleted" => auto_title_deleted = val_bool(reader, &child)?,
            b"view3D" => chart.view3d = read_view_3d(reader, &child)?,
            b"plotArea" => read_plot_area(reader, &child, chart)?,
            b"legend" => chart.legend = read_legend(reader, &child)?,
            b"dispBlanksAs" => {
                if let Some(value) = val::<String>(reader, &child)? {
                    chart.display_blanks_as = DisplayBlanks::from_xml_value(&value);
                }
            },
            _ => child.skip(reader)?,
        }
    }
    chart.title = match title {
        Some(read) => Title {
            visible: true,
            text: read.text,
            font: read.font.unwrap_or_else(|| Title::default().font),
        },
        None if auto_title_deleted => Title::hidden(),
        None => Title {
            visible: true,
            ..Default::default()
        },
    };
    Ok(())
}

#[derive(Debug, Default)]
struct ReadTitle {
    text: String,
    rotation: Option<f64>,
    font: Option<Font>,
}

/// `c:title` with rich text; paragraphs are joined with newlines.
fn read_title<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<ReadTitle> {
    let mut title = ReadTitle::default();
    let mut paragraphs: Vec<String> = Vec::new();
    while let Some(child) = next_in(reader, el)? {
        if child.local_name() != b"tx" {
            child.skip(reader)?;
            continue;
        }
        while let Some(body) = next_in(reader, &child)? {
            match body.local_name() {
                b"rich" => {
                    while let Some(item) = next_in(reader, &body)? {
                        match item.local_name() {
                            b"bodyPr" => {
                                title.rotation = item.attr_parse::<i64>(b"rot")?.map(angle_to_degrees);
                                item.skip(reader)?;
                            },
                            b"p" => paragraphs.push(read_title_paragraph(reader, &item, &mut title.font)?),
                            _ => item.skip(reader)?,
                        }
                    }
                },
                b"strRef" => {
                    let points = read_points(reader, &body)?;
                    paragraphs.extend(points.values.into_values());
                },
                _ => body.skip(reader)?,
            }
        }
    }
    title.text = paragraphs.join("\n");
    Ok(title)
}

/// Text of one title paragraph. The first run's font wins over the
/// paragraph default.
fn read_title_paragraph<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
    font: &mut Option<Font>,
) -> Result<String> {
    let mut text = String::new();
    let mut run_font_seen = false;
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"pPr" => {
                while let Some(prop) = next_in(reader, &child)? {
                    if prop.local_name() == b"defRPr" {
                        let def = read_font_props(reader, &prop)?;
                        if font.is_none() {
                            *font = Some(def);
                        }
                    } else {
                        prop.skip(reader)?;
                    }
                }
            },
            b"r" | b"fld" => {
                while let Some(part) = next_in(reader, &child)? {
                    match part.local_name() {
                        b"rPr" => {
                            let run = read_font_props(reader, &part)?;
                            if !run_font_seen {
                                *font = Some(run);
                                run_font_seen = true;
                            }
                        },
                        b"t" => text.push_str(&part.text(reader)?),
                        _ => part.skip(reader)?,
                    }
                }
            },
            _ => child.skip(reader)?,
        }
    }
    Ok(text)
}

/// Default font of a `c:txPr`.
fn read_text_props<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Option<Font>> {
    let mut font = None;
    while let Some(child) = next_in(reader, el)? {
        if child.local_name() != b"p" {
            child.skip(reader)?;
            continue;
        }
        while let Some(item) = next_in(reader, &child)? {
            if item.local_name() != b"pPr" {
                item.skip(reader)?;
                continue;
            }
            while let Some(prop) = next_in(reader, &item)? {
                if prop.local_name() == b"defRPr" && font.is_none() {
                    font = Some(read_font_props(reader, &prop)?);
                } else {
                    prop.skip(reader)?;
                }
            }
        }
    }
    Ok(font)
}

fn read_view_3d<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<View3D> {
    let mut view = View3D::default();
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"rotX" => view.rotation_x = val(reader, &child)?.unwrap_or(0),
            b"rotY" => view.rotation_y = val(reader, &child)?.unwrap_or(0),
            b"hPercent" => view.height_percent = val(reader, &child)?,
            b"autoHPercent" => {
                if val_bool(reader, &child)? {
                    view.height_percent = None;
                }
            },
            b"depthPercent" => view.depth_percent = val(reader, &child)?.unwrap_or(100),
            b"rAngAx" => view.right_angle_axes = val_bool(reader, &child)?,
            b"perspective" => view.perspective = val(reader, &child)?.unwrap_or(30),
            _ => child.skip(reader)?,
        }
    }
    Ok(view)
}

/// Settings of one `c:xxxChart` type group.
#[derive(Debug, Default)]
struct TypeGroup {
    direction: Option<BarDirection>,
    grouping: Option<Grouping>,
    scatter_style: Option<ScatterStyle>,
    radar_style: Option<RadarStyle>,
    gap_width: Option<u32>,
    overlap: Option<i32>,
    first_slice_angle: Option<u32>,
    hole_size: Option<u32>,
    explosion: Option<u32>,
    axis_ids: Vec<u32>,
    series: Vec<Series>,
}

const TYPE_ELEMENTS: [&[u8]; 9] = [
    b"barChart",
    b"bar3DChart",
    b"lineChart",
    b"pieChart",
    b"pie3DChart",
    b"scatterChart",
    b"areaChart",
    b"doughnutChart",
    b"radarChart",
];

fn read_plot_area<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>, chart: &mut Chart) -> Result<()> {
    let mut axis_ids = Vec::new();
    let mut axes: Vec<(Option<u32>, Axis)> = Vec::new();
    while let Some(child) = next_in(reader, el)? {
        let name = child.local_name();
        if TYPE_ELEMENTS.contains(&name) {
            let element = name.to_vec();
            if chart.plot_area.chart_type.is_some() {
                return Err(Error::UnsupportedFormat(format!(
                    "combined chart with a second {} type group",
                    String::from_utf8_lossy(&element)
                )));
            }
            let group = read_type_group(reader, &child)?;
            axis_ids = group.axis_ids.clone();
            chart.plot_area.chart_type = Some(build_chart_type(&element, group));
            continue;
        }
        match name {
            b"catAx" | b"valAx" | b"dateAx" | b"serAx" => axes.push(read_axis(reader, &child)?),
            b"layout" => child.skip(reader)?,
            other if other.ends_with(b"Chart") => {
                return Err(Error::UnsupportedFormat(format!(
                    "unsupported chart type {}",
                    String::from_utf8_lossy(other)
                )));
            },
            other => {
                log::debug!("skipping plot area element {}", String::from_utf8_lossy(other));
                child.skip(reader)?;
            },
        }
    }

    if chart.plot_area.chart_type.is_none() {
        return Err(Error::UnsupportedFormat("plot area has no chart type".to_string()));
    }

    let mut take_axis = |id: Option<&u32>| -> Option<Axis> {
        let position = id
            .and_then(|id| axes.iter().position(|(axis_id, _)| *axis_id == Some(*id)))
            .or_else(|| (!axes.is_empty()).then_some(0))?;
        Some(axes.remove(position).1)
    };
    if let Some(axis) = take_axis(axis_ids.first()) {
        chart.plot_area.axis_x = axis;
    }
    if let Some(axis) = take_axis(axis_ids.get(1)) {
        chart.plot_area.axis_y = axis;
    }
    Ok(())
}

fn read_type_group<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<TypeGroup> {
    let mut group = TypeGroup::default();
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"barDir" => {
                group.direction = val::<String>(reader, &child)?.map(|v| BarDirection::from_xml_value(&v));
            },
            b"grouping" => {
                group.grouping = val::<String>(reader, &child)?.map(|v| Grouping::from_xml_value(&v));
            },
            b"scatterStyle" => {
                group.scatter_style = val::<String>(reader, &child)?.map(|v| ScatterStyle::from_xml_value(&v));
            },
            b"radarStyle" => {
                group.radar_style = val::<String>(reader, &child)?.map(|v| RadarStyle::from_xml_value(&v));
            },
            b"gapWidth" => group.gap_width = val(reader, &child)?,
            b"overlap" => group.overlap = val(reader, &child)?,
            b"firstSliceAng" => group.first_slice_angle = val(reader, &child)?,
            b"holeSize" => group.hole_size = val(reader, &child)?,
            b"axId" => {
                if let Some(id) = val(reader, &child)? {
                    group.axis_ids.push(id);
                }
            },
            b"ser" => {
                let (series, explosion) = read_series(reader, &child)?;
                if group.explosion.is_none() {
                    group.explosion = explosion;
                }
                group.series.push(series);
            },
            _ => child.skip(reader)?,
        }
    }
    Ok(group)
}

fn build_chart_type(element: &[u8], group: TypeGroup) -> ChartType {
    let series = group.series;
    match element {
        b"barChart" => ChartType::Bar {
            series,
            direction: group.direction.unwrap_or_default(),
            grouping: group.grouping.unwrap_or_default(),
            gap_width: group.gap_width.unwrap_or(150),
            overlap: group.overlap.unwrap_or(0),
        },
        b"bar3DChart" => ChartType::Bar3D {
            series,
            direction: group.direction.unwrap_or_default(),
            grouping: group.grouping.unwrap_or_default(),
            gap_width: group.gap_width.unwrap_or(150),
        },
        b"lineChart" => ChartType::Line {
            series,
            grouping: group.grouping.unwrap_or(Grouping::Standard),
        },
        b"pieChart" => ChartType::Pie {
            series,
            first_slice_angle: group.first_slice_angle.unwrap_or(0),
            explosion: group.explosion.unwrap_or(0),
        },
        b"pie3DChart" => ChartType::Pie3D {
            series,
            explosion: group.explosion.unwrap_or(0),
        },
        b"scatterChart" => ChartType::Scatter {
            series,
            style: group.scatter_style.unwrap_or_default(),
        },
        b"areaChart" => ChartType::Area {
            series,
            grouping: group.grouping.unwrap_or(Grouping::Standard),
        },
        b"doughnutChart" => ChartType::Doughnut {
            series,
            first_slice_angle: group.first_slice_angle.unwrap_or(0),
            hole_size: group.hole_size.unwrap_or(50),
        },
        _ => ChartType::Radar {
            series,
            style: group.radar_style.unwrap_or_default(),
        },
    }
}

/// One `c:ser` plus its pie explosion, which the model keeps per chart.
fn read_series<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<(Series, Option<u32>)> {
    let mut series = Series {
        title: String::new(),
        labels: DataLabels::hidden(),
        ..Default::default()
    };
    let mut explosion = None;
    let mut categories = Points::default();
    let mut values = Points::default();
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"tx" => series.title = read_series_title(reader, &child)?,
            b"spPr" => {
                let (fill, outline) = read_chart_shape_props(reader, &child)?;
                if let Some(fill) = fill {
                    series.fill = fill;
                }
                series.outline = outline;
            },
            b"marker" => series.marker = read_marker(reader, &child)?,
            b"explosion" => explosion = val(reader, &child)?,
            b"dPt" => {
                let mut index = None;
                let mut fill = None;
                while let Some(prop) = next_in(reader, &child)? {
                    match prop.local_name() {
                        b"idx" => index = val(reader, &prop)?,
                        b"spPr" => fill = read_chart_shape_props(reader, &prop)?.0,
                        _ => prop.skip(reader)?,
                    }
                }
                if let (Some(index), Some(fill)) = (index, fill) {
                    series.data_point_fills.insert(index, fill);
                }
            },
            b"dLbls" => read_data_labels(reader, &child, &mut series)?,
            b"cat" | b"xVal" => categories = read_points(reader, &child)?,
            b"val" | b"yVal" => values = read_points(reader, &child)?,
            b"smooth" => series.smooth = val_bool(reader, &child)?,
            _ => child.skip(reader)?,
        }
    }

    if let Some(format) = values.format_code.filter(|f| !f.is_empty()) {
        series.number_format = format;
    }
    series.values = values
        .values
        .into_iter()
        .map(|(idx, value)| {
            let category = categories.values.get(&idx).cloned().unwrap_or_default();
            (category, value.trim().parse::<f64>().unwrap_or(0.0))
        })
        .collect();
    Ok((series, explosion))
}

fn read_series_title<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<String> {
    let mut title = String::new();
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"v" => title = child.text(reader)?,
            b"strRef" => {
                let points = read_points(reader, &child)?;
                title = points.values.into_values().next().unwrap_or_default();
            },
            _ => child.skip(reader)?,
        }
    }
    Ok(title)
}

/// Fill and stroke of a chart element's `c:spPr`.
fn read_chart_shape_props<'a>(
    reader: &mut XmlReader<'a>,
    el: &Element<'a>,
) -> Result<(Option<Fill>, Option<Outline>)> {
    let mut fill = None;
    let mut outline = None;
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"ln" => outline = Some(read_outline(reader, &child)?),
            name if is_fill(name) => fill = Some(read_fill(reader, &child)?),
            _ => child.skip(reader)?,
        }
    }
    Ok((fill, outline))
}

fn read_marker<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Marker> {
    let mut marker = Marker::default();
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"symbol" => {
                if let Some(symbol) = val::<String>(reader, &child)? {
                    marker.symbol = MarkerSymbol::from_xml_value(&symbol);
                }
            },
            b"size" => marker.size = val(reader, &child)?.unwrap_or(marker.size),
            b"spPr" => {
                let (fill, outline) = read_chart_shape_props(reader, &child)?;
                marker.fill = fill.unwrap_or_default();
                marker.border = outline.unwrap_or_default();
            },
            _ => child.skip(reader)?,
        }
    }
    Ok(marker)
}

fn read_data_labels<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>, series: &mut Series) -> Result<()> {
    let labels = &mut series.labels;
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"txPr" => {
                if let Some(font) = read_text_props(reader, &child)? {
                    series.font = font;
                }
            },
            b"dLblPos" => {
                series.label_position = val::<String>(reader, &child)?
                    .and_then(|v| DataLabelPosition::from_xml_value(&v));
            },
            b"showLegendKey" => labels.show_legend_key = val_bool(reader, &child)?,
            b"showVal" => labels.show_value = val_bool(reader, &child)?,
            b"showCatName" => labels.show_category_name = val_bool(reader, &child)?,
            b"showSerName" => labels.show_series_name = val_bool(reader, &child)?,
            b"showPercent" => labels.show_percentage = val_bool(reader, &child)?,
            b"showLeaderLines" => labels.show_leader_lines = val_bool(reader, &child)?,
            b"separator" => labels.separator = Some(child.text(reader)?),
            _ => child.skip(reader)?,
        }
    }
    Ok(())
}

/// Cached or literal data points keyed by `idx`.
#[derive(Debug, Default)]
struct Points {
    values: BTreeMap<usize, String>,
    format_code: Option<String>,
}

/// Points of a `c:cat`/`c:val` style element, whichever of the reference
/// caches or literals it holds.
fn read_points<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Points> {
    let mut points = Points::default();
    collect_points(reader, el, &mut points)?;
    Ok(points)
}

fn collect_points<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>, points: &mut Points) -> Result<()> {
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"strRef" | b"numRef" | b"strCache" | b"numCache" | b"strLit" | b"numLit" | b"multiLvlStrRef" => {
                collect_points(reader, &child, points)?
            },
            b"formatCode" => points.format_code = Some(child.text(reader)?),
            b"pt" => {
                let idx: usize = child.attr_parse(b"idx")?.unwrap_or(points.values.len());
                let mut value = String::new();
                while let Some(v) = next_in(reader, &child)? {
                    if v.local_name() == b"v" {
                        value = v.text(reader)?;
                    } else {
                        v.skip(reader)?;
                    }
                }
                points.values.insert(idx, value);
            },
            _ => child.skip(reader)?,
        }
    }
    Ok(())
}

fn read_axis<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<(Option<u32>, Axis)> {
    let mut id = None;
    let mut axis = Axis::default();
    let mut font = None;
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"axId" => id = val(reader, &child)?,
            b"scaling" => {
                while let Some(scale) = next_in(reader, &child)? {
                    match scale.local_name() {
                        b"orientation" => {
                            axis.reversed = val::<String>(reader, &scale)?.as_deref() == Some("maxMin");
                        },
                        b"max" => axis.max_bounds = val(reader, &scale)?,
                        b"min" => axis.min_bounds = val(reader, &scale)?,
                        _ => scale.skip(reader)?,
                    }
                }
            },
            b"delete" => axis.visible = !val_bool(reader, &child)?,
            b"majorGridlines" => axis.major_gridlines = Some(read_gridlines(reader, &child)?),
            b"minorGridlines" => axis.minor_gridlines = Some(read_gridlines(reader, &child)?),
            b"title" => {
                let title = read_title(reader, &child)?;
                axis.title = title.text;
                axis.title_rotation = title.rotation;
                if font.is_none() {
                    font = title.font;
                }
            },
            b"numFmt" => {
                axis.number_format = child.attr(b"formatCode")?.unwrap_or_default();
                child.skip(reader)?;
            },
            b"majorTickMark" => {
                if let Some(mark) = val::<String>(reader, &child)? {
                    axis.major_tick_mark = TickMark::from_xml_value(&mark);
                }
            },
            b"minorTickMark" => {
                if let Some(mark) = val::<String>(reader, &child)? {
                    axis.minor_tick_mark = TickMark::from_xml_value(&mark);
                }
            },
            b"tickLblPos" => {
                if let Some(position) = val::<String>(reader, &child)? {
                    axis.tick_label_position = TickLabelPosition::from_xml_value(&position);
                }
            },
            b"spPr" => {
                if let (_, Some(outline)) = read_chart_shape_props(reader, &child)? {
                    axis.outline = outline;
                }
            },
            b"txPr" => {
                if let Some(txpr) = read_text_props(reader, &child)? {
                    font = Some(txpr);
                }
            },
            b"majorUnit" => axis.major_unit = val(reader, &child)?,
            b"minorUnit" => axis.minor_unit = val(reader, &child)?,
            _ => child.skip(reader)?,
        }
    }
    if let Some(font) = font {
        axis.font = font;
    }
    Ok((id, axis))
}

fn read_gridlines<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Gridlines> {
    let mut gridlines = Gridlines::default();
    while let Some(child) = next_in(reader, el)? {
        if child.local_name() == b"spPr" {
            if let (_, Some(outline)) = read_chart_shape_props(reader, &child)? {
                gridlines.outline = outline;
            }
        } else {
            child.skip(reader)?;
        }
    }
    Ok(gridlines)
}

fn read_legend<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Legend> {
    let mut legend = Legend::default();
    while let Some(child) = next_in(reader, el)? {
        match child.local_name() {
            b"legendPos" => {
                legend.position = val::<String>(reader, &child)?
                    .map(|v| LegendPosition::from_xml_value(&v))
                    .unwrap_or_default();
            },
            b"layout" => {
                while let Some(manual) = next_in(reader, &child)? {
                    if manual.local_name() != b"manualLayout" {
                        manual.skip(reader)?;
                        continue;
                    }
                    while let Some(item) = next_in(reader, &manual)? {
                        match item.local_name() {
                            b"x" => legend.offset_x = val(reader, &item)?.unwrap_or(0.0),
                            b"y" => legend.offset_y = val(reader, &item)?.unwrap_or(0.0),
                            b"w" => legend.width = val(reader, &item)?.unwrap_or(0.0),
                            b"h" => legend.height = val(reader, &item)?.unwrap_or(0.0),
                            _ => item.skip(reader)?,
                        }
                    }
                }
            },
            b"spPr" => {
                while let Some(prop) = next_in(reader, &child)? {
                    match prop.local_name() {
                        b"ln" => legend.border = read_line(reader, &prop)?,
                        name if is_fill(name) => legend.fill = read_fill(reader, &prop)?,
                        _ => prop.skip(reader)?,
                    }
                }
            },
            b"txPr" => {
                if let Some(font) = read_text_props(reader, &child)? {
                    legend.font = font;
                }
            },
            _ => child.skip(reader)?,
        }
    }
    Ok(legend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::style::Color;

    fn parse_series(xml: &str) -> (Series, Option<u32>) {
        let mut reader = xml_reader(xml.as_bytes());
        let el = root(&mut reader, b"ser").unwrap();
        read_series(&mut reader, &el).unwrap()
    }

    #[test]
    fn test_series_from_caches() {
        let (series, explosion) = parse_series(
            r#"<c:ser xmlns:c="urn:c" xmlns:a="urn:a">
                <c:idx val="0"/><c:order val="0"/>
                <c:tx><c:strRef><c:f>Sheet1!$B$1</c:f><c:strCache><c:ptCount val="1"/><c:pt idx="0"><c:v>Sales</c:v></c:pt></c:strCache></c:strRef></c:tx>
                <c:spPr><a:solidFill><a:srgbClr val="E06B20"/></a:solidFill></c:spPr>
                <c:explosion val="12"/>
                <c:cat><c:strRef><c:f>Sheet1!$A$2:$A$3</c:f><c:strCache><c:ptCount val="2"/><c:pt idx="0"><c:v>Mon</c:v></c:pt><c:pt idx="1"><c:v>Tue</c:v></c:pt></c:strCache></c:strRef></c:cat>
                <c:val><c:numRef><c:f>Sheet1!$B$2:$B$3</c:f><c:numCache><c:formatCode>0.00</c:formatCode><c:ptCount val="2"/><c:pt idx="1"><c:v>15.5</c:v></c:pt><c:pt idx="0"><c:v>12</c:v></c:pt></c:numCache></c:numRef></c:val>
            </c:ser>"#,
        );
        assert_eq!(series.title, "Sales");
        assert_eq!(series.values, vec![("Mon".to_string(), 12.0), ("Tue".to_string(), 15.5)]);
        assert_eq!(series.number_format, "0.00");
        assert_eq!(series.fill, Fill::solid(Color::from_rgb_hex("E06B20").unwrap()));
        assert_eq!(explosion, Some(12));
        assert!(!series.labels.is_visible());
    }

    #[test]
    fn test_literal_series_and_labels() {
        let (series, _) = parse_series(
            r#"<c:ser xmlns:c="urn:c" xmlns:a="urn:a">
                <c:tx><c:v>Plain</c:v></c:tx>
                <c:dLbls><c:showLegendKey val="0"/><c:showVal val="1"/><c:showCatName val="0"/><c:showSerName val="0"/><c:showPercent val="1"/><c:separator>; </c:separator><c:showLeaderLines val="0"/></c:dLbls>
                <c:cat><c:strLit><c:ptCount val="1"/><c:pt idx="0"><c:v>A &amp; B</c:v></c:pt></c:strLit></c:cat>
                <c:val><c:numLit><c:formatCode>General</c:formatCode><c:ptCount val="1"/><c:pt idx="0"><c:v>3</c:v></c:pt></c:numLit></c:val>
            </c:ser>"#,
        );
        assert_eq!(series.title, "Plain");
        assert_eq!(series.values, vec![("A & B".to_string(), 3.0)]);
        assert!(series.labels.show_value && series.labels.show_percentage);
        assert!(!series.labels.show_leader_lines);
        assert_eq!(series.labels.separator.as_deref(), Some("; "));
    }

    #[test]
    fn test_plot_area_matches_axes_by_id() {
        let xml = r#"<c:plotArea xmlns:c="urn:c">
            <c:layout/>
            <c:barChart><c:barDir val="bar"/><c:grouping val="stacked"/><c:gapWidth val="80"/><c:axId val="7"/><c:axId val="9"/></c:barChart>
            <c:valAx><c:axId val="9"/><c:scaling><c:orientation val="minMax"/><c:max val="100"/></c:scaling><c:delete val="0"/><c:majorGridlines/></c:valAx>
            <c:catAx><c:axId val="7"/><c:scaling><c:orientation val="maxMin"/></c:scaling><c:delete val="1"/></c:catAx>
        </c:plotArea>"#;
        let mut reader = xml_reader(xml.as_bytes());
        let el = root(&mut reader, b"plotArea").unwrap();
        let mut chart = Chart::new();
        read_plot_area(&mut reader, &el, &mut chart).unwrap();

        match chart.chart_type().unwrap() {
            ChartType::Bar { direction, grouping, gap_width, .. } => {
                assert_eq!(*direction, BarDirection::Bar);
                assert_eq!(*grouping, Grouping::Stacked);
                assert_eq!(*gap_width, 80);
            },
            other => panic!("unexpected type {other:?}"),
        }
        assert!(chart.plot_area.axis_x.reversed);
        assert!(!chart.plot_area.axis_x.visible);
        assert_eq!(chart.plot_area.axis_y.max_bounds, Some(100.0));
        assert!(chart.plot_area.axis_y.major_gridlines.is_some());
    }

    fn plot_area_error(body: &str) -> Error {
        let xml = format!(r#"<c:plotArea xmlns:c="urn:c"><c:layout/>{body}</c:plotArea>"#);
        let mut reader = xml_reader(xml.as_bytes());
        let el = root(&mut reader, b"plotArea").unwrap();
        read_plot_area(&mut reader, &el, &mut Chart::new()).unwrap_err()
    }

    #[test]
    fn test_unknown_chart_type_is_unsupported() {
        let err = plot_area_error(
            r#"<c:bubbleChart><c:varyColors val="0"/><c:axId val="1"/><c:axId val="2"/></c:bubbleChart><c:valAx><c:axId val="1"/></c:valAx>"#,
        );
        assert!(matches!(err, Error::UnsupportedFormat(ref msg) if msg.contains("bubbleChart")));
    }

    #[test]
    fn test_plot_area_without_type_is_unsupported() {
        let err = plot_area_error(r#"<c:valAx><c:axId val="1"/></c:valAx>"#);
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_combined_chart_is_unsupported() {
        let err = plot_area_error(
            r#"<c:barChart><c:barDir val="col"/><c:axId val="1"/><c:axId val="2"/></c:barChart><c:lineChart><c:axId val="1"/><c:axId val="2"/></c:lineChart>"#,
        );
        assert!(matches!(err, Error::UnsupportedFormat(ref msg) if msg.contains("lineChart")));
    }

    #[test]
    fn test_hidden_title_and_missing_legend() {
        let xml = r#"<c:chart xmlns:c="urn:c"><c:autoTitleDeleted val="1"/><c:plotVisOnly val="1"/><c:dispBlanksAs val="gap"/></c:chart>"#;
        let mut reader = xml_reader(xml.as_bytes());
        let el = root(&mut reader, b"chart").unwrap();
        let mut chart = Chart::new();
        read_chart(&mut reader, &el, &mut chart).unwrap();
        assert!(!chart.title.visible);
        assert!(!chart.legend.visible);
        assert_eq!(chart.display_blanks_as, DisplayBlanks::Gap);
    }

    #[test]
    fn test_title_text_and_font() {
        let xml = r#"<c:title xmlns:c="urn:c" xmlns:a="urn:a"><c:tx><c:rich><a:bodyPr rot="-5400000"/><a:p><a:pPr><a:defRPr sz="1200"/></a:pPr><a:r><a:rPr sz="1800" b="1"><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></a:rPr><a:t>Revenue</a:t></a:r></a:p></c:rich></c:tx></c:title>"#;
        let mut reader = xml_reader(xml.as_bytes());
        let el = root(&mut reader, b"title").unwrap();
        let title = read_title(&mut reader, &el).unwrap();
        assert_eq!(title.text, "Revenue");
        assert_eq!(title.rotation, Some(-90.0));
        let font = title.font.unwrap();
        assert_eq!(font.size, 18.0);
        assert!(font.bold);
        assert_eq!(font.color, Color::RED);
    }
}
