//! Chart parts (`/ppt/charts/chartN.xml`) and their embedded workbooks.

use std::fmt::Write as FmtWrite;

use super::context::{PartContext, prefix};
use super::drawing::{write_fill, write_line, write_outline};
use super::excel_embed::{
    category_ref, generate_chart_workbook, shared_categories, title_ref, values_ref,
};
use super::text::write_font_props;
use crate::common::unit::degrees_to_angle;
use crate::common::xml::{bool_val, escape_xml};
use crate::common::{Error, Result};
use crate::ooxml::opc::PackURI;
use crate::ooxml::opc::constants::{content_type as ct, namespace, relationship_type as rt};
use crate::presentation::chart::{
    Axis, BarDirection, Chart, ChartType, Grouping, Legend, MarkerSymbol, Series,
};
use crate::presentation::style::Font;

const AXIS_X: u32 = 1;
const AXIS_Y: u32 = 2;

/// Write the chart part for `chart`, owned by the context's part, and return
/// the relationship id of the chart.
///
/// `name` identifies the chart shape in the error raised for a chart without
/// a type.
pub(crate) fn write_chart_part(
    chart: &Chart,
    name: &str,
    ctx: &mut PartContext<'_>,
) -> Result<String> {
    let chart_type = chart.chart_type().ok_or_else(|| Error::UndefinedChartType {
        chart: name.to_string(),
    })?;
    let partname = ctx.state().next_partname(prefix::CHART, "xml")?;

    let external = if chart.include_spreadsheet {
        let workbook = generate_chart_workbook(chart_type.series())?;
        // the workbook is named after its chart: chart3.xml -> chart3.xml.xlsx
        let embedding =
            PackURI::new(format!("{}/{}.xlsx", prefix::EMBEDDINGS_DIR, partname.filename()))?;
        let mut chart_ctx = ctx.child(partname.clone());
        Some(chart_ctx.add_related_part(rt::PACKAGE, embedding, ct::SML_SHEET, workbook))
    } else {
        None
    };

    let xml = chart_xml(chart, chart_type, external.as_deref())?;
    log::debug!("writing {partname} ({})", chart_type.element_name());
    Ok(ctx.add_related_part(rt::CHART, partname, ct::DML_CHART, xml.into_bytes()))
}

fn chart_xml(chart: &Chart, chart_type: &ChartType, external: Option<&str>) -> Result<String> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(
        xml,
        r#"<c:chartSpace xmlns:c="{}" xmlns:a="{}" xmlns:r="{}">"#,
        namespace::DML_CHART,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS
    )?;
    xml.push_str(r#"<c:date1904 val="0"/><c:lang val="en-US"/>"#);
    write!(
        xml,
        r#"<c:roundedCorners val="{}"/>"#,
        bool_val(chart.rounded_corners)
    )?;

    xml.push_str("<c:chart>");
    if chart.title.visible {
        write_title(&mut xml, &chart.title.text, &chart.title.font, None)?;
    }
    write!(
        xml,
        r#"<c:autoTitleDeleted val="{}"/>"#,
        bool_val(!chart.title.visible)
    )?;
    if chart_type.is_3d() {
        write_view_3d(&mut xml, chart)?;
    }
    write_plot_area(&mut xml, chart, chart_type, external.is_some())?;
    if chart.legend.visible {
        write_legend(&mut xml, &chart.legend)?;
    }
    xml.push_str(r#"<c:plotVisOnly val="1"/>"#);
    write!(
        xml,
        r#"<c:dispBlanksAs val="{}"/>"#,
        chart.display_blanks_as.xml_value()
    )?;
    xml.push_str("</c:chart>");

    if let Some(r_id) = external {
        write!(
            xml,
            r#"<c:externalData r:id="{r_id}"><c:autoUpdate val="0"/></c:externalData>"#
        )?;
    }
    xml.push_str("</c:chartSpace>");
    Ok(xml)
}

fn write_title(xml: &mut String, text: &str, font: &Font, rotation: Option<f64>) -> Result<()> {
    xml.push_str("<c:title><c:tx><c:rich>");
    match rotation {
        Some(deg) => write!(xml, r#"<a:bodyPr rot="{}" vert="horz"/>"#, degrees_to_angle(deg))?,
        None => xml.push_str("<a:bodyPr/>"),
    }
    xml.push_str("<a:lstStyle/><a:p><a:pPr>");
    write_font_props(xml, "a:defRPr", font)?;
    xml.push_str("</a:pPr><a:r>");
    write_font_props(xml, "a:rPr", font)?;
    write!(xml, "<a:t>{}</a:t></a:r></a:p>", escape_xml(text))?;
    xml.push_str(r#"</c:rich></c:tx><c:overlay val="0"/></c:title>"#);
    Ok(())
}

/// `c:txPr` carrying a default font for labels.
fn write_text_props(xml: &mut String, font: &Font) -> Result<()> {
    xml.push_str("<c:txPr><a:bodyPr/><a:lstStyle/><a:p><a:pPr>");
    write_font_props(xml, "a:defRPr", font)?;
    xml.push_str(r#"</a:pPr><a:endParaRPr lang="en-US"/></a:p></c:txPr>"#);
    Ok(())
}

fn write_view_3d(xml: &mut String, chart: &Chart) -> Result<()> {
    let view = &chart.view3d;
    xml.push_str("<c:view3D>");
    write!(xml, r#"<c:rotX val="{}"/>"#, view.rotation_x)?;
    match view.height_percent {
        Some(height) => write!(xml, r#"<c:hPercent val="{height}"/>"#)?,
        None => xml.push_str(r#"<c:autoHPercent val="1"/>"#),
    }
    write!(xml, r#"<c:rotY val="{}"/>"#, view.rotation_y)?;
    write!(xml, r#"<c:depthPercent val="{}"/>"#, view.depth_percent)?;
    write!(
        xml,
        r#"<c:rAngAx val="{}"/>"#,
        bool_val(view.right_angle_axes)
    )?;
    if !view.right_angle_axes {
        write!(xml, r#"<c:perspective val="{}"/>"#, view.perspective)?;
    }
    xml.push_str("</c:view3D>");
    Ok(())
}

fn write_plot_area(
    xml: &mut String,
    chart: &Chart,
    chart_type: &ChartType,
    linked: bool,
) -> Result<()> {
    xml.push_str("<c:plotArea><c:layout/>");
    write_type_group(xml, chart_type, linked)?;
    if chart_type.has_axes() {
        let plot = &chart.plot_area;
        let horizontal_bars = matches!(
            chart_type,
            ChartType::Bar { direction, .. } | ChartType::Bar3D { direction, .. }
                if *direction == BarDirection::Bar
        );
        let (x_pos, y_pos) = if horizontal_bars { ("l", "b") } else { ("b", "l") };
        if chart_type.has_value_x_axis() {
            write_axis(xml, "c:valAx", &plot.axis_x, AXIS_X, AXIS_Y, x_pos)?;
        } else {
            write_axis(xml, "c:catAx", &plot.axis_x, AXIS_X, AXIS_Y, x_pos)?;
        }
        write_axis(xml, "c:valAx", &plot.axis_y, AXIS_Y, AXIS_X, y_pos)?;
    }
    xml.push_str("</c:plotArea>");
    Ok(())
}

fn write_type_group(xml: &mut String, chart_type: &ChartType, linked: bool) -> Result<()> {
    let element = chart_type.element_name();
    write!(xml, "<c:{element}>")?;
    match chart_type {
        ChartType::Bar { direction, grouping, .. } | ChartType::Bar3D { direction, grouping, .. } => {
            write!(xml, r#"<c:barDir val="{}"/>"#, direction.xml_value())?;
            write!(xml, r#"<c:grouping val="{}"/>"#, grouping.xml_value())?;
            xml.push_str(r#"<c:varyColors val="0"/>"#);
        },
        ChartType::Line { grouping, .. } | ChartType::Area { grouping, .. } => {
            write!(xml, r#"<c:grouping val="{}"/>"#, grouping.xml_value())?;
            xml.push_str(r#"<c:varyColors val="0"/>"#);
        },
        ChartType::Pie { .. } | ChartType::Pie3D { .. } | ChartType::Doughnut { .. } => {
            xml.push_str(r#"<c:varyColors val="1"/>"#);
        },
        ChartType::Scatter { style, .. } => {
            write!(xml, r#"<c:scatterStyle val="{}"/>"#, style.xml_value())?;
            xml.push_str(r#"<c:varyColors val="0"/>"#);
        },
        ChartType::Radar { style, .. } => {
            write!(xml, r#"<c:radarStyle val="{}"/>"#, style.xml_value())?;
            xml.push_str(r#"<c:varyColors val="0"/>"#);
        },
    }

    let sheet_categories = shared_categories(chart_type.series());
    let sheet = linked.then_some(sheet_categories.as_slice());
    for (index, series) in chart_type.series().iter().enumerate() {
        write_series(xml, chart_type, series, index, sheet)?;
    }

    match chart_type {
        ChartType::Bar { gap_width, overlap, grouping, .. } => {
            write!(xml, r#"<c:gapWidth val="{gap_width}"/>"#)?;
            // stacked bars only line up when they fully overlap
            let overlap = match grouping {
                Grouping::Stacked | Grouping::PercentStacked => 100,
                _ => *overlap,
            };
            if overlap != 0 {
                write!(xml, r#"<c:overlap val="{overlap}"/>"#)?;
            }
        },
        ChartType::Bar3D { gap_width, .. } => {
            write!(xml, r#"<c:gapWidth val="{gap_width}"/><c:shape val="box"/>"#)?;
        },
        ChartType::Line { .. } => xml.push_str(r#"<c:marker val="1"/>"#),
        ChartType::Pie { first_slice_angle, .. } => {
            write!(xml, r#"<c:firstSliceAng val="{first_slice_angle}"/>"#)?;
        },
        ChartType::Doughnut {
            first_slice_angle,
            hole_size,
            ..
        } => {
            write!(
                xml,
                r#"<c:firstSliceAng val="{first_slice_angle}"/><c:holeSize val="{hole_size}"/>"#
            )?;
        },
        _ => {},
    }

    if chart_type.has_axes() {
        write!(xml, r#"<c:axId val="{AXIS_X}"/><c:axId val="{AXIS_Y}"/>"#)?;
    }
    write!(xml, "</c:{element}>")?;
    Ok(())
}

fn write_series(
    xml: &mut String,
    chart_type: &ChartType,
    series: &Series,
    index: usize,
    sheet: Option<&[&str]>,
) -> Result<()> {
    let count = series.len();
    let linked = sheet.is_some();
    write!(
        xml,
        r#"<c:ser><c:idx val="{index}"/><c:order val="{index}"/>"#
    )?;

    xml.push_str("<c:tx>");
    if linked {
        write!(
            xml,
            r#"<c:strRef><c:f>{}</c:f><c:strCache><c:ptCount val="1"/><c:pt idx="0"><c:v>{}</c:v></c:pt></c:strCache></c:strRef>"#,
            title_ref(index),
            escape_xml(&series.title)
        )?;
    } else {
        write!(xml, "<c:v>{}</c:v>", escape_xml(&series.title))?;
    }
    xml.push_str("</c:tx>");

    write_series_shape_props(xml, chart_type, series)?;

    let has_marker = matches!(
        chart_type,
        ChartType::Line { .. } | ChartType::Scatter { .. } | ChartType::Radar { .. }
    );
    if has_marker {
        write_marker(xml, series)?;
    }
    if let ChartType::Pie { explosion, .. } | ChartType::Pie3D { explosion, .. } = chart_type
        && *explosion > 0
    {
        write!(xml, r#"<c:explosion val="{explosion}"/>"#)?;
    }

    for (point, fill) in &series.data_point_fills {
        write!(xml, r#"<c:dPt><c:idx val="{point}"/>"#)?;
        if matches!(chart_type, ChartType::Bar { .. } | ChartType::Bar3D { .. }) {
            xml.push_str(r#"<c:invertIfNegative val="0"/>"#);
        }
        xml.push_str(r#"<c:bubble3D val="0"/><c:spPr>"#);
        write_fill(xml, fill)?;
        xml.push_str("</c:spPr></c:dPt>");
    }

    write_data_labels(xml, series)?;

    let (cat_tag, val_tag) = if chart_type.has_value_x_axis() {
        ("c:xVal", "c:yVal")
    } else {
        ("c:cat", "c:val")
    };

    // linked series cache what column A of the workbook holds
    let categories: Vec<&str> = match sheet {
        Some(sheet) => sheet.iter().copied().take(count).collect(),
        None => series.categories().collect(),
    };
    let numeric: Option<Vec<f64>> = if chart_type.has_value_x_axis() {
        categories.iter().map(|c| c.parse::<f64>().ok()).collect()
    } else {
        None
    };

    write!(xml, "<{cat_tag}>")?;
    match numeric {
        Some(numbers) => {
            write_numbers(xml, &numbers, "General", linked.then(|| category_ref(count)))?;
        },
        // x values that are not all numbers stay labels
        None => write_strings(
            xml,
            categories.iter().copied(),
            count,
            linked.then(|| category_ref(count)),
        )?,
    }
    write!(xml, "</{cat_tag}>")?;

    write!(xml, "<{val_tag}>")?;
    let values: Vec<f64> = series.numbers().collect();
    write_numbers(
        xml,
        &values,
        &series.number_format,
        linked.then(|| values_ref(index, count)),
    )?;
    write!(xml, "</{val_tag}>")?;

    if matches!(chart_type, ChartType::Line { .. } | ChartType::Scatter { .. }) {
        write!(xml, r#"<c:smooth val="{}"/>"#, bool_val(series.smooth))?;
    }
    xml.push_str("</c:ser>");
    Ok(())
}

fn write_series_shape_props(xml: &mut String, chart_type: &ChartType, series: &Series) -> Result<()> {
    let line_only = matches!(chart_type, ChartType::Line { .. } | ChartType::Scatter { .. });
    let fill = (!line_only && !series.fill.is_none()).then_some(&series.fill);
    if fill.is_none() && series.outline.is_none() {
        return Ok(());
    }
    xml.push_str("<c:spPr>");
    if let Some(fill) = fill {
        write_fill(xml, fill)?;
    }
    if let Some(outline) = &series.outline {
        write_outline(xml, outline)?;
    }
    xml.push_str("</c:spPr>");
    Ok(())
}

fn write_marker(xml: &mut String, series: &Series) -> Result<()> {
    let marker = &series.marker;
    write!(
        xml,
        r#"<c:marker><c:symbol val="{}"/>"#,
        marker.symbol.xml_value()
    )?;
    if marker.symbol != MarkerSymbol::None {
        write!(xml, r#"<c:size val="{}"/>"#, marker.size.clamp(2, 72))?;
        if !marker.fill.is_none() || !marker.border.fill.is_none() {
            xml.push_str("<c:spPr>");
            write_fill(xml, &marker.fill)?;
            write_outline(xml, &marker.border)?;
            xml.push_str("</c:spPr>");
        }
    }
    xml.push_str("</c:marker>");
    Ok(())
}

fn write_data_labels(xml: &mut String, series: &Series) -> Result<()> {
    let labels = &series.labels;
    xml.push_str("<c:dLbls>");
    if labels.is_visible() {
        write_text_props(xml, &series.font)?;
        if let Some(position) = series.label_position {
            write!(xml, r#"<c:dLblPos val="{}"/>"#, position.xml_value())?;
        }
    }
    write!(
        xml,
        r#"<c:showLegendKey val="{}"/><c:showVal val="{}"/><c:showCatName val="{}"/><c:showSerName val="{}"/><c:showPercent val="{}"/><c:showBubbleSize val="0"/>"#,
        bool_val(labels.show_legend_key),
        bool_val(labels.show_value),
        bool_val(labels.show_category_name),
        bool_val(labels.show_series_name),
        bool_val(labels.show_percentage)
    )?;
    if let Some(separator) = &labels.separator {
        write!(xml, "<c:separator>{}</c:separator>", escape_xml(separator))?;
    }
    write!(
        xml,
        r#"<c:showLeaderLines val="{}"/>"#,
        bool_val(labels.show_leader_lines)
    )?;
    xml.push_str("</c:dLbls>");
    Ok(())
}

/// String data as a `c:strRef` with cache when `formula` is set, else as a
/// `c:strLit`.
fn write_strings<'a>(
    xml: &mut String,
    values: impl Iterator<Item = &'a str>,
    count: usize,
    formula: Option<String>,
) -> Result<()> {
    let (open, close) = match &formula {
        Some(f) => {
            write!(xml, "<c:strRef><c:f>{f}</c:f>")?;
            ("<c:strCache>", "</c:strCache></c:strRef>")
        },
        None => ("<c:strLit>", "</c:strLit>"),
    };
    xml.push_str(open);
    write!(xml, r#"<c:ptCount val="{count}"/>"#)?;
    for (i, value) in values.enumerate() {
        write!(xml, r#"<c:pt idx="{i}"><c:v>{}</c:v></c:pt>"#, escape_xml(value))?;
    }
    xml.push_str(close);
    Ok(())
}

fn write_numbers(
    xml: &mut String,
    values: &[f64],
    format_code: &str,
    formula: Option<String>,
) -> Result<()> {
    let (open, close) = match &formula {
        Some(f) => {
            write!(xml, "<c:numRef><c:f>{f}</c:f>")?;
            ("<c:numCache>", "</c:numCache></c:numRef>")
        },
        None => ("<c:numLit>", "</c:numLit>"),
    };
    xml.push_str(open);
    write!(
        xml,
        r#"<c:formatCode>{}</c:formatCode><c:ptCount val="{}"/>"#,
        escape_xml(format_code),
        values.len()
    )?;
    for (i, value) in values.iter().enumerate() {
        write!(xml, r#"<c:pt idx="{i}"><c:v>{value}</c:v></c:pt>"#)?;
    }
    xml.push_str(close);
    Ok(())
}

fn write_axis(
    xml: &mut String,
    tag: &str,
    axis: &Axis,
    id: u32,
    cross: u32,
    position: &str,
) -> Result<()> {
    write!(xml, r#"<{tag}><c:axId val="{id}"/><c:scaling>"#)?;
    write!(
        xml,
        r#"<c:orientation val="{}"/>"#,
        if axis.reversed { "maxMin" } else { "minMax" }
    )?;
    if let Some(max) = axis.max_bounds {
        write!(xml, r#"<c:max val="{max}"/>"#)?;
    }
    if let Some(min) = axis.min_bounds {
        write!(xml, r#"<c:min val="{min}"/>"#)?;
    }
    xml.push_str("</c:scaling>");
    write!(xml, r#"<c:delete val="{}"/>"#, bool_val(!axis.visible))?;
    write!(xml, r#"<c:axPos val="{position}"/>"#)?;
    for (gridlines, element) in [
        (&axis.major_gridlines, "c:majorGridlines"),
        (&axis.minor_gridlines, "c:minorGridlines"),
    ] {
        if let Some(gridlines) = gridlines {
            write!(xml, "<{element}>")?;
            if !gridlines.outline.fill.is_none() || gridlines.outline.width > 0.0 {
                xml.push_str("<c:spPr>");
                write_outline(xml, &gridlines.outline)?;
                xml.push_str("</c:spPr>");
            }
            write!(xml, "</{element}>")?;
        }
    }
    if !axis.title.is_empty() {
        write_title(xml, &axis.title, &axis.font, axis.title_rotation)?;
    }
    if !axis.number_format.is_empty() {
        write!(
            xml,
            r#"<c:numFmt formatCode="{}" sourceLinked="0"/>"#,
            escape_xml(&axis.number_format)
        )?;
    }
    write!(
        xml,
        r#"<c:majorTickMark val="{}"/><c:minorTickMark val="{}"/><c:tickLblPos val="{}"/>"#,
        axis.major_tick_mark.xml_value(),
        axis.minor_tick_mark.xml_value(),
        axis.tick_label_position.xml_value()
    )?;
    if !axis.outline.fill.is_none() {
        xml.push_str("<c:spPr>");
        write_outline(xml, &axis.outline)?;
        xml.push_str("</c:spPr>");
    }
    write_text_props(xml, &axis.font)?;
    write!(xml, r#"<c:crossAx val="{cross}"/><c:crosses val="autoZero"/>"#)?;
    if tag == "c:catAx" {
        xml.push_str(
            r#"<c:auto val="1"/><c:lblAlgn val="ctr"/><c:lblOffset val="100"/><c:noMultiLvlLbl val="0"/>"#,
        );
    } else {
        xml.push_str(r#"<c:crossBetween val="between"/>"#);
        if let Some(unit) = axis.major_unit {
            write!(xml, r#"<c:majorUnit val="{unit}"/>"#)?;
        }
        if let Some(unit) = axis.minor_unit {
            write!(xml, r#"<c:minorUnit val="{unit}"/>"#)?;
        }
    }
    write!(xml, "</{tag}>")?;
    Ok(())
}

fn write_legend(xml: &mut String, legend: &Legend) -> Result<()> {
    xml.push_str("<c:legend>");
    write!(
        xml,
        r#"<c:legendPos val="{}"/>"#,
        legend.position.xml_value()
    )?;
    if legend.has_manual_layout() {
        write!(
            xml,
            r#"<c:layout><c:manualLayout><c:xMode val="edge"/><c:yMode val="edge"/><c:x val="{}"/><c:y val="{}"/><c:w val="{}"/><c:h val="{}"/></c:manualLayout></c:layout>"#,
            legend.offset_x, legend.offset_y, legend.width, legend.height
        )?;
    }
    xml.push_str(r#"<c:overlay val="0"/>"#);
    if !legend.fill.is_none() || legend.border.is_visible() {
        xml.push_str("<c:spPr>");
        write_fill(xml, &legend.fill)?;
        write_line(xml, "a:ln", &legend.border, false)?;
        xml.push_str("</c:spPr>");
    }
    write_text_props(xml, &legend.font)?;
    xml.push_str("</c:legend>");
    Ok(())
}
