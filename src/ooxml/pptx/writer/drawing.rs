//! DrawingML fragments shared by every part serializer: colours, fills,
//! lines, shadows and transforms.

use std::fmt::Write as FmtWrite;

use crate::common::Result;
use crate::common::unit::{degrees_to_angle, percent_to_st, pt_to_emu};
use crate::presentation::Shape;
use crate::presentation::style::{Border, Color, Fill, FillType, Outline, Shadow};

/// `<a:srgbClr>`, with an `a:alpha` child only for translucent colours.
pub(crate) fn write_color(xml: &mut String, color: Color) -> Result<()> {
    if color.alpha() == 0xFF {
        write!(xml, r#"<a:srgbClr val="{}"/>"#, color.rgb_hex())?;
    } else {
        write!(
            xml,
            r#"<a:srgbClr val="{}"><a:alpha val="{}"/></a:srgbClr>"#,
            color.rgb_hex(),
            color.alpha_st()
        )?;
    }
    Ok(())
}

pub(crate) fn write_solid_fill(xml: &mut String, color: Color) -> Result<()> {
    xml.push_str("<a:solidFill>");
    write_color(xml, color)?;
    xml.push_str("</a:solidFill>");
    Ok(())
}

/// Fill element for `fill`; nothing at all for [`FillType::None`].
pub(crate) fn write_fill(xml: &mut String, fill: &Fill) -> Result<()> {
    match fill.fill_type {
        FillType::None => {},
        FillType::Solid => write_solid_fill(xml, fill.start_color)?,
        FillType::GradientLinear | FillType::GradientPath => {
            xml.push_str(r#"<a:gradFill rotWithShape="1"><a:gsLst>"#);
            xml.push_str(r#"<a:gs pos="0">"#);
            write_color(xml, fill.start_color)?;
            xml.push_str(r#"</a:gs><a:gs pos="100000">"#);
            write_color(xml, fill.end_color)?;
            xml.push_str("</a:gs></a:gsLst>");
            if fill.fill_type == FillType::GradientLinear {
                write!(
                    xml,
                    r#"<a:lin ang="{}" scaled="0"/>"#,
                    degrees_to_angle(fill.rotation)
                )?;
            } else {
                xml.push_str(
                    r#"<a:path path="circle"><a:fillToRect l="50000" t="50000" r="50000" b="50000"/></a:path>"#,
                );
            }
            xml.push_str("</a:gradFill>");
        },
    }
    Ok(())
}

/// A shape or cell border as `tag` (`a:ln`, `a:lnL`, ...). Invisible
/// borders are written as an explicit `a:noFill` line only when `explicit`
/// is set.
pub(crate) fn write_line(xml: &mut String, tag: &str, border: &Border, explicit: bool) -> Result<()> {
    if !border.is_visible() {
        if explicit {
            write!(xml, "<{tag}><a:noFill/></{tag}>")?;
        }
        return Ok(());
    }
    write!(
        xml,
        r#"<{tag} w="{}" cmpd="{}">"#,
        pt_to_emu(border.line_width),
        border.line_style.xml_value()
    )?;
    write_solid_fill(xml, border.color)?;
    write!(
        xml,
        r#"<a:prstDash val="{}"/></{tag}>"#,
        border.dash_style.xml_value()
    )?;
    Ok(())
}

/// Chart-side stroke. A `None` fill with zero width writes nothing.
pub(crate) fn write_outline(xml: &mut String, outline: &Outline) -> Result<()> {
    if outline.fill.is_none() && outline.width <= 0.0 {
        return Ok(());
    }
    if outline.width > 0.0 {
        write!(xml, r#"<a:ln w="{}">"#, pt_to_emu(outline.width))?;
    } else {
        xml.push_str("<a:ln>");
    }
    if outline.fill.is_none() {
        xml.push_str("<a:noFill/>");
    } else {
        write_fill(xml, &outline.fill)?;
    }
    xml.push_str("</a:ln>");
    Ok(())
}

pub(crate) fn write_shadow(xml: &mut String, shadow: &Shadow) -> Result<()> {
    if !shadow.visible {
        return Ok(());
    }
    write!(
        xml,
        r#"<a:effectLst><a:outerShdw blurRad="{}" dist="{}" dir="{}" algn="{}" rotWithShape="0">"#,
        pt_to_emu(shadow.blur_radius),
        pt_to_emu(shadow.distance),
        degrees_to_angle(shadow.direction),
        shadow.alignment.xml_value()
    )?;
    write!(
        xml,
        r#"<a:srgbClr val="{}"><a:alpha val="{}"/></a:srgbClr>"#,
        shadow.color.rgb_hex(),
        percent_to_st(shadow.alpha)
    )?;
    xml.push_str("</a:outerShdw></a:effectLst>");
    Ok(())
}

/// Transform of `shape` as `tag` (`a:xfrm` in shape properties, `p:xfrm`
/// on graphic frames).
pub(crate) fn write_xfrm(xml: &mut String, tag: &str, shape: &Shape) -> Result<()> {
    write!(xml, "<{tag}")?;
    if shape.rotation != 0.0 {
        write!(xml, r#" rot="{}""#, degrees_to_angle(shape.rotation))?;
    }
    if shape.flip_horizontal {
        xml.push_str(r#" flipH="1""#);
    }
    if shape.flip_vertical {
        xml.push_str(r#" flipV="1""#);
    }
    write!(
        xml,
        r#"><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></{tag}>"#,
        shape.offset_x, shape.offset_y, shape.width, shape.height
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::style::{DashStyle, ShadowAlignment};

    #[test]
    fn test_opaque_and_translucent_colors() {
        let mut xml = String::new();
        write_color(&mut xml, Color::from_argb(0xFFE0_6B20)).unwrap();
        assert_eq!(xml, r#"<a:srgbClr val="E06B20"/>"#);

        let mut xml = String::new();
        write_color(&mut xml, Color::from_argb(0x8000_0000)).unwrap();
        assert_eq!(xml, r#"<a:srgbClr val="000000"><a:alpha val="50196"/></a:srgbClr>"#);
    }

    #[test]
    fn test_gradient_fill() {
        let mut xml = String::new();
        let fill = Fill::linear_gradient(Color::WHITE, Color::BLACK, 90.0);
        write_fill(&mut xml, &fill).unwrap();
        assert!(xml.starts_with("<a:gradFill"));
        assert!(xml.contains(r#"<a:lin ang="5400000" scaled="0"/>"#));

        let mut xml = String::new();
        write_fill(&mut xml, &Fill::default()).unwrap();
        assert!(xml.is_empty());
    }

    #[test]
    fn test_line_width_in_emu() {
        let mut border = Border::new(2.0, Color::RED);
        border.dash_style = DashStyle::Dash;
        let mut xml = String::new();
        write_line(&mut xml, "a:ln", &border, false).unwrap();
        assert_eq!(
            xml,
            r#"<a:ln w="25400" cmpd="sng"><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill><a:prstDash val="dash"/></a:ln>"#
        );

        let mut xml = String::new();
        write_line(&mut xml, "a:lnL", &Border::default(), true).unwrap();
        assert_eq!(xml, "<a:lnL><a:noFill/></a:lnL>");
    }

    #[test]
    fn test_shadow_and_xfrm() {
        let mut shadow = Shadow::visible(45.0, 3.0);
        shadow.alignment = ShadowAlignment::Center;
        let mut xml = String::new();
        write_shadow(&mut xml, &shadow).unwrap();
        assert!(xml.contains(r#"dist="38100" dir="2700000" algn="ctr""#));
        assert!(xml.contains(r#"<a:alpha val="50000"/>"#));

        let shape = Shape::rich_text().with_offset(10, 20).with_size(30, 40).with_rotation(90.0);
        let mut xml = String::new();
        write_xfrm(&mut xml, "a:xfrm", &shape).unwrap();
        assert_eq!(
            xml,
            r#"<a:xfrm rot="5400000"><a:off x="10" y="20"/><a:ext cx="30" cy="40"/></a:xfrm>"#
        );
    }
}
