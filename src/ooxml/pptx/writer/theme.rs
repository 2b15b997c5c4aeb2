//! Theme part (`themeN.xml`) of a slide or notes master.

use std::fmt::Write as FmtWrite;

use crate::common::Result;
use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::namespace;
use crate::presentation::slide::Theme;

/// Scheme slots of `a:clrScheme` in schema order.
const SCHEME_SLOTS: [&str; 12] = [
    "dk1", "lt1", "dk2", "lt2", "accent1", "accent2", "accent3", "accent4", "accent5", "accent6",
    "hlink", "folHlink",
];

pub(crate) fn theme_xml(theme: &Theme) -> Result<String> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(
        xml,
        r#"<a:theme xmlns:a="{}" name="{}">"#,
        namespace::DML_MAIN,
        escape_xml(&theme.name)
    )?;
    xml.push_str("<a:themeElements>");

    write!(xml, r#"<a:clrScheme name="{}">"#, escape_xml(&theme.name))?;
    let defaults = Theme::default();
    for slot in SCHEME_SLOTS {
        // a scheme must name all twelve slots
        let Some(color) = theme.color(slot).or_else(|| defaults.color(slot)) else {
            continue;
        };
        write!(xml, r#"<a:{slot}><a:srgbClr val="{}"/></a:{slot}>"#, color.rgb_hex())?;
    }
    xml.push_str("</a:clrScheme>");

    write!(xml, r#"<a:fontScheme name="{}">"#, escape_xml(&theme.name))?;
    for (tag, typeface) in [("a:majorFont", &theme.major_font), ("a:minorFont", &theme.minor_font)] {
        write!(
            xml,
            r#"<{tag}><a:latin typeface="{}"/><a:ea typeface=""/><a:cs typeface=""/></{tag}>"#,
            escape_xml(typeface)
        )?;
    }
    xml.push_str("</a:fontScheme>");

    xml.push_str(r#"<a:fmtScheme name="Office">"#);
    xml.push_str("<a:fillStyleLst>");
    xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    xml.push_str(r#"<a:gradFill rotWithShape="1"><a:gsLst><a:gs pos="0"><a:schemeClr val="phClr"><a:tint val="50000"/><a:satMod val="300000"/></a:schemeClr></a:gs><a:gs pos="35000"><a:schemeClr val="phClr"><a:tint val="37000"/><a:satMod val="300000"/></a:schemeClr></a:gs><a:gs pos="100000"><a:schemeClr val="phClr"><a:tint val="15000"/><a:satMod val="350000"/></a:schemeClr></a:gs></a:gsLst><a:lin ang="16200000" scaled="1"/></a:gradFill>"#);
    xml.push_str(r#"<a:gradFill rotWithShape="1"><a:gsLst><a:gs pos="0"><a:schemeClr val="phClr"><a:shade val="51000"/><a:satMod val="130000"/></a:schemeClr></a:gs><a:gs pos="100000"><a:schemeClr val="phClr"><a:shade val="94000"/><a:satMod val="135000"/></a:schemeClr></a:gs></a:gsLst><a:lin ang="16200000" scaled="0"/></a:gradFill>"#);
    xml.push_str("</a:fillStyleLst>");
    xml.push_str("<a:lnStyleLst>");
    for width in [9525, 25400, 38100] {
        write!(
            xml,
            r#"<a:ln w="{width}" cap="flat" cmpd="sng" algn="ctr"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:prstDash val="solid"/></a:ln>"#
        )?;
    }
    xml.push_str("</a:lnStyleLst>");
    xml.push_str("<a:effectStyleLst>");
    xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    xml.push_str(r#"<a:effectStyle><a:effectLst><a:outerShdw blurRad="40000" dist="23000" dir="5400000" rotWithShape="0"><a:srgbClr val="000000"><a:alpha val="35000"/></a:srgbClr></a:outerShdw></a:effectLst></a:effectStyle>"#);
    xml.push_str("</a:effectStyleLst>");
    xml.push_str("<a:bgFillStyleLst>");
    xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"><a:tint val="95000"/></a:schemeClr></a:solidFill>"#);
    xml.push_str(r#"<a:gradFill rotWithShape="1"><a:gsLst><a:gs pos="0"><a:schemeClr val="phClr"><a:tint val="80000"/><a:satMod val="300000"/></a:schemeClr></a:gs><a:gs pos="100000"><a:schemeClr val="phClr"><a:shade val="30000"/><a:satMod val="200000"/></a:schemeClr></a:gs></a:gsLst><a:path path="circle"><a:fillToRect l="50000" t="50000" r="50000" b="50000"/></a:path></a:gradFill>"#);
    xml.push_str("</a:bgFillStyleLst>");
    xml.push_str("</a:fmtScheme>");

    xml.push_str("</a:themeElements>");
    xml.push_str("<a:objectDefaults/><a:extraClrSchemeLst/>");
    xml.push_str("</a:theme>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::style::Color;

    #[test]
    fn test_theme_colors_and_fonts() {
        let mut theme = Theme::default();
        theme.name = "Orchard".to_string();
        theme.major_font = "Georgia".to_string();
        theme.colors.retain(|(name, _)| name != "accent6");
        theme.colors[0].1 = Color::from_argb(0xFF11_2233);
        let xml = theme_xml(&theme).unwrap();
        assert!(xml.contains(r#"name="Orchard">"#));
        assert!(xml.contains(r#"<a:dk1><a:srgbClr val="112233"/></a:dk1>"#));
        // missing slot falls back to the default scheme
        assert!(xml.contains(r#"<a:accent6><a:srgbClr val="F79646"/></a:accent6>"#));
        assert!(xml.contains(r#"<a:majorFont><a:latin typeface="Georgia"/>"#));
        let accent5 = xml.find("<a:accent5>").unwrap();
        let hlink = xml.find("<a:hlink>").unwrap();
        assert!(accent5 < hlink);
    }
}
