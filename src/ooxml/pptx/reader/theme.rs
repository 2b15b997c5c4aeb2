//! Theme part: colour scheme and major/minor latin fonts.

use super::drawing::read_color_choice;
use super::events::{Element, XmlReader, next_in, root, xml_reader};
use crate::common::Result;
use crate::presentation::slide::Theme;

/// Parse `themeN.xml`. Slots the scheme leaves out, or gives as anything
/// other than an RGB or system colour, keep the default theme's colour.
pub(crate) fn read_theme(xml: &[u8]) -> Result<Theme> {
    let mut reader = xml_reader(xml);
    let el = root(&mut reader, b"theme")?;
    let mut theme = Theme::default();
    if let Some(name) = el.attr(b"name")? {
        theme.name = name;
    }
    while let Some(elements) = next_in(&mut reader, &el)? {
        if elements.local_name() != b"themeElements" {
            elements.skip(&mut reader)?;
            continue;
        }
        while let Some(child) = next_in(&mut reader, &elements)? {
            match child.local_name() {
                b"clrScheme" => read_color_scheme(&mut reader, &child, &mut theme)?,
                b"fontScheme" => read_font_scheme(&mut reader, &child, &mut theme)?,
                _ => child.skip(&mut reader)?,
            }
        }
    }
    Ok(theme)
}

fn read_color_scheme<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>, theme: &mut Theme) -> Result<()> {
    while let Some(slot) = next_in(reader, el)? {
        let name = String::from_utf8_lossy(slot.local_name()).into_owned();
        let Some(color) = read_color_choice(reader, &slot)? else {
            continue;
        };
        match theme.colors.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = color,
            None => log::debug!("unknown colour scheme slot {name}"),
        }
    }
    Ok(())
}

fn read_font_scheme<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>, theme: &mut Theme) -> Result<()> {
    while let Some(child) = next_in(reader, el)? {
        let target = match child.local_name() {
            b"majorFont" => &mut theme.major_font,
            b"minorFont" => &mut theme.minor_font,
            _ => {
                child.skip(reader)?;
                continue;
            },
        };
        while let Some(face) = next_in(reader, &child)? {
            if face.local_name() == b"latin"
                && let Some(typeface) = face.attr(b"typeface")?.filter(|t| !t.is_empty())
            {
                *target = typeface;
            }
            face.skip(reader)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::writer::theme::theme_xml;
    use crate::presentation::style::Color;

    #[test]
    fn test_scheme_and_fonts() {
        let xml = r#"<a:theme xmlns:a="urn:a" name="Grove"><a:themeElements>
            <a:clrScheme name="Grove"><a:dk1><a:sysClr val="windowText" lastClr="101010"/></a:dk1><a:accent2><a:srgbClr val="E06B20"/></a:accent2></a:clrScheme>
            <a:fontScheme name="Grove"><a:majorFont><a:latin typeface="Georgia"/><a:ea typeface=""/></a:majorFont><a:minorFont><a:latin typeface=""/></a:minorFont></a:fontScheme>
            <a:fmtScheme name="Office"/></a:themeElements></a:theme>"#;
        let theme = read_theme(xml.as_bytes()).unwrap();
        assert_eq!(theme.name, "Grove");
        assert_eq!(theme.color("dk1"), Color::from_rgb_hex("101010"));
        assert_eq!(theme.color("accent2"), Color::from_rgb_hex("E06B20"));
        assert_eq!(theme.color("lt1"), Theme::default().color("lt1"));
        assert_eq!(theme.major_font, "Georgia");
        assert_eq!(theme.minor_font, "Calibri");
    }

    #[test]
    fn test_reads_written_theme() {
        let mut theme = Theme::default();
        theme.name = "Orchard".to_string();
        theme.minor_font = "Verdana".to_string();
        theme.colors[4].1 = Color::from_argb(0xFF12_3456);
        let xml = theme_xml(&theme).unwrap();
        assert_eq!(read_theme(xml.as_bytes()).unwrap(), theme);
    }
}
