//! `presentation.xml`, `presProps.xml` and `viewProps.xml`.

use super::events::{Element, XmlReader, next_in, root, xml_reader};
use crate::common::Result;
use crate::presentation::properties::{
    DocumentLayout, LastView, LayoutPreset, PresentationProperties, SlideshowType,
};

/// What `presentation.xml` lists: master and slide relationship ids in
/// document order, and the slide size.
#[derive(Debug, Default)]
pub(crate) struct PresentationIndex {
    pub masters: Vec<String>,
    pub slides: Vec<String>,
    pub layout: DocumentLayout,
}

pub(crate) fn read_presentation(xml: &[u8]) -> Result<PresentationIndex> {
    let mut reader = xml_reader(xml);
    let el = root(&mut reader, b"presentation")?;
    let mut index = PresentationIndex::default();
    while let Some(child) = next_in(&mut reader, &el)? {
        match child.local_name() {
            b"sldMasterIdLst" => index.masters = read_id_list(&mut reader, &child)?,
            b"sldIdLst" => index.slides = read_id_list(&mut reader, &child)?,
            b"sldSz" => {
                let cx = child.attr_parse(b"cx")?.unwrap_or(index.layout.cx);
                let cy = child.attr_parse(b"cy")?.unwrap_or(index.layout.cy);
                let preset = LayoutPreset::from_xml_value(child.attr(b"type")?.as_deref());
                index.layout = DocumentLayout { preset, cx, cy };
                child.skip(&mut reader)?;
            },
            _ => child.skip(&mut reader)?,
        }
    }
    Ok(index)
}

fn read_id_list<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    while let Some(child) = next_in(reader, el)? {
        if let Some(r_id) = child.rel_id()? {
            ids.push(r_id);
        }
        child.skip(reader)?;
    }
    Ok(ids)
}

/// Slideshow settings from `presProps.xml`.
pub(crate) fn read_pres_props(xml: &[u8], props: &mut PresentationProperties) -> Result<()> {
    let mut reader = xml_reader(xml);
    let el = root(&mut reader, b"presentationPr")?;
    while let Some(child) = next_in(&mut reader, &el)? {
        if child.local_name() != b"showPr" {
            child.skip(&mut reader)?;
            continue;
        }
        props.loop_continuously = child.attr_bool(b"loop")?.unwrap_or(false);
        while let Some(show) = next_in(&mut reader, &child)? {
            let name = std::str::from_utf8(show.local_name()).unwrap_or_default();
            if let Some(kind) = SlideshowType::from_xml_value(name) {
                props.slideshow_type = kind;
            }
            show.skip(&mut reader)?;
        }
    }
    Ok(())
}

/// Last view, comment visibility and the slide view zoom from
/// `viewProps.xml`.
pub(crate) fn read_view_props(xml: &[u8], props: &mut PresentationProperties) -> Result<()> {
    let mut reader = xml_reader(xml);
    let el = root(&mut reader, b"viewPr")?;
    if let Some(view) = el.attr(b"lastView")? {
        props.last_view = LastView::from_xml_value(&view);
    }
    props.comments_visible = el.attr_bool(b"showComments")?.unwrap_or(true);
    while let Some(child) = next_in(&mut reader, &el)? {
        if child.local_name() == b"slideViewPr" {
            if let Some(zoom) = find_scale(&mut reader, &child)? {
                props.zoom = zoom;
            }
        } else {
            child.skip(&mut reader)?;
        }
    }
    Ok(())
}

/// `a:sx` below `p:scale`, as a factor.
fn find_scale<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Option<f64>> {
    let mut zoom = None;
    while let Some(child) = next_in(reader, el)? {
        if child.local_name() == b"sx" {
            let n = child.attr_parse::<f64>(b"n")?;
            let d = child.attr_parse::<f64>(b"d")?.filter(|d| *d > 0.0).unwrap_or(100.0);
            zoom = n.map(|n| n / d).or(zoom);
            child.skip(reader)?;
        } else if let Some(found) = find_scale(reader, &child)? {
            zoom = Some(found);
        }
    }
    Ok(zoom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::writer::presentation::{
        PresentationRefs, pres_props_xml, presentation_xml, view_props_xml,
    };

    #[test]
    fn test_presentation_index() {
        let refs = PresentationRefs {
            masters: vec![(2_147_483_648, "rId1".to_string())],
            notes_master: Some("rId2".to_string()),
            slides: vec!["rId4".to_string(), "rId3".to_string()],
        };
        let xml = presentation_xml(&DocumentLayout::custom(12_192_000, 6_858_000), &refs).unwrap();
        let index = read_presentation(xml.as_bytes()).unwrap();
        assert_eq!(index.masters, vec!["rId1"]);
        assert_eq!(index.slides, vec!["rId4", "rId3"]);
        assert_eq!(index.layout, DocumentLayout::custom(12_192_000, 6_858_000));
    }

    #[test]
    fn test_presentation_properties() {
        let written = PresentationProperties {
            zoom: 0.75,
            last_view: LastView::SlideSorter,
            slideshow_type: SlideshowType::Kiosk,
            loop_continuously: true,
            comments_visible: true,
            ..Default::default()
        };
        let mut props = PresentationProperties::default();
        read_pres_props(pres_props_xml(&written).unwrap().as_bytes(), &mut props).unwrap();
        read_view_props(view_props_xml(&written).unwrap().as_bytes(), &mut props).unwrap();
        assert_eq!(props, written);
    }
}
