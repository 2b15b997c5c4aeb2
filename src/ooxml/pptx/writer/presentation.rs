//! `presentation.xml` and the small presentation-level parts:
//! `presProps.xml`, `viewProps.xml` and `tableStyles.xml`.

use std::fmt::Write as FmtWrite;

use crate::common::Result;
use crate::common::xml::bool_val;
use crate::ooxml::opc::constants::namespace;
use crate::presentation::properties::{DocumentLayout, PresentationProperties};

/// First `p:sldId` id.
pub(crate) const FIRST_SLIDE_ID: u32 = 256;

/// Notes page size, portrait letter.
pub(crate) const NOTES_SIZE: (i64, i64) = (6_858_000, 9_144_000);

const DEFAULT_TABLE_STYLE: &str = "{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}";

/// Relationship ids `presentation.xml` refers to.
pub(crate) struct PresentationRefs {
    /// `(p:sldMasterId id, rId)` per master.
    pub masters: Vec<(u32, String)>,
    pub notes_master: Option<String>,
    pub slides: Vec<String>,
}

pub(crate) fn presentation_xml(layout: &DocumentLayout, refs: &PresentationRefs) -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(
        xml,
        r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML_MAIN
    )?;

    xml.push_str("<p:sldMasterIdLst>");
    for (id, r_id) in &refs.masters {
        write!(xml, r#"<p:sldMasterId id="{id}" r:id="{r_id}"/>"#)?;
    }
    xml.push_str("</p:sldMasterIdLst>");

    if let Some(r_id) = &refs.notes_master {
        write!(xml, r#"<p:notesMasterIdLst><p:notesMasterId r:id="{r_id}"/></p:notesMasterIdLst>"#)?;
    }

    if !refs.slides.is_empty() {
        xml.push_str("<p:sldIdLst>");
        for (id, r_id) in (FIRST_SLIDE_ID..).zip(&refs.slides) {
            write!(xml, r#"<p:sldId id="{id}" r:id="{r_id}"/>"#)?;
        }
        xml.push_str("</p:sldIdLst>");
    }

    write!(xml, r#"<p:sldSz cx="{}" cy="{}""#, layout.cx, layout.cy)?;
    if let Some(kind) = layout.preset.xml_value() {
        write!(xml, r#" type="{kind}""#)?;
    }
    xml.push_str("/>");
    write!(xml, r#"<p:notesSz cx="{}" cy="{}"/>"#, NOTES_SIZE.0, NOTES_SIZE.1)?;
    xml.push_str("<p:defaultTextStyle/>");
    xml.push_str("</p:presentation>");
    Ok(xml)
}

pub(crate) fn pres_props_xml(props: &PresentationProperties) -> Result<String> {
    let mut xml = String::with_capacity(512);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(
        xml,
        r#"<p:presentationPr xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML_MAIN
    )?;
    xml.push_str("<p:showPr");
    if props.loop_continuously {
        xml.push_str(r#" loop="1""#);
    }
    write!(xml, r#" showNarration="1"><p:{}/>"#, props.slideshow_type.xml_value())?;
    xml.push_str("<p:sldAll/></p:showPr>");
    xml.push_str("</p:presentationPr>");
    Ok(xml)
}

pub(crate) fn view_props_xml(props: &PresentationProperties) -> Result<String> {
    let scale = (props.zoom * 100.0).round().max(1.0) as u32;
    let mut xml = String::with_capacity(512);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(
        xml,
        r#"<p:viewPr xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" lastView="{}" showComments="{}">"#,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML_MAIN,
        props.last_view.xml_value(),
        bool_val(props.comments_visible)
    )?;
    xml.push_str("<p:slideViewPr><p:cSldViewPr><p:cViewPr>");
    write!(
        xml,
        r#"<p:scale><a:sx n="{scale}" d="100"/><a:sy n="{scale}" d="100"/></p:scale><p:origin x="0" y="0"/>"#
    )?;
    xml.push_str("</p:cViewPr></p:cSldViewPr></p:slideViewPr>");
    xml.push_str(r#"<p:gridSpacing cx="72008" cy="72008"/>"#);
    xml.push_str("</p:viewPr>");
    Ok(xml)
}

pub(crate) fn table_styles_xml() -> Result<String> {
    let mut xml = String::with_capacity(192);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(
        xml,
        r#"<a:tblStyleLst xmlns:a="{}" def="{DEFAULT_TABLE_STYLE}"/>"#,
        namespace::DML_MAIN
    )?;
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::properties::{LastView, LayoutPreset, SlideshowType};

    #[test]
    fn test_presentation_ids_and_size() {
        let refs = PresentationRefs {
            masters: vec![(2_147_483_648, "rId1".to_string())],
            notes_master: Some("rId2".to_string()),
            slides: vec!["rId3".to_string(), "rId4".to_string()],
        };
        let xml = presentation_xml(&DocumentLayout::from_preset(LayoutPreset::Screen16x9), &refs).unwrap();
        assert!(xml.contains(r#"<p:sldMasterId id="2147483648" r:id="rId1"/>"#));
        assert!(xml.contains(r#"<p:notesMasterId r:id="rId2"/>"#));
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId3"/><p:sldId id="257" r:id="rId4"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="5143500" type="screen16x9"/>"#));

        let custom = presentation_xml(
            &DocumentLayout::custom(100, 200),
            &PresentationRefs { masters: vec![], notes_master: None, slides: vec![] },
        )
        .unwrap();
        assert!(custom.contains(r#"<p:sldSz cx="100" cy="200"/>"#));
        assert!(!custom.contains("sldIdLst"));
    }

    #[test]
    fn test_view_and_show_properties() {
        let props = PresentationProperties {
            zoom: 1.5,
            last_view: LastView::Notes,
            slideshow_type: SlideshowType::Kiosk,
            loop_continuously: true,
            comments_visible: true,
            ..Default::default()
        };
        let view = view_props_xml(&props).unwrap();
        assert!(view.contains(r#"lastView="notesView" showComments="1">"#));
        assert!(view.contains(r#"<a:sx n="150" d="100"/>"#));
        let show = pres_props_xml(&props).unwrap();
        assert!(show.contains(r#"<p:showPr loop="1" showNarration="1"><p:kiosk/>"#));
    }
}
