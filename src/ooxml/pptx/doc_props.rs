//! Document property parts: `docProps/core.xml`, `docProps/app.xml` and
//! `docProps/custom.xml`.
//!
//! The presentation's "mark as final" flag travels as the `_MarkAsFinal`
//! boolean custom property; it is pulled out of the custom set on read.

use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;
use std::io::Cursor;

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::common::xml::{attr, escape_xml, read_text};
use crate::common::{Error, Result};
use crate::presentation::properties::{DocumentProperties, PropertyValue, parse_w3c_datetime};

pub(crate) const MARK_AS_FINAL: &str = "_MarkAsFinal";

const CORE_NS: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
const APP_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";
const CUSTOM_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/custom-properties";
const VTYPES_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes";
const FORMAT_ID: &str = "{D5CDD505-2E9C-101B-9397-08002B2CF9AE}";
const APPLICATION: &str = "Microsoft Office PowerPoint";

fn w3c(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn core_xml(props: &DocumentProperties) -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(
        xml,
        r#"<cp:coreProperties xmlns:cp="{CORE_NS}" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
    )?;
    let mut text = |tag: &str, value: &str| -> Result<()> {
        write!(xml, "<{tag}>{}</{tag}>", escape_xml(value))?;
        Ok(())
    };
    text("dc:title", &props.title)?;
    text("dc:subject", &props.subject)?;
    text("dc:creator", &props.creator)?;
    text("cp:keywords", &props.keywords)?;
    text("dc:description", &props.description)?;
    text("cp:lastModifiedBy", &props.last_modified_by)?;
    if let Some(revision) = &props.revision {
        text("cp:revision", revision)?;
    }
    text("cp:category", &props.category)?;
    if let Some(status) = &props.status {
        text("cp:contentStatus", status)?;
    }
    write!(
        xml,
        r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
        w3c(&props.created)
    )?;
    write!(
        xml,
        r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified>"#,
        w3c(&props.modified)
    )?;
    xml.push_str("</cp:coreProperties>");
    Ok(xml)
}

pub(crate) fn app_xml(props: &DocumentProperties, slide_count: usize) -> Result<String> {
    let mut xml = String::with_capacity(512);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(
        xml,
        r#"<Properties xmlns="{APP_NS}" xmlns:vt="{VTYPES_NS}">"#
    )?;
    write!(xml, "<Application>{APPLICATION}</Application>")?;
    write!(xml, "<Slides>{slide_count}</Slides>")?;
    if !props.company.is_empty() {
        write!(xml, "<Company>{}</Company>", escape_xml(&props.company))?;
    }
    xml.push_str("<AppVersion>12.0000</AppVersion>");
    xml.push_str("</Properties>");
    Ok(xml)
}

/// `custom.xml`, or `None` when there is nothing to write.
pub(crate) fn custom_xml(
    custom: &BTreeMap<String, PropertyValue>,
    mark_as_final: bool,
) -> Result<Option<String>> {
    let final_flag = PropertyValue::Boolean(true);
    let mut entries: Vec<(&str, &PropertyValue)> = custom
        .iter()
        .filter(|(name, _)| name.as_str() != MARK_AS_FINAL)
        .map(|(name, value)| (name.as_str(), value))
        .collect();
    if mark_as_final {
        entries.insert(0, (MARK_AS_FINAL, &final_flag));
    }
    if entries.is_empty() {
        return Ok(None);
    }

    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    let mut root = BytesStart::new("Properties");
    root.push_attribute(("xmlns", CUSTOM_NS));
    root.push_attribute(("xmlns:vt", VTYPES_NS));
    writer.write_event(Event::Start(root))?;

    // pids 0 and 1 are reserved
    for (pid, (name, value)) in (2u32..).zip(entries) {
        let mut property = BytesStart::new("property");
        property.push_attribute(("fmtid", FORMAT_ID));
        property.push_attribute(("pid", pid.to_string().as_str()));
        property.push_attribute(("name", name));
        writer.write_event(Event::Start(property))?;
        let element = format!("vt:{}", value.element_name());
        writer.write_event(Event::Start(BytesStart::new(element.as_str())))?;
        writer.write_event(Event::Text(BytesText::new(&value.to_xml_string())))?;
        writer.write_event(Event::End(BytesEnd::new(element.as_str())))?;
        writer.write_event(Event::End(BytesEnd::new("property")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Properties")))?;

    String::from_utf8(writer.into_inner().into_inner())
        .map(Some)
        .map_err(|e| Error::Xml(format!("generated custom properties are not UTF-8: {e}")))
}

/// Fill `props` from `core.xml`. Unknown elements are ignored and
/// unparsable dates keep their current value.
pub(crate) fn read_core(xml: &str, props: &mut DocumentProperties) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    loop {
        let name = match reader.read_event_into(&mut buf)? {
            Event::Start(e) => Some(e.local_name().as_ref().to_vec()),
            Event::Eof => break,
            _ => None,
        };
        buf.clear();
        let Some(name) = name else {
            continue;
        };
        if name.as_slice() == b"coreProperties" {
            continue;
        }
        let text = read_text(&mut reader, &mut buf)?;
        match name.as_slice() {
            b"title" => props.title = text,
            b"subject" => props.subject = text,
            b"creator" => props.creator = text,
            b"keywords" => props.keywords = text,
            b"description" => props.description = text,
            b"lastModifiedBy" => props.last_modified_by = text,
            b"revision" => props.revision = Some(text),
            b"category" => props.category = text,
            b"contentStatus" => props.status = Some(text),
            b"created" => match parse_w3c_datetime(&text) {
                Some(date) => props.created = date,
                None => log::warn!("ignoring unparsable creation date '{text}'"),
            },
            b"modified" => match parse_w3c_datetime(&text) {
                Some(date) => props.modified = date,
                None => log::warn!("ignoring unparsable modification date '{text}'"),
            },
            _ => {},
        }
    }
    Ok(())
}

/// The `Company` entry of `app.xml`; the rest is derived on write.
pub(crate) fn read_app(xml: &str, props: &mut DocumentProperties) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    loop {
        let is_company = match reader.read_event_into(&mut buf)? {
            Event::Start(e) => e.local_name().as_ref() == b"Company",
            Event::Eof => break,
            _ => false,
        };
        buf.clear();
        if is_company {
            props.company = read_text(&mut reader, &mut buf)?;
        }
    }
    Ok(())
}

/// Custom properties and the mark-as-final flag from `custom.xml`.
pub(crate) fn read_custom(xml: &str) -> Result<(BTreeMap<String, PropertyValue>, bool)> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut custom = BTreeMap::new();
    let mut mark_as_final = false;
    let mut current: Option<String> = None;
    loop {
        let start = match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let local = e.local_name().as_ref().to_vec();
                if local.as_slice() == b"property" {
                    current = attr(&e, b"name")?;
                    None
                } else {
                    Some(String::from_utf8_lossy(&local).into_owned())
                }
            },
            Event::Eof => break,
            _ => None,
        };
        buf.clear();
        let Some(element) = start else {
            continue;
        };
        let Some(name) = current.take() else {
            continue;
        };
        let text = read_text(&mut reader, &mut buf)?;
        let value = PropertyValue::from_xml_string(&element, &text)?;
        if name == MARK_AS_FINAL {
            mark_as_final = value == PropertyValue::Boolean(true);
        } else {
            custom.insert(name, value);
        }
    }
    Ok((custom, mark_as_final))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_core_properties_round_trip() {
        let mut props = DocumentProperties::default();
        props.title = "Q3 <Review>".to_string();
        props.creator = "Ann".to_string();
        props.status = Some("Draft".to_string());
        props.created = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let xml = core_xml(&props).unwrap();
        assert!(xml.contains("<dc:title>Q3 &lt;Review&gt;</dc:title>"));
        assert!(xml.contains(
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">2024-05-06T07:08:09Z</dcterms:created>"#
        ));

        let mut read = DocumentProperties::default();
        read_core(&xml, &mut read).unwrap();
        assert_eq!(read.title, "Q3 <Review>");
        assert_eq!(read.creator, "Ann");
        assert_eq!(read.status.as_deref(), Some("Draft"));
        assert_eq!(read.created, props.created);
        assert_eq!(read.revision, None);
    }

    #[test]
    fn test_app_counts_slides() {
        let mut props = DocumentProperties::default();
        props.company = "Orchard & Co".to_string();
        let xml = app_xml(&props, 3).unwrap();
        assert!(xml.contains("<Slides>3</Slides>"));
        let mut read = DocumentProperties::default();
        read_app(&xml, &mut read).unwrap();
        assert_eq!(read.company, "Orchard & Co");
    }

    #[test]
    fn test_custom_properties_with_mark_as_final() {
        let mut custom = BTreeMap::new();
        custom.insert("Project".to_string(), PropertyValue::String("Longan".to_string()));
        custom.insert("Build".to_string(), PropertyValue::Integer(42));
        let xml = custom_xml(&custom, true).unwrap().unwrap();
        assert!(xml.contains(r#"pid="2" name="_MarkAsFinal"><vt:bool>true</vt:bool>"#));
        assert!(xml.contains(r#"name="Build"><vt:i4>42</vt:i4>"#));

        let (read, final_flag) = read_custom(&xml).unwrap();
        assert!(final_flag);
        assert_eq!(read, custom);
    }

    #[test]
    fn test_no_custom_part_when_empty() {
        assert!(custom_xml(&BTreeMap::new(), false).unwrap().is_none());
    }
}
