//! The `[Content_Types].xml` manifest.
//!
//! Maps file extensions (`Default`) and individual part names (`Override`)
//! to content types. The writer fills it as parts are added; the reader
//! parses it to discover what each archive member is.

use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::common::xml::{attr, escape_xml};
use crate::common::{Error, Result};
use crate::ooxml::opc::constants::{content_type as ct, namespace};
use crate::ooxml::opc::packuri::PackURI;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeManifest {
    /// Lowercase extension to content type
    defaults: BTreeMap<String, String>,
    /// Part name to content type
    overrides: BTreeMap<String, String>,
}

impl Default for ContentTypeManifest {
    fn default() -> Self {
        let mut manifest = Self {
            defaults: BTreeMap::new(),
            overrides: BTreeMap::new(),
        };
        manifest.declare_default("rels", ct::OPC_RELATIONSHIPS);
        manifest.declare_default("xml", ct::XML);
        manifest
    }
}

impl ContentTypeManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty manifest, without the `rels`/`xml` defaults.
    fn empty() -> Self {
        Self {
            defaults: BTreeMap::new(),
            overrides: BTreeMap::new(),
        }
    }

    pub fn declare_default(&mut self, ext: &str, content_type: &str) {
        self.defaults
            .insert(ext.to_ascii_lowercase(), content_type.to_string());
    }

    pub fn declare_override(&mut self, partname: &PackURI, content_type: &str) {
        self.overrides
            .insert(partname.to_string(), content_type.to_string());
    }

    /// Declare `partname`, preferring an extension default when the content
    /// type is the conventional one for that extension and no other
    /// default has claimed it.
    pub fn declare(&mut self, partname: &PackURI, content_type: &str) {
        let ext = partname.ext().to_ascii_lowercase();
        let conventional = ct::default_for_extension(&ext) == Some(content_type);
        match self.defaults.get(&ext) {
            Some(existing) if existing == content_type => {},
            None if conventional => self.declare_default(&ext, content_type),
            _ => self.declare_override(partname, content_type),
        }
    }

    /// Content type of `partname`: override first, then extension default.
    pub fn content_type_for(&self, partname: &PackURI) -> Option<&str> {
        self.overrides
            .get(partname.as_str())
            .or_else(|| self.defaults.get(&partname.ext().to_ascii_lowercase()))
            .map(String::as_str)
    }

    pub fn overrides(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overrides
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(512 + self.overrides.len() * 160);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<Types xmlns=""#);
        xml.push_str(namespace::OPC_CONTENT_TYPES);
        xml.push_str(r#"">"#);

        for (ext, content_type) in &self.defaults {
            xml.push_str(r#"<Default Extension=""#);
            xml.push_str(&escape_xml(ext));
            xml.push_str(r#"" ContentType=""#);
            xml.push_str(&escape_xml(content_type));
            xml.push_str(r#""/>"#);
        }
        for (partname, content_type) in &self.overrides {
            xml.push_str(r#"<Override PartName=""#);
            xml.push_str(&escape_xml(partname));
            xml.push_str(r#"" ContentType=""#);
            xml.push_str(&escape_xml(content_type));
            xml.push_str(r#""/>"#);
        }

        xml.push_str("</Types>");
        xml
    }

    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut manifest = Self::empty();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Empty(ref e) | Event::Start(ref e) => match e.local_name().as_ref() {
                    b"Default" => {
                        if let (Some(ext), Some(content_type)) =
                            (attr(e, b"Extension")?, attr(e, b"ContentType")?)
                        {
                            manifest.declare_default(&ext, &content_type);
                        }
                    },
                    b"Override" => {
                        if let (Some(partname), Some(content_type)) =
                            (attr(e, b"PartName")?, attr(e, b"ContentType")?)
                        {
                            let partname = PackURI::new(partname)?;
                            manifest.declare_override(&partname, &content_type);
                        }
                    },
                    _ => {},
                },
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }

        if manifest.defaults.is_empty() && manifest.overrides.is_empty() {
            return Err(Error::invalid_package("[Content_Types].xml declares no content types"));
        }
        Ok(manifest)
    }
}
