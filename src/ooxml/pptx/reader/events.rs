//! Recursive-descent helpers over the quick-xml pull parser.
//!
//! Every part parser walks its XML with [`next_in`]: a handler receives an
//! [`Element`] and must consume it completely, either by reading its
//! children until [`next_in`] returns `None` or by calling
//! [`Element::skip`].

use std::str::FromStr;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::common::xml;
use crate::common::{Error, Result};

pub(crate) type XmlReader<'a> = Reader<&'a [u8]>;

pub(crate) fn xml_reader(xml: &[u8]) -> XmlReader<'_> {
    Reader::from_reader(xml)
}

/// A start tag together with whether it was self-closing.
pub(crate) struct Element<'a> {
    pub start: BytesStart<'a>,
    pub empty: bool,
}

impl<'a> Element<'a> {
    #[inline]
    pub fn local_name(&self) -> &[u8] {
        self.start.local_name().into_inner()
    }

    #[inline]
    pub fn attr(&self, name: &[u8]) -> Result<Option<String>> {
        xml::attr(&self.start, name)
    }

    #[inline]
    pub fn attr_parse<T: FromStr>(&self, name: &[u8]) -> Result<Option<T>> {
        xml::attr_parse(&self.start, name)
    }

    #[inline]
    pub fn attr_bool(&self, name: &[u8]) -> Result<Option<bool>> {
        xml::attr_bool(&self.start, name)
    }

    /// The relationship id (`r:id`) of elements that also carry a plain
    /// numeric `id`, such as `p:sldId`.
    pub fn rel_id(&self) -> Result<Option<String>> {
        for a in self.start.attributes() {
            let a = a?;
            if a.key.prefix().is_some() && a.key.local_name().as_ref() == b"id" {
                return Ok(Some(a.unescape_value()?.into_owned()));
            }
        }
        Ok(None)
    }

    /// Consume the element without looking at its content.
    pub fn skip(&self, reader: &mut XmlReader<'a>) -> Result<()> {
        if !self.empty {
            reader.read_to_end(self.start.name())?;
        }
        Ok(())
    }

    /// Text content of the element, consuming it.
    pub fn text(&self, reader: &mut XmlReader<'a>) -> Result<String> {
        if self.empty {
            return Ok(String::new());
        }
        let mut buf = Vec::new();
        xml::read_text(reader, &mut buf)
    }
}

/// Next child of the element currently being read; `None` once the
/// element's end tag has been consumed.
pub(crate) fn next_child<'a>(reader: &mut XmlReader<'a>) -> Result<Option<Element<'a>>> {
    loop {
        match reader.read_event()? {
            Event::Start(start) => return Ok(Some(Element { start, empty: false })),
            Event::Empty(start) => return Ok(Some(Element { start, empty: true })),
            Event::End(_) | Event::Eof => return Ok(None),
            _ => {},
        }
    }
}

/// Next child of `parent`. A self-closing parent has none.
#[inline]
pub(crate) fn next_in<'a>(
    reader: &mut XmlReader<'a>,
    parent: &Element<'a>,
) -> Result<Option<Element<'a>>> {
    if parent.empty {
        Ok(None)
    } else {
        next_child(reader)
    }
}

/// The document element of a part, checked against `expected`.
pub(crate) fn root<'a>(reader: &mut XmlReader<'a>, expected: &[u8]) -> Result<Element<'a>> {
    let root = next_child(reader)?.ok_or_else(|| Error::Xml("part has no root element".to_string()))?;
    if root.local_name() != expected {
        return Err(Error::invalid_package(format!(
            "expected <{}> root element, found <{}>",
            String::from_utf8_lossy(expected),
            String::from_utf8_lossy(root.local_name())
        )));
    }
    Ok(root)
}

/// `val` attribute of a `<c:x val=".."/>` style element, consuming it.
pub(crate) fn val<'a, T: FromStr>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<Option<T>> {
    let value = el.attr_parse(b"val")?;
    el.skip(reader)?;
    Ok(value)
}

/// Boolean `val`; a missing attribute means true, as in the chart schema.
pub(crate) fn val_bool<'a>(reader: &mut XmlReader<'a>, el: &Element<'a>) -> Result<bool> {
    let value = el.attr_bool(b"val")?.unwrap_or(true);
    el.skip(reader)?;
    Ok(value)
}
