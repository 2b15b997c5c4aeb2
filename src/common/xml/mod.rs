//! XML helpers shared by the part serializers and the package reader.

mod escape;

pub use escape::{escape_xml, unescape_xml};

use std::io::BufRead;

use crate::common::error::Result;
use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, BytesText, Event};

/// Value of the attribute whose local name is `name`, unescaped.
///
/// Namespace prefixes are ignored, so `r:id` matches `b"id"`.
pub fn attr(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for a in e.attributes() {
        let a = a?;
        if a.key.local_name().as_ref() == name {
            return Ok(Some(a.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Value of an attribute matched on its full (prefixed) name.
pub fn attr_qualified(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for a in e.attributes() {
        let a = a?;
        if a.key.as_ref() == name {
            return Ok(Some(a.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Parse an attribute into any `FromStr` type, ignoring unparsable values.
pub fn attr_parse<T: std::str::FromStr>(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<T>> {
    Ok(attr(e, name)?.and_then(|v| v.parse().ok()))
}

/// `true` for the OOXML boolean spellings `1`, `true` and `on`.
pub fn attr_bool(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<bool>> {
    Ok(attr(e, name)?.map(|v| matches!(v.as_str(), "1" | "true" | "on")))
}

/// Append a raw text event to `out`, decoding predefined entities.
pub fn push_text(out: &mut String, t: &BytesText<'_>) -> Result<()> {
    let raw = std::str::from_utf8(t.as_ref())?;
    if raw.contains('&') {
        out.push_str(&unescape_xml(raw));
    } else {
        out.push_str(raw);
    }
    Ok(())
}

/// Append the character an entity or character reference stands for.
pub fn push_general_ref(out: &mut String, r: &BytesRef<'_>) -> Result<()> {
    let name = std::str::from_utf8(r.as_ref())?;
    match name {
        "amp" => out.push('&'),
        "lt" => out.push('<'),
        "gt" => out.push('>'),
        "quot" => out.push('"'),
        "apos" => out.push('\''),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok()
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok()
            } else {
                None
            };
            match code.and_then(char::from_u32) {
                Some(c) => out.push(c),
                None => {
                    out.push('&');
                    out.push_str(name);
                    out.push(';');
                },
            }
        },
    }
    Ok(())
}

/// Text content of the element whose start tag was just read, up to its
/// matching end tag. Text inside nested elements is included.
pub fn read_text<B: BufRead>(reader: &mut Reader<B>, buf: &mut Vec<u8>) -> Result<String> {
    let mut text = String::new();
    let mut depth = 0usize;
    loop {
        match reader.read_event_into(buf)? {
            Event::Text(t) => push_text(&mut text, &t)?,
            Event::GeneralRef(r) => push_general_ref(&mut text, &r)?,
            Event::CData(c) => text.push_str(std::str::from_utf8(c.as_ref())?),
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => break,
            Event::End(_) => depth -= 1,
            Event::Eof => break,
            _ => {},
        }
        buf.clear();
    }
    buf.clear();
    Ok(text)
}

/// `"1"` or `"0"`, the boolean spelling every part serializer emits.
#[inline]
pub fn bool_val(v: bool) -> &'static str {
    if v { "1" } else { "0" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;
    use quick_xml::events::Event;

    #[test]
    fn test_attr_ignores_prefix() {
        let mut reader = Reader::from_str(r#"<a:blip r:embed="rId3" cstate="print"/>"#);
        match reader.read_event().unwrap() {
            Event::Empty(e) => {
                assert_eq!(attr(&e, b"embed").unwrap().as_deref(), Some("rId3"));
                assert_eq!(attr_qualified(&e, b"r:embed").unwrap().as_deref(), Some("rId3"));
                assert_eq!(attr(&e, b"missing").unwrap(), None);
            },
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_text_with_entities_round_trips() {
        let mut reader = Reader::from_str("<t>R&amp;D &lt;2&gt; &#65;</t>");
        let mut text = String::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Text(t) => push_text(&mut text, &t).unwrap(),
                Event::GeneralRef(r) => push_general_ref(&mut text, &r).unwrap(),
                Event::Eof => break,
                _ => {},
            }
        }
        assert_eq!(text, "R&D <2> A");
    }

    #[test]
    fn test_read_text_stops_at_matching_end() {
        let mut reader = Reader::from_str("<a><b>x &amp; <i>y</i></b><c>z</c></a>");
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf).unwrap() {
                Event::Start(e) if e.name().as_ref() == b"b" => break,
                Event::Eof => panic!("no <b>"),
                _ => {},
            }
            buf.clear();
        }
        buf.clear();
        assert_eq!(read_text(&mut reader, &mut buf).unwrap(), "x & y");
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Start(e) => assert_eq!(e.name().as_ref(), b"c"),
            other => panic!("unexpected event {other:?}"),
        }
    }
}
