//! Slide comments and the presentation-wide comment author list.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};

use super::events::{next_in, root, xml_reader};
use crate::common::Result;
use crate::common::unit::master_units_to_emu;
use crate::presentation::properties::parse_w3c_datetime;
use crate::presentation::shape::{CommentAuthor, Shape};

/// `p:cmAuthorLst` keyed by author id. Authors with an empty name stand for
/// comments without an author.
pub(crate) fn read_comment_authors(xml: &[u8]) -> Result<BTreeMap<u32, Option<CommentAuthor>>> {
    let mut reader = xml_reader(xml);
    let el = root(&mut reader, b"cmAuthorLst")?;
    let mut authors = BTreeMap::new();
    while let Some(child) = next_in(&mut reader, &el)? {
        if child.local_name() == b"cmAuthor"
            && let Some(id) = child.attr_parse::<u32>(b"id")?
        {
            let name = child.attr(b"name")?.unwrap_or_default();
            let initials = child.attr(b"initials")?.unwrap_or_default();
            let author = (!name.is_empty()).then(|| CommentAuthor::new(name, initials));
            authors.insert(id, author);
        }
        child.skip(&mut reader)?;
    }
    Ok(authors)
}

/// Comment dates are written without a zone; both that form and full W3C
/// dates are accepted.
fn parse_comment_date(value: &str) -> Option<DateTime<Utc>> {
    parse_w3c_datetime(value).or_else(|| {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    })
}

/// `p:cmLst` of one slide as comment shapes positioned at their anchor.
pub(crate) fn read_comments(
    xml: &[u8],
    authors: &BTreeMap<u32, Option<CommentAuthor>>,
) -> Result<Vec<Shape>> {
    let mut reader = xml_reader(xml);
    let el = root(&mut reader, b"cmLst")?;
    let mut comments = Vec::new();
    while let Some(cm) = next_in(&mut reader, &el)? {
        if cm.local_name() != b"cm" {
            cm.skip(&mut reader)?;
            continue;
        }
        let author = match cm.attr_parse::<u32>(b"authorId")? {
            Some(id) => authors.get(&id).cloned().unwrap_or_else(|| {
                log::warn!("comment refers to unknown author {id}");
                None
            }),
            None => None,
        };
        let date = match cm.attr(b"dt")? {
            Some(dt) => parse_comment_date(&dt).unwrap_or_else(|| {
                log::warn!("unparsable comment date '{dt}'");
                DateTime::UNIX_EPOCH
            }),
            None => DateTime::UNIX_EPOCH,
        };
        let (mut x, mut y) = (0, 0);
        let mut text = String::new();
        while let Some(child) = next_in(&mut reader, &cm)? {
            match child.local_name() {
                b"pos" => {
                    x = master_units_to_emu(child.attr_parse(b"x")?.unwrap_or(0));
                    y = master_units_to_emu(child.attr_parse(b"y")?.unwrap_or(0));
                    child.skip(&mut reader)?;
                },
                b"text" => text = child.text(&mut reader)?,
                _ => child.skip(&mut reader)?,
            }
        }
        comments.push(Shape::comment(author, text, date).with_offset(x, y));
    }
    Ok(comments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::shape::ShapeKind;
    use chrono::TimeZone;

    const AUTHORS: &str = r#"<p:cmAuthorLst xmlns:p="urn:p"><p:cmAuthor id="0" name="Ann Lee" initials="AL" lastIdx="2" clrIdx="0"/><p:cmAuthor id="1" name="" initials="" lastIdx="1" clrIdx="1"/></p:cmAuthorLst>"#;

    #[test]
    fn test_authors_and_anonymous() {
        let authors = read_comment_authors(AUTHORS.as_bytes()).unwrap();
        assert_eq!(authors[&0], Some(CommentAuthor::new("Ann Lee", "AL")));
        assert_eq!(authors[&1], None);
    }

    #[test]
    fn test_comment_position_and_date() {
        let authors = read_comment_authors(AUTHORS.as_bytes()).unwrap();
        let xml = r#"<p:cmLst xmlns:p="urn:p"><p:cm authorId="0" dt="2024-01-02T03:04:05.000" idx="1"><p:pos x="576" y="8"/><p:text>Check &amp; fix</p:text></p:cm><p:cm authorId="1" dt="2024-01-02T03:04:05Z" idx="1"><p:pos x="0" y="0"/><p:text/></p:cm></p:cmLst>"#;
        let comments = read_comments(xml.as_bytes(), &authors).unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].offset_x, 914_400);
        assert_eq!(comments[0].offset_y, master_units_to_emu(8));
        let ShapeKind::Comment(first) = &comments[0].kind else {
            panic!("expected a comment");
        };
        assert_eq!(first.text, "Check & fix");
        assert_eq!(first.author.as_ref().map(|a| a.initials.as_str()), Some("AL"));
        assert_eq!(first.date, Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        let ShapeKind::Comment(second) = &comments[1].kind else {
            panic!("expected a comment");
        };
        assert_eq!(second.author, None);
        assert_eq!(second.date, first.date);
    }
}
