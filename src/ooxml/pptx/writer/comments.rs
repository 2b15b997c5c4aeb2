//! Slide comments (`commentN.xml`) and the shared author list
//! (`commentAuthors.xml`).
//!
//! Authors are value types; the write state folds equal authors into one
//! `p:cmAuthor`. A comment without an author is filed under an author with
//! an empty name.

use std::fmt::Write as FmtWrite;

use super::context::WriteState;
use crate::common::Result;
use crate::common::unit::emu_to_master_units;
use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::namespace;
use crate::presentation::shape::{CommentAuthor, Shape, ShapeKind};

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// `p:cmLst` for the comment shapes of one slide.
pub(crate) fn comments_xml(comments: &[&Shape], state: &mut WriteState) -> Result<String> {
    let anonymous = CommentAuthor::new("", "");
    let mut xml = String::with_capacity(256 * comments.len() + 128);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(xml, r#"<p:cmLst xmlns:p="{}">"#, namespace::PML_MAIN)?;
    for shape in comments {
        let ShapeKind::Comment(comment) = &shape.kind else {
            continue;
        };
        let author_id = state.author_id(comment.author.as_ref().unwrap_or(&anonymous));
        let idx = state.next_comment_index(author_id);
        write!(
            xml,
            r#"<p:cm authorId="{author_id}" dt="{}" idx="{idx}">"#,
            comment.date.format(DATE_FORMAT)
        )?;
        write!(
            xml,
            r#"<p:pos x="{}" y="{}"/>"#,
            emu_to_master_units(shape.offset_x),
            emu_to_master_units(shape.offset_y)
        )?;
        write!(xml, "<p:text>{}</p:text>", escape_xml(&comment.text))?;
        xml.push_str("</p:cm>");
    }
    xml.push_str("</p:cmLst>");
    Ok(xml)
}

/// `p:cmAuthorLst` with every author registered during the pass.
pub(crate) fn comment_authors_xml(state: &WriteState) -> Result<String> {
    let mut xml = String::with_capacity(512);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(xml, r#"<p:cmAuthorLst xmlns:p="{}">"#, namespace::PML_MAIN)?;
    for (id, author) in state.authors().iter().enumerate() {
        write!(
            xml,
            r#"<p:cmAuthor id="{id}" name="{}" initials="{}" lastIdx="{}" clrIdx="{}"/>"#,
            escape_xml(&author.name),
            escape_xml(&author.initials),
            state.last_comment_index(id),
            id % 6
        )?;
    }
    xml.push_str("</p:cmAuthorLst>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_shared_author_written_once() {
        let ann = CommentAuthor::new("Ann Lee", "AL");
        let date = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let first = Shape::comment(Some(ann.clone()), "Check figures", date).with_offset(12700, 25400);
        let second = Shape::comment(Some(ann), "Fixed?", date);
        let mut state = WriteState::new();
        let xml = comments_xml(&[&first, &second], &mut state).unwrap();
        assert!(xml.contains(r#"<p:cm authorId="0" dt="2024-01-02T03:04:05.000" idx="1">"#));
        assert!(xml.contains(r#"idx="2">"#));
        assert!(xml.contains(r#"<p:pos x="8" y="16"/>"#));

        let authors = comment_authors_xml(&state).unwrap();
        assert_eq!(authors.matches("<p:cmAuthor ").count(), 1);
        assert!(authors.contains(r#"name="Ann Lee" initials="AL" lastIdx="2" clrIdx="0""#));
    }

    #[test]
    fn test_comment_without_author() {
        let shape = Shape::comment(None, "a & b", Utc::now());
        let mut state = WriteState::new();
        let xml = comments_xml(&[&shape], &mut state).unwrap();
        assert!(xml.contains("<p:text>a &amp; b</p:text>"));
        assert_eq!(state.authors(), &[CommentAuthor::new("", "")]);
    }
}
