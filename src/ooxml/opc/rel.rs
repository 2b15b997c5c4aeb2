//! Relationships between package parts.
//!
//! Every part (and the package itself, as `/`) owns a [`PartRelationships`]
//! collection that becomes its `_rels/*.rels` part. IDs are allocated per
//! owner, so `rId1` on one slide is unrelated to `rId1` on another.
//! Registration is idempotent: asking again for the same type and target
//! returns the ID handed out the first time.

use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::events::Event;
use smallvec::SmallVec;

use crate::common::xml::{attr, escape_xml};
use crate::common::{Error, Result};
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::opc::packuri::PackURI;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelTarget {
    /// Another part of the package.
    Part(PackURI),
    /// A URL outside the package (`TargetMode="External"`).
    External(String),
}

/// A single relationship from a source part to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    r_id: String,
    reltype: String,
    target: RelTarget,
}

impl Relationship {
    pub fn new(r_id: impl Into<String>, reltype: impl Into<String>, target: RelTarget) -> Self {
        Self {
            r_id: r_id.into(),
            reltype: reltype.into(),
            target,
        }
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    #[inline]
    pub fn target(&self) -> &RelTarget {
        &self.target
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        matches!(self.target, RelTarget::External(_))
    }

    /// Absolute target partname; fails for external relationships.
    pub fn target_partname(&self) -> Result<&PackURI> {
        match &self.target {
            RelTarget::Part(uri) => Ok(uri),
            RelTarget::External(url) => Err(Error::UnresolvedRelationship {
                part: self.r_id.clone(),
                target: url.clone(),
            }),
        }
    }

    /// The `Target` attribute as written relative to `base_uri`.
    pub fn target_ref(&self, base_uri: &str) -> String {
        match &self.target {
            RelTarget::Part(uri) => uri.relative_ref(base_uri),
            RelTarget::External(url) => url.clone(),
        }
    }
}

/// Relationships owned by one source part, in registration order.
#[derive(Debug, Clone)]
pub struct PartRelationships {
    base_uri: String,
    rels: SmallVec<[Relationship; 8]>,
}

impl PartRelationships {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            rels: SmallVec::new(),
        }
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    fn find(&self, reltype: &str, target: &RelTarget) -> Option<&Relationship> {
        self.rels
            .iter()
            .find(|rel| rel.reltype == reltype && &rel.target == target)
    }

    /// Return the ID of the matching relationship, adding one with the next
    /// free `rIdN` if none exists.
    pub fn get_or_add(&mut self, reltype: &str, target: RelTarget) -> String {
        if let Some(rel) = self.find(reltype, &target) {
            return rel.r_id.clone();
        }
        let r_id = self.next_r_id();
        self.rels
            .push(Relationship::new(r_id.clone(), reltype, target));
        r_id
    }

    /// Add a relationship with a caller-chosen ID, as read from a `.rels`
    /// part.
    pub fn add_relationship(&mut self, rel: Relationship) {
        self.rels.push(rel);
    }

    /// Next available relationship ID, filling gaps first.
    fn next_r_id(&self) -> String {
        let mut used_numbers: SmallVec<[u32; 16]> = self
            .rels
            .iter()
            .filter_map(|rel| {
                rel.r_id
                    .strip_prefix("rId")
                    .and_then(|n| atoi_simd::parse::<u32>(n.as_bytes()).ok())
            })
            .collect();
        used_numbers.sort_unstable();

        let mut next_num = 1u32;
        for &num in &used_numbers {
            match num.cmp(&next_num) {
                std::cmp::Ordering::Equal => next_num += 1,
                std::cmp::Ordering::Greater => break,
                std::cmp::Ordering::Less => {},
            }
        }
        format!("rId{next_num}")
    }

    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.r_id == r_id)
    }

    /// ID of the first relationship pointing at `target`.
    pub fn r_id_for(&self, target: &PackURI) -> Option<&str> {
        self.rels
            .iter()
            .find(|rel| matches!(&rel.target, RelTarget::Part(uri) if uri == target))
            .map(|rel| rel.r_id.as_str())
    }

    /// The single relationship of `reltype`, if there is exactly one.
    pub fn part_with_reltype(&self, reltype: &str) -> Option<&Relationship> {
        let mut matching = self.rels.iter().filter(|rel| rel.reltype == reltype);
        let first = matching.next()?;
        if matching.next().is_some() {
            log::warn!(
                "{}: several relationships of type {reltype}, using {}",
                self.base_uri,
                first.r_id
            );
        }
        Some(first)
    }

    pub fn with_reltype<'a>(&'a self, reltype: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.rels.iter().filter(move |rel| rel.reltype == reltype)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Serialize to a `.rels` part, ordered by numeric ID.
    pub fn to_xml(&self) -> String {
        let mut rels: Vec<&Relationship> = self.rels.iter().collect();
        rels.sort_by_key(|rel| {
            (
                rel.r_id
                    .strip_prefix("rId")
                    .and_then(|n| atoi_simd::parse::<u32>(n.as_bytes()).ok())
                    .unwrap_or(u32::MAX),
                rel.r_id.clone(),
            )
        });

        let mut xml = String::with_capacity(256 + rels.len() * 160);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<Relationships xmlns=""#);
        xml.push_str(namespace::OPC_RELATIONSHIPS);
        xml.push_str(r#"">"#);
        for rel in rels {
            xml.push_str(r#"<Relationship Id=""#);
            xml.push_str(&escape_xml(&rel.r_id));
            xml.push_str(r#"" Type=""#);
            xml.push_str(&escape_xml(&rel.reltype));
            xml.push_str(r#"" Target=""#);
            xml.push_str(&escape_xml(&rel.target_ref(&self.base_uri)));
            xml.push('"');
            if rel.is_external() {
                xml.push_str(r#" TargetMode="External""#);
            }
            xml.push_str("/>");
        }
        xml.push_str("</Relationships>");
        xml
    }

    /// Parse a `.rels` part. Internal targets are resolved against
    /// `base_uri` (the source part's directory).
    pub fn from_xml(base_uri: &str, xml: &[u8]) -> Result<Self> {
        let mut rels = Self::new(base_uri);
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e)
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    match (attr(e, b"Id")?, attr(e, b"Type")?, attr(e, b"Target")?) {
                        (Some(r_id), Some(reltype), Some(target_ref)) => {
                            let external =
                                attr(e, b"TargetMode")?.as_deref() == Some("External");
                            let target = if external {
                                RelTarget::External(target_ref)
                            } else {
                                RelTarget::Part(PackURI::from_rel_ref(base_uri, &target_ref)?)
                            };
                            rels.add_relationship(Relationship::new(r_id, reltype, target));
                        },
                        _ => log::warn!("{base_uri}: skipping relationship with missing attributes"),
                    }
                },
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }
        Ok(rels)
    }
}

/// The relationships of every part in a package, keyed by owner.
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    owners: BTreeMap<PackURI, PartRelationships>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn owner_mut(&mut self, owner: &PackURI) -> &mut PartRelationships {
        self.owners
            .entry(owner.clone())
            .or_insert_with(|| PartRelationships::new(owner.base_uri()))
    }

    /// Register an internal relationship, returning its (possibly existing)
    /// ID.
    pub fn register(&mut self, owner: &PackURI, reltype: &str, target: &PackURI) -> String {
        let r_id = self
            .owner_mut(owner)
            .get_or_add(reltype, RelTarget::Part(target.clone()));
        log::trace!("{owner} -[{r_id}]-> {target}");
        r_id
    }

    pub fn register_external(&mut self, owner: &PackURI, reltype: &str, url: &str) -> String {
        self.owner_mut(owner)
            .get_or_add(reltype, RelTarget::External(url.to_string()))
    }

    /// ID of the relationship from `owner` to `target`.
    pub fn get(&self, owner: &PackURI, target: &PackURI) -> Result<String> {
        self.owners
            .get(owner)
            .and_then(|rels| rels.r_id_for(target))
            .map(str::to_string)
            .ok_or_else(|| Error::UnresolvedRelationship {
                part: owner.to_string(),
                target: target.to_string(),
            })
    }

    pub fn relationships_for(&self, owner: &PackURI) -> Option<&PartRelationships> {
        self.owners.get(owner)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PackURI, &PartRelationships)> {
        self.owners.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> PackURI {
        PackURI::new(s).unwrap()
    }

    #[test]
    fn test_get_or_add_is_idempotent() {
        let mut rels = PartRelationships::new("/ppt/slides");
        let layout = RelTarget::Part(uri("/ppt/slideLayouts/slideLayout1.xml"));
        assert_eq!(rels.get_or_add("type1", layout.clone()), "rId1");
        assert_eq!(rels.get_or_add("type1", layout.clone()), "rId1");
        assert_eq!(rels.get_or_add("type2", layout), "rId2");
        assert_eq!(
            rels.get_or_add("type1", RelTarget::External("https://example.com".into())),
            "rId3"
        );
        assert_eq!(rels.len(), 3);
    }

    #[test]
    fn test_next_r_id_fills_gaps() {
        let mut rels = PartRelationships::new("/ppt");
        rels.add_relationship(Relationship::new("rId1", "t", RelTarget::External("a".into())));
        rels.add_relationship(Relationship::new("rId3", "t", RelTarget::External("b".into())));
        assert_eq!(rels.next_r_id(), "rId2");
    }

    #[test]
    fn test_ids_are_per_owner() {
        let mut graph = RelationshipGraph::new();
        let slide1 = uri("/ppt/slides/slide1.xml");
        let slide2 = uri("/ppt/slides/slide2.xml");
        let chart1 = uri("/ppt/charts/chart1.xml");
        let chart2 = uri("/ppt/charts/chart2.xml");
        assert_eq!(graph.register(&slide1, "chart", &chart1), "rId1");
        assert_eq!(graph.register(&slide2, "chart", &chart2), "rId1");
        assert_eq!(graph.get(&slide2, &chart2).unwrap(), "rId1");
        assert!(matches!(
            graph.get(&slide1, &chart2),
            Err(Error::UnresolvedRelationship { .. })
        ));
    }

    #[test]
    fn test_to_xml_writes_relative_targets_in_id_order() {
        let mut rels = PartRelationships::new("/ppt/slides");
        for i in 1..=10 {
            rels.get_or_add("img", RelTarget::Part(uri(&format!("/ppt/media/image{i}.png"))));
        }
        rels.get_or_add("link", RelTarget::External("https://a.example/?x=1&y=2".into()));
        let xml = rels.to_xml();
        let first = xml.find(r#"Id="rId2""#).unwrap();
        let tenth = xml.find(r#"Id="rId10""#).unwrap();
        assert!(first < tenth);
        assert!(xml.contains(r#"Target="../media/image1.png""#));
        assert!(xml.contains(r#"Target="https://a.example/?x=1&amp;y=2" TargetMode="External""#));
    }

    #[test]
    fn test_from_xml_resolves_targets() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="layout" Target="../slideLayouts/slideLayout2.xml"/>
  <Relationship Id="rId2" Type="hyperlink" Target="https://example.com" TargetMode="External"/>
</Relationships>"#;
        let rels = PartRelationships::from_xml("/ppt/slides", xml).unwrap();
        assert_eq!(
            rels.get("rId1").unwrap().target_partname().unwrap().as_str(),
            "/ppt/slideLayouts/slideLayout2.xml"
        );
        assert!(rels.get("rId2").unwrap().is_external());
        assert!(rels.get("rId2").unwrap().target_partname().is_err());
        assert_eq!(rels.part_with_reltype("layout").unwrap().r_id(), "rId1");
    }
}
