//! In-memory OPC package: parts, their content types and relationships.
//!
//! The presentation writer fills a [`Package`] part by part and hands it to
//! [`PackageWriter`](crate::ooxml::opc::pkgwriter::PackageWriter); nothing
//! touches the ZIP container until the whole package has been assembled and
//! verified.

use crate::common::{Error, Result};
use crate::ooxml::opc::content_types::ContentTypeManifest;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::{RelTarget, RelationshipGraph};

/// A single part of the package.
#[derive(Debug, Clone)]
pub struct Part {
    partname: PackURI,
    content_type: String,
    blob: Vec<u8>,
}

impl Part {
    pub fn new(partname: PackURI, content_type: impl Into<String>, blob: Vec<u8>) -> Self {
        Self {
            partname,
            content_type: content_type.into(),
            blob,
        }
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// XML parts are deflated in the archive; everything else is stored.
    pub fn is_xml(&self) -> bool {
        self.content_type.ends_with("+xml") || self.content_type == "application/xml"
    }
}

#[derive(Debug, Default)]
pub struct Package {
    /// Parts in the order they were added
    parts: Vec<Part>,
    rels: RelationshipGraph,
    content_types: ContentTypeManifest,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a part and declare its content type. Adding a part name twice
    /// replaces the earlier blob.
    pub fn add_part(&mut self, partname: PackURI, content_type: &str, blob: Vec<u8>) {
        self.content_types.declare(&partname, content_type);
        log::trace!("part {partname} ({} bytes)", blob.len());
        match self.parts.iter_mut().find(|p| p.partname == partname) {
            Some(existing) => *existing = Part::new(partname, content_type, blob),
            None => self.parts.push(Part::new(partname, content_type, blob)),
        }
    }

    pub fn part(&self, partname: &PackURI) -> Option<&Part> {
        self.parts.iter().find(|p| &p.partname == partname)
    }

    #[inline]
    pub fn contains(&self, partname: &PackURI) -> bool {
        self.part(partname).is_some()
    }

    pub fn iter_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    #[inline]
    pub fn rels(&self) -> &RelationshipGraph {
        &self.rels
    }

    #[inline]
    pub fn rels_mut(&mut self) -> &mut RelationshipGraph {
        &mut self.rels
    }

    #[inline]
    pub fn content_types(&self) -> &ContentTypeManifest {
        &self.content_types
    }

    /// Check that every internal relationship points at a part of this
    /// package and that every relationship owner exists.
    pub fn verify(&self) -> Result<()> {
        for (owner, rels) in self.rels.iter() {
            if owner != &PackURI::package() && !self.contains(owner) {
                return Err(Error::invalid_package(format!(
                    "relationships registered for missing part {owner}"
                )));
            }
            for rel in rels.iter() {
                if let RelTarget::Part(target) = rel.target()
                    && !self.contains(target)
                {
                    return Err(Error::UnresolvedRelationship {
                        part: owner.to_string(),
                        target: target.to_string(),
                    });
                }
            }
        }
        for part in &self.parts {
            if self.content_types.content_type_for(&part.partname).is_none() {
                return Err(Error::invalid_package(format!(
                    "no content type declared for {}",
                    part.partname
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};

    fn uri(s: &str) -> PackURI {
        PackURI::new(s).unwrap()
    }

    #[test]
    fn test_verify_accepts_consistent_package() {
        let mut pkg = Package::new();
        let pres = uri("/ppt/presentation.xml");
        let slide = uri("/ppt/slides/slide1.xml");
        pkg.add_part(pres.clone(), ct::PML_PRESENTATION_MAIN, b"<x/>".to_vec());
        pkg.add_part(slide.clone(), ct::PML_SLIDE, b"<x/>".to_vec());
        pkg.rels_mut().register(&PackURI::package(), rt::OFFICE_DOCUMENT, &pres);
        pkg.rels_mut().register(&pres, rt::SLIDE, &slide);
        pkg.rels_mut()
            .register_external(&slide, rt::HYPERLINK, "https://example.com");
        assert!(pkg.verify().is_ok());
    }

    #[test]
    fn test_verify_rejects_dangling_target() {
        let mut pkg = Package::new();
        let pres = uri("/ppt/presentation.xml");
        pkg.add_part(pres.clone(), ct::PML_PRESENTATION_MAIN, Vec::new());
        pkg.rels_mut()
            .register(&pres, rt::SLIDE, &uri("/ppt/slides/slide9.xml"));
        assert!(matches!(
            pkg.verify(),
            Err(Error::UnresolvedRelationship { target, .. }) if target == "/ppt/slides/slide9.xml"
        ));
    }

    #[test]
    fn test_add_part_replaces_blob() {
        let mut pkg = Package::new();
        let part = uri("/docProps/app.xml");
        pkg.add_part(part.clone(), ct::OFC_EXTENDED_PROPERTIES, b"a".to_vec());
        pkg.add_part(part.clone(), ct::OFC_EXTENDED_PROPERTIES, b"b".to_vec());
        assert_eq!(pkg.iter_parts().count(), 1);
        assert_eq!(pkg.part(&part).unwrap().blob(), b"b");
        assert!(pkg.part(&part).unwrap().is_xml());
    }
}
