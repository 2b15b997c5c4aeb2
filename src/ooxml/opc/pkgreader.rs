//! Read-only view of a serialized OPC package.
//!
//! [`PackageReader`] parses `[Content_Types].xml` and the package
//! relationships, then walks the relationship graph breadth-first from the
//! root, visiting each part once. Part blobs are not inflated during the
//! walk; callers pull them with [`PackageReader::blob`] as they parse.

use std::collections::{BTreeMap, VecDeque};

use crate::common::{Error, Result};
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::content_types::ContentTypeManifest;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use crate::ooxml::opc::rel::{PartRelationships, RelTarget};

/// A part discovered by the relationship walk.
#[derive(Debug)]
pub struct SerializedPart {
    pub partname: PackURI,
    pub content_type: String,
    /// Type of the relationship the part was first reached through
    pub reltype: String,
    pub rels: PartRelationships,
}

pub struct PackageReader<'data> {
    phys: PhysPkgReader<'data>,
    content_types: ContentTypeManifest,
    pkg_rels: PartRelationships,
    /// Parts in breadth-first discovery order
    parts: Vec<SerializedPart>,
    index: BTreeMap<PackURI, usize>,
}

impl<'data> PackageReader<'data> {
    pub fn new(data: &'data [u8]) -> Result<Self> {
        let mut phys = PhysPkgReader::new(data)?;
        let content_types = ContentTypeManifest::from_xml(&phys.content_types_xml()?)?;

        let package_uri = PackURI::package();
        let pkg_rels = match phys.rels_xml_for(&package_uri)? {
            Some(xml) => PartRelationships::from_xml(package_uri.base_uri(), &xml)?,
            None => return Err(Error::invalid_package("missing package relationships _rels/.rels")),
        };

        let mut reader = Self {
            phys,
            content_types,
            pkg_rels,
            parts: Vec::with_capacity(32),
            index: BTreeMap::new(),
        };
        reader.walk()?;
        Ok(reader)
    }

    fn walk(&mut self) -> Result<()> {
        let mut queue: VecDeque<(PackURI, String)> = VecDeque::new();
        for rel in self.pkg_rels.iter() {
            if let RelTarget::Part(target) = rel.target() {
                queue.push_back((target.clone(), rel.reltype().to_string()));
            }
        }

        while let Some((partname, reltype)) = queue.pop_front() {
            if self.index.contains_key(&partname) {
                continue;
            }
            if !self.phys.contains(&partname) {
                log::warn!("relationship target {partname} is not in the archive, skipping");
                continue;
            }
            let content_type = self
                .content_types
                .content_type_for(&partname)
                .ok_or_else(|| {
                    Error::invalid_package(format!("no content type declared for {partname}"))
                })?
                .to_string();
            let rels = match self.phys.rels_xml_for(&partname)? {
                Some(xml) => PartRelationships::from_xml(partname.base_uri(), &xml)?,
                None => PartRelationships::new(partname.base_uri()),
            };

            for rel in rels.iter() {
                if let RelTarget::Part(target) = rel.target()
                    && !self.index.contains_key(target)
                {
                    queue.push_back((target.clone(), rel.reltype().to_string()));
                }
            }

            log::trace!("discovered {partname} via {reltype}");
            self.index.insert(partname.clone(), self.parts.len());
            self.parts.push(SerializedPart {
                partname,
                content_type,
                reltype,
                rels,
            });
        }
        log::debug!("package walk found {} parts", self.parts.len());
        Ok(())
    }

    #[inline]
    pub fn pkg_rels(&self) -> &PartRelationships {
        &self.pkg_rels
    }

    /// The part the package's `officeDocument` relationship points at.
    pub fn main_document_part(&self) -> Result<&SerializedPart> {
        let rel = self
            .pkg_rels
            .part_with_reltype(rt::OFFICE_DOCUMENT)
            .ok_or_else(|| Error::invalid_package("no officeDocument relationship"))?;
        let partname = rel.target_partname()?;
        self.part(partname)
            .ok_or_else(|| Error::invalid_package(format!("main part {partname} is missing")))
    }

    pub fn part(&self, partname: &PackURI) -> Option<&SerializedPart> {
        self.index.get(partname).map(|&i| &self.parts[i])
    }

    /// Relationships of `partname`; the package root for `/`.
    pub fn rels_for(&self, partname: &PackURI) -> Option<&PartRelationships> {
        if partname == &PackURI::package() {
            return Some(&self.pkg_rels);
        }
        self.part(partname).map(|p| &p.rels)
    }

    pub fn iter_parts(&self) -> impl Iterator<Item = &SerializedPart> {
        self.parts.iter()
    }

    /// Inflate the bytes of a part.
    pub fn blob(&mut self, partname: &PackURI) -> Result<Vec<u8>> {
        self.phys.blob_for(partname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as ct;
    use crate::ooxml::opc::package::Package;
    use crate::ooxml::opc::phys_pkg::PhysPkgWriter;
    use crate::ooxml::opc::pkgwriter::PackageWriter;

    fn uri(s: &str) -> PackURI {
        PackURI::new(s).unwrap()
    }

    fn sample_package() -> Vec<u8> {
        let mut pkg = Package::new();
        let pres = uri("/ppt/presentation.xml");
        let slide = uri("/ppt/slides/slide1.xml");
        let layout = uri("/ppt/slideLayouts/slideLayout1.xml");
        pkg.add_part(pres.clone(), ct::PML_PRESENTATION_MAIN, b"<p:presentation/>".to_vec());
        pkg.add_part(slide.clone(), ct::PML_SLIDE, b"<p:sld/>".to_vec());
        pkg.add_part(layout.clone(), ct::PML_SLIDE_LAYOUT, b"<p:sldLayout/>".to_vec());
        let root = PackURI::package();
        pkg.rels_mut().register(&root, rt::OFFICE_DOCUMENT, &pres);
        pkg.rels_mut().register(&pres, rt::SLIDE, &slide);
        pkg.rels_mut().register(&slide, rt::SLIDE_LAYOUT, &layout);
        // cycle back to the slide must not revisit it
        pkg.rels_mut().register(&layout, rt::SLIDE, &slide);
        PackageWriter::to_bytes(&pkg).unwrap()
    }

    #[test]
    fn test_walk_visits_each_part_once() {
        let bytes = sample_package();
        let mut reader = PackageReader::new(&bytes).unwrap();
        let names: Vec<&str> = reader.iter_parts().map(|p| p.partname.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "/ppt/presentation.xml",
                "/ppt/slides/slide1.xml",
                "/ppt/slideLayouts/slideLayout1.xml"
            ]
        );
        let main = reader.main_document_part().unwrap();
        assert_eq!(main.content_type, ct::PML_PRESENTATION_MAIN);
        assert_eq!(reader.blob(&uri("/ppt/slides/slide1.xml")).unwrap(), b"<p:sld/>");
    }

    #[test]
    fn test_missing_manifest_or_root_rels() {
        let mut writer = PhysPkgWriter::new();
        writer.write(&uri("/ppt/presentation.xml"), b"<p/>").unwrap();
        let bytes = writer.finish().unwrap();
        assert!(matches!(PackageReader::new(&bytes), Err(Error::InvalidPackage(_))));

        let mut writer = PhysPkgWriter::new();
        writer
            .write(
                &uri("/[Content_Types].xml"),
                ContentTypeManifest::new().to_xml().as_bytes(),
            )
            .unwrap();
        let bytes = writer.finish().unwrap();
        assert!(matches!(PackageReader::new(&bytes), Err(Error::InvalidPackage(_))));
    }
}
