//! Serializes a [`Package`] into ZIP bytes.
//!
//! Member order is `[Content_Types].xml`, `_rels/.rels`, then every part
//! followed by its own `.rels` part when it owns relationships.

use crate::common::Result;
use crate::ooxml::opc::package::Package;
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PackURI};
use crate::ooxml::opc::phys_pkg::PhysPkgWriter;

pub struct PackageWriter;

impl PackageWriter {
    /// Verify the package and serialize it to bytes.
    ///
    /// Fails without producing any output if a relationship target or a
    /// content type is missing.
    pub fn to_bytes(package: &Package) -> Result<Vec<u8>> {
        package.verify()?;

        let mut phys_writer = PhysPkgWriter::new();
        Self::write_content_types(&mut phys_writer, package)?;
        Self::write_pkg_rels(&mut phys_writer, package)?;
        Self::write_parts(&mut phys_writer, package)?;
        phys_writer.finish()
    }

    fn write_content_types(phys_writer: &mut PhysPkgWriter, package: &Package) -> Result<()> {
        let uri = PackURI::new(CONTENT_TYPES_URI)?;
        phys_writer.write(&uri, package.content_types().to_xml().as_bytes())
    }

    fn write_pkg_rels(phys_writer: &mut PhysPkgWriter, package: &Package) -> Result<()> {
        let package_uri = PackURI::package();
        if let Some(rels) = package.rels().relationships_for(&package_uri) {
            phys_writer.write(&package_uri.rels_uri()?, rels.to_xml().as_bytes())?;
        }
        Ok(())
    }

    fn write_parts(phys_writer: &mut PhysPkgWriter, package: &Package) -> Result<()> {
        for part in package.iter_parts() {
            if part.is_xml() {
                phys_writer.write(part.partname(), part.blob())?;
            } else {
                phys_writer.write_stored(part.partname(), part.blob())?;
            }

            if let Some(rels) = package.rels().relationships_for(part.partname())
                && !rels.is_empty()
            {
                phys_writer.write(&part.partname().rels_uri()?, rels.to_xml().as_bytes())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
    use crate::ooxml::opc::phys_pkg::PhysPkgReader;

    #[test]
    fn test_member_order_and_rels() {
        let mut pkg = Package::new();
        let pres = PackURI::new("/ppt/presentation.xml").unwrap();
        let image = PackURI::new("/ppt/media/image1.png").unwrap();
        pkg.add_part(pres.clone(), ct::PML_PRESENTATION_MAIN, b"<p/>".to_vec());
        pkg.add_part(image.clone(), ct::PNG, vec![1, 2, 3]);
        pkg.rels_mut().register(&PackURI::package(), rt::OFFICE_DOCUMENT, &pres);
        pkg.rels_mut().register(&pres, rt::IMAGE, &image);

        let bytes = PackageWriter::to_bytes(&pkg).unwrap();
        let reader = PhysPkgReader::new(&bytes).unwrap();
        assert_eq!(
            reader.member_names(),
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "ppt/presentation.xml",
                "ppt/_rels/presentation.xml.rels",
                "ppt/media/image1.png",
            ]
        );
    }

    #[test]
    fn test_unverifiable_package_writes_nothing() {
        let mut pkg = Package::new();
        let pres = PackURI::new("/ppt/presentation.xml").unwrap();
        pkg.rels_mut().register(&PackURI::package(), rt::OFFICE_DOCUMENT, &pres);
        assert!(PackageWriter::to_bytes(&pkg).is_err());
    }
}
