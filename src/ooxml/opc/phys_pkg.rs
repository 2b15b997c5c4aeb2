//! The physical ZIP container under an OPC package.
//!
//! [`PhysPkgReader`] borrows the archive bytes and inflates members on
//! demand; [`PhysPkgWriter`] builds an archive in memory. XML parts are
//! deflated, while media, embedded workbooks and thumbnails are stored
//! as-is since they are already compressed.

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::common::{Error, Result};
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PackURI};

/// Read a single member out of archive bytes.
///
/// Used by lazily loaded media to slice its bytes out of the shared archive
/// buffer only when asked.
pub fn read_entry(archive: &[u8], name: &str) -> Result<Vec<u8>> {
    PhysPkgReader::new(archive)?.member(name)
}

/// Read access to the members of a ZIP archive.
pub struct PhysPkgReader<'data> {
    archive: ZipArchive<Cursor<&'data [u8]>>,
}

impl<'data> PhysPkgReader<'data> {
    pub fn new(data: &'data [u8]) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| Error::invalid_package(format!("not a ZIP archive: {e}")))?;
        Ok(Self { archive })
    }

    /// Bytes of the member `name`; a missing member is an invalid package.
    pub fn member(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(Error::invalid_package(format!("missing archive entry '{name}'")));
            },
            Err(e) => return Err(e.into()),
        };
        let mut blob = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut blob)?;
        Ok(blob)
    }

    #[inline]
    pub fn blob_for(&mut self, pack_uri: &PackURI) -> Result<Vec<u8>> {
        self.member(pack_uri.membername())
    }

    pub fn content_types_xml(&mut self) -> Result<Vec<u8>> {
        self.member(&CONTENT_TYPES_URI[1..])
    }

    /// The `.rels` part of `source_uri`, if it has one.
    pub fn rels_xml_for(&mut self, source_uri: &PackURI) -> Result<Option<Vec<u8>>> {
        let rels_uri = source_uri.rels_uri()?;
        if !self.contains(&rels_uri) {
            return Ok(None);
        }
        self.blob_for(&rels_uri).map(Some)
    }

    pub fn contains(&self, pack_uri: &PackURI) -> bool {
        self.archive.index_for_name(pack_uri.membername()).is_some()
    }

    pub fn member_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }
}

/// Builds a ZIP archive in memory.
pub struct PhysPkgWriter {
    archive: ZipWriter<Cursor<Vec<u8>>>,
}

impl PhysPkgWriter {
    pub fn new() -> Self {
        Self {
            archive: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Write a deflated member.
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        self.write_with(pack_uri, blob, CompressionMethod::Deflated)
    }

    /// Write a member without compression.
    pub fn write_stored(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        self.write_with(pack_uri, blob, CompressionMethod::Stored)
    }

    fn write_with(
        &mut self,
        pack_uri: &PackURI,
        blob: &[u8],
        method: CompressionMethod,
    ) -> Result<()> {
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .large_file(blob.len() >= u32::MAX as usize);
        self.archive.start_file(pack_uri.membername(), options)?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(self.archive.finish()?.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let uri = PackURI::new("/ppt/presentation.xml").unwrap();
        let media = PackURI::new("/ppt/media/image1.png").unwrap();
        let mut writer = PhysPkgWriter::new();
        writer.write(&uri, b"<p:presentation/>").unwrap();
        writer.write_stored(&media, &[0x89, b'P', b'N', b'G']).unwrap();
        let zip_data = writer.finish().unwrap();

        let mut reader = PhysPkgReader::new(&zip_data).unwrap();
        assert_eq!(reader.len(), 2);
        assert!(reader.contains(&media));
        assert_eq!(reader.blob_for(&uri).unwrap(), b"<p:presentation/>");
        assert_eq!(read_entry(&zip_data, "ppt/media/image1.png").unwrap()[1], b'P');
    }

    #[test]
    fn test_missing_member_is_invalid_package() {
        let zip_data = PhysPkgWriter::new().finish().unwrap();
        let mut reader = PhysPkgReader::new(&zip_data).unwrap();
        assert!(reader.is_empty());
        assert!(matches!(reader.content_types_xml(), Err(Error::InvalidPackage(_))));
        let slide = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        assert_eq!(reader.rels_xml_for(&slide).unwrap(), None);
    }

    #[test]
    fn test_garbage_is_not_an_archive() {
        assert!(matches!(
            PhysPkgReader::new(b"definitely not a zip"),
            Err(Error::InvalidPackage(_))
        ));
    }
}
