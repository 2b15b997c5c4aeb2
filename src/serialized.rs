//! The legacy serialized format.
//!
//! A ZIP archive holding the whole object graph as `presentation.yaml` and
//! every binary resource under `media/`. Resources are stored by entry name
//! and come back as lazily read archive blobs.

use std::sync::Arc;

use crate::common::{Error, Result};
use crate::io::{PresentationReader, PresentationWriter};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::phys_pkg::{PhysPkgReader, PhysPkgWriter};
use crate::presentation::Presentation;
use crate::presentation::media::{DrawingSource, LazyBlob};

const GRAPH_ENTRY: &str = "presentation.yaml";

pub struct SerializedWriter<'a> {
    presentation: &'a Presentation,
    password: Option<String>,
}

impl<'a> SerializedWriter<'a> {
    pub fn new(presentation: &'a Presentation) -> Self {
        Self {
            presentation,
            password: None,
        }
    }
}

impl PresentationWriter for SerializedWriter<'_> {
    fn set_password(&mut self, password: &str) {
        self.password = Some(password.to_string());
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.password.is_some() {
            return Err(Error::UnsupportedFormat(
                "the serialized format cannot be password protected".to_string(),
            ));
        }

        let mut graph = self.presentation.clone();
        let mut archive = PhysPkgWriter::new();
        for (n, source) in graph.drawing_sources_mut().into_iter().enumerate() {
            let entry = format!("media/{}.{}", n + 1, source.extension()?);
            archive.write_stored(&PackURI::new(format!("/{entry}"))?, &source.bytes()?)?;
            *source = DrawingSource::Archive(LazyBlob::detached(entry));
        }

        let yaml = serde_saphyr::to_string(&graph)
            .map_err(|e| Error::Serialization(format!("failed to serialize presentation: {e}")))?;
        archive.write(&PackURI::new(format!("/{GRAPH_ENTRY}"))?, yaml.as_bytes())?;
        archive.finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SerializedReader;

impl SerializedReader {
    pub fn new() -> Self {
        Self
    }
}

impl PresentationReader for SerializedReader {
    fn set_password(&mut self, _password: &str) {
        log::warn!("the serialized format is never encrypted; ignoring password");
    }

    fn load_bytes(&self, bytes: &[u8]) -> Result<Presentation> {
        let archive: Arc<[u8]> = Arc::from(bytes);
        let yaml = PhysPkgReader::new(&archive)?.member(GRAPH_ENTRY)?;
        let yaml = std::str::from_utf8(&yaml)?;
        let mut pres: Presentation = serde_saphyr::from_str(yaml)
            .map_err(|e| Error::Serialization(format!("failed to parse presentation: {e}")))?;

        for source in pres.drawing_sources_mut() {
            if let DrawingSource::Archive(blob) = source {
                blob.attach(Arc::clone(&archive));
            }
        }
        log::debug!("loaded serialized presentation with {} slides", pres.slide_count());
        Ok(pres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::Shape;

    const PNG: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

    #[test]
    fn test_graph_round_trip() {
        let mut pres = Presentation::new();
        pres.create_slide().create_rich_text_shape();
        pres.create_slide();
        pres.properties_mut().title = "Quarterly".to_string();
        pres.properties_mut().keywords = "plan, budget".to_string();

        let bytes = SerializedWriter::new(&pres).to_bytes().unwrap();
        let read = SerializedReader::new().load_bytes(&bytes).unwrap();
        assert_eq!(read.slide_count(), 2);
        assert_eq!(read.properties().title, "Quarterly");
        assert_eq!(read.properties().keywords, "plan, budget");
        assert_eq!(read.slides()[0].shapes.len(), 1);
    }

    #[test]
    fn test_media_is_stored_and_reattached() {
        let mut pres = Presentation::new();
        pres.create_slide()
            .add_shape(Shape::drawing(DrawingSource::memory(PNG.to_vec(), "image/png")));

        let bytes = SerializedWriter::new(&pres).to_bytes().unwrap();
        let mut zip = PhysPkgReader::new(&bytes).unwrap();
        assert_eq!(zip.member("media/1.png").unwrap(), PNG);

        let mut read = SerializedReader::new().load_bytes(&bytes).unwrap();
        let sources = read.drawing_sources_mut();
        assert_eq!(sources.len(), 1);
        let DrawingSource::Archive(blob) = &*sources[0] else {
            panic!("expected an archive blob");
        };
        assert_eq!(blob.entry, "media/1.png");
        assert_eq!(blob.bytes().unwrap(), PNG);
    }

    #[test]
    fn test_password_is_rejected() {
        let pres = Presentation::new();
        let mut writer = SerializedWriter::new(&pres);
        writer.set_password("secret");
        assert!(matches!(writer.to_bytes(), Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_graph_is_invalid_package() {
        let mut archive = PhysPkgWriter::new();
        archive
            .write(&PackURI::new("/other.txt").unwrap(), b"nothing here")
            .unwrap();
        let bytes = archive.finish().unwrap();
        assert!(matches!(
            SerializedReader::new().load_bytes(&bytes),
            Err(Error::InvalidPackage(_))
        ));
    }
}
