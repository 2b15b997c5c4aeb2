//! Format dispatch: one reader and one writer interface over the package
//! format and the legacy serialized format.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use longan::io::{Format, create_reader, create_writer};
//! use longan::presentation::Presentation;
//!
//! let path = Path::new("deck.pptx");
//! let mut pres = Presentation::new();
//! pres.create_slide();
//! create_writer(&pres, Format::PowerPoint2007).save(path)?;
//!
//! let format = Format::from_path(path).unwrap_or(Format::PowerPoint2007);
//! let loaded = create_reader(format).load(path)?;
//! assert_eq!(loaded.slide_count(), 1);
//! # Ok::<(), longan::common::Error>(())
//! ```

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::common::{Error, Result};
use crate::ooxml::pptx::{PowerPoint2007Reader, PowerPoint2007Writer, WriterOptions};
use crate::presentation::Presentation;
use crate::serialized::{SerializedReader, SerializedWriter};

/// The formats a presentation can be saved to and loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Office Open XML PresentationML (`.pptx`).
    PowerPoint2007,
    /// The legacy serialized form: the graph as YAML inside a ZIP.
    Serialized,
}

impl Format {
    /// Look a format up by its name, as used in configuration.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "PowerPoint2007" => Ok(Format::PowerPoint2007),
            "Serialized" => Ok(Format::Serialized),
            _ => Err(Error::UnsupportedFormat(format!("no format named '{name}'"))),
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pptx" | "pptm" | "potx" | "ppsx" => Some(Format::PowerPoint2007),
            "pres" => Some(Format::Serialized),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::PowerPoint2007 => "PowerPoint2007",
            Format::Serialized => "Serialized",
        }
    }
}

pub trait PresentationWriter {
    /// Encrypt the output with `password`. Formats without password
    /// protection fail the save instead of writing in clear.
    fn set_password(&mut self, password: &str);

    fn to_bytes(&self) -> Result<Vec<u8>>;

    /// Serialize and atomically replace `path`.
    fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        write_atomically(path, &bytes)
    }
}

pub trait PresentationReader {
    fn set_password(&mut self, password: &str);

    fn load_bytes(&self, bytes: &[u8]) -> Result<Presentation>;

    fn load(&self, path: &Path) -> Result<Presentation> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        self.load_bytes(&bytes)
    }
}

impl PresentationWriter for PowerPoint2007Writer<'_> {
    fn set_password(&mut self, password: &str) {
        PowerPoint2007Writer::set_password(self, password);
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        PowerPoint2007Writer::to_bytes(self)
    }
}

impl PresentationReader for PowerPoint2007Reader {
    fn set_password(&mut self, password: &str) {
        PowerPoint2007Reader::set_password(self, password);
    }

    fn load_bytes(&self, bytes: &[u8]) -> Result<Presentation> {
        PowerPoint2007Reader::load_bytes(self, bytes)
    }
}

pub fn create_writer<'a>(
    presentation: &'a Presentation,
    format: Format,
) -> Box<dyn PresentationWriter + 'a> {
    match format {
        Format::PowerPoint2007 => Box::new(
            PowerPoint2007Writer::new(presentation).with_options(WriterOptions::default()),
        ),
        Format::Serialized => Box::new(SerializedWriter::new(presentation)),
    }
}

pub fn create_reader(format: Format) -> Box<dyn PresentationReader> {
    match format {
        Format::PowerPoint2007 => Box::new(PowerPoint2007Reader::new()),
        Format::Serialized => Box::new(SerializedReader::new()),
    }
}

/// Write `bytes` to a temporary file next to `path` and rename it over
/// `path`. The destination is untouched unless every byte made it to disk.
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path)?;
    log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::Shape;
    use crate::presentation::chart::Chart;

    #[test]
    fn test_format_lookup() {
        assert_eq!(Format::from_name("PowerPoint2007").unwrap(), Format::PowerPoint2007);
        assert_eq!(Format::from_name("Serialized").unwrap(), Format::Serialized);
        assert!(matches!(
            Format::from_name("ODPresentation"),
            Err(Error::UnsupportedFormat(_))
        ));
        assert_eq!(Format::from_path("a/b/Deck.PPTX"), Some(Format::PowerPoint2007));
        assert_eq!(Format::from_path("deck.pres"), Some(Format::Serialized));
        assert_eq!(Format::from_path("deck"), None);
        for format in [Format::PowerPoint2007, Format::Serialized] {
            assert_eq!(Format::from_name(format.name()).unwrap(), format);
        }
    }

    #[test]
    fn test_save_and_load_through_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut pres = Presentation::new();
        pres.create_slide();
        pres.create_slide();
        pres.properties_mut().title = "Dispatch".to_string();
        for (format, name) in [(Format::PowerPoint2007, "deck.pptx"), (Format::Serialized, "deck.pres")] {
            let path = dir.path().join(name);
            create_writer(&pres, format).save(&path).unwrap();
            let read = create_reader(format).load(&path).unwrap();
            assert_eq!(read.slide_count(), 2);
            assert_eq!(read.properties().title, "Dispatch");
        }
    }

    #[test]
    fn test_failed_save_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        std::fs::write(&path, b"previous contents").unwrap();

        let mut pres = Presentation::new();
        pres.create_slide()
            .add_shape(Shape::chart(Chart::new()).with_name("Untyped"));
        let err = create_writer(&pres, Format::PowerPoint2007).save(&path).unwrap_err();
        assert!(matches!(err, Error::UndefinedChartType { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), b"previous contents");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_source_is_file_not_found() {
        let err = create_reader(Format::Serialized)
            .load(Path::new("/nonexistent/deck.pres"))
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }
}
