//! Binary resources referenced by drawings, media shapes and backgrounds.
//!
//! A [`DrawingSource`] names where the bytes come from; nothing is read until
//! a writer asks for them. Sources loaded from a package stay as
//! [`LazyBlob`] handles into the original archive bytes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};
use crate::ooxml::opc::phys_pkg;

/// Image format types supported by PresentationML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Svg,
    Emf,
    Wmf,
}

impl ImageFormat {
    /// Get the MIME type for this image format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::Svg => "image/svg+xml",
            Self::Emf => "image/x-emf",
            Self::Wmf => "image/x-wmf",
        }
    }

    /// Get the file extension for this image format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Svg => "svg",
            Self::Emf => "emf",
            Self::Wmf => "wmf",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Some(match ext.to_ascii_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "gif" => Self::Gif,
            "bmp" => Self::Bmp,
            "tif" | "tiff" => Self::Tiff,
            "svg" => Self::Svg,
            "emf" => Self::Emf,
            "wmf" => Self::Wmf,
            _ => return None,
        })
    }

    pub fn from_mime_type(mime: &str) -> Option<Self> {
        Some(match mime {
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/gif" => Self::Gif,
            "image/bmp" => Self::Bmp,
            "image/tiff" => Self::Tiff,
            "image/svg+xml" => Self::Svg,
            "image/x-emf" => Self::Emf,
            "image/x-wmf" => Self::Wmf,
            _ => return None,
        })
    }

    /// Detect image format from bytes (magic number detection).
    pub fn detect_from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // GIF8
        if bytes.starts_with(b"GIF8") {
            return Some(Self::Gif);
        }

        // BM
        if bytes.starts_with(b"BM") {
            return Some(Self::Bmp);
        }

        // TIFF: little-endian or big-endian
        if bytes.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || bytes.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some(Self::Tiff);
        }

        // Placeable WMF
        if bytes.starts_with(&[0xD7, 0xCD, 0xC6, 0x9A]) {
            return Some(Self::Wmf);
        }

        // EMF header record type 1
        if bytes.starts_with(&[0x01, 0x00, 0x00, 0x00]) && bytes.len() >= 44 && &bytes[40..44] == b" EMF"
        {
            return Some(Self::Emf);
        }

        if bytes.starts_with(b"<svg") || bytes.starts_with(b"<?xml") {
            return Some(Self::Svg);
        }

        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Infer from a file extension, defaulting to video.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" | "wav" | "wma" | "m4a" | "aac" | "ogg" | "mid" | "midi" => MediaKind::Audio,
            _ => MediaKind::Video,
        }
    }
}

/// MIME type for audio and video extensions.
pub fn media_mime_type(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "wma" => "audio/x-ms-wma",
        "m4a" => "audio/mp4",
        "mp4" => "video/mp4",
        "wmv" => "video/x-ms-wmv",
        "avi" => "video/avi",
        "mov" => "video/quicktime",
        "ogv" => "video/ogg",
        _ => "application/octet-stream",
    }
}

/// A handle to one entry of a ZIP archive held in memory.
///
/// The archive bytes are shared with every other blob loaded from the same
/// package and are not serialized; a detached blob has to be re-attached
/// with [`LazyBlob::attach`] before its bytes can be read.
#[derive(Clone, Serialize, Deserialize)]
pub struct LazyBlob {
    pub entry: String,
    #[serde(skip)]
    archive: Option<Arc<[u8]>>,
}

impl LazyBlob {
    pub fn new(archive: Arc<[u8]>, entry: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            archive: Some(archive),
        }
    }

    pub fn detached(entry: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            archive: None,
        }
    }

    pub fn attach(&mut self, archive: Arc<[u8]>) {
        self.archive = Some(archive);
    }

    pub fn is_attached(&self) -> bool {
        self.archive.is_some()
    }

    pub fn bytes(&self) -> Result<Vec<u8>> {
        let archive = self.archive.as_ref().ok_or_else(|| {
            Error::InvalidPackage(format!("blob '{}' is not attached to an archive", self.entry))
        })?;
        phys_pkg::read_entry(archive, &self.entry)
    }
}

impl std::fmt::Debug for LazyBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyBlob")
            .field("entry", &self.entry)
            .field("attached", &self.archive.is_some())
            .finish()
    }
}

impl PartialEq for LazyBlob {
    fn eq(&self, other: &Self) -> bool {
        self.entry == other.entry
            && match (&self.archive, &other.archive) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
    }
}

/// Where the bytes of a drawing, media clip or background image come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawingSource {
    /// A file on disk.
    File(PathBuf),
    /// Image bytes rendered in memory, with their MIME type.
    Gd { data: Vec<u8>, mime_type: String },
    /// A `data:<mime>;base64,<payload>` URI.
    Base64(String),
    /// An entry inside a ZIP file on disk.
    ZipFile { archive: PathBuf, entry: String },
    /// An entry of an already-loaded archive.
    Archive(LazyBlob),
}

impl DrawingSource {
    pub fn file(path: impl AsRef<Path>) -> Self {
        DrawingSource::File(path.as_ref().to_path_buf())
    }

    pub fn memory(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        DrawingSource::Gd {
            data,
            mime_type: mime_type.into(),
        }
    }

    pub fn bytes(&self) -> Result<Vec<u8>> {
        match self {
            DrawingSource::File(path) => read_file(path),
            DrawingSource::Gd { data, .. } => Ok(data.clone()),
            DrawingSource::Base64(uri) => {
                let (_, payload) = split_data_uri(uri)?;
                STANDARD
                    .decode(payload.trim())
                    .map_err(|e| Error::InvalidPackage(format!("invalid base64 image data: {e}")))
            },
            DrawingSource::ZipFile { archive, entry } => {
                let archive_bytes = read_file(archive)?;
                phys_pkg::read_entry(&archive_bytes, entry)
            },
            DrawingSource::Archive(blob) => blob.bytes(),
        }
    }

    /// Lower-case file extension used to name the package part.
    pub fn extension(&self) -> Result<String> {
        let from_name = |name: &str| {
            Path::new(name)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase())
        };
        let ext = match self {
            DrawingSource::File(path) => path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase()),
            DrawingSource::Gd { data, mime_type } => ImageFormat::from_mime_type(mime_type)
                .or_else(|| ImageFormat::detect_from_bytes(data))
                .map(|f| f.extension().to_string()),
            DrawingSource::Base64(uri) => {
                let (mime, _) = split_data_uri(uri)?;
                ImageFormat::from_mime_type(mime).map(|f| f.extension().to_string())
            },
            DrawingSource::ZipFile { entry, .. } => from_name(entry),
            DrawingSource::Archive(blob) => from_name(&blob.entry),
        };
        match ext {
            Some(ext) => Ok(ext),
            None => self
                .bytes()
                .ok()
                .and_then(|b| ImageFormat::detect_from_bytes(&b))
                .map(|f| f.extension().to_string())
                .ok_or_else(|| Error::UnsupportedFormat("unrecognized image data".to_string())),
        }
    }

    pub fn mime_type(&self) -> Result<String> {
        if let DrawingSource::Gd { mime_type, .. } = self {
            return Ok(mime_type.clone());
        }
        let ext = self.extension()?;
        Ok(match ImageFormat::from_extension(&ext) {
            Some(format) => format.mime_type().to_string(),
            None => media_mime_type(&ext).to_string(),
        })
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read(path)?)
}

fn split_data_uri(uri: &str) -> Result<(&str, &str)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| Error::InvalidPackage("image data URI must start with 'data:'".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidPackage("image data URI has no payload".to_string()))?;
    let mime = header.strip_suffix(";base64").unwrap_or(header);
    Ok((mime, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_detect_from_bytes() {
        assert_eq!(ImageFormat::detect_from_bytes(&PNG_HEADER), Some(ImageFormat::Png));
        assert_eq!(
            ImageFormat::detect_from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::detect_from_bytes(b"GIF89a"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::detect_from_bytes(b"abc"), None);
    }

    #[test]
    fn test_base64_source() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(PNG_HEADER));
        let source = DrawingSource::Base64(uri);
        assert_eq!(source.bytes().unwrap(), PNG_HEADER);
        assert_eq!(source.extension().unwrap(), "png");
        assert_eq!(source.mime_type().unwrap(), "image/png");
    }

    #[test]
    fn test_memory_source_extension_from_mime() {
        let source = DrawingSource::memory(PNG_HEADER.to_vec(), "image/jpeg");
        assert_eq!(source.extension().unwrap(), "jpeg");
    }

    #[test]
    fn test_missing_file_is_file_not_found() {
        let source = DrawingSource::file("/definitely/not/here.png");
        assert!(matches!(source.bytes(), Err(Error::FileNotFound(_))));
        assert_eq!(source.extension().unwrap(), "png");
    }

    #[test]
    fn test_file_source_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.PNG");
        std::fs::write(&path, PNG_HEADER).unwrap();
        let source = DrawingSource::file(&path);
        assert_eq!(source.bytes().unwrap(), PNG_HEADER);
        assert_eq!(source.extension().unwrap(), "png");
    }

    #[test]
    fn test_detached_blob_cannot_be_read() {
        let blob = LazyBlob::detached("media/1.png");
        assert!(!blob.is_attached());
        assert!(matches!(blob.bytes(), Err(Error::InvalidPackage(_))));
    }

    #[test]
    fn test_media_kind_from_extension() {
        assert_eq!(MediaKind::from_extension("MP3"), MediaKind::Audio);
        assert_eq!(MediaKind::from_extension("mp4"), MediaKind::Video);
        assert_eq!(media_mime_type("wav"), "audio/wav");
    }
}
