//! Office Open XML (OOXML) format implementation.
//!
//! The module is organized into layers:
//!
//! 1. **OPC Layer** (`opc`): Low-level package handling (ZIP, parts, relationships)
//! 2. **PresentationML** (`pptx`): the `.pptx` reader and writer
//! 3. **Encryption** (`crypto`): Agile password protection of whole packages
//!
//! # Example
//!
//! ```rust,no_run
//! use longan::ooxml::opc::PackageReader;
//!
//! let bytes = std::fs::read("deck.pptx")?;
//! let package = PackageReader::new(&bytes)?;
//! let main = package.main_document_part()?;
//! println!("{} ({})", main.partname, main.content_type);
//! # Ok::<(), longan::common::Error>(())
//! ```
pub mod opc;
pub mod pptx;

#[cfg(feature = "ooxml_encryption")]
pub mod crypto;

// Re-export commonly used types from OPC layer
pub use opc::PackURI;
