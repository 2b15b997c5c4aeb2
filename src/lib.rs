//! Longan - a presentation document model with PresentationML packages
//!
//! This library builds presentations in memory and moves them in and out of
//! Office Open XML (`.pptx`) packages.
//!
//! # Features
//!
//! - **Document model**: slides, masters, layouts, themes, rich text, tables,
//!   charts, media, comments, notes, transitions and click animations
//! - **PPTX Writer**: emits a complete package including an embedded workbook
//!   per chart and document properties
//! - **PPTX Reader**: rebuilds the model from a package, reading media lazily
//!   from the archive bytes
//! - **Encryption**: Agile password protection for written and read packages
//!   (`ooxml_encryption` feature, enabled by default)
//! - **Atomic saves**: output goes to a temporary file that replaces the
//!   destination only once it is complete
//!
//! # Example - Writing a presentation
//!
//! ```no_run
//! use std::path::Path;
//!
//! use longan::io::{Format, create_writer};
//! use longan::presentation::Presentation;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pres = Presentation::new();
//! pres.properties_mut().title = "Roadmap".to_string();
//!
//! let slide = pres.create_slide();
//! let shape = slide.create_rich_text_shape();
//! if let Some(text) = shape.text_mut() {
//!     text.create_text_run("Q3 goals");
//! }
//!
//! create_writer(&pres, Format::PowerPoint2007).save(Path::new("roadmap.pptx"))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Reading a presentation
//!
//! ```no_run
//! use longan::ooxml::pptx::PowerPoint2007Reader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pres = PowerPoint2007Reader::new().load("roadmap.pptx")?;
//! for (index, slide) in pres.slides().iter().enumerate() {
//!     println!("slide {}: {} shapes", index + 1, slide.shapes.len());
//! }
//! # Ok(())
//! # }
//! ```

/// Shared error type, measurement units and XML helpers.
pub mod common;

/// The in-memory presentation graph.
pub mod presentation;

/// OOXML (Office Open XML) packaging and the PresentationML codec.
pub mod ooxml;

/// Format dispatch and atomic saving.
pub mod io;

/// The legacy serialized format.
pub mod serialized;

pub use common::{Error, Result};
pub use presentation::Presentation;
