//! PowerPoint 2007+ (`.pptx`) packages.
//!
//! [`PowerPoint2007Writer`] turns a [`Presentation`] into a package and
//! [`PowerPoint2007Reader`] builds one back from a package. Both share the
//! OPC layer in [`crate::ooxml::opc`] and the document property parts in
//! this module.
//!
//! # Example
//!
//! ```rust,no_run
//! use longan::ooxml::pptx::{PowerPoint2007Reader, PowerPoint2007Writer};
//! use longan::presentation::Presentation;
//!
//! let mut pres = Presentation::new();
//! pres.create_slide().create_rich_text_shape();
//! PowerPoint2007Writer::new(&pres).save("deck.pptx")?;
//!
//! let loaded = PowerPoint2007Reader::new().load("deck.pptx")?;
//! assert_eq!(loaded.slide_count(), 1);
//! # Ok::<(), longan::common::Error>(())
//! ```
//!
//! [`Presentation`]: crate::presentation::Presentation

mod doc_props;
pub mod reader;
pub mod writer;

pub use reader::PowerPoint2007Reader;
pub use writer::{PowerPoint2007Writer, WriterOptions};
