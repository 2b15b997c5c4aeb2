//! Open Packaging Conventions (OPC) layer.
//!
//! Package structure shared by every PresentationML part:
//!
//! - part names ([`PackURI`]) and the `[Content_Types].xml` manifest
//! - per-part relationships with idempotent `rIdN` allocation
//! - the ZIP container, written in memory and read lazily
//!
//! # Performance Features
//!
//! - Uses `atoi_simd` for relationship id and part index parsing
//! - Uses `quick-xml` for streaming parses of manifests and `.rels` parts
//! - Part blobs are inflated only when a parser asks for them

pub mod constants;
pub mod content_types;
pub mod package;
pub mod packuri;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use content_types::ContentTypeManifest;
pub use package::{Package, Part};
pub use packuri::PackURI;
pub use pkgreader::PackageReader;
pub use pkgwriter::PackageWriter;
pub use rel::{PartRelationships, RelTarget, Relationship, RelationshipGraph};
