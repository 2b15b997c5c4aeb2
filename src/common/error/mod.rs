//! Unified error types for Longan.
//!
//! A single error enum covers package, XML, container and password failures
//! so callers receive one typed failure per operation.

// Submodule declarations
pub mod types;
pub mod conversions;

// Re-exports
pub use types::{Error, Result};
