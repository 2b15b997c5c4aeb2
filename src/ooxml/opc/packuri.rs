//! Package part names.
//!
//! A [`PackURI`] is an absolute, slash-separated part name such as
//! `/ppt/slides/slide1.xml`. Relationship targets are stored relative to
//! the source part's directory and resolved back with
//! [`PackURI::from_rel_ref`].

use crate::common::{Error, Result};

/// The package pseudo-partname, representing the package itself
pub const PACKAGE_URI: &str = "/";

/// The URI for the [Content_Types].xml part
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackURI {
    uri: String,
}

impl PackURI {
    /// Create a new PackURI; the string must begin with a forward slash.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(Error::InvalidPackUri(format!(
                "PackURI must begin with slash, got '{uri}'"
            )));
        }
        Ok(PackURI { uri })
    }

    /// The package itself, owner of the root relationships.
    pub fn package() -> Self {
        PackURI {
            uri: PACKAGE_URI.to_string(),
        }
    }

    /// Tuple part name: `indexed("/ppt/slides/slide", 3, "xml")` is
    /// `/ppt/slides/slide3.xml`.
    pub fn indexed(prefix: &str, index: u32, ext: &str) -> Result<Self> {
        Self::new(format!("{prefix}{index}.{ext}"))
    }

    /// Resolve a relative reference (like `../slideLayouts/slideLayout1.xml`)
    /// against a base URI (like `/ppt/slides`). Absolute references are
    /// taken as-is.
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self> {
        let joined = if relative_ref.starts_with('/') {
            relative_ref.to_string()
        } else if base_uri.ends_with('/') {
            format!("{base_uri}{relative_ref}")
        } else {
            format!("{base_uri}/{relative_ref}")
        };
        Self::new(normalize_path(&joined))
    }

    /// Directory portion, e.g. `/ppt/slides` for `/ppt/slides/slide1.xml`.
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    pub fn filename(&self) -> &str {
        match self.uri.rfind('/') {
            Some(pos) => &self.uri[pos + 1..],
            None => "",
        }
    }

    /// Extension without the leading period.
    pub fn ext(&self) -> &str {
        let filename = self.filename();
        match filename.rfind('.') {
            Some(pos) => &filename[pos + 1..],
            None => "",
        }
    }

    /// Numeric suffix of a tuple part name, e.g. 21 for `slide21.xml`.
    pub fn idx(&self) -> Option<u32> {
        let filename = self.filename();
        let stem = filename.split('.').next().unwrap_or(filename);
        let digits = stem.len() - stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 || digits == stem.len() {
            return None;
        }
        atoi_simd::parse::<u32>(&stem.as_bytes()[stem.len() - digits..]).ok()
    }

    /// ZIP member name (leading slash stripped).
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// Reference to this part relative to `base_uri`.
    pub fn relative_ref(&self, base_uri: &str) -> String {
        if base_uri == "/" {
            return self.membername().to_string();
        }

        let from_parts: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();
        let to_parts: Vec<&str> = self.uri.split('/').filter(|s| !s.is_empty()).collect();
        let common = from_parts
            .iter()
            .zip(to_parts.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = vec![".."; from_parts.len() - common];
        parts.extend(&to_parts[common..]);
        parts.join("/")
    }

    /// The `.rels` part holding this part's relationships.
    pub fn rels_uri(&self) -> Result<PackURI> {
        let base_uri = self.base_uri();
        if base_uri == "/" {
            Self::new(format!("/_rels/{}.rels", self.filename()))
        } else {
            Self::new(format!("{base_uri}/_rels/{}.rels", self.filename()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {},
            ".." => {
                parts.pop();
            },
            _ => parts.push(part),
        }
    }
    format!("/{}", parts.join("/"))
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packuri_new() {
        assert!(PackURI::new("/ppt/presentation.xml").is_ok());
        assert!(matches!(
            PackURI::new("ppt/presentation.xml"),
            Err(Error::InvalidPackUri(_))
        ));
    }

    #[test]
    fn test_components() {
        let uri = PackURI::new("/ppt/slides/slide21.xml").unwrap();
        assert_eq!(uri.base_uri(), "/ppt/slides");
        assert_eq!(uri.filename(), "slide21.xml");
        assert_eq!(uri.ext(), "xml");
        assert_eq!(uri.idx(), Some(21));
        assert_eq!(uri.membername(), "ppt/slides/slide21.xml");

        let root = PackURI::package();
        assert_eq!(root.base_uri(), "/");
        assert_eq!(root.filename(), "");
        assert_eq!(root.membername(), "");
    }

    #[test]
    fn test_idx_of_singletons_and_double_extensions() {
        assert_eq!(PackURI::new("/ppt/presentation.xml").unwrap().idx(), None);
        let embed = PackURI::new("/ppt/embeddings/chart3.xml.xlsx").unwrap();
        assert_eq!(embed.idx(), Some(3));
        assert_eq!(embed.ext(), "xlsx");
    }

    #[test]
    fn test_relative_ref_round_trip() {
        let layout = PackURI::new("/ppt/slideLayouts/slideLayout1.xml").unwrap();
        let rel = layout.relative_ref("/ppt/slides");
        assert_eq!(rel, "../slideLayouts/slideLayout1.xml");
        assert_eq!(PackURI::from_rel_ref("/ppt/slides", &rel).unwrap(), layout);

        let pres = PackURI::new("/ppt/presentation.xml").unwrap();
        assert_eq!(pres.relative_ref("/"), "ppt/presentation.xml");
        let slide = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        assert_eq!(slide.relative_ref("/ppt"), "slides/slide1.xml");
    }

    #[test]
    fn test_from_rel_ref_absolute_target() {
        let uri = PackURI::from_rel_ref("/ppt/slides", "/ppt/media/image1.png").unwrap();
        assert_eq!(uri.as_str(), "/ppt/media/image1.png");
    }

    #[test]
    fn test_rels_uri() {
        let slide = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        assert_eq!(slide.rels_uri().unwrap().as_str(), "/ppt/slides/_rels/slide1.xml.rels");
        assert_eq!(PackURI::package().rels_uri().unwrap().as_str(), "/_rels/.rels");
    }

    #[test]
    fn test_indexed() {
        let uri = PackURI::indexed("/ppt/charts/chart", 2, "xml").unwrap();
        assert_eq!(uri.as_str(), "/ppt/charts/chart2.xml");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_relative_ref_resolves_back(
                base in prop::collection::vec("[a-z]{1,8}", 0..4),
                target in prop::collection::vec("[a-zA-Z0-9]{1,8}", 1..5),
            ) {
                let base_uri = format!("/{}", base.join("/"));
                let uri = PackURI::new(format!("/{}.xml", target.join("/"))).unwrap();
                let rel = uri.relative_ref(&base_uri);
                prop_assert_eq!(PackURI::from_rel_ref(&base_uri, &rel).unwrap(), uri);
            }

            #[test]
            fn prop_indexed_name_carries_index(index in 1u32..10_000_000) {
                let uri = PackURI::indexed("/ppt/slides/slide", index, "xml").unwrap();
                prop_assert_eq!(uri.idx(), Some(index));
            }
        }
    }
}
