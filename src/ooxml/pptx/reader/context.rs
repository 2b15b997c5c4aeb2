//! Per-part read context: the part's relationships, the shared archive
//! bytes behind lazily loaded media, and the slide index used to resolve
//! slide-jump hyperlinks.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::common::{Error, Result};
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::{PackURI, PackageReader, PartRelationships, RelTarget};
use crate::presentation::media::{DrawingSource, LazyBlob};
use crate::presentation::rich_text::{Hyperlink, HyperlinkTarget};

const SLIDE_JUMP_ACTION: &str = "hlinksldjump";
const ACTION_PREFIX: &str = "ppaction://";

/// Everything shared by the parts of one package.
pub(crate) struct PackageScope<'r, 'd> {
    pub package: &'r mut PackageReader<'d>,
    pub archive: &'r Arc<[u8]>,
    /// Slide part name to zero-based slide index.
    pub slides: &'r BTreeMap<PackURI, usize>,
}

pub(crate) struct ReadContext<'r, 'd> {
    scope: PackageScope<'r, 'd>,
    partname: PackURI,
    rels: PartRelationships,
}

impl<'r, 'd> ReadContext<'r, 'd> {
    pub fn new(scope: PackageScope<'r, 'd>, partname: PackURI) -> Self {
        let rels = scope
            .package
            .rels_for(&partname)
            .cloned()
            .unwrap_or_else(|| PartRelationships::new(partname.base_uri()));
        Self {
            scope,
            partname,
            rels,
        }
    }

    /// Context for a part reached from this one, e.g. a chart.
    pub fn child(&mut self, partname: PackURI) -> ReadContext<'_, 'd> {
        let scope = PackageScope {
            package: &mut *self.scope.package,
            archive: self.scope.archive,
            slides: self.scope.slides,
        };
        ReadContext::new(scope, partname)
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn unresolved(&self, r_id: &str) -> Error {
        Error::UnresolvedRelationship {
            part: self.partname.to_string(),
            target: r_id.to_string(),
        }
    }

    /// Internal target of relationship `r_id`. The target has to be a part
    /// of the package; a dangling id fails the whole load.
    pub fn target(&self, r_id: &str) -> Result<&PackURI> {
        match self.rels.get(r_id).map(|rel| rel.target()) {
            Some(RelTarget::Part(partname)) if self.scope.package.part(partname).is_some() => {
                Ok(partname)
            },
            _ => Err(self.unresolved(r_id)),
        }
    }

    /// Internal target of the first relationship of `reltype`.
    pub fn target_of_type(&self, reltype: &str) -> Option<PackURI> {
        self.rels
            .with_reltype(reltype)
            .find_map(|rel| match rel.target() {
                RelTarget::Part(partname) => Some(partname.clone()),
                RelTarget::External(_) => None,
            })
    }

    pub fn blob(&mut self, partname: &PackURI) -> Result<Vec<u8>> {
        self.scope.package.blob(partname)
    }

    /// Drawing source behind relationship `r_id`. Package parts become lazy
    /// blobs over the shared archive; linked files keep their path.
    pub fn source(&self, r_id: &str) -> Result<DrawingSource> {
        let rel = self.rels.get(r_id).ok_or_else(|| self.unresolved(r_id))?;
        Ok(match rel.target() {
            RelTarget::Part(_) => DrawingSource::Archive(LazyBlob::new(
                Arc::clone(self.scope.archive),
                self.target(r_id)?.membername(),
            )),
            RelTarget::External(target) => {
                log::debug!("{} links external media {target}", self.partname);
                DrawingSource::File(PathBuf::from(target))
            },
        })
    }

    /// Hyperlink from the attributes of an `a:hlinkClick`. Actions other
    /// than slide jumps (media playback, macros) are not hyperlinks.
    pub fn hyperlink(
        &self,
        r_id: Option<&str>,
        action: Option<&str>,
        tooltip: Option<String>,
    ) -> Result<Option<Hyperlink>> {
        let rel = match r_id.filter(|id| !id.is_empty()) {
            Some(id) => Some(self.rels.get(id).ok_or_else(|| self.unresolved(id))?),
            None => None,
        };
        let target = match action {
            Some(action) if action.contains(SLIDE_JUMP_ACTION) => {
                let Some(rel) = rel.filter(|r| r.reltype() == rt::SLIDE) else {
                    return Ok(None);
                };
                let slide = match rel.target() {
                    RelTarget::Part(slide) => self.scope.slides.get(slide),
                    RelTarget::External(_) => None,
                };
                let Some(&index) = slide else {
                    return Err(self.unresolved(rel.r_id()));
                };
                HyperlinkTarget::Slide(index)
            },
            Some(action) if action.starts_with(ACTION_PREFIX) => return Ok(None),
            _ => match rel.map(|rel| rel.target()) {
                Some(RelTarget::External(url)) => HyperlinkTarget::Url(url.clone()),
                Some(RelTarget::Part(partname)) => {
                    log::debug!("ignoring internal hyperlink target {partname}");
                    return Ok(None);
                },
                None => return Ok(None),
            },
        };
        Ok(Some(Hyperlink { target, tooltip }))
    }
}
