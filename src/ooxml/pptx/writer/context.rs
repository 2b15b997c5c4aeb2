//! State threaded through one write pass.
//!
//! [`WriteState`] owns the package under construction together with the
//! counters that hand out indexed part names (`chart1.xml`, `chart2.xml`,
//! ...), the media dedupe table and the comment author list. A
//! [`PartContext`] borrows it for the duration of one part and registers
//! relationships with that part as owner.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::common::{Error, Result};
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::{Package, PackURI};
use crate::presentation::media::{DrawingSource, ImageFormat, MediaKind, media_mime_type};
use crate::presentation::rich_text::{Hyperlink, HyperlinkTarget};
use crate::presentation::shape::CommentAuthor;

pub(crate) const SLIDE_JUMP_ACTION: &str = "ppaction://hlinksldjump";

/// Part-name prefixes for the indexed parts a write pass creates.
pub(crate) mod prefix {
    pub const SLIDE: &str = "/ppt/slides/slide";
    pub const SLIDE_LAYOUT: &str = "/ppt/slideLayouts/slideLayout";
    pub const SLIDE_MASTER: &str = "/ppt/slideMasters/slideMaster";
    pub const NOTES_SLIDE: &str = "/ppt/notesSlides/notesSlide";
    pub const NOTES_MASTER: &str = "/ppt/notesMasters/notesMaster";
    pub const THEME: &str = "/ppt/theme/theme";
    pub const CHART: &str = "/ppt/charts/chart";
    pub const EMBEDDINGS_DIR: &str = "/ppt/embeddings";
    pub const COMMENT: &str = "/ppt/comments/comment";
    pub const IMAGE: &str = "/ppt/media/image";
    pub const MEDIA: &str = "/ppt/media/media";
}

type MediaKey = ([u8; 32], String);

pub(crate) struct WriteState {
    pub(crate) package: Package,
    ordinals: HashMap<&'static str, u32>,
    media: HashMap<MediaKey, PackURI>,
    authors: Vec<CommentAuthor>,
    // last comment index handed out per author
    comment_indices: Vec<u32>,
    slide_parts: Vec<PackURI>,
    notes_master: Option<PackURI>,
}

impl WriteState {
    pub(crate) fn new() -> Self {
        Self {
            package: Package::new(),
            ordinals: HashMap::new(),
            media: HashMap::new(),
            authors: Vec::new(),
            comment_indices: Vec::new(),
            slide_parts: Vec::new(),
            notes_master: None,
        }
    }

    /// Next `{prefix}{N}.{ext}`; N counts from 1 per prefix in request order.
    pub(crate) fn next_partname(&mut self, prefix: &'static str, ext: &str) -> Result<PackURI> {
        let ordinal = self.ordinals.entry(prefix).or_insert(0);
        *ordinal += 1;
        PackURI::indexed(prefix, *ordinal, ext)
    }

    /// Fix the slide part names up front so slides, layouts and masters can
    /// link to any slide regardless of write order.
    pub(crate) fn reserve_slides(&mut self, count: usize) -> Result<()> {
        let parts = (0..count)
            .map(|_| self.next_partname(prefix::SLIDE, "xml"))
            .collect::<Result<Vec<_>>>()?;
        self.slide_parts = parts;
        Ok(())
    }

    pub(crate) fn slide_part(&self, index: usize) -> Result<&PackURI> {
        self.slide_parts.get(index).ok_or_else(|| {
            Error::invalid_package(format!(
                "link to slide {index} but the presentation has {} slides",
                self.slide_parts.len()
            ))
        })
    }

    pub(crate) fn slide_parts(&self) -> &[PackURI] {
        &self.slide_parts
    }

    pub(crate) fn set_notes_master(&mut self, partname: PackURI) {
        self.notes_master = Some(partname);
    }

    pub(crate) fn notes_master(&self) -> Option<&PackURI> {
        self.notes_master.as_ref()
    }

    /// Author id, registering the author on first sight. Ids follow first
    /// appearance.
    pub(crate) fn author_id(&mut self, author: &CommentAuthor) -> usize {
        match self.authors.iter().position(|a| a == author) {
            Some(id) => id,
            None => {
                self.authors.push(author.clone());
                self.comment_indices.push(0);
                self.authors.len() - 1
            },
        }
    }

    pub(crate) fn authors(&self) -> &[CommentAuthor] {
        &self.authors
    }

    /// Next `idx` for a comment by `author_id`; counts from 1 per author.
    pub(crate) fn next_comment_index(&mut self, author_id: usize) -> u32 {
        match self.comment_indices.get_mut(author_id) {
            Some(last) => {
                *last += 1;
                *last
            },
            None => 1,
        }
    }

    /// Highest comment `idx` given to `author_id` so far.
    pub(crate) fn last_comment_index(&self, author_id: usize) -> u32 {
        self.comment_indices.get(author_id).copied().unwrap_or(0)
    }

    /// Store `bytes` as a media part, reusing the part of an earlier
    /// identical blob with the same extension.
    fn media_part(
        &mut self,
        bytes: Vec<u8>,
        prefix: &'static str,
        ext: &str,
        content_type: &str,
    ) -> Result<PackURI> {
        let digest: [u8; 32] = Sha256::digest(&bytes).into();
        let key = (digest, ext.to_string());
        if let Some(existing) = self.media.get(&key) {
            log::trace!("reusing {existing} for identical media");
            return Ok(existing.clone());
        }
        let partname = self.next_partname(prefix, ext)?;
        self.package.add_part(partname.clone(), content_type, bytes);
        self.media.insert(key, partname.clone());
        Ok(partname)
    }
}

/// Write context of a single part.
pub(crate) struct PartContext<'a> {
    state: &'a mut WriteState,
    owner: PackURI,
    next_shape_id: u32,
}

impl<'a> PartContext<'a> {
    pub(crate) fn new(state: &'a mut WriteState, owner: PackURI) -> Self {
        Self {
            state,
            owner,
            // 1 belongs to the shape tree itself
            next_shape_id: 2,
        }
    }

    #[inline]
    pub(crate) fn state(&mut self) -> &mut WriteState {
        self.state
    }

    /// Context for a part owned by this one (a chart of a slide), sharing
    /// the same write state.
    pub(crate) fn child(&mut self, owner: PackURI) -> PartContext<'_> {
        PartContext::new(self.state, owner)
    }

    pub(crate) fn shape_id(&mut self) -> u32 {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        id
    }

    pub(crate) fn relate(&mut self, reltype: &str, target: &PackURI) -> String {
        self.state.package.rels_mut().register(&self.owner, reltype, target)
    }

    pub(crate) fn relate_external(&mut self, reltype: &str, url: &str) -> String {
        self.state
            .package
            .rels_mut()
            .register_external(&self.owner, reltype, url)
    }

    /// Add a part owned by this context's part and return the relationship
    /// id pointing at it.
    pub(crate) fn add_related_part(
        &mut self,
        reltype: &str,
        partname: PackURI,
        content_type: &str,
        blob: Vec<u8>,
    ) -> String {
        self.state.package.add_part(partname.clone(), content_type, blob);
        self.relate(reltype, &partname)
    }

    /// Embed an image and relate it, returning the relationship id.
    pub(crate) fn embed_image(&mut self, source: &DrawingSource) -> Result<String> {
        let ext = source.extension()?;
        let content_type = ImageFormat::from_extension(&ext)
            .map(|f| f.mime_type().to_string())
            .map_or_else(|| source.mime_type(), Ok)?;
        let partname = self
            .state
            .media_part(source.bytes()?, prefix::IMAGE, &ext, &content_type)?;
        Ok(self.relate(rt::IMAGE, &partname))
    }

    /// Embed an audio or video blob. Returns the `r:link` id of the
    /// audio/video relationship and the `r:embed` id of the media one; both
    /// point at the same part.
    pub(crate) fn embed_media(
        &mut self,
        source: &DrawingSource,
        kind: MediaKind,
    ) -> Result<(String, String)> {
        let ext = source.extension()?;
        let content_type = media_mime_type(&ext);
        let partname = self
            .state
            .media_part(source.bytes()?, prefix::MEDIA, &ext, content_type)?;
        let link_type = match kind {
            MediaKind::Audio => rt::AUDIO,
            MediaKind::Video => rt::VIDEO,
        };
        let link = self.relate(link_type, &partname);
        let embed = self.relate(rt::MEDIA, &partname);
        Ok((link, embed))
    }

    /// Relationship id and optional action for a click hyperlink.
    pub(crate) fn hyperlink(&mut self, hyperlink: &Hyperlink) -> Result<(String, Option<&'static str>)> {
        match &hyperlink.target {
            HyperlinkTarget::Url(url) => Ok((self.relate_external(rt::HYPERLINK, url), None)),
            HyperlinkTarget::Slide(index) => {
                let target = self.state.slide_part(*index)?.clone();
                Ok((self.relate(rt::SLIDE, &target), Some(SLIDE_JUMP_ACTION)))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_indexed_partnames_count_per_prefix() {
        let mut state = WriteState::new();
        assert_eq!(
            state.next_partname(prefix::CHART, "xml").unwrap().as_str(),
            "/ppt/charts/chart1.xml"
        );
        assert_eq!(
            state.next_partname(prefix::THEME, "xml").unwrap().as_str(),
            "/ppt/theme/theme1.xml"
        );
        assert_eq!(
            state.next_partname(prefix::CHART, "xml").unwrap().as_str(),
            "/ppt/charts/chart2.xml"
        );
    }

    #[test]
    fn test_identical_images_share_one_part_and_id() {
        let mut state = WriteState::new();
        let slide = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        let mut ctx = PartContext::new(&mut state, slide.clone());
        let a = ctx.embed_image(&DrawingSource::memory(PNG.to_vec(), "image/png")).unwrap();
        let b = ctx.embed_image(&DrawingSource::memory(PNG.to_vec(), "image/png")).unwrap();
        assert_eq!(a, b);
        assert_eq!(state.package.iter_parts().count(), 1);
        assert_eq!(
            state.package.iter_parts().next().unwrap().partname().as_str(),
            "/ppt/media/image1.png"
        );
    }

    #[test]
    fn test_media_gets_link_and_embed_relationships() {
        let mut state = WriteState::new();
        let slide = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        let mut ctx = PartContext::new(&mut state, slide.clone());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, [0, 0, 0, 0x18, b'f', b't', b'y', b'p']).unwrap();
        let (link, embed) = ctx
            .embed_media(&DrawingSource::file(&path), MediaKind::Video)
            .unwrap();
        assert_ne!(link, embed);
        let rels = state.package.rels().relationships_for(&slide).unwrap();
        assert_eq!(rels.get(&link).unwrap().reltype(), rt::VIDEO);
        assert_eq!(rels.get(&embed).unwrap().reltype(), rt::MEDIA);
        assert_eq!(
            state.package.iter_parts().next().unwrap().content_type(),
            "video/mp4"
        );
    }

    #[test]
    fn test_authors_deduplicated_in_first_seen_order() {
        let mut state = WriteState::new();
        let ann = CommentAuthor::new("Ann", "A");
        let bob = CommentAuthor::new("Bob", "B");
        assert_eq!(state.author_id(&ann), 0);
        assert_eq!(state.author_id(&bob), 1);
        assert_eq!(state.author_id(&ann), 0);
        assert_eq!(state.authors().len(), 2);
        assert_eq!(state.next_comment_index(1), 1);
        assert_eq!(state.next_comment_index(1), 2);
        assert_eq!(state.last_comment_index(1), 2);
        assert_eq!(state.last_comment_index(0), 0);
    }

    #[test]
    fn test_slide_hyperlink_requires_existing_slide() {
        let mut state = WriteState::new();
        state.reserve_slides(2).unwrap();
        let owner = state.slide_part(0).unwrap().clone();
        let mut ctx = PartContext::new(&mut state, owner);
        let (_, action) = ctx.hyperlink(&Hyperlink::slide(1)).unwrap();
        assert_eq!(action, Some(SLIDE_JUMP_ACTION));
        assert!(ctx.hyperlink(&Hyperlink::slide(5)).is_err());
        let (id, action) = ctx.hyperlink(&Hyperlink::url("https://example.com")).unwrap();
        assert_eq!(action, None);
        assert!(id.starts_with("rId"));
    }
}
