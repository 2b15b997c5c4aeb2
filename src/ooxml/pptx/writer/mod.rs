//! PresentationML package writer.
//!
//! [`PowerPoint2007Writer`] walks a [`Presentation`] once, producing every
//! part into an in-memory [`Package`](crate::ooxml::opc::Package) with its
//! relationships, then hands the package to the assembler. Parts are written
//! masters first (with their layouts and themes), then slides with their
//! notes and comments, then the presentation-level parts and finally
//! `presentation.xml` itself.

mod chart;
mod comments;
mod context;
mod drawing;
pub mod excel_embed;
pub(super) mod presentation;
mod shape;
mod slide;
mod text;
pub(super) mod theme;

use std::path::Path;

use self::context::{PartContext, WriteState, prefix};
use self::presentation::{NOTES_SIZE, PresentationRefs};
use self::slide::FIRST_MASTER_ID;
use super::doc_props;
use crate::common::{Error, Result};
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::{PackURI, PackageWriter};
use crate::presentation::media::ImageFormat;
use crate::presentation::{Presentation, Slide, Theme};

const PRESENTATION_PART: &str = "/ppt/presentation.xml";
const PRES_PROPS_PART: &str = "/ppt/presProps.xml";
const VIEW_PROPS_PART: &str = "/ppt/viewProps.xml";
const TABLE_STYLES_PART: &str = "/ppt/tableStyles.xml";
const COMMENT_AUTHORS_PART: &str = "/ppt/commentAuthors.xml";
const CORE_PART: &str = "/docProps/core.xml";
const APP_PART: &str = "/docProps/app.xml";
const CUSTOM_PART: &str = "/docProps/custom.xml";

/// Options of one save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterOptions {
    /// Encrypt the package with this password.
    pub password: Option<String>,
}

impl WriterOptions {
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// Writes a presentation as an Office Open XML `.pptx` package.
///
/// # Example
///
/// ```rust,no_run
/// use longan::ooxml::pptx::PowerPoint2007Writer;
/// use longan::presentation::Presentation;
///
/// let mut pres = Presentation::new();
/// pres.create_slide().create_rich_text_shape();
/// PowerPoint2007Writer::new(&pres).save("deck.pptx")?;
/// # Ok::<(), longan::common::Error>(())
/// ```
pub struct PowerPoint2007Writer<'a> {
    presentation: &'a Presentation,
    options: WriterOptions,
}

impl<'a> PowerPoint2007Writer<'a> {
    pub fn new(presentation: &'a Presentation) -> Self {
        Self {
            presentation,
            options: WriterOptions::default(),
        }
    }

    pub fn with_options(mut self, options: WriterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.options.password = Some(password.into());
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Serialize to package bytes, encrypted when a password is set.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let package = write_package(self.presentation)?;
        match self.options.password.as_deref() {
            Some(password) => encrypt(&package, password),
            None => Ok(package),
        }
    }

    /// Serialize and atomically replace `path`. Nothing is written when any
    /// part fails to serialize.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        crate::io::write_atomically(path.as_ref(), &bytes)
    }
}

#[cfg(feature = "ooxml_encryption")]
fn encrypt(package: &[u8], password: &str) -> Result<Vec<u8>> {
    crate::ooxml::crypto::encrypt_package(package, password)
}

#[cfg(not(feature = "ooxml_encryption"))]
fn encrypt(_package: &[u8], _password: &str) -> Result<Vec<u8>> {
    Err(Error::UnsupportedFormat(
        "password protection requires the ooxml_encryption feature".to_string(),
    ))
}

/// Build the whole package for `pres` and assemble it into ZIP bytes.
pub(crate) fn write_package(pres: &Presentation) -> Result<Vec<u8>> {
    pres.validate()?;
    if pres.masters().is_empty() {
        return Err(Error::invalid_package("a presentation needs at least one slide master"));
    }

    let mut state = WriteState::new();
    let pres_uri = PackURI::new(PRESENTATION_PART)?;
    state
        .package
        .rels_mut()
        .register(&PackURI::package(), rt::OFFICE_DOCUMENT, &pres_uri);
    state.reserve_slides(pres.slide_count())?;

    let (master_refs, layout_parts) = write_masters(pres, &mut state, &pres_uri)?;

    let slide_parts = state.slide_parts().to_vec();
    let slide_refs = slide_parts
        .iter()
        .map(|uri| state.package.rels_mut().register(&pres_uri, rt::SLIDE, uri))
        .collect::<Vec<_>>();
    for (index, slide) in pres.slides().iter().enumerate() {
        write_slide(index, slide, &layout_parts, &mut state)?;
    }

    if !state.authors().is_empty() {
        let xml = comments::comment_authors_xml(&state)?;
        let uri = PackURI::new(COMMENT_AUTHORS_PART)?;
        state.package.add_part(uri.clone(), ct::PML_COMMENT_AUTHORS, xml.into_bytes());
        state.package.rels_mut().register(&pres_uri, rt::COMMENT_AUTHORS, &uri);
    }

    let pres_props = pres.presentation_properties();
    for (partname, content_type, reltype, xml) in [
        (PRES_PROPS_PART, ct::PML_PRES_PROPS, rt::PRES_PROPS, presentation::pres_props_xml(pres_props)?),
        (VIEW_PROPS_PART, ct::PML_VIEW_PROPS, rt::VIEW_PROPS, presentation::view_props_xml(pres_props)?),
        (TABLE_STYLES_PART, ct::PML_TABLE_STYLES, rt::TABLE_STYLES, presentation::table_styles_xml()?),
    ] {
        let uri = PackURI::new(partname)?;
        state.package.add_part(uri.clone(), content_type, xml.into_bytes());
        state.package.rels_mut().register(&pres_uri, reltype, &uri);
    }

    write_doc_props(pres, &mut state)?;

    let refs = PresentationRefs {
        masters: master_refs,
        notes_master: state
            .notes_master()
            .cloned()
            .map(|nm| state.package.rels_mut().register(&pres_uri, rt::NOTES_MASTER, &nm)),
        slides: slide_refs,
    };
    let xml = presentation::presentation_xml(pres.layout(), &refs)?;
    state
        .package
        .add_part(pres_uri, ct::PML_PRESENTATION_MAIN, xml.into_bytes());

    log::debug!(
        "assembling package: {} slides, {} masters, {} parts",
        pres.slide_count(),
        pres.masters().len(),
        state.package.iter_parts().count()
    );
    PackageWriter::to_bytes(&state.package)
}

/// Masters, their layouts and themes. Returns the `p:sldMasterId` entries
/// and the layout part names per master.
fn write_masters(
    pres: &Presentation,
    state: &mut WriteState,
    pres_uri: &PackURI,
) -> Result<(Vec<(u32, String)>, Vec<Vec<PackURI>>)> {
    let mut next_id = FIRST_MASTER_ID;
    let mut master_refs = Vec::with_capacity(pres.masters().len());
    let mut layout_parts = Vec::with_capacity(pres.masters().len());

    for master in pres.masters() {
        let master_uri = state.next_partname(prefix::SLIDE_MASTER, "xml")?;
        let r_id = state.package.rels_mut().register(pres_uri, rt::SLIDE_MASTER, &master_uri);
        master_refs.push((next_id, r_id));
        next_id += 1;

        let mut layout_uris = Vec::with_capacity(master.layouts.len());
        let mut layout_ids = Vec::with_capacity(master.layouts.len());
        for _ in &master.layouts {
            let uri = state.next_partname(prefix::SLIDE_LAYOUT, "xml")?;
            let r_id = state.package.rels_mut().register(&master_uri, rt::SLIDE_LAYOUT, &uri);
            layout_ids.push((next_id, r_id));
            next_id += 1;
            layout_uris.push(uri);
        }

        let theme_uri = state.next_partname(prefix::THEME, "xml")?;
        state.package.rels_mut().register(&master_uri, rt::THEME, &theme_uri);
        state
            .package
            .add_part(theme_uri, ct::OFC_THEME, theme::theme_xml(&master.theme)?.into_bytes());

        let xml = {
            let mut ctx = PartContext::new(state, master_uri.clone());
            slide::master_xml(master, &layout_ids, &mut ctx)?
        };
        log::debug!("writing {master_uri} with {} layouts", master.layouts.len());
        state
            .package
            .add_part(master_uri.clone(), ct::PML_SLIDE_MASTER, xml.into_bytes());

        for (layout, uri) in master.layouts.iter().zip(&layout_uris) {
            let mut ctx = PartContext::new(state, uri.clone());
            ctx.relate(rt::SLIDE_MASTER, &master_uri);
            let xml = slide::layout_xml(layout, &mut ctx)?;
            state
                .package
                .add_part(uri.clone(), ct::PML_SLIDE_LAYOUT, xml.into_bytes());
        }
        layout_parts.push(layout_uris);
    }
    Ok((master_refs, layout_parts))
}

fn write_slide(
    index: usize,
    slide: &Slide,
    layout_parts: &[Vec<PackURI>],
    state: &mut WriteState,
) -> Result<()> {
    let slide_uri = state.slide_part(index)?.clone();
    let layout_uri = layout_parts
        .get(slide.layout.master)
        .and_then(|layouts| layouts.get(slide.layout.layout))
        .ok_or_else(|| Error::invalid_package(format!("slide {} has no layout", index + 1)))?
        .clone();

    let xml = {
        let mut ctx = PartContext::new(state, slide_uri.clone());
        ctx.relate(rt::SLIDE_LAYOUT, &layout_uri);
        slide::slide_xml(slide, &mut ctx)?
    };
    log::debug!("writing {slide_uri} ({} shapes)", slide.shapes.len());
    state.package.add_part(slide_uri.clone(), ct::PML_SLIDE, xml.into_bytes());

    if let Some(note) = slide.note.as_ref().filter(|n| !n.is_empty()) {
        let notes_master = ensure_notes_master(state)?;
        let notes_uri = state.next_partname(prefix::NOTES_SLIDE, "xml")?;
        let xml = {
            let mut ctx = PartContext::new(state, notes_uri.clone());
            ctx.relate(rt::NOTES_MASTER, &notes_master);
            ctx.relate(rt::SLIDE, &slide_uri);
            slide::notes_slide_xml(note, &mut ctx)?
        };
        state
            .package
            .add_part(notes_uri.clone(), ct::PML_NOTES_SLIDE, xml.into_bytes());
        state.package.rels_mut().register(&slide_uri, rt::NOTES_SLIDE, &notes_uri);
    }

    let comments = slide.comments();
    if !comments.is_empty() {
        let comments_uri = state.next_partname(prefix::COMMENT, "xml")?;
        let xml = comments::comments_xml(&comments, state)?;
        state
            .package
            .add_part(comments_uri.clone(), ct::PML_COMMENTS, xml.into_bytes());
        state.package.rels_mut().register(&slide_uri, rt::COMMENTS, &comments_uri);
    }
    Ok(())
}

/// The notes master, written on first use together with its theme.
fn ensure_notes_master(state: &mut WriteState) -> Result<PackURI> {
    if let Some(existing) = state.notes_master() {
        return Ok(existing.clone());
    }
    let uri = state.next_partname(prefix::NOTES_MASTER, "xml")?;
    let theme_uri = state.next_partname(prefix::THEME, "xml")?;
    state.package.rels_mut().register(&uri, rt::THEME, &theme_uri);
    state
        .package
        .add_part(theme_uri, ct::OFC_THEME, theme::theme_xml(&Theme::default())?.into_bytes());
    let xml = slide::notes_master_xml(NOTES_SIZE.0, NOTES_SIZE.1)?;
    state
        .package
        .add_part(uri.clone(), ct::PML_NOTES_MASTER, xml.into_bytes());
    state.set_notes_master(uri.clone());
    Ok(uri)
}

fn write_doc_props(pres: &Presentation, state: &mut WriteState) -> Result<()> {
    let root = PackURI::package();
    let props = pres.properties();

    let core = PackURI::new(CORE_PART)?;
    state.package.add_part(
        core.clone(),
        ct::OPC_CORE_PROPERTIES,
        doc_props::core_xml(props)?.into_bytes(),
    );
    state.package.rels_mut().register(&root, rt::CORE_PROPERTIES, &core);

    let app = PackURI::new(APP_PART)?;
    state.package.add_part(
        app.clone(),
        ct::OFC_EXTENDED_PROPERTIES,
        doc_props::app_xml(props, pres.slide_count())?.into_bytes(),
    );
    state.package.rels_mut().register(&root, rt::EXTENDED_PROPERTIES, &app);

    let mark_as_final = pres.presentation_properties().mark_as_final;
    if let Some(xml) = doc_props::custom_xml(&props.custom, mark_as_final)? {
        let custom = PackURI::new(CUSTOM_PART)?;
        state
            .package
            .add_part(custom.clone(), ct::OFC_CUSTOM_PROPERTIES, xml.into_bytes());
        state.package.rels_mut().register(&root, rt::CUSTOM_PROPERTIES, &custom);
    }

    if let Some(thumbnail) = &pres.presentation_properties().thumbnail {
        let format = ImageFormat::detect_from_bytes(thumbnail).unwrap_or(ImageFormat::Jpeg);
        let uri = PackURI::new(format!("/docProps/thumbnail.{}", format.extension()))?;
        state
            .package
            .add_part(uri.clone(), format.mime_type(), thumbnail.clone());
        state.package.rels_mut().register(&root, rt::THUMBNAIL, &uri);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::PackageReader;
    use crate::ooxml::opc::phys_pkg::PhysPkgReader;
    use crate::presentation::chart::{Chart, ChartType, Series};
    use crate::presentation::style::{Color, Font};
    use crate::ooxml::opc::ContentTypeManifest;
    use crate::presentation::media::{DrawingSource, MediaKind};
    use crate::presentation::rich_text::Hyperlink;
    use crate::presentation::{CommentAuthor, Note, Shape};
    use chrono::Utc;

    const PNG: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

    fn names(bytes: &[u8]) -> Vec<String> {
        PhysPkgReader::new(bytes).unwrap().member_names()
    }

    fn member(bytes: &[u8], name: &str) -> String {
        let mut reader = PhysPkgReader::new(bytes).unwrap();
        String::from_utf8(reader.member(name).unwrap()).unwrap()
    }

    fn bar_chart() -> Chart {
        Chart::with_type(
            ChartType::bar().with_series(Series::new("Sales", [("Q1", 1.0), ("Q2", 2.0)])),
        )
    }

    #[test]
    fn test_minimal_package_layout() {
        let mut pres = Presentation::new();
        pres.create_slide();
        let bytes = write_package(&pres).unwrap();
        let names = names(&bytes);
        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slides/slide1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/theme/theme1.xml",
            "ppt/presProps.xml",
            "ppt/viewProps.xml",
            "ppt/tableStyles.xml",
            "docProps/core.xml",
            "docProps/app.xml",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
        assert!(!names.iter().any(|n| n.contains("comment")));
        assert!(!names.iter().any(|n| n.contains("notesMaster")));

        let pres_rels = member(&bytes, "ppt/_rels/presentation.xml.rels");
        assert!(pres_rels.contains(r#"Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster""#));
        let slide_rels = member(&bytes, "ppt/slides/_rels/slide1.xml.rels");
        assert!(slide_rels.contains(r#"Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout""#));
    }

    #[test]
    fn test_bold_run_reaches_slide_xml() {
        let mut pres = Presentation::new();
        let shape = pres.create_slide().create_rich_text_shape();
        let run = shape.text_mut().unwrap().create_text_run("Thank you");
        run.font = Font::new()
            .with_bold(true)
            .with_size(60.0)
            .with_color(Color::from_argb(0xFFE0_6B20));
        let bytes = write_package(&pres).unwrap();
        let slide = member(&bytes, "ppt/slides/slide1.xml");
        assert!(slide.contains(r#"b="1""#));
        assert!(slide.contains(r#"sz="6000""#));
        assert!(slide.contains(r#"<a:srgbClr val="E06B20"/>"#));
    }

    #[test]
    fn test_charts_get_their_own_parts_and_rels() {
        let mut pres = Presentation::new();
        let slide = pres.create_slide();
        slide.add_shape(Shape::chart(bar_chart()).with_name("First"));
        slide.add_shape(Shape::chart(bar_chart()).with_name("Second"));
        let bytes = write_package(&pres).unwrap();
        let names = names(&bytes);
        assert!(names.iter().any(|n| n == "ppt/charts/chart1.xml"));
        assert!(names.iter().any(|n| n == "ppt/charts/chart2.xml"));
        assert!(names.iter().any(|n| n == "ppt/charts/_rels/chart1.xml.rels"));
        assert!(names.iter().any(|n| n == "ppt/charts/_rels/chart2.xml.rels"));
        let slide_rels = member(&bytes, "ppt/slides/_rels/slide1.xml.rels");
        assert!(slide_rels.contains("../charts/chart1.xml"));
        assert!(slide_rels.contains("../charts/chart2.xml"));
    }

    #[test]
    fn test_chart_without_type_fails_whole_save() {
        let mut pres = Presentation::new();
        pres.create_slide()
            .add_shape(Shape::chart(Chart::new()).with_name("Empty"));
        match write_package(&pres) {
            Err(Error::UndefinedChartType { chart }) => assert_eq!(chart, "Empty"),
            other => panic!("expected UndefinedChartType, got {other:?}"),
        }
    }

    #[test]
    fn test_shared_author_and_notes() {
        let mut pres = Presentation::new();
        let ann = CommentAuthor::new("Ann", "A");
        for _ in 0..2 {
            let slide = pres.create_slide();
            slide.add_shape(Shape::comment(Some(ann.clone()), "look", Utc::now()));
            slide.note = Some(Note::from_text("speaker"));
        }
        let bytes = write_package(&pres).unwrap();
        let authors = member(&bytes, "ppt/commentAuthors.xml");
        assert_eq!(authors.matches("<p:cmAuthor ").count(), 1);
        assert!(authors.contains(r#"lastIdx="2""#));
        let names = names(&bytes);
        assert_eq!(names.iter().filter(|n| n.starts_with("ppt/notesMasters/notesMaster")).count(), 1);
        assert!(names.iter().any(|n| n == "ppt/notesSlides/notesSlide2.xml"));
        assert!(names.iter().any(|n| n == "ppt/comments/comment2.xml"));
        // master theme first, notes master theme second
        assert!(names.iter().any(|n| n == "ppt/theme/theme2.xml"));
        let pres_xml = member(&bytes, "ppt/presentation.xml");
        assert!(pres_xml.contains("<p:notesMasterIdLst>"));
    }

    #[test]
    fn test_package_walk_reaches_every_part() {
        let mut pres = Presentation::new();
        pres.create_slide().note = Some(Note::from_text("n"));
        pres.presentation_properties_mut().mark_as_final = true;
        let bytes = write_package(&pres).unwrap();
        let reader = PackageReader::new(&bytes).unwrap();
        let walked = reader.iter_parts().count();
        let members = names(&bytes)
            .into_iter()
            .filter(|n| !n.ends_with(".rels") && n != "[Content_Types].xml")
            .count();
        assert_eq!(walked, members);
        assert!(member(&bytes, "docProps/custom.xml").contains("_MarkAsFinal"));
    }

    fn song(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("song.mp3");
        std::fs::write(&path, b"ID3\x03\x00").unwrap();
        path
    }

    /// Two slides using every part kind the writer produces.
    fn full_deck(media: &Path) -> Presentation {
        let mut pres = Presentation::new();
        let ann = CommentAuthor::new("Ann", "A");
        {
            let slide = pres.create_slide();
            slide.add_shape(Shape::chart(bar_chart()));
            slide.add_shape(Shape::drawing(DrawingSource::memory(PNG.to_vec(), "image/png")));
            slide.add_shape(Shape::media(MediaKind::Audio, DrawingSource::file(media)));
            slide.add_shape(Shape::rich_text().with_hyperlink(Hyperlink::slide(1)));
            let text = slide.create_rich_text_shape();
            text.text_mut()
                .unwrap()
                .create_text_run("site")
                .hyperlink = Some(Hyperlink::url("https://example.com"));
            slide.add_shape(Shape::comment(Some(ann.clone()), "check", Utc::now()));
            slide.note = Some(Note::from_text("first"));
        }
        {
            let slide = pres.create_slide();
            slide.add_shape(Shape::chart(bar_chart()));
            slide.add_shape(Shape::comment(Some(ann), "done", Utc::now()));
            slide.note = Some(Note::from_text("second"));
        }
        pres
    }

    #[test]
    fn test_every_member_has_a_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = write_package(&full_deck(&song(dir.path()))).unwrap();
        let manifest =
            ContentTypeManifest::from_xml(member(&bytes, "[Content_Types].xml").as_bytes()).unwrap();
        let names = names(&bytes);
        assert!(names.iter().any(|n| n.starts_with("ppt/media/")));
        assert!(names.iter().any(|n| n.starts_with("ppt/embeddings/")));
        for name in names.iter().filter(|n| *n != "[Content_Types].xml") {
            let partname = PackURI::new(format!("/{name}")).unwrap();
            assert!(
                manifest.content_type_for(&partname).is_some(),
                "{name} has no content type"
            );
        }
    }

    #[test]
    fn test_relationship_ids_are_unique_per_part() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = write_package(&full_deck(&song(dir.path()))).unwrap();
        let rels: Vec<String> = names(&bytes).into_iter().filter(|n| n.ends_with(".rels")).collect();
        assert!(rels.iter().any(|n| n == "ppt/slides/_rels/slide1.xml.rels"));
        for name in rels {
            let xml = member(&bytes, &name);
            let ids: Vec<&str> = xml
                .split(r#" Id=""#)
                .skip(1)
                .filter_map(|rest| rest.split('"').next())
                .collect();
            assert_eq!(ids.len(), xml.matches("<Relationship ").count(), "{name}");
            let unique: std::collections::HashSet<&str> = ids.iter().copied().collect();
            assert_eq!(unique.len(), ids.len(), "duplicate relationship id in {name}");
        }
        let slide_rels = member(&bytes, "ppt/slides/_rels/slide1.xml.rels");
        assert!(slide_rels.contains(r#"Target="https://example.com" TargetMode="External""#));
        assert!(slide_rels.contains(r#"Target="slide2.xml""#));
    }

    #[test]
    fn test_same_graph_writes_the_same_package() {
        let dir = tempfile::tempdir().unwrap();
        let pres = full_deck(&song(dir.path()));
        let first = write_package(&pres).unwrap();
        let second = write_package(&pres).unwrap();
        let members = names(&first);
        assert_eq!(members, names(&second));
        // core properties carry the save time
        for name in members.iter().filter(|n| *n != "docProps/core.xml") {
            let mut a = PhysPkgReader::new(&first).unwrap();
            let mut b = PhysPkgReader::new(&second).unwrap();
            assert_eq!(a.member(name).unwrap(), b.member(name).unwrap(), "{name} differs");
        }
    }

    #[test]
    fn test_invalid_graph_is_rejected_before_writing() {
        let mut pres = Presentation::new();
        pres.add_slide(Slide::new(crate::presentation::LayoutRef::new(0, 99)));
        assert!(matches!(write_package(&pres), Err(Error::InvalidPackage(_))));
    }

    #[cfg(feature = "ooxml_encryption")]
    #[test]
    fn test_password_produces_compound_file() {
        let mut pres = Presentation::new();
        pres.create_slide();
        let writer = PowerPoint2007Writer::new(&pres)
            .with_options(WriterOptions::default().with_password("pw"));
        let bytes = writer.to_bytes().unwrap();
        assert!(bytes.starts_with(&crate::ooxml::crypto::CFB_SIGNATURE));
    }
}
