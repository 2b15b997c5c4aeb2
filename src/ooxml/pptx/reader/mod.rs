//! PresentationML package reader.
//!
//! [`PowerPoint2007Reader`] opens the archive (decrypting it first when it
//! is a password protected compound file), lets the package reader walk
//! the relationship graph, and then parses parts in dependency order:
//! `presentation.xml`, masters with their themes and layouts, slides with
//! their notes and comments, and finally the presentation-level and
//! document property parts.
//!
//! Media and image parts are not copied out of the archive. The archive
//! bytes are held once in an `Arc<[u8]>` and every picture, clip and
//! background refers to its entry through a [`LazyBlob`].
//!
//! [`LazyBlob`]: crate::presentation::LazyBlob

mod chart;
mod comments;
mod context;
mod drawing;
mod events;
mod presentation;
mod shape;
mod slide;
mod text;
mod theme;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use self::context::{PackageScope, ReadContext};
use super::doc_props;
use crate::common::{Error, Result};
use crate::ooxml::opc::constants::{CFB_SIGNATURE, content_type as ct, relationship_type as rt};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use crate::ooxml::opc::{ContentTypeManifest, PackURI, PackageReader};
use crate::presentation::{LayoutRef, Presentation};

/// Reads Office Open XML `.pptx` packages.
///
/// # Example
///
/// ```rust,no_run
/// use longan::ooxml::pptx::PowerPoint2007Reader;
///
/// let pres = PowerPoint2007Reader::new().load("deck.pptx")?;
/// println!("{} slides", pres.slide_count());
/// # Ok::<(), longan::common::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PowerPoint2007Reader {
    password: Option<String>,
}

impl PowerPoint2007Reader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Some(password.into());
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Presentation> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        log::debug!("loading {} ({} bytes)", path.display(), bytes.len());
        self.load_bytes(&bytes)
    }

    pub fn load_bytes(&self, bytes: &[u8]) -> Result<Presentation> {
        let archive: Arc<[u8]> = if bytes.starts_with(&CFB_SIGNATURE) {
            let password = self.password.as_deref().ok_or(Error::PasswordRequired)?;
            Arc::from(decrypt(bytes, password)?)
        } else {
            Arc::from(bytes)
        };
        read_package(&archive)
    }

    /// Whether `path` is a presentation package, judged by the content type
    /// of its main part. Encrypted packages cannot be inspected without
    /// their password and report `false`.
    pub fn can_read<P: AsRef<Path>>(path: P) -> bool {
        let Ok(bytes) = std::fs::read(path) else {
            return false;
        };
        let Ok(mut phys) = PhysPkgReader::new(&bytes) else {
            return false;
        };
        phys.content_types_xml()
            .and_then(|xml| ContentTypeManifest::from_xml(&xml))
            .is_ok_and(|manifest| {
                manifest
                    .overrides()
                    .any(|(_, content_type)| ct::PML_MAIN_PARTS.contains(&content_type))
            })
    }
}

#[cfg(feature = "ooxml_encryption")]
fn decrypt(container: &[u8], password: &str) -> Result<Vec<u8>> {
    crate::ooxml::crypto::decrypt_package(container, password)
}

#[cfg(not(feature = "ooxml_encryption"))]
fn decrypt(_container: &[u8], _password: &str) -> Result<Vec<u8>> {
    Err(Error::UnsupportedFormat(
        "encrypted packages require the ooxml_encryption feature".to_string(),
    ))
}

/// Package state shared by every part parse of one load.
struct Loader<'d> {
    package: PackageReader<'d>,
    archive: &'d Arc<[u8]>,
    slides: BTreeMap<PackURI, usize>,
}

impl<'d> Loader<'d> {
    fn context(&mut self, partname: PackURI) -> ReadContext<'_, 'd> {
        let scope = PackageScope {
            package: &mut self.package,
            archive: self.archive,
            slides: &self.slides,
        };
        ReadContext::new(scope, partname)
    }

    /// Bytes of an optional part. A part that is referenced but absent
    /// from the archive makes the package invalid.
    fn optional_blob(&mut self, partname: Option<&PackURI>) -> Result<Option<Vec<u8>>> {
        match partname {
            Some(partname) if self.package.part(partname).is_some() => {
                self.package.blob(partname).map(Some)
            },
            Some(partname) => Err(Error::invalid_package(format!(
                "{partname} is referenced but missing from the archive"
            ))),
            None => Ok(None),
        }
    }
}

/// Part names behind relationship ids, in order.
fn resolve_targets(ctx: &ReadContext<'_, '_>, r_ids: &[String]) -> Result<Vec<PackURI>> {
    r_ids
        .iter()
        .map(|r_id| ctx.target(r_id).cloned())
        .collect()
}

fn read_package(archive: &Arc<[u8]>) -> Result<Presentation> {
    let package = PackageReader::new(archive)?;
    let main = package.main_document_part()?;
    if !ct::PML_MAIN_PARTS.contains(&main.content_type.as_str()) {
        return Err(Error::UnsupportedFormat(format!(
            "main part has content type {}",
            main.content_type
        )));
    }
    let pres_uri = main.partname.clone();

    let mut loader = Loader {
        package,
        archive,
        slides: BTreeMap::new(),
    };
    let mut pres = Presentation::empty();

    let pres_xml = loader.package.blob(&pres_uri)?;
    let index = presentation::read_presentation(&pres_xml)?;
    pres.set_layout(index.layout);

    let (master_parts, slide_parts, pres_props, view_props, authors_part) = {
        let ctx = loader.context(pres_uri.clone());
        (
            resolve_targets(&ctx, &index.masters)?,
            resolve_targets(&ctx, &index.slides)?,
            ctx.target_of_type(rt::PRES_PROPS),
            ctx.target_of_type(rt::VIEW_PROPS),
            ctx.target_of_type(rt::COMMENT_AUTHORS),
        )
    };
    loader.slides = slide_parts
        .iter()
        .enumerate()
        .map(|(i, uri)| (uri.clone(), i))
        .collect();

    let layouts = read_masters(&mut loader, &mut pres, &master_parts)?;
    if pres.masters().is_empty() {
        return Err(Error::invalid_package("presentation has no slide master"));
    }

    let authors = match loader.optional_blob(authors_part.as_ref())? {
        Some(xml) => comments::read_comment_authors(&xml)?,
        None => BTreeMap::new(),
    };
    for slide_uri in &slide_parts {
        let (mut slide, notes_part, comments_part) = {
            let mut ctx = loader.context(slide_uri.clone());
            let slide = slide::read_slide(&mut ctx, &layouts)?;
            (
                slide,
                ctx.target_of_type(rt::NOTES_SLIDE),
                ctx.target_of_type(rt::COMMENTS),
            )
        };
        if let Some(notes_uri) = notes_part {
            let note = slide::read_notes(&mut loader.context(notes_uri))?;
            slide.note = (!note.is_empty()).then_some(note);
        }
        if let Some(xml) = loader.optional_blob(comments_part.as_ref())? {
            slide.shapes.extend(comments::read_comments(&xml, &authors)?);
        }
        log::debug!("read {slide_uri} ({} shapes)", slide.shapes.len());
        pres.add_slide(slide);
    }
    if pres.slide_count() > 0 {
        pres.set_active_slide_index(0)?;
    }

    let props = pres.presentation_properties_mut();
    if let Some(xml) = loader.optional_blob(pres_props.as_ref())? {
        presentation::read_pres_props(&xml, props)?;
    }
    if let Some(xml) = loader.optional_blob(view_props.as_ref())? {
        presentation::read_view_props(&xml, props)?;
    }
    read_doc_props(&mut loader, &mut pres)?;
    inherit_placeholder_geometry(&mut pres);
    Ok(pres)
}

/// Masters in `p:sldMasterIdLst` order, each with its theme and layouts.
/// Returns where every layout part landed.
fn read_masters(
    loader: &mut Loader<'_>,
    pres: &mut Presentation,
    master_parts: &[PackURI],
) -> Result<BTreeMap<PackURI, LayoutRef>> {
    let mut layouts = BTreeMap::new();
    for master_uri in master_parts {
        let (mut master, layout_parts, theme_part) = {
            let mut ctx = loader.context(master_uri.clone());
            let (master, layout_ids) = slide::read_master(&mut ctx)?;
            let layout_parts = resolve_targets(&ctx, &layout_ids)?;
            (master, layout_parts, ctx.target_of_type(rt::THEME))
        };
        if let Some(xml) = loader.optional_blob(theme_part.as_ref())? {
            master.theme = theme::read_theme(&xml)?;
        }
        let master_index = pres.masters().len();
        for layout_uri in layout_parts {
            let layout = slide::read_layout(&mut loader.context(layout_uri.clone()))?;
            layouts.insert(layout_uri, LayoutRef::new(master_index, master.layouts.len()));
            master.layouts.push(layout);
        }
        log::debug!("read {master_uri} with {} layouts", master.layouts.len());
        pres.masters_mut().push(master);
    }
    Ok(layouts)
}

fn read_doc_props(loader: &mut Loader<'_>, pres: &mut Presentation) -> Result<()> {
    let (core, app, custom, thumbnail) = {
        let ctx = loader.context(PackURI::package());
        (
            ctx.target_of_type(rt::CORE_PROPERTIES),
            ctx.target_of_type(rt::EXTENDED_PROPERTIES),
            ctx.target_of_type(rt::CUSTOM_PROPERTIES),
            ctx.target_of_type(rt::THUMBNAIL),
        )
    };
    if let Some(xml) = loader.optional_blob(core.as_ref())? {
        doc_props::read_core(std::str::from_utf8(&xml)?, pres.properties_mut())?;
    }
    if let Some(xml) = loader.optional_blob(app.as_ref())? {
        doc_props::read_app(std::str::from_utf8(&xml)?, pres.properties_mut())?;
    }
    if let Some(xml) = loader.optional_blob(custom.as_ref())? {
        let (custom, mark_as_final) = doc_props::read_custom(std::str::from_utf8(&xml)?)?;
        pres.properties_mut().custom = custom;
        pres.presentation_properties_mut().mark_as_final = mark_as_final;
    }
    pres.presentation_properties_mut().thumbnail = loader.optional_blob(thumbnail.as_ref())?;
    Ok(())
}

/// Give placeholders that were read without a transform the frame of the
/// shape they inherit from: layouts from their master, slides from their
/// layout or master.
fn inherit_placeholder_geometry(pres: &mut Presentation) {
    type Frame = (i64, i64, i64, i64);
    fn frame(shape: &crate::presentation::Shape) -> Option<Frame> {
        (!shape.inherits_geometry())
            .then_some((shape.offset_x, shape.offset_y, shape.width, shape.height))
    }
    fn apply(shape: &mut crate::presentation::Shape, (x, y, w, h): Frame) {
        shape.offset_x = x;
        shape.offset_y = y;
        shape.width = w;
        shape.height = h;
    }

    for master in pres.masters_mut() {
        let mut inherited = Vec::new();
        for (l, layout) in master.layouts.iter().enumerate() {
            for (s, shape) in layout.shapes.iter().enumerate() {
                if let Some(ph) = shape.placeholder.filter(|_| shape.inherits_geometry())
                    && let Some(frame) = master.find_placeholder(&ph).and_then(frame)
                {
                    inherited.push((l, s, frame));
                }
            }
        }
        for (l, s, frame) in inherited {
            apply(&mut master.layouts[l].shapes[s], frame);
        }
    }

    let mut inherited = Vec::new();
    for (i, slide) in pres.slides().iter().enumerate() {
        for (s, shape) in slide.shapes.iter().enumerate() {
            if let Some(ph) = shape.placeholder.filter(|_| shape.inherits_geometry())
                && let Some(frame) = pres.resolve_placeholder(slide, &ph).and_then(frame)
            {
                inherited.push((i, s, frame));
            }
        }
    }
    for (i, s, frame) in inherited {
        apply(&mut pres.slides_mut()[i].shapes[s], frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::writer::{PowerPoint2007Writer, write_package};
    use crate::presentation::chart::{Chart, ChartType, Series};
    use crate::presentation::properties::{LayoutPreset, PropertyValue};
    use crate::presentation::style::{Color, Fill, FillType, Font};
    use crate::presentation::transition::{Transition, TransitionType};
    use crate::presentation::{
        Animation, Background, CommentAuthor, DocumentLayout, Note, Placeholder, PlaceholderType,
        Shape, ShapeKind,
    };
    use chrono::{TimeZone, Utc};

    fn round_trip(pres: &Presentation) -> Presentation {
        let bytes = write_package(pres).unwrap();
        PowerPoint2007Reader::new().load_bytes(&bytes).unwrap()
    }

    #[test]
    fn test_styled_run_round_trip() {
        let mut pres = Presentation::new();
        let shape = pres.create_slide().add_shape(
            Shape::rich_text()
                .with_offset(170 * 9525, 180 * 9525)
                .with_size(600 * 9525, 300 * 9525),
        );
        let run = shape.text_mut().unwrap().create_text_run("Thank you");
        run.font = Font::new()
            .with_bold(true)
            .with_size(60.0)
            .with_color(Color::from_argb(0xFFE0_6B20));

        let read = round_trip(&pres);
        assert_eq!(read.slide_count(), 1);
        let shape = &read.slides()[0].shapes[0];
        assert_eq!((shape.offset_x, shape.offset_y), (170 * 9525, 180 * 9525));
        let text = shape.text().unwrap();
        assert_eq!(text.text(), "Thank you");
        let font = &text.paragraphs[0].runs().next().unwrap().font;
        assert!(font.bold);
        assert_eq!(font.size, 60.0);
        assert_eq!(font.color, Color::from_argb(0xFFE0_6B20));
    }

    #[test]
    fn test_masters_layouts_and_theme_round_trip() {
        let mut pres = Presentation::new();
        pres.masters_mut()[0].theme.major_font = "Georgia".to_string();
        pres.masters_mut()[0].transition = Some(Transition::new(TransitionType::Fade));
        pres.create_slide();
        let read = round_trip(&pres);
        let master = &read.masters()[0];
        let original = &pres.masters()[0];
        assert_eq!(master.layouts.len(), original.layouts.len());
        for (read, written) in master.layouts.iter().zip(&original.layouts) {
            assert_eq!(read.name, written.name);
            assert_eq!(read.layout_type, written.layout_type);
            assert_eq!(read.shapes.len(), written.shapes.len());
        }
        assert_eq!(master.theme, original.theme);
        assert_eq!(master.color_map, original.color_map);
        assert_eq!(master.text_styles, original.text_styles);
        assert_eq!(master.transition, original.transition);
        assert_eq!(read.slides()[0].layout, pres.slides()[0].layout);
    }

    #[test]
    fn test_slide_features_round_trip() {
        let mut pres = Presentation::new();
        pres.set_layout(DocumentLayout::from_preset(LayoutPreset::Screen16x9));
        let ann = CommentAuthor::new("Ann Lee", "AL");
        let date = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        {
            let slide = pres.create_slide();
            slide.name = Some("Intro".to_string());
            slide.hidden = true;
            slide.background = Some(Background::Color(Color::from_argb(0xFF12_3456)));
            slide.transition = Some(Transition::new(TransitionType::Dissolve));
            slide.add_shape(
                Shape::auto_shape(crate::presentation::AutoShapeType::Ellipse)
                    .with_offset(914_400, 914_400)
                    .with_size(914_400, 457_200)
                    .with_fill(Fill::solid(Color::from_argb(0xFF00_FF00))),
            );
            slide.add_shape(Shape::rich_text().with_size(100, 100));
            slide.add_animation(Animation::new([1, 0]));
            slide.add_shape(Shape::comment(Some(ann.clone()), "why?", date).with_offset(914_400, 0));
            slide.note = Some(Note::from_text("remember"));
        }
        pres.create_slide()
            .add_shape(Shape::comment(Some(ann.clone()), "ok", date));

        let read = round_trip(&pres);
        assert_eq!(*read.layout(), DocumentLayout::from_preset(LayoutPreset::Screen16x9));
        let slide = &read.slides()[0];
        assert_eq!(slide.name.as_deref(), Some("Intro"));
        assert!(slide.hidden);
        assert_eq!(
            slide.background,
            Some(Background::Color(Color::from_argb(0xFF12_3456)))
        );
        assert_eq!(
            slide.transition.as_ref().and_then(|t| t.transition_type),
            Some(TransitionType::Dissolve)
        );
        assert_eq!(slide.shapes.len(), 3);
        assert_eq!(slide.shapes[0].fill.fill_type, FillType::Solid);
        assert_eq!(slide.shapes[0].fill.start_color, Color::from_argb(0xFF00_FF00));
        assert_eq!(slide.animations, vec![Animation::new([1, 0])]);
        let ShapeKind::Comment(comment) = &slide.shapes[2].kind else {
            panic!("expected a comment shape");
        };
        assert_eq!(comment.author.as_ref(), Some(&ann));
        assert_eq!(comment.date, date);
        assert_eq!(slide.shapes[2].offset_x, 914_400);
        assert_eq!(slide.note.as_ref().map(Note::text).as_deref(), Some("remember"));
        assert_eq!(read.slides()[1].comments().len(), 1);
        assert!(read.slides()[1].note.is_none());
    }

    #[test]
    fn test_chart_round_trip() {
        let mut pres = Presentation::new();
        let chart = Chart::with_type(
            ChartType::bar().with_series(Series::new("Sales", [("Q1", 1.5), ("Q2", 2.0)])),
        );
        pres.create_slide().add_shape(Shape::chart(chart).with_size(3_000_000, 2_000_000));
        let read = round_trip(&pres);
        let ShapeKind::Chart(chart) = &read.slides()[0].shapes[0].kind else {
            panic!("expected a chart");
        };
        let series = &chart.plot_area.chart_type.as_ref().unwrap().series()[0];
        assert_eq!(series.title, "Sales");
        assert_eq!(series.values.len(), 2);
        assert_eq!(series.values[1], ("Q2".to_string(), 2.0));
    }

    #[test]
    fn test_scatter_text_x_values_round_trip() {
        let mut pres = Presentation::new();
        let chart = Chart::with_type(
            ChartType::scatter().with_series(Series::new("S", [("Jan", 1.0), ("Feb", 2.0)])),
        );
        pres.create_slide().add_shape(Shape::chart(chart));
        let read = round_trip(&pres);
        let ShapeKind::Chart(chart) = &read.slides()[0].shapes[0].kind else {
            panic!("expected a chart");
        };
        let series = &chart.plot_area.chart_type.as_ref().unwrap().series()[0];
        assert_eq!(
            series.values,
            vec![("Jan".to_string(), 1.0), ("Feb".to_string(), 2.0)]
        );
    }

    #[test]
    fn test_properties_round_trip() {
        let mut pres = Presentation::new();
        pres.create_slide();
        pres.properties_mut().title = "Quarterly".to_string();
        pres.properties_mut().keywords = "sales, q3".to_string();
        pres.properties_mut()
            .set_custom("Reviewed", PropertyValue::Boolean(true));
        pres.presentation_properties_mut().mark_as_final = true;
        pres.presentation_properties_mut().zoom = 1.5;
        let read = round_trip(&pres);
        assert_eq!(read.properties().title, "Quarterly");
        assert_eq!(read.properties().keywords, "sales, q3");
        assert_eq!(
            read.properties().custom("Reviewed"),
            Some(&PropertyValue::Boolean(true))
        );
        assert!(read.presentation_properties().mark_as_final);
        assert_eq!(read.presentation_properties().zoom, 1.5);
    }

    #[test]
    fn test_placeholder_inherits_layout_geometry() {
        let mut pres = Presentation::new();
        let title_layout = pres.masters()[0].layout_index("Title and Content").unwrap();
        let slide = pres.add_slide(crate::presentation::Slide::new(LayoutRef::new(0, title_layout)));
        slide.add_shape(Shape::rich_text().with_placeholder(Placeholder::new(PlaceholderType::Title)));
        let read = round_trip(&pres);
        let shape = &read.slides()[0].shapes[0];
        let expected = pres
            .resolve_placeholder(&pres.slides()[0], &Placeholder::new(PlaceholderType::Title))
            .unwrap();
        assert_eq!(shape.placeholder, Some(Placeholder::new(PlaceholderType::Title)));
        assert_eq!((shape.offset_x, shape.width), (expected.offset_x, expected.width));
    }

    /// Copy a package member by member, letting `edit` drop or change one.
    fn rewrite(bytes: &[u8], edit: impl Fn(&str, Vec<u8>) -> Option<Vec<u8>>) -> Vec<u8> {
        use crate::ooxml::opc::phys_pkg::PhysPkgWriter;
        let mut source = PhysPkgReader::new(bytes).unwrap();
        let mut out = PhysPkgWriter::new();
        for name in source.member_names() {
            let blob = source.member(&name).unwrap();
            if let Some(blob) = edit(&name, blob) {
                out.write(&PackURI::new(format!("/{name}")).unwrap(), &blob).unwrap();
            }
        }
        out.finish().unwrap()
    }

    fn picture_deck() -> Vec<u8> {
        const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let mut pres = Presentation::new();
        let slide = pres.create_slide();
        slide.add_shape(
            Shape::drawing(crate::presentation::DrawingSource::memory(PNG.to_vec(), "image/png"))
                .with_size(914_400, 914_400),
        );
        slide.add_shape(
            Shape::chart(Chart::with_type(
                ChartType::bar().with_series(Series::new("S", [("A", 1.0)])),
            ))
            .with_size(914_400, 914_400),
        );
        write_package(&pres).unwrap()
    }

    #[test]
    fn test_intact_picture_deck_loads() {
        let read = PowerPoint2007Reader::new().load_bytes(&picture_deck()).unwrap();
        assert_eq!(read.slides()[0].shapes.len(), 2);
    }

    #[test]
    fn test_missing_slide_rels_fails_the_load() {
        let bytes = rewrite(&picture_deck(), |name, blob| {
            (name != "ppt/slides/_rels/slide1.xml.rels").then_some(blob)
        });
        let err = PowerPoint2007Reader::new().load_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::UnresolvedRelationship { ref part, .. } if part == "/ppt/slides/slide1.xml"
        ));
    }

    #[test]
    fn test_dangling_picture_rid_fails_the_load() {
        let bytes = rewrite(&picture_deck(), |name, blob| {
            if name != "ppt/slides/slide1.xml" {
                return Some(blob);
            }
            let xml = String::from_utf8(blob).unwrap();
            Some(xml.replace(r#"r:embed=""#, r#"r:embed="rId404"#).into_bytes())
        });
        let err = PowerPoint2007Reader::new().load_bytes(&bytes).unwrap_err();
        let Error::UnresolvedRelationship { part, target } = err else {
            panic!("expected an unresolved relationship, got {err:?}");
        };
        assert_eq!(part, "/ppt/slides/slide1.xml");
        assert!(target.starts_with("rId404"));
    }

    #[test]
    fn test_slide_without_layout_fails_the_load() {
        let mut pres = Presentation::new();
        pres.create_slide();
        let bytes = rewrite(&write_package(&pres).unwrap(), |name, blob| {
            (name != "ppt/slides/_rels/slide1.xml.rels").then_some(blob)
        });
        assert!(matches!(
            PowerPoint2007Reader::new().load_bytes(&bytes),
            Err(Error::InvalidPackage(_))
        ));
    }

    #[test]
    fn test_missing_slide_part_fails_the_load() {
        let mut pres = Presentation::new();
        pres.create_slide();
        pres.create_slide();
        let bytes = rewrite(&write_package(&pres).unwrap(), |name, blob| {
            (name != "ppt/slides/slide2.xml").then_some(blob)
        });
        assert!(matches!(
            PowerPoint2007Reader::new().load_bytes(&bytes),
            Err(Error::UnresolvedRelationship { .. })
        ));
    }

    #[test]
    fn test_unknown_main_part_is_unsupported() {
        use crate::ooxml::opc::{Package, PackageWriter};
        let mut package = Package::new();
        let doc = PackURI::new("/word/document.xml").unwrap();
        package.add_part(
            doc.clone(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
            b"<w:document xmlns:w=\"urn:w\"/>".to_vec(),
        );
        package
            .rels_mut()
            .register(&PackURI::package(), rt::OFFICE_DOCUMENT, &doc);
        let bytes = PackageWriter::to_bytes(&package).unwrap();
        assert!(matches!(
            PowerPoint2007Reader::new().load_bytes(&bytes),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file_and_garbage() {
        let reader = PowerPoint2007Reader::new();
        assert!(matches!(
            reader.load("/nonexistent/deck.pptx"),
            Err(Error::FileNotFound(_))
        ));
        assert!(reader.load_bytes(b"not a zip").is_err());
    }

    #[test]
    fn test_can_read_sniffs_content_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let mut pres = Presentation::new();
        pres.create_slide();
        PowerPoint2007Writer::new(&pres).save(&path).unwrap();
        assert!(PowerPoint2007Reader::can_read(&path));
        let other = dir.path().join("notes.txt");
        std::fs::write(&other, b"hello").unwrap();
        assert!(!PowerPoint2007Reader::can_read(&other));
    }

    #[cfg(feature = "ooxml_encryption")]
    #[test]
    fn test_encrypted_package_needs_the_password() {
        use crate::ooxml::pptx::writer::WriterOptions;
        let mut pres = Presentation::new();
        pres.create_slide();
        pres.properties_mut().title = "Secret".to_string();
        let bytes = PowerPoint2007Writer::new(&pres)
            .with_options(WriterOptions::default().with_password("s3cret"))
            .to_bytes()
            .unwrap();

        assert!(matches!(
            PowerPoint2007Reader::new().load_bytes(&bytes),
            Err(Error::PasswordRequired)
        ));
        assert!(matches!(
            PowerPoint2007Reader::new().with_password("nope").load_bytes(&bytes),
            Err(Error::WrongPassword)
        ));
        let read = PowerPoint2007Reader::new()
            .with_password("s3cret")
            .load_bytes(&bytes)
            .unwrap();
        assert_eq!(read.properties().title, "Secret");
        assert_eq!(read.slide_count(), 1);
    }
}
