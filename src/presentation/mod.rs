//! In-memory presentation document graph.
//!
//! A [`Presentation`] owns everything: slides, masters (which own their
//! layouts), document properties and presentation properties. Nothing in
//! the graph knows about packages; the writers in [`crate::ooxml`] and
//! [`crate::serialized`] walk it and the readers build it.
//!
//! # Example
//!
//! ```rust
//! use longan::presentation::{Presentation, Shape};
//! use longan::presentation::style::{Color, Font};
//!
//! let mut pres = Presentation::new();
//! let slide = pres.create_slide();
//! let shape = slide.add_shape(
//!     Shape::rich_text()
//!         .with_offset(170 * 9525, 180 * 9525)
//!         .with_size(600 * 9525, 300 * 9525),
//! );
//! let run = shape.text_mut().unwrap().create_text_run("Thank you");
//! run.font = Font::new().with_bold(true).with_size(60.0).with_color(Color::from_argb(0xFFE06B20));
//! assert_eq!(pres.slide_count(), 1);
//! ```

pub mod chart;
pub mod media;
pub mod properties;
pub mod rich_text;
pub mod shape;
pub mod slide;
pub mod style;
pub mod table;
pub mod transition;

use serde::{Deserialize, Serialize};

pub use chart::{Chart, ChartType, Series};
pub use media::{DrawingSource, ImageFormat, LazyBlob, MediaKind};
pub use properties::{
    DocumentLayout, DocumentProperties, LayoutPreset, PresentationProperties, PropertyValue,
};
pub use rich_text::{Hyperlink, HyperlinkTarget, Paragraph, RichText, Run};
pub use shape::{
    AutoShapeType, Comment, CommentAuthor, Placeholder, PlaceholderType, Shape, ShapeKind,
};
pub use slide::{
    Animation, Background, LayoutRef, Note, Slide, SlideLayout, SlideMaster, Theme,
};
pub use table::Table;
pub use transition::{Transition, TransitionSpeed, TransitionType};

use crate::common::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    slides: Vec<Slide>,
    masters: Vec<SlideMaster>,
    properties: DocumentProperties,
    presentation_properties: PresentationProperties,
    layout: DocumentLayout,
    active_slide: usize,
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new()
    }
}

impl Presentation {
    /// A presentation with one standard master and no slides.
    pub fn new() -> Self {
        let layout = DocumentLayout::default();
        Self {
            slides: Vec::new(),
            masters: vec![SlideMaster::standard(layout.cx, layout.cy)],
            properties: DocumentProperties::default(),
            presentation_properties: PresentationProperties::default(),
            layout,
            active_slide: 0,
        }
    }

    /// A presentation with no masters. Readers start from this.
    pub(crate) fn empty() -> Self {
        Self {
            slides: Vec::new(),
            masters: Vec::new(),
            properties: DocumentProperties::default(),
            presentation_properties: PresentationProperties::default(),
            layout: DocumentLayout::default(),
            active_slide: 0,
        }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slides_mut(&mut self) -> &mut [Slide] {
        &mut self.slides
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn slide_mut(&mut self, index: usize) -> Option<&mut Slide> {
        self.slides.get_mut(index)
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Append a slide on the first master's "Blank" layout (or its first
    /// layout) and make it active.
    pub fn create_slide(&mut self) -> &mut Slide {
        let layout = self
            .masters
            .first()
            .map(|m| m.layout_index("Blank").unwrap_or(0))
            .unwrap_or(0);
        self.add_slide(Slide::new(LayoutRef::new(0, layout)))
    }

    pub fn add_slide(&mut self, slide: Slide) -> &mut Slide {
        self.slides.push(slide);
        self.active_slide = self.slides.len() - 1;
        &mut self.slides[self.active_slide]
    }

    pub fn remove_slide(&mut self, index: usize) -> Result<Slide> {
        if index >= self.slides.len() {
            return Err(Error::InvalidPackage(format!(
                "slide index {index} out of range ({} slides)",
                self.slides.len()
            )));
        }
        let slide = self.slides.remove(index);
        if self.active_slide >= self.slides.len() {
            self.active_slide = self.slides.len().saturating_sub(1);
        }
        Ok(slide)
    }

    pub fn active_slide_index(&self) -> usize {
        self.active_slide
    }

    pub fn active_slide(&self) -> Option<&Slide> {
        self.slides.get(self.active_slide)
    }

    pub fn active_slide_mut(&mut self) -> Option<&mut Slide> {
        self.slides.get_mut(self.active_slide)
    }

    pub fn set_active_slide_index(&mut self, index: usize) -> Result<()> {
        if index >= self.slides.len() {
            return Err(Error::InvalidPackage(format!(
                "slide index {index} out of range ({} slides)",
                self.slides.len()
            )));
        }
        self.active_slide = index;
        Ok(())
    }

    pub fn masters(&self) -> &[SlideMaster] {
        &self.masters
    }

    pub fn masters_mut(&mut self) -> &mut Vec<SlideMaster> {
        &mut self.masters
    }

    pub fn master(&self, index: usize) -> Option<&SlideMaster> {
        self.masters.get(index)
    }

    pub fn master_mut(&mut self, index: usize) -> Option<&mut SlideMaster> {
        self.masters.get_mut(index)
    }

    /// Resolve a layout reference to its master and layout.
    pub fn resolve_layout(&self, layout: LayoutRef) -> Option<(&SlideMaster, &SlideLayout)> {
        let master = self.masters.get(layout.master)?;
        let layout = master.layouts.get(layout.layout)?;
        Some((master, layout))
    }

    /// Find the layout or master shape a slide placeholder inherits from:
    /// the slide's layout first, then its master.
    pub fn resolve_placeholder(&self, slide: &Slide, placeholder: &Placeholder) -> Option<&Shape> {
        let (master, layout) = self.resolve_layout(slide.layout)?;
        layout
            .find_placeholder(placeholder)
            .or_else(|| master.find_placeholder(placeholder))
    }

    /// Check graph invariants that the package format depends on: every
    /// slide references an existing layout, every slide placeholder
    /// resolves through its layout or master, and comments sit at the top
    /// level of their slide.
    pub fn validate(&self) -> Result<()> {
        for (index, slide) in self.slides.iter().enumerate() {
            if self.resolve_layout(slide.layout).is_none() {
                return Err(Error::InvalidPackage(format!(
                    "slide {} references missing layout {}/{}",
                    index + 1,
                    slide.layout.master,
                    slide.layout.layout
                )));
            }
            for shape in &slide.shapes {
                if let Some(ph) = &shape.placeholder
                    && self.resolve_placeholder(slide, ph).is_none()
                {
                    return Err(Error::InvalidPackage(format!(
                        "placeholder {}{} on slide {} has no counterpart in its layout or master",
                        ph.kind.xml_value(),
                        ph.idx.map(|i| format!("/{i}")).unwrap_or_default(),
                        index + 1
                    )));
                }
            }
            // comments live in a separate part with no group structure
            let nested = slide
                .shapes
                .iter()
                .flat_map(Shape::children)
                .any(|child| {
                    let mut found = false;
                    child.walk(&mut |s| found |= s.is_comment());
                    found
                });
            if nested {
                return Err(Error::InvalidPackage(format!(
                    "slide {} has a comment inside a group",
                    index + 1
                )));
            }
            for animation in &slide.animations {
                if let Some(bad) = animation.shapes.iter().find(|&&i| i >= slide.shapes.len()) {
                    return Err(Error::InvalidPackage(format!(
                        "animation on slide {} references missing shape {bad}",
                        index + 1
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut DocumentProperties {
        &mut self.properties
    }

    pub fn presentation_properties(&self) -> &PresentationProperties {
        &self.presentation_properties
    }

    pub fn presentation_properties_mut(&mut self) -> &mut PresentationProperties {
        &mut self.presentation_properties
    }

    pub fn layout(&self) -> &DocumentLayout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: DocumentLayout) {
        self.layout = layout;
    }

    /// Every drawing source in the graph: pictures, media, posters and
    /// image backgrounds on slides, layouts, masters and notes.
    pub fn drawing_sources_mut(&mut self) -> Vec<&mut DrawingSource> {
        fn from_shapes<'a>(shapes: &'a mut [Shape], out: &mut Vec<&'a mut DrawingSource>) {
            for shape in shapes {
                match &mut shape.kind {
                    ShapeKind::Drawing(source) => out.push(source),
                    ShapeKind::Media(media) => {
                        out.push(&mut media.source);
                        if let Some(poster) = &mut media.poster {
                            out.push(poster);
                        }
                    },
                    ShapeKind::Group(children) => from_shapes(children, out),
                    _ => {},
                }
            }
        }
        fn from_background<'a>(
            background: &'a mut Option<Background>,
            out: &mut Vec<&'a mut DrawingSource>,
        ) {
            if let Some(Background::Image(source)) = background {
                out.push(source);
            }
        }

        let mut out = Vec::new();
        for master in &mut self.masters {
            from_shapes(&mut master.shapes, &mut out);
            from_background(&mut master.background, &mut out);
            for layout in &mut master.layouts {
                from_shapes(&mut layout.shapes, &mut out);
                from_background(&mut layout.background, &mut out);
            }
        }
        for slide in &mut self.slides {
            from_shapes(&mut slide.shapes, &mut out);
            from_background(&mut slide.background, &mut out);
            if let Some(note) = &mut slide.note {
                from_shapes(&mut note.shapes, &mut out);
            }
        }
        out
    }
}
