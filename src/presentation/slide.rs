//! Slides, slide layouts and slide masters.
//!
//! The three share one shape-container idea: an ordered list of shapes plus
//! an optional background and transition. A slide references its layout by
//! ([`LayoutRef`]) indices into the presentation's masters, so a layout can
//! be shared by any number of slides without shared ownership.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::media::DrawingSource;
use super::rich_text::RichText;
use super::shape::{Placeholder, PlaceholderType, Shape, ShapeKind};
use super::style::{Alignment, Color, Font, HorizontalAlignment};
use super::transition::Transition;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Background {
    Color(Color),
    Image(DrawingSource),
}

/// Speaker notes. Holds ordinary shapes; [`Note::from_text`] creates the
/// usual single body placeholder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Note {
    pub shapes: Vec<Shape>,
}

impl Note {
    pub fn from_text(text: impl Into<String>) -> Self {
        let shape = Shape::new(ShapeKind::RichText(RichText::from_text(text)))
            .with_placeholder(Placeholder::with_idx(PlaceholderType::Body, 1));
        Self {
            shapes: vec![shape],
        }
    }

    pub fn create_rich_text_shape(&mut self) -> &mut Shape {
        self.shapes.push(Shape::rich_text());
        let last = self.shapes.len() - 1;
        &mut self.shapes[last]
    }

    /// Text of all text shapes, one per line.
    pub fn text(&self) -> String {
        self.shapes
            .iter()
            .filter_map(|s| s.text().map(RichText::text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// One build step: the shapes (by index into the slide's shape list) that
/// appear together on a click.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Animation {
    pub shapes: Vec<usize>,
}

impl Animation {
    pub fn new(shapes: impl IntoIterator<Item = usize>) -> Self {
        Self {
            shapes: shapes.into_iter().collect(),
        }
    }
}

/// Master colour mapping (`p:clrMap`), e.g. `bg1 -> lt1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorMap {
    pub mapping: BTreeMap<String, String>,
}

impl ColorMap {
    /// The attribute order of `p:clrMap`.
    pub const NAMES: [&'static str; 12] = [
        "bg1", "tx1", "bg2", "tx2", "accent1", "accent2", "accent3", "accent4", "accent5",
        "accent6", "hlink", "folHlink",
    ];

    pub fn get(&self, name: &str) -> Option<&str> {
        self.mapping.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, target: impl Into<String>) {
        self.mapping.insert(name.into(), target.into());
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        let pairs = [
            ("bg1", "lt1"),
            ("tx1", "dk1"),
            ("bg2", "lt2"),
            ("tx2", "dk2"),
            ("accent1", "accent1"),
            ("accent2", "accent2"),
            ("accent3", "accent3"),
            ("accent4", "accent4"),
            ("accent5", "accent5"),
            ("accent6", "accent6"),
            ("hlink", "hlink"),
            ("folHlink", "folHlink"),
        ];
        Self {
            mapping: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Default paragraph formatting for one outline level.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelStyle {
    pub alignment: Alignment,
    pub font: Font,
}

/// Master text styles (`p:txStyles`), keyed by outline level (0..=8).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyles {
    pub title: BTreeMap<u8, LevelStyle>,
    pub body: BTreeMap<u8, LevelStyle>,
    pub other: BTreeMap<u8, LevelStyle>,
}

impl Default for TextStyles {
    fn default() -> Self {
        let title = BTreeMap::from([(
            0,
            LevelStyle {
                alignment: Alignment::horizontal(HorizontalAlignment::Center),
                font: Font::default().with_size(44.0),
            },
        )]);
        let body = (0u8..5)
            .map(|level| {
                let style = LevelStyle {
                    alignment: Alignment {
                        level,
                        margin_left: 27.0 * level as f64,
                        ..Default::default()
                    },
                    font: Font::default().with_size(32.0 - 4.0 * level.min(3) as f64),
                };
                (level, style)
            })
            .collect();
        let other = BTreeMap::from([(0, LevelStyle {
            alignment: Alignment::default(),
            font: Font::default().with_size(18.0),
        })]);
        Self { title, body, other }
    }
}

/// Theme colours and fonts, written as the master's `themeN.xml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    /// Scheme colours in `dk1, lt1, dk2, lt2, accent1..6, hlink, folHlink`
    /// order.
    pub colors: Vec<(String, Color)>,
    pub major_font: String,
    pub minor_font: String,
}

impl Default for Theme {
    fn default() -> Self {
        let colors = [
            ("dk1", 0xFF00_0000),
            ("lt1", 0xFFFF_FFFF),
            ("dk2", 0xFF1F_497D),
            ("lt2", 0xFFEE_ECE1),
            ("accent1", 0xFF4F_81BD),
            ("accent2", 0xFFC0_504D),
            ("accent3", 0xFF9B_BB59),
            ("accent4", 0xFF80_64A2),
            ("accent5", 0xFF4B_ACC6),
            ("accent6", 0xFFF7_9646),
            ("hlink", 0xFF00_00FF),
            ("folHlink", 0xFF80_0080),
        ];
        Self {
            name: "Office Theme".to_string(),
            colors: colors
                .into_iter()
                .map(|(n, c)| (n.to_string(), Color::from_argb(c)))
                .collect(),
            major_font: "Calibri".to_string(),
            minor_font: "Calibri".to_string(),
        }
    }
}

impl Theme {
    pub fn color(&self, name: &str) -> Option<Color> {
        self.colors.iter().find(|(n, _)| n == name).map(|(_, c)| *c)
    }
}

/// Layout kind (`p:sldLayout type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutType {
    Title,
    Object,
    TitleOnly,
    #[default]
    Blank,
    SectionHeader,
    TwoObjects,
    Custom,
}

impl LayoutType {
    pub(crate) fn xml_value(self) -> &'static str {
        match self {
            LayoutType::Title => "title",
            LayoutType::Object => "obj",
            LayoutType::TitleOnly => "titleOnly",
            LayoutType::Blank => "blank",
            LayoutType::SectionHeader => "secHead",
            LayoutType::TwoObjects => "twoObj",
            LayoutType::Custom => "cust",
        }
    }

    pub(crate) fn from_xml_value(value: Option<&str>) -> Self {
        match value {
            Some("title") => LayoutType::Title,
            Some("obj") => LayoutType::Object,
            Some("titleOnly") => LayoutType::TitleOnly,
            Some("blank") => LayoutType::Blank,
            Some("secHead") => LayoutType::SectionHeader,
            Some("twoObj") => LayoutType::TwoObjects,
            _ => LayoutType::Custom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideLayout {
    pub name: String,
    pub layout_type: LayoutType,
    pub shapes: Vec<Shape>,
    pub background: Option<Background>,
    pub transition: Option<Transition>,
    /// Overrides the master colour map when set.
    pub color_map: Option<ColorMap>,
}

impl SlideLayout {
    pub fn new(name: impl Into<String>, layout_type: LayoutType) -> Self {
        Self {
            name: name.into(),
            layout_type,
            shapes: Vec::new(),
            background: None,
            transition: None,
            color_map: None,
        }
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn find_placeholder(&self, placeholder: &Placeholder) -> Option<&Shape> {
        find_placeholder(&self.shapes, placeholder)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideMaster {
    pub name: String,
    pub shapes: Vec<Shape>,
    pub background: Option<Background>,
    pub transition: Option<Transition>,
    pub layouts: Vec<SlideLayout>,
    pub color_map: ColorMap,
    pub text_styles: TextStyles,
    pub theme: Theme,
}

impl SlideMaster {
    /// An empty master with no layouts.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shapes: Vec::new(),
            background: None,
            transition: None,
            layouts: Vec::new(),
            color_map: ColorMap::default(),
            text_styles: TextStyles::default(),
            theme: Theme::default(),
        }
    }

    /// Master with the usual title, body, date, footer and slide-number
    /// placeholders and four standard layouts.
    pub fn standard(slide_width: i64, slide_height: i64) -> Self {
        let frame = |x: f64, y: f64, w: f64, h: f64| {
            (
                (slide_width as f64 * x) as i64,
                (slide_height as f64 * y) as i64,
                (slide_width as f64 * w) as i64,
                (slide_height as f64 * h) as i64,
            )
        };
        let placeholder = |name: &str, ph: Placeholder, (x, y, w, h): (i64, i64, i64, i64)| {
            Shape::rich_text()
                .with_name(name)
                .with_placeholder(ph)
                .with_offset(x, y)
                .with_size(w, h)
        };

        let title = frame(0.05, 0.04, 0.9, 0.167);
        let body = frame(0.05, 0.233, 0.9, 0.66);
        let mut master = Self::new("Office Theme");
        master.shapes = vec![
            placeholder("Title Placeholder 1", Placeholder::new(PlaceholderType::Title), title),
            placeholder(
                "Text Placeholder 2",
                Placeholder::with_idx(PlaceholderType::Body, 1),
                body,
            ),
            placeholder(
                "Date Placeholder 3",
                Placeholder::with_idx(PlaceholderType::Date, 2),
                frame(0.05, 0.927, 0.233, 0.053),
            ),
            placeholder(
                "Footer Placeholder 4",
                Placeholder::with_idx(PlaceholderType::Footer, 3),
                frame(0.342, 0.927, 0.317, 0.053),
            ),
            placeholder(
                "Slide Number Placeholder 5",
                Placeholder::with_idx(PlaceholderType::SlideNumber, 4),
                frame(0.717, 0.927, 0.233, 0.053),
            ),
        ];

        master.layouts = vec![
            SlideLayout::new("Title Slide", LayoutType::Title)
                .with_shape(placeholder(
                    "Title 1",
                    Placeholder::new(PlaceholderType::CenteredTitle),
                    frame(0.075, 0.31, 0.85, 0.215),
                ))
                .with_shape(placeholder(
                    "Subtitle 2",
                    Placeholder::with_idx(PlaceholderType::Subtitle, 1),
                    frame(0.15, 0.567, 0.7, 0.255),
                )),
            SlideLayout::new("Title and Content", LayoutType::Object)
                .with_shape(placeholder(
                    "Title 1",
                    Placeholder::new(PlaceholderType::Title),
                    title,
                ))
                .with_shape(placeholder(
                    "Content Placeholder 2",
                    Placeholder::with_idx(PlaceholderType::Object, 1),
                    body,
                )),
            SlideLayout::new("Title Only", LayoutType::TitleOnly).with_shape(placeholder(
                "Title 1",
                Placeholder::new(PlaceholderType::Title),
                title,
            )),
            SlideLayout::new("Blank", LayoutType::Blank),
        ];
        master
    }

    pub fn create_layout(&mut self, name: impl Into<String>) -> &mut SlideLayout {
        self.layouts.push(SlideLayout::new(name, LayoutType::Custom));
        let last = self.layouts.len() - 1;
        &mut self.layouts[last]
    }

    pub fn layout_index(&self, name: &str) -> Option<usize> {
        self.layouts.iter().position(|l| l.name == name)
    }

    pub fn find_placeholder(&self, placeholder: &Placeholder) -> Option<&Shape> {
        find_placeholder(&self.shapes, placeholder)
    }
}

/// Index of a layout: `masters[master].layouts[layout]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LayoutRef {
    pub master: usize,
    pub layout: usize,
}

impl LayoutRef {
    pub fn new(master: usize, layout: usize) -> Self {
        Self { master, layout }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Slide {
    pub name: Option<String>,
    pub shapes: Vec<Shape>,
    pub layout: LayoutRef,
    pub background: Option<Background>,
    pub transition: Option<Transition>,
    pub note: Option<Note>,
    pub animations: Vec<Animation>,
    pub hidden: bool,
}

impl Slide {
    pub fn new(layout: LayoutRef) -> Self {
        Self {
            layout,
            ..Default::default()
        }
    }

    pub fn add_shape(&mut self, shape: Shape) -> &mut Shape {
        self.shapes.push(shape);
        let last = self.shapes.len() - 1;
        &mut self.shapes[last]
    }

    pub fn create_rich_text_shape(&mut self) -> &mut Shape {
        self.add_shape(Shape::rich_text())
    }

    pub fn shape(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn shape_mut(&mut self, index: usize) -> Option<&mut Shape> {
        self.shapes.get_mut(index)
    }

    pub fn remove_shape(&mut self, index: usize) -> Option<Shape> {
        (index < self.shapes.len()).then(|| self.shapes.remove(index))
    }

    pub fn note_mut(&mut self) -> &mut Note {
        self.note.get_or_insert_with(Note::default)
    }

    pub fn add_animation(&mut self, animation: Animation) {
        self.animations.push(animation);
    }

    /// Comment shapes on this slide, including ones nested in groups.
    pub fn comments(&self) -> Vec<&Shape> {
        let mut out = Vec::new();
        for shape in &self.shapes {
            shape.walk(&mut |s| {
                if s.is_comment() {
                    out.push(s);
                }
            });
        }
        out
    }
}

pub(crate) fn find_placeholder<'a>(
    shapes: &'a [Shape],
    placeholder: &Placeholder,
) -> Option<&'a Shape> {
    let by_idx = placeholder.idx.and_then(|idx| {
        shapes
            .iter()
            .find(|s| s.placeholder.is_some_and(|p| p.idx == Some(idx)))
    });
    by_idx.or_else(|| {
        shapes
            .iter()
            .find(|s| s.placeholder.is_some_and(|p| placeholder.matches(&p)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_master_layouts() {
        let master = SlideMaster::standard(9_144_000, 6_858_000);
        assert_eq!(master.layouts.len(), 4);
        assert_eq!(master.layout_index("Blank"), Some(3));
        assert!(master.layouts[3].shapes.is_empty());
        assert_eq!(master.shapes.len(), 5);
    }

    #[test]
    fn test_find_placeholder_prefers_idx() {
        let master = SlideMaster::standard(9_144_000, 6_858_000);
        let found = master
            .find_placeholder(&Placeholder::with_idx(PlaceholderType::Object, 1))
            .unwrap();
        assert_eq!(found.name, "Text Placeholder 2");

        let title = master
            .find_placeholder(&Placeholder::new(PlaceholderType::CenteredTitle))
            .unwrap();
        assert_eq!(title.name, "Title Placeholder 1");

        assert!(
            master
                .find_placeholder(&Placeholder::with_idx(PlaceholderType::Picture, 9))
                .is_none()
        );
    }

    #[test]
    fn test_note_text() {
        let note = Note::from_text("Remember the demo");
        assert_eq!(note.text(), "Remember the demo");
        assert_eq!(
            note.shapes[0].placeholder,
            Some(Placeholder::with_idx(PlaceholderType::Body, 1))
        );
    }

    #[test]
    fn test_slide_comments_include_groups() {
        let mut slide = Slide::default();
        let comment = Shape::comment(None, "look", chrono::Utc::now());
        slide.add_shape(Shape::group(vec![comment.clone(), Shape::rich_text()]));
        slide.add_shape(comment);
        assert_eq!(slide.comments().len(), 2);
        assert!(slide.remove_shape(5).is_none());
    }

    #[test]
    fn test_default_color_map() {
        let map = ColorMap::default();
        assert_eq!(map.get("bg1"), Some("lt1"));
        assert_eq!(map.get("folHlink"), Some("folHlink"));
        assert_eq!(map.mapping.len(), ColorMap::NAMES.len());
    }
}
