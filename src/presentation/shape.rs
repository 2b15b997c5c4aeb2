//! Shapes placed on slides, layouts, masters and notes.
//!
//! Every shape carries the same positioning and styling fields; what it
//! draws is decided by its [`ShapeKind`]. Geometry is in EMU and rotation in
//! degrees.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chart::Chart;
use super::media::{DrawingSource, MediaKind};
use super::rich_text::{Hyperlink, RichText};
use super::style::{Border, Fill, Shadow};
use super::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceholderType {
    Title,
    CenteredTitle,
    Subtitle,
    Body,
    Object,
    Date,
    Footer,
    SlideNumber,
    Header,
    Picture,
    Chart,
    Table,
    SlideImage,
}

impl PlaceholderType {
    pub(crate) fn xml_value(self) -> &'static str {
        match self {
            PlaceholderType::Title => "title",
            PlaceholderType::CenteredTitle => "ctrTitle",
            PlaceholderType::Subtitle => "subTitle",
            PlaceholderType::Body => "body",
            PlaceholderType::Object => "obj",
            PlaceholderType::Date => "dt",
            PlaceholderType::Footer => "ftr",
            PlaceholderType::SlideNumber => "sldNum",
            PlaceholderType::Header => "hdr",
            PlaceholderType::Picture => "pic",
            PlaceholderType::Chart => "chart",
            PlaceholderType::Table => "tbl",
            PlaceholderType::SlideImage => "sldImg",
        }
    }

    /// `p:ph` without a `type` attribute means an object placeholder.
    pub(crate) fn from_xml_value(value: Option<&str>) -> Self {
        match value {
            Some("title") => PlaceholderType::Title,
            Some("ctrTitle") => PlaceholderType::CenteredTitle,
            Some("subTitle") => PlaceholderType::Subtitle,
            Some("body") => PlaceholderType::Body,
            Some("dt") => PlaceholderType::Date,
            Some("ftr") => PlaceholderType::Footer,
            Some("sldNum") => PlaceholderType::SlideNumber,
            Some("hdr") => PlaceholderType::Header,
            Some("pic") => PlaceholderType::Picture,
            Some("chart") => PlaceholderType::Chart,
            Some("tbl") => PlaceholderType::Table,
            Some("sldImg") => PlaceholderType::SlideImage,
            _ => PlaceholderType::Object,
        }
    }

    fn is_title(self) -> bool {
        matches!(self, PlaceholderType::Title | PlaceholderType::CenteredTitle)
    }
}

/// Binding of a shape to a layout or master placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placeholder {
    pub kind: PlaceholderType,
    pub idx: Option<u32>,
}

impl Placeholder {
    pub fn new(kind: PlaceholderType) -> Self {
        Self { kind, idx: None }
    }

    pub fn with_idx(kind: PlaceholderType, idx: u32) -> Self {
        Self {
            kind,
            idx: Some(idx),
        }
    }

    /// Whether `self` on a slide inherits from `other` on its layout or master.
    ///
    /// Indexed placeholders match by index; the rest match by type, with
    /// the two title kinds treated as one.
    pub fn matches(&self, other: &Placeholder) -> bool {
        match (self.idx, other.idx) {
            (Some(a), Some(b)) if a == b => true,
            _ => {
                self.kind == other.kind || (self.kind.is_title() && other.kind.is_title())
            },
        }
    }
}

/// Preset geometry of an auto shape (`a:prstGeom prst`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AutoShapeType {
    #[default]
    Rectangle,
    RoundRectangle,
    Ellipse,
    Triangle,
    Diamond,
    Hexagon,
    RightArrow,
    LeftArrow,
    Star5,
    Heart,
    Cloud,
    Other(String),
}

impl AutoShapeType {
    pub(crate) fn xml_value(&self) -> &str {
        match self {
            AutoShapeType::Rectangle => "rect",
            AutoShapeType::RoundRectangle => "roundRect",
            AutoShapeType::Ellipse => "ellipse",
            AutoShapeType::Triangle => "triangle",
            AutoShapeType::Diamond => "diamond",
            AutoShapeType::Hexagon => "hexagon",
            AutoShapeType::RightArrow => "rightArrow",
            AutoShapeType::LeftArrow => "leftArrow",
            AutoShapeType::Star5 => "star5",
            AutoShapeType::Heart => "heart",
            AutoShapeType::Cloud => "cloud",
            AutoShapeType::Other(name) => name,
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "rect" => AutoShapeType::Rectangle,
            "roundRect" => AutoShapeType::RoundRectangle,
            "ellipse" => AutoShapeType::Ellipse,
            "triangle" => AutoShapeType::Triangle,
            "diamond" => AutoShapeType::Diamond,
            "hexagon" => AutoShapeType::Hexagon,
            "rightArrow" => AutoShapeType::RightArrow,
            "leftArrow" => AutoShapeType::LeftArrow,
            "star5" => AutoShapeType::Star5,
            "heart" => AutoShapeType::Heart,
            "cloud" => AutoShapeType::Cloud,
            other => AutoShapeType::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub name: String,
    pub initials: String,
}

impl CommentAuthor {
    pub fn new(name: impl Into<String>, initials: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initials: initials.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: Option<CommentAuthor>,
    pub text: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub kind: MediaKind,
    pub source: DrawingSource,
    /// Frame shown before playback; a blank frame is written when absent.
    pub poster: Option<DrawingSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    RichText(RichText),
    AutoShape {
        geometry: AutoShapeType,
        text: RichText,
    },
    Drawing(DrawingSource),
    Table(Table),
    Chart(Box<Chart>),
    Line,
    Group(Vec<Shape>),
    Media(Media),
    Comment(Comment),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub name: String,
    pub description: String,
    pub offset_x: i64,
    pub offset_y: i64,
    pub width: i64,
    pub height: i64,
    pub rotation: f64,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub hyperlink: Option<Hyperlink>,
    pub fill: Fill,
    pub border: Border,
    pub shadow: Shadow,
    pub placeholder: Option<Placeholder>,
    pub kind: ShapeKind,
}

impl Shape {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            offset_x: 0,
            offset_y: 0,
            width: 0,
            height: 0,
            rotation: 0.0,
            flip_horizontal: false,
            flip_vertical: false,
            hyperlink: None,
            fill: Fill::default(),
            border: Border::default(),
            shadow: Shadow::default(),
            placeholder: None,
            kind,
        }
    }

    pub fn rich_text() -> Self {
        Self::new(ShapeKind::RichText(RichText::default()))
    }

    pub fn auto_shape(geometry: AutoShapeType) -> Self {
        Self::new(ShapeKind::AutoShape {
            geometry,
            text: RichText::default(),
        })
    }

    pub fn drawing(source: DrawingSource) -> Self {
        Self::new(ShapeKind::Drawing(source))
    }

    pub fn table(table: Table) -> Self {
        let width = table.columns.iter().sum();
        let height = table.height();
        Self::new(ShapeKind::Table(table)).with_size(width, height)
    }

    pub fn chart(chart: Chart) -> Self {
        Self::new(ShapeKind::Chart(Box::new(chart)))
    }

    /// A straight connector from (`x1`, `y1`) to (`x2`, `y2`).
    pub fn line(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        let mut shape = Self::new(ShapeKind::Line);
        shape.offset_x = x1.min(x2);
        shape.offset_y = y1.min(y2);
        shape.width = (x2 - x1).abs();
        shape.height = (y2 - y1).abs();
        shape.flip_horizontal = x2 < x1;
        shape.flip_vertical = y2 < y1;
        shape.border = Border::new(1.0, super::style::Color::BLACK);
        shape
    }

    /// A group whose frame encloses all of `children`.
    pub fn group(children: Vec<Shape>) -> Self {
        let mut shape = Self::new(ShapeKind::Group(children));
        shape.fit_group_to_children();
        shape
    }

    pub fn media(kind: MediaKind, source: DrawingSource) -> Self {
        Self::new(ShapeKind::Media(Media {
            kind,
            source,
            poster: None,
        }))
    }

    pub fn comment(author: Option<CommentAuthor>, text: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self::new(ShapeKind::Comment(Comment {
            author,
            text: text.into(),
            date,
        }))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_offset(mut self, x: i64, y: i64) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    pub fn with_size(mut self, width: i64, height: i64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = shadow;
        self
    }

    pub fn with_hyperlink(mut self, hyperlink: Hyperlink) -> Self {
        self.hyperlink = Some(hyperlink);
        self
    }

    pub fn with_placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Text body of rich text and auto shapes.
    pub fn text(&self) -> Option<&RichText> {
        match &self.kind {
            ShapeKind::RichText(text) | ShapeKind::AutoShape { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut RichText> {
        match &mut self.kind {
            ShapeKind::RichText(text) | ShapeKind::AutoShape { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn chart_ref(&self) -> Option<&Chart> {
        match &self.kind {
            ShapeKind::Chart(chart) => Some(chart),
            _ => None,
        }
    }

    pub fn chart_mut(&mut self) -> Option<&mut Chart> {
        match &mut self.kind {
            ShapeKind::Chart(chart) => Some(chart),
            _ => None,
        }
    }

    pub fn table_ref(&self) -> Option<&Table> {
        match &self.kind {
            ShapeKind::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn table_mut(&mut self) -> Option<&mut Table> {
        match &mut self.kind {
            ShapeKind::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Shape] {
        match &self.kind {
            ShapeKind::Group(children) => children,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Shape>> {
        match &mut self.kind {
            ShapeKind::Group(children) => Some(children),
            _ => None,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, ShapeKind::Comment(_))
    }

    /// A placeholder with no geometry of its own takes the frame of the
    /// layout or master placeholder it resolves to.
    pub fn inherits_geometry(&self) -> bool {
        self.placeholder.is_some()
            && self.offset_x == 0
            && self.offset_y == 0
            && self.width == 0
            && self.height == 0
    }

    /// Recompute a group's frame from its children. No-op for other kinds.
    pub fn fit_group_to_children(&mut self) {
        let ShapeKind::Group(children) = &self.kind else {
            return;
        };
        if children.is_empty() {
            return;
        }
        let min_x = children.iter().map(|c| c.offset_x).min().unwrap_or(0);
        let min_y = children.iter().map(|c| c.offset_y).min().unwrap_or(0);
        let max_x = children.iter().map(|c| c.offset_x + c.width).max().unwrap_or(0);
        let max_y = children.iter().map(|c| c.offset_y + c.height).max().unwrap_or(0);
        self.offset_x = min_x;
        self.offset_y = min_y;
        self.width = max_x - min_x;
        self.height = max_y - min_y;
    }

    /// Visit this shape and all nested group members, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Shape)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Shape)) {
        visit(self);
        if let ShapeKind::Group(children) = &mut self.kind {
            for child in children {
                child.walk_mut(visit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_matching() {
        let title = Placeholder::new(PlaceholderType::Title);
        let ctr = Placeholder::new(PlaceholderType::CenteredTitle);
        let body = Placeholder::with_idx(PlaceholderType::Body, 1);
        let obj = Placeholder::with_idx(PlaceholderType::Object, 1);
        assert!(title.matches(&ctr));
        assert!(body.matches(&obj));
        assert!(!title.matches(&body));
        assert!(!Placeholder::with_idx(PlaceholderType::Body, 2).matches(&obj));
    }

    #[test]
    fn test_line_flips_for_reverse_direction() {
        let line = Shape::line(100, 200, 50, 20);
        assert_eq!((line.offset_x, line.offset_y), (50, 20));
        assert_eq!((line.width, line.height), (50, 180));
        assert!(line.flip_horizontal && line.flip_vertical);
    }

    #[test]
    fn test_group_frame_encloses_children() {
        let a = Shape::rich_text().with_offset(100, 100).with_size(50, 50);
        let b = Shape::rich_text().with_offset(300, 20).with_size(10, 10);
        let group = Shape::group(vec![a, b]);
        assert_eq!((group.offset_x, group.offset_y), (100, 20));
        assert_eq!((group.width, group.height), (210, 130));

        let mut count = 0;
        group.walk(&mut |_| count += 1);
        assert_eq!(count, 3);
    }

    #[test]
    fn test_text_accessor_covers_auto_shapes() {
        let mut shape = Shape::auto_shape(AutoShapeType::Ellipse);
        shape.text_mut().unwrap().create_text_run("inside");
        assert_eq!(shape.text().unwrap().text(), "inside");
        assert!(Shape::line(0, 0, 1, 1).text().is_none());
    }

    #[test]
    fn test_geometry_names() {
        assert_eq!(AutoShapeType::from_xml_value("star5"), AutoShapeType::Star5);
        assert_eq!(
            AutoShapeType::from_xml_value("wave").xml_value(),
            "wave"
        );
    }
}
