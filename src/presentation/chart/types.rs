//! Enumerations used by chart models.
//!
//! Each enum maps one-to-one onto a DrawingML chart attribute value.

use serde::{Deserialize, Serialize};

/// Bar direction (horizontal bars or vertical columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BarDirection {
    /// Horizontal bars
    Bar,
    /// Vertical bars (columns)
    #[default]
    Column,
}

impl BarDirection {
    /// Returns the XML value for this direction.
    #[inline]
    pub const fn xml_value(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Column => "col",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "bar" => Self::Bar,
            _ => Self::Column,
        }
    }
}

/// Series grouping for bar, line and area charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Grouping {
    /// Clustered bars
    #[default]
    Clustered,
    /// Stacked values
    Stacked,
    /// 100% stacked values
    PercentStacked,
    /// Standard grouping (line and area)
    Standard,
}

impl Grouping {
    /// Returns the XML value for this grouping.
    #[inline]
    pub const fn xml_value(&self) -> &'static str {
        match self {
            Self::Clustered => "clustered",
            Self::Stacked => "stacked",
            Self::PercentStacked => "percentStacked",
            Self::Standard => "standard",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "stacked" => Self::Stacked,
            "percentStacked" => Self::PercentStacked,
            "standard" => Self::Standard,
            _ => Self::Clustered,
        }
    }
}

/// Legend position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LegendPosition {
    /// Bottom position
    Bottom,
    /// Left position
    Left,
    /// Right position
    #[default]
    Right,
    /// Top position
    Top,
    /// Top right corner
    TopRight,
}

impl LegendPosition {
    /// Returns the XML value for this position.
    #[inline]
    pub const fn xml_value(&self) -> &'static str {
        match self {
            Self::Bottom => "b",
            Self::Left => "l",
            Self::Right => "r",
            Self::Top => "t",
            Self::TopRight => "tr",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "b" => Self::Bottom,
            "l" => Self::Left,
            "t" => Self::Top,
            "tr" => Self::TopRight,
            _ => Self::Right,
        }
    }
}

/// Data label position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataLabelPosition {
    /// Best fit position
    BestFit,
    /// Center position
    Center,
    /// Inside base position
    InsideBase,
    /// Inside end position
    InsideEnd,
    /// Left position
    Left,
    /// Outside end position
    OutsideEnd,
    /// Right position
    Right,
    /// Top position
    Top,
    /// Bottom position
    Bottom,
}

impl DataLabelPosition {
    /// Returns the XML value for this position.
    #[inline]
    pub const fn xml_value(&self) -> &'static str {
        match self {
            Self::BestFit => "bestFit",
            Self::Center => "ctr",
            Self::InsideBase => "inBase",
            Self::InsideEnd => "inEnd",
            Self::Left => "l",
            Self::OutsideEnd => "outEnd",
            Self::Right => "r",
            Self::Top => "t",
            Self::Bottom => "b",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Option<Self> {
        Some(match value {
            "bestFit" => Self::BestFit,
            "ctr" => Self::Center,
            "inBase" => Self::InsideBase,
            "inEnd" => Self::InsideEnd,
            "l" => Self::Left,
            "outEnd" => Self::OutsideEnd,
            "r" => Self::Right,
            "t" => Self::Top,
            "b" => Self::Bottom,
            _ => return None,
        })
    }
}

/// Marker symbol for line, scatter and radar series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerSymbol {
    /// Circle marker
    Circle,
    /// Dash marker
    Dash,
    /// Diamond marker
    Diamond,
    /// Dot marker
    Dot,
    /// No marker
    #[default]
    None,
    /// Plus marker
    Plus,
    /// Square marker
    Square,
    /// Star marker
    Star,
    /// Triangle marker
    Triangle,
    /// X marker
    X,
    /// Automatic marker
    Auto,
}

impl MarkerSymbol {
    /// Returns the XML value for this marker style.
    #[inline]
    pub const fn xml_value(&self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Dash => "dash",
            Self::Diamond => "diamond",
            Self::Dot => "dot",
            Self::None => "none",
            Self::Plus => "plus",
            Self::Square => "square",
            Self::Star => "star",
            Self::Triangle => "triangle",
            Self::X => "x",
            Self::Auto => "auto",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "circle" => Self::Circle,
            "dash" => Self::Dash,
            "diamond" => Self::Diamond,
            "dot" => Self::Dot,
            "plus" => Self::Plus,
            "square" => Self::Square,
            "star" => Self::Star,
            "triangle" => Self::Triangle,
            "x" => Self::X,
            "auto" => Self::Auto,
            _ => Self::None,
        }
    }
}

/// Scatter chart style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScatterStyle {
    /// Line with markers
    #[default]
    LineMarker,
    /// Line only
    Line,
    /// Markers only
    Marker,
    /// No line or markers
    None,
    /// Smooth line with markers
    SmoothMarker,
    /// Smooth line only
    Smooth,
}

impl ScatterStyle {
    /// Returns the XML value for this scatter style.
    #[inline]
    pub const fn xml_value(&self) -> &'static str {
        match self {
            Self::LineMarker => "lineMarker",
            Self::Line => "line",
            Self::Marker => "marker",
            Self::None => "none",
            Self::SmoothMarker => "smoothMarker",
            Self::Smooth => "smooth",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "line" => Self::Line,
            "marker" => Self::Marker,
            "none" => Self::None,
            "smoothMarker" => Self::SmoothMarker,
            "smooth" => Self::Smooth,
            _ => Self::LineMarker,
        }
    }
}

/// Radar chart style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RadarStyle {
    /// Standard radar
    Standard,
    /// Filled radar
    Filled,
    /// Marker radar
    #[default]
    Marker,
}

impl RadarStyle {
    /// Returns the XML value for this radar style.
    #[inline]
    pub const fn xml_value(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Filled => "filled",
            Self::Marker => "marker",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "standard" => Self::Standard,
            "filled" => Self::Filled,
            _ => Self::Marker,
        }
    }
}

/// How blank cells are plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayBlanks {
    /// Gaps where there are blank cells
    Gap,
    /// Connect data points across blank cells
    Span,
    /// Treat blank cells as zero
    #[default]
    Zero,
}

impl DisplayBlanks {
    /// Returns the XML value for this display mode.
    #[inline]
    pub const fn xml_value(&self) -> &'static str {
        match self {
            Self::Gap => "gap",
            Self::Span => "span",
            Self::Zero => "zero",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "gap" => Self::Gap,
            "span" => Self::Span,
            _ => Self::Zero,
        }
    }
}

/// Axis tick mark style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TickMark {
    /// Cross tick mark
    Cross,
    /// Inside tick mark
    In,
    /// No tick mark
    #[default]
    None,
    /// Outside tick mark
    Out,
}

impl TickMark {
    /// Returns the XML value for this tick mark style.
    #[inline]
    pub const fn xml_value(&self) -> &'static str {
        match self {
            Self::Cross => "cross",
            Self::In => "in",
            Self::None => "none",
            Self::Out => "out",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "cross" => Self::Cross,
            "in" => Self::In,
            "out" => Self::Out,
            _ => Self::None,
        }
    }
}

/// Axis tick label position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TickLabelPosition {
    /// High position
    High,
    /// Low position
    Low,
    /// Next to axis
    #[default]
    NextTo,
    /// No tick labels
    None,
}

impl TickLabelPosition {
    /// Returns the XML value for this position.
    #[inline]
    pub const fn xml_value(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
            Self::NextTo => "nextTo",
            Self::None => "none",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "high" => Self::High,
            "low" => Self::Low,
            "none" => Self::None,
            _ => Self::NextTo,
        }
    }
}
