//! Style values shared by shapes, text, tables and charts.
//!
//! Every type here is a plain value: cloning a style never shares state with
//! the original, and two styles compare equal when all their fields do.

use serde::{Deserialize, Serialize};

/// An ARGB colour.
///
/// PresentationML stores colours as six-digit RGB hex (`a:srgbClr val`) with
/// an optional `a:alpha` child, so the alpha channel is kept separately when
/// writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub argb: u32,
}

impl Color {
    pub const BLACK: Color = Color { argb: 0xFF00_0000 };
    pub const WHITE: Color = Color { argb: 0xFFFF_FFFF };
    pub const RED: Color = Color { argb: 0xFFFF_0000 };
    pub const DARK_BLUE: Color = Color { argb: 0xFF00_0080 };

    pub const fn from_argb(argb: u32) -> Self {
        Self { argb }
    }

    /// Parse an eight-digit `AARRGGBB` string such as `"FFE06B20"`.
    pub fn from_argb_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 8 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self::from_argb)
    }

    /// Parse a six-digit `RRGGBB` string, assuming full opacity.
    pub fn from_rgb_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16)
            .ok()
            .map(|rgb| Self::from_argb(0xFF00_0000 | rgb))
    }

    pub fn argb_hex(&self) -> String {
        format!("{:08X}", self.argb)
    }

    /// The `RRGGBB` part, as written to `a:srgbClr val`.
    pub fn rgb_hex(&self) -> String {
        format!("{:06X}", self.argb & 0x00FF_FFFF)
    }

    pub fn alpha(&self) -> u8 {
        (self.argb >> 24) as u8
    }

    pub fn with_alpha(self, alpha: u8) -> Self {
        Self::from_argb((self.argb & 0x00FF_FFFF) | ((alpha as u32) << 24))
    }

    /// Alpha as thousandths of a percent (`a:alpha val`).
    pub(crate) fn alpha_st(&self) -> u32 {
        (self.alpha() as u32 * 100_000 + 127) / 255
    }

    pub(crate) fn from_rgb_and_alpha_st(rgb: &str, alpha_st: Option<u32>) -> Option<Self> {
        let color = Self::from_rgb_hex(rgb)?;
        Some(match alpha_st {
            Some(st) => color.with_alpha(((st.min(100_000) * 255 + 50_000) / 100_000) as u8),
            None => color,
        })
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillType {
    #[default]
    None,
    Solid,
    GradientLinear,
    GradientPath,
}

/// Area fill.
///
/// `start_color` is the solid colour; gradients run from `start_color` to
/// `end_color`, with `rotation` in degrees for linear gradients.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Fill {
    pub fill_type: FillType,
    pub rotation: f64,
    pub start_color: Color,
    pub end_color: Color,
}

impl Fill {
    pub fn solid(color: Color) -> Self {
        Self {
            fill_type: FillType::Solid,
            start_color: color,
            end_color: color,
            ..Default::default()
        }
    }

    pub fn linear_gradient(start: Color, end: Color, rotation: f64) -> Self {
        Self {
            fill_type: FillType::GradientLinear,
            rotation,
            start_color: start,
            end_color: end,
        }
    }

    pub fn is_none(&self) -> bool {
        self.fill_type == FillType::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    Single,
    ThinThin,
    ThinThick,
    ThickThin,
    Triple,
}

impl LineStyle {
    pub(crate) fn xml_value(self) -> &'static str {
        match self {
            LineStyle::Single => "sng",
            LineStyle::ThinThin => "dbl",
            LineStyle::ThinThick => "thinThick",
            LineStyle::ThickThin => "thickThin",
            LineStyle::Triple => "tri",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "dbl" => LineStyle::ThinThin,
            "thinThick" => LineStyle::ThinThick,
            "thickThin" => LineStyle::ThickThin,
            "tri" => LineStyle::Triple,
            _ => LineStyle::Single,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashStyle {
    #[default]
    Solid,
    Dash,
    DashDot,
    Dot,
    LongDash,
    LongDashDot,
    LongDashDotDot,
    SystemDash,
    SystemDot,
    SystemDashDot,
}

impl DashStyle {
    pub(crate) fn xml_value(self) -> &'static str {
        match self {
            DashStyle::Solid => "solid",
            DashStyle::Dash => "dash",
            DashStyle::DashDot => "dashDot",
            DashStyle::Dot => "dot",
            DashStyle::LongDash => "lgDash",
            DashStyle::LongDashDot => "lgDashDot",
            DashStyle::LongDashDotDot => "lgDashDotDot",
            DashStyle::SystemDash => "sysDash",
            DashStyle::SystemDot => "sysDot",
            DashStyle::SystemDashDot => "sysDashDot",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "dash" => DashStyle::Dash,
            "dashDot" => DashStyle::DashDot,
            "dot" => DashStyle::Dot,
            "lgDash" => DashStyle::LongDash,
            "lgDashDot" => DashStyle::LongDashDot,
            "lgDashDotDot" => DashStyle::LongDashDotDot,
            "sysDash" => DashStyle::SystemDash,
            "sysDot" => DashStyle::SystemDot,
            "sysDashDot" => DashStyle::SystemDashDot,
            _ => DashStyle::Solid,
        }
    }
}

/// A stroked line. `line_width` is in points; zero means no line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub line_width: f64,
    pub line_style: LineStyle,
    pub dash_style: DashStyle,
    pub color: Color,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            line_width: 0.0,
            line_style: LineStyle::Single,
            dash_style: DashStyle::Solid,
            color: Color::BLACK,
        }
    }
}

impl Border {
    pub fn new(line_width: f64, color: Color) -> Self {
        Self {
            line_width,
            color,
            ..Default::default()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.line_width > 0.0
    }
}

/// Chart-side line (series strokes, gridlines, axis lines). Width in points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Outline {
    pub fill: Fill,
    pub width: f64,
}

impl Outline {
    pub fn new(fill: Fill, width: f64) -> Self {
        Self { fill, width }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShadowAlignment {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    #[default]
    BottomLeft,
    Bottom,
    BottomRight,
}

impl ShadowAlignment {
    pub(crate) fn xml_value(self) -> &'static str {
        match self {
            ShadowAlignment::TopLeft => "tl",
            ShadowAlignment::Top => "t",
            ShadowAlignment::TopRight => "tr",
            ShadowAlignment::Left => "l",
            ShadowAlignment::Center => "ctr",
            ShadowAlignment::Right => "r",
            ShadowAlignment::BottomLeft => "bl",
            ShadowAlignment::Bottom => "b",
            ShadowAlignment::BottomRight => "br",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "tl" => ShadowAlignment::TopLeft,
            "t" => ShadowAlignment::Top,
            "tr" => ShadowAlignment::TopRight,
            "l" => ShadowAlignment::Left,
            "ctr" => ShadowAlignment::Center,
            "r" => ShadowAlignment::Right,
            "b" => ShadowAlignment::Bottom,
            "br" => ShadowAlignment::BottomRight,
            _ => ShadowAlignment::BottomLeft,
        }
    }
}

/// Outer shadow. `direction` in degrees, `distance` and `blur_radius` in
/// points, `alpha` in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub visible: bool,
    pub direction: f64,
    pub distance: f64,
    pub blur_radius: f64,
    pub alignment: ShadowAlignment,
    pub color: Color,
    pub alpha: f64,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            visible: false,
            direction: 0.0,
            distance: 2.0,
            blur_radius: 6.0,
            alignment: ShadowAlignment::BottomLeft,
            color: Color::BLACK,
            alpha: 50.0,
        }
    }
}

impl Shadow {
    pub fn visible(direction: f64, distance: f64) -> Self {
        Self {
            visible: true,
            direction,
            distance,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
    Distributed,
}

impl HorizontalAlignment {
    pub(crate) fn xml_value(self) -> &'static str {
        match self {
            HorizontalAlignment::Left => "l",
            HorizontalAlignment::Center => "ctr",
            HorizontalAlignment::Right => "r",
            HorizontalAlignment::Justify => "just",
            HorizontalAlignment::Distributed => "dist",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "ctr" => HorizontalAlignment::Center,
            "r" => HorizontalAlignment::Right,
            "just" => HorizontalAlignment::Justify,
            "dist" => HorizontalAlignment::Distributed,
            _ => HorizontalAlignment::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VerticalAlignment {
    pub(crate) fn xml_value(self) -> &'static str {
        match self {
            VerticalAlignment::Top => "t",
            VerticalAlignment::Middle => "ctr",
            VerticalAlignment::Bottom => "b",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "ctr" => VerticalAlignment::Middle,
            "b" => VerticalAlignment::Bottom,
            _ => VerticalAlignment::Top,
        }
    }
}

/// Paragraph alignment. Margins and indent are in points; `level` is the
/// outline level (0..=8).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Alignment {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
    pub level: u8,
    pub indent: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub rtl: bool,
}

impl Alignment {
    pub fn horizontal(horizontal: HorizontalAlignment) -> Self {
        Self {
            horizontal,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Underline {
    #[default]
    None,
    Single,
    Double,
    Dotted,
    Dash,
    Wavy,
    Heavy,
}

impl Underline {
    pub(crate) fn xml_value(self) -> &'static str {
        match self {
            Underline::None => "none",
            Underline::Single => "sng",
            Underline::Double => "dbl",
            Underline::Dotted => "dotted",
            Underline::Dash => "dash",
            Underline::Wavy => "wavy",
            Underline::Heavy => "heavy",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "sng" => Underline::Single,
            "dbl" => Underline::Double,
            "dotted" => Underline::Dotted,
            "dash" => Underline::Dash,
            "wavy" => Underline::Wavy,
            "heavy" => Underline::Heavy,
            _ => Underline::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Baseline {
    #[default]
    Normal,
    Superscript,
    Subscript,
}

impl Baseline {
    /// `a:rPr baseline` value, `None` for normal text.
    pub(crate) fn xml_value(self) -> Option<i32> {
        match self {
            Baseline::Normal => None,
            Baseline::Superscript => Some(crate::common::unit::BASELINE_SUPERSCRIPT),
            Baseline::Subscript => Some(crate::common::unit::BASELINE_SUBSCRIPT),
        }
    }

    pub(crate) fn from_xml_value(value: i32) -> Self {
        match value {
            v if v > 0 => Baseline::Superscript,
            v if v < 0 => Baseline::Subscript,
            _ => Baseline::Normal,
        }
    }
}

/// Which script slot a typeface is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFormat {
    #[default]
    Latin,
    EastAsian,
    ComplexScript,
}

impl FontFormat {
    pub(crate) fn element(self) -> &'static str {
        match self {
            FontFormat::Latin => "a:latin",
            FontFormat::EastAsian => "a:ea",
            FontFormat::ComplexScript => "a:cs",
        }
    }
}

/// Character formatting. `size` is in points and `character_spacing` in
/// points (signed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub name: String,
    pub format: FontFormat,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: Underline,
    pub strikethrough: bool,
    pub baseline: Baseline,
    pub color: Color,
    pub character_spacing: f64,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            name: "Calibri".to_string(),
            format: FontFormat::Latin,
            size: 10.0,
            bold: false,
            italic: false,
            underline: Underline::None,
            strikethrough: false,
            baseline: Baseline::Normal,
            color: Color::BLACK,
            character_spacing: 0.0,
        }
    }
}

impl Font {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn with_underline(mut self, underline: Underline) -> Self {
        self.underline = underline;
        self
    }

    pub fn with_strikethrough(mut self, strikethrough: bool) -> Self {
        self.strikethrough = strikethrough;
        self
    }

    pub fn with_baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_character_spacing(mut self, spacing: f64) -> Self {
        self.character_spacing = spacing;
        self
    }

    pub fn is_superscript(&self) -> bool {
        self.baseline == Baseline::Superscript
    }

    pub fn is_subscript(&self) -> bool {
        self.baseline == Baseline::Subscript
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_forms() {
        let color = Color::from_argb_hex("FFE06B20").unwrap();
        assert_eq!(color.argb, 0xFFE0_6B20);
        assert_eq!(color.rgb_hex(), "E06B20");
        assert_eq!(color.argb_hex(), "FFE06B20");
        assert_eq!(color.alpha(), 0xFF);
        assert_eq!(Color::from_rgb_hex("#00FF00"), Some(Color::from_argb(0xFF00_FF00)));
        assert_eq!(Color::from_argb_hex("E06B20"), None);
    }

    #[test]
    fn test_color_alpha_st() {
        assert_eq!(Color::BLACK.alpha_st(), 100_000);
        let half = Color::from_rgb_and_alpha_st("FF0000", Some(50_000)).unwrap();
        assert_eq!(half.alpha(), 128);
        assert_eq!(half.rgb_hex(), "FF0000");
    }

    #[test]
    fn test_font_builder_and_defaults() {
        let font = Font::new()
            .with_bold(true)
            .with_size(60.0)
            .with_color(Color::from_argb(0xFFE0_6B20));
        assert!(font.bold);
        assert_eq!(font.size, 60.0);
        assert_eq!(font.name, "Calibri");
        assert!(!font.is_superscript());
    }

    #[test]
    fn test_baseline_values() {
        assert_eq!(Baseline::Superscript.xml_value(), Some(30_000));
        assert_eq!(Baseline::Subscript.xml_value(), Some(-25_000));
        assert_eq!(Baseline::Normal.xml_value(), None);
        assert_eq!(Baseline::from_xml_value(-25_000), Baseline::Subscript);
    }

    #[test]
    fn test_style_values_are_independent_copies() {
        let original = Fill::solid(Color::RED);
        let mut copy = original.clone();
        copy.start_color = Color::WHITE;
        assert_eq!(original.start_color, Color::RED);
        assert_ne!(original, copy);
    }
}
