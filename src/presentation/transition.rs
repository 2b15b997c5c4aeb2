//! Slide transition effects.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::common::Result;

/// Transition direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionDirection {
    /// Left to right
    Left,
    /// Right to left
    Right,
    /// Top to bottom
    Up,
    /// Bottom to top
    Down,
    /// Horizontal (left and right)
    Horizontal,
    /// Vertical (up and down)
    Vertical,
    /// From the edges inward
    In,
    /// From the center outward
    Out,
}

impl TransitionDirection {
    fn xml_value(self) -> &'static str {
        match self {
            TransitionDirection::Left => "l",
            TransitionDirection::Right => "r",
            TransitionDirection::Up => "u",
            TransitionDirection::Down => "d",
            TransitionDirection::Horizontal => "horz",
            TransitionDirection::Vertical => "vert",
            TransitionDirection::In => "in",
            TransitionDirection::Out => "out",
        }
    }

    fn from_xml_value(value: Option<&str>, default: Self) -> Self {
        match value {
            Some("l") => TransitionDirection::Left,
            Some("r") => TransitionDirection::Right,
            Some("u") => TransitionDirection::Up,
            Some("d") => TransitionDirection::Down,
            Some("horz") => TransitionDirection::Horizontal,
            Some("vert") => TransitionDirection::Vertical,
            Some("in") => TransitionDirection::In,
            Some("out") => TransitionDirection::Out,
            _ => default,
        }
    }
}

/// Slide transition type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionType {
    /// Cut transition (instant change)
    Cut,
    /// Fade through black
    Fade,
    /// Push transition (`l`, `r`, `u`, `d`)
    Push(TransitionDirection),
    /// Wipe transition (`l`, `r`, `u`, `d`)
    Wipe(TransitionDirection),
    /// Cover transition (`l`, `r`, `u`, `d`)
    Cover(TransitionDirection),
    /// Pull (uncover) transition (`l`, `r`, `u`, `d`)
    Pull(TransitionDirection),
    /// Split: orientation (`horz`, `vert`) and direction (`in`, `out`)
    Split(TransitionDirection, TransitionDirection),
    /// Blinds (`horz`, `vert`)
    Blinds(TransitionDirection),
    /// Checkerboard (`horz`, `vert`)
    Checker(TransitionDirection),
    /// Random bars (`horz`, `vert`)
    RandomBars(TransitionDirection),
    /// Zoom (`in`, `out`)
    Zoom(TransitionDirection),
    Dissolve,
    Circle,
    Diamond,
    Plus,
    Wedge,
    Newsflash,
    /// Random transition (PowerPoint picks)
    Random,
}

impl TransitionType {
    fn write_xml(&self, xml: &mut String) -> std::fmt::Result {
        match self {
            TransitionType::Cut => xml.push_str("<p:cut/>"),
            TransitionType::Fade => xml.push_str("<p:fade/>"),
            TransitionType::Push(dir) => write!(xml, r#"<p:push dir="{}"/>"#, dir.xml_value())?,
            TransitionType::Wipe(dir) => write!(xml, r#"<p:wipe dir="{}"/>"#, dir.xml_value())?,
            TransitionType::Cover(dir) => write!(xml, r#"<p:cover dir="{}"/>"#, dir.xml_value())?,
            TransitionType::Pull(dir) => write!(xml, r#"<p:pull dir="{}"/>"#, dir.xml_value())?,
            TransitionType::Split(orient, dir) => write!(
                xml,
                r#"<p:split orient="{}" dir="{}"/>"#,
                orient.xml_value(),
                dir.xml_value()
            )?,
            TransitionType::Blinds(dir) => write!(xml, r#"<p:blinds dir="{}"/>"#, dir.xml_value())?,
            TransitionType::Checker(dir) => {
                write!(xml, r#"<p:checker dir="{}"/>"#, dir.xml_value())?
            },
            TransitionType::RandomBars(dir) => {
                write!(xml, r#"<p:randomBar dir="{}"/>"#, dir.xml_value())?
            },
            TransitionType::Zoom(dir) => write!(xml, r#"<p:zoom dir="{}"/>"#, dir.xml_value())?,
            TransitionType::Dissolve => xml.push_str("<p:dissolve/>"),
            TransitionType::Circle => xml.push_str("<p:circle/>"),
            TransitionType::Diamond => xml.push_str("<p:diamond/>"),
            TransitionType::Plus => xml.push_str("<p:plus/>"),
            TransitionType::Wedge => xml.push_str("<p:wedge/>"),
            TransitionType::Newsflash => xml.push_str("<p:newsflash/>"),
            TransitionType::Random => xml.push_str("<p:random/>"),
        }
        Ok(())
    }

    /// Map a `p:transition` child element to a transition type.
    pub(crate) fn from_element(
        local_name: &str,
        dir: Option<&str>,
        orient: Option<&str>,
    ) -> Option<Self> {
        use TransitionDirection as D;
        Some(match local_name {
            "cut" => TransitionType::Cut,
            "fade" => TransitionType::Fade,
            "push" => TransitionType::Push(D::from_xml_value(dir, D::Left)),
            "wipe" => TransitionType::Wipe(D::from_xml_value(dir, D::Left)),
            "cover" => TransitionType::Cover(D::from_xml_value(dir, D::Left)),
            "pull" => TransitionType::Pull(D::from_xml_value(dir, D::Left)),
            "split" => TransitionType::Split(
                D::from_xml_value(orient, D::Horizontal),
                D::from_xml_value(dir, D::Out),
            ),
            "blinds" => TransitionType::Blinds(D::from_xml_value(dir, D::Horizontal)),
            "checker" => TransitionType::Checker(D::from_xml_value(dir, D::Horizontal)),
            "randomBar" => TransitionType::RandomBars(D::from_xml_value(dir, D::Horizontal)),
            "zoom" => TransitionType::Zoom(D::from_xml_value(dir, D::In)),
            "dissolve" => TransitionType::Dissolve,
            "circle" => TransitionType::Circle,
            "diamond" => TransitionType::Diamond,
            "plus" => TransitionType::Plus,
            "wedge" => TransitionType::Wedge,
            "newsflash" => TransitionType::Newsflash,
            "random" => TransitionType::Random,
            _ => return None,
        })
    }
}

/// Transition speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransitionSpeed {
    /// Slow transition (1500ms)
    Slow,
    /// Medium transition (1000ms)
    #[default]
    Medium,
    /// Fast transition (500ms)
    Fast,
}

impl TransitionSpeed {
    /// Get the duration in milliseconds.
    pub fn duration_ms(&self) -> u32 {
        match self {
            TransitionSpeed::Slow => 1500,
            TransitionSpeed::Medium => 1000,
            TransitionSpeed::Fast => 500,
        }
    }

    pub(crate) fn xml_value(self) -> &'static str {
        match self {
            TransitionSpeed::Slow => "slow",
            TransitionSpeed::Medium => "med",
            TransitionSpeed::Fast => "fast",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "slow" => TransitionSpeed::Slow,
            "fast" => TransitionSpeed::Fast,
            _ => TransitionSpeed::Medium,
        }
    }
}

/// Transition played when a slide (or every slide using a layout or master)
/// appears.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// `None` keeps only the timing settings.
    pub transition_type: Option<TransitionType>,
    pub speed: TransitionSpeed,
    pub advance_on_click: bool,
    /// Auto-advance after this many milliseconds.
    pub advance_after_ms: Option<u32>,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            transition_type: None,
            speed: TransitionSpeed::Medium,
            advance_on_click: true,
            advance_after_ms: None,
        }
    }
}

impl Transition {
    pub fn new(transition_type: TransitionType) -> Self {
        Self {
            transition_type: Some(transition_type),
            ..Default::default()
        }
    }

    pub fn with_speed(mut self, speed: TransitionSpeed) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_advance_on_click(mut self, advance: bool) -> Self {
        self.advance_on_click = advance;
        self
    }

    pub fn with_advance_after_ms(mut self, delay_ms: u32) -> Self {
        self.advance_after_ms = Some(delay_ms);
        self
    }

    pub(crate) fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(128);
        write!(xml, r#"<p:transition spd="{}""#, self.speed.xml_value())?;
        if !self.advance_on_click {
            xml.push_str(r#" advClick="0""#);
        }
        if let Some(ms) = self.advance_after_ms {
            write!(xml, r#" advTm="{ms}""#)?;
        }
        match &self.transition_type {
            Some(kind) => {
                xml.push('>');
                kind.write_xml(&mut xml)?;
                xml.push_str("</p:transition>");
            },
            None => xml.push_str("/>"),
        }
        Ok(xml)
    }
}
