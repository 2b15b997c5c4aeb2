//! Paragraph-structured text: the content of text boxes, auto shapes, table
//! cells and notes.

use serde::{Deserialize, Serialize};

use super::style::{Alignment, Color, Font};

/// Target of a click on a run or shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HyperlinkTarget {
    /// External URL (written as an `External` relationship).
    Url(String),
    /// Zero-based slide index inside the same presentation.
    Slide(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperlink {
    pub target: HyperlinkTarget,
    pub tooltip: Option<String>,
}

impl Hyperlink {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            target: HyperlinkTarget::Url(url.into()),
            tooltip: None,
        }
    }

    pub fn slide(index: usize) -> Self {
        Self {
            target: HyperlinkTarget::Slide(index),
            tooltip: None,
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}

/// A span of uniformly formatted text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    pub font: Font,
    pub hyperlink: Option<Hyperlink>,
    pub language: Option<String>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    pub fn with_hyperlink(mut self, hyperlink: Hyperlink) -> Self {
        self.hyperlink = Some(hyperlink);
        self
    }

    pub fn font_mut(&mut self) -> &mut Font {
        &mut self.font
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TextElement {
    Run(Run),
    /// Soft line break inside a paragraph (`a:br`).
    Break(Font),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NumberingStyle {
    #[default]
    ArabicPeriod,
    ArabicParenR,
    AlphaLcPeriod,
    AlphaUcPeriod,
    RomanLcPeriod,
    RomanUcPeriod,
}

impl NumberingStyle {
    pub(crate) fn xml_value(self) -> &'static str {
        match self {
            NumberingStyle::ArabicPeriod => "arabicPeriod",
            NumberingStyle::ArabicParenR => "arabicParenR",
            NumberingStyle::AlphaLcPeriod => "alphaLcPeriod",
            NumberingStyle::AlphaUcPeriod => "alphaUcPeriod",
            NumberingStyle::RomanLcPeriod => "romanLcPeriod",
            NumberingStyle::RomanUcPeriod => "romanUcPeriod",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "arabicParenR" => NumberingStyle::ArabicParenR,
            "alphaLcPeriod" => NumberingStyle::AlphaLcPeriod,
            "alphaUcPeriod" => NumberingStyle::AlphaUcPeriod,
            "romanLcPeriod" => NumberingStyle::RomanLcPeriod,
            "romanUcPeriod" => NumberingStyle::RomanUcPeriod,
            _ => NumberingStyle::ArabicPeriod,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Bullet {
    #[default]
    None,
    Character {
        char: String,
        font: String,
        color: Option<Color>,
    },
    Numeric {
        style: NumberingStyle,
        start_at: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    pub elements: Vec<TextElement>,
    pub alignment: Alignment,
    pub bullet: Bullet,
    /// Line spacing in percent of single spacing; 100 is the default.
    pub line_spacing: Option<f64>,
    /// Space before and after, in points.
    pub space_before: Option<f64>,
    pub space_after: Option<f64>,
    /// Font applied to runs created through [`Paragraph::create_text_run`].
    pub font: Font,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_text_run(&mut self, text: impl Into<String>) -> &mut Run {
        let run = Run::new(text).with_font(self.font.clone());
        self.elements.push(TextElement::Run(run));
        match self.elements.last_mut() {
            Some(TextElement::Run(run)) => run,
            _ => unreachable!("a run was just pushed"),
        }
    }

    pub fn create_break(&mut self) {
        self.elements.push(TextElement::Break(self.font.clone()));
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.elements.iter().filter_map(|e| match e {
            TextElement::Run(run) => Some(run),
            TextElement::Break(_) => None,
        })
    }

    /// Plain text with breaks rendered as `\n`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for element in &self.elements {
            match element {
                TextElement::Run(run) => out.push_str(&run.text),
                TextElement::Break(_) => out.push('\n'),
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Autofit {
    #[default]
    None,
    /// Shrink text on overflow (`a:normAutofit`).
    Normal,
    /// Resize the shape to fit its text (`a:spAutoFit`).
    Shape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextWrap {
    #[default]
    Square,
    None,
}

/// Body text insets in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for Insets {
    fn default() -> Self {
        Self {
            left: 7.2,
            top: 3.6,
            right: 7.2,
            bottom: 3.6,
        }
    }
}

/// A text body. Always holds at least one paragraph, the active one being
/// the last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    pub paragraphs: Vec<Paragraph>,
    pub autofit: Autofit,
    pub wrap: TextWrap,
    pub columns: u32,
    pub insets: Insets,
    pub vertical: bool,
}

impl Default for RichText {
    fn default() -> Self {
        Self {
            paragraphs: vec![Paragraph::default()],
            autofit: Autofit::None,
            wrap: TextWrap::Square,
            columns: 1,
            insets: Insets::default(),
            vertical: false,
        }
    }
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text body with one paragraph holding `text` as a single run.
    pub fn from_text(text: impl Into<String>) -> Self {
        let mut rich = Self::default();
        rich.create_text_run(text);
        rich
    }

    pub fn active_paragraph(&mut self) -> &mut Paragraph {
        if self.paragraphs.is_empty() {
            self.paragraphs.push(Paragraph::default());
        }
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    /// Start a new paragraph carrying over the active paragraph's alignment
    /// and font.
    pub fn create_paragraph(&mut self) -> &mut Paragraph {
        let previous = self.active_paragraph();
        let paragraph = Paragraph {
            alignment: previous.alignment.clone(),
            font: previous.font.clone(),
            ..Default::default()
        };
        self.paragraphs.push(paragraph);
        self.active_paragraph()
    }

    pub fn create_text_run(&mut self, text: impl Into<String>) -> &mut Run {
        self.active_paragraph().create_text_run(text)
    }

    pub fn create_break(&mut self) {
        self.active_paragraph().create_break();
    }

    /// Plain text, paragraphs joined by `\n`.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_inherit_paragraph_font() {
        let mut text = RichText::new();
        text.active_paragraph().font = Font::new().with_size(24.0);
        let run = text.create_text_run("Hello");
        run.font_mut().bold = true;
        let run = &text.paragraphs[0].runs().next().unwrap();
        assert_eq!(run.font.size, 24.0);
        assert!(run.font.bold);
    }

    #[test]
    fn test_text_joins_paragraphs_and_breaks() {
        let mut text = RichText::from_text("one");
        text.create_break();
        text.create_text_run("two");
        text.create_paragraph().create_text_run("three");
        assert_eq!(text.text(), "one\ntwo\nthree");
        assert_eq!(text.paragraphs.len(), 2);
    }

    #[test]
    fn test_new_paragraph_keeps_alignment() {
        let mut text = RichText::new();
        text.active_paragraph().alignment.horizontal =
            crate::presentation::style::HorizontalAlignment::Center;
        let next = text.create_paragraph();
        assert_eq!(
            next.alignment.horizontal,
            crate::presentation::style::HorizontalAlignment::Center
        );
        assert!(next.elements.is_empty());
    }
}
