//! Document metadata and presentation-level viewing properties.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};

/// A custom document property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// String value (lpwstr in OOXML)
    String(String),
    /// 32-bit signed integer (i4 in OOXML)
    Integer(i32),
    /// 64-bit floating point (r8 in OOXML)
    Double(f64),
    /// Boolean value (bool in OOXML)
    Boolean(bool),
    /// Date value (filetime in OOXML, written as W3C date-time)
    Date(DateTime<Utc>),
}

impl PropertyValue {
    /// Get the OOXML element name for this property type.
    pub(crate) fn element_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "lpwstr",
            PropertyValue::Integer(_) => "i4",
            PropertyValue::Double(_) => "r8",
            PropertyValue::Boolean(_) => "bool",
            PropertyValue::Date(_) => "filetime",
        }
    }

    pub(crate) fn to_xml_string(&self) -> String {
        match self {
            PropertyValue::String(s) => s.clone(),
            PropertyValue::Integer(i) => i.to_string(),
            PropertyValue::Double(d) => d.to_string(),
            PropertyValue::Boolean(b) => b.to_string(),
            PropertyValue::Date(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Parse a property value from its `vt:` element name and text.
    pub(crate) fn from_xml_string(element: &str, text: &str) -> Result<Self> {
        let invalid = |e: &dyn std::fmt::Display| {
            Error::InvalidPackage(format!("invalid custom property {element} value '{text}': {e}"))
        };
        match element {
            "lpwstr" | "lpstr" | "bstr" => Ok(PropertyValue::String(text.to_string())),
            "i1" | "i2" | "i4" | "int" | "ui1" | "ui2" => {
                text.parse().map(PropertyValue::Integer).map_err(|e| invalid(&e))
            },
            "r4" | "r8" | "decimal" => {
                text.parse().map(PropertyValue::Double).map_err(|e| invalid(&e))
            },
            "bool" => match text.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(PropertyValue::Boolean(true)),
                "false" | "0" => Ok(PropertyValue::Boolean(false)),
                _ => Err(invalid(&"expected a boolean")),
            },
            "filetime" | "date" => parse_w3c_datetime(text)
                .map(PropertyValue::Date)
                .ok_or_else(|| invalid(&"expected a W3C date-time")),
            other => Err(Error::UnsupportedFormat(format!(
                "custom property type vt:{other}"
            ))),
        }
    }
}

pub(crate) fn parse_w3c_datetime(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Core, extended and custom document properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentProperties {
    pub creator: String,
    pub last_modified_by: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub keywords: String,
    pub category: String,
    pub company: String,
    pub revision: Option<String>,
    pub status: Option<String>,
    pub custom: BTreeMap<String, PropertyValue>,
}

impl Default for DocumentProperties {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            creator: "Unknown Creator".to_string(),
            last_modified_by: "Unknown Creator".to_string(),
            created: now,
            modified: now,
            title: "Untitled Presentation".to_string(),
            description: String::new(),
            subject: String::new(),
            keywords: String::new(),
            category: String::new(),
            company: String::new(),
            revision: None,
            status: None,
            custom: BTreeMap::new(),
        }
    }
}

impl DocumentProperties {
    pub fn set_custom(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.custom.insert(name.into(), value);
    }

    pub fn custom(&self, name: &str) -> Option<&PropertyValue> {
        self.custom.get(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LastView {
    #[default]
    Slide,
    Notes,
    Handout,
    Outline,
    SlideMaster,
    SlideSorter,
}

impl LastView {
    pub(crate) fn xml_value(self) -> &'static str {
        match self {
            LastView::Slide => "sldView",
            LastView::Notes => "notesView",
            LastView::Handout => "handoutView",
            LastView::Outline => "outlineView",
            LastView::SlideMaster => "sldMasterView",
            LastView::SlideSorter => "sldSorterView",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Self {
        match value {
            "notesView" => LastView::Notes,
            "handoutView" => LastView::Handout,
            "outlineView" => LastView::Outline,
            "sldMasterView" => LastView::SlideMaster,
            "sldSorterView" => LastView::SlideSorter,
            _ => LastView::Slide,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlideshowType {
    #[default]
    Present,
    Browse,
    Kiosk,
}

impl SlideshowType {
    /// Child element of `p:showPr`.
    pub(crate) fn xml_value(self) -> &'static str {
        match self {
            SlideshowType::Present => "present",
            SlideshowType::Browse => "browse",
            SlideshowType::Kiosk => "kiosk",
        }
    }

    pub(crate) fn from_xml_value(value: &str) -> Option<Self> {
        match value {
            "present" => Some(SlideshowType::Present),
            "browse" => Some(SlideshowType::Browse),
            "kiosk" => Some(SlideshowType::Kiosk),
            _ => None,
        }
    }
}

/// Viewer state and slideshow settings (`presProps.xml`, `viewProps.xml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationProperties {
    /// Zoom factor, 1.0 being 100%.
    pub zoom: f64,
    pub last_view: LastView,
    pub slideshow_type: SlideshowType,
    pub loop_continuously: bool,
    pub comments_visible: bool,
    /// Written as the `_MarkAsFinal` custom property.
    pub mark_as_final: bool,
    /// Package thumbnail (`docProps/thumbnail.jpeg`).
    pub thumbnail: Option<Vec<u8>>,
}

impl Default for PresentationProperties {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            last_view: LastView::Slide,
            slideshow_type: SlideshowType::Present,
            loop_continuously: false,
            comments_visible: false,
            mark_as_final: false,
            thumbnail: None,
        }
    }
}

/// Slide size presets, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutPreset {
    #[default]
    Screen4x3,
    Screen16x9,
    Screen16x10,
    A4,
    Letter,
    Custom,
}

impl LayoutPreset {
    pub fn size(self) -> Option<(i64, i64)> {
        Some(match self {
            LayoutPreset::Screen4x3 => (9_144_000, 6_858_000),
            LayoutPreset::Screen16x9 => (9_144_000, 5_143_500),
            LayoutPreset::Screen16x10 => (9_144_000, 5_715_000),
            LayoutPreset::A4 => (9_906_000, 6_858_000),
            LayoutPreset::Letter => (9_144_000, 6_858_000),
            LayoutPreset::Custom => return None,
        })
    }

    pub(crate) fn xml_value(self) -> Option<&'static str> {
        match self {
            LayoutPreset::Screen4x3 => Some("screen4x3"),
            LayoutPreset::Screen16x9 => Some("screen16x9"),
            LayoutPreset::Screen16x10 => Some("screen16x10"),
            LayoutPreset::A4 => Some("A4"),
            LayoutPreset::Letter => Some("letter"),
            LayoutPreset::Custom => None,
        }
    }

    pub(crate) fn from_xml_value(value: Option<&str>) -> Self {
        match value {
            Some("screen4x3") => LayoutPreset::Screen4x3,
            Some("screen16x9") => LayoutPreset::Screen16x9,
            Some("screen16x10") => LayoutPreset::Screen16x10,
            Some("A4") => LayoutPreset::A4,
            Some("letter") => LayoutPreset::Letter,
            _ => LayoutPreset::Custom,
        }
    }
}

/// Slide dimensions (`p:sldSz`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLayout {
    pub preset: LayoutPreset,
    pub cx: i64,
    pub cy: i64,
}

impl Default for DocumentLayout {
    fn default() -> Self {
        Self::from_preset(LayoutPreset::Screen4x3)
    }
}

impl DocumentLayout {
    pub fn from_preset(preset: LayoutPreset) -> Self {
        let (cx, cy) = preset.size().unwrap_or((9_144_000, 6_858_000));
        Self { preset, cx, cy }
    }

    pub fn custom(cx: i64, cy: i64) -> Self {
        Self {
            preset: LayoutPreset::Custom,
            cx,
            cy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_property_value_xml_strings() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let value = PropertyValue::Date(date);
        assert_eq!(value.element_name(), "filetime");
        assert_eq!(value.to_xml_string(), "2024-03-01T12:30:00Z");
        assert_eq!(
            PropertyValue::from_xml_string("filetime", "2024-03-01T12:30:00Z").unwrap(),
            value
        );
        assert_eq!(
            PropertyValue::from_xml_string("bool", "1").unwrap(),
            PropertyValue::Boolean(true)
        );
        assert!(PropertyValue::from_xml_string("i4", "x").is_err());
        assert!(matches!(
            PropertyValue::from_xml_string("blob", ""),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_layout_presets() {
        let layout = DocumentLayout::from_preset(LayoutPreset::Screen16x9);
        assert_eq!((layout.cx, layout.cy), (9_144_000, 5_143_500));
        assert_eq!(LayoutPreset::from_xml_value(None), LayoutPreset::Custom);
        assert_eq!(DocumentLayout::custom(1, 2).preset.xml_value(), None);
    }
}
