//! Chart legend model.

use serde::{Deserialize, Serialize};

use super::types::LegendPosition;
use crate::presentation::style::{Alignment, Border, Fill, Font};

/// Chart legend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    /// Whether the legend is drawn at all
    pub visible: bool,
    /// Legend position
    pub position: LegendPosition,
    /// Manual position as fractions of the chart area, when set
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
    pub font: Font,
    pub border: Border,
    pub fill: Fill,
    pub alignment: Alignment,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            visible: true,
            position: LegendPosition::Right,
            offset_x: 0.0,
            offset_y: 0.0,
            width: 0.0,
            height: 0.0,
            font: Font::default(),
            border: Border::default(),
            fill: Fill::default(),
            alignment: Alignment::default(),
        }
    }
}

impl Legend {
    pub fn new(position: LegendPosition) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Default::default()
        }
    }

    pub(crate) fn has_manual_layout(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}
