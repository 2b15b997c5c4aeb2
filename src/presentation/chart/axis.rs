//! Chart axis models.

use serde::{Deserialize, Serialize};

use super::types::{TickLabelPosition, TickMark};
use crate::presentation::style::{Font, Outline};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Gridlines {
    pub outline: Outline,
}

/// A category or value axis.
///
/// The X axis of bar, line, area and radar charts is written as `c:catAx`;
/// every other axis is a `c:valAx`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
    pub title_rotation: Option<f64>,
    pub visible: bool,
    pub number_format: String,
    pub min_bounds: Option<f64>,
    pub max_bounds: Option<f64>,
    pub major_unit: Option<f64>,
    pub minor_unit: Option<f64>,
    pub major_gridlines: Option<Gridlines>,
    pub minor_gridlines: Option<Gridlines>,
    pub major_tick_mark: TickMark,
    pub minor_tick_mark: TickMark,
    pub tick_label_position: TickLabelPosition,
    pub font: Font,
    pub outline: Outline,
    /// Plot max to min (`c:orientation val="maxMin"`).
    pub reversed: bool,
}

impl Axis {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            title_rotation: None,
            visible: true,
            number_format: String::new(),
            min_bounds: None,
            max_bounds: None,
            major_unit: None,
            minor_unit: None,
            major_gridlines: None,
            minor_gridlines: None,
            major_tick_mark: TickMark::None,
            minor_tick_mark: TickMark::None,
            tick_label_position: TickLabelPosition::NextTo,
            font: Font::default(),
            outline: Outline::default(),
            reversed: false,
        }
    }

    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_bounds = Some(min);
        self.max_bounds = Some(max);
        self
    }

    pub fn with_major_gridlines(mut self, gridlines: Gridlines) -> Self {
        self.major_gridlines = Some(gridlines);
        self
    }
}

impl Default for Axis {
    fn default() -> Self {
        Self::new("")
    }
}
