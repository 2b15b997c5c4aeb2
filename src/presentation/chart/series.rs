//! Chart series and data label models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{DataLabelPosition, MarkerSymbol};
use crate::presentation::style::{Fill, Font, Outline};

/// Marker drawn at each data point of line, scatter and radar series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub symbol: MarkerSymbol,
    /// Marker size (2..=72)
    pub size: u32,
    pub fill: Fill,
    pub border: Outline,
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            symbol: MarkerSymbol::None,
            size: 5,
            fill: Fill::default(),
            border: Outline::default(),
        }
    }
}

impl Marker {
    pub fn new(symbol: MarkerSymbol) -> Self {
        Self {
            symbol,
            ..Default::default()
        }
    }
}

/// Data label settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataLabels {
    /// Show legend key
    pub show_legend_key: bool,
    /// Show value
    pub show_value: bool,
    /// Show category name
    pub show_category_name: bool,
    /// Show series name
    pub show_series_name: bool,
    /// Show percentage (for pie charts)
    pub show_percentage: bool,
    /// Show leader lines (for pie charts)
    pub show_leader_lines: bool,
    /// Separator between label components
    pub separator: Option<String>,
}

impl Default for DataLabels {
    fn default() -> Self {
        Self {
            show_legend_key: false,
            show_value: true,
            show_category_name: false,
            show_series_name: false,
            show_percentage: false,
            show_leader_lines: true,
            separator: None,
        }
    }
}

impl DataLabels {
    /// Labels switched off entirely.
    pub fn hidden() -> Self {
        Self {
            show_value: false,
            show_leader_lines: false,
            ..Default::default()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.show_legend_key
            || self.show_value
            || self.show_category_name
            || self.show_series_name
            || self.show_percentage
    }
}

/// One data series.
///
/// `values` keeps insertion order: the key is the category label (or the X
/// value for scatter charts) and the value is the plotted number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub title: String,
    pub values: Vec<(String, f64)>,
    pub fill: Fill,
    pub outline: Option<Outline>,
    pub marker: Marker,
    /// Per-point fill overrides, keyed by point index.
    pub data_point_fills: BTreeMap<usize, Fill>,
    pub labels: DataLabels,
    pub label_position: Option<DataLabelPosition>,
    pub font: Font,
    pub smooth: bool,
    /// Number format code for the cached values.
    pub number_format: String,
}

impl Default for Series {
    fn default() -> Self {
        Self {
            title: "Series Title".to_string(),
            values: Vec::new(),
            fill: Fill::default(),
            outline: None,
            marker: Marker::default(),
            data_point_fills: BTreeMap::new(),
            labels: DataLabels::default(),
            label_position: None,
            font: Font::default().with_size(9.0),
            smooth: false,
            number_format: "General".to_string(),
        }
    }
}

impl Series {
    pub fn new<K, I>(title: impl Into<String>, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        Self {
            title: title.into(),
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ..Default::default()
        }
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_labels(mut self, labels: DataLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(k, _)| k.as_str())
    }

    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn data_point_fill(&self, index: usize) -> Option<&Fill> {
        self.data_point_fills.get(&index)
    }

    pub fn set_data_point_fill(&mut self, index: usize, fill: Fill) {
        self.data_point_fills.insert(index, fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::style::Color;

    #[test]
    fn test_series_keeps_insertion_order() {
        let series = Series::new("Sales", [("Mon", 12.0), ("Tue", 15.0), ("Wed", 13.0)]);
        assert_eq!(series.categories().collect::<Vec<_>>(), ["Mon", "Tue", "Wed"]);
        assert_eq!(series.numbers().sum::<f64>(), 40.0);
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_data_point_fill_override() {
        let mut series = Series::new("A", [("x", 1.0)]);
        assert!(series.data_point_fill(0).is_none());
        series.set_data_point_fill(0, Fill::solid(Color::RED));
        assert_eq!(series.data_point_fill(0).unwrap().start_color, Color::RED);
    }

    #[test]
    fn test_hidden_labels() {
        assert!(DataLabels::default().is_visible());
        assert!(!DataLabels::hidden().is_visible());
    }
}
