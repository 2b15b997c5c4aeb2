//! Chart model embedded in chart shapes.
//!
//! A [`Chart`] owns a title, a legend, an optional 3D view and a
//! [`PlotArea`]. The plot area holds at most one [`ChartType`], and each
//! chart type owns its series. A chart without a type is allowed in memory;
//! writing it fails with [`Error::UndefinedChartType`](crate::Error).

pub mod axis;
pub mod legend;
pub mod series;
pub mod types;

use serde::{Deserialize, Serialize};

pub use axis::{Axis, Gridlines};
pub use legend::Legend;
pub use series::{DataLabels, Marker, Series};
pub use types::{
    BarDirection, DataLabelPosition, DisplayBlanks, Grouping, LegendPosition, MarkerSymbol,
    RadarStyle, ScatterStyle, TickLabelPosition, TickMark,
};

use crate::presentation::style::Font;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub visible: bool,
    pub text: String,
    pub font: Font,
}

impl Default for Title {
    fn default() -> Self {
        Self {
            visible: true,
            text: String::new(),
            font: Font::default().with_size(18.0),
        }
    }
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn hidden() -> Self {
        Self {
            visible: false,
            text: String::new(),
            ..Default::default()
        }
    }
}

/// 3D view settings (`c:view3D`). Rotations are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View3D {
    pub rotation_x: i32,
    pub rotation_y: u32,
    pub right_angle_axes: bool,
    pub perspective: u32,
    /// Height as a percentage of the base; `None` means automatic.
    pub height_percent: Option<u32>,
    pub depth_percent: u32,
}

impl Default for View3D {
    fn default() -> Self {
        Self {
            rotation_x: 0,
            rotation_y: 0,
            right_angle_axes: true,
            perspective: 30,
            height_percent: Some(100),
            depth_percent: 100,
        }
    }
}

/// The chart type held by a plot area, together with its series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartType {
    Bar {
        series: Vec<Series>,
        direction: BarDirection,
        grouping: Grouping,
        gap_width: u32,
        overlap: i32,
    },
    Bar3D {
        series: Vec<Series>,
        direction: BarDirection,
        grouping: Grouping,
        gap_width: u32,
    },
    Line {
        series: Vec<Series>,
        grouping: Grouping,
    },
    Pie {
        series: Vec<Series>,
        first_slice_angle: u32,
        explosion: u32,
    },
    Pie3D {
        series: Vec<Series>,
        explosion: u32,
    },
    Scatter {
        series: Vec<Series>,
        style: ScatterStyle,
    },
    Area {
        series: Vec<Series>,
        grouping: Grouping,
    },
    Doughnut {
        series: Vec<Series>,
        first_slice_angle: u32,
        hole_size: u32,
    },
    Radar {
        series: Vec<Series>,
        style: RadarStyle,
    },
}

impl ChartType {
    pub fn bar() -> Self {
        ChartType::Bar {
            series: Vec::new(),
            direction: BarDirection::Column,
            grouping: Grouping::Clustered,
            gap_width: 150,
            overlap: 0,
        }
    }

    pub fn bar3d() -> Self {
        ChartType::Bar3D {
            series: Vec::new(),
            direction: BarDirection::Column,
            grouping: Grouping::Clustered,
            gap_width: 150,
        }
    }

    pub fn line() -> Self {
        ChartType::Line {
            series: Vec::new(),
            grouping: Grouping::Standard,
        }
    }

    pub fn pie() -> Self {
        ChartType::Pie {
            series: Vec::new(),
            first_slice_angle: 0,
            explosion: 0,
        }
    }

    pub fn pie3d() -> Self {
        ChartType::Pie3D {
            series: Vec::new(),
            explosion: 0,
        }
    }

    pub fn scatter() -> Self {
        ChartType::Scatter {
            series: Vec::new(),
            style: ScatterStyle::LineMarker,
        }
    }

    pub fn area() -> Self {
        ChartType::Area {
            series: Vec::new(),
            grouping: Grouping::Standard,
        }
    }

    pub fn doughnut() -> Self {
        ChartType::Doughnut {
            series: Vec::new(),
            first_slice_angle: 0,
            hole_size: 50,
        }
    }

    pub fn radar() -> Self {
        ChartType::Radar {
            series: Vec::new(),
            style: RadarStyle::Marker,
        }
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series_mut().push(series);
        self
    }

    /// The DrawingML element that carries this type in `c:plotArea`.
    pub fn element_name(&self) -> &'static str {
        match self {
            ChartType::Bar { .. } => "barChart",
            ChartType::Bar3D { .. } => "bar3DChart",
            ChartType::Line { .. } => "lineChart",
            ChartType::Pie { .. } => "pieChart",
            ChartType::Pie3D { .. } => "pie3DChart",
            ChartType::Scatter { .. } => "scatterChart",
            ChartType::Area { .. } => "areaChart",
            ChartType::Doughnut { .. } => "doughnutChart",
            ChartType::Radar { .. } => "radarChart",
        }
    }

    pub fn series(&self) -> &[Series] {
        match self {
            ChartType::Bar { series, .. }
            | ChartType::Bar3D { series, .. }
            | ChartType::Line { series, .. }
            | ChartType::Pie { series, .. }
            | ChartType::Pie3D { series, .. }
            | ChartType::Scatter { series, .. }
            | ChartType::Area { series, .. }
            | ChartType::Doughnut { series, .. }
            | ChartType::Radar { series, .. } => series,
        }
    }

    pub fn series_mut(&mut self) -> &mut Vec<Series> {
        match self {
            ChartType::Bar { series, .. }
            | ChartType::Bar3D { series, .. }
            | ChartType::Line { series, .. }
            | ChartType::Pie { series, .. }
            | ChartType::Pie3D { series, .. }
            | ChartType::Scatter { series, .. }
            | ChartType::Area { series, .. }
            | ChartType::Doughnut { series, .. }
            | ChartType::Radar { series, .. } => series,
        }
    }

    /// Pie-like charts have no axes.
    pub fn has_axes(&self) -> bool {
        !matches!(
            self,
            ChartType::Pie { .. } | ChartType::Pie3D { .. } | ChartType::Doughnut { .. }
        )
    }

    pub fn is_3d(&self) -> bool {
        matches!(self, ChartType::Bar3D { .. } | ChartType::Pie3D { .. })
    }

    /// Scatter charts plot numbers on both axes.
    pub(crate) fn has_value_x_axis(&self) -> bool {
        matches!(self, ChartType::Scatter { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub chart_type: Option<ChartType>,
    pub axis_x: Axis,
    pub axis_y: Axis,
}

impl Default for PlotArea {
    fn default() -> Self {
        Self {
            chart_type: None,
            axis_x: Axis::new("Axis X"),
            axis_y: Axis::new("Axis Y"),
        }
    }
}

impl PlotArea {
    pub fn set_type(&mut self, chart_type: ChartType) {
        self.chart_type = Some(chart_type);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub title: Title,
    pub plot_area: PlotArea,
    pub legend: Legend,
    pub view3d: View3D,
    /// Embed a workbook with the data and reference it from the series.
    pub include_spreadsheet: bool,
    pub display_blanks_as: DisplayBlanks,
    pub rounded_corners: bool,
}

impl Default for Chart {
    fn default() -> Self {
        Self {
            title: Title::default(),
            plot_area: PlotArea::default(),
            legend: Legend::default(),
            view3d: View3D::default(),
            include_spreadsheet: true,
            display_blanks_as: DisplayBlanks::Zero,
            rounded_corners: false,
        }
    }
}

impl Chart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(chart_type: ChartType) -> Self {
        let mut chart = Self::default();
        chart.plot_area.set_type(chart_type);
        chart
    }

    pub fn chart_type(&self) -> Option<&ChartType> {
        self.plot_area.chart_type.as_ref()
    }

    pub fn chart_type_mut(&mut self) -> Option<&mut ChartType> {
        self.plot_area.chart_type.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_names() {
        assert_eq!(ChartType::bar().element_name(), "barChart");
        assert_eq!(ChartType::bar3d().element_name(), "bar3DChart");
        assert_eq!(ChartType::pie3d().element_name(), "pie3DChart");
        assert_eq!(ChartType::doughnut().element_name(), "doughnutChart");
        assert_eq!(ChartType::radar().element_name(), "radarChart");
    }

    #[test]
    fn test_series_belong_to_type() {
        let mut chart = Chart::with_type(ChartType::line());
        chart
            .chart_type_mut()
            .unwrap()
            .series_mut()
            .push(Series::new("S1", [("a", 1.0)]));
        assert_eq!(chart.chart_type().unwrap().series().len(), 1);
        assert!(chart.chart_type().unwrap().has_axes());
        assert!(!ChartType::pie().has_axes());
        assert!(ChartType::pie3d().is_3d());
    }

    #[test]
    fn test_untyped_chart_is_representable() {
        let chart = Chart::new();
        assert!(chart.chart_type().is_none());
        assert!(chart.include_spreadsheet);
    }
}
