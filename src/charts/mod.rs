//! Chart rendering behind the [`ChartSink`] seam.
//!
//! Scoring never touches a renderer: [`build`] turns a finished ranking into
//! plain chart descriptions, and a sink decides how to show them.

pub mod build;
pub mod event;
pub mod svg;
pub mod terminal;
pub mod theme;

pub use build::{build_route_map, build_score_chart};
pub use svg::SvgCharts;
pub use terminal::TerminalCharts;

use anyhow::{Context, Result};

use crate::config::{Coordinates, Dataset, GeoBounds};
use crate::scoring::Ranking;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartColor {
    Blue,
    Gray,
    Green,
    Orange,
    Red,
    Purple,
}

impl ChartColor {
    /// Per-category palette, cycled when there are more categories than colors.
    pub const PALETTE: [ChartColor; 5] = [
        ChartColor::Blue,
        ChartColor::Red,
        ChartColor::Green,
        ChartColor::Purple,
        ChartColor::Orange,
    ];

    pub fn for_index(i: usize) -> ChartColor {
        Self::PALETTE[i % Self::PALETTE.len()]
    }

    pub fn css(&self) -> &'static str {
        match self {
            ChartColor::Blue => "#1f77b4",
            ChartColor::Gray => "#7f7f7f",
            ChartColor::Green => "#2ca02c",
            ChartColor::Orange => "#ff7f0e",
            ChartColor::Red => "#d62728",
            ChartColor::Purple => "#9467bd",
        }
    }
}

/// One bar: category, value and the text printed on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub text: String,
    pub color: ChartColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub at: Coordinates,
    pub label: String,
    pub color: ChartColor,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub from: Coordinates,
    pub to: Coordinates,
    pub color: ChartColor,
    pub width: f64,
    pub opacity: f64,
}

/// Point markers and straight line segments over a bounded region.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoMap {
    pub title: String,
    pub bounds: GeoBounds,
    pub markers: Vec<Marker>,
    pub segments: Vec<Segment>,
}

/// Something that can display charts. Each call returns once the chart has
/// been shown and dismissed, or written out.
pub trait ChartSink {
    fn bar_chart(&mut self, chart: &BarChart) -> Result<()>;
    fn route_map(&mut self, map: &GeoMap) -> Result<()>;
}

/// Build both charts for a finished run and hand them to `sink`, bar chart first.
pub fn render_all(sink: &mut dyn ChartSink, ranking: &Ranking, dataset: &Dataset) -> Result<()> {
    let scores = build_score_chart(ranking);
    sink.bar_chart(&scores).context("Failed to render score chart")?;

    let map = build_route_map(dataset, ranking)?;
    sink.route_map(&map).context("Failed to render route map")?;
    Ok(())
}
