//! SVG output for both charts, for headless runs and reports.

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{BarChart, ChartSink, GeoMap};
use crate::config::{Coordinates, GeoBounds};

pub const SCORE_CHART_FILE: &str = "score_chart.svg";
pub const ROUTE_MAP_FILE: &str = "route_map.svg";

const BAR_WIDTH: f64 = 640.0;
const BAR_HEIGHT: f64 = 400.0;
const MAP_WIDTH: f64 = 800.0;
const MARGIN: f64 = 48.0;

/// Writes each chart as an SVG file into a directory.
pub struct SvgCharts {
    dir: PathBuf,
}

impl SvgCharts {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn score_chart_path(&self) -> PathBuf {
        self.dir.join(SCORE_CHART_FILE)
    }

    pub fn route_map_path(&self) -> PathBuf {
        self.dir.join(ROUTE_MAP_FILE)
    }
}

impl ChartSink for SvgCharts {
    fn bar_chart(&mut self, chart: &BarChart) -> Result<()> {
        let path = self.score_chart_path();
        save_svg(&path, &render_bar_chart(chart))?;
        tracing::info!(path = %path.display(), "wrote score chart");
        Ok(())
    }

    fn route_map(&mut self, map: &GeoMap) -> Result<()> {
        let path = self.route_map_path();
        save_svg(&path, &render_route_map(map))?;
        tracing::info!(path = %path.display(), "wrote route map");
        Ok(())
    }
}

/// Save an SVG document atomically
///
/// Creates the output directory if it doesn't exist.
fn save_svg(path: &Path, svg: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create chart directory at {}", dir.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(svg.as_bytes())
        .with_context(|| format!("Failed to write chart to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save chart to {}", path.display()))?;
    Ok(())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn header(out: &mut String, width: f64, height: f64, title: &str) {
    let _ = writeln!(
        out,
        "<svg version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"0 0 {w:.0} {h:.0}\" font-family=\"sans-serif\">",
        w = width,
        h = height
    );
    let _ = writeln!(out, "<rect width=\"100%\" height=\"100%\" fill=\"white\" />");
    let _ = writeln!(
        out,
        "<text x=\"{:.2}\" y=\"28\" font-size=\"18\" text-anchor=\"middle\">{}</text>",
        width / 2.0,
        escape(title)
    );
}

pub fn render_bar_chart(chart: &BarChart) -> String {
    let mut out = String::new();
    header(&mut out, BAR_WIDTH, BAR_HEIGHT, &chart.title);

    let plot_w = BAR_WIDTH - 2.0 * MARGIN;
    let plot_h = BAR_HEIGHT - 3.0 * MARGIN;
    let base_y = BAR_HEIGHT - MARGIN;
    let max = chart.bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
    let max = if max > 0.0 { max } else { 1.0 };
    let slot = plot_w / chart.bars.len().max(1) as f64;

    let _ = writeln!(
        out,
        "<line x1=\"{m:.2}\" y1=\"{y:.2}\" x2=\"{x2:.2}\" y2=\"{y:.2}\" stroke=\"black\" />",
        m = MARGIN,
        y = base_y,
        x2 = BAR_WIDTH - MARGIN
    );

    for (i, bar) in chart.bars.iter().enumerate() {
        let height = bar.value.max(0.0) / max * plot_h;
        let width = slot * 0.6;
        let x = MARGIN + slot * i as f64 + (slot - width) / 2.0;
        let y = base_y - height;
        let center = x + width / 2.0;
        let _ = writeln!(
            out,
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" />",
            x,
            y,
            width,
            height,
            bar.color.css()
        );
        let _ = writeln!(
            out,
            "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"14\" text-anchor=\"middle\">{}</text>",
            center,
            y - 6.0,
            escape(&bar.text)
        );
        let _ = writeln!(
            out,
            "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"14\" text-anchor=\"middle\">{}</text>",
            center,
            base_y + 20.0,
            escape(&bar.label)
        );
    }

    out.push_str("</svg>\n");
    out
}

fn mercator_y(lat: f64) -> f64 {
    let phi = lat.to_radians();
    (std::f64::consts::FRAC_PI_4 + phi / 2.0).tan().ln()
}

/// Projects coordinates into the map's pixel space.
struct Projection {
    bounds: GeoBounds,
    y_top: f64,
    y_bottom: f64,
    width: f64,
    height: f64,
}

impl Projection {
    fn new(bounds: GeoBounds, width: f64) -> Self {
        let y_top = mercator_y(bounds.lat_max);
        let y_bottom = mercator_y(bounds.lat_min);
        let lon_span = (bounds.lon_max - bounds.lon_min).to_radians();
        let height = width * (y_top - y_bottom) / lon_span;
        Projection {
            bounds,
            y_top,
            y_bottom,
            width,
            height,
        }
    }

    fn project(&self, c: Coordinates) -> (f64, f64) {
        let x = (c.lon - self.bounds.lon_min) / (self.bounds.lon_max - self.bounds.lon_min)
            * self.width;
        let y = (self.y_top - mercator_y(c.lat)) / (self.y_top - self.y_bottom) * self.height;
        (x + MARGIN, y + 2.0 * MARGIN)
    }
}

pub fn render_route_map(map: &GeoMap) -> String {
    let projection = Projection::new(map.bounds, MAP_WIDTH - 2.0 * MARGIN);
    let width = MAP_WIDTH;
    let height = projection.height + 3.0 * MARGIN;

    let mut out = String::new();
    header(&mut out, width, height, &map.title);
    let _ = writeln!(
        out,
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"#eef3f8\" stroke=\"#cccccc\" />",
        MARGIN,
        2.0 * MARGIN,
        projection.width,
        projection.height
    );

    out.push_str("<g class=\"routes\">\n");
    for segment in &map.segments {
        let (x1, y1) = projection.project(segment.from);
        let (x2, y2) = projection.project(segment.to);
        let _ = writeln!(
            out,
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{}\" stroke-opacity=\"{}\" />",
            x1,
            y1,
            x2,
            y2,
            segment.color.css(),
            segment.width,
            segment.opacity
        );
    }
    out.push_str("</g>\n");

    out.push_str("<g class=\"markers\">\n");
    for marker in &map.markers {
        if !map.bounds.contains(marker.at) {
            tracing::debug!(label = %marker.label, "marker outside map bounds");
        }
        let (x, y) = projection.project(marker.at);
        let r = marker.size as f64 / 2.0;
        let _ = writeln!(
            out,
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"{}\"><title>{label}</title></circle>",
            x,
            y,
            r,
            marker.color.css(),
            label = escape(&marker.label)
        );
        let _ = writeln!(
            out,
            "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"12\">{}</text>",
            x + r + 3.0,
            y + 4.0,
            escape(&marker.label)
        );
    }
    out.push_str("</g>\n");

    out.push_str("</svg>\n");
    out
}
