use anyhow::{bail, Context, Result};
use ratatui::prelude::*;
use ratatui::symbols;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Map, MapResolution, Points};
use ratatui::widgets::{Bar as TuiBar, BarChart as TuiBarChart, BarGroup, Block, Paragraph};
use ratatui::DefaultTerminal;
use std::io::IsTerminal;

use super::event::{self, Event};
use super::theme::{resolve_theme, ThemeColors};
use super::{BarChart, ChartSink, GeoMap};

// Bar values are integers; keep three decimals of the score
const BAR_SCALE: f64 = 1000.0;
// Markers at least this size get a bold label
const PROMINENT_MARKER: u32 = 12;

/// Draws charts full-screen in the terminal. Each chart stays up until the
/// user closes it.
pub struct TerminalCharts {
    colors: ThemeColors,
}

impl TerminalCharts {
    pub fn new() -> Self {
        Self {
            colors: ThemeColors::for_theme(resolve_theme()),
        }
    }

    fn show<F>(&self, mut draw: F) -> Result<()>
    where
        F: FnMut(&mut Frame),
    {
        if !std::io::stdout().is_terminal() {
            bail!("stdout is not a terminal");
        }
        let mut terminal = match ratatui::try_init() {
            Ok(terminal) => terminal,
            Err(e) => {
                // Undo raw mode if it was already enabled
                ratatui::restore();
                return Err(e).context("Failed to initialize terminal");
            }
        };

        // Buffer log output while the chart owns the screen
        crate::stderr_buffer::activate();
        let result = event_loop(&mut terminal, &mut draw);

        ratatui::restore();
        for msg in crate::stderr_buffer::drain() {
            eprintln!("{}", msg);
        }
        result
    }
}

impl Default for TerminalCharts {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartSink for TerminalCharts {
    fn bar_chart(&mut self, chart: &BarChart) -> Result<()> {
        tracing::info!(title = %chart.title, "showing bar chart");
        let colors = self.colors.clone();
        self.show(|frame| draw_bar_chart(frame, chart, &colors))
    }

    fn route_map(&mut self, map: &GeoMap) -> Result<()> {
        tracing::info!(title = %map.title, "showing route map");
        let colors = self.colors.clone();
        self.show(|frame| draw_route_map(frame, map, &colors))
    }
}

fn event_loop<F>(terminal: &mut DefaultTerminal, draw: &mut F) -> Result<()>
where
    F: FnMut(&mut Frame),
{
    loop {
        terminal
            .draw(|frame| draw(frame))
            .context("Failed to draw chart")?;
        if event::next().context("Failed to read terminal event")? == Event::Close {
            return Ok(());
        }
    }
}

/// Title(1) + chart(fill) + status(1)
fn chart_layout(area: Rect) -> [Rect; 3] {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

pub fn draw_bar_chart(frame: &mut Frame, chart: &BarChart, colors: &ThemeColors) {
    let area = frame.area();
    if area.height < 6 || area.width < 20 {
        let message = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(message, area);
        return;
    }
    let [title_area, body, status_area] = chart_layout(area);

    render_title(frame, title_area, &chart.title, colors);

    let bars: Vec<TuiBar> = chart
        .bars
        .iter()
        .map(|bar| {
            let color = colors.chart_color(bar.color);
            TuiBar::default()
                .value(scaled(bar.value))
                .label(Line::from(bar.label.clone()))
                .text_value(bar.text.clone())
                .style(Style::new().fg(color))
                .value_style(colors.bar_text_style.bg(color))
        })
        .collect();

    let max = chart.bars.iter().map(|b| scaled(b.value)).max().unwrap_or(0).max(1);
    let count = chart.bars.len().max(1) as u16;
    let bar_width = (body.width.saturating_sub(2) / count).saturating_sub(2).clamp(3, 20);

    let widget = TuiBarChart::default()
        .block(Block::bordered().border_style(Style::new().fg(colors.border)))
        .bar_width(bar_width)
        .bar_gap(2)
        .max(max)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(widget, body);

    render_status_bar(frame, status_area, colors);
}

pub fn draw_route_map(frame: &mut Frame, map: &GeoMap, colors: &ThemeColors) {
    let area = frame.area();
    if area.height < 6 || area.width < 20 {
        let message = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(message, area);
        return;
    }
    let [title_area, body, status_area] = chart_layout(area);

    render_title(frame, title_area, &map.title, colors);

    let bounds = map.bounds;
    let canvas = Canvas::default()
        .block(Block::bordered().border_style(Style::new().fg(colors.border)))
        .marker(symbols::Marker::Braille)
        .x_bounds([bounds.lon_min, bounds.lon_max])
        .y_bounds([bounds.lat_min, bounds.lat_max])
        .paint(|ctx| {
            ctx.draw(&Map {
                color: colors.map_outline,
                resolution: MapResolution::High,
            });
            ctx.layer();

            for segment in &map.segments {
                ctx.draw(&CanvasLine::new(
                    segment.from.lon,
                    segment.from.lat,
                    segment.to.lon,
                    segment.to.lat,
                    colors.chart_color(segment.color),
                ));
            }
            ctx.layer();

            for marker in &map.markers {
                let color = colors.chart_color(marker.color);
                ctx.draw(&Points {
                    coords: &[(marker.at.lon, marker.at.lat)],
                    color,
                });
                let style = if marker.size >= PROMINENT_MARKER {
                    Style::new().fg(color).bold()
                } else {
                    colors.label_style
                };
                let label = Span::styled(format!(" {}", marker.label), style);
                ctx.print(marker.at.lon, marker.at.lat, label);
            }
        });
    frame.render_widget(canvas, body);

    render_status_bar(frame, status_area, colors);
}

fn render_title(frame: &mut Frame, area: Rect, title: &str, colors: &ThemeColors) {
    let line = Line::from(Span::styled(title.to_string(), colors.title_style));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, colors: &ThemeColors) {
    let key = Style::new().fg(colors.status_key_color);
    let line = Line::from(vec![
        Span::styled("q", key),
        Span::raw("/"),
        Span::styled("Esc", key),
        Span::raw("/"),
        Span::styled("Enter", key),
        Span::styled(":close", Style::new().fg(colors.muted)),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::new().bg(colors.status_bar_bg)),
        area,
    );
}

fn scaled(value: f64) -> u64 {
    (value.max(0.0) * BAR_SCALE).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{build_route_map, build_score_chart};
    use crate::config::reference_dataset;
    use crate::scoring::score_dataset;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    fn buffer_text(buffer: &Buffer) -> String {
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_scaled() {
        assert_eq!(scaled(0.7), 700);
        assert_eq!(scaled(0.0), 0);
        assert_eq!(scaled(-1.0), 0);
    }

    #[test]
    fn test_draw_bar_chart() {
        let ranking = score_dataset(&reference_dataset()).unwrap();
        let chart = build_score_chart(&ranking);
        let colors = ThemeColors::dark();

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| draw_bar_chart(frame, &chart, &colors))
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Final score: Recife vs. Salvador"));
        assert!(text.contains("Recife"));
        assert!(text.contains("Salvador"));
        assert!(text.contains(":close"));
    }

    #[test]
    fn test_draw_route_map() {
        let dataset = reference_dataset();
        let ranking = score_dataset(&dataset).unwrap();
        let map = build_route_map(&dataset, &ranking).unwrap();
        let colors = ThemeColors::light();

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|frame| draw_route_map(frame, &map, &colors))
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Road network from Recife (green)"));
        assert!(text.contains(":close"));
    }

    #[test]
    fn test_bar_chart_without_terminal_fails() {
        // Only meaningful when the test runner's stdout is redirected
        if std::io::stdout().is_terminal() {
            return;
        }
        let chart = build_score_chart(&score_dataset(&reference_dataset()).unwrap());
        let mut charts = TerminalCharts {
            colors: ThemeColors::dark(),
        };
        let err = charts.bar_chart(&chart).unwrap_err();
        assert!(err.to_string().contains("not a terminal"));
    }

    #[test]
    fn test_tiny_terminal() {
        let ranking = score_dataset(&reference_dataset()).unwrap();
        let chart = build_score_chart(&ranking);
        let colors = ThemeColors::dark();

        let mut terminal = Terminal::new(TestBackend::new(18, 4)).unwrap();
        terminal
            .draw(|frame| draw_bar_chart(frame, &chart, &colors))
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Terminal"));
    }
}
