//! Top-makes bar chart and vehicles-by-year line chart.
//!
//! Chart contents are derived from the [`InsightSummary`] by pure functions
//! ([`top_makes_chart`], [`years_chart`]) and drawn with ratatui's
//! [`BarChart`] and [`Chart`] widgets.

use ratatui::{
    layout::Rect,
    style::Style,
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use ev_core::models::InsightSummary;

use crate::themes::Theme;

// ── Chart specs ───────────────────────────────────────────────────────────────

/// Labels with one integer value each, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub title: String,
    pub series: String,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn max_value(&self) -> u64 {
        self.values.iter().copied().max().unwrap_or(0)
    }
}

/// Categorical bar chart of the top makes, highest count first.
pub fn top_makes_chart(summary: &InsightSummary) -> ChartSpec {
    ChartSpec {
        title: format!("Top {} Companies", summary.top_makes.len()),
        series: "Count".to_string(),
        labels: summary.top_makes.iter().map(|m| m.make.clone()).collect(),
        values: summary.top_makes.iter().map(|m| m.count).collect(),
    }
}

/// Time-series line chart of vehicles per model year, ascending years.
pub fn years_chart(summary: &InsightSummary) -> ChartSpec {
    let years = summary.sorted_years();
    ChartSpec {
        title: "EVs by Year".to_string(),
        series: "EVs".to_string(),
        labels: years.iter().map(|(year, _)| year.to_string()).collect(),
        values: years.iter().map(|(_, count)| *count).collect(),
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Truncate `label` to at most `max_width` terminal columns, marking the cut
/// with `…`.
pub fn truncate_label(label: &str, max_width: usize) -> String {
    let width: usize = label.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max_width {
        return label.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn chart_block<'a>(spec: &ChartSpec, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(Span::styled(format!(" {} ", spec.title), theme.header))
}

fn render_empty(frame: &mut Frame, area: Rect, spec: &ChartSpec, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled("No data in sample", theme.dim)))
            .block(chart_block(spec, theme)),
        area,
    );
}

/// Draw `spec` as a vertical bar chart with one labelled bar per entry.
pub fn render_bar_chart(frame: &mut Frame, area: Rect, spec: &ChartSpec, theme: &Theme) {
    if spec.is_empty() {
        render_empty(frame, area, spec, theme);
        return;
    }

    let count = u16::try_from(spec.values.len()).unwrap_or(u16::MAX);
    let inner_width = area.width.saturating_sub(2);
    let bar_gap = 1u16;
    let bar_width = (inner_width.saturating_sub(bar_gap * count.saturating_sub(1)) / count).max(1);

    let bars: Vec<Bar> = spec
        .labels
        .iter()
        .zip(spec.values.iter())
        .map(|(label, value)| {
            Bar::default()
                .value(*value)
                .label(Line::from(truncate_label(label, bar_width as usize)))
                .style(theme.chart_bar)
                .value_style(theme.value)
        })
        .collect();

    let chart = BarChart::default()
        .block(chart_block(spec, theme))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(bar_gap)
        .bar_style(theme.chart_bar)
        .label_style(theme.label);

    frame.render_widget(chart, area);
}

/// Draw `spec` as a line chart, one point per label, x axis in label order.
pub fn render_line_chart(frame: &mut Frame, area: Rect, spec: &ChartSpec, theme: &Theme) {
    if spec.is_empty() {
        render_empty(frame, area, spec, theme);
        return;
    }

    let points: Vec<(f64, f64)> = spec
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v as f64))
        .collect();

    let x_max = (points.len().saturating_sub(1)).max(1) as f64;
    let y_max = (spec.max_value().max(1) as f64 * 1.1).ceil();

    let x_labels: Vec<Span> = axis_labels(&spec.labels)
        .into_iter()
        .map(|l| Span::styled(l, theme.chart_axis))
        .collect();
    let y_labels: Vec<Span> = [0.0, y_max / 2.0, y_max]
        .iter()
        .map(|v| Span::styled(format!("{:.0}", v), theme.chart_axis))
        .collect();

    let dataset = Dataset::default()
        .name(spec.series.clone())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.chart_line)
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(chart_block(spec, theme))
        .x_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, y_max])
                .labels(y_labels),
        )
        .style(Style::default());

    frame.render_widget(chart, area);
}

/// First, middle and last label (deduplicated) for the x axis.
fn axis_labels(labels: &[String]) -> Vec<String> {
    match labels.len() {
        0 => Vec::new(),
        1 | 2 => labels.to_vec(),
        n => vec![
            labels[0].clone(),
            labels[n / 2].clone(),
            labels[n - 1].clone(),
        ],
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
