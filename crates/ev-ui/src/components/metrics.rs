use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use ev_core::formatting::{format_count, format_miles};
use ev_core::models::InsightSummary;

use crate::themes::Theme;

/// One labelled figure shown in a bordered box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricBox {
    pub title: String,
    pub value: String,
    /// Drawn with the highlight border colour.
    pub highlighted: bool,
}

impl MetricBox {
    fn new(title: &str, value: String, highlighted: bool) -> Self {
        Self {
            title: title.to_string(),
            value,
            highlighted,
        }
    }

    fn to_paragraph<'a>(&'a self, theme: &Theme) -> Paragraph<'a> {
        let border = if self.highlighted {
            theme.metric_highlight
        } else {
            theme.metric_border
        };
        Paragraph::new(Line::from(Span::styled(self.value.as_str(), theme.value)))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(Span::styled(format!(" {} ", self.title), theme.label)),
            )
    }
}

/// The metric boxes of the dashboard, left to right.
///
/// The total counts the full dataset; the average range and the top company
/// come from the sampled summary.
pub fn metric_boxes(total_rows: usize, summary: &InsightSummary) -> Vec<MetricBox> {
    vec![
        MetricBox::new(
            "Total EVs",
            format!("{} (Full Data)", format_count(total_rows as u64)),
            false,
        ),
        MetricBox::new(
            "Average Range",
            format!("{} (Sampled)", format_miles(summary.avg_range)),
            false,
        ),
        MetricBox::new(
            "Top Company",
            summary.top_make().unwrap_or("N/A").to_string(),
            true,
        ),
    ]
}

/// Render `boxes` side by side, splitting `area` evenly.
pub fn render_metrics(frame: &mut Frame, area: Rect, boxes: &[MetricBox], theme: &Theme) {
    if boxes.is_empty() {
        return;
    }
    let constraints: Vec<Constraint> = boxes
        .iter()
        .map(|_| Constraint::Ratio(1, boxes.len() as u32))
        .collect();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (metric, cell) in boxes.iter().zip(cells.iter()) {
        frame.render_widget(metric.to_paragraph(theme), *cell);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
