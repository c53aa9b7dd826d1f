//! Paginated vehicle table with a numbered page footer.
//!
//! The table shows one page of the working dataset (Company, Model, Year,
//! Range). The footer lists page numbers around the current page, collapsing
//! long gaps into `…`, followed by `Page x of y` and the navigation hints.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use ev_core::models::VehicleRecord;
use ev_core::pagination::Pager;

use crate::themes::Theme;

/// Pages always shown at each end of the footer.
pub const MARGIN_PAGES: usize = 2;

/// Pages shown around the current one.
pub const PAGE_RANGE: usize = 5;

// ── Page window ───────────────────────────────────────────────────────────────

/// One entry of the footer page list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// Zero-based page index.
    Page(usize),
    /// A run of hidden pages.
    Break,
}

/// Page entries for a footer: `margin` pages at each end plus a window of
/// `range` pages around `current`, with every gap collapsed into a single
/// [`PageItem::Break`].
pub fn page_window(current: usize, count: usize, margin: usize, range: usize) -> Vec<PageItem> {
    if count == 0 {
        return Vec::new();
    }
    if count <= range.max(1) + 2 * margin {
        return (0..count).map(PageItem::Page).collect();
    }

    let current = current.min(count - 1);
    let start = current.saturating_sub(range / 2).min(count - range);
    let end = start + range;

    let mut items = Vec::new();
    let mut previous: Option<usize> = None;
    for index in 0..count {
        let visible = index < margin || index >= count - margin || (start..end).contains(&index);
        if !visible {
            continue;
        }
        if let Some(prev) = previous {
            if index > prev + 1 {
                items.push(PageItem::Break);
            }
        }
        items.push(PageItem::Page(index));
        previous = Some(index);
    }
    items
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// Render the rows of the selected page into `area`.
///
/// `first_row` is the dataset position of `rows[0]`, used to number the
/// block title.
pub fn render_vehicle_table(
    frame: &mut Frame,
    area: Rect,
    rows: &[VehicleRecord],
    first_row: usize,
    total_rows: usize,
    theme: &Theme,
) {
    let header_cells = ["Company", "Model", "Year", "Range"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(record.make.clone()),
                Cell::from(record.model.clone()),
                Cell::from(record.model_year.clone()),
                Cell::from(record.electric_range_text.clone())
                    .style(theme.range_style(record.electric_range)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(30),
        Constraint::Percentage(40),
        Constraint::Length(8),
        Constraint::Length(8),
    ];

    let title = if rows.is_empty() {
        " Vehicles ".to_string()
    } else {
        format!(
            " Vehicles {}-{} of {} ",
            first_row + 1,
            first_row + rows.len(),
            total_rows
        )
    };

    let table = Table::new(data_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(Span::styled(title, theme.header)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Footer ────────────────────────────────────────────────────────────────────

/// Text of the page position label, e.g. `Page 2 of 18,146`.
pub fn page_label(pager: &Pager) -> String {
    let count = pager.page_count();
    if count == 0 {
        return "Page 0 of 0".to_string();
    }
    format!(
        "Page {} of {}",
        pager.current() + 1,
        ev_core::formatting::format_count(count as u64)
    )
}

/// Build the footer line for `pager`; `jump_input` holds any digits typed
/// so far for a page jump.
pub fn footer_line<'a>(pager: &Pager, jump_input: &str, theme: &Theme) -> Line<'a> {
    let count = pager.page_count();
    let current = pager.current();
    let at_start = current == 0;
    let at_end = count == 0 || current + 1 >= count;

    let mut spans: Vec<Span> = Vec::new();
    spans.push(Span::styled(
        "← Previous ",
        if at_start { theme.dim } else { theme.label },
    ));

    for item in page_window(current, count, MARGIN_PAGES, PAGE_RANGE) {
        match item {
            PageItem::Page(index) if index == current => {
                spans.push(Span::styled(format!(" {} ", index + 1), theme.page_active));
            }
            PageItem::Page(index) => {
                spans.push(Span::styled(format!(" {} ", index + 1), theme.text));
            }
            PageItem::Break => spans.push(Span::styled(" … ", theme.dim)),
        }
    }

    spans.push(Span::styled(
        " Next →",
        if at_end { theme.dim } else { theme.label },
    ));
    spans.push(Span::styled("  │  ", theme.separator));
    spans.push(Span::styled(page_label(pager), theme.info));

    if jump_input.is_empty() {
        spans.push(Span::styled(
            "  (←/→ page, Home/End, digits+Enter jump, q quit)",
            theme.page_hint,
        ));
    } else {
        spans.push(Span::styled("  Go to page: ", theme.label));
        spans.push(Span::styled(format!("{jump_input}_"), theme.warning));
    }

    Line::from(spans)
}

/// Render the footer for `pager` into `area`.
pub fn render_footer(frame: &mut Frame, area: Rect, pager: &Pager, jump_input: &str, theme: &Theme) {
    frame.render_widget(Paragraph::new(footer_line(pager, jump_input, theme)), area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
