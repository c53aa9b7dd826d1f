use crate::themes::Theme;
use ev_core::formatting::format_count;
use ratatui::text::{Line, Span};

/// Decorative marks placed either side of the dashboard title.
pub const BOLTS: &str = "⚡ ⚡";

/// Dashboard header rendering four lines:
///
/// 1. Title with decorations (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Source and row count in `[ source | N rows ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Where the dataset was loaded from.
    pub source: &'a str,
    /// Full dataset length, `None` while loading.
    pub total_rows: Option<usize>,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, total_rows: Option<usize>, theme: &'a Theme) -> Self {
        Self {
            source,
            total_rows,
            theme,
        }
    }

    /// Render the header as a `Vec<Line>` containing exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);
        let rows = match self.total_rows {
            Some(n) => format!("{} rows", format_count(n as u64)),
            None => "loading".to_string(),
        };

        vec![
            Line::from(vec![
                Span::styled(BOLTS, self.theme.header_accent),
                Span::styled(" EV ANALYTICS DASHBOARD ", self.theme.header),
                Span::styled(BOLTS, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(rows, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
