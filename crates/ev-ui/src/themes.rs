use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are considered dark; 7–15 are considered light. If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    background_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_from_colorfgbg(value: Option<&str>) -> BackgroundType {
    let bg = value
        .and_then(|v| v.split(';').next_back())
        .and_then(|bg| bg.parse::<u8>().ok());
    match bg {
        Some(n) if n > 6 => BackgroundType::Light,
        _ => BackgroundType::Dark,
    }
}

/// Complete theme definition carrying all styles used by the dashboard
/// components.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub warning: Style,
    pub error: Style,

    // ── Metric boxes ─────────────────────────────────────────────────────────
    pub metric_border: Style,
    /// Border of the highlighted (top company) metric box.
    pub metric_highlight: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    /// Bars of the top-makes chart.
    pub chart_bar: Style,
    /// Line of the vehicles-by-year chart.
    pub chart_line: Style,
    pub chart_axis: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,

    // ── Pagination ───────────────────────────────────────────────────────────
    pub page_active: Style,
    pub page_hint: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Green),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            metric_border: Style::default().fg(Color::Blue),
            metric_highlight: Style::default().fg(Color::Green),

            chart_bar: Style::default().fg(Color::Rgb(59, 130, 246)),
            chart_line: Style::default().fg(Color::Rgb(167, 139, 250)),
            chart_axis: Style::default().fg(Color::Gray),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),

            page_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            page_hint: Style::default().fg(Color::DarkGray),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text so that content remains legible against a
    /// white/light-grey terminal canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Green),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            metric_border: Style::default().fg(Color::Blue),
            metric_highlight: Style::default().fg(Color::Green),

            chart_bar: Style::default().fg(Color::Blue),
            chart_line: Style::default().fg(Color::Magenta),
            chart_axis: Style::default().fg(Color::DarkGray),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),

            page_active: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            page_hint: Style::default().fg(Color::Gray),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// Construct a theme by name. Falls back to `auto_detect` for unknown
    /// names (including `"auto"`).
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Style of a table range cell: ranges that are not positive (unknown or
    /// not yet researched in the source data) are dimmed.
    pub fn range_style(&self, miles: i64) -> Style {
        if miles > 0 {
            self.text
        } else {
            self.dim
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
