//! The gauge panel: fuel bar, token count, countdowns, window size.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use moodring_core::engine::{format_hms, DisplayState, FuelBand, GaugeView, StatusView};

use crate::config::UiSettings;
use crate::state::PENDING_MARQUEE;

/// Label column width ("High" = 4 chars)
const LABEL_WIDTH: usize = 4;

/// Gauge panel widget
pub struct MoodRing;

impl MoodRing {
    /// Calculate the height needed for the panel
    pub fn height(view: &StatusView, ui: &UiSettings) -> u16 {
        // 2 (top/bottom border) + content rows
        let content_rows = match view {
            StatusView::Loading | StatusView::Failed { .. } => 1,
            StatusView::Gauge(_) if ui.show_effort_lines => 6,
            StatusView::Gauge(_) => 4,
        };
        content_rows + 2
    }

    /// Render the panel
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        view: &StatusView,
        marquee_offset: usize,
        ui: &UiSettings,
    ) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let block = Block::default()
            .title(Self::build_title(view))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Gray));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = match view {
            StatusView::Loading => vec![Line::from(Span::styled(
                " Loading rate limits…",
                Style::default().fg(Color::DarkGray),
            ))],
            StatusView::Failed { error, .. } => vec![Line::from(Span::styled(
                format!(" {}", error.indicator()),
                Self::style(ui, Color::Red).add_modifier(Modifier::BOLD),
            ))],
            StatusView::Gauge(gauge) => Self::gauge_lines(gauge, inner.width, marquee_offset, ui),
        };

        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Build the block title with mode badge and fetch time
    fn build_title(view: &StatusView) -> String {
        match view {
            StatusView::Gauge(gauge) => match gauge.fetched_at {
                Some(fetched_at) => {
                    let local = fetched_at.with_timezone(&chrono::Local);
                    format!(
                        " Mood Ring {} ({}) ",
                        gauge.mode.badge(),
                        local.format("%H:%M:%S")
                    )
                }
                None => format!(" Mood Ring {} ", gauge.mode.badge()),
            },
            _ => " Mood Ring ".to_string(),
        }
    }

    fn gauge_lines(
        gauge: &GaugeView,
        width: u16,
        marquee_offset: usize,
        ui: &UiSettings,
    ) -> Vec<Line<'static>> {
        let label = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM);
        let value = Style::default().fg(Color::White);

        let headline = if gauge.state == DisplayState::Pending {
            let available = (width as usize).saturating_sub(1);
            Span::styled(
                format!(" {}", marquee(PENDING_MARQUEE, marquee_offset, available)),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::styled(format!(" {}", gauge.headline), value)
        };

        let mut lines = vec![
            Self::fuel_line(gauge, width, ui),
            Line::from(vec![
                Span::styled(" Tokens: ", label),
                Span::styled(
                    format!("{}/{}", gauge.remaining_tokens, gauge.total_tokens),
                    value,
                ),
            ]),
            Line::from(headline),
        ];

        if ui.show_effort_lines {
            lines.push(Self::effort_line("Low", gauge.low_remaining_secs));
            lines.push(Self::effort_line("High", gauge.high_remaining_secs));
        }

        lines.push(Line::from(vec![
            Span::styled(" Window: ", label),
            Span::styled(format!("{}h", gauge.window_hours), value),
        ]));
        lines
    }

    /// " ████████░░░░░  64%"
    fn fuel_line(gauge: &GaugeView, width: u16, ui: &UiSettings) -> Line<'static> {
        let percent_str = format!("{:>3}%", gauge.fuel_percent);
        // " " + bar + " " + "100%"
        let fixed_width = 1 + 1 + 4;
        let bar_width = if width as usize > fixed_width + 4 {
            width as usize - fixed_width
        } else {
            4
        };

        let filled = (bar_width as u32 * gauge.fuel_percent as u32 / 100) as usize;
        let empty = bar_width.saturating_sub(filled);
        let color = Self::style(ui, band_color(gauge.band));

        Line::from(vec![
            Span::raw(" "),
            Span::styled("█".repeat(filled), color),
            Span::styled(
                "░".repeat(empty),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            ),
            Span::styled(format!(" {}", percent_str), color),
        ])
    }

    fn effort_line(label: &str, secs: u64) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!(" {:w$} ", label, w = LABEL_WIDTH),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::DIM),
            ),
            Span::styled(format_hms(secs), Style::default().fg(Color::Gray)),
        ])
    }

    fn style(ui: &UiSettings, color: Color) -> Style {
        if ui.color {
            Style::default().fg(color)
        } else {
            Style::default().fg(Color::Gray)
        }
    }
}

/// Color for a fuel band
pub fn band_color(band: FuelBand) -> Color {
    match band {
        FuelBand::Full => Color::Green,
        FuelBand::Mid => Color::Yellow,
        FuelBand::Low => Color::Rgb(255, 165, 0),
        FuelBand::Critical => Color::Red,
        FuelBand::Depleted => Color::Magenta,
    }
}

/// Scroll `text` right-to-left through a window `width` cells wide
fn marquee(text: &str, offset: usize, width: usize) -> String {
    let padded: Vec<char> = text.chars().chain(std::iter::once(' ')).collect();
    let mut out = String::new();
    let mut used = 0;

    for c in padded.iter().cycle().skip(offset % padded.len()) {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(*c);
        used += w;
        if used == width || out.chars().count() >= padded.len() {
            break;
        }
    }
    out
}
