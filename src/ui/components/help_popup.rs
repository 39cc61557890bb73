use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use moodring_core::engine::FuelBand;

use super::band_color;

/// Help popup widget
pub struct HelpPopup;

impl HelpPopup {
    /// Render the help popup
    pub fn render(frame: &mut Frame, area: Rect) {
        // Clear the area first
        frame.render_widget(Clear, area);

        let help_text = vec![
            Line::from(vec![Span::styled(
                "moodring - live rate-limit gauge",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Keys",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )]),
            Self::help_line("Enter", "You sent a message (re-check shortly)"),
            Self::help_line("?", "Toggle this help"),
            Self::help_line("q / Esc", "Quit"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Gauge",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )]),
            Self::legend_line(FuelBand::Full, ">= 70%"),
            Self::legend_line(FuelBand::Mid, ">= 40%"),
            Self::legend_line(FuelBand::Low, ">= 10%"),
            Self::legend_line(FuelBand::Critical, "< 10%"),
            Self::legend_line(FuelBand::Depleted, "no tokens left"),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to close",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan));

        frame.render_widget(Paragraph::new(help_text).block(block), area);
    }

    fn help_line(key: &str, description: &str) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!("  {:<10}", key),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(description.to_string()),
        ])
    }

    fn legend_line(band: FuelBand, description: &str) -> Line<'static> {
        Line::from(vec![
            Span::styled("  ████      ", Style::default().fg(band_color(band))),
            Span::raw(description.to_string()),
        ])
    }
}
