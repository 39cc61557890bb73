use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use moodring_core::engine::{DisplayState, StatusView};

use crate::state::AppState;

/// Status bar widget
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let mut spans = vec![];

        let (label, bg) = Self::state_badge(&state.view);
        spans.push(Span::styled(
            format!(" {} ", label),
            Style::default()
                .fg(Color::Black)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));

        Self::push_hint(&mut spans, "Enter", ":Sent message ", Color::Green);
        Self::push_hint(&mut spans, "?", ":Help ", Color::Cyan);
        Self::push_hint(&mut spans, "q", ":Quit ", Color::Yellow);

        if state.activity_count > 0 {
            spans.push(Span::styled(
                format!(" sent: {}", state.activity_count),
                Style::default().fg(Color::DarkGray),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn push_hint(
        spans: &mut Vec<Span<'static>>,
        key: &'static str,
        text: &'static str,
        color: Color,
    ) {
        spans.push(Span::styled(
            key,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(text, Style::default().fg(Color::DarkGray)));
    }

    /// Short label and background color for the current view
    fn state_badge(view: &StatusView) -> (&'static str, Color) {
        match view {
            StatusView::Loading => ("LOADING", Color::DarkGray),
            StatusView::Failed { .. } => ("ERROR", Color::Red),
            StatusView::Gauge(gauge) => match gauge.state {
                DisplayState::Ready => ("READY", Color::Green),
                DisplayState::Exhausted => ("EXHAUSTED", Color::Magenta),
                DisplayState::Pending => ("PENDING", Color::Yellow),
            },
        }
    }
}
