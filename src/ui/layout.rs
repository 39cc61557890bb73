use ratatui::layout::{Constraint, Direction, Flex, Rect};

/// Default width of the gauge panel
const GAUGE_WIDTH: u16 = 44;

/// Layout configuration for the UI
pub struct Layout {
    /// Width of the gauge panel (clamped to the terminal width)
    pub gauge_width: u16,
}

/// Calculated layout areas
#[derive(Debug, Clone, Copy)]
pub struct LayoutAreas {
    /// Gauge panel, centered in the main area
    pub gauge: Rect,
    /// One-line status bar at the bottom
    pub status_bar: Rect,
}

impl Layout {
    /// Create a new layout with default settings
    pub fn new() -> Self {
        Self {
            gauge_width: GAUGE_WIDTH,
        }
    }

    /// Calculate the main areas
    /// Layout: [      gauge (centered)      ]
    ///         [ Status Bar (full width)    ]
    pub fn calculate(&self, area: Rect, gauge_height: u16) -> LayoutAreas {
        let main_and_status = ratatui::layout::Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Main content area
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let main_area = main_and_status[0];
        let status_bar = main_and_status[1];

        let [row] = ratatui::layout::Layout::vertical([Constraint::Length(
            gauge_height.min(main_area.height),
        )])
        .flex(Flex::Center)
        .areas(main_area);
        let [gauge] = ratatui::layout::Layout::horizontal([Constraint::Length(
            self.gauge_width.min(main_area.width),
        )])
        .flex(Flex::Center)
        .areas(row);

        LayoutAreas { gauge, status_bar }
    }

    /// Calculate popup area (centered)
    pub fn popup_area(&self, area: Rect, width_pct: u16, height_pct: u16) -> Rect {
        let popup_layout = ratatui::layout::Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - height_pct) / 2),
                Constraint::Percentage(height_pct),
                Constraint::Percentage((100 - height_pct) / 2),
            ])
            .split(area);

        ratatui::layout::Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - width_pct) / 2),
                Constraint::Percentage(width_pct),
                Constraint::Percentage((100 - width_pct) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_calculation() {
        let layout = Layout::new();
        let area = Rect::new(0, 0, 100, 30);
        let areas = layout.calculate(area, 8);

        assert_eq!(areas.status_bar.height, 1);
        assert_eq!(areas.status_bar.y, 29);
        assert_eq!(areas.gauge.width, GAUGE_WIDTH);
        assert_eq!(areas.gauge.height, 8);
        // Centered horizontally
        assert_eq!(areas.gauge.x, (100 - GAUGE_WIDTH) / 2);
    }

    #[test]
    fn test_layout_small_terminal() {
        let layout = Layout::new();
        let area = Rect::new(0, 0, 30, 6);
        let areas = layout.calculate(area, 8);

        assert_eq!(areas.gauge.width, 30);
        assert!(areas.gauge.height <= 5);
    }

    #[test]
    fn test_popup_area() {
        let layout = Layout::new();
        let area = Rect::new(0, 0, 100, 50);
        let popup = layout.popup_area(area, 60, 40);

        // Popup should be centered
        assert!(popup.x > 0);
        assert!(popup.y > 0);
        assert!(popup.x + popup.width < area.width);
        assert!(popup.y + popup.height < area.height);
    }
}
