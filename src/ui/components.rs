//! Reusable UI pieces: status badge, stat cards, key hints, popup geometry

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::status::{ConnectivityState, StatusView};
use crate::theme::Theme;

/// Badge label for the connectivity state
pub fn badge_text(view: &StatusView) -> String {
    match view.state {
        ConnectivityState::Checking => "Checking…".to_string(),
        ConnectivityState::Online => format!(
            "Online {}/{}",
            view.online_display(),
            view.snapshot.max
        ),
        ConnectivityState::Offline => "Offline".to_string(),
    }
}

pub fn badge_color(state: ConnectivityState, theme: &Theme) -> Color {
    match state {
        ConnectivityState::Checking => theme.warning,
        ConnectivityState::Online => theme.success,
        ConnectivityState::Offline => theme.danger,
    }
}

pub fn status_badge(view: &StatusView, theme: &Theme) -> Vec<Span<'static>> {
    let color = badge_color(view.state, theme);
    vec![
        Span::styled("● ", Style::default().fg(color)),
        Span::styled(badge_text(view), Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ]
}

/// Bordered box with a big value and a dim label underneath
pub fn stat_card<'a>(label: &'a str, value: String, color: Color, theme: &Theme) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(label, Style::default().fg(theme.text_dim))),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.inactive)),
    )
}

pub fn key_hints<'a>(hints: &[(&'a str, &'a str)], theme: &Theme) -> Vec<Span<'a>> {
    hints
        .iter()
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(theme.accent)),
                Span::styled(format!(" {} │ ", action), Style::default().fg(theme.text_dim)),
            ]
        })
        .collect()
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusError;

    #[test]
    fn test_badge_text_per_state() {
        let mut view = StatusView::new("1.20");
        assert_eq!(badge_text(&view), "Checking…");

        view.apply(Ok(serde_json::from_value(serde_json::json!({"online": 12, "max": 50})).unwrap()), "1.20");
        assert_eq!(badge_text(&view), "Online 12/50");

        view.apply(Err(StatusError::Timeout), "1.20");
        assert_eq!(badge_text(&view), "Offline");
    }

    #[test]
    fn test_badge_colors_follow_theme() {
        let theme = Theme::default();
        assert_eq!(badge_color(ConnectivityState::Online, &theme), theme.success);
        assert_eq!(badge_color(ConnectivityState::Offline, &theme), theme.danger);
        assert_eq!(badge_color(ConnectivityState::Checking, &theme), theme.warning);
    }
}
