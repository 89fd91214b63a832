mod components;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};
use std::time::SystemTime;

use crate::app::{App, Board, Popup, Tab};
use crate::content;
use components::{centered_rect, key_hints, stat_card, status_badge};

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    // Hero collapses to its essentials on short terminals
    let hero_height = if area.height < 24 { 4 } else { 6 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1),           // Info line
            Constraint::Length(hero_height), // Hero
            Constraint::Length(3),           // Tabs
            Constraint::Min(6),              // Body
            Constraint::Length(1),           // Footer
        ])
        .split(area);

    draw_info_line(f, app, chunks[0]);
    draw_hero(f, app, chunks[1]);
    draw_tabs(f, app, chunks[2]);

    match app.tab {
        Tab::Overview => draw_overview(f, app, chunks[3]),
        Tab::Rules => draw_rules(f, app, chunks[3]),
        Tab::Connect => draw_connect(f, app, chunks[3]),
        Tab::Leaderboard => draw_leaderboard(f, app, chunks[3]),
        Tab::Donate => draw_donate(f, app, chunks[3]),
    }

    draw_footer(f, app, chunks[4]);

    if app.popup == Popup::Help {
        draw_help_popup(f, app);
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;

    // Priority: status message > last poll error > ready
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status.as_str(), Style::default().fg(t.warning)))
    } else if let Some(ref err) = app.status.last_error {
        Line::from(Span::styled(
            format!("Status check failed: {}", err),
            Style::default().fg(t.text_dim),
        ))
    } else {
        Line::from(Span::styled(content::UPTIME_BADGE, Style::default().fg(t.text_dim)))
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_hero(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", app.config.server_name),
            Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.accent));

    let copy_hint = if app.is_copied() {
        Span::styled("  ✓ Copied!", Style::default().fg(t.success).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("  (c) copy", Style::default().fg(t.text_dim))
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                app.config.server_address.as_str(),
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            ),
            copy_hint,
        ]),
        Line::from(status_badge(&app.status, t)),
    ];

    if area.height > 4 {
        lines.push(Line::from(Span::styled(content::TAGLINE, Style::default().fg(t.text_dim))));
    }

    let hero = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);

    f.render_widget(hero, area);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            Line::from(vec![
                Span::styled(format!("{} ", i + 1), Style::default().fg(t.text_dim)),
                Span::styled(tab.title(), Style::default().fg(t.text)),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(t.inactive)),
        )
        .highlight_style(
            Style::default()
                .fg(t.accent)
                .bg(t.bg_selected)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled("│", Style::default().fg(t.inactive)));

    f.render_widget(tabs, area);
}

fn draw_overview(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let status = &app.status;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    // Live counters
    let live = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(rows[0]);

    let online_value = if status.loading {
        status.online_display()
    } else {
        format!("{}/{}", status.snapshot.online, status.snapshot.max)
    };
    let live_color = components::badge_color(status.state, t);

    f.render_widget(stat_card("Online", online_value, live_color, t), live[0]);
    f.render_widget(stat_card("Version", status.snapshot.version.clone(), t.accent, t), live[1]);
    f.render_widget(
        stat_card("Latency", format!("{} ms", status.snapshot.latency_ms), t.accent, t),
        live[2],
    );

    // Static counters
    let fixed = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, content::STATS.len() as u32);
            content::STATS.len()
        ])
        .split(rows[1]);

    for (stat, rect) in content::STATS.iter().zip(fixed.iter()) {
        f.render_widget(stat_card(stat.label, stat.value.to_string(), t.header, t), *rect);
    }

    let updated = match status.last_updated {
        Some(at) => format!("Last updated {}s ago", seconds_since(at)),
        None if status.loading => "Waiting for first status check…".to_string(),
        None => "No status received yet".to_string(),
    };
    let footer = Paragraph::new(Line::from(Span::styled(updated, Style::default().fg(t.text_dim))))
        .alignment(Alignment::Center);
    f.render_widget(footer, rows[2]);
}

fn draw_rules(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;

    let mut lines = Vec::new();
    for (i, rule) in content::RULES.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!(" {}. ", i + 1), Style::default().fg(t.accent)),
            Span::styled(rule.title, Style::default().fg(t.text).add_modifier(Modifier::BOLD)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", rule.description),
            Style::default().fg(t.text_dim),
        )));
        lines.push(Line::from(""));
    }

    let rules = Paragraph::new(lines)
        .block(section_block(" Server rules ", app))
        .wrap(Wrap { trim: false });

    f.render_widget(rules, area);
}

fn draw_connect(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;

    let mut lines = Vec::new();
    for (i, step) in content::CONNECT_STEPS.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!(" [{}] ", i + 1), Style::default().fg(t.accent).add_modifier(Modifier::BOLD)),
            Span::styled(step.title, Style::default().fg(t.text).add_modifier(Modifier::BOLD)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("     {}", content::step_detail(step, &app.config.server_address)),
            Style::default().fg(t.text_dim),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled(" Press ", Style::default().fg(t.text_dim)),
        Span::styled("c", Style::default().fg(t.accent)),
        Span::styled(" to copy the address", Style::default().fg(t.text_dim)),
    ]));

    let steps = Paragraph::new(lines)
        .block(section_block(" How to join ", app))
        .wrap(Wrap { trim: false });

    f.render_widget(steps, area);
}

fn draw_leaderboard(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let header_style = Style::default().fg(t.header);

    let (title, table) = match app.board {
        Board::Players => {
            let rows = content::TOP_PLAYERS.iter().map(|p| {
                let style = Style::default().fg(t.rank_color(p.rank));
                Row::new(vec![
                    Span::styled(format!("#{}", p.rank), style.add_modifier(Modifier::BOLD)),
                    Span::styled(p.name, style),
                    Span::styled(p.clan, Style::default().fg(t.text_dim)),
                    Span::styled(format!("lvl {}", p.level), Style::default().fg(t.text)),
                ])
            });
            let table = Table::new(
                rows,
                [Constraint::Length(4), Constraint::Min(16), Constraint::Min(14), Constraint::Length(8)],
            )
            .header(Row::new(vec![
                Span::styled("", header_style),
                Span::styled("Player", header_style),
                Span::styled("Clan", header_style),
                Span::styled("Level", header_style),
            ]));
            (" Top players │ (p) clans ", table)
        }
        Board::Clans => {
            let rows = content::CLANS.iter().map(|c| {
                let style = Style::default().fg(t.rank_color(c.rank));
                Row::new(vec![
                    Span::styled(format!("#{}", c.rank), style.add_modifier(Modifier::BOLD)),
                    Span::styled(c.name, style),
                    Span::styled(format!("{} members", c.members), Style::default().fg(t.text_dim)),
                    Span::styled(format!("{} pts", c.points), Style::default().fg(t.text)),
                ])
            });
            let table = Table::new(
                rows,
                [Constraint::Length(4), Constraint::Min(16), Constraint::Min(12), Constraint::Length(10)],
            )
            .header(Row::new(vec![
                Span::styled("", header_style),
                Span::styled("Clan", header_style),
                Span::styled("Members", header_style),
                Span::styled("Points", header_style),
            ]));
            (" Top clans │ (p) players ", table)
        }
    };

    f.render_widget(table.block(section_block(title, app)), area);
}

fn draw_donate(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let tiers = content::DONATION_TIERS;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, tiers.len() as u32); tiers.len()])
        .split(area);

    for (i, (tier, rect)) in tiers.iter().zip(columns.iter()).enumerate() {
        let selected = i == app.selected_tier;
        let border_color = if selected { t.accent } else { t.inactive };

        let mut title = vec![Span::styled(
            format!(" {} ", tier.name),
            Style::default().fg(t.header).add_modifier(Modifier::BOLD),
        )];
        if tier.popular {
            title.push(Span::styled("★ popular ", Style::default().fg(t.warning)));
        }

        let mut lines = vec![
            Line::from(Span::styled(tier.price, Style::default().fg(t.accent).add_modifier(Modifier::BOLD))),
            Line::from(""),
        ];
        lines.extend(tier.features.iter().map(|feature| {
            Line::from(vec![
                Span::styled("✓ ", Style::default().fg(t.success)),
                Span::styled(*feature, Style::default().fg(t.text)),
            ])
        }));

        let card = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(Line::from(title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color)),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(card, *rect);
    }
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let mut hints: Vec<(&str, &str)> = vec![("Tab", "Next"), ("1-5", "Jump"), ("c", "Copy IP")];
    match app.tab {
        Tab::Leaderboard => hints.push(("p", "Players/Clans")),
        Tab::Donate => hints.push(("↑↓", "Select")),
        _ => {}
    }
    hints.push(("h", "Help"));
    hints.push(("q", "Quit"));

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 4 } else { hints.len() };
    let visible: Vec<(&str, &str)> = hints.into_iter().take(max_hints).collect();

    let footer = Paragraph::new(Line::from(key_hints(&visible, &app.theme)))
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}

fn draw_help_popup(f: &mut Frame, app: &App) {
    let t = &app.theme;
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 95 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let heading = |s: &'static str| {
        Line::from(Span::styled(s, Style::default().fg(t.header).add_modifier(Modifier::BOLD)))
    };
    let entry = |key: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", key), Style::default().fg(t.accent)),
            Span::raw(what),
        ])
    };

    let help_text = vec![
        heading("═══ Navigation ═══"),
        entry("Tab/→", "Next section"),
        entry("S-Tab/←", "Previous section"),
        entry("1-5", "Jump to section"),
        Line::from(""),
        heading("═══ Actions ═══"),
        entry("c/y", "Copy server address to clipboard"),
        entry("p/Space", "Switch players/clans (Leaderboard)"),
        entry("↑/↓", "Select tier (Donate)"),
        entry("q", "Quit"),
        Line::from(""),
        heading("═══ Status ═══"),
        Line::from(Span::styled(
            format!(
                "  Polled every {}s from {}",
                app.config.poll_interval_secs, app.config.status_endpoint
            ),
            Style::default().fg(t.text_dim),
        )),
        Line::from(""),
        heading("═══ Command line ═══"),
        entry("--status", "Print JSON status for status bars"),
        entry("--watch", "Log status changes (headless)"),
        entry("--copy", "Copy the address and exit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(t.text_dim)),
            Span::styled("h", Style::default().fg(t.accent)),
            Span::styled("/", Style::default().fg(t.text_dim)),
            Span::styled("Esc", Style::default().fg(t.accent)),
            Span::styled(" to close", Style::default().fg(t.text_dim)),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" Help ", Style::default().fg(t.accent)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(t.accent)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn section_block<'a>(title: &'a str, app: &App) -> Block<'a> {
    Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(app.theme.accent).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.inactive))
}

fn seconds_since(at: SystemTime) -> u64 {
    SystemTime::now()
        .duration_since(at)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::tests::MemoryClipboard;
    use crate::config::AppConfig;
    use crate::status::http::StatusSource;
    use crate::status::poller::StatusPoller;
    use crate::status::{StatusError, StatusResponse};
    use async_trait::async_trait;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    struct NeverSource;

    #[async_trait]
    impl StatusSource for NeverSource {
        async fn fetch(&self) -> Result<StatusResponse, StatusError> {
            std::future::pending().await
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    /// Rendered screen split into rows, clipped to the first `width` columns
    fn render_rows(app: &App, width: usize) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .chunks(100)
            .map(|row| row.iter().take(width).map(|cell| cell.symbol()).collect())
            .collect()
    }

    fn app() -> App {
        let config = AppConfig::default();
        let poller = StatusPoller::spawn(NeverSource, config.poll_settings());
        App::new(config, poller, Arc::new(MemoryClipboard::default()))
    }

    #[tokio::test]
    async fn test_first_paint_shows_placeholder() {
        let app = app();
        let screen = render(&app);

        assert!(screen.contains("play.myserver.ru"));
        assert!(screen.contains("Checking…"));

        // The Online card is the first third of the live row; its value sits above the label
        let rows = render_rows(&app, 33);
        let card_text = |row: &str| row.trim_matches(|c: char| c == '│' || c.is_whitespace()).to_string();
        let label_row = rows
            .iter()
            .position(|row| card_text(row) == "Online")
            .expect("online card label");
        let value = card_text(&rows[label_row - 1]);

        assert_eq!(value, crate::status::LOADING_PLACEHOLDER);
        assert!(!value.chars().any(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_every_tab_renders() {
        let mut app = app();
        for tab in Tab::ALL {
            app.tab = tab;
            let screen = render(&app);
            assert!(screen.contains(tab.title()));
        }

        app.tab = Tab::Leaderboard;
        assert!(render(&app).contains("ShadowMaster"));
        app.board = Board::Clans;
        assert!(render(&app).contains("Night Wolves"));
    }

    #[tokio::test]
    async fn test_help_popup_renders() {
        let mut app = app();
        app.popup = Popup::Help;
        assert!(render(&app).contains("Copy server address"));
    }
}
