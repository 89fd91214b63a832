mod app;
mod clipboard;
mod config;
mod content;
mod status;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup};
use clipboard::{CopyFeedback, SystemClipboard};
use config::AppConfig;
use status::http::HttpStatusSource;
use status::poller::{refresh_once, StatusPoller};
use status::{ConnectivityState, StatusView};

#[derive(Parser, Debug)]
#[command(name = "blockportal")]
#[command(version)]
#[command(about = "A terminal landing page and live status monitor for a Minecraft server")]
struct Args {
    /// Output current server status as JSON (for waybar and scripts)
    #[arg(short, long)]
    status: bool,

    /// Keep polling without a UI and log every status change
    #[arg(short, long)]
    watch: bool,

    /// Copy the server address to the clipboard and exit
    #[arg(short, long)]
    copy: bool,

    /// Override the configured status endpoint
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so --status output stays machine readable
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load()?;
    if let Some(endpoint) = args.endpoint.as_deref() {
        config.override_endpoint(endpoint);
    }

    // Handle CLI-only commands
    if args.status {
        return print_status(&config).await;
    }

    if args.copy {
        return copy_address(&config).await;
    }

    if args.watch {
        return run_watch(&config).await;
    }

    // Run TUI
    run_tui(config).await
}

fn status_source(config: &AppConfig) -> Result<HttpStatusSource> {
    HttpStatusSource::new(
        &config.status_endpoint,
        config.poll_settings().request_timeout,
    )
}

async fn print_status(config: &AppConfig) -> Result<()> {
    let source = status_source(config)?;
    let view = refresh_once(&source, &config.poll_settings()).await;

    println!("{}", serde_json::to_string(&status_json(config, &view))?);
    Ok(())
}

/// Waybar-compatible status line
fn status_json(config: &AppConfig, view: &StatusView) -> serde_json::Value {
    let class = view.state.label();
    let snapshot = &view.snapshot;

    let tooltip = match view.state {
        ConnectivityState::Online => format!(
            "{}\n{} / {} players\nVersion {}\nLatency {} ms",
            config.server_address, snapshot.online, snapshot.max, snapshot.version, snapshot.latency_ms
        ),
        _ => format!("{}\nServer offline", config.server_address),
    };

    serde_json::json!({
        "text": if view.is_online() {
            format!("{}/{}", snapshot.online, snapshot.max)
        } else {
            String::new()
        },
        "tooltip": tooltip,
        "class": class,
        "alt": class,
        "online": snapshot.online,
        "max": snapshot.max,
        "version": snapshot.version,
        "latency": snapshot.latency_ms,
    })
}

async fn copy_address(config: &AppConfig) -> Result<()> {
    let mut feedback = CopyFeedback::default();
    clipboard::copy_address(&SystemClipboard, &config.server_address, &mut feedback).await?;
    println!("Copied {}", config.server_address);
    Ok(())
}

async fn run_watch(config: &AppConfig) -> Result<()> {
    let source = status_source(config)?;
    tracing::info!(
        "Watching {} every {}s",
        source.endpoint(),
        config.poll_interval_secs
    );

    let poller = StatusPoller::spawn(source, config.poll_settings());
    let mut rx = poller.subscribe();
    let mut last_state = ConnectivityState::Checking;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = rx.borrow_and_update().clone();
                tracing::info!(
                    "{}: {}/{} players, version {}, {} ms",
                    view.state.label(),
                    view.snapshot.online,
                    view.snapshot.max,
                    view.snapshot.version,
                    view.snapshot.latency_ms
                );

                if should_notify(last_state, view.state, config.notifications) {
                    notify_state_change(config, &view);
                }
                last_state = view.state;
            }
            _ = &mut ctrl_c => {
                tracing::info!("Stopping watch");
                break;
            }
        }
    }

    drop(poller);
    Ok(())
}

/// Notify on Online/Offline flips only, never on the first resolution
fn should_notify(previous: ConnectivityState, next: ConnectivityState, enabled: bool) -> bool {
    enabled && previous != ConnectivityState::Checking && previous != next
}

fn notify_state_change(config: &AppConfig, view: &StatusView) {
    let body = if view.is_online() {
        format!("{} is back online ({}/{})", config.server_address, view.snapshot.online, view.snapshot.max)
    } else {
        format!("{} went offline", config.server_address)
    };

    if let Err(e) = notify(&config.server_name, &body) {
        tracing::warn!("Notification failed: {}", e);
    }
}

async fn run_tui(config: AppConfig) -> Result<()> {
    let poller = StatusPoller::spawn(status_source(&config)?, config.poll_settings());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, poller, Arc::new(SystemClipboard));

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {
                            if let Err(e) = app.handle_key(key).await {
                                tracing::warn!("Key handling failed: {}", e);
                            }
                        }
                    }
                }
            }
        }

        app.tick();
    }
}

fn notify(summary: &str, body: &str) -> Result<()> {
    notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .icon("network-server")
        .show()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use status::StatusError;

    #[test]
    fn test_status_json_online() {
        let config = AppConfig::default();
        let mut view = StatusView::new(&config.fallback_version);
        view.apply(
            Ok(serde_json::from_value(serde_json::json!({"online": 12, "max": 50, "version": "1.20", "latency": 34})).unwrap()),
            &config.fallback_version,
        );

        let json = status_json(&config, &view);
        assert_eq!(json["class"], "online");
        assert_eq!(json["text"], "12/50");
        assert_eq!(json["latency"], 34);
    }

    #[test]
    fn test_status_json_offline() {
        let config = AppConfig::default();
        let mut view = StatusView::new(&config.fallback_version);
        view.apply(Err(StatusError::Timeout), &config.fallback_version);

        let json = status_json(&config, &view);
        assert_eq!(json["class"], "offline");
        assert_eq!(json["text"], "");
        assert_eq!(json["version"], config.fallback_version.as_str());
    }

    #[test]
    fn test_should_notify_only_on_flips() {
        use ConnectivityState::*;

        assert!(!should_notify(Checking, Offline, true));
        assert!(!should_notify(Checking, Online, true));
        assert!(should_notify(Offline, Online, true));
        assert!(should_notify(Online, Offline, true));
        assert!(!should_notify(Online, Online, true));
        assert!(!should_notify(Offline, Online, false));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["blockportal", "--status", "--endpoint", "http://localhost:9000/stats"]);
        assert!(args.status);
        assert!(!args.watch);
        assert_eq!(args.endpoint.as_deref(), Some("http://localhost:9000/stats"));
    }
}
