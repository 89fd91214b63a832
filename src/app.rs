use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{oneshot, watch};

use crate::clipboard::{Clipboard, CopyFeedback};
use crate::config::AppConfig;
use crate::content;
use crate::status::poller::StatusPoller;
use crate::status::StatusView;
use crate::theme::Theme;

/// Seconds a status message stays on the info line
const STATUS_MESSAGE_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Rules,
    Connect,
    Leaderboard,
    Donate,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Overview, Tab::Rules, Tab::Connect, Tab::Leaderboard, Tab::Donate];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Rules => "Rules",
            Tab::Connect => "How to join",
            Tab::Leaderboard => "Leaderboard",
            Tab::Donate => "Donate",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn next(&self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(&self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    Players,
    Clans,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

pub struct App {
    pub config: AppConfig,
    pub theme: Theme,

    pub tab: Tab,
    pub board: Board,
    pub popup: Popup,
    pub selected_tier: usize,

    // Live status, mirrored from the poller on each tick
    pub status: StatusView,
    status_rx: watch::Receiver<StatusView>,
    poller: StatusPoller,

    clipboard: Arc<dyn Clipboard>,
    pub copy_feedback: CopyFeedback,
    // Result of a copy running in the background
    pending_copy: Option<oneshot::Receiver<Result<()>>>,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,
}

impl App {
    pub fn new(config: AppConfig, poller: StatusPoller, clipboard: Arc<dyn Clipboard>) -> Self {
        let status_rx = poller.subscribe();
        let status = status_rx.borrow().clone();
        let theme = Theme::with_overrides(&config.theme);

        Self {
            config,
            theme,
            tab: Tab::Overview,
            board: Board::Players,
            popup: Popup::None,
            selected_tier: 0,
            status,
            status_rx,
            poller,
            clipboard,
            copy_feedback: CopyFeedback::default(),
            pending_copy: None,
            status_message: None,
            status_message_time: None,
        }
    }

    /// Set a status message (auto-clears after 3 seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn is_copied(&self) -> bool {
        self.copy_feedback.is_copied(Instant::now())
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.popup != Popup::None {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('?') | KeyCode::Enter) {
                self.popup = Popup::None;
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Tab | KeyCode::Right => self.tab = self.tab.next(),
            KeyCode::BackTab | KeyCode::Left => self.tab = self.tab.prev(),
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                self.tab = Tab::ALL[idx];
            }
            KeyCode::Char('h') | KeyCode::Char('?') => self.popup = Popup::Help,
            KeyCode::Char('c') | KeyCode::Char('y') => self.start_copy(),
            KeyCode::Char('p') | KeyCode::Char(' ') if self.tab == Tab::Leaderboard => {
                self.board = match self.board {
                    Board::Players => Board::Clans,
                    Board::Clans => Board::Players,
                };
            }
            KeyCode::Down | KeyCode::Char('j') if self.tab == Tab::Donate => {
                if self.selected_tier + 1 < content::DONATION_TIERS.len() {
                    self.selected_tier += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') if self.tab == Tab::Donate => {
                self.selected_tier = self.selected_tier.saturating_sub(1);
            }
            _ => {}
        }

        Ok(())
    }

    /// Start a background copy; `tick` reports the outcome
    fn start_copy(&mut self) {
        if self.pending_copy.is_some() {
            self.set_status("Copy already in progress");
            return;
        }

        let clipboard = Arc::clone(&self.clipboard);
        let address = self.config.server_address.clone();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let _ = tx.send(clipboard.set_text(&address).await);
        });
        self.pending_copy = Some(rx);
    }

    /// Report a finished background copy, if any
    fn poll_copy(&mut self, now: Instant) {
        let Some(rx) = self.pending_copy.as_mut() else {
            return;
        };

        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => Err(anyhow::anyhow!("copy task ended")),
        };
        self.pending_copy = None;

        let address = self.config.server_address.clone();
        match result {
            Ok(()) => {
                self.copy_feedback.mark(now);
                tracing::info!("Copied server address {}", address);
                self.set_status(format!("Copied {} to clipboard", address));
            }
            Err(e) => {
                tracing::warn!("Clipboard copy failed: {:#}", e);
                self.set_status(format!("Copy failed: {}", e));
            }
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();

        // Pick up the latest poll result, if any
        if self.status_rx.has_changed().unwrap_or(false) {
            self.status = self.status_rx.borrow_and_update().clone();
        }

        self.poll_copy(now);

        if self.copy_feedback.is_set() {
            self.copy_feedback.expire(now);
        }

        if let Some(time) = self.status_message_time {
            if now.duration_since(time).as_secs() >= STATUS_MESSAGE_SECS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Stop polling; the view is going away
    pub fn shutdown(&mut self) {
        if self.poller.is_running() {
            self.poller.stop();
        }
    }
}
