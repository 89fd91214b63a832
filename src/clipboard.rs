//! Copy-to-clipboard for the server address
//!
//! The system clipboard is reached through whichever helper is installed
//! (`wl-copy`, `xclip`, `xsel`, `pbcopy`). A short acknowledgment flag
//! drives the "Copied!" indicator and reverts on its own.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

/// How long the copied acknowledgment stays visible
pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_secs(2);

/// Upper bound for a whole copy attempt, across all helpers
pub const COPY_TIMEOUT: Duration = Duration::from_secs(3);

/// Helpers tried in order, with the arguments that make them read stdin
const HELPERS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
];

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn set_text(&self, text: &str) -> Result<()>;
}

/// System clipboard via an external helper
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn set_text(&self, text: &str) -> Result<()> {
        // Dropping the pending helper on timeout kills its child
        match timeout(COPY_TIMEOUT, try_helpers(text)).await {
            Ok(result) => result,
            Err(_) => anyhow::bail!("Clipboard helper timed out after {}s", COPY_TIMEOUT.as_secs()),
        }
    }
}

async fn try_helpers(text: &str) -> Result<()> {
    let mut last_error = None;

    for (program, args) in HELPERS {
        match run_helper_with_stdin(program, args, text).await {
            Ok(()) => {
                tracing::debug!("Copied {} bytes via {}", text.len(), program);
                return Ok(());
            }
            Err(e) => {
                tracing::debug!("Clipboard helper {} unavailable: {}", program, e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("No clipboard helper available")))
        .context("Could not copy to clipboard (install wl-clipboard, xclip or xsel)")
}

/// Pipe `input` into `program`. Output streams are discarded since some
/// helpers (wl-copy) keep a background process alive holding them open.
async fn run_helper_with_stdin(program: &str, args: &[&str], input: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes()).await?;
        // Closing stdin lets the helper finish reading
        drop(stdin);
    }

    let status = child.wait().await?;
    if !status.success() {
        anyhow::bail!("exited with {}", status);
    }
    Ok(())
}

/// Transient "copied" acknowledgment
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyFeedback {
    copied_at: Option<Instant>,
}

impl CopyFeedback {
    pub fn mark(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .map(|at| now.saturating_duration_since(at) < COPY_FEEDBACK_DURATION)
            .unwrap_or(false)
    }

    /// Revert to the initial state once the acknowledgment has expired
    pub fn expire(&mut self, now: Instant) {
        if !self.is_copied(now) {
            self.copied_at = None;
        }
    }

    pub fn is_set(&self) -> bool {
        self.copied_at.is_some()
    }
}

/// Copy the server address and start the acknowledgment
pub async fn copy_address(
    clipboard: &dyn Clipboard,
    address: &str,
    feedback: &mut CopyFeedback,
) -> Result<()> {
    clipboard.set_text(address).await?;
    feedback.mark(Instant::now());
    tracing::info!("Copied server address {}", address);
    Ok(())
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory clipboard for tests
    #[derive(Default)]
    pub struct MemoryClipboard {
        pub contents: Mutex<Option<String>>,
        pub fail: bool,
    }

    #[async_trait]
    impl Clipboard for MemoryClipboard {
        async fn set_text(&self, text: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("clipboard unavailable");
            }
            *self.contents.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_copy_places_exact_address() {
        let clipboard = MemoryClipboard::default();
        let mut feedback = CopyFeedback::default();

        copy_address(&clipboard, "play.myserver.ru", &mut feedback).await.unwrap();

        assert_eq!(
            clipboard.contents.lock().unwrap().as_deref(),
            Some("play.myserver.ru")
        );
        assert!(feedback.is_copied(Instant::now()));
    }

    #[test]
    fn test_feedback_reverts_after_two_seconds() {
        let start = Instant::now();
        let mut feedback = CopyFeedback::default();
        assert!(!feedback.is_set());

        feedback.mark(start);
        assert!(feedback.is_copied(start + Duration::from_millis(1999)));

        feedback.expire(start + Duration::from_millis(1500));
        assert!(feedback.is_set());

        let later = start + COPY_FEEDBACK_DURATION;
        assert!(!feedback.is_copied(later));
        feedback.expire(later);
        assert!(!feedback.is_set());
    }

    #[test]
    fn test_recopy_restarts_window() {
        let start = Instant::now();
        let mut feedback = CopyFeedback::default();
        feedback.mark(start);
        feedback.mark(start + Duration::from_millis(1500));

        assert!(feedback.is_copied(start + Duration::from_millis(3000)));
    }

    #[tokio::test]
    async fn test_failed_copy_leaves_feedback_unset() {
        let clipboard = MemoryClipboard {
            fail: true,
            ..Default::default()
        };
        let mut feedback = CopyFeedback::default();

        assert!(copy_address(&clipboard, "play.myserver.ru", &mut feedback).await.is_err());
        assert!(!feedback.is_set());
    }
}
