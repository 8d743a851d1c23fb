//! POS application process lifecycle.
//!
//! Launches the executable, polls enumerated window titles until the main
//! window appears, and kills the child on teardown.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tokio::time::{sleep, Instant};
use tracing::{info, warn};

use stocksync_core::SyncError;

const WINDOW_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Handle to the launched POS application.
pub struct AppProcess {
    executable: String,
    window_title: String,
    child: Option<Child>,
}

impl AppProcess {
    pub fn new(executable: impl Into<String>, window_title: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            window_title: window_title.into(),
            child: None,
        }
    }

    /// Spawn the application executable.
    pub fn launch(&mut self) -> Result<()> {
        info!(executable = %self.executable, "Launching POS application");
        let child = Command::new(&self.executable)
            .spawn()
            .with_context(|| format!("failed to launch '{}'", self.executable))?;
        self.child = Some(child);
        Ok(())
    }

    /// Poll until a window whose title contains the expected title shows up.
    pub async fn wait_for_window(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if window_present(&self.window_title)? {
                info!(title = %self.window_title, "Application window is up");
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(SyncError::WindowNotFound(self.window_title.clone()).into());
            }
            sleep(WINDOW_POLL_INTERVAL).await;
        }
    }

    /// Terminate the application. A no-op when nothing was launched, so the
    /// cleanup step is always safe to run.
    pub async fn close_all(&mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        info!(executable = %self.executable, "Closing POS application");
        if let Err(e) = child.kill().await {
            warn!(error = %e, "Kill failed; process may already have exited");
        }
        Ok(())
    }
}

fn window_present(title: &str) -> Result<bool> {
    let windows = xcap::Window::all().context("failed to enumerate windows")?;
    for window in windows {
        if window.title().map(|t| t.contains(title)).unwrap_or(false) {
            return Ok(true);
        }
    }
    Ok(false)
}
