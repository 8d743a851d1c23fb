//! Synthetic mouse and keyboard input.
//!
//! Events go to whatever window currently has focus; callers click the
//! matched element first to make sure that is the POS application.

use anyhow::Result;
use enigo::{Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};

use stocksync_core::SyncError;

/// One-shot input session. Cheap to construct; create, use, drop.
pub struct InputDriver {
    enigo: Enigo,
}

impl InputDriver {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| SyncError::InputFailed(format!("input backend unavailable: {e}")))?;
        Ok(Self { enigo })
    }

    /// Move to absolute screen coordinates and left-click.
    pub fn click_at(&mut self, x: i32, y: i32) -> Result<()> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| SyncError::InputFailed(format!("mouse move: {e}")))?;
        self.enigo
            .button(Button::Left, Direction::Click)
            .map_err(|e| SyncError::InputFailed(format!("mouse click: {e}")))?;
        Ok(())
    }

    /// Type text into the focused field, optionally confirming with Enter.
    pub fn type_text(&mut self, text: &str, press_enter: bool) -> Result<()> {
        self.enigo
            .text(text)
            .map_err(|e| SyncError::InputFailed(format!("typing: {e}")))?;
        if press_enter {
            self.enigo
                .key(Key::Return, Direction::Click)
                .map_err(|e| SyncError::InputFailed(format!("enter key: {e}")))?;
        }
        Ok(())
    }
}
