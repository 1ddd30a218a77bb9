//! Presenting rendered frames.

use crate::{
    constants::{INPUT_POLL_MS, KEY_ESCAPE, KEY_QUIT},
    Result,
};
use log::{debug, warn};
use opencv::{
    core::Mat,
    highgui::{self, WINDOW_AUTOSIZE},
};

/// Shows frames and reports whether the operator asked to quit
pub trait Presenter {
    /// Present one frame and poll input
    ///
    /// Returns `true` when a quit key was pressed.
    ///
    /// # Errors
    ///
    /// Returns an error if the display surface fails.
    fn present(&mut self, frame: &Mat) -> Result<bool>;
}

/// True for the keys that stop the loop
#[must_use]
pub const fn is_quit_key(key: i32) -> bool {
    // waitKey may report modifier bits above the low byte
    let key = key & 0xFF;
    key == KEY_ESCAPE || key == KEY_QUIT
}

/// Named `HighGUI` window, destroyed when dropped
pub struct Window {
    name: String,
}

impl Window {
    /// Create the window
    ///
    /// # Errors
    ///
    /// Returns an error if `HighGUI` cannot create the window.
    pub fn open(name: &str) -> Result<Self> {
        highgui::named_window(name, WINDOW_AUTOSIZE)?;
        debug!("Window '{name}' created");
        Ok(Self { name: name.to_string() })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Presenter for Window {
    fn present(&mut self, frame: &Mat) -> Result<bool> {
        highgui::imshow(&self.name, frame)?;
        let key = highgui::wait_key(INPUT_POLL_MS)?;
        Ok(key >= 0 && is_quit_key(key))
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_window(&self.name) {
            warn!("Failed to destroy window '{}': {e}", self.name);
        }
    }
}

/// Discards frames; used with `--gui none` and in tests
#[derive(Debug, Default)]
pub struct Headless {
    presented: usize,
    quit_after: Option<usize>,
}

impl Headless {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Behave as if quit were pressed on the `n`th presented frame
    #[must_use]
    pub fn quit_after(n: usize) -> Self {
        Self {
            presented: 0,
            quit_after: Some(n),
        }
    }

    #[must_use]
    pub const fn presented(&self) -> usize {
        self.presented
    }
}

impl Presenter for Headless {
    fn present(&mut self, _frame: &Mat) -> Result<bool> {
        self.presented += 1;
        Ok(self.quit_after.is_some_and(|n| self.presented >= n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::{core::CV_8UC3, prelude::*};

    #[test]
    fn test_quit_keys() {
        assert!(is_quit_key(27));
        assert!(is_quit_key(i32::from(b'q')));
        assert!(is_quit_key(0x10_0071));
        assert!(!is_quit_key(i32::from(b'w')));
    }

    #[test]
    fn test_headless_quit_after() {
        let frame = Mat::zeros(4, 4, CV_8UC3).unwrap().to_mat().unwrap();
        let mut presenter = Headless::quit_after(2);
        assert!(!presenter.present(&frame).unwrap());
        assert!(presenter.present(&frame).unwrap());
        assert_eq!(presenter.presented(), 2);
    }

    #[test]
    #[ignore] // Requires a display
    fn test_window_creation() {
        let window = Window::open("test window");
        assert!(window.is_ok() || window.is_err());
    }
}
