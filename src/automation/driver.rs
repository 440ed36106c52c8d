//! The window the scanner drives.
//!
//! The scan loop only talks to this trait, so it can run against a scripted
//! window in tests. On Windows, [`GameWindow`] implements it with real input
//! and screen capture.

use anyhow::Result;
use image::RgbImage;

use crate::layout::{Point, Rect, WindowRect};

/// Keys the scanner presses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
}

pub trait WindowDriver {
    /// Current window rectangle in absolute screen coordinates.
    fn window_rect(&self) -> Result<WindowRect>;

    /// Brings the window to the foreground.
    fn focus(&mut self) -> Result<()>;

    fn press_key(&mut self, key: Key) -> Result<()>;

    /// Left-clicks a window-relative point.
    fn click(&mut self, at: Point) -> Result<()>;

    /// Sends one wheel event at a window-relative point. Negative distances
    /// scroll down.
    fn scroll(&mut self, at: Point, distance: i32) -> Result<()>;

    /// Captures a region given in absolute screen coordinates.
    fn capture(&mut self, region: Rect) -> Result<RgbImage>;
}

#[cfg(windows)]
pub use win32::GameWindow;

#[cfg(windows)]
mod win32 {
    use anyhow::Result;
    use image::RgbImage;
    use windows::Win32::Foundation::HWND;

    use super::{Key, WindowDriver};
    use crate::automation::input;
    use crate::capture::{capture_region, find_window_by_process, get_window_rect};
    use crate::layout::{Point, Rect, WindowRect};

    /// The game's top-level window, found by process name.
    pub struct GameWindow {
        hwnd: HWND,
    }

    impl GameWindow {
        pub fn find(process_name: &str) -> Result<Self> {
            let hwnd = find_window_by_process(process_name)?;
            Ok(Self { hwnd })
        }
    }

    impl WindowDriver for GameWindow {
        fn window_rect(&self) -> Result<WindowRect> {
            get_window_rect(self.hwnd)
        }

        fn focus(&mut self) -> Result<()> {
            input::focus_window(self.hwnd)
        }

        fn press_key(&mut self, key: Key) -> Result<()> {
            input::press_key(key)
        }

        fn click(&mut self, at: Point) -> Result<()> {
            input::click_at(self.window_rect()?, at)
        }

        fn scroll(&mut self, at: Point, distance: i32) -> Result<()> {
            input::scroll_at(self.window_rect()?, at, distance)
        }

        fn capture(&mut self, region: Rect) -> Result<RgbImage> {
            capture_region(region)
        }
    }
}
