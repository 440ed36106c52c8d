//! UI automation for the achievement screen.
//!
//! This module provides:
//! - The window driver abstraction and its Win32 implementation
//! - Scroll step tuning
//! - Per-category end-of-list tracking
//! - The scan loop itself
//! - The results file written during and after a scan

pub mod driver;
#[cfg(windows)]
pub mod input;
pub mod progress;
pub mod results;
pub mod scanner;
pub mod scroll;

pub use driver::{Key, WindowDriver};
#[cfg(windows)]
pub use driver::GameWindow;
pub use progress::{CategoryProgress, RowTransition, ScanPhase};
pub use results::{load_achievements, ScanResults};
pub use scanner::AchievementScanner;
pub use scroll::{ScrollCorrection, ScrollProfile};
