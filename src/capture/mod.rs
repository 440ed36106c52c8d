//! Screen access for the game window (Windows only).
//!
//! This module provides:
//! - Window discovery by process name (`find_window_by_process`)
//! - The window rectangle (`get_window_rect`)
//! - Screen region capture (`capture_region`)

pub mod screenshot;
pub mod window;

pub use screenshot::capture_region;
pub use window::{find_window_by_process, get_window_rect};
