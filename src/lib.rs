//! Achievement scanner.
//!
//! Drives the game's achievement screen, reads every row with OCR and writes
//! the completed achievements to `results/achievements.json`. A second tool
//! submits them to the tracking site.

pub mod automation;
#[cfg(windows)]
pub mod capture;
pub mod config;
pub mod console;
pub mod elevation;
pub mod layout;
pub mod logging;
pub mod matching;
pub mod ocr;
pub mod paths;
pub mod submit;

pub use config::AppConfig;
