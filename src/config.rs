//! Configuration types.
//!
//! Loaded from config.json at startup. Every section has defaults, so a
//! partial file (or no file at all) is fine. The loaded value is passed
//! down explicitly; nothing is stored globally.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::automation::scroll::ScrollProfile;
use crate::layout::ReferenceLayout;
use crate::paths;

/// Default Tesseract location used by the UB-Mannheim installer.
pub const DEFAULT_TESSERACT_PATH: &str = r"C:\Program Files\Tesseract-OCR\tesseract.exe";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub delays: DelayConfig,
    pub scroll: ScrollConfig,
    pub matching: MatchingConfig,
    pub ocr: OcrConfig,
    pub database: DatabaseConfig,
    pub output: OutputConfig,
    pub submission: SubmissionConfig,
    pub layout: ReferenceLayout,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Executable name of the game process
    pub process_name: String,
    /// Read category labels only, without scanning their rows
    pub skip_achievement_rows: bool,
    /// Feed raw captures to OCR (for diagnosing preprocessing)
    pub disable_preprocessing: bool,
    /// Save every capture under the debug image directory
    pub save_debug_images: bool,
    /// Categories up to this id use the standard row grid, later ones the namecard grid
    pub standard_row_categories: u32,
    /// Consecutive empty titles treated as the end of a list
    pub max_blank_rows: u32,
    /// Escape presses used to back out to the main screen
    pub escape_presses: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            process_name: "GenshinImpact.exe".to_string(),
            skip_achievement_rows: false,
            disable_preprocessing: false,
            save_debug_images: false,
            standard_row_categories: 2,
            max_blank_rows: 5,
            escape_presses: 4,
        }
    }
}

/// Fixed waits, in milliseconds. The game has no readiness signal.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    /// After each Escape press while navigating
    pub escape_ms: u64,
    /// After each navigation click
    pub navigation_ms: u64,
    /// Between a click and the capture that follows it
    pub click_settle_ms: u64,
    /// Between individual wheel events
    pub scroll_tick_ms: u64,
    /// After a burst of wheel events
    pub scroll_settle_ms: u64,
    /// After paging the achievement list
    pub page_settle_ms: u64,
    /// After each click/scroll while switching categories
    pub category_settle_ms: u64,
    /// After finishing a category
    pub category_pause_ms: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            escape_ms: 1000,
            navigation_ms: 2000,
            click_settle_ms: 100,
            scroll_tick_ms: 20,
            scroll_settle_ms: 500,
            page_settle_ms: 500,
            category_settle_ms: 500,
            category_pause_ms: 1000,
        }
    }
}

impl DelayConfig {
    /// All waits set to zero (for tests and dry runs).
    pub fn none() -> Self {
        Self {
            escape_ms: 0,
            navigation_ms: 0,
            click_settle_ms: 0,
            scroll_tick_ms: 0,
            scroll_settle_ms: 0,
            page_settle_ms: 0,
            category_settle_ms: 0,
            category_pause_ms: 0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Wheel distance per event, in notches (negative scrolls down)
    pub wheel_distance: i32,
    pub achievements: ScrollProfile,
    pub categories: ScrollProfile,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            wheel_distance: -100,
            achievements: ScrollProfile::achievements(),
            categories: ScrollProfile::categories(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum score (0-100) for replacing OCR text with a database entry
    pub title_threshold: f64,
    /// Minimum score (0-100) for reading a status as completed
    pub completed_threshold: f64,
    /// Status text shown for completed achievements
    pub completed_label: String,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            title_threshold: 90.0,
            completed_threshold: 90.0,
            completed_label: "Completed".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Preferred Tesseract executable
    pub tesseract_path: Option<PathBuf>,
    /// Explicit tessdata directory; Tesseract's own default is used when unset
    pub tessdata_dir: Option<PathBuf>,
    pub language: String,
    /// Tesseract `--psm` value; engine default when unset
    pub page_segmentation_mode: Option<u8>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: Some(PathBuf::from(DEFAULT_TESSERACT_PATH)),
            tessdata_dir: None,
            language: "eng".to_string(),
            page_segmentation_mode: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Achievement table: id -> { "name": ... }
    pub achievements: PathBuf,
    /// Category table: id -> name
    pub categories: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            achievements: PathBuf::from("assets").join("gc_achievements.json"),
            categories: PathBuf::from("assets").join("gc_categories.json"),
        }
    }
}

impl DatabaseConfig {
    pub fn achievements_path(&self) -> PathBuf {
        paths::resolve(&self.achievements)
    }

    pub fn categories_path(&self) -> PathBuf {
        paths::resolve(&self.categories)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub results_dir: PathBuf,
    pub achievements_file: String,
    pub debug_images_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            achievements_file: "achievements.json".to_string(),
            debug_images_dir: PathBuf::from("results").join("debug_images"),
        }
    }
}

impl OutputConfig {
    pub fn results_dir(&self) -> PathBuf {
        paths::resolve(&self.results_dir)
    }

    pub fn achievements_path(&self) -> PathBuf {
        self.results_dir().join(&self.achievements_file)
    }

    pub fn debug_images_dir(&self) -> PathBuf {
        paths::resolve(&self.debug_images_dir)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    pub endpoint: String,
    /// Pause between requests
    pub delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://genshin-center.com/api/achievements/update".to_string(),
            delay_ms: 100,
            timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Loads configuration from `path` (or config.json next to the
    /// executable) and falls back to defaults if it is missing or invalid.
    pub fn load(path: Option<&Path>) -> Self {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(paths::get_default_config_path);

        tracing::info!("Looking for config at: {}", config_path.display());

        if !config_path.exists() {
            tracing::info!("{} not found. Using default config.", config_path.display());
            return Self::default();
        }

        match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Config loaded from {}", config_path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse {}: {}. Using defaults.",
                        config_path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Failed to read {}: {}. Using defaults.",
                    config_path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("nope.json")));
        assert_eq!(config.scan.process_name, "GenshinImpact.exe");
        assert_eq!(config.matching.title_threshold, 90.0);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "delays": { "click_settle_ms": 250 }, "scroll": { "achievements": { "base": 30 } } }"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path));

        assert_eq!(config.delays.click_settle_ms, 250);
        assert_eq!(config.delays.escape_ms, 1000);
        assert_eq!(config.scroll.achievements.base, 30);
        assert!(config.scroll.achievements.corrections.is_empty());
        assert_eq!(config.scroll.categories, ScrollProfile::categories());
        assert_eq!(config.layout.end_category.count, 7);
    }

    #[test]
    fn test_shipped_config_parses() {
        let config: AppConfig = serde_json::from_str(include_str!("../config.json")).unwrap();
        assert_eq!(config.submission.delay_ms, 100);
        assert_eq!(
            config.ocr.tesseract_path.as_deref(),
            Some(Path::new(DEFAULT_TESSERACT_PATH))
        );
    }

    #[test]
    fn test_invalid_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let config = AppConfig::load(Some(&path));
        assert_eq!(config.scan.max_blank_rows, 5);
    }

    #[test]
    fn test_output_paths() {
        let dir = tempdir().unwrap();
        let output = OutputConfig {
            results_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert_eq!(output.achievements_path(), dir.path().join("achievements.json"));
    }
}
