use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::OcrConfig;

/// Installer for the Tesseract build the scanner is tested with.
pub const TESSERACT_DOWNLOAD_URL: &str =
    "https://digi.bib.uni-mannheim.de/tesseract/tesseract-ocr-w64-setup-5.3.3.20231005.exe";

const COMMON_PATHS: [&str; 2] = [
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
];

/// Returns the per-user directory where a portable Tesseract may be placed.
pub fn get_tesseract_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("achievement-scanner")
        .join("tesseract")
}

fn tesseract_in_path() -> bool {
    Command::new("tesseract")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Finds the Tesseract executable.
///
/// Checks the configured path, the local data dir, `PATH`, then the usual
/// install locations. Not finding it is fatal for a scan, so the error
/// carries installation instructions.
pub fn locate_tesseract(config: &OcrConfig) -> Result<PathBuf> {
    if let Some(path) = &config.tesseract_path {
        if path.exists() {
            tracing::info!("Tesseract found at: {}", path.display());
            return Ok(path.clone());
        }
        tracing::debug!("Configured Tesseract path does not exist: {}", path.display());
    }

    let local_exe = get_tesseract_dir().join("tesseract.exe");
    if local_exe.exists() {
        tracing::info!("Tesseract found at: {}", local_exe.display());
        return Ok(local_exe);
    }

    if tesseract_in_path() {
        tracing::info!("Using Tesseract from PATH");
        return Ok(PathBuf::from("tesseract"));
    }

    if let Some(path) = COMMON_PATHS.iter().map(Path::new).find(|p| p.exists()) {
        tracing::info!("Tesseract found at: {}", path.display());
        return Ok(path.to_path_buf());
    }

    Err(missing_tesseract_error(config.tesseract_path.as_deref()))
}

fn missing_tesseract_error(configured: Option<&Path>) -> anyhow::Error {
    let expected = configured
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| COMMON_PATHS[0].to_string());

    anyhow!(
        "Tesseract is not installed (expected at {}).\n\
         1. Download the installer from: {}\n\
         2. Install it to the default location, or add it to PATH\n\
         3. Or set \"ocr.tesseract_path\" in config.json\n\
         4. Restart the scanner",
        expected,
        TESSERACT_DOWNLOAD_URL
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("tesseract.exe");
        std::fs::write(&exe, b"").unwrap();

        let config = OcrConfig {
            tesseract_path: Some(exe.clone()),
            ..Default::default()
        };
        assert_eq!(locate_tesseract(&config).unwrap(), exe);
    }

    #[test]
    fn test_missing_error_has_instructions() {
        let err = missing_tesseract_error(Some(Path::new("D:/nowhere/tesseract.exe")));
        let message = err.to_string();
        assert!(message.contains("D:/nowhere/tesseract.exe"));
        assert!(message.contains(TESSERACT_DOWNLOAD_URL));
    }
}
