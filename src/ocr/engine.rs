use anyhow::{anyhow, Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;

use super::setup::locate_tesseract;
use crate::config::OcrConfig;

/// Turns an encoded image into text.
pub trait TextRecognizer {
    /// Recognizes the text in PNG-encoded image bytes.
    fn recognize(&self, png: &[u8]) -> Result<String>;
}

/// Runs the Tesseract executable once per image.
pub struct Tesseract {
    executable: PathBuf,
    tessdata_dir: Option<PathBuf>,
    language: String,
    psm: Option<u8>,
}

impl Tesseract {
    /// Locates the engine. Fails with installation instructions if missing.
    pub fn from_config(config: &OcrConfig) -> Result<Self> {
        let executable = locate_tesseract(config)?;
        Ok(Self::new(executable, config))
    }

    pub fn new(executable: PathBuf, config: &OcrConfig) -> Self {
        Self {
            executable,
            tessdata_dir: config.tessdata_dir.clone(),
            language: config.language.clone(),
            psm: config.page_segmentation_mode,
        }
    }

    fn command(&self, input: &std::path::Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(input).arg("stdout").arg("-l").arg(&self.language);
        if let Some(dir) = &self.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        if let Some(psm) = self.psm {
            cmd.arg("--psm").arg(psm.to_string());
        }
        cmd
    }
}

impl TextRecognizer for Tesseract {
    fn recognize(&self, png: &[u8]) -> Result<String> {
        let mut temp_input = NamedTempFile::with_suffix(".png")?;
        temp_input
            .write_all(png)
            .context("Failed to write OCR input image")?;
        temp_input.flush()?;

        let output = self
            .command(temp_input.path())
            .output()
            .with_context(|| format!("Failed to run {}", self.executable.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Tesseract failed: {}", stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
