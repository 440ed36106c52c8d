//! Achievement Scanner
//!
//! Opens the game's achievement screen, scans every category and writes the
//! completed achievements to `results/achievements.json`.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use achievement_scanner::{console, elevation, logging, paths, AppConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Scans completed achievements from the game window")]
struct Cli {
    /// Config file (default: config.json next to the executable)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save every capture to the debug image directory
    #[arg(long)]
    debug_images: bool,

    /// Send raw captures to OCR without cleanup
    #[arg(long)]
    no_preprocessing: bool,

    /// Read category labels only
    #[arg(long)]
    skip_rows: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,

    /// Do not restart with administrator rights
    #[arg(long)]
    no_elevate: bool,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if self.debug_images {
            config.scan.save_debug_images = true;
        }
        if self.no_preprocessing {
            config.scan.disable_preprocessing = true;
        }
        if self.skip_rows {
            config.scan.skip_achievement_rows = true;
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if !cli.no_elevate && !elevation::is_elevated() {
        elevation::relaunch_elevated()?;
        return Ok(ExitCode::SUCCESS);
    }

    logging::init("achievement_scanner", cli.verbose)?;

    let mut config = AppConfig::load(cli.config.as_deref());
    cli.apply(&mut config);

    let code = logging::exit_code(&run(config));
    console::wait_for_exit();
    Ok(code)
}

#[cfg(windows)]
fn run(config: AppConfig) -> Result<()> {
    use achievement_scanner::automation::{AchievementScanner, GameWindow};
    use achievement_scanner::ocr::Tesseract;

    let debug_dir = config
        .scan
        .save_debug_images
        .then(|| config.output.debug_images_dir());
    paths::ensure_directories(&config.output.results_dir(), debug_dir.as_deref())?;

    // Checked before touching the game: without OCR nothing can be read
    let recognizer = Tesseract::from_config(&config.ocr)?;

    let mut window = GameWindow::find(&config.scan.process_name)?;
    achievement_scanner::automation::WindowDriver::focus(&mut window)?;

    let mut scanner = AchievementScanner::new(window, recognizer, config)?;
    scanner.run()?;
    Ok(())
}

#[cfg(not(windows))]
fn run(config: AppConfig) -> Result<()> {
    paths::ensure_directories(&config.output.results_dir(), None)?;
    anyhow::bail!("The scanner drives the game window through Win32 and only runs on Windows")
}
