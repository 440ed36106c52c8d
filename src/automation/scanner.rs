//! The scan loop.
//!
//! Opens the achievements screen, walks every category and every row, and
//! records which achievements are completed. Each row is clicked, captured,
//! cleaned, read with OCR and corrected against the reference database.
//! There is no retry: unreadable rows are skipped, and any error aborts the
//! run after the last checkpoint.

use anyhow::{Context, Result};
use std::cell::OnceCell;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::automation::driver::{Key, WindowDriver};
use crate::automation::progress::{CategoryProgress, RowTransition, ScanPhase};
use crate::automation::results::ScanResults;
use crate::automation::scroll::ScrollProfile;
use crate::config::AppConfig;
use crate::layout::{click_target, BoxCatalog, Point, Rect, RowBoxes, RowTemplate};
use crate::matching::{fuzzy, ReferenceDatabase};
use crate::ocr::{clean_category, clean_title, encode_png, prepare, CapturePolicy, TextRecognizer};

pub struct AchievementScanner<D: WindowDriver, R: TextRecognizer> {
    driver: D,
    recognizer: R,
    config: AppConfig,
    catalog: BoxCatalog,
    database: OnceCell<ReferenceDatabase>,
    results: ScanResults,
    results_path: PathBuf,
    debug_images_dir: Option<PathBuf>,
    /// Category labels whose rows have been scanned, in visiting order
    categories: Vec<String>,
    achievement_id: u32,
    category_id: u32,
    phase: ScanPhase,
}

impl<D: WindowDriver, R: TextRecognizer> AchievementScanner<D, R> {
    /// Scales the layout to the driver's window. The reference database is
    /// loaded on first use.
    pub fn new(driver: D, recognizer: R, config: AppConfig) -> Result<Self> {
        let window = driver.window_rect()?;
        tracing::info!(
            "Game window: {}x{} at ({}, {})",
            window.width,
            window.height,
            window.left,
            window.top
        );
        let catalog = BoxCatalog::build(&config.layout, window)?;

        let results_path = config.output.achievements_path();
        let debug_images_dir = if config.scan.save_debug_images {
            let dir = config.output.debug_images_dir();
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            Some(dir)
        } else {
            None
        };

        Ok(Self {
            driver,
            recognizer,
            config,
            catalog,
            database: OnceCell::new(),
            results: ScanResults::new(),
            results_path,
            debug_images_dir,
            categories: Vec::new(),
            achievement_id: 0,
            category_id: 0,
            phase: ScanPhase::Navigating,
        })
    }

    /// Uses an already loaded database instead of reading the asset files.
    pub fn with_database(self, database: ReferenceDatabase) -> Self {
        let _ = self.database.set(database);
        self
    }

    pub fn results(&self) -> &ScanResults {
        &self.results
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Runs a full scan and writes the results file.
    pub fn run(&mut self) -> Result<&ScanResults> {
        self.driver.focus()?;
        self.go_to_achievements()?;
        self.scan_categories()?;

        self.set_phase(ScanPhase::Done);
        self.save_checkpoint()?;
        tracing::info!(
            "Scan complete: {} completed achievements in {} categories. Results: {}",
            self.results.len(),
            self.categories.len(),
            self.results_path.display()
        );
        Ok(&self.results)
    }

    fn set_phase(&mut self, phase: ScanPhase) {
        if self.phase != phase {
            tracing::debug!("Phase: {}", phase);
            self.phase = phase;
        }
    }

    fn wait(&self, ms: u64) {
        if ms > 0 {
            thread::sleep(Duration::from_millis(ms));
        }
    }

    fn click(&mut self, at: Point) -> Result<()> {
        tracing::debug!("Clicking at ({}, {})", at.x, at.y);
        let window = self.catalog.window();
        if !window.contains_relative(at) {
            tracing::warn!(
                "Click ({}, {}) is outside the window ({}, {})",
                at.x,
                at.y,
                window.width,
                window.height
            );
        }
        self.driver.click(at)
    }

    fn click_region(&mut self, region: Rect) -> Result<()> {
        let target = click_target(&region, self.catalog.window());
        self.click(target)
    }

    fn scroll(&mut self, steps: u32, at: Point) -> Result<()> {
        tracing::debug!("Scrolling {} times at ({}, {})", steps, at.x, at.y);
        let distance = self.config.scroll.wheel_distance;
        for step in 1..=steps {
            self.driver.scroll(at, distance)?;
            self.wait(self.config.delays.scroll_tick_ms);
            tracing::trace!("{} / {}", step, steps);
        }
        self.wait(self.config.delays.scroll_settle_ms);
        Ok(())
    }

    fn go_to_achievements(&mut self) -> Result<()> {
        self.set_phase(ScanPhase::Navigating);
        for _ in 0..self.config.scan.escape_presses {
            self.driver.press_key(Key::Escape)?;
            self.wait(self.config.delays.escape_ms);
        }

        let buttons = self.catalog.buttons().clone();
        self.click(buttons.main_achievement_button)?;
        self.wait(self.config.delays.navigation_ms);
        self.click(buttons.main_achievement_category)?;
        self.wait(self.config.delays.navigation_ms);
        Ok(())
    }

    fn database(&self) -> Result<&ReferenceDatabase> {
        if let Some(db) = self.database.get() {
            return Ok(db);
        }
        let db = ReferenceDatabase::load(
            &self.config.database.achievements_path(),
            &self.config.database.categories_path(),
        )?;
        Ok(self.database.get_or_init(|| db))
    }

    fn correct(&self, raw: &str) -> Result<String> {
        let names = self.database()?.names();
        Ok(fuzzy::correct(raw, names, self.config.matching.title_threshold))
    }

    /// Captures, cleans and reads one region.
    fn read_region(&mut self, region: Rect, policy: CapturePolicy, debug_name: &str) -> Result<String> {
        let raw = self.driver.capture(region)?;
        let image = prepare(raw, policy, self.config.scan.disable_preprocessing);

        if let Some(dir) = &self.debug_images_dir {
            let path = dir.join(format!("{}.png", debug_name));
            image
                .save(&path)
                .with_context(|| format!("Failed to save {}", path.display()))?;
        }

        let png = encode_png(&image)?;
        self.recognizer.recognize(&png)
    }

    fn save_checkpoint(&self) -> Result<()> {
        self.results.save(&self.results_path)
    }

    fn scan_categories(&mut self) -> Result<()> {
        let buttons = self.catalog.buttons().clone();
        let settle = self.config.delays.category_settle_ms;
        let mut last_category: Option<String> = None;

        loop {
            self.category_id += 1;
            if self.category_id != 1 {
                tracing::info!("Scrolling to category {}", self.category_id);
                self.click(buttons.category_scroll)?;
                self.wait(settle);
                let steps = self.config.scroll.categories.steps(self.category_id);
                self.scroll(steps, buttons.category_scroll)?;
                self.wait(settle);
                tracing::info!("Clicking on category {}", self.category_id);
                self.click(buttons.achievement_category)?;
                self.wait(settle);
            }

            tracing::info!("Scanning category {}", self.category_id);
            let label = self.catalog.category_label();
            let name = self.scan_category(label)?;
            self.save_checkpoint()?;

            // The list no longer moves: the same tab was opened again
            if last_category.as_deref() == Some(name.as_str()) {
                break;
            }
            last_category = Some(name);
            self.wait(self.config.delays.category_pause_ms);
        }

        self.set_phase(ScanPhase::ScanningTrailingCategories);
        let slots = self.catalog.end_categories().to_vec();
        for slot in slots {
            self.category_id += 1;
            tracing::info!("Scanning category (end of list) {}", self.category_id);
            self.click_region(slot.label)?;
            self.wait(settle);
            self.scan_category(slot.label)?;
            self.save_checkpoint()?;
            self.set_phase(ScanPhase::ScanningTrailingCategories);
        }

        Ok(())
    }

    /// Reads the label of the open category and, if it is new, its rows.
    /// Returns the corrected label (empty when unreadable).
    fn scan_category(&mut self, label: Rect) -> Result<String> {
        self.set_phase(ScanPhase::ScanningCategoryLabel);
        let debug_name = format!("category_{}", self.category_id);
        let raw = self.read_region(label, CapturePolicy::Category, &debug_name)?;

        let cleaned = clean_category(&raw);
        if cleaned.is_empty() {
            tracing::warn!("Category {} has no readable label, skipping", self.category_id);
            return Ok(cleaned);
        }

        let name = self.correct(&cleaned)?;
        tracing::info!("Found category {}: {}", self.category_id, name);
        if self.categories.contains(&name) || self.config.scan.skip_achievement_rows {
            return Ok(name);
        }
        self.categories.push(name.clone());

        let mut progress = CategoryProgress::new(self.config.scan.max_blank_rows);
        self.scan_pages(&mut progress)?;
        self.scan_tail(&mut progress)?;

        Ok(name)
    }

    fn row_template(&self) -> RowTemplate {
        if self.category_id <= self.config.scan.standard_row_categories {
            tracing::debug!("Using standard achievement boxes");
            RowTemplate::StartAchievement
        } else {
            tracing::debug!("Using namecard achievement boxes");
            RowTemplate::StartNamecardAchievement
        }
    }

    /// Pages through the list until a title repeats.
    fn scan_pages(&mut self, progress: &mut CategoryProgress) -> Result<()> {
        self.set_phase(ScanPhase::ScanningAchievementRows);
        let rows = self.catalog.achievement_rows(self.row_template()).to_vec();
        let scroll_at = self.catalog.buttons().achievement_scroll;
        let profile: ScrollProfile = self.config.scroll.achievements.clone();
        let mut first_page = true;

        loop {
            if !first_page {
                tracing::info!("Scrolling...");
                self.scroll(profile.steps(self.achievement_id), scroll_at)?;
                self.wait(self.config.delays.page_settle_ms);
            }
            first_page = false;

            for row in &rows {
                self.achievement_id += 1;
                if self.scan_row(row, progress)? == RowTransition::EndOfListDetected {
                    tracing::info!("End of list after achievement {}", self.achievement_id);
                    return Ok(());
                }
            }
        }
    }

    fn scan_row(&mut self, row: &RowBoxes, progress: &mut CategoryProgress) -> Result<RowTransition> {
        let Some(title) = self.read_title(row)? else {
            return Ok(progress.observe_blank());
        };
        // Checked before the status: a repeated row was already recorded
        // when first seen, so its status is never clicked or read again.
        if progress.observe(&title) == RowTransition::EndOfListDetected {
            return Ok(RowTransition::EndOfListDetected);
        }

        if self.read_completed(row)? {
            self.results.upsert(title, true);
        }
        Ok(RowTransition::Continue)
    }

    /// Reads the rows below the scroll area, which the paging never reaches.
    fn scan_tail(&mut self, progress: &mut CategoryProgress) -> Result<()> {
        self.set_phase(ScanPhase::ScanningTailRows);
        let rows = self.catalog.achievement_rows(RowTemplate::EndAchievement).to_vec();

        for row in &rows {
            self.achievement_id += 1;
            let Some(title) = self.read_title(row)? else {
                continue;
            };
            if progress.contains(&title) {
                break;
            }
            progress.record(&title);

            if self.read_completed(row)? {
                self.results.upsert(title, true);
            }
        }
        Ok(())
    }

    /// Clicks and reads a row title. `None` if nothing readable was found.
    fn read_title(&mut self, row: &RowBoxes) -> Result<Option<String>> {
        tracing::info!("Capturing achievement {}", self.achievement_id);
        self.click_region(row.title)?;
        self.wait(self.config.delays.click_settle_ms);

        let debug_name = self.achievement_id.to_string();
        let raw = self.read_region(row.title, CapturePolicy::Title, &debug_name)?;
        let Some(cleaned) = clean_title(&raw) else {
            tracing::warn!("Achievement {} has no readable title", self.achievement_id);
            return Ok(None);
        };

        let title = self.correct(&cleaned)?;
        tracing::info!("Found achievement {}: {}", self.achievement_id, title);
        Ok(Some(title))
    }

    fn read_completed(&mut self, row: &RowBoxes) -> Result<bool> {
        self.click_region(row.status)?;
        self.wait(self.config.delays.click_settle_ms);

        let debug_name = format!("{}_status", self.achievement_id);
        let status = self.read_region(row.status, CapturePolicy::Status, &debug_name)?;
        let matching = &self.config.matching;
        let completed =
            fuzzy::is_completed(&status, &matching.completed_label, matching.completed_threshold);
        tracing::info!("Status: {} (completed: {})", status.trim(), completed);
        Ok(completed)
    }
}
