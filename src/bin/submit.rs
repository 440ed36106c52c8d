//! Submits the achievements found by the scanner to the tracking site.

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use achievement_scanner::automation::load_achievements;
use achievement_scanner::matching::AchievementTable;
use achievement_scanner::submit::{collect_ids, parse_cookies, Submitter};
use achievement_scanner::{console, logging, AppConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Marks scanned achievements as done on the tracking site")]
struct Cli {
    /// Results file (default: the scanner's output)
    #[arg(long)]
    results: Option<PathBuf>,

    /// Cookies copied from the site; asked for on the console if omitted
    #[arg(long)]
    cookies: Option<String>,

    /// Config file (default: config.json next to the executable)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref());

    let cookies = match cli.cookies {
        Some(cookies) => cookies,
        None => console::prompt("Paste your genshin-center.com cookies and press \"Enter\": ")?,
    };
    let cookies = parse_cookies(&cookies);
    if cookies.is_empty() {
        bail!("No cookies given; the site will reject every request");
    }

    let results_path = cli
        .results
        .unwrap_or_else(|| config.output.achievements_path());
    let achievements = load_achievements(&results_path)?;
    let table = AchievementTable::load(&config.database.achievements_path())?;

    let (ids, skipped) = collect_ids(&achievements, &table);
    if !skipped.is_empty() {
        tracing::warn!("{} titles are not in the database and were skipped", skipped.len());
    }
    let completed = achievements.values().filter(|done| **done).count();
    tracing::info!(
        "Submitting {} ids for {} achievements",
        ids.len(),
        completed - skipped.len()
    );

    Submitter::new(&config.submission, &cookies)?.submit_all(&ids)?;
    tracing::info!("Done");
    Ok(())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init("submit", cli.verbose)?;

    let code = logging::exit_code(&run(cli));
    console::wait_for_exit();
    Ok(code)
}
