use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Resolves a configured path: absolute paths are kept, relative ones are
/// taken relative to the executable directory.
pub fn resolve(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        get_exe_dir().join(path)
    }
}

/// Returns the logs directory: `<exe_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_exe_dir().join("logs")
}

/// Returns the default config file: `<exe_dir>/config.json`
pub fn get_default_config_path() -> PathBuf {
    get_exe_dir().join("config.json")
}

/// Ensures the output directories exist. Call at startup.
pub fn ensure_directories(results_dir: &Path, debug_images_dir: Option<&Path>) -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())?;
    std::fs::create_dir_all(results_dir)?;
    if let Some(dir) = debug_images_dir {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_absolute_paths() {
        let dir = tempfile::tempdir().unwrap();
        let absolute = dir.path().join("achievements.json");
        assert_eq!(resolve(&absolute), absolute);
    }

    #[test]
    fn test_resolve_relative_to_exe_dir() {
        let resolved = resolve(Path::new("assets/gc_categories.json"));
        assert!(resolved.starts_with(get_exe_dir()));
        assert!(resolved.ends_with("assets/gc_categories.json"));
    }

    #[test]
    fn test_ensure_directories() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("results");
        let debug = results.join("debug_images");

        ensure_directories(&results, Some(&debug)).unwrap();

        assert!(results.is_dir());
        assert!(debug.is_dir());
    }
}
