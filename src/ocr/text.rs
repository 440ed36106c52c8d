//! Fixups for recurring Tesseract misreads.

/// Cleans a raw title reading.
///
/// Returns `None` for empty readings. Otherwise keeps the first line only,
/// straightens curly double quotes and restores the accents Tesseract drops
/// from "Déjà".
pub fn clean_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let first = trimmed.lines().next()?;
    if first.is_empty() {
        return None;
    }

    Some(
        first
            .replace(['\u{201c}', '\u{201d}'], "\"")
            .replace("Deja", "Déjà"),
    )
}

/// Cleans a raw category label; long labels wrap onto a second line.
pub fn clean_category(raw: &str) -> String {
    raw.trim().replace("and\nEternity", "and Eternity")
}
