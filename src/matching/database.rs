use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::Path;

/// One entry of the achievement table. Other fields in the file are ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct AchievementRecord {
    pub name: String,
}

/// Achievement table as published by the tracking site: id -> record.
pub type AchievementFile = HashMap<String, AchievementRecord>;
/// Category table: id -> name.
pub type CategoryFile = HashMap<String, String>;

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_achievement_file(path: &Path) -> Result<AchievementFile> {
    read_json(path)
}

pub fn load_category_file(path: &Path) -> Result<CategoryFile> {
    read_json(path)
}

/// Every known achievement and category name, sorted. OCR readings are
/// corrected against this list.
#[derive(Clone, Debug, Default)]
pub struct ReferenceDatabase {
    names: Vec<String>,
}

impl ReferenceDatabase {
    pub fn load(achievements: &Path, categories: &Path) -> Result<Self> {
        let achievement_file = load_achievement_file(achievements)?;
        let category_file = load_category_file(categories)?;

        let db = Self::from_names(
            achievement_file
                .into_values()
                .map(|record| record.name)
                .chain(category_file.into_values()),
        );
        tracing::info!(
            "Loaded {} reference names from {} and {}",
            db.len(),
            achievements.display(),
            categories.display()
        );
        Ok(db)
    }

    pub fn from_names<I: IntoIterator<Item = String>>(names: I) -> Self {
        let mut names: Vec<String> = names.into_iter().collect();
        names.sort();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Reverse lookup from achievement title to site ids.
///
/// Several achievements share a title (multi-stage ones), so a title maps to
/// all its ids, ascending.
#[derive(Clone, Debug, Default)]
pub struct AchievementTable {
    ids_by_title: HashMap<String, Vec<u64>>,
}

impl AchievementTable {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_file(load_achievement_file(path)?))
    }

    pub fn from_file(file: AchievementFile) -> Self {
        let mut ids_by_title: HashMap<String, Vec<u64>> = HashMap::new();

        for (key, record) in file {
            match key.parse::<u64>() {
                Ok(id) => ids_by_title.entry(record.name).or_default().push(id),
                Err(_) => tracing::warn!("Skipping achievement with non-numeric id: {}", key),
            }
        }
        for ids in ids_by_title.values_mut() {
            ids.sort_unstable();
        }

        Self { ids_by_title }
    }

    pub fn ids(&self, title: &str) -> Option<&[u64]> {
        self.ids_by_title.get(title).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const ACHIEVEMENTS: &str = r#"{
        "84517": { "name": "Adventurer", "category_id": 0 },
        "84502": { "name": "Adventurer", "category_id": 0 },
        "80001": { "name": "Wonders of the World" }
    }"#;
    const CATEGORIES: &str = r#"{ "0": "Wonders of the World", "1": "Memories of the Heart" }"#;

    #[test]
    fn test_load_merges_and_sorts() {
        let dir = tempdir().unwrap();
        let achievements = dir.path().join("gc_achievements.json");
        let categories = dir.path().join("gc_categories.json");
        fs::write(&achievements, ACHIEVEMENTS).unwrap();
        fs::write(&categories, CATEGORIES).unwrap();

        let db = ReferenceDatabase::load(&achievements, &categories).unwrap();
        assert_eq!(
            db.names(),
            [
                "Adventurer",
                "Adventurer",
                "Memories of the Heart",
                "Wonders of the World",
                "Wonders of the World"
            ]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = ReferenceDatabase::load(&dir.path().join("a.json"), &dir.path().join("c.json"))
            .unwrap_err();
        assert!(err.to_string().contains("a.json"));
    }

    #[test]
    fn test_reverse_lookup_sorted_ids() {
        let file: AchievementFile = serde_json::from_str(ACHIEVEMENTS).unwrap();
        let table = AchievementTable::from_file(file);

        assert_eq!(table.ids("Adventurer"), Some(&[84502, 84517][..]));
        assert_eq!(table.ids("Wonders of the World"), Some(&[80001][..]));
        assert_eq!(table.ids("Unknown"), None);
    }

    #[test]
    fn test_reverse_lookup_skips_bad_ids() {
        let file: AchievementFile =
            serde_json::from_str(r#"{ "x1": { "name": "Broken" }, "7": { "name": "Fine" } }"#)
                .unwrap();
        let table = AchievementTable::from_file(file);
        assert_eq!(table.ids("Broken"), None);
        assert_eq!(table.ids("Fine"), Some(&[7][..]));
    }
}
