//! Reference data and fuzzy correction of OCR readings.

pub mod database;
pub mod fuzzy;

pub use database::{AchievementTable, ReferenceDatabase};
pub use fuzzy::{correct, extract_one, is_completed, partial_ratio, ratio, weighted_ratio};
