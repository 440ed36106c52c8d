//! Scan progress within one category.
//!
//! The game gives no signal when the achievement list stops scrolling: the
//! last page just shows the same rows again. End of list is therefore
//! inferred from the titles themselves.

use std::collections::HashSet;
use std::fmt;

/// What the scanner should do after a row has been read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowTransition {
    Continue,
    /// The row repeats an earlier one; the list has stopped scrolling.
    EndOfListDetected,
}

/// Where the scan loop currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanPhase {
    Navigating,
    ScanningCategoryLabel,
    ScanningAchievementRows,
    ScanningTailRows,
    ScanningTrailingCategories,
    Done,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanPhase::Navigating => write!(f, "Navigating to achievements"),
            ScanPhase::ScanningCategoryLabel => write!(f, "Reading category label"),
            ScanPhase::ScanningAchievementRows => write!(f, "Scanning achievement rows"),
            ScanPhase::ScanningTailRows => write!(f, "Scanning last rows"),
            ScanPhase::ScanningTrailingCategories => write!(f, "Scanning trailing categories"),
            ScanPhase::Done => write!(f, "Done"),
        }
    }
}

/// Titles seen so far in the current category.
#[derive(Debug)]
pub struct CategoryProgress {
    last: Option<String>,
    seen: HashSet<String>,
    blank_streak: u32,
    max_blank_rows: u32,
}

impl CategoryProgress {
    pub fn new(max_blank_rows: u32) -> Self {
        Self {
            last: None,
            seen: HashSet::new(),
            blank_streak: 0,
            max_blank_rows,
        }
    }

    /// Records a title read while paging. A title equal to the previous one,
    /// or to any title seen earlier in this category, ends the list and is
    /// not recorded.
    pub fn observe(&mut self, title: &str) -> RowTransition {
        self.blank_streak = 0;
        if self.last.as_deref() == Some(title) || self.seen.contains(title) {
            return RowTransition::EndOfListDetected;
        }
        self.last = Some(title.to_string());
        self.record(title);
        RowTransition::Continue
    }

    /// Counts a row whose title could not be read. Enough of them in a row
    /// also end the list, so a lost window cannot keep the scan going.
    pub fn observe_blank(&mut self) -> RowTransition {
        self.blank_streak += 1;
        if self.max_blank_rows > 0 && self.blank_streak >= self.max_blank_rows {
            tracing::warn!("{} unreadable rows in a row, ending category", self.blank_streak);
            RowTransition::EndOfListDetected
        } else {
            RowTransition::Continue
        }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.seen.contains(title)
    }

    /// Adds a title without the end-of-list check (rows below the scroll area).
    pub fn record(&mut self, title: &str) {
        self.seen.insert(title.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_title_ends_list() {
        let mut progress = CategoryProgress::new(5);
        let transitions: Vec<_> = ["A", "B", "C", "C"]
            .iter()
            .map(|t| progress.observe(t))
            .collect();

        assert_eq!(
            transitions,
            [
                RowTransition::Continue,
                RowTransition::Continue,
                RowTransition::Continue,
                RowTransition::EndOfListDetected
            ]
        );
        assert!(["A", "B", "C"].iter().all(|t| progress.contains(t)));
    }

    #[test]
    fn test_earlier_title_ends_list() {
        let mut progress = CategoryProgress::new(5);
        progress.observe("A");
        progress.observe("B");
        assert_eq!(progress.observe("A"), RowTransition::EndOfListDetected);
    }

    #[test]
    fn test_blank_streak() {
        let mut progress = CategoryProgress::new(3);
        assert_eq!(progress.observe_blank(), RowTransition::Continue);
        assert_eq!(progress.observe_blank(), RowTransition::Continue);
        // A readable title resets the streak
        progress.observe("A");
        assert_eq!(progress.observe_blank(), RowTransition::Continue);
        assert_eq!(progress.observe_blank(), RowTransition::Continue);
        assert_eq!(progress.observe_blank(), RowTransition::EndOfListDetected);
    }

    #[test]
    fn test_blank_guard_disabled() {
        let mut progress = CategoryProgress::new(0);
        for _ in 0..100 {
            assert_eq!(progress.observe_blank(), RowTransition::Continue);
        }
    }

    #[test]
    fn test_recorded_title_ends_list() {
        let mut progress = CategoryProgress::new(5);
        progress.record("A");
        assert!(progress.contains("A"));
        assert!(!progress.contains("B"));
        assert_eq!(progress.observe("A"), RowTransition::EndOfListDetected);
    }
}
