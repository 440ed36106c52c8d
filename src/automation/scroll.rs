//! Scroll step tuning.
//!
//! One wheel event does not move the lists by a whole number of rows, so
//! after enough pages the visible rows drift out of their boxes. The fix is
//! empirical: every so often a page is scrolled one step less. The amount is
//! a pure function of the running counter so it can be tuned from config.

use serde::{Deserialize, Serialize};

/// Adjust the step count whenever the counter is a multiple of `every`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollCorrection {
    pub every: u32,
    pub delta: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollProfile {
    /// Wheel events per page
    pub base: u32,
    #[serde(default)]
    pub corrections: Vec<ScrollCorrection>,
}

impl ScrollProfile {
    /// Profile for paging through achievement rows.
    pub fn achievements() -> Self {
        Self {
            base: 35,
            corrections: vec![ScrollCorrection { every: 15, delta: -1 }],
        }
    }

    /// Profile for moving the category list by one tab.
    pub fn categories() -> Self {
        Self {
            base: 6,
            corrections: vec![
                ScrollCorrection { every: 4, delta: -1 },
                ScrollCorrection { every: 33, delta: -1 },
            ],
        }
    }

    /// Number of wheel events for the page reached at `counter`.
    pub fn steps(&self, counter: u32) -> u32 {
        let adjustment: i64 = self
            .corrections
            .iter()
            .filter(|c| c.every != 0 && counter % c.every == 0)
            .map(|c| c.delta as i64)
            .sum();
        (self.base as i64 + adjustment).max(0) as u32
    }
}
