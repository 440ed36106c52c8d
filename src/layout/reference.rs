//! Reference layout of the achievement screen, measured at 2560x1440.

use serde::{Deserialize, Serialize};

use super::boxes::RowTemplateSpec;
use super::coords::{Point, Rect};

/// Click targets, in reference coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceButtons {
    /// Achievements entry in the game menu
    pub main_achievement_button: Point,
    /// First category in the category list
    pub main_achievement_category: Point,
    /// Category tab that is opened after scrolling the category list
    pub achievement_category: Point,
    /// Where the wheel is turned to scroll the achievement list
    pub achievement_scroll: Point,
    /// Where the wheel is turned to scroll the category list
    pub category_scroll: Point,
}

impl Default for ReferenceButtons {
    fn default() -> Self {
        Self {
            main_achievement_button: Point::new(885, 542),
            main_achievement_category: Point::new(249, 384),
            achievement_category: Point::new(500, 290),
            achievement_scroll: Point::new(969, 448),
            category_scroll: Point::new(53, 448),
        }
    }
}

/// Every box the scanner reads, in reference coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceLayout {
    pub buttons: ReferenceButtons,
    /// Label of the currently opened category
    pub category_label: Rect,
    pub start_achievement: RowTemplateSpec,
    pub start_namecard_achievement: RowTemplateSpec,
    pub end_achievement: RowTemplateSpec,
    pub end_category: RowTemplateSpec,
}

impl Default for ReferenceLayout {
    fn default() -> Self {
        Self {
            buttons: ReferenceButtons::default(),
            category_label: Rect::new(152, 240, 658, 106),
            start_achievement: RowTemplateSpec {
                title: Rect::new(1167, 176, 878, 138),
                status: Some(Rect::new(2208, 176, 220, 138)),
                step: 167,
                count: 5,
                inversed: true,
            },
            start_namecard_achievement: RowTemplateSpec {
                title: Rect::new(1167, 400, 900, 126),
                status: Some(Rect::new(2224, 400, 192, 126)),
                step: 167,
                count: 5,
                inversed: true,
            },
            end_achievement: RowTemplateSpec {
                title: Rect::new(1167, 1148, 881, 140),
                status: Some(Rect::new(2219, 1148, 220, 140)),
                step: 167,
                count: 5,
                inversed: false,
            },
            end_category: RowTemplateSpec {
                title: Rect::new(173, 1213, 697, 109),
                status: None,
                step: 138,
                count: 7,
                inversed: false,
            },
        }
    }
}
