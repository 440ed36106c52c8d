//! Row box generation.
//!
//! The achievement and category lists are stacks of identical rows, so only
//! one row per list is measured by hand; the rest are derived by shifting it
//! vertically by a fixed step.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::coords::Rect;

/// Which list a generated row belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowTemplate {
    /// Achievement rows at the top of the page, regular categories.
    StartAchievement,
    /// Achievement rows at the top of the page for categories that show a
    /// namecard banner above the list.
    StartNamecardAchievement,
    /// Rows below the scroll area, read once the list stops scrolling.
    EndAchievement,
    /// Category tabs at the bottom of the category list.
    EndCategory,
}

impl RowTemplate {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartAchievement => "start_achievement",
            Self::StartNamecardAchievement => "start_achievement_category",
            Self::EndAchievement => "end_achievement",
            Self::EndCategory => "end_category",
        }
    }
}

/// Which part of a row a box covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Title,
    Status,
}

/// Structured key of a generated box, e.g. `start_achievement_3_status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxKey {
    pub template: RowTemplate,
    pub row: usize,
    pub field: Field,
}

impl BoxKey {
    pub fn new(template: RowTemplate, row: usize, field: Field) -> Self {
        Self {
            template,
            row,
            field,
        }
    }
}

impl fmt::Display for BoxKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.template.name(), self.row)?;
        if self.field == Field::Status {
            write!(f, "_status")?;
        }
        Ok(())
    }
}

/// A hand-measured row plus the parameters needed to repeat it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RowTemplateSpec {
    /// Title (or category label) box of row 0
    pub title: Rect,
    /// Status box of row 0, if rows in this list carry one
    #[serde(default)]
    pub status: Option<Rect>,
    /// Vertical distance between consecutive rows
    pub step: i32,
    /// Number of rows to generate
    pub count: usize,
    /// Rows grow downward (toward the screen bottom) instead of upward
    #[serde(default)]
    pub inversed: bool,
}

/// A generated box with its key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabeledBox {
    pub key: BoxKey,
    pub rect: Rect,
}

fn shifted(rect: Rect, offset: i32, inversed: bool) -> Rect {
    let top = if inversed {
        rect.top + offset
    } else {
        rect.top - offset
    };
    Rect::new(rect.left, top, rect.width, rect.height)
}

/// Generates `count` rows (and their status boxes, if any) from a template.
///
/// Row `i` sits `i * step` pixels above row 0, or below it when the template
/// is `inversed`. Only the vertical position changes.
pub fn generate_rows(template: RowTemplate, spec: &RowTemplateSpec) -> Vec<LabeledBox> {
    let per_row = if spec.status.is_some() { 2 } else { 1 };
    let mut boxes = Vec::with_capacity(spec.count * per_row);

    for row in 0..spec.count {
        let offset = row as i32 * spec.step;
        boxes.push(LabeledBox {
            key: BoxKey::new(template, row, Field::Title),
            rect: shifted(spec.title, offset, spec.inversed),
        });
        if let Some(status) = spec.status {
            boxes.push(LabeledBox {
                key: BoxKey::new(template, row, Field::Status),
                rect: shifted(status, offset, spec.inversed),
            });
        }
    }

    boxes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end_achievements() -> RowTemplateSpec {
        RowTemplateSpec {
            title: Rect::new(1167, 1148, 881, 140),
            status: Some(Rect::new(2219, 1148, 220, 140)),
            step: 167,
            count: 5,
            inversed: false,
        }
    }

    #[test]
    fn test_key_display() {
        let key = BoxKey::new(RowTemplate::StartNamecardAchievement, 3, Field::Status);
        assert_eq!(key.to_string(), "start_achievement_category_3_status");
        let key = BoxKey::new(RowTemplate::EndCategory, 0, Field::Title);
        assert_eq!(key.to_string(), "end_category_0");
    }

    #[test]
    fn test_generates_two_boxes_per_row_with_status() {
        let boxes = generate_rows(RowTemplate::EndAchievement, &end_achievements());
        assert_eq!(boxes.len(), 10);
    }

    #[test]
    fn test_generates_one_box_per_row_without_status() {
        let spec = RowTemplateSpec {
            title: Rect::new(173, 1213, 697, 109),
            status: None,
            step: 138,
            count: 7,
            inversed: false,
        };
        let boxes = generate_rows(RowTemplate::EndCategory, &spec);
        assert_eq!(boxes.len(), 7);
        assert!(boxes.iter().all(|b| b.key.field == Field::Title));
    }

    #[test]
    fn test_rows_grow_upward_by_default() {
        let spec = end_achievements();
        let boxes = generate_rows(RowTemplate::EndAchievement, &spec);
        let titles: Vec<_> = boxes.iter().filter(|b| b.key.field == Field::Title).collect();

        for (i, b) in titles.iter().enumerate() {
            assert_eq!(b.key.row, i);
            assert_eq!(spec.title.top - b.rect.top, i as i32 * spec.step);
            assert_eq!(b.rect.left, spec.title.left);
            assert_eq!(b.rect.width, spec.title.width);
            assert_eq!(b.rect.height, spec.title.height);
        }
    }

    #[test]
    fn test_inversed_rows_grow_downward() {
        let spec = RowTemplateSpec {
            title: Rect::new(1167, 176, 878, 138),
            status: Some(Rect::new(2208, 176, 220, 138)),
            step: 167,
            count: 5,
            inversed: true,
        };
        let boxes = generate_rows(RowTemplate::StartAchievement, &spec);

        for b in &boxes {
            let base = match b.key.field {
                Field::Title => spec.title,
                Field::Status => spec.status.unwrap(),
            };
            assert_eq!(b.rect.top - base.top, b.key.row as i32 * spec.step);
            assert_eq!(b.rect.width, base.width);
        }
        assert_eq!(boxes.last().unwrap().key.to_string(), "start_achievement_4_status");
    }

    #[test]
    fn test_zero_count_generates_nothing() {
        let spec = RowTemplateSpec {
            count: 0,
            ..end_achievements()
        };
        assert!(generate_rows(RowTemplate::EndAchievement, &spec).is_empty());
    }
}
