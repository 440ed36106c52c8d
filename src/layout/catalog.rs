//! Box catalog: every reference box scaled to the live window.
//!
//! Built once per run. Row boxes are grouped per template while building,
//! so a missing row or status box fails here instead of in the middle of a
//! scan.

use anyhow::{anyhow, bail, Result};
use std::collections::BTreeMap;

use super::boxes::{generate_rows, BoxKey, Field, RowTemplate, RowTemplateSpec};
use super::coords::{scale_point, scale_rect, Point, Rect, WindowRect};
use super::reference::ReferenceLayout;

/// Click targets scaled to the window (window-relative).
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledButtons {
    pub main_achievement_button: Point,
    pub main_achievement_category: Point,
    pub achievement_category: Point,
    pub achievement_scroll: Point,
    pub category_scroll: Point,
}

/// Title and status box of one achievement row (absolute screen coordinates).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowBoxes {
    pub row: usize,
    pub title: Rect,
    pub status: Rect,
}

/// A category tab below the scrolling category list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategorySlot {
    pub row: usize,
    pub label: Rect,
}

#[derive(Clone, Debug)]
pub struct BoxCatalog {
    window: WindowRect,
    buttons: ScaledButtons,
    category_label: Rect,
    start_achievement: Vec<RowBoxes>,
    start_namecard_achievement: Vec<RowBoxes>,
    end_achievement: Vec<RowBoxes>,
    end_category: Vec<CategorySlot>,
}

impl BoxCatalog {
    /// Scales the reference layout to `window` and validates it.
    pub fn build(layout: &ReferenceLayout, window: WindowRect) -> Result<Self> {
        if window.width <= 0 || window.height <= 0 {
            bail!(
                "Window has no usable area ({}x{}). Is the game minimized?",
                window.width,
                window.height
            );
        }

        let b = &layout.buttons;
        let scale = |p: Point| scale_point(p, window.width, window.height);
        let buttons = ScaledButtons {
            main_achievement_button: scale(b.main_achievement_button),
            main_achievement_category: scale(b.main_achievement_category),
            achievement_category: scale(b.achievement_category),
            achievement_scroll: scale(b.achievement_scroll),
            category_scroll: scale(b.category_scroll),
        };

        let category_label = checked(scale_rect(layout.category_label, &window), "category_label")?;

        let templates = [
            (RowTemplate::StartAchievement, &layout.start_achievement),
            (RowTemplate::StartNamecardAchievement, &layout.start_namecard_achievement),
            (RowTemplate::EndAchievement, &layout.end_achievement),
            (RowTemplate::EndCategory, &layout.end_category),
        ];

        let mut boxes = BTreeMap::new();
        for (template, spec) in templates {
            for generated in generate_rows(template, spec) {
                let rect = checked(scale_rect(generated.rect, &window), &generated.key.to_string())?;
                boxes.insert(generated.key, rect);
            }
        }

        let start_achievement =
            achievement_rows(&boxes, RowTemplate::StartAchievement, &layout.start_achievement)?;
        let start_namecard_achievement = achievement_rows(
            &boxes,
            RowTemplate::StartNamecardAchievement,
            &layout.start_namecard_achievement,
        )?;
        let end_achievement =
            achievement_rows(&boxes, RowTemplate::EndAchievement, &layout.end_achievement)?;

        let end_category = (0..layout.end_category.count)
            .map(|row| {
                let key = BoxKey::new(RowTemplate::EndCategory, row, Field::Title);
                lookup(&boxes, key).map(|label| CategorySlot { row, label })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "Box catalog ready: {} boxes for window {}x{} at ({}, {})",
            boxes.len() + 1,
            window.width,
            window.height,
            window.left,
            window.top
        );

        Ok(Self {
            window,
            buttons,
            category_label,
            start_achievement,
            start_namecard_achievement,
            end_achievement,
            end_category,
        })
    }

    pub fn window(&self) -> &WindowRect {
        &self.window
    }

    pub fn buttons(&self) -> &ScaledButtons {
        &self.buttons
    }

    pub fn category_label(&self) -> Rect {
        self.category_label
    }

    /// Rows of an achievement template, top to bottom in generation order.
    pub fn achievement_rows(&self, template: RowTemplate) -> &[RowBoxes] {
        match template {
            RowTemplate::StartAchievement => &self.start_achievement,
            RowTemplate::StartNamecardAchievement => &self.start_namecard_achievement,
            RowTemplate::EndAchievement => &self.end_achievement,
            RowTemplate::EndCategory => &[],
        }
    }

    pub fn end_categories(&self) -> &[CategorySlot] {
        &self.end_category
    }

}

fn checked(rect: Rect, name: &str) -> Result<Rect> {
    if rect.width <= 0 || rect.height <= 0 {
        bail!("Box {} scales to an empty region: {:?}", name, rect);
    }
    Ok(rect)
}

fn lookup(boxes: &BTreeMap<BoxKey, Rect>, key: BoxKey) -> Result<Rect> {
    boxes
        .get(&key)
        .copied()
        .ok_or_else(|| anyhow!("Layout is missing box {}", key))
}

fn achievement_rows(
    boxes: &BTreeMap<BoxKey, Rect>,
    template: RowTemplate,
    spec: &RowTemplateSpec,
) -> Result<Vec<RowBoxes>> {
    if spec.count == 0 {
        bail!("Template {} must have at least one row", template.name());
    }
    if spec.status.is_none() {
        bail!("Template {} needs a status box", template.name());
    }

    (0..spec.count)
        .map(|row| {
            Ok(RowBoxes {
                row,
                title: lookup(boxes, BoxKey::new(template, row, Field::Title))?,
                status: lookup(boxes, BoxKey::new(template, row, Field::Status))?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_default_layout() {
        let window = WindowRect::new(0, 0, 1920, 1080);
        let catalog = BoxCatalog::build(&ReferenceLayout::default(), window).unwrap();

        assert_eq!(catalog.achievement_rows(RowTemplate::StartAchievement).len(), 5);
        assert_eq!(catalog.achievement_rows(RowTemplate::StartNamecardAchievement).len(), 5);
        assert_eq!(catalog.achievement_rows(RowTemplate::EndAchievement).len(), 5);
        assert!(catalog.achievement_rows(RowTemplate::EndCategory).is_empty());
        assert_eq!(catalog.end_categories().len(), 7);
    }

    #[test]
    fn test_rows_match_keyed_boxes() {
        let window = WindowRect::new(50, 30, 1280, 720);
        let catalog = BoxCatalog::build(&ReferenceLayout::default(), window).unwrap();

        let layout = ReferenceLayout::default();
        let generated = generate_rows(
            RowTemplate::StartNamecardAchievement,
            &layout.start_namecard_achievement,
        );

        for row in catalog.achievement_rows(RowTemplate::StartNamecardAchievement) {
            let key = BoxKey::new(RowTemplate::StartNamecardAchievement, row.row, Field::Status);
            let reference = generated.iter().find(|g| g.key == key).unwrap();
            assert_eq!(scale_rect(reference.rect, &window), row.status);
        }
    }

    #[test]
    fn test_buttons_are_window_relative() {
        let window = WindowRect::new(500, 200, 1280, 720);
        let catalog = BoxCatalog::build(&ReferenceLayout::default(), window).unwrap();
        assert_eq!(catalog.buttons().achievement_category, Point::new(250, 145));
        // Regions carry the window offset
        assert_eq!(catalog.category_label().left, 76 + 500);
    }

    #[test]
    fn test_missing_status_fails_at_build() {
        let mut layout = ReferenceLayout::default();
        layout.end_achievement.status = None;

        let err = BoxCatalog::build(&layout, WindowRect::new(0, 0, 1920, 1080)).unwrap_err();
        assert!(err.to_string().contains("end_achievement"));
    }

    #[test]
    fn test_empty_template_fails_at_build() {
        let mut layout = ReferenceLayout::default();
        layout.start_achievement.count = 0;
        assert!(BoxCatalog::build(&layout, WindowRect::new(0, 0, 1920, 1080)).is_err());
    }

    #[test]
    fn test_minimized_window_fails_at_build() {
        let window = WindowRect::new(-32000, -32000, 0, 0);
        assert!(BoxCatalog::build(&ReferenceLayout::default(), window).is_err());
    }
}
