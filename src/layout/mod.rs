//! Screen layout of the achievement UI.
//!
//! This module provides:
//! - Reference-to-window coordinate scaling (`coords`)
//! - Row box generation from one measured row (`boxes`)
//! - The reference measurements themselves (`reference`)
//! - The validated, scaled catalog used by the scanner (`catalog`)

pub mod boxes;
pub mod catalog;
pub mod coords;
pub mod reference;

pub use boxes::{generate_rows, BoxKey, Field, LabeledBox, RowTemplate, RowTemplateSpec};
pub use catalog::{BoxCatalog, CategorySlot, RowBoxes, ScaledButtons};
pub use coords::{click_target, scale_point, scale_rect, Point, Rect, WindowRect};
pub use reference::{ReferenceButtons, ReferenceLayout};
