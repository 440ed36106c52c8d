//! Coordinate conversion utilities.
//!
//! Every box and click target is authored against a 2560x1440 reference
//! window and scaled linearly, per axis, to the live window. Derived
//! coordinates are truncated, never rounded.

use serde::{Deserialize, Serialize};

/// Width of the resolution all reference coordinates are authored in.
pub const REFERENCE_WIDTH: i32 = 2560;
/// Height of the resolution all reference coordinates are authored in.
pub const REFERENCE_HEIGHT: i32 = 1440;

/// A point in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Center of the rectangle, truncated.
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2, self.top + self.height / 2)
    }
}

/// The game window's rectangle in absolute screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowRect {
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Converts an absolute screen point to window-relative coordinates.
    pub fn to_relative(&self, screen: Point) -> Point {
        Point::new(screen.x - self.left, screen.y - self.top)
    }

    /// True if a window-relative point lies inside the window's extent.
    pub fn contains_relative(&self, point: Point) -> bool {
        point.x <= self.width && point.y <= self.height
    }
}

fn scale_axis(value: i32, target: i32, reference: i32) -> i32 {
    // i64 keeps large desktops from overflowing the product
    ((value as i64 * target as i64) / reference as i64) as i32
}

/// Scales a reference point to a window of the given size.
///
/// The result is window-relative: the window offset is not added, because
/// input is delivered relative to the window origin.
pub fn scale_point(point: Point, width: i32, height: i32) -> Point {
    Point::new(
        scale_axis(point.x, width, REFERENCE_WIDTH),
        scale_axis(point.y, height, REFERENCE_HEIGHT),
    )
}

/// Scales a reference rectangle into the window's absolute screen space.
///
/// The window's top-left is added so the result can be handed straight to a
/// screen capture.
pub fn scale_rect(rect: Rect, window: &WindowRect) -> Rect {
    Rect::new(
        scale_axis(rect.left, window.width, REFERENCE_WIDTH) + window.left,
        scale_axis(rect.top, window.height, REFERENCE_HEIGHT) + window.top,
        scale_axis(rect.width, window.width, REFERENCE_WIDTH),
        scale_axis(rect.height, window.height, REFERENCE_HEIGHT),
    )
}

/// Center of an absolute (scaled) region, as a window-relative click target.
pub fn click_target(region: &Rect, window: &WindowRect) -> Point {
    window.to_relative(region.center())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_rect_halves_at_720p() {
        let window = WindowRect::new(0, 0, 1280, 720);
        let scaled = scale_rect(Rect::new(100, 100, 50, 20), &window);
        assert_eq!(scaled, Rect::new(50, 50, 25, 10));
    }

    #[test]
    fn test_scale_rect_adds_window_offset() {
        let window = WindowRect::new(300, 40, 1280, 720);
        let scaled = scale_rect(Rect::new(100, 100, 50, 20), &window);
        assert_eq!(scaled, Rect::new(350, 90, 25, 10));
    }

    #[test]
    fn test_scale_point_ignores_window_offset() {
        let point = scale_point(Point::new(885, 542), 1280, 720);
        assert_eq!(point, Point::new(442, 271));
    }

    #[test]
    fn test_scale_truncates() {
        // 1167 * 1920 / 2560 = 875.25
        let window = WindowRect::new(0, 0, 1920, 1080);
        let scaled = scale_rect(Rect::new(1167, 176, 878, 138), &window);
        assert_eq!(scaled, Rect::new(875, 132, 658, 103));
    }

    #[test]
    fn test_rescaling_starts_from_reference() {
        let rect = Rect::new(1167, 1148, 881, 140);
        let a = WindowRect::new(0, 0, 1280, 720);
        let at_a = scale_rect(rect, &a);
        assert_eq!(at_a, Rect::new(583, 574, 440, 70));

        // Scaling the already-scaled box compounds the truncation
        let b = WindowRect::new(0, 0, 1920, 1080);
        let chained = Rect::new(
            scale_axis(at_a.left, b.width, a.width),
            scale_axis(at_a.top, b.height, a.height),
            scale_axis(at_a.width, b.width, a.width),
            scale_axis(at_a.height, b.height, a.height),
        );
        assert_eq!(chained, Rect::new(874, 861, 660, 105));

        let direct = scale_rect(rect, &b);
        assert_eq!(direct, Rect::new(875, 861, 660, 105));
        assert_ne!(chained, direct);
    }

    #[test]
    fn test_reference_resolution_is_identity() {
        let window = WindowRect::new(0, 0, REFERENCE_WIDTH, REFERENCE_HEIGHT);
        let rect = Rect::new(1167, 400, 900, 126);
        assert_eq!(scale_rect(rect, &window), rect);
        assert_eq!(scale_point(Point::new(969, 448), 2560, 1440), Point::new(969, 448));
    }

    #[test]
    fn test_click_target_is_window_relative() {
        let window = WindowRect::new(100, 50, 1280, 720);
        let region = scale_rect(Rect::new(100, 100, 50, 20), &window);
        assert_eq!(region, Rect::new(150, 100, 25, 10));
        assert_eq!(click_target(&region, &window), Point::new(62, 55));
    }
}
