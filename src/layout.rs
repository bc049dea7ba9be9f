//! Placement of the article context menu.

/// Horizontal distance from the touch point to the menu's left edge.
const MENU_OFFSET_X: f64 = 60.0;
/// Vertical distance from the touch point to the menu's top edge.
const MENU_OFFSET_Y: f64 = 50.0;
/// Width reserved for the menu when keeping it on screen.
const MENU_WIDTH: f64 = 170.0;
/// Minimum gap to the window's left and top edges.
const EDGE_MARGIN: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSize {
    pub width: f64,
    pub height: f64,
}

/// Top-left corner of the popup, in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub left: f64,
    pub top: f64,
}

/// Anchor the context menu near a touch.
///
/// `left = clamp(x - 60, 10, W - 170)` and `top = max(10, y - 50)`. The
/// lower bound wins when the window is narrower than the menu, so this never
/// panics the way `f64::clamp` would with `min > max`.
pub fn popup_anchor(touch: Point, window: WindowSize) -> Anchor {
    let left = (touch.x - MENU_OFFSET_X)
        .min(window.width - MENU_WIDTH)
        .max(EDGE_MARGIN);
    let top = (touch.y - MENU_OFFSET_Y).max(EDGE_MARGIN);
    Anchor { left, top }
}
