//! Core value types: identifiers, geometry, and pointer events.
//!
//! All coordinates are page coordinates in logical pixels. Rectangles follow
//! the host's bounding-rect convention: `right = left + width`,
//! `bottom = top + height`, edges inclusive for containment checks.

use std::time::Duration;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifies a draggable item registered with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) u64);

/// Identifies a drop container registered with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub(crate) u64);

/// Opaque handle to a visual node owned by the host. The engine never
/// inspects these; it only passes them back to the host's geometry and
/// visual-mutation capabilities. Hosts mint fresh handles for cloned nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

// ============================================================================
// Geometry
// ============================================================================

/// Point on the page or within an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Bounding rectangle of a visual node, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Build a rectangle from its top-left corner and size.
    pub fn from_ltwh(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            right: left + width,
            bottom: top + height,
            width,
            height,
        }
    }

    /// Edge-inclusive containment check.
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        y >= self.top && y <= self.bottom && x >= self.left && x <= self.right
    }

    /// Containment against floored edges. Sub-pixel rects are rounded down on
    /// every edge before comparing, matching how slot resolution treats
    /// fractional layout positions.
    #[inline]
    pub fn contains_floored(&self, x: f32, y: f32) -> bool {
        x >= self.left.floor()
            && x <= self.right.floor()
            && y >= self.top.floor()
            && y <= self.bottom.floor()
    }
}

// ============================================================================
// Pointer input
// ============================================================================

/// Which device family originated a gesture. Decides the move/up listener
/// pair the registry binds while a drag is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// A raw move/up/down sample from the host's input source.
///
/// `timestamp` is a host-supplied monotonic clock reading; the engine only
/// ever compares timestamps against each other (for the drag start delay),
/// never against wall time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub page_x: f32,
    pub page_y: f32,
    pub timestamp: Duration,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, page_x: f32, page_y: f32, timestamp: Duration) -> Self {
        Self {
            kind,
            page_x,
            page_y,
            timestamp,
        }
    }
}

/// Process-wide listener kinds the registry binds while at least one drag is
/// active. `SelectStart` and `Wheel` are guards that suppress text selection
/// and scroll-wheel defaults mid-drag; they carry no event payload into the
/// engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalListener {
    MouseMove,
    MouseUp,
    TouchMove,
    TouchEnd,
    SelectStart,
    Wheel,
}
