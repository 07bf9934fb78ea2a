//! Per-item drag state: the gesture state machine and its notifications.
//!
//! Each draggable item owns exactly one phase at a time:
//!
//! ```text
//! Idle -> Pending      (pointer down on an enabled item)
//! Pending -> Active    (first move at/after the start delay; start sequence runs once)
//! Active -> Idle       (pointer up on a free item, or up before any move)
//! Active -> Settling   (pointer up while container-bound)
//! Settling -> Idle     (transition-end, timeout guard, or no movement)
//! ```
//!
//! The phase enum makes impossible states unrepresentable; the `Gesture`
//! carries everything sampled at pickup that later phases need.

use std::time::Duration;

use crate::constants::DEFAULT_DRAG_START_DELAY;
use crate::events::EventChannel;
use crate::types::{ContainerId, ElementId, ItemId, Point};

/// Where an item is in its gesture lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragPhase {
    /// No gesture in flight.
    Idle,
    /// Pointer is down; the drag sequence has not begun yet (start delay
    /// not elapsed, or no move seen).
    Pending,
    /// The drag sequence is running; moves reorder/transform.
    Active,
    /// Pointer released while container-bound; waiting for the preview to
    /// finish animating toward the placeholder. `deadline_ms` is the upper
    /// bound on that wait, derived from the measured transition duration.
    Settling { deadline_ms: f32 },
}

impl DragPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_settling(&self) -> bool {
        matches!(self, Self::Settling { .. })
    }
}

/// Everything sampled when a gesture begins, alive from pointer-down until
/// full cleanup (which may be deferred until the settle signal).
#[derive(Debug)]
pub(crate) struct Gesture {
    /// Pointer position on the page at pickup, scroll-adjusted.
    pub pickup_on_page: Point,
    /// Pointer offset within the item's own bounds at pickup.
    pub pickup_in_element: Point,
    /// Timestamp of the initiating pointer-down event.
    pub pickup_time: Duration,
    /// Viewport scroll position snapshotted at pickup.
    pub scroll_position: Point,
    /// True once the start delay elapsed and the start sequence ran.
    pub has_started: bool,
    /// True once at least one move was processed after the sequence started.
    pub has_moved: bool,
    /// Container the item belonged to at pickup.
    pub initial_container: Option<ContainerId>,
    /// Item's index in the initial container, captured when the drag
    /// sequence starts. Reported as `previous_index` on drop.
    pub previous_index: Option<usize>,
    /// The node following the item's root when the sequence started,
    /// captured before the preview and placeholder exist so neither can be
    /// picked up by accident. Hosts that reparent the root during a drag
    /// read it back to restore placement.
    pub next_sibling: Option<ElementId>,
}

impl Gesture {
    pub fn new(
        pickup_on_page: Point,
        pickup_in_element: Point,
        pickup_time: Duration,
        scroll_position: Point,
        initial_container: Option<ContainerId>,
    ) -> Self {
        Self {
            pickup_on_page,
            pickup_in_element,
            pickup_time,
            scroll_position,
            has_started: false,
            has_moved: false,
            initial_container,
            previous_index: None,
            next_sibling: None,
        }
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// Payload for `started` and `released`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSource {
    pub item: ItemId,
}

/// Emitted when a free-floating drag finishes. `distance` is the net pointer
/// travel between pickup and release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEnded {
    pub item: ItemId,
    pub distance: Point,
}

/// Emitted when the item is handed to a new container mid-gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEntered {
    pub item: ItemId,
    pub container: ContainerId,
    pub current_index: usize,
}

/// Emitted on the container the item just left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragExited {
    pub item: ItemId,
    pub container: ContainerId,
}

/// Emitted when a container-bound drop finalizes. `previous_index` is the
/// index in the initial container captured at gesture start; `current_index`
/// is the final index in the container that received the item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemDropped {
    pub previous_index: usize,
    pub current_index: usize,
}

/// Notification channels owned by one drag item.
#[derive(Default)]
pub struct DragItemEvents {
    /// Emits as the drag sequence is being prepared, before the disabled
    /// check, so observers can react even when the drag will be rejected.
    pub before_started: EventChannel<()>,
    pub started: EventChannel<DragSource>,
    pub released: EventChannel<DragSource>,
    pub ended: EventChannel<DragEnded>,
    pub entered: EventChannel<DragEntered>,
    pub exited: EventChannel<DragExited>,
    pub dropped: EventChannel<ItemDropped>,
}

impl DragItemEvents {
    pub fn close_all(&mut self) {
        self.before_started.close();
        self.started.close();
        self.released.close();
        self.ended.close();
        self.entered.close();
        self.exited.close();
        self.dropped.close();
    }
}

// ============================================================================
// Item state
// ============================================================================

/// One draggable entity registered with the engine.
pub struct DragItem {
    pub(crate) id: ItemId,
    /// The host node drag behavior is attached to.
    pub(crate) root: ElementId,
    /// Home container, `None` for free-floating items.
    pub(crate) container: Option<ContainerId>,
    pub(crate) disabled: bool,
    pub(crate) drag_start_delay: Duration,
    /// Resting translation carried over from prior free-floating gestures.
    pub(crate) passive_transform: Point,
    /// Translation applied during the current gesture.
    pub(crate) active_transform: Point,
    pub(crate) phase: DragPhase,
    pub(crate) gesture: Option<Gesture>,
    /// Floating visual tracking the pointer, container-bound drags only.
    pub(crate) preview: Option<ElementId>,
    /// Clone standing in for the hidden root while it drags.
    pub(crate) placeholder: Option<ElementId>,
    pub(crate) events: DragItemEvents,
}

impl DragItem {
    pub(crate) fn new(id: ItemId, root: ElementId) -> Self {
        Self {
            id,
            root,
            container: None,
            disabled: false,
            drag_start_delay: DEFAULT_DRAG_START_DELAY,
            passive_transform: Point::ZERO,
            active_transform: Point::ZERO,
            phase: DragPhase::Idle,
            gesture: None,
            preview: None,
            placeholder: None,
            events: DragItemEvents::default(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn container(&self) -> Option<ContainerId> {
        self.container
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }
}
