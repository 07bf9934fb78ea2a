//! Per-container drop engine: hit testing, the position cache, and the sort
//! algorithm that resolves the live insertion index of a dragged item.
//!
//! Rectangles are cached once when a drag starts. Reorders move only the
//! item ids between cache entries, so the rect column keeps describing the
//! displayed slot layout; nothing is re-measured mid-gesture. That keeps
//! sorting cheap and allocation-free on the move path at the cost of
//! drifting under heavy mid-drag reflow.

use crate::events::EventChannel;
use crate::host::{GeometryProvider, VisualSink};
use crate::types::{ContainerId, ElementId, ItemId, Point, Rect};

/// Policy gating whether an item may enter a container.
pub type EnterPredicate = Box<dyn Fn(ItemId, ContainerId) -> bool>;

/// A cached snapshot of one item's rectangle, taken when dragging started.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CachedItemPosition {
    pub item: ItemId,
    pub rect: Rect,
}

/// Emitted by a container when a drop inside it finalizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerDropped {
    pub item: ItemId,
    pub current_index: usize,
    pub previous_index: usize,
    pub container: ContainerId,
}

/// Notification channels owned by one drop container.
#[derive(Default)]
pub struct DropListEvents {
    /// Emits when the container begins its drag bookkeeping.
    pub before_started: EventChannel<()>,
    pub dropped: EventChannel<ContainerDropped>,
}

impl DropListEvents {
    pub fn close_all(&mut self) {
        self.before_started.close();
        self.dropped.close();
    }
}

/// An ordered holder of draggable items defining a droppable region.
///
/// Invariant: `items` order always equals the container's visual order.
pub struct DropList {
    pub(crate) id: ContainerId,
    pub(crate) element: ElementId,
    /// Logical item sequence; insertion order is display order.
    pub(crate) items: Vec<ItemId>,
    /// Containers this one may hand items to, in registration order.
    pub(crate) siblings: Vec<ContainerId>,
    pub(crate) enter_predicate: EnterPredicate,
    /// Fraction of width/height used as the proximity margin for sorting.
    pub(crate) proximity_margin: f32,
    /// Own bounding rect, cached when dragging starts or when a sibling
    /// begins receiving.
    pub(crate) client_rect: Rect,
    pub(crate) is_dragging: bool,
    pub(crate) position_cache: Vec<CachedItemPosition>,
    /// Slot resolved by the most recent reorder.
    pub(crate) last_target: Option<usize>,
    /// Pointer position remembered by the previous sort call.
    pub(crate) last_point: Option<Point>,
    /// Overlay clone hosting the reordering animation while the live
    /// container is hidden.
    pub(crate) clone_element: Option<ElementId>,
    pub(crate) events: DropListEvents,
}

impl DropList {
    pub(crate) fn new(id: ContainerId, element: ElementId, proximity_margin: f32) -> Self {
        Self {
            id,
            element,
            items: Vec::new(),
            siblings: Vec::new(),
            enter_predicate: Box::new(|_, _| true),
            proximity_margin,
            client_rect: Rect::default(),
            is_dragging: false,
            position_cache: Vec::new(),
            last_target: None,
            last_point: None,
            clone_element: None,
            events: DropListEvents::default(),
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Whether the point lies within the cached bounding rectangle.
    pub fn is_over(&self, x: f32, y: f32) -> bool {
        self.client_rect.contains(x, y)
    }

    /// Whether this container may receive `item` at the given point: the
    /// enter predicate holds, the point is inside the cached rect, and the
    /// topmost visual element there belongs to this container. The last
    /// check guards against a geometrically overlapping but visually
    /// obscured container receiving the item.
    pub(crate) fn can_receive<G: GeometryProvider>(
        &self,
        item: ItemId,
        x: f32,
        y: f32,
        geometry: &G,
    ) -> bool {
        if !(self.enter_predicate)(item, self.id) || !self.client_rect.contains(x, y) {
            return false;
        }
        // No element at the point usually means the rect is scrolled out of
        // view.
        let Some(top) = geometry.element_at(x, y) else {
            return false;
        };
        geometry.is_descendant_or_self(self.element, top)
    }

    /// Index of `item`: position cache while dragging, logical sequence
    /// otherwise.
    pub(crate) fn item_index(&self, item: ItemId) -> Option<usize> {
        if !self.is_dragging {
            return self.items.iter().position(|i| *i == item);
        }
        self.position_cache.iter().position(|c| c.item == item)
    }

    /// Arms the container for an active drag with freshly measured state.
    pub(crate) fn begin_drag(
        &mut self,
        cache: Vec<CachedItemPosition>,
        own_rect: Rect,
        clone: ElementId,
    ) {
        self.last_target = None;
        self.last_point = None;
        self.is_dragging = true;
        self.position_cache = cache;
        self.client_rect = own_rect;
        self.clone_element = Some(clone);
    }

    /// Clears active-drag tracking after a drop or cancellation.
    pub(crate) fn reset_drag_state(&mut self) {
        self.is_dragging = false;
        self.position_cache.clear();
        self.last_target = None;
        self.last_point = None;
        self.clone_element = None;
    }

    /// Removes `item` from the logical sequence and the position cache,
    /// returning its cache index if it had one. Displaced ids shift one slot
    /// up and the column drops its tail slot, staying aligned with the
    /// displayed layout. Used during hand-off.
    pub(crate) fn remove_item_entry(&mut self, item: ItemId) -> Option<usize> {
        let cached = self.position_cache.iter().position(|c| c.item == item);
        if let Some(index) = cached {
            let last = self.position_cache.len() - 1;
            move_cached_item(&mut self.position_cache, index, last);
            self.position_cache.pop();
        }
        self.items.retain(|i| *i != item);
        cached
    }

    /// Inserts `item` at `index` in both the logical sequence and the
    /// position cache, seeding the hysteresis state with the landing slot so
    /// the sort pass on the same move leaves the item where it entered.
    ///
    /// The entering item takes over the slot rect at `index`; displaced ids
    /// shift one slot toward the end and the column grows by one slot past
    /// its tail (`fallback` when the column is empty).
    pub(crate) fn insert_item_entry(
        &mut self,
        item: ItemId,
        index: usize,
        fallback: Rect,
        point: Point,
    ) {
        let cache_index = index.min(self.position_cache.len());
        let rect = self.appended_slot().unwrap_or(fallback);
        self.position_cache.push(CachedItemPosition { item, rect });
        let last = self.position_cache.len() - 1;
        move_cached_item(&mut self.position_cache, last, cache_index);
        let list_index = index.min(self.items.len());
        self.items.insert(list_index, item);
        self.last_target = Some(cache_index);
        self.last_point = Some(point);
    }

    /// The slot that opens past the current tail when the column grows: the
    /// last slot translated by the column's stride (the offset between the
    /// last two slots, or one slot height for a single-slot column). `None`
    /// for an empty column.
    fn appended_slot(&self) -> Option<Rect> {
        let last = self.position_cache.last()?.rect;
        let (dx, dy) = match self.position_cache.len() {
            1 => (0.0, last.height),
            n => {
                let prev = self.position_cache[n - 2].rect;
                (last.left - prev.left, last.top - prev.top)
            }
        };
        Some(Rect::from_ltwh(
            last.left + dx,
            last.top + dy,
            last.width,
            last.height,
        ))
    }

    /// Whether the point is within the container rect expanded by the
    /// proximity margin on each axis.
    pub(crate) fn is_pointer_near(&self, x: f32, y: f32) -> bool {
        let x_threshold = self.client_rect.width * self.proximity_margin;
        let y_threshold = self.client_rect.height * self.proximity_margin;

        y > self.client_rect.top - y_threshold
            && y < self.client_rect.bottom + y_threshold
            && x > self.client_rect.left - x_threshold
            && x < self.client_rect.right + x_threshold
    }

    /// Resolves the slot under the pointer. The dragged item's own slot is
    /// never containment-tested; a container with fewer than two items
    /// always resolves to that single slot.
    pub(crate) fn target_index_for_point(
        &self,
        x: f32,
        y: f32,
        current: Option<usize>,
    ) -> Option<usize> {
        let len = self.position_cache.len();
        for k in 0..len {
            if Some(k) == current {
                if len < 2 {
                    return Some(k);
                }
            } else if self.position_cache[k].rect.contains_floored(x, y) {
                return Some(k);
            }
        }
        None
    }

    /// Re-sorts the dragged item under the pointer, mirroring any move into
    /// the overlay clone's child order.
    ///
    /// Known limitation: the hysteresis guard only remembers the immediately
    /// previous pointer sample, so a pointer straddling the boundary between
    /// two valid slots can still oscillate.
    pub(crate) fn sort_item<S: VisualSink>(&mut self, item: ItemId, x: f32, y: f32, sink: &mut S) {
        if !self.is_pointer_near(x, y) {
            self.last_point = Some(Point::new(x, y));
            return;
        }

        let Some(current_index) = self.position_cache.iter().position(|c| c.item == item) else {
            return;
        };
        let Some(new_index) = self.target_index_for_point(x, y, Some(current_index)) else {
            self.last_point = Some(Point::new(x, y));
            return;
        };

        // Hysteresis guard: once any reorder has happened, a pointer that
        // stayed inside the resolved slot's (floored) rect across this call
        // and the previous one does not trigger another reorder.
        if self.last_target.is_some()
            && let Some(last) = self.last_point
        {
            let slot = self.position_cache[new_index].rect;
            if slot.contains_floored(x, y) && slot.contains_floored(last.x, last.y) {
                return;
            }
        }
        self.last_point = Some(Point::new(x, y));

        if current_index == new_index {
            return;
        }

        self.last_target = Some(new_index);
        // Only the id column moves; the rect column keeps describing the
        // displayed slots so later moves resolve against live geometry.
        move_cached_item(&mut self.position_cache, current_index, new_index);
        move_item_in_array(&mut self.items, current_index, new_index);

        // Mirror the move into the overlay clone. Moving forward inserts
        // before the element now following the target slot; moving backward
        // inserts before the element at the target slot. This keeps the
        // moved item adjacent to the slot the pointer is over.
        if let Some(clone) = self.clone_element {
            let before = if current_index < new_index {
                if new_index + 1 >= self.position_cache.len() {
                    None
                } else {
                    Some(new_index + 1)
                }
            } else {
                Some(new_index)
            };
            sink.relocate_child(clone, current_index, before);
        }

        tracing::trace!(
            container = ?self.id,
            ?item,
            from = current_index,
            to = new_index,
            "item re-sorted"
        );
    }

    /// Resets tracking and emits the container-level dropped notification.
    pub(crate) fn drop_item(
        &mut self,
        item: ItemId,
        current_index: usize,
        previous_index: usize,
    ) {
        self.reset_drag_state();
        self.events.dropped.emit(&ContainerDropped {
            item,
            current_index,
            previous_index,
            container: self.id,
        });
    }
}

/// Moves one item id of the cache from `from_index` to `to_index` with the
/// same single-step shift as [`move_item_in_array`], leaving the rect column
/// in place: slots are fixed geometry, items move between them.
pub(crate) fn move_cached_item(
    cache: &mut [CachedItemPosition],
    from_index: usize,
    to_index: usize,
) {
    if cache.is_empty() {
        return;
    }
    let max = cache.len() - 1;
    let from = from_index.min(max);
    let to = to_index.min(max);
    if from == to {
        return;
    }
    let item = cache[from].item;
    if from < to {
        for k in from..to {
            cache[k].item = cache[k + 1].item;
        }
    } else {
        for k in (to..from).rev() {
            cache[k + 1].item = cache[k].item;
        }
    }
    cache[to].item = item;
}

/// Moves one element of `array` from `from_index` to `to_index` with a
/// single-step shift: everything between the two indices slides one slot
/// toward the vacated position. Out-of-range indices are clamped.
pub(crate) fn move_item_in_array<T>(array: &mut [T], from_index: usize, to_index: usize) {
    if array.is_empty() {
        return;
    }
    let max = array.len() - 1;
    let from = from_index.min(max);
    let to = to_index.min(max);
    if from == to {
        return;
    }
    if from < to {
        array[from..=to].rotate_left(1);
    } else {
        array[to..=from].rotate_right(1);
    }
}
