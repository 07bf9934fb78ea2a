//! Release handling: free-floating finalization, the settle wait for
//! container-bound drops, and drop finalization.

use crate::drag_item::{DragEnded, DragPhase, DragSource, ItemDropped};
use crate::host::DragHost;
use crate::types::{ItemId, Point, PointerEvent};

impl<H: DragHost> super::DragDrop<H> {
    /// Handles a global pointer release. Ignored while no gesture is in
    /// flight; otherwise broadcast on the raw stream and routed to every
    /// active gesture.
    pub fn pointer_up(&mut self, event: PointerEvent) {
        if self.registry.active_items().is_empty() {
            return;
        }
        self.registry.pointer_up.emit(&event);

        let active: Vec<ItemId> = self.registry.active_items().to_vec();
        for item_id in active {
            self.handle_up(item_id, &event);
        }
    }

    fn handle_up(&mut self, item_id: ItemId, event: &PointerEvent) {
        let (has_started, scroll, pickup_on_page, container) = {
            let Some(item) = self.items.get(&item_id) else {
                return;
            };
            let Some(gesture) = item.gesture.as_ref() else {
                return;
            };
            (
                gesture.has_started,
                gesture.scroll_position,
                gesture.pickup_on_page,
                item.container,
            )
        };

        // The shared listeners come down with the release no matter how the
        // gesture ends.
        self.registry.stop_dragging(item_id, &mut self.host);

        if !has_started {
            // Released before the start delay elapsed: a plain click.
            if let Some(item) = self.items.get_mut(&item_id) {
                item.gesture = None;
                item.phase = DragPhase::Idle;
            }
            tracing::debug!(item = ?item_id, "released before drag started");
            return;
        }

        if let Some(item) = self.items.get_mut(&item_id) {
            item.events.released.emit(&DragSource { item: item_id });
        }

        if container.is_none() {
            // Free-floating: the gesture translation becomes the new resting
            // position.
            let point = Point::new(event.page_x - scroll.x, event.page_y - scroll.y);
            let distance = Point::new(point.x - pickup_on_page.x, point.y - pickup_on_page.y);
            if let Some(item) = self.items.get_mut(&item_id) {
                item.passive_transform = item.active_transform;
                item.phase = DragPhase::Idle;
                item.gesture = None;
                item.events.ended.emit(&DragEnded {
                    item: item_id,
                    distance,
                });
            }
            tracing::debug!(item = ?item_id, ?distance, "free drag ended");
            return;
        }

        self.begin_settle(item_id);
    }

    /// Starts the settle wait: the preview animates toward the placeholder's
    /// final rectangle and finalization is deferred until the transition ends
    /// or the deadline passes. A gesture with no movement, or a preview with
    /// no transition, settles synchronously.
    fn begin_settle(&mut self, item_id: ItemId) {
        let (has_moved, preview, placeholder) = {
            let Some(item) = self.items.get(&item_id) else {
                return;
            };
            (
                item.gesture.as_ref().is_some_and(|g| g.has_moved),
                item.preview,
                item.placeholder,
            )
        };

        if !has_moved {
            self.finalize_drop(item_id);
            return;
        }

        let duration_ms = if let (Some(preview), Some(placeholder)) = (preview, placeholder) {
            let rect = self.host.bounding_rect(placeholder);
            self.host.set_transform(preview, rect.left, rect.top);
            self.host.transition_duration_ms(preview)
        } else {
            0.0
        };
        if duration_ms <= 0.0 {
            self.finalize_drop(item_id);
            return;
        }

        let deadline_ms = duration_ms * self.settle_timeout_multiplier;
        if let Some(item) = self.items.get_mut(&item_id) {
            item.phase = DragPhase::Settling { deadline_ms };
        }
        tracing::debug!(item = ?item_id, deadline_ms, "settling");
    }

    /// Host signal that the preview's transition finished. No-op unless the
    /// item is settling; settlement resolves exactly once.
    pub fn notify_transition_end(&mut self, item_id: ItemId) {
        if self
            .items
            .get(&item_id)
            .is_some_and(|item| item.phase.is_settling())
        {
            self.finalize_drop(item_id);
        }
    }

    /// Host signal that the settle deadline passed without a transition-end.
    /// Same resolution as [`Self::notify_transition_end`]; whichever signal
    /// arrives first wins.
    pub fn notify_settle_timeout(&mut self, item_id: ItemId) {
        if self
            .items
            .get(&item_id)
            .is_some_and(|item| item.phase.is_settling())
        {
            tracing::debug!(item = ?item_id, "settle deadline hit before transition end");
            self.finalize_drop(item_id);
        }
    }

    /// The settle deadline of an item currently in the settling phase, for
    /// hosts scheduling the timeout guard.
    pub fn settle_deadline_ms(&self, item_id: ItemId) -> Option<f32> {
        match self.items.get(&item_id).map(|item| item.phase) {
            Some(DragPhase::Settling { deadline_ms }) => Some(deadline_ms),
            _ => None,
        }
    }

    /// Tears down the gesture visuals, emits the drop notifications, and
    /// returns the item to idle with its home container restored.
    fn finalize_drop(&mut self, item_id: ItemId) {
        let (root, preview, placeholder, current, initial, previous_snapshot) = {
            let Some(item) = self.items.get(&item_id) else {
                return;
            };
            let gesture = item.gesture.as_ref();
            (
                item.root,
                item.preview,
                item.placeholder,
                item.container,
                gesture.and_then(|g| g.initial_container),
                gesture.and_then(|g| g.previous_index),
            )
        };

        self.host.set_visible(root, true);
        if let Some(preview) = preview {
            self.host.remove_node(preview);
        }
        if let Some(placeholder) = placeholder {
            self.host.remove_node(placeholder);
        }

        let Some(cid) = current else {
            // The container went away while settling; nothing to report.
            if let Some(item) = self.items.get_mut(&item_id) {
                item.phase = DragPhase::Idle;
                item.gesture = None;
                item.preview = None;
                item.placeholder = None;
            }
            return;
        };

        // Indices are read before the container resets its drag tracking.
        let current_index = self
            .containers
            .get(&cid)
            .and_then(|list| list.item_index(item_id))
            .unwrap_or(0);
        let previous_index = previous_snapshot.unwrap_or(current_index);

        self.restore_armed_containers();

        if let Some(item) = self.items.get_mut(&item_id) {
            item.events.dropped.emit(&ItemDropped {
                previous_index,
                current_index,
            });
        }
        if let Some(list) = self.containers.get_mut(&cid) {
            list.drop_item(item_id, current_index, previous_index);
        }

        if let Some(item) = self.items.get_mut(&item_id) {
            // The home container reference snaps back to where the gesture
            // began; the receiving container keeps the item in its sequence.
            item.container = initial;
            item.phase = DragPhase::Idle;
            item.gesture = None;
            item.preview = None;
            item.placeholder = None;
        }
        tracing::debug!(
            item = ?item_id,
            container = ?cid,
            previous_index,
            current_index,
            "item dropped"
        );
    }
}
