//! Move handling: the one-time start sequence, container hand-off, sorting,
//! and preview/element transforms. This is the hot path; every active gesture
//! processes every sample.

use crate::drag_item::{DragEntered, DragExited, DragPhase, DragSource};
use crate::drop_list::CachedItemPosition;
use crate::host::DragHost;
use crate::profile_scope;
use crate::types::{ContainerId, ItemId, Point, PointerEvent};

impl<H: DragHost> super::DragDrop<H> {
    /// Handles a global pointer-move sample. Ignored while no gesture is in
    /// flight; otherwise broadcast on the raw stream and routed to every
    /// active gesture.
    pub fn pointer_move(&mut self, event: PointerEvent) {
        profile_scope!("pointer_move");
        if self.registry.active_items().is_empty() {
            return;
        }
        self.registry.pointer_move.emit(&event);

        let active: Vec<ItemId> = self.registry.active_items().to_vec();
        for item_id in active {
            self.handle_move(item_id, &event);
        }
    }

    fn handle_move(&mut self, item_id: ItemId, event: &PointerEvent) {
        let (has_started, delay_elapsed, scroll, pickup_on_page, pickup_in_element, passive) = {
            let Some(item) = self.items.get(&item_id) else {
                return;
            };
            let Some(gesture) = item.gesture.as_ref() else {
                return;
            };
            (
                gesture.has_started,
                event.timestamp >= gesture.pickup_time + item.drag_start_delay,
                gesture.scroll_position,
                gesture.pickup_on_page,
                gesture.pickup_in_element,
                item.passive_transform,
            )
        };

        if !has_started {
            // The first qualifying move runs the start sequence; the sample
            // itself is otherwise consumed.
            if delay_elapsed {
                self.start_drag_sequence(item_id);
            }
            return;
        }

        let point = Point::new(event.page_x - scroll.x, event.page_y - scroll.y);
        let (is_bound, root) = {
            let Some(item) = self.items.get_mut(&item_id) else {
                return;
            };
            if let Some(gesture) = item.gesture.as_mut() {
                gesture.has_moved = true;
            }
            (item.container.is_some(), item.root)
        };

        if is_bound {
            self.update_active_drop_container(item_id, point, pickup_in_element);
        } else {
            // Free-floating: translate the element itself, relative to where
            // previous gestures left it.
            let active = Point::new(
                point.x - pickup_on_page.x + passive.x,
                point.y - pickup_on_page.y + passive.y,
            );
            if let Some(item) = self.items.get_mut(&item_id) {
                item.active_transform = active;
            }
            self.host.set_transform(root, active.x, active.y);
        }
    }

    /// Runs once per gesture: creates preview and placeholder, arms the home
    /// container, snapshots the pre-drag index, and emits `started`.
    fn start_drag_sequence(&mut self, item_id: ItemId) {
        let (root, container) = {
            let Some(item) = self.items.get(&item_id) else {
                return;
            };
            (item.root, item.container)
        };

        if let Some(item) = self.items.get_mut(&item_id)
            && let Some(gesture) = item.gesture.as_mut()
        {
            gesture.has_started = true;
        }

        if let Some(cid) = container {
            // Grab the next sibling before the preview and placeholder
            // clones exist so neither can be captured by accident.
            let next_sibling = self.host.next_sibling(root);
            let rect = self.host.bounding_rect(root);

            let preview = self.host.clone_subtree(root);
            self.host.set_size(preview, rect.width, rect.height);
            self.host.set_transform(preview, rect.left, rect.top);
            self.host.set_native_drag_interactions(preview, false);
            self.host.mount_overlay(preview);

            let placeholder = self.host.clone_subtree(root);

            if let Some(item) = self.items.get_mut(&item_id) {
                if let Some(gesture) = item.gesture.as_mut() {
                    gesture.next_sibling = next_sibling;
                }
                item.preview = Some(preview);
                item.placeholder = Some(placeholder);
            }

            self.start_container(cid);

            let previous_index = self
                .containers
                .get(&cid)
                .and_then(|list| list.item_index(item_id));
            if let Some(item) = self.items.get_mut(&item_id)
                && let Some(gesture) = item.gesture.as_mut()
            {
                gesture.previous_index = previous_index;
            }
        }

        if let Some(item) = self.items.get_mut(&item_id) {
            item.phase = DragPhase::Active;
            item.events.started.emit(&DragSource { item: item_id });
        }
        tracing::debug!(item = ?item_id, ?container, "drag sequence started");
    }

    /// Arms a container for an active drag: measures every member, swaps the
    /// live element for an overlay clone, and refreshes sibling rects.
    pub(crate) fn start_container(&mut self, container: ContainerId) {
        let (element, member_ids, siblings) = {
            let Some(list) = self.containers.get_mut(&container) else {
                return;
            };
            list.events.before_started.emit(&());
            (list.element, list.items.clone(), list.siblings.clone())
        };

        // Measure members in display order. An item already mid-drag is
        // represented by its placeholder.
        let mut cache = Vec::with_capacity(member_ids.len());
        for id in &member_ids {
            let Some(item) = self.items.get(id) else {
                continue;
            };
            let element = if self.registry.is_dragging(*id) {
                item.placeholder.unwrap_or(item.root)
            } else {
                item.root
            };
            cache.push(CachedItemPosition {
                item: *id,
                rect: self.host.bounding_rect(element),
            });
        }
        let own_rect = self.host.bounding_rect(element);

        let clone = self.host.clone_subtree(element);
        self.host.set_size(clone, own_rect.width, own_rect.height);
        self.host.set_transform(clone, own_rect.left, own_rect.top);
        self.host.set_native_drag_interactions(clone, false);
        self.host.mount_overlay(clone);
        self.host.set_visible(element, false);

        if let Some(list) = self.containers.get_mut(&container) {
            list.begin_drag(cache, own_rect, clone);
        }

        // Sibling rects may have shifted when this container swapped to its
        // clone, so they are re-measured up front rather than during moves.
        for sid in siblings {
            let sibling_element = match self.containers.get(&sid) {
                Some(sibling) => sibling.element,
                None => continue,
            };
            let rect = self.host.bounding_rect(sibling_element);
            if let Some(sibling) = self.containers.get_mut(&sid) {
                sibling.client_rect = rect;
            }
        }
        tracing::debug!(?container, members = member_ids.len(), "container armed");
    }

    /// Container-bound move step: resolve hand-off, then sort within the
    /// current container and track the preview to the pointer.
    fn update_active_drop_container(
        &mut self,
        item_id: ItemId,
        point: Point,
        pickup_in_element: Point,
    ) {
        let (initial, current, preview) = {
            let Some(item) = self.items.get(&item_id) else {
                return;
            };
            let initial = item.gesture.as_ref().and_then(|g| g.initial_container);
            (initial, item.container, item.preview)
        };

        // Hand-off target: first receiving sibling of the home container, or
        // the home container itself when re-entering from elsewhere. The
        // home container never forwards an item that is still inside it.
        let mut new_container =
            initial.and_then(|init| self.find_receiving_sibling(init, item_id, point));
        if new_container.is_none()
            && current != initial
            && let Some(init) = initial
            && self
                .containers
                .get(&init)
                .is_some_and(|list| list.is_over(point.x, point.y))
        {
            new_container = Some(init);
        }
        if let Some(target) = new_container
            && Some(target) != current
        {
            self.hand_off(item_id, current, target, point);
        }

        let current = self
            .items
            .get(&item_id)
            .and_then(|item| item.container);
        if let Some(cid) = current
            && let Some(list) = self.containers.get_mut(&cid)
        {
            list.sort_item(item_id, point.x, point.y, &mut self.host);
        }

        if let Some(preview) = preview {
            self.host.set_transform(
                preview,
                point.x - pickup_in_element.x,
                point.y - pickup_in_element.y,
            );
        }
    }

    /// First sibling of `initial` (in registration order) willing to receive
    /// the item at the given point.
    fn find_receiving_sibling(
        &self,
        initial: ContainerId,
        item_id: ItemId,
        point: Point,
    ) -> Option<ContainerId> {
        let list = self.containers.get(&initial)?;
        list.siblings.iter().copied().find(|sid| {
            self.containers
                .get(sid)
                .is_some_and(|sibling| sibling.can_receive(item_id, point.x, point.y, &self.host))
        })
    }

    /// Moves a mid-drag item from `old` to `target`: sequences, caches,
    /// overlay clones, and the exited/entered notifications.
    fn hand_off(
        &mut self,
        item_id: ItemId,
        old: Option<ContainerId>,
        target: ContainerId,
        point: Point,
    ) {
        if let Some(old_id) = old {
            let removed_index = self
                .containers
                .get_mut(&old_id)
                .and_then(|list| list.remove_item_entry(item_id));
            if let Some(index) = removed_index
                && let Some(clone) = self.containers.get(&old_id).and_then(|l| l.clone_element)
            {
                self.host.remove_child(clone, index);
            }
            if let Some(item) = self.items.get_mut(&item_id) {
                item.events.exited.emit(&DragExited {
                    item: item_id,
                    container: old_id,
                });
            }
        }

        if let Some(item) = self.items.get_mut(&item_id) {
            item.container = Some(target);
        }
        let target_dragging = self
            .containers
            .get(&target)
            .is_some_and(|list| list.is_dragging);
        if !target_dragging {
            self.start_container(target);
        }

        // The item enters at the slot under the pointer, taking over that
        // slot's rect; past the last slot it appends on a fresh slot at the
        // end of the column.
        let Some((index, pre_len)) = self.containers.get(&target).map(|dest| {
            let pre_len = dest.position_cache.len();
            let index = dest
                .target_index_for_point(point.x, point.y, None)
                .unwrap_or(pre_len);
            (index, pre_len)
        }) else {
            return;
        };

        // An empty destination takes the placeholder's own rect as its
        // first slot.
        let placeholder = self.items.get(&item_id).and_then(|item| item.placeholder);
        let fallback = placeholder
            .map(|p| self.host.bounding_rect(p))
            .unwrap_or_default();
        if let Some(dest) = self.containers.get_mut(&target) {
            dest.insert_item_entry(item_id, index, fallback, point);
        }
        if let Some(clone) = self.containers.get(&target).and_then(|l| l.clone_element)
            && let Some(node) = placeholder
        {
            let before = (index < pre_len).then_some(index);
            self.host.insert_child(clone, node, before);
        }

        if let Some(item) = self.items.get_mut(&item_id) {
            item.events.entered.emit(&DragEntered {
                item: item_id,
                container: target,
                current_index: index,
            });
        }
        tracing::debug!(
            item = ?item_id,
            from = ?old,
            to = ?target,
            index,
            "item handed off"
        );
    }
}
