//! The owning drag-and-drop engine.
//!
//! `DragDrop` owns every registered item and container plus the registry, and
//! routes pointer input through the per-gesture state machines. The original
//! design splits this across mutually referencing objects; here one struct
//! owns the graph and components address each other by id.
//!
//! ## Modules
//!
//! - `pointer_down` - gesture initiation (pre-start notification, pickup)
//! - `pointer_move` - start sequence, hand-off between containers, sorting
//! - `pointer_up` - release, settle wait, drop finalization

mod pointer_down;
mod pointer_move;
mod pointer_up;

use std::collections::HashMap;
use std::time::Duration;

use crate::constants::{DROP_PROXIMITY_THRESHOLD, SETTLE_TIMEOUT_MULTIPLIER};
use crate::drag_item::{DragItem, DragItemEvents, DragPhase};
use crate::drop_list::{DropList, DropListEvents, EnterPredicate};
use crate::error::{DragError, DragResult};
use crate::events::EventChannel;
use crate::host::DragHost;
use crate::registry::DragDropRegistry;
use crate::types::{ContainerId, ElementId, ItemId, Point, PointerEvent};

/// Drag-and-drop engine generic over its host environment.
pub struct DragDrop<H: DragHost> {
    pub(crate) host: H,
    pub(crate) registry: DragDropRegistry,
    pub(crate) items: HashMap<ItemId, DragItem>,
    pub(crate) containers: HashMap<ContainerId, DropList>,
    next_item_id: u64,
    next_container_id: u64,
    pub(crate) settle_timeout_multiplier: f32,
}

impl<H: DragHost> DragDrop<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            registry: DragDropRegistry::new(),
            items: HashMap::new(),
            containers: HashMap::new(),
            next_item_id: 0,
            next_container_id: 0,
            settle_timeout_multiplier: SETTLE_TIMEOUT_MULTIPLIER,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn registry(&self) -> &DragDropRegistry {
        &self.registry
    }

    /// Raw pointer-move broadcast; every active gesture sees each event.
    pub fn pointer_move_stream(&mut self) -> &mut EventChannel<PointerEvent> {
        &mut self.registry.pointer_move
    }

    /// Raw pointer-up broadcast.
    pub fn pointer_up_stream(&mut self) -> &mut EventChannel<PointerEvent> {
        &mut self.registry.pointer_up
    }

    /// Multiplier applied to the measured transition duration to bound the
    /// settle wait.
    pub fn set_settle_timeout_multiplier(&mut self, multiplier: f32) {
        self.settle_timeout_multiplier = multiplier;
    }

    // ========================================================================
    // Item lifecycle
    // ========================================================================

    /// Attaches drag behavior to a host element and returns its id.
    pub fn create_item(&mut self, element: ElementId) -> ItemId {
        let id = ItemId(self.next_item_id);
        self.next_item_id += 1;
        self.host.bind_item_listener(element);
        self.registry.register_item(id);
        self.items.insert(id, DragItem::new(id, element));
        tracing::debug!(item = ?id, ?element, "drag item registered");
        id
    }

    pub fn set_disabled(&mut self, item: ItemId, disabled: bool) -> DragResult<()> {
        self.item_mut(item)?.disabled = disabled;
        Ok(())
    }

    pub fn disabled(&self, item: ItemId) -> DragResult<bool> {
        Ok(self.item(item)?.disabled)
    }

    /// Delay between pointer-down and the drag sequence starting.
    pub fn set_drag_start_delay(&mut self, item: ItemId, delay: Duration) -> DragResult<()> {
        self.item_mut(item)?.drag_start_delay = delay;
        Ok(())
    }

    /// Whether the item's drag sequence has actually begun.
    pub fn is_dragging(&self, item: ItemId) -> bool {
        let started = self
            .items
            .get(&item)
            .and_then(|i| i.gesture.as_ref())
            .is_some_and(|g| g.has_started);
        started && self.registry.is_dragging(item)
    }

    pub fn phase(&self, item: ItemId) -> DragResult<DragPhase> {
        Ok(self.item(item)?.phase)
    }

    /// The root draggable element.
    pub fn root_element(&self, item: ItemId) -> DragResult<ElementId> {
        Ok(self.item(item)?.root)
    }

    /// The container an item currently belongs to, if any.
    pub fn home_container(&self, item: ItemId) -> DragResult<Option<ContainerId>> {
        Ok(self.item(item)?.container)
    }

    /// The element that followed the item's root when its drag sequence
    /// started, captured before any clones existed. `None` outside a
    /// started gesture or when the root was the last sibling. Hosts that
    /// reparent the root mid-drag use it to restore placement.
    pub fn next_sibling_at_pickup(&self, item: ItemId) -> DragResult<Option<ElementId>> {
        Ok(self
            .item(item)?
            .gesture
            .as_ref()
            .and_then(|g| g.next_sibling))
    }

    /// Notification channels for one item.
    pub fn item_events_mut(&mut self, item: ItemId) -> DragResult<&mut DragItemEvents> {
        Ok(&mut self.item_mut(item)?.events)
    }

    /// Detaches an item: unbinds its native listener, force-terminates any
    /// in-flight gesture, unregisters it, and closes its channels so no
    /// further events are observable.
    pub fn dispose_item(&mut self, item: ItemId) -> DragResult<()> {
        let mut state = self
            .items
            .remove(&item)
            .ok_or(DragError::UnknownItem(item))?;

        self.host.unbind_item_listener(state.root);

        // The gesture outlives the shared listeners: an item in the settling
        // phase has already stopped dragging but still holds its visuals and
        // armed containers.
        let mid_gesture = state.gesture.as_ref().is_some_and(|g| g.has_started);
        if mid_gesture {
            // The root may still be detached from normal flow for the drag;
            // make sure it does not outlive the item.
            self.host.remove_node(state.root);
        }

        if let Some(preview) = state.preview.take() {
            self.host.remove_node(preview);
        }
        if let Some(placeholder) = state.placeholder.take() {
            self.host.remove_node(placeholder);
        }
        if mid_gesture {
            self.restore_armed_containers();
        }

        self.registry.remove_item(item, &mut self.host);
        state.events.close_all();

        for list in self.containers.values_mut() {
            list.items.retain(|i| *i != item);
            list.position_cache.retain(|c| c.item != item);
        }

        tracing::debug!(?item, "drag item disposed");
        Ok(())
    }

    // ========================================================================
    // Container lifecycle
    // ========================================================================

    /// Attaches drop behavior to a host element and returns its id.
    pub fn create_container(&mut self, element: ElementId) -> ContainerId {
        let id = ContainerId(self.next_container_id);
        self.next_container_id += 1;
        self.registry.register_container(id);
        self.containers
            .insert(id, DropList::new(id, element, DROP_PROXIMITY_THRESHOLD));
        tracing::debug!(container = ?id, ?element, "drop container registered");
        id
    }

    /// Appends an item to a container's sequence and makes it the item's
    /// home container.
    pub fn add_to_container(&mut self, item: ItemId, container: ContainerId) -> DragResult<()> {
        if !self.items.contains_key(&item) {
            return Err(DragError::UnknownItem(item));
        }
        let list = self.container_mut(container)?;
        if !list.items.contains(&item) {
            list.items.push(item);
        }
        self.item_mut(item)?.container = Some(container);
        Ok(())
    }

    /// Declares which containers `container` may hand items to. Order is the
    /// resolution order during hand-off.
    pub fn connect_siblings(
        &mut self,
        container: ContainerId,
        siblings: &[ContainerId],
    ) -> DragResult<()> {
        for sid in siblings {
            if !self.containers.contains_key(sid) {
                return Err(DragError::UnknownContainer(*sid));
            }
        }
        self.container_mut(container)?.siblings = siblings.to_vec();
        Ok(())
    }

    /// Policy function gating whether a given item may enter the container.
    pub fn set_enter_predicate(
        &mut self,
        container: ContainerId,
        predicate: EnterPredicate,
    ) -> DragResult<()> {
        self.container_mut(container)?.enter_predicate = predicate;
        Ok(())
    }

    /// Fraction of the container's width/height used as the sort proximity
    /// margin.
    pub fn set_proximity_margin(&mut self, container: ContainerId, margin: f32) -> DragResult<()> {
        self.container_mut(container)?.proximity_margin = margin;
        Ok(())
    }

    /// Index of `item` within `container`, or `None` when the item is not in
    /// that container.
    pub fn get_item_index(&self, container: ContainerId, item: ItemId) -> DragResult<Option<usize>> {
        Ok(self.container(container)?.item_index(item))
    }

    /// The host element a container is attached to.
    pub fn container_element(&self, container: ContainerId) -> DragResult<ElementId> {
        Ok(self.container(container)?.element)
    }

    /// The container's logical item sequence, in display order.
    pub fn items_in(&self, container: ContainerId) -> DragResult<&[ItemId]> {
        Ok(&self.container(container)?.items)
    }

    /// Notification channels for one container.
    pub fn container_events_mut(
        &mut self,
        container: ContainerId,
    ) -> DragResult<&mut DropListEvents> {
        Ok(&mut self.container_mut(container)?.events)
    }

    /// Detaches a container. Any gesture it participates in is force
    /// cancelled through the registry removal path, and member items go
    /// free-floating.
    pub fn dispose_container(&mut self, container: ContainerId) -> DragResult<()> {
        let mut list = self
            .containers
            .remove(&container)
            .ok_or(DragError::UnknownContainer(container))?;

        // Abort any gesture bound to or originating from this container.
        let affected: Vec<ItemId> = self
            .registry
            .active_items()
            .iter()
            .copied()
            .filter(|id| {
                self.items.get(id).is_some_and(|i| {
                    i.container == Some(container)
                        || i.gesture
                            .as_ref()
                            .is_some_and(|g| g.initial_container == Some(container))
                })
            })
            .collect();
        for id in affected {
            self.cancel_gesture(id);
        }

        if let Some(clone) = list.clone_element.take() {
            self.host.remove_node(clone);
            self.host.set_visible(list.element, true);
        }

        for id in &list.items {
            if let Some(item) = self.items.get_mut(id)
                && item.container == Some(container)
            {
                item.container = None;
            }
        }

        for other in self.containers.values_mut() {
            other.siblings.retain(|sid| *sid != container);
        }
        self.registry.remove_container(container);
        list.events.close_all();

        tracing::debug!(?container, "drop container disposed");
        Ok(())
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Synchronously unwinds an in-flight gesture without emitting drop
    /// events: visuals destroyed, registry stopped, state back to idle.
    pub(crate) fn cancel_gesture(&mut self, item_id: ItemId) {
        let Some(item) = self.items.get_mut(&item_id) else {
            return;
        };
        if item.gesture.is_none() {
            return;
        }
        if let Some(preview) = item.preview.take() {
            self.host.remove_node(preview);
        }
        if let Some(placeholder) = item.placeholder.take() {
            self.host.remove_node(placeholder);
        }
        self.host.set_visible(item.root, true);
        item.gesture = None;
        item.phase = DragPhase::Idle;
        item.active_transform = Point::ZERO;

        self.restore_armed_containers();
        self.registry.stop_dragging(item_id, &mut self.host);
        tracing::debug!(item = ?item_id, "gesture cancelled");
    }

    /// Restores every container armed by the current gesture. A hand-off can
    /// leave more than one container with an overlay clone up.
    pub(crate) fn restore_armed_containers(&mut self) {
        let armed: Vec<ContainerId> = self
            .containers
            .iter()
            .filter(|(_, list)| list.is_dragging)
            .map(|(id, _)| *id)
            .collect();
        for cid in armed {
            self.restore_container_visuals(cid);
        }
    }

    /// Removes a container's overlay clone and restores the live element.
    pub(crate) fn restore_container_visuals(&mut self, container: ContainerId) {
        let taken = self
            .containers
            .get_mut(&container)
            .map(|list| (list.clone_element.take(), list.element));
        if let Some((clone, element)) = taken {
            if let Some(clone) = clone {
                self.host.remove_node(clone);
            }
            self.host.set_visible(element, true);
            if let Some(list) = self.containers.get_mut(&container) {
                list.reset_drag_state();
            }
        }
    }

    pub(crate) fn item(&self, item: ItemId) -> DragResult<&DragItem> {
        self.items.get(&item).ok_or(DragError::UnknownItem(item))
    }

    pub(crate) fn item_mut(&mut self, item: ItemId) -> DragResult<&mut DragItem> {
        self.items.get_mut(&item).ok_or(DragError::UnknownItem(item))
    }

    pub(crate) fn container(&self, container: ContainerId) -> DragResult<&DropList> {
        self.containers
            .get(&container)
            .ok_or(DragError::UnknownContainer(container))
    }

    pub(crate) fn container_mut(&mut self, container: ContainerId) -> DragResult<&mut DropList> {
        self.containers
            .get_mut(&container)
            .ok_or(DragError::UnknownContainer(container))
    }
}
