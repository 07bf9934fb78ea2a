//! Process-wide drag bookkeeping.
//!
//! One registry per engine tracks which items and containers exist, which
//! items are actively dragging, and the shared global listeners. Binding one
//! listener set centrally (rather than per item) avoids listener storms when
//! many items are draggable and guarantees one coordinated gesture across the
//! whole surface: listeners are bound exactly when the active set becomes
//! non-empty and unbound exactly when it empties again.

use std::collections::HashSet;

use crate::events::EventChannel;
use crate::host::ListenerHost;
use crate::types::{ContainerId, GlobalListener, ItemId, PointerEvent, PointerKind};

pub struct DragDropRegistry {
    /// Registered drag item instances.
    drag_instances: HashSet<ItemId>,
    /// Registered drop container instances.
    drop_instances: HashSet<ContainerId>,
    /// Items currently mid-gesture, in the order their gestures began.
    /// Designed to hold at most one entry, but membership is queryable.
    active: Vec<ItemId>,
    /// Global listeners currently bound on the host.
    global_listeners: Vec<GlobalListener>,
    /// Broadcast of every raw move event while any drag is active.
    pub pointer_move: EventChannel<PointerEvent>,
    /// Broadcast of every raw up event while any drag is active.
    pub pointer_up: EventChannel<PointerEvent>,
}

impl Default for DragDropRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DragDropRegistry {
    pub fn new() -> Self {
        Self {
            drag_instances: HashSet::new(),
            drop_instances: HashSet::new(),
            active: Vec::new(),
            global_listeners: Vec::new(),
            pointer_move: EventChannel::new(),
            pointer_up: EventChannel::new(),
        }
    }

    /// Adds a drag item instance to the registry. Idempotent.
    pub fn register_item(&mut self, item: ItemId) {
        self.drag_instances.insert(item);
    }

    /// Adds a drop container to the registry. Idempotent.
    pub fn register_container(&mut self, container: ContainerId) {
        self.drop_instances.insert(container);
    }

    /// Unregisters an item, stopping its gesture first if one is active.
    pub fn remove_item<H: ListenerHost>(&mut self, item: ItemId, host: &mut H) {
        self.drag_instances.remove(&item);
        self.stop_dragging(item, host);
    }

    pub fn remove_container(&mut self, container: ContainerId) {
        self.drop_instances.remove(&container);
    }

    pub fn is_registered(&self, item: ItemId) -> bool {
        self.drag_instances.contains(&item)
    }

    pub fn is_container_registered(&self, container: ContainerId) -> bool {
        self.drop_instances.contains(&container)
    }

    /// Marks `item` as actively dragging. No-op if it already is. On the
    /// empty→non-empty transition, binds the move/up listener pair for the
    /// originating device plus the prevent-default guards, all as active
    /// (non-passive) listeners so scrolling and text selection can be
    /// suppressed for the duration of the drag.
    pub fn start_dragging<H: ListenerHost>(&mut self, item: ItemId, kind: PointerKind, host: &mut H) {
        if self.active.contains(&item) {
            return;
        }
        self.active.push(item);

        if self.active.len() == 1 {
            let (move_listener, up_listener) = match kind {
                PointerKind::Touch => (GlobalListener::TouchMove, GlobalListener::TouchEnd),
                PointerKind::Mouse => (GlobalListener::MouseMove, GlobalListener::MouseUp),
            };
            self.global_listeners.push(move_listener);
            self.global_listeners.push(up_listener);
            // Preventing the default action on move events is not enough to
            // disable text selection everywhere, so the selection event gets
            // its own guard.
            self.global_listeners.push(GlobalListener::SelectStart);
            if kind == PointerKind::Mouse {
                self.global_listeners.push(GlobalListener::Wheel);
            }
            for listener in &self.global_listeners {
                host.bind_global_listener(*listener, true);
            }
            tracing::debug!(?item, ?kind, "global drag listeners bound");
        }
    }

    /// Removes `item` from the active set; unbinds all shared listeners when
    /// the set becomes empty.
    pub fn stop_dragging<H: ListenerHost>(&mut self, item: ItemId, host: &mut H) {
        let had = self.active.contains(&item);
        self.active.retain(|id| *id != item);

        if had && self.active.is_empty() {
            for listener in self.global_listeners.drain(..) {
                host.unbind_global_listener(listener);
            }
            tracing::debug!(?item, "global drag listeners unbound");
        }
    }

    /// Whether a drag item instance is currently being dragged.
    pub fn is_dragging(&self, item: ItemId) -> bool {
        self.active.contains(&item)
    }

    /// Active items in the order their gestures began.
    pub fn active_items(&self) -> &[ItemId] {
        &self.active
    }

    /// Global listeners currently bound on the host.
    pub fn bound_listeners(&self) -> &[GlobalListener] {
        &self.global_listeners
    }
}
