//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `World` / `TestHost` - An in-memory host environment backing all three
//!   host traits with plain data structures
//! - `Fixture` - An engine wired to a `TestHost`, with builders for
//!   containers of stacked items and pointer-gesture helpers
//! - `record()` - Event-channel recorder for asserting notification order

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::Once;
use std::time::Duration;

use dragboard::{
    ContainerId, DragDrop, ElementId, EventChannel, GeometryProvider, GlobalListener, ItemId,
    ListenerHost, Point, PointerEvent, PointerKind, Rect, VisualSink,
};

// ============================================================================
// World - in-memory visual tree
// ============================================================================

/// A flat model of a host visual tree: rectangles, child lists, an overlay
/// layer, and listener bookkeeping. Every mutation the engine performs is
/// observable here.
#[derive(Default)]
pub struct World {
    next_element: u64,
    pub rects: HashMap<ElementId, Rect>,
    pub transforms: HashMap<ElementId, Point>,
    pub sizes: HashMap<ElementId, (f32, f32)>,
    pub hidden: HashSet<ElementId>,
    pub transitions: HashMap<ElementId, f32>,
    pub scroll: Point,
    /// Elements eligible for hit testing, front to back.
    pub hit_order: Vec<ElementId>,
    pub children: HashMap<ElementId, Vec<ElementId>>,
    pub parents: HashMap<ElementId, ElementId>,
    pub overlay: Vec<ElementId>,
    pub removed: Vec<ElementId>,
    pub native_drag_disabled: HashSet<ElementId>,
    pub bound_globals: Vec<(GlobalListener, bool)>,
    pub item_listeners: Vec<ElementId>,
}

impl World {
    /// Mints a hit-testable element with the given rectangle. Later elements
    /// sit in front of earlier ones.
    pub fn create_element(&mut self, rect: Rect) -> ElementId {
        let id = ElementId(self.next_element);
        self.next_element += 1;
        self.rects.insert(id, rect);
        self.hit_order.insert(0, id);
        id
    }

    /// Makes `child` the last child of `parent`.
    pub fn adopt(&mut self, parent: ElementId, child: ElementId) {
        self.children.entry(parent).or_default().push(child);
        self.parents.insert(child, parent);
    }

    pub fn children_of(&self, parent: ElementId) -> Vec<ElementId> {
        self.children.get(&parent).cloned().unwrap_or_default()
    }

    pub fn was_removed(&self, node: ElementId) -> bool {
        self.removed.contains(&node)
    }

    pub fn is_hidden(&self, node: ElementId) -> bool {
        self.hidden.contains(&node)
    }
}

// ============================================================================
// TestHost - Rc handle implementing the host traits
// ============================================================================

#[derive(Clone, Default)]
pub struct TestHost(pub Rc<RefCell<World>>);

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn world(&self) -> Ref<'_, World> {
        self.0.borrow()
    }

    pub fn world_mut(&self) -> RefMut<'_, World> {
        self.0.borrow_mut()
    }
}

impl GeometryProvider for TestHost {
    fn bounding_rect(&self, element: ElementId) -> Rect {
        self.0.borrow().rects.get(&element).copied().unwrap_or_default()
    }

    fn element_at(&self, x: f32, y: f32) -> Option<ElementId> {
        let world = self.0.borrow();
        world
            .hit_order
            .iter()
            .copied()
            .find(|id| {
                !world.hidden.contains(id)
                    && !world.overlay.contains(id)
                    && world.rects.get(id).is_some_and(|r| r.contains(x, y))
            })
    }

    fn is_descendant_or_self(&self, root: ElementId, candidate: ElementId) -> bool {
        let world = self.0.borrow();
        let mut node = candidate;
        loop {
            if node == root {
                return true;
            }
            match world.parents.get(&node) {
                Some(parent) => node = *parent,
                None => return false,
            }
        }
    }

    fn scroll_offset(&self) -> Point {
        self.0.borrow().scroll
    }
}

impl VisualSink for TestHost {
    fn clone_subtree(&mut self, source: ElementId) -> ElementId {
        let mut world = self.0.borrow_mut();
        let id = ElementId(world.next_element);
        world.next_element += 1;
        // Clones copy geometry and child order but never join the hit order.
        if let Some(rect) = world.rects.get(&source).copied() {
            world.rects.insert(id, rect);
        }
        if let Some(duration) = world.transitions.get(&source).copied() {
            world.transitions.insert(id, duration);
        }
        if let Some(children) = world.children.get(&source).cloned() {
            world.children.insert(id, children);
        }
        id
    }

    fn mount_overlay(&mut self, node: ElementId) {
        self.0.borrow_mut().overlay.push(node);
    }

    fn remove_node(&mut self, node: ElementId) {
        let mut world = self.0.borrow_mut();
        world.overlay.retain(|n| *n != node);
        world.hit_order.retain(|n| *n != node);
        world.removed.push(node);
    }

    fn set_transform(&mut self, node: ElementId, x: f32, y: f32) {
        self.0.borrow_mut().transforms.insert(node, Point::new(x, y));
    }

    fn set_size(&mut self, node: ElementId, width: f32, height: f32) {
        self.0.borrow_mut().sizes.insert(node, (width, height));
    }

    fn set_visible(&mut self, node: ElementId, visible: bool) {
        let mut world = self.0.borrow_mut();
        if visible {
            world.hidden.remove(&node);
        } else {
            world.hidden.insert(node);
        }
    }

    fn set_native_drag_interactions(&mut self, node: ElementId, enabled: bool) {
        let mut world = self.0.borrow_mut();
        if enabled {
            world.native_drag_disabled.remove(&node);
        } else {
            world.native_drag_disabled.insert(node);
        }
    }

    fn transition_duration_ms(&self, node: ElementId) -> f32 {
        self.0.borrow().transitions.get(&node).copied().unwrap_or(0.0)
    }

    fn next_sibling(&self, node: ElementId) -> Option<ElementId> {
        let world = self.0.borrow();
        let parent = world.parents.get(&node)?;
        let siblings = world.children.get(parent)?;
        let index = siblings.iter().position(|n| *n == node)?;
        siblings.get(index + 1).copied()
    }

    fn insert_child(&mut self, parent: ElementId, child: ElementId, before: Option<usize>) {
        let mut world = self.0.borrow_mut();
        let children = world.children.entry(parent).or_default();
        let index = before.unwrap_or(children.len()).min(children.len());
        children.insert(index, child);
        world.parents.insert(child, parent);
    }

    fn remove_child(&mut self, parent: ElementId, index: usize) {
        let mut world = self.0.borrow_mut();
        if let Some(children) = world.children.get_mut(&parent)
            && index < children.len()
        {
            children.remove(index);
        }
    }

    fn relocate_child(&mut self, parent: ElementId, from: usize, before: Option<usize>) {
        let mut world = self.0.borrow_mut();
        let Some(children) = world.children.get_mut(&parent) else {
            return;
        };
        if from >= children.len() {
            return;
        }
        // `before` refers to the pre-move child list, so resolve the anchor
        // element first.
        let anchor = before.and_then(|b| children.get(b).copied());
        let node = children.remove(from);
        match anchor.and_then(|a| children.iter().position(|n| *n == a)) {
            Some(index) => children.insert(index, node),
            None => children.push(node),
        }
    }
}

impl ListenerHost for TestHost {
    fn bind_global_listener(&mut self, listener: GlobalListener, active: bool) {
        self.0.borrow_mut().bound_globals.push((listener, active));
    }

    fn unbind_global_listener(&mut self, listener: GlobalListener) {
        let mut world = self.0.borrow_mut();
        if let Some(index) = world.bound_globals.iter().position(|(l, _)| *l == listener) {
            world.bound_globals.remove(index);
        }
    }

    fn bind_item_listener(&mut self, element: ElementId) {
        self.0.borrow_mut().item_listeners.push(element);
    }

    fn unbind_item_listener(&mut self, element: ElementId) {
        self.0.borrow_mut().item_listeners.retain(|e| *e != element);
    }
}

// ============================================================================
// Fixture - engine wired to a TestHost
// ============================================================================

/// Height of the stacked item slots created by `container_with_items`.
pub const SLOT_HEIGHT: f32 = 50.0;

pub struct Fixture {
    pub dnd: DragDrop<TestHost>,
    pub host: TestHost,
    clock_ms: u64,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

static TRACING: Once = Once::new();

/// Route engine logs through the test writer; control verbosity with
/// `RUST_LOG`.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

impl Fixture {
    pub fn new() -> Self {
        init_tracing();
        let host = TestHost::new();
        Self {
            dnd: DragDrop::new(host.clone()),
            host,
            clock_ms: 0,
        }
    }

    pub fn element(&mut self, rect: Rect) -> ElementId {
        self.host.world_mut().create_element(rect)
    }

    /// A container whose items are stacked vertically, each `SLOT_HEIGHT`
    /// tall and as wide as the container.
    pub fn container_with_items(&mut self, rect: Rect, count: usize) -> (ContainerId, Vec<ItemId>) {
        let container_element = self.element(rect);
        let container = self.dnd.create_container(container_element);
        let mut items = Vec::with_capacity(count);
        for i in 0..count {
            let slot = Rect::from_ltwh(
                rect.left,
                rect.top + i as f32 * SLOT_HEIGHT,
                rect.width,
                SLOT_HEIGHT,
            );
            let element = self.element(slot);
            self.host.world_mut().adopt(container_element, element);
            let item = self.dnd.create_item(element);
            self.dnd.add_to_container(item, container).unwrap();
            items.push(item);
        }
        (container, items)
    }

    /// A free-floating item with no container.
    pub fn free_item(&mut self, rect: Rect) -> ItemId {
        let element = self.element(rect);
        self.dnd.create_item(element)
    }

    pub fn advance(&mut self, ms: u64) {
        self.clock_ms += ms;
    }

    pub fn press(&mut self, item: ItemId, x: f32, y: f32) {
        let event = mouse(x, y, self.clock_ms);
        self.dnd.pointer_down(item, event).unwrap();
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.clock_ms += 10;
        let event = mouse(x, y, self.clock_ms);
        self.dnd.pointer_move(event);
    }

    pub fn release(&mut self, x: f32, y: f32) {
        self.clock_ms += 10;
        let event = mouse(x, y, self.clock_ms);
        self.dnd.pointer_up(event);
    }
}

pub fn mouse(x: f32, y: f32, ms: u64) -> PointerEvent {
    PointerEvent {
        kind: PointerKind::Mouse,
        page_x: x,
        page_y: y,
        timestamp: Duration::from_millis(ms),
    }
}

pub fn touch(x: f32, y: f32, ms: u64) -> PointerEvent {
    PointerEvent {
        kind: PointerKind::Touch,
        page_x: x,
        page_y: y,
        timestamp: Duration::from_millis(ms),
    }
}

/// Subscribes a recording callback and returns the shared log.
pub fn record<T: Clone + 'static>(channel: &mut EventChannel<T>) -> Rc<RefCell<Vec<T>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    channel
        .subscribe(move |value: &T| sink.borrow_mut().push(value.clone()))
        .unwrap();
    log
}
