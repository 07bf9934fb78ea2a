//! Host capability traits.
//!
//! The engine is host-agnostic: everything it needs from the environment is
//! expressed through these three traits. A DOM host backs them with
//! `getBoundingClientRect` / `elementFromPoint` / `insertBefore`; a retained
//! scene graph backs them with its own node operations; tests back them with
//! an in-memory world.

use crate::types::{ElementId, GlobalListener, Point, Rect};

/// Read-only geometry queries over the host's visual tree.
pub trait GeometryProvider {
    /// Current bounding rectangle of a node, in page coordinates.
    fn bounding_rect(&self, element: ElementId) -> Rect;

    /// The topmost interactive node at a page position, if any. Nodes the
    /// host treats as non-interactive (such as drag previews) are skipped.
    fn element_at(&self, x: f32, y: f32) -> Option<ElementId>;

    /// Whether `candidate` is `root` itself or lies in `root`'s subtree.
    fn is_descendant_or_self(&self, root: ElementId, candidate: ElementId) -> bool;

    /// Current viewport scroll offset.
    fn scroll_offset(&self) -> Point;
}

/// Mutations the engine performs on the host's visual tree.
///
/// Child-index arguments follow insert-before semantics: an index refers to
/// the child list as it was *before* the operation, and `None` means append.
pub trait VisualSink {
    /// Deep-clone a node's subtree, including pixel-buffer content of any
    /// embedded raster surfaces, and return a handle to the detached clone.
    fn clone_subtree(&mut self, source: ElementId) -> ElementId;

    /// Attach a detached node to the host's overlay layer (above normal
    /// content, exempt from hit testing).
    fn mount_overlay(&mut self, node: ElementId);

    /// Detach a node from wherever it currently lives.
    fn remove_node(&mut self, node: ElementId);

    /// Apply a 2-D translation transform to a node.
    fn set_transform(&mut self, node: ElementId, x: f32, y: f32);

    /// Pin a node's layout size.
    fn set_size(&mut self, node: ElementId, width: f32, height: f32);

    /// Toggle a node's visibility without detaching it.
    fn set_visible(&mut self, node: ElementId, visible: bool);

    /// Enable or disable the host's native drag interactions on a node
    /// (text selection, OS drag images, tap highlights).
    fn set_native_drag_interactions(&mut self, node: ElementId, enabled: bool);

    /// Measured transform-transition duration of a node in milliseconds.
    /// Zero means the node settles instantly.
    fn transition_duration_ms(&self, node: ElementId) -> f32;

    /// The node immediately following `node` among its siblings, if any.
    fn next_sibling(&self, node: ElementId) -> Option<ElementId>;

    /// Insert `child` into `parent`'s child list before index `before`.
    fn insert_child(&mut self, parent: ElementId, child: ElementId, before: Option<usize>);

    /// Remove the child at `index` from `parent`.
    fn remove_child(&mut self, parent: ElementId, index: usize);

    /// Move the child at `from` so it sits before the child that was at
    /// index `before` prior to the move.
    fn relocate_child(&mut self, parent: ElementId, from: usize, before: Option<usize>);
}

/// Registration of input listeners with the host's event system.
///
/// The engine never receives events through these bindings directly; the
/// host forwards them to [`DragDrop::pointer_move`] and
/// [`DragDrop::pointer_up`]. Bindings exist so the host knows which raw
/// streams to tap and which defaults to suppress.
///
/// [`DragDrop::pointer_move`]: crate::DragDrop::pointer_move
/// [`DragDrop::pointer_up`]: crate::DragDrop::pointer_up
pub trait ListenerHost {
    /// Bind a process-wide listener. `active` requests a non-passive binding
    /// so the host may call prevent-default while a drag is running.
    fn bind_global_listener(&mut self, listener: GlobalListener, active: bool);

    /// Unbind a previously bound process-wide listener.
    fn unbind_global_listener(&mut self, listener: GlobalListener);

    /// Bind the pointer-down listener for one draggable element.
    fn bind_item_listener(&mut self, element: ElementId);

    /// Unbind the pointer-down listener for one draggable element.
    fn unbind_item_listener(&mut self, element: ElementId);
}

/// Everything the engine needs from its host environment.
pub trait DragHost: GeometryProvider + VisualSink + ListenerHost {}

impl<T: GeometryProvider + VisualSink + ListenerHost> DragHost for T {}
