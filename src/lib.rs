//! Pointer-driven drag-and-drop engine: reorderable containers, free-floating
//! items, and cross-container hand-off, decoupled from any particular UI
//! toolkit.
//!
//! The engine is a pure state machine over geometry supplied by the host. A
//! host implements three traits - [`host::GeometryProvider`] for measurement
//! and hit testing, [`host::VisualSink`] for overlay clones and transforms,
//! and [`host::ListenerHost`] for global listener lifecycle - and feeds raw
//! pointer events into [`DragDrop`]. The engine resolves the gesture state
//! machine, reorders container sequences, and reports everything through
//! synchronous [`events::EventChannel`] notifications.
//!
//! ```no_run
//! use dragboard::{DragDrop, PointerEvent, PointerKind};
//! # use std::time::Duration;
//! # fn run(host: impl dragboard::DragHost) {
//! let mut dnd = DragDrop::new(host);
//! let container = dnd.create_container(dragboard::ElementId(1));
//! let item = dnd.create_item(dragboard::ElementId(2));
//! dnd.add_to_container(item, container).unwrap();
//!
//! dnd.pointer_down(item, PointerEvent {
//!     kind: PointerKind::Mouse,
//!     page_x: 10.0,
//!     page_y: 10.0,
//!     timestamp: Duration::ZERO,
//! }).unwrap();
//! # }
//! ```

pub mod constants;
pub mod drag_item;
pub mod drop_list;
pub mod engine;
pub mod error;
pub mod events;
pub mod host;
pub mod perf;
pub mod registry;
pub mod types;

pub use drag_item::{
    DragEnded, DragEntered, DragExited, DragItemEvents, DragPhase, DragSource, ItemDropped,
};
pub use drop_list::{ContainerDropped, DropListEvents, EnterPredicate};
pub use engine::DragDrop;
pub use error::{DragError, DragResult};
pub use events::{EventChannel, Subscription};
pub use host::{DragHost, GeometryProvider, ListenerHost, VisualSink};
pub use registry::DragDropRegistry;
pub use types::{
    ContainerId, ElementId, GlobalListener, ItemId, Point, PointerEvent, PointerKind, Rect,
};
