//! Gesture initiation.

use crate::drag_item::{DragPhase, Gesture};
use crate::error::{DragError, DragResult};
use crate::host::DragHost;
use crate::types::{ItemId, Point, PointerEvent};

impl<H: DragHost> super::DragDrop<H> {
    /// Handles a pointer press on an item's root element.
    ///
    /// `before_started` fires unconditionally, before the disabled check, so
    /// observers see every press attempt. A press on a disabled item, or
    /// while another gesture is already in flight, is then swallowed: one
    /// gesture at a time across the whole surface.
    pub fn pointer_down(&mut self, item_id: ItemId, event: PointerEvent) -> DragResult<()> {
        let item = self
            .items
            .get_mut(&item_id)
            .ok_or(DragError::UnknownItem(item_id))?;
        item.events.before_started.emit(&());

        if item.disabled {
            tracing::debug!(item = ?item_id, "press on disabled item ignored");
            return Ok(());
        }
        if !self.registry.active_items().is_empty() {
            tracing::debug!(item = ?item_id, "press ignored, another gesture is active");
            return Ok(());
        }

        let scroll = self.host.scroll_offset();
        let rect = self.host.bounding_rect(item.root);
        let pickup_on_page = Point::new(event.page_x - scroll.x, event.page_y - scroll.y);
        let pickup_in_element = Point::new(
            event.page_x - rect.left - scroll.x,
            event.page_y - rect.top - scroll.y,
        );

        item.gesture = Some(Gesture::new(
            pickup_on_page,
            pickup_in_element,
            event.timestamp,
            scroll,
            item.container,
        ));
        item.phase = DragPhase::Pending;
        tracing::debug!(
            item = ?item_id,
            kind = ?event.kind,
            x = event.page_x,
            y = event.page_y,
            "gesture pending"
        );

        self.registry.start_dragging(item_id, event.kind, &mut self.host);
        Ok(())
    }
}
