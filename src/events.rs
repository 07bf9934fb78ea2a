//! Synchronous publish/subscribe channels for lifecycle notifications.
//!
//! The engine fans out every notification to all subscribers, in subscription
//! order, on the same event-loop turn that produced it. Channels are owned by
//! the entity that emits on them and are closed when that entity is disposed;
//! a closed channel rejects further subscriptions so callers cannot observe
//! events from an entity that no longer exists.

use crate::error::{DragError, DragResult};

/// Handle returned from [`EventChannel::subscribe`]; pass it back to
/// [`EventChannel::unsubscribe`] to remove the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// An ordered, synchronous broadcast channel.
pub struct EventChannel<T> {
    subscribers: Vec<(Subscription, Box<dyn FnMut(&T)>)>,
    next_id: u64,
    closed: bool,
}

impl<T> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventChannel<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
            closed: false,
        }
    }

    /// Register a callback. Delivery order equals subscription order.
    /// Fails with [`DragError::ChannelClosed`] once the channel is closed.
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> DragResult<Subscription> {
        if self.closed {
            return Err(DragError::ChannelClosed);
        }
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        Ok(id)
    }

    /// Remove a previously registered callback. Unknown handles are ignored.
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.subscribers.retain(|(id, _)| *id != subscription);
    }

    /// Deliver `payload` to every subscriber synchronously, in order.
    pub fn emit(&mut self, payload: &T) {
        for (_, callback) in &mut self.subscribers {
            callback(payload);
        }
    }

    /// Drop all subscribers and reject future subscriptions. Idempotent.
    pub fn close(&mut self) {
        self.closed = true;
        self.subscribers.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
