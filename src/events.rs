//! Event routing
//!
//! A small publish/subscribe registry keyed by `(event_id, payload)`. The
//! keypad monitor raises one event per fresh press; user code subscribes to
//! the `(BUTTON_EVENT_ID, button code)` pairs it cares about.
//!
//! Handlers are stored in a fixed-capacity table. They run synchronously on
//! the thread that raises the event, in registration order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Maximum number of handlers across all events
pub const MAX_HANDLERS: usize = 16;

/// A registered event callback
pub type Handler = Arc<dyn Fn() + Send + Sync>;

struct Subscription {
    event_id: u16,
    payload: u16,
    handler: Handler,
}

/// Registry of handlers keyed by event id and payload
pub struct EventBus {
    subscriptions: Mutex<heapless::Vec<Subscription, MAX_HANDLERS>>,
}

impl EventBus {
    pub const fn new() -> Self {
        Self {
            subscriptions: Mutex::new(heapless::Vec::new()),
        }
    }

    fn subscriptions(&self) -> MutexGuard<'_, heapless::Vec<Subscription, MAX_HANDLERS>> {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `handler` for events matching `event_id` and `payload`
    ///
    /// Fails once `MAX_HANDLERS` handlers are registered.
    pub fn on_event<F>(&self, event_id: u16, payload: u16, handler: F) -> anyhow::Result<()>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let subscription = Subscription {
            event_id,
            payload,
            handler: Arc::new(handler),
        };

        if self.subscriptions().push(subscription).is_err() {
            anyhow::bail!(
                "Event handler table full ({} handlers), cannot subscribe to {:#06x}/{}",
                MAX_HANDLERS,
                event_id,
                payload
            );
        }

        Ok(())
    }

    /// Invoke every handler registered for `event_id` and `payload`
    ///
    /// Returns the number of handlers that ran.
    pub fn raise_event(&self, event_id: u16, payload: u16) -> usize {
        // Snapshot first so handlers may subscribe without deadlocking
        let matching: heapless::Vec<Handler, MAX_HANDLERS> = self
            .subscriptions()
            .iter()
            .filter(|s| s.event_id == event_id && s.payload == payload)
            .map(|s| Arc::clone(&s.handler))
            .collect();

        for handler in &matching {
            handler();
        }

        matching.len()
    }

    /// Number of registered handlers across all events
    pub fn handler_count(&self) -> usize {
        self.subscriptions().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
