//! Socket Channel - Named realtime events and their handlers
//!
//! The realtime connection delivers named events carrying bincode-encoded
//! payloads (balance changes, reward notifications, chat updates). This module owns
//! the handler registry only; any transport that yields [`SocketMessage`]s
//! can feed it through [`SocketChannel::pump`].
//!
//! Registering a handler returns a [`Subscription`]. Dropping it detaches the
//! handler, so a component that goes away on any path (including an early
//! return or an error) never receives another event.
//!
//! # Example
//!
//! ```ignore
//! let channel = SocketChannel::new();
//! let _sub = channel.on_decoded("reward_balance_changed", |balance: RewardBalance| {
//!     store.set(balance);
//! });
//! let payload = bincode::serialize(&RewardBalance::new(120, "usd"))?;
//! channel.dispatch("reward_balance_changed", &payload);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::Result;

// =============================================================================
// TYPES
// =============================================================================

/// Handler for raw event payloads.
pub type EventHandler = Rc<dyn Fn(&[u8])>;

/// One inbound event from the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SocketMessage {
    pub event: String,
    pub payload: Vec<u8>,
}

impl SocketMessage {
    pub fn new(event: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            event: event.into(),
            payload: payload.into(),
        }
    }
}

/// Decode a bincode event payload into its schema type.
pub fn decode_payload<T: DeserializeOwned>(payload: &[u8]) -> Result<T> {
    Ok(bincode::deserialize(payload)?)
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

#[derive(Default)]
struct HandlerRegistry {
    handlers: HashMap<String, Vec<(usize, EventHandler)>>,
    next_id: usize,
}

impl HandlerRegistry {
    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn contains(&self, event: &str, id: usize) -> bool {
        self.handlers
            .get(event)
            .is_some_and(|list| list.iter().any(|(hid, _)| *hid == id))
    }

    fn remove(&mut self, event: &str, id: usize) {
        if let Some(list) = self.handlers.get_mut(event) {
            list.retain(|(hid, _)| *hid != id);
            if list.is_empty() {
                self.handlers.remove(event);
            }
        }
    }
}

/// Detaches its handler when dropped.
#[must_use = "dropping a Subscription detaches the handler immediately"]
pub struct Subscription {
    registry: Weak<RefCell<HandlerRegistry>>,
    event: String,
    id: usize,
}

impl Subscription {
    /// Detach now (same as dropping).
    pub fn detach(self) {}

    pub fn event(&self) -> &str {
        &self.event
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(&self.event, self.id);
            debug!(event = %self.event, id = self.id, "socket handler detached");
        }
    }
}

// =============================================================================
// CHANNEL
// =============================================================================

/// Shared handle on the realtime event registry. Clones share handlers.
#[derive(Clone, Default)]
pub struct SocketChannel {
    registry: Rc<RefCell<HandlerRegistry>>,
}

impl SocketChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a handler for raw payloads of `event`.
    pub fn on(&self, event: &str, handler: impl Fn(&[u8]) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id();
        registry
            .handlers
            .entry(event.to_string())
            .or_default()
            .push((id, Rc::new(handler)));
        debug!(event, id, "socket handler attached");

        Subscription {
            registry: Rc::downgrade(&self.registry),
            event: event.to_string(),
            id,
        }
    }

    /// Attach a handler that receives decoded payloads. Payloads that fail
    /// to decode are logged and dropped.
    pub fn on_decoded<T, F>(&self, event: &str, handler: F) -> Subscription
    where
        T: DeserializeOwned + 'static,
        F: Fn(T) + 'static,
    {
        let name = event.to_string();
        self.on(event, move |payload| match decode_payload::<T>(payload) {
            Ok(value) => handler(value),
            Err(err) => warn!(event = %name, error = %err, "dropping undecodable socket payload"),
        })
    }

    /// Deliver a payload to every handler of `event`, in registration order.
    ///
    /// Returns the number of handlers invoked. Handlers may attach or detach
    /// other handlers while running: a handler detached by an earlier one is
    /// skipped, and one attached during dispatch waits for the next event.
    pub fn dispatch(&self, event: &str, payload: &[u8]) -> usize {
        let handlers: Vec<(usize, EventHandler)> = self
            .registry
            .borrow()
            .handlers
            .get(event)
            .cloned()
            .unwrap_or_default();

        let mut invoked = 0;
        for (id, handler) in &handlers {
            if !self.registry.borrow().contains(event, *id) {
                continue;
            }
            handler(payload);
            invoked += 1;
        }
        invoked
    }

    /// Dispatch every message from `messages` until the stream ends.
    pub async fn pump<S>(&self, messages: S) -> usize
    where
        S: Stream<Item = SocketMessage>,
    {
        let mut delivered = 0;
        futures::pin_mut!(messages);
        while let Some(message) = messages.next().await {
            if self.dispatch(&message.event, &message.payload) == 0 {
                debug!(event = %message.event, "socket event with no handlers");
            }
            delivered += 1;
        }
        delivered
    }

    pub fn handler_count(&self, event: &str) -> usize {
        self.registry
            .borrow()
            .handlers
            .get(event)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

// =============================================================================
// TESTS
// =============================================================================
