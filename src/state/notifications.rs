//! Notification Queue - Modal notifications shown one at a time
//!
//! Reward notifications arrive on the socket channel; error toasts are
//! pushed locally when a request fails. The queue is FIFO by receipt and the
//! head is the notification on screen.
//!
//! Like the reward store, only [`NotificationQueue`] writes; components get a
//! [`NotificationView`].

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use spark_signals::{derived, effect, signal, Derived, Signal};
use tracing::debug;

use crate::i18n::keys;
use crate::net::{SocketChannel, Subscription};
use crate::types::Cleanup;

/// Socket event announcing a received reward.
pub const REWARD_RECEIVED_EVENT: &str = "reward_received";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Reward,
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    /// Localization key for the message body.
    pub message_key: String,
    /// Reward amount in minor units, for reward notifications.
    pub amount: Option<u64>,
}

/// Payload of [`REWARD_RECEIVED_EVENT`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardReceived {
    pub amount: u64,
    pub message_key: Option<String>,
}

// =============================================================================
// QUEUE (writer)
// =============================================================================

pub struct NotificationQueue {
    items: Signal<Vec<Notification>>,
    next_id: Rc<Cell<u64>>,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self {
            items: signal(Vec::new()),
            next_id: Rc::new(Cell::new(1)),
        }
    }

    pub fn view(&self) -> NotificationView {
        NotificationView {
            items: self.items.clone(),
        }
    }

    /// Append a notification and return its id.
    pub fn push(
        &self,
        kind: NotificationKind,
        message_key: impl Into<String>,
        amount: Option<u64>,
    ) -> u64 {
        push_item(&self.items, &self.next_id, kind, message_key.into(), amount)
    }

    /// Generic error toast shown after a failed request.
    pub fn push_error(&self, message_key: impl Into<String>) -> u64 {
        self.push(NotificationKind::Error, message_key, None)
    }

    /// Remove the notification on screen and return it.
    pub fn dismiss_current(&self) -> Option<Notification> {
        let mut items = self.items.get();
        if items.is_empty() {
            return None;
        }
        let head = items.remove(0);
        self.items.set(items);
        Some(head)
    }

    /// Remove a notification by id. Returns whether it was queued.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut items = self.items.get();
        let before = items.len();
        items.retain(|n| n.id != id);
        if items.len() == before {
            return false;
        }
        self.items.set(items);
        true
    }

    pub fn clear(&self) {
        self.items.set(Vec::new());
    }

    /// Queue reward notifications pushed on the socket until the
    /// subscription drops.
    pub fn attach(&self, channel: &SocketChannel) -> Subscription {
        let items = self.items.clone();
        let next_id = self.next_id.clone();
        channel.on_decoded(REWARD_RECEIVED_EVENT, move |reward: RewardReceived| {
            let key = reward
                .message_key
                .unwrap_or_else(|| keys::REWARD_RECEIVED.to_string());
            push_item(&items, &next_id, NotificationKind::Reward, key, Some(reward.amount));
        })
    }
}

fn push_item(
    items: &Signal<Vec<Notification>>,
    next_id: &Cell<u64>,
    kind: NotificationKind,
    message_key: String,
    amount: Option<u64>,
) -> u64 {
    let id = next_id.get();
    next_id.set(id + 1);

    let mut list = items.get();
    list.push(Notification { id, kind, message_key, amount });
    debug!(id, ?kind, queued = list.len(), "notification queued");
    items.set(list);
    id
}

// =============================================================================
// VIEW (reader)
// =============================================================================

/// Read-only view on the notification queue.
#[derive(Clone)]
pub struct NotificationView {
    items: Signal<Vec<Notification>>,
}

impl NotificationView {
    /// Notification currently on screen.
    pub fn current(&self) -> Option<Notification> {
        self.items.get().first().cloned()
    }

    pub fn len(&self) -> usize {
        self.items.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read-only reactive handle on the whole queue, head first.
    pub fn signal(&self) -> Derived<Vec<Notification>> {
        let items = self.items.clone();
        derived(move || items.get())
    }

    /// Run `handler` with the on-screen notification now and after every change.
    pub fn watch(&self, mut handler: impl FnMut(Option<Notification>) + 'static) -> Cleanup {
        let items = self.items.clone();
        Box::new(effect(move || handler(items.get().first().cloned())))
    }
}

// =============================================================================
// TESTS
// =============================================================================
