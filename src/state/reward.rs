//! Reward Balance - Single-writer store for the user's reward balance
//!
//! The store is fed by two sources: REST polling ([`RewardBalanceStore::refresh`])
//! and server pushes on the socket channel ([`RewardBalanceStore::attach`]).
//! Updates apply in receipt order, last write wins.
//!
//! Only the store can write. Components receive a [`RewardBalanceView`],
//! which can read and watch but has no setter.

use serde::{Deserialize, Serialize};
use spark_signals::{derived, effect, signal, Derived, Signal};
use tracing::{debug, warn};

use crate::error::Result;
use crate::net::{RewardApi, SocketChannel, Subscription};
use crate::types::Cleanup;

/// Socket event carrying a full [`RewardBalance`].
pub const BALANCE_CHANGED_EVENT: &str = "reward_balance_changed";

/// Reward balance in minor currency units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardBalance {
    pub amount: u64,
    pub currency: String,
}

impl RewardBalance {
    pub fn new(amount: u64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

// =============================================================================
// STORE (writer)
// =============================================================================

pub struct RewardBalanceStore {
    balance: Signal<Option<RewardBalance>>,
}

impl Default for RewardBalanceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RewardBalanceStore {
    pub fn new() -> Self {
        Self {
            balance: signal(None),
        }
    }

    /// Read-only handle for consumers.
    pub fn view(&self) -> RewardBalanceView {
        RewardBalanceView {
            balance: self.balance.clone(),
        }
    }

    pub fn set(&self, balance: RewardBalance) {
        debug!(amount = balance.amount, currency = %balance.currency, "reward balance updated");
        self.balance.set(Some(balance));
    }

    pub fn clear(&self) {
        self.balance.set(None);
    }

    /// Poll the backend. On failure the current balance is kept.
    pub async fn refresh<A: RewardApi + ?Sized>(&self, api: &A) -> Result<RewardBalance> {
        match api.fetch_balance().await.into_result() {
            Ok(balance) => {
                self.set(balance.clone());
                Ok(balance)
            }
            Err(err) => {
                warn!(error = %err, "reward balance refresh failed");
                Err(err.into())
            }
        }
    }

    /// Apply balance pushes from the socket until the subscription drops.
    pub fn attach(&self, channel: &SocketChannel) -> Subscription {
        let balance = self.balance.clone();
        channel.on_decoded(BALANCE_CHANGED_EVENT, move |next: RewardBalance| {
            debug!(amount = next.amount, "reward balance pushed");
            balance.set(Some(next));
        })
    }
}

// =============================================================================
// VIEW (reader)
// =============================================================================

/// Read-only view on the reward balance.
#[derive(Clone)]
pub struct RewardBalanceView {
    balance: Signal<Option<RewardBalance>>,
}

impl RewardBalanceView {
    /// Current balance. Reading inside an effect tracks it.
    pub fn get(&self) -> Option<RewardBalance> {
        self.balance.get()
    }

    /// Read-only reactive handle for composing into other deriveds.
    pub fn signal(&self) -> Derived<Option<RewardBalance>> {
        let balance = self.balance.clone();
        derived(move || balance.get())
    }

    /// Run `handler` now and after every change.
    pub fn watch(&self, mut handler: impl FnMut(Option<RewardBalance>) + 'static) -> Cleanup {
        let balance = self.balance.clone();
        Box::new(effect(move || handler(balance.get())))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{ApiError, ApiResponse};
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FixedApi(ApiResponse<RewardBalance>);

    #[async_trait(?Send)]
    impl RewardApi for FixedApi {
        async fn fetch_balance(&self) -> ApiResponse<RewardBalance> {
            self.0.clone()
        }
    }

    #[test]
    fn test_view_reads_writes() {
        let store = RewardBalanceStore::new();
        let view = store.view();
        assert_eq!(view.get(), None);

        store.set(RewardBalance::new(250, "usd"));
        assert_eq!(view.get(), Some(RewardBalance::new(250, "usd")));

        store.clear();
        assert_eq!(view.get(), None);
    }

    #[test]
    fn test_view_signal_follows_store() {
        let store = RewardBalanceStore::new();
        let amount = store.view().signal();
        assert_eq!(amount.get(), None);

        store.set(RewardBalance::new(40, "usd"));
        assert_eq!(amount.get().map(|b| b.amount), Some(40));

        store.set(RewardBalance::new(15, "usd"));
        assert_eq!(amount.get().map(|b| b.amount), Some(15));
    }

    #[test]
    fn test_socket_push_last_write_wins() {
        let store = RewardBalanceStore::new();
        let view = store.view();
        let channel = SocketChannel::new();
        let sub = store.attach(&channel);

        let encode = |amount| bincode::serialize(&RewardBalance::new(amount, "usd")).unwrap();
        channel.dispatch(BALANCE_CHANGED_EVENT, &encode(10));
        channel.dispatch(BALANCE_CHANGED_EVENT, &encode(7));
        assert_eq!(view.get().map(|b| b.amount), Some(7));

        drop(sub);
        channel.dispatch(BALANCE_CHANGED_EVENT, &encode(99));
        assert_eq!(view.get().map(|b| b.amount), Some(7));
    }

    #[test]
    fn test_watch_fans_out() {
        let store = RewardBalanceStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = seen.clone();
        let stop = store.view().watch(move |b| log.borrow_mut().push(b.map(|b| b.amount)));

        store.set(RewardBalance::new(1, "usd"));
        store.set(RewardBalance::new(2, "usd"));
        stop();
        store.set(RewardBalance::new(3, "usd"));

        assert_eq!(*seen.borrow(), vec![None, Some(1), Some(2)]);
    }

    #[test]
    fn test_refresh_success_and_failure() {
        let store = RewardBalanceStore::new();
        let ok = FixedApi(ApiResponse::ok(RewardBalance::new(42, "usd")));
        let fetched = futures::executor::block_on(store.refresh(&ok)).unwrap();
        assert_eq!(fetched.amount, 42);

        let failing = FixedApi(ApiResponse::err(ApiError::new(Some(502), "bad gateway")));
        let err = futures::executor::block_on(store.refresh(&failing)).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(store.view().get().map(|b| b.amount), Some(42));
    }
}
