//! Resend Countdown - Time until a verification code may be resent
//!
//! The countdown is anchored to a server-issued expiry instant, not a
//! duration. Every tick recomputes `expires_at - now` from the clock, so a
//! process that was suspended for ten seconds shows the right value on its
//! next tick instead of counting down ten ticks late.
//!
//! # States
//!
//! - `Counting { remaining_secs }` while the expiry is in the future
//! - `Expired` once it has passed; ticking stops and `on_expire` fires once
//!
//! A resend restarts the countdown from the new server expiry. At most one
//! resend request is in flight: a second call while one is pending returns
//! [`ResendOutcome::Ignored`] without touching the network. A failed resend
//! leaves the state alone (normally `Expired`, so the user can retry).
//!
//! # Example
//!
//! ```ignore
//! let countdown = ResendCountdown::new(ticket.expires_at, Rc::new(SystemClock));
//! countdown.on_expire(|| tracing::info!("resend available"));
//! countdown.run(Duration::from_secs(1)).await;
//! match countdown.resend(&api).await {
//!     Ok(ResendOutcome::Restarted { .. }) => {}
//!     Ok(ResendOutcome::Ignored) => {}
//!     Err(_) => notifications.push_error(keys::GENERIC_ERROR),
//! }
//! ```

use std::cell::{Cell, RefCell};
use std::time::Duration;

use chrono::{DateTime, Utc};
use spark_signals::{effect, signal, Signal};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::clock::SharedClock;
use crate::error::Result;
use crate::i18n::{keys, Translate};
use crate::net::VerificationApi;
use crate::types::Cleanup;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CountdownState {
    Counting { remaining_secs: u64 },
    Expired,
}

impl CountdownState {
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }

    pub fn remaining_secs(&self) -> u64 {
        match self {
            Self::Counting { remaining_secs } => *remaining_secs,
            Self::Expired => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResendOutcome {
    /// The request succeeded and the countdown restarted.
    Restarted { expires_at: DateTime<Utc> },
    /// Another resend was already in flight; nothing was sent.
    Ignored,
}

/// Format seconds as `mm:ss`.
pub fn format_mm_ss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Whole seconds from `now` until `expires_at`, rounded up, zero once passed.
pub fn remaining_secs(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let ms = (expires_at - now).num_milliseconds();
    if ms <= 0 {
        0
    } else {
        (ms as u64).div_ceil(1000)
    }
}

/// Marks a resend as in flight for as long as it lives.
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

// =============================================================================
// COUNTDOWN
// =============================================================================

pub struct ResendCountdown {
    expires_at: Cell<DateTime<Utc>>,
    active: Cell<bool>,
    state: Signal<CountdownState>,
    in_flight: Cell<bool>,
    /// Whether `on_expire` has run for the current expiry.
    expire_fired: Cell<bool>,
    on_expire: RefCell<Option<Box<dyn FnMut()>>>,
    clock: SharedClock,
}

impl ResendCountdown {
    /// Start counting toward `expires_at`.
    ///
    /// An expiry already in the past starts `Expired`; the first active
    /// `tick` still fires `on_expire` for it.
    pub fn new(expires_at: DateTime<Utc>, clock: SharedClock) -> Self {
        let initial = match remaining_secs(expires_at, clock.now()) {
            0 => CountdownState::Expired,
            remaining_secs => CountdownState::Counting { remaining_secs },
        };
        Self {
            expires_at: Cell::new(expires_at),
            active: Cell::new(true),
            state: signal(initial),
            in_flight: Cell::new(false),
            expire_fired: Cell::new(false),
            on_expire: RefCell::new(None),
            clock,
        }
    }

    /// Set the expiry callback. It fires once per expiry (the initial one and
    /// each one set by `restart`).
    pub fn on_expire(&self, callback: impl FnMut() + 'static) {
        *self.on_expire.borrow_mut() = Some(Box::new(callback));
    }

    /// Pause or resume ticking. Inactive countdowns keep their last state.
    pub fn set_active(&self, active: bool) {
        self.active.set(active);
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn state(&self) -> CountdownState {
        self.state.get()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at.get()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.state.get().remaining_secs()
    }

    /// Remaining time as `mm:ss`.
    pub fn formatted(&self) -> String {
        format_mm_ss(self.remaining_secs())
    }

    /// Localized label for the resend control.
    pub fn label(&self, i18n: &dyn Translate) -> String {
        match self.state.get() {
            CountdownState::Counting { remaining_secs } => {
                let time = format_mm_ss(remaining_secs);
                i18n.t_with(keys::RESEND_COUNTDOWN, &[("time", time.as_str())])
            }
            CountdownState::Expired => i18n.t(keys::RESEND_AVAILABLE),
        }
    }

    pub fn is_resend_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// Recompute the remaining time from the clock.
    pub fn tick(&self) -> CountdownState {
        let current = self.state.get();
        if !self.active.get() {
            return current;
        }
        if current.is_expired() {
            self.expire();
            return current;
        }

        match remaining_secs(self.expires_at.get(), self.clock.now()) {
            0 => {
                self.expire();
                CountdownState::Expired
            }
            remaining_secs => {
                let next = CountdownState::Counting { remaining_secs };
                self.state.set(next);
                next
            }
        }
    }

    /// Restart toward a new expiry.
    pub fn restart(&self, expires_at: DateTime<Utc>) {
        debug!(%expires_at, "resend countdown restarted");
        self.expires_at.set(expires_at);
        self.active.set(true);
        self.expire_fired.set(false);
        match remaining_secs(expires_at, self.clock.now()) {
            0 => self.expire(),
            remaining_secs => {
                self.state.set(CountdownState::Counting { remaining_secs });
            }
        }
    }

    /// Request a new code. See the module docs for the in-flight and
    /// failure rules.
    pub async fn resend<A: VerificationApi + ?Sized>(&self, api: &A) -> Result<ResendOutcome> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            debug!("resend already in flight, ignoring");
            return Ok(ResendOutcome::Ignored);
        };

        match api.resend_code().await.into_result() {
            Ok(ticket) => {
                self.restart(ticket.expires_at);
                Ok(ResendOutcome::Restarted {
                    expires_at: ticket.expires_at,
                })
            }
            Err(err) => {
                warn!(error = %err, state = ?self.state.get(), "verification resend failed");
                Err(err.into())
            }
        }
    }

    /// Tick every `period` until the countdown expires or is deactivated.
    ///
    /// Dropping the future stops the timer.
    pub async fn run(&self, period: Duration) -> CountdownState {
        let mut ticker = interval(period.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if !self.active.get() {
                return self.state.get();
            }
            if self.tick().is_expired() {
                return CountdownState::Expired;
            }
        }
    }

    /// Run `handler` with the state now and after every change.
    pub fn watch(&self, mut handler: impl FnMut(CountdownState) + 'static) -> Cleanup {
        let state = self.state.clone();
        Box::new(effect(move || handler(state.get())))
    }

    /// Enter `Expired` and run `on_expire` unless it already ran for this expiry.
    fn expire(&self) {
        if !self.state.get().is_expired() {
            self.state.set(CountdownState::Expired);
        }
        if !self.expire_fired.replace(true) {
            info!("verification resend available");
            self.fire_expire();
        }
    }

    fn fire_expire(&self) {
        // Taken out for the call so the callback may re-enter the countdown
        let callback = self.on_expire.borrow_mut().take();
        if let Some(mut callback) = callback {
            callback();
            let mut slot = self.on_expire.borrow_mut();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock, SystemClock};
    use crate::i18n::Catalog;
    use crate::net::{ApiError, ApiResponse, ResendTicket};
    use async_trait::async_trait;
    use futures::channel::oneshot;
    use std::rc::Rc;

    fn setup(secs: i64) -> (ResendCountdown, ManualClock, Rc<Cell<u32>>) {
        let clock = ManualClock::starting_now();
        let countdown = ResendCountdown::new(
            clock.now() + chrono::Duration::seconds(secs),
            Rc::new(clock.clone()),
        );
        let expired = Rc::new(Cell::new(0));
        let counter = expired.clone();
        countdown.on_expire(move || counter.set(counter.get() + 1));
        (countdown, clock, expired)
    }

    /// Counts calls; the first call waits on a gate, later calls fail.
    struct GatedApi {
        calls: Cell<u32>,
        gate: RefCell<Option<oneshot::Receiver<ApiResponse<ResendTicket>>>>,
    }

    impl GatedApi {
        fn new(gate: oneshot::Receiver<ApiResponse<ResendTicket>>) -> Self {
            Self {
                calls: Cell::new(0),
                gate: RefCell::new(Some(gate)),
            }
        }
    }

    #[async_trait(?Send)]
    impl VerificationApi for GatedApi {
        async fn resend_code(&self) -> ApiResponse<ResendTicket> {
            self.calls.set(self.calls.get() + 1);
            let gate = self.gate.borrow_mut().take();
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| ApiResponse::err(ApiError::network("cancelled"))),
                None => ApiResponse::err(ApiError::new(Some(500), "server error")),
            }
        }
    }

    #[test]
    fn test_format_mm_ss() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(65), "01:05");
        assert_eq!(format_mm_ss(600), "10:00");
    }

    #[test]
    fn test_remaining_rounds_up() {
        let now = Utc::now();
        assert_eq!(remaining_secs(now + chrono::Duration::milliseconds(1), now), 1);
        assert_eq!(remaining_secs(now + chrono::Duration::milliseconds(1000), now), 1);
        assert_eq!(remaining_secs(now + chrono::Duration::milliseconds(1001), now), 2);
        assert_eq!(remaining_secs(now - chrono::Duration::seconds(5), now), 0);
    }

    #[test]
    fn test_monotonic_to_expired() {
        let (countdown, clock, expired) = setup(60);
        assert_eq!(countdown.tick(), CountdownState::Counting { remaining_secs: 60 });

        let mut last = countdown.remaining_secs();
        loop {
            clock.advance(chrono::Duration::seconds(1));
            // Re-rendering many times per second changes nothing
            for _ in 0..5 {
                countdown.tick();
            }
            let state = countdown.state();
            if state.is_expired() {
                break;
            }
            assert!(state.remaining_secs() < last);
            last = state.remaining_secs();
        }

        assert_eq!(last, 1);
        for _ in 0..10 {
            countdown.tick();
        }
        assert_eq!(expired.get(), 1);
    }

    #[test]
    fn test_clock_jump_is_immediate() {
        let (countdown, clock, _) = setup(60);
        countdown.tick();

        clock.advance(chrono::Duration::seconds(10));
        assert_eq!(countdown.tick(), CountdownState::Counting { remaining_secs: 50 });
        assert_eq!(countdown.formatted(), "00:50");

        clock.advance(chrono::Duration::seconds(120));
        assert_eq!(countdown.tick(), CountdownState::Expired);
    }

    #[test]
    fn test_inactive_does_not_tick() {
        let (countdown, clock, expired) = setup(5);
        countdown.set_active(false);
        clock.advance(chrono::Duration::seconds(10));
        assert_eq!(countdown.tick(), CountdownState::Counting { remaining_secs: 5 });
        assert_eq!(expired.get(), 0);

        countdown.set_active(true);
        assert!(countdown.tick().is_expired());
        assert_eq!(expired.get(), 1);
    }

    #[test]
    fn test_labels() {
        let (countdown, clock, _) = setup(75);
        let catalog = Catalog::english();
        assert_eq!(countdown.label(&catalog), "Resend code in 01:15");

        clock.advance(chrono::Duration::seconds(75));
        countdown.tick();
        assert_eq!(countdown.label(&catalog), "Resend code");
    }

    #[test]
    fn test_resend_deduplicates_in_flight() {
        let (countdown, clock, _) = setup(1);
        clock.advance(chrono::Duration::seconds(2));
        countdown.tick();

        let (tx, rx) = oneshot::channel();
        let api = GatedApi::new(rx);
        let new_expiry = clock.now() + chrono::Duration::seconds(60);

        let (first, second, _) = futures::executor::block_on(async {
            futures::join!(countdown.resend(&api), countdown.resend(&api), async move {
                let _ = tx.send(ApiResponse::ok(ResendTicket { expires_at: new_expiry }));
            })
        });

        assert_eq!(api.calls.get(), 1);
        assert_eq!(first.unwrap(), ResendOutcome::Restarted { expires_at: new_expiry });
        assert_eq!(second.unwrap(), ResendOutcome::Ignored);
        assert_eq!(countdown.state(), CountdownState::Counting { remaining_secs: 60 });
        assert!(!countdown.is_resend_in_flight());
    }

    #[test]
    fn test_failed_resend_stays_expired() {
        let (countdown, clock, expired) = setup(1);
        clock.advance(chrono::Duration::seconds(1));
        countdown.tick();
        assert_eq!(expired.get(), 1);

        // Gate already closed: the first call fails too
        let (tx, rx) = oneshot::channel();
        drop(tx);
        let api = GatedApi::new(rx);

        let err = futures::executor::block_on(countdown.resend(&api)).unwrap_err();
        assert!(err.is_retryable());
        assert!(countdown.state().is_expired());
        assert!(!countdown.is_resend_in_flight());

        // User-initiated retry issues a new request
        assert!(futures::executor::block_on(countdown.resend(&api)).is_err());
        assert_eq!(api.calls.get(), 2);
        assert_eq!(expired.get(), 1);
    }

    #[test]
    fn test_dropped_resend_releases_guard() {
        let (countdown, _clock, _) = setup(0);
        let (_tx, rx) = oneshot::channel();
        let api = GatedApi::new(rx);

        futures::executor::block_on(async {
            let pending = countdown.resend(&api);
            futures::pin_mut!(pending);
            assert!(futures::poll!(pending.as_mut()).is_pending());
            assert!(countdown.is_resend_in_flight());
        });

        assert!(!countdown.is_resend_in_flight());
    }

    #[test]
    fn test_restart_fires_expire_again() {
        let (countdown, clock, expired) = setup(1);
        clock.advance(chrono::Duration::seconds(1));
        countdown.tick();

        countdown.restart(clock.now() + chrono::Duration::seconds(3));
        assert_eq!(countdown.remaining_secs(), 3);
        clock.advance(chrono::Duration::seconds(3));
        countdown.tick();
        assert_eq!(expired.get(), 2);

        // Already-past expiry goes straight through the edge
        countdown.restart(clock.now() - chrono::Duration::seconds(1));
        assert!(countdown.state().is_expired());
        assert_eq!(expired.get(), 3);
    }

    #[test]
    fn test_past_expiry_fires_on_first_tick() {
        let (countdown, _clock, expired) = setup(-1);
        assert!(countdown.state().is_expired());
        assert_eq!(expired.get(), 0);

        for _ in 0..3 {
            assert!(countdown.tick().is_expired());
        }
        assert_eq!(expired.get(), 1);
    }

    #[test]
    fn test_past_expiry_waits_for_active() {
        let (countdown, _clock, expired) = setup(-1);
        countdown.set_active(false);
        countdown.tick();
        assert_eq!(expired.get(), 0);

        countdown.set_active(true);
        countdown.tick();
        countdown.tick();
        assert_eq!(expired.get(), 1);
    }

    #[test]
    fn test_restart_into_past_skips_counting() {
        let (countdown, clock, expired) = setup(30);
        countdown.tick();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let _stop = countdown.watch(move |s| log.borrow_mut().push(s));

        countdown.restart(clock.now() - chrono::Duration::seconds(1));
        assert_eq!(
            *seen.borrow(),
            vec![CountdownState::Counting { remaining_secs: 30 }, CountdownState::Expired]
        );
        assert_eq!(expired.get(), 1);

        countdown.tick();
        assert_eq!(expired.get(), 1);
    }

    #[tokio::test]
    async fn test_run_with_past_expiry_fires_once() {
        let (countdown, _clock, expired) = setup(-5);
        let state = countdown.run(Duration::from_millis(5)).await;
        assert_eq!(state, CountdownState::Expired);
        assert_eq!(expired.get(), 1);
    }

    #[test]
    fn test_watch_sees_expiry() {
        let (countdown, clock, _) = setup(2);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let _stop = countdown.watch(move |s| log.borrow_mut().push(s));

        clock.advance(chrono::Duration::seconds(1));
        countdown.tick();
        clock.advance(chrono::Duration::seconds(1));
        countdown.tick();

        assert_eq!(
            *seen.borrow(),
            vec![
                CountdownState::Counting { remaining_secs: 2 },
                CountdownState::Counting { remaining_secs: 1 },
                CountdownState::Expired,
            ]
        );
    }

    #[tokio::test]
    async fn test_run_until_expired() {
        let clock = SystemClock;
        let countdown = ResendCountdown::new(
            clock.now() + chrono::Duration::milliseconds(50),
            Rc::new(clock),
        );
        let expired = Rc::new(Cell::new(0));
        let counter = expired.clone();
        countdown.on_expire(move || counter.set(counter.get() + 1));

        let state = countdown.run(Duration::from_millis(10)).await;
        assert_eq!(state, CountdownState::Expired);
        assert_eq!(expired.get(), 1);
    }

    #[tokio::test]
    async fn test_run_returns_when_inactive() {
        let (countdown, _clock, expired) = setup(30);
        countdown.set_active(false);
        let state = countdown.run(Duration::from_millis(5)).await;
        assert_eq!(state, CountdownState::Counting { remaining_secs: 30 });
        assert_eq!(expired.get(), 0);
    }
}
