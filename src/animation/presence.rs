//! Animated Presence - Enter/exit state machine for animated elements
//!
//! Drives an element from its preset's hidden values to its shown values
//! once `start` is set, optionally waiting until the element has been in the
//! viewport. The host render loop calls [`AnimatedPresence::tick`] each frame
//! and paints the returned [`VisualState`].
//!
//! # States
//!
//! ```text
//! Idle ──start && (no gate || seen)──▶ Animating ──curve done──▶ Settled
//!  ▲                                      │                        │
//!  └──────────────start = false───────────┴────────────────────────┘
//! any ──exit()──▶ Exiting
//! ```
//!
//! The completion callback runs on the `Animating → Settled` edge only, so
//! it fires exactly once per run no matter how often the host ticks.
//! The viewport gate latches: once the element has been seen it never
//! re-gates.
//!
//! # Example
//!
//! ```ignore
//! let mut presence = AnimatedPresence::from_name("fadeInUp", clock)?;
//! presence.on_complete(|| tracing::info!("card shown"));
//! presence.set_start(true);
//! loop {
//!     let visual = presence.tick();
//!     paint(visual);
//! }
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use spark_signals::{effect, signal, Signal};
use tracing::debug;

use super::easing::VisualState;
use super::presets::{AnimationPreset, PresetSpec, Timing};
use crate::clock::SharedClock;
use crate::error::Result;
use crate::types::Cleanup;

// =============================================================================
// TYPES
// =============================================================================

/// Lifecycle state of an animated element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PresenceState {
    /// Not started; showing initial (hidden) values.
    #[default]
    Idle,
    /// Transitioning to the target values.
    Animating,
    /// Target values reached.
    Settled,
    /// Transitioning to the exit values before removal.
    Exiting,
}

/// Construction options.
#[derive(Clone, Debug, PartialEq)]
pub struct PresenceConfig {
    pub preset: AnimationPreset,
    pub start: bool,
    /// Hold in `Idle` until the element has been in the viewport once.
    pub animate_when_visible: bool,
    /// Overrides the preset delay.
    pub delay: Option<Duration>,
    /// Overrides the preset duration.
    pub duration: Option<Duration>,
}

impl PresenceConfig {
    pub fn new(preset: AnimationPreset) -> Self {
        Self {
            preset,
            start: false,
            animate_when_visible: false,
            delay: None,
            duration: None,
        }
    }

    /// Config for a preset given by name. Unknown names are a
    /// configuration error.
    pub fn named(name: &str) -> Result<Self> {
        Ok(Self::new(AnimationPreset::from_name(name)?))
    }

    pub fn start(mut self, start: bool) -> Self {
        self.start = start;
        self
    }

    pub fn when_visible(mut self) -> Self {
        self.animate_when_visible = true;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

// =============================================================================
// ANIMATED PRESENCE
// =============================================================================

pub struct AnimatedPresence {
    preset: AnimationPreset,
    spec: PresetSpec,
    timing: Timing,
    gated: bool,
    seen: bool,
    start: bool,
    state: Signal<PresenceState>,
    phase_started: Option<DateTime<Utc>>,
    exit_from: VisualState,
    exit_complete: bool,
    visual: VisualState,
    on_complete: Option<Box<dyn FnMut()>>,
    clock: SharedClock,
}

impl AnimatedPresence {
    /// Build from a validated config. Name lookup, the only fallible step,
    /// happens in [`PresenceConfig::named`] and [`Self::from_name`].
    pub fn new(config: PresenceConfig, clock: SharedClock) -> Self {
        let spec = config.preset.spec();
        let mut timing = spec.timing;
        if let Some(delay) = config.delay {
            timing.delay = delay;
        }
        if let Some(duration) = config.duration {
            timing.duration = duration;
        }

        let mut presence = Self {
            preset: config.preset,
            spec,
            timing,
            gated: config.animate_when_visible,
            seen: false,
            start: config.start,
            state: signal(PresenceState::Idle),
            phase_started: None,
            exit_from: spec.initial,
            exit_complete: false,
            visual: spec.initial,
            on_complete: None,
            clock,
        };
        presence.try_begin();
        presence
    }

    /// Build a presence from a preset name with default options.
    pub fn from_name(name: &str, clock: SharedClock) -> Result<Self> {
        Ok(Self::new(PresenceConfig::named(name)?, clock))
    }

    /// Set the completion callback, replacing any previous one.
    pub fn on_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    pub fn preset(&self) -> AnimationPreset {
        self.preset
    }

    pub fn state(&self) -> PresenceState {
        self.state.get()
    }

    /// Reactive handle on the lifecycle state.
    pub fn state_signal(&self) -> Signal<PresenceState> {
        self.state.clone()
    }

    /// Values from the most recent tick.
    pub fn visual(&self) -> VisualState {
        self.visual
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Whether the exit transition has finished and the element can be removed.
    pub fn is_exit_complete(&self) -> bool {
        self.exit_complete
    }

    /// Update the start trigger. Unchanged values are ignored.
    pub fn set_start(&mut self, start: bool) {
        if self.start == start {
            return;
        }
        self.start = start;

        if start {
            self.try_begin();
            return;
        }

        match self.state.get() {
            PresenceState::Animating | PresenceState::Settled => {
                self.phase_started = None;
                self.visual = self.spec.initial;
                self.set_state(PresenceState::Idle);
            }
            PresenceState::Idle | PresenceState::Exiting => {}
        }
    }

    /// Report viewport visibility. The first `true` opens the gate for good.
    pub fn set_in_view(&mut self, in_view: bool) {
        if in_view && !self.seen {
            self.seen = true;
            debug!(preset = %self.preset, "presence entered viewport");
            self.try_begin();
        }
    }

    /// Begin the exit transition from the current values.
    pub fn exit(&mut self) {
        if self.state.get() == PresenceState::Exiting {
            return;
        }
        self.exit_from = self.visual;
        self.exit_complete = false;
        self.phase_started = Some(self.clock.now());
        self.set_state(PresenceState::Exiting);
    }

    /// Advance the animation to the clock's current time.
    pub fn tick(&mut self) -> VisualState {
        self.try_begin();
        let now = self.clock.now();

        match self.state.get() {
            PresenceState::Idle => {
                self.visual = self.spec.initial;
            }
            PresenceState::Animating => {
                let t = self.progress(now, self.timing.delay);
                self.visual = self.spec.initial.lerp(
                    &self.spec.target,
                    self.timing.easing.apply(t),
                    self.spec.props,
                );
                if t >= 1.0 {
                    self.visual = self.spec.target;
                    self.settle();
                }
            }
            PresenceState::Settled => {
                self.visual = self.spec.target;
            }
            PresenceState::Exiting => {
                if !self.exit_complete {
                    let t = self.progress(now, Duration::ZERO);
                    self.visual = self.exit_from.lerp(
                        &self.spec.exit,
                        self.timing.easing.apply(t),
                        self.spec.props,
                    );
                    if t >= 1.0 {
                        self.visual = self.spec.exit;
                        self.exit_complete = true;
                        debug!(preset = %self.preset, "presence exit complete");
                    }
                }
            }
        }

        self.visual
    }

    /// Subscribe to state changes; the handler runs with every new state.
    pub fn watch(&self, mut handler: impl FnMut(PresenceState) + 'static) -> Cleanup {
        let state = self.state.clone();
        let stop = effect(move || handler(state.get()));
        Box::new(stop)
    }

    // -------------------------------------------------------------------------
    // internals
    // -------------------------------------------------------------------------

    fn try_begin(&mut self) {
        if self.state.get() != PresenceState::Idle || !self.start {
            return;
        }
        if self.gated && !self.seen {
            return;
        }
        self.phase_started = Some(self.clock.now());
        self.set_state(PresenceState::Animating);
    }

    fn settle(&mut self) {
        self.set_state(PresenceState::Settled);
        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
    }

    fn progress(&self, now: DateTime<Utc>, delay: Duration) -> f32 {
        let elapsed = self
            .phase_started
            .and_then(|started| (now - started).to_std().ok())
            .unwrap_or_default();
        let active = elapsed.saturating_sub(delay);
        if self.timing.duration.is_zero() {
            return if elapsed >= delay { 1.0 } else { 0.0 };
        }
        (active.as_secs_f32() / self.timing.duration.as_secs_f32()).min(1.0)
    }

    fn set_state(&mut self, next: PresenceState) {
        debug!(preset = %self.preset, from = ?self.state.get(), to = ?next, "presence transition");
        self.state.set(next);
    }
}

// =============================================================================
// TESTS
// =============================================================================
