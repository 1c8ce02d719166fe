//! Animation Module - Presets, easing and the animated-presence state machine
//!
//! - **Easing** - Timing curves and interpolated visual values
//! - **Presets** - Closed set of named enter/exit animations
//! - **Presence** - `Idle → Animating → Settled` / `Exiting` lifecycle

pub mod easing;
pub mod presence;
pub mod presets;

pub use easing::{AnimatedProps, Easing, VisualState};
pub use presence::{AnimatedPresence, PresenceConfig, PresenceState};
pub use presets::{preset_names, AnimationPreset, PresetSpec, Timing};
