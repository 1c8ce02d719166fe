//! # social-client-core
//!
//! Client core for a social content platform (auctions, polls, crowdfunding
//! posts, creator rewards, messaging).
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity: stores hold their state in signals, and views
//! expose `watch` for effects.
//!
//! ## Execution model
//!
//! Everything runs on one thread. Stores use `Rc`/`Cell`/`Signal` and are
//! `!Send` on purpose; async work (REST calls, timers) is awaited on the
//! same thread. Timers and socket handlers are scoped: dropping the future
//! or the [`net::Subscription`] releases them.
//!
//! ## Modules
//!
//! - [`text`] - Hashtag chunk tokenizer and styled rendering
//! - [`animation`] - Presets, easing, the animated-presence state machine
//! - [`state`] - Resend countdown, reward balance, notifications, flags
//! - [`net`] - API envelope, endpoint traits, socket event channel
//! - [`i18n`] - Localized string lookup
//! - [`clock`] - Wall-clock abstraction
//! - [`config`] / [`logging`] / [`error`] - Ambient plumbing

pub mod animation;
pub mod clock;
pub mod config;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod net;
pub mod state;
pub mod text;
pub mod types;

pub use types::*;

pub use error::{Error, Result};

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};

pub use config::ClientConfig;

pub use text::{get_chunks, hashtags, highlight, reassemble, Chunk, HighlightStyle};

pub use animation::{
    AnimatedPresence, AnimationPreset, Easing, PresenceConfig, PresenceState, VisualState,
};

pub use state::{
    // Countdown
    CountdownState, ResendCountdown, ResendOutcome,
    // Stores
    NotificationQueue, NotificationView, RewardBalance, RewardBalanceStore, RewardBalanceView,
    // Flags
    FileFlagStore, FlagStore, MemoryFlagStore,
};

pub use net::{ApiError, ApiResponse, SocketChannel, Subscription};

pub use i18n::{Catalog, Translate};
