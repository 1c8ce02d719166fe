//! State Module - Client state holders
//!
//! - **Countdown** - Verification resend countdown, wall-clock based
//! - **Reward** - Reward balance store (single writer, read-only views)
//! - **Notifications** - Modal notification queue
//! - **Flags** - Persisted client-local boolean flags

pub mod countdown;
pub mod flags;
pub mod notifications;
pub mod reward;

pub use countdown::{format_mm_ss, CountdownState, ResendCountdown, ResendOutcome};
pub use flags::{FileFlagStore, FlagStore, MemoryFlagStore, REWARD_INSTRUCTIONS_DISMISSED};
pub use notifications::{
    Notification, NotificationKind, NotificationQueue, NotificationView, RewardReceived,
    REWARD_RECEIVED_EVENT,
};
pub use reward::{RewardBalance, RewardBalanceStore, RewardBalanceView, BALANCE_CHANGED_EVENT};
