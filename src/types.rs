//! Shared types.

/// Cleanup function returned by watchers.
///
/// Call this to stop watching and release the underlying effect.
pub type Cleanup = Box<dyn FnOnce()>;
