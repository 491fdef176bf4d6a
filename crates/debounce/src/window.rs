//! Quiet-window arithmetic.
//!
//! A gate is Armed or Cooling, but neither state is stored: both are derived
//! from `now - last_fire` on every call.

use std::time::Duration;

/// Decide whether a trigger at `now` fires.
///
/// `last_fire` is `None` until the gate fires for the first time, so the
/// first trigger always fires. Suppression is strict: a trigger arriving
/// exactly `quiet_window` after the last fire goes through.
///
/// A reading earlier than `last_fire` counts as zero elapsed time.
pub fn should_fire(now: Duration, last_fire: Option<Duration>, quiet_window: Duration) -> bool {
    match last_fire {
        None => true,
        Some(last) => now.saturating_sub(last) >= quiet_window,
    }
}

/// Time left until the gate re-arms; zero when already armed.
pub fn remaining_cooldown(
    now: Duration,
    last_fire: Option<Duration>,
    quiet_window: Duration,
) -> Duration {
    match last_fire {
        None => Duration::ZERO,
        Some(last) => quiet_window.saturating_sub(now.saturating_sub(last)),
    }
}
