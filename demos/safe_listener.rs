//! Safe Listener Demo
//!
//! Attaches a debounced listener to a mock button and taps it the way an
//! impatient user would: a double tap, then another tap once the window
//! has passed. Only the first tap of each burst reaches the handler.
//!
//! Run with: cargo run -p demos --bin safe_listener

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use contracts::TriggerSource;
use debounce::{SafeTriggerExt, DEFAULT_QUIET_WINDOW};
use dispatcher::MockTriggerSource;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    tracing::info!("Starting Safe Listener Demo");

    let button = MockTriggerSource::new("submit_button");
    let submissions = Arc::new(AtomicU64::new(0));

    let counter = submissions.clone();
    let listener = button.listen_safe_default(move |event| {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(event) = event {
            tracing::info!(sequence = event.sequence, submissions = n, "form submitted");
        }
    });

    // Double tap: the second one lands inside the window
    button.tap();
    button.tap_at(120.0, 48.0);

    tracing::info!(wait = ?DEFAULT_QUIET_WINDOW, "waiting out the quiet window");
    thread::sleep(DEFAULT_QUIET_WINDOW + Duration::from_millis(50));

    button.tap();
    button.stop();

    let snapshot = listener.metrics().snapshot();
    tracing::info!(
        taps = button.emitted(),
        fired = snapshot.fired,
        suppressed = snapshot.suppressed,
        submissions = submissions.load(Ordering::SeqCst),
        "Demo finished"
    );
}
