//! # Integration Tests
//!
//! Cross-crate flows.
//!
//! Covers:
//! - Profile file -> loader -> dispatcher windows
//! - Mock source -> channel -> dispatcher task
//! - Safe listeners on a source shared across threads

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_default_windows_agree() {
        assert_eq!(
            contracts::duration_to_millis(debounce::DEFAULT_QUIET_WINDOW),
            contracts::DEFAULT_QUIET_WINDOW_MS
        );
        assert_eq!(
            contracts::GateProfile::default().default_quiet_window(),
            debounce::DEFAULT_QUIET_WINDOW
        );
    }
}

#[cfg(test)]
mod profile_tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use config_loader::{ConfigFormat, ConfigLoader, TraceLoader};
    use contracts::ManualClock;
    use dispatcher::{DispatcherError, TriggerDispatcher};

    const PROFILE: &str = r#"
version = "v1"
default_quiet_window_ms = 800

[[sources]]
id = "submit_button"
quiet_window_ms = 2000

[[sources]]
id = "back"

[[sources]]
id = "legacy"
enabled = false
"#;

    /// Loaded profile drives per-source windows in the dispatcher
    #[test]
    fn test_profile_to_dispatcher() {
        let profile = ConfigLoader::load_from_str(PROFILE, ConfigFormat::Toml).unwrap();
        let clock = ManualClock::new();
        let mut dispatcher = TriggerDispatcher::builder()
            .clock(clock.clone())
            .profile(profile)
            .build();

        let submits = Arc::new(AtomicU64::new(0));
        let counter = submits.clone();
        dispatcher
            .attach_configured("submit_button", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        dispatcher.attach_configured("back", |_| {}).unwrap();
        assert!(matches!(
            dispatcher.attach_configured("legacy", |_| {}),
            Err(DispatcherError::SourceDisabled { .. })
        ));

        assert_eq!(dispatcher.window_for("back"), Some(Duration::from_millis(800)));

        // 0 fires, 1500 is inside 2000, 2000 is on the boundary and fires
        for at in [0, 1500, 2000] {
            clock.set(Duration::from_millis(at));
            dispatcher.trigger("submit_button", None).unwrap();
        }
        assert_eq!(submits.load(Ordering::SeqCst), 2);
    }

    /// Recorded trace replayed against the dispatcher
    #[test]
    fn test_trace_replay() {
        let trace = TraceLoader::load_from_str(
            r#"{"triggers": [
                {"source": "fab", "at_ms": 0},
                {"source": "fab", "at_ms": 100},
                {"source": "fab", "at_ms": 900},
                {"source": "fab", "at_ms": 1700, "kind": "long_press", "x": 4.0, "y": 2.0}
            ]}"#,
            ConfigFormat::Json,
        )
        .unwrap();

        let clock = ManualClock::new();
        let mut dispatcher = TriggerDispatcher::builder()
            .clock(clock.clone())
            .default_window(Duration::from_millis(800))
            .build();

        let fired = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = fired.clone();
        dispatcher.attach("fab", None, move |e: Option<&contracts::TriggerEvent>| {
            if let Some(e) = e {
                sink.lock().unwrap().push((e.sequence, e.position.is_some()));
            }
        });

        for (seq, trigger) in trace.triggers.iter().enumerate() {
            clock.set(trigger.at());
            dispatcher.dispatch(&trigger.to_event(seq as u64)).unwrap();
        }

        assert_eq!(
            *fired.lock().unwrap(),
            vec![(0, false), (2, false), (3, true)]
        );
    }

    #[test]
    fn test_profile_round_trip_keeps_windows() {
        let profile = ConfigLoader::load_from_str(PROFILE, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&profile).unwrap();
        let reloaded = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();

        let before: Vec<_> = profile.resolved().map(|(id, w, e)| (id.to_string(), w, e)).collect();
        let after: Vec<_> = reloaded.resolved().map(|(id, w, e)| (id.to_string(), w, e)).collect();
        assert_eq!(before, after);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use contracts::{ManualClock, TriggerEvent, TriggerSource};
    use debounce::SafeTriggerExt;
    use dispatcher::{forwarding_callback, MockTriggerSource, TriggerDispatcher};
    use observability::TriggerStatsAggregator;
    use tokio::sync::mpsc;

    /// End-to-end: MockTriggerSource -> channel -> TriggerDispatcher task
    #[tokio::test]
    async fn test_e2e_mock_pipeline() {
        let clock = ManualClock::new();
        let mut dispatcher = TriggerDispatcher::builder()
            .clock(clock.clone())
            .default_window(Duration::from_millis(800))
            .build();

        let fired = Arc::new(AtomicU64::new(0));
        let counter = fired.clone();
        dispatcher.attach("submit", None, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let (tx, rx) = mpsc::channel::<TriggerEvent>(64);
        let source = MockTriggerSource::new("submit");
        source.listen(forwarding_callback(tx));

        let handle = dispatcher.spawn(rx);

        // Same instant: a burst of 10 taps
        for _ in 0..10 {
            source.tap();
        }
        source.stop();
        drop(source);

        let dispatcher = handle.await.unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        let (id, snapshot) = &dispatcher.metrics()[0];
        assert_eq!(id, "submit");
        assert_eq!(snapshot.fired, 1);
        assert_eq!(snapshot.suppressed, 9);
    }

    /// A safe listener shared across threads fires once per window
    #[test]
    fn test_safe_listener_across_threads() {
        let source = Arc::new(MockTriggerSource::new("pay"));
        let clock = ManualClock::new();
        let payments = Arc::new(AtomicU64::new(0));
        let counter = payments.clone();

        let listener = source.listen_safe_with_clock(
            Duration::from_millis(2000),
            clock.clone(),
            move |event| {
                assert!(event.is_some());
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let source = source.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        source.tap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(payments.load(Ordering::SeqCst), 1);
        assert_eq!(listener.metrics().snapshot().total(), 100);

        clock.advance(Duration::from_millis(2000));
        source.tap();
        assert_eq!(payments.load(Ordering::SeqCst), 2);
    }

    /// Default-window listener on a mock button: a double tap submits once
    #[test]
    fn test_safe_listener_default_double_tap() {
        let button = MockTriggerSource::new("submit_button");
        let submissions = Arc::new(AtomicU64::new(0));
        let counter = submissions.clone();

        let listener = button.listen_safe_default(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(listener.quiet_window(), debounce::DEFAULT_QUIET_WINDOW);

        button.tap();
        button.tap_at(120.0, 48.0);

        assert_eq!(submissions.load(Ordering::SeqCst), 1);
        assert_eq!(listener.metrics().snapshot().suppressed, 1);
        assert_eq!(button.emitted(), 2);
    }

    /// Aggregated stats match the gate's own counters
    #[test]
    fn test_stats_aggregator_matches_gate() {
        let clock = ManualClock::new();
        let mut dispatcher = TriggerDispatcher::builder()
            .clock(clock.clone())
            .default_window(Duration::from_millis(800))
            .build();

        let fired = Arc::new(AtomicU64::new(0));
        let counter = fired.clone();
        dispatcher.attach("fab", None, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut stats = TriggerStatsAggregator::new();
        for (seq, at) in [0u64, 100, 900, 1700].into_iter().enumerate() {
            let at = Duration::from_millis(at);
            clock.set(at);
            let before = fired.load(Ordering::SeqCst);
            dispatcher.dispatch(&TriggerEvent::tap("fab", seq as u64)).unwrap();
            stats.update("fab", at, fired.load(Ordering::SeqCst) > before);
        }

        let summary = stats.summary();
        let snapshot = dispatcher.metrics()[0].1;
        assert_eq!(summary.total_fired, snapshot.fired);
        assert_eq!(summary.total_suppressed, snapshot.suppressed);
        assert_eq!(summary.total_fired, 3);
    }
}
