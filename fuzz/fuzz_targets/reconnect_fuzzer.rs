//! Fuzz target for the reconnection controller
//!
//! # Strategy
//!
//! - Arbitrary interleavings of intent changes, transport outcomes and timer
//!   firings, including stale and never-armed timer ids
//! - Small custom backoff configs, including zero and inverted bounds
//!
//! # Invariants
//!
//! - Applied delays never exceed the configured maximum
//! - Delays never decrease across a run of closes without an open
//! - At most one timer is armed, and only while a connection is wanted
//! - `Open` is only issued from `Disconnected` with intent

#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use parley_core::{ConnectionState, ReconnectAction, ReconnectConfig, Reconnector, TimerId};

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Connect,
    Disconnect,
    Opened,
    Closed,
    Error,
    /// Fire the armed timer
    FireArmed,
    /// Fire whichever timer was armed `n` schedules ago
    FireOld(u8),
}

#[derive(Debug, Arbitrary)]
struct Input {
    initial_ms: u16,
    max_ms: u16,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let config = ReconnectConfig {
        initial_delay: Duration::from_millis(u64::from(input.initial_ms)),
        max_delay: Duration::from_millis(u64::from(input.max_ms)),
    };
    let mut reconnector = Reconnector::new(config);
    let mut scheduled: Vec<TimerId> = Vec::new();
    let mut last_delay: Option<Duration> = None;

    for op in input.ops {
        let before = reconnector.state();
        let wanted = reconnector.wants_connection();

        let actions = match op {
            Op::Connect => reconnector.connect(),
            Op::Disconnect => reconnector.disconnect(),
            Op::Opened => {
                last_delay = None;
                reconnector.on_open()
            },
            Op::Closed => reconnector.on_close(),
            Op::Error => reconnector.on_error(),
            Op::FireArmed => match reconnector.pending_timer() {
                Some(timer) => reconnector.on_timer_fired(timer),
                None => Vec::new(),
            },
            Op::FireOld(back) => {
                let index = scheduled.len().checked_sub(usize::from(back) + 1);
                match index.and_then(|i| scheduled.get(i)) {
                    Some(timer) => reconnector.on_timer_fired(*timer),
                    None => Vec::new(),
                }
            },
        };

        for action in actions {
            match action {
                ReconnectAction::Open => {
                    assert!(reconnector.wants_connection());
                    assert_eq!(reconnector.state(), ConnectionState::Connecting);
                    assert!(
                        matches!(before, ConnectionState::Disconnected),
                        "open issued from {before:?}"
                    );
                },
                ReconnectAction::ScheduleReconnect { delay, timer } => {
                    assert!(delay <= config.max_delay);
                    if let Some(last) = last_delay {
                        assert!(delay >= last, "delay shrank from {last:?} to {delay:?}");
                    }
                    last_delay = Some(delay);
                    scheduled.push(timer);
                },
                ReconnectAction::Close | ReconnectAction::CancelReconnect => {},
            }
        }

        if reconnector.pending_timer().is_some() {
            assert!(reconnector.wants_connection());
        }
        if !wanted && !reconnector.wants_connection() {
            assert!(reconnector.pending_timer().is_none());
        }
    }
});
