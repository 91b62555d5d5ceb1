//! Property-based tests for the reconnection controller.
//!
//! Drives the controller with arbitrary interleavings of intent changes,
//! transport notifications and timer firings, and checks the backoff and
//! timer-ownership rules after every step.

use std::time::Duration;

use parley_core::{
    ConnectionState, DEFAULT_INITIAL_DELAY, DEFAULT_MAX_DELAY, ReconnectAction, Reconnector,
    TimerId,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Connect,
    Disconnect,
    Open,
    Close,
    Error,
    /// Fire the currently armed timer
    FireArmed,
    /// Fire a timer that was armed at some earlier point
    FireOld(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Connect),
        1 => Just(Op::Disconnect),
        2 => Just(Op::Open),
        3 => Just(Op::Close),
        2 => Just(Op::Error),
        3 => Just(Op::FireArmed),
        1 => (0usize..8).prop_map(Op::FireOld),
    ]
}

proptest! {
    #[test]
    fn applied_delays_are_monotonic_and_capped(ops in prop::collection::vec(arb_op(), 1..80)) {
        let mut r = Reconnector::default();
        let mut issued: Vec<TimerId> = Vec::new();
        let mut last_delay = Duration::ZERO;

        for op in ops {
            let actions = match op {
                Op::Connect => r.connect(),
                Op::Disconnect => r.disconnect(),
                Op::Open => {
                    last_delay = Duration::ZERO;
                    r.on_open()
                },
                Op::Close => r.on_close(),
                Op::Error => r.on_error(),
                Op::FireArmed => match r.pending_timer() {
                    Some(timer) => r.on_timer_fired(timer),
                    None => Vec::new(),
                },
                Op::FireOld(i) => match issued.get(i) {
                    Some(timer) => r.on_timer_fired(*timer),
                    None => Vec::new(),
                },
            };

            for action in &actions {
                if let ReconnectAction::ScheduleReconnect { delay, timer } = action {
                    prop_assert!(*delay >= last_delay, "delay shrank without an open");
                    prop_assert!(*delay <= DEFAULT_MAX_DELAY);
                    prop_assert!(*delay >= DEFAULT_INITIAL_DELAY);
                    prop_assert!(r.wants_connection());
                    last_delay = *delay;
                    issued.push(*timer);
                }
                if *action == ReconnectAction::Open {
                    prop_assert!(r.wants_connection());
                    prop_assert_eq!(r.state(), ConnectionState::Connecting);
                }
            }

            // At most one schedule per step, and never while a timer is armed.
            let schedules = actions
                .iter()
                .filter(|a| matches!(a, ReconnectAction::ScheduleReconnect { .. }))
                .count();
            prop_assert!(schedules <= 1);

            if !r.wants_connection() {
                prop_assert_eq!(r.pending_timer(), None);
            }
            if r.state() == ConnectionState::Open {
                prop_assert_eq!(r.pending_timer(), None);
            }
        }
    }

    #[test]
    fn nothing_reopens_after_disconnect(ops in prop::collection::vec(arb_op(), 1..60)) {
        let mut r = Reconnector::default();
        r.connect();
        let mut issued = Vec::new();

        // Build up some history with intent held.
        for op in &ops {
            let actions = match op {
                Op::Open => r.on_open(),
                Op::Close => r.on_close(),
                Op::Error => r.on_error(),
                Op::FireArmed => match r.pending_timer() {
                    Some(timer) => r.on_timer_fired(timer),
                    None => Vec::new(),
                },
                _ => Vec::new(),
            };
            for action in actions {
                if let ReconnectAction::ScheduleReconnect { timer, .. } = action {
                    issued.push(timer);
                }
            }
        }

        r.disconnect();

        // Every timer ever issued is now stale, and closes do not schedule.
        for timer in issued {
            prop_assert!(r.on_timer_fired(timer).is_empty());
        }
        prop_assert!(r.on_close().is_empty());
        prop_assert!(r.on_error().is_empty());
    }
}

#[test]
fn open_resets_backoff_after_many_failures() {
    let mut r = Reconnector::default();
    r.connect();

    for _ in 0..20 {
        r.on_error();
        let actions = r.on_close();
        let Some(ReconnectAction::ScheduleReconnect { timer, .. }) = actions.first() else {
            panic!("expected a retry to be scheduled");
        };
        r.on_timer_fired(*timer);
    }

    r.on_open();
    assert_eq!(r.next_delay(), DEFAULT_INITIAL_DELAY);
}
