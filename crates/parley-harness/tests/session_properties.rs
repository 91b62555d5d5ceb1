//! Property-based tests for the full session runtime.
//!
//! Arbitrary interleavings of user intents, server frames and connection
//! faults are run against the production runtime. The standard invariants
//! must hold after every step.

use std::time::Duration;

use parley_app::{Session, SessionConfig, SessionError};
use parley_client::SessionPhase;
use parley_harness::{InvariantRegistry, SimEnv, SimRemote, SimTransport, frames};
use proptest::prelude::*;

/// One step of a simulated session.
#[derive(Debug, Clone)]
enum Step {
    Login(&'static str),
    Logout,
    Join(&'static str),
    Leave,
    Post(&'static str),
    Input(&'static str),
    Joined { others: Vec<(&'static str, &'static str)> },
    PeerJoined(&'static str, &'static str),
    PeerLeft(&'static str, &'static str),
    PeerTyping(&'static str, &'static str, bool),
    ServerError(&'static str),
    Garbage,
    DropConnection,
    FailConnection,
    SetAccepting(bool),
    Wait(u64),
}

/// Users seen on the wire. `u1`/`Alice` is the local user.
fn user_strategy() -> impl Strategy<Value = (&'static str, &'static str)> {
    prop::sample::select(vec![("u1", "Alice"), ("u2", "Bob"), ("u3", "Carol"), ("u9", "Alice")])
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        2 => Just(Step::Login("Alice")),
        1 => Just(Step::Logout),
        2 => prop::sample::select(vec!["r1", "r2"]).prop_map(Step::Join),
        1 => Just(Step::Leave),
        1 => Just(Step::Post("hello")),
        2 => prop::sample::select(vec!["", "h", "hi"]).prop_map(Step::Input),
        2 => prop::collection::vec(user_strategy(), 0..4).prop_map(|others| Step::Joined { others }),
        2 => user_strategy().prop_map(|(id, name)| Step::PeerJoined(id, name)),
        1 => user_strategy().prop_map(|(id, name)| Step::PeerLeft(id, name)),
        2 => (user_strategy(), any::<bool>()).prop_map(|((id, name), on)| Step::PeerTyping(id, name, on)),
        1 => prop::sample::select(vec!["name-taken", "invalid-name", "not-joined"]).prop_map(Step::ServerError),
        1 => Just(Step::Garbage),
        1 => Just(Step::DropConnection),
        1 => Just(Step::FailConnection),
        1 => any::<bool>().prop_map(Step::SetAccepting),
        2 => (0u64..3000).prop_map(Step::Wait),
    ]
}

async fn apply(session: &Session, remote: &SimRemote, step: Step) -> Result<(), SessionError> {
    match step {
        Step::Login(name) => session.login(name).await,
        Step::Logout => session.logout().await,
        Step::Join(room) => session.join(room).await,
        Step::Leave => session.leave().await,
        Step::Post(body) => session.post(body).await,
        Step::Input(value) => session.input_changed(value).await,
        Step::Joined { others } => {
            let others = others.into_iter().map(|(id, name)| frames::user(id, name)).collect();
            remote.deliver(frames::joined(frames::user("u1", "Alice"), others, Vec::new(), Vec::new()));
            Ok(())
        },
        Step::PeerJoined(id, name) => {
            remote.deliver(frames::user_joined(frames::user(id, name)));
            Ok(())
        },
        Step::PeerLeft(id, name) => {
            remote.deliver(frames::user_left(frames::user(id, name)));
            Ok(())
        },
        Step::PeerTyping(id, name, started) => {
            remote.deliver(frames::user_typing(frames::user(id, name), started));
            Ok(())
        },
        Step::ServerError(code) => {
            remote.deliver(frames::error(code));
            Ok(())
        },
        Step::Garbage => {
            remote.deliver("{\"type\":\"joined\",\"payload\":[]}");
            Ok(())
        },
        Step::DropConnection => {
            remote.drop_connection("dropped");
            Ok(())
        },
        Step::FailConnection => {
            remote.fail_connection("reset");
            Ok(())
        },
        Step::SetAccepting(accepting) => {
            remote.set_accepting(accepting);
            Ok(())
        },
        Step::Wait(ms) => {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok(())
        },
    }
}

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Session invariants hold under arbitrary steps.
    #[test]
    fn prop_session_invariants_hold(steps in prop::collection::vec(step_strategy(), 0..40)) {
        let outcome: Result<(), TestCaseError> = paused_runtime().block_on(async {
            let (transport, remote) = SimTransport::pair();
            let (session, _runtime) =
                Session::spawn(transport, SimEnv::new(), SessionConfig::with_url("ws://sim/ws/"));
            let invariants = InvariantRegistry::standard();

            for step in steps {
                let description = format!("{step:?}");
                let result = apply(&session, &remote, step).await;
                prop_assert_ne!(result, Err(SessionError::RuntimeStopped));

                tokio::time::sleep(Duration::from_millis(1)).await;
                let snapshot = session.snapshot();
                prop_assert!(
                    invariants.check_all(&snapshot).is_ok(),
                    "Invariant violated after {}: {:?}", description, invariants.check_all(&snapshot)
                );
            }
            Ok(())
        });
        outcome?;
    }
}

#[test]
fn logged_out_session_ignores_server_frames() {
    paused_runtime().block_on(async {
        let (transport, remote) = SimTransport::pair();
        let (session, _runtime) =
            Session::spawn(transport, SimEnv::new(), SessionConfig::with_url("ws://sim/ws/"));

        // Never logged in, so never connected: nothing can be delivered.
        assert!(!remote.deliver(frames::user_joined(frames::user("u2", "Bob"))));
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(session.snapshot().phase, SessionPhase::LoggedOut);
        assert_eq!(remote.open_count(), 0);
    });
}
