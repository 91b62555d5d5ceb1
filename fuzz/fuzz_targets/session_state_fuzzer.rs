//! Fuzz target for the session state machine
//!
//! # Strategy
//!
//! - Interleave user intents, connection changes and inbound frames
//! - Frames are either raw fuzzer bytes or well-formed frames about a small
//!   set of users, one of whom shares the local user's name
//!
//! # Invariants
//!
//! - The local user never appears in the roster or typing set
//! - A room is held only in `InRoom`, or in `Connecting` while rejoining
//! - Nothing is listed or shown without a room
//! - A rejected event leaves the session unchanged
//! - Typing commands alternate start/stop

#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use parley_client::{
    Client, ClientAction, ClientEvent, ConnectionState, Peer, SessionPhase,
};
use parley_proto::Command;

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Login,
    Logout,
    Join(bool),
    JoinFailed(bool),
    Leave,
    Post,
    Input(u8),
    Connection(StateChoice),
    Frame(FrameChoice),
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum StateChoice {
    Disconnected,
    Connecting,
    Open,
    Closing,
}

#[derive(Debug, Clone, Arbitrary)]
enum FrameChoice {
    Raw(Vec<u8>),
    Joined { others: Vec<u8> },
    UserJoined(u8),
    UserLeft(u8),
    Typing(u8, bool),
    Posted(u8),
}

const USERS: [(&str, &str); 4] = [("u1", "Alice"), ("u2", "Bob"), ("u3", "Carol"), ("u9", "Alice")];

fn user(index: u8) -> String {
    let (id, name) = USERS[usize::from(index) % USERS.len()];
    format!(r#"{{"id":"{id}","name":"{name}"}}"#)
}

fn frame(choice: FrameChoice) -> Bytes {
    let text = match choice {
        FrameChoice::Raw(bytes) => return Bytes::from(bytes),
        FrameChoice::Joined { others } => {
            let others: Vec<String> = others.into_iter().take(8).map(user).collect();
            format!(
                r#"{{"type":"joined","payload":{{"user":{},"others":[{}],"messages":[]}}}}"#,
                user(0),
                others.join(",")
            )
        },
        FrameChoice::UserJoined(u) => format!(r#"{{"type":"user-joined","payload":{{"user":{}}}}}"#, user(u)),
        FrameChoice::UserLeft(u) => format!(r#"{{"type":"user-left","payload":{{"user":{}}}}}"#, user(u)),
        FrameChoice::Typing(u, on) => {
            let status = if on { "started" } else { "stopped" };
            format!(r#"{{"type":"user-typing","payload":{{"status":"{status}","user":{}}}}}"#, user(u))
        },
        FrameChoice::Posted(u) => format!(
            r#"{{"type":"posted","payload":{{"message":{{"createdAt":"2024-05-01T12:00:00Z","user":{},"body":"hi"}}}}}}"#,
            user(u)
        ),
    };
    Bytes::from(text)
}

fn event(op: Op) -> ClientEvent {
    match op {
        Op::Login => ClientEvent::Login { name: "Alice".into() },
        Op::Logout => ClientEvent::Logout,
        Op::Join(first) => ClientEvent::Join { room: if first { "r1" } else { "r2" }.into() },
        Op::JoinFailed(first) => ClientEvent::JoinFailed { room: if first { "r1" } else { "r2" }.into() },
        Op::Leave => ClientEvent::Leave,
        Op::Post => ClientEvent::Post { body: "hello".into() },
        Op::Input(len) => ClientEvent::InputChanged { value: "x".repeat(usize::from(len % 3)) },
        Op::Connection(state) => ClientEvent::ConnectionChanged {
            state: match state {
                StateChoice::Disconnected => ConnectionState::Disconnected,
                StateChoice::Connecting => ConnectionState::Connecting,
                StateChoice::Open => ConnectionState::Open,
                StateChoice::Closing => ConnectionState::Closing,
            },
        },
        Op::Frame(choice) => ClientEvent::FrameReceived(frame(choice)),
    }
}

fn is_self(client: &Client, peer: &Peer) -> bool {
    match client.self_id() {
        Some(id) => id == peer.id,
        None => client.identity().is_some_and(|i| i.display_name == peer.name),
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let mut client = Client::new();
    let mut typing_started = false;

    for op in ops {
        let before = client.clone();
        let Ok(actions) = client.handle(event(op)) else {
            assert_eq!(client.phase(), before.phase());
            assert_eq!(client.transcript(), before.transcript());
            assert_eq!(client.roster(), before.roster());
            continue;
        };

        for action in actions {
            match action {
                ClientAction::Send(Command::TypingStart) => {
                    assert!(!typing_started, "typing started twice");
                    typing_started = true;
                },
                ClientAction::Send(Command::TypingStop) => typing_started = false,
                _ => {},
            }
        }

        // The server forgets typing state along with the room or connection,
        // and an empty draft makes the next keystroke a fresh start.
        if client.phase() != SessionPhase::InRoom
            || !client.connection().is_open()
            || client.draft().is_empty()
        {
            typing_started = false;
        }

        assert!(!client.roster().iter().any(|p| is_self(&client, p)));
        assert!(!client.typing().iter().any(|p| is_self(&client, p)));
        if client.room().is_none() {
            assert!(client.roster().is_empty() && client.typing().is_empty());
            assert!(client.transcript().is_empty());
        }
        match client.phase() {
            SessionPhase::InRoom => assert!(client.room().is_some()),
            SessionPhase::LoggedOut | SessionPhase::Lobby => assert!(client.room().is_none()),
            SessionPhase::Connecting => {},
        }
    }
});
