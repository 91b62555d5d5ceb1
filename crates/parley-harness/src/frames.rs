//! Server frame builders.
//!
//! Build inbound frames in the chat server's wire format, for feeding to
//! [`crate::SimRemote::deliver`].

use serde_json::{Value, json};

/// Wire representation of a user.
pub fn user(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name })
}

/// Wire representation of a room.
pub fn room(id: &str, name: &str, connected: u32, max: u32) -> Value {
    json!({ "id": id, "name": name, "connectedClients": connected, "maxClients": max })
}

/// Wire representation of a chat message.
pub fn message(id: &str, sender: Value, body: &str, created_at: &str) -> Value {
    json!({ "id": id, "user": sender, "body": body, "createdAt": created_at })
}

fn envelope(kind: &str, payload: Value) -> String {
    json!({ "type": kind, "payload": payload }).to_string()
}

/// `rooms`: the full room list.
pub fn rooms(rooms: impl IntoIterator<Item = Value>) -> String {
    envelope("rooms", json!({ "rooms": rooms.into_iter().collect::<Vec<_>>() }))
}

/// `joined`: the local user entered a room.
pub fn joined(me: Value, others: Vec<Value>, typing: Vec<Value>, messages: Vec<Value>) -> String {
    envelope(
        "joined",
        json!({ "user": me, "others": others, "typing": typing, "messages": messages }),
    )
}

/// `user-joined`: another user entered the room.
pub fn user_joined(user: Value) -> String {
    envelope("user-joined", json!({ "user": user }))
}

/// `user-left`: another user left the room.
pub fn user_left(user: Value) -> String {
    envelope("user-left", json!({ "user": user }))
}

/// `posted`: a message was posted to the room.
pub fn posted(message: Value) -> String {
    envelope("posted", json!({ "message": message }))
}

/// `user-typing`: a user started or stopped typing.
pub fn user_typing(user: Value, started: bool) -> String {
    let status = if started { "started" } else { "stopped" };
    envelope("user-typing", json!({ "status": status, "user": user }))
}

/// `error`: the server rejected a request.
pub fn error(code: &str) -> String {
    envelope("error", json!({ "code": code }))
}
