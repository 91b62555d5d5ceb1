//! Fuzz target for inbound frame decoding
//!
//! Feeds arbitrary bytes to the decoder to find:
//! - Parser panics on malformed JSON
//! - Known frame types whose payload shape slips past validation
//! - Timestamps that break display formatting
//!
//! The decoder should NEVER panic. Invalid input must return `Malformed`.

#![no_main]

use libfuzzer_sys::fuzz_target;
use parley_proto::{InboundEvent, decode};

fuzz_target!(|data: &[u8]| {
    if let Ok(InboundEvent::Joined { history, .. }) = decode(data) {
        for message in history {
            assert!(!message.time.short.is_empty());
        }
    }
});
