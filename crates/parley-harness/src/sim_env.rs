//! Simulated environment.
//!
//! Uses tokio's clock, so tests run with `start_paused = true` advance time
//! instantly and deterministically. Every requested sleep is recorded, which
//! lets tests assert on the exact backoff schedule.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use parley_core::Environment;

/// Environment backed by tokio's (pausable) clock.
#[derive(Debug, Clone, Default)]
pub struct SimEnv {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl SimEnv {
    /// Create a new simulated environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Environment for SimEnv {
    type Instant = tokio::time::Instant;

    fn now(&self) -> Self::Instant {
        tokio::time::Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.sleeps.lock().unwrap_or_else(PoisonError::into_inner).push(duration);
        tokio::time::sleep(duration)
    }
}
