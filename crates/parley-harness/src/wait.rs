//! Waiting for published session state.

use std::time::Duration;

use parley_app::{Session, SessionSnapshot};
use thiserror::Error;

/// A condition was not met in time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("condition not met within {timeout:?}; last snapshot: {last:?}")]
pub struct WaitTimeout {
    /// How long was waited
    pub timeout: Duration,
    /// Last snapshot observed
    pub last: Box<SessionSnapshot>,
}

/// Wait until a published snapshot satisfies `condition`.
///
/// Under a paused clock the timeout elapses in simulated time, once the
/// runtime has nothing left to do.
pub async fn wait_for<F>(
    session: &Session,
    timeout: Duration,
    mut condition: F,
) -> Result<SessionSnapshot, WaitTimeout>
where
    F: FnMut(&SessionSnapshot) -> bool,
{
    let mut snapshots = session.subscribe();
    let outcome = tokio::time::timeout(timeout, snapshots.wait_for(|s| condition(s))).await;

    match outcome {
        Ok(Ok(snapshot)) => Ok(snapshot.clone()),
        // Runtime gone or time up: report what was last seen.
        Ok(Err(_)) | Err(_) => {
            Err(WaitTimeout { timeout, last: Box::new(session.snapshot()) })
        },
    }
}
