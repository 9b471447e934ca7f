//! Injectable time source.
//!
//! All timestamp decisions (merge refresh, pruning cutoffs, staleness
//! windows) go through a `Clock` so that retention boundaries and the
//! idempotence property can be tested with controlled time.

use chrono::{DateTime, Utc};

/// Time provider for the sync engine.
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc> + Send + Sync,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}
