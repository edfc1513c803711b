use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;

/// Aggregate statistics of a single source run.
///
/// A fresh instance is created for every invocation of
/// [`Source::run`](crate::Source::run); reading it is only meaningful after
/// the result stream has closed, which is the synchronization point between
/// the producer task and the consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Number of terminal errors observed (0 or 1 per run)
    pub errors: usize,
    /// Number of emitted subdomain items
    pub results: usize,
    /// Wall-clock time from worker start to stream closure
    pub time_taken: Duration,
    /// `true` iff no usable API key was available and the run never
    /// contacted the network
    pub skipped: bool,
}

/// Shared per-invocation statistics cell, written only by the producer task.
pub(crate) type StatsCell = Arc<Mutex<RunStats>>;

/// Lock a stats mutex, recovering from poisoning. The producer task is the
/// only writer and never panics mid-update, so the inner value stays
/// consistent even if a guard was poisoned.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
