//! Lock helpers shared by the tick thread, the audio callback and callers.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the inner value if a previous holder panicked.
///
/// Scheduler and mixer state stay internally consistent between calls, so a
/// panic elsewhere must not take the audio callback or the tick loop down.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
