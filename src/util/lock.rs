//! Poison-recovering wrappers around `std::sync` locks.
//!
//! A panic while holding one of these locks poisons it. The guarded state
//! here (cached bytes, the memory store's clock) stays usable after such a
//! panic, so the wrappers log the event and hand back the guard instead of
//! spreading the failure to every later caller.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockWriteGuard};

use tracing::warn;

fn recover<G>(
    poisoned: PoisonError<G>,
    source: &'static str,
    op: &'static str,
    lock: &'static str,
) -> G {
    warn!(
        source,
        op, lock, "recovered a poisoned lock; guarded state may predate the panic"
    );
    poisoned.into_inner()
}

pub(crate) fn rw_write<'a, T>(
    lock: &'a RwLock<T>,
    source: &'static str,
    op: &'static str,
) -> RwLockWriteGuard<'a, T> {
    lock.write()
        .unwrap_or_else(|err| recover(err, source, op, "rwlock.write"))
}

pub(crate) fn mutex_lock<'a, T>(
    lock: &'a Mutex<T>,
    source: &'static str,
    op: &'static str,
) -> MutexGuard<'a, T> {
    lock.lock()
        .unwrap_or_else(|err| recover(err, source, op, "mutex"))
}
