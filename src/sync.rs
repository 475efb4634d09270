// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Lock helpers that recover from poisoning instead of panicking.
//!
//! A poisoned lock only means another task panicked while holding it. The
//! data guarded here (a first-error slot, a one-shot start receiver) stays
//! meaningful, so the guard is recovered and the event logged.

use std::sync::{Mutex, MutexGuard};

/// Acquire a mutex, recovering the guard if the lock is poisoned.
#[inline]
pub fn resilient_lock<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::error!(
                target: "sync::locks",
                "Mutex was poisoned: a task panicked while holding it. Recovering data."
            );
            poisoned.into_inner()
        }
    }
}
