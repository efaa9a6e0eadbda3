//! Per-domain state containers.
//!
//! Each container caches the last fetched/mutated data, a loading flag and
//! the latest error message. Actions follow one shape:
//!
//! - an [`ActionScope`] marks the container busy and clears the error, and
//!   marks it idle again when dropped, whatever the outcome;
//! - on failure the error becomes a display message; mutating actions return
//!   the error, read actions only record it;
//! - replaceable slices are tagged with a [`Sequence`] ticket so a response
//!   that arrives after a newer request was issued is discarded.
//!
//! State sits behind a `std::sync::Mutex` that is never held across an
//! `.await`.

pub mod auth;
pub mod chat;
pub mod followups;
pub mod medications;
pub mod symptoms;

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::ApiError;

pub use auth::AuthStore;
pub use chat::ChatStore;
pub use followups::FollowUpStore;
pub use medications::MedicationStore;
pub use symptoms::SymptomStore;

/// Loading/error flags shared by every container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    in_flight: usize,
    error: Option<String>,
}

impl Status {
    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn begin(&mut self) {
        self.in_flight += 1;
        self.error = None;
    }

    fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.error = Some(message);
    }

    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }
}

pub(crate) trait StoreState {
    fn status(&self) -> &Status;

    fn status_mut(&mut self) -> &mut Status;
}

pub(crate) fn lock<S>(state: &Mutex<S>) -> MutexGuard<'_, S> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Busy marker for one action.
pub(crate) struct ActionScope<'a, S: StoreState> {
    state: &'a Mutex<S>,
}

impl<'a, S: StoreState> ActionScope<'a, S> {
    pub(crate) fn begin(state: &'a Mutex<S>) -> Self {
        lock(state).status_mut().begin();
        Self { state }
    }
}

impl<S: StoreState> Drop for ActionScope<'_, S> {
    fn drop(&mut self) {
        lock(self.state).status_mut().finish();
    }
}

/// Monotonic request counter for one cached slice.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Sequence {
    issued: u64,
}

impl Sequence {
    pub(crate) fn next(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub(crate) fn is_latest(&self, ticket: u64) -> bool {
        ticket == self.issued
    }

    /// Mark every outstanding ticket stale. Called when a mutation writes
    /// through to the slice, so a fetch issued earlier cannot undo it.
    pub(crate) fn supersede(&mut self) {
        self.issued += 1;
    }
}

/// Display message for `error`: transport failures get `offline`, everything
/// else goes through [`ApiError::user_message`] with `default`.
pub(crate) fn describe(error: &ApiError, default: &str, offline: &str) -> String {
    match error {
        ApiError::Transport(_) => offline.to_string(),
        other => other.user_message(default),
    }
}

/// Replace the entry with the same key as `item`, or append it. Any further
/// entries with that key are dropped so the key appears exactly once.
pub(crate) fn upsert_by<T, K, F>(list: &mut Vec<T>, item: T, key: F)
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let target = key(&item);
    match list.iter().position(|existing| key(existing) == target) {
        Some(pos) => {
            let mut index = 0;
            list.retain(|existing| {
                let keep = index == pos || key(existing) != target;
                index += 1;
                keep
            });
            list[pos] = item;
        }
        None => list.push(item),
    }
}

/// Replace the entry with the same key as `item` in place. Returns `false`
/// when no entry matched.
pub(crate) fn replace_by<T, K, F>(list: &mut [T], item: T, key: F) -> bool
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let target = key(&item);
    match list.iter_mut().find(|existing| key(existing) == target) {
        Some(slot) => {
            *slot = item;
            true
        }
        None => false,
    }
}
