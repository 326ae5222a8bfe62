//! Tear-free publication of [`RemoteState`] snapshots
//!
//! Parsing happens outside the lock into a scratch snapshot. Only the copy
//! into the shared slot runs inside the exclusion window, so a reader sees
//! either the previous snapshot or the new one, never a mix.
//!
//! The raw mutex is a type parameter: `CriticalSectionRawMutex` when the
//! producer may run in interrupt context, `NoopRawMutex` when producer and
//! consumer share one executor.

use core::cell::RefCell;

use chevron_protocol::RemoteState;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// A snapshot tagged with the publish that produced it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Versioned {
    /// Number of publishes so far; 0 means nothing was ever published
    pub generation: u32,
    /// The snapshot
    pub state: RemoteState,
}

impl Versioned {
    /// Stale, all-default snapshot
    pub const fn new() -> Self {
        Self {
            generation: 0,
            state: RemoteState::new(),
        }
    }

    /// True until the first publish
    pub fn is_stale(&self) -> bool {
        self.generation == 0
    }
}

/// Shared slot holding the most recent remote state
///
/// Owned by the composition root and handed out by reference. Written only
/// by the receive path.
pub struct RemoteStateCell<M: RawMutex> {
    inner: Mutex<M, RefCell<Versioned>>,
}

impl<M: RawMutex> Default for RemoteStateCell<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> RemoteStateCell<M> {
    /// Create a stale cell
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Versioned::new())),
        }
    }

    /// Replace the shared snapshot
    ///
    /// Returns the generation of the new snapshot.
    pub fn publish(&self, scratch: RemoteState) -> u32 {
        self.inner.lock(|cell| {
            let mut slot = cell.borrow_mut();
            slot.generation = slot.generation.wrapping_add(1).max(1);
            slot.state = scratch;
            slot.generation
        })
    }

    /// Copy of the current snapshot
    pub fn snapshot(&self) -> RemoteState {
        self.inner.lock(|cell| cell.borrow().state.clone())
    }

    /// Copy of the current snapshot and its generation
    pub fn versioned(&self) -> Versioned {
        self.inner.lock(|cell| cell.borrow().clone())
    }

    /// Generation of the current snapshot
    pub fn generation(&self) -> u32 {
        self.inner.lock(|cell| cell.borrow().generation)
    }

    /// Run `f` against the current snapshot inside the exclusion window
    ///
    /// Keep `f` short: it blocks the publisher.
    pub fn with<R>(&self, f: impl FnOnce(&RemoteState) -> R) -> R {
        self.inner.lock(|cell| f(&cell.borrow().state))
    }

    /// True if a snapshot exists and it is the one the caller last saw
    pub fn is_current(&self, last_seen: u32) -> bool {
        last_seen != 0 && self.generation() == last_seen
    }

    /// The current snapshot if it was published after `last_seen`
    pub fn changed_since(&self, last_seen: u32) -> Option<Versioned> {
        self.inner.lock(|cell| {
            let slot = cell.borrow();
            (slot.generation != last_seen && !slot.is_stale()).then(|| slot.clone())
        })
    }
}
