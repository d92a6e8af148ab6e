//! Dropping events addressed to a listener that has since been replaced.
//!
//! Callbacks may still be in flight after a listener is deregistered. Each
//! listener remembers the generation it was registered under and ignores
//! delivery once [`GenerationToken::invalidate`] has moved past it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::trace;

/// Shared generation counter, bumped on every deregistration.
#[derive(Debug, Clone, Default)]
pub struct GenerationToken {
    current: Arc<AtomicU64>,
}

impl GenerationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::Acquire)
    }

    /// Retire every listener registered so far and return the new generation.
    pub fn invalidate(&self) -> u64 {
        self.current.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Wrap `callback` so it only fires while this generation is current.
    pub fn register<F>(&self, callback: F) -> VersionedListener<F> {
        VersionedListener {
            token: self.clone(),
            generation: self.current(),
            callback,
        }
    }
}

pub struct VersionedListener<F> {
    token: GenerationToken,
    generation: u64,
    callback: F,
}

impl<F> VersionedListener<F> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.token.current() == self.generation
    }

    /// Hand `event` to the callback unless the listener is stale.
    ///
    /// Returns whether the callback ran.
    pub fn deliver<E>(&mut self, event: E) -> bool
    where
        F: FnMut(E),
    {
        if !self.is_current() {
            trace!(
                "Dropping event for stale listener (generation {} != {})",
                self.generation,
                self.token.current()
            );
            return false;
        }

        (self.callback)(event);
        true
    }
}
