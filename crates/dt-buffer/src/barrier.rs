//! `FlexiBarrier` — an N-party rendezvous where a single arrival can count
//! for more than one party (§4.2).
//!
//! A Worker sub-steps for every entity it manages, so one call to `wait`
//! represents not just the Worker itself but every sub-managed entity it
//! is standing in for this round. `std::sync::Barrier` assumes one arrival
//! per party and can't express that, so this rolls the same `Mutex` +
//! `Condvar` + generation-counter technique `Barrier` itself uses, but
//! accepts a contribution count per arrival.

use std::sync::{Condvar, Mutex};

struct State {
    generation: u64,
    arrived: usize,
}

/// A barrier that releases all waiters once total contributions across
/// all arrivals reach `parties` for the current generation, then resets
/// for the next round.
pub struct FlexiBarrier {
    parties: usize,
    state: Mutex<State>,
    cond: Condvar,
}

/// Returned by [`FlexiBarrier::contribute`]. `true` on the thread whose
/// arrival completed the round — mirrors `std::sync::BarrierWaitResult`,
/// useful when exactly one thread (e.g. the coordinator) needs to run a
/// once-per-round step after the rendezvous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlexiBarrierWaitResult(bool);

impl FlexiBarrierWaitResult {
    pub fn is_leader(self) -> bool {
        self.0
    }
}

impl FlexiBarrier {
    /// `parties` is the total contribution count expected per round —
    /// typically the agent population size (each Worker contributes once
    /// per agent it owns) rather than the Worker count.
    pub fn new(parties: usize) -> Self {
        Self {
            parties,
            state: Mutex::new(State {
                generation: 0,
                arrived: 0,
            }),
            cond: Condvar::new(),
        }
    }

    /// Arrive on behalf of `k` parties and block until the round
    /// completes. `k` may be zero, in which case the calling thread still
    /// waits for the round to complete without adding to the count — used
    /// by a Worker that owns no entities in a given phase but must stay in
    /// lockstep with the others.
    pub fn contribute(&self, k: usize) -> FlexiBarrierWaitResult {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let local_generation = guard.generation;
        guard.arrived += k;

        if guard.arrived >= self.parties {
            guard.arrived = 0;
            guard.generation = guard.generation.wrapping_add(1);
            self.cond.notify_all();
            return FlexiBarrierWaitResult(true);
        }

        while guard.generation == local_generation {
            guard = self.cond.wait(guard).unwrap_or_else(|e| e.into_inner());
        }
        FlexiBarrierWaitResult(false)
    }

    /// Convenience for the common case of a single-party arrival.
    pub fn wait(&self) -> FlexiBarrierWaitResult {
        self.contribute(1)
    }

    /// Total contributions expected per round.
    pub fn parties(&self) -> usize {
        self.parties
    }
}
