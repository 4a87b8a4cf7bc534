//! Hooks for observing a run from the coordinator thread without reaching
//! into `Sim`'s internals — output writers (`dt-output`) and demos both
//! implement this instead of being handed a `WorkGroup`/`EntityStager`
//! directly.

use dt_core::{AgentId, Point2D, Tick};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick, once its three-phase macro-step has
    /// fully completed. `woken` is the number of agents newly dispatched to
    /// Workers this tick.
    fn on_tick_end(&mut self, _tick: Tick, _woken: usize) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks) with every agent's position as reported by its owning Worker
    /// during Flip. `positions` is not sorted by `AgentId`.
    fn on_snapshot(&mut self, _tick: Tick, _positions: &[(AgentId, Point2D)]) {}

    /// Called once after the final tick completes, before Worker threads
    /// are joined.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing. Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
