//! `Sim` — the coordinator thread's view of a run: stages not-yet-active
//! agents, drives the `WorkGroup` through one macro-step per tick, and
//! folds every Worker's report into the next `SpatialIndex`.

use std::collections::HashMap;
use std::sync::Arc;

use dt_core::{AgentId, MessageKind, Point2D, SimClock, SimConfig, Tick};
use dt_schedule::EntityStager;
use dt_spatial::SpatialIndex;

use crate::error::SimResult;
use crate::group::WorkGroup;
use crate::observer::SimObserver;
use crate::worker::AuraUpdate;

/// The main simulation coordinator.
///
/// Built via [`SimBuilder`][crate::SimBuilder]. Owns the not-yet-active
/// population (in an [`EntityStager`]) and the live [`WorkGroup`]; every
/// tick it stages newly-ready agents to their Workers, rendezvouses with
/// them across the three macro-step barriers, and rebuilds the
/// [`SpatialIndex`] every Worker will read from during the next round.
pub struct Sim {
    config: SimConfig,
    clock: SimClock,
    stager: EntityStager,
    group: WorkGroup,
    aura: Arc<SpatialIndex>,
    /// Messages queued by the application (`queue_message`) for delivery
    /// at the start of the next macro-step — the only message-injection
    /// path this engine supports; genuine agent-to-agent emission would
    /// need `Role`/`RoleContext` to grow an outbound side, which neither
    /// currently has.
    pending_messages: HashMap<AgentId, Vec<MessageKind>>,
}

impl Sim {
    pub(crate) fn new(config: SimConfig, stager: EntityStager, group: WorkGroup) -> Self {
        let clock = config.make_clock();
        Self {
            config,
            clock,
            stager,
            group,
            aura: Arc::new(SpatialIndex::empty()),
            pending_messages: HashMap::new(),
        }
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Queue `message` for delivery to `to` at the start of the next
    /// macro-step.
    pub fn queue_message(&mut self, to: AgentId, message: MessageKind) {
        self.pending_messages.entry(to).or_default().push(message);
    }

    /// Run every configured tick, then join all Worker threads.
    pub fn run<O: SimObserver>(mut self, observer: &mut O) -> SimResult<()> {
        let total_ticks = self.config.total_ticks;
        for _ in 0..total_ticks {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        self.group.join()
    }

    /// Run exactly `n` macro-steps from the current tick. Useful for tests
    /// and incremental stepping; `n` must not exceed the remaining ticks
    /// this `Sim` was built for, since every Worker thread only loops
    /// `config.total_ticks` times in total.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        let ready = self.stager.pop_ready(now);
        let woken = ready.len();
        self.group.dispatch(ready);

        let messages: Vec<(AgentId, MessageKind)> = self
            .pending_messages
            .drain()
            .flat_map(|(to, msgs)| msgs.into_iter().map(move |m| (to, m)))
            .collect();

        self.group.broadcast(AuraUpdate {
            aura: self.aura.clone(),
            clock: self.clock.clone(),
            messages: Arc::new(messages),
        });

        // ── FrameTick ───────────────────────────────────────────────────
        self.group.frame_tick_barrier.wait();

        // ── Flip ────────────────────────────────────────────────────────
        self.group.flip_barrier.wait();

        let mut positions: Vec<(AgentId, Point2D)> = Vec::new();
        for _ in 0..self.group.worker_count() {
            let report = self.group.recv_report()?;
            positions.extend(report.positions);
            for id in report.done {
                self.stager.mark_removed(id);
            }
        }

        if self.config.output_interval_ticks > 0 && now.0.is_multiple_of(self.config.output_interval_ticks) {
            observer.on_snapshot(now, &positions);
        }
        self.aura = Arc::new(SpatialIndex::build(positions));

        // ── Aura ────────────────────────────────────────────────────────
        self.group.aura_barrier.wait();

        observer.on_tick_end(now, woken);
        self.clock.advance();
        Ok(())
    }
}

#[allow(dead_code)]
fn end_tick(config: &SimConfig) -> Tick {
    config.end_tick()
}
