//! `EntityStager` — the priority queue of not-yet-active agents, keyed by
//! start tick, and the removal bucket Workers drain into once an agent's
//! trip chain is exhausted.
//!
//! Grounded on the specification's `EntityStager` component: "priority
//! queue of pending agents keyed by start-time; hands agents to workers
//! as simulated time advances; collects agents marked for removal." This
//! replaces the teacher's `WakeQueue`, which re-activated already-running
//! agents for mid-run re-planning under a cyclic activity-plan model;
//! the trip-chain/Role model ticks every owned agent every tick (no
//! idle-skipping optimization), so the only queue the new design needs is
//! this one: agents not yet born into the simulation.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use dt_core::{AgentId, Tick};

use crate::config::Placement;
use dt_agent::TripChain;

/// Everything needed to construct the `Agent` for one not-yet-active
/// simulated entity.
#[derive(Debug, Clone)]
pub struct PendingAgent {
    pub agent_id: AgentId,
    pub start_tick: Tick,
    pub placement: Placement,
    pub trip_chain: TripChain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeapKey {
    start_tick: Tick,
    agent_id: AgentId,
}

impl Ord for HeapKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (a max-heap) pops the earliest start_tick
        // first; ties broken by agent_id for a stable pop order.
        other
            .start_tick
            .cmp(&self.start_tick)
            .then_with(|| other.agent_id.0.cmp(&self.agent_id.0))
    }
}

impl PartialOrd for HeapKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Pending-agent queue plus the removal bucket for agents whose trip
/// chain has run out.
#[derive(Default)]
pub struct EntityStager {
    heap: BinaryHeap<HeapKey>,
    pending: std::collections::HashMap<AgentId, PendingAgent>,
    removed: Vec<AgentId>,
}

impl EntityStager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `agent` to become active at `agent.start_tick`.
    pub fn stage(&mut self, agent: PendingAgent) {
        self.heap.push(HeapKey {
            start_tick: agent.start_tick,
            agent_id: agent.agent_id,
        });
        self.pending.insert(agent.agent_id, agent);
    }

    /// Remove and return every pending agent whose `start_tick <= now`, in
    /// ascending start-tick order.
    pub fn pop_ready(&mut self, now: Tick) -> Vec<PendingAgent> {
        let mut ready = Vec::new();
        while let Some(top) = self.heap.peek() {
            if top.start_tick > now {
                break;
            }
            let key = self.heap.pop().expect("just peeked Some");
            if let Some(agent) = self.pending.remove(&key.agent_id) {
                ready.push(agent);
            }
        }
        ready
    }

    /// The earliest tick with at least one still-pending agent.
    pub fn next_start_tick(&self) -> Option<Tick> {
        self.heap.peek().map(|k| k.start_tick)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Record that `agent` finished its trip chain and should be dropped
    /// from the simulation. Called by the coordinator once a Worker
    /// reports `Agent::is_done`.
    pub fn mark_removed(&mut self, agent: AgentId) {
        self.removed.push(agent);
    }

    /// Drain the accumulated removal list.
    pub fn drain_removed(&mut self) -> Vec<AgentId> {
        std::mem::take(&mut self.removed)
    }
}
