//! `AgentStore` — the per-Worker, thread-local population of `Agent`s.
//!
//! # Why local, not global
//!
//! The original `WorkGroup` gives each `Worker` a disjoint slice of the
//! overall agent population to update. A single `Vec<Agent>` shared
//! (even read-only) across Worker threads would still force every
//! `Agent` to be `Sync`, which `Box<dyn Role>` with `Rc`-based buffered
//! fields deliberately is not — Roles are meant to be written without
//! worrying about cross-thread access at all. Giving each Worker its own
//! `AgentStore`, populated only with the agents it currently owns, makes
//! "Worker owns a disjoint slice" true at the type level instead of by
//! convention: no two Workers can ever hold a reference to the same
//! `Agent`. Cross-worker visibility happens only through the
//! coordinator-rebuilt `SpatialIndex` (see `dt-spatial::aura`); an agent
//! becomes visible to other Workers only via its published `position`,
//! snapshotted into that index once per tick.
//!
//! Migration (an agent crossing from one Worker's territory to another's)
//! happens by removing it from the source store and handing it to the
//! coordinator, which pushes it into the destination store — always
//! during the Flip phase, never while either Worker is mid-Tick.

use rustc_hash::FxHashMap;

use dt_core::AgentId;

use crate::agent::Agent;
use crate::error::{AgentError, AgentResult};

/// The set of agents a single Worker owns right now.
#[derive(Default)]
pub struct AgentStore {
    agents: Vec<Agent>,
    index: FxHashMap<AgentId, usize>,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Add an agent to this store. Panics (debug) if an agent with the
    /// same id is already present — migration must remove from the
    /// source store before inserting into the destination.
    pub fn insert(&mut self, agent: Agent) {
        debug_assert!(
            !self.index.contains_key(&agent.id),
            "agent {:?} already present in this worker's store",
            agent.id
        );
        let idx = self.agents.len();
        self.index.insert(agent.id, idx);
        self.agents.push(agent);
    }

    /// Remove and return an agent, e.g. because it migrated to another
    /// Worker or completed its trip chain.
    pub fn remove(&mut self, id: AgentId) -> AgentResult<Agent> {
        let idx = self.index.remove(&id).ok_or(AgentError::NotFound(id))?;
        let removed = self.agents.swap_remove(idx);
        // swap_remove moved the former last element into `idx`; fix up
        // its index entry unless it was the element we just removed.
        if idx < self.agents.len() {
            self.index.insert(self.agents[idx].id, idx);
        }
        Ok(removed)
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.index.get(&id).map(|&i| &self.agents[i])
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.index.get(&id).map(|&i| &mut self.agents[i])
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.iter_mut()
    }

    /// Remove and return every agent for which `predicate` returns `true`
    /// — used by the coordinator to pull out agents that have crossed
    /// into another Worker's territory, in one pass.
    pub fn drain_where(&mut self, mut predicate: impl FnMut(&Agent) -> bool) -> Vec<Agent> {
        let mut drained = Vec::new();
        let mut i = 0;
        while i < self.agents.len() {
            if predicate(&self.agents[i]) {
                let agent = self.agents.swap_remove(i);
                self.index.remove(&agent.id);
                if i < self.agents.len() {
                    self.index.insert(self.agents[i].id, i);
                }
                drained.push(agent);
            } else {
                i += 1;
            }
        }
        drained
    }

    /// Remove every agent whose Role has signalled completion
    /// (`Agent::is_done`), returning their ids.
    pub fn remove_done(&mut self) -> Vec<AgentId> {
        let done_ids: Vec<AgentId> = self
            .agents
            .iter()
            .filter(|a| a.is_done())
            .map(|a| a.id)
            .collect();
        for id in &done_ids {
            let _ = self.remove(*id);
        }
        done_ids
    }
}
