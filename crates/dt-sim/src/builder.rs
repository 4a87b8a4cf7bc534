//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use dt_agent::RoleFactory;
use dt_core::SimConfig;
use dt_schedule::{EntityStager, PendingAgent};
use dt_spatial::RoadNetwork;

use crate::group::WorkGroup;
use crate::sim::Sim;
use crate::{SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total ticks, seed, worker count, …
/// - a [`RoadNetwork`] — the static road graph every Worker reads from
/// - a role factory constructor — a `Fn() -> Box<dyn RoleFactory>` closure,
///   called once per Worker thread so each Worker builds (and privately
///   owns) its own router/network handles
///
/// # Optional inputs
///
/// - `.agents(v)` — agents already known at tick 0 (default: none; stage
///   them later via whatever mechanism the application uses)
///
/// # Example
///
/// ```rust,ignore
/// let sim = SimBuilder::new(config)
///     .network(network)
///     .role_factory(move || Box::new(DemoRoleFactory::new(network.clone())))
///     .agents(initial_agents)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config: Option<SimConfig>,
    network: Option<Arc<RoadNetwork>>,
    initial_agents: Vec<PendingAgent>,
    role_factory_fn: Option<Arc<dyn Fn() -> Box<dyn RoleFactory> + Send + Sync>>,
}

impl Default for SimBuilder {
    fn default() -> Self {
        Self {
            config: None,
            network: None,
            initial_agents: Vec::new(),
            role_factory_fn: None,
        }
    }
}

impl SimBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn network(mut self, network: RoadNetwork) -> Self {
        self.network = Some(Arc::new(network));
        self
    }

    /// Agents staged and ready to pop as soon as their `start_tick` comes up.
    pub fn agents(mut self, agents: Vec<PendingAgent>) -> Self {
        self.initial_agents = agents;
        self
    }

    /// Supply the per-Worker role factory constructor. Called once on each
    /// Worker's own thread at spawn time, so the returned `RoleFactory` (and
    /// whatever router/network handles it captures) never has to be `Send`.
    pub fn role_factory<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Box<dyn RoleFactory> + Send + Sync + 'static,
    {
        self.role_factory_fn = Some(Arc::new(f));
        self
    }

    /// Validate inputs, spawn the `WorkGroup`, and return a ready-to-run `Sim`.
    pub fn build(self) -> SimResult<Sim> {
        let config = self
            .config
            .ok_or_else(|| SimError::Config("missing SimConfig".into()))?;
        let network = self
            .network
            .unwrap_or_else(|| Arc::new(RoadNetwork::empty()));
        let role_factory_fn = self
            .role_factory_fn
            .ok_or_else(|| SimError::Config("missing role factory".into()))?;

        if config.worker_count < 1 {
            return Err(SimError::Config("worker_count must be at least 1".into()));
        }

        let mut stager = EntityStager::new();
        for agent in self.initial_agents {
            stager.stage(agent);
        }

        let group = WorkGroup::spawn(
            config.worker_count,
            config.total_ticks,
            network,
            config.seed,
            role_factory_fn,
        );

        Ok(Sim::new(config, stager, group))
    }
}
