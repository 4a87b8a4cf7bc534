//! Fluent builder for constructing a single `Agent`.
//!
//! # Usage
//!
//! ```rust
//! use dt_agent::{AgentBuilder, TripChain, Role, RoleContext, FrameResult};
//! use dt_core::{AgentId, Point2D, TransportMode};
//!
//! struct DemoRole;
//! impl Role for DemoRole {
//!     fn mode(&self) -> TransportMode { TransportMode::Walk }
//!     fn frame_tick(&mut self, _ctx: &RoleContext) -> FrameResult { FrameResult::Done }
//! }
//!
//! let agent = AgentBuilder::new(AgentId(0), Point2D::new(0.0, 0.0))
//!     .seed(42)
//!     .trip_chain(TripChain::empty())
//!     .role(Box::new(DemoRole))
//!     .build();
//! ```

use std::rc::Rc;

use dt_buffer::DoubleBuffered;
use dt_core::{AgentId, AgentRng, Point2D};

use crate::agent::Agent;
use crate::role::{NullRoleFactory, Role, RoleFactory};
use crate::trip_chain::TripChain;

/// Fluent builder for a single [`Agent`], used by population loaders that
/// construct agents one CSV row / demand record at a time.
pub struct AgentBuilder {
    id: AgentId,
    position: Point2D,
    seed: u64,
    trip_chain: TripChain,
    role: Option<Box<dyn Role>>,
    role_factory: Option<Rc<dyn RoleFactory>>,
}

impl AgentBuilder {
    pub fn new(id: AgentId, position: Point2D) -> Self {
        Self {
            id,
            position,
            seed: 0,
            trip_chain: TripChain::empty(),
            role: None,
            role_factory: None,
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn trip_chain(mut self, trip_chain: TripChain) -> Self {
        self.trip_chain = trip_chain;
        self
    }

    pub fn role(mut self, role: Box<dyn Role>) -> Self {
        self.role = Some(role);
        self
    }

    /// Supply the factory consulted when the trip chain advances past the
    /// starting item. Defaults to [`NullRoleFactory`] for agents whose
    /// trip chain never has more than one item.
    pub fn role_factory(mut self, factory: Rc<dyn RoleFactory>) -> Self {
        self.role_factory = Some(factory);
        self
    }

    /// Construct the `Agent`. Panics if no starting `Role` was supplied —
    /// every agent must enter the simulation with something to do.
    pub fn build(self) -> Agent {
        let role = self
            .role
            .expect("AgentBuilder::build called without a starting role");
        let role_factory = self
            .role_factory
            .unwrap_or_else(|| Rc::new(NullRoleFactory));
        let rng = AgentRng::new(self.seed, self.id);
        let position = Rc::new(DoubleBuffered::new(self.position));
        Agent::new(self.id, position, rng, self.trip_chain, role, role_factory)
    }
}
