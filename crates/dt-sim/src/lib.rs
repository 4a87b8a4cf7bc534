//! `dt-sim` — the Worker pool, `FlexiBarrier` macro-step loop, and
//! coordinator for the rust_dt framework.
//!
//! # Architecture
//!
//! A run splits the agent population across a fixed number of `Worker`
//! threads (a [`WorkGroup`][group::WorkGroup]), each of which owns a
//! disjoint, never-shared slice of agents for the run's whole lifetime.
//! The coordinator ([`Sim`]) drives every Worker through the same
//! three-phase macro-step, once per tick:
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   stage   — coordinator pops agents newly due this tick from its
//!             EntityStager and round-robins them out to Workers
//!   ① Tick  — every Worker runs frame_tick (and delivers any queued
//!             messages) for each of its agents, then crosses FrameTick
//!   ② Flip  — every Worker rebuilds its FlipSet from current
//!             subscriptions, reports its agents' positions and any that
//!             finished, then crosses Flip
//!   ③ Aura  — the coordinator folds every report into the next
//!             SpatialIndex and publishes it; Workers cross Aura once it's
//!             ready
//! ```
//!
//! Three [`dt_buffer::FlexiBarrier`]s (FrameTick, Flip, Aura), each sized
//! `worker_count + 1`, rendezvous every Worker with the coordinator once
//! per phase per tick. Cross-Worker visibility only ever happens through
//! the read-only [`dt_spatial::SpatialIndex`] snapshot published each
//! round — no Worker ever reaches into another's agents directly.
//!
//! Routing is deliberately not a generic parameter here:
//! [`dt_agent::RoleFactory::create_role`] takes no network or router
//! argument, so whatever router an application needs lives inside its own
//! `RoleFactory` implementation, constructed once per Worker thread by the
//! closure passed to [`SimBuilder::role_factory`].
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use dt_core::SimConfig;
//! use dt_sim::{NoopObserver, SimBuilder};
//!
//! let sim = SimBuilder::new()
//!     .config(config)
//!     .network(network)
//!     .role_factory(move || Box::new(my_role_factory()))
//!     .agents(initial_agents)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod group;
pub mod observer;
pub mod sim;
pub mod worker;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use group::WorkGroup;
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use worker::{AuraUpdate, WorkerReport};
