//! `dt-agent` — the simulated agent: identity, published position, pluggable
//! `Role`, day plan, and the per-Worker local store that owns it.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |-----------------|-------------------------------------------------------------|
//! | [`role`]       | `Role` trait, `RoleContext`, `FrameResult`                   |
//! | [`trip_chain`] | `TripChain`, `Trip`, `SubTrip`, `Activity`, `Destination`     |
//! | [`agent`]      | `Agent` — identity, position, active `Role`, day plan         |
//! | [`store`]      | `AgentStore` — the agents one Worker currently owns           |
//! | [`builder`]    | `AgentBuilder` (fluent single-agent construction)              |
//! | [`error`]      | `AgentError`, `AgentResult`                                    |

pub mod agent;
pub mod builder;
pub mod error;
pub mod role;
pub mod store;
pub mod trip_chain;


pub use agent::Agent;
pub use builder::AgentBuilder;
pub use error::{AgentError, AgentResult};
pub use role::{FrameResult, NullRoleFactory, Role, RoleContext, RoleFactory};
pub use store::AgentStore;
pub use trip_chain::{Activity, Destination, SubTrip, Trip, TripChain, TripChainItem};
